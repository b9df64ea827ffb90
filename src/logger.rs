use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use walkdir::WalkDir;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LogLevel {
    #[serde(rename = "info")]
    Info,
    #[serde(rename = "warning")]
    Warning,
    #[serde(rename = "error")]
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: String,
    pub level: LogLevel,
    pub message: String,
    pub context: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosticReport {
    pub run_id: String,
    pub timestamp: String,
    pub summary: ReportSummary,
    pub entries: Vec<LogEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSummary {
    pub errors: usize,
    pub warnings: usize,
    pub processed: ProcessingStats,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProcessingStats {
    pub references: usize,
    pub chunks: usize,
    pub failures: usize,
}

/// Structured JSONL logger shared by the parser and the command line tool.
#[derive(Clone)]
pub struct DiagnosticLogger {
    log_dir: Option<PathBuf>,
    log_file: Arc<Mutex<Option<BufWriter<File>>>>,
    run_id: String,
    entries: Arc<Mutex<Vec<LogEntry>>>,
    counts: Arc<Mutex<LevelCounts>>,
}

#[derive(Debug, Default)]
struct LevelCounts {
    errors: usize,
    warnings: usize,
}

impl DiagnosticLogger {
    pub fn new(log_dir: &Path) -> Result<Self> {
        fs::create_dir_all(log_dir)
            .with_context(|| format!("Failed to create log directory: {:?}", log_dir))?;

        let run_id = Utc::now().format("%Y%m%d-%H%M%S").to_string();
        let log_file_path = log_dir.join(format!("refs-{}.jsonl", run_id));

        let log_file = Some(BufWriter::new(
            File::create(&log_file_path)
                .with_context(|| format!("Failed to create log file: {:?}", log_file_path))?,
        ));

        Ok(DiagnosticLogger {
            log_dir: Some(log_dir.to_path_buf()),
            log_file: Arc::new(Mutex::new(log_file)),
            run_id,
            entries: Arc::default(),
            counts: Arc::default(),
        })
    }

    /// A logger that only keeps entries in memory.
    pub fn in_memory() -> Self {
        DiagnosticLogger {
            log_dir: None,
            log_file: Arc::new(Mutex::new(None)),
            run_id: Utc::now().format("%Y%m%d-%H%M%S").to_string(),
            entries: Arc::default(),
            counts: Arc::default(),
        }
    }

    pub fn log(&self, level: LogLevel, message: String, context: Option<serde_json::Value>) {
        let entry = LogEntry {
            timestamp: Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            level: level.clone(),
            message,
            context,
        };

        if let Ok(mut counts) = self.counts.lock() {
            match level {
                LogLevel::Error => counts.errors += 1,
                LogLevel::Warning => counts.warnings += 1,
                LogLevel::Info => {}
            }
        }

        if let Ok(mut file_opt) = self.log_file.lock() {
            if let Some(ref mut file) = *file_opt {
                if let Ok(json) = serde_json::to_string(&entry) {
                    let _ = writeln!(file, "{}", json);
                }
            }
        }

        if let Ok(mut entries) = self.entries.lock() {
            entries.push(entry);
        }
    }

    pub fn info(&self, message: String) {
        self.log(LogLevel::Info, message, None);
    }

    pub fn warning(&self, message: String, context: Option<serde_json::Value>) {
        self.log(LogLevel::Warning, message, context);
    }

    pub fn error(&self, message: String, context: Option<serde_json::Value>) {
        self.log(LogLevel::Error, message, context);
    }

    pub fn error_count(&self) -> usize {
        self.counts.lock().map(|c| c.errors).unwrap_or(0)
    }

    pub fn warning_count(&self) -> usize {
        self.counts.lock().map(|c| c.warnings).unwrap_or(0)
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.lock().map(|e| e.clone()).unwrap_or_default()
    }

    pub fn generate_report(&self, stats: ProcessingStats) -> Result<DiagnosticReport> {
        if let Ok(mut file_opt) = self.log_file.lock() {
            if let Some(ref mut file) = *file_opt {
                file.flush()
                    .context("Failed to flush log file before generating report")?;
            }
        }

        Ok(DiagnosticReport {
            run_id: self.run_id.clone(),
            timestamp: Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            summary: ReportSummary {
                errors: self.error_count(),
                warnings: self.warning_count(),
                processed: stats,
            },
            entries: self.entries(),
        })
    }

    /// Keep only the `max_runs` most recent log files in the log directory.
    pub fn rotate_logs(&self, max_runs: usize) -> Result<()> {
        let Some(log_dir) = &self.log_dir else {
            return Ok(());
        };

        let mut run_files: Vec<(DateTime<Utc>, PathBuf)> = WalkDir::new(log_dir)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file() && is_run_file(e.file_name().to_str()))
            .filter_map(|e| {
                let modified: DateTime<Utc> = e.metadata().ok()?.modified().ok()?.into();
                Some((modified, e.into_path()))
            })
            .collect();

        if run_files.len() <= max_runs {
            return Ok(());
        }

        run_files.sort();
        let stale = run_files.len() - max_runs;
        for (_, path) in run_files.into_iter().take(stale) {
            fs::remove_file(&path)
                .with_context(|| format!("Failed to delete old log file: {:?}", path))?;
        }

        Ok(())
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }
}

fn is_run_file(name: Option<&str>) -> bool {
    name.is_some_and(|name| name.starts_with("refs-") && name.ends_with(".jsonl"))
}

impl Drop for DiagnosticLogger {
    fn drop(&mut self) {
        if let Ok(mut file_opt) = self.log_file.lock() {
            if let Some(ref mut file) = *file_opt {
                let _ = file.flush();
            }
        }
    }
}
