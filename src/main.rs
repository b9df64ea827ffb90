mod cli;

use crate::cli::{Cli, Command};
use anyhow::{Context, Result};
use scripture_reference::logger::ProcessingStats;
use scripture_reference::models::ContainmentResult;
use scripture_reference::{schema, BookData, DiagnosticLogger, ReferenceConfig, ReferenceParser};
use serde::Serialize;
use std::fs;

const MAX_LOG_RUNS: usize = 10;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => ReferenceConfig::from_json_file(path)?,
        None => ReferenceConfig::default(),
    };

    let logger = match &cli.log_dir {
        Some(dir) => DiagnosticLogger::new(dir).context("Failed to create DiagnosticLogger")?,
        None => DiagnosticLogger::in_memory(),
    };

    let parser = ReferenceParser::new(&config)
        .context("Failed to create ReferenceParser")?
        .with_logger(logger.clone());

    let mut stats = ProcessingStats::default();
    let outcome = run(&cli, &parser, &mut stats);
    match &outcome {
        Ok(()) => logger.info(format!("{} finished", cli.command.name())),
        Err(e) => {
            stats.failures += 1;
            logger.error(
                format!("{} failed", cli.command.name()),
                Some(serde_json::json!({ "error": format!("{:#}", e) })),
            );
        }
    }

    let report = logger.generate_report(stats)?;
    if report.summary.errors > 0 || report.summary.warnings > 0 {
        eprintln!("Errors: {}, Warnings: {}", report.summary.errors, report.summary.warnings);
    }
    if cli.log_dir.is_some() {
        logger.rotate_logs(MAX_LOG_RUNS)?;
    }

    outcome
}

fn run(cli: &Cli, parser: &ReferenceParser, stats: &mut ProcessingStats) -> Result<()> {
    match &cli.command {
        Command::Parse { reference } => {
            stats.references += 1;
            let parsed = parser.parse(reference)?;
            stats.chunks += parsed.len();
            print_json(&parsed, cli.pretty)
        }
        Command::Clean { reference } => {
            stats.references += 1;
            let cleaned = parser.cleanup(reference)?;
            print_json(&cleaned, cli.pretty)
        }
        Command::Contains { reference, search_term, strict } => {
            stats.references += 2;
            let contained = parser.contains(reference, search_term, *strict)?;
            let result = ContainmentResult {
                reference: reference.clone(),
                search_term: search_term.clone(),
                strict: *strict,
                contained,
            };
            print_json(&result, cli.pretty)
        }
        Command::Verses { book, reference } => {
            let content = fs::read_to_string(book)
                .with_context(|| format!("Failed to read book file: {:?}", book))?;
            let book_data: BookData<serde_json::Value> = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse book file: {:?}", book))?;

            stats.references += 1;
            let entries = parser.verses(&book_data, reference)?;
            stats.chunks += entries.len();
            print_json(&entries, cli.pretty)
        }
        Command::Schema { out } => {
            schema::generate_schemas(out).context("Schema generation failed")?;
            println!("Schemas written to {:?}", out);
            Ok(())
        }
    }
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}
