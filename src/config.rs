use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Hyphen and dash characters accepted as range separators.
pub const DEFAULT_RANGE_SEPARATORS: [char; 7] = [
    '-',        // HYPHEN-MINUS
    '\u{00AD}', // SOFT HYPHEN
    '\u{2010}', // HYPHEN
    '\u{2011}', // NON-BREAKING HYPHEN
    '\u{2012}', // FIGURE DASH
    '\u{2013}', // EN DASH
    '\u{2014}', // EM DASH
];

/// Invisible characters stripped from token edges along with whitespace.
pub const DEFAULT_IGNORED_CHARS: [char; 3] = [
    '\u{200B}', // ZERO WIDTH SPACE
    '\u{00A0}', // NO-BREAK SPACE
    '\u{FEFF}', // ZERO WIDTH NO-BREAK SPACE
];

pub const DEFAULT_OPEN_ENDED_MARKER: &str = "ff";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceConfig {
    pub range_separators: Vec<char>,
    pub open_ended_marker: String,
    pub ignored_chars: Vec<char>,
}

impl Default for ReferenceConfig {
    fn default() -> Self {
        ReferenceConfig {
            range_separators: DEFAULT_RANGE_SEPARATORS.to_vec(),
            open_ended_marker: DEFAULT_OPEN_ENDED_MARKER.to_string(),
            ignored_chars: DEFAULT_IGNORED_CHARS.to_vec(),
        }
    }
}

impl ReferenceConfig {
    pub fn with_separators(separators: &[char]) -> Self {
        ReferenceConfig {
            range_separators: separators.to_vec(),
            ..Self::default()
        }
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let config: ReferenceConfig = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.range_separators.is_empty() {
            return Err(anyhow::anyhow!("At least one range separator is required"));
        }
        if self.open_ended_marker.is_empty() {
            return Err(anyhow::anyhow!("Open-ended marker must not be empty"));
        }
        if self
            .range_separators
            .iter()
            .any(|c| *c == ':' || *c == ',' || *c == ';' || c.is_ascii_alphanumeric())
        {
            return Err(anyhow::anyhow!(
                "Range separators must not overlap the reference delimiters or digits"
            ));
        }
        Ok(())
    }
}
