use crate::config::ReferenceConfig;
use crate::error::{ReferenceErrorKind, TokenRole};
use crate::models::RefValue;
use anyhow::{Context, Result};
use regex::Regex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token<'a> {
    /// A number (trailing letters dropped) or a label such as `front`.
    Value(RefValue),
    /// Text before the open-ended marker, as in `3ff`.
    OpenEnded { start: &'a str },
    Range { start: &'a str, end: &'a str },
}

pub struct Tokenizer {
    separators: Vec<char>,
    open_ended_marker: String,
    ignored_chars: Vec<char>,
    number_pattern: Regex,
    label_pattern: Regex,
}

impl Tokenizer {
    pub fn new(config: &ReferenceConfig) -> Result<Self> {
        config.validate().context("Invalid reference configuration")?;

        Ok(Tokenizer {
            separators: config.range_separators.clone(),
            open_ended_marker: config.open_ended_marker.clone(),
            ignored_chars: config.ignored_chars.clone(),
            number_pattern: Regex::new(r"^([0-9]+)")
                .context("Failed to compile number pattern")?,
            label_pattern: Regex::new(r"^[A-Za-z]+$")
                .context("Failed to compile label pattern")?,
        })
    }

    pub fn trim<'a>(&self, raw: &'a str) -> &'a str {
        raw.trim_matches(|c: char| c.is_whitespace() || self.ignored_chars.contains(&c))
    }

    pub fn find_separator(&self, raw: &str) -> Option<(usize, usize)> {
        raw.char_indices()
            .find(|(_, c)| self.separators.contains(c))
            .map(|(pos, c)| (pos, c.len_utf8()))
    }

    pub fn has_separator(&self, raw: &str) -> bool {
        self.find_separator(raw).is_some()
    }

    pub fn token<'a>(&self, raw: &'a str, role: TokenRole) -> Result<Token<'a>, ReferenceErrorKind> {
        let raw = self.trim(raw);
        if raw.is_empty() {
            return Err(ReferenceErrorKind::EmptyToken(role));
        }

        if let Some((pos, len)) = self.find_separator(raw) {
            return Ok(Token::Range {
                start: &raw[..pos],
                end: &raw[pos + len..],
            });
        }

        if let Some(pos) = raw.find(self.open_ended_marker.as_str()) {
            return Ok(Token::OpenEnded { start: &raw[..pos] });
        }

        self.value(raw, role).map(Token::Value)
    }

    /// Coerce a token to a single value: leading digits win, otherwise a bare label.
    pub fn value(&self, raw: &str, role: TokenRole) -> Result<RefValue, ReferenceErrorKind> {
        let raw = self.trim(raw);
        if raw.is_empty() {
            return Err(ReferenceErrorKind::EmptyToken(role));
        }

        let invalid = || ReferenceErrorKind::InvalidToken {
            role,
            token: raw.to_string(),
        };

        if self.has_separator(raw) || raw.contains(self.open_ended_marker.as_str()) {
            return Err(invalid());
        }

        if self.number_pattern.is_match(raw) {
            return self.leading_number(raw).map(RefValue::Number).ok_or_else(invalid);
        }

        if self.label_pattern.is_match(raw) {
            return Ok(RefValue::Text(raw.to_string()));
        }

        Err(invalid())
    }

    /// Leading digits of `raw`, ignoring any trailing letters. `None` when
    /// there are none or they overflow.
    pub fn leading_number(&self, raw: &str) -> Option<u32> {
        let caps = self.number_pattern.captures(self.trim(raw))?;
        caps.get(1)?.as_str().parse().ok()
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new(&ReferenceConfig::default()).expect("Failed to create Tokenizer")
    }
}
