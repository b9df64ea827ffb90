//! Error types for reference parsing and lookup.

use std::fmt;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid reference \"{reference}\": {kind}")]
pub struct ReferenceError {
    pub reference: String,
    pub kind: ReferenceErrorKind,
}

impl ReferenceError {
    #[must_use]
    pub fn new(reference: &str, kind: ReferenceErrorKind) -> Self {
        Self {
            reference: reference.to_string(),
            kind,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenRole {
    Chapter,
    Verse,
    EndChapter,
    EndVerse,
}

impl fmt::Display for TokenRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenRole::Chapter => "chapter",
            TokenRole::Verse => "verse",
            TokenRole::EndChapter => "end chapter",
            TokenRole::EndVerse => "end verse",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReferenceErrorKind {
    #[error("empty {0}")]
    EmptyToken(TokenRole),

    #[error("unrecognized {role} \"{token}\"")]
    InvalidToken { role: TokenRole, token: String },

    /// A comma group whose first piece does not name a chapter.
    #[error("verse list \"{0}\" does not start with chapter:verse")]
    MissingChapter(String),

    #[error("open-ended range \"{0}\" cannot span chapters")]
    OpenEndedChapterRange(String),

    #[error("range in \"{0}\" needs numeric bounds to be walked")]
    NonNumericRange(String),
}
