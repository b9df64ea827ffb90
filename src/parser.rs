use crate::config::ReferenceConfig;
use crate::error::{ReferenceError, ReferenceErrorKind, TokenRole};
use crate::logger::DiagnosticLogger;
use crate::models::*;
use crate::tokenizer::{Token, Tokenizer};
use anyhow::{Context, Result};

/// Parses reference strings such as `2:4-5`, `1:1-2,4b,5-7a` or `1:12-2:4;3:5-4:2`.
///
/// The parser never checks references against real book boundaries.
pub struct ReferenceParser {
    tokenizer: Tokenizer,
    logger: Option<DiagnosticLogger>,
}

impl ReferenceParser {
    pub fn new(config: &ReferenceConfig) -> Result<Self> {
        Ok(ReferenceParser {
            tokenizer: Tokenizer::new(config)
                .context("Failed to create Tokenizer for parser")?,
            logger: None,
        })
    }

    pub fn with_logger(mut self, logger: DiagnosticLogger) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    pub fn logger(&self) -> Option<&DiagnosticLogger> {
        self.logger.as_ref()
    }

    /// Split a reference into ordered chunks.
    ///
    /// An empty reference gives no chunks; malformed syntax is an error.
    pub fn parse(&self, reference: &str) -> std::result::Result<ParsedReference, ReferenceError> {
        self.parse_chunks(reference)
            .map(ParsedReference::new)
            .map_err(|kind| {
                let err = ReferenceError::new(reference, kind);
                self.report(&err);
                err
            })
    }

    pub(crate) fn report(&self, err: &ReferenceError) {
        if let Some(logger) = &self.logger {
            logger.warning(
                format!("invalid reference: \"{}\"", err.reference),
                Some(serde_json::json!({
                    "reference": err.reference,
                    "error": err.kind.to_string(),
                })),
            );
        }
    }

    fn parse_chunks(&self, reference: &str) -> std::result::Result<Vec<VerseChunk>, ReferenceErrorKind> {
        let mut chunks = Vec::new();

        for group in reference.split(';') {
            let group = self.tokenizer.trim(group);
            if group.is_empty() {
                continue;
            }

            if group.contains(':') {
                self.parse_verse_group(group, &mut chunks)?;
            } else {
                chunks.push(self.parse_chapter_group(group)?);
            }
        }

        Ok(chunks)
    }

    /// `3` or `1-3`
    fn parse_chapter_group(&self, group: &str) -> std::result::Result<VerseChunk, ReferenceErrorKind> {
        match self.tokenizer.token(group, TokenRole::Chapter)? {
            Token::Value(chapter) => Ok(VerseChunk::whole_chapter(chapter)),
            Token::Range { start, end } => {
                let chapter = self.tokenizer.value(start, TokenRole::Chapter)?;
                let end_chapter = self.tokenizer.value(end, TokenRole::EndChapter)?;
                Ok(VerseChunk::chapter_range(chapter, end_chapter))
            }
            Token::OpenEnded { .. } => Err(ReferenceErrorKind::InvalidToken {
                role: TokenRole::Chapter,
                token: group.to_string(),
            }),
        }
    }

    /// A comma list such as `1:1-2,4,2:6`. Pieces without their own chapter
    /// inherit the chapter the previous piece ended in.
    fn parse_verse_group(
        &self,
        group: &str,
        chunks: &mut Vec<VerseChunk>,
    ) -> std::result::Result<(), ReferenceErrorKind> {
        let mut parts = group.split(',');
        let first = parts.next().unwrap_or_default();

        let Some((chapter_raw, verse_raw)) = first.split_once(':') else {
            return Err(ReferenceErrorKind::MissingChapter(group.to_string()));
        };
        let chapter = self.tokenizer.value(chapter_raw, TokenRole::Chapter)?;
        let chunk = self.parse_verse_part(chapter, verse_raw)?;
        let mut last_chapter = ending_chapter(&chunk);
        chunks.push(chunk);

        for part in parts {
            if self.tokenizer.trim(part).is_empty() {
                continue;
            }

            let chunk = match part.split_once(':') {
                Some((chapter_raw, verse_raw)) => {
                    let chapter = self.tokenizer.value(chapter_raw, TokenRole::Chapter)?;
                    self.parse_verse_part(chapter, verse_raw)?
                }
                None => self.parse_verse_part(last_chapter, part)?,
            };
            last_chapter = ending_chapter(&chunk);
            chunks.push(chunk);
        }

        Ok(())
    }

    /// The verse side of `chapter:verse`: `4`, `4b`, `3ff`, `1-2`, `12-2:4`.
    fn parse_verse_part(
        &self,
        chapter: RefValue,
        raw: &str,
    ) -> std::result::Result<VerseChunk, ReferenceErrorKind> {
        let raw = self.tokenizer.trim(raw);

        match self.tokenizer.token(raw, TokenRole::Verse)? {
            Token::Value(verse) => Ok(VerseChunk::verse(chapter, verse)),
            Token::OpenEnded { start } => {
                let verse = self.tokenizer.value(start, TokenRole::Verse)?;
                Ok(VerseChunk::following(chapter, verse))
            }
            Token::Range { start, end } => {
                let verse = self.tokenizer.value(start, TokenRole::Verse)?;

                if let Some((end_chapter_raw, end_verse_raw)) = end.split_once(':') {
                    let end_chapter = self.tokenizer.value(end_chapter_raw, TokenRole::EndChapter)?;
                    let end_verse = match self.tokenizer.token(end_verse_raw, TokenRole::EndVerse)? {
                        Token::Value(end_verse) => end_verse,
                        Token::OpenEnded { .. } => {
                            return Err(ReferenceErrorKind::OpenEndedChapterRange(raw.to_string()))
                        }
                        Token::Range { .. } => {
                            return Err(ReferenceErrorKind::InvalidToken {
                                role: TokenRole::EndVerse,
                                token: self.tokenizer.trim(end_verse_raw).to_string(),
                            })
                        }
                    };

                    return Ok(VerseChunk::cross_chapter(chapter, verse, end_chapter, end_verse));
                }

                match self.tokenizer.token(end, TokenRole::EndVerse)? {
                    Token::Value(end_verse) => Ok(VerseChunk::verse_range(chapter, verse, end_verse)),
                    Token::OpenEnded { .. } => Ok(VerseChunk::following(chapter, verse)),
                    Token::Range { .. } => Err(ReferenceErrorKind::InvalidToken {
                        role: TokenRole::EndVerse,
                        token: end.to_string(),
                    }),
                }
            }
        }
    }
}

impl Default for ReferenceParser {
    fn default() -> Self {
        Self::new(&ReferenceConfig::default()).expect("Failed to create ReferenceParser")
    }
}

fn ending_chapter(chunk: &VerseChunk) -> RefValue {
    chunk
        .end_chapter
        .clone()
        .unwrap_or_else(|| chunk.chapter.clone())
}
