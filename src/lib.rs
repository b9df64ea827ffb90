//! Parsing, canonicalizing and comparing scripture references such as
//! `2:4-5`, `1:1-2,4b,5-7a` or `1:12-2:4;3:5-4:2`.
//!
//! [`ReferenceParser`] carries the configuration (range separators, the
//! open-ended marker) and an optional [`DiagnosticLogger`]. The free
//! functions below use a parser with the default configuration.

pub mod config;
pub mod containment;
pub mod error;
pub mod logger;
pub mod models;
pub mod parser;
pub mod schema;
pub mod serializer;
pub mod summary;
pub mod tokenizer;
pub mod verses;


pub use config::ReferenceConfig;
pub use error::{ReferenceError, ReferenceErrorKind};
pub use logger::DiagnosticLogger;
pub use models::{CleanedReference, ParsedReference, RefValue, VerseChunk, VerseEnd, VerseEntry};
pub use parser::ReferenceParser;
pub use verses::BookData;

use once_cell::sync::Lazy;

static DEFAULT_PARSER: Lazy<ReferenceParser> = Lazy::new(ReferenceParser::default);

pub fn parse_reference_to_list(reference: &str) -> Result<ParsedReference, ReferenceError> {
    DEFAULT_PARSER.parse(reference)
}

pub fn convert_reference_chunks_to_string(chunks: &[VerseChunk]) -> String {
    serializer::chunks_to_string(chunks)
}

pub fn cleanup_reference(reference: &str) -> Result<CleanedReference, ReferenceError> {
    DEFAULT_PARSER.cleanup(reference)
}

pub fn does_reference_contain(
    reference: &str,
    search_term: &str,
    strict: bool,
) -> Result<bool, ReferenceError> {
    DEFAULT_PARSER.contains(reference, search_term, strict)
}

pub fn get_verses<'a, V>(
    book: &'a BookData<V>,
    reference: &str,
) -> Result<Vec<VerseEntry<'a, V>>, ReferenceError> {
    DEFAULT_PARSER.verses(book, reference)
}
