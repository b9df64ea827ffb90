use schemars::gen::SchemaGenerator;
use schemars::schema::Schema;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// A chapter or verse position: a number, or a label such as `front` or `intro`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum RefValue {
    Number(u32),
    Text(String),
}

impl RefValue {
    pub fn as_number(&self) -> Option<u32> {
        match self {
            RefValue::Number(n) => Some(*n),
            RefValue::Text(_) => None,
        }
    }
}

/// Numbers order numerically; a label is only comparable with itself.
impl PartialOrd for RefValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (RefValue::Number(a), RefValue::Number(b)) => Some(a.cmp(b)),
            (RefValue::Text(a), RefValue::Text(b)) if a == b => Some(Ordering::Equal),
            _ => None,
        }
    }
}

impl fmt::Display for RefValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RefValue::Number(n) => write!(f, "{}", n),
            RefValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<u32> for RefValue {
    fn from(n: u32) -> Self {
        RefValue::Number(n)
    }
}

impl From<&str> for RefValue {
    fn from(s: &str) -> Self {
        RefValue::Text(s.to_string())
    }
}

/// End of a verse range. `Following` is the open "ff" tail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RefValue", into = "RefValue")]
pub enum VerseEnd {
    Verse(RefValue),
    Following,
}

pub const FOLLOWING_MARKER: &str = "ff";

impl From<RefValue> for VerseEnd {
    fn from(value: RefValue) -> Self {
        match value {
            RefValue::Text(ref s) if s == FOLLOWING_MARKER => VerseEnd::Following,
            other => VerseEnd::Verse(other),
        }
    }
}

impl From<VerseEnd> for RefValue {
    fn from(end: VerseEnd) -> Self {
        match end {
            VerseEnd::Verse(value) => value,
            VerseEnd::Following => RefValue::Text(FOLLOWING_MARKER.to_string()),
        }
    }
}

impl JsonSchema for VerseEnd {
    fn schema_name() -> String {
        "VerseEnd".to_string()
    }

    fn json_schema(gen: &mut SchemaGenerator) -> Schema {
        RefValue::json_schema(gen)
    }
}

impl fmt::Display for VerseEnd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerseEnd::Verse(value) => write!(f, "{}", value),
            VerseEnd::Following => f.write_str(FOLLOWING_MARKER),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerseChunk {
    pub chapter: RefValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verse: Option<RefValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_chapter: Option<RefValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_verse: Option<VerseEnd>,
}

impl VerseChunk {
    pub fn whole_chapter(chapter: impl Into<RefValue>) -> Self {
        VerseChunk {
            chapter: chapter.into(),
            verse: None,
            end_chapter: None,
            end_verse: None,
        }
    }

    pub fn verse(chapter: impl Into<RefValue>, verse: impl Into<RefValue>) -> Self {
        VerseChunk {
            verse: Some(verse.into()),
            ..Self::whole_chapter(chapter)
        }
    }

    pub fn verse_range(
        chapter: impl Into<RefValue>,
        verse: impl Into<RefValue>,
        end_verse: impl Into<RefValue>,
    ) -> Self {
        VerseChunk {
            end_verse: Some(VerseEnd::Verse(end_verse.into())),
            ..Self::verse(chapter, verse)
        }
    }

    /// `chapter:verse` through the end of the chapter ("ff").
    pub fn following(chapter: impl Into<RefValue>, verse: impl Into<RefValue>) -> Self {
        VerseChunk {
            end_verse: Some(VerseEnd::Following),
            ..Self::verse(chapter, verse)
        }
    }

    pub fn chapter_range(chapter: impl Into<RefValue>, end_chapter: impl Into<RefValue>) -> Self {
        VerseChunk {
            end_chapter: Some(end_chapter.into()),
            ..Self::whole_chapter(chapter)
        }
    }

    pub fn cross_chapter(
        chapter: impl Into<RefValue>,
        verse: impl Into<RefValue>,
        end_chapter: impl Into<RefValue>,
        end_verse: impl Into<RefValue>,
    ) -> Self {
        VerseChunk {
            chapter: chapter.into(),
            verse: Some(verse.into()),
            end_chapter: Some(end_chapter.into()),
            end_verse: Some(VerseEnd::Verse(end_verse.into())),
        }
    }

    pub fn spans_chapters(&self) -> bool {
        self.end_chapter.is_some()
    }

    pub fn is_range(&self) -> bool {
        self.end_verse.is_some()
    }

    pub fn is_whole_chapter(&self) -> bool {
        self.verse.is_none() && self.end_chapter.is_none()
    }

    /// A range written end first, such as `1:5-3` or `4-2`. It covers no verses.
    pub fn is_reversed(&self) -> bool {
        if let Some(end_chapter) = &self.end_chapter {
            if end_chapter < &self.chapter {
                return true;
            }
            if end_chapter != &self.chapter {
                return false;
            }
        }
        match (&self.verse, &self.end_verse) {
            (Some(verse), Some(VerseEnd::Verse(end_verse))) => end_verse < verse,
            _ => false,
        }
    }
}

/// Ordered chunks of one reference string. `Display` gives the canonical form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct ParsedReference {
    chunks: Vec<VerseChunk>,
}

impl ParsedReference {
    pub fn new(chunks: Vec<VerseChunk>) -> Self {
        ParsedReference { chunks }
    }

    pub fn chunks(&self) -> &[VerseChunk] {
        &self.chunks
    }

    pub fn into_chunks(self) -> Vec<VerseChunk> {
        self.chunks
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, VerseChunk> {
        self.chunks.iter()
    }
}

impl<'a> IntoIterator for &'a ParsedReference {
    type Item = &'a VerseChunk;
    type IntoIter = std::slice::Iter<'a, VerseChunk>;

    fn into_iter(self) -> Self::IntoIter {
        self.chunks.iter()
    }
}

impl From<Vec<VerseChunk>> for ParsedReference {
    fn from(chunks: Vec<VerseChunk>) -> Self {
        ParsedReference::new(chunks)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CleanedReference {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chapter: Option<RefValue>,
    /// First verse, or the whole verse portion when the reference covers several verses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verse: Option<RefValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verse_str: Option<String>,
    pub cleaned_ref: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContainmentResult {
    pub reference: String,
    pub search_term: String,
    pub strict: bool,
    pub contained: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerseEntry<'a, V> {
    pub chapter: RefValue,
    /// Verse number, or the verse-span key (`"3-4"`) the data was found under.
    pub verse: RefValue,
    pub verse_data: Option<&'a V>,
}
