//! Verse lookup against caller supplied book data.
//!
//! Book data maps a chapter key to a map from verse key to verse data. Verse
//! keys are plain verse numbers or spans such as `"3-4"` holding the text of
//! several verses at once.

use crate::error::{ReferenceError, ReferenceErrorKind};
use crate::models::{RefValue, VerseChunk, VerseEnd, VerseEntry};
use crate::parser::ReferenceParser;
use crate::tokenizer::Tokenizer;
use std::collections::HashMap;

pub type ChapterData<V> = HashMap<String, V>;
pub type BookData<V> = HashMap<String, ChapterData<V>>;

pub fn is_verse_span(verse: &str) -> bool {
    verse.contains('-')
}

pub fn is_verse_list(verse: &str) -> bool {
    verse.contains(',')
}

pub fn is_verse_set(verse: &str) -> bool {
    is_verse_span(verse) || is_verse_list(verse)
}

pub fn verse_list(verses: &str) -> Vec<&str> {
    verses.split(',').collect()
}

/// Low and high verse of a span key like `"3-4"`.
pub fn verse_span_range(tokenizer: &Tokenizer, span: &str) -> Option<(u32, u32)> {
    let mut parts = span.split('-');
    let low = tokenizer.leading_number(parts.next()?)?;
    let high = tokenizer.leading_number(parts.next()?)?;

    (low > 0 && high >= low).then_some((low, high))
}

/// Whether `chapter:verse` comes no later than `end_chapter:end_verse`.
/// `end_verse == None` runs to the end of `end_chapter`.
pub fn is_verse_in_range(chapter: u32, verse: u32, end_chapter: u32, end_verse: Option<u32>) -> bool {
    if chapter < end_chapter {
        return true;
    }
    chapter == end_chapter && end_verse.map_or(true, |end| verse <= end)
}

fn last_chapter<V>(tokenizer: &Tokenizer, book: &BookData<V>) -> Option<u32> {
    book.keys().filter_map(|key| tokenizer.leading_number(key)).max()
}

fn find_verse_in_span<'a, V>(
    tokenizer: &Tokenizer,
    chapter_data: &'a ChapterData<V>,
    verse: u32,
) -> Option<(&'a str, &'a V, u32)> {
    chapter_data
        .iter()
        .filter(|(key, _)| is_verse_span(key))
        .filter_map(|(key, data)| {
            let (low, high) = verse_span_range(tokenizer, key)?;
            (low <= verse && verse <= high).then_some((low, key.as_str(), data, high))
        })
        .min_by_key(|(low, ..)| *low)
        .map(|(_, key, data, high)| (key, data, high))
}

fn lookup_verse<'a, V>(
    tokenizer: &Tokenizer,
    book: &'a BookData<V>,
    chunk: &VerseChunk,
    verse: &RefValue,
) -> VerseEntry<'a, V> {
    let chapter_data = book.get(&chunk.chapter.to_string());
    let mut verse_key = verse.clone();
    let mut verse_data = chapter_data.and_then(|data| data.get(&verse.to_string()));

    if verse_data.is_none() {
        if let (Some(data), Some(number)) = (chapter_data, verse.as_number()) {
            if let Some((key, found, _)) = find_verse_in_span(tokenizer, data, number) {
                verse_key = RefValue::Text(key.to_string());
                verse_data = Some(found);
            }
        }
    }

    VerseEntry {
        chapter: chunk.chapter.clone(),
        verse: verse_key,
        verse_data,
    }
}

/// Walk every verse of a range chunk, skipping to the next chapter when a
/// verse is missing from the data. The walk never goes past the last
/// chapter `book` has.
fn walk_range<'a, V>(
    tokenizer: &Tokenizer,
    book: &'a BookData<V>,
    chunk: &VerseChunk,
    verses: &mut Vec<VerseEntry<'a, V>>,
) -> Result<(), ReferenceErrorKind> {
    let non_numeric = || {
        let mut raw = String::new();
        let _ = crate::serializer::write_chunks(&mut raw, std::slice::from_ref(chunk));
        ReferenceErrorKind::NonNumericRange(raw)
    };
    let number = |value: &RefValue| value.as_number().ok_or_else(non_numeric);

    let mut chapter = number(&chunk.chapter)?;
    let mut verse = match &chunk.verse {
        Some(verse) => number(verse)?,
        None => 1,
    };
    let end_chapter = match &chunk.end_chapter {
        Some(end_chapter) => number(end_chapter)?,
        None => chapter,
    };
    let end_verse = match &chunk.end_verse {
        Some(VerseEnd::Verse(end_verse)) => Some(number(end_verse)?),
        Some(VerseEnd::Following) | None => None,
    };
    let (end_chapter, end_verse) = match last_chapter(tokenizer, book) {
        None => return Ok(()),
        Some(last) if last < end_chapter => (last, None),
        Some(_) => (end_chapter, end_verse),
    };

    while is_verse_in_range(chapter, verse, end_chapter, end_verse) {
        let chapter_data = book.get(&chapter.to_string());
        let mut verse_key = RefValue::Number(verse);
        let mut verse_data = chapter_data.and_then(|data| data.get(&verse.to_string()));

        if verse_data.is_none() {
            if let Some((key, found, high)) =
                chapter_data.and_then(|data| find_verse_in_span(tokenizer, data, verse))
            {
                verse_key = RefValue::Text(key.to_string());
                verse_data = Some(found);
                verse = high;
            }
        }

        let Some(found) = verse_data else {
            // past the end of this chapter
            let Some(next) = chapter.checked_add(1) else {
                break;
            };
            chapter = next;
            verse = 1;
            continue;
        };

        verses.push(VerseEntry {
            chapter: RefValue::Number(chapter),
            verse: verse_key,
            verse_data: Some(found),
        });

        let Some(next) = verse.checked_add(1) else {
            break;
        };
        verse = next;
    }

    Ok(())
}

impl ReferenceParser {
    /// All verses of `reference` in `book`, in reference order.
    ///
    /// A single verse is always reported, with `verse_data == None` when the
    /// book has nothing for it. Ranges, whole chapters and `ff` tails only
    /// report verses that exist.
    pub fn verses<'a, V>(
        &self,
        book: &'a BookData<V>,
        reference: &str,
    ) -> Result<Vec<VerseEntry<'a, V>>, ReferenceError> {
        let parsed = self.parse(reference)?;
        let mut verses = Vec::new();

        for chunk in &parsed {
            match &chunk.verse {
                Some(verse) if chunk.end_verse.is_none() && chunk.end_chapter.is_none() => {
                    verses.push(lookup_verse(self.tokenizer(), book, chunk, verse));
                }
                _ => walk_range(self.tokenizer(), book, chunk, &mut verses).map_err(|kind| {
                    let err = ReferenceError::new(reference, kind);
                    self.report(&err);
                    err
                })?,
            }
        }

        Ok(verses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verse_span_helpers() {
        assert!(is_verse_span("3-4"));
        assert!(!is_verse_span("3"));
        assert!(is_verse_list("1,3"));
        assert!(is_verse_set("1,3"));
        assert!(is_verse_set("1-3"));
        assert!(!is_verse_set("13"));
        assert_eq!(verse_list("1,3,5"), vec!["1", "3", "5"]);
    }

    #[test]
    fn test_verse_span_range() {
        let tokenizer = Tokenizer::default();
        assert_eq!(verse_span_range(&tokenizer, "3-4"), Some((3, 4)));
        assert_eq!(verse_span_range(&tokenizer, "3a-4b"), Some((3, 4)));
        assert_eq!(verse_span_range(&tokenizer, " 3 - 4 "), Some((3, 4)));
        assert_eq!(verse_span_range(&tokenizer, "4-3"), None);
        assert_eq!(verse_span_range(&tokenizer, "0-3"), None);
        assert_eq!(verse_span_range(&tokenizer, "3-"), None);
        assert_eq!(verse_span_range(&tokenizer, "3"), None);
    }

    #[test]
    fn test_is_verse_in_range() {
        assert!(is_verse_in_range(1, 50, 2, Some(1)));
        assert!(is_verse_in_range(2, 1, 2, Some(1)));
        assert!(!is_verse_in_range(2, 2, 2, Some(1)));
        assert!(!is_verse_in_range(3, 1, 2, Some(9)));
        assert!(is_verse_in_range(2, 900, 2, None));
    }

    #[test]
    fn test_span_lookup_prefers_lowest_span() {
        let mut chapter = ChapterData::new();
        chapter.insert("5-9".to_string(), "b");
        chapter.insert("1-5".to_string(), "a");

        let tokenizer = Tokenizer::default();
        assert_eq!(find_verse_in_span(&tokenizer, &chapter, 5), Some(("1-5", &"a", 5)));
        assert_eq!(find_verse_in_span(&tokenizer, &chapter, 7), Some(("5-9", &"b", 9)));
        assert_eq!(find_verse_in_span(&tokenizer, &chapter, 10), None);
    }

    #[test]
    fn test_walk_stops_after_last_chapter() {
        let mut chapter = ChapterData::new();
        chapter.insert("1".to_string(), "1:1");
        let mut book = BookData::new();
        book.insert("1".to_string(), chapter);

        let parser = ReferenceParser::default();
        let found = parser.verses(&book, "1-4000000000").unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].verse_data, Some(&"1:1"));

        assert!(parser.verses(&book, "2:1-4000000000:5").unwrap().is_empty());
        assert_eq!(parser.verses(&book, "1:1-9:1").unwrap().len(), 1);
        assert!(parser.verses(&BookData::<&str>::new(), "1-4000000000").unwrap().is_empty());
    }

    #[test]
    fn test_label_range_cannot_be_walked() {
        let book: BookData<String> = BookData::new();
        let err = ReferenceParser::default()
            .verses(&book, "1:front-3")
            .unwrap_err();
        assert_eq!(err.kind, ReferenceErrorKind::NonNumericRange("1:front-3".to_string()));
    }
}
