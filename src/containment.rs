//! Decides whether one reference lies inside another.
//!
//! Every chunk pair is classified as single chapter or chapter span on each
//! side, and each of the four combinations has its own boundary rule. In
//! loose mode any overlap counts; in strict mode every verse of the search
//! chunk has to fall inside one target chunk.

use crate::error::ReferenceError;
use crate::models::{RefValue, VerseChunk, VerseEnd};
use crate::parser::ReferenceParser;

static FIRST_VERSE: RefValue = RefValue::Number(1);

/// Upper edge of a verse span. `Open` is the unbounded "ff" tail.
#[derive(Debug, Clone, Copy)]
enum Bound<'a> {
    At(&'a RefValue),
    Open,
}

impl Bound<'_> {
    fn reaches(self, verse: &RefValue) -> bool {
        match self {
            Bound::At(end) => verse <= end,
            Bound::Open => true,
        }
    }

    fn precedes(self, verse: &RefValue) -> bool {
        match self {
            Bound::At(end) => end < verse,
            Bound::Open => false,
        }
    }

    fn within(self, other: Bound<'_>) -> bool {
        match (self, other) {
            (_, Bound::Open) => true,
            (Bound::Open, Bound::At(_)) => false,
            (Bound::At(end), Bound::At(limit)) => end <= limit,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct VerseSpan<'a> {
    start: &'a RefValue,
    end: Bound<'a>,
}

/// Where a chunk sits. `verses == None` means whole chapters.
#[derive(Debug, Clone, Copy)]
enum Extent<'a> {
    Chapter {
        chapter: &'a RefValue,
        verses: Option<VerseSpan<'a>>,
    },
    Chapters {
        start: &'a RefValue,
        end: &'a RefValue,
        verses: Option<VerseSpan<'a>>,
    },
}

impl<'a> Extent<'a> {
    fn of(chunk: &'a VerseChunk) -> Self {
        let verses = chunk.verse.as_ref().map(|start| {
            let end = match &chunk.end_verse {
                Some(VerseEnd::Verse(end)) => Bound::At(end),
                Some(VerseEnd::Following) => Bound::Open,
                None if chunk.end_chapter.is_some() => Bound::Open,
                None => Bound::At(start),
            };
            VerseSpan { start, end }
        });

        match chunk.end_chapter.as_ref() {
            Some(end) if *end != chunk.chapter => Extent::Chapters {
                start: &chunk.chapter,
                end,
                verses,
            },
            _ => Extent::Chapter {
                chapter: &chunk.chapter,
                verses,
            },
        }
    }
}

/// A search chunk naming no verse covers its chapters from verse 1 onward.
fn search_span(verses: Option<VerseSpan<'_>>) -> VerseSpan<'_> {
    verses.unwrap_or(VerseSpan {
        start: &FIRST_VERSE,
        end: Bound::Open,
    })
}

fn is_single_verse(chunk: &VerseChunk) -> bool {
    chunk.verse.is_some() && chunk.end_verse.is_none() && chunk.end_chapter.is_none()
}

fn contains_verse(target: Extent<'_>, chapter: &RefValue, verse: &RefValue) -> bool {
    match target {
        Extent::Chapter {
            chapter: target_chapter,
            verses,
        } => {
            chapter == target_chapter
                && verses.map_or(true, |span| span.start <= verse && span.end.reaches(verse))
        }
        Extent::Chapters {
            start,
            end,
            verses,
        } => {
            if !(start <= chapter && chapter <= end) {
                return false;
            }
            let Some(span) = verses else {
                return true;
            };
            (chapter != start || verse >= span.start) && (chapter != end || span.end.reaches(verse))
        }
    }
}

fn verse_range_in_chapter(
    target_chapter: &RefValue,
    target_verses: Option<VerseSpan<'_>>,
    chapter: &RefValue,
    search: VerseSpan<'_>,
    strict: bool,
) -> bool {
    if chapter != target_chapter {
        return false;
    }
    let Some(target) = target_verses else {
        return true;
    };

    if strict {
        target.start <= search.start && search.end.within(target.end)
    } else {
        !(search.end.precedes(target.start) || target.end.precedes(search.start))
    }
}

/// Chapter span inside a single-chapter target. A span over several
/// chapters is never fully inside one, so strict mode always fails.
fn chapter_range_in_chapter(
    target_chapter: &RefValue,
    target_verses: Option<VerseSpan<'_>>,
    start_chapter: &RefValue,
    end_chapter: &RefValue,
    search: VerseSpan<'_>,
    strict: bool,
) -> bool {
    if strict {
        return false;
    }
    if end_chapter < target_chapter || start_chapter > target_chapter {
        return false;
    }
    let Some(target) = target_verses else {
        return true;
    };

    if end_chapter == target_chapter && search.end.precedes(target.start) {
        return false;
    }
    if start_chapter == target_chapter && target.end.precedes(search.start) {
        return false;
    }
    true
}

/// Chapter span inside a chapter-span target. Verse bounds only matter on
/// chapters where the two spans share an edge.
fn chapter_range_in_chapter_range(
    target_start: &RefValue,
    target_end: &RefValue,
    target_verses: Option<VerseSpan<'_>>,
    start_chapter: &RefValue,
    end_chapter: &RefValue,
    search: VerseSpan<'_>,
    strict: bool,
) -> bool {
    if strict {
        if !(target_start <= start_chapter && end_chapter <= target_end) {
            return false;
        }
        let Some(target) = target_verses else {
            return true;
        };
        (start_chapter != target_start || search.start >= target.start)
            && (end_chapter != target_end || search.end.within(target.end))
    } else {
        if end_chapter < target_start || start_chapter > target_end {
            return false;
        }
        let Some(target) = target_verses else {
            return true;
        };
        if end_chapter == target_start && search.end.precedes(target.start) {
            return false;
        }
        if start_chapter == target_end && target.end.precedes(search.start) {
            return false;
        }
        true
    }
}

fn verse_range_in_chapter_range(
    target_start: &RefValue,
    target_end: &RefValue,
    target_verses: Option<VerseSpan<'_>>,
    chapter: &RefValue,
    search: VerseSpan<'_>,
    strict: bool,
) -> bool {
    if !(target_start <= chapter && chapter <= target_end) {
        return false;
    }
    let Some(target) = target_verses else {
        return true;
    };

    if strict {
        (chapter != target_start || search.start >= target.start)
            && (chapter != target_end || search.end.within(target.end))
    } else {
        !(chapter == target_end && target.end.precedes(search.start))
            && !(chapter == target_start && search.end.precedes(target.start))
    }
}

pub fn chunk_contains(target: &VerseChunk, search: &VerseChunk, strict: bool) -> bool {
    if target.is_reversed() || search.is_reversed() {
        return false;
    }
    let target = Extent::of(target);

    if is_single_verse(search) {
        if let Some(verse) = &search.verse {
            return contains_verse(target, &search.chapter, verse);
        }
    }

    match (target, Extent::of(search)) {
        (
            Extent::Chapter {
                chapter: target_chapter,
                verses: target_verses,
            },
            Extent::Chapter { chapter, verses },
        ) => verse_range_in_chapter(target_chapter, target_verses, chapter, search_span(verses), strict),
        (
            Extent::Chapter {
                chapter: target_chapter,
                verses: target_verses,
            },
            Extent::Chapters { start, end, verses },
        ) => chapter_range_in_chapter(
            target_chapter,
            target_verses,
            start,
            end,
            search_span(verses),
            strict,
        ),
        (
            Extent::Chapters {
                start: target_start,
                end: target_end,
                verses: target_verses,
            },
            Extent::Chapter { chapter, verses },
        ) => verse_range_in_chapter_range(
            target_start,
            target_end,
            target_verses,
            chapter,
            search_span(verses),
            strict,
        ),
        (
            Extent::Chapters {
                start: target_start,
                end: target_end,
                verses: target_verses,
            },
            Extent::Chapters { start, end, verses },
        ) => chapter_range_in_chapter_range(
            target_start,
            target_end,
            target_verses,
            start,
            end,
            search_span(verses),
            strict,
        ),
    }
}

/// Loose mode is satisfied by any search chunk found in some target chunk;
/// strict mode needs every search chunk to be found. An empty search is
/// never contained.
pub fn reference_contains(target: &[VerseChunk], search: &[VerseChunk], strict: bool) -> bool {
    if search.is_empty() {
        return false;
    }

    let mut found = search
        .iter()
        .map(|wanted| target.iter().any(|chunk| chunk_contains(chunk, wanted, strict)));

    if strict {
        found.all(|contained| contained)
    } else {
        found.any(|contained| contained)
    }
}

impl ReferenceParser {
    /// Whether `search_term` is contained in `reference`. Either operand
    /// failing to parse is an error.
    pub fn contains(
        &self,
        reference: &str,
        search_term: &str,
        strict: bool,
    ) -> Result<bool, ReferenceError> {
        let target = self.parse(reference)?;
        let search = self.parse(search_term)?;
        Ok(reference_contains(target.chunks(), search.chunks(), strict))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loose(reference: &str, search: &str) -> bool {
        ReferenceParser::default().contains(reference, search, false).unwrap()
    }

    fn strict(reference: &str, search: &str) -> bool {
        ReferenceParser::default().contains(reference, search, true).unwrap()
    }

    #[test]
    fn test_single_verse_in_single_chapter() {
        assert!(loose("1:1", "1:1"));
        assert!(!loose("1:1", "1:2"));
        assert!(loose("1:1-2", "1:2"));
        assert!(!loose("1:1-2", "1:3"));
        assert!(loose("3", "3:9999"));
        assert!(!loose("3", "2:1"));
        assert!(!loose("1:1-2", "1:intro"));
        assert!(loose("front:intro", "front:intro"));
        assert!(!loose("front:intro", "1:intro"));
    }

    #[test]
    fn test_single_verse_in_chapter_range() {
        assert!(loose("1:12-2:4", "2:1"));
        assert!(loose("1:12-2:4", "1:12"));
        assert!(!loose("1:12-2:4", "1:11"));
        assert!(!loose("1:12-2:4", "2:5"));
        assert!(loose("1:12-3:4", "2:999"));
        assert!(loose("1-3", "3:9999"));
        assert!(!loose("1-3", "4:1"));
    }

    #[test]
    fn test_open_ended_target() {
        assert!(loose("1:3ff", "1:3"));
        assert!(loose("1:3ff", "1:500"));
        assert!(!loose("1:3ff", "1:2"));
        assert!(!loose("1:3ff", "2:5"));
        assert!(strict("1:3ff", "1:4-9"));
        assert!(!strict("1:3ff", "1:2-9"));
        assert!(loose("1:3ff", "1:2-9"));
    }

    #[test]
    fn test_verse_range_in_single_chapter() {
        assert!(loose("1:1-2", "1:2-5"));
        assert!(!strict("1:1-2", "1:2-5"));
        assert!(strict("1:1-5", "1:2-4"));
        assert!(strict("1:1-5", "1:1-5"));
        assert!(!loose("1:1-5", "1:6-8"));
        assert!(!loose("1:4-5", "1:1-3"));
        assert!(!loose("1:1-5", "2:1-3"));
        assert!(loose("1:3", "1:1-5"));
        assert!(!strict("1:3", "1:1-5"));
        assert!(strict("1", "1:1-5"));
    }

    #[test]
    fn test_chapter_range_in_single_chapter() {
        assert!(loose("1:10-20", "1:15-2:3"));
        assert!(!strict("1:10-20", "1:15-2:3"));
        assert!(!loose("1:10-20", "1:21-2:3"));
        assert!(loose("2:1-5", "1:15-2:3"));
        assert!(!loose("2:4-5", "1:15-2:3"));
        assert!(loose("2:4ff", "1:15-2:4"));
        assert!(!loose("3:1-5", "1:15-2:3"));
        assert!(loose("2", "1:15-3:3"));
    }

    #[test]
    fn test_chapter_range_in_chapter_range() {
        assert!(strict("1:5-4:10", "2:1-3:8"));
        assert!(strict("1:5-4:10", "1:5-4:10"));
        assert!(!strict("1:5-4:10", "1:4-2:1"));
        assert!(!strict("1:5-4:10", "3:1-4:11"));
        assert!(!strict("1:5-4:10", "3:1-5:1"));
        assert!(loose("1:5-4:10", "3:1-5:1"));
        assert!(!loose("1:5-4:10", "4:11-5:1"));
        assert!(!loose("2:5-4:10", "1:1-2:4"));
        assert!(loose("2:5-4:10", "1:1-2:5"));
        assert!(strict("1-4", "2:3-3:9"));
    }

    #[test]
    fn test_verse_range_in_chapter_range() {
        assert!(strict("1:5-3:10", "2:1-40"));
        assert!(strict("1:5-3:10", "1:5-9"));
        assert!(!strict("1:5-3:10", "1:4-9"));
        assert!(!strict("1:5-3:10", "3:8-11"));
        assert!(loose("1:5-3:10", "3:8-11"));
        assert!(!loose("1:5-3:10", "3:11-12"));
        assert!(!loose("1:5-3:10", "1:1-4"));
        assert!(!loose("1:5-3:10", "4:1-2"));
        assert!(strict("1-3", "1:1-5"));
    }

    #[test]
    fn test_whole_chapter_search() {
        assert!(loose("1:1-5", "1"));
        assert!(!strict("1:1-5", "1"));
        assert!(strict("1:1ff", "1"));
        assert!(strict("1-3", "2"));
        assert!(strict("1-3", "1-2"));
        assert!(!strict("1-3", "2-4"));
        assert!(loose("1-3", "2-4"));
        assert!(!strict("1:5-3:10", "1-2"));
        assert!(strict("1:1-3:10", "1-2"));
    }

    #[test]
    fn test_multiple_search_chunks() {
        assert!(loose("1:1-5", "1:3,9"));
        assert!(!strict("1:1-5", "1:3,9"));
        assert!(strict("1:1-5;2:1", "1:3;2:1"));
        assert!(!loose("1:1-5", "1:7,9"));
    }

    #[test]
    fn test_empty_search_term() {
        assert!(!loose("1:1-5", ""));
        assert!(!strict("1:1-5", ""));
        assert!(!loose("", "1:1"));
    }

    #[test]
    fn test_reversed_ranges_cover_nothing() {
        assert!(!loose("1:5-3", "1:4"));
        assert!(!loose("1:5-3", "1:5"));
        assert!(!loose("1:1-10", "1:5-3"));
        assert!(!strict("1:1-10", "1:5-3"));
        assert!(!loose("4-2", "3:1"));
        assert!(!loose("1-10", "4-2"));
        assert!(!loose("3:1-2:4", "2:9"));
        assert!(loose("1:5-3;1:1-2", "1:2"));
    }

    #[test]
    fn test_unparseable_operands_are_errors() {
        let parser = ReferenceParser::default();
        assert!(parser.contains("1:1-5", "1:", false).is_err());
        assert!(parser.contains("5,1:3", "1:1", true).is_err());
    }
}
