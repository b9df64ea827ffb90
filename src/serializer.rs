//! Canonical string form of parsed chunks.
//!
//! Chunks on the chapter of the previous chunk are joined with `,`; anything
//! else opens a new `;` segment that restates its chapter. Chapter-spanning
//! chunks always stand in their own segment.

use crate::models::{ParsedReference, RefValue, VerseChunk, VerseEnd};
use std::fmt::{self, Write};

pub fn chunks_to_string(chunks: &[VerseChunk]) -> String {
    let mut result = String::new();
    // Writing into a String cannot fail.
    let _ = write_chunks(&mut result, chunks);
    result
}

pub fn write_chunks<W: Write>(out: &mut W, chunks: &[VerseChunk]) -> fmt::Result {
    let mut last_chapter: Option<&RefValue> = None;
    let mut last_chunk: Option<&VerseChunk> = None;

    for chunk in chunks {
        let first = last_chunk.is_none();

        if let Some(end_chapter) = &chunk.end_chapter {
            if !first {
                out.write_char(';')?;
            }
            match (&chunk.verse, &chunk.end_verse) {
                (Some(verse), Some(end_verse)) => {
                    write!(out, "{}:{}-{}:{}", chunk.chapter, verse, end_chapter, end_verse)?
                }
                (Some(verse), None) => write!(out, "{}:{}-{}", chunk.chapter, verse, end_chapter)?,
                (None, _) => write!(out, "{}-{}", chunk.chapter, end_chapter)?,
            }
            last_chapter = Some(end_chapter);
        } else {
            let continues_segment = last_chapter == Some(&chunk.chapter)
                && last_chunk.is_some_and(|prev| !prev.spans_chapters() && !prev.is_whole_chapter())
                && chunk.verse.is_some();

            if continues_segment {
                out.write_char(',')?;
            } else {
                if !first {
                    out.write_char(';')?;
                }
                write!(out, "{}", chunk.chapter)?;
                if chunk.verse.is_some() {
                    out.write_char(':')?;
                }
                last_chapter = Some(&chunk.chapter);
            }

            if let Some(verse) = &chunk.verse {
                write!(out, "{}", verse)?;
            }

            match &chunk.end_verse {
                Some(VerseEnd::Following) => write!(out, "{}", VerseEnd::Following)?,
                Some(end_verse @ VerseEnd::Verse(_)) => write!(out, "-{}", end_verse)?,
                None => {}
            }
        }

        last_chunk = Some(chunk);
    }

    Ok(())
}

impl fmt::Display for ParsedReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_chunks(f, self.chunks())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_chapter_chunks_join_with_commas() {
        let chunks = vec![
            VerseChunk::verse_range(1, 1, 2),
            VerseChunk::verse(1, 4),
            VerseChunk::verse_range(1, 5, 7),
        ];
        assert_eq!(chunks_to_string(&chunks), "1:1-2,4,5-7");
    }

    #[test]
    fn test_new_chapter_opens_segment() {
        let chunks = vec![VerseChunk::verse_range(1, 1, 2), VerseChunk::verse(2, 4)];
        assert_eq!(chunks_to_string(&chunks), "1:1-2;2:4");
    }

    #[test]
    fn test_cross_chapter_chunks() {
        let chunks = vec![VerseChunk::cross_chapter(1, 12, 2, 4), VerseChunk::verse(2, 6)];
        assert_eq!(chunks_to_string(&chunks), "1:12-2:4;2:6");

        let chunks = vec![VerseChunk::verse_range(1, 1, 2), VerseChunk::chapter_range(3, 4)];
        assert_eq!(chunks_to_string(&chunks), "1:1-2;3-4");
    }

    #[test]
    fn test_open_ended_suffix() {
        let chunks = vec![VerseChunk::verse_range(1, 1, 23), VerseChunk::following(2, 7)];
        assert_eq!(chunks_to_string(&chunks), "1:1-23;2:7ff");
    }

    #[test]
    fn test_whole_chapter_does_not_absorb_verses() {
        let chunks = vec![VerseChunk::whole_chapter(3), VerseChunk::verse(3, 4)];
        assert_eq!(chunks_to_string(&chunks), "3;3:4");
    }

    #[test]
    fn test_empty_chunks() {
        assert_eq!(chunks_to_string(&[]), "");
        assert_eq!(ParsedReference::default().to_string(), "");
    }
}
