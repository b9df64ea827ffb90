use crate::error::ReferenceError;
use crate::models::{CleanedReference, RefValue, VerseChunk};
use crate::parser::ReferenceParser;
use crate::serializer::chunks_to_string;

/// Derive the display summary of `chunks`, given their canonical string.
///
/// When the chunks cover more than one verse, `verse` and `verse_str` both
/// carry everything after the first `:` of `canonical`.
pub fn characterize(chunks: &[VerseChunk], canonical: &str) -> CleanedReference {
    let mut summary = CleanedReference {
        cleaned_ref: canonical.to_string(),
        ..CleanedReference::default()
    };

    let Some(first) = chunks.first() else {
        return summary;
    };
    if canonical.is_empty() {
        return summary;
    }

    summary.chapter = Some(first.chapter.clone());
    summary.verse = first.verse.clone();

    let multiverse = chunks.len() > 1 || first.is_range();
    if multiverse {
        let verse_str = canonical.split_once(':').map(|(_, verses)| verses.to_string());
        summary.verse = verse_str.clone().map(RefValue::Text);
        summary.verse_str = verse_str;
    }

    summary
}

impl ReferenceParser {
    pub fn cleanup(&self, reference: &str) -> Result<CleanedReference, ReferenceError> {
        let parsed = self.parse(reference)?;
        let canonical = chunks_to_string(parsed.chunks());
        Ok(characterize(parsed.chunks(), &canonical))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cleanup(reference: &str) -> CleanedReference {
        ReferenceParser::default().cleanup(reference).unwrap()
    }

    #[test]
    fn test_single_verse_summary() {
        let summary = cleanup("1:1");
        assert_eq!(summary.chapter, Some(RefValue::Number(1)));
        assert_eq!(summary.verse, Some(RefValue::Number(1)));
        assert_eq!(summary.verse_str, None);
        assert_eq!(summary.cleaned_ref, "1:1");
    }

    #[test]
    fn test_labels_pass_through() {
        let summary = cleanup("front:intro");
        assert_eq!(summary.chapter, Some(RefValue::from("front")));
        assert_eq!(summary.verse, Some(RefValue::from("intro")));
        assert_eq!(summary.cleaned_ref, "front:intro");
    }

    #[test]
    fn test_multiverse_summary_uses_verse_portion() {
        let summary = cleanup("1:1b-2a,4");
        assert_eq!(summary.chapter, Some(RefValue::Number(1)));
        assert_eq!(summary.verse, Some(RefValue::from("1-2,4")));
        assert_eq!(summary.verse_str.as_deref(), Some("1-2,4"));
        assert_eq!(summary.cleaned_ref, "1:1-2,4");

        let summary = cleanup("1:12-2:4,6");
        assert_eq!(summary.verse_str.as_deref(), Some("12-2:4;2:6"));
    }

    #[test]
    fn test_chapter_only_summary() {
        let summary = cleanup("1-3");
        assert_eq!(summary.chapter, Some(RefValue::Number(1)));
        assert_eq!(summary.verse, None);
        assert_eq!(summary.cleaned_ref, "1-3");
    }

    #[test]
    fn test_empty_reference_summary() {
        assert_eq!(cleanup(""), CleanedReference::default());
    }

    #[test]
    fn test_unparseable_reference() {
        assert!(ReferenceParser::default().cleanup("1:2-").is_err());
    }
}
