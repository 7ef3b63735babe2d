//! Diff output segments.

use serde::{Deserialize, Serialize};

/// The role of a segment in the aligned output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentKind {
    /// Text present in both the original and the rewrite.
    Equal,
    /// Text only present in the rewrite.
    Insert,
    /// Text only present in the original.
    Delete,
}

impl SegmentKind {
    /// Returns true if segments of this kind are part of the original text.
    #[must_use]
    pub const fn in_original(self) -> bool {
        matches!(self, Self::Equal | Self::Delete)
    }

    /// Returns true if segments of this kind are part of the rewritten text.
    #[must_use]
    pub const fn in_rewrite(self) -> bool {
        matches!(self, Self::Equal | Self::Insert)
    }
}

/// A contiguous run of text tagged with its role.
///
/// Serializes as `{"type": "equal" | "insert" | "delete", "text": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffSegment {
    /// Segment role.
    #[serde(rename = "type")]
    pub kind: SegmentKind,
    /// The literal text, exactly as it appears in its source.
    pub text: String,
}

impl DiffSegment {
    /// Creates a segment.
    #[must_use]
    pub fn new(kind: SegmentKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    /// Creates an `equal` segment.
    #[must_use]
    pub fn equal(text: impl Into<String>) -> Self {
        Self::new(SegmentKind::Equal, text)
    }

    /// Creates an `insert` segment.
    #[must_use]
    pub fn insert(text: impl Into<String>) -> Self {
        Self::new(SegmentKind::Insert, text)
    }

    /// Creates a `delete` segment.
    #[must_use]
    pub fn delete(text: impl Into<String>) -> Self {
        Self::new(SegmentKind::Delete, text)
    }

    /// Returns true for `insert` and `delete` segments.
    #[must_use]
    pub const fn is_change(&self) -> bool {
        !matches!(self.kind, SegmentKind::Equal)
    }
}

/// Rebuilds the original text from `equal` and `delete` segments.
#[must_use]
pub fn original_text(segments: &[DiffSegment]) -> String {
    segments
        .iter()
        .filter(|s| s.kind.in_original())
        .map(|s| s.text.as_str())
        .collect()
}

/// Rebuilds the rewritten text from `equal` and `insert` segments.
#[must_use]
pub fn rewrite_text(segments: &[DiffSegment]) -> String {
    segments
        .iter()
        .filter(|s| s.kind.in_rewrite())
        .map(|s| s.text.as_str())
        .collect()
}

/// Accumulates segments in order.
///
/// Empty text is dropped and text of the same kind as the previous segment
/// is appended to it, so the output never has empty or same-kind neighbours.
#[derive(Debug, Default)]
pub(crate) struct SegmentBuilder {
    segments: Vec<DiffSegment>,
}

impl SegmentBuilder {
    pub(crate) fn push(&mut self, kind: SegmentKind, text: &str) {
        if text.is_empty() {
            return;
        }
        match self.segments.last_mut() {
            Some(last) if last.kind == kind => last.text.push_str(text),
            _ => self.segments.push(DiffSegment::new(kind, text)),
        }
    }

    pub(crate) fn finish(self) -> Vec<DiffSegment> {
        self.segments
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_serializes_with_type_tag() -> Result<(), serde_json::Error> {
        let json = serde_json::to_string(&DiffSegment::insert("beautiful "))?;
        assert_eq!(json, r#"{"type":"insert","text":"beautiful "}"#);

        let parsed: DiffSegment = serde_json::from_str(r#"{"type":"delete","text":"x"}"#)?;
        assert_eq!(parsed, DiffSegment::delete("x"));
        Ok(())
    }

    #[test]
    fn test_builder_merges_and_skips_empty() {
        let mut builder = SegmentBuilder::default();
        builder.push(SegmentKind::Equal, "a");
        builder.push(SegmentKind::Equal, "b");
        builder.push(SegmentKind::Delete, "");
        builder.push(SegmentKind::Insert, "c");
        builder.push(SegmentKind::Insert, "d");
        assert_eq!(
            builder.finish(),
            vec![DiffSegment::equal("ab"), DiffSegment::insert("cd")]
        );
    }

    #[test]
    fn test_reconstruction() {
        let segments = vec![
            DiffSegment::equal("hello "),
            DiffSegment::delete("old"),
            DiffSegment::insert("new"),
            DiffSegment::equal(" world"),
        ];
        assert_eq!(original_text(&segments), "hello old world");
        assert_eq!(rewrite_text(&segments), "hello new world");
        assert!(segments[1].is_change());
        assert!(!segments[0].is_change());
    }
}
