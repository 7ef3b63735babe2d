//! Text renderings of a diff.
//!
//! Inline renderings work on segment sequences. The unified format is line
//! based and runs its own line alignment, like `diff -u`.

use std::ops::Range;

use owo_colors::OwoColorize;

use crate::ops::DiffAlgorithm;
use crate::segment::{DiffSegment, SegmentKind};
use crate::tokenize::Tokens;

/// How [`render_inline`] marks changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InlineStyle {
    /// `[-deleted-]` and `{+inserted+}` markers, as `wdiff` prints them.
    #[default]
    Markers,
    /// Red strikethrough deletions and green underlined insertions.
    Ansi,
    /// The rewritten text only.
    Plain,
}

/// Renders segments as a single annotated text.
#[must_use]
pub fn render_inline(segments: &[DiffSegment], style: InlineStyle) -> String {
    let mut output = String::new();

    for segment in segments {
        let text = segment.text.as_str();
        match (style, segment.kind) {
            (_, SegmentKind::Equal) | (InlineStyle::Plain, SegmentKind::Insert) => {
                output.push_str(text);
            }
            (InlineStyle::Plain, SegmentKind::Delete) => {}
            (InlineStyle::Markers, SegmentKind::Delete) => {
                output.push_str(&format!("[-{text}-]"));
            }
            (InlineStyle::Markers, SegmentKind::Insert) => {
                output.push_str(&format!("{{+{text}+}}"));
            }
            (InlineStyle::Ansi, SegmentKind::Delete) => {
                output.push_str(&text.red().strikethrough().to_string());
            }
            (InlineStyle::Ansi, SegmentKind::Insert) => {
                output.push_str(&text.green().underline().to_string());
            }
        }
    }

    output
}

/// Unified diff settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnifiedFormat<'a> {
    /// Label of the `---` header.
    pub old_label: &'a str,
    /// Label of the `+++` header.
    pub new_label: &'a str,
    /// Unchanged lines shown around each change.
    pub context: usize,
}

impl Default for UnifiedFormat<'_> {
    fn default() -> Self {
        Self {
            old_label: "original",
            new_label: "rewrite",
            context: 3,
        }
    }
}

impl UnifiedFormat<'_> {
    /// Formats a line-level unified diff.
    ///
    /// Returns an empty string when both texts are equal.
    #[must_use]
    pub fn render<A: DiffAlgorithm + ?Sized>(
        &self,
        algorithm: &A,
        original: &str,
        rewrite: &str,
    ) -> String {
        if original == rewrite {
            return String::new();
        }

        let (old, new) = (Tokens::lines(original), Tokens::lines(rewrite));
        let mut lines: Vec<(SegmentKind, &str)> = Vec::new();
        for op in algorithm.diff(old.pieces(), new.pieces()) {
            let old_kind = if op.is_change() {
                SegmentKind::Delete
            } else {
                SegmentKind::Equal
            };
            if let Some(range) = op.old_range() {
                lines.extend(old.pieces()[range].iter().map(|line| (old_kind, *line)));
            }
            if let (true, Some(range)) = (op.is_change(), op.new_range()) {
                lines.extend(
                    new.pieces()[range]
                        .iter()
                        .map(|line| (SegmentKind::Insert, *line)),
                );
            }
        }

        let mut output = String::new();
        output.push_str(&format!("--- {}\n", self.old_label));
        output.push_str(&format!("+++ {}\n", self.new_label));

        let (mut old_seen, mut new_seen, mut cursor) = (0, 0, 0);
        for hunk in hunks(&lines, self.context) {
            for (kind, _) in &lines[cursor..hunk.start] {
                old_seen += usize::from(kind.in_original());
                new_seen += usize::from(kind.in_rewrite());
            }
            cursor = hunk.end;

            let body = &lines[hunk];
            let old_count = body.iter().filter(|(k, _)| k.in_original()).count();
            let new_count = body.iter().filter(|(k, _)| k.in_rewrite()).count();
            output.push_str(&format!(
                "@@ -{} +{} @@\n",
                hunk_range(old_seen, old_count),
                hunk_range(new_seen, new_count)
            ));

            for (kind, line) in body {
                let marker = match kind {
                    SegmentKind::Equal => ' ',
                    SegmentKind::Delete => '-',
                    SegmentKind::Insert => '+',
                };
                output.push(marker);
                match line.strip_suffix('\n') {
                    Some(text) => {
                        output.push_str(text);
                        output.push('\n');
                    }
                    None => {
                        output.push_str(line);
                        output.push_str("\n\\ No newline at end of file\n");
                    }
                }
            }

            old_seen += old_count;
            new_seen += new_count;
        }

        output
    }
}

/// Groups changed lines with their context; overlapping hunks are merged.
fn hunks(lines: &[(SegmentKind, &str)], context: usize) -> Vec<Range<usize>> {
    let mut hunks: Vec<Range<usize>> = Vec::new();

    for (at, (kind, _)) in lines.iter().enumerate() {
        if *kind == SegmentKind::Equal {
            continue;
        }
        let start = at.saturating_sub(context);
        let end = (at + 1 + context).min(lines.len());
        match hunks.last_mut() {
            Some(last) if start <= last.end => last.end = last.end.max(end),
            _ => hunks.push(start..end),
        }
    }

    hunks
}

fn hunk_range(before: usize, count: usize) -> String {
    match count {
        0 => format!("{before},0"),
        1 => format!("{}", before + 1),
        _ => format!("{},{count}", before + 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::compute_diff;
    use crate::myers::MyersDiff;

    #[test]
    fn test_inline_markers() {
        let segments = compute_diff("hello world", "hello beautiful world");
        assert_eq!(
            render_inline(&segments, InlineStyle::Markers),
            "hello {+beautiful +}world"
        );
        assert_eq!(
            render_inline(&segments, InlineStyle::Plain),
            "hello beautiful world"
        );
    }

    #[test]
    fn test_inline_ansi_wraps_changes_only() {
        let segments = vec![DiffSegment::equal("keep "), DiffSegment::delete("gone")];
        let rendered = render_inline(&segments, InlineStyle::Ansi);
        assert!(rendered.starts_with("keep "));
        assert!(rendered.contains("gone"));
        assert!(rendered.contains('\u{1b}'));
    }

    #[test]
    fn test_unified_single_hunk() {
        let original = "a\nb\nc\nd\ne\nf\ng\nh\n";
        let rewrite = "a\nb\nc\nd\nE\nf\ng\nh\n";
        let diff = UnifiedFormat::default().render(&MyersDiff::new(), original, rewrite);
        assert_eq!(
            diff,
            "--- original\n+++ rewrite\n@@ -2,7 +2,7 @@\n b\n c\n d\n-e\n+E\n f\n g\n h\n"
        );
    }

    #[test]
    fn test_unified_separate_hunks_and_missing_newline() {
        let original = "1\n2\n3\n4\n5\n6\n7\n8\n9\nten";
        let rewrite = "one\n2\n3\n4\n5\n6\n7\n8\n9\n10";
        let format = UnifiedFormat {
            old_label: "a/story.txt",
            new_label: "b/story.txt",
            context: 1,
        };
        let diff = format.render(&MyersDiff::new(), original, rewrite);
        assert_eq!(
            diff,
            "--- a/story.txt\n+++ b/story.txt\n\
             @@ -1,2 +1,2 @@\n-1\n+one\n 2\n\
             @@ -9,2 +9,2 @@\n 9\n-ten\n\\ No newline at end of file\n+10\n\\ No newline at end of file\n"
        );
    }

    #[test]
    fn test_unified_insert_into_empty() {
        let diff = UnifiedFormat::default().render(&MyersDiff::new(), "", "new\n");
        assert_eq!(diff, "--- original\n+++ rewrite\n@@ -0,0 +1 @@\n+new\n");
    }

    #[test]
    fn test_unified_equal_inputs_render_nothing() {
        assert!(
            UnifiedFormat::default()
                .render(&MyersDiff::new(), "same\n", "same\n")
                .is_empty()
        );
    }
}
