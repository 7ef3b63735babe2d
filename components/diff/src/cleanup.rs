//! Post-processing of segment sequences.

use crate::segment::{DiffSegment, SegmentBuilder, SegmentKind};

/// Folds whitespace-only `equal` islands into the changes around them.
///
/// An `equal` segment made only of spaces or tabs (no newline) that sits
/// between two changes is appended to both sides of the changed run, so
/// `[-the-]{+a+} [-quick-]{+slow+}` becomes `[-the quick-]{+a slow+}`.
/// Each run is emitted as its deletion followed by its insertion.
pub(crate) fn absorb_whitespace(segments: Vec<DiffSegment>) -> Vec<DiffSegment> {
    let mut out = SegmentBuilder::default();
    let mut run: Option<(String, String)> = None;
    let mut iter = segments.into_iter().peekable();

    while let Some(segment) = iter.next() {
        match segment.kind {
            SegmentKind::Delete => run.get_or_insert_default().0.push_str(&segment.text),
            SegmentKind::Insert => run.get_or_insert_default().1.push_str(&segment.text),
            SegmentKind::Equal => {
                let next_is_change = iter.peek().is_some_and(DiffSegment::is_change);
                match run.as_mut() {
                    Some((deleted, inserted)) if next_is_change && is_island(&segment.text) => {
                        deleted.push_str(&segment.text);
                        inserted.push_str(&segment.text);
                    }
                    _ => {
                        flush(&mut out, run.take());
                        out.push(SegmentKind::Equal, &segment.text);
                    }
                }
            }
        }
    }
    flush(&mut out, run);

    out.finish()
}

fn flush(out: &mut SegmentBuilder, run: Option<(String, String)>) {
    if let Some((deleted, inserted)) = run {
        out.push(SegmentKind::Delete, &deleted);
        out.push(SegmentKind::Insert, &inserted);
    }
}

fn is_island(text: &str) -> bool {
    text.chars().all(|c| c.is_whitespace() && c != '\n' && c != '\r')
}
