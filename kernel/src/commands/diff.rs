use anyhow::Result;
use mosaic_diff::DiffEngine;
use tracing::{debug, instrument};

use crate::cli::DiffArgs;
use crate::commands::read_text;
use crate::infrastructure::config::Settings;
use crate::output::Report;

/// Diffs the two files named in `args` and renders the result.
///
/// # Errors
///
/// Returns an error if either file cannot be read or rendering fails.
#[instrument(skip_all, fields(original = %args.original.display(), rewrite = %args.rewrite.display()))]
pub fn run(args: &DiffArgs, settings: &Settings) -> Result<String> {
    let original = read_text(&args.original)?;
    let rewrite = read_text(&args.rewrite)?;

    let engine = DiffEngine::new(args.diff.apply(settings.diff.options()));
    let segments = engine.compute(&original, &rewrite);
    debug!(segments = segments.len(), "diff computed");

    let (old_label, new_label) = (
        args.original.display().to_string(),
        args.rewrite.display().to_string(),
    );
    Report {
        original: &original,
        rewrite: &rewrite,
        engine: &engine,
        segments: &segments,
        old_label: &old_label,
        new_label: &new_label,
        context: args.diff.context,
    }
    .render(args.diff.format)
}
