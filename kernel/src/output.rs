//! Rendering command output.

use anyhow::{Context, Result};
use clap::ValueEnum;
use mosaic_diff::{
    DiffEngine, DiffSegment, DiffStats, InlineStyle, UnifiedFormat, render_inline,
};

/// How a diff is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Segments as a JSON array
    Json,
    /// Text with [-deleted-] and {+inserted+} markers
    #[default]
    Inline,
    /// Text with terminal colors
    Ansi,
    /// Line-level unified diff
    Unified,
    /// Change summary as JSON
    Stats,
}

/// Everything needed to print one diff.
#[derive(Debug, Clone, Copy)]
pub struct Report<'a> {
    /// Original text.
    pub original: &'a str,
    /// Rewritten text.
    pub rewrite: &'a str,
    /// Engine that produced `segments`; its algorithm also aligns unified
    /// output.
    pub engine: &'a DiffEngine,
    /// Inline segments.
    pub segments: &'a [DiffSegment],
    /// `---` label of unified output.
    pub old_label: &'a str,
    /// `+++` label of unified output.
    pub new_label: &'a str,
    /// Context lines of unified output.
    pub context: usize,
}

impl Report<'_> {
    /// Renders the report.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render(&self, format: OutputFormat) -> Result<String> {
        let text = match format {
            OutputFormat::Json => serde_json::to_string_pretty(self.segments)
                .context("Failed to serialize segments")?,
            OutputFormat::Inline => render_inline(self.segments, InlineStyle::Markers),
            OutputFormat::Ansi => render_inline(self.segments, InlineStyle::Ansi),
            OutputFormat::Unified => UnifiedFormat {
                old_label: self.old_label,
                new_label: self.new_label,
                context: self.context,
            }
            .render(&self.engine.options().algorithm, self.original, self.rewrite),
            OutputFormat::Stats => {
                serde_json::to_string_pretty(&DiffStats::from_segments(self.segments))
                    .context("Failed to serialize stats")?
            }
        };
        Ok(text)
    }
}
