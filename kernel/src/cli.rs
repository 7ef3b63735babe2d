//! Command-line interface definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use mosaic_diff::{Algorithm, DiffOptions, Granularity};

use crate::output::OutputFormat;

/// Review story rewrites as inline diffs.
#[derive(Debug, Parser)]
#[command(name = "mosaic", version)]
#[command(about = "Review story rewrites as inline diffs")]
pub struct Cli {
    /// Configuration file (defaults to ./mosaic.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Diff two files
    Diff(DiffArgs),
    /// Stream a rewrite of a file and diff it against the original
    Rewrite(RewriteArgs),
}

/// Arguments of `mosaic diff`.
#[derive(Debug, Args)]
pub struct DiffArgs {
    /// Original text
    pub original: PathBuf,

    /// Rewritten text
    pub rewrite: PathBuf,

    /// Diff and output options.
    #[command(flatten)]
    pub diff: DiffFlags,
}

/// Arguments of `mosaic rewrite`.
#[derive(Debug, Args)]
pub struct RewriteArgs {
    /// Text to rewrite
    pub original: PathBuf,

    /// Endpoint path, joined onto the configured base URL
    #[arg(long, default_value = "rewrite")]
    pub endpoint: String,

    /// Guidance for the rewrite
    #[arg(long)]
    pub instructions: Option<String>,

    /// Writing style, such as "vivid" or "concise"
    #[arg(long)]
    pub style: Option<String>,

    /// Do not echo chunks to stderr while streaming
    #[arg(long, short)]
    pub quiet: bool,

    /// Diff and output options.
    #[command(flatten)]
    pub diff: DiffFlags,
}

/// Options shared by every command that prints a diff.
#[derive(Debug, Clone, Args)]
pub struct DiffFlags {
    /// Output format
    #[arg(long, short, value_enum, default_value = "inline")]
    pub format: OutputFormat,

    /// Granularity inside changed lines (overrides configuration)
    #[arg(long, value_enum)]
    pub granularity: Option<GranularityArg>,

    /// Alignment algorithm (overrides configuration)
    #[arg(long, value_enum)]
    pub algorithm: Option<AlgorithmArg>,

    /// Token budget for refining one changed region (overrides configuration)
    #[arg(long)]
    pub max_refine_tokens: Option<usize>,

    /// Keep whitespace-only runs between changes as separate equal segments
    #[arg(long)]
    pub keep_whitespace: bool,

    /// Unchanged lines around each hunk in unified output
    #[arg(long, default_value_t = 3)]
    pub context: usize,
}

impl DiffFlags {
    /// Applies the flags on top of configured options.
    #[must_use]
    pub fn apply(&self, mut options: DiffOptions) -> DiffOptions {
        if let Some(granularity) = self.granularity {
            options.granularity = granularity.into();
        }
        if let Some(algorithm) = self.algorithm {
            options.algorithm = algorithm.into();
        }
        if let Some(max) = self.max_refine_tokens {
            options.max_refine_tokens = max;
        }
        if self.keep_whitespace {
            options.absorb_whitespace = false;
        }
        options
    }
}

/// `--granularity` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GranularityArg {
    /// Words, whitespace runs and punctuation
    Word,
    /// Characters
    Char,
}

impl From<GranularityArg> for Granularity {
    fn from(arg: GranularityArg) -> Self {
        match arg {
            GranularityArg::Word => Self::Word,
            GranularityArg::Char => Self::Char,
        }
    }
}

/// `--algorithm` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AlgorithmArg {
    /// Myers O(ND)
    Myers,
    /// Tabular longest common subsequence
    Lcs,
}

impl From<AlgorithmArg> for Algorithm {
    fn from(arg: AlgorithmArg) -> Self {
        match arg {
            AlgorithmArg::Myers => Self::Myers,
            AlgorithmArg::Lcs => Self::Lcs,
        }
    }
}
