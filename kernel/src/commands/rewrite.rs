use std::io::Write;

use anyhow::{Context, Result};
use mosaic_diff::DiffEngine;
use mosaic_stream::{
    CancellationToken, DoneFields, RewriteRequest, RewriteReview, RewriteSession, StreamClient,
    StreamError, StreamHandler, StreamOutcome, consume,
};
use tracing::{debug, info, instrument, warn};

use crate::cli::RewriteArgs;
use crate::commands::read_text;
use crate::infrastructure::config::Settings;
use crate::output::Report;

/// Why a rewrite did not complete.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RewriteError {
    /// The server sent an error event.
    #[error("Rewrite failed: {message}")]
    Failed {
        /// Server-provided reason.
        message: String,
        /// Whether the server considers a retry worthwhile.
        retryable: bool,
    },
    /// The user interrupted the stream.
    #[error("Rewrite cancelled")]
    Cancelled,
    /// The body ended without a `done` event.
    #[error("Stream ended before the rewrite was complete")]
    Incomplete,
}

impl RewriteError {
    /// Process exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Failed { .. } | Self::Incomplete => 1,
            Self::Cancelled => 130,
        }
    }
}

/// The result of one `mosaic rewrite` run.
#[derive(Debug, Clone)]
pub struct RewriteRun {
    /// How the stream ended.
    pub outcome: StreamOutcome,
    /// The original, the (possibly partial) rewrite and their diff.
    pub review: RewriteReview,
    /// Rendered diff.
    pub output: String,
}

impl RewriteRun {
    /// Maps the stream outcome to success or a [`RewriteError`].
    ///
    /// # Errors
    ///
    /// Returns an error unless the stream completed.
    pub fn status(&self) -> Result<(), RewriteError> {
        match &self.outcome {
            StreamOutcome::Completed { .. } => Ok(()),
            StreamOutcome::Failed { message, retryable } => Err(RewriteError::Failed {
                message: message.clone(),
                retryable: *retryable,
            }),
            StreamOutcome::Cancelled => Err(RewriteError::Cancelled),
            StreamOutcome::Ended => Err(RewriteError::Incomplete),
        }
    }
}

/// Collects a rewrite and optionally echoes each chunk as it arrives.
pub struct EchoSession<W> {
    session: RewriteSession,
    echo: Option<W>,
}

impl<W: Write> EchoSession<W> {
    /// Wraps `session`, echoing chunks to `echo` when given.
    pub const fn new(session: RewriteSession, echo: Option<W>) -> Self {
        Self { session, echo }
    }

    /// Returns the wrapped session.
    pub fn into_session(self) -> RewriteSession {
        self.session
    }

    fn echo(&mut self, text: &str) {
        if let Some(out) = &mut self.echo {
            if let Err(e) = out.write_all(text.as_bytes()).and_then(|()| out.flush()) {
                debug!(error = %e, "stopped echoing chunks");
                self.echo = None;
            }
        }
    }
}

impl<W: Write> StreamHandler for EchoSession<W> {
    fn on_chunk(&mut self, content: &str) {
        self.session.on_chunk(content);
        self.echo(content);
    }

    fn on_done(&mut self, fields: &DoneFields) {
        debug!(?fields, "rewrite done");
        self.echo("\n");
    }

    fn on_error(&mut self, message: &str, retryable: bool) {
        warn!(%message, retryable, "rewrite ended with an error");
        self.echo("\n");
    }
}

/// Streams a rewrite of the file named in `args` and renders its diff.
///
/// Chunks are echoed to `echo` while they arrive. A cancelled, failed or
/// broken stream still renders the partial rewrite.
///
/// # Errors
///
/// Returns an error if the file cannot be read, the client cannot be
/// configured, or the stream cannot be opened.
#[instrument(skip_all, fields(original = %args.original.display(), endpoint = %args.endpoint))]
pub async fn run<W: Write>(
    args: &RewriteArgs,
    settings: &Settings,
    cancel: &CancellationToken,
    echo: Option<W>,
) -> Result<RewriteRun> {
    let original = read_text(&args.original)?;
    let options = args.diff.apply(settings.diff.options());

    let mut request = RewriteRequest::new(original.clone());
    request.instructions.clone_from(&args.instructions);
    request.style.clone_from(&args.style);

    let client = StreamClient::new(settings.api.client_config()?);
    let echo = if args.quiet { None } else { echo };
    let mut handler = EchoSession::new(RewriteSession::with_options(original, options), echo);

    let outcome = match client.open(&args.endpoint, &request, cancel).await {
        Ok(events) => match consume(events, &mut handler, cancel).await {
            Ok(outcome) => outcome,
            Err(error) => {
                let outcome = StreamOutcome::interrupted(&error);
                if let StreamOutcome::Failed { message, retryable } = &outcome {
                    handler.on_error(message, *retryable);
                }
                outcome
            }
        },
        Err(StreamError::Cancelled) => StreamOutcome::Cancelled,
        Err(error) => {
            return Err(error).with_context(|| {
                format!("Failed to open rewrite stream at '{}'", args.endpoint)
            });
        }
    };

    let review = handler.into_session().finish();
    info!(
        inserted = review.stats.inserted_chars,
        deleted = review.stats.deleted_chars,
        similarity = review.stats.similarity,
        "rewrite reviewed"
    );

    let engine = DiffEngine::new(options);
    let output = Report {
        original: &review.original,
        rewrite: &review.rewrite,
        engine: &engine,
        segments: &review.segments,
        old_label: "original",
        new_label: "rewrite",
        context: args.diff.context,
    }
    .render(args.diff.format)?;

    Ok(RewriteRun {
        outcome,
        review,
        output,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_echo_session_echoes_and_collects() {
        let mut echo = Vec::new();
        {
            let mut handler = EchoSession::new(RewriteSession::new("a"), Some(&mut echo));
            handler.on_chunk("b");
            handler.on_chunk("c");
            handler.on_done(&DoneFields::new());
            assert_eq!(handler.into_session().rewrite(), "bc");
        }
        assert_eq!(echo, b"bc\n");
    }

    #[test]
    fn test_status_maps_outcomes() {
        let run = |outcome| RewriteRun {
            outcome,
            review: RewriteSession::new("").finish(),
            output: String::new(),
        };

        assert!(run(StreamOutcome::Completed { fields: DoneFields::new() }).status().is_ok());
        assert_eq!(
            run(StreamOutcome::Cancelled).status(),
            Err(RewriteError::Cancelled)
        );
        assert_eq!(RewriteError::Cancelled.exit_code(), 130);
        assert_eq!(
            run(StreamOutcome::Ended).status().map_err(|e| e.exit_code()),
            Err(1)
        );
    }
}
