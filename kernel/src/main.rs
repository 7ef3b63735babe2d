//! `mosaic` command-line entry point.

use std::io::Write;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use mosaic_kernel::cli::{Cli, Command};
use mosaic_kernel::commands;
use mosaic_kernel::infrastructure::{config::Settings, telemetry::TelemetryBuilder};
use mosaic_stream::CancellationToken;
use tokio::signal;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref()).context("Failed to load configuration")?;

    TelemetryBuilder::from_settings(&settings.telemetry)
        .init()
        .context("Failed to initialize telemetry")?;

    let (output, code) = match &cli.command {
        Command::Diff(args) => (commands::diff::run(args, &settings)?, ExitCode::SUCCESS),
        Command::Rewrite(args) => {
            let cancel = CancellationToken::new();
            tokio::spawn(cancel_on_shutdown(cancel.clone()));

            let run = commands::rewrite::run(args, &settings, &cancel, Some(std::io::stderr())).await?;
            let code = match run.status() {
                Ok(()) => ExitCode::SUCCESS,
                Err(e) => {
                    error!(error = %e, "rewrite did not complete");
                    ExitCode::from(e.exit_code())
                }
            };
            (run.output, code)
        }
    };

    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(output.as_bytes())
        .and_then(|()| stdout.flush())
        .context("Failed to write output")?;
    Ok(code)
}

async fn cancel_on_shutdown(cancel: CancellationToken) {
    shutdown_signal().await;
    info!("Shutdown signal received, cancelling stream...");
    cancel.cancel();
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!(error = %e, "failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
