use std::sync::Arc;

use clap::ArgMatches;
use tracing::{error, info, warn};

use quizrank_core::{JsonFileProvider, RankingQueryAdapter, RefreshScheduler};

use super::helpers::{BoardRequest, board_request, load_config_with_warning, runtime};
use crate::color;
use crate::terminal::TerminalSurface;

pub(crate) fn handle_watch_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config_with_warning();
    let request = board_request(matches, &config)?;

    info!(
        event = "cli.watch_started",
        scope = %request.scope,
        data_path = %request.data_path.display(),
        refresh_interval_ms = request.options.refresh_interval.as_millis() as u64,
    );

    runtime()?.block_on(watch(request))
}

async fn watch(request: BoardRequest) -> Result<(), Box<dyn std::error::Error>> {
    let provider = match JsonFileProvider::open(&request.data_path).await {
        Ok(provider) => provider,
        Err(e) => {
            eprintln!("{} {}", color::error("Failed to open attempts file:"), e);
            error!(
                event = "cli.watch_failed",
                data_path = %request.data_path.display(),
                error = %e
            );
            return Err(e.into());
        }
    };

    let mut scheduler = RefreshScheduler::new(
        RankingQueryAdapter::new(Arc::new(provider.clone())),
        Arc::new(TerminalSurface::stdout()),
        request.options,
    );
    scheduler.activate(request.scope);

    wait_for_shutdown_signal().await;

    scheduler.deactivate();
    provider.close();

    info!(event = "cli.watch_completed");
    Ok(())
}

/// Wait for SIGINT (Ctrl-C) or SIGTERM.
async fn wait_for_shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();

    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => {
                        info!(event = "cli.watch.signal_received", signal = "SIGINT");
                    }
                    _ = sigterm.recv() => {
                        info!(event = "cli.watch.signal_received", signal = "SIGTERM");
                    }
                }
            }
            Err(e) => {
                warn!(event = "cli.watch.sigterm_unavailable", error = %e);
                ctrl_c.await.ok();
                info!(event = "cli.watch.signal_received", signal = "SIGINT");
            }
        }
    }

    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
        info!(event = "cli.watch.signal_received", signal = "SIGINT");
    }
}
