use std::path::PathBuf;
use std::time::Duration;

use clap::ArgMatches;
use tracing::warn;

use quizrank_config::QuizrankConfig;
use quizrank_core::{SchedulerOptions, Scope};
use quizrank_paths::QuizrankPaths;

use crate::color;

/// Everything a board command needs, with CLI flags applied over config.
#[derive(Debug, Clone)]
pub struct BoardRequest {
    pub scope: Scope,
    pub options: SchedulerOptions,
    pub data_path: PathBuf,
}

/// Load configuration with warning on errors.
///
/// Falls back to defaults if config loading fails, but notifies the user via:
/// - stderr message for immediate visibility
/// - structured log event `cli.config.load_failed` for debugging
pub fn load_config_with_warning() -> QuizrankConfig {
    match QuizrankConfig::load_hierarchy() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "{} Could not load config: {}. Using defaults.\n{}",
                color::warning("Warning:"),
                e,
                color::hint(
                    "Tip: Check ~/.quizrank/config.toml and ./.quizrank/config.toml for errors."
                ),
            );
            warn!(
                event = "cli.config.load_failed",
                error = %e,
                "Config load failed, using defaults"
            );
            QuizrankConfig::default()
        }
    }
}

/// Resolve filters, options and the attempts file for `show` and `watch`.
pub fn board_request(
    matches: &ArgMatches,
    config: &QuizrankConfig,
) -> Result<BoardRequest, Box<dyn std::error::Error>> {
    let scope = Scope::new(
        matches.get_one::<String>("course").map(String::as_str),
        matches.get_one::<String>("week").map(String::as_str),
    );

    let mut options = SchedulerOptions::from_config(&config.leaderboard);
    if let Some(limit) = matches.get_one::<u32>("limit") {
        options.limit = *limit;
    }
    if let Some(viewer) = matches.get_one::<String>("viewer") {
        options.viewer_email = Some(viewer.clone());
    }
    // Only `watch` defines --interval-ms.
    if let Ok(Some(interval_ms)) = matches.try_get_one::<u64>("interval-ms") {
        options.refresh_interval = Duration::from_millis(*interval_ms);
    }

    let data_path = match matches.get_one::<PathBuf>("data") {
        Some(path) => path.clone(),
        None => match &config.source.data_path {
            Some(path) => path.clone(),
            None => QuizrankPaths::resolve()?.default_attempts_file(),
        },
    };

    Ok(BoardRequest {
        scope,
        options,
        data_path,
    })
}

/// Single-threaded runtime for one command invocation.
pub fn runtime() -> std::io::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
}
