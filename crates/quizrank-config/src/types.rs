//! Configuration type definitions for quizrank.
//!
//! # Example Configuration
//!
//! ```toml
//! [leaderboard]
//! refresh_interval_ms = 5000
//! limit = 1000
//! viewer_email = "me@example.com"
//!
//! [source]
//! data_path = "attempts.json"
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Period between silent refreshes while a leaderboard is live.
pub const DEFAULT_REFRESH_INTERVAL_MS: u64 = 5_000;

/// Anything faster than this hammers the provider for no visible benefit.
pub const MIN_REFRESH_INTERVAL_MS: u64 = 100;

/// Default row cap requested from the provider.
pub const DEFAULT_LIMIT: u32 = 1_000;

/// Upper bound accepted for `limit`.
pub const MAX_LIMIT: u32 = 1_000;

/// Main configuration loaded from TOML config files.
///
/// Loaded from:
/// 1. User config: `~/.quizrank/config.toml`
/// 2. Project config: `./.quizrank/config.toml`
///
/// Project config values override user config values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizrankConfig {
    /// Leaderboard view and refresh settings
    #[serde(default)]
    pub leaderboard: LeaderboardConfig,

    /// Where the ranked data comes from
    #[serde(default)]
    pub source: SourceConfig,
}

/// Leaderboard view and refresh settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardConfig {
    /// Live-state tick period in milliseconds.
    /// Default: 5000.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_interval_ms: Option<u64>,

    /// Maximum number of rows requested per fetch.
    /// Default: 1000.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,

    /// Email of the viewing user; their row is highlighted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub viewer_email: Option<String>,
}

impl LeaderboardConfig {
    pub fn refresh_interval_ms(&self) -> u64 {
        self.refresh_interval_ms.unwrap_or(DEFAULT_REFRESH_INTERVAL_MS)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms())
    }

    pub fn limit(&self) -> u32 {
        self.limit.unwrap_or(DEFAULT_LIMIT)
    }

    pub fn viewer_email(&self) -> Option<&str> {
        self.viewer_email.as_deref()
    }

    /// Merge two configs. Override values take precedence when present.
    pub fn merge(base: &Self, override_config: &Self) -> Self {
        Self {
            refresh_interval_ms: override_config
                .refresh_interval_ms
                .or(base.refresh_interval_ms),
            limit: override_config.limit.or(base.limit),
            viewer_email: override_config
                .viewer_email
                .clone()
                .or_else(|| base.viewer_email.clone()),
        }
    }
}

/// Data source settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// JSON attempts file read by the bundled file provider.
    /// Default: `~/.quizrank/attempts.json`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_path: Option<PathBuf>,
}

impl SourceConfig {
    pub fn merge(base: &Self, override_config: &Self) -> Self {
        Self {
            data_path: override_config
                .data_path
                .clone()
                .or_else(|| base.data_path.clone()),
        }
    }
}
