//! quizrank-core: leaderboard ranking and live refresh engine
//!
//! # Main Entry Points
//!
//! - [`adapter`] - Ranking Query Adapter: validated fetches against a provider
//! - [`scheduler`] - Refresh Scheduler: activation lifecycle and periodic refresh
//! - [`provider`] - Ranked-data provider seam plus bundled providers
//! - [`leaderboard`] - Domain types, ranking rule and snapshot reconciliation
//! - [`display`] - Rows and frames pushed to a display surface

pub mod adapter;
pub mod display;
pub mod errors;
pub mod leaderboard;
pub mod logging;
pub mod observability;
pub mod provider;
pub mod scheduler;

pub use adapter::RankingQueryAdapter;
pub use display::{BadgeTier, BoardFrame, BoardRow, DisplaySurface, format_elapsed};
pub use errors::{FetchError, MalformedResponse, ProviderError};
pub use leaderboard::reconcile::{RankMovement, Reconciliation, reconcile};
pub use leaderboard::types::{
    Attempt, DEFAULT_LIMIT, LeaderboardEntry, RankingQuery, ResultSet, Scope, email_key,
};
pub use observability::{FetchFailure, FetchKind, ObservabilitySink, TracingSink};
pub use provider::{JsonFileProvider, MemoryProvider, RankedDataProvider};
pub use scheduler::{
    DEFAULT_REFRESH_INTERVAL, MIN_REFRESH_INTERVAL, RefreshScheduler, SchedulerOptions,
    SchedulerPhase,
};

// Re-export logging initialization
pub use logging::init_logging;
