//! Where fetch failures are reported.
//!
//! Failures never reach the display surface as errors; they go here instead.
//! No retry policy hangs off this sink.

use std::fmt;

use tracing::warn;

use crate::errors::FetchError;
use crate::leaderboard::types::Scope;

/// Which kind of fetch failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchKind {
    /// Activation, scope change or user-triggered refresh. Shows the loading indicator.
    Explicit,
    /// Periodic background refresh.
    Silent,
}

impl fmt::Display for FetchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchKind::Explicit => write!(f, "explicit"),
            FetchKind::Silent => write!(f, "silent"),
        }
    }
}

/// A fetch failure as seen by the scheduler.
#[derive(Debug)]
pub struct FetchFailure<'a> {
    pub scope: &'a Scope,
    pub kind: FetchKind,
    /// Activation the fetch belonged to.
    pub generation: u64,
    pub error: &'a FetchError,
}

pub trait ObservabilitySink: Send + Sync {
    fn fetch_failed(&self, failure: &FetchFailure<'_>);
}

/// Default sink: one structured warning per failure.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl ObservabilitySink for TracingSink {
    fn fetch_failed(&self, failure: &FetchFailure<'_>) {
        warn!(
            event = "core.leaderboard.fetch_failed",
            scope = %failure.scope,
            kind = %failure.kind,
            generation = failure.generation,
            error_code = failure.error.error_code(),
            error = %failure.error,
        );
    }
}
