//! The ranked-data provider seam.
//!
//! A provider answers one question: "who is ranked where for this scope?"
//! It is constructed explicitly, handed to the adapter, and closed by
//! whoever composed it. There is no process-wide client.

mod json_file;
mod memory;

pub use json_file::JsonFileProvider;
pub use memory::MemoryProvider;

use futures::future::BoxFuture;

use crate::errors::ProviderError;
use crate::leaderboard::types::{LeaderboardEntry, RankingQuery};

/// A source of ranked leaderboard rows.
///
/// Implementations return rows ordered by rank ascending and already capped
/// at `query.limit`. The returned future must not borrow `self`, so callers
/// can spawn it.
///
/// Ranks must be strictly increasing and emails unique (compared through
/// [`email_key`](crate::leaderboard::types::email_key)). Ties have to be
/// broken by the provider: a response with shared ranks, like the output of
/// SQL `RANK()`, is rejected whole as malformed and the last published board
/// stays on screen. Use `ROW_NUMBER()` with a deterministic tie-break instead.
pub trait RankedDataProvider: Send + Sync {
    /// Short name used in logs and error messages.
    fn name(&self) -> &'static str;

    fn query(
        &self,
        query: &RankingQuery,
    ) -> BoxFuture<'static, Result<Vec<LeaderboardEntry>, ProviderError>>;
}
