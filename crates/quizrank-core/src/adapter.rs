//! Ranking Query Adapter.
//!
//! Turns a `(course, week, limit)` request into a provider query and returns
//! a validated [`ResultSet`]. It owns no state besides the provider handle,
//! so repeated calls against an unchanged dataset return identical results.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::errors::FetchError;
use crate::leaderboard::types::{RankingQuery, ResultSet, Scope};
use crate::provider::RankedDataProvider;

#[derive(Clone)]
pub struct RankingQueryAdapter {
    provider: Arc<dyn RankedDataProvider>,
}

impl RankingQueryAdapter {
    pub fn new(provider: Arc<dyn RankedDataProvider>) -> Self {
        Self { provider }
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    /// Fetch the leaderboard for the given filters.
    ///
    /// `None` (or an empty identifier) means "no filter" for that dimension.
    pub async fn fetch(
        &self,
        course_filter: Option<&str>,
        week_filter: Option<&str>,
        limit: u32,
    ) -> Result<ResultSet, FetchError> {
        self.fetch_scope(&Scope::new(course_filter, week_filter), limit)
            .await
    }

    /// Fetch the leaderboard for an already-built scope.
    ///
    /// # Errors
    ///
    /// `FetchError::Transient` when the provider fails, `FetchError::Malformed`
    /// when its response violates the entry contract. Nothing is returned
    /// partially.
    pub async fn fetch_scope(&self, scope: &Scope, limit: u32) -> Result<ResultSet, FetchError> {
        let query = RankingQuery::new(scope.clone(), limit);
        let provider = self.provider.name();

        debug!(
            event = "core.adapter.fetch_started",
            provider = provider,
            scope = %scope,
            limit = limit,
        );

        let rows = self
            .provider
            .query(&query)
            .await
            .map_err(|e| FetchError::from_provider(provider, e))?;

        let result_set = ResultSet::from_ranked(rows, limit).inspect_err(|e| {
            warn!(
                event = "core.adapter.response_rejected",
                provider = provider,
                scope = %scope,
                reason = %e,
            );
        })?;

        debug!(
            event = "core.adapter.fetch_completed",
            provider = provider,
            scope = %scope,
            rows = result_set.len(),
        );

        Ok(result_set)
    }
}

impl std::fmt::Debug for RankingQueryAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RankingQueryAdapter")
            .field("provider", &self.provider.name())
            .finish()
    }
}
