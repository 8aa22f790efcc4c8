use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use futures::FutureExt;
use futures::future::BoxFuture;
use tracing::{debug, info};

use crate::errors::ProviderError;
use crate::leaderboard::ranking::rank_attempts;
use crate::leaderboard::types::{Attempt, LeaderboardEntry, RankingQuery};
use crate::provider::RankedDataProvider;

/// Provider that ranks a JSON array of attempts stored on disk.
///
/// The file is re-read on every query, so edits made by another process are
/// picked up on the next refresh.
#[derive(Debug, Clone)]
pub struct JsonFileProvider {
    path: PathBuf,
    closed: Arc<AtomicBool>,
}

impl JsonFileProvider {
    /// Open the provider, failing early if the file is missing or is not a file.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, ProviderError> {
        let path = path.into();
        let metadata = tokio::fs::metadata(&path).await?;
        if !metadata.is_file() {
            return Err(ProviderError::Unavailable(format!(
                "'{}' is not a file",
                path.display()
            )));
        }

        info!(event = "core.provider.json_file.opened", path = %path.display());

        Ok(Self {
            path,
            closed: Arc::new(AtomicBool::new(false)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
        debug!(event = "core.provider.json_file.closed", path = %self.path.display());
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

impl RankedDataProvider for JsonFileProvider {
    fn name(&self) -> &'static str {
        "json-file"
    }

    fn query(
        &self,
        query: &RankingQuery,
    ) -> BoxFuture<'static, Result<Vec<LeaderboardEntry>, ProviderError>> {
        let path = self.path.clone();
        let closed = self.closed.clone();
        let query = query.clone();

        async move {
            if closed.load(Ordering::SeqCst) {
                return Err(ProviderError::Closed);
            }
            let bytes = tokio::fs::read(&path).await?;
            let attempts: Vec<Attempt> = serde_json::from_slice(&bytes)?;
            Ok(rank_attempts(&attempts, &query))
        }
        .boxed()
    }
}
