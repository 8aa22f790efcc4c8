use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use futures::FutureExt;
use futures::future::{self, BoxFuture};
use tracing::{debug, error};

use crate::errors::ProviderError;
use crate::leaderboard::ranking::rank_attempts;
use crate::leaderboard::types::{Attempt, LeaderboardEntry, RankingQuery};
use crate::provider::RankedDataProvider;

/// In-process provider backed by a mutable list of attempts.
///
/// Clones share the same dataset, so a test or an embedding application can
/// keep a handle and mutate scores while a scheduler is polling.
#[derive(Debug, Clone)]
pub struct MemoryProvider {
    inner: Arc<MemoryInner>,
}

#[derive(Debug)]
struct MemoryInner {
    attempts: RwLock<Vec<Attempt>>,
    closed: AtomicBool,
}

impl MemoryProvider {
    pub fn open(attempts: Vec<Attempt>) -> Self {
        debug!(event = "core.provider.memory.opened", attempts = attempts.len());
        Self {
            inner: Arc::new(MemoryInner {
                attempts: RwLock::new(attempts),
                closed: AtomicBool::new(false),
            }),
        }
    }

    /// Replace the whole dataset.
    pub fn replace(&self, attempts: Vec<Attempt>) {
        *self.write() = attempts;
    }

    pub fn push(&self, attempt: Attempt) {
        self.write().push(attempt);
    }

    pub fn close(&self) {
        self.inner.closed.store(true, Ordering::SeqCst);
        debug!(event = "core.provider.memory.closed");
    }

    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::SeqCst)
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<Attempt>> {
        self.inner.attempts.read().unwrap_or_else(|poisoned| {
            error!(event = "core.provider.memory.lock_poisoned");
            poisoned.into_inner()
        })
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<Attempt>> {
        self.inner.attempts.write().unwrap_or_else(|poisoned| {
            error!(event = "core.provider.memory.lock_poisoned");
            poisoned.into_inner()
        })
    }
}

impl RankedDataProvider for MemoryProvider {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn query(
        &self,
        query: &RankingQuery,
    ) -> BoxFuture<'static, Result<Vec<LeaderboardEntry>, ProviderError>> {
        if self.is_closed() {
            return future::ready(Err(ProviderError::Closed)).boxed();
        }
        let ranked = rank_attempts(&self.read(), query);
        future::ready(Ok(ranked)).boxed()
    }
}
