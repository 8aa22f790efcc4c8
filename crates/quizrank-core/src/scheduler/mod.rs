//! Refresh Scheduler.
//!
//! Drives the adapter while a leaderboard view is active:
//!
//! - `activate(scope)`: Idle -> Loading, one explicit fetch with the loading
//!   indicator on. When it completes (success or failure) the view goes Live
//!   and a recurring timer is armed.
//! - every tick: one silent fetch. The loading indicator stays off and the
//!   phase stays Live.
//! - `change_scope(scope)`: cancel the timer and start over as if re-activated.
//! - `deactivate()`: cancel the timer, back to Idle. Results of fetches still in
//!   flight are discarded when they arrive.
//!
//! Each activation gets a generation number. A fetch result is applied only if
//! its generation is still current, which is what makes late results harmless.
//! Overlapping fetches within one generation apply in completion order.


use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::adapter::RankingQueryAdapter;
use crate::display::{BoardFrame, BoardRow, DisplaySurface};
use crate::errors::FetchError;
use crate::leaderboard::reconcile::reconcile;
use crate::leaderboard::types::{DEFAULT_LIMIT, ResultSet, Scope};
use crate::observability::{FetchFailure, FetchKind, ObservabilitySink, TracingSink};
use quizrank_config::LeaderboardConfig;

/// Live-state tick period used when nothing is configured.
pub const DEFAULT_REFRESH_INTERVAL: Duration =
    Duration::from_millis(quizrank_config::DEFAULT_REFRESH_INTERVAL_MS);

/// Shortest tick period the scheduler will arm. Shorter intervals are raised
/// to this.
pub const MIN_REFRESH_INTERVAL: Duration =
    Duration::from_millis(quizrank_config::MIN_REFRESH_INTERVAL_MS);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SchedulerPhase {
    /// View inactive, no timer.
    Idle,
    /// Explicit fetch in flight, loading indicator shown.
    Loading,
    /// Timer armed, silent refreshes running.
    Live,
}

impl fmt::Display for SchedulerPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchedulerPhase::Idle => write!(f, "idle"),
            SchedulerPhase::Loading => write!(f, "loading"),
            SchedulerPhase::Live => write!(f, "live"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulerOptions {
    pub refresh_interval: Duration,
    pub limit: u32,
    /// Email of the viewing user, used to flag their row.
    pub viewer_email: Option<String>,
}

impl Default for SchedulerOptions {
    fn default() -> Self {
        Self {
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            limit: DEFAULT_LIMIT,
            viewer_email: None,
        }
    }
}

impl SchedulerOptions {
    pub fn from_config(config: &LeaderboardConfig) -> Self {
        Self {
            refresh_interval: config.refresh_interval(),
            limit: config.limit(),
            viewer_email: config.viewer_email().map(String::from),
        }
    }

    /// Raise `refresh_interval` to [`MIN_REFRESH_INTERVAL`] if it is shorter.
    fn clamped(mut self) -> Self {
        if self.refresh_interval < MIN_REFRESH_INTERVAL {
            warn!(
                event = "core.scheduler.refresh_interval_clamped",
                requested_ms = self.refresh_interval.as_millis() as u64,
                applied_ms = MIN_REFRESH_INTERVAL.as_millis() as u64,
            );
            self.refresh_interval = MIN_REFRESH_INTERVAL;
        }
        self
    }
}

/// State shared between the scheduler handle and its fetch tasks.
struct BoardState {
    phase: SchedulerPhase,
    generation: u64,
    scope: Scope,
    loading: bool,
    current: ResultSet,
    rows: Vec<BoardRow>,
    refreshed_at: Option<DateTime<Utc>>,
    last_error: Option<String>,
}

struct Shared {
    state: Mutex<BoardState>,
    display: Arc<dyn DisplaySurface>,
    sink: Arc<dyn ObservabilitySink>,
    viewer_email: Option<String>,
    armed_timers: AtomicUsize,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, BoardState> {
        self.state.lock().unwrap_or_else(|poisoned| {
            error!(event = "core.scheduler.state_lock_poisoned");
            poisoned.into_inner()
        })
    }

    fn frame(&self, state: &BoardState, changed: bool) -> BoardFrame {
        BoardFrame {
            scope: state.scope.clone(),
            phase: state.phase,
            loading: state.loading,
            rows: state.rows.clone(),
            changed,
            refreshed_at: state.refreshed_at,
            last_error: state.last_error.clone(),
        }
    }

    /// Push the current state to the display. Called with the lock held so
    /// frames reach the surface in the order they were produced.
    fn publish(&self, state: &BoardState, changed: bool) {
        self.display.render(&self.frame(state, changed));
    }

    /// Apply a finished fetch, unless its activation is gone.
    fn apply(
        &self,
        generation: u64,
        scope: &Scope,
        kind: FetchKind,
        outcome: Result<ResultSet, FetchError>,
    ) {
        let mut state = self.lock();

        if state.generation != generation || state.phase == SchedulerPhase::Idle {
            debug!(
                event = "core.scheduler.stale_result_discarded",
                generation = generation,
                current_generation = state.generation,
                kind = %kind,
            );
            return;
        }

        let changed = match outcome {
            Ok(result_set) => {
                let reconciliation = reconcile(&state.current, &result_set);
                state.rows = BoardFrame::build_rows(
                    &result_set,
                    &reconciliation,
                    self.viewer_email.as_deref(),
                );
                state.current = result_set;
                state.refreshed_at = Some(Utc::now());
                state.last_error = None;

                debug!(
                    event = "core.scheduler.result_applied",
                    generation = generation,
                    kind = %kind,
                    rows = state.current.len(),
                    moved = reconciliation.moved_count(),
                    dropped = reconciliation.dropped().len(),
                    changed = reconciliation.changed(),
                );
                reconciliation.changed()
            }
            Err(error) => {
                // Last-known-good rows stay published.
                self.sink.fetch_failed(&FetchFailure {
                    scope,
                    kind,
                    generation,
                    error: &error,
                });
                state.last_error = Some(error.to_string());
                false
            }
        };

        if kind == FetchKind::Explicit {
            state.loading = false;
            state.phase = SchedulerPhase::Live;
        }

        self.publish(&state, changed);
    }
}

/// Everything a fetch task needs, owned so it can be spawned.
#[derive(Clone)]
struct FetchContext {
    shared: Arc<Shared>,
    adapter: RankingQueryAdapter,
    scope: Scope,
    limit: u32,
    generation: u64,
}

async fn run_fetch(ctx: FetchContext, kind: FetchKind) {
    let outcome = ctx.adapter.fetch_scope(&ctx.scope, ctx.limit).await;
    ctx.shared.apply(ctx.generation, &ctx.scope, kind, outcome);
}

/// Counts an armed timer for as long as it lives.
struct ArmedTimer<'a>(&'a AtomicUsize);

impl<'a> ArmedTimer<'a> {
    fn arm(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for ArmedTimer<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// One activation: explicit fetch, then the recurring timer until cancelled.
async fn drive(ctx: FetchContext, period: Duration, token: CancellationToken) {
    run_fetch(ctx.clone(), FetchKind::Explicit).await;

    if token.is_cancelled() {
        return;
    }

    let _armed = ArmedTimer::arm(&ctx.shared.armed_timers);
    let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    debug!(
        event = "core.scheduler.timer_armed",
        generation = ctx.generation,
        period_ms = period.as_millis() as u64,
    );

    loop {
        tokio::select! {
            biased;
            _ = token.cancelled() => break,
            _ = ticker.tick() => {
                tokio::spawn(run_fetch(ctx.clone(), FetchKind::Silent));
            }
        }
    }

    debug!(
        event = "core.scheduler.timer_released",
        generation = ctx.generation,
    );
}

struct Activation {
    generation: u64,
    token: CancellationToken,
}

/// Owns the published leaderboard and the refresh timer for one view.
///
/// Methods that start work spawn Tokio tasks and must be called from within
/// a Tokio runtime.
pub struct RefreshScheduler {
    adapter: RankingQueryAdapter,
    options: SchedulerOptions,
    shared: Arc<Shared>,
    activation: Option<Activation>,
}

impl RefreshScheduler {
    /// `options.refresh_interval` below [`MIN_REFRESH_INTERVAL`] is clamped.
    pub fn new(
        adapter: RankingQueryAdapter,
        display: Arc<dyn DisplaySurface>,
        options: SchedulerOptions,
    ) -> Self {
        let options = options.clamped();
        let shared = Arc::new(Shared {
            state: Mutex::new(BoardState {
                phase: SchedulerPhase::Idle,
                generation: 0,
                scope: Scope::all(),
                loading: false,
                current: ResultSet::empty(),
                rows: Vec::new(),
                refreshed_at: None,
                last_error: None,
            }),
            display,
            sink: Arc::new(TracingSink),
            viewer_email: options.viewer_email.clone(),
            armed_timers: AtomicUsize::new(0),
        });

        Self {
            adapter,
            options,
            shared,
            activation: None,
        }
    }

    /// Report fetch failures to `sink` instead of the default tracing sink.
    ///
    /// # Panics
    ///
    /// Panics if called after the scheduler has started fetch tasks.
    pub fn with_sink(mut self, sink: Arc<dyn ObservabilitySink>) -> Self {
        Arc::get_mut(&mut self.shared)
            .expect("with_sink must be called before activation")
            .sink = sink;
        self
    }

    pub fn options(&self) -> &SchedulerOptions {
        &self.options
    }

    /// Start showing the leaderboard for `scope`.
    ///
    /// Calling this while already active restarts with the new scope, exactly
    /// like [`change_scope`](Self::change_scope).
    pub fn activate(&mut self, scope: Scope) {
        if let Some(active) = &self.activation {
            info!(
                event = "core.scheduler.reactivated",
                previous_generation = active.generation,
            );
        }
        self.start(scope);
    }

    /// Switch an active view to a different scope.
    ///
    /// No-op when idle or when `scope` is the scope already shown.
    pub fn change_scope(&mut self, scope: Scope) {
        if self.activation.is_none() {
            debug!(event = "core.scheduler.change_scope_ignored", reason = "idle");
            return;
        }
        if self.shared.lock().scope == scope {
            debug!(
                event = "core.scheduler.change_scope_ignored",
                reason = "same_scope",
            );
            return;
        }
        info!(event = "core.scheduler.scope_changed", scope = %scope);
        self.start(scope);
    }

    /// Stop refreshing. The last published rows stay as they are.
    pub fn deactivate(&mut self) {
        let Some(activation) = self.activation.take() else {
            debug!(event = "core.scheduler.deactivate_ignored", reason = "idle");
            return;
        };
        activation.token.cancel();

        let mut state = self.shared.lock();
        state.generation += 1;
        state.phase = SchedulerPhase::Idle;
        state.loading = false;
        self.shared.publish(&state, false);

        info!(
            event = "core.scheduler.deactivated",
            generation = activation.generation,
        );
    }

    /// User-triggered refresh: an explicit fetch with the loading indicator.
    ///
    /// Returns `false` (and does nothing) when idle or while another explicit
    /// fetch is still loading. The timer is left as it is.
    pub fn refresh_now(&self) -> bool {
        let Some(activation) = &self.activation else {
            debug!(event = "core.scheduler.refresh_ignored", reason = "idle");
            return false;
        };

        let ctx = {
            let mut state = self.shared.lock();
            if state.loading {
                debug!(event = "core.scheduler.refresh_ignored", reason = "loading");
                return false;
            }
            state.loading = true;
            state.phase = SchedulerPhase::Loading;
            self.shared.publish(&state, false);

            FetchContext {
                shared: self.shared.clone(),
                adapter: self.adapter.clone(),
                scope: state.scope.clone(),
                limit: self.options.limit,
                generation: activation.generation,
            }
        };

        info!(
            event = "core.scheduler.refresh_requested",
            generation = ctx.generation,
        );
        tokio::spawn(run_fetch(ctx, FetchKind::Explicit));
        true
    }

    pub fn phase(&self) -> SchedulerPhase {
        self.shared.lock().phase
    }

    pub fn is_loading(&self) -> bool {
        self.shared.lock().loading
    }

    /// The scope being shown, or `None` when idle.
    pub fn scope(&self) -> Option<Scope> {
        self.activation
            .as_ref()
            .map(|_| self.shared.lock().scope.clone())
    }

    /// The published result set.
    pub fn current(&self) -> ResultSet {
        self.shared.lock().current.clone()
    }

    /// The frame a display would draw right now.
    pub fn frame(&self) -> BoardFrame {
        let state = self.shared.lock();
        self.shared.frame(&state, false)
    }

    /// Number of refresh timers currently armed. At most one.
    pub fn armed_timers(&self) -> usize {
        self.shared.armed_timers.load(Ordering::SeqCst)
    }

    fn start(&mut self, scope: Scope) {
        if let Some(previous) = self.activation.take() {
            previous.token.cancel();
        }

        let generation = {
            let mut state = self.shared.lock();
            state.generation += 1;
            state.phase = SchedulerPhase::Loading;
            state.loading = true;
            state.scope = scope.clone();
            self.shared.publish(&state, false);
            state.generation
        };

        info!(
            event = "core.scheduler.activated",
            generation = generation,
            scope = %scope,
            provider = self.adapter.provider_name(),
            refresh_interval_ms = self.options.refresh_interval.as_millis() as u64,
        );

        let token = CancellationToken::new();
        let ctx = FetchContext {
            shared: self.shared.clone(),
            adapter: self.adapter.clone(),
            scope,
            limit: self.options.limit,
            generation,
        };
        tokio::spawn(drive(ctx, self.options.refresh_interval, token.clone()));

        self.activation = Some(Activation { generation, token });
    }
}

impl Drop for RefreshScheduler {
    fn drop(&mut self) {
        if let Some(activation) = self.activation.take() {
            activation.token.cancel();
            self.shared.lock().generation += 1;
            debug!(
                event = "core.scheduler.dropped",
                generation = activation.generation,
            );
        }
    }
}

impl fmt::Debug for RefreshScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RefreshScheduler")
            .field("adapter", &self.adapter)
            .field("options", &self.options)
            .field("active", &self.activation.is_some())
            .finish()
    }
}
