//! Periodic single-flight quote polling.
//!
//! A poller owns one scope (the active tab's holdings or the watchlist),
//! recomputes its ticker set on every tick, and merges batch responses into
//! its cache. Ticks are single-flight per label: a tick that starts while
//! the previous request is still pending is skipped, never queued. Holdings
//! polls also snapshot the generation token when a tick starts; a response
//! that straddles a tab switch is discarded instead of applied.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, LazyLock, Mutex};
use std::time::Duration;

use log::{debug, error, warn};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use dashfolio_market_data::QuoteProvider;

use super::cache::QuoteCache;
use crate::errors::{Error, Result};
use crate::events::{DomainEvent, DomainEventSink, NoOpDomainEventSink};
use crate::tabs::TabRegistry;

/// Which ticker set a poller maintains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollScope {
    /// The active tab's entry symbols.
    Holdings,
    /// The watchlist's symbols.
    Watchlist,
}

impl PollScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            PollScope::Holdings => "holdings",
            PollScope::Watchlist => "watchlist",
        }
    }
}

/// Produces the ticker set to fetch. Evaluated at the start of each tick,
/// so entry edits and tab switches take effect without a restart.
pub type TickerSource = Arc<dyn Fn() -> Vec<String> + Send + Sync>;

/// How a single tick resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// A batch was fetched and merged; carries the number of quotes applied.
    Applied(usize),
    /// The ticker set was empty; no request was issued.
    SkippedEmpty,
    /// The previous request was still in flight; no request was issued.
    SkippedInFlight,
    /// The response arrived under a stale generation and was dropped.
    Discarded,
}

// =============================================================================
// Single-Flight Fetch Locking
// =============================================================================

/// Global lock for in-flight fetches per poller label. Prevents overlapping
/// requests when a tick fires while the previous request is still pending.
static FETCH_LOCKS: LazyLock<Mutex<HashSet<String>>> =
    LazyLock::new(|| Mutex::new(HashSet::new()));

/// RAII guard that releases the fetch lock when dropped. Dropping happens
/// on every exit path, including cancellation of the poll task.
struct FetchLockGuard {
    label: String,
}

impl FetchLockGuard {
    /// Try to acquire the fetch lock for a label. Returns Some(guard) if
    /// acquired, None if a fetch under this label is already in flight.
    fn try_acquire(label: &str) -> Option<Self> {
        let mut locks = FETCH_LOCKS.lock().unwrap();
        if locks.contains(label) {
            None
        } else {
            locks.insert(label.to_string());
            Some(Self {
                label: label.to_string(),
            })
        }
    }
}

impl Drop for FetchLockGuard {
    fn drop(&mut self) {
        let mut locks = FETCH_LOCKS.lock().unwrap();
        locks.remove(&self.label);
    }
}

/// Clears the in-flight flag when dropped, so the flag cannot stick if the
/// poll task is aborted mid-request.
struct InFlightFlag<'a> {
    flag: &'a AtomicBool,
}

impl<'a> InFlightFlag<'a> {
    fn set(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self { flag }
    }
}

impl Drop for InFlightFlag<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

// =============================================================================
// Poller
// =============================================================================

/// Periodic batched quote fetcher for one scope.
pub struct PricePoller {
    scope: PollScope,
    label: String,
    interval: Duration,
    provider: Arc<dyn QuoteProvider>,
    cache: QuoteCache,
    registry: Option<TabRegistry>,
    event_sink: Arc<dyn DomainEventSink>,
    ticker_source: TickerSource,
    fetching: AtomicBool,
}

impl PricePoller {
    pub fn new(
        scope: PollScope,
        interval: Duration,
        provider: Arc<dyn QuoteProvider>,
        cache: QuoteCache,
        ticker_source: TickerSource,
    ) -> Self {
        Self {
            scope,
            label: scope.as_str().to_string(),
            interval,
            provider,
            cache,
            registry: None,
            event_sink: Arc::new(NoOpDomainEventSink),
            ticker_source,
            fetching: AtomicBool::new(false),
        }
    }

    /// Attaches the tab registry. Responses are then checked against the
    /// generation observed when their tick started.
    pub fn with_registry(mut self, registry: TabRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn with_event_sink(mut self, event_sink: Arc<dyn DomainEventSink>) -> Self {
        self.event_sink = event_sink;
        self
    }

    /// Overrides the single-flight label. Pollers sharing a label share one
    /// in-flight slot; the default label is the scope name.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// True while a request is in flight. This is the loading flag for the
    /// widget owning this poller.
    pub fn is_fetching(&self) -> bool {
        self.fetching.load(Ordering::SeqCst)
    }

    /// Runs one tick: snapshot the ticker set and generation, fetch, merge.
    ///
    /// Network errors propagate to the caller; the interval loop logs them
    /// and keeps the stale cache for the next tick.
    pub async fn poll_once(&self) -> Result<TickOutcome> {
        let symbols = (self.ticker_source)();
        if symbols.is_empty() {
            return Ok(TickOutcome::SkippedEmpty);
        }

        let _lock = match FetchLockGuard::try_acquire(&self.label) {
            Some(guard) => guard,
            None => {
                debug!(
                    "{} poll skipped, previous request still in flight",
                    self.label
                );
                return Ok(TickOutcome::SkippedInFlight);
            }
        };

        let issued_generation = self.registry.as_ref().map(|registry| registry.generation());

        let batch = {
            let _in_flight = InFlightFlag::set(&self.fetching);
            self.provider.fetch_quotes(&symbols).await?
        };

        if let (Some(registry), Some(generation)) = (self.registry.as_ref(), issued_generation) {
            if !registry.is_current(generation) {
                debug!(
                    "{} poll response issued under stale generation {}, discarding",
                    self.label, generation
                );
                return Ok(TickOutcome::Discarded);
            }
        }

        let applied = self.cache.apply_batch(&batch);
        for failure in &batch.failures {
            debug!(
                "{} quote unavailable for {}: {}",
                self.label, failure.symbol, failure.message
            );
        }
        self.event_sink.emit(DomainEvent::quotes_refreshed(
            self.scope.as_str().to_string(),
            batch.quotes.iter().map(|quote| quote.symbol.clone()).collect(),
        ));
        Ok(TickOutcome::Applied(applied))
    }

    /// Moves the poller onto a background task ticking at its interval.
    /// The first tick fires immediately, so a freshly displayed view gets
    /// prices without waiting out a full interval.
    pub fn start(self) -> PollerHandle {
        let poller = Arc::new(self);
        let tick_poller = poller.clone();
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(tick_poller.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                // A failed tick never clears the cache; stale prices stand
                // until a later tick succeeds.
                if let Err(e) = tick_poller.poll_once().await {
                    match &e {
                        Error::MarketData(fetch) if fetch.is_transient() => warn!(
                            "{} poll failed, keeping cached prices: {}",
                            tick_poller.label, fetch
                        ),
                        other => error!("{} poll failed: {}", tick_poller.label, other),
                    }
                }
            }
        });
        PollerHandle { poller, task }
    }
}

/// Running poller plus its stop handle.
///
/// The owning view holds the handle while displayed and drops it (or calls
/// [`stop`](PollerHandle::stop)) when it goes away or the active tab
/// changes. Restarting after a tab switch means starting a new poller, so
/// the first tick of the new one fires immediately instead of waiting out
/// the old interval.
pub struct PollerHandle {
    poller: Arc<PricePoller>,
    task: JoinHandle<()>,
}

impl PollerHandle {
    /// True while the poller has a request in flight.
    pub fn is_fetching(&self) -> bool {
        self.poller.is_fetching()
    }

    /// Runs a tick right now, outside the interval. Single-flight and
    /// generation rules still apply.
    pub async fn refresh_now(&self) -> Result<TickOutcome> {
        self.poller.poll_once().await
    }

    /// Stops the background task. Idempotent. Dropping the handle has the
    /// same effect.
    pub fn stop(&self) {
        self.task.abort();
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
