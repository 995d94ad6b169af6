//! Domain event types.

use serde::{Deserialize, Serialize};

/// Domain events emitted by core services after successful mutations.
///
/// These events represent facts about domain data changes. Embedding
/// runtimes translate them into platform-specific actions (recomputing
/// derived views, pushing change feeds to the UI, etc.).
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DomainEvent {
    /// Tabs were created, renamed, or deleted.
    TabsChanged { tab_ids: Vec<String> },

    /// The active tab changed. `tab_id` is `None` when the last tab was
    /// deleted and no workspace remains selected.
    ActiveTabSwitched {
        tab_id: Option<String>,
        /// Generation issued by this switch; responses carrying an older
        /// generation must be discarded.
        generation: u64,
    },

    /// Portfolio entries were created, updated, or deleted.
    EntriesChanged {
        tab_id: String,
        entry_ids: Vec<String>,
    },

    /// A quote batch was merged into a cache.
    QuotesRefreshed {
        /// Poller scope the batch was fetched for ("holdings", "watchlist").
        scope: String,
        symbols: Vec<String>,
    },

    /// Watchlist items were added or removed.
    WatchlistChanged { item_ids: Vec<String> },

    /// Broker holdings were imported or re-imported.
    BrokerHoldingsImported {
        imported_count: usize,
        symbols: Vec<String>,
    },

    /// A broker holding was removed.
    BrokerHoldingsChanged { holding_ids: Vec<String> },
}

impl DomainEvent {
    /// Creates a TabsChanged event.
    pub fn tabs_changed(tab_ids: Vec<String>) -> Self {
        Self::TabsChanged { tab_ids }
    }

    /// Creates an ActiveTabSwitched event.
    pub fn active_tab_switched(tab_id: Option<String>, generation: u64) -> Self {
        Self::ActiveTabSwitched { tab_id, generation }
    }

    /// Creates an EntriesChanged event.
    pub fn entries_changed(tab_id: String, entry_ids: Vec<String>) -> Self {
        Self::EntriesChanged { tab_id, entry_ids }
    }

    /// Creates a QuotesRefreshed event.
    pub fn quotes_refreshed(scope: String, symbols: Vec<String>) -> Self {
        Self::QuotesRefreshed { scope, symbols }
    }

    /// Creates a WatchlistChanged event.
    pub fn watchlist_changed(item_ids: Vec<String>) -> Self {
        Self::WatchlistChanged { item_ids }
    }

    /// Creates a BrokerHoldingsImported event.
    pub fn broker_holdings_imported(imported_count: usize, symbols: Vec<String>) -> Self {
        Self::BrokerHoldingsImported {
            imported_count,
            symbols,
        }
    }

    /// Creates a BrokerHoldingsChanged event.
    pub fn broker_holdings_changed(holding_ids: Vec<String>) -> Self {
        Self::BrokerHoldingsChanged { holding_ids }
    }
}
