//! Pending-edit store for portfolio entry forms.
//!
//! Drafts are scoped by tab and session and are kept separate from committed
//! entries. Saving, resuming, and discarding are explicit operations; nothing
//! here touches persistence.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use dashmap::DashMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Identifies one draft: a form being edited in one session for one tab.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftKey {
    pub tab_id: String,
    pub session_id: String,
}

impl DraftKey {
    pub fn new(tab_id: impl Into<String>, session_id: impl Into<String>) -> Self {
        Self {
            tab_id: tab_id.into(),
            session_id: session_id.into(),
        }
    }
}

/// Partially filled entry form. Every field is optional; validation only
/// happens when the draft is committed as a real entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryDraft {
    pub display_name: Option<String>,
    pub ticker_symbol: Option<String>,
    pub units: Option<Decimal>,
    pub currency: Option<String>,
    pub recorded_value: Option<Decimal>,
    pub base_price_per_unit: Option<Decimal>,
    pub entry_date: Option<NaiveDate>,
}

/// A draft plus the moment it was last saved.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedDraft {
    #[serde(flatten)]
    pub draft: EntryDraft,
    pub saved_at: DateTime<Utc>,
}

/// In-memory draft store shared across services.
#[derive(Clone, Default)]
pub struct DraftStore {
    inner: Arc<DashMap<DraftKey, SavedDraft>>,
}

impl DraftStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Saves a draft, replacing any previous one under the same key.
    /// Returns the save timestamp.
    pub fn save(&self, key: DraftKey, draft: EntryDraft) -> DateTime<Utc> {
        let saved_at = Utc::now();
        self.inner.insert(key, SavedDraft { draft, saved_at });
        saved_at
    }

    /// Returns the draft for a key without removing it. The draft stays
    /// available until explicitly discarded.
    pub fn resume(&self, key: &DraftKey) -> Option<SavedDraft> {
        self.inner.get(key).map(|entry| entry.value().clone())
    }

    /// Discards the draft for a key. Returns true if one existed.
    pub fn discard(&self, key: &DraftKey) -> bool {
        self.inner.remove(key).is_some()
    }

    /// Discards every draft belonging to a tab. Used when the tab is
    /// deleted. Returns the number of drafts removed.
    pub fn discard_for_tab(&self, tab_id: &str) -> usize {
        let before = self.inner.len();
        self.inner.retain(|key, _| key.tab_id != tab_id);
        before - self.inner.len()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}
