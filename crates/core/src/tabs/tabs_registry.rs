//! Active-tab tracking and the generation token.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

/// Tracks which tab is active and hands out generation tokens.
///
/// Every switch bumps the generation. Asynchronous loads snapshot the
/// generation when they start; a result arriving under an older generation
/// is discarded instead of applied. There is no request cancellation - the
/// token check is the substitute.
///
/// Cloning is cheap and all clones share the same state.
#[derive(Clone, Default)]
pub struct TabRegistry {
    inner: Arc<RegistryInner>,
}

#[derive(Default)]
struct RegistryInner {
    active_tab_id: RwLock<Option<String>>,
    generation: AtomicU64,
}

impl TabRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The currently active tab, if any.
    pub fn active_tab_id(&self) -> Option<String> {
        self.inner.active_tab_id.read().unwrap().clone()
    }

    /// Makes a tab (or no tab at all) active and returns the new generation
    /// token. Work started for the previous tab becomes stale immediately.
    pub fn switch_to(&self, tab_id: Option<String>) -> u64 {
        let mut active = self.inner.active_tab_id.write().unwrap();
        *active = tab_id;
        self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// The latest generation token.
    pub fn generation(&self) -> u64 {
        self.inner.generation.load(Ordering::SeqCst)
    }

    /// True when the token still matches the latest switch.
    pub fn is_current(&self, generation: u64) -> bool {
        self.generation() == generation
    }
}
