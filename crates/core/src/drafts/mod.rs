//! Drafts module - in-progress entry forms that survive navigation.

mod draft_store;

// Re-export the public interface
pub use draft_store::{DraftKey, DraftStore, EntryDraft, SavedDraft};
