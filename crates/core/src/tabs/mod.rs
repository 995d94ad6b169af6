//! Tabs module - isolated holdings workspaces.

mod tabs_model;
mod tabs_registry;
mod tabs_service;
mod tabs_traits;

#[cfg(test)]
mod tabs_service_tests;

// Re-export the public interface
pub use tabs_model::{NewTab, Tab, TabSwitch, TabUpdate};
pub use tabs_registry::TabRegistry;
pub use tabs_service::TabService;
pub use tabs_traits::{TabRepositoryTrait, TabServiceTrait};
