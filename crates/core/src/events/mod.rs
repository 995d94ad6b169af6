//! Domain events module.
//!
//! Provides domain event types and the sink trait for emitting events
//! after successful domain mutations. Embedding runtimes implement the
//! sink to translate domain events into platform-specific actions
//! (view refresh, change feeds, etc.).

mod domain_event;
mod sink;

pub use domain_event::*;
pub use sink::*;
