//! # Registry Events
//!
//! Lifecycle notifications emitted by the [`Registry`](crate::registry::Registry).
//!
//! Listeners are registered per [`RegistryEventKind`] and run synchronously, in
//! registration order, on the thread performing the registry operation. A
//! panicking listener unwinds out of the registry call that triggered it.
//! Async consumers can instead [`subscribe`](EventPublisher::subscribe) to a
//! broadcast mirror of every event.

pub mod publisher;
pub mod types;

// Re-export key types for convenience
pub use publisher::{EventPublisher, Listener, ListenerId};
pub use types::{RegistryEvent, RegistryEventKind};
