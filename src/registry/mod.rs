//! # Registry Infrastructure
//!
//! The central collection of named managers.
//!
//! ## Architecture
//!
//! ```text
//! Registry
//! ├── managers         (IndexMap, registration order)
//! ├── default_manager  (first added unless reassigned)
//! └── EventPublisher   (sync listeners + broadcast mirror)
//! ```
//!
//! Registry methods take `&self`; internal state sits behind a lock that is
//! never held across an `.await` or while listeners run, so a registry can be
//! shared as `Arc<Registry>` and listeners may call back into it.

pub mod manager_registry;

pub use manager_registry::{Registry, RegistryState};
