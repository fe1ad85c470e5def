#![allow(clippy::doc_markdown)] // Allow technical terms like PostgreSQL, SQLx in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Storehouse Core
//!
//! A registry of named storage managers for async Rust services.
//!
//! ## Overview
//!
//! Applications talk to several storage backends at once: a primary database,
//! a cache, an in-memory store. Storehouse gives each of them a name, keeps a
//! default, and owns their connection lifecycle so that shutdown, health
//! reporting and lookups go through a single object.
//!
//! ## Architecture
//!
//! ```text
//! Storehouse
//! ├── ManagerFactory   type tag → constructor
//! └── Registry         name → Arc<dyn Manager>
//!     ├── default manager
//!     └── EventPublisher (sync listeners + broadcast)
//! ```
//!
//! ## Module Organization
//!
//! - [`manager`] - The `Manager` contract and its optional capabilities
//! - [`registry`] - The manager registry
//! - [`factory`] - Manager/registry factories and the `Storehouse` root
//! - [`managers`] - Built-in memory and PostgreSQL managers
//! - [`events`] - Lifecycle events and listeners
//! - [`config`] - Configuration loading
//! - [`error`] - Structured error handling
//! - [`logging`] - Structured logging setup
//!
//! ## Quick Start
//!
//! ```rust
//! use storehouse_core::factory::{ManagerSettings, Storehouse};
//! use storehouse_core::managers::MemoryManager;
//! use storehouse_core::RegistryEventKind;
//!
//! # async fn example() -> storehouse_core::Result<()> {
//! let storehouse = Storehouse::new();
//! storehouse.set_manager_type::<MemoryManager>();
//!
//! storehouse.on(RegistryEventKind::ManagerAdded, |event| {
//!     println!("{}", event.name());
//! });
//!
//! storehouse.add([
//!     ("main", ManagerSettings::named("memory")),
//!     ("cache", ManagerSettings::named("memory")),
//! ])?;
//!
//! let health = storehouse.health_check_all().await;
//! assert!(health.values().all(|result| result.healthy));
//!
//! storehouse.destroy().await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Testing
//!
//! ```bash
//! cargo test --lib    # Unit tests
//! cargo test          # All tests
//! ```

pub mod config;
pub mod constants;
pub mod error;
pub mod events;
pub mod factory;
pub mod logging;
pub mod manager;
pub mod managers;
pub mod registry;

pub use config::{ConfigLoader, StorehouseConfig};
pub use error::{Result, StorehouseError};
pub use events::{EventPublisher, ListenerId, RegistryEvent, RegistryEventKind};
pub use factory::{
    ManagerArgs, ManagerDefinition, ManagerFactory, ManagerSettings, ManagerType,
    RegistryFactory, Storehouse,
};
pub use manager::{
    Connection, ConnectionStatus, HealthCheck, HealthCheckResult, Manager, Model, ModelProvider,
};
pub use registry::{Registry, RegistryState};
