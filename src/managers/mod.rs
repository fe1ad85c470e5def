//! # Reference Managers
//!
//! Ready-made [`Manager`](crate::Manager) implementations, registered with a
//! factory by type tag:
//!
//! - `"memory"` → [`MemoryManager`]
//! - `"postgres"` → [`PostgresManager`] (feature `postgres`)

pub mod memory;
#[cfg(feature = "postgres")]
pub mod postgres;

pub use memory::{MemoryConnection, MemoryManager, MemoryManagerConfig, MemoryModel};
#[cfg(feature = "postgres")]
pub use postgres::{PostgresManager, PostgresManagerConfig};

use crate::factory::ManagerFactory;

/// Register every built-in manager type with `factory`
pub fn register_builtin_types(factory: &ManagerFactory) {
    factory.set_manager_type::<MemoryManager>();
    #[cfg(feature = "postgres")]
    factory.set_manager_type::<PostgresManager>();
}
