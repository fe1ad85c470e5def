//! # Factories
//!
//! Construction of managers and registries from settings or configuration.
//!
//! - [`ManagerFactory`]: type tag → constructor lookup
//! - [`RegistryFactory`]: builds every manager, then seeds a new [`Registry`](crate::Registry)
//! - [`Storehouse`]: a registry plus the factory that populates it

pub mod manager_factory;
pub mod registry_factory;
pub mod storehouse;

pub use manager_factory::{
    type_tag, ManagerArgs, ManagerConstructor, ManagerDefinition, ManagerFactory, ManagerKind,
    ManagerSettings, ManagerType,
};
pub use registry_factory::RegistryFactory;
pub use storehouse::Storehouse;
