//! # Storehouse
//!
//! Composition root pairing a shared [`Registry`] with the
//! [`ManagerFactory`] that populates it. Applications create one per subsystem
//! and pass it (or its `Arc<Registry>`) to whatever needs storage access.
//!
//! ```rust
//! use storehouse_core::factory::{ManagerSettings, Storehouse};
//! use storehouse_core::managers::MemoryManager;
//!
//! # async fn example() -> storehouse_core::Result<()> {
//! let storehouse = Storehouse::new();
//! storehouse.set_manager_type::<MemoryManager>();
//! storehouse.add([("main", ManagerSettings::named("memory"))])?;
//!
//! // Registry methods are available directly
//! assert!(storehouse.is_connected(None));
//! storehouse.destroy().await?;
//! # Ok(())
//! # }
//! ```

use super::manager_factory::{ManagerConstructor, ManagerFactory, ManagerSettings, ManagerType};
use super::registry_factory::RegistryFactory;
use crate::config::StorehouseConfig;
use crate::error::Result;
use crate::registry::Registry;
use std::ops::Deref;
use std::sync::Arc;

#[derive(Debug)]
pub struct Storehouse {
    registry: Arc<Registry>,
    factory: RegistryFactory,
}

impl Storehouse {
    pub fn new() -> Self {
        Self::with_registry(Arc::new(Registry::new()))
    }

    pub fn with_event_capacity(capacity: usize) -> Self {
        Self::with_registry(Arc::new(Registry::with_event_capacity(capacity)))
    }

    /// Wrap an existing registry
    pub fn with_registry(registry: Arc<Registry>) -> Self {
        Self {
            registry,
            factory: RegistryFactory::new(),
        }
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    pub fn manager_factory(&self) -> &ManagerFactory {
        self.factory.manager_factory()
    }

    pub fn set_manager_type<T: ManagerType>(&self) -> &Self {
        self.manager_factory().set_manager_type::<T>();
        self
    }

    pub fn set_manager_constructor(&self, tag: impl Into<String>, constructor: ManagerConstructor) -> &Self {
        self.manager_factory().set_manager_constructor(tag, constructor);
        self
    }

    /// Build managers from settings and register them in order.
    ///
    /// Every manager is built before the first one is registered.
    pub fn add<I, N>(&self, settings: I) -> Result<()>
    where
        I: IntoIterator<Item = (N, ManagerSettings)>,
        N: Into<String>,
    {
        let managers = self.factory.build_managers(settings)?;
        self.registry.add_managers(managers)
    }

    /// Register the managers described by `config` and apply its default manager.
    ///
    /// The event channel capacity is fixed when the storehouse is created; use
    /// [`Storehouse::with_event_capacity`] to honour it.
    pub fn configure(&self, config: &StorehouseConfig) -> Result<()> {
        config.validate()?;
        self.add(
            config
                .managers
                .iter()
                .map(|(key, definition)| (key.clone(), definition.to_settings(key))),
        )?;

        if let Some(default_manager) = &config.default_manager {
            if self.registry.default_manager() != *default_manager {
                self.registry.set_default_manager(default_manager.clone());
            }
        }
        Ok(())
    }
}

impl Default for Storehouse {
    fn default() -> Self {
        Self::new()
    }
}

impl Deref for Storehouse {
    type Target = Registry;

    fn deref(&self) -> &Registry {
        &self.registry
    }
}
