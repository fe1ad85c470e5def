//! Builds populated registries from manager settings or configuration.

use super::manager_factory::{ManagerFactory, ManagerSettings};
use crate::config::StorehouseConfig;
use crate::error::Result;
use crate::manager::Manager;
use crate::registry::Registry;
use std::sync::Arc;
use tracing::info;

/// Factory for creating registries with pre-configured managers
#[derive(Debug, Default)]
pub struct RegistryFactory {
    manager_factory: ManagerFactory,
}

impl RegistryFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_manager_factory(manager_factory: ManagerFactory) -> Self {
        Self { manager_factory }
    }

    /// The manager factory used to build every manager
    pub fn manager_factory(&self) -> &ManagerFactory {
        &self.manager_factory
    }

    /// Build every manager, in order, before anything is registered
    pub fn build_managers<I, N>(&self, settings: I) -> Result<Vec<(String, Arc<dyn Manager>)>>
    where
        I: IntoIterator<Item = (N, ManagerSettings)>,
        N: Into<String>,
    {
        settings
            .into_iter()
            .map(|(name, settings)| {
                let name = name.into();
                let settings = if settings.name.is_none() {
                    settings.with_name(name.clone())
                } else {
                    settings
                };
                let manager = self.manager_factory.get_manager(settings)?;
                Ok((name, manager))
            })
            .collect()
    }

    /// Create a registry seeded with managers built from `settings`.
    ///
    /// A construction failure aborts before any registry is created.
    pub fn get_registry<I, N>(&self, settings: I) -> Result<Registry>
    where
        I: IntoIterator<Item = (N, ManagerSettings)>,
        N: Into<String>,
    {
        let managers = self.build_managers(settings)?;
        Registry::with_managers(managers)
    }

    /// Create a registry from configuration, honouring `default_manager` and
    /// the event channel capacity
    pub fn from_config(&self, config: &StorehouseConfig) -> Result<Registry> {
        config.validate()?;

        let managers = self.build_managers(
            config
                .managers
                .iter()
                .map(|(key, definition)| (key.clone(), definition.to_settings(key))),
        )?;

        let registry = Registry::with_event_capacity(config.events.channel_capacity);
        registry.add_managers(managers)?;

        if let Some(default_manager) = &config.default_manager {
            if registry.default_manager() != *default_manager {
                registry.set_default_manager(default_manager.clone());
            }
        }

        info!(
            registry_id = %registry.id(),
            managers = registry.len(),
            default_manager = %registry.default_manager(),
            "Registry built from configuration"
        );
        Ok(registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StorehouseError;
    use crate::factory::ManagerDefinition;
    use crate::managers::MemoryManager;

    fn factory() -> RegistryFactory {
        let factory = RegistryFactory::new();
        factory.manager_factory().set_manager_type::<MemoryManager>();
        factory
    }

    #[test]
    fn test_get_registry_in_order() {
        let registry = factory()
            .get_registry([
                ("main", ManagerSettings::named("memory")),
                ("cache", ManagerSettings::named("memory")),
            ])
            .unwrap();

        assert_eq!(registry.manager_names(), vec!["main", "cache"]);
        assert_eq!(registry.default_manager(), "main");
    }

    #[test]
    fn test_get_registry_aborts_on_unknown_type() {
        let result = factory().get_registry([
            ("main", ManagerSettings::named("memory")),
            ("other", ManagerSettings::named("redis")),
        ]);
        assert_eq!(
            result.unwrap_err(),
            StorehouseError::ManagerTypeNotFound("redis".to_string())
        );
    }

    #[test]
    fn test_from_config_applies_default_and_names() {
        let mut config = StorehouseConfig::default();
        config
            .managers
            .insert("main".to_string(), ManagerDefinition::new("memory"));
        config
            .managers
            .insert("cache".to_string(), ManagerDefinition::new("memory"));
        config.default_manager = Some("cache".to_string());

        let registry = factory().from_config(&config).unwrap();
        assert_eq!(registry.default_manager(), "cache");

        let main = registry.get_manager_as::<MemoryManager>(Some("main")).unwrap();
        assert_eq!(main.name(), "main");
    }
}
