//! # Manager Factory
//!
//! Builds managers from settings, either through a type tag registered ahead of
//! time or through a constructor supplied inline.
//!
//! ## Usage
//!
//! ```rust
//! use storehouse_core::factory::{ManagerFactory, ManagerSettings};
//! use storehouse_core::managers::MemoryManager;
//! use serde_json::json;
//!
//! # fn example() -> storehouse_core::Result<()> {
//! let factory = ManagerFactory::new();
//! factory.set_manager_type::<MemoryManager>();
//!
//! let manager = factory.get_manager(
//!     ManagerSettings::named("memory")
//!         .with_name("cache")
//!         .with_config(json!({ "connected": true })),
//! )?;
//! assert_eq!(manager.manager_type(), "memory");
//! # Ok(())
//! # }
//! ```

use crate::error::{Result, StorehouseError};
use crate::manager::Manager;
use indexmap::IndexMap;
use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// Closure building a manager from its arguments
pub type ManagerConstructor = Arc<dyn Fn(ManagerArgs) -> Result<Arc<dyn Manager>> + Send + Sync>;

/// Arguments handed to a manager constructor
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ManagerArgs {
    /// Name the manager will be registered under, when known
    pub name: Option<String>,
    /// Manager-specific configuration, `Null` when none was given
    pub config: Value,
}

impl ManagerArgs {
    pub fn new(name: Option<String>, config: Value) -> Self {
        Self { name, config }
    }

    /// Deserialize the configuration into a typed struct.
    ///
    /// A missing (`Null`) configuration deserializes as an empty object so
    /// structs whose fields all have defaults still load.
    pub fn config_as<T: DeserializeOwned>(&self) -> Result<T> {
        let value = match &self.config {
            Value::Null => Value::Object(serde_json::Map::new()),
            other => other.clone(),
        };
        serde_json::from_value(value).map_err(|e| {
            StorehouseError::InvalidManagerConfig(format!(
                "Invalid configuration for manager {}: {e}",
                self.name.as_deref().unwrap_or("<unnamed>")
            ))
        })
    }
}

/// A manager implementation the factory can build by type tag
pub trait ManagerType: Manager + Sized {
    /// Type tag used in settings and configuration files.
    ///
    /// When `None`, the Rust type name (last path segment) is used.
    const TYPE: Option<&'static str> = None;

    fn from_args(args: ManagerArgs) -> Result<Self>;
}

/// Resolve the tag a [`ManagerType`] is registered under
pub fn type_tag<T: ManagerType>() -> &'static str {
    match T::TYPE {
        Some(tag) => tag,
        None => {
            let full = std::any::type_name::<T>();
            full.rsplit("::").next().unwrap_or(full)
        }
    }
}

/// How the factory should obtain a manager
#[derive(Clone)]
pub enum ManagerKind {
    /// Look up a registered type tag
    Named(String),
    /// Call the given constructor directly
    Constructor(ManagerConstructor),
}

impl std::fmt::Debug for ManagerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Named(tag) => f.debug_tuple("Named").field(tag).finish(),
            Self::Constructor(_) => f.write_str("Constructor(<fn>)"),
        }
    }
}

/// Settings for a single [`ManagerFactory::get_manager`] call
#[derive(Debug, Clone)]
pub struct ManagerSettings {
    pub kind: ManagerKind,
    pub name: Option<String>,
    pub config: Value,
}

impl ManagerSettings {
    /// Settings resolving a registered type tag
    pub fn named(manager_type: impl Into<String>) -> Self {
        Self {
            kind: ManagerKind::Named(manager_type.into()),
            name: None,
            config: Value::Null,
        }
    }

    /// Settings calling `constructor` directly
    pub fn with_constructor<F>(constructor: F) -> Self
    where
        F: Fn(ManagerArgs) -> Result<Arc<dyn Manager>> + Send + Sync + 'static,
    {
        Self {
            kind: ManagerKind::Constructor(Arc::new(constructor)),
            name: None,
            config: Value::Null,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_config(mut self, config: Value) -> Self {
        self.config = config;
        self
    }
}

/// Serializable manager description used in configuration files
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ManagerDefinition {
    /// Registered type tag
    #[serde(rename = "type")]
    pub manager_type: String,

    /// Name passed to the constructor; defaults to the registry key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Manager-specific configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<Value>,
}

impl ManagerDefinition {
    pub fn new(manager_type: impl Into<String>) -> Self {
        Self {
            manager_type: manager_type.into(),
            name: None,
            config: None,
        }
    }

    /// Convert into factory settings for the manager registered under `key`
    pub fn to_settings(&self, key: &str) -> ManagerSettings {
        ManagerSettings {
            kind: ManagerKind::Named(self.manager_type.clone()),
            name: Some(self.name.clone().unwrap_or_else(|| key.to_string())),
            config: self.config.clone().unwrap_or(Value::Null),
        }
    }
}

/// Factory for creating manager instances from registered types
#[derive(Default)]
pub struct ManagerFactory {
    constructors: RwLock<IndexMap<String, ManagerConstructor>>,
}

impl ManagerFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a manager instance from settings.
    ///
    /// Errors raised by a registered type's constructor are returned unchanged;
    /// errors from an inline constructor are wrapped in `InvalidManagerConfig`.
    pub fn get_manager(&self, settings: ManagerSettings) -> Result<Arc<dyn Manager>> {
        let ManagerSettings { kind, name, config } = settings;
        let args = ManagerArgs::new(name, config);

        match kind {
            ManagerKind::Named(tag) => {
                if tag.is_empty() {
                    return Err(StorehouseError::InvalidManagerConfig(
                        "Manager type is required".to_string(),
                    ));
                }
                let constructor = self
                    .constructors
                    .read()
                    .get(&tag)
                    .cloned()
                    .ok_or_else(|| StorehouseError::ManagerTypeNotFound(tag.clone()))?;

                debug!(manager_type = %tag, name = ?args.name, "Building manager");
                constructor(args)
            }
            ManagerKind::Constructor(constructor) => constructor(args).map_err(|e| {
                StorehouseError::InvalidManagerConfig(format!("Failed to instantiate manager: {e}"))
            }),
        }
    }

    /// Register a manager type under [`type_tag`], replacing any previous entry
    pub fn set_manager_type<T: ManagerType>(&self) -> &Self {
        let constructor: ManagerConstructor =
            Arc::new(|args: ManagerArgs| -> Result<Arc<dyn Manager>> {
                Ok(Arc::new(T::from_args(args)?))
            });
        self.set_manager_constructor(type_tag::<T>(), constructor)
    }

    /// Register an arbitrary constructor under `tag`
    pub fn set_manager_constructor(&self, tag: impl Into<String>, constructor: ManagerConstructor) -> &Self {
        let tag = tag.into();
        debug!(manager_type = %tag, "Registering manager type");
        self.constructors.write().insert(tag, constructor);
        self
    }

    /// Remove a registered type tag; false if it was not registered
    pub fn remove_manager_type(&self, tag: &str) -> bool {
        self.constructors.write().shift_remove(tag).is_some()
    }

    pub fn remove_manager_type_of<T: ManagerType>(&self) -> bool {
        self.remove_manager_type(type_tag::<T>())
    }

    pub fn has_manager_type(&self, tag: &str) -> bool {
        self.constructors.read().contains_key(tag)
    }

    /// Registered type tags in registration order
    pub fn manager_types(&self) -> Vec<String> {
        self.constructors.read().keys().cloned().collect()
    }
}

impl std::fmt::Debug for ManagerFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManagerFactory")
            .field("manager_types", &self.manager_types())
            .finish()
    }
}
