//! # Storehouse Configuration
//!
//! Declarative description of a registry: which managers to build, which one is
//! the default, and how the event channel is sized.
//!
//! ## Architecture
//!
//! - **Layered sources**: an optional configuration file, then `STOREHOUSE__*`
//!   environment variables (see [`ConfigLoader`])
//! - **Ordered managers**: managers are registered in file order, so the first
//!   one listed becomes the default unless `default_manager` says otherwise
//! - **Explicit validation**: loading fails instead of silently falling back
//!
//! ## Usage
//!
//! ```rust,no_run
//! use storehouse_core::config::ConfigLoader;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ConfigLoader::new().with_file("config/storehouse.toml").load()?;
//! println!("{} manager(s) configured", config.managers.len());
//! # Ok(())
//! # }
//! ```
//!
//! ```toml
//! default_manager = "cache"
//!
//! [events]
//! channel_capacity = 256
//!
//! [managers.main]
//! type = "postgres"
//! config = { url = "postgresql://localhost/app", max_connections = 5 }
//!
//! [managers.cache]
//! type = "memory"
//! ```

pub mod loader;

pub use loader::ConfigLoader;

use crate::constants::DEFAULT_EVENT_CHANNEL_CAPACITY;
use crate::error::{Result, StorehouseError};
use crate::factory::ManagerDefinition;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Root configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StorehouseConfig {
    /// Deployment environment (development, test, production)
    pub environment: String,

    /// Manager to select when no name is given; defaults to the first registered
    pub default_manager: Option<String>,

    /// Event channel settings
    pub events: EventsConfig,

    /// Managers to build, keyed by registry name, in registration order
    pub managers: IndexMap<String, ManagerDefinition>,
}

/// Event channel configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EventsConfig {
    /// Capacity of the broadcast mirror of registry events
    pub channel_capacity: usize,
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            channel_capacity: DEFAULT_EVENT_CHANNEL_CAPACITY,
        }
    }
}

impl Default for StorehouseConfig {
    fn default() -> Self {
        Self {
            environment: crate::logging::get_environment(),
            default_manager: None,
            events: EventsConfig::default(),
            managers: IndexMap::new(),
        }
    }
}

impl StorehouseConfig {
    /// Validate configuration after loading
    pub fn validate(&self) -> Result<()> {
        if self.events.channel_capacity == 0 {
            return Err(StorehouseError::ConfigurationError(
                "events.channel_capacity must be greater than 0".to_string(),
            ));
        }

        for (name, definition) in &self.managers {
            if name.is_empty() {
                return Err(StorehouseError::ConfigurationError(
                    "Manager names must be non-empty".to_string(),
                ));
            }
            if definition.manager_type.is_empty() {
                return Err(StorehouseError::ConfigurationError(format!(
                    "managers.{name}.type is required"
                )));
            }
        }

        if let Some(default_manager) = &self.default_manager {
            if !self.managers.contains_key(default_manager) {
                return Err(StorehouseError::ConfigurationError(format!(
                    "default_manager \"{default_manager}\" does not name a configured manager"
                )));
            }
        }

        Ok(())
    }
}
