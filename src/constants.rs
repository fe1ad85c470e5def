//! # System Constants
//!
//! Names and defaults shared by the registry, its event channel and the
//! configuration layer.

/// Name reported by the registry when no default manager has been assigned
pub const DEFAULT_MANAGER_NAME: &str = "default";

/// Capacity of the broadcast channel that mirrors registry events
pub const DEFAULT_EVENT_CHANNEL_CAPACITY: usize = 1000;

/// Prefix of the message produced when a manager's health check fails outright
pub const HEALTH_CHECK_ERROR_PREFIX: &str = "Health check threw error";

/// Environment variable prefix for configuration overrides (`STOREHOUSE__...`)
pub const CONFIG_ENV_PREFIX: &str = "STOREHOUSE";

/// Separator for nested configuration keys in environment variables
pub const CONFIG_ENV_SEPARATOR: &str = "__";

/// Wire names of the registry lifecycle events
pub mod events {
    // Manager bookkeeping
    pub const MANAGER_BEFORE_ADD: &str = "manager:before:add";
    pub const MANAGER_ADDED: &str = "manager:added";
    pub const MANAGER_REMOVED: &str = "manager:removed";
    pub const MANAGER_DEFAULT_CHANGED: &str = "manager:default:changed";

    // Connection lifecycle
    pub const CONNECTION_BEFORE_CLOSE: &str = "connection:before:close";
    pub const CONNECTION_CLOSED: &str = "connection:closed";
    pub const CONNECTION_ERROR_CLOSE: &str = "connection:error:close";
    pub const CONNECTION_ACCESSED: &str = "connection:accessed";
    pub const CONNECTIONS_BEFORE_CLOSE_ALL: &str = "connections:before:close:all";
    pub const CONNECTIONS_CLOSED_ALL: &str = "connections:closed:all";

    // Models
    pub const MODEL_ACCESSED: &str = "model:accessed";

    // Registry teardown
    pub const REGISTRY_BEFORE_DESTROY: &str = "registry:before:destroy";
    pub const REGISTRY_DESTROYED: &str = "registry:destroyed";
}
