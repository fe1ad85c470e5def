//! # Manager Registry
//!
//! Name-indexed collection of managers with default selection, connection
//! lifecycle, lifecycle events and health-check aggregation.
//!
//! ## Overview
//!
//! Callers register managers under unique names and afterwards reach the
//! underlying resources only through the registry. Every operation that takes
//! an optional name falls back to the default manager, which is the first
//! manager ever added unless reassigned with
//! [`set_default_manager`](Registry::set_default_manager).
//!
//! ## Key Features
//!
//! - **Add-only registration**: duplicate names are rejected, never overwritten
//! - **Graceful lookups**: connection, model, connectivity and health lookups
//!   on missing managers return empty results instead of failing
//! - **Ordered events**: `before`/`after` signals around every transition
//! - **Sequential teardown**: `close_all_connections` and `destroy` close one
//!   manager at a time in registration order
//!
//! ## Usage
//!
//! ```rust
//! use storehouse_core::managers::MemoryManager;
//! use storehouse_core::Registry;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = Registry::new();
//! registry.add_manager("main", Arc::new(MemoryManager::new("main")))?;
//!
//! assert_eq!(registry.default_manager(), "main");
//! let connection = registry.get_connection(Some("main"));
//! assert!(connection.is_some());
//!
//! let closed = registry.destroy().await?;
//! assert_eq!(closed, 1);
//! # Ok(())
//! # }
//! ```

use crate::constants::{DEFAULT_EVENT_CHANNEL_CAPACITY, DEFAULT_MANAGER_NAME};
use crate::error::{Result, StorehouseError};
use crate::events::{EventPublisher, ListenerId, RegistryEvent, RegistryEventKind};
use crate::logging::{log_error, log_registry_operation};
use crate::manager::{
    downcast_handle, downcast_manager, Connection, HealthCheckResult, Manager, Model,
};
use futures::FutureExt;
use indexmap::IndexMap;
use parking_lot::RwLock;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Coarse lifecycle state of a registry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryState {
    /// No managers registered
    Empty,
    /// At least one manager registered
    Active,
    /// Torn down by `destroy` and not repopulated since
    Destroyed,
}

#[derive(Default)]
struct RegistryInner {
    managers: IndexMap<String, Arc<dyn Manager>>,
    default_manager: Option<String>,
    destroyed: bool,
}

impl RegistryInner {
    fn default_name(&self) -> &str {
        match self.default_manager.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => DEFAULT_MANAGER_NAME,
        }
    }
}

/// Registry for managing multiple database/storage managers
pub struct Registry {
    id: Uuid,
    inner: RwLock<RegistryInner>,
    events: EventPublisher,
}

impl Registry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::with_event_capacity(DEFAULT_EVENT_CHANNEL_CAPACITY)
    }

    /// Create an empty registry whose broadcast event channel holds `capacity` events
    pub fn with_event_capacity(capacity: usize) -> Self {
        Self {
            id: Uuid::new_v4(),
            inner: RwLock::new(RegistryInner::default()),
            events: EventPublisher::new(capacity),
        }
    }

    /// Create a registry seeded with managers, registered in iteration order
    pub fn with_managers<I, N>(managers: I) -> Result<Self>
    where
        I: IntoIterator<Item = (N, Arc<dyn Manager>)>,
        N: Into<String>,
    {
        let registry = Self::new();
        registry.add_managers(managers)?;
        Ok(registry)
    }

    /// Unique identifier of this registry instance, used in logs
    pub fn id(&self) -> Uuid {
        self.id
    }

    // === Events ===

    /// Register a listener called synchronously for every event of `kind`
    pub fn on<F>(&self, kind: RegistryEventKind, listener: F) -> ListenerId
    where
        F: Fn(&RegistryEvent) + Send + Sync + 'static,
    {
        self.events.on(kind, listener)
    }

    /// Register a listener removed after its first call
    pub fn once<F>(&self, kind: RegistryEventKind, listener: F) -> ListenerId
    where
        F: Fn(&RegistryEvent) + Send + Sync + 'static,
    {
        self.events.once(kind, listener)
    }

    /// Remove a listener; `false` if it was already gone
    pub fn off(&self, id: ListenerId) -> bool {
        self.events.off(id)
    }

    /// Remove listeners for `kind`, or for every kind when `None`
    pub fn remove_all_listeners(&self, kind: Option<RegistryEventKind>) -> usize {
        self.events.remove_all_listeners(kind)
    }

    /// Number of listeners registered for `kind`
    pub fn listener_count(&self, kind: RegistryEventKind) -> usize {
        self.events.listener_count(kind)
    }

    /// Receive every registry event asynchronously
    pub fn subscribe(&self) -> broadcast::Receiver<RegistryEvent> {
        self.events.subscribe()
    }

    /// Underlying event publisher
    pub fn events(&self) -> &EventPublisher {
        &self.events
    }

    fn emit(&self, event: RegistryEvent) {
        self.events.publish(event);
    }

    // === Default manager ===

    /// Name of the default manager, or `"default"` if none was ever assigned
    pub fn default_manager(&self) -> String {
        self.inner.read().default_name().to_string()
    }

    /// Assign the default manager name.
    ///
    /// The name is not required to be registered yet.
    pub fn set_default_manager(&self, name: impl Into<String>) {
        let current = name.into();
        let previous = self.inner.write().default_manager.replace(current.clone());

        info!(registry_id = %self.id, "Set default manager as \"{}\"", current);
        self.emit(RegistryEvent::DefaultManagerChanged { previous, current });
    }

    // === Bookkeeping ===

    /// Names of all registered managers, in registration order
    pub fn manager_names(&self) -> Vec<String> {
        self.inner.read().managers.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.inner.read().managers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().managers.is_empty()
    }

    pub fn state(&self) -> RegistryState {
        let inner = self.inner.read();
        if !inner.managers.is_empty() {
            RegistryState::Active
        } else if inner.destroyed {
            RegistryState::Destroyed
        } else {
            RegistryState::Empty
        }
    }

    /// Add a manager to the registry.
    ///
    /// `ManagerBeforeAdd` is emitted before validation, so it also fires for
    /// registrations that are subsequently rejected.
    pub fn add_manager(&self, name: impl Into<String>, manager: Arc<dyn Manager>) -> Result<()> {
        let name = name.into();
        self.emit(RegistryEvent::ManagerBeforeAdd {
            name: name.clone(),
            manager: manager.clone(),
        });

        if name.is_empty() {
            return Err(StorehouseError::InvalidManagerConfig(
                "Manager name must be a non-empty string".to_string(),
            ));
        }

        let default_change = {
            let mut inner = self.inner.write();
            if inner.managers.contains_key(&name) {
                return Err(StorehouseError::ManagerAlreadyExists(name));
            }
            inner.managers.insert(name.clone(), manager.clone());
            inner.destroyed = false;

            let unset = inner.default_manager.as_deref().map_or(true, str::is_empty);
            if unset {
                Some(inner.default_manager.replace(name.clone()))
            } else {
                None
            }
        };

        log_registry_operation("add_manager", Some(&name), "success", Some(manager.manager_type()));

        if let Some(previous) = default_change {
            info!(registry_id = %self.id, "Set default manager as \"{}\"", name);
            self.emit(RegistryEvent::DefaultManagerChanged {
                previous,
                current: name.clone(),
            });
        }

        self.emit(RegistryEvent::ManagerAdded { name, manager });
        Ok(())
    }

    /// Add multiple managers in iteration order.
    ///
    /// Stops at the first failure; managers added before it stay registered.
    pub fn add_managers<I, N>(&self, managers: I) -> Result<()>
    where
        I: IntoIterator<Item = (N, Arc<dyn Manager>)>,
        N: Into<String>,
    {
        for (name, manager) in managers {
            self.add_manager(name, manager)?;
        }
        Ok(())
    }

    /// Resolve an optional name against the default under a single read lock
    fn lookup(&self, name: Option<&str>) -> (String, Option<Arc<dyn Manager>>) {
        let inner = self.inner.read();
        let resolved = name.unwrap_or_else(|| inner.default_name()).to_string();
        let manager = inner.managers.get(&resolved).cloned();
        (resolved, manager)
    }

    fn snapshot(&self) -> Vec<(String, Arc<dyn Manager>)> {
        self.inner
            .read()
            .managers
            .iter()
            .map(|(name, manager)| (name.clone(), manager.clone()))
            .collect()
    }

    /// Get a manager by name, or the default manager when `name` is `None`
    pub fn get_manager(&self, name: Option<&str>) -> Option<Arc<dyn Manager>> {
        self.lookup(name).1
    }

    /// Like [`get_manager`](Self::get_manager) but fails with `ManagerNotFound`
    /// naming the resolved manager
    pub fn require_manager(&self, name: Option<&str>) -> Result<Arc<dyn Manager>> {
        match self.lookup(name) {
            (_, Some(manager)) => Ok(manager),
            (resolved, None) => Err(StorehouseError::ManagerNotFound(resolved)),
        }
    }

    /// Get a manager as its concrete type; `None` if absent or of another type
    pub fn get_manager_as<T: Manager>(&self, name: Option<&str>) -> Option<Arc<T>> {
        self.get_manager(name).and_then(downcast_manager::<T>)
    }

    pub fn get_default_manager(&self) -> Option<Arc<dyn Manager>> {
        self.get_manager(None)
    }

    pub fn has_manager(&self, name: &str) -> bool {
        self.inner.read().managers.contains_key(name)
    }

    /// Detach a manager without closing its connection.
    ///
    /// The default pointer is left untouched even when the removed manager was
    /// the default; re-adding a manager under that name makes it the default again.
    pub fn remove_manager(&self, name: &str) -> Option<Arc<dyn Manager>> {
        let (removed, was_default) = {
            let mut inner = self.inner.write();
            let removed = inner.managers.shift_remove(name);
            let was_default = inner.default_manager.as_deref() == Some(name);
            (removed, was_default)
        };

        let manager = removed?;
        log_registry_operation("remove_manager", Some(name), "success", None);
        if was_default {
            warn!(
                registry_id = %self.id,
                manager = name,
                "Removed the default manager; default name still points to it"
            );
        }

        self.emit(RegistryEvent::ManagerRemoved {
            name: name.to_string(),
            manager: manager.clone(),
        });
        Some(manager)
    }

    // === Connections ===

    /// Get a connection by manager name, or from the default manager.
    ///
    /// Emits `ConnectionAccessed` whether or not a connection was found.
    pub fn get_connection(&self, name: Option<&str>) -> Option<Connection> {
        let (resolved, manager) = self.lookup(name);
        let connection = manager.and_then(|manager| manager.get_connection());

        self.emit(RegistryEvent::ConnectionAccessed {
            manager: resolved,
            found: connection.is_some(),
        });
        connection
    }

    pub fn get_default_connection(&self) -> Option<Connection> {
        self.get_connection(None)
    }

    /// Get a connection as its concrete type
    pub fn get_connection_as<T: Any + Send + Sync>(&self, name: Option<&str>) -> Option<Arc<T>> {
        self.get_connection(name).and_then(downcast_handle::<T>)
    }

    /// Close one manager's connection.
    ///
    /// Returns `Ok(false)` without emitting anything if the manager is absent.
    /// A close failure is emitted as `ConnectionCloseError` and then returned.
    pub async fn close_connection(&self, name: Option<&str>) -> Result<bool> {
        let (resolved, manager) = self.lookup(name);
        let Some(manager) = manager else {
            debug!(registry_id = %self.id, manager = %resolved, "No manager to close");
            return Ok(false);
        };

        self.emit(RegistryEvent::ConnectionBeforeClose {
            manager: resolved.clone(),
        });

        match manager.close_connection().await {
            Ok(()) => {
                debug!(registry_id = %self.id, manager = %resolved, "Connection closed");
                self.emit(RegistryEvent::ConnectionClosed { manager: resolved });
                Ok(true)
            }
            Err(error) => {
                log_error("Registry", "close_connection", &error.to_string(), Some(&resolved));
                self.emit(RegistryEvent::ConnectionCloseError {
                    manager: resolved,
                    error: error.clone(),
                });
                Err(error)
            }
        }
    }

    pub async fn close_default_connection(&self) -> Result<bool> {
        self.close_connection(None).await
    }

    /// Close every manager's connection, one at a time in registration order.
    ///
    /// Every manager is attempted even if an earlier one fails. Failures are
    /// emitted as `ConnectionCloseError` and reported together as
    /// `CloseAllFailed`; `ConnectionsClosedAll` carries the number of
    /// successful closes.
    pub async fn close_all_connections(&self) -> Result<usize> {
        self.emit(RegistryEvent::ConnectionsBeforeCloseAll);

        let mut closed = 0;
        let mut failures = Vec::new();
        for (name, manager) in self.snapshot() {
            match manager.close_connection().await {
                Ok(()) => closed += 1,
                Err(error) => {
                    log_error("Registry", "close_all_connections", &error.to_string(), Some(&name));
                    failures.push(format!("{name}: {error}"));
                    self.emit(RegistryEvent::ConnectionCloseError {
                        manager: name,
                        error,
                    });
                }
            }
        }
        info!(registry_id = %self.id, "Closed {} manager(s)", closed);

        self.emit(RegistryEvent::ConnectionsClosedAll { count: closed });

        if failures.is_empty() {
            Ok(closed)
        } else {
            Err(StorehouseError::CloseAllFailed { closed, failures })
        }
    }

    /// Alias of [`close_all_connections`](Self::close_all_connections)
    pub async fn close(&self) -> Result<usize> {
        self.close_all_connections().await
    }

    /// Close all connections and remove all managers.
    ///
    /// The registry is emptied and the default name reset even when some
    /// connections failed to close; that failure is returned afterwards.
    pub async fn destroy(&self) -> Result<usize> {
        self.emit(RegistryEvent::RegistryBeforeDestroy);

        let outcome = self.close_all_connections().await;

        let removed = {
            let mut inner = self.inner.write();
            let removed = inner.managers.len();
            inner.default_manager = None;
            inner.managers.clear();
            inner.destroyed = true;
            removed
        };

        let count = match &outcome {
            Ok(count) => *count,
            Err(StorehouseError::CloseAllFailed { closed, .. }) => *closed,
            Err(_) => 0,
        };
        log_registry_operation(
            "destroy",
            None,
            if outcome.is_ok() { "success" } else { "partial" },
            Some(&format!("Removed {removed} manager(s)")),
        );

        self.emit(RegistryEvent::RegistryDestroyed { count });
        outcome
    }

    // === Models ===

    /// Get a model from a manager.
    ///
    /// With `model` absent, `manager_or_model` is the model name and the default
    /// manager is searched; otherwise `manager_or_model` names the manager.
    pub fn get_model(&self, manager_or_model: &str, model: Option<&str>) -> Option<Model> {
        let (search_manager, search_model) = match model {
            Some(model) => (Some(manager_or_model), model),
            None => (None, manager_or_model),
        };

        let result = match self.get_manager(search_manager) {
            Some(manager) => match manager.as_model_provider() {
                Some(provider) => provider.get_model(search_model),
                None => None,
            },
            None => None,
        };

        self.emit(RegistryEvent::ModelAccessed {
            manager: search_manager.map(str::to_string),
            model: search_model.to_string(),
            found: result.is_some(),
        });
        result
    }

    /// Get a model as its concrete type
    pub fn get_model_as<T: Any + Send + Sync>(
        &self,
        manager_or_model: &str,
        model: Option<&str>,
    ) -> Option<Arc<T>> {
        self.get_model(manager_or_model, model)
            .and_then(downcast_handle::<T>)
    }

    /// Like [`get_model`](Self::get_model) but fails with `ModelNotFound`
    pub fn require_model(&self, manager_or_model: &str, model: Option<&str>) -> Result<Model> {
        self.get_model(manager_or_model, model)
            .ok_or_else(|| match model {
                Some(model) => StorehouseError::ModelNotFound {
                    model: model.to_string(),
                    manager: Some(manager_or_model.to_string()),
                },
                None => StorehouseError::ModelNotFound {
                    model: manager_or_model.to_string(),
                    manager: None,
                },
            })
    }

    // === Health ===

    /// Whether a manager reports an active connection; false if absent or unsupported
    pub fn is_connected(&self, name: Option<&str>) -> bool {
        self.get_manager(name)
            .map(|manager| {
                manager
                    .as_connection_status()
                    .map_or(false, |status| status.is_connected())
            })
            .unwrap_or(false)
    }

    /// Run one manager's health check.
    ///
    /// `Ok(None)` if the manager is absent or has no health check. Errors from
    /// the check itself are returned unchanged.
    pub async fn health_check(&self, name: Option<&str>) -> Result<Option<HealthCheckResult>> {
        let Some(manager) = self.get_manager(name) else {
            return Ok(None);
        };
        let Some(checker) = manager.as_health_check() else {
            return Ok(None);
        };
        checker.health_check().await.map(Some)
    }

    /// Run every supported health check sequentially, keyed by manager name.
    ///
    /// Never fails: an error or panic inside a check becomes an unhealthy result.
    pub async fn health_check_all(&self) -> IndexMap<String, HealthCheckResult> {
        let mut results = IndexMap::new();

        for (name, manager) in self.snapshot() {
            let Some(checker) = manager.as_health_check() else {
                continue;
            };

            let result = match AssertUnwindSafe(checker.health_check()).catch_unwind().await {
                Ok(Ok(result)) => result,
                Ok(Err(error)) => {
                    warn!(registry_id = %self.id, manager = %name, error = %error, "Health check failed");
                    HealthCheckResult::from_failure(error)
                }
                Err(panic) => {
                    let message = panic_message(panic.as_ref());
                    warn!(registry_id = %self.id, manager = %name, panic = %message, "Health check panicked");
                    HealthCheckResult::from_failure(message)
                }
            };
            results.insert(name, result);
        }

        results
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.read();
        f.debug_struct("Registry")
            .field("id", &self.id)
            .field("managers", &inner.managers.keys().collect::<Vec<_>>())
            .field("default_manager", &inner.default_manager)
            .field("events", &self.events)
            .finish()
    }
}
