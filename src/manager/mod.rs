//! # Manager Contract
//!
//! Capability interfaces every registered resource handle satisfies.
//!
//! ## Overview
//!
//! A manager wraps one external resource (usually a database client or pool).
//! The registry only ever talks to it through this contract:
//!
//! - [`Manager`] is required: a connection accessor and an async close.
//! - [`ModelProvider`], [`ConnectionStatus`] and [`HealthCheck`] are optional
//!   extensions. A manager advertises them by overriding the matching `as_*`
//!   accessor; the registry probes for them at call time and treats a `None`
//!   as "capability absent".
//!
//! Connections and models cross the registry boundary type-erased
//! ([`Connection`], [`Model`]) and are recovered with [`downcast_handle`].
//!
//! ## Usage
//!
//! ```rust
//! use async_trait::async_trait;
//! use storehouse_core::manager::{Connection, ConnectionStatus, Manager};
//! use std::sync::atomic::{AtomicBool, Ordering};
//! use std::sync::Arc;
//!
//! struct FileManager {
//!     path: Arc<String>,
//!     open: AtomicBool,
//! }
//!
//! #[async_trait]
//! impl Manager for FileManager {
//!     fn get_connection(&self) -> Option<Connection> {
//!         Some(self.path.clone())
//!     }
//!
//!     async fn close_connection(&self) -> storehouse_core::Result<()> {
//!         self.open.store(false, Ordering::SeqCst);
//!         Ok(())
//!     }
//!
//!     fn as_connection_status(&self) -> Option<&dyn ConnectionStatus> {
//!         Some(self)
//!     }
//! }
//!
//! impl ConnectionStatus for FileManager {
//!     fn is_connected(&self) -> bool {
//!         self.open.load(Ordering::SeqCst)
//!     }
//! }
//! ```

pub mod health;

pub use health::HealthCheckResult;

use crate::error::Result;
use async_trait::async_trait;
use std::any::Any;
use std::sync::Arc;

/// Type-erased connection handle returned by [`Manager::get_connection`]
pub type Connection = Arc<dyn Any + Send + Sync>;

/// Type-erased model handle returned by [`ModelProvider::get_model`]
pub type Model = Arc<dyn Any + Send + Sync>;

/// Upcast support for managers so the registry can hand back concrete types
pub trait AsAny: Any + Send + Sync {
    fn as_any(&self) -> &dyn Any;

    fn into_any_arc(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

impl<T: Any + Send + Sync> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any_arc(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

/// Required capability of every registered manager
#[async_trait]
pub trait Manager: AsAny {
    /// Underlying connection/client, `None` when the manager has nothing to hand out
    fn get_connection(&self) -> Option<Connection>;

    /// Close the connection gracefully
    async fn close_connection(&self) -> Result<()>;

    /// Short type tag used in logs
    fn manager_type(&self) -> &str {
        std::any::type_name::<Self>()
    }

    fn as_model_provider(&self) -> Option<&dyn ModelProvider> {
        None
    }

    fn as_connection_status(&self) -> Option<&dyn ConnectionStatus> {
        None
    }

    fn as_health_check(&self) -> Option<&dyn HealthCheck> {
        None
    }
}

impl std::fmt::Debug for dyn Manager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Manager")
            .field("type", &self.manager_type())
            .finish()
    }
}

/// Optional: named models (collections, tables, schemas) exposed by a manager
pub trait ModelProvider: Send + Sync {
    fn get_model(&self, name: &str) -> Option<Model>;
}

/// Optional: cheap, synchronous connectivity probe
pub trait ConnectionStatus: Send + Sync {
    fn is_connected(&self) -> bool;
}

/// Optional: on-demand diagnostic of the underlying resource
#[async_trait]
pub trait HealthCheck: Send + Sync {
    async fn health_check(&self) -> Result<HealthCheckResult>;
}

/// Recover the concrete type behind a type-erased connection or model
pub fn downcast_handle<T: Any + Send + Sync>(handle: Arc<dyn Any + Send + Sync>) -> Option<Arc<T>> {
    handle.downcast::<T>().ok()
}

/// Recover the concrete manager type behind a registered manager
pub fn downcast_manager<T: Manager>(manager: Arc<dyn Manager>) -> Option<Arc<T>> {
    <dyn Manager as AsAny>::into_any_arc(manager)
        .downcast::<T>()
        .ok()
}
