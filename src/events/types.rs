//! Registry lifecycle events and their payloads.

use crate::constants::events as names;
use crate::error::StorehouseError;
use crate::manager::Manager;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Discriminant of a [`RegistryEvent`], used to subscribe listeners
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RegistryEventKind {
    #[serde(rename = "manager:before:add")]
    ManagerBeforeAdd,
    #[serde(rename = "manager:added")]
    ManagerAdded,
    #[serde(rename = "manager:removed")]
    ManagerRemoved,
    #[serde(rename = "manager:default:changed")]
    DefaultManagerChanged,
    #[serde(rename = "connection:before:close")]
    ConnectionBeforeClose,
    #[serde(rename = "connection:closed")]
    ConnectionClosed,
    #[serde(rename = "connection:error:close")]
    ConnectionCloseError,
    #[serde(rename = "connection:accessed")]
    ConnectionAccessed,
    #[serde(rename = "connections:before:close:all")]
    ConnectionsBeforeCloseAll,
    #[serde(rename = "connections:closed:all")]
    ConnectionsClosedAll,
    #[serde(rename = "model:accessed")]
    ModelAccessed,
    #[serde(rename = "registry:before:destroy")]
    RegistryBeforeDestroy,
    #[serde(rename = "registry:destroyed")]
    RegistryDestroyed,
}

impl RegistryEventKind {
    pub const ALL: [RegistryEventKind; 13] = [
        RegistryEventKind::ManagerBeforeAdd,
        RegistryEventKind::ManagerAdded,
        RegistryEventKind::ManagerRemoved,
        RegistryEventKind::DefaultManagerChanged,
        RegistryEventKind::ConnectionBeforeClose,
        RegistryEventKind::ConnectionClosed,
        RegistryEventKind::ConnectionCloseError,
        RegistryEventKind::ConnectionAccessed,
        RegistryEventKind::ConnectionsBeforeCloseAll,
        RegistryEventKind::ConnectionsClosedAll,
        RegistryEventKind::ModelAccessed,
        RegistryEventKind::RegistryBeforeDestroy,
        RegistryEventKind::RegistryDestroyed,
    ];

    /// Wire name of the event, e.g. `connection:closed`
    pub fn as_str(&self) -> &'static str {
        match self {
            RegistryEventKind::ManagerBeforeAdd => names::MANAGER_BEFORE_ADD,
            RegistryEventKind::ManagerAdded => names::MANAGER_ADDED,
            RegistryEventKind::ManagerRemoved => names::MANAGER_REMOVED,
            RegistryEventKind::DefaultManagerChanged => names::MANAGER_DEFAULT_CHANGED,
            RegistryEventKind::ConnectionBeforeClose => names::CONNECTION_BEFORE_CLOSE,
            RegistryEventKind::ConnectionClosed => names::CONNECTION_CLOSED,
            RegistryEventKind::ConnectionCloseError => names::CONNECTION_ERROR_CLOSE,
            RegistryEventKind::ConnectionAccessed => names::CONNECTION_ACCESSED,
            RegistryEventKind::ConnectionsBeforeCloseAll => names::CONNECTIONS_BEFORE_CLOSE_ALL,
            RegistryEventKind::ConnectionsClosedAll => names::CONNECTIONS_CLOSED_ALL,
            RegistryEventKind::ModelAccessed => names::MODEL_ACCESSED,
            RegistryEventKind::RegistryBeforeDestroy => names::REGISTRY_BEFORE_DESTROY,
            RegistryEventKind::RegistryDestroyed => names::REGISTRY_DESTROYED,
        }
    }

    /// Parse a wire name back into a kind
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|kind| kind.as_str() == name)
    }
}

impl std::fmt::Display for RegistryEventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Signal emitted by the registry around each state transition.
///
/// Events are observational only; listeners cannot veto the transition.
#[derive(Debug, Clone)]
pub enum RegistryEvent {
    /// Emitted before a manager is validated and added
    ManagerBeforeAdd {
        name: String,
        manager: Arc<dyn Manager>,
    },
    ManagerAdded {
        name: String,
        manager: Arc<dyn Manager>,
    },
    ManagerRemoved {
        name: String,
        manager: Arc<dyn Manager>,
    },
    /// `previous` is `None` on the first assignment
    DefaultManagerChanged {
        previous: Option<String>,
        current: String,
    },
    ConnectionBeforeClose {
        manager: String,
    },
    ConnectionClosed {
        manager: String,
    },
    ConnectionCloseError {
        manager: String,
        error: StorehouseError,
    },
    /// Emitted on every connection lookup, including misses
    ConnectionAccessed {
        manager: String,
        found: bool,
    },
    ConnectionsBeforeCloseAll,
    ConnectionsClosedAll {
        count: usize,
    },
    /// `manager` is `None` when the lookup went to the default manager implicitly
    ModelAccessed {
        manager: Option<String>,
        model: String,
        found: bool,
    },
    RegistryBeforeDestroy,
    RegistryDestroyed {
        count: usize,
    },
}

impl RegistryEvent {
    pub fn kind(&self) -> RegistryEventKind {
        match self {
            RegistryEvent::ManagerBeforeAdd { .. } => RegistryEventKind::ManagerBeforeAdd,
            RegistryEvent::ManagerAdded { .. } => RegistryEventKind::ManagerAdded,
            RegistryEvent::ManagerRemoved { .. } => RegistryEventKind::ManagerRemoved,
            RegistryEvent::DefaultManagerChanged { .. } => RegistryEventKind::DefaultManagerChanged,
            RegistryEvent::ConnectionBeforeClose { .. } => RegistryEventKind::ConnectionBeforeClose,
            RegistryEvent::ConnectionClosed { .. } => RegistryEventKind::ConnectionClosed,
            RegistryEvent::ConnectionCloseError { .. } => RegistryEventKind::ConnectionCloseError,
            RegistryEvent::ConnectionAccessed { .. } => RegistryEventKind::ConnectionAccessed,
            RegistryEvent::ConnectionsBeforeCloseAll => RegistryEventKind::ConnectionsBeforeCloseAll,
            RegistryEvent::ConnectionsClosedAll { .. } => RegistryEventKind::ConnectionsClosedAll,
            RegistryEvent::ModelAccessed { .. } => RegistryEventKind::ModelAccessed,
            RegistryEvent::RegistryBeforeDestroy => RegistryEventKind::RegistryBeforeDestroy,
            RegistryEvent::RegistryDestroyed { .. } => RegistryEventKind::RegistryDestroyed,
        }
    }

    pub fn name(&self) -> &'static str {
        self.kind().as_str()
    }
}
