use super::types::{RegistryEvent, RegistryEventKind};
use crate::constants::DEFAULT_EVENT_CHANNEL_CAPACITY;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::trace;

/// Synchronous listener callback
pub type Listener = Arc<dyn Fn(&RegistryEvent) + Send + Sync>;

/// Handle returned by [`EventPublisher::on`] and [`EventPublisher::once`], used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

struct ListenerEntry {
    id: ListenerId,
    kind: RegistryEventKind,
    once: bool,
    callback: Listener,
}

/// Ordered, synchronous event dispatch for registry lifecycle events.
///
/// Listeners run on the publishing thread in registration order. Every event is
/// additionally mirrored to a broadcast channel for async observers.
pub struct EventPublisher {
    sender: broadcast::Sender<RegistryEvent>,
    listeners: Mutex<Vec<ListenerEntry>>,
    next_id: AtomicU64,
}

impl EventPublisher {
    /// Create a new event publisher with the specified broadcast channel capacity
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            sender,
            listeners: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Register a listener invoked for every event of `kind`
    pub fn on<F>(&self, kind: RegistryEventKind, listener: F) -> ListenerId
    where
        F: Fn(&RegistryEvent) + Send + Sync + 'static,
    {
        self.register(kind, false, Arc::new(listener))
    }

    /// Register a listener invoked for the next event of `kind` only
    pub fn once<F>(&self, kind: RegistryEventKind, listener: F) -> ListenerId
    where
        F: Fn(&RegistryEvent) + Send + Sync + 'static,
    {
        self.register(kind, true, Arc::new(listener))
    }

    fn register(&self, kind: RegistryEventKind, once: bool, callback: Listener) -> ListenerId {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.listeners.lock().push(ListenerEntry {
            id,
            kind,
            once,
            callback,
        });
        id
    }

    /// Remove a listener; returns false if it was already gone
    pub fn off(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.lock();
        let before = listeners.len();
        listeners.retain(|entry| entry.id != id);
        listeners.len() != before
    }

    /// Remove every listener, or every listener of one kind
    pub fn remove_all_listeners(&self, kind: Option<RegistryEventKind>) -> usize {
        let mut listeners = self.listeners.lock();
        let before = listeners.len();
        match kind {
            Some(kind) => listeners.retain(|entry| entry.kind != kind),
            None => listeners.clear(),
        }
        before - listeners.len()
    }

    pub fn listener_count(&self, kind: RegistryEventKind) -> usize {
        self.listeners
            .lock()
            .iter()
            .filter(|entry| entry.kind == kind)
            .count()
    }

    /// Dispatch an event to matching listeners, then to broadcast subscribers.
    ///
    /// The listener list is snapshotted before dispatch, so listeners may
    /// subscribe or unsubscribe from inside a callback.
    pub fn publish(&self, event: RegistryEvent) {
        let kind = event.kind();
        let callbacks: Vec<Listener> = {
            let mut listeners = self.listeners.lock();
            let matching = listeners
                .iter()
                .filter(|entry| entry.kind == kind)
                .map(|entry| entry.callback.clone())
                .collect();
            listeners.retain(|entry| !(entry.once && entry.kind == kind));
            matching
        };

        trace!(event = kind.as_str(), listeners = callbacks.len(), "Publishing registry event");

        for callback in &callbacks {
            callback(&event);
        }

        // No subscribers is not an error for event publishing
        let _ = self.sender.send(event);
    }

    /// Subscribe to every event through the broadcast channel
    pub fn subscribe(&self) -> broadcast::Receiver<RegistryEvent> {
        self.sender.subscribe()
    }

    /// Get the number of active broadcast subscribers
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventPublisher {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_CHANNEL_CAPACITY)
    }
}

impl std::fmt::Debug for EventPublisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventPublisher")
            .field("listeners", &self.listeners.lock().len())
            .field("subscribers", &self.sender.receiver_count())
            .finish()
    }
}
