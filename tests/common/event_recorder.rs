//! Listener that records every registry event in emission order.

#![allow(dead_code)]

use parking_lot::Mutex;
use std::sync::Arc;
use storehouse_core::{Registry, RegistryEvent, RegistryEventKind};

#[derive(Clone, Default)]
pub struct EventRecorder {
    events: Arc<Mutex<Vec<RegistryEvent>>>,
}

impl EventRecorder {
    /// Attach a listener for every event kind
    pub fn attach(registry: &Registry) -> Self {
        let recorder = Self::default();
        for kind in RegistryEventKind::ALL {
            let events = recorder.events.clone();
            registry.on(kind, move |event| events.lock().push(event.clone()));
        }
        recorder
    }

    pub fn events(&self) -> Vec<RegistryEvent> {
        self.events.lock().clone()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.events.lock().iter().map(RegistryEvent::name).collect()
    }

    pub fn of_kind(&self, kind: RegistryEventKind) -> Vec<RegistryEvent> {
        self.events
            .lock()
            .iter()
            .filter(|event| event.kind() == kind)
            .cloned()
            .collect()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }
}
