//! Event listener bookkeeping shared by adapter implementations.

use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::provider::adapter::{EventSender, ListenerId, ProviderEvent, ProviderEventKind};

/// Thread-safe set of event handlers keyed by [`ListenerId`].
#[derive(Debug, Default)]
pub struct ListenerRegistry {
    next_id: AtomicU64,
    listeners: DashMap<ListenerId, (ProviderEventKind, EventSender)>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler and return its id.
    pub fn add(&self, kind: ProviderEventKind, handler: EventSender) -> ListenerId {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.listeners.insert(id, (kind, handler));
        tracing::debug!(listener = id.0, event = kind.as_str(), "Listener added");
        id
    }

    /// Remove a handler registered for `kind`.
    pub fn remove(&self, kind: ProviderEventKind, id: ListenerId) -> bool {
        let removed = self
            .listeners
            .remove_if(&id, |_, (registered, _)| *registered == kind)
            .is_some();
        if removed {
            tracing::debug!(listener = id.0, event = kind.as_str(), "Listener removed");
        }
        removed
    }

    /// Deliver an event to every handler of its kind.
    ///
    /// Handlers whose receiving side is gone are dropped. Returns the
    /// number of handlers that accepted the event.
    pub fn emit(&self, event: &ProviderEvent) -> usize {
        let kind = event.kind();
        let mut delivered = 0;
        let mut closed = Vec::new();

        for entry in self.listeners.iter() {
            let (registered, handler) = entry.value();
            if *registered != kind {
                continue;
            }
            if handler.send(event.clone()).is_ok() {
                delivered += 1;
            } else {
                closed.push(*entry.key());
            }
        }

        for id in closed {
            self.listeners.remove(&id);
        }
        delivered
    }

    /// Number of handlers registered for `kind`.
    pub fn count(&self, kind: ProviderEventKind) -> usize {
        self.listeners.iter().filter(|e| e.value().0 == kind).count()
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}
