//! Typisierter Publish/Subscribe-Kanal pro Komponente.

use std::fmt;

/// Handle eines Abonnements (für `unsubscribe`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

type Listener<E> = Box<dyn FnMut(&E)>;

/// Event-Kanal mit stark typisierten Payloads.
///
/// Listener werden synchron in Anmeldereihenfolge aufgerufen.
pub struct EventBus<E> {
    next_id: u64,
    listeners: Vec<(SubscriberId, Listener<E>)>,
}

impl<E> EventBus<E> {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            listeners: Vec::new(),
        }
    }

    /// Meldet einen Listener an.
    pub fn subscribe(&mut self, listener: impl FnMut(&E) + 'static) -> SubscriberId {
        let id = SubscriberId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Meldet einen Listener ab. `false` wenn die ID unbekannt ist.
    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }

    /// Verteilt ein Event an alle Listener.
    pub fn emit(&mut self, event: &E) {
        for (_, listener) in self.listeners.iter_mut() {
            listener(event);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl<E> Default for EventBus<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for EventBus<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
