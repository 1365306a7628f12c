//! Multicast event notifier
//!
//! Fans each lifecycle event out to every registered listener. Listeners are
//! held through weak handles, so registering one never extends its lifetime;
//! dropped listeners are skipped and purged on the next fan-out.

use crate::events::{PlayerEvent, PlayerEventListener};
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use tracing::trace;

/// Weak handle to a listener of any (possibly unsized) type
trait WeakListener: Send + Sync {
    /// Address of the listener allocation, used for identity
    fn key(&self) -> usize;

    fn is_alive(&self) -> bool;

    /// Deliver the event; returns false if the listener is gone
    fn deliver(&self, event: &PlayerEvent) -> bool;
}

impl<L> WeakListener for Weak<L>
where
    L: PlayerEventListener + ?Sized + 'static,
{
    fn key(&self) -> usize {
        self.as_ptr() as *const () as usize
    }

    fn is_alive(&self) -> bool {
        self.strong_count() > 0
    }

    fn deliver(&self, event: &PlayerEvent) -> bool {
        match self.upgrade() {
            Some(listener) => {
                listener.on_event(event);
                true
            }
            None => false,
        }
    }
}

/// Listener collection with registration-order fan-out
#[derive(Default)]
pub struct EventNotifier {
    listeners: Mutex<Vec<Arc<dyn WeakListener>>>,
}

impl EventNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    fn listeners(&self) -> MutexGuard<'_, Vec<Arc<dyn WeakListener>>> {
        // A panicking listener must not disable notification for everyone else
        self.listeners.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Register a listener. Registering the same listener twice is a no-op.
    pub fn add<L>(&self, listener: &Arc<L>)
    where
        L: PlayerEventListener + ?Sized + 'static,
    {
        let handle: Arc<dyn WeakListener> = Arc::new(Arc::downgrade(listener));
        let key = handle.key();

        let mut listeners = self.listeners();
        listeners.retain(|l| l.is_alive());
        if listeners.iter().any(|l| l.key() == key) {
            return;
        }
        listeners.push(handle);
    }

    /// Unregister a listener. Unknown listeners are ignored.
    pub fn remove<L>(&self, listener: &Arc<L>)
    where
        L: PlayerEventListener + ?Sized + 'static,
    {
        let key = Arc::as_ptr(listener) as *const () as usize;
        self.listeners().retain(|l| l.is_alive() && l.key() != key);
    }

    pub fn add_all<'a, L>(&self, listeners: impl IntoIterator<Item = &'a Arc<L>>)
    where
        L: PlayerEventListener + ?Sized + 'static,
    {
        for listener in listeners {
            self.add(listener);
        }
    }

    pub fn remove_all<'a, L>(&self, listeners: impl IntoIterator<Item = &'a Arc<L>>)
    where
        L: PlayerEventListener + ?Sized + 'static,
    {
        for listener in listeners {
            self.remove(listener);
        }
    }

    /// Number of live listeners
    pub fn len(&self) -> usize {
        self.listeners().iter().filter(|l| l.is_alive()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Deliver an event to every live listener, synchronously.
    ///
    /// The listener list is snapshotted before delivery, so callbacks may add
    /// or remove listeners; such changes apply from the next event on.
    pub fn notify(&self, event: &PlayerEvent) {
        let snapshot: Vec<_> = self.listeners().clone();

        let mut found_dead = false;
        for listener in &snapshot {
            if !listener.deliver(event) {
                found_dead = true;
            }
        }

        if found_dead {
            self.listeners().retain(|l| l.is_alive());
        }

        trace!(event = event.name(), listeners = snapshot.len(), "Event delivered");
    }
}

impl std::fmt::Debug for EventNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventNotifier")
            .field("listener_count", &self.len())
            .finish()
    }
}
