//! Synchronous change notification.
//!
//! A trimmed-down signal registry: connections live in a slotmap keyed by
//! [`ConnectionId`], callbacks run synchronously on the emitting call stack.
//! There is no queuing or thread affinity because the whole engine is driven
//! by a single logical event loop.

use std::sync::Arc;

use parking_lot::Mutex;
use slotmap::{SlotMap, new_key_type};

new_key_type! {
    /// Identifier for one registered change callback.
    ///
    /// Pass it to [`ChangeNotifier::disconnect`] to unsubscribe.
    pub struct ConnectionId;
}

type Slot<Args> = Arc<dyn Fn(&Args) + Send + Sync>;

/// Registry of change callbacks for a single notification payload type.
pub struct ChangeNotifier<Args> {
    slots: Mutex<SlotMap<ConnectionId, Slot<Args>>>,
}

impl<Args> Default for ChangeNotifier<Args> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Args> ChangeNotifier<Args> {
    pub fn new() -> Self {
        Self {
            slots: Mutex::new(SlotMap::with_key()),
        }
    }

    /// Register a callback; it fires on every [`emit`](Self::emit) until
    /// disconnected.
    pub fn connect<F>(&self, callback: F) -> ConnectionId
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        self.slots.lock().insert(Arc::new(callback))
    }

    /// Remove a callback. Returns `false` if the id was already gone.
    pub fn disconnect(&self, id: ConnectionId) -> bool {
        self.slots.lock().remove(id).is_some()
    }

    pub fn connection_count(&self) -> usize {
        self.slots.lock().len()
    }

    /// Invoke every registered callback with `args`, synchronously.
    ///
    /// The registry lock is released before callbacks run, so a callback may
    /// connect or disconnect without deadlocking.
    pub fn emit(&self, args: &Args) {
        let slots: Vec<Slot<Args>> = self.slots.lock().values().cloned().collect();
        for slot in slots {
            slot(args);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[test]
    fn connect_emit_disconnect() {
        let notifier = ChangeNotifier::<u32>::new();
        let seen = Arc::new(AtomicUsize::new(0));

        let seen_by_slot = Arc::clone(&seen);
        let id = notifier.connect(move |value| {
            seen_by_slot.fetch_add(*value as usize, Ordering::SeqCst);
        });

        notifier.emit(&2);
        notifier.emit(&3);
        assert_eq!(seen.load(Ordering::SeqCst), 5);

        assert!(notifier.disconnect(id));
        assert!(!notifier.disconnect(id));
        notifier.emit(&10);
        assert_eq!(seen.load(Ordering::SeqCst), 5);
    }

    #[test]
    fn callbacks_fire_synchronously_in_insertion_order() {
        let notifier = ChangeNotifier::<()>::new();
        let order = Arc::new(Mutex::new(vec![]));

        for label in ["first", "second"] {
            let order = Arc::clone(&order);
            notifier.connect(move |()| order.lock().push(label));
        }
        notifier.emit(&());
        assert_eq!(*order.lock(), vec!["first", "second"]);
    }

    #[test]
    fn callback_may_disconnect_during_emit() {
        let notifier = Arc::new(ChangeNotifier::<()>::new());
        let id_cell = Arc::new(Mutex::new(None));

        let notifier_in_slot = Arc::clone(&notifier);
        let id_in_slot = Arc::clone(&id_cell);
        let id = notifier.connect(move |()| {
            if let Some(id) = id_in_slot.lock().take() {
                notifier_in_slot.disconnect(id);
            }
        });
        *id_cell.lock() = Some(id);

        notifier.emit(&());
        assert_eq!(notifier.connection_count(), 0);
    }
}
