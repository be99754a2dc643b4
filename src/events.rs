//! Synchronous listener registry.
//!
//! [`EventBus`] keeps weak handles to its listeners, so a listener that is
//! dropped stops receiving notifications without explicit unregistration.
//! Dispatch is immediate and runs in registration order: each listener's
//! callback returns before the next one is invoked.

use std::cell::RefCell;
use std::rc::Weak;

/// Handle returned by [`EventBus::register`], used to unregister later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

struct Entry<L: ?Sized> {
    id: ListenerId,
    listener: Weak<RefCell<L>>,
}

/// Registry of listeners of type `L` (usually a trait object).
pub struct EventBus<L: ?Sized> {
    entries: Vec<Entry<L>>,
    next_id: u64,
}

impl<L: ?Sized> Default for EventBus<L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: ?Sized> std::fmt::Debug for EventBus<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.len())
            .finish()
    }
}

impl<L: ?Sized> EventBus<L> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 0,
        }
    }

    /// Adds `listener` at the end of the fan-out order. Registering the same
    /// listener twice returns the existing id.
    pub fn register(&mut self, listener: Weak<RefCell<L>>) -> ListenerId {
        self.prune();
        if let Some(entry) = self
            .entries
            .iter()
            .find(|entry| Weak::ptr_eq(&entry.listener, &listener))
        {
            return entry.id;
        }
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry { id, listener });
        log::trace!("Registered listener {id:?}");
        id
    }

    /// Returns whether `id` was registered.
    pub fn unregister(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != id);
        let removed = self.entries.len() < before;
        self.prune();
        if removed {
            log::trace!("Unregistered listener {id:?}");
        }
        removed
    }

    /// Number of live listeners.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.listener.strong_count() > 0)
            .count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Calls `notify` once per live listener, in registration order.
    ///
    /// A listener is borrowed mutably for the duration of its own callback, so
    /// a callback must not emit back into the same bus. A listener that is
    /// already borrowed elsewhere is skipped with a warning.
    pub fn emit(&self, mut notify: impl FnMut(&mut L)) {
        for entry in &self.entries {
            let Some(listener) = entry.listener.upgrade() else {
                continue;
            };
            match listener.try_borrow_mut() {
                Ok(mut listener) => notify(&mut *listener),
                Err(_) => log::warn!("Listener {:?} is busy, skipping event", entry.id),
            };
        }
    }

    fn prune(&mut self) {
        self.entries.retain(|entry| entry.listener.strong_count() > 0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    trait Counter {
        fn hit(&mut self, by: u32);
    }

    #[derive(Default)]
    struct Tally {
        hits: u32,
        log: Vec<u32>,
    }

    impl Counter for Tally {
        fn hit(&mut self, by: u32) {
            self.hits += by;
            self.log.push(by);
        }
    }

    fn register(bus: &mut EventBus<dyn Counter>, tally: &Rc<RefCell<Tally>>) -> ListenerId {
        let weak: Weak<RefCell<Tally>> = Rc::downgrade(tally);
        bus.register(weak)
    }

    #[test]
    fn test_emit_reaches_every_listener() {
        let mut bus: EventBus<dyn Counter> = EventBus::new();
        let a = Rc::new(RefCell::new(Tally::default()));
        let b = Rc::new(RefCell::new(Tally::default()));
        register(&mut bus, &a);
        register(&mut bus, &b);

        bus.emit(|l| l.hit(2));
        assert_eq!(a.borrow().hits, 2);
        assert_eq!(b.borrow().hits, 2);
        assert_eq!(bus.len(), 2);
    }

    #[test]
    fn test_register_is_idempotent() {
        let mut bus: EventBus<dyn Counter> = EventBus::new();
        let a = Rc::new(RefCell::new(Tally::default()));
        let first = register(&mut bus, &a);
        let second = register(&mut bus, &a);
        assert_eq!(first, second);

        bus.emit(|l| l.hit(1));
        assert_eq!(a.borrow().hits, 1);
    }

    #[test]
    fn test_unregister_stops_notifications() {
        let mut bus: EventBus<dyn Counter> = EventBus::new();
        let a = Rc::new(RefCell::new(Tally::default()));
        let id = register(&mut bus, &a);
        assert_eq!(bus.len(), 1);
        assert!(bus.unregister(id));
        assert!(!bus.unregister(id));

        bus.emit(|l| l.hit(1));
        assert_eq!(a.borrow().hits, 0);
        assert!(bus.is_empty());
    }

    #[test]
    fn test_dropped_listener_is_skipped() {
        let mut bus: EventBus<dyn Counter> = EventBus::new();
        let a = Rc::new(RefCell::new(Tally::default()));
        let b = Rc::new(RefCell::new(Tally::default()));
        register(&mut bus, &a);
        register(&mut bus, &b);
        drop(b);

        assert_eq!(bus.len(), 1);
        bus.emit(|l| l.hit(3));
        assert_eq!(a.borrow().log, vec![3]);
    }

    #[test]
    fn test_borrowed_listener_is_skipped() {
        let mut bus: EventBus<dyn Counter> = EventBus::new();
        let a = Rc::new(RefCell::new(Tally::default()));
        let b = Rc::new(RefCell::new(Tally::default()));
        register(&mut bus, &a);
        register(&mut bus, &b);

        let held = a.borrow();
        bus.emit(|l| l.hit(4));
        assert_eq!(held.hits, 0);
        drop(held);

        assert_eq!(a.borrow().hits, 0);
        assert_eq!(b.borrow().log, vec![4]);
    }
}
