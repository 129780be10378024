//! Identity-keyed callback registries.
//!
//! Registries never invoke callbacks themselves. Owners copy the current
//! callbacks out with [`ListenerRegistry::snapshot`], release their own
//! borrows, and then call them. A callback is therefore free to register or
//! remove listeners on the object that is notifying it.

use std::fmt;
use std::rc::Rc;

use smallvec::SmallVec;

/// Handle returned when a listener is registered.
///
/// Ids are unique per registry and never reused.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

impl ListenerId {
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "listener#{}", self.0)
    }
}

pub type Listener<T> = Rc<dyn Fn(&T) + 'static>;

pub type ListenerSnapshot<T> = SmallVec<[Listener<T>; 4]>;

pub struct ListenerRegistry<T: ?Sized + 'static> {
    entries: SmallVec<[(ListenerId, Listener<T>); 4]>,
    next_id: u64,
}

impl<T: ?Sized + 'static> ListenerRegistry<T> {
    pub fn new() -> Self {
        Self {
            entries: SmallVec::new(),
            next_id: 1,
        }
    }

    pub fn add(&mut self, listener: Listener<T>) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, listener));
        id
    }

    /// Returns `true` if a listener was registered under `id`.
    pub fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }

    pub fn contains(&self, id: ListenerId) -> bool {
        self.entries.iter().any(|(entry_id, _)| *entry_id == id)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Copies the registered callbacks in registration order.
    pub fn snapshot(&self) -> ListenerSnapshot<T> {
        self.entries
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect()
    }
}

impl<T: ?Sized + 'static> Default for ListenerRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized + 'static> fmt::Debug for ListenerRegistry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("len", &self.entries.len())
            .field("next_id", &self.next_id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn ids_are_not_reused_after_removal() {
        let mut registry: ListenerRegistry<u32> = ListenerRegistry::new();
        let first = registry.add(Rc::new(|_| {}));
        assert!(registry.remove(first));
        let second = registry.add(Rc::new(|_| {}));
        assert_ne!(first, second);
        assert!(!registry.contains(first));
        assert!(registry.contains(second));
    }

    #[test]
    fn snapshot_preserves_registration_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut registry: ListenerRegistry<u32> = ListenerRegistry::new();
        for tag in ["a", "b", "c"] {
            let log = Rc::clone(&log);
            registry.add(Rc::new(move |value: &u32| {
                log.borrow_mut().push(format!("{tag}{value}"));
            }));
        }

        for listener in registry.snapshot() {
            listener(&7);
        }

        assert_eq!(*log.borrow(), vec!["a7", "b7", "c7"]);
    }

    #[test]
    fn removing_unknown_id_is_a_no_op() {
        let mut registry: ListenerRegistry<str> = ListenerRegistry::new();
        let id = registry.add(Rc::new(|_: &str| {}));
        registry.clear();
        assert!(!registry.remove(id));
        assert!(registry.is_empty());
    }
}
