//! Observable state cells backing the form controller.
//!
//! [`MutableState`] is a single-threaded cell with clone-out reads and
//! synchronous change notification. Watchers registered through
//! [`MutableState::watch`] run before `set`/`update` returns, so derived
//! values (like the controller's validity flag) are never observed stale
//! after a write settles.

use std::cell::RefCell;
use std::rc::Rc;

struct StateCore<T> {
    value: RefCell<T>,
    watchers: RefCell<Vec<Rc<dyn Fn(&T)>>>,
}

/// Shared mutable cell with synchronous watchers.
///
/// Clones share the same underlying value, so a handle can be captured by
/// any number of event closures cheaply.
pub struct MutableState<T> {
    core: Rc<StateCore<T>>,
}

impl<T> Clone for MutableState<T> {
    fn clone(&self) -> Self {
        Self {
            core: Rc::clone(&self.core),
        }
    }
}

impl<T> MutableState<T> {
    pub fn new(initial: T) -> Self {
        Self {
            core: Rc::new(StateCore {
                value: RefCell::new(initial),
                watchers: RefCell::new(Vec::new()),
            }),
        }
    }

    /// Reads the current value without cloning it out.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.core.value.borrow())
    }

    /// Replaces the value and notifies watchers.
    pub fn set(&self, value: T) {
        *self.core.value.borrow_mut() = value;
        self.notify();
    }

    /// Mutates the value in place and notifies watchers.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        f(&mut self.core.value.borrow_mut());
        self.notify();
    }

    /// Registers a watcher invoked after every write.
    ///
    /// Watchers must not write back into the same cell; they exist to
    /// derive secondary state, not to chain mutations.
    pub fn watch(&self, watcher: impl Fn(&T) + 'static) {
        self.core.watchers.borrow_mut().push(Rc::new(watcher));
    }

    fn notify(&self) {
        let watchers = self.core.watchers.borrow().clone();
        let value = self.core.value.borrow();
        for watcher in &watchers {
            watcher(&value);
        }
    }
}

impl<T: Clone> MutableState<T> {
    /// Clones the current value out of the cell.
    pub fn get(&self) -> T {
        self.core.value.borrow().clone()
    }
}
