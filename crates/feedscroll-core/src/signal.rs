//! Payload-carrying notification streams with RAII subscriptions.

use smallvec::SmallVec;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

type Listener<T> = Rc<dyn Fn(&T)>;

struct SignalInner<T> {
    listeners: RefCell<SmallVec<[(u64, Listener<T>); 4]>>,
    next_id: Cell<u64>,
}

impl<T> SignalInner<T> {
    fn remove(&self, id: u64) {
        self.listeners.borrow_mut().retain(|(entry, _)| *entry != id);
    }

    fn contains(&self, id: u64) -> bool {
        self.listeners.borrow().iter().any(|(entry, _)| *entry == id)
    }
}

/// A single-threaded broadcast signal.
///
/// Listeners run in subscription order. A listener may subscribe or drop
/// subscriptions while the signal is emitting; a listener removed mid-emit is
/// not invoked for the remainder of that emission.
pub struct Signal<T: 'static> {
    inner: Rc<SignalInner<T>>,
}

impl<T: 'static> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: 'static> Default for Signal<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> Signal<T> {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(SignalInner {
                listeners: RefCell::new(SmallVec::new()),
                next_id: Cell::new(1),
            }),
        }
    }

    /// Registers `listener` until the returned [`Subscription`] is dropped.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe(&self, listener: impl Fn(&T) + 'static) -> Subscription {
        let id = self.inner.next_id.get();
        self.inner.next_id.set(id + 1);
        self.inner
            .listeners
            .borrow_mut()
            .push((id, Rc::new(listener)));

        let weak: Weak<SignalInner<T>> = Rc::downgrade(&self.inner);
        Subscription {
            unsubscribe: Some(Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.remove(id);
                }
            })),
        }
    }

    pub fn emit(&self, value: &T) {
        let snapshot: SmallVec<[(u64, Listener<T>); 4]> = self
            .inner
            .listeners
            .borrow()
            .iter()
            .map(|(id, listener)| (*id, Rc::clone(listener)))
            .collect();
        for (id, listener) in snapshot {
            if self.inner.contains(id) {
                listener(value);
            }
        }
    }

    pub fn listener_count(&self) -> usize {
        self.inner.listeners.borrow().len()
    }
}

/// Keeps a listener registered; dropping it unsubscribes.
pub struct Subscription {
    unsubscribe: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn unsubscribe(mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.unsubscribe.is_some())
            .finish()
    }
}
