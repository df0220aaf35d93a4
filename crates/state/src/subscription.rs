use std::cell::RefCell;
use std::rc::{Rc, Weak};

type Callback<E> = Box<dyn FnMut(&E)>;

struct Subscribers<E> {
    next_id: usize,
    entries: Vec<(usize, Callback<E>)>,
    // Nesting depth of `emit` calls currently running.
    emit_depth: usize,
    // Ids dropped while their callbacks were taken out for an emit.
    removed: Vec<usize>,
}

/// Ordered set of callbacks notified on every emitted event.
///
/// Callbacks may subscribe or drop their own [`Subscription`] while being notified;
/// additions take effect from the next emit.
pub struct SubscriberSet<E> {
    inner: Rc<RefCell<Subscribers<E>>>,
}

impl<E: 'static> Default for SubscriberSet<E> {
    fn default() -> Self {
        Self {
            inner: Rc::new(RefCell::new(Subscribers {
                next_id: 0,
                entries: Vec::new(),
                emit_depth: 0,
                removed: Vec::new(),
            })),
        }
    }
}

impl<E: 'static> SubscriberSet<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `callback` and returns the guard that keeps it registered.
    pub fn insert(&self, callback: impl FnMut(&E) + 'static) -> Subscription {
        let id = {
            let mut inner = self.inner.borrow_mut();
            let id = inner.next_id;
            inner.next_id += 1;
            inner.entries.push((id, Box::new(callback)));
            id
        };

        let weak: Weak<RefCell<Subscribers<E>>> = Rc::downgrade(&self.inner);
        Subscription::new(move || {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            let mut inner = inner.borrow_mut();
            if inner.emit_depth > 0 {
                inner.removed.push(id);
            }
            inner.entries.retain(|(entry_id, _)| *entry_id != id);
        })
    }

    pub fn emit(&self, event: &E) {
        let mut entries = {
            let mut inner = self.inner.borrow_mut();
            inner.emit_depth += 1;
            std::mem::take(&mut inner.entries)
        };

        for (_, callback) in entries.iter_mut() {
            callback(event);
        }

        let mut inner = self.inner.borrow_mut();
        inner.emit_depth -= 1;
        entries.retain(|(id, _)| !inner.removed.contains(id));
        // An outer emit may still hold callbacks dropped during this one.
        if inner.emit_depth == 0 {
            inner.removed.clear();
        }
        entries.append(&mut inner.entries);
        inner.entries = entries;
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Guard returned by `subscribe`. Dropping it deregisters the callback.
#[must_use = "dropping a subscription immediately deregisters its callback"]
pub struct Subscription {
    unsubscribe: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    fn new(unsubscribe: impl FnOnce() + 'static) -> Self {
        Self {
            unsubscribe: Some(Box::new(unsubscribe)),
        }
    }

    /// Keeps the callback registered for as long as the subscriber set lives.
    pub fn detach(mut self) {
        self.unsubscribe.take();
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
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("Subscription")
            .field("active", &self.unsubscribe.is_some())
            .finish()
    }
}
