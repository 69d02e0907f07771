//! Subscription handles and the listener list behind every notifier.
//!
//! Observables and the store share one notification discipline: listeners
//! are called in subscription order over a snapshot taken when the
//! notification starts. A listener added mid-notification waits for the next
//! round; a listener removed mid-notification cannot corrupt the walk.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

// =============================================================================
// Subscription
// =============================================================================

/// Handle returned by every `subscribe` call.
///
/// Dropping it does NOT unsubscribe; call [`Subscription::unsubscribe`].
/// Clones share the same cancellation, and unsubscribing twice is a no-op.
#[derive(Clone)]
pub struct Subscription {
    cancel: Rc<RefCell<Option<Box<dyn FnOnce()>>>>,
}

impl Subscription {
    pub(crate) fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self {
            cancel: Rc::new(RefCell::new(Some(Box::new(cancel)))),
        }
    }

    /// Detach the listener. Idempotent.
    pub fn unsubscribe(&self) {
        let cancel = self.cancel.borrow_mut().take();
        if let Some(cancel) = cancel {
            cancel();
        }
    }

    /// Whether `unsubscribe` has not run yet.
    pub fn is_active(&self) -> bool {
        self.cancel.borrow().is_some()
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}

// =============================================================================
// Listener list
// =============================================================================

/// Ordered listener list with id-based removal.
pub(crate) struct Listeners<F: ?Sized> {
    entries: RefCell<Vec<(u64, Rc<F>)>>,
    next_id: Cell<u64>,
}

impl<F: ?Sized + 'static> Listeners<F> {
    pub(crate) fn new() -> Rc<Self> {
        Rc::new(Self {
            entries: RefCell::new(Vec::new()),
            next_id: Cell::new(0),
        })
    }

    /// Append a listener; the returned subscription removes exactly this entry.
    pub(crate) fn add(self: &Rc<Self>, listener: Rc<F>) -> Subscription {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.entries.borrow_mut().push((id, listener));

        let list: Weak<Self> = Rc::downgrade(self);
        Subscription::new(move || {
            if let Some(list) = list.upgrade() {
                list.remove(id);
            }
        })
    }

    fn remove(&self, id: u64) {
        self.entries.borrow_mut().retain(|(entry_id, _)| *entry_id != id);
    }

    /// Listeners at this instant, in subscription order.
    pub(crate) fn snapshot(&self) -> Vec<Rc<F>> {
        self.entries
            .borrow()
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.borrow().len()
    }
}
