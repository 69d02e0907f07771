//! Store - action-driven state container.
//!
//! One reducer, one current state, one ordered listener list. The reducer
//! receives the previous state by shared reference and returns a fresh
//! value, so a state snapshot captured by a component is never mutated
//! behind its back.
//!
//! # API
//!
//! - `get_state()` - current state snapshot
//! - `dispatch(action)` - reduce, replace, notify every listener
//! - `subscribe(listener)` - listeners re-read `get_state()` themselves
//!
//! # Example
//!
//! ```ignore
//! use spark_retained::state::{Action, Store};
//!
//! let store = Store::new(|count: &i64, action: &Action| match action.kind.as_str() {
//!     "INC" => count + 1,
//!     _ => *count,
//! }, 0);
//!
//! store.dispatch(Action::new("INC"))?;
//! assert_eq!(*store.get_state(), 1);
//! ```

use std::any::Any;
use std::fmt;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::reactive::{Listeners, Subscription};

// =============================================================================
// Action
// =============================================================================

/// Tagged action envelope: `{ "type": string, "payload"?: any }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    /// Discriminator, interpreted only by the reducer.
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
}

impl Action {
    /// Action without payload.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            payload: None,
        }
    }

    /// Action carrying a payload.
    pub fn with_payload(kind: impl Into<String>, payload: impl Into<Value>) -> Self {
        Self {
            kind: kind.into(),
            payload: Some(payload.into()),
        }
    }

    pub fn is(&self, kind: &str) -> bool {
        self.kind == kind
    }

    pub fn payload_str(&self) -> Option<&str> {
        self.payload.as_ref().and_then(Value::as_str)
    }

    pub fn payload_i64(&self) -> Option<i64> {
        self.payload.as_ref().and_then(Value::as_i64)
    }

    pub fn payload_bool(&self) -> Option<bool> {
        self.payload.as_ref().and_then(Value::as_bool)
    }
}

// =============================================================================
// Store
// =============================================================================

/// Pure transition `(previous state, action) -> next state`.
pub type Reducer<S> = Box<dyn Fn(&S, &Action) -> S>;

/// Store listener. An error aborts the rest of the round and is returned
/// from `dispatch`.
pub type StoreListener = dyn Fn() -> Result<()>;

struct StoreInner<S> {
    reducer: Reducer<S>,
    state: RefCell<Rc<S>>,
    listeners: Rc<Listeners<StoreListener>>,
}

/// Shared state container. Clones refer to the same store.
pub struct Store<S> {
    inner: Rc<StoreInner<S>>,
}

impl<S> Clone for Store<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<S: 'static> Store<S> {
    pub fn new(reducer: impl Fn(&S, &Action) -> S + 'static, initial_state: S) -> Self {
        Self {
            inner: Rc::new(StoreInner {
                reducer: Box::new(reducer),
                state: RefCell::new(Rc::new(initial_state)),
                listeners: Listeners::new(),
            }),
        }
    }

    /// Current state snapshot.
    pub fn get_state(&self) -> Rc<S> {
        Rc::clone(&self.inner.state.borrow())
    }

    /// Reduce `action` into a new state, then notify every listener.
    ///
    /// Listeners fire whether or not the state changed.
    pub fn dispatch(&self, action: Action) -> Result<()> {
        let next = {
            let state = self.inner.state.borrow();
            (self.inner.reducer)(&state, &action)
        };
        *self.inner.state.borrow_mut() = Rc::new(next);

        let listeners = self.inner.listeners.snapshot();
        tracing::debug!(action = %action.kind, listeners = listeners.len(), "dispatch");
        for listener in listeners {
            listener()?;
        }
        Ok(())
    }

    pub fn subscribe(&self, listener: impl Fn() -> Result<()> + 'static) -> Subscription {
        let listener: Rc<StoreListener> = Rc::new(listener);
        self.inner.listeners.add(listener)
    }

    pub fn listener_count(&self) -> usize {
        self.inner.listeners.len()
    }

    /// Type-erased dispatch handle.
    pub fn dispatcher(&self) -> Dispatcher {
        Dispatcher {
            store: Rc::new(self.clone()),
        }
    }

    /// Non-owning handle, for listeners that must not keep the store alive.
    pub fn downgrade(&self) -> WeakStore<S> {
        WeakStore {
            inner: Rc::downgrade(&self.inner),
        }
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

/// Weak counterpart of [`Store`].
pub struct WeakStore<S> {
    inner: Weak<StoreInner<S>>,
}

impl<S> Clone for WeakStore<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Weak::clone(&self.inner),
        }
    }
}

impl<S> WeakStore<S> {
    pub fn upgrade(&self) -> Option<Store<S>> {
        self.inner.upgrade().map(|inner| Store { inner })
    }
}

impl<S: fmt::Debug> fmt::Debug for Store<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("state", &*self.inner.state.borrow())
            .field("listeners", &self.inner.listeners.len())
            .finish()
    }
}

// =============================================================================
// Type erasure
// =============================================================================

/// A store whose state type is not known at the call site.
pub(crate) trait AnyStore {
    fn as_any(&self) -> &dyn Any;
    fn dispatch_action(&self, action: Action) -> Result<()>;
    fn type_name(&self) -> &'static str;
}

impl<S: 'static> AnyStore for Store<S> {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn dispatch_action(&self, action: Action) -> Result<()> {
        self.dispatch(action)
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<S>()
    }
}

/// Dispatch-only handle to a store, independent of its state type.
#[derive(Clone)]
pub struct Dispatcher {
    store: Rc<dyn AnyStore>,
}

impl Dispatcher {
    pub(crate) fn from_erased(store: Rc<dyn AnyStore>) -> Self {
        Self { store }
    }

    pub fn dispatch(&self, action: Action) -> Result<()> {
        self.store.dispatch_action(action)
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("state", &self.store.type_name())
            .finish()
    }
}
