//! State Module - application state shared across components.
//!
//! - **Store** - reducer-driven state container with ordered listeners
//! - **Action** - `{ type, payload? }` envelope interpreted by the reducer
//! - **Dispatcher** - dispatch-only handle that hides the state type

mod store;

pub use store::{Action, Dispatcher, Reducer, Store, StoreListener, WeakStore};

pub(crate) use store::AnyStore;
