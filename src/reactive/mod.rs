//! Reactive primitives.
//!
//! - [`Observable`] - single-value cell with change notification
//! - [`Subscription`] - idempotent unsubscribe handle shared by every notifier

mod observable;
mod subscription;

pub use observable::{Equality, Observable};
pub use subscription::Subscription;

pub(crate) use subscription::Listeners;
