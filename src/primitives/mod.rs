//! Primitives - the concrete components applications compose.
//!
//! - [`Widget`] - leaf wrapping one native element (label, button, entry...)
//! - [`MenuButton`] - drop-down of labelled items
//! - [`Frame`] - composite with build logic and at most one child
//! - [`Stack`] - keyed row/column reconciler
//! - [`Floating`] - one child pinned by relative anchor
//! - [`Scrollable`] - content inside a scrolling canvas
//! - [`Window`] - top level owning the registry, content and portals
//!
//! # Reactivity
//!
//! Widget properties can be static or bound to an observable:
//!
//! ```ignore
//! // Bound - the label follows the store
//! let status = cx.use_store_selector(|s: &AppState| s.status.clone())?;
//! label("status")?.text(status);
//!
//! // Static - read once, never updated
//! label("status")?.text(status.value());
//! ```

mod floating;
mod frame;
mod menu_button;
mod scrollable;
mod stack;
mod widget;
mod window;

pub use floating::{floating, Floating};
pub use frame::{frame, Build, Frame};
pub use menu_button::{MenuButton, MenuCommand, MenuEntry};
pub use scrollable::{scrollable_both, scrollable_horizontal, scrollable_vertical, Orientation, ScrollParts, Scrollable};
pub use stack::{column, row, DeriveChildren, Stack};
pub use widget::{button, combobox, entry, label, text_area, Bindable, PropValue, Widget};
pub use window::Window;
