//! Engine - component lifecycle, hooks, registries and the runtime context.
//!
//! - [`Runtime`]: toolkit, config, store and per-window registries
//! - [`Component`] / [`ComponentCore`]: identity and lifecycle
//! - [`BuildContext`]: hook slots (`use_state`, `use_store_selector`, ...)
//! - [`Registry`]: id → handle introspection table
//!
//! # Lifecycle
//!
//! ```text
//! mount(component, parent, runtime)
//!     └── create_widget ── register ── observe_destroy
//!                                           │
//! toolkit.destroy(handle) ──────────────────┘
//!     └── unregister ── release subscriptions ── clear hooks ── on_dispose
//! ```

mod component;
mod hooks;
mod registry;
mod runtime;

pub use component::{mount, same_instance, ChildSpec, Component, ComponentCore, ComponentRef, Lifecycle};
pub use hooks::{BuildContext, Setter};
pub use registry::Registry;
pub use runtime::Runtime;
