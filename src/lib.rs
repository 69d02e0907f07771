//! # spark-retained
//!
//! Reactive component runtime for retained-mode widget toolkits.
//!
//! The host toolkit knows how to create, place and destroy native widgets
//! but has no notion of state diffing. This crate layers on top of it:
//!
//! - observable cells and a reducer-driven store
//! - components with a mount/dispose lifecycle and hook-slot local state
//! - store selectors that re-render only when their projection changes
//! - a keyed reconciler that maps child lists onto live handles, reusing
//!   every handle whose component instance is unchanged
//!
//! ## Architecture
//!
//! ```text
//! store.dispatch(action)
//!     → reducer → listeners
//!         → selector recomputes → observable changes
//!             → component re-render → reconciler → toolkit place/create/destroy
//! ```
//!
//! Everything runs synchronously on one thread. A [`Runtime`] is passed
//! explicitly to every mount; nothing is global.
//!
//! ## Modules
//!
//! - [`reactive`] - [`Observable`] and [`Subscription`]
//! - [`state`] - [`Store`], [`Action`], [`Dispatcher`]
//! - [`engine`] - lifecycle, hooks, [`Registry`], [`Runtime`]
//! - [`primitives`] - widgets, frames, stacks, scrollables, windows
//! - [`layout`] - layout options and grid geometry
//! - [`host`] - the [`Toolkit`] seam and the in-memory toolkit
//! - [`renderer`] - terminal output for the in-memory toolkit

pub mod config;
pub mod engine;
pub mod error;
pub mod host;
pub mod layout;
pub mod primitives;
pub mod reactive;
pub mod renderer;
pub mod state;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use config::RuntimeConfig;
pub use error::{Error, Result};

pub use engine::{
    mount, same_instance, BuildContext, ChildSpec, Component, ComponentCore, ComponentRef, Lifecycle, Registry,
    Runtime, Setter,
};

pub use host::{MemoryToolkit, NodeSnapshot, Toolkit, ToolkitOp};

pub use layout::{compute_geometry, Bounds, Geometry, HAlign, Layout, VAlign};

pub use primitives::{
    button, column, combobox, entry, floating, frame, label, row, scrollable_both, scrollable_horizontal,
    scrollable_vertical, text_area, Build, Floating, Frame, MenuButton, Orientation, PropValue, Scrollable, Stack,
    Widget, Window,
};

pub use reactive::{Observable, Subscription};

pub use renderer::{CellBuffer, TerminalPainter};

pub use state::{Action, Dispatcher, Store};
