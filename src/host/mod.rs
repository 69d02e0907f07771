//! Host toolkit seam.
//!
//! The runtime never draws anything itself. Every native element is created,
//! placed and destroyed through a [`Toolkit`], which hands back opaque
//! [`Handle`]s. Operations on a handle that has already been destroyed are
//! no-ops: teardown races (an observable firing while its widget is going
//! away) are expected, not exceptional.
//!
//! [`MemoryToolkit`] is a complete in-process implementation used by the
//! tests, the terminal renderer and the demo.

mod memory;

pub use memory::{MemoryToolkit, NodeSnapshot, ToolkitOp};

use crate::error::Result;
use crate::types::{Anchored, Axis, Command, Handle, Placement, PropertyMap, PropertyValue, TrackConfig, WidgetKind};

/// Callback fired once when a handle is destroyed.
pub type DestroyCallback = Box<dyn FnOnce()>;

/// Operations the runtime consumes from a retained-mode widget toolkit.
pub trait Toolkit {
    /// Create an element under `parent` (`None` for a top-level window).
    fn create(&self, parent: Option<Handle>, kind: WidgetKind, props: &PropertyMap) -> Result<Handle>;

    /// Destroy an element and its whole subtree, firing destroy observers
    /// children first.
    fn destroy(&self, handle: Handle);

    fn configure(&self, handle: Handle, props: &PropertyMap) -> Result<()>;

    fn property(&self, handle: Handle, key: &str) -> Option<PropertyValue>;

    fn observe_destroy(&self, handle: Handle, callback: DestroyCallback);

    /// Assign a grid cell inside the parent.
    fn place(&self, handle: Handle, placement: &Placement);

    /// Position relative to the parent's size, outside the grid.
    fn place_relative(&self, handle: Handle, anchored: &Anchored);

    /// Clear whatever placement the handle has.
    fn forget(&self, handle: Handle);

    /// Configure one row (`Axis::Vertical`) or column (`Axis::Horizontal`) track.
    fn configure_track(&self, container: Handle, axis: Axis, index: usize, track: TrackConfig);

    fn set_command(&self, handle: Handle, command: Command);

    fn add_menu_item(&self, handle: Handle, label: &str, command: Command);

    fn children(&self, handle: Handle) -> Vec<Handle>;

    /// The window a handle lives in (a window is its own top level).
    fn toplevel(&self, handle: Handle) -> Option<Handle>;

    fn is_alive(&self, handle: Handle) -> bool;

    /// Stack above siblings.
    fn raise(&self, handle: Handle);

    /// Stack below siblings.
    fn lower(&self, handle: Handle);
}
