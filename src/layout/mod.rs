//! Layout - child layout options and grid geometry.
//!
//! Two halves:
//!
//! 1. [`Layout`] options on a child resolve to a grid [`Slot`] (sticky edges,
//!    padding, track weight and minimum) that containers apply through the
//!    toolkit's `place` and `configure_track`
//! 2. [`compute_geometry`] turns the placements recorded on a
//!    [`MemoryToolkit`](crate::host::MemoryToolkit) into absolute cell
//!    rectangles using Taffy's CSS-grid implementation
//!
//! # Example
//!
//! ```ignore
//! use spark_retained::layout::{compute_geometry, HAlign, Layout};
//!
//! column.add((entry, Layout::new().expand().halign(HAlign::Stretch)));
//! let geometry = compute_geometry(&toolkit, window, 80, 24)?;
//! ```

mod align;
mod grid;
mod text_measure;

pub use align::{HAlign, Layout, Slot, SlotDefaults, VAlign};
pub use grid::{compute_geometry, Bounds, Geometry};
pub use text_measure::{char_width, grapheme_width, string_width, text_extent, truncate_text};
