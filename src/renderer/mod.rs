//! Terminal renderer for the in-memory toolkit.
//!
//! ```text
//! MemoryToolkit tree → compute_geometry → paint → CellBuffer → present (diff) → terminal
//! ```
//!
//! - [`CellBuffer`] - character grid
//! - [`paint`] - draws every placed element into a buffer
//! - [`TerminalPainter`] - writes changed cells with crossterm

mod buffer;
mod diff;
mod paint;

pub use buffer::CellBuffer;
pub use diff::TerminalPainter;
pub use paint::paint;
