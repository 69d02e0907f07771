//! Differential terminal output.
//!
//! [`TerminalPainter`] keeps the previously presented frame and writes only
//! the cells that changed since, as crossterm commands.
//!
//! # Algorithm
//!
//! 1. Begin a synchronized update
//! 2. For each cell of the new frame:
//!    - unchanged from the previous frame: skip
//!    - otherwise: move the cursor (only when not already there) and print
//! 3. End the synchronized update and flush once
//! 4. Keep the new frame for the next comparison

use std::io::{self, Write};

use crossterm::cursor::MoveTo;
use crossterm::style::Print;
use crossterm::terminal::{BeginSynchronizedUpdate, EndSynchronizedUpdate};
use crossterm::queue;

use super::buffer::CellBuffer;
use super::paint::paint;
use crate::error::{Error, Result};
use crate::host::MemoryToolkit;
use crate::layout::char_width;
use crate::types::Handle;

#[derive(Debug, Default)]
pub struct TerminalPainter {
    previous: Option<CellBuffer>,
}

impl TerminalPainter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lay out and paint `root` into a fresh frame.
    pub fn paint(&self, toolkit: &MemoryToolkit, root: Handle, width: u16, height: u16) -> Result<CellBuffer> {
        paint(toolkit, root, width, height)
    }

    /// Write the cells of `frame` that differ from the last presented one.
    ///
    /// Returns the number of cells written.
    pub fn present<W: Write>(&mut self, frame: &CellBuffer, out: &mut W) -> io::Result<usize> {
        queue!(out, BeginSynchronizedUpdate)?;

        let reference = self
            .previous
            .as_ref()
            .filter(|prev| prev.width() == frame.width() && prev.height() == frame.height());

        let mut written = 0;
        let mut cursor: Option<(u16, u16)> = None;
        for y in 0..frame.height() {
            for x in 0..frame.width() {
                if frame.is_continuation(x, y) {
                    continue;
                }
                let Some(cell) = frame.get(x, y) else {
                    continue;
                };
                let changed = reference.is_none_or(|prev| {
                    prev.get(x, y) != Some(cell) || prev.is_continuation(x + 1, y) != frame.is_continuation(x + 1, y)
                });
                if !changed {
                    continue;
                }

                if cursor != Some((x, y)) {
                    queue!(out, MoveTo(x, y))?;
                }
                queue!(out, Print(cell))?;
                cursor = Some((x + char_width(cell).max(1), y));
                written += 1;
            }
        }

        queue!(out, EndSynchronizedUpdate)?;
        out.flush()?;

        tracing::trace!(written, width = frame.width(), height = frame.height(), "frame presented");
        self.previous = Some(frame.clone());
        Ok(written)
    }

    /// Paint and present in one step.
    pub fn render<W: Write>(
        &mut self,
        toolkit: &MemoryToolkit,
        root: Handle,
        width: u16,
        height: u16,
        out: &mut W,
    ) -> Result<usize> {
        let frame = self.paint(toolkit, root, width, height)?;
        self.present(&frame, out).map_err(|err| Error::Toolkit {
            handle: Some(root),
            reason: format!("terminal write failed: {err}"),
        })
    }

    /// Forget the previous frame so the next present redraws everything.
    pub fn invalidate(&mut self) {
        self.previous = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Bounds;

    fn frame_with(text: &str) -> CellBuffer {
        let mut frame = CellBuffer::new(6, 2);
        let area = frame.area();
        frame.put_str(0, 0, text, &area);
        frame
    }

    #[test]
    fn test_first_present_writes_every_cell() {
        let mut painter = TerminalPainter::new();
        let mut out = Vec::new();
        assert_eq!(painter.present(&frame_with("hi"), &mut out).unwrap(), 12);
        assert!(String::from_utf8_lossy(&out).contains("hi"));
    }

    #[test]
    fn test_unchanged_frame_writes_nothing() {
        let mut painter = TerminalPainter::new();
        let mut out = Vec::new();
        painter.present(&frame_with("hi"), &mut out).unwrap();
        assert_eq!(painter.present(&frame_with("hi"), &mut Vec::new()).unwrap(), 0);
    }

    #[test]
    fn test_only_changed_cells_written() {
        let mut painter = TerminalPainter::new();
        painter.present(&frame_with("hello"), &mut Vec::new()).unwrap();

        let mut out = Vec::new();
        assert_eq!(painter.present(&frame_with("help"), &mut out).unwrap(), 2);
        let written = String::from_utf8_lossy(&out);
        assert!(written.contains('p'));
        assert!(!written.contains('e'));
    }

    #[test]
    fn test_resize_and_invalidate_redraw() {
        let mut painter = TerminalPainter::new();
        painter.present(&frame_with("a"), &mut Vec::new()).unwrap();

        let mut wider = CellBuffer::new(8, 2);
        let area = Bounds { x: 0, y: 0, width: 8, height: 2 };
        wider.put_str(0, 0, "a", &area);
        assert_eq!(painter.present(&wider, &mut Vec::new()).unwrap(), 16);

        painter.invalidate();
        assert_eq!(painter.present(&wider, &mut Vec::new()).unwrap(), 16);
    }
}
