//! Paint a laid-out widget tree into a [`CellBuffer`].
//!
//! Elements are painted parent first, siblings in stacking order, each one
//! clipped to its parent's rectangle. Faces:
//!
//! | Kind                   | Face              |
//! |------------------------|-------------------|
//! | Label, Text            | the text          |
//! | Button                 | `[text]`          |
//! | Entry                  | `_text____`       |
//! | MenuButton, Combobox   | `text ▾`          |
//! | Scrollbar              | `│` or `─` track  |
//! | bordered Frame/Canvas  | box outline       |

use super::buffer::CellBuffer;
use crate::error::Result;
use crate::host::{MemoryToolkit, NodeSnapshot};
use crate::layout::{compute_geometry, string_width, truncate_text, Bounds, Geometry};
use crate::types::{Handle, PropertyValue, WidgetKind};

/// Lay out `root` at `width` x `height` and paint it.
pub fn paint(toolkit: &MemoryToolkit, root: Handle, width: u16, height: u16) -> Result<CellBuffer> {
    let geometry = compute_geometry(toolkit, root, width, height)?;
    let mut buffer = CellBuffer::new(width, height);
    let screen = buffer.area();
    paint_node(toolkit, &geometry, root, &screen, &mut buffer);
    Ok(buffer)
}

fn paint_node(toolkit: &MemoryToolkit, geometry: &Geometry, handle: Handle, clip: &Bounds, buffer: &mut CellBuffer) {
    let Some(node) = toolkit.node(handle) else {
        return;
    };
    // Unplaced elements take no space and show nothing.
    let Some(bounds) = geometry.get(&handle) else {
        return;
    };
    let Some(visible) = intersect(bounds, clip) else {
        return;
    };

    draw(&node, bounds, &visible, buffer);
    for &child in &node.children {
        paint_node(toolkit, geometry, child, &visible, buffer);
    }
}

fn intersect(a: &Bounds, b: &Bounds) -> Option<Bounds> {
    let x = a.x.max(b.x);
    let y = a.y.max(b.y);
    let right = a.right().min(b.right());
    let bottom = a.bottom().min(b.bottom());
    (right > x && bottom > y).then_some(Bounds {
        x,
        y,
        width: right - x,
        height: bottom - y,
    })
}

fn draw(node: &NodeSnapshot, bounds: &Bounds, clip: &Bounds, buffer: &mut CellBuffer) {
    let text = node.text().unwrap_or("");
    match node.kind {
        WidgetKind::Label | WidgetKind::Text => {
            for (row, line) in text.lines().take(usize::from(bounds.height)).enumerate() {
                let y = bounds.y + row as u16;
                buffer.put_str(bounds.x, y, &truncate_text(line, bounds.width), clip);
            }
        }
        WidgetKind::Button => {
            let inner = truncate_text(text, bounds.width.saturating_sub(2));
            buffer.put_str(bounds.x, bounds.y, &format!("[{inner}]"), clip);
        }
        WidgetKind::Entry => {
            buffer.put_str(bounds.x, bounds.y, &entry_face(text, bounds.width), clip);
        }
        WidgetKind::MenuButton | WidgetKind::Combobox => {
            let inner = truncate_text(text, bounds.width.saturating_sub(2));
            buffer.put_str(bounds.x, bounds.y, &format!("{inner} ▾"), clip);
        }
        WidgetKind::Scrollbar => {
            let track = if node.props.get("orient").and_then(PropertyValue::as_str) == Some("horizontal") {
                '─'
            } else {
                '│'
            };
            buffer.fill(bounds, track, clip);
        }
        WidgetKind::Frame | WidgetKind::Canvas => {
            let bordered = node
                .props
                .get("borderwidth")
                .and_then(PropertyValue::as_int)
                .is_some_and(|width| width > 0);
            if bordered {
                draw_border(bounds, clip, buffer);
            }
        }
        WidgetKind::Window => {}
    }
}

/// Text padded with underscores to the full width.
fn entry_face(text: &str, width: u16) -> String {
    let inner_width = width.saturating_sub(2);
    let inner = truncate_text(text, inner_width);
    let used = string_width(&inner);
    let pad = "_".repeat(usize::from(inner_width.saturating_sub(used)));
    format!("_{inner}{pad}_")
}

fn draw_border(bounds: &Bounds, clip: &Bounds, buffer: &mut CellBuffer) {
    if bounds.width < 2 || bounds.height < 2 {
        return;
    }
    let right = bounds.right() - 1;
    let bottom = bounds.bottom() - 1;
    let horizontal = "─".repeat(usize::from(bounds.width - 2));

    buffer.put_str(bounds.x, bounds.y, &format!("┌{horizontal}┐"), clip);
    buffer.put_str(bounds.x, bottom, &format!("└{horizontal}┘"), clip);
    for y in bounds.y + 1..bottom {
        buffer.put_str(bounds.x, y, "│", clip);
        buffer.put_str(right, y, "│", clip);
    }
}
