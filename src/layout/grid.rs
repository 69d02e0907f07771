//! Grid geometry - lays a toolkit subtree out with Taffy.
//!
//! Converts the grid placements and track constraints recorded on a
//! [`MemoryToolkit`] into a Taffy CSS-grid tree, runs layout, and extracts
//! absolute cell rectangles:
//!
//! 1. Elements with placed children become grid containers; their tracks
//!    come from the configured [`TrackConfig`]s (weight → `fr`, minimum →
//!    track minimum, free space never goes to weightless tracks)
//! 2. Grid placements become grid lines, sticky edges become
//!    `align_self`/`justify_self`, padding becomes margin
//! 3. Text-bearing leaves are measured in terminal cells
//! 4. Relatively placed elements are laid out as separate roots at their
//!    max-content size and positioned by anchor arithmetic afterwards
//!
//! Elements with neither kind of placement are not visible and get no rect.

use std::collections::{BTreeMap, HashMap};

use taffy::style_helpers::{auto, fr, length, line, minmax, span};
use taffy::{
    AlignContent, AlignItems, AvailableSpace, Display, JustifyContent, Line, NodeId, Rect, Size, Style,
    TaffyError, TaffyTree, TrackSizingFunction,
};

use super::text_measure::text_extent;
use crate::error::{Error, Result};
use crate::host::{MemoryToolkit, NodeSnapshot};
use crate::types::{Anchored, Handle, Placement, PropertyValue, Sticky, TrackConfig, WidgetKind};

/// Absolute cell rectangle of one element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Bounds {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl Bounds {
    pub fn right(&self) -> u16 {
        self.x.saturating_add(self.width)
    }

    pub fn bottom(&self) -> u16 {
        self.y.saturating_add(self.height)
    }

    pub fn contains(&self, x: u16, y: u16) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }
}

/// Rect of every visible element under the laid-out root.
pub type Geometry = HashMap<Handle, Bounds>;

struct NodeContext {
    handle: Handle,
    intrinsic: Size<f32>,
}

struct Floating {
    node: NodeId,
    parent: Handle,
    anchored: Anchored,
}

struct GridBuilder<'a> {
    toolkit: &'a MemoryToolkit,
    tree: TaffyTree<NodeContext>,
    floating: Vec<Floating>,
}

// =============================================================================
// Style conversion
// =============================================================================

fn edge_alignment(start: bool, end: bool) -> AlignItems {
    match (start, end) {
        (true, true) => AlignItems::Stretch,
        (true, false) => AlignItems::Start,
        (false, true) => AlignItems::End,
        (false, false) => AlignItems::Center,
    }
}

fn grid_line(index: usize) -> Line<taffy::GridPlacement> {
    Line {
        start: line(i16::try_from(index + 1).unwrap_or(i16::MAX)),
        end: span(1),
    }
}

/// Style of an element as an item of its parent's grid.
fn item_style(placement: &Placement) -> Style {
    let sticky = placement.sticky;
    let padx = placement.padx as f32;
    let pady = placement.pady as f32;
    Style {
        grid_row: grid_line(placement.row),
        grid_column: grid_line(placement.column),
        align_self: Some(edge_alignment(sticky.contains(Sticky::N), sticky.contains(Sticky::S))),
        justify_self: Some(edge_alignment(sticky.contains(Sticky::W), sticky.contains(Sticky::E))),
        margin: Rect {
            left: length(padx),
            right: length(padx),
            top: length(pady),
            bottom: length(pady),
        },
        ..Style::default()
    }
}

/// Track list covering every occupied or configured index.
fn tracks(configs: &BTreeMap<usize, TrackConfig>, occupied: usize) -> Vec<TrackSizingFunction> {
    let configured = configs
        .iter()
        .filter(|(_, track)| **track != TrackConfig::default())
        .map(|(&index, _)| index + 1)
        .max()
        .unwrap_or(0);

    (0..occupied.max(configured))
        .map(|index| {
            let track = configs.get(&index).copied().unwrap_or_default();
            let min = length(track.min_size as f32);
            if track.weight > 0 {
                TrackSizingFunction::Single(minmax(min, fr(track.weight as f32)))
            } else {
                TrackSizingFunction::Single(minmax(min, auto()))
            }
        })
        .collect()
}

fn int_prop(node: &NodeSnapshot, key: &str) -> Option<u16> {
    node.props
        .get(key)
        .and_then(PropertyValue::as_int)
        .and_then(|n| u16::try_from(n).ok())
}

/// Natural size of a leaf in cells, including its decoration.
fn intrinsic_size(node: &NodeSnapshot) -> Size<f32> {
    let (text_width, text_height) = text_extent(node.text().unwrap_or(""));
    let (width, height) = match node.kind {
        WidgetKind::Label => (text_width, text_height),
        WidgetKind::Button | WidgetKind::MenuButton | WidgetKind::Combobox => (text_width.saturating_add(2), 1),
        WidgetKind::Entry => (text_width.max(int_prop(node, "width").unwrap_or(12)).saturating_add(2), 1),
        WidgetKind::Text => (
            int_prop(node, "width").unwrap_or(text_width),
            int_prop(node, "height").unwrap_or(text_height),
        ),
        WidgetKind::Scrollbar => (1, 1),
        WidgetKind::Window | WidgetKind::Frame | WidgetKind::Canvas => (0, 0),
    };
    Size {
        width: f32::from(width),
        height: f32::from(height),
    }
}

fn layout_error(root: Handle) -> impl Fn(TaffyError) -> Error {
    move |err| Error::Toolkit {
        handle: Some(root),
        reason: format!("layout failed: {err}"),
    }
}

fn to_cell(value: f32) -> u16 {
    value.round().max(0.0) as u16
}

// =============================================================================
// Tree building
// =============================================================================

impl GridBuilder<'_> {
    fn build(&mut self, node: &NodeSnapshot, mut style: Style) -> std::result::Result<NodeId, TaffyError> {
        let mut items = Vec::new();
        let (mut rows, mut columns) = (0, 0);

        for &child in &node.children {
            let Some(snapshot) = self.toolkit.node(child) else {
                continue;
            };
            if let Some(placement) = snapshot.placement {
                rows = rows.max(placement.row + 1);
                columns = columns.max(placement.column + 1);
                items.push(self.build(&snapshot, item_style(&placement))?);
            } else if let Some(anchored) = snapshot.relative {
                let floating = self.build(&snapshot, Style::default())?;
                self.floating.push(Floating {
                    node: floating,
                    parent: node.handle,
                    anchored,
                });
            }
        }

        let is_container = !items.is_empty() || !node.rows.is_empty() || !node.columns.is_empty();
        if is_container {
            style.display = Display::Grid;
            style.grid_template_rows = tracks(&node.rows, rows);
            style.grid_template_columns = tracks(&node.columns, columns);
            style.align_content = Some(AlignContent::Start);
            style.justify_content = Some(JustifyContent::Start);
        }

        let id = self.tree.new_with_children(style, &items)?;
        let intrinsic = if is_container { Size::ZERO } else { intrinsic_size(node) };
        self.tree.set_node_context(
            id,
            Some(NodeContext {
                handle: node.handle,
                intrinsic,
            }),
        )?;
        Ok(id)
    }

    fn compute(&mut self, node: NodeId, available: Size<AvailableSpace>) -> std::result::Result<(), TaffyError> {
        self.tree.compute_layout_with_measure(
            node,
            available,
            |known: Size<Option<f32>>,
             _available: Size<AvailableSpace>,
             _id: NodeId,
             context: Option<&mut NodeContext>,
             _style: &Style| {
                let intrinsic = context.map_or(Size::ZERO, |ctx| ctx.intrinsic);
                Size {
                    width: known.width.unwrap_or(intrinsic.width),
                    height: known.height.unwrap_or(intrinsic.height),
                }
            },
        )
    }

    /// Record absolute rects for `node` and its grid descendants.
    fn collect(&self, node: NodeId, origin: (f32, f32), out: &mut Geometry) -> std::result::Result<(), TaffyError> {
        let layout = self.tree.layout(node)?;
        let x = origin.0 + layout.location.x;
        let y = origin.1 + layout.location.y;

        if let Some(ctx) = self.tree.get_node_context(node) {
            out.insert(
                ctx.handle,
                Bounds {
                    x: to_cell(x),
                    y: to_cell(y),
                    width: to_cell(layout.size.width),
                    height: to_cell(layout.size.height),
                },
            );
        }

        for child in self.tree.children(node)? {
            self.collect(child, (x, y), out)?;
        }
        Ok(())
    }
}

// =============================================================================
// Entry point
// =============================================================================

/// Lay out `root` into a `width` x `height` cell area.
///
/// Fails with [`Error::Toolkit`] when `root` is not alive.
pub fn compute_geometry(toolkit: &MemoryToolkit, root: Handle, width: u16, height: u16) -> Result<Geometry> {
    let snapshot = toolkit.node(root).ok_or_else(|| Error::Toolkit {
        handle: Some(root),
        reason: "cannot lay out a destroyed widget".into(),
    })?;

    let mut builder = GridBuilder {
        toolkit,
        tree: TaffyTree::new(),
        floating: Vec::new(),
    };

    let root_style = Style {
        size: Size {
            width: length(f32::from(width)),
            height: length(f32::from(height)),
        },
        ..Style::default()
    };
    let root_node = builder.build(&snapshot, root_style).map_err(layout_error(root))?;

    let available = Size {
        width: AvailableSpace::Definite(f32::from(width)),
        height: AvailableSpace::Definite(f32::from(height)),
    };
    builder.compute(root_node, available).map_err(layout_error(root))?;

    let mut geometry = Geometry::new();
    builder
        .collect(root_node, (0.0, 0.0), &mut geometry)
        .map_err(layout_error(root))?;

    // Parents precede their floating descendants in discovery order.
    let floating = std::mem::take(&mut builder.floating);
    for Floating { node, parent, anchored } in floating {
        let Some(parent_bounds) = geometry.get(&parent).copied() else {
            continue;
        };
        let max_content = Size {
            width: AvailableSpace::MaxContent,
            height: AvailableSpace::MaxContent,
        };
        builder.compute(node, max_content).map_err(layout_error(root))?;
        let size = builder.tree.layout(node).map_err(layout_error(root))?.size;

        let (fx, fy) = anchored.anchor.offset_fraction();
        let x = f32::from(parent_bounds.x) + anchored.relx * f32::from(parent_bounds.width) + anchored.x as f32
            - fx * size.width;
        let y = f32::from(parent_bounds.y) + anchored.rely * f32::from(parent_bounds.height) + anchored.y as f32
            - fy * size.height;

        builder
            .collect(node, (x, y), &mut geometry)
            .map_err(layout_error(root))?;
    }

    tracing::trace!(%root, width, height, laid_out = geometry.len(), "geometry computed");
    Ok(geometry)
}
