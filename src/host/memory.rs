//! In-process toolkit.
//!
//! Keeps every element in an arena keyed by handle and records each
//! mutating operation in an op log, so tests can assert exactly how much
//! churn a reconciliation pass caused. Destroyed elements are removed from
//! the arena; any later operation on their handle is ignored.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

use super::{DestroyCallback, Toolkit};
use crate::error::{Error, Result};
use crate::types::{
    Anchored, Axis, Command, Handle, Placement, PropertyMap, PropertyValue, TrackConfig, WidgetKind,
};

// =============================================================================
// Op log
// =============================================================================

/// One mutating operation, as recorded by [`MemoryToolkit`].
#[derive(Debug, Clone, PartialEq)]
pub enum ToolkitOp {
    Create { handle: Handle, kind: WidgetKind },
    Destroy { handle: Handle },
    Configure { handle: Handle },
    Place { handle: Handle, placement: Placement },
    PlaceRelative { handle: Handle },
    Forget { handle: Handle },
    Track { container: Handle, axis: Axis, index: usize, track: TrackConfig },
}

// =============================================================================
// Arena
// =============================================================================

struct Node {
    kind: WidgetKind,
    parent: Option<Handle>,
    children: Vec<Handle>,
    props: PropertyMap,
    placement: Option<Placement>,
    relative: Option<Anchored>,
    rows: BTreeMap<usize, TrackConfig>,
    columns: BTreeMap<usize, TrackConfig>,
    observers: Vec<DestroyCallback>,
    command: Option<Command>,
    menu: Vec<(String, Command)>,
}

#[derive(Default)]
struct Arena {
    nodes: HashMap<Handle, Node>,
    next_handle: u64,
    ops: Vec<ToolkitOp>,
}

impl Arena {
    /// Handles of `root`'s subtree, children before parents.
    fn subtree_post_order(&self, root: Handle, out: &mut Vec<Handle>) {
        if let Some(node) = self.nodes.get(&root) {
            for &child in &node.children {
                self.subtree_post_order(child, out);
            }
            out.push(root);
        }
    }
}

/// Read-only copy of one element's state.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeSnapshot {
    pub handle: Handle,
    pub kind: WidgetKind,
    pub parent: Option<Handle>,
    pub children: Vec<Handle>,
    pub props: PropertyMap,
    pub placement: Option<Placement>,
    pub relative: Option<Anchored>,
    pub rows: BTreeMap<usize, TrackConfig>,
    pub columns: BTreeMap<usize, TrackConfig>,
    pub menu_items: Vec<String>,
}

impl NodeSnapshot {
    pub fn text(&self) -> Option<&str> {
        self.props.get("text").and_then(PropertyValue::as_str)
    }

    /// Track configuration along `axis` at `index` (default when never set).
    pub fn track(&self, axis: Axis, index: usize) -> TrackConfig {
        let tracks = match axis {
            Axis::Vertical => &self.rows,
            Axis::Horizontal => &self.columns,
        };
        tracks.get(&index).copied().unwrap_or_default()
    }
}

// =============================================================================
// MemoryToolkit
// =============================================================================

/// Toolkit that keeps its element tree in memory.
#[derive(Default)]
pub struct MemoryToolkit {
    arena: RefCell<Arena>,
}

impl MemoryToolkit {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of a live element.
    pub fn node(&self, handle: Handle) -> Option<NodeSnapshot> {
        let arena = self.arena.borrow();
        arena.nodes.get(&handle).map(|node| NodeSnapshot {
            handle,
            kind: node.kind,
            parent: node.parent,
            children: node.children.clone(),
            props: node.props.clone(),
            placement: node.placement,
            relative: node.relative,
            rows: node.rows.clone(),
            columns: node.columns.clone(),
            menu_items: node.menu.iter().map(|(label, _)| label.clone()).collect(),
        })
    }

    pub fn live_count(&self) -> usize {
        self.arena.borrow().nodes.len()
    }

    /// Every operation recorded so far.
    pub fn ops(&self) -> Vec<ToolkitOp> {
        self.arena.borrow().ops.clone()
    }

    /// Drain the op log.
    pub fn take_ops(&self) -> Vec<ToolkitOp> {
        std::mem::take(&mut self.arena.borrow_mut().ops)
    }

    pub fn count_ops(&self, predicate: impl Fn(&ToolkitOp) -> bool) -> usize {
        self.arena.borrow().ops.iter().filter(|op| predicate(op)).count()
    }

    pub fn created_count(&self) -> usize {
        self.count_ops(|op| matches!(op, ToolkitOp::Create { .. }))
    }

    pub fn destroyed_count(&self) -> usize {
        self.count_ops(|op| matches!(op, ToolkitOp::Destroy { .. }))
    }

    /// Simulate the user activating a widget. Returns false when the
    /// handle is dead or has no command.
    pub fn invoke(&self, handle: Handle) -> bool {
        let command = {
            let arena = self.arena.borrow();
            arena.nodes.get(&handle).and_then(|node| node.command.clone())
        };
        match command {
            Some(command) => {
                command();
                true
            }
            None => false,
        }
    }

    /// Simulate picking a menu entry by label.
    pub fn invoke_menu_item(&self, handle: Handle, label: &str) -> bool {
        let command = {
            let arena = self.arena.borrow();
            arena.nodes.get(&handle).and_then(|node| {
                node.menu
                    .iter()
                    .find(|(item, _)| item == label)
                    .map(|(_, command)| command.clone())
            })
        };
        match command {
            Some(command) => {
                command();
                true
            }
            None => false,
        }
    }

    fn with_node(&self, handle: Handle, f: impl FnOnce(&mut Node)) -> bool {
        let mut arena = self.arena.borrow_mut();
        match arena.nodes.get_mut(&handle) {
            Some(node) => {
                f(node);
                true
            }
            None => false,
        }
    }

    fn record(&self, op: ToolkitOp) {
        self.arena.borrow_mut().ops.push(op);
    }
}

impl Toolkit for MemoryToolkit {
    fn create(&self, parent: Option<Handle>, kind: WidgetKind, props: &PropertyMap) -> Result<Handle> {
        let arena = &mut *self.arena.borrow_mut();

        if let Some(parent) = parent {
            if !arena.nodes.contains_key(&parent) {
                return Err(Error::Toolkit {
                    handle: Some(parent),
                    reason: "parent has been destroyed".into(),
                });
            }
        }

        arena.next_handle += 1;
        let handle = Handle(arena.next_handle);
        if let Some(parent_node) = parent.and_then(|p| arena.nodes.get_mut(&p)) {
            parent_node.children.push(handle);
        }
        arena.nodes.insert(
            handle,
            Node {
                kind,
                parent,
                children: Vec::new(),
                props: props.clone(),
                placement: None,
                relative: None,
                rows: BTreeMap::new(),
                columns: BTreeMap::new(),
                observers: Vec::new(),
                command: None,
                menu: Vec::new(),
            },
        );
        arena.ops.push(ToolkitOp::Create { handle, kind });
        Ok(handle)
    }

    fn destroy(&self, handle: Handle) {
        let callbacks = {
            let mut arena = self.arena.borrow_mut();
            if !arena.nodes.contains_key(&handle) {
                return;
            }

            let mut doomed = Vec::new();
            arena.subtree_post_order(handle, &mut doomed);

            let parent = arena.nodes.get(&handle).and_then(|node| node.parent);
            if let Some(parent) = parent.and_then(|p| arena.nodes.get_mut(&p)) {
                parent.children.retain(|&child| child != handle);
            }

            let mut callbacks = Vec::new();
            for doomed_handle in doomed {
                if let Some(node) = arena.nodes.remove(&doomed_handle) {
                    callbacks.extend(node.observers);
                }
                arena.ops.push(ToolkitOp::Destroy { handle: doomed_handle });
            }
            callbacks
        };

        // Observers may call back into the toolkit.
        for callback in callbacks {
            callback();
        }
    }

    fn configure(&self, handle: Handle, props: &PropertyMap) -> Result<()> {
        let applied = self.with_node(handle, |node| {
            for (key, value) in props {
                node.props.insert(key.clone(), value.clone());
            }
        });
        if !applied {
            return Err(Error::Toolkit {
                handle: Some(handle),
                reason: "configure on destroyed widget".into(),
            });
        }
        self.record(ToolkitOp::Configure { handle });
        Ok(())
    }

    fn property(&self, handle: Handle, key: &str) -> Option<PropertyValue> {
        let arena = self.arena.borrow();
        arena.nodes.get(&handle).and_then(|node| node.props.get(key).cloned())
    }

    fn observe_destroy(&self, handle: Handle, callback: DestroyCallback) {
        let mut arena = self.arena.borrow_mut();
        if let Some(node) = arena.nodes.get_mut(&handle) {
            node.observers.push(callback);
        }
    }

    fn place(&self, handle: Handle, placement: &Placement) {
        if self.with_node(handle, |node| {
            node.placement = Some(*placement);
            node.relative = None;
        }) {
            self.record(ToolkitOp::Place { handle, placement: *placement });
        }
    }

    fn place_relative(&self, handle: Handle, anchored: &Anchored) {
        if self.with_node(handle, |node| {
            node.relative = Some(*anchored);
            node.placement = None;
        }) {
            self.record(ToolkitOp::PlaceRelative { handle });
        }
    }

    fn forget(&self, handle: Handle) {
        if self.with_node(handle, |node| {
            node.placement = None;
            node.relative = None;
        }) {
            self.record(ToolkitOp::Forget { handle });
        }
    }

    fn configure_track(&self, container: Handle, axis: Axis, index: usize, track: TrackConfig) {
        if self.with_node(container, |node| {
            let tracks = match axis {
                Axis::Vertical => &mut node.rows,
                Axis::Horizontal => &mut node.columns,
            };
            tracks.insert(index, track);
        }) {
            self.record(ToolkitOp::Track { container, axis, index, track });
        }
    }

    fn set_command(&self, handle: Handle, command: Command) {
        self.with_node(handle, |node| node.command = Some(command));
    }

    fn add_menu_item(&self, handle: Handle, label: &str, command: Command) {
        self.with_node(handle, |node| node.menu.push((label.to_string(), command)));
    }

    fn children(&self, handle: Handle) -> Vec<Handle> {
        let arena = self.arena.borrow();
        arena
            .nodes
            .get(&handle)
            .map(|node| node.children.clone())
            .unwrap_or_default()
    }

    fn toplevel(&self, handle: Handle) -> Option<Handle> {
        let arena = self.arena.borrow();
        let mut current = handle;
        loop {
            let node = arena.nodes.get(&current)?;
            if node.kind == WidgetKind::Window {
                return Some(current);
            }
            match node.parent {
                Some(parent) => current = parent,
                None => return Some(current),
            }
        }
    }

    fn is_alive(&self, handle: Handle) -> bool {
        self.arena.borrow().nodes.contains_key(&handle)
    }

    fn raise(&self, handle: Handle) {
        let mut arena = self.arena.borrow_mut();
        let parent = arena.nodes.get(&handle).and_then(|node| node.parent);
        if let Some(parent) = parent.and_then(|p| arena.nodes.get_mut(&p)) {
            parent.children.retain(|&child| child != handle);
            parent.children.push(handle);
        }
    }

    fn lower(&self, handle: Handle) {
        let mut arena = self.arena.borrow_mut();
        let parent = arena.nodes.get(&handle).and_then(|node| node.parent);
        if let Some(parent) = parent.and_then(|p| arena.nodes.get_mut(&p)) {
            parent.children.retain(|&child| child != handle);
            parent.children.insert(0, handle);
        }
    }
}

impl fmt::Debug for MemoryToolkit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let arena = self.arena.borrow();
        f.debug_struct("MemoryToolkit")
            .field("live", &arena.nodes.len())
            .field("ops", &arena.ops.len())
            .finish()
    }
}
