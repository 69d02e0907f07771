//! Stack - the keyed container reconciler.
//!
//! A stack arranges an ordered, keyed list of children along one axis of a
//! native frame (a row or a column of grid cells). Every pass maps the
//! current child list onto live handles with as little churn as possible:
//!
//! 1. Collect the new id order; a duplicate id is an [`Error::Identity`]
//! 2. Destroy the handle of every mounted id that disappeared
//! 3. Forget the placement of every surviving handle
//! 4. Reset track constraints over `max(old, new) + slack` positions
//! 5. Walk the new list assigning positions 0, 1, 2, ...:
//!    - same id, same instance → reuse the handle
//!    - same id, new instance → destroy the old handle, mount the new one
//!    - new id → mount
//!
//!    then place the handle and apply its weight and minimum size
//! 6. Persist the order and the mounted-children table
//!
//! Running a pass twice over an unchanged list creates and destroys nothing.
//!
//! The child list is either static (`set_children`, `add`) or derived: a
//! closure evaluated with the stack's own hooks on every pass, so a stack
//! can select from the store and re-render itself.
//!
//! # Example
//!
//! ```ignore
//! let tasks = column("task_list")?
//!     .derived(|cx| {
//!         let tasks = cx.use_store_selector(|s: &TodoState| s.tasks.clone())?;
//!         tasks.value().iter().map(|task| task_row(task)).collect()
//!     })
//!     .shared();
//! ```

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::rc::Rc;

use super::frame::{create_frame, keep_or_discard, RenderGuard};
use crate::engine::{mount, same_instance, BuildContext, ChildSpec, Component, ComponentCore, ComponentRef, Runtime};
use crate::error::{Error, Result};
use crate::layout::SlotDefaults;
use crate::types::{Axis, ComponentId, Handle, PropertyMap, TrackConfig};

/// Derived child list, evaluated with the stack's hooks.
pub type DeriveChildren = Box<dyn Fn(&mut BuildContext<'_>) -> Result<Vec<ChildSpec>>>;

enum ChildSource {
    Static(RefCell<Vec<ChildSpec>>),
    Derived(DeriveChildren),
}

struct MountedChild {
    child: ComponentRef,
    handle: Handle,
    position: usize,
}

#[derive(Debug, Default)]
struct PassStats {
    reused: usize,
    mounted: usize,
    replaced: usize,
    destroyed: usize,
}

pub struct Stack {
    core: ComponentCore,
    axis: Axis,
    gaps: Option<(u32, u32)>,
    props: PropertyMap,
    debug_color: Option<String>,
    source: ChildSource,
    container: Cell<Option<Handle>>,
    order: RefCell<Vec<ComponentId>>,
    mounted: RefCell<HashMap<ComponentId, MountedChild>>,
    guard: RenderGuard,
}

/// Children laid out left to right.
pub fn row(id: impl Into<String>) -> Result<Stack> {
    Stack::new(id, Axis::Horizontal)
}

/// Children laid out top to bottom.
pub fn column(id: impl Into<String>) -> Result<Stack> {
    Stack::new(id, Axis::Vertical)
}

impl Stack {
    pub fn new(id: impl Into<String>, axis: Axis) -> Result<Self> {
        Ok(Self {
            core: ComponentCore::new(id)?,
            axis,
            gaps: None,
            props: PropertyMap::new(),
            debug_color: None,
            source: ChildSource::Static(RefCell::new(Vec::new())),
            container: Cell::new(None),
            order: RefCell::new(Vec::new()),
            mounted: RefCell::new(HashMap::new()),
            guard: RenderGuard::default(),
        })
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.core = self.core.with_name(Some(name.into()));
        self
    }

    /// Default child padding; the runtime config's gaps otherwise.
    pub fn gaps(mut self, gap_x: u32, gap_y: u32) -> Self {
        self.gaps = Some((gap_x, gap_y));
        self
    }

    pub fn with_props(mut self, props: PropertyMap) -> Self {
        self.props.extend(props);
        self
    }

    pub fn debug_color(mut self, color: impl Into<String>) -> Self {
        self.debug_color = Some(color.into());
        self
    }

    /// Append to the static child list before mounting.
    pub fn child(self, spec: impl Into<ChildSpec>) -> Self {
        if let ChildSource::Static(specs) = &self.source {
            specs.borrow_mut().push(spec.into());
        }
        self
    }

    pub fn children<I, S>(self, specs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<ChildSpec>,
    {
        specs.into_iter().fold(self, Stack::child)
    }

    /// Derive the child list on every pass instead of keeping a static one.
    pub fn derived(mut self, derive: impl Fn(&mut BuildContext<'_>) -> Result<Vec<ChildSpec>> + 'static) -> Self {
        self.source = ChildSource::Derived(Box::new(derive));
        self
    }

    pub fn shared(self) -> Rc<Self> {
        Rc::new(self)
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub fn container(&self) -> Option<Handle> {
        self.container.get()
    }

    /// Ids in their current order.
    pub fn child_ids(&self) -> Vec<ComponentId> {
        self.order.borrow().clone()
    }

    /// Handle and position of a mounted child.
    pub fn slot_of(&self, id: &str) -> Option<(Handle, usize)> {
        self.mounted
            .borrow()
            .get(id)
            .map(|entry| (entry.handle, entry.position))
    }

    /// Replace the static child list and reconcile.
    pub fn set_children(self: &Rc<Self>, specs: Vec<ChildSpec>) -> Result<()> {
        let ChildSource::Static(current) = &self.source else {
            return Err(Error::validation(format!(
                "stack {} derives its children; set_children is not available",
                self.core.id()
            )));
        };
        *current.borrow_mut() = specs;
        self.refresh()
    }

    /// Append to the static child list and reconcile.
    pub fn add(self: &Rc<Self>, spec: impl Into<ChildSpec>) -> Result<()> {
        let ChildSource::Static(current) = &self.source else {
            return Err(Error::validation(format!(
                "stack {} derives its children; add is not available",
                self.core.id()
            )));
        };
        current.borrow_mut().push(spec.into());
        self.refresh()
    }

    /// Run a reconciliation pass. A no-op before mount and after disposal.
    pub fn refresh(self: &Rc<Self>) -> Result<()> {
        if self.core.is_disposed() {
            return Ok(());
        }
        let (Some(runtime), Some(container)) = (self.core.runtime(), self.container.get()) else {
            return Ok(());
        };
        self.guard.run(|| self.reconcile(&runtime, container))
    }

    fn current_specs(self: &Rc<Self>, runtime: &Runtime, container: Handle) -> Result<Vec<ChildSpec>> {
        match &self.source {
            ChildSource::Static(specs) => Ok(specs.borrow().clone()),
            ChildSource::Derived(derive) => {
                let this: ComponentRef = Rc::clone(self) as ComponentRef;
                let mut cx = BuildContext::new(this, runtime, container);
                derive(&mut cx)
            }
        }
    }

    fn reconcile(self: &Rc<Self>, runtime: &Runtime, container: Handle) -> Result<()> {
        let specs = self.current_specs(runtime, container)?;

        // 1. New order; reject duplicates before touching anything.
        let mut seen = HashSet::with_capacity(specs.len());
        for spec in &specs {
            if !seen.insert(spec.id().clone()) {
                return Err(Error::identity(format!(
                    "duplicate child id {:?} in {}",
                    spec.id().as_str(),
                    self.core.id()
                )));
            }
        }

        let toolkit = runtime.toolkit();
        let mut stats = PassStats::default();
        let mut previous = std::mem::take(&mut *self.mounted.borrow_mut());
        let old_count = self.order.borrow().len();

        // 2. Drop children that left the list.
        previous.retain(|id, entry| {
            let keep = seen.contains(id);
            if !keep {
                toolkit.destroy(entry.handle);
                stats.destroyed += 1;
            }
            keep
        });

        // 3. Placement is recomputed from scratch.
        for entry in previous.values() {
            toolkit.forget(entry.handle);
        }

        // 4. No constraint from an old slot survives.
        let span = old_count.max(specs.len()) + runtime.config().track_slack;
        for index in 0..span {
            toolkit.configure_track(container, self.axis, index, TrackConfig::default());
        }

        // 5. Walk the new list.
        let (gap_x, gap_y) = self
            .gaps
            .unwrap_or((runtime.config().gap_x, runtime.config().gap_y));
        let defaults = SlotDefaults::stack(gap_x, gap_y);
        let mut next = HashMap::with_capacity(specs.len());
        let mut order = Vec::with_capacity(specs.len());
        let mut failure = None;

        for (position, spec) in specs.into_iter().enumerate() {
            let id = spec.id().clone();
            let handle = match previous.remove(&id) {
                Some(entry) if same_instance(&entry.child, &spec.child) => {
                    stats.reused += 1;
                    Ok(entry.handle)
                }
                Some(entry) => {
                    toolkit.destroy(entry.handle);
                    stats.replaced += 1;
                    mount(&spec.child, container, runtime)
                }
                None => {
                    stats.mounted += 1;
                    mount(&spec.child, container, runtime)
                }
            };
            let handle = match handle {
                Ok(handle) => handle,
                Err(err) => {
                    failure = Some(err);
                    break;
                }
            };

            let slot = spec.layout.unwrap_or_default().resolve(&defaults);
            toolkit.place(handle, &slot.placement(self.axis, position));
            if slot.weight > 0 || slot.min_size > 0 {
                toolkit.configure_track(container, self.axis, position, slot.track());
            }

            order.push(id.clone());
            next.insert(
                id,
                MountedChild {
                    child: spec.child,
                    handle,
                    position,
                },
            );
        }

        // 6. Persist. After a failed mount, children not yet walked stay
        // tracked so a later pass can still destroy them.
        if failure.is_some() {
            for (id, entry) in previous {
                order.push(id.clone());
                next.insert(id, entry);
            }
        }
        *self.mounted.borrow_mut() = next;
        *self.order.borrow_mut() = order;

        if let Some(err) = failure {
            return Err(err);
        }

        tracing::debug!(
            id = %self.core.id(),
            reused = stats.reused,
            mounted = stats.mounted,
            replaced = stats.replaced,
            destroyed = stats.destroyed,
            "reconciled"
        );
        Ok(())
    }
}

impl Component for Stack {
    fn core(&self) -> &ComponentCore {
        &self.core
    }

    fn create_widget(self: Rc<Self>, parent: Handle, runtime: &Runtime) -> Result<Handle> {
        let container = create_frame(parent, runtime, &self.props, self.debug_color.as_deref())?;
        self.container.set(Some(container));
        let reconciled = self.guard.run(|| self.reconcile(runtime, container));
        keep_or_discard(runtime, container, reconciled).inspect_err(|_| {
            self.container.set(None);
            self.mounted.borrow_mut().clear();
            self.order.borrow_mut().clear();
        })
    }

    fn on_state_changed(self: Rc<Self>) -> Result<()> {
        self.refresh()
    }

    fn on_dispose(&self) {
        self.mounted.borrow_mut().clear();
        self.order.borrow_mut().clear();
    }
}

impl fmt::Debug for Stack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stack")
            .field("id", self.core.id())
            .field("axis", &self.axis)
            .field("order", &*self.order.borrow())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Setter;
    use crate::host::{MemoryToolkit, Toolkit, ToolkitOp};
    use crate::layout::{HAlign, Layout};
    use crate::primitives::{label, Widget};
    use crate::state::{Action, Store};
    use crate::types::{Placement, Sticky, WidgetKind};
    use proptest::prelude::*;

    fn setup() -> (Rc<MemoryToolkit>, Runtime, Handle) {
        let toolkit = Rc::new(MemoryToolkit::new());
        let runtime = Runtime::new(toolkit.clone());
        let window = toolkit.create(None, WidgetKind::Window, &PropertyMap::new()).unwrap();
        runtime.attach_registry(window);
        (toolkit, runtime, window)
    }

    fn item(id: &str) -> Rc<Widget> {
        label(id).unwrap().text(id).shared()
    }

    fn specs(items: &[&Rc<Widget>]) -> Vec<ChildSpec> {
        items.iter().map(|w| ChildSpec::from(Rc::clone(w))).collect()
    }

    fn mounted_column(runtime: &Runtime, window: Handle, items: &[&Rc<Widget>]) -> Rc<Stack> {
        let stack = column("list").unwrap().children(specs(items)).shared();
        let component: ComponentRef = stack.clone();
        mount(&component, window, runtime).unwrap();
        stack
    }

    fn placements(toolkit: &MemoryToolkit, stack: &Stack) -> Vec<(String, Placement)> {
        stack
            .child_ids()
            .iter()
            .map(|id| {
                let (handle, _) = stack.slot_of(id.as_str()).unwrap();
                (id.to_string(), toolkit.node(handle).unwrap().placement.unwrap())
            })
            .collect()
    }

    #[test]
    fn test_initial_pass_places_in_order() {
        let (toolkit, runtime, window) = setup();
        let (a, b) = (item("a"), item("b"));
        let stack = mounted_column(&runtime, window, &[&a, &b]);

        let placed = placements(&toolkit, &stack);
        assert_eq!(placed[0].0, "a");
        assert_eq!((placed[0].1.row, placed[0].1.column), (0, 0));
        assert_eq!((placed[1].1.row, placed[1].1.column), (1, 0));
        assert_eq!(placed[1].1.sticky, Sticky::W);
        assert_eq!((placed[1].1.padx, placed[1].1.pady), (6, 4));
        assert_eq!(runtime.registry_for(window).unwrap().get("b"), b.core().handle());
    }

    #[test]
    fn test_row_places_along_columns() {
        let (toolkit, runtime, window) = setup();
        let (a, b) = (item("a"), item("b"));
        let stack = row("bar").unwrap().gaps(1, 0).children(specs(&[&a, &b])).shared();
        let component: ComponentRef = stack.clone();
        mount(&component, window, &runtime).unwrap();

        let placement = toolkit.node(b.core().handle().unwrap()).unwrap().placement.unwrap();
        assert_eq!((placement.row, placement.column), (0, 1));
        assert_eq!((placement.padx, placement.pady), (1, 0));
    }

    #[test]
    fn test_refresh_is_idempotent() {
        let (toolkit, runtime, window) = setup();
        let (a, b, c) = (item("a"), item("b"), item("c"));
        let stack = mounted_column(&runtime, window, &[&a, &b, &c]);
        let before = placements(&toolkit, &stack);

        toolkit.take_ops();
        stack.refresh().unwrap();

        assert_eq!(toolkit.created_count(), 0);
        assert_eq!(toolkit.destroyed_count(), 0);
        assert_eq!(placements(&toolkit, &stack), before);
    }

    #[test]
    fn test_reorder_preserves_handles() {
        let (toolkit, runtime, window) = setup();
        let (a, b) = (item("a"), item("b"));
        let stack = mounted_column(&runtime, window, &[&a, &b]);
        let (ha, hb) = (a.core().handle().unwrap(), b.core().handle().unwrap());

        toolkit.take_ops();
        stack.set_children(specs(&[&b, &a])).unwrap();

        assert_eq!(toolkit.created_count(), 0);
        assert_eq!(toolkit.destroyed_count(), 0);
        assert_eq!(stack.slot_of("b"), Some((hb, 0)));
        assert_eq!(stack.slot_of("a"), Some((ha, 1)));
        assert_eq!(toolkit.node(ha).unwrap().placement.unwrap().row, 1);
    }

    #[test]
    fn test_replacement_destroys_before_mounting() {
        let (toolkit, runtime, window) = setup();
        let a = item("a");
        let stack = mounted_column(&runtime, window, &[&a]);
        let old_handle = a.core().handle().unwrap();

        let a2 = item("a");
        toolkit.take_ops();
        stack.set_children(specs(&[&a2])).unwrap();

        let ops = toolkit.ops();
        let destroyed_at = ops
            .iter()
            .position(|op| *op == ToolkitOp::Destroy { handle: old_handle })
            .unwrap();
        let new_handle = a2.core().handle().unwrap();
        let created_at = ops
            .iter()
            .position(|op| matches!(op, ToolkitOp::Create { handle, .. } if *handle == new_handle))
            .unwrap();
        assert!(destroyed_at < created_at);
        assert!(a.core().is_disposed());
        assert!(a2.core().is_mounted());
        assert_eq!(runtime.registry_for(window).unwrap().get("a"), Some(new_handle));
    }

    #[test]
    fn test_removed_child_destroyed_and_tracks_reset() {
        let (toolkit, runtime, window) = setup();
        let (a, b) = (item("a"), item("b"));
        let stack = column("list")
            .unwrap()
            .child(a.clone())
            .child((b.clone(), Layout::new().expand().size(3)))
            .shared();
        let component: ComponentRef = stack.clone();
        let container = mount(&component, window, &runtime).unwrap();
        assert_eq!(
            toolkit.node(container).unwrap().track(Axis::Vertical, 1),
            TrackConfig { weight: 1, min_size: 3 }
        );

        stack.set_children(specs(&[&a])).unwrap();

        assert!(b.core().is_disposed());
        assert_eq!(stack.child_ids().len(), 1);
        assert_eq!(toolkit.node(container).unwrap().track(Axis::Vertical, 1), TrackConfig::default());
        assert_eq!(runtime.registry_for(window).unwrap().get("b"), None);
    }

    #[test]
    fn test_track_reset_spans_slack() {
        let (toolkit, runtime, window) = setup();
        let a = item("a");
        let stack = mounted_column(&runtime, window, &[&a]);
        let container = stack.container().unwrap();

        toolkit.take_ops();
        stack.refresh().unwrap();
        let resets = toolkit.count_ops(|op| {
            matches!(op, ToolkitOp::Track { container: c, track, .. } if *c == container && *track == TrackConfig::default())
        });
        assert_eq!(resets, 1 + runtime.config().track_slack);
    }

    #[test]
    fn test_alignment_resolves_sticky() {
        let (toolkit, runtime, window) = setup();
        let a = item("a");
        let stack = column("list")
            .unwrap()
            .child((a.clone(), Layout::new().halign(HAlign::Stretch)))
            .shared();
        let component: ComponentRef = stack.clone();
        mount(&component, window, &runtime).unwrap();

        let placement = toolkit.node(a.core().handle().unwrap()).unwrap().placement.unwrap();
        assert_eq!(placement.sticky, Sticky::EW);
    }

    #[test]
    fn test_duplicate_ids_rejected_without_changes() {
        let (toolkit, runtime, window) = setup();
        let a = item("a");
        let stack = mounted_column(&runtime, window, &[&a]);
        let twin = item("a");

        toolkit.take_ops();
        let err = stack.set_children(specs(&[&a, &twin])).unwrap_err();

        assert!(matches!(err, Error::Identity { .. }));
        assert!(toolkit.ops().is_empty());
        assert!(a.core().is_mounted());
    }

    #[test]
    fn test_add_appends_and_mounts() {
        let (toolkit, runtime, window) = setup();
        let a = item("a");
        let stack = mounted_column(&runtime, window, &[&a]);

        let b = item("b");
        toolkit.take_ops();
        stack.add(b.clone()).unwrap();

        assert_eq!(toolkit.created_count(), 1);
        assert_eq!(stack.slot_of("b").map(|(_, p)| p), Some(1));
    }

    #[test]
    fn test_derived_stack_follows_store() {
        let (toolkit, runtime, window) = setup();
        let store = Store::new(
            |items: &Vec<String>, action: &Action| {
                let mut next = items.clone();
                match action.kind.as_str() {
                    "PUSH" => next.push(action.payload_str().unwrap_or_default().to_string()),
                    "POP" => {
                        next.pop();
                    }
                    _ => {}
                }
                next
            },
            vec!["x".to_string()],
        );
        runtime.configure_store(store.clone());

        let stack = column("derived")
            .unwrap()
            .derived(|cx| {
                let names = cx.use_store_selector(|items: &Vec<String>| items.clone())?;
                names
                    .value()
                    .iter()
                    .map(|name| Ok(ChildSpec::from(label(name.clone())?.text(name.as_str()).shared())))
                    .collect()
            })
            .shared();
        let component: ComponentRef = stack.clone();
        let container = mount(&component, window, &runtime).unwrap();
        assert_eq!(toolkit.children(container).len(), 1);

        store.dispatch(Action::with_payload("PUSH", "y")).unwrap();
        assert_eq!(
            stack.child_ids().iter().map(ComponentId::to_string).collect::<Vec<_>>(),
            vec!["x", "y"]
        );

        // Fresh instances each pass: same ids are replaced, not reused.
        store.dispatch(Action::new("POP")).unwrap();
        assert_eq!(stack.child_ids().len(), 1);
        assert_eq!(toolkit.children(container).len(), 1);

        toolkit.destroy(container);
        assert_eq!(store.listener_count(), 0);
    }

    #[test]
    fn test_selector_short_circuit_skips_pass() {
        let (toolkit, runtime, window) = setup();
        let store = Store::new(
            |s: &(i64, i64), a: &Action| if a.is("OTHER") { (s.0, s.1 + 1) } else { *s },
            (0, 0),
        );
        runtime.configure_store(store.clone());

        let a = item("a");
        let a_clone = a.clone();
        let stack = column("list")
            .unwrap()
            .derived(move |cx| {
                cx.use_store_selector(|s: &(i64, i64)| s.0)?;
                Ok(vec![ChildSpec::from(a_clone.clone())])
            })
            .shared();
        let component: ComponentRef = stack.clone();
        mount(&component, window, &runtime).unwrap();

        toolkit.take_ops();
        store.dispatch(Action::new("OTHER")).unwrap();
        assert!(toolkit.ops().is_empty());
    }

    #[test]
    fn test_own_state_triggers_refresh() {
        let (_toolkit, runtime, window) = setup();
        let (a, b) = (item("a"), item("b"));
        let setter_out: Rc<RefCell<Option<Setter<bool>>>> = Rc::new(RefCell::new(None));

        let (a_clone, b_clone, setter_clone) = (a.clone(), b.clone(), setter_out.clone());
        let stack = column("filtered")
            .unwrap()
            .derived(move |cx| {
                let (show_all, set) = cx.use_state(false)?;
                *setter_clone.borrow_mut() = Some(set);
                let mut children = vec![ChildSpec::from(a_clone.clone())];
                if show_all.value() {
                    children.push(ChildSpec::from(b_clone.clone()));
                }
                Ok(children)
            })
            .shared();
        let component: ComponentRef = stack.clone();
        mount(&component, window, &runtime).unwrap();
        assert_eq!(stack.child_ids().len(), 1);

        let setter = setter_out.borrow().clone().unwrap();
        setter.set(true).unwrap();
        assert_eq!(stack.child_ids().len(), 2);
        assert!(b.core().is_mounted());

        setter.set(false).unwrap();
        assert!(b.core().is_disposed());
    }

    #[test]
    fn test_set_children_on_derived_fails() {
        let (_, runtime, window) = setup();
        let stack = column("d").unwrap().derived(|_| Ok(Vec::new())).shared();
        let component: ComponentRef = stack.clone();
        mount(&component, window, &runtime).unwrap();

        assert!(matches!(stack.set_children(Vec::new()), Err(Error::Validation { .. })));
    }

    #[test]
    fn test_disposal_clears_table() {
        let (toolkit, runtime, window) = setup();
        let a = item("a");
        let stack = mounted_column(&runtime, window, &[&a]);

        toolkit.destroy(stack.container().unwrap());
        assert!(a.core().is_disposed());
        assert!(stack.child_ids().is_empty());
        // Refresh after disposal is a no-op.
        stack.refresh().unwrap();
    }

    #[test]
    fn test_failed_mount_discards_container() {
        let (toolkit, runtime, window) = setup();
        let a = item("a");
        let taken: ComponentRef = a.clone();
        mount(&taken, window, &runtime).unwrap();
        let before = toolkit.children(window).len();

        let c = item("c");
        let bad = column("bad").unwrap().child(c.clone()).child(a.clone()).shared();
        let component: ComponentRef = bad.clone();

        let err = mount(&component, window, &runtime).unwrap_err();
        assert_eq!(err, Error::DoubleMount { id: "a".into() });
        assert_eq!(toolkit.children(window).len(), before);
        let registry = runtime.registry_for(window).unwrap();
        assert_eq!(registry.get("c"), None);
        assert_eq!(registry.get("bad"), None);
        assert!(registry.get("a").is_some());
        assert_eq!(bad.core().lifecycle(), crate::engine::Lifecycle::Unmounted);
        assert_eq!(bad.container(), None);
        assert!(bad.child_ids().is_empty());
        assert!(c.core().is_disposed());
        assert!(a.core().is_mounted());
    }

    proptest! {
        #[test]
        fn prop_permutation_reuses_every_handle(order in Just((0..6usize).collect::<Vec<_>>()).prop_shuffle()) {
            let (toolkit, runtime, window) = setup();
            let items: Vec<Rc<Widget>> = (0..6).map(|i| item(&format!("item{i}"))).collect();
            let refs: Vec<&Rc<Widget>> = items.iter().collect();
            let stack = mounted_column(&runtime, window, &refs);

            let shuffled: Vec<&Rc<Widget>> = order.iter().map(|&i| &items[i]).collect();
            toolkit.take_ops();
            stack.set_children(specs(&shuffled)).unwrap();
            let after_first = placements(&toolkit, &stack);

            stack.refresh().unwrap();

            prop_assert_eq!(toolkit.created_count(), 0);
            prop_assert_eq!(toolkit.destroyed_count(), 0);
            prop_assert_eq!(placements(&toolkit, &stack), after_first);
            for (position, &index) in order.iter().enumerate() {
                let id = format!("item{index}");
                prop_assert_eq!(stack.slot_of(&id).map(|(_, p)| p), Some(position));
            }
        }
    }
}
