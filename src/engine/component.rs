//! Component lifecycle.
//!
//! Every component carries a [`ComponentCore`]: identity, lifecycle state,
//! hook slots and the subscriptions it owns. The lifecycle is
//!
//! ```text
//! Unmounted ──mount──▶ Mounted ──handle destroyed──▶ Disposed
//! ```
//!
//! Disposal is never called by user code. `mount` attaches a destroy
//! observer to the new handle, and whatever destroys that handle (the owning
//! container's reconciler, or an ancestor going away) triggers the cascade:
//! registry entry removed, subscriptions released, hook slots cleared.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use super::hooks::HookSlots;
use super::runtime::Runtime;
use crate::error::{Error, Result};
use crate::layout::Layout;
use crate::reactive::Subscription;
use crate::types::{ComponentId, Handle};

// =============================================================================
// Lifecycle
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Unmounted,
    Mounted,
    /// Terminal.
    Disposed,
}

// =============================================================================
// ComponentCore
// =============================================================================

/// State every component carries, whatever its kind.
pub struct ComponentCore {
    id: ComponentId,
    name: Option<String>,
    lifecycle: Cell<Lifecycle>,
    handle: Cell<Option<Handle>>,
    parent: Cell<Option<Handle>>,
    runtime: RefCell<Option<Runtime>>,
    pub(crate) hooks: RefCell<HookSlots>,
    subscriptions: RefCell<Vec<Subscription>>,
}

impl ComponentCore {
    /// Fails with [`Error::Identity`] when `id` is empty.
    pub fn new(id: impl Into<String>) -> Result<Self> {
        Ok(Self {
            id: ComponentId::new(id)?,
            name: None,
            lifecycle: Cell::new(Lifecycle::Unmounted),
            handle: Cell::new(None),
            parent: Cell::new(None),
            runtime: RefCell::new(None),
            hooks: RefCell::new(HookSlots::default()),
            subscriptions: RefCell::new(Vec::new()),
        })
    }

    /// Attach an optional symbolic name.
    pub fn with_name(mut self, name: Option<String>) -> Self {
        self.name = name;
        self
    }

    pub fn id(&self) -> &ComponentId {
        &self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle.get()
    }

    pub fn is_mounted(&self) -> bool {
        self.lifecycle.get() == Lifecycle::Mounted
    }

    pub fn is_disposed(&self) -> bool {
        self.lifecycle.get() == Lifecycle::Disposed
    }

    /// Native handle once mounted (kept after disposal for diagnostics).
    pub fn handle(&self) -> Option<Handle> {
        self.handle.get()
    }

    /// Native handle, or [`Error::Lookup`] before mount.
    pub fn widget(&self) -> Result<Handle> {
        self.handle.get().ok_or_else(|| Error::Lookup {
            id: self.id.to_string(),
        })
    }

    pub fn parent(&self) -> Option<Handle> {
        self.parent.get()
    }

    /// Runtime this component was mounted through.
    pub fn runtime(&self) -> Option<Runtime> {
        self.runtime.borrow().clone()
    }

    /// Tie a subscription's lifetime to this component.
    ///
    /// Tracking on an already disposed component releases it immediately.
    pub fn track_subscription(&self, subscription: Subscription) {
        if self.is_disposed() {
            subscription.unsubscribe();
            return;
        }
        self.subscriptions.borrow_mut().push(subscription);
    }

    pub fn subscription_count(&self) -> usize {
        self.subscriptions.borrow().len()
    }

    pub fn hook_count(&self) -> usize {
        self.hooks.borrow().len()
    }

    fn attach(&self, runtime: &Runtime, parent: Handle) {
        *self.runtime.borrow_mut() = Some(runtime.clone());
        self.parent.set(Some(parent));
    }

    /// Undo `attach` after a failed mount, dropping whatever the failed
    /// build subscribed to. The core stays Unmounted.
    fn detach(&self) {
        self.runtime.borrow_mut().take();
        self.parent.set(None);
        let subscriptions = std::mem::take(&mut *self.subscriptions.borrow_mut());
        for subscription in &subscriptions {
            subscription.unsubscribe();
        }
        self.hooks.borrow_mut().clear();
    }
}

impl fmt::Debug for ComponentCore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentCore")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("lifecycle", &self.lifecycle.get())
            .field("handle", &self.handle.get())
            .field("subscriptions", &self.subscriptions.borrow().len())
            .finish()
    }
}

// =============================================================================
// Component trait
// =============================================================================

/// A mountable component.
///
/// `create_widget` builds the native element(s) under `parent` and returns
/// the root handle; composite components mount their children from inside
/// it. `on_state_changed` is the re-render trampoline hook setters call.
pub trait Component: 'static {
    fn core(&self) -> &ComponentCore;

    fn create_widget(self: Rc<Self>, parent: Handle, runtime: &Runtime) -> Result<Handle>;

    fn on_state_changed(self: Rc<Self>) -> Result<()> {
        Ok(())
    }

    /// Runs once at the end of disposal.
    fn on_dispose(&self) {}
}

/// Shared, type-erased component reference.
pub type ComponentRef = Rc<dyn Component>;

/// Whether two references point at the same component instance.
pub fn same_instance(a: &ComponentRef, b: &ComponentRef) -> bool {
    std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
}

// =============================================================================
// ChildSpec
// =============================================================================

/// A child component plus optional layout options.
#[derive(Clone)]
pub struct ChildSpec {
    pub child: ComponentRef,
    pub layout: Option<Layout>,
}

impl ChildSpec {
    pub fn new(child: ComponentRef, layout: Option<Layout>) -> Self {
        Self { child, layout }
    }

    pub fn id(&self) -> &ComponentId {
        self.child.core().id()
    }
}

impl<C: Component> From<Rc<C>> for ChildSpec {
    fn from(child: Rc<C>) -> Self {
        Self::new(child, None)
    }
}

impl From<ComponentRef> for ChildSpec {
    fn from(child: ComponentRef) -> Self {
        Self::new(child, None)
    }
}

impl<C: Component> From<(Rc<C>, Layout)> for ChildSpec {
    fn from((child, layout): (Rc<C>, Layout)) -> Self {
        Self::new(child, Some(layout))
    }
}

impl From<(ComponentRef, Layout)> for ChildSpec {
    fn from((child, layout): (ComponentRef, Layout)) -> Self {
        Self::new(child, Some(layout))
    }
}

impl fmt::Debug for ChildSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChildSpec")
            .field("id", self.id())
            .field("layout", &self.layout)
            .finish()
    }
}

// =============================================================================
// Mount / dispose
// =============================================================================

/// Mount `component` under `parent`.
///
/// 1. Reject anything that already left the Unmounted state
/// 2. Create the native element(s)
/// 3. Register `(id, handle)` in the enclosing window's registry
/// 4. Observe the handle's destruction to drive disposal
pub fn mount(component: &ComponentRef, parent: Handle, runtime: &Runtime) -> Result<Handle> {
    let core = component.core();
    if core.lifecycle() != Lifecycle::Unmounted || core.handle().is_some() {
        return Err(Error::DoubleMount {
            id: core.id().to_string(),
        });
    }

    core.attach(runtime, parent);
    let handle = match Rc::clone(component).create_widget(parent, runtime) {
        Ok(handle) => handle,
        Err(err) => {
            core.detach();
            tracing::debug!(id = %core.id(), %parent, %err, "mount failed");
            return Err(err);
        }
    };
    core.handle.set(Some(handle));
    core.lifecycle.set(Lifecycle::Mounted);

    let toolkit = runtime.toolkit();
    let registry = runtime.registry_for(parent);
    if let Some(registry) = &registry {
        let replaced = registry.register(core.id().as_str(), handle);
        if let Some(previous) = replaced.filter(|&p| p != handle && toolkit.is_alive(p)) {
            tracing::warn!(id = %core.id(), %previous, %handle, "registry entry overwritten by another live widget");
        }
    }

    let owner = Rc::clone(component);
    toolkit.observe_destroy(
        handle,
        Box::new(move || {
            if let Some(registry) = registry {
                registry.unregister(owner.core().id().as_str(), handle);
            }
            dispose(&owner);
        }),
    );

    tracing::debug!(id = %core.id(), %parent, %handle, "mounted");
    Ok(handle)
}

/// Release everything the component owns. Runs once, from the destroy observer.
fn dispose(component: &ComponentRef) {
    let core = component.core();
    if core.is_disposed() {
        return;
    }
    core.lifecycle.set(Lifecycle::Disposed);

    let subscriptions = std::mem::take(&mut *core.subscriptions.borrow_mut());
    for subscription in &subscriptions {
        subscription.unsubscribe();
    }
    core.hooks.borrow_mut().clear();
    component.on_dispose();

    tracing::debug!(id = %core.id(), released = subscriptions.len(), "disposed");
}
