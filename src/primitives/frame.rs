//! Frame - composite component hosting at most one built child.
//!
//! A frame creates a native frame element, runs its [`Build`] logic with a
//! fresh [`BuildContext`] and mounts the returned child at cell (0, 0).
//! The child fills the frame unless its layout says otherwise (sticky NSEW,
//! expanding). A re-render keeps the child when build returns the same
//! instance and replaces it otherwise.
//!
//! # Example
//!
//! ```ignore
//! let counter = frame("counter", |cx: &mut BuildContext<'_>| {
//!     let (count, set_count) = cx.use_state(0i64)?;
//!     let button = button("inc")?
//!         .text(count.clone())
//!         .on_command(move || { let _ = set_count.update(|n| n + 1); })
//!         .shared();
//!     Ok(Some(button.into()))
//! })?;
//! ```

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use crate::engine::{mount, same_instance, BuildContext, ChildSpec, Component, ComponentCore, ComponentRef, Runtime};
use crate::error::Result;
use crate::layout::SlotDefaults;
use crate::types::{Axis, Handle, PropertyMap, PropertyValue, TrackConfig, WidgetKind};

// =============================================================================
// Build
// =============================================================================

/// Build logic of a frame: nothing, or one child with optional layout.
pub trait Build: 'static {
    fn build(&self, cx: &mut BuildContext<'_>) -> Result<Option<ChildSpec>>;
}

impl<F> Build for F
where
    F: Fn(&mut BuildContext<'_>) -> Result<Option<ChildSpec>> + 'static,
{
    fn build(&self, cx: &mut BuildContext<'_>) -> Result<Option<ChildSpec>> {
        self(cx)
    }
}

// =============================================================================
// Render guard
// =============================================================================

/// Serializes render passes of one component.
///
/// A render requested while a pass is running is deferred and run once the
/// pass finishes, instead of nesting inside it.
#[derive(Debug, Default)]
pub(crate) struct RenderGuard {
    active: Cell<bool>,
    pending: Cell<bool>,
}

impl RenderGuard {
    pub(crate) fn run(&self, mut pass: impl FnMut() -> Result<()>) -> Result<()> {
        if self.active.get() {
            self.pending.set(true);
            return Ok(());
        }
        self.active.set(true);
        let result = loop {
            self.pending.set(false);
            if let Err(err) = pass() {
                break Err(err);
            }
            if !self.pending.get() {
                break Ok(());
            }
        };
        self.active.set(false);
        self.pending.set(false);
        result
    }
}

/// Border properties a debug-bordered frame is configured with.
pub(crate) fn debug_border_props(color: &str) -> PropertyMap {
    PropertyMap::from([
        ("borderwidth".to_string(), PropertyValue::Int(1)),
        ("relief".to_string(), PropertyValue::from("solid")),
        ("border_color".to_string(), PropertyValue::from(color)),
    ])
}

/// Create the native frame element of a container, bordered when the
/// runtime has debug borders on.
pub(crate) fn create_frame(
    parent: Handle,
    runtime: &Runtime,
    props: &PropertyMap,
    debug_color: Option<&str>,
) -> Result<Handle> {
    let toolkit = runtime.toolkit();
    let container = toolkit.create(Some(parent), WidgetKind::Frame, props)?;
    if runtime.config().debug_borders {
        let color = debug_color.map(str::to_string).or_else(|| runtime.next_debug_color());
        if let Some(color) = color {
            toolkit.configure(container, &debug_border_props(&color))?;
        }
    }
    Ok(container)
}

/// Finish mounting into a fresh container.
///
/// On failure the container is destroyed, taking every child mounted into
/// it so far along, and the error is passed on.
pub(crate) fn keep_or_discard(runtime: &Runtime, container: Handle, populated: Result<()>) -> Result<Handle> {
    match populated {
        Ok(()) => Ok(container),
        Err(err) => {
            tracing::debug!(%container, %err, "discarding container after failed mount");
            runtime.toolkit().destroy(container);
            Err(err)
        }
    }
}

// =============================================================================
// Frame
// =============================================================================

pub struct Frame<B> {
    core: ComponentCore,
    builder: B,
    props: PropertyMap,
    debug_color: Option<String>,
    container: Cell<Option<Handle>>,
    child: RefCell<Option<(ComponentRef, Handle)>>,
    guard: RenderGuard,
}

/// Frame whose build logic is a closure.
pub fn frame<F>(id: impl Into<String>, build: F) -> Result<Frame<F>>
where
    F: Fn(&mut BuildContext<'_>) -> Result<Option<ChildSpec>> + 'static,
{
    Frame::new(id, build)
}

impl<B: Build> Frame<B> {
    pub fn new(id: impl Into<String>, builder: B) -> Result<Self> {
        Ok(Self {
            core: ComponentCore::new(id)?,
            builder,
            props: PropertyMap::new(),
            debug_color: None,
            container: Cell::new(None),
            child: RefCell::new(None),
            guard: RenderGuard::default(),
        })
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.core = self.core.with_name(Some(name.into()));
        self
    }

    /// Extra properties for the native frame element.
    pub fn with_props(mut self, props: PropertyMap) -> Self {
        self.props.extend(props);
        self
    }

    /// Border colour used instead of the palette when debug borders are on.
    pub fn debug_color(mut self, color: impl Into<String>) -> Self {
        self.debug_color = Some(color.into());
        self
    }

    pub fn shared(self) -> Rc<Self> {
        Rc::new(self)
    }

    /// Native frame element, once mounted.
    pub fn container(&self) -> Option<Handle> {
        self.container.get()
    }

    /// Child currently mounted by the last build.
    pub fn child(&self) -> Option<ComponentRef> {
        self.child.borrow().as_ref().map(|(child, _)| Rc::clone(child))
    }

    /// Re-run build and reconcile the single child.
    pub fn refresh(self: &Rc<Self>) -> Result<()> {
        if self.core.is_disposed() {
            return Ok(());
        }
        let (Some(runtime), Some(container)) = (self.core.runtime(), self.container.get()) else {
            return Ok(());
        };
        self.guard.run(|| self.render(&runtime, container))
    }

    fn render(self: &Rc<Self>, runtime: &Runtime, container: Handle) -> Result<()> {
        let this: ComponentRef = Rc::clone(self) as ComponentRef;
        let spec = {
            let mut cx = BuildContext::new(this, runtime, container);
            self.builder.build(&mut cx)?
        };
        self.place_child(spec, runtime, container)
    }

    fn place_child(&self, spec: Option<ChildSpec>, runtime: &Runtime, container: Handle) -> Result<()> {
        let toolkit = runtime.toolkit();
        let previous = self.child.borrow_mut().take();

        let Some(spec) = spec else {
            if let Some((_, handle)) = previous {
                toolkit.destroy(handle);
            }
            return Ok(());
        };

        let handle = match previous {
            Some((current, handle)) if same_instance(&current, &spec.child) => {
                if !toolkit.is_alive(handle) {
                    // Destroyed behind our back: the child is disposed for good
                    // and cannot be mounted again.
                    tracing::warn!(id = %self.core.id(), child = %spec.id(), %handle, "child widget already destroyed");
                    *self.child.borrow_mut() = Some((spec.child, handle));
                    return Ok(());
                }
                handle
            }
            previous => {
                if let Some((_, handle)) = previous {
                    toolkit.destroy(handle);
                }
                mount(&spec.child, container, runtime)?
            }
        };

        let slot = spec.layout.unwrap_or_default().resolve(&SlotDefaults::frame());
        toolkit.place(handle, &slot.placement(Axis::Vertical, 0));
        toolkit.configure_track(container, Axis::Vertical, 0, TrackConfig::default());
        toolkit.configure_track(container, Axis::Horizontal, 0, TrackConfig::default());
        if slot.weight > 0 || slot.min_size > 0 {
            toolkit.configure_track(container, Axis::Vertical, 0, slot.track());
            toolkit.configure_track(container, Axis::Horizontal, 0, slot.track());
        }

        *self.child.borrow_mut() = Some((spec.child, handle));
        Ok(())
    }
}

impl<B: Build> Component for Frame<B> {
    fn core(&self) -> &ComponentCore {
        &self.core
    }

    fn create_widget(self: Rc<Self>, parent: Handle, runtime: &Runtime) -> Result<Handle> {
        let container = create_frame(parent, runtime, &self.props, self.debug_color.as_deref())?;
        self.container.set(Some(container));
        let rendered = self.guard.run(|| self.render(runtime, container));
        keep_or_discard(runtime, container, rendered).inspect_err(|_| {
            self.container.set(None);
            self.child.borrow_mut().take();
        })
    }

    fn on_state_changed(self: Rc<Self>) -> Result<()> {
        self.refresh()
    }

    fn on_dispose(&self) {
        self.child.borrow_mut().take();
    }
}

impl<B> fmt::Debug for Frame<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Frame")
            .field("id", self.core.id())
            .field("container", &self.container.get())
            .field("has_child", &self.child.borrow().is_some())
            .finish()
    }
}
