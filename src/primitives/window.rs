//! Window - a top-level window with a content layer and a portal layer.
//!
//! The window owns the [`Registry`] every component mounted inside it
//! registers into. Its root frame stacks two layers in the same cell:
//!
//! - **main** hosts the content set with [`Window::set_content`]
//! - **overlay** sits below main until [`Window::portal`] raises it and
//!   pins a component by relative anchor; [`Window::clear_portal`] empties
//!   it and lowers it again
//!
//! # Example
//!
//! ```ignore
//! let toolkit = Rc::new(MemoryToolkit::new());
//! let runtime = Runtime::new(toolkit.clone());
//! let window = Window::new(&runtime, "Todo", 80, 24)?;
//! window.set_content(app)?;
//! window.portal(confirm_dialog)?;
//! ```

use std::cell::{Cell, RefCell};
use std::fmt;

use crate::engine::{mount, ChildSpec, ComponentRef, Registry, Runtime};
use crate::error::Result;
use crate::layout::SlotDefaults;
use crate::types::{Anchored, Axis, Handle, Placement, PropertyMap, PropertyValue, TrackConfig, WidgetKind};

const GROW: TrackConfig = TrackConfig { weight: 1, min_size: 0 };

pub struct Window {
    runtime: Runtime,
    handle: Handle,
    registry: Registry,
    main: Handle,
    overlay: Handle,
    size: Cell<(u16, u16)>,
    content: RefCell<Option<ComponentRef>>,
}

impl Window {
    /// Create the native window, its layers and its registry.
    pub fn new(runtime: &Runtime, title: &str, width: u16, height: u16) -> Result<Self> {
        let toolkit = runtime.toolkit();
        let props = PropertyMap::from([
            ("title".to_string(), PropertyValue::from(title)),
            ("width".to_string(), PropertyValue::Int(i64::from(width))),
            ("height".to_string(), PropertyValue::Int(i64::from(height))),
        ]);
        let handle = toolkit.create(None, WidgetKind::Window, &props)?;
        let registry = runtime.attach_registry(handle);

        let detach = runtime.clone();
        toolkit.observe_destroy(
            handle,
            Box::new(move || {
                detach.detach_registry(handle);
                tracing::debug!(window = %handle, "window closed");
            }),
        );

        let root = toolkit.create(Some(handle), WidgetKind::Frame, &PropertyMap::new())?;
        toolkit.place(root, &Placement::FILL);
        grow(runtime, handle);

        let main = toolkit.create(Some(root), WidgetKind::Frame, &PropertyMap::new())?;
        let overlay = toolkit.create(Some(root), WidgetKind::Frame, &PropertyMap::new())?;
        toolkit.place(main, &Placement::FILL);
        toolkit.place(overlay, &Placement::FILL);
        toolkit.lower(overlay);
        grow(runtime, root);
        grow(runtime, main);

        tracing::debug!(window = %handle, title, width, height, "window opened");
        Ok(Self {
            runtime: runtime.clone(),
            handle,
            registry,
            main,
            overlay,
            size: Cell::new((width, height)),
            content: RefCell::new(None),
        })
    }

    pub fn handle(&self) -> Handle {
        self.handle
    }

    pub fn runtime(&self) -> &Runtime {
        &self.runtime
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Frame hosting the content.
    pub fn main_layer(&self) -> Handle {
        self.main
    }

    /// Frame hosting portals.
    pub fn overlay_layer(&self) -> Handle {
        self.overlay
    }

    /// Size in cells.
    pub fn size(&self) -> (u16, u16) {
        self.size.get()
    }

    pub fn resize(&self, width: u16, height: u16) -> Result<()> {
        self.size.set((width, height));
        let props = PropertyMap::from([
            ("width".to_string(), PropertyValue::Int(i64::from(width))),
            ("height".to_string(), PropertyValue::Int(i64::from(height))),
        ]);
        self.runtime.toolkit().configure(self.handle, &props)
    }

    pub fn content(&self) -> Option<ComponentRef> {
        self.content.borrow().clone()
    }

    /// Replace the content, destroying whatever the main layer held.
    pub fn set_content(&self, content: impl Into<ChildSpec>) -> Result<ComponentRef> {
        let spec = content.into();
        let toolkit = self.runtime.toolkit();
        for child in toolkit.children(self.main) {
            toolkit.destroy(child);
        }
        self.content.borrow_mut().take();

        let handle = mount(&spec.child, self.main, &self.runtime)?;
        let slot = spec.layout.unwrap_or_default().resolve(&SlotDefaults::frame());
        toolkit.place(handle, &slot.placement(Axis::Vertical, 0));

        *self.content.borrow_mut() = Some(spec.child.clone());
        Ok(spec.child)
    }

    /// Mount `component` above the content, centred.
    pub fn portal(&self, component: impl Into<ChildSpec>) -> Result<ComponentRef> {
        self.portal_at(component, Anchored::CENTER)
    }

    /// Mount `component` above the content at a relative anchor.
    pub fn portal_at(&self, component: impl Into<ChildSpec>, anchored: Anchored) -> Result<ComponentRef> {
        let child = component.into().child;
        let toolkit = self.runtime.toolkit();
        toolkit.raise(self.overlay);

        let handle = mount(&child, self.overlay, &self.runtime)?;
        toolkit.place_relative(handle, &anchored);
        Ok(child)
    }

    /// Destroy every portal and put the overlay back below the content.
    pub fn clear_portal(&self) {
        let toolkit = self.runtime.toolkit();
        for child in toolkit.children(self.overlay) {
            toolkit.destroy(child);
        }
        toolkit.lower(self.overlay);
    }

    pub fn lookup(&self, id: &str) -> Option<Handle> {
        self.registry.get(id)
    }

    /// Fails with a lookup error for an unknown id.
    pub fn require(&self, id: &str) -> Result<Handle> {
        self.registry.require(id)
    }

    pub fn all_ids(&self) -> Vec<String> {
        self.registry.all_ids()
    }

    /// Destroy the window and everything mounted in it.
    pub fn close(&self) {
        self.content.borrow_mut().take();
        self.runtime.toolkit().destroy(self.handle);
    }

    pub fn is_open(&self) -> bool {
        self.runtime.toolkit().is_alive(self.handle)
    }
}

fn grow(runtime: &Runtime, container: Handle) {
    let toolkit = runtime.toolkit();
    toolkit.configure_track(container, Axis::Vertical, 0, GROW);
    toolkit.configure_track(container, Axis::Horizontal, 0, GROW);
}

impl fmt::Debug for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Window")
            .field("handle", &self.handle)
            .field("size", &self.size.get())
            .field("registered", &self.registry.len())
            .finish()
    }
}
