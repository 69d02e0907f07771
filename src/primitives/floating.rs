//! Floating - a frame that pins one child by relative anchor.
//!
//! The child is placed outside its frame's grid at a point expressed as a
//! fraction of the frame's size plus a cell offset. The default pins the
//! child's north-east corner just inside the top-right corner.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use super::frame::{create_frame, keep_or_discard};
use crate::engine::{mount, ChildSpec, Component, ComponentCore, ComponentRef, Runtime};
use crate::error::Result;
use crate::types::{Anchor, Anchored, Handle, PropertyMap};

pub struct Floating {
    core: ComponentCore,
    child: ComponentRef,
    anchored: Anchored,
    props: PropertyMap,
    debug_color: Option<String>,
    container: Cell<Option<Handle>>,
}

pub fn floating(id: impl Into<String>, child: impl Into<ChildSpec>) -> Result<Floating> {
    Floating::new(id, child)
}

impl Floating {
    pub fn new(id: impl Into<String>, child: impl Into<ChildSpec>) -> Result<Self> {
        Ok(Self {
            core: ComponentCore::new(id)?,
            child: child.into().child,
            anchored: Anchored::TOP_RIGHT,
            props: PropertyMap::new(),
            debug_color: None,
            container: Cell::new(None),
        })
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.core = self.core.with_name(Some(name.into()));
        self
    }

    /// Replace the whole relative placement.
    pub fn at(mut self, anchored: Anchored) -> Self {
        self.anchored = anchored;
        self
    }

    /// Point inside the frame, as fractions of its width and height.
    pub fn relative(mut self, relx: f32, rely: f32) -> Self {
        self.anchored.relx = relx;
        self.anchored.rely = rely;
        self
    }

    pub fn offset(mut self, x: i32, y: i32) -> Self {
        self.anchored.x = x;
        self.anchored.y = y;
        self
    }

    pub fn anchor(mut self, anchor: Anchor) -> Self {
        self.anchored.anchor = anchor;
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

    pub fn shared(self) -> Rc<Self> {
        Rc::new(self)
    }

    pub fn placement(&self) -> Anchored {
        self.anchored
    }

    pub fn container(&self) -> Option<Handle> {
        self.container.get()
    }
}

impl Component for Floating {
    fn core(&self) -> &ComponentCore {
        &self.core
    }

    fn create_widget(self: Rc<Self>, parent: Handle, runtime: &Runtime) -> Result<Handle> {
        let container = create_frame(parent, runtime, &self.props, self.debug_color.as_deref())?;
        self.container.set(Some(container));

        let placed = mount(&self.child, container, runtime)
            .map(|handle| runtime.toolkit().place_relative(handle, &self.anchored));
        keep_or_discard(runtime, container, placed).inspect_err(|_| self.container.set(None))
    }
}

impl fmt::Debug for Floating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Floating")
            .field("id", self.core.id())
            .field("child", self.child.core().id())
            .field("anchored", &self.anchored)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{MemoryToolkit, Toolkit};
    use crate::layout::compute_geometry;
    use crate::primitives::label;
    use crate::types::{Axis, Placement, TrackConfig, WidgetKind};

    fn setup() -> (Rc<MemoryToolkit>, Runtime, Handle) {
        let toolkit = Rc::new(MemoryToolkit::new());
        let runtime = Runtime::new(toolkit.clone());
        let window = toolkit.create(None, WidgetKind::Window, &PropertyMap::new()).unwrap();
        runtime.attach_registry(window);
        (toolkit, runtime, window)
    }

    #[test]
    fn test_child_placed_top_right_by_default() {
        let (toolkit, runtime, window) = setup();
        let badge = label("badge").unwrap().text("3").shared();
        let overlay: ComponentRef = floating("overlay", badge.clone()).unwrap().shared();

        mount(&overlay, window, &runtime).unwrap();
        let node = toolkit.node(badge.core().handle().unwrap()).unwrap();
        assert_eq!(node.relative, Some(Anchored::TOP_RIGHT));
        assert_eq!(node.placement, None);
        assert_eq!(runtime.registry_for(window).unwrap().get("badge"), badge.core().handle());
    }

    #[test]
    fn test_custom_anchor_positions_child() {
        let (toolkit, runtime, window) = setup();
        let hint = label("hint").unwrap().text("hi").shared();
        let overlay = floating("overlay", hint.clone())
            .unwrap()
            .relative(0.0, 1.0)
            .offset(1, -1)
            .anchor(Anchor::SW)
            .shared();
        let component: ComponentRef = overlay.clone();

        let container = mount(&component, window, &runtime).unwrap();
        toolkit.place(container, &Placement::FILL);
        let grow = TrackConfig { weight: 1, min_size: 0 };
        toolkit.configure_track(window, Axis::Vertical, 0, grow);
        toolkit.configure_track(window, Axis::Horizontal, 0, grow);

        let geometry = compute_geometry(&toolkit, window, 20, 10).unwrap();
        let bounds = geometry[&hint.core().handle().unwrap()];
        // Bottom-left corner of the child lands at (0 + 1, 10 - 1).
        assert_eq!((bounds.x, bounds.bottom()), (1, 9));
        assert_eq!(bounds.width, 2);
    }

    #[test]
    fn test_destroying_frame_disposes_child() {
        let (toolkit, runtime, window) = setup();
        let badge = label("badge").unwrap().shared();
        let overlay: ComponentRef = floating("overlay", badge.clone()).unwrap().shared();

        let container = mount(&overlay, window, &runtime).unwrap();
        toolkit.destroy(container);
        assert!(badge.core().is_disposed());
    }

    #[test]
    fn test_failed_child_mount_discards_container() {
        let (toolkit, runtime, window) = setup();
        let badge: ComponentRef = label("badge").unwrap().shared();
        mount(&badge, window, &runtime).unwrap();

        let overlay = floating("overlay", badge.clone()).unwrap().shared();
        let component: ComponentRef = overlay.clone();

        assert!(mount(&component, window, &runtime).is_err());
        assert_eq!(toolkit.children(window).len(), 1);
        assert_eq!(overlay.core().handle(), None);
        assert!(badge.core().is_mounted());
    }
}
