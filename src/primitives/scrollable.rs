//! Scrollable - a frame that hosts content inside a scrolling canvas.
//!
//! ```text
//! ┌────────────────────┬─┐
//! │ canvas             │▲│  cell (0, 0), grows both ways
//! │  └ inner frame     │ │  vertical bar at (0, 1)
//! │     └ content      │▼│
//! ├────────────────────┼─┘
//! │◀ horizontal bar   ▶│    at (1, 0)
//! └────────────────────┘
//! ```
//!
//! A vertical scrollable stretches its inner frame to the canvas width; a
//! horizontal one to the canvas height; `Both` leaves the content at its
//! natural size.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use super::frame::{create_frame, keep_or_discard};
use crate::engine::{mount, ChildSpec, Component, ComponentCore, ComponentRef, Runtime};
use crate::error::Result;
use crate::host::Toolkit;
use crate::types::{Axis, Handle, Placement, PropertyMap, PropertyValue, Sticky, TrackConfig, WidgetKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Vertical,
    Horizontal,
    Both,
}

impl Orientation {
    fn scrolls_vertically(self) -> bool {
        matches!(self, Self::Vertical | Self::Both)
    }

    fn scrolls_horizontally(self) -> bool {
        matches!(self, Self::Horizontal | Self::Both)
    }

    /// Edges of the canvas the inner frame sticks to.
    fn inner_sticky(self) -> Sticky {
        match self {
            Self::Vertical => Sticky::N | Sticky::EW,
            Self::Horizontal => Sticky::W | Sticky::NS,
            Self::Both => Sticky::N | Sticky::W,
        }
    }
}

/// Native elements a mounted scrollable is made of.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollParts {
    pub canvas: Handle,
    pub inner: Handle,
    pub vertical_bar: Option<Handle>,
    pub horizontal_bar: Option<Handle>,
}

pub struct Scrollable {
    core: ComponentCore,
    content: ComponentRef,
    orientation: Orientation,
    props: PropertyMap,
    canvas_props: PropertyMap,
    debug_color: Option<String>,
    parts: Cell<Option<ScrollParts>>,
}

pub fn scrollable_vertical(id: impl Into<String>, content: impl Into<ChildSpec>) -> Result<Scrollable> {
    Scrollable::new(id, content, Orientation::Vertical)
}

pub fn scrollable_horizontal(id: impl Into<String>, content: impl Into<ChildSpec>) -> Result<Scrollable> {
    Scrollable::new(id, content, Orientation::Horizontal)
}

pub fn scrollable_both(id: impl Into<String>, content: impl Into<ChildSpec>) -> Result<Scrollable> {
    Scrollable::new(id, content, Orientation::Both)
}

const GROW: TrackConfig = TrackConfig { weight: 1, min_size: 0 };

fn cell(row: usize, column: usize, sticky: Sticky) -> Placement {
    Placement {
        row,
        column,
        sticky,
        padx: 0,
        pady: 0,
    }
}

fn grow_cell_zero(toolkit: &dyn Toolkit, container: Handle) {
    toolkit.configure_track(container, Axis::Vertical, 0, GROW);
    toolkit.configure_track(container, Axis::Horizontal, 0, GROW);
}

impl Scrollable {
    pub fn new(id: impl Into<String>, content: impl Into<ChildSpec>, orientation: Orientation) -> Result<Self> {
        Ok(Self {
            core: ComponentCore::new(id)?,
            content: content.into().child,
            orientation,
            props: PropertyMap::new(),
            canvas_props: PropertyMap::new(),
            debug_color: None,
            parts: Cell::new(None),
        })
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.core = self.core.with_name(Some(name.into()));
        self
    }

    pub fn with_props(mut self, props: PropertyMap) -> Self {
        self.props.extend(props);
        self
    }

    pub fn with_canvas_props(mut self, props: PropertyMap) -> Self {
        self.canvas_props.extend(props);
        self
    }

    pub fn debug_color(mut self, color: impl Into<String>) -> Self {
        self.debug_color = Some(color.into());
        self
    }

    pub fn shared(self) -> Rc<Self> {
        Rc::new(self)
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn parts(&self) -> Option<ScrollParts> {
        self.parts.get()
    }

    pub fn content(&self) -> &ComponentRef {
        &self.content
    }

    fn scrollbar(&self, runtime: &Runtime, root: Handle, canvas: Handle, orient: &str) -> Result<Handle> {
        let props = PropertyMap::from([
            ("orient".to_string(), PropertyValue::from(orient)),
            ("target".to_string(), PropertyValue::from(canvas)),
        ]);
        runtime.toolkit().create(Some(root), WidgetKind::Scrollbar, &props)
    }

    /// Canvas, scrollbars and inner frame under `root`, then the content.
    fn populate(&self, runtime: &Runtime, root: Handle) -> Result<()> {
        let toolkit = runtime.toolkit();

        let mut canvas_props = PropertyMap::from([("highlightthickness".to_string(), PropertyValue::Int(0))]);
        canvas_props.extend(self.canvas_props.clone());
        let canvas = toolkit.create(Some(root), WidgetKind::Canvas, &canvas_props)?;
        toolkit.place(canvas, &cell(0, 0, Sticky::NSEW));

        let vertical_bar = if self.orientation.scrolls_vertically() {
            let bar = self.scrollbar(runtime, root, canvas, "vertical")?;
            toolkit.place(bar, &cell(0, 1, Sticky::NS));
            Some(bar)
        } else {
            None
        };
        let horizontal_bar = if self.orientation.scrolls_horizontally() {
            let bar = self.scrollbar(runtime, root, canvas, "horizontal")?;
            toolkit.place(bar, &cell(1, 0, Sticky::EW));
            Some(bar)
        } else {
            None
        };
        grow_cell_zero(toolkit.as_ref(), root);

        let inner = toolkit.create(Some(canvas), WidgetKind::Frame, &PropertyMap::new())?;
        toolkit.place(inner, &cell(0, 0, self.orientation.inner_sticky()));
        grow_cell_zero(toolkit.as_ref(), canvas);

        self.parts.set(Some(ScrollParts {
            canvas,
            inner,
            vertical_bar,
            horizontal_bar,
        }));

        let content = mount(&self.content, inner, runtime)?;
        toolkit.place(content, &Placement::FILL);
        grow_cell_zero(toolkit.as_ref(), inner);
        Ok(())
    }
}

impl Component for Scrollable {
    fn core(&self) -> &ComponentCore {
        &self.core
    }

    fn create_widget(self: Rc<Self>, parent: Handle, runtime: &Runtime) -> Result<Handle> {
        let root = create_frame(parent, runtime, &self.props, self.debug_color.as_deref())?;
        let populated = self.populate(runtime, root);
        keep_or_discard(runtime, root, populated).inspect_err(|_| self.parts.set(None))
    }
}

impl fmt::Debug for Scrollable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scrollable")
            .field("id", self.core.id())
            .field("orientation", &self.orientation)
            .field("parts", &self.parts.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::MemoryToolkit;
    use crate::primitives::{column, label};

    fn setup() -> (Rc<MemoryToolkit>, Runtime, Handle) {
        let toolkit = Rc::new(MemoryToolkit::new());
        let runtime = Runtime::new(toolkit.clone());
        let window = toolkit.create(None, WidgetKind::Window, &PropertyMap::new()).unwrap();
        runtime.attach_registry(window);
        (toolkit, runtime, window)
    }

    #[test]
    fn test_vertical_layout() {
        let (toolkit, runtime, window) = setup();
        let body = label("body").unwrap().text("long text").shared();
        let scroller = scrollable_vertical("scroller", body.clone()).unwrap().shared();
        let component: ComponentRef = scroller.clone();

        let root = mount(&component, window, &runtime).unwrap();
        let parts = scroller.parts().unwrap();

        assert_eq!(toolkit.node(parts.canvas).unwrap().placement, Some(cell(0, 0, Sticky::NSEW)));
        let bar = toolkit.node(parts.vertical_bar.unwrap()).unwrap();
        assert_eq!(bar.placement, Some(cell(0, 1, Sticky::NS)));
        assert_eq!(bar.props.get("target"), Some(&PropertyValue::from(parts.canvas)));
        assert_eq!(parts.horizontal_bar, None);
        assert_eq!(toolkit.node(root).unwrap().track(Axis::Vertical, 0), GROW);

        let inner = toolkit.node(parts.inner).unwrap();
        assert_eq!(inner.parent, Some(parts.canvas));
        assert_eq!(inner.placement.unwrap().sticky, Sticky::N | Sticky::EW);

        let content = toolkit.node(body.core().handle().unwrap()).unwrap();
        assert_eq!(content.parent, Some(parts.inner));
        assert_eq!(content.placement, Some(Placement::FILL));
    }

    #[test]
    fn test_both_has_two_bars() {
        let (toolkit, runtime, window) = setup();
        let body = label("body").unwrap().shared();
        let scroller = scrollable_both("scroller", body).unwrap().shared();
        let component: ComponentRef = scroller.clone();
        mount(&component, window, &runtime).unwrap();

        let parts = scroller.parts().unwrap();
        let horizontal = toolkit.node(parts.horizontal_bar.unwrap()).unwrap();
        assert_eq!(horizontal.placement, Some(cell(1, 0, Sticky::EW)));
        assert_eq!(horizontal.props.get("orient"), Some(&PropertyValue::from("horizontal")));
        assert!(parts.vertical_bar.is_some());
        assert_eq!(toolkit.node(parts.inner).unwrap().placement.unwrap().sticky, Sticky::N | Sticky::W);
    }

    #[test]
    fn test_horizontal_has_no_vertical_bar() {
        let (_, runtime, window) = setup();
        let scroller = scrollable_horizontal("scroller", label("body").unwrap().shared())
            .unwrap()
            .shared();
        let component: ComponentRef = scroller.clone();
        mount(&component, window, &runtime).unwrap();

        let parts = scroller.parts().unwrap();
        assert!(parts.vertical_bar.is_none());
        assert!(parts.horizontal_bar.is_some());
    }

    #[test]
    fn test_content_registered_and_disposed() {
        let (toolkit, runtime, window) = setup();
        let list = column("list").unwrap().child(label("row0").unwrap().shared()).shared();
        let scroller: ComponentRef = scrollable_vertical("scroller", list.clone()).unwrap().shared();

        let root = mount(&scroller, window, &runtime).unwrap();
        let registry = runtime.registry_for(window).unwrap();
        assert!(registry.get("row0").is_some());

        toolkit.destroy(root);
        assert!(list.core().is_disposed());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_failed_content_mount_discards_parts() {
        let (toolkit, runtime, window) = setup();
        let body: ComponentRef = label("body").unwrap().shared();
        mount(&body, window, &runtime).unwrap();
        let live = toolkit.live_count();

        let scroller = scrollable_vertical("scroller", body.clone()).unwrap().shared();
        let component: ComponentRef = scroller.clone();

        assert!(mount(&component, window, &runtime).is_err());
        assert_eq!(toolkit.live_count(), live);
        assert!(scroller.parts().is_none());
        assert_eq!(runtime.registry_for(window).unwrap().get("scroller"), None);
    }
}
