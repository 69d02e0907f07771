//! Widget - leaf component wrapping one native element.
//!
//! Properties are either static or bound to an [`Observable`]. A bound
//! property seeds the element at create time and reconfigures it on every
//! change; the binding subscription belongs to the component and is
//! released when the element is destroyed.
//!
//! # Example
//!
//! ```ignore
//! use spark_retained::primitives::{button, label};
//!
//! let status = cx.use_store_selector(|s: &AppState| s.status.clone())?;
//! let status_label = label("status_label")?.text(status).shared();
//! let add = button("add_btn")?.text("Add").on_command(move || add_task()).shared();
//! ```

use std::fmt;
use std::rc::{Rc, Weak};

use crate::engine::{Component, ComponentCore, Runtime};
use crate::error::Result;
use crate::host::Toolkit;
use crate::reactive::{Observable, Subscription};
use crate::types::{Command, Handle, PropertyMap, PropertyValue, WidgetKind};

// =============================================================================
// Property values
// =============================================================================

/// A source of property values that can be watched.
pub trait Bindable {
    fn current(&self) -> PropertyValue;

    fn watch(&self, on_change: Box<dyn Fn(PropertyValue)>) -> Subscription;
}

impl<T> Bindable for Observable<T>
where
    T: Clone + Into<PropertyValue> + 'static,
{
    fn current(&self) -> PropertyValue {
        self.value().into()
    }

    fn watch(&self, on_change: Box<dyn Fn(PropertyValue)>) -> Subscription {
        self.subscribe(move |value: &T| on_change(value.clone().into()))
    }
}

/// A widget property: fixed, or following an observable.
#[derive(Clone)]
pub enum PropValue {
    Static(PropertyValue),
    Bound(Rc<dyn Bindable>),
}

impl PropValue {
    /// Value right now.
    pub fn get(&self) -> PropertyValue {
        match self {
            Self::Static(value) => value.clone(),
            Self::Bound(source) => source.current(),
        }
    }
}

impl fmt::Debug for PropValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static(value) => f.debug_tuple("Static").field(value).finish(),
            Self::Bound(source) => f.debug_tuple("Bound").field(&source.current()).finish(),
        }
    }
}

impl From<PropertyValue> for PropValue {
    fn from(value: PropertyValue) -> Self {
        Self::Static(value)
    }
}

impl From<&str> for PropValue {
    fn from(value: &str) -> Self {
        Self::Static(value.into())
    }
}

impl From<String> for PropValue {
    fn from(value: String) -> Self {
        Self::Static(value.into())
    }
}

impl From<i64> for PropValue {
    fn from(value: i64) -> Self {
        Self::Static(value.into())
    }
}

impl From<u32> for PropValue {
    fn from(value: u32) -> Self {
        Self::Static(value.into())
    }
}

impl From<bool> for PropValue {
    fn from(value: bool) -> Self {
        Self::Static(value.into())
    }
}

impl<T> From<Observable<T>> for PropValue
where
    T: Clone + Into<PropertyValue> + 'static,
{
    fn from(source: Observable<T>) -> Self {
        Self::Bound(Rc::new(source))
    }
}

/// Reconfigure `key` on `handle` whenever `source` changes.
///
/// The subscription is owned by `core`. Updates that hit a handle already
/// being torn down are dropped.
pub(crate) fn bind_property(
    core: &ComponentCore,
    toolkit: &Rc<dyn Toolkit>,
    handle: Handle,
    key: &str,
    source: &dyn Bindable,
) {
    let target: Weak<dyn Toolkit> = Rc::downgrade(toolkit);
    let key = key.to_string();
    let subscription = source.watch(Box::new(move |value| {
        let Some(toolkit) = target.upgrade() else {
            return;
        };
        let update = PropertyMap::from([(key.clone(), value)]);
        if let Err(err) = toolkit.configure(handle, &update) {
            tracing::trace!(%handle, key = %key, %err, "ignored update on widget mid-teardown");
        }
    }));
    core.track_subscription(subscription);
}

// =============================================================================
// Widget
// =============================================================================

/// Leaf component for one native element.
pub struct Widget {
    core: ComponentCore,
    kind: WidgetKind,
    props: Vec<(String, PropValue)>,
    command: Option<Command>,
}

impl Widget {
    pub fn new(id: impl Into<String>, kind: WidgetKind) -> Result<Self> {
        Ok(Self {
            core: ComponentCore::new(id)?,
            kind,
            props: Vec::new(),
            command: None,
        })
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.core = self.core.with_name(Some(name.into()));
        self
    }

    /// Set (or replace) a property.
    pub fn prop(mut self, key: impl Into<String>, value: impl Into<PropValue>) -> Self {
        let key = key.into();
        let value = value.into();
        match self.props.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.props.push((key, value)),
        }
        self
    }

    pub fn text(self, value: impl Into<PropValue>) -> Self {
        self.prop("text", value)
    }

    pub fn enabled(self, value: impl Into<PropValue>) -> Self {
        self.prop("enabled", value)
    }

    pub fn width(self, cells: u32) -> Self {
        self.prop("width", cells)
    }

    /// Callback run when the element is activated.
    pub fn on_command(mut self, command: impl Fn() + 'static) -> Self {
        self.command = Some(Rc::new(command));
        self
    }

    pub fn shared(self) -> Rc<Self> {
        Rc::new(self)
    }

    pub fn kind(&self) -> WidgetKind {
        self.kind
    }

    pub fn property(&self, key: &str) -> Option<PropertyValue> {
        self.props.iter().find(|(k, _)| k == key).map(|(_, v)| v.get())
    }
}

impl Component for Widget {
    fn core(&self) -> &ComponentCore {
        &self.core
    }

    fn create_widget(self: Rc<Self>, parent: Handle, runtime: &Runtime) -> Result<Handle> {
        let toolkit = runtime.toolkit();
        let initial: PropertyMap = self.props.iter().map(|(k, v)| (k.clone(), v.get())).collect();
        let handle = toolkit.create(Some(parent), self.kind, &initial)?;

        if let Some(command) = &self.command {
            toolkit.set_command(handle, Rc::clone(command));
        }

        for (key, value) in &self.props {
            if let PropValue::Bound(source) = value {
                bind_property(&self.core, toolkit, handle, key, source.as_ref());
            }
        }

        Ok(handle)
    }
}

impl fmt::Debug for Widget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Widget")
            .field("id", self.core.id())
            .field("kind", &self.kind)
            .field("props", &self.props)
            .finish()
    }
}

// =============================================================================
// Factories
// =============================================================================

pub fn label(id: impl Into<String>) -> Result<Widget> {
    Widget::new(id, WidgetKind::Label)
}

pub fn button(id: impl Into<String>) -> Result<Widget> {
    Widget::new(id, WidgetKind::Button)
}

pub fn entry(id: impl Into<String>) -> Result<Widget> {
    Widget::new(id, WidgetKind::Entry)
}

/// Multi-line text element.
pub fn text_area(id: impl Into<String>) -> Result<Widget> {
    Widget::new(id, WidgetKind::Text)
}

pub fn combobox(id: impl Into<String>) -> Result<Widget> {
    Widget::new(id, WidgetKind::Combobox)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{mount, ComponentRef};
    use crate::error::Error;
    use crate::host::MemoryToolkit;
    use std::cell::Cell;

    fn setup() -> (Rc<MemoryToolkit>, Runtime, Handle) {
        let toolkit = Rc::new(MemoryToolkit::new());
        let runtime = Runtime::new(toolkit.clone());
        let window = toolkit.create(None, WidgetKind::Window, &PropertyMap::new()).unwrap();
        (toolkit, runtime, window)
    }

    #[test]
    fn test_empty_id_rejected() {
        assert!(matches!(label(""), Err(Error::Identity { .. })));
    }

    #[test]
    fn test_static_props_applied_at_create() {
        let (toolkit, runtime, window) = setup();
        let widget: ComponentRef = label("title").unwrap().text("Tasks").width(20).shared();

        let handle = mount(&widget, window, &runtime).unwrap();
        let node = toolkit.node(handle).unwrap();
        assert_eq!(node.kind, WidgetKind::Label);
        assert_eq!(node.text(), Some("Tasks"));
        assert_eq!(node.props.get("width"), Some(&PropertyValue::Int(20)));
    }

    #[test]
    fn test_prop_replaces_existing_key() {
        let widget = label("l").unwrap().text("a").text("b");
        assert_eq!(widget.property("text"), Some(PropertyValue::from("b")));
    }

    #[test]
    fn test_bound_prop_follows_observable() {
        let (toolkit, runtime, window) = setup();
        let status = Observable::new("Ready".to_string());
        let widget: ComponentRef = label("status").unwrap().text(status.clone()).shared();

        let handle = mount(&widget, window, &runtime).unwrap();
        assert_eq!(toolkit.node(handle).unwrap().text(), Some("Ready"));

        status.set("Busy".to_string());
        assert_eq!(toolkit.node(handle).unwrap().text(), Some("Busy"));
    }

    #[test]
    fn test_binding_released_on_destroy() {
        let (toolkit, runtime, window) = setup();
        let enabled = Observable::new(false);
        let widget: ComponentRef = button("clear").unwrap().enabled(enabled.clone()).shared();

        let handle = mount(&widget, window, &runtime).unwrap();
        assert_eq!(enabled.subscriber_count(), 1);

        toolkit.destroy(handle);
        assert_eq!(enabled.subscriber_count(), 0);

        // No toolkit activity after teardown.
        let ops_before = toolkit.ops().len();
        enabled.set(true);
        assert_eq!(toolkit.ops().len(), ops_before);
    }

    #[test]
    fn test_command_invoked() {
        let (toolkit, runtime, window) = setup();
        let clicks = Rc::new(Cell::new(0));
        let clicks_clone = clicks.clone();
        let widget: ComponentRef = button("add")
            .unwrap()
            .text("Add")
            .on_command(move || clicks_clone.set(clicks_clone.get() + 1))
            .shared();

        let handle = mount(&widget, window, &runtime).unwrap();
        assert!(toolkit.invoke(handle));
        assert!(toolkit.invoke(handle));
        assert_eq!(clicks.get(), 2);
    }
}
