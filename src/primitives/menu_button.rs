//! MenuButton - a button that drops down a list of labelled items.
//!
//! Each item carries either a value or its own action. With a shared
//! command, picking a value item calls `command(label, value)`; without
//! one, every item must carry an action or mounting fails.

use std::fmt;
use std::rc::Rc;

use super::widget::{bind_property, PropValue};
use crate::engine::{Component, ComponentCore, Runtime};
use crate::error::{Error, Result};
use crate::types::{Command, Handle, PropertyMap, PropertyValue, WidgetKind};

/// Shared handler for value items.
pub type MenuCommand = Rc<dyn Fn(&str, &PropertyValue)>;

#[derive(Clone)]
pub enum MenuEntry {
    Value(PropertyValue),
    Action(Command),
}

impl fmt::Debug for MenuEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Self::Action(_) => f.write_str("Action"),
        }
    }
}

pub struct MenuButton {
    core: ComponentCore,
    text: PropValue,
    items: Vec<(String, MenuEntry)>,
    command: Option<MenuCommand>,
}

impl MenuButton {
    pub fn new(id: impl Into<String>, text: impl Into<PropValue>) -> Result<Self> {
        Ok(Self {
            core: ComponentCore::new(id)?,
            text: text.into(),
            items: Vec::new(),
            command: None,
        })
    }

    /// Item handled by the shared command.
    pub fn item(mut self, label: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.items.push((label.into(), MenuEntry::Value(value.into())));
        self
    }

    /// Item with its own action.
    pub fn action(mut self, label: impl Into<String>, action: impl Fn() + 'static) -> Self {
        self.items.push((label.into(), MenuEntry::Action(Rc::new(action))));
        self
    }

    pub fn command(mut self, command: impl Fn(&str, &PropertyValue) + 'static) -> Self {
        self.command = Some(Rc::new(command));
        self
    }

    pub fn shared(self) -> Rc<Self> {
        Rc::new(self)
    }

    fn item_command(&self, label: &str, entry: &MenuEntry) -> Result<Command> {
        match (entry, &self.command) {
            (MenuEntry::Action(action), _) => Ok(Rc::clone(action)),
            (MenuEntry::Value(value), Some(command)) => {
                let command = Rc::clone(command);
                let label = label.to_string();
                let value = value.clone();
                Ok(Rc::new(move || command(&label, &value)))
            }
            (MenuEntry::Value(_), None) => Err(Error::validation(format!(
                "menu item {label:?} of {} has no action and the menu has no command",
                self.core.id()
            ))),
        }
    }
}

impl Component for MenuButton {
    fn core(&self) -> &ComponentCore {
        &self.core
    }

    fn create_widget(self: Rc<Self>, parent: Handle, runtime: &Runtime) -> Result<Handle> {
        // Validate every item before touching the toolkit.
        let commands = self
            .items
            .iter()
            .map(|(label, entry)| Ok((label.as_str(), self.item_command(label, entry)?)))
            .collect::<Result<Vec<_>>>()?;

        let toolkit = runtime.toolkit();
        let props = PropertyMap::from([("text".to_string(), self.text.get())]);
        let handle = toolkit.create(Some(parent), WidgetKind::MenuButton, &props)?;

        for (label, command) in commands {
            toolkit.add_menu_item(handle, label, command);
        }
        if let PropValue::Bound(source) = &self.text {
            bind_property(&self.core, toolkit, handle, "text", source.as_ref());
        }

        Ok(handle)
    }
}

impl fmt::Debug for MenuButton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MenuButton")
            .field("id", self.core.id())
            .field("text", &self.text)
            .field("items", &self.items)
            .finish()
    }
}
