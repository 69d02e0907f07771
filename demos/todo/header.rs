//! Header: filter menu, task input, add/clear buttons and the status line.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use spark_retained::{
    button, column, entry, frame, label, row, ChildSpec, ComponentRef, HAlign, Layout, MenuButton, PropertyMap,
    PropertyValue, Registry, Result, Toolkit,
};

use crate::content::TodoContent;
use crate::reducer::TodoState;

pub const TASK_INPUT: &str = "task_input";

/// Header bound to `content`'s actions.
///
/// The widget tree is built once; later builds only re-read the selectors
/// and hand back the same column, so the input keeps its text.
pub fn todo_header(content: &TodoContent) -> Result<ComponentRef> {
    let content = content.clone();
    let built: RefCell<Option<ChildSpec>> = RefCell::new(None);

    let header: ComponentRef = frame("todo_header", move |cx| {
        let status = cx.use_store_selector(|s: &TodoState| s.status.clone())?;
        let summary = cx.use_store_selector(|s: &TodoState| s.summary.clone())?;
        let clear_enabled = cx.use_store_selector(|s: &TodoState| s.clear_enabled)?;

        if let Some(spec) = built.borrow().as_ref() {
            return Ok(Some(spec.clone()));
        }

        let input = TaskInput {
            registry: cx.runtime().registry_for(cx.container()),
            toolkit: Rc::downgrade(cx.runtime().toolkit()),
        };

        let filter_content = content.clone();
        let filter_menu = MenuButton::new("filter_menu", "Filter")?
            .item("All", "all")
            .item("Open", "open")
            .item("Done", "done")
            .command(move |label, value| {
                let value = value.as_str().unwrap_or_default();
                if let Err(err) = filter_content.set_filter(label, value) {
                    tracing::warn!(%err, "filter change failed");
                }
            })
            .shared();

        let add_actions = content.actions().clone();
        let add = button("add_button")?
            .text("Add")
            .on_command(move || {
                let text = input.text();
                match add_actions.add_task(&text) {
                    Ok(true) => input.clear(),
                    Ok(false) => {}
                    Err(err) => tracing::warn!(%err, "add task failed"),
                }
            })
            .shared();

        let clear_actions = content.actions().clone();
        let clear = button("clear_done_button")?
            .text("Clear Done")
            .enabled(clear_enabled)
            .on_command(move || {
                if let Err(err) = clear_actions.clear_done() {
                    tracing::warn!(%err, "clear done failed");
                }
            })
            .shared();

        let top_row = row("top_row")?
            .child(filter_menu)
            .child((entry(TASK_INPUT)?.shared(), Layout::new().expand().halign(HAlign::Stretch)))
            .child(add)
            .child(clear)
            .shared();

        let status_row = row("status_row")?
            .child((
                label("status_label")?.text(status).shared(),
                Layout::new().expand().halign(HAlign::Stretch),
            ))
            .child(label("summary_label")?.text(summary).shared())
            .shared();

        let header_column = column("header_column")?
            .child((top_row, Layout::new().no_expand()))
            .child((status_row, Layout::new().no_expand()))
            .shared();

        let spec = ChildSpec::from(header_column);
        *built.borrow_mut() = Some(spec.clone());
        Ok(Some(spec))
    })?
    .named("header")
    .shared();

    Ok(header)
}

/// Reads and clears the task input through the window registry.
struct TaskInput {
    registry: Option<Registry>,
    toolkit: Weak<dyn Toolkit>,
}

impl TaskInput {
    fn text(&self) -> String {
        let (Some(registry), Some(toolkit)) = (&self.registry, self.toolkit.upgrade()) else {
            return String::new();
        };
        registry
            .get(TASK_INPUT)
            .and_then(|handle| toolkit.property(handle, "text"))
            .and_then(|value| value.as_str().map(str::to_string))
            .unwrap_or_default()
    }

    fn clear(&self) {
        let (Some(registry), Some(toolkit)) = (&self.registry, self.toolkit.upgrade()) else {
            return;
        };
        if let Some(handle) = registry.get(TASK_INPUT) {
            let empty = PropertyMap::from([("text".to_string(), PropertyValue::from(""))]);
            if let Err(err) = toolkit.configure(handle, &empty) {
                tracing::warn!(%err, "could not clear the task input");
            }
        }
    }
}
