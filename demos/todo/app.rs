//! Window assembly shared by the binary and its integration test.

use spark_retained::{column, HAlign, Layout, Result, Runtime, Store, VAlign, Window};

use crate::content::TodoContent;
use crate::header::todo_header;
use crate::reducer::TodoState;

pub struct TodoApp {
    pub window: Window,
    pub content: TodoContent,
}

/// Install `store` on `runtime` and open the to-do window.
pub fn open(runtime: &Runtime, store: &Store<TodoState>, width: u16, height: u16) -> Result<TodoApp> {
    runtime.configure_store(store.clone());

    let content = TodoContent::new(store.clone())?;
    let header = todo_header(&content)?;

    let root = column("root")?
        .child((
            header,
            Layout::new().no_expand().valign(VAlign::Top).halign(HAlign::Stretch),
        ))
        .child((
            content.component(),
            Layout::new().expand().valign(VAlign::Stretch).halign(HAlign::Stretch),
        ))
        .shared();

    let window = Window::new(runtime, "Todo", width, height)?;
    window.set_content(root)?;
    tracing::debug!(ids = ?window.all_ids(), "todo window mounted");

    Ok(TodoApp { window, content })
}
