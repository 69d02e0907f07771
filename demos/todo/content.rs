//! Task list: a scrollable column derived from the store plus the task
//! actions the header and the row buttons call.

use std::cell::Cell;
use std::rc::Rc;

use spark_retained::{
    button, column, frame, label, row, scrollable_vertical, Action, ChildSpec, ComponentRef, HAlign, Layout, Result,
    Stack, Store,
};

use crate::reducer::{Task, TodoState, ADD_TASK, CLEAR_DONE_TASKS, DELETE_TASK, SET_STATUS, TOGGLE_TASK_DONE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filter {
    #[default]
    All,
    Open,
    Done,
}

impl Filter {
    pub fn from_value(value: &str) -> Option<Self> {
        match value {
            "all" => Some(Self::All),
            "open" => Some(Self::Open),
            "done" => Some(Self::Done),
            _ => None,
        }
    }

    pub fn admits(self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Open => !task.done,
            Self::Done => task.done,
        }
    }
}

// =============================================================================
// Actions
// =============================================================================

/// Dispatches task actions, each followed by a status line.
#[derive(Clone)]
pub struct TaskActions {
    store: Store<TodoState>,
}

impl TaskActions {
    pub fn new(store: Store<TodoState>) -> Self {
        Self { store }
    }

    fn status(&self, message: String) -> Result<()> {
        self.store.dispatch(Action::with_payload(SET_STATUS, message))
    }

    /// Returns whether a task was added; blank text only sets the status.
    pub fn add_task(&self, text: &str) -> Result<bool> {
        let text = text.trim();
        if text.is_empty() {
            self.status("Cannot add empty task".to_string())?;
            return Ok(false);
        }
        let id = self.store.get_state().next_task_id;
        self.store.dispatch(Action::with_payload(ADD_TASK, text))?;
        self.status(format!("Added task #{id}"))?;
        Ok(true)
    }

    pub fn delete_task(&self, id: u64) -> Result<()> {
        if self.store.get_state().task(id).is_none() {
            return Ok(());
        }
        self.store.dispatch(Action::with_payload(DELETE_TASK, id))?;
        self.status(format!("Deleted task #{id}"))
    }

    pub fn toggle_task_done(&self, id: u64) -> Result<()> {
        let Some(was_done) = self.store.get_state().task(id).map(|task| task.done) else {
            return Ok(());
        };
        self.store.dispatch(Action::with_payload(TOGGLE_TASK_DONE, id))?;
        let now = if was_done { "open" } else { "done" };
        self.status(format!("Marked task #{id} as {now}"))
    }

    pub fn clear_done(&self) -> Result<()> {
        let done = self.store.get_state().done_count();
        if done == 0 {
            return Ok(());
        }
        self.store.dispatch(Action::new(CLEAR_DONE_TASKS))?;
        self.status(format!("Cleared {done} completed task(s)"))
    }
}

/// Run an action from a widget command, logging instead of propagating.
fn report(result: Result<()>) {
    if let Err(err) = result {
        tracing::warn!(%err, "task action failed");
    }
}

// =============================================================================
// Content
// =============================================================================

#[derive(Clone)]
pub struct TodoContent {
    actions: TaskActions,
    filter: Rc<Cell<Filter>>,
    tasks_column: Rc<Stack>,
    root: ComponentRef,
}

impl TodoContent {
    pub fn new(store: Store<TodoState>) -> Result<Self> {
        let actions = TaskActions::new(store);
        let filter = Rc::new(Cell::new(Filter::default()));

        let row_actions = actions.clone();
        let row_filter = Rc::clone(&filter);
        let tasks_column = column("tasks_column")?
            .derived(move |cx| {
                let tasks = cx.use_store_selector(|s: &TodoState| s.tasks.clone())?;
                task_rows(&tasks.value(), row_filter.get(), &row_actions)
            })
            .shared();

        let scroll: ComponentRef = scrollable_vertical("tasks_scroll", Rc::clone(&tasks_column))?.shared();
        let root: ComponentRef = frame("todo_content", move |_cx| Ok(Some(ChildSpec::from(Rc::clone(&scroll)))))?
            .named("content")
            .shared();

        Ok(Self {
            actions,
            filter,
            tasks_column,
            root,
        })
    }

    pub fn component(&self) -> ComponentRef {
        Rc::clone(&self.root)
    }

    pub fn actions(&self) -> &TaskActions {
        &self.actions
    }

    pub fn filter(&self) -> Filter {
        self.filter.get()
    }

    /// Switch the visible subset and rebuild the list.
    pub fn set_filter(&self, label: &str, value: &str) -> Result<()> {
        let Some(filter) = Filter::from_value(value) else {
            tracing::warn!(value, "unknown filter");
            return Ok(());
        };
        self.filter.set(filter);
        self.tasks_column.refresh()?;
        self.actions.status(format!("Filter set to: {label}"))
    }
}

fn task_rows(tasks: &[Task], filter: Filter, actions: &TaskActions) -> Result<Vec<ChildSpec>> {
    let visible: Vec<&Task> = tasks.iter().filter(|task| filter.admits(task)).collect();

    if visible.is_empty() {
        let message = if tasks.is_empty() {
            "No tasks yet. Add one above!"
        } else {
            "No tasks match this filter."
        };
        let placeholder = label("tasks_empty_placeholder")?.text(message).shared();
        return Ok(vec![placeholder.into()]);
    }

    visible
        .into_iter()
        .map(|task| task_row(task, actions).map(ChildSpec::from))
        .collect()
}

fn task_row(task: &Task, actions: &TaskActions) -> Result<Rc<Stack>> {
    let id = task.id;
    let mark = if task.done { '✓' } else { ' ' };

    let text = label(format!("task_label_{id}"))?
        .text(format!("[{mark}] {}", task.text))
        .shared();

    let toggle_actions = actions.clone();
    let toggle = button(format!("task_toggle_{id}"))?
        .text(if task.done { "Undo" } else { "Done" })
        .width(6)
        .on_command(move || report(toggle_actions.toggle_task_done(id)))
        .shared();

    let delete_actions = actions.clone();
    let delete = button(format!("task_delete_{id}"))?
        .text("✕")
        .width(3)
        .on_command(move || report(delete_actions.delete_task(id)))
        .shared();

    Ok(row(format!("task_row_{id}"))?
        .child((text, Layout::new().expand().halign(HAlign::Stretch)))
        .child(toggle)
        .child(delete)
        .shared())
}
