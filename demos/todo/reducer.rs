//! To-do state and its reducer.

use spark_retained::Action;

pub const SET_STATUS: &str = "SET_STATUS";
pub const SET_SUMMARY: &str = "SET_SUMMARY";
pub const SET_CLEAR_ENABLED: &str = "SET_CLEAR_ENABLED";
pub const ADD_TASK: &str = "ADD_TASK";
pub const DELETE_TASK: &str = "DELETE_TASK";
pub const TOGGLE_TASK_DONE: &str = "TOGGLE_TASK_DONE";
pub const CLEAR_DONE_TASKS: &str = "CLEAR_DONE_TASKS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: u64,
    pub text: String,
    pub done: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoState {
    pub status: String,
    /// `"<open> open / <done> done"`, kept in step with `tasks`.
    pub summary: String,
    /// True while at least one task is done.
    pub clear_enabled: bool,
    pub tasks: Vec<Task>,
    pub next_task_id: u64,
}

impl Default for TodoState {
    fn default() -> Self {
        Self {
            status: "Ready".to_string(),
            summary: "0 open / 0 done".to_string(),
            clear_enabled: false,
            tasks: Vec::new(),
            next_task_id: 1,
        }
    }
}

impl TodoState {
    pub fn task(&self, id: u64) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn done_count(&self) -> usize {
        self.tasks.iter().filter(|task| task.done).count()
    }

    /// Replace the task list and recompute the derived fields.
    fn with_tasks(mut self, tasks: Vec<Task>) -> Self {
        let done = tasks.iter().filter(|task| task.done).count();
        let open = tasks.len() - done;
        self.summary = format!("{open} open / {done} done");
        self.clear_enabled = done > 0;
        self.tasks = tasks;
        self
    }
}

fn task_id(action: &Action) -> Option<u64> {
    action.payload_i64().and_then(|id| u64::try_from(id).ok())
}

/// Pure transition; unknown actions return the state unchanged.
pub fn reducer(state: &TodoState, action: &Action) -> TodoState {
    let next = state.clone();

    match action.kind.as_str() {
        SET_STATUS => TodoState {
            status: action.payload_str().unwrap_or_default().to_string(),
            ..next
        },
        SET_SUMMARY => TodoState {
            summary: action.payload_str().unwrap_or_default().to_string(),
            ..next
        },
        SET_CLEAR_ENABLED => TodoState {
            clear_enabled: action.payload_bool().unwrap_or(false),
            ..next
        },
        ADD_TASK => {
            let text = action.payload_str().unwrap_or_default().trim();
            if text.is_empty() {
                return next;
            }
            let id = next.next_task_id;
            let mut tasks = next.tasks.clone();
            tasks.push(Task {
                id,
                text: text.to_string(),
                done: false,
            });
            TodoState {
                next_task_id: id + 1,
                ..next
            }
            .with_tasks(tasks)
        }
        DELETE_TASK => {
            let Some(id) = task_id(action) else {
                return next;
            };
            if next.task(id).is_none() {
                return next;
            }
            let tasks = next.tasks.iter().filter(|task| task.id != id).cloned().collect();
            next.with_tasks(tasks)
        }
        TOGGLE_TASK_DONE => {
            let Some(id) = task_id(action) else {
                return next;
            };
            if next.task(id).is_none() {
                return next;
            }
            let tasks = next
                .tasks
                .iter()
                .map(|task| Task {
                    done: if task.id == id { !task.done } else { task.done },
                    ..task.clone()
                })
                .collect();
            next.with_tasks(tasks)
        }
        CLEAR_DONE_TASKS => {
            if next.done_count() == 0 {
                return next;
            }
            let tasks = next.tasks.iter().filter(|task| !task.done).cloned().collect();
            next.with_tasks(tasks)
        }
        _ => next,
    }
}
