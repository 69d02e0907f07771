//! End-to-end flow of the to-do demo against the in-memory toolkit.

#[allow(dead_code)]
#[path = "../demos/todo/app.rs"]
mod app;
#[allow(dead_code)]
#[path = "../demos/todo/content.rs"]
mod content;
#[allow(dead_code)]
#[path = "../demos/todo/header.rs"]
mod header;
#[allow(dead_code)]
#[path = "../demos/todo/reducer.rs"]
mod reducer;

use std::rc::Rc;

use spark_retained::{
    props, Action, MemoryToolkit, PropertyValue, Runtime, RuntimeConfig, Store, TerminalPainter, Toolkit,
};

use app::TodoApp;
use reducer::{reducer, Task, TodoState, ADD_TASK, CLEAR_DONE_TASKS, DELETE_TASK, TOGGLE_TASK_DONE};

// =============================================================================
// Reducer
// =============================================================================

#[test]
fn test_reducer_add_toggle_clear() {
    let state = TodoState::default();

    let state = reducer(&state, &Action::with_payload(ADD_TASK, "buy milk"));
    assert_eq!(
        state.tasks,
        vec![Task {
            id: 1,
            text: "buy milk".into(),
            done: false
        }]
    );
    assert_eq!(state.next_task_id, 2);
    assert_eq!(state.summary, "1 open / 0 done");
    assert!(!state.clear_enabled);

    let state = reducer(&state, &Action::with_payload(TOGGLE_TASK_DONE, 1));
    assert!(state.tasks[0].done);
    assert_eq!(state.summary, "0 open / 1 done");
    assert!(state.clear_enabled);

    let state = reducer(&state, &Action::new(CLEAR_DONE_TASKS));
    assert!(state.tasks.is_empty());
    assert_eq!(state.summary, "0 open / 0 done");
    assert!(!state.clear_enabled);
    assert_eq!(state.next_task_id, 2);
}

#[test]
fn test_reducer_ignores_noops() {
    let state = reducer(&TodoState::default(), &Action::with_payload(ADD_TASK, "  walk  "));
    assert_eq!(state.tasks[0].text, "walk");

    assert_eq!(reducer(&state, &Action::with_payload(ADD_TASK, "   ")), state);
    assert_eq!(reducer(&state, &Action::with_payload(DELETE_TASK, 42)), state);
    assert_eq!(reducer(&state, &Action::new(DELETE_TASK)), state);
    assert_eq!(reducer(&state, &Action::with_payload(TOGGLE_TASK_DONE, 42)), state);
    assert_eq!(reducer(&state, &Action::new(CLEAR_DONE_TASKS)), state);
    assert_eq!(reducer(&state, &Action::new("UNKNOWN")), state);

    let state = reducer(&state, &Action::with_payload(DELETE_TASK, 1));
    assert!(state.tasks.is_empty());
}

// =============================================================================
// UI
// =============================================================================

fn open() -> (Rc<MemoryToolkit>, Store<TodoState>, TodoApp) {
    let toolkit = Rc::new(MemoryToolkit::new());
    let runtime = Runtime::with_config(toolkit.clone(), RuntimeConfig::new().with_gaps(1, 0));
    let store = Store::new(reducer, TodoState::default());
    let app = app::open(&runtime, &store, 80, 24).unwrap();
    (toolkit, store, app)
}

fn text_of(toolkit: &MemoryToolkit, app: &TodoApp, id: &str) -> Option<String> {
    let handle = app.window.lookup(id)?;
    toolkit.node(handle)?.text().map(str::to_string)
}

fn click(toolkit: &MemoryToolkit, app: &TodoApp, id: &str) {
    let handle = app.window.require(id).unwrap();
    assert!(toolkit.invoke(handle), "{id} has no command");
}

fn type_task(toolkit: &MemoryToolkit, app: &TodoApp, text: &str) {
    let input = app.window.require(header::TASK_INPUT).unwrap();
    toolkit.configure(input, &props([("text", text)])).unwrap();
}

#[test]
fn test_initial_window() {
    let (toolkit, _, app) = open();

    for id in ["root", "todo_header", "filter_menu", "task_input", "add_button", "todo_content", "tasks_column"] {
        assert!(app.window.lookup(id).is_some(), "{id} not registered");
    }
    assert_eq!(text_of(&toolkit, &app, "status_label").as_deref(), Some("Ready"));
    assert_eq!(text_of(&toolkit, &app, "summary_label").as_deref(), Some("0 open / 0 done"));
    assert_eq!(
        text_of(&toolkit, &app, "tasks_empty_placeholder").as_deref(),
        Some("No tasks yet. Add one above!")
    );

    let clear = app.window.require("clear_done_button").unwrap();
    assert_eq!(toolkit.node(clear).unwrap().props.get("enabled"), Some(&PropertyValue::Bool(false)));
}

#[test]
fn test_add_toggle_filter_clear() {
    let (toolkit, store, app) = open();

    type_task(&toolkit, &app, "buy milk");
    click(&toolkit, &app, "add_button");

    assert_eq!(store.get_state().tasks.len(), 1);
    assert_eq!(text_of(&toolkit, &app, "status_label").as_deref(), Some("Added task #1"));
    assert_eq!(text_of(&toolkit, &app, "summary_label").as_deref(), Some("1 open / 0 done"));
    assert_eq!(text_of(&toolkit, &app, "task_input").as_deref(), Some(""));
    assert_eq!(text_of(&toolkit, &app, "task_label_1").as_deref(), Some("[ ] buy milk"));
    assert!(app.window.lookup("tasks_empty_placeholder").is_none());

    click(&toolkit, &app, "task_toggle_1");
    assert!(store.get_state().tasks[0].done);
    assert_eq!(text_of(&toolkit, &app, "status_label").as_deref(), Some("Marked task #1 as done"));
    assert_eq!(text_of(&toolkit, &app, "task_label_1").as_deref(), Some("[✓] buy milk"));
    assert_eq!(text_of(&toolkit, &app, "task_toggle_1").as_deref(), Some("Undo"));
    let clear = app.window.require("clear_done_button").unwrap();
    assert_eq!(toolkit.node(clear).unwrap().props.get("enabled"), Some(&PropertyValue::Bool(true)));

    let menu = app.window.require("filter_menu").unwrap();
    assert!(toolkit.invoke_menu_item(menu, "Open"));
    assert_eq!(text_of(&toolkit, &app, "status_label").as_deref(), Some("Filter set to: Open"));
    assert!(app.window.lookup("task_row_1").is_none());
    assert_eq!(
        text_of(&toolkit, &app, "tasks_empty_placeholder").as_deref(),
        Some("No tasks match this filter.")
    );

    assert!(toolkit.invoke_menu_item(menu, "All"));
    assert!(app.window.lookup("task_row_1").is_some());

    click(&toolkit, &app, "clear_done_button");
    assert!(store.get_state().tasks.is_empty());
    assert_eq!(
        text_of(&toolkit, &app, "status_label").as_deref(),
        Some("Cleared 1 completed task(s)")
    );
    assert_eq!(
        text_of(&toolkit, &app, "tasks_empty_placeholder").as_deref(),
        Some("No tasks yet. Add one above!")
    );
}

#[test]
fn test_empty_input_only_sets_status() {
    let (toolkit, store, app) = open();

    type_task(&toolkit, &app, "   ");
    click(&toolkit, &app, "add_button");

    assert!(store.get_state().tasks.is_empty());
    assert_eq!(text_of(&toolkit, &app, "status_label").as_deref(), Some("Cannot add empty task"));
    // Input is left alone.
    assert_eq!(text_of(&toolkit, &app, "task_input").as_deref(), Some("   "));
}

#[test]
fn test_delete_releases_row_widgets() {
    let (toolkit, store, app) = open();

    type_task(&toolkit, &app, "a");
    click(&toolkit, &app, "add_button");
    type_task(&toolkit, &app, "b");
    click(&toolkit, &app, "add_button");
    let live = toolkit.live_count();

    click(&toolkit, &app, "task_delete_1");

    assert_eq!(store.get_state().tasks.len(), 1);
    assert_eq!(text_of(&toolkit, &app, "status_label").as_deref(), Some("Deleted task #1"));
    assert!(app.window.lookup("task_row_1").is_none());
    assert!(app.window.lookup("task_label_1").is_none());
    assert!(app.window.lookup("task_row_2").is_some());
    // One row: the row frame plus label, toggle and delete.
    assert_eq!(toolkit.live_count(), live - 4);
}

#[test]
fn test_header_survives_status_changes() {
    let (toolkit, _, app) = open();
    let header_column = app.window.require("header_column").unwrap();

    type_task(&toolkit, &app, "x");
    click(&toolkit, &app, "add_button");
    click(&toolkit, &app, "task_toggle_1");

    assert_eq!(app.window.lookup("header_column"), Some(header_column));
    assert!(toolkit.is_alive(header_column));
}

#[test]
fn test_window_paints_header() {
    let (toolkit, _, app) = open();
    let painter = TerminalPainter::new();

    let frame = painter.paint(&toolkit, app.window.handle(), 80, 24).unwrap();
    let screen = frame.to_string();
    assert!(screen.contains("Filter ▾"), "{screen}");
    assert!(screen.contains("[Add]"), "{screen}");
}

#[test]
fn test_close_releases_store_subscriptions() {
    let (_, store, app) = open();
    assert!(store.listener_count() > 0);

    app.window.close();

    assert!(!app.window.is_open());
    assert_eq!(store.listener_count(), 0);
}
