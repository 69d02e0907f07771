//! To-do list demo.
//!
//! A store-driven task list rendered to the terminal through the in-memory
//! toolkit. Keys:
//!
//! - type / Backspace: edit the task input, Enter adds it
//! - Up / Down: select a task, Tab toggles it, Delete removes it
//! - F1 / F2 / F3: show all, open or done tasks; F4 clears done tasks
//! - Esc or Ctrl+C: quit
//!
//! Run with: cargo run --example todo 2> todo.log
//! (`RUST_LOG=spark_retained=debug` for lifecycle logs,
//! `SPARK_RETAINED_DEBUG_BORDERS=1` to outline every frame)

mod app;
mod content;
mod header;
mod reducer;

use std::error::Error;
use std::io::{self, Write};
use std::rc::Rc;

use crossterm::cursor::{Hide, Show};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use spark_retained::{
    compute_geometry, props, MemoryToolkit, Runtime, RuntimeConfig, Store, TerminalPainter, Toolkit,
};
use tracing_subscriber::EnvFilter;

use app::TodoApp;
use content::Filter;
use reducer::TodoState;

const HELP: &str = "Enter add | Tab toggle | Del delete | F1-F3 filter | F4 clear done | Esc quit";

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let (width, height) = terminal::size()?;
    let toolkit = Rc::new(MemoryToolkit::new());
    let runtime = Runtime::with_config(toolkit.clone(), RuntimeConfig::from_env().with_gaps(1, 0));
    let store = Store::new(reducer::reducer, TodoState::default());
    let app = app::open(&runtime, &store, width, height)?;

    terminal::enable_raw_mode()?;
    execute!(io::stdout(), EnterAlternateScreen, Hide)?;
    let result = run(&toolkit, &store, &app);
    execute!(io::stdout(), Show, LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;

    app.window.close();
    result
}

fn run(toolkit: &MemoryToolkit, store: &Store<TodoState>, app: &TodoApp) -> Result<(), Box<dyn Error>> {
    let mut painter = TerminalPainter::new();
    let mut stdout = io::stdout();
    let mut selected = 0usize;

    loop {
        let visible = visible_ids(store, app.content.filter());
        selected = selected.min(visible.len().saturating_sub(1));
        draw(toolkit, app, &mut painter, visible.get(selected).copied(), &mut stdout)?;

        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if !handle_key(toolkit, app, key, &visible, &mut selected) {
                    return Ok(());
                }
            }
            Event::Resize(width, height) => {
                app.window.resize(width, height)?;
                painter.invalidate();
            }
            _ => {}
        }
    }
}

fn visible_ids(store: &Store<TodoState>, filter: Filter) -> Vec<u64> {
    store
        .get_state()
        .tasks
        .iter()
        .filter(|task| filter.admits(task))
        .map(|task| task.id)
        .collect()
}

fn draw<W: Write>(
    toolkit: &MemoryToolkit,
    app: &TodoApp,
    painter: &mut TerminalPainter,
    selected: Option<u64>,
    out: &mut W,
) -> Result<(), Box<dyn Error>> {
    let (width, height) = app.window.size();
    let root = app.window.handle();
    let mut frame = painter.paint(toolkit, root, width, height)?;

    if let Some(id) = selected {
        let geometry = compute_geometry(toolkit, root, width, height)?;
        let row = app.window.lookup(&format!("task_row_{id}"));
        if let Some(bounds) = row.and_then(|handle| geometry.get(&handle)) {
            frame.set(bounds.x, bounds.y, '›');
        }
    }

    let area = frame.area();
    frame.put_str(0, height.saturating_sub(1), HELP, &area);
    painter.present(&frame, out)?;
    Ok(())
}

/// Returns false when the user asked to quit.
fn handle_key(toolkit: &MemoryToolkit, app: &TodoApp, key: KeyEvent, visible: &[u64], selected: &mut usize) -> bool {
    let invoke = |id: &str| {
        if let Some(handle) = app.window.lookup(id) {
            toolkit.invoke(handle);
        }
    };
    let pick_filter = |label: &str| {
        if let Some(handle) = app.window.lookup("filter_menu") {
            toolkit.invoke_menu_item(handle, label);
        }
    };

    match key.code {
        KeyCode::Esc => return false,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => return false,
        KeyCode::Char(c) => edit_input(toolkit, app, |text| text.push(c)),
        KeyCode::Backspace => edit_input(toolkit, app, |text| {
            text.pop();
        }),
        KeyCode::Enter => invoke("add_button"),
        KeyCode::Up => *selected = selected.saturating_sub(1),
        KeyCode::Down => *selected = (*selected + 1).min(visible.len().saturating_sub(1)),
        KeyCode::Tab => {
            if let Some(id) = visible.get(*selected) {
                invoke(&format!("task_toggle_{id}"));
            }
        }
        KeyCode::Delete => {
            if let Some(id) = visible.get(*selected) {
                invoke(&format!("task_delete_{id}"));
            }
        }
        KeyCode::F(1) => pick_filter("All"),
        KeyCode::F(2) => pick_filter("Open"),
        KeyCode::F(3) => pick_filter("Done"),
        KeyCode::F(4) => invoke("clear_done_button"),
        _ => {}
    }
    true
}

fn edit_input(toolkit: &MemoryToolkit, app: &TodoApp, edit: impl FnOnce(&mut String)) {
    let Some(input) = app.window.lookup(header::TASK_INPUT) else {
        return;
    };
    let mut text = toolkit
        .property(input, "text")
        .and_then(|value| value.as_str().map(str::to_string))
        .unwrap_or_default();
    edit(&mut text);
    if let Err(err) = toolkit.configure(input, &props([("text", text)])) {
        tracing::warn!(%err, "could not update the task input");
    }
}
