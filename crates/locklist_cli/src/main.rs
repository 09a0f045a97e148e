//! Console harness for the LockList core.
//!
//! # Responsibility
//! - Drive the session-gated list against a real SQLite store.
//! - Stand in for device authentication with terminal y/n prompts.

mod args;
mod console;

use args::Cli;
use clap::Parser;
use console::{read_line, shared_stdin, ConsoleAuthenticator, ConsoleSettingsNavigator};
use locklist_core::{
    default_log_level, init_logging, AccessState, ItemPatch, SqliteKeyValueStore, TodoApp,
    TodoConfig, TodoId, TodoItem, TodoServiceError,
};
use std::process::ExitCode;
use std::sync::Arc;

const HELP: &str = "commands:
  list                 show todos (newest first)
  add <title>          add a todo
  edit <id> <title>    rename a todo
  done <id>            mark completed
  undone <id>          mark open
  rm <id>              delete a todo
  clear                delete every todo
  lock | unlock        lock or unlock the session
  status               show session state
  help | quit";

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Some(log_dir) = cli.log_dir.as_deref() {
        if let Err(err) = init_logging(default_log_level(), log_dir) {
            eprintln!("logging disabled: {err}");
        }
    }

    let kv = match SqliteKeyValueStore::open(&cli.db_path) {
        Ok(kv) => kv,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };

    let input = shared_stdin();
    let enrollment = cli.enrollment.into();
    let app = TodoApp::new(
        Arc::new(kv),
        Arc::new(ConsoleAuthenticator::new(enrollment, Arc::clone(&input))),
        Arc::new(ConsoleSettingsNavigator),
        TodoConfig::default(),
    );
    let _session_echo = app
        .session
        .add_listener(|authenticated| println!("[session] authenticated={authenticated}"));

    println!(
        "locklist_core {} ({} items)",
        locklist_core::core_version(),
        app.list.load().await.len()
    );
    if app.access.refresh().await == AccessState::NeedsSetup {
        println!("Please set device authentication to use the app fully.");
        app.access.open_settings().await;
    }
    println!("{HELP}");

    while let Some(line) = read_line(&input).await {
        if !run_command(&app, line.trim()).await {
            break;
        }
    }

    app.list.flush().await;
    ExitCode::SUCCESS
}

/// Executes one command. Returns `false` when the loop should stop.
async fn run_command(app: &TodoApp, line: &str) -> bool {
    let (command, rest) = line.split_once(' ').unwrap_or((line, ""));
    let rest = rest.trim();
    match command {
        "" => {}
        "list" => print_items(&app.list.items().await),
        "add" => report(app.list.add_item(rest).await.map(|item| describe(&item))),
        "edit" => {
            let (id, title) = rest.split_once(' ').unwrap_or((rest, ""));
            let patch = ItemPatch::title(title);
            report_update(app.list.update_item(&TodoId::from(id), &patch).await);
        }
        "done" | "undone" => {
            let patch = ItemPatch::completed(command == "done");
            report_update(app.list.update_item(&TodoId::from(rest), &patch).await);
        }
        "rm" => report(app.list.delete_item(&TodoId::from(rest)).await.map(|removed| {
            if removed {
                "deleted".to_string()
            } else {
                "no such todo".to_string()
            }
        })),
        "clear" => report(
            app.list
                .clear_all()
                .await
                .map(|removed| format!("removed {removed} todo(s)")),
        ),
        "lock" => println!("{}", app.access.lock().as_str()),
        "unlock" => {
            let state = app.access.unlock_now().await;
            println!("{}", state.as_str());
            if state == AccessState::NeedsSetup {
                app.access.open_settings().await;
            }
        }
        "status" => println!("{:?}", app.session.phase()),
        "help" => println!("{HELP}"),
        "quit" | "exit" => return false,
        other => println!("unknown command `{other}`; try `help`"),
    }
    true
}

fn report(result: Result<String, TodoServiceError>) {
    match result {
        Ok(message) => println!("{message}"),
        Err(TodoServiceError::Validation(_)) => println!("Field required: please enter something."),
        Err(TodoServiceError::NotAuthenticated) => {
            println!("Not authenticated: unlock the app before changing todos.")
        }
        Err(err) => println!("{err}"),
    }
}

fn report_update(result: Result<Option<TodoItem>, TodoServiceError>) {
    report(result.map(|item| {
        item.map_or_else(|| "no such todo".to_string(), |item| describe(&item))
    }));
}

fn print_items(items: &[TodoItem]) {
    if items.is_empty() {
        println!("No todos yet");
    }
    for item in items {
        println!("{}", describe(item));
    }
}

fn describe(item: &TodoItem) -> String {
    format!(
        "[{}] {} {} ({})",
        if item.completed { "x" } else { " " },
        item.id,
        item.title,
        item.created_at.format("%Y-%m-%d %H:%M")
    )
}
