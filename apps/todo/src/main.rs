//! Interactive terminal todo list.
//!
//! Reads one command per line from stdin and re-renders the list after every
//! store notification. Logs go to stderr, the view to stdout.

use anyhow::Context;
use tidy_runtime::{metrics::PrometheusExporter, Store};
use todo::view::HELP;
use todo::{render, todo_reducer, Command, Config, TodoError, TodoSelectors, TodoState, TodoView};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let config = Config::from_env().context("invalid configuration")?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_level.as_str().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!(
        initial_filter = %config.initial_filter,
        max_feedback_depth = config.max_feedback_depth,
        metrics = config.metrics_enabled,
        "Starting todo"
    );

    let exporter = if config.metrics_enabled {
        Some(PrometheusExporter::install().context("failed to install metrics recorder")?)
    } else {
        None
    };

    let mut store = Store::with_config(
        TodoState::with_filter(config.initial_filter),
        todo_reducer(),
        (),
        config.store_config(),
    );

    let mut selectors = TodoSelectors::new();
    println!("{}\n", render(store.snapshot(), &mut selectors));
    store.subscribe(move |state: &TodoState| {
        println!("{}\n", render(state, &mut selectors));
    });

    let mut view = TodoView::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print_prompt(&config.prompt, view.task());

        let Some(line) = lines.next_line().await.context("failed to read stdin")? else {
            break;
        };

        let command = match Command::parse(&line) {
            Ok(command) => command,
            Err(error) => {
                println!("{error}");
                continue;
            },
        };

        let result = match command {
            Command::Task(text) => {
                view.update_task(text);
                Ok(())
            },
            Command::Add(text) => {
                if let Some(text) = text {
                    view.update_task(text);
                }
                view.add_todo(&mut store)
            },
            // Enter on an empty input does nothing
            Command::Submit => match view.add_todo(&mut store) {
                Err(TodoError::EmptyTask) => Ok(()),
                other => other,
            },
            Command::Status { position, change } => {
                let snapshot = store.snapshot().clone();
                view.change_status(&mut store, &snapshot, position, change)
                    .map(|_| ())
            },
            Command::Filter(filter) => view.filter_changed(&mut store, filter),
            Command::Clear => view.clear_completed(&mut store),
            Command::Dispatch(json) => view.dispatch_wire(&mut store, &json).map(|_| ()),
            Command::State => {
                match serde_json::to_string_pretty(store.snapshot()) {
                    Ok(json) => println!("{json}"),
                    Err(error) => tracing::error!(%error, "Failed to serialize state"),
                }
                Ok(())
            },
            Command::Metrics => {
                match &exporter {
                    Some(exporter) => println!("{}", exporter.render()),
                    None => println!("Metrics are disabled (TODO_METRICS=false)"),
                }
                Ok(())
            },
            Command::Help => {
                println!("{HELP}");
                Ok(())
            },
            Command::Quit => break,
        };

        if let Err(error) = result {
            tracing::debug!(%error, "Command failed");
            println!("{error}");
        }
    }

    tracing::info!(todos = store.snapshot().todos.len(), "Exiting");
    Ok(())
}

fn print_prompt(prompt: &str, task: &str) {
    use std::io::Write as _;

    print!("{prompt}{task}");
    if !task.is_empty() {
        print!("  (enter to add)\n{prompt}");
    }
    let _ = std::io::stdout().flush();
}
