use std::error::Error;

use chrono::Local;

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_io;
use crate::io::http_store::HttpTaskStore;
use crate::io::store::TaskStore;
use crate::io::sync::submit_then_refresh;
use crate::logging;
use crate::model::config::ClientConfig;
use crate::model::query::{CompletionFilter, SortMode, SortOrder, TaskQuery};
use crate::model::task::Task;
use crate::ops::drag::{DragEnd, DragOutcome};
use crate::ops::session::EditSession;

type CmdResult = Result<(), Box<dyn Error>>;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

/// Load config, set up logging and the HTTP store, then run the command.
pub async fn dispatch(cli: Cli) -> CmdResult {
    let mut config = config_io::load_config(cli.config.as_deref())?;
    if let Some(url) = cli.api_url {
        config.api.url = url;
    }
    logging::init(cli.verbose, &config.log.filter);

    let store = HttpTaskStore::from_config(&config.api)?;
    tracing::debug!(url = store.base_url(), "using task store");
    run(cli.command, &store, &config, cli.json).await
}

/// Run one command against `store`.
pub async fn run<S>(command: Commands, store: &S, config: &ClientConfig, json: bool) -> CmdResult
where
    S: TaskStore + ?Sized,
{
    match command {
        Commands::List(args) => cmd_list(args, store, config, json).await,
        Commands::Show(args) => cmd_show(args.id, store, json).await,
        Commands::Add(args) => cmd_add(args, store, config, json).await,
        Commands::Edit(args) => cmd_edit(args, store, json).await,
        Commands::Done(args) => cmd_done(args.id, store, config, json).await,
        Commands::Rm(args) => cmd_rm(args.id, store, config, json).await,
        Commands::Step(cmd) => cmd_step(cmd.action, store, json).await,
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn print_task(task: &Task, json: bool) -> CmdResult {
    if json {
        println!("{}", serde_json::to_string_pretty(&task_to_json(task))?);
    } else {
        for line in format_task_detail(task) {
            println!("{}", line);
        }
    }
    Ok(())
}

fn print_task_list(tasks: &[Task], json: bool) -> CmdResult {
    if json {
        let out: Vec<_> = tasks.iter().map(task_to_json).collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else if tasks.is_empty() {
        println!("no tasks");
    } else {
        for line in format_task_list(tasks) {
            println!("{}", line);
        }
    }
    Ok(())
}

/// Build the list query from config defaults and command-line overrides.
fn list_query(args: &ListArgs, config: &ClientConfig) -> Result<TaskQuery, String> {
    let mut query = config.list.query();
    if let Some(sort) = &args.sort {
        query.sort = SortMode::parse(sort)?;
    }
    if let Some(order) = &args.order {
        query.order = SortOrder::parse(order)?;
    }
    let filter = if args.all {
        Some(CompletionFilter::All)
    } else if args.completed {
        Some(CompletionFilter::Completed)
    } else if args.incomplete {
        Some(CompletionFilter::Incomplete)
    } else {
        None
    };
    if let Some(filter) = filter {
        query.completed = filter.as_flag();
    }
    Ok(query)
}

/// Submit a task-level change, refresh the configured listing whatever the
/// outcome, print it, then report the submission result.
async fn submit_and_list<S, T, E>(
    store: &S,
    config: &ClientConfig,
    json: bool,
    submit: impl Future<Output = Result<T, E>>,
) -> CmdResult
where
    S: TaskStore + ?Sized,
    E: Error + 'static,
{
    let query = config.list.query();
    let (submitted, refreshed) = submit_then_refresh(submit, || store.list_tasks(&query)).await;
    match refreshed {
        Ok(tasks) => print_task_list(&tasks, json)?,
        Err(err) => tracing::warn!(%err, "refresh failed"),
    }
    submitted.map_err(|e| Box::new(e) as Box<dyn Error>)?;
    Ok(())
}

/// Load a task into an editing session, apply `edit`, save, and print the
/// task as refreshed from the store. `edit` returns false when it changed
/// nothing, in which case nothing is sent.
async fn edit_task<S, F>(store: &S, id: i64, json: bool, edit: F) -> CmdResult
where
    S: TaskStore + ?Sized,
    F: FnOnce(&mut EditSession) -> Result<bool, Box<dyn Error>>,
{
    let task = store.get_task(id).await?;
    let mut session = EditSession::load(&task);
    if !edit(&mut session)? {
        return print_task(&task, json);
    }

    let (saved, refreshed) = submit_then_refresh(session.save(store), || store.get_task(id)).await;
    match refreshed {
        Ok(task) => print_task(&task, json)?,
        Err(err) => tracing::warn!(%err, id, "refresh failed"),
    }
    saved?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Task commands
// ---------------------------------------------------------------------------

async fn cmd_list<S>(args: ListArgs, store: &S, config: &ClientConfig, json: bool) -> CmdResult
where
    S: TaskStore + ?Sized,
{
    let query = list_query(&args, config)?;
    let tasks = store.list_tasks(&query).await?;
    print_task_list(&tasks, json)
}

async fn cmd_show<S>(id: i64, store: &S, json: bool) -> CmdResult
where
    S: TaskStore + ?Sized,
{
    let task = store.get_task(id).await?;
    print_task(&task, json)
}

async fn cmd_add<S>(args: AddArgs, store: &S, config: &ClientConfig, json: bool) -> CmdResult
where
    S: TaskStore + ?Sized,
{
    let mut session = EditSession::new_on(Local::now().date_naive());
    session.title = args.title;
    if let Some(due) = &args.due {
        session.due_date = parse_due_date(due)?;
    }
    session.description = args.description.unwrap_or_default();
    session.priority = parse_priority(&args.priority)?;
    for step in &args.steps {
        session.add_step(step)?;
    }
    submit_and_list(store, config, json, session.save(store)).await
}

async fn cmd_edit<S>(args: EditArgs, store: &S, json: bool) -> CmdResult
where
    S: TaskStore + ?Sized,
{
    edit_task(store, args.id, json, |session| {
        if let Some(title) = args.title {
            session.title = title;
        }
        if let Some(desc) = args.description {
            session.description = desc;
        }
        if let Some(due) = &args.due {
            session.due_date = parse_due_date(due)?;
        }
        if let Some(priority) = &args.priority {
            session.priority = parse_priority(priority)?;
        }
        Ok(true)
    })
    .await
}

/// Toggle a task without steps. A task with steps is complete exactly when
/// they all are, so it is refused here and its steps are toggled instead.
async fn cmd_done<S>(id: i64, store: &S, config: &ClientConfig, json: bool) -> CmdResult
where
    S: TaskStore + ?Sized,
{
    let task = store.get_task(id).await?;
    if !task.steps.is_empty() {
        return Err(format!(
            "task {} has steps, its completion follows them (use `mt step toggle`)",
            id
        )
        .into());
    }
    submit_and_list(store, config, json, store.toggle_task(id)).await
}

async fn cmd_rm<S>(id: i64, store: &S, config: &ClientConfig, json: bool) -> CmdResult
where
    S: TaskStore + ?Sized,
{
    submit_and_list(store, config, json, store.delete_task(id)).await
}

// ---------------------------------------------------------------------------
// Step commands
// ---------------------------------------------------------------------------

async fn cmd_step<S>(action: StepAction, store: &S, json: bool) -> CmdResult
where
    S: TaskStore + ?Sized,
{
    match action {
        StepAction::Add(args) => {
            edit_task(store, args.id, json, |session| {
                session.add_step(&args.title)?;
                Ok(true)
            })
            .await
        }
        StepAction::Rm(args) => {
            edit_task(store, args.id, json, |session| {
                session.remove_step(position_to_index(args.pos)?)?;
                Ok(true)
            })
            .await
        }
        StepAction::Title(args) => {
            edit_task(store, args.id, json, |session| {
                session.rename_step(position_to_index(args.pos)?, args.title)?;
                Ok(true)
            })
            .await
        }
        StepAction::Toggle(args) => {
            edit_task(store, args.id, json, |session| {
                let done = session.toggle_step(position_to_index(args.pos)?)?;
                tracing::debug!(task_completed = done, "step toggled");
                Ok(true)
            })
            .await
        }
        StepAction::Drag(args) => {
            edit_task(store, args.id, json, |session| {
                match session.drag(&DragEnd::new(args.active, args.over)) {
                    DragOutcome::Moved { .. } => Ok(true),
                    DragOutcome::Ignored(err) if err.is_benign() => Ok(false),
                    DragOutcome::Ignored(err) => Err(err.into()),
                }
            })
            .await
        }
        StepAction::Mv(args) => {
            edit_task(store, args.id, json, |session| {
                let from = position_to_index(args.from)?;
                let to = position_to_index(args.to)?;
                session.move_step(from, to)?;
                Ok(from != to)
            })
            .await
        }
    }
}
