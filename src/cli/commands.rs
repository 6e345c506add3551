use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "mt", about = concat!("microtask v", env!("CARGO_PKG_VERSION"), " - tasks with ordered steps"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Read configuration from this file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Task store base URL (overrides config)
    #[arg(long = "api-url", global = true)]
    pub api_url: Option<String>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List tasks
    List(ListArgs),
    /// Show task details and steps
    Show(IdArg),
    /// Create a task
    Add(AddArgs),
    /// Change a task's fields
    Edit(EditArgs),
    /// Toggle a task without steps between complete and incomplete
    Done(IdArg),
    /// Delete a task and its steps
    Rm(IdArg),
    /// Work with a task's steps
    Step(StepCmd),
}

// ---------------------------------------------------------------------------
// Task args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct IdArg {
    /// Task ID
    pub id: i64,
}

#[derive(Args)]
pub struct ListArgs {
    /// Sort by: due_date, priority
    #[arg(long)]
    pub sort: Option<String>,
    /// Sort order: asc, desc
    #[arg(long)]
    pub order: Option<String>,
    /// Only completed tasks
    #[arg(long, conflicts_with_all = ["incomplete", "all"])]
    pub completed: bool,
    /// Only incomplete tasks
    #[arg(long, conflicts_with = "all")]
    pub incomplete: bool,
    /// Complete and incomplete tasks
    #[arg(long)]
    pub all: bool,
}

#[derive(Args)]
pub struct AddArgs {
    /// Task title
    pub title: String,
    /// Due date (YYYY-MM-DD, default: today)
    #[arg(long)]
    pub due: Option<String>,
    /// Description
    #[arg(long = "desc")]
    pub description: Option<String>,
    /// Priority: low, medium, high
    #[arg(long, default_value = "low")]
    pub priority: String,
    /// Add a step (repeatable, kept in the order given)
    #[arg(long = "step")]
    pub steps: Vec<String>,
}

#[derive(Args)]
pub struct EditArgs {
    /// Task ID
    pub id: i64,
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long = "desc")]
    pub description: Option<String>,
    /// Due date (YYYY-MM-DD)
    #[arg(long)]
    pub due: Option<String>,
    /// Priority: low, medium, high
    #[arg(long)]
    pub priority: Option<String>,
}

// ---------------------------------------------------------------------------
// Step args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct StepCmd {
    #[command(subcommand)]
    pub action: StepAction,
}

#[derive(Subcommand)]
pub enum StepAction {
    /// Append a step
    Add(StepAddArgs),
    /// Remove the step at a position
    Rm(StepPosArgs),
    /// Rename the step at a position
    Title(StepTitleArgs),
    /// Toggle the step at a position
    Toggle(StepPosArgs),
    /// Drop one step onto another, by step key (see `mt show`)
    Drag(StepDragArgs),
    /// Move a step from one position to another
    Mv(StepMvArgs),
}

#[derive(Args)]
pub struct StepAddArgs {
    /// Task ID
    pub id: i64,
    /// Step title
    pub title: String,
}

#[derive(Args)]
pub struct StepPosArgs {
    /// Task ID
    pub id: i64,
    /// Step position (1-based)
    pub pos: usize,
}

#[derive(Args)]
pub struct StepTitleArgs {
    /// Task ID
    pub id: i64,
    /// Step position (1-based)
    pub pos: usize,
    /// New title
    pub title: String,
}

#[derive(Args)]
pub struct StepDragArgs {
    /// Task ID
    pub id: i64,
    /// Key of the step being dragged
    pub active: String,
    /// Key of the step it is dropped onto
    pub over: String,
}

#[derive(Args)]
pub struct StepMvArgs {
    /// Task ID
    pub id: i64,
    /// Current position (1-based)
    pub from: usize,
    /// New position (1-based)
    pub to: usize,
}
