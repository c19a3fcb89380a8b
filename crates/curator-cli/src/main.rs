//! Curator CLI application.
//!
//! Command-line interface over the curator execution core: import and
//! inspect plans, apply them against a sandboxed local filesystem, and
//! query execution state.

mod cli;
mod renderer;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{ApplyArgs, Cli, Commands, ImportPlanArgs, PlanCommands, PlanIdArgs};
use curator_core::{
    format_history, format_plan_list, handle_apply, handle_history, handle_import_plan,
    handle_list_plans, handle_resume, handle_show_plan, handle_status, ExecutionEngine,
    FileOperationStore, LocalFileSystem, OperationStore, Plan,
};
use log::{debug, info};
use renderer::TerminalRenderer;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let renderer = TerminalRenderer::new(!cli.no_color);

    let store_dir = match cli.store_dir {
        Some(path) => path,
        None => default_store_dir()?,
    };
    debug!("using store directory {}", store_dir.display());

    let store: Arc<dyn OperationStore> = Arc::new(
        FileOperationStore::new(&store_dir).context("Failed to open operation store")?,
    );

    use Commands::*;
    match cli.command {
        Plan { command } => handle_plan_command(&store, command, &renderer).await,
        Apply(args) => handle_apply_command(&store, &cli.root, args, &renderer).await,
        Status(args) => handle_status_command(&store, &cli.root, args, &renderer).await,
        History => handle_history_command(&store, &renderer).await,
        Resume => handle_resume_command(&store, &cli.root, &renderer).await,
    }
}

/// Default store root under the XDG data directory.
fn default_store_dir() -> Result<PathBuf> {
    xdg::BaseDirectories::with_prefix("curator")
        .create_data_directory("store")
        .context("Failed to create default store directory")
}

/// Builds the execution engine over the configured filesystem root.
fn build_engine(store: &Arc<dyn OperationStore>, root: &Path) -> Result<ExecutionEngine> {
    let fs = LocalFileSystem::new(root)
        .with_context(|| format!("Failed to open filesystem root {}", root.display()))?;
    Ok(ExecutionEngine::new(Arc::new(fs), Arc::clone(store)))
}

/// Handle plan subcommands
async fn handle_plan_command(
    store: &Arc<dyn OperationStore>,
    command: PlanCommands,
    renderer: &TerminalRenderer,
) -> Result<()> {
    use PlanCommands::*;
    match command {
        List => handle_plan_list(store, renderer).await,
        Show(args) => handle_plan_show(store, args, renderer).await,
        Import(args) => handle_plan_import(store, args, renderer).await,
    }
}

/// Handle plan list command
async fn handle_plan_list(
    store: &Arc<dyn OperationStore>,
    renderer: &TerminalRenderer,
) -> Result<()> {
    let summaries = handle_list_plans(store)
        .await
        .context("Failed to list plans")?;

    renderer.render(&format_plan_list(&summaries, Some("Stored Plans")))
}

/// Handle plan show command
async fn handle_plan_show(
    store: &Arc<dyn OperationStore>,
    args: PlanIdArgs,
    renderer: &TerminalRenderer,
) -> Result<()> {
    let plan = handle_show_plan(store, &args.into())
        .await
        .context("Failed to get plan")?;

    renderer.render(&plan.to_string())
}

/// Handle plan import command
async fn handle_plan_import(
    store: &Arc<dyn OperationStore>,
    args: ImportPlanArgs,
    renderer: &TerminalRenderer,
) -> Result<()> {
    let data = std::fs::read_to_string(&args.file)
        .with_context(|| format!("Failed to read plan file {}", args.file.display()))?;
    let plan: Plan = serde_json::from_str(&data)
        .with_context(|| format!("Failed to parse plan file {}", args.file.display()))?;

    let plan = handle_import_plan(store, plan)
        .await
        .context("Failed to import plan")?;

    info!("imported plan {}", plan.id);
    renderer.render(&format!(
        "Imported plan **{}** with {} step(s).",
        plan.id,
        plan.moves.len()
    ))
}

/// Handle apply command
async fn handle_apply_command(
    store: &Arc<dyn OperationStore>,
    root: &Path,
    args: ApplyArgs,
    renderer: &TerminalRenderer,
) -> Result<()> {
    let engine = build_engine(store, root)?;
    let plan_id = args.id.clone();

    let log = handle_apply(&engine, &args.into())
        .await
        .with_context(|| format!("Failed to execute plan {plan_id}"))?;

    renderer.render(&log.to_string())
}

/// Handle status command
async fn handle_status_command(
    store: &Arc<dyn OperationStore>,
    root: &Path,
    args: PlanIdArgs,
    renderer: &TerminalRenderer,
) -> Result<()> {
    let engine = build_engine(store, root)?;

    let log = handle_status(&engine, &args.into())
        .await
        .context("Failed to get execution status")?;

    renderer.render(&log.to_string())
}

/// Handle history command
async fn handle_history_command(
    store: &Arc<dyn OperationStore>,
    renderer: &TerminalRenderer,
) -> Result<()> {
    let logs = handle_history(store)
        .await
        .context("Failed to get execution history")?;

    renderer.render(&format_history(&logs))
}

/// Handle resume command
async fn handle_resume_command(
    store: &Arc<dyn OperationStore>,
    root: &Path,
    renderer: &TerminalRenderer,
) -> Result<()> {
    let engine = build_engine(store, root)?;

    handle_resume(&engine)
        .await
        .context("Failed to resume pending operations")?;

    renderer.render("Write-ahead log is quiescent; no operations remain pending.")
}
