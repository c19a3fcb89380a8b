//! Command-line interface definitions using clap.
//!
//! Argument structs carry the clap-specific attributes and convert into the
//! core parameter types, keeping the core free of CLI framework concerns.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use curator_core::params::{Apply, PlanId};

#[derive(Parser)]
#[command(version, about = "Execute advisor-produced file reorganization plans", name = "curator")]
pub struct Cli {
    /// Directory holding plans, WAL records, and execution logs.
    /// Defaults to $XDG_DATA_HOME/curator/store
    #[arg(long, global = true)]
    pub store_dir: Option<PathBuf>,

    /// Root directory the local filesystem backend is confined to
    #[arg(long, default_value = ".", global = true)]
    pub root: PathBuf,

    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage stored plans
    Plan {
        #[command(subcommand)]
        command: PlanCommands,
    },
    /// Execute a stored plan against the filesystem
    Apply(ApplyArgs),
    /// Show the most recent execution status of a plan
    Status(PlanIdArgs),
    /// Show the execution history, newest first
    History,
    /// Replay pending write-ahead-log operations left by an interrupted run
    Resume,
}

#[derive(Subcommand)]
pub enum PlanCommands {
    /// List stored plans, newest first
    List,
    /// Show a stored plan in full
    Show(PlanIdArgs),
    /// Import an advisor-produced plan file into the store
    Import(ImportPlanArgs),
}

/// Address a plan by its ID
#[derive(Args)]
pub struct PlanIdArgs {
    /// ID of the plan
    pub id: String,
}

impl From<PlanIdArgs> for PlanId {
    fn from(val: PlanIdArgs) -> Self {
        PlanId { id: val.id }
    }
}

/// Execute a plan
#[derive(Args)]
pub struct ApplyArgs {
    /// ID of the plan to execute
    pub id: String,

    /// Abort on the first fault instead of recording it and continuing.
    /// Conflicting steps are skipped either way.
    #[arg(long)]
    pub fail_fast: bool,
}

impl From<ApplyArgs> for Apply {
    fn from(val: ApplyArgs) -> Self {
        Apply {
            plan_id: val.id,
            fail_fast: val.fail_fast,
        }
    }
}

/// Import a plan file
#[derive(Args)]
pub struct ImportPlanArgs {
    /// Path to the plan JSON file
    pub file: PathBuf,
}
