//! `objectives` command-line entry point.
//!
//! # Responsibility
//! - Resolve configuration from flags and environment.
//! - Dispatch tracker use cases and print results as JSON.

mod commands;
mod config;

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use config::Config;
use log::info;
use objectives_core::RecurrenceKind;
use std::path::PathBuf;

/// Track recurring objectives and their per-day completion.
#[derive(Parser)]
#[command(name = "objectives", version, about)]
struct Cli {
    /// SQLite database file.
    #[arg(long, env = "OBJECTIVES_DB", default_value = "objectives.sqlite3", global = true)]
    db: PathBuf,

    /// Tenant scope every operation runs under.
    #[arg(long, env = "OBJECTIVES_TENANT", global = true)]
    tenant: Option<String>,

    /// Log level (trace|debug|info|warn|error).
    #[arg(long, env = "OBJECTIVES_LOG_LEVEL", global = true)]
    log_level: Option<String>,

    /// Absolute directory for rolling log files; logging is off when unset.
    #[arg(long, env = "OBJECTIVES_LOG_DIR", global = true)]
    log_dir: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every objective.
    List,

    /// List objectives due on a date (today by default).
    Active {
        /// Calendar date, `YYYY-MM-DD`.
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Filter in memory instead of inside SQLite.
        #[arg(long)]
        in_memory: bool,
    },

    /// Show one objective.
    Get {
        id: String,
    },

    /// Create an objective.
    Create {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, value_enum, default_value_t = FrequencyArg::Always)]
        frequency: FrequencyArg,
        /// Weekday (1 = Sunday .. 7 = Saturday) or day of month; repeatable.
        #[arg(long = "day")]
        days: Vec<u8>,
    },

    /// Replace an objective with the JSON document in a file.
    Update {
        id: String,
        #[arg(long)]
        file: PathBuf,
    },

    /// Delete an objective and its history.
    Delete {
        id: String,
    },

    /// Mark an objective completed on a date (today by default).
    Complete {
        id: String,
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Mark an objective not completed on a date (today by default).
    Incomplete {
        id: String,
        #[arg(long)]
        date: Option<NaiveDate>,
    },
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Active { .. } => "active",
            Self::Get { .. } => "get",
            Self::Create { .. } => "create",
            Self::Update { .. } => "update",
            Self::Delete { .. } => "delete",
            Self::Complete { .. } => "complete",
            Self::Incomplete { .. } => "incomplete",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum FrequencyArg {
    Always,
    Weekly,
    Monthly,
}

impl From<FrequencyArg> for RecurrenceKind {
    fn from(value: FrequencyArg) -> Self {
        match value {
            FrequencyArg::Always => RecurrenceKind::Always,
            FrequencyArg::Weekly => RecurrenceKind::Weekly,
            FrequencyArg::Monthly => RecurrenceKind::Monthly,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::resolve(
        cli.db,
        cli.tenant.as_deref(),
        cli.log_level.as_deref(),
        cli.log_dir.as_deref(),
    )?;
    config.init_logging()?;
    info!(
        "event=cli_command module=cli status=start command={}",
        cli.command.name()
    );

    commands::run(&config, cli.command)
}
