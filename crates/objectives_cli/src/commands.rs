//! Subcommand handlers.
//!
//! Each handler opens the configured database, runs one service call under
//! the configured tenant and prints the result as pretty JSON.

use crate::config::Config;
use crate::Commands;
use anyhow::Context;
use chrono::{Local, NaiveDate};
use objectives_core::db::open_db;
use objectives_core::{
    NewObjective, Objective, ObjectiveId, ObjectiveService, RecurrenceRule,
    SqliteObjectiveRepository,
};
use serde::Serialize;

/// Runs `command` against the configured database.
pub(crate) fn run(config: &Config, command: Commands) -> anyhow::Result<()> {
    let conn = open_db(&config.db_path)
        .with_context(|| format!("failed to open `{}`", config.db_path.display()))?;
    let service = ObjectiveService::new(SqliteObjectiveRepository::try_new(&conn)?);
    let tenant = &config.tenant;

    match command {
        Commands::List => print_json(&service.list_objectives(tenant)?),
        Commands::Active { date, in_memory } => {
            let date = date.unwrap_or_else(today);
            let due = if in_memory {
                service.list_due_today(tenant, date)?
            } else {
                service.list_due_on(tenant, date)?
            };
            print_json(&due)
        }
        Commands::Get { id } => print_json(&service.get_objective(tenant, parse_id(&id)?)?),
        Commands::Create {
            name,
            description,
            frequency,
            days,
        } => {
            let recurrence = RecurrenceRule::new(frequency.into(), days)?;
            let created = service.create_objective(
                tenant,
                NewObjective {
                    name,
                    description,
                    recurrence,
                },
            )?;
            print_json(&created)
        }
        Commands::Update { id, file } => {
            let text = std::fs::read_to_string(&file)
                .with_context(|| format!("failed to read `{}`", file.display()))?;
            let payload: Objective = serde_json::from_str(&text)
                .with_context(|| format!("`{}` is not a valid objective", file.display()))?;
            print_json(&service.update_objective(tenant, parse_id(&id)?, payload)?)
        }
        Commands::Delete { id } => {
            let id = parse_id(&id)?;
            service.delete_objective(tenant, id)?;
            print_json(&serde_json::json!({ "deleted": id }))
        }
        Commands::Complete { id, date } => {
            let date = date.unwrap_or_else(today);
            print_json(&service.mark_completed(tenant, parse_id(&id)?, date)?)
        }
        Commands::Incomplete { id, date } => {
            let date = date.unwrap_or_else(today);
            print_json(&service.mark_incomplete(tenant, parse_id(&id)?, date)?)
        }
    }
}

/// Caller's local calendar date.
fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn parse_id(value: &str) -> anyhow::Result<ObjectiveId> {
    ObjectiveId::parse_str(value.trim()).with_context(|| format!("invalid objective id `{value}`"))
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
