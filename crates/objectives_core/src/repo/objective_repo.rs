//! Objective repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide tenant-scoped fetch/insert/replace/delete over objective storage.
//! - Evaluate the due-today predicate inside SQLite when asked.
//!
//! # Invariants
//! - Every statement binds the tenant key; a record is invisible to any other
//!   tenant.
//! - Write paths call `Objective::validate()` before SQL mutations and run in
//!   one transaction.
//! - Read paths reject invalid persisted state instead of masking it.
//! - Missing rows surface as `RepoError::NotFound`, never as empty success.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::completion::{CompletionEntry, CompletionLog};
use crate::model::objective::{Objective, ObjectiveId};
use crate::model::recurrence::{RecurrenceKind, RecurrenceRule};
use crate::model::tenant::TenantKey;
use crate::model::validation::ValidationError;
use crate::query::due::DueProbe;
use chrono::NaiveDate;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row, Transaction};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const OBJECTIVE_SELECT_SQL: &str = "SELECT
    id,
    tenant_key,
    name,
    description,
    frequency_type
FROM objectives";

const OBJECTIVE_ORDER_SQL: &str = " ORDER BY name COLLATE NOCASE ASC, id ASC";

const DATE_FORMAT: &str = "%Y-%m-%d";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for objective persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(ValidationError),
    Db(DbError),
    /// No objective with this id exists for the requested tenant.
    NotFound(ObjectiveId),
    /// An objective with this id already exists.
    Conflict(ObjectiveId),
    /// Replacement record id differs from the target id.
    IdentityMismatch {
        target: ObjectiveId,
        payload: ObjectiveId,
    },
    /// Replacement record belongs to a different tenant than the target.
    TenantMismatch(ObjectiveId),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "objective not found: {id}"),
            Self::Conflict(id) => write!(f, "objective already exists: {id}"),
            Self::IdentityMismatch { target, payload } => {
                write!(f, "id mismatch: target {target}, payload {payload}")
            }
            Self::TenantMismatch(id) => {
                write!(f, "objective {id} does not belong to the requested tenant")
            }
            Self::InvalidData(message) => write!(f, "invalid persisted objective data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Storage collaborator for objectives, partitioned by tenant.
pub trait ObjectiveRepository {
    fn fetch_by_id(&self, tenant: &TenantKey, id: ObjectiveId) -> RepoResult<Objective>;
    /// All objectives of `tenant`, ordered by name then id.
    fn fetch_all(&self, tenant: &TenantKey) -> RepoResult<Vec<Objective>>;
    /// Objectives of `tenant` due on `date`, filtered by the storage engine.
    fn fetch_due_on(&self, tenant: &TenantKey, date: NaiveDate) -> RepoResult<Vec<Objective>>;
    fn insert(&self, objective: &Objective) -> RepoResult<ObjectiveId>;
    fn replace_by_id(
        &self,
        tenant: &TenantKey,
        id: ObjectiveId,
        objective: &Objective,
    ) -> RepoResult<()>;
    fn delete_by_id(&self, tenant: &TenantKey, id: ObjectiveId) -> RepoResult<()>;
}

/// SQLite-backed objective repository.
pub struct SqliteObjectiveRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteObjectiveRepository<'conn> {
    /// Wraps a connection produced by `db::open_db` / `db::open_db_in_memory`.
    ///
    /// # Errors
    /// - `InvalidData` when the connection schema is not at the latest
    ///   migration version.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        let version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
        let latest = latest_version();
        if version != latest {
            return Err(RepoError::InvalidData(format!(
                "connection schema version {version} does not match expected {latest}"
            )));
        }
        Ok(Self { conn })
    }

    fn query_objectives(&self, sql: &str, bind_values: Vec<Value>) -> RepoResult<Vec<Objective>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut headers = Vec::new();
        while let Some(row) = rows.next()? {
            headers.push(parse_objective_row(row)?);
        }

        headers
            .into_iter()
            .map(|header| self.hydrate(header))
            .collect()
    }

    fn hydrate(&self, header: ObjectiveRow) -> RepoResult<Objective> {
        let id_text = header.id.to_string();
        let days = load_days(self.conn, &id_text)?;
        let recurrence = RecurrenceRule::new(header.kind, days).map_err(|err| {
            RepoError::InvalidData(format!("objective {}: {err}", header.id))
        })?;
        let completion_log = load_completion_log(self.conn, &id_text)?;

        let objective = Objective::with_id(
            header.id,
            header.tenant_key,
            header.name,
            header.description,
            recurrence,
            completion_log,
        )?;
        objective.validate()?;
        Ok(objective)
    }
}

impl ObjectiveRepository for SqliteObjectiveRepository<'_> {
    fn fetch_by_id(&self, tenant: &TenantKey, id: ObjectiveId) -> RepoResult<Objective> {
        let sql = format!("{OBJECTIVE_SELECT_SQL} WHERE id = ? AND tenant_key = ?;");
        let bind_values = vec![
            Value::Text(id.to_string()),
            Value::Text(tenant.as_str().to_string()),
        ];
        self.query_objectives(&sql, bind_values)?
            .pop()
            .ok_or(RepoError::NotFound(id))
    }

    fn fetch_all(&self, tenant: &TenantKey) -> RepoResult<Vec<Objective>> {
        let sql = format!("{OBJECTIVE_SELECT_SQL} WHERE tenant_key = ?{OBJECTIVE_ORDER_SQL};");
        self.query_objectives(&sql, vec![Value::Text(tenant.as_str().to_string())])
    }

    fn fetch_due_on(&self, tenant: &TenantKey, date: NaiveDate) -> RepoResult<Vec<Objective>> {
        let filter = DueProbe::for_date(date).sql_filter();
        let sql = format!(
            "{OBJECTIVE_SELECT_SQL} WHERE tenant_key = ? AND {}{OBJECTIVE_ORDER_SQL};",
            filter.clause
        );
        let mut bind_values = vec![Value::Text(tenant.as_str().to_string())];
        bind_values.extend(filter.params);
        self.query_objectives(&sql, bind_values)
    }

    fn insert(&self, objective: &Objective) -> RepoResult<ObjectiveId> {
        objective.validate()?;

        let tx = self.conn.unchecked_transaction()?;
        let inserted = tx.execute(
            "INSERT INTO objectives (
                id,
                tenant_key,
                name,
                description,
                frequency_type
            ) VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                objective.id().to_string(),
                objective.tenant_key().as_str(),
                objective.name.as_str(),
                objective.description.as_str(),
                objective.recurrence.kind().code(),
            ],
        );
        if let Err(err) = inserted {
            let err = DbError::from(err);
            if err.is_unique_violation() {
                return Err(RepoError::Conflict(objective.id()));
            }
            return Err(err.into());
        }

        write_children(&tx, objective)?;
        tx.commit()?;
        Ok(objective.id())
    }

    fn replace_by_id(
        &self,
        tenant: &TenantKey,
        id: ObjectiveId,
        objective: &Objective,
    ) -> RepoResult<()> {
        objective.validate()?;
        if objective.id() != id {
            return Err(RepoError::IdentityMismatch {
                target: id,
                payload: objective.id(),
            });
        }
        if objective.tenant_key() != tenant {
            return Err(RepoError::TenantMismatch(id));
        }

        let tx = self.conn.unchecked_transaction()?;
        let changed = tx.execute(
            "UPDATE objectives
             SET
                name = ?1,
                description = ?2,
                frequency_type = ?3,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?4
               AND tenant_key = ?5;",
            params![
                objective.name.as_str(),
                objective.description.as_str(),
                objective.recurrence.kind().code(),
                id.to_string(),
                tenant.as_str(),
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        let id_text = id.to_string();
        tx.execute(
            "DELETE FROM objective_days WHERE objective_id = ?1;",
            [id_text.as_str()],
        )?;
        tx.execute(
            "DELETE FROM completion_history WHERE objective_id = ?1;",
            [id_text.as_str()],
        )?;
        write_children(&tx, objective)?;
        tx.commit()?;
        Ok(())
    }

    fn delete_by_id(&self, tenant: &TenantKey, id: ObjectiveId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM objectives WHERE id = ?1 AND tenant_key = ?2;",
            params![id.to_string(), tenant.as_str()],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }
}

struct ObjectiveRow {
    id: ObjectiveId,
    tenant_key: TenantKey,
    name: String,
    description: String,
    kind: RecurrenceKind,
}

fn parse_objective_row(row: &Row<'_>) -> RepoResult<ObjectiveRow> {
    let id_text: String = row.get("id")?;
    let id = Uuid::parse_str(&id_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{id_text}` in objectives.id"))
    })?;

    let tenant_text: String = row.get("tenant_key")?;
    let tenant_key = TenantKey::new(tenant_text).map_err(|err| {
        RepoError::InvalidData(format!("objective {id}: objectives.tenant_key: {err}"))
    })?;

    let type_code: i64 = row.get("frequency_type")?;
    let kind = u8::try_from(type_code)
        .ok()
        .and_then(RecurrenceKind::from_code)
        .ok_or_else(|| {
            RepoError::InvalidData(format!(
                "invalid frequency type `{type_code}` in objectives.frequency_type"
            ))
        })?;

    Ok(ObjectiveRow {
        id,
        tenant_key,
        name: row.get("name")?,
        description: row.get("description")?,
        kind,
    })
}

fn load_days(conn: &Connection, objective_id: &str) -> RepoResult<Vec<u8>> {
    let mut stmt = conn.prepare(
        "SELECT day
         FROM objective_days
         WHERE objective_id = ?1
         ORDER BY day ASC;",
    )?;
    let mut rows = stmt.query([objective_id])?;
    let mut days = Vec::new();
    while let Some(row) = rows.next()? {
        let value: i64 = row.get(0)?;
        let day = u8::try_from(value).map_err(|_| {
            RepoError::InvalidData(format!("invalid day `{value}` in objective_days.day"))
        })?;
        days.push(day);
    }
    Ok(days)
}

fn load_completion_log(conn: &Connection, objective_id: &str) -> RepoResult<CompletionLog> {
    let mut stmt = conn.prepare(
        "SELECT date, completed
         FROM completion_history
         WHERE objective_id = ?1
         ORDER BY date ASC;",
    )?;
    let mut rows = stmt.query([objective_id])?;
    let mut entries = Vec::new();
    while let Some(row) = rows.next()? {
        let date_text: String = row.get("date")?;
        let date = NaiveDate::parse_from_str(&date_text, DATE_FORMAT).map_err(|_| {
            RepoError::InvalidData(format!(
                "invalid date `{date_text}` in completion_history.date"
            ))
        })?;
        let completed = match row.get::<_, i64>("completed")? {
            0 => false,
            1 => true,
            other => {
                return Err(RepoError::InvalidData(format!(
                    "invalid completed value `{other}` in completion_history.completed"
                )));
            }
        };
        entries.push(CompletionEntry { date, completed });
    }

    CompletionLog::from_entries(entries)
        .map_err(|err| RepoError::InvalidData(format!("objective {objective_id}: {err}")))
}

fn write_children(tx: &Transaction<'_>, objective: &Objective) -> RepoResult<()> {
    let id_text = objective.id().to_string();

    let mut day_stmt =
        tx.prepare("INSERT INTO objective_days (objective_id, day) VALUES (?1, ?2);")?;
    for day in objective.recurrence.days() {
        day_stmt.execute(params![id_text.as_str(), day])?;
    }

    let mut history_stmt = tx.prepare(
        "INSERT INTO completion_history (objective_id, date, completed) VALUES (?1, ?2, ?3);",
    )?;
    for entry in objective.completion_entries() {
        history_stmt.execute(params![
            id_text.as_str(),
            entry.date.format(DATE_FORMAT).to_string(),
            bool_to_int(entry.completed),
        ])?;
    }

    Ok(())
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
