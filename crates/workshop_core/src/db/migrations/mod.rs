//! Schema migrations for the workshop store.
//!
//! Steps are embedded SQL files applied in version order inside one
//! transaction; the schema version lives in `PRAGMA user_version`.

use crate::db::{DbError, DbResult};
use log::debug;
use rusqlite::{Connection, Transaction};

struct MigrationStep {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const STEPS: &[MigrationStep] = &[MigrationStep {
    version: 1,
    name: "users_workshops_registrations",
    sql: include_str!("0001_init.sql"),
}];

/// Schema versions observed while bringing a connection up to date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaUpgrade {
    pub from: u32,
    pub to: u32,
}

impl SchemaUpgrade {
    pub fn applied_any(&self) -> bool {
        self.from != self.to
    }
}

/// Highest schema version this build can create.
pub fn latest_version() -> u32 {
    STEPS.last().map_or(0, |step| step.version)
}

/// Upgrades the schema to [`latest_version`].
///
/// # Errors
/// - `UnsupportedSchemaVersion` when the file was written by a newer build.
/// - `MigrationFailed` naming the step whose SQL was rejected; nothing from
///   this call is committed in that case.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<SchemaUpgrade> {
    let from = schema_version(conn)?;
    let latest = latest_version();
    if from > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: from,
            latest_supported: latest,
        });
    }

    let tx = conn.transaction()?;
    for step in STEPS.iter().filter(|step| step.version > from) {
        run_step(&tx, step)?;
    }
    tx.commit()?;

    Ok(SchemaUpgrade { from, to: latest })
}

fn run_step(tx: &Transaction<'_>, step: &MigrationStep) -> DbResult<()> {
    debug!(
        "event=db_migrate module=db status=apply version={} name={}",
        step.version, step.name
    );
    tx.execute_batch(step.sql)
        .and_then(|()| tx.pragma_update(None, "user_version", step.version))
        .map_err(|source| DbError::MigrationFailed {
            version: step.version,
            name: step.name,
            source,
        })
}

fn schema_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get(0))?)
}
