//! Registration repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist registration rows and answer the reads the registration engine
//!   needs (capacity, per-status counts, oldest waitlisted).
//! - Provide the write-transaction and savepoint scopes the engine runs its
//!   check-then-act sequences in.
//!
//! # Invariants
//! - `in_write_tx` starts `BEGIN IMMEDIATE`, so the database write lock is
//!   held from the first read of the scope until commit.
//! - Waitlist order is `registered_at ASC, rowid ASC`; rowid is monotonic
//!   relative to surviving rows, which makes insertion order the tie-break.

use crate::model::registration::{Registration, RegistrationStats, RegistrationStatus};
use crate::repo::{count_to_u32, RepoError, RepoResult};
use chrono::DateTime;
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};

const REGISTRATION_SELECT_SQL: &str = "SELECT
    id,
    workshop_id,
    name,
    email,
    status,
    registered_at
FROM registrations";

/// Repository interface used by the registration engine.
pub trait RegistrationRepository {
    /// Runs `f` inside one write transaction; commits on `Ok`, rolls back on
    /// `Err`.
    fn in_write_tx<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&Self) -> Result<T, E>,
        E: From<RepoError>;

    /// Runs `f` inside a savepoint of the current transaction. A failure
    /// rolls back only the savepoint's writes.
    fn in_savepoint<T, E, F>(&self, name: &'static str, f: F) -> Result<T, E>
    where
        F: FnOnce(&Self) -> Result<T, E>,
        E: From<RepoError>;

    /// Capacity of the workshop, `None` when it does not exist.
    fn workshop_capacity(&self, workshop_id: &str) -> RepoResult<Option<u32>>;
    fn find_registration(&self, workshop_id: &str, email: &str)
        -> RepoResult<Option<Registration>>;
    /// Lists registrations of one workshop in waitlist order.
    fn list_registrations(&self, workshop_id: &str) -> RepoResult<Vec<Registration>>;
    fn registration_stats(&self, workshop_id: &str) -> RepoResult<RegistrationStats>;
    fn insert_registration(&self, registration: &Registration) -> RepoResult<()>;
    fn delete_registration(&self, registration_id: &str) -> RepoResult<()>;
    /// Earliest waitlisted registration for the workshop, if any.
    fn oldest_waitlisted(&self, workshop_id: &str) -> RepoResult<Option<Registration>>;
    fn set_status(&self, registration_id: &str, status: RegistrationStatus) -> RepoResult<()>;
}

/// SQLite-backed registration repository.
pub struct SqliteRegistrationRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteRegistrationRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn query_optional(
        &self,
        sql: &str,
        params: impl rusqlite::Params,
    ) -> RepoResult<Option<Registration>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params)?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_registration_row(row)?)),
            None => Ok(None),
        }
    }
}

impl RegistrationRepository for SqliteRegistrationRepository<'_> {
    fn in_write_tx<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&Self) -> Result<T, E>,
        E: From<RepoError>,
    {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)
            .map_err(RepoError::from)?;
        let value = f(self)?;
        tx.commit().map_err(RepoError::from)?;
        Ok(value)
    }

    fn in_savepoint<T, E, F>(&self, name: &'static str, f: F) -> Result<T, E>
    where
        F: FnOnce(&Self) -> Result<T, E>,
        E: From<RepoError>,
    {
        self.conn
            .execute_batch(&format!("SAVEPOINT {name};"))
            .map_err(RepoError::from)?;
        match f(self) {
            Ok(value) => {
                self.conn
                    .execute_batch(&format!("RELEASE {name};"))
                    .map_err(RepoError::from)?;
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = self
                    .conn
                    .execute_batch(&format!("ROLLBACK TO {name}; RELEASE {name};"))
                {
                    log::error!(
                        "event=savepoint_rollback module=repo status=error savepoint={name} error={rollback_err}"
                    );
                }
                Err(err)
            }
        }
    }

    fn workshop_capacity(&self, workshop_id: &str) -> RepoResult<Option<u32>> {
        let capacity: Option<i64> = self
            .conn
            .query_row(
                "SELECT capacity FROM workshops WHERE id = ?1;",
                [workshop_id],
                |row| row.get(0),
            )
            .optional()?;

        capacity
            .map(|value| {
                u32::try_from(value).map_err(|_| {
                    RepoError::InvalidData(format!(
                        "invalid capacity `{value}` in workshops.capacity"
                    ))
                })
            })
            .transpose()
    }

    fn find_registration(
        &self,
        workshop_id: &str,
        email: &str,
    ) -> RepoResult<Option<Registration>> {
        self.query_optional(
            &format!("{REGISTRATION_SELECT_SQL} WHERE workshop_id = ?1 AND email = ?2;"),
            params![workshop_id, email],
        )
    }

    fn list_registrations(&self, workshop_id: &str) -> RepoResult<Vec<Registration>> {
        let mut stmt = self.conn.prepare(&format!(
            "{REGISTRATION_SELECT_SQL}
             WHERE workshop_id = ?1
             ORDER BY registered_at ASC, rowid ASC;"
        ))?;
        let mut rows = stmt.query([workshop_id])?;
        let mut registrations = Vec::new();
        while let Some(row) = rows.next()? {
            registrations.push(parse_registration_row(row)?);
        }
        Ok(registrations)
    }

    fn registration_stats(&self, workshop_id: &str) -> RepoResult<RegistrationStats> {
        let (enrolled, waitlist): (i64, i64) = self.conn.query_row(
            "SELECT
                COALESCE(SUM(status = 'enrolled'), 0),
                COALESCE(SUM(status = 'waitlist'), 0)
             FROM registrations
             WHERE workshop_id = ?1;",
            [workshop_id],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;

        Ok(RegistrationStats {
            enrolled: count_to_u32("enrolled", enrolled)?,
            waitlist: count_to_u32("waitlist", waitlist)?,
        })
    }

    fn insert_registration(&self, registration: &Registration) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO registrations (
                id,
                workshop_id,
                name,
                email,
                status,
                registered_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                registration.id,
                registration.workshop_id,
                registration.participant_name,
                registration.participant_email,
                registration.status.as_str(),
                registration.registered_at.timestamp_millis(),
            ],
        )?;
        Ok(())
    }

    fn delete_registration(&self, registration_id: &str) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM registrations WHERE id = ?1;", [registration_id])?;
        if changed == 0 {
            return Err(RepoError::not_found("registration", registration_id));
        }
        Ok(())
    }

    fn oldest_waitlisted(&self, workshop_id: &str) -> RepoResult<Option<Registration>> {
        self.query_optional(
            &format!(
                "{REGISTRATION_SELECT_SQL}
                 WHERE workshop_id = ?1 AND status = 'waitlist'
                 ORDER BY registered_at ASC, rowid ASC
                 LIMIT 1;"
            ),
            [workshop_id],
        )
    }

    fn set_status(&self, registration_id: &str, status: RegistrationStatus) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE registrations SET status = ?2 WHERE id = ?1;",
            params![registration_id, status.as_str()],
        )?;
        if changed == 0 {
            return Err(RepoError::not_found("registration", registration_id));
        }
        Ok(())
    }
}

fn parse_registration_row(row: &Row<'_>) -> RepoResult<Registration> {
    let status_text: String = row.get("status")?;
    let status = RegistrationStatus::parse(&status_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid status `{status_text}` in registrations.status"
        ))
    })?;

    let registered_ms: i64 = row.get("registered_at")?;
    let registered_at = DateTime::from_timestamp_millis(registered_ms).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid timestamp `{registered_ms}` in registrations.registered_at"
        ))
    })?;

    Ok(Registration {
        id: row.get("id")?,
        workshop_id: row.get("workshop_id")?,
        participant_name: row.get("name")?,
        participant_email: row.get("email")?,
        status,
        registered_at,
    })
}
