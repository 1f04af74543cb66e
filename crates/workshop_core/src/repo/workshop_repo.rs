//! Workshop repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist organizer-owned workshop records.
//! - Serve workshop reads joined with derived enrollment counts.
//!
//! # Invariants
//! - `enrolled`/`waitlist` counts are computed per query from
//!   `registrations`, never cached.
//! - Deleting a workshop removes its registrations in the same transaction.

use crate::model::workshop::{Workshop, WorkshopChanges, WorkshopWithStats};
use crate::repo::{count_to_u32, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};

const WORKSHOP_STATS_SELECT_SQL: &str = "SELECT
    w.id,
    w.title,
    w.description,
    w.date_time,
    w.capacity,
    w.organizer_id,
    w.organizer_name,
    (SELECT COUNT(*) FROM registrations r
        WHERE r.workshop_id = w.id AND r.status = 'enrolled') AS enrolled,
    (SELECT COUNT(*) FROM registrations r
        WHERE r.workshop_id = w.id AND r.status = 'waitlist') AS waitlist
FROM workshops w";

/// Repository interface for workshop CRUD and stats reads.
pub trait WorkshopRepository {
    fn create_workshop(&self, workshop: &Workshop) -> RepoResult<()>;
    /// Replaces all editable fields; `NotFound` when the id is unknown.
    fn update_workshop(&self, id: &str, changes: &WorkshopChanges) -> RepoResult<()>;
    fn get_workshop(&self, id: &str) -> RepoResult<Option<WorkshopWithStats>>;
    /// Lists every workshop ordered by schedule, then id.
    fn list_workshops(&self) -> RepoResult<Vec<WorkshopWithStats>>;
    /// Deletes the workshop and all of its registrations atomically.
    fn delete_workshop(&self, id: &str) -> RepoResult<()>;
}

/// SQLite-backed workshop repository.
pub struct SqliteWorkshopRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteWorkshopRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl WorkshopRepository for SqliteWorkshopRepository<'_> {
    fn create_workshop(&self, workshop: &Workshop) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO workshops (
                id,
                title,
                description,
                date_time,
                capacity,
                organizer_id,
                organizer_name
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                workshop.id,
                workshop.title,
                workshop.description,
                workshop.scheduled_at,
                workshop.capacity,
                workshop.organizer_id,
                workshop.organizer_name,
            ],
        )?;
        Ok(())
    }

    fn update_workshop(&self, id: &str, changes: &WorkshopChanges) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE workshops
             SET
                title = ?2,
                description = ?3,
                date_time = ?4,
                capacity = ?5
             WHERE id = ?1;",
            params![
                id,
                changes.title,
                changes.description,
                changes.scheduled_at,
                changes.capacity,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::not_found("workshop", id));
        }
        Ok(())
    }

    fn get_workshop(&self, id: &str) -> RepoResult<Option<WorkshopWithStats>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{WORKSHOP_STATS_SELECT_SQL} WHERE w.id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_workshop_row(row)?)),
            None => Ok(None),
        }
    }

    fn list_workshops(&self) -> RepoResult<Vec<WorkshopWithStats>> {
        let mut stmt = self.conn.prepare(&format!(
            "{WORKSHOP_STATS_SELECT_SQL} ORDER BY w.date_time ASC, w.id ASC;"
        ))?;
        let mut rows = stmt.query([])?;
        let mut workshops = Vec::new();
        while let Some(row) = rows.next()? {
            workshops.push(parse_workshop_row(row)?);
        }
        Ok(workshops)
    }

    fn delete_workshop(&self, id: &str) -> RepoResult<()> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let exists = tx
            .query_row("SELECT 1 FROM workshops WHERE id = ?1;", [id], |_| Ok(()))
            .optional()?
            .is_some();
        if !exists {
            return Err(RepoError::not_found("workshop", id));
        }

        // Connections opened without `foreign_keys=ON` skip the FK cascade.
        let removed = tx.execute("DELETE FROM registrations WHERE workshop_id = ?1;", [id])?;
        tx.execute("DELETE FROM workshops WHERE id = ?1;", [id])?;
        tx.commit()?;

        log::info!(
            "event=workshop_delete module=repo status=ok workshop_id={id} registrations_removed={removed}"
        );
        Ok(())
    }
}

fn parse_workshop_row(row: &Row<'_>) -> RepoResult<WorkshopWithStats> {
    let capacity: i64 = row.get("capacity")?;
    let capacity = u32::try_from(capacity).map_err(|_| {
        RepoError::InvalidData(format!("invalid capacity `{capacity}` in workshops.capacity"))
    })?;

    Ok(WorkshopWithStats {
        workshop: Workshop {
            id: row.get("id")?,
            title: row.get("title")?,
            description: row.get("description")?,
            scheduled_at: row.get("date_time")?,
            capacity,
            organizer_id: row.get("organizer_id")?,
            organizer_name: row.get("organizer_name")?,
        },
        enrolled: count_to_u32("enrolled", row.get("enrolled")?)?,
        waitlist: count_to_u32("waitlist", row.get("waitlist")?)?,
    })
}
