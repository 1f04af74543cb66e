//! User repository contracts and SQLite implementation.

use crate::model::user::User;
use crate::repo::{RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row};

/// Repository interface for the user directory.
pub trait UserRepository {
    /// Lists users sorted by name.
    fn list_users(&self) -> RepoResult<Vec<User>>;
    fn get_user(&self, id: &str) -> RepoResult<Option<User>>;
    /// Finds a user owning `email`, ignoring `except_id` when provided.
    fn find_by_email(&self, email: &str, except_id: Option<&str>) -> RepoResult<Option<User>>;
    fn create_user(&self, user: &User) -> RepoResult<()>;
    fn update_user(&self, user: &User) -> RepoResult<()>;
    fn delete_user(&self, id: &str) -> RepoResult<()>;
}

/// SQLite-backed user repository.
pub struct SqliteUserRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteUserRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl UserRepository for SqliteUserRepository<'_> {
    fn list_users(&self) -> RepoResult<Vec<User>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, email FROM users ORDER BY name ASC, id ASC;")?;
        let users = stmt
            .query_map([], parse_user_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(users)
    }

    fn get_user(&self, id: &str) -> RepoResult<Option<User>> {
        let user = self
            .conn
            .query_row(
                "SELECT id, name, email FROM users WHERE id = ?1;",
                [id],
                parse_user_row,
            )
            .optional()?;
        Ok(user)
    }

    fn find_by_email(&self, email: &str, except_id: Option<&str>) -> RepoResult<Option<User>> {
        let user = self
            .conn
            .query_row(
                "SELECT id, name, email FROM users
                 WHERE email = ?1 AND (?2 IS NULL OR id != ?2);",
                params![email, except_id],
                parse_user_row,
            )
            .optional()?;
        Ok(user)
    }

    fn create_user(&self, user: &User) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO users (id, name, email) VALUES (?1, ?2, ?3);",
            params![user.id, user.name, user.email],
        )?;
        Ok(())
    }

    fn update_user(&self, user: &User) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE users SET name = ?2, email = ?3 WHERE id = ?1;",
            params![user.id, user.name, user.email],
        )?;
        if changed == 0 {
            return Err(RepoError::not_found("user", user.id.as_str()));
        }
        Ok(())
    }

    fn delete_user(&self, id: &str) -> RepoResult<()> {
        let changed = self.conn.execute("DELETE FROM users WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::not_found("user", id));
        }
        Ok(())
    }
}

fn parse_user_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get("id")?,
        name: row.get("name")?,
        email: row.get("email")?,
    })
}
