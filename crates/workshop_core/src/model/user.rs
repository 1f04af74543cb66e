//! User directory record.
//!
//! Users are a lookup list for the client's "who am I" picker; registrations
//! carry their own denormalized name/email and do not reference this table.

use serde::{Deserialize, Serialize};

pub type UserId = String;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
}
