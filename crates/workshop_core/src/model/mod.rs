//! Domain model for workshops, registrations and users.
//!
//! # Responsibility
//! - Define canonical records shared by repositories, services and the API.
//! - Own input validation rules (presence and email format checks).
//!
//! # Invariants
//! - Registration status is one of `enrolled | waitlist`.
//! - Identifiers are opaque strings; generated ones are UUID v4 text.

pub mod registration;
pub mod user;
pub mod validation;
pub mod workshop;

/// Generates a fresh opaque record identifier.
pub fn new_record_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
