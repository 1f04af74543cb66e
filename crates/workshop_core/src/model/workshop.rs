//! Workshop domain model.
//!
//! # Invariants
//! - `capacity` bounds the number of `enrolled` registrations.
//! - Enrollment counts are never stored on the workshop; they are derived
//!   from registration rows on read (`WorkshopWithStats`).

use crate::model::validation::{
    require_text, validate_capacity, validate_date_time, ValidationError,
};
use serde::{Deserialize, Serialize};

/// Opaque workshop identifier.
pub type WorkshopId = String;

/// Stored workshop record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workshop {
    pub id: WorkshopId,
    pub title: String,
    pub description: String,
    /// ISO-8601 schedule as entered by the organizer.
    #[serde(rename = "dateTime")]
    pub scheduled_at: String,
    pub capacity: u32,
    pub organizer_id: String,
    pub organizer_name: String,
}

/// Workshop plus enrollment counts computed from the registration store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkshopWithStats {
    #[serde(flatten)]
    pub workshop: Workshop,
    pub enrolled: u32,
    pub waitlist: u32,
}

impl WorkshopWithStats {
    /// Seats still open before new registrants land on the waitlist.
    pub fn seats_left(&self) -> u32 {
        self.workshop.capacity.saturating_sub(self.enrolled)
    }
}

/// Unvalidated organizer input for creating a workshop.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkshopDraft {
    pub title: String,
    pub description: String,
    pub scheduled_at: String,
    pub capacity: i64,
    pub organizer_id: String,
    pub organizer_name: String,
}

impl WorkshopDraft {
    /// Validates the draft and assigns a fresh identifier.
    pub fn into_workshop(self, id: WorkshopId) -> Result<Workshop, ValidationError> {
        Ok(Workshop {
            id,
            title: require_text("title", &self.title)?,
            description: self.description.trim().to_string(),
            scheduled_at: validate_date_time(&self.scheduled_at)?,
            capacity: validate_capacity(self.capacity)?,
            organizer_id: require_text("organizerId", &self.organizer_id)?,
            organizer_name: require_text("organizerName", &self.organizer_name)?,
        })
    }
}

/// Organizer edit: every editable field is replaced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkshopUpdate {
    pub title: String,
    pub description: String,
    pub scheduled_at: String,
    pub capacity: i64,
}

/// Validated form of [`WorkshopUpdate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkshopChanges {
    pub title: String,
    pub description: String,
    pub scheduled_at: String,
    pub capacity: u32,
}

impl WorkshopUpdate {
    pub fn validate(self) -> Result<WorkshopChanges, ValidationError> {
        Ok(WorkshopChanges {
            title: require_text("title", &self.title)?,
            description: require_text("description", &self.description)?,
            scheduled_at: validate_date_time(&self.scheduled_at)?,
            capacity: validate_capacity(self.capacity)?,
        })
    }
}
