//! Registration domain model.
//!
//! # Responsibility
//! - Define the per-participant enrollment record and its two states.
//!
//! # Invariants
//! - At most one registration per `(workshop_id, participant_email)`.
//! - `status` changes only through the registration engine, and only
//!   `Waitlist -> Enrolled`.
//! - `registered_at` is set once at creation; promotion does not restamp it.

use crate::model::workshop::WorkshopId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque registration identifier.
pub type RegistrationId = String;

/// Whether a registration holds a seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationStatus {
    /// Counted against workshop capacity.
    Enrolled,
    /// Queued for promotion, oldest `registered_at` first.
    Waitlist,
}

impl RegistrationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Enrolled => "enrolled",
            Self::Waitlist => "waitlist",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "enrolled" => Some(Self::Enrolled),
            "waitlist" => Some(Self::Waitlist),
            _ => None,
        }
    }
}

/// Admission rule: a new registrant takes a seat only while seats remain.
pub fn admission_status(enrolled_count: u32, capacity: u32) -> RegistrationStatus {
    if enrolled_count < capacity {
        RegistrationStatus::Enrolled
    } else {
        RegistrationStatus::Waitlist
    }
}

/// One participant's registration for one workshop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub id: RegistrationId,
    pub workshop_id: WorkshopId,
    #[serde(rename = "name")]
    pub participant_name: String,
    /// Natural key within a workshop.
    #[serde(rename = "email")]
    pub participant_email: String,
    pub status: RegistrationStatus,
    pub registered_at: DateTime<Utc>,
}

impl Registration {
    pub fn is_enrolled(&self) -> bool {
        self.status == RegistrationStatus::Enrolled
    }
}

/// Per-workshop counts, always derived from registration rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RegistrationStats {
    pub enrolled: u32,
    pub waitlist: u32,
}
