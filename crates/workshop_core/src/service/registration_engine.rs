//! Registration engine: capacity-bounded enrollment with FIFO waitlist
//! promotion.
//!
//! # Responsibility
//! - Decide `enrolled` vs `waitlist` for new registrants.
//! - On cancellation of an enrolled registration, promote the oldest
//!   waitlisted registration of the same workshop.
//!
//! # Invariants
//! - The enrolled count of a workshop never exceeds its capacity through
//!   this engine: check and insert run in one `BEGIN IMMEDIATE` scope.
//! - Each qualifying cancellation promotes at most one registration, once,
//!   and only while the enrolled count is below the current capacity.
//! - Cancelling a waitlisted registration never changes other rows.
//! - Promotion keeps the promoted row's original `registered_at`.
//! - A failed promotion is logged and rolled back to its savepoint; the
//!   cancellation itself still commits.

use crate::model::new_record_id;
use crate::model::registration::{
    admission_status, Registration, RegistrationStats, RegistrationStatus,
};
use crate::model::validation::{require_text, validate_email, ValidationError};
use crate::repo::registration_repo::RegistrationRepository;
use crate::repo::RepoError;
use chrono::{DateTime, Utc};
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};

const PROMOTION_SAVEPOINT: &str = "waitlist_promotion";

/// Failure of a registration use-case.
#[derive(Debug)]
pub enum RegistrationError {
    /// Missing or malformed input.
    Validation(ValidationError),
    /// The participant already holds a registration for this workshop.
    DuplicateRegistration { workshop_id: String, email: String },
    /// Target workshop does not exist.
    WorkshopNotFound(String),
    /// No registration for this `(workshop, email)` pair.
    RegistrationNotFound { workshop_id: String, email: String },
    /// Persistence-layer failure.
    Store(RepoError),
}

impl Display for RegistrationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::DuplicateRegistration { .. } => {
                write!(f, "already registered for this workshop")
            }
            Self::WorkshopNotFound(_) => write!(f, "Workshop not found"),
            Self::RegistrationNotFound { .. } => write!(f, "Registration not found"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RegistrationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for RegistrationError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Store(other),
        }
    }
}

impl From<ValidationError> for RegistrationError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Result of a successful cancellation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CancelOutcome {
    /// The registration as it was before removal.
    pub cancelled: Registration,
    /// The registration moved from waitlist to enrolled, if any.
    pub promoted: Option<Registration>,
}

impl CancelOutcome {
    pub fn promoted(&self) -> bool {
        self.promoted.is_some()
    }
}

/// Lookup result for `check_registration`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationCheck {
    pub registration: Option<Registration>,
}

impl RegistrationCheck {
    pub fn is_registered(&self) -> bool {
        self.registration.is_some()
    }
}

/// Registration engine over a registration repository.
pub struct RegistrationEngine<R: RegistrationRepository> {
    repo: R,
}

impl<R: RegistrationRepository> RegistrationEngine<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Registers a participant and assigns `enrolled` or `waitlist`.
    ///
    /// # Errors
    /// - `Validation` when name or email is missing, or email is malformed.
    /// - `DuplicateRegistration` when the email is already registered here;
    ///   checked before workshop existence, nothing is written.
    /// - `WorkshopNotFound` when the workshop does not exist.
    pub fn register(
        &self,
        workshop_id: &str,
        participant_name: &str,
        participant_email: &str,
    ) -> Result<Registration, RegistrationError> {
        let workshop_id = require_text("workshopId", workshop_id)?;
        let name = require_text("name", participant_name)?;
        let email = validate_email(participant_email)?;

        let registration = self.repo.in_write_tx(|repo| {
            if repo.find_registration(&workshop_id, &email)?.is_some() {
                return Err(RegistrationError::DuplicateRegistration {
                    workshop_id: workshop_id.clone(),
                    email: email.clone(),
                });
            }

            let capacity = repo
                .workshop_capacity(&workshop_id)?
                .ok_or_else(|| RegistrationError::WorkshopNotFound(workshop_id.clone()))?;
            let stats = repo.registration_stats(&workshop_id)?;

            let registration = Registration {
                id: new_record_id(),
                workshop_id: workshop_id.clone(),
                participant_name: name,
                participant_email: email.clone(),
                status: admission_status(stats.enrolled, capacity),
                registered_at: registration_timestamp(),
            };
            repo.insert_registration(&registration)?;
            Ok(registration)
        })?;

        info!(
            "event=registration_create module=engine status=ok workshop_id={} registration_id={} registration_status={}",
            registration.workshop_id,
            registration.id,
            registration.status.as_str()
        );
        Ok(registration)
    }

    /// Cancels a registration and promotes the oldest waitlisted registration
    /// when the cancelled one held a seat and a seat is open under the
    /// workshop's current capacity.
    ///
    /// # Errors
    /// - `RegistrationNotFound` when no registration matches; nothing changes.
    /// - `Store` when the cancellation itself cannot be persisted. Promotion
    ///   failures are not reported here.
    pub fn cancel(
        &self,
        workshop_id: &str,
        participant_email: &str,
    ) -> Result<CancelOutcome, RegistrationError> {
        let workshop_id = workshop_id.trim();
        let email = participant_email.trim();

        let outcome = self.repo.in_write_tx(|repo| {
            let cancelled = repo.find_registration(workshop_id, email)?.ok_or_else(|| {
                RegistrationError::RegistrationNotFound {
                    workshop_id: workshop_id.to_string(),
                    email: email.to_string(),
                }
            })?;
            repo.delete_registration(&cancelled.id)?;

            let promoted = if cancelled.is_enrolled() {
                match repo.in_savepoint(PROMOTION_SAVEPOINT, |repo| {
                    promote_oldest_waitlisted(repo, workshop_id)
                }) {
                    Ok(promoted) => promoted,
                    Err(err) => {
                        error!(
                            "event=waitlist_promote module=engine status=error workshop_id={workshop_id} error={err}"
                        );
                        None
                    }
                }
            } else {
                None
            };

            Ok::<_, RegistrationError>(CancelOutcome {
                cancelled,
                promoted,
            })
        })?;

        info!(
            "event=registration_cancel module=engine status=ok workshop_id={} registration_id={} was_enrolled={} promoted={}",
            workshop_id,
            outcome.cancelled.id,
            outcome.cancelled.is_enrolled(),
            outcome.promoted()
        );
        if let Some(promoted) = &outcome.promoted {
            info!(
                "event=waitlist_promote module=engine status=ok workshop_id={workshop_id} registration_id={}",
                promoted.id
            );
        }
        Ok(outcome)
    }

    /// Returns whether `(workshop_id, email)` is registered, with the record.
    pub fn check_registration(
        &self,
        workshop_id: &str,
        participant_email: &str,
    ) -> Result<RegistrationCheck, RegistrationError> {
        let registration = self
            .repo
            .find_registration(workshop_id.trim(), participant_email.trim())?;
        Ok(RegistrationCheck { registration })
    }

    /// Lists one workshop's registrations, oldest first.
    pub fn list_registrations(
        &self,
        workshop_id: &str,
    ) -> Result<Vec<Registration>, RegistrationError> {
        Ok(self.repo.list_registrations(workshop_id.trim())?)
    }

    /// Enrolled/waitlist counts derived from the registration rows.
    pub fn stats(&self, workshop_id: &str) -> Result<RegistrationStats, RegistrationError> {
        Ok(self.repo.registration_stats(workshop_id.trim())?)
    }
}

/// Promotes the head of the waitlist if the freed seat is really open.
/// After a capacity decrease the enrolled count may still be at or above
/// capacity, in which case the waitlist stays untouched.
fn promote_oldest_waitlisted<R: RegistrationRepository>(
    repo: &R,
    workshop_id: &str,
) -> Result<Option<Registration>, RepoError> {
    let Some(capacity) = repo.workshop_capacity(workshop_id)? else {
        return Ok(None);
    };
    let stats = repo.registration_stats(workshop_id)?;
    if admission_status(stats.enrolled, capacity) != RegistrationStatus::Enrolled {
        return Ok(None);
    }
    let Some(mut next) = repo.oldest_waitlisted(workshop_id)? else {
        return Ok(None);
    };
    repo.set_status(&next.id, RegistrationStatus::Enrolled)?;
    next.status = RegistrationStatus::Enrolled;
    Ok(Some(next))
}

/// Current time at the millisecond precision used by storage.
fn registration_timestamp() -> DateTime<Utc> {
    let now = Utc::now();
    DateTime::from_timestamp_millis(now.timestamp_millis()).unwrap_or(now)
}
