//! Workshop use-case service.
//!
//! # Responsibility
//! - Validate organizer input before persistence.
//! - Expose workshop reads with derived enrollment counts.
//!
//! # Invariants
//! - Lowering capacity never demotes enrolled registrations; the engine only
//!   promotes on cancellation.

use crate::model::new_record_id;
use crate::model::validation::ValidationError;
use crate::model::workshop::{Workshop, WorkshopDraft, WorkshopUpdate, WorkshopWithStats};
use crate::repo::workshop_repo::WorkshopRepository;
use crate::repo::RepoError;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for workshop use-cases.
#[derive(Debug)]
pub enum WorkshopServiceError {
    Validation(ValidationError),
    WorkshopNotFound(String),
    Repo(RepoError),
}

impl Display for WorkshopServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::WorkshopNotFound(_) => write!(f, "Workshop not found"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for WorkshopServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::WorkshopNotFound(_) => None,
        }
    }
}

impl From<RepoError> for WorkshopServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound { id, .. } => Self::WorkshopNotFound(id),
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Repo(other),
        }
    }
}

impl From<ValidationError> for WorkshopServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Workshop service facade over repository implementations.
pub struct WorkshopService<R: WorkshopRepository> {
    repo: R,
}

impl<R: WorkshopRepository> WorkshopService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Lists all workshops with current counts.
    pub fn list_workshops(&self) -> Result<Vec<WorkshopWithStats>, WorkshopServiceError> {
        Ok(self.repo.list_workshops()?)
    }

    /// Gets one workshop with current counts.
    pub fn get_workshop(&self, id: &str) -> Result<WorkshopWithStats, WorkshopServiceError> {
        self.repo
            .get_workshop(id)?
            .ok_or_else(|| WorkshopServiceError::WorkshopNotFound(id.to_string()))
    }

    /// Creates a workshop from organizer input.
    pub fn create_workshop(&self, draft: WorkshopDraft) -> Result<Workshop, WorkshopServiceError> {
        let workshop = draft.into_workshop(new_record_id())?;
        self.repo.create_workshop(&workshop)?;
        info!(
            "event=workshop_create module=service status=ok workshop_id={} capacity={}",
            workshop.id, workshop.capacity
        );
        Ok(workshop)
    }

    /// Replaces title, description, schedule and capacity.
    pub fn update_workshop(
        &self,
        id: &str,
        update: WorkshopUpdate,
    ) -> Result<WorkshopWithStats, WorkshopServiceError> {
        let changes = update.validate()?;
        self.repo.update_workshop(id, &changes)?;
        self.get_workshop(id)
    }

    /// Deletes a workshop together with its registrations.
    pub fn delete_workshop(&self, id: &str) -> Result<(), WorkshopServiceError> {
        self.repo.delete_workshop(id)?;
        Ok(())
    }
}
