//! Core domain logic for the workshop registration service.
//! This crate is the single source of truth for enrollment invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{
    default_log_level, init_console_logging, init_logging, logging_status, LogTarget,
};
pub use model::registration::{
    admission_status, Registration, RegistrationId, RegistrationStats, RegistrationStatus,
};
pub use model::user::{User, UserId};
pub use model::validation::ValidationError;
pub use model::workshop::{
    Workshop, WorkshopChanges, WorkshopDraft, WorkshopId, WorkshopUpdate, WorkshopWithStats,
};
pub use repo::registration_repo::{RegistrationRepository, SqliteRegistrationRepository};
pub use repo::user_repo::{SqliteUserRepository, UserRepository};
pub use repo::workshop_repo::{SqliteWorkshopRepository, WorkshopRepository};
pub use repo::{RepoError, RepoResult};
pub use service::registration_engine::{
    CancelOutcome, RegistrationCheck, RegistrationEngine, RegistrationError,
};
pub use service::user_service::{UserService, UserServiceError};
pub use service::workshop_service::{WorkshopService, WorkshopServiceError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
