//! User directory use-case service.
//!
//! # Invariants
//! - Email is unique across users and format-checked on every write.

use crate::model::new_record_id;
use crate::model::user::User;
use crate::model::validation::{require_text, validate_email, ValidationError};
use crate::repo::user_repo::UserRepository;
use crate::repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for user use-cases.
#[derive(Debug)]
pub enum UserServiceError {
    Validation(ValidationError),
    EmailTaken(String),
    UserNotFound(String),
    Repo(RepoError),
}

impl Display for UserServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(ValidationError::MissingField(_)) => {
                write!(f, "Name and email are required")
            }
            Self::Validation(err) => write!(f, "{err}"),
            Self::EmailTaken(_) => write!(f, "Email already exists"),
            Self::UserNotFound(_) => write!(f, "User not found"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for UserServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for UserServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound { id, .. } => Self::UserNotFound(id),
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Repo(other),
        }
    }
}

impl From<ValidationError> for UserServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

/// User service facade over repository implementations.
pub struct UserService<R: UserRepository> {
    repo: R,
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn list_users(&self) -> Result<Vec<User>, UserServiceError> {
        Ok(self.repo.list_users()?)
    }

    pub fn get_user(&self, id: &str) -> Result<User, UserServiceError> {
        self.repo
            .get_user(id)?
            .ok_or_else(|| UserServiceError::UserNotFound(id.to_string()))
    }

    pub fn create_user(&self, name: &str, email: &str) -> Result<User, UserServiceError> {
        let user = User {
            id: new_record_id(),
            name: require_text("name", name)?,
            email: validate_email(email)?,
        };
        if self.repo.find_by_email(&user.email, None)?.is_some() {
            return Err(UserServiceError::EmailTaken(user.email));
        }
        self.repo.create_user(&user)?;
        log::info!("event=user_create module=service status=ok user_id={}", user.id);
        Ok(user)
    }

    pub fn update_user(&self, id: &str, name: &str, email: &str) -> Result<User, UserServiceError> {
        let user = User {
            id: id.to_string(),
            name: require_text("name", name)?,
            email: validate_email(email)?,
        };
        if self.repo.find_by_email(&user.email, Some(id))?.is_some() {
            return Err(UserServiceError::EmailTaken(user.email));
        }
        self.repo.update_user(&user)?;
        Ok(user)
    }

    pub fn delete_user(&self, id: &str) -> Result<(), UserServiceError> {
        self.repo.delete_user(id)?;
        Ok(())
    }
}
