//! User directory endpoints.

use super::{success, ApiResponse, DeletedResponse};
use crate::error::AppError;
use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use workshop_core::{SqliteUserRepository, User, UserService};

/// Body of `POST /api/users` and `PUT /api/users/:id`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UserRequest {
    pub name: String,
    pub email: String,
}

pub async fn list_users(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<User>>>, AppError> {
    let users = state
        .with_conn(|conn| Ok(UserService::new(SqliteUserRepository::new(conn)).list_users()?))
        .await?;
    Ok(success(users))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<User>>, AppError> {
    let user = state
        .with_conn(move |conn| {
            Ok(UserService::new(SqliteUserRepository::new(conn)).get_user(&id)?)
        })
        .await?;
    Ok(success(user))
}

pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<UserRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<User>>, AppError> {
    let Json(request) = payload?;
    let user = state
        .with_conn(move |conn| {
            let service = UserService::new(SqliteUserRepository::new(conn));
            Ok(service.create_user(&request.name, &request.email)?)
        })
        .await?;
    Ok(success(user))
}

pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UserRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<User>>, AppError> {
    let Json(request) = payload?;
    let user = state
        .with_conn(move |conn| {
            let service = UserService::new(SqliteUserRepository::new(conn));
            Ok(service.update_user(&id, &request.name, &request.email)?)
        })
        .await?;
    Ok(success(user))
}

pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<DeletedResponse>>, AppError> {
    let deleted = state
        .with_conn(move |conn| {
            UserService::new(SqliteUserRepository::new(conn)).delete_user(&id)?;
            Ok(DeletedResponse { id })
        })
        .await?;
    Ok(success(deleted))
}
