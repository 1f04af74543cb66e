//! Workshop endpoints.

use super::{success, ApiResponse, DeletedResponse};
use crate::error::AppError;
use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use workshop_core::{
    SqliteWorkshopRepository, ValidationError, Workshop, WorkshopDraft, WorkshopService,
    WorkshopUpdate, WorkshopWithStats,
};

/// `POST /api/workshops` body.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateWorkshopRequest {
    pub title: String,
    pub description: String,
    pub date_time: String,
    pub capacity: Option<i64>,
    pub organizer_id: String,
    pub organizer_name: String,
}

/// `PUT /api/workshops/:id` body.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateWorkshopRequest {
    pub title: String,
    pub description: String,
    pub date_time: String,
    pub capacity: Option<i64>,
}

fn required_capacity(capacity: Option<i64>) -> Result<i64, AppError> {
    capacity.ok_or_else(|| {
        AppError::bad_request(ValidationError::MissingField("capacity").to_string())
    })
}

/// `GET /api/workshops`
pub async fn list_workshops(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<WorkshopWithStats>>>, AppError> {
    let workshops = state
        .with_conn(|conn| {
            let service = WorkshopService::new(SqliteWorkshopRepository::new(conn));
            Ok(service.list_workshops()?)
        })
        .await?;
    Ok(success(workshops))
}

/// `GET /api/workshops/:id`
pub async fn get_workshop(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<WorkshopWithStats>>, AppError> {
    let workshop = state
        .with_conn(move |conn| {
            let service = WorkshopService::new(SqliteWorkshopRepository::new(conn));
            Ok(service.get_workshop(&id)?)
        })
        .await?;
    Ok(success(workshop))
}

/// `POST /api/workshops`
pub async fn create_workshop(
    State(state): State<AppState>,
    payload: Result<Json<CreateWorkshopRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<Workshop>>, AppError> {
    let Json(request) = payload?;
    let draft = WorkshopDraft {
        title: request.title,
        description: request.description,
        scheduled_at: request.date_time,
        capacity: required_capacity(request.capacity)?,
        organizer_id: request.organizer_id,
        organizer_name: request.organizer_name,
    };
    let workshop = state
        .with_conn(move |conn| {
            let service = WorkshopService::new(SqliteWorkshopRepository::new(conn));
            Ok(service.create_workshop(draft)?)
        })
        .await?;
    Ok(success(workshop))
}

/// `PUT /api/workshops/:id`
pub async fn update_workshop(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateWorkshopRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<WorkshopWithStats>>, AppError> {
    let Json(request) = payload?;
    let update = WorkshopUpdate {
        title: request.title,
        description: request.description,
        scheduled_at: request.date_time,
        capacity: required_capacity(request.capacity)?,
    };
    let workshop = state
        .with_conn(move |conn| {
            let service = WorkshopService::new(SqliteWorkshopRepository::new(conn));
            Ok(service.update_workshop(&id, update)?)
        })
        .await?;
    Ok(success(workshop))
}

/// `DELETE /api/workshops/:id`; registrations go with it.
pub async fn delete_workshop(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<DeletedResponse>>, AppError> {
    let deleted = state
        .with_conn(move |conn| {
            let service = WorkshopService::new(SqliteWorkshopRepository::new(conn));
            service.delete_workshop(&id)?;
            Ok(DeletedResponse { id })
        })
        .await?;
    Ok(success(deleted))
}
