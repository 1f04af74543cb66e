//! Registration endpoints: the HTTP face of the registration engine.

use super::{success, ApiResponse};
use crate::error::AppError;
use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use workshop_core::{Registration, RegistrationEngine, SqliteRegistrationRepository};

/// `POST /api/registrations` body.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegisterRequest {
    pub workshop_id: String,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckResponse {
    pub is_registered: bool,
    pub registration: Option<Registration>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelResponse {
    pub workshop_id: String,
    pub email: String,
    pub promoted: bool,
}

/// `GET /api/registrations/:workshop_id`
pub async fn list_registrations(
    State(state): State<AppState>,
    Path(workshop_id): Path<String>,
) -> Result<Json<ApiResponse<Vec<Registration>>>, AppError> {
    let registrations = state
        .with_conn(move |conn| {
            let engine = RegistrationEngine::new(SqliteRegistrationRepository::new(conn));
            Ok(engine.list_registrations(&workshop_id)?)
        })
        .await?;
    Ok(success(registrations))
}

/// `GET /api/registrations/check/:workshop_id/:email`
pub async fn check_registration(
    State(state): State<AppState>,
    Path((workshop_id, email)): Path<(String, String)>,
) -> Result<Json<ApiResponse<CheckResponse>>, AppError> {
    let check = state
        .with_conn(move |conn| {
            let engine = RegistrationEngine::new(SqliteRegistrationRepository::new(conn));
            Ok(engine.check_registration(&workshop_id, &email)?)
        })
        .await?;
    Ok(success(CheckResponse {
        is_registered: check.is_registered(),
        registration: check.registration,
    }))
}

/// `POST /api/registrations`
///
/// Responds with the created registration; `status` tells the client
/// whether it got a seat (`enrolled`) or joined the `waitlist`.
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<Registration>>, AppError> {
    let Json(request) = payload?;
    let registration = state
        .with_conn(move |conn| {
            let engine = RegistrationEngine::new(SqliteRegistrationRepository::new(conn));
            Ok(engine.register(&request.workshop_id, &request.name, &request.email)?)
        })
        .await?;
    Ok(success(registration))
}

/// `DELETE /api/registrations/:workshop_id/:email`
pub async fn cancel_registration(
    State(state): State<AppState>,
    Path((workshop_id, email)): Path<(String, String)>,
) -> Result<Json<ApiResponse<CancelResponse>>, AppError> {
    let outcome = {
        let workshop_id = workshop_id.clone();
        let email = email.clone();
        state
            .with_conn(move |conn| {
                let engine = RegistrationEngine::new(SqliteRegistrationRepository::new(conn));
                Ok(engine.cancel(&workshop_id, &email)?)
            })
            .await?
    };
    Ok(success(CancelResponse {
        workshop_id,
        email,
        promoted: outcome.promoted(),
    }))
}
