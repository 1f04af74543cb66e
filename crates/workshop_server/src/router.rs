//! Router assembly.

use crate::handlers::{health, registrations, users, workshops};
use crate::middleware::log_requests;
use crate::state::AppState;
use axum::routing::{delete, get, post};
use axum::{middleware, Router};
use tower_http::cors::CorsLayer;

/// Builds the complete router.
///
/// # Routes
///
/// - `GET /health`
/// - `GET|POST /api/users`, `GET|PUT|DELETE /api/users/:id`
/// - `GET|POST /api/workshops`, `GET|PUT|DELETE /api/workshops/:id`
/// - `POST /api/registrations`
/// - `GET /api/registrations/:workshop_id`
/// - `GET /api/registrations/check/:workshop_id/:email`
/// - `DELETE /api/registrations/:workshop_id/:email`
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/users", get(users::list_users).post(users::create_user))
        .route(
            "/users/:id",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        .route(
            "/workshops",
            get(workshops::list_workshops).post(workshops::create_workshop),
        )
        .route(
            "/workshops/:id",
            get(workshops::get_workshop)
                .put(workshops::update_workshop)
                .delete(workshops::delete_workshop),
        )
        .route("/registrations", post(registrations::register))
        .route(
            "/registrations/:workshop_id",
            get(registrations::list_registrations),
        )
        .route(
            "/registrations/check/:workshop_id/:email",
            get(registrations::check_registration),
        )
        .route(
            "/registrations/:workshop_id/:email",
            delete(registrations::cancel_registration),
        );

    Router::new()
        .route("/health", get(health::health_check))
        .nest("/api", api_routes)
        .layer(middleware::from_fn(log_requests))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
