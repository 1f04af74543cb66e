//! HTTP API for the workshop registration core.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use config::ServerConfig;
pub use error::AppError;
pub use router::build_router;
pub use state::AppState;
