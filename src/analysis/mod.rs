pub mod dto;
pub mod handlers;
pub mod metrics;
pub mod plan;
pub mod services;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::routes()
}
