pub mod extract;
pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;
use crate::worries::handlers;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/worries",
            get(handlers::handle_list_worries).post(handlers::handle_create_worry),
        )
        .route("/api/worries/random", get(handlers::handle_draw_worry))
        .route("/api/worries/:id", get(handlers::handle_get_worry))
        .route("/api/worries/:id/cheers", get(handlers::handle_list_cheers))
        .route(
            "/api/worries/:id/report",
            post(handlers::handle_report_worry),
        )
        .route("/api/cheers", post(handlers::handle_create_cheer))
        .route("/api/stats", get(handlers::handle_stats))
        .route(
            "/api/moderation/check",
            post(handlers::handle_moderation_check),
        )
        .with_state(state)
}
