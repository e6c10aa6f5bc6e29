pub mod middleware;
pub mod rest;
pub mod state;

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub use middleware::require_job_token;
pub use rest::{get_streak_handler, health_handler, recompute_all_handler, recompute_habit_handler};
use state::AppState;

/// Builds the HTTP router. Everything except `/health` sits behind the job token.
pub fn router(app_state: Arc<AppState>) -> Router {
    let public_routes = Router::new().route("/health", get(health_handler));

    let protected_routes = Router::new()
        .route("/habits/{habit_id}/streak", get(get_streak_handler))
        .route("/habits/{habit_id}/recompute", post(recompute_habit_handler))
        .route("/recompute", post(recompute_all_handler))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            require_job_token,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
