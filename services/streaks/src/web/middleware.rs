//! services/streaks/src/web/middleware.rs
//!
//! Shared-secret middleware for the job trigger routes.

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::warn;

use crate::web::state::AppState;

pub const JOB_TOKEN_HEADER: &str = "x-job-token";

/// Rejects requests whose `x-job-token` header does not match the configured token.
///
/// When no token is configured every request is let through.
pub async fn require_job_token(
    State(state): State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let Some(expected) = state.config.job_token.as_deref() else {
        return Ok(next.run(req).await);
    };

    let provided = req
        .headers()
        .get(JOB_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok());

    if provided != Some(expected) {
        warn!("Rejected request to {} with a missing or wrong job token", req.uri().path());
        return Err(StatusCode::UNAUTHORIZED);
    }

    Ok(next.run(req).await)
}
