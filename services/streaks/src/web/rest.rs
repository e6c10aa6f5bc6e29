//! services/streaks/src/web/rest.rs
//!
//! Contains the Axum handlers for the job trigger endpoints and the master
//! definition for the OpenAPI specification.

use crate::service::RecomputeSummary;
use crate::web::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use chrono::{DateTime, Utc};
use habit_streaks_core::domain::Habit;
use habit_streaks_core::ports::PortError;
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info};
use utoipa::{OpenApi, ToSchema};
use uuid::Uuid;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        health_handler,
        get_streak_handler,
        recompute_habit_handler,
        recompute_all_handler,
    ),
    components(
        schemas(HabitStreakResponse, RecomputeSummary)
    ),
    tags(
        (name = "Habit Streaks API", description = "Trigger and inspect streak recomputation.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Response Structs
//=========================================================================================

/// The derived streak fields of one habit.
#[derive(Debug, Serialize, ToSchema)]
pub struct HabitStreakResponse {
    pub habit_id: Uuid,
    pub name: String,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub last_entry_at: Option<DateTime<Utc>>,
}

impl From<Habit> for HabitStreakResponse {
    fn from(habit: Habit) -> Self {
        Self {
            habit_id: habit.id,
            name: habit.name,
            current_streak: habit.current_streak,
            longest_streak: habit.longest_streak,
            last_entry_at: habit.last_entry_at,
        }
    }
}

fn port_error_response(context: &str, e: PortError) -> (StatusCode, String) {
    match e {
        PortError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
        other => {
            error!("{}: {:?}", context, other);
            (StatusCode::INTERNAL_SERVER_ERROR, context.to_string())
        }
    }
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// Liveness probe.
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up", body = String))
)]
pub async fn health_handler() -> &'static str {
    "ok"
}

/// Returns the stored streak fields of a habit without recomputing them.
#[utoipa::path(
    get,
    path = "/habits/{habit_id}/streak",
    responses(
        (status = 200, description = "Stored streak fields", body = HabitStreakResponse),
        (status = 401, description = "Missing or wrong job token"),
        (status = 404, description = "Habit not found"),
        (status = 500, description = "Internal server error")
    ),
    params(("habit_id" = Uuid, Path, description = "The habit to inspect."))
)]
pub async fn get_streak_handler(
    State(app_state): State<Arc<AppState>>,
    Path(habit_id): Path<Uuid>,
) -> Result<Json<HabitStreakResponse>, (StatusCode, String)> {
    let habit = app_state
        .service
        .store()
        .get_habit(habit_id)
        .await
        .map_err(|e| port_error_response("Failed to load habit", e))?;
    Ok(Json(habit.into()))
}

/// Recomputes one habit's streaks as of now and returns the stored result.
#[utoipa::path(
    post,
    path = "/habits/{habit_id}/recompute",
    responses(
        (status = 200, description = "Streaks recomputed", body = HabitStreakResponse),
        (status = 401, description = "Missing or wrong job token"),
        (status = 404, description = "Habit not found"),
        (status = 500, description = "Internal server error")
    ),
    params(("habit_id" = Uuid, Path, description = "The habit to recompute."))
)]
pub async fn recompute_habit_handler(
    State(app_state): State<Arc<AppState>>,
    Path(habit_id): Path<Uuid>,
) -> Result<Json<HabitStreakResponse>, (StatusCode, String)> {
    let habit = app_state
        .service
        .recompute_habit(habit_id, Utc::now())
        .await
        .map_err(|e| port_error_response("Failed to recompute habit", e))?;
    info!("Recomputed streaks for habit {} on request", habit_id);
    Ok(Json(habit.into()))
}

/// Recomputes every habit's streaks as of now.
#[utoipa::path(
    post,
    path = "/recompute",
    responses(
        (status = 200, description = "Run finished", body = RecomputeSummary),
        (status = 401, description = "Missing or wrong job token"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn recompute_all_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<RecomputeSummary>, (StatusCode, String)> {
    let summary = app_state
        .service
        .recompute_all(Utc::now())
        .await
        .map_err(|e| port_error_response("Failed to recompute habits", e))?;
    Ok(Json(summary))
}
