//! Workout log API endpoints.
//!
//! Logs are written once when a workout is completed. The PUT endpoint is
//! kept for API clients even though the web UI never edits a log.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use std::sync::Arc;

use crate::db::{
    serialize_logged_exercises, CreateWorkoutLogRequest, UpdateWorkoutLogRequest, WorkoutLog,
    WorkoutLogResponse,
};
use crate::AppState;

use super::error::{ApiError, ValidationErrorBuilder};
use super::validation::{validate_duration, validate_effort};
use super::{lookup_user_id, require_user_id, DeleteRequest, DeleteResponse, UserQuery};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutLogListResponse {
    pub workout_logs: Vec<WorkoutLogResponse>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutLogEnvelope {
    pub workout_log: WorkoutLogResponse,
}

/// List all logs for a user, most recent completion first
pub async fn list_workout_logs(
    State(state): State<Arc<AppState>>,
    Query(query): Query<UserQuery>,
) -> Result<Json<WorkoutLogListResponse>, ApiError> {
    let Some(user_id) = lookup_user_id(&state.db, &query.user).await? else {
        return Ok(Json(WorkoutLogListResponse { workout_logs: vec![] }));
    };

    let logs = sqlx::query_as::<_, WorkoutLog>(
        "SELECT * FROM workout_logs WHERE user_id = ? ORDER BY completed_at DESC, id DESC",
    )
    .bind(user_id)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(WorkoutLogListResponse {
        workout_logs: logs.into_iter().map(WorkoutLogResponse::from).collect(),
    }))
}

/// Record a completed workout
pub async fn create_workout_log(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateWorkoutLogRequest>,
) -> Result<(StatusCode, Json<WorkoutLogEnvelope>), ApiError> {
    let mut errors = ValidationErrorBuilder::new();
    if let Err(e) = validate_effort(req.overall_effort) {
        errors.add("overallEffort", e);
    }
    if let Err(e) = validate_duration(req.duration) {
        errors.add("duration", e);
    }
    for exercise in &req.exercises {
        if let Err(e) = validate_effort(exercise.effort) {
            errors.add("exercises", e);
            break;
        }
    }
    errors.finish()?;

    let user_id = require_user_id(&state.db, &req.user_email).await?;

    let completed_at = req
        .completed_at
        .clone()
        .unwrap_or_else(|| chrono::Utc::now().to_rfc3339());
    let exercises = serialize_logged_exercises(&req.exercises);

    let result = sqlx::query(
        r#"
        INSERT INTO workout_logs
        (user_id, workout_id, completed_at, duration, exercises, notes, overall_effort)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(user_id)
    .bind(req.workout_id)
    .bind(&completed_at)
    .bind(req.duration)
    .bind(&exercises)
    .bind(&req.notes)
    .bind(req.overall_effort)
    .execute(&state.db)
    .await?;

    let log = sqlx::query_as::<_, WorkoutLog>("SELECT * FROM workout_logs WHERE id = ?")
        .bind(result.last_insert_rowid())
        .fetch_one(&state.db)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(WorkoutLogEnvelope {
            workout_log: WorkoutLogResponse::from(log),
        }),
    ))
}

/// Update a log
pub async fn update_workout_log(
    State(state): State<Arc<AppState>>,
    Json(req): Json<UpdateWorkoutLogRequest>,
) -> Result<Json<WorkoutLogResponse>, ApiError> {
    let mut errors = ValidationErrorBuilder::new();
    if let Err(e) = validate_effort(req.overall_effort) {
        errors.add("overallEffort", e);
    }
    if let Err(e) = validate_duration(req.duration) {
        errors.add("duration", e);
    }
    errors.finish()?;

    let _existing = sqlx::query_as::<_, WorkoutLog>("SELECT * FROM workout_logs WHERE id = ?")
        .bind(req.id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| ApiError::not_found("Workout log not found"))?;

    let exercises = req.exercises.as_deref().map(serialize_logged_exercises);

    sqlx::query(
        r#"
        UPDATE workout_logs SET
            completed_at = COALESCE(?, completed_at),
            duration = COALESCE(?, duration),
            exercises = COALESCE(?, exercises),
            notes = COALESCE(?, notes),
            overall_effort = COALESCE(?, overall_effort)
        WHERE id = ?
        "#,
    )
    .bind(&req.completed_at)
    .bind(req.duration)
    .bind(&exercises)
    .bind(&req.notes)
    .bind(req.overall_effort)
    .bind(req.id)
    .execute(&state.db)
    .await?;

    let log = sqlx::query_as::<_, WorkoutLog>("SELECT * FROM workout_logs WHERE id = ?")
        .bind(req.id)
        .fetch_one(&state.db)
        .await?;

    Ok(Json(WorkoutLogResponse::from(log)))
}

/// Delete a log
pub async fn delete_workout_log(
    State(state): State<Arc<AppState>>,
    Json(req): Json<DeleteRequest>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let result = sqlx::query("DELETE FROM workout_logs WHERE id = ?")
        .bind(req.id)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::not_found("Workout log not found"));
    }

    Ok(Json(DeleteResponse { success: true }))
}
