//! Workout API endpoints.
//!
//! Rows are addressed per user by the `?user=<email>` query parameter;
//! an unknown email yields an empty list rather than an error so a fresh
//! client renders an empty calendar.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use std::sync::Arc;

use crate::db::{
    serialize_exercise_refs, CreateWorkoutRequest, UpdateWorkoutRequest, Workout, WorkoutResponse,
};
use crate::AppState;

use super::error::{ApiError, ValidationErrorBuilder};
use super::validation::{ensure_exercise_refs_exist, validate_date, validate_duration, validate_name};
use super::{lookup_user_id, require_user_id, DeleteRequest, DeleteResponse, UserQuery};

#[derive(Debug, Serialize)]
pub struct WorkoutListResponse {
    pub workouts: Vec<WorkoutResponse>,
}

#[derive(Debug, Serialize)]
pub struct WorkoutEnvelope {
    pub workout: WorkoutResponse,
}

fn validate_create_request(req: &CreateWorkoutRequest) -> Result<(), ApiError> {
    let mut errors = ValidationErrorBuilder::new();

    if let Err(e) = validate_name(&req.name) {
        errors.add("name", e);
    }
    if let Err(e) = validate_date(&req.date) {
        errors.add("date", e);
    }
    if let Err(e) = validate_duration(req.duration) {
        errors.add("duration", e);
    }

    errors.finish()
}

fn validate_update_request(req: &UpdateWorkoutRequest) -> Result<(), ApiError> {
    let mut errors = ValidationErrorBuilder::new();

    if let Some(ref name) = req.name {
        if let Err(e) = validate_name(name) {
            errors.add("name", e);
        }
    }
    if let Some(ref date) = req.date {
        if let Err(e) = validate_date(date) {
            errors.add("date", e);
        }
    }
    if let Err(e) = validate_duration(req.duration) {
        errors.add("duration", e);
    }

    errors.finish()
}

/// List all workouts for a user, newest first
pub async fn list_workouts(
    State(state): State<Arc<AppState>>,
    Query(query): Query<UserQuery>,
) -> Result<Json<WorkoutListResponse>, ApiError> {
    let Some(user_id) = lookup_user_id(&state.db, &query.user).await? else {
        return Ok(Json(WorkoutListResponse { workouts: vec![] }));
    };

    let workouts = sqlx::query_as::<_, Workout>(
        "SELECT * FROM workouts WHERE user_id = ? ORDER BY date DESC, id DESC",
    )
    .bind(user_id)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(WorkoutListResponse {
        workouts: workouts.into_iter().map(WorkoutResponse::from).collect(),
    }))
}

/// Schedule a new workout
pub async fn create_workout(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateWorkoutRequest>,
) -> Result<(StatusCode, Json<WorkoutEnvelope>), ApiError> {
    validate_create_request(&req)?;

    let user_id = require_user_id(&state.db, &req.user_email).await?;
    ensure_exercise_refs_exist(&state.db, &req.exercises).await?;

    let exercises = serialize_exercise_refs(&req.exercises);
    let result = sqlx::query(
        r#"
        INSERT INTO workouts (user_id, date, name, exercises, completed, duration, notes)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(user_id)
    .bind(&req.date)
    .bind(&req.name)
    .bind(&exercises)
    .bind(req.completed)
    .bind(req.duration)
    .bind(&req.notes)
    .execute(&state.db)
    .await?;

    let workout = sqlx::query_as::<_, Workout>("SELECT * FROM workouts WHERE id = ?")
        .bind(result.last_insert_rowid())
        .fetch_one(&state.db)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(WorkoutEnvelope {
            workout: WorkoutResponse::from(workout),
        }),
    ))
}

/// Update a workout. Logging a completion is an update that sets
/// `completed` and records `duration`.
pub async fn update_workout(
    State(state): State<Arc<AppState>>,
    Json(req): Json<UpdateWorkoutRequest>,
) -> Result<Json<WorkoutResponse>, ApiError> {
    validate_update_request(&req)?;

    let _existing = sqlx::query_as::<_, Workout>("SELECT * FROM workouts WHERE id = ?")
        .bind(req.id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| ApiError::not_found("Workout not found"))?;

    if let Some(ref exercises) = req.exercises {
        ensure_exercise_refs_exist(&state.db, exercises).await?;
    }
    let exercises = req.exercises.as_deref().map(serialize_exercise_refs);

    sqlx::query(
        r#"
        UPDATE workouts SET
            date = COALESCE(?, date),
            name = COALESCE(?, name),
            exercises = COALESCE(?, exercises),
            completed = COALESCE(?, completed),
            duration = COALESCE(?, duration),
            notes = COALESCE(?, notes)
        WHERE id = ?
        "#,
    )
    .bind(&req.date)
    .bind(&req.name)
    .bind(&exercises)
    .bind(req.completed)
    .bind(req.duration)
    .bind(&req.notes)
    .bind(req.id)
    .execute(&state.db)
    .await?;

    let workout = sqlx::query_as::<_, Workout>("SELECT * FROM workouts WHERE id = ?")
        .bind(req.id)
        .fetch_one(&state.db)
        .await?;

    Ok(Json(WorkoutResponse::from(workout)))
}

/// Delete a workout. Logs referencing it are left alone.
pub async fn delete_workout(
    State(state): State<Arc<AppState>>,
    Json(req): Json<DeleteRequest>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let result = sqlx::query("DELETE FROM workouts WHERE id = ?")
        .bind(req.id)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::not_found("Workout not found"));
    }

    Ok(Json(DeleteResponse { success: true }))
}
