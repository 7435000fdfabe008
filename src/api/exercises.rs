//! Exercise library API endpoints.
//!
//! The list mixes the seeded built-in catalog with the user's custom
//! entries. Built-ins are read-only; only customs can be edited or
//! deleted through the API.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use std::sync::Arc;

use crate::db::{
    serialize_string_list, CreateExerciseRequest, Exercise, ExerciseResponse,
    UpdateExerciseRequest,
};
use crate::AppState;

use super::error::{ApiError, ValidationErrorBuilder};
use super::validation::{validate_duration, validate_name};
use super::{lookup_user_id, require_user_id, DeleteRequest, DeleteResponse, UserQuery};

#[derive(Debug, Serialize)]
pub struct ExerciseListResponse {
    pub exercises: Vec<ExerciseResponse>,
}

#[derive(Debug, Serialize)]
pub struct ExerciseEnvelope {
    pub exercise: ExerciseResponse,
}

/// List built-in catalog entries plus the user's custom exercises
pub async fn list_exercises(
    State(state): State<Arc<AppState>>,
    Query(query): Query<UserQuery>,
) -> Result<Json<ExerciseListResponse>, ApiError> {
    let Some(user_id) = lookup_user_id(&state.db, &query.user).await? else {
        return Ok(Json(ExerciseListResponse { exercises: vec![] }));
    };

    let exercises = sqlx::query_as::<_, Exercise>(
        "SELECT * FROM exercises WHERE user_id IS NULL OR user_id = ? ORDER BY is_custom, name",
    )
    .bind(user_id)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(ExerciseListResponse {
        exercises: exercises.into_iter().map(ExerciseResponse::from).collect(),
    }))
}

/// Create a custom exercise
pub async fn create_exercise(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateExerciseRequest>,
) -> Result<(StatusCode, Json<ExerciseEnvelope>), ApiError> {
    let mut errors = ValidationErrorBuilder::new();
    if let Err(e) = validate_name(&req.name) {
        errors.add("name", e);
    }
    if let Err(e) = validate_duration(req.estimated_duration) {
        errors.add("estimatedDuration", e);
    }
    errors.finish()?;

    let user_id = require_user_id(&state.db, &req.user_email).await?;

    let muscle_groups = serialize_string_list(&req.muscle_groups);
    let instructions = serialize_string_list(&req.instructions);
    let result = sqlx::query(
        r#"
        INSERT INTO exercises
        (user_id, name, category, muscle_groups, difficulty, equipment,
         description, instructions, estimated_duration, is_custom, image_url)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, 1, ?)
        "#,
    )
    .bind(user_id)
    .bind(&req.name)
    .bind(req.category.as_deref().unwrap_or("other"))
    .bind(&muscle_groups)
    .bind(req.difficulty.as_deref().unwrap_or("beginner"))
    .bind(&req.equipment)
    .bind(&req.description)
    .bind(&instructions)
    .bind(req.estimated_duration)
    .bind(&req.image_url)
    .execute(&state.db)
    .await?;

    let exercise = sqlx::query_as::<_, Exercise>("SELECT * FROM exercises WHERE id = ?")
        .bind(result.last_insert_rowid())
        .fetch_one(&state.db)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ExerciseEnvelope {
            exercise: ExerciseResponse::from(exercise),
        }),
    ))
}

/// Update a custom exercise
pub async fn update_exercise(
    State(state): State<Arc<AppState>>,
    Json(req): Json<UpdateExerciseRequest>,
) -> Result<Json<ExerciseResponse>, ApiError> {
    if let Some(ref name) = req.name {
        if let Err(e) = validate_name(name) {
            return Err(ApiError::validation_field("name", e));
        }
    }
    if let Err(e) = validate_duration(req.estimated_duration) {
        return Err(ApiError::validation_field("estimatedDuration", e));
    }

    let existing = sqlx::query_as::<_, Exercise>("SELECT * FROM exercises WHERE id = ?")
        .bind(req.id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| ApiError::not_found("Exercise not found"))?;

    if !existing.is_custom {
        return Err(ApiError::forbidden("Built-in exercises cannot be modified"));
    }

    let muscle_groups = req.muscle_groups.as_deref().map(serialize_string_list);
    let instructions = req.instructions.as_deref().map(serialize_string_list);

    sqlx::query(
        r#"
        UPDATE exercises SET
            name = COALESCE(?, name),
            category = COALESCE(?, category),
            muscle_groups = COALESCE(?, muscle_groups),
            difficulty = COALESCE(?, difficulty),
            equipment = COALESCE(?, equipment),
            description = COALESCE(?, description),
            instructions = COALESCE(?, instructions),
            estimated_duration = COALESCE(?, estimated_duration),
            image_url = COALESCE(?, image_url)
        WHERE id = ?
        "#,
    )
    .bind(&req.name)
    .bind(&req.category)
    .bind(&muscle_groups)
    .bind(&req.difficulty)
    .bind(&req.equipment)
    .bind(&req.description)
    .bind(&instructions)
    .bind(req.estimated_duration)
    .bind(&req.image_url)
    .bind(req.id)
    .execute(&state.db)
    .await?;

    let exercise = sqlx::query_as::<_, Exercise>("SELECT * FROM exercises WHERE id = ?")
        .bind(req.id)
        .fetch_one(&state.db)
        .await?;

    Ok(Json(ExerciseResponse::from(exercise)))
}

/// Delete a custom exercise. Workouts and templates referencing it keep
/// their rows; display falls back to the embedded name or the unknown
/// sentinel.
pub async fn delete_exercise(
    State(state): State<Arc<AppState>>,
    Json(req): Json<DeleteRequest>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let existing = sqlx::query_as::<_, Exercise>("SELECT * FROM exercises WHERE id = ?")
        .bind(req.id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| ApiError::not_found("Exercise not found"))?;

    if !existing.is_custom {
        return Err(ApiError::forbidden("Built-in exercises cannot be deleted"));
    }

    sqlx::query("DELETE FROM exercises WHERE id = ?")
        .bind(req.id)
        .execute(&state.db)
        .await?;

    Ok(Json(DeleteResponse { success: true }))
}
