//! Workout template API endpoints.
//!
//! Template writes validate every referenced exercise id against the
//! catalog and reject with a 400 naming the missing ids.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use std::sync::Arc;

use crate::db::{
    serialize_exercise_refs, CreateTemplateRequest, Template, TemplateResponse,
    UpdateTemplateRequest,
};
use crate::AppState;

use super::error::ApiError;
use super::validation::{ensure_exercise_refs_exist, validate_name};
use super::{lookup_user_id, require_user_id, DeleteRequest, DeleteResponse, UserQuery};

#[derive(Debug, Serialize)]
pub struct TemplateListResponse {
    pub templates: Vec<TemplateResponse>,
}

#[derive(Debug, Serialize)]
pub struct TemplateEnvelope {
    pub template: TemplateResponse,
}

/// List all templates for a user
pub async fn list_templates(
    State(state): State<Arc<AppState>>,
    Query(query): Query<UserQuery>,
) -> Result<Json<TemplateListResponse>, ApiError> {
    let Some(user_id) = lookup_user_id(&state.db, &query.user).await? else {
        return Ok(Json(TemplateListResponse { templates: vec![] }));
    };

    let templates = sqlx::query_as::<_, Template>(
        "SELECT * FROM templates WHERE user_id = ? ORDER BY created_at DESC, id DESC",
    )
    .bind(user_id)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(TemplateListResponse {
        templates: templates.into_iter().map(TemplateResponse::from).collect(),
    }))
}

/// Create a new template
pub async fn create_template(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateTemplateRequest>,
) -> Result<(StatusCode, Json<TemplateEnvelope>), ApiError> {
    if let Err(e) = validate_name(&req.name) {
        return Err(ApiError::validation_field("name", e));
    }

    let user_id = require_user_id(&state.db, &req.user_email).await?;
    ensure_exercise_refs_exist(&state.db, &req.exercises).await?;

    let exercises = serialize_exercise_refs(&req.exercises);
    let result = sqlx::query(
        "INSERT INTO templates (user_id, name, category, exercises) VALUES (?, ?, ?, ?)",
    )
    .bind(user_id)
    .bind(&req.name)
    .bind(&req.category)
    .bind(&exercises)
    .execute(&state.db)
    .await?;

    let template = sqlx::query_as::<_, Template>("SELECT * FROM templates WHERE id = ?")
        .bind(result.last_insert_rowid())
        .fetch_one(&state.db)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(TemplateEnvelope {
            template: TemplateResponse::from(template),
        }),
    ))
}

/// Update a template
pub async fn update_template(
    State(state): State<Arc<AppState>>,
    Json(req): Json<UpdateTemplateRequest>,
) -> Result<Json<TemplateResponse>, ApiError> {
    if let Some(ref name) = req.name {
        if let Err(e) = validate_name(name) {
            return Err(ApiError::validation_field("name", e));
        }
    }

    let _existing = sqlx::query_as::<_, Template>("SELECT * FROM templates WHERE id = ?")
        .bind(req.id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| ApiError::not_found("Template not found"))?;

    if let Some(ref exercises) = req.exercises {
        ensure_exercise_refs_exist(&state.db, exercises).await?;
    }
    let exercises = req.exercises.as_deref().map(serialize_exercise_refs);

    sqlx::query(
        r#"
        UPDATE templates SET
            name = COALESCE(?, name),
            category = COALESCE(?, category),
            exercises = COALESCE(?, exercises)
        WHERE id = ?
        "#,
    )
    .bind(&req.name)
    .bind(&req.category)
    .bind(&exercises)
    .bind(req.id)
    .execute(&state.db)
    .await?;

    let template = sqlx::query_as::<_, Template>("SELECT * FROM templates WHERE id = ?")
        .bind(req.id)
        .fetch_one(&state.db)
        .await?;

    Ok(Json(TemplateResponse::from(template)))
}

/// Delete a template. Workouts instantiated from it are unaffected since
/// instantiation copies the exercise list.
pub async fn delete_template(
    State(state): State<Arc<AppState>>,
    Json(req): Json<DeleteRequest>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let result = sqlx::query("DELETE FROM templates WHERE id = ?")
        .bind(req.id)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::not_found("Template not found"));
    }

    Ok(Json(DeleteResponse { success: true }))
}
