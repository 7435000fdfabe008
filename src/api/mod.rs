pub mod auth;
mod error;
mod exercises;
mod stats;
mod templates;
mod uploads;
mod validation;
mod workout_logs;
mod workouts;

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::db::DbPool;
use crate::AppState;

use error::ApiError;

/// Query parameter addressing a user's rows: `?user=<email>`
#[derive(Debug, Deserialize)]
pub struct UserQuery {
    pub user: String,
}

/// Body accepted by every DELETE endpoint
#[derive(Debug, Deserialize)]
pub struct DeleteRequest {
    pub id: i64,
}

/// Envelope returned by every DELETE endpoint
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
}

/// Resolve an email to a user id. `None` for unknown emails, so list
/// endpoints can answer with an empty array instead of an error.
pub(crate) async fn lookup_user_id(db: &DbPool, email: &str) -> Result<Option<i64>, ApiError> {
    let row: Option<(i64,)> = sqlx::query_as("SELECT id FROM users WHERE email = ?")
        .bind(email)
        .fetch_optional(db)
        .await?;
    Ok(row.map(|(id,)| id))
}

/// Resolve an email to a user id for a write, rejecting unknown users.
pub(crate) async fn require_user_id(db: &DbPool, email: &str) -> Result<i64, ApiError> {
    lookup_user_id(db, email)
        .await?
        .ok_or_else(|| ApiError::validation_field("userEmail", "Unknown user"))
}

pub fn create_router(state: Arc<AppState>) -> Router {
    // Auth routes (public)
    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/validate", get(auth::validate));

    // Protected API routes
    let api_routes = Router::new()
        // Workouts
        .route("/workouts", get(workouts::list_workouts))
        .route("/workouts", post(workouts::create_workout))
        .route("/workouts", put(workouts::update_workout))
        .route("/workouts", delete(workouts::delete_workout))
        // Templates
        .route("/templates", get(templates::list_templates))
        .route("/templates", post(templates::create_template))
        .route("/templates", put(templates::update_template))
        .route("/templates", delete(templates::delete_template))
        // Exercise library
        .route("/exercises", get(exercises::list_exercises))
        .route("/exercises", post(exercises::create_exercise))
        .route("/exercises", put(exercises::update_exercise))
        .route("/exercises", delete(exercises::delete_exercise))
        // Workout logs
        .route("/workout-logs", get(workout_logs::list_workout_logs))
        .route("/workout-logs", post(workout_logs::create_workout_log))
        .route("/workout-logs", put(workout_logs::update_workout_log))
        .route("/workout-logs", delete(workout_logs::delete_workout_log))
        // Progress dashboard
        .route("/stats", get(stats::get_stats))
        // File uploads
        .route("/upload", post(uploads::upload_file))
        // Protected by auth
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/auth", auth_routes)
        .nest("/api", api_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
