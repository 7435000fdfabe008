//! Progress dashboard endpoint.
//!
//! Fetches the user's rows and hands them to the pure aggregation in
//! [`crate::stats`] with the server's local calendar day as "today".

use axum::{
    extract::{Query, State},
    Json,
};
use std::sync::Arc;

use crate::db::{Exercise, Workout, WorkoutLog};
use crate::stats::{progress_stats, ProgressStats};
use crate::AppState;

use super::error::ApiError;
use super::{lookup_user_id, UserQuery};

/// Compute the dashboard aggregate for a user. An unknown email produces
/// the empty-input stats rather than an error.
pub async fn get_stats(
    State(state): State<Arc<AppState>>,
    Query(query): Query<UserQuery>,
) -> Result<Json<ProgressStats>, ApiError> {
    let today = chrono::Local::now().date_naive();

    let Some(user_id) = lookup_user_id(&state.db, &query.user).await? else {
        return Ok(Json(progress_stats(&[], &[], &[], today)));
    };

    let workouts = sqlx::query_as::<_, Workout>(
        "SELECT * FROM workouts WHERE user_id = ? ORDER BY date DESC, id DESC",
    )
    .bind(user_id)
    .fetch_all(&state.db)
    .await?;

    let logs = sqlx::query_as::<_, WorkoutLog>(
        "SELECT * FROM workout_logs WHERE user_id = ? ORDER BY completed_at DESC, id DESC",
    )
    .bind(user_id)
    .fetch_all(&state.db)
    .await?;

    let catalog = sqlx::query_as::<_, Exercise>(
        "SELECT * FROM exercises WHERE user_id IS NULL OR user_id = ?",
    )
    .bind(user_id)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(progress_stats(&workouts, &logs, &catalog, today)))
}
