//! Workout log models and DTOs.
//!
//! A log records what actually happened during a completed workout. It is
//! created once and keeps only a soft back-reference to its source
//! workout, so later edits or deletes of the workout do not touch it.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::common::{parse_logged_exercises, LoggedExercise};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WorkoutLog {
    pub id: i64,
    pub user_id: i64,
    pub workout_id: Option<i64>,
    /// RFC 3339 timestamp
    pub completed_at: String,
    /// Seconds
    pub duration: Option<i64>,
    /// JSON array of logged exercises, stored as TEXT
    pub exercises: String,
    pub notes: Option<String>,
    /// Perceived whole-workout effort, 1-10
    pub overall_effort: Option<i64>,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutLogResponse {
    pub id: i64,
    pub user_id: i64,
    pub workout_id: Option<i64>,
    pub completed_at: String,
    pub duration: Option<i64>,
    pub exercises: Vec<LoggedExercise>,
    pub notes: Option<String>,
    pub overall_effort: Option<i64>,
    pub created_at: String,
}

impl From<WorkoutLog> for WorkoutLogResponse {
    fn from(log: WorkoutLog) -> Self {
        Self {
            id: log.id,
            user_id: log.user_id,
            workout_id: log.workout_id,
            completed_at: log.completed_at,
            duration: log.duration,
            exercises: parse_logged_exercises(&log.exercises),
            notes: log.notes,
            overall_effort: log.overall_effort,
            created_at: log.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateWorkoutLogRequest {
    pub user_email: String,
    pub workout_id: Option<i64>,
    /// Defaults to the current time when omitted
    pub completed_at: Option<String>,
    pub duration: Option<i64>,
    #[serde(default)]
    pub exercises: Vec<LoggedExercise>,
    pub notes: Option<String>,
    pub overall_effort: Option<i64>,
}

/// Accepted by the PUT endpoint. The web UI never edits a log after
/// creation, but the endpoint exists for API clients.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWorkoutLogRequest {
    pub id: i64,
    pub completed_at: Option<String>,
    pub duration: Option<i64>,
    pub exercises: Option<Vec<LoggedExercise>>,
    pub notes: Option<String>,
    pub overall_effort: Option<i64>,
}
