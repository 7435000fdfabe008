//! Workout models and DTOs.
//!
//! A workout is a concrete, dated session, possibly instantiated from a
//! template. It progresses from scheduled to completed; completion records
//! the elapsed duration.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::common::{parse_exercise_refs, ExerciseRef};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Workout {
    pub id: i64,
    pub user_id: i64,
    /// Calendar day as YYYY-MM-DD, never a timestamp
    pub date: String,
    pub name: String,
    /// JSON array of exercise references, stored as TEXT
    pub exercises: String,
    pub completed: bool,
    /// Seconds, recorded when the workout is logged as completed
    pub duration: Option<i64>,
    pub notes: Option<String>,
    pub created_at: String,
}

/// Wire shape for a workout: the exercises column parsed into objects.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutResponse {
    pub id: i64,
    pub user_id: i64,
    pub date: String,
    pub name: String,
    pub exercises: Vec<ExerciseRef>,
    pub completed: bool,
    pub duration: Option<i64>,
    pub notes: Option<String>,
    pub created_at: String,
}

impl From<Workout> for WorkoutResponse {
    fn from(workout: Workout) -> Self {
        Self {
            id: workout.id,
            user_id: workout.user_id,
            date: workout.date,
            name: workout.name,
            exercises: parse_exercise_refs(&workout.exercises),
            completed: workout.completed,
            duration: workout.duration,
            notes: workout.notes,
            created_at: workout.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateWorkoutRequest {
    pub user_email: String,
    pub date: String,
    pub name: String,
    #[serde(default)]
    pub exercises: Vec<ExerciseRef>,
    #[serde(default)]
    pub completed: bool,
    pub duration: Option<i64>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWorkoutRequest {
    pub id: i64,
    pub date: Option<String>,
    pub name: Option<String>,
    pub exercises: Option<Vec<ExerciseRef>>,
    pub completed: Option<bool>,
    pub duration: Option<i64>,
    pub notes: Option<String>,
}
