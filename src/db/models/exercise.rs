//! Exercise library models and DTOs.
//!
//! Built-in catalog entries are seeded at startup (`user_id` NULL,
//! `is_custom` 0); user-created customs go through the CRUD endpoints.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::common::parse_string_list;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Exercise {
    pub id: i64,
    /// NULL for built-in catalog entries
    pub user_id: Option<i64>,
    pub name: String,
    pub category: String,
    /// JSON array of strings, stored as TEXT
    pub muscle_groups: String,
    pub difficulty: String,
    pub equipment: Option<String>,
    pub description: Option<String>,
    /// JSON array of strings, ordered
    pub instructions: String,
    /// Seconds
    pub estimated_duration: Option<i64>,
    pub is_custom: bool,
    pub image_url: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseResponse {
    pub id: i64,
    pub user_id: Option<i64>,
    pub name: String,
    pub category: String,
    pub muscle_groups: Vec<String>,
    pub difficulty: String,
    pub equipment: Option<String>,
    pub description: Option<String>,
    pub instructions: Vec<String>,
    pub estimated_duration: Option<i64>,
    pub is_custom: bool,
    pub image_url: Option<String>,
    pub created_at: String,
}

impl From<Exercise> for ExerciseResponse {
    fn from(exercise: Exercise) -> Self {
        Self {
            id: exercise.id,
            user_id: exercise.user_id,
            name: exercise.name,
            category: exercise.category,
            muscle_groups: parse_string_list(&exercise.muscle_groups),
            difficulty: exercise.difficulty,
            equipment: exercise.equipment,
            description: exercise.description,
            instructions: parse_string_list(&exercise.instructions),
            estimated_duration: exercise.estimated_duration,
            is_custom: exercise.is_custom,
            image_url: exercise.image_url,
            created_at: exercise.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateExerciseRequest {
    pub user_email: String,
    pub name: String,
    pub category: Option<String>,
    #[serde(default)]
    pub muscle_groups: Vec<String>,
    pub difficulty: Option<String>,
    pub equipment: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub instructions: Vec<String>,
    pub estimated_duration: Option<i64>,
    pub image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateExerciseRequest {
    pub id: i64,
    pub name: Option<String>,
    pub category: Option<String>,
    pub muscle_groups: Option<Vec<String>>,
    pub difficulty: Option<String>,
    pub equipment: Option<String>,
    pub description: Option<String>,
    pub instructions: Option<Vec<String>>,
    pub estimated_duration: Option<i64>,
    pub image_url: Option<String>,
}
