//! Workout template models and DTOs.
//!
//! Templates are reusable named exercise lists with suggested sets/reps/
//! time. Instantiating a workout from one copies the list; there is no
//! live link afterward.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::common::{parse_exercise_refs, ExerciseRef};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Template {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub category: Option<String>,
    /// JSON array of exercise references, stored as TEXT
    pub exercises: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateResponse {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub category: Option<String>,
    pub exercises: Vec<ExerciseRef>,
    pub created_at: String,
}

impl From<Template> for TemplateResponse {
    fn from(template: Template) -> Self {
        Self {
            id: template.id,
            user_id: template.user_id,
            name: template.name,
            category: template.category,
            exercises: parse_exercise_refs(&template.exercises),
            created_at: template.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTemplateRequest {
    pub user_email: String,
    pub name: String,
    /// Some clients send this as `type`
    #[serde(alias = "type")]
    pub category: Option<String>,
    #[serde(default)]
    pub exercises: Vec<ExerciseRef>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTemplateRequest {
    pub id: i64,
    pub name: Option<String>,
    #[serde(alias = "type")]
    pub category: Option<String>,
    pub exercises: Option<Vec<ExerciseRef>>,
}
