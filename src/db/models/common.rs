//! Shared types for the exercise lists embedded as JSON inside workouts,
//! templates, and workout logs.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Display name used when an exercise reference cannot be resolved.
pub const UNKNOWN_EXERCISE: &str = "Unknown Exercise";

/// A single planned exercise entry inside a workout or template.
///
/// Historical clients wrote several shapes into these lists (a bare `id`,
/// an `exerciseId`, or just an inline `name`). This is the one normalized
/// shape; display-name resolution goes through [`ExerciseRef::resolved_name`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExerciseRef {
    /// Catalog id of the referenced exercise
    #[serde(alias = "id", skip_serializing_if = "Option::is_none")]
    pub exercise_id: Option<i64>,
    /// Inline display name carried by older rows
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sets: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reps: Option<i64>,
    /// Timed-exercise duration in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl ExerciseRef {
    /// Resolve the display name: catalog lookup by id, then the inline
    /// literal name, then the `"Unknown Exercise"` sentinel.
    pub fn resolved_name<'a>(&'a self, catalog: &'a HashMap<i64, String>) -> &'a str {
        if let Some(id) = self.exercise_id {
            if let Some(name) = catalog.get(&id) {
                return name;
            }
        }
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => UNKNOWN_EXERCISE,
        }
    }
}

/// What actually happened for one exercise during a completed workout,
/// as opposed to the planned values in [`ExerciseRef`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggedExercise {
    #[serde(alias = "id", skip_serializing_if = "Option::is_none")]
    pub exercise_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sets: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reps: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    /// Seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<i64>,
    /// Perceived effort for this exercise, 1-10
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effort: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Parse an exercise-reference list from its database JSON column.
/// Malformed or missing JSON yields an empty list rather than an error.
pub fn parse_exercise_refs(json: &str) -> Vec<ExerciseRef> {
    serde_json::from_str(json).unwrap_or_default()
}

/// Serialize an exercise-reference list for the database column.
pub fn serialize_exercise_refs(refs: &[ExerciseRef]) -> String {
    serde_json::to_string(refs).unwrap_or_else(|_| "[]".to_string())
}

/// Parse a logged-exercise list from its database JSON column.
pub fn parse_logged_exercises(json: &str) -> Vec<LoggedExercise> {
    serde_json::from_str(json).unwrap_or_default()
}

/// Serialize a logged-exercise list for the database column.
pub fn serialize_logged_exercises(exercises: &[LoggedExercise]) -> String {
    serde_json::to_string(exercises).unwrap_or_else(|_| "[]".to_string())
}

/// Parse a JSON string array column (muscle groups, instructions).
pub fn parse_string_list(json: &str) -> Vec<String> {
    serde_json::from_str(json).unwrap_or_default()
}

/// Serialize a string list for the database column.
pub fn serialize_string_list(items: &[String]) -> String {
    serde_json::to_string(items).unwrap_or_else(|_| "[]".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> HashMap<i64, String> {
        let mut map = HashMap::new();
        map.insert(1, "Bench Press".to_string());
        map.insert(2, "Running".to_string());
        map
    }

    #[test]
    fn test_resolved_name_prefers_catalog() {
        let r = ExerciseRef {
            exercise_id: Some(1),
            name: Some("Old Name".to_string()),
            ..Default::default()
        };
        assert_eq!(r.resolved_name(&catalog()), "Bench Press");
    }

    #[test]
    fn test_resolved_name_falls_back_to_literal() {
        let r = ExerciseRef {
            exercise_id: Some(99),
            name: Some("Farmer Carry".to_string()),
            ..Default::default()
        };
        assert_eq!(r.resolved_name(&catalog()), "Farmer Carry");
    }

    #[test]
    fn test_resolved_name_sentinel() {
        let r = ExerciseRef::default();
        assert_eq!(r.resolved_name(&catalog()), UNKNOWN_EXERCISE);

        let empty_name = ExerciseRef {
            name: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(empty_name.resolved_name(&catalog()), UNKNOWN_EXERCISE);
    }

    #[test]
    fn test_parse_accepts_legacy_id_key() {
        let refs = parse_exercise_refs(r#"[{"id": 4, "sets": 3, "reps": 10}]"#);
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].exercise_id, Some(4));
        assert_eq!(refs[0].sets, Some(3));
    }

    #[test]
    fn test_parse_malformed_defaults_to_empty() {
        assert!(parse_exercise_refs("not json").is_empty());
        assert!(parse_exercise_refs("").is_empty());
        assert!(parse_logged_exercises("{oops").is_empty());
        assert!(parse_string_list("nope").is_empty());
    }

    #[test]
    fn test_roundtrip_skips_absent_fields() {
        let refs = vec![ExerciseRef {
            exercise_id: Some(7),
            time: Some(600),
            ..Default::default()
        }];
        let json = serialize_exercise_refs(&refs);
        assert!(json.contains("\"exerciseId\":7"));
        assert!(!json.contains("sets"));
        assert_eq!(parse_exercise_refs(&json), refs);
    }
}
