//! Input validation for API requests.
//!
//! Field validators return `Result<(), String>` so handlers can collect
//! them into a `ValidationErrorBuilder`. The exercise-reference existence
//! check lives here too since every list-carrying write shares it.

use lazy_static::lazy_static;
use regex::Regex;

use crate::db::{DbPool, ExerciseRef};

use super::error::{ApiError, ErrorDetails};

lazy_static! {
    /// Calendar-day strings, YYYY-MM-DD
    static ref DATE_REGEX: Regex = Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap();

    /// Loose email shape check; real verification is out of scope
    static ref EMAIL_REGEX: Regex = Regex::new(
        r"^[^@\s]+@[^@\s]+\.[^@\s]+$"
    ).unwrap();
}

/// Validate an email address
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email is required".to_string());
    }

    if email.len() > 254 {
        return Err("Email is too long (max 254 characters)".to_string());
    }

    if !EMAIL_REGEX.is_match(email) {
        return Err("Invalid email address".to_string());
    }

    Ok(())
}

/// Validate a workout/template/exercise display name
pub fn validate_name(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("Name is required".to_string());
    }

    if name.len() > 120 {
        return Err("Name is too long (max 120 characters)".to_string());
    }

    Ok(())
}

/// Validate a calendar-day string (YYYY-MM-DD, and a real date)
pub fn validate_date(date: &str) -> Result<(), String> {
    if date.is_empty() {
        return Err("Date is required".to_string());
    }

    if !DATE_REGEX.is_match(date) {
        return Err("Date must be in YYYY-MM-DD format".to_string());
    }

    if chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d").is_err() {
        return Err("Date is not a valid calendar day".to_string());
    }

    Ok(())
}

/// Validate a perceived-effort rating (optional field, 1-10)
pub fn validate_effort(effort: Option<i64>) -> Result<(), String> {
    if let Some(e) = effort {
        if !(1..=10).contains(&e) {
            return Err("Effort must be between 1 and 10".to_string());
        }
    }

    Ok(())
}

/// Validate a duration in seconds (optional field)
pub fn validate_duration(duration: Option<i64>) -> Result<(), String> {
    if let Some(d) = duration {
        if d < 0 {
            return Err("Duration cannot be negative".to_string());
        }
    }

    Ok(())
}

/// Validate a password at registration
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.len() < 8 {
        return Err("Password must be at least 8 characters".to_string());
    }

    Ok(())
}

/// Check that every catalog id referenced by an exercise list exists.
///
/// Rejects with a 400 listing the missing ids. Inline-name-only entries
/// (no id) pass through untouched.
pub async fn ensure_exercise_refs_exist(
    db: &DbPool,
    refs: &[ExerciseRef],
) -> Result<(), ApiError> {
    let mut ids: Vec<i64> = refs.iter().filter_map(|r| r.exercise_id).collect();
    ids.sort_unstable();
    ids.dedup();

    let mut missing = Vec::new();
    for id in ids {
        let found: Option<(i64,)> = sqlx::query_as("SELECT id FROM exercises WHERE id = ?")
            .bind(id)
            .fetch_optional(db)
            .await?;
        if found.is_none() {
            missing.push(id);
        }
    }

    if missing.is_empty() {
        return Ok(());
    }

    let listed = missing
        .iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    let mut details = std::collections::HashMap::new();
    details.insert(
        "missingIds".to_string(),
        serde_json::json!(missing),
    );
    Err(
        ApiError::bad_request(format!("Unknown exercise ids: {listed}"))
            .with_details(ErrorDetails::Generic(details)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email() {
        assert!(validate_email("lifter@example.com").is_ok());
        assert!(validate_email("a.b+tag@sub.example.org").is_ok());

        assert!(validate_email("").is_err());
        assert!(validate_email("not-an-email").is_err());
        assert!(validate_email("two@@example.com").is_err());
        assert!(validate_email("missing@tld").is_err());
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("Push Day").is_ok());
        assert!(validate_name("5x5").is_ok());

        assert!(validate_name("").is_err());
        assert!(validate_name(&"x".repeat(121)).is_err());
    }

    #[test]
    fn test_validate_date() {
        assert!(validate_date("2024-01-01").is_ok());
        assert!(validate_date("2024-02-29").is_ok()); // leap day

        assert!(validate_date("").is_err());
        assert!(validate_date("01/01/2024").is_err());
        assert!(validate_date("2024-1-1").is_err());
        assert!(validate_date("2023-02-29").is_err()); // not a leap year
        assert!(validate_date("2024-13-01").is_err());
    }

    #[test]
    fn test_validate_effort() {
        assert!(validate_effort(None).is_ok());
        assert!(validate_effort(Some(1)).is_ok());
        assert!(validate_effort(Some(10)).is_ok());

        assert!(validate_effort(Some(0)).is_err());
        assert!(validate_effort(Some(11)).is_err());
        assert!(validate_effort(Some(-3)).is_err());
    }

    #[test]
    fn test_validate_duration() {
        assert!(validate_duration(None).is_ok());
        assert!(validate_duration(Some(0)).is_ok());
        assert!(validate_duration(Some(3600)).is_ok());
        assert!(validate_duration(Some(-1)).is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("longenough").is_ok());
        assert!(validate_password("short").is_err());
    }

    #[tokio::test]
    async fn test_ensure_exercise_refs_exist() {
        let pool = crate::db::init_test_pool().await;

        // Seeded builtin id 1 exists
        let ok_refs = vec![ExerciseRef {
            exercise_id: Some(1),
            ..Default::default()
        }];
        assert!(ensure_exercise_refs_exist(&pool, &ok_refs).await.is_ok());

        // Inline-name entries are not checked
        let inline = vec![ExerciseRef {
            name: Some("Shadow Boxing".to_string()),
            ..Default::default()
        }];
        assert!(ensure_exercise_refs_exist(&pool, &inline).await.is_ok());

        // A missing id is rejected and named in the message
        let missing = vec![
            ExerciseRef {
                exercise_id: Some(1),
                ..Default::default()
            },
            ExerciseRef {
                exercise_id: Some(99999),
                ..Default::default()
            },
        ];
        let err = ensure_exercise_refs_exist(&pool, &missing)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("99999"));
    }
}
