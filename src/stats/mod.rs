//! Progress statistics over a user's workout history.
//!
//! Everything in here is a pure function of already-fetched rows plus an
//! explicit `today`; handlers pass the server's local calendar day. Missing
//! or malformed fields never fail the computation, they default (`0`,
//! `"Unknown Exercise"`, empty list).

use chrono::{Datelike, Days, NaiveDate};
use serde::Serialize;
use std::collections::HashMap;

use crate::db::{parse_exercise_refs, Exercise, ExerciseRef, Workout, WorkoutLog};

/// Number of trailing calendar weeks in the weekly series.
const WEEKLY_BUCKETS: usize = 8;
/// Number of trailing calendar months in the monthly series.
const MONTHLY_BUCKETS: u32 = 6;
/// Maximum entries in the top-exercises ranking.
const TOP_EXERCISES: usize = 6;

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyPoint {
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub workouts: i64,
    pub minutes: i64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyPoint {
    pub year: i32,
    pub month: u32,
    pub workouts: i64,
    pub minutes: i64,
    pub avg_effort: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TopExercise {
    pub name: String,
    pub count: i64,
}

#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq)]
pub struct CategoryDistribution {
    pub cardio: i64,
    pub strength: i64,
    pub mixed: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkoutCategory {
    Cardio,
    Strength,
    Mixed,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressStats {
    pub total_workouts: i64,
    pub completed_workouts: i64,
    /// Exact ratio; formatting to a percentage is the caller's concern
    pub completion_rate: f64,
    /// Exactly 8 entries, oldest week first, last entry = current week
    pub weekly: Vec<WeeklyPoint>,
    /// Exactly 6 entries, oldest month first
    pub monthly: Vec<MonthlyPoint>,
    /// At most 6 entries, non-increasing by count
    pub top_exercises: Vec<TopExercise>,
    pub categories: CategoryDistribution,
}

/// Compute the full dashboard aggregate.
pub fn progress_stats(
    workouts: &[Workout],
    logs: &[WorkoutLog],
    catalog: &[Exercise],
    today: NaiveDate,
) -> ProgressStats {
    // Parse each workout's exercise column once; invalid JSON counts as an
    // empty list, invalid dates simply fall outside every bucket.
    let parsed: Vec<(&Workout, Vec<ExerciseRef>, Option<NaiveDate>)> = workouts
        .iter()
        .map(|w| {
            (
                w,
                parse_exercise_refs(&w.exercises),
                NaiveDate::parse_from_str(&w.date, "%Y-%m-%d").ok(),
            )
        })
        .collect();

    let total = workouts.len() as i64;
    let completed: Vec<&(&Workout, Vec<ExerciseRef>, Option<NaiveDate>)> =
        parsed.iter().filter(|(w, _, _)| w.completed).collect();
    let completed_count = completed.len() as i64;

    let completion_rate = if total == 0 {
        0.0
    } else {
        completed_count as f64 / total as f64
    };

    let mut categories = CategoryDistribution::default();
    for (_, exercises, _) in &completed {
        match classify_workout(exercises) {
            WorkoutCategory::Cardio => categories.cardio += 1,
            WorkoutCategory::Strength => categories.strength += 1,
            WorkoutCategory::Mixed => categories.mixed += 1,
        }
    }

    ProgressStats {
        total_workouts: total,
        completed_workouts: completed_count,
        completion_rate,
        weekly: weekly_series(&completed, today),
        monthly: monthly_series(&completed, logs, today),
        top_exercises: top_exercises(&completed, catalog),
        categories,
    }
}

/// Classify a completed workout by its exercise list.
///
/// Cardio predicate: some exercise carries `time > 0`. Strength predicate:
/// some exercise carries both `sets` and `reps`. Exactly one predicate true
/// picks that category; both or neither is `Mixed`, including the empty list.
pub fn classify_workout(exercises: &[ExerciseRef]) -> WorkoutCategory {
    let has_cardio = exercises.iter().any(|e| e.time.unwrap_or(0) > 0);
    let has_strength = exercises
        .iter()
        .any(|e| e.sets.unwrap_or(0) > 0 && e.reps.unwrap_or(0) > 0);
    match (has_cardio, has_strength) {
        (true, false) => WorkoutCategory::Cardio,
        (false, true) => WorkoutCategory::Strength,
        _ => WorkoutCategory::Mixed,
    }
}

/// Monday of the week containing `date`.
fn week_start(date: NaiveDate) -> NaiveDate {
    date - Days::new(u64::from(date.weekday().num_days_from_monday()))
}

/// The calendar month `back` months before (`year`, `month`).
fn month_back(year: i32, month: u32, back: u32) -> (i32, u32) {
    let idx = year * 12 + month as i32 - 1 - back as i32;
    (idx.div_euclid(12), (idx.rem_euclid(12) + 1) as u32)
}

fn weekly_series(
    completed: &[&(&Workout, Vec<ExerciseRef>, Option<NaiveDate>)],
    today: NaiveDate,
) -> Vec<WeeklyPoint> {
    // Built newest week first, then reversed, so the last entry is always
    // the current week.
    let mut points = Vec::with_capacity(WEEKLY_BUCKETS);
    for i in 0..WEEKLY_BUCKETS {
        let anchor = today - Days::new(7 * i as u64);
        let start = week_start(anchor);
        let end = start + Days::new(6);

        let mut count = 0i64;
        let mut seconds = 0i64;
        for (workout, _, date) in completed.iter().copied() {
            if let Some(d) = *date {
                if d >= start && d <= end {
                    count += 1;
                    seconds += workout.duration.unwrap_or(0);
                }
            }
        }

        points.push(WeeklyPoint {
            week_start: start,
            week_end: end,
            workouts: count,
            minutes: seconds / 60,
        });
    }
    points.reverse();
    points
}

fn monthly_series(
    completed: &[&(&Workout, Vec<ExerciseRef>, Option<NaiveDate>)],
    logs: &[WorkoutLog],
    today: NaiveDate,
) -> Vec<MonthlyPoint> {
    let mut points = Vec::with_capacity(MONTHLY_BUCKETS as usize);
    for i in 0..MONTHLY_BUCKETS {
        let (year, month) = month_back(today.year(), today.month(), i);

        let mut count = 0i64;
        let mut seconds = 0i64;
        for (workout, _, date) in completed.iter().copied() {
            if let Some(d) = *date {
                if d.year() == year && d.month() == month {
                    count += 1;
                    seconds += workout.duration.unwrap_or(0);
                }
            }
        }

        // Average effort over the month's logs; a month with no logs is 0,
        // never NaN.
        let mut effort_sum = 0i64;
        let mut effort_n = 0i64;
        for log in logs {
            if let Some(d) = log_day(log) {
                if d.year() == year && d.month() == month {
                    effort_sum += log.overall_effort.unwrap_or(0);
                    effort_n += 1;
                }
            }
        }
        let avg_effort = if effort_n == 0 {
            0.0
        } else {
            effort_sum as f64 / effort_n as f64
        };

        points.push(MonthlyPoint {
            year,
            month,
            workouts: count,
            minutes: seconds / 60,
            avg_effort,
        });
    }
    points.reverse();
    points
}

/// Calendar day of a log's completion timestamp. Accepts a full RFC 3339
/// timestamp or anything with a YYYY-MM-DD prefix; anything else falls
/// outside every bucket.
fn log_day(log: &WorkoutLog) -> Option<NaiveDate> {
    let prefix = log.completed_at.get(..10)?;
    NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok()
}

fn top_exercises(
    completed: &[&(&Workout, Vec<ExerciseRef>, Option<NaiveDate>)],
    catalog: &[Exercise],
) -> Vec<TopExercise> {
    let names: HashMap<i64, String> = catalog
        .iter()
        .map(|e| (e.id, e.name.clone()))
        .collect();

    // First-encounter order is the tie-break, so counts live in a Vec with
    // a side index instead of a map.
    let mut counts: Vec<TopExercise> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for (_, exercises, _) in completed.iter().copied() {
        for exercise in exercises {
            let name = exercise.resolved_name(&names);
            match index.get(name) {
                Some(&i) => counts[i].count += 1,
                None => {
                    index.insert(name.to_string(), counts.len());
                    counts.push(TopExercise {
                        name: name.to_string(),
                        count: 1,
                    });
                }
            }
        }
    }

    // Stable sort keeps first-encountered order among equal counts
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(TOP_EXERCISES);
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn workout(id: i64, date: &str, completed: bool, duration: Option<i64>, exercises: &str) -> Workout {
        Workout {
            id,
            user_id: 1,
            date: date.to_string(),
            name: format!("workout-{id}"),
            exercises: exercises.to_string(),
            completed,
            duration,
            notes: None,
            created_at: "2024-01-01 00:00:00".to_string(),
        }
    }

    fn log(completed_at: &str, effort: Option<i64>) -> WorkoutLog {
        WorkoutLog {
            id: 0,
            user_id: 1,
            workout_id: None,
            completed_at: completed_at.to_string(),
            duration: None,
            exercises: "[]".to_string(),
            notes: None,
            overall_effort: effort,
            created_at: "2024-01-01 00:00:00".to_string(),
        }
    }

    fn catalog_entry(id: i64, name: &str) -> Exercise {
        Exercise {
            id,
            user_id: None,
            name: name.to_string(),
            category: "strength".to_string(),
            muscle_groups: "[]".to_string(),
            difficulty: "beginner".to_string(),
            equipment: None,
            description: None,
            instructions: "[]".to_string(),
            estimated_duration: None,
            is_custom: false,
            image_url: None,
            created_at: "2024-01-01 00:00:00".to_string(),
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 20).unwrap()
    }

    #[test]
    fn test_empty_inputs() {
        let stats = progress_stats(&[], &[], &[], today());
        assert_eq!(stats.total_workouts, 0);
        assert_eq!(stats.completion_rate, 0.0);
        assert_eq!(stats.weekly.len(), 8);
        assert_eq!(stats.monthly.len(), 6);
        assert!(stats.top_exercises.is_empty());
        assert_eq!(stats.categories, CategoryDistribution::default());
        for point in &stats.monthly {
            assert!(!point.avg_effort.is_nan());
        }
    }

    #[test]
    fn test_completion_rate_exact() {
        let workouts = vec![
            workout(1, "2024-03-18", true, Some(1800), "[]"),
            workout(2, "2024-03-19", false, None, "[]"),
            workout(3, "2024-03-20", false, None, "[]"),
        ];
        let stats = progress_stats(&workouts, &[], &[], today());
        assert_eq!(stats.total_workouts, 3);
        assert_eq!(stats.completed_workouts, 1);
        assert!((stats.completion_rate - 1.0 / 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_worked_example() {
        // The one-workout example: completed strength session, 1800 s
        let workouts = vec![workout(
            1,
            "2024-01-01",
            true,
            Some(1800),
            r#"[{"sets":3,"reps":10}]"#,
        )];
        let today = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();
        let stats = progress_stats(&workouts, &[], &[], today);

        assert_eq!(stats.total_workouts, 1);
        assert_eq!(stats.completion_rate, 1.0);
        assert_eq!(stats.categories.strength, 1);
        let current_week = stats.weekly.last().unwrap();
        assert_eq!(current_week.workouts, 1);
        assert_eq!(current_week.minutes, 30);
    }

    #[test]
    fn test_weekly_series_shape() {
        let stats = progress_stats(&[], &[], &[], today());
        assert_eq!(stats.weekly.len(), 8);
        // Oldest first, strictly ascending by week, last entry is the
        // current week (2024-03-20 is a Wednesday; its Monday is 03-18)
        let last = stats.weekly.last().unwrap();
        assert_eq!(last.week_start, NaiveDate::from_ymd_opt(2024, 3, 18).unwrap());
        assert_eq!(last.week_end, NaiveDate::from_ymd_opt(2024, 3, 24).unwrap());
        for pair in stats.weekly.windows(2) {
            assert_eq!(pair[1].week_start, pair[0].week_start + Days::new(7));
        }
    }

    #[test]
    fn test_weekly_boundaries_inclusive() {
        // Both edges of the current week count
        let workouts = vec![
            workout(1, "2024-03-18", true, Some(600), "[]"),
            workout(2, "2024-03-24", true, Some(600), "[]"),
            workout(3, "2024-03-17", true, Some(600), "[]"), // previous week
        ];
        let stats = progress_stats(&workouts, &[], &[], today());
        let last = stats.weekly.last().unwrap();
        assert_eq!(last.workouts, 2);
        assert_eq!(last.minutes, 20);
        let previous = &stats.weekly[stats.weekly.len() - 2];
        assert_eq!(previous.workouts, 1);
    }

    #[test]
    fn test_uncompleted_workouts_do_not_count() {
        let workouts = vec![workout(1, "2024-03-20", false, Some(6000), r#"[{"sets":3,"reps":8}]"#)];
        let stats = progress_stats(&workouts, &[], &[], today());
        assert_eq!(stats.weekly.last().unwrap().workouts, 0);
        assert_eq!(stats.categories.strength, 0);
        assert!(stats.top_exercises.is_empty());
    }

    #[test]
    fn test_monthly_series_crosses_year_boundary() {
        let today = NaiveDate::from_ymd_opt(2024, 2, 10).unwrap();
        let stats = progress_stats(&[], &[], &[], today);
        assert_eq!(stats.monthly.len(), 6);
        let months: Vec<(i32, u32)> = stats.monthly.iter().map(|p| (p.year, p.month)).collect();
        assert_eq!(
            months,
            vec![(2023, 9), (2023, 10), (2023, 11), (2023, 12), (2024, 1), (2024, 2)]
        );
    }

    #[test]
    fn test_monthly_effort_average_and_zero_guard() {
        let logs = vec![
            log("2024-03-01T10:00:00Z", Some(6)),
            log("2024-03-15T10:00:00Z", Some(8)),
            log("2024-02-01T10:00:00Z", None), // defaults to 0
        ];
        let stats = progress_stats(&[], &logs, &[], today());
        let march = stats.monthly.last().unwrap();
        assert!((march.avg_effort - 7.0).abs() < f64::EPSILON);
        let february = &stats.monthly[stats.monthly.len() - 2];
        assert_eq!(february.avg_effort, 0.0);
        let january = &stats.monthly[stats.monthly.len() - 3];
        assert_eq!(january.avg_effort, 0.0);
        assert!(!january.avg_effort.is_nan());
    }

    #[test]
    fn test_top_exercises_resolution_and_order() {
        let catalog = vec![catalog_entry(1, "Bench Press"), catalog_entry(2, "Running")];
        let workouts = vec![
            workout(
                1,
                "2024-03-18",
                true,
                None,
                r#"[{"exerciseId":1},{"exerciseId":2},{"name":"Farmer Carry"},{}]"#,
            ),
            workout(2, "2024-03-19", true, None, r#"[{"exerciseId":1}]"#),
        ];
        let stats = progress_stats(&workouts, &[], &catalog, today());
        let names: Vec<&str> = stats.top_exercises.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Bench Press", "Running", "Farmer Carry", "Unknown Exercise"]
        );
        assert_eq!(stats.top_exercises[0].count, 2);
        // Ties keep first-encountered order: Running before Farmer Carry
        assert_eq!(stats.top_exercises[1].count, 1);
    }

    #[test]
    fn test_top_exercises_truncates_to_six() {
        let exercises: Vec<String> = (0..9)
            .map(|i| format!(r#"{{"name":"Movement {i}"}}"#))
            .collect();
        let json = format!("[{}]", exercises.join(","));
        let workouts = vec![workout(1, "2024-03-18", true, None, &json)];
        let stats = progress_stats(&workouts, &[], &[], today());
        assert_eq!(stats.top_exercises.len(), 6);
        for pair in stats.top_exercises.windows(2) {
            assert!(pair[0].count >= pair[1].count);
        }
    }

    #[test]
    fn test_classification() {
        let strength = parse_exercise_refs(r#"[{"sets":3,"reps":10},{"sets":5,"reps":5}]"#);
        assert_eq!(classify_workout(&strength), WorkoutCategory::Strength);

        let cardio = parse_exercise_refs(r#"[{"time":600},{"time":1200}]"#);
        assert_eq!(classify_workout(&cardio), WorkoutCategory::Cardio);

        let both = parse_exercise_refs(r#"[{"time":600},{"sets":3,"reps":10}]"#);
        assert_eq!(classify_workout(&both), WorkoutCategory::Mixed);

        // An entry with neither pattern satisfies no predicate
        let neither = parse_exercise_refs(r#"[{"notes":"stretching"}]"#);
        assert_eq!(classify_workout(&neither), WorkoutCategory::Mixed);

        // But it does not spoil a sibling that satisfies one
        let padded = parse_exercise_refs(r#"[{"notes":"stretching"},{"sets":3,"reps":10}]"#);
        assert_eq!(classify_workout(&padded), WorkoutCategory::Strength);

        assert_eq!(classify_workout(&[]), WorkoutCategory::Mixed);

        // Zero values are not positive
        let zeros = parse_exercise_refs(r#"[{"time":0,"sets":0,"reps":0}]"#);
        assert_eq!(classify_workout(&zeros), WorkoutCategory::Mixed);
    }

    #[test]
    fn test_malformed_exercise_json_defaults_to_empty() {
        let workouts = vec![workout(1, "2024-03-18", true, Some(60), "{not json")];
        let stats = progress_stats(&workouts, &[], &[], today());
        assert_eq!(stats.categories.mixed, 1);
        assert!(stats.top_exercises.is_empty());
        assert_eq!(stats.weekly.last().unwrap().minutes, 1);
    }

    #[test]
    fn test_month_back_helper() {
        assert_eq!(month_back(2024, 3, 0), (2024, 3));
        assert_eq!(month_back(2024, 3, 2), (2024, 1));
        assert_eq!(month_back(2024, 3, 3), (2023, 12));
        assert_eq!(month_back(2024, 1, 12), (2023, 1));
    }

    #[test]
    fn test_week_start_is_monday() {
        // 2024-03-20 is a Wednesday
        assert_eq!(
            week_start(NaiveDate::from_ymd_opt(2024, 3, 20).unwrap()),
            NaiveDate::from_ymd_opt(2024, 3, 18).unwrap()
        );
        // Monday maps to itself, Sunday to the preceding Monday
        assert_eq!(
            week_start(NaiveDate::from_ymd_opt(2024, 3, 18).unwrap()),
            NaiveDate::from_ymd_opt(2024, 3, 18).unwrap()
        );
        assert_eq!(
            week_start(NaiveDate::from_ymd_opt(2024, 3, 24).unwrap()),
            NaiveDate::from_ymd_opt(2024, 3, 18).unwrap()
        );
    }
}
