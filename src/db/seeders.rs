//! Database seeders for built-in data
//!
//! Seeds the exercise catalog with the built-in movement library. Runs on
//! every startup so new catalog entries appear after an upgrade without a
//! migration. Built-ins occupy fixed low ids; user-created customs are
//! assigned ids above them by AUTOINCREMENT.

use anyhow::Result;
use sqlx::SqlitePool;
use tracing::info;

/// Seed built-in exercise catalog entries (add/update on every startup).
pub async fn seed_exercise_catalog(pool: &SqlitePool) -> Result<()> {
    info!("Seeding built-in exercise catalog...");

    // Format: (id, name, category, muscle_groups, difficulty, equipment,
    //          description, instructions, estimated_duration_seconds)
    let catalog: Vec<(i64, &str, &str, &str, &str, Option<&str>, &str, &str, i64)> = vec![
        // ==================== STRENGTH ====================
        (
            1,
            "Barbell Back Squat",
            "strength",
            r#"["quadriceps","glutes","hamstrings","core"]"#,
            "intermediate",
            Some("barbell"),
            "The foundational lower-body barbell lift.",
            r#"["Set the bar on your upper back","Brace and descend until thighs pass parallel","Drive up through mid-foot"]"#,
            600,
        ),
        (
            2,
            "Bench Press",
            "strength",
            r#"["chest","triceps","shoulders"]"#,
            "intermediate",
            Some("barbell"),
            "Horizontal pressing strength staple.",
            r#"["Retract shoulder blades on the bench","Lower the bar to mid-chest","Press to lockout"]"#,
            600,
        ),
        (
            3,
            "Deadlift",
            "strength",
            r#"["hamstrings","glutes","back","core"]"#,
            "advanced",
            Some("barbell"),
            "Full-body hinge pulling from the floor.",
            r#"["Set your hips with the bar over mid-foot","Brace hard","Stand up without rounding the back"]"#,
            600,
        ),
        (
            4,
            "Overhead Press",
            "strength",
            r#"["shoulders","triceps","core"]"#,
            "intermediate",
            Some("barbell"),
            "Standing vertical press.",
            r#"["Grip just outside the shoulders","Squeeze glutes","Press overhead to lockout"]"#,
            480,
        ),
        (
            5,
            "Pull-Up",
            "strength",
            r#"["lats","biceps","upper back"]"#,
            "intermediate",
            Some("pull-up bar"),
            "Bodyweight vertical pull.",
            r#"["Hang with full arm extension","Pull chin over the bar","Lower under control"]"#,
            300,
        ),
        (
            6,
            "Dumbbell Row",
            "strength",
            r#"["lats","upper back","biceps"]"#,
            "beginner",
            Some("dumbbell"),
            "Single-arm horizontal pull.",
            r#"["Support yourself on a bench","Row the dumbbell to your hip","Lower slowly"]"#,
            420,
        ),
        (
            7,
            "Goblet Squat",
            "strength",
            r#"["quadriceps","glutes","core"]"#,
            "beginner",
            Some("kettlebell"),
            "Beginner-friendly squat variation and leg builder.",
            r#"["Hold the weight at your chest","Squat between your knees","Stand tall"]"#,
            420,
        ),
        (
            8,
            "Romanian Deadlift",
            "strength",
            r#"["hamstrings","glutes","lower back"]"#,
            "intermediate",
            Some("barbell"),
            "Hip hinge with constant hamstring tension.",
            r#"["Start standing with the bar","Push hips back with soft knees","Return when you feel the stretch"]"#,
            480,
        ),
        (
            9,
            "Push-Up",
            "strength",
            r#"["chest","triceps","core"]"#,
            "beginner",
            None,
            "Bodyweight horizontal press.",
            r#"["Plank position, hands under shoulders","Lower chest to the floor","Press back up"]"#,
            300,
        ),
        (
            10,
            "Walking Lunge",
            "strength",
            r#"["quadriceps","glutes","hamstrings"]"#,
            "beginner",
            None,
            "Unilateral leg work with a balance demand.",
            r#"["Step forward into a lunge","Drop the back knee toward the floor","Step through to the next rep"]"#,
            420,
        ),
        // ==================== CARDIO ====================
        (
            11,
            "Running",
            "cardio",
            r#"["legs","heart"]"#,
            "beginner",
            None,
            "Steady-state outdoor or treadmill run.",
            r#"["Warm up for five minutes","Hold a conversational pace","Cool down walking"]"#,
            1800,
        ),
        (
            12,
            "Rowing Machine",
            "cardio",
            r#"["back","legs","heart"]"#,
            "beginner",
            Some("rower"),
            "Low-impact full-body conditioning.",
            r#"["Drive with the legs first","Finish with the arms","Control the recovery"]"#,
            1200,
        ),
        (
            13,
            "Cycling",
            "cardio",
            r#"["quadriceps","calves","heart"]"#,
            "beginner",
            Some("bike"),
            "Indoor or outdoor aerobic ride.",
            r#"["Set saddle height to a slight knee bend","Hold steady cadence","Spin down easy"]"#,
            2400,
        ),
        (
            14,
            "Jump Rope",
            "cardio",
            r#"["calves","shoulders","heart"]"#,
            "intermediate",
            Some("rope"),
            "High-turnover conditioning in minimal space.",
            r#"["Jump just high enough to clear the rope","Stay on the balls of your feet","Keep elbows close"]"#,
            600,
        ),
        (
            15,
            "Stair Climber",
            "cardio",
            r#"["glutes","quadriceps","heart"]"#,
            "beginner",
            Some("machine"),
            "Continuous climbing at a controlled rate.",
            r#"["Stand tall, light grip on the rails","Step full-foot","Keep a steady rate"]"#,
            1200,
        ),
        // ==================== MOBILITY ====================
        (
            16,
            "Plank",
            "core",
            r#"["core","shoulders"]"#,
            "beginner",
            None,
            "Isometric trunk hold.",
            r#"["Forearms under shoulders","Squeeze glutes and brace","Hold without sagging"]"#,
            180,
        ),
        (
            17,
            "Hip Flexor Stretch",
            "mobility",
            r#"["hip flexors"]"#,
            "beginner",
            None,
            "Half-kneeling stretch for the front of the hip.",
            r#"["Half-kneel with the rear knee down","Tuck the pelvis","Shift forward gently"]"#,
            240,
        ),
        (
            18,
            "Foam Roll Back",
            "mobility",
            r#"["upper back"]"#,
            "beginner",
            Some("foam roller"),
            "Thoracic extension and soft-tissue work.",
            r#"["Roller across the upper back","Support your head","Roll slowly over tight spots"]"#,
            300,
        ),
    ];

    let entry_count = catalog.len();
    for (id, name, category, muscle_groups, difficulty, equipment, description, instructions, duration) in
        catalog
    {
        sqlx::query(
            r#"
            INSERT OR REPLACE INTO exercises
            (id, user_id, name, category, muscle_groups, difficulty, equipment,
             description, instructions, estimated_duration, is_custom, created_at)
            VALUES (?, NULL, ?, ?, ?, ?, ?, ?, ?, ?, 0,
                    COALESCE((SELECT created_at FROM exercises WHERE id = ?), datetime('now')))
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(category)
        .bind(muscle_groups)
        .bind(difficulty)
        .bind(equipment)
        .bind(description)
        .bind(instructions)
        .bind(duration)
        .bind(id)
        .execute(pool)
        .await?;
    }

    info!("Seeded {} built-in catalog exercises", entry_count);
    Ok(())
}
