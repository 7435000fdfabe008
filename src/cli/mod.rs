//! CLI module for the ironlog command-line interface.
//!
//! Provides subcommands for interacting with a running ironlog server:
//! - `status` - Check server health
//! - `login <email>` - Obtain a session token
//! - `workouts list` / `templates list` / `exercises list` / `logs list`
//! - `stats` - Show the progress dashboard numbers
//! - `backup export/import` - JSON snapshot of all resources
//! - `config check` - Validate configuration file

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use reqwest::Client;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::time::Duration;

use crate::client::{token_expired, BackupSnapshot, ResourceStore};
use crate::db::{
    ExerciseRef, ExerciseResponse, TemplateResponse, WorkoutLogResponse, WorkoutResponse,
};

/// CLI arguments structure
#[derive(Parser, Debug)]
#[command(name = "ironlog")]
#[command(author, version, about = "A self-hosted workout planning and progress tracking server", long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "ironlog.toml")]
    pub config: PathBuf,

    /// Override log level
    #[arg(short, long)]
    pub log_level: Option<String>,

    /// API URL to connect to (default: http://localhost:8080)
    #[arg(long, env = "IRONLOG_API_URL", default_value = "http://localhost:8080")]
    pub api_url: String,

    /// Session token (can also be set via IRONLOG_TOKEN env var)
    #[arg(long, env = "IRONLOG_TOKEN")]
    pub token: Option<String>,

    /// Account email used to address your rows
    #[arg(long, env = "IRONLOG_USER")]
    pub user: Option<String>,

    /// Subcommand to run (if none, starts the server)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check server health
    Status,

    /// Log in and print a session token
    Login {
        /// Account email
        email: String,
        /// Account password
        #[arg(long, env = "IRONLOG_PASSWORD")]
        password: String,
    },

    /// Workout commands
    #[command(subcommand)]
    Workouts(ListCommands),

    /// Template commands
    #[command(subcommand)]
    Templates(ListCommands),

    /// Exercise library commands
    #[command(subcommand)]
    Exercises(ListCommands),

    /// Workout log commands
    #[command(subcommand)]
    Logs(ListCommands),

    /// Show progress dashboard numbers
    Stats,

    /// Backup commands
    #[command(subcommand)]
    Backup(BackupCommands),

    /// Configuration management commands
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand, Debug)]
pub enum ListCommands {
    /// List all rows
    List,
}

#[derive(Subcommand, Debug)]
pub enum BackupCommands {
    /// Write a JSON snapshot of all resources
    Export {
        /// Output file
        #[arg(short, long, default_value = "ironlog-backup.json")]
        out: PathBuf,
    },
    /// Replay a JSON snapshot through the API
    Import {
        /// Snapshot file
        file: PathBuf,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Validate configuration file
    Check,
}

// ============================================================================
// API Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
struct WorkoutList {
    workouts: Vec<WorkoutResponse>,
}

#[derive(Debug, Deserialize)]
struct TemplateList {
    templates: Vec<TemplateResponse>,
}

#[derive(Debug, Deserialize)]
struct ExerciseList {
    exercises: Vec<ExerciseResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WorkoutLogList {
    workout_logs: Vec<WorkoutLogResponse>,
}

#[derive(Debug, Deserialize)]
struct LoginReply {
    token: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatsReply {
    total_workouts: i64,
    completed_workouts: i64,
    completion_rate: f64,
    weekly: Vec<WeeklyReply>,
    monthly: Vec<MonthlyReply>,
    top_exercises: Vec<TopExerciseReply>,
    categories: CategoriesReply,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WeeklyReply {
    week_start: String,
    workouts: i64,
    minutes: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MonthlyReply {
    year: i32,
    month: u32,
    workouts: i64,
    minutes: i64,
    avg_effort: f64,
}

#[derive(Debug, Deserialize)]
struct TopExerciseReply {
    name: String,
    count: i64,
}

#[derive(Debug, Deserialize)]
struct CategoriesReply {
    cardio: i64,
    strength: i64,
    mixed: i64,
}

/// API error envelope
#[derive(Debug, Deserialize)]
struct ApiErrorReply {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

// ============================================================================
// CLI Command Handlers
// ============================================================================

/// Create an HTTP client with the given token
fn create_client(token: Option<&str>) -> Result<Client> {
    let mut headers = reqwest::header::HeaderMap::new();
    if let Some(token) = token {
        headers.insert(
            reqwest::header::AUTHORIZATION,
            format!("Bearer {}", token)
                .parse()
                .context("Invalid token format")?,
        );
    }

    Client::builder()
        .default_headers(headers)
        .timeout(Duration::from_secs(30))
        .build()
        .context("Failed to create HTTP client")
}

/// Check the stored session the way the web client does: inspect the
/// token expiry locally and drop the session instead of sending doomed
/// requests.
fn require_session(cli: &Cli) -> Result<(&str, &str)> {
    let token = cli
        .token
        .as_deref()
        .context("Not logged in. Run `ironlog login <email>` and export IRONLOG_TOKEN")?;
    if token_expired(token) {
        bail!("Session expired. Run `ironlog login <email>` to start a new one");
    }
    let user = cli
        .user
        .as_deref()
        .context("No account email set. Pass --user or export IRONLOG_USER")?;
    Ok((token, user))
}

/// Turn a failed response into an error carrying the server's message.
async fn api_error(response: reqwest::Response) -> anyhow::Error {
    let status = response.status();
    match response.json::<ApiErrorReply>().await {
        Ok(reply) => anyhow::anyhow!("Server returned {}: {}", status, reply.error.message),
        Err(_) => anyhow::anyhow!("Server returned {}", status),
    }
}

/// Run a CLI command
pub async fn run_command(cli: &Cli) -> Result<()> {
    match &cli.command {
        Some(Commands::Status) => cmd_status(cli).await,
        Some(Commands::Login { email, password }) => cmd_login(cli, email, password).await,
        Some(Commands::Workouts(ListCommands::List)) => cmd_workouts_list(cli).await,
        Some(Commands::Templates(ListCommands::List)) => cmd_templates_list(cli).await,
        Some(Commands::Exercises(ListCommands::List)) => cmd_exercises_list(cli).await,
        Some(Commands::Logs(ListCommands::List)) => cmd_logs_list(cli).await,
        Some(Commands::Stats) => cmd_stats(cli).await,
        Some(Commands::Backup(BackupCommands::Export { out })) => cmd_backup_export(cli, out).await,
        Some(Commands::Backup(BackupCommands::Import { file })) => {
            cmd_backup_import(cli, file).await
        }
        Some(Commands::Config(ConfigCommands::Check)) => cmd_config_check(cli),
        None => {
            // No subcommand means start the server - handled in main.rs
            Ok(())
        }
    }
}

/// Check server health
async fn cmd_status(cli: &Cli) -> Result<()> {
    let client = create_client(None)?;
    let url = format!("{}/health", cli.api_url);

    let response = client
        .get(&url)
        .send()
        .await
        .context("Failed to connect to server. Is ironlog running?")?;

    if response.status().is_success() {
        println!("Server at {} is healthy", cli.api_url);
        Ok(())
    } else {
        bail!("Server returned {}", response.status());
    }
}

/// Log in and print the session token
async fn cmd_login(cli: &Cli, email: &str, password: &str) -> Result<()> {
    let client = create_client(None)?;
    let url = format!("{}/api/auth/login", cli.api_url);

    let response = client
        .post(&url)
        .json(&serde_json::json!({ "email": email, "password": password }))
        .send()
        .await
        .context("Failed to connect to server")?;

    if !response.status().is_success() {
        return Err(api_error(response).await);
    }

    let reply: LoginReply = response.json().await.context("Invalid login response")?;
    println!("export IRONLOG_TOKEN={}", reply.token);
    println!("export IRONLOG_USER={}", email);
    Ok(())
}

/// Fetch one resource list
async fn fetch_list<T: serde::de::DeserializeOwned>(
    client: &Client,
    api_url: &str,
    resource: &str,
    user: &str,
) -> Result<T> {
    let url = format!("{}/api/{}", api_url, resource);
    let response = client
        .get(&url)
        .query(&[("user", user)])
        .send()
        .await
        .with_context(|| format!("Failed to fetch {}", resource))?;

    if !response.status().is_success() {
        return Err(api_error(response).await);
    }

    response
        .json::<T>()
        .await
        .with_context(|| format!("Invalid {} response", resource))
}

/// The page-load fetch: all four lists joined all-or-nothing. One failing
/// request blanks every store for the session rather than leaving a
/// partially populated view.
async fn hydrate_all(
    client: &Client,
    api_url: &str,
    user: &str,
    workouts: &mut ResourceStore<WorkoutResponse>,
    templates: &mut ResourceStore<TemplateResponse>,
    exercises: &mut ResourceStore<ExerciseResponse>,
    logs: &mut ResourceStore<WorkoutLogResponse>,
) -> Result<()> {
    let joined = tokio::try_join!(
        fetch_list::<WorkoutList>(client, api_url, "workouts", user),
        fetch_list::<TemplateList>(client, api_url, "templates", user),
        fetch_list::<ExerciseList>(client, api_url, "exercises", user),
        fetch_list::<WorkoutLogList>(client, api_url, "workout-logs", user),
    );

    match joined {
        Ok((w, t, e, l)) => {
            workouts.hydrate(w.workouts);
            templates.hydrate(t.templates);
            exercises.hydrate(e.exercises);
            logs.hydrate(l.workout_logs);
            Ok(())
        }
        Err(err) => {
            tracing::error!("Hydrate failed, clearing local state: {}", err);
            workouts.clear();
            templates.clear();
            exercises.clear();
            logs.clear();
            Err(err)
        }
    }
}

async fn cmd_workouts_list(cli: &Cli) -> Result<()> {
    let (token, user) = require_session(cli)?;
    let client = create_client(Some(token))?;
    let list: WorkoutList = fetch_list(&client, &cli.api_url, "workouts", user).await?;

    if list.workouts.is_empty() {
        println!("No workouts scheduled");
        return Ok(());
    }

    println!("{:<6} {:<12} {:<28} {:<10} {}", "ID", "DATE", "NAME", "DONE", "EXERCISES");
    for w in &list.workouts {
        println!(
            "{:<6} {:<12} {:<28} {:<10} {}",
            w.id,
            w.date,
            w.name,
            if w.completed { "yes" } else { "no" },
            w.exercises.len()
        );
    }
    Ok(())
}

async fn cmd_templates_list(cli: &Cli) -> Result<()> {
    let (token, user) = require_session(cli)?;
    let client = create_client(Some(token))?;
    let list: TemplateList = fetch_list(&client, &cli.api_url, "templates", user).await?;

    if list.templates.is_empty() {
        println!("No templates");
        return Ok(());
    }

    println!("{:<6} {:<28} {:<14} {}", "ID", "NAME", "CATEGORY", "EXERCISES");
    for t in &list.templates {
        println!(
            "{:<6} {:<28} {:<14} {}",
            t.id,
            t.name,
            t.category.as_deref().unwrap_or("-"),
            t.exercises.len()
        );
    }
    Ok(())
}

async fn cmd_exercises_list(cli: &Cli) -> Result<()> {
    let (token, user) = require_session(cli)?;
    let client = create_client(Some(token))?;
    let list: ExerciseList = fetch_list(&client, &cli.api_url, "exercises", user).await?;

    println!("{:<6} {:<28} {:<12} {:<12} {}", "ID", "NAME", "CATEGORY", "LEVEL", "CUSTOM");
    for e in &list.exercises {
        println!(
            "{:<6} {:<28} {:<12} {:<12} {}",
            e.id,
            e.name,
            e.category,
            e.difficulty,
            if e.is_custom { "yes" } else { "" }
        );
    }
    Ok(())
}

async fn cmd_logs_list(cli: &Cli) -> Result<()> {
    let (token, user) = require_session(cli)?;
    let client = create_client(Some(token))?;
    let list: WorkoutLogList = fetch_list(&client, &cli.api_url, "workout-logs", user).await?;

    if list.workout_logs.is_empty() {
        println!("No workout logs");
        return Ok(());
    }

    println!("{:<6} {:<26} {:<10} {}", "ID", "COMPLETED", "MINUTES", "EFFORT");
    for l in &list.workout_logs {
        println!(
            "{:<6} {:<26} {:<10} {}",
            l.id,
            l.completed_at,
            l.duration.unwrap_or(0) / 60,
            l.overall_effort
                .map(|e| e.to_string())
                .unwrap_or_else(|| "-".to_string())
        );
    }
    Ok(())
}

/// Show the progress dashboard numbers
async fn cmd_stats(cli: &Cli) -> Result<()> {
    let (token, user) = require_session(cli)?;
    let client = create_client(Some(token))?;

    let url = format!("{}/api/stats", cli.api_url);
    let response = client
        .get(&url)
        .query(&[("user", user)])
        .send()
        .await
        .context("Failed to fetch stats")?;

    if !response.status().is_success() {
        return Err(api_error(response).await);
    }

    let stats: StatsReply = response.json().await.context("Invalid stats response")?;

    println!(
        "Workouts: {} scheduled, {} completed ({:.0}%)",
        stats.total_workouts,
        stats.completed_workouts,
        stats.completion_rate * 100.0
    );
    println!(
        "Categories: {} strength / {} cardio / {} mixed",
        stats.categories.strength, stats.categories.cardio, stats.categories.mixed
    );

    println!("\nLast 8 weeks:");
    for week in &stats.weekly {
        println!(
            "  {}  {:>3} workouts  {:>5} min",
            week.week_start, week.workouts, week.minutes
        );
    }

    println!("\nLast 6 months:");
    for month in &stats.monthly {
        println!(
            "  {:04}-{:02}  {:>3} workouts  {:>5} min  effort {:.1}",
            month.year, month.month, month.workouts, month.minutes, month.avg_effort
        );
    }

    if !stats.top_exercises.is_empty() {
        println!("\nTop exercises:");
        for top in &stats.top_exercises {
            println!("  {:<28} {}", top.name, top.count);
        }
    }

    Ok(())
}

/// Export a JSON snapshot of all resources
async fn cmd_backup_export(cli: &Cli, out: &PathBuf) -> Result<()> {
    let (token, user) = require_session(cli)?;
    let client = create_client(Some(token))?;

    let mut workouts = ResourceStore::new();
    let mut templates = ResourceStore::new();
    let mut exercises = ResourceStore::new();
    let mut logs = ResourceStore::new();

    hydrate_all(
        &client,
        &cli.api_url,
        user,
        &mut workouts,
        &mut templates,
        &mut exercises,
        &mut logs,
    )
    .await?;

    let snapshot = BackupSnapshot {
        exported_at: chrono::Utc::now().to_rfc3339(),
        user: user.to_string(),
        workouts: workouts.items().to_vec(),
        templates: templates.items().to_vec(),
        exercises: exercises.items().to_vec(),
        workout_logs: logs.items().to_vec(),
    };

    let json = serde_json::to_string_pretty(&snapshot)?;
    std::fs::write(out, json)
        .with_context(|| format!("Failed to write {}", out.display()))?;

    println!(
        "Exported {} workouts, {} templates, {} exercises, {} logs to {}",
        snapshot.workouts.len(),
        snapshot.templates.len(),
        snapshot.exercises.len(),
        snapshot.workout_logs.len(),
        out.display()
    );
    Ok(())
}

/// Replay a JSON snapshot through the API
async fn cmd_backup_import(cli: &Cli, file: &PathBuf) -> Result<()> {
    let (token, user) = require_session(cli)?;
    let client = create_client(Some(token))?;

    let content = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let snapshot: BackupSnapshot =
        serde_json::from_str(&content).context("Invalid backup snapshot")?;

    // Custom exercises first so restored workouts can reference them.
    // Built-ins are seeded server-side and skipped here; their ids are
    // stable across installs. Customs get fresh ids, so remember the
    // mapping to rewrite references below.
    let mut id_map: HashMap<i64, i64> = HashMap::new();
    let mut imported_exercises = 0;
    for exercise in snapshot.exercises.iter().filter(|e| e.is_custom) {
        let body = serde_json::json!({
            "userEmail": user,
            "name": exercise.name,
            "category": exercise.category,
            "muscleGroups": exercise.muscle_groups,
            "difficulty": exercise.difficulty,
            "equipment": exercise.equipment,
            "description": exercise.description,
            "instructions": exercise.instructions,
            "estimatedDuration": exercise.estimated_duration,
            "imageUrl": exercise.image_url,
        });
        let response = client
            .post(format!("{}/api/exercises", cli.api_url))
            .json(&body)
            .send()
            .await
            .context("Failed to import exercise")?;
        if !response.status().is_success() {
            return Err(api_error(response).await);
        }
        #[derive(Deserialize)]
        struct Envelope {
            exercise: ExerciseResponse,
        }
        let envelope: Envelope = response.json().await.context("Invalid exercise response")?;
        id_map.insert(exercise.id, envelope.exercise.id);
        imported_exercises += 1;
    }

    // References to exercises that no longer exist anywhere are stripped
    // down to their inline name so the server accepts the row.
    let catalog: ExerciseList = fetch_list(&client, &cli.api_url, "exercises", user).await?;
    let valid_ids: HashSet<i64> = catalog.exercises.iter().map(|e| e.id).collect();

    let mut store: ResourceStore<WorkoutResponse> = ResourceStore::new();
    store.hydrate(Vec::new());
    for workout in snapshot.workouts.iter().rev() {
        let body = serde_json::json!({
            "userEmail": user,
            "date": workout.date,
            "name": workout.name,
            "exercises": remap_exercise_refs(&workout.exercises, &id_map, &valid_ids),
            "completed": workout.completed,
            "duration": workout.duration,
            "notes": workout.notes,
        });
        let response = client
            .post(format!("{}/api/workouts", cli.api_url))
            .json(&body)
            .send()
            .await
            .context("Failed to import workout")?;
        if !response.status().is_success() {
            return Err(api_error(response).await);
        }
        #[derive(Deserialize)]
        struct Envelope {
            workout: WorkoutResponse,
        }
        let envelope: Envelope = response.json().await.context("Invalid workout response")?;
        store.insert(envelope.workout);
    }

    let mut imported_templates = 0;
    for template in snapshot.templates.iter().rev() {
        let body = serde_json::json!({
            "userEmail": user,
            "name": template.name,
            "category": template.category,
            "exercises": remap_exercise_refs(&template.exercises, &id_map, &valid_ids),
        });
        let response = client
            .post(format!("{}/api/templates", cli.api_url))
            .json(&body)
            .send()
            .await
            .context("Failed to import template")?;
        if !response.status().is_success() {
            return Err(api_error(response).await);
        }
        imported_templates += 1;
    }

    let mut imported_logs = 0;
    for log in snapshot.workout_logs.iter().rev() {
        let body = serde_json::json!({
            "userEmail": user,
            "workoutId": log.workout_id,
            "completedAt": log.completed_at,
            "duration": log.duration,
            "exercises": log.exercises,
            "notes": log.notes,
            "overallEffort": log.overall_effort,
        });
        let response = client
            .post(format!("{}/api/workout-logs", cli.api_url))
            .json(&body)
            .send()
            .await
            .context("Failed to import workout log")?;
        if !response.status().is_success() {
            return Err(api_error(response).await);
        }
        imported_logs += 1;
    }

    println!(
        "Imported {} workouts, {} templates, {} custom exercises, {} logs",
        store.len(),
        imported_templates,
        imported_exercises,
        imported_logs
    );
    Ok(())
}

/// Rewrite exercise references for a restored row: remap custom ids to
/// their freshly assigned ones, keep ids the server still knows, and
/// strip the rest down to their inline name.
fn remap_exercise_refs(
    refs: &[ExerciseRef],
    id_map: &HashMap<i64, i64>,
    valid_ids: &HashSet<i64>,
) -> Vec<ExerciseRef> {
    refs.iter()
        .map(|r| {
            let mut r = r.clone();
            if let Some(id) = r.exercise_id {
                if let Some(new_id) = id_map.get(&id) {
                    r.exercise_id = Some(*new_id);
                } else if !valid_ids.contains(&id) {
                    r.exercise_id = None;
                }
            }
            r
        })
        .collect()
}

/// Validate configuration file
fn cmd_config_check(cli: &Cli) -> Result<()> {
    let config = crate::config::Config::load(&cli.config)?;
    println!("Configuration OK");
    println!("  server: {}:{}", config.server.host, config.server.port);
    println!("  data dir: {}", config.server.data_dir.display());
    println!("  uploads dir: {}", config.uploads.dir.display());
    println!("  token ttl: {} days", config.auth.token_ttl_days);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remap_exercise_refs() {
        let refs = vec![
            ExerciseRef {
                exercise_id: Some(100),
                ..Default::default()
            },
            ExerciseRef {
                exercise_id: Some(1),
                ..Default::default()
            },
            ExerciseRef {
                exercise_id: Some(555),
                name: Some("Gone Exercise".to_string()),
                ..Default::default()
            },
            ExerciseRef {
                name: Some("Inline Only".to_string()),
                ..Default::default()
            },
        ];

        let mut id_map = HashMap::new();
        id_map.insert(100, 23);
        let valid_ids: HashSet<i64> = [1, 23].into_iter().collect();

        let remapped = remap_exercise_refs(&refs, &id_map, &valid_ids);

        // Custom id remapped to its fresh id
        assert_eq!(remapped[0].exercise_id, Some(23));
        // Built-in id the server knows survives untouched
        assert_eq!(remapped[1].exercise_id, Some(1));
        // Dangling id falls back to the inline name
        assert_eq!(remapped[2].exercise_id, None);
        assert_eq!(remapped[2].name.as_deref(), Some("Gone Exercise"));
        // Name-only entries pass through
        assert_eq!(remapped[3].exercise_id, None);
    }
}
