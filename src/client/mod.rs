//! Client-side state kept by the CLI between requests.
//!
//! Mirrors how the web client manages per-resource lists: fetch-all at
//! most once per session, then splice the server's canonical rows into
//! the local list after each mutation. Deletes are optimistic — the row
//! disappears locally before the request, and the exact pre-delete
//! snapshot comes back if the server refuses.

use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::api::auth::Claims;
use crate::db::{ExerciseResponse, TemplateResponse, WorkoutLogResponse, WorkoutResponse};

/// Anything held in a [`ResourceStore`] exposes its row id.
pub trait HasId {
    fn id(&self) -> i64;
}

impl HasId for WorkoutResponse {
    fn id(&self) -> i64 {
        self.id
    }
}

impl HasId for TemplateResponse {
    fn id(&self) -> i64 {
        self.id
    }
}

impl HasId for ExerciseResponse {
    fn id(&self) -> i64 {
        self.id
    }
}

impl HasId for WorkoutLogResponse {
    fn id(&self) -> i64 {
        self.id
    }
}

/// Snapshot retained while a speculative mutation is in flight.
#[derive(Debug)]
pub struct Speculation<T> {
    snapshot: Vec<T>,
}

/// An in-memory list of one resource with the splice operations the web
/// client performs after each CRUD round trip.
#[derive(Debug)]
pub struct ResourceStore<T> {
    items: Vec<T>,
    fetched: bool,
}

impl<T> Default for ResourceStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ResourceStore<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            fetched: false,
        }
    }

    /// True until the first hydrate; the session-wide fetch guard.
    pub fn needs_fetch(&self) -> bool {
        !self.fetched
    }

    /// Load the fetched rows. Marks the store fetched so a second page
    /// visit does not refetch.
    pub fn hydrate(&mut self, items: Vec<T>) {
        self.items = items;
        self.fetched = true;
    }

    /// Failure path: drop everything but stay "fetched" — the session
    /// renders empty rather than retrying.
    pub fn clear(&mut self) {
        self.items.clear();
        self.fetched = true;
    }

    /// Logout teardown: forget the data and the fetch guard.
    pub fn reset(&mut self) {
        self.items.clear();
        self.fetched = false;
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Splice a freshly created row in at the head.
    pub fn insert(&mut self, item: T) {
        self.items.insert(0, item);
    }
}

impl<T: Clone + HasId> ResourceStore<T> {
    /// Replace the row with the same id in place; rows the store does not
    /// know are ignored.
    pub fn replace(&mut self, item: T) {
        if let Some(existing) = self.items.iter_mut().find(|i| i.id() == item.id()) {
            *existing = item;
        }
    }

    /// Drop the row with the given id.
    pub fn remove(&mut self, id: i64) {
        self.items.retain(|i| i.id() != id);
    }

    /// Apply a mutation speculatively, keeping the pre-mutation snapshot.
    /// Drop the returned [`Speculation`] to commit, or pass it to
    /// [`ResourceStore::rollback`] when the server reports failure.
    pub fn speculate<F>(&mut self, mutation: F) -> Speculation<T>
    where
        F: FnOnce(&mut Vec<T>),
    {
        let snapshot = self.items.clone();
        mutation(&mut self.items);
        Speculation { snapshot }
    }

    /// Optimistically remove a row ahead of the network call.
    pub fn speculate_remove(&mut self, id: i64) -> Speculation<T> {
        self.speculate(|items| items.retain(|i| i.id() != id))
    }

    /// Restore the exact pre-mutation list, order and contents.
    pub fn rollback(&mut self, speculation: Speculation<T>) {
        self.items = speculation.snapshot;
    }
}

/// Inspect a bearer token's expiry without the signing secret, the way
/// the browser client decides whether a stored session is still usable.
/// Unparseable tokens count as expired.
pub fn token_expired(token: &str) -> bool {
    let mut validation = Validation::default();
    validation.insecure_disable_signature_validation();
    decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validation).is_err()
}

/// On-disk JSON snapshot produced by `backup export` and consumed by
/// `backup import`.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupSnapshot {
    pub exported_at: String,
    pub user: String,
    #[serde(default)]
    pub workouts: Vec<WorkoutResponse>,
    #[serde(default)]
    pub templates: Vec<TemplateResponse>,
    #[serde(default)]
    pub exercises: Vec<ExerciseResponse>,
    #[serde(default)]
    pub workout_logs: Vec<WorkoutLogResponse>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn workout(id: i64, name: &str) -> WorkoutResponse {
        WorkoutResponse {
            id,
            user_id: 1,
            date: "2024-03-18".to_string(),
            name: name.to_string(),
            exercises: vec![],
            completed: false,
            duration: None,
            notes: None,
            created_at: "2024-01-01 00:00:00".to_string(),
        }
    }

    #[test]
    fn test_fetch_guard() {
        let mut store: ResourceStore<WorkoutResponse> = ResourceStore::new();
        assert!(store.needs_fetch());

        store.hydrate(vec![workout(1, "a")]);
        assert!(!store.needs_fetch());
        assert_eq!(store.len(), 1);

        // A failure blanks the list but does not re-arm the fetch
        store.clear();
        assert!(store.is_empty());
        assert!(!store.needs_fetch());

        // Logout does
        store.reset();
        assert!(store.needs_fetch());
    }

    #[test]
    fn test_splice_operations() {
        let mut store = ResourceStore::new();
        store.hydrate(vec![workout(1, "a"), workout(2, "b")]);

        // Create inserts at head
        store.insert(workout(3, "c"));
        let ids: Vec<i64> = store.items().iter().map(|w| w.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);

        // Update replaces in place
        store.replace(workout(1, "a-renamed"));
        assert_eq!(store.items()[1].name, "a-renamed");
        let ids: Vec<i64> = store.items().iter().map(|w| w.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);

        // Replacing an unknown id is a no-op
        store.replace(workout(99, "ghost"));
        assert_eq!(store.len(), 3);

        // Delete filters out
        store.remove(1);
        let ids: Vec<i64> = store.items().iter().map(|w| w.id).collect();
        assert_eq!(ids, vec![3, 2]);
    }

    #[test]
    fn test_failed_optimistic_delete_restores_exact_list() {
        let mut store = ResourceStore::new();
        let original = vec![workout(1, "a"), workout(2, "b"), workout(3, "c")];
        store.hydrate(original.clone());

        let speculation = store.speculate_remove(2);
        let ids: Vec<i64> = store.items().iter().map(|w| w.id).collect();
        assert_eq!(ids, vec![1, 3]);

        // Server said no: the pre-delete list comes back, order and all
        store.rollback(speculation);
        let restored: Vec<(i64, String)> = store
            .items()
            .iter()
            .map(|w| (w.id, w.name.clone()))
            .collect();
        let expected: Vec<(i64, String)> = original
            .iter()
            .map(|w| (w.id, w.name.clone()))
            .collect();
        assert_eq!(restored, expected);
    }

    #[test]
    fn test_committed_delete_keeps_mutation() {
        let mut store = ResourceStore::new();
        store.hydrate(vec![workout(1, "a"), workout(2, "b")]);

        let speculation = store.speculate_remove(1);
        drop(speculation);
        let ids: Vec<i64> = store.items().iter().map(|w| w.id).collect();
        assert_eq!(ids, vec![2]);
    }

    #[test]
    fn test_token_expired() {
        use crate::api::auth::issue_token;
        use crate::config::AuthConfig;
        use crate::db::User;

        let user = User {
            id: 1,
            email: "lifter@example.com".to_string(),
            name: "Lifter".to_string(),
            password_hash: String::new(),
            created_at: "2024-01-01 00:00:00".to_string(),
        };

        let live = AuthConfig {
            jwt_secret: "secret".to_string(),
            token_ttl_days: 7,
        };
        let token = issue_token(&live, &user).unwrap();
        assert!(!token_expired(&token));

        let stale = AuthConfig {
            jwt_secret: "secret".to_string(),
            token_ttl_days: -1,
        };
        let token = issue_token(&stale, &user).unwrap();
        assert!(token_expired(&token));

        assert!(token_expired("not-a-token"));
        assert!(token_expired(""));
    }

    #[test]
    fn test_backup_snapshot_roundtrip() {
        let snapshot = BackupSnapshot {
            exported_at: "2024-03-20T12:00:00Z".to_string(),
            user: "lifter@example.com".to_string(),
            workouts: vec![workout(1, "a")],
            templates: vec![],
            exercises: vec![],
            workout_logs: vec![],
        };
        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(json.contains("\"workoutLogs\""));
        let parsed: BackupSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.workouts.len(), 1);
        assert_eq!(parsed.workouts[0].name, "a");
    }
}
