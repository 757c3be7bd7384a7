//! In-memory local repository implementation.
//!
//! This module provides a local implementation of all repository traits
//! suitable for unit testing and local development. All data is stored in
//! memory, providing fast, deterministic, and isolated execution.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use crate::api::{EntryId, EntryStatus, ProductionEntry, User, UserId};
use crate::db::models::{EntryFilter, Session, StatusChange};
use crate::db::repository::*;

/// In-memory local repository.
///
/// Clones share the same underlying storage.
///
/// # Example
/// ```ignore
/// use oee_tracker::db::repositories::LocalRepository;
///
/// #[tokio::test]
/// async fn test_entry_storage() {
///     let repo = LocalRepository::new();
///     let users = repo.list_users().await.unwrap();
///     assert!(users.is_empty());
/// }
/// ```
#[derive(Clone)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
}

struct LocalData {
    entries: BTreeMap<EntryId, ProductionEntry>,
    users: BTreeMap<UserId, User>,
    sessions: HashMap<String, Session>,

    // ID counters
    next_entry_id: i64,
    next_user_id: i64,

    // Connection health
    is_healthy: bool,
}

impl Default for LocalData {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
            users: BTreeMap::new(),
            sessions: HashMap::new(),
            next_entry_id: 1,
            next_user_id: 1,
            is_healthy: true,
        }
    }
}

impl LocalRepository {
    /// Create a new empty local repository.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(LocalData::default())),
        }
    }

    /// Set the health status for testing connection failures.
    pub fn set_healthy(&self, healthy: bool) {
        self.data.write().is_healthy = healthy;
    }

    /// Clear all data from the repository.
    pub fn clear(&self) {
        let mut data = self.data.write();
        *data = LocalData {
            is_healthy: data.is_healthy,
            ..Default::default()
        };
    }

    /// Get the number of entries stored.
    pub fn entry_count(&self) -> usize {
        self.data.read().entries.len()
    }

    /// Get the number of live sessions.
    pub fn session_count(&self) -> usize {
        self.data.read().sessions.len()
    }

    /// Helper to check health and return error if unhealthy.
    fn check_health(&self) -> RepositoryResult<()> {
        if !self.data.read().is_healthy {
            return Err(RepositoryError::connection("Database is not healthy"));
        }
        Ok(())
    }

    fn entry_not_found(entry_id: EntryId) -> RepositoryError {
        RepositoryError::not_found_with_context(
            format!("Entry {} not found", entry_id),
            ErrorContext::default()
                .with_entity("entry")
                .with_entity_id(entry_id),
        )
    }

    fn user_not_found(user_id: UserId) -> RepositoryError {
        RepositoryError::not_found_with_context(
            format!("User {} not found", user_id),
            ErrorContext::default()
                .with_entity("user")
                .with_entity_id(user_id),
        )
    }
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EntryRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(self.data.read().is_healthy)
    }

    async fn insert_entry(&self, mut entry: ProductionEntry) -> RepositoryResult<ProductionEntry> {
        self.check_health()?;
        let mut data = self.data.write();
        let entry_id = EntryId(data.next_entry_id);
        data.next_entry_id += 1;
        entry.id = entry_id;
        data.entries.insert(entry_id, entry.clone());
        Ok(entry)
    }

    async fn get_entry(&self, entry_id: EntryId) -> RepositoryResult<ProductionEntry> {
        self.check_health()?;
        self.data
            .read()
            .entries
            .get(&entry_id)
            .cloned()
            .ok_or_else(|| Self::entry_not_found(entry_id))
    }

    async fn list_entries(&self, filter: &EntryFilter) -> RepositoryResult<Vec<ProductionEntry>> {
        self.check_health()?;
        Ok(self
            .data
            .read()
            .entries
            .values()
            .filter(|e| filter.matches(e))
            .cloned()
            .collect())
    }

    async fn replace_pending_entry(&self, entry: &ProductionEntry) -> RepositoryResult<()> {
        self.check_health()?;
        let mut data = self.data.write();
        let stored = data
            .entries
            .get_mut(&entry.id)
            .ok_or_else(|| Self::entry_not_found(entry.id))?;
        if stored.status != EntryStatus::Pending {
            return Err(RepositoryError::conflict_with_context(
                format!("Entry {} is already {}", entry.id, stored.status),
                ErrorContext::new("replace_pending_entry")
                    .with_entity("entry")
                    .with_entity_id(entry.id),
            ));
        }
        *stored = entry.clone();
        Ok(())
    }

    async fn transition_status(
        &self,
        entry_id: EntryId,
        expected: EntryStatus,
        change: StatusChange,
    ) -> RepositoryResult<ProductionEntry> {
        self.check_health()?;
        let mut data = self.data.write();
        let stored = data
            .entries
            .get_mut(&entry_id)
            .ok_or_else(|| Self::entry_not_found(entry_id))?;
        if stored.status != expected {
            return Err(RepositoryError::conflict_with_context(
                format!("Entry {} is already {}", entry_id, stored.status),
                ErrorContext::new("transition_status")
                    .with_entity("entry")
                    .with_entity_id(entry_id),
            ));
        }
        change.apply(stored);
        Ok(stored.clone())
    }

    async fn delete_entry(&self, entry_id: EntryId) -> RepositoryResult<()> {
        self.check_health()?;
        self.data
            .write()
            .entries
            .remove(&entry_id)
            .map(|_| ())
            .ok_or_else(|| Self::entry_not_found(entry_id))
    }
}

#[async_trait]
impl UserRepository for LocalRepository {
    async fn insert_user(&self, mut user: User) -> RepositoryResult<User> {
        self.check_health()?;
        let mut data = self.data.write();
        if data.users.values().any(|u| u.username == user.username) {
            return Err(RepositoryError::conflict_with_context(
                format!("Username '{}' is already taken", user.username),
                ErrorContext::new("insert_user").with_entity("user"),
            ));
        }
        let user_id = UserId(data.next_user_id);
        data.next_user_id += 1;
        user.id = user_id;
        data.users.insert(user_id, user.clone());
        Ok(user)
    }

    async fn get_user(&self, user_id: UserId) -> RepositoryResult<User> {
        self.check_health()?;
        self.data
            .read()
            .users
            .get(&user_id)
            .cloned()
            .ok_or_else(|| Self::user_not_found(user_id))
    }

    async fn find_user_by_username(&self, username: &str) -> RepositoryResult<Option<User>> {
        self.check_health()?;
        Ok(self
            .data
            .read()
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn list_users(&self) -> RepositoryResult<Vec<User>> {
        self.check_health()?;
        Ok(self.data.read().users.values().cloned().collect())
    }

    async fn update_user(&self, user: &User) -> RepositoryResult<()> {
        self.check_health()?;
        let mut data = self.data.write();
        let stored = data
            .users
            .get_mut(&user.id)
            .ok_or_else(|| Self::user_not_found(user.id))?;
        *stored = user.clone();
        Ok(())
    }

    async fn delete_user(&self, user_id: UserId) -> RepositoryResult<()> {
        self.check_health()?;
        self.data
            .write()
            .users
            .remove(&user_id)
            .map(|_| ())
            .ok_or_else(|| Self::user_not_found(user_id))
    }
}

#[async_trait]
impl SessionRepository for LocalRepository {
    async fn store_session(&self, session: Session) -> RepositoryResult<()> {
        self.check_health()?;
        let mut data = self.data.write();
        data.sessions.retain(|_, s| !s.is_expired(session.created_at));
        data.sessions.insert(session.token.clone(), session);
        Ok(())
    }

    async fn find_session(&self, token: &str) -> RepositoryResult<Option<Session>> {
        self.check_health()?;
        Ok(self.data.read().sessions.get(token).cloned())
    }

    async fn revoke_session(&self, token: &str) -> RepositoryResult<bool> {
        self.check_health()?;
        Ok(self.data.write().sessions.remove(token).is_some())
    }

    async fn revoke_user_sessions(&self, user_id: UserId) -> RepositoryResult<usize> {
        self.check_health()?;
        let mut data = self.data.write();
        let before = data.sessions.len();
        data.sessions.retain(|_, s| s.user_id != user_id);
        Ok(before - data.sessions.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ProductionType, Role};
    use chrono::{DateTime, Duration, NaiveDate, Utc};

    fn sample_entry(line: &str) -> ProductionEntry {
        let now = Utc::now();
        ProductionEntry {
            id: EntryId(0),
            date: NaiveDate::from_ymd_opt(2026, 10, 1).unwrap(),
            line: line.to_string(),
            shift: "Morning".to_string(),
            hour: "07:00-08:00".to_string(),
            model: "M-1".to_string(),
            production_type: ProductionType::Lh,
            available_time: 60,
            loss_time: 0,
            line_capacity: 100,
            good_parts: 90,
            rejects: 2,
            good_parts_lh: None,
            good_parts_rh: None,
            rejects_lh: None,
            rejects_rh: None,
            downtime_reason: None,
            remarks: None,
            status: EntryStatus::Pending,
            submitted_by: UserId(1),
            approved_by: None,
            approved_at: None,
            rejection_reason: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn sample_user(username: &str) -> User {
        User {
            id: UserId(0),
            username: username.to_string(),
            display_name: username.to_string(),
            role: Role::TeamLeader,
            active: true,
            password_hash: String::new(),
            created_at: Utc::now(),
        }
    }

    fn approve_change() -> StatusChange {
        StatusChange {
            status: EntryStatus::Approved,
            reviewed_by: UserId(2),
            reviewed_at: Utc::now(),
            rejection_reason: None,
        }
    }

    #[tokio::test]
    async fn test_insert_assigns_sequential_ids() {
        let repo = LocalRepository::new();
        let a = repo.insert_entry(sample_entry("L1")).await.unwrap();
        let b = repo.insert_entry(sample_entry("L2")).await.unwrap();
        assert_eq!(a.id, EntryId(1));
        assert_eq!(b.id, EntryId(2));
        assert_eq!(repo.entry_count(), 2);
    }

    #[tokio::test]
    async fn test_list_entries_with_filter() {
        let repo = LocalRepository::new();
        repo.insert_entry(sample_entry("L1")).await.unwrap();
        repo.insert_entry(sample_entry("L2")).await.unwrap();

        let filter = EntryFilter {
            line: Some("L2".to_string()),
            ..Default::default()
        };
        let found = repo.list_entries(&filter).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].line, "L2");
    }

    #[tokio::test]
    async fn test_transition_only_from_expected_status() {
        let repo = LocalRepository::new();
        let entry = repo.insert_entry(sample_entry("L1")).await.unwrap();

        let updated = repo
            .transition_status(entry.id, EntryStatus::Pending, approve_change())
            .await
            .unwrap();
        assert_eq!(updated.status, EntryStatus::Approved);
        assert_eq!(updated.approved_by, Some(UserId(2)));

        let again = repo
            .transition_status(entry.id, EntryStatus::Pending, approve_change())
            .await;
        assert!(matches!(again, Err(RepositoryError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_replace_rejected_after_review() {
        let repo = LocalRepository::new();
        let entry = repo.insert_entry(sample_entry("L1")).await.unwrap();
        repo.transition_status(entry.id, EntryStatus::Pending, approve_change())
            .await
            .unwrap();

        let result = repo.replace_pending_entry(&entry).await;
        assert!(matches!(result, Err(RepositoryError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_missing_entry_not_found() {
        let repo = LocalRepository::new();
        let result = repo.get_entry(EntryId(99)).await;
        assert!(matches!(result, Err(RepositoryError::NotFound { .. })));
        assert!(repo.delete_entry(EntryId(99)).await.is_err());
    }

    #[tokio::test]
    async fn test_duplicate_username_conflicts() {
        let repo = LocalRepository::new();
        repo.insert_user(sample_user("ana")).await.unwrap();
        let result = repo.insert_user(sample_user("ana")).await;
        assert!(matches!(result, Err(RepositoryError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_sessions_revoked_per_user() {
        let repo = LocalRepository::new();
        let now = Utc::now();
        for (token, user) in [("a", 1), ("b", 1), ("c", 2)] {
            repo.store_session(Session {
                token: token.to_string(),
                user_id: UserId(user),
                created_at: now,
                expires_at: now + Duration::hours(1),
            })
            .await
            .unwrap();
        }
        assert_eq!(repo.revoke_user_sessions(UserId(1)).await.unwrap(), 2);
        assert_eq!(repo.session_count(), 1);
        assert!(repo.find_session("c").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_store_session_purges_expired() {
        let repo = LocalRepository::new();
        let start = Utc::now();
        let session = |token: &str, created_at: DateTime<Utc>, hours: i64| Session {
            token: token.to_string(),
            user_id: UserId(1),
            created_at,
            expires_at: created_at + Duration::hours(hours),
        };

        repo.store_session(session("short", start, 1)).await.unwrap();
        repo.store_session(session("long", start, 48)).await.unwrap();
        assert_eq!(repo.session_count(), 2);

        let later = start + Duration::hours(2);
        repo.store_session(session("new", later, 1)).await.unwrap();
        assert_eq!(repo.session_count(), 2);
        assert!(repo.find_session("short").await.unwrap().is_none());
        assert!(repo.find_session("long").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_unhealthy_repository_fails() {
        let repo = LocalRepository::new();
        repo.set_healthy(false);
        assert!(!repo.health_check().await.unwrap());
        let result = repo.list_users().await;
        assert!(matches!(result, Err(RepositoryError::ConnectionError { .. })));
    }

    #[tokio::test]
    async fn test_clear_resets_ids() {
        let repo = LocalRepository::new();
        repo.insert_entry(sample_entry("L1")).await.unwrap();
        repo.clear();
        let entry = repo.insert_entry(sample_entry("L1")).await.unwrap();
        assert_eq!(entry.id, EntryId(1));
    }
}
