//! Production entry repository trait.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::api::{EntryId, EntryStatus, ProductionEntry};
use crate::db::models::{EntryFilter, StatusChange};

/// Repository trait for production entry storage.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait EntryRepository: Send + Sync {
    // ==================== Health & Connection ====================

    /// Check if the storage backend is healthy.
    ///
    /// # Returns
    /// - `Ok(true)` if healthy
    /// - `Ok(false)` if unhealthy but no error occurred
    async fn health_check(&self) -> RepositoryResult<bool>;

    // ==================== Entry Operations ====================

    /// Store a new entry. The `id` field is ignored and a fresh one assigned.
    ///
    /// # Returns
    /// * `Ok(ProductionEntry)` - The stored entry with its assigned ID
    async fn insert_entry(&self, entry: ProductionEntry) -> RepositoryResult<ProductionEntry>;

    /// Retrieve an entry by ID.
    ///
    /// # Returns
    /// * `Err(RepositoryError::NotFound)` - If the entry doesn't exist
    async fn get_entry(&self, entry_id: EntryId) -> RepositoryResult<ProductionEntry>;

    /// List entries matching a filter, ordered by ID.
    async fn list_entries(&self, filter: &EntryFilter) -> RepositoryResult<Vec<ProductionEntry>>;

    /// Replace an entry's stored data, provided it is still `PENDING`.
    ///
    /// # Returns
    /// * `Err(RepositoryError::NotFound)` - If the entry doesn't exist
    /// * `Err(RepositoryError::Conflict)` - If the stored entry is no longer pending
    async fn replace_pending_entry(&self, entry: &ProductionEntry) -> RepositoryResult<()>;

    /// Atomically move an entry from `expected` to the status in `change`.
    ///
    /// # Returns
    /// * `Ok(ProductionEntry)` - The updated entry
    /// * `Err(RepositoryError::Conflict)` - If the current status is not `expected`
    async fn transition_status(
        &self,
        entry_id: EntryId,
        expected: EntryStatus,
        change: StatusChange,
    ) -> RepositoryResult<ProductionEntry>;

    /// Delete an entry.
    ///
    /// # Returns
    /// * `Err(RepositoryError::NotFound)` - If the entry doesn't exist
    async fn delete_entry(&self, entry_id: EntryId) -> RepositoryResult<()>;
}
