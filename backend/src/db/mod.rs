//! Storage layer for production entries, users and sessions.
//!
//! This module provides abstractions for storage operations via the Repository
//! pattern, so the workflow rules in [`services`] stay independent of where the
//! data lives.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Application Layer (REST API)                           │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Service Layer (services.rs) - Business Logic           │
//! │  - Entry approval workflow                              │
//! │  - User administration and sessions                     │
//! │  - Dashboard orchestration                              │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Repository Traits (repository/) - Abstract Interface   │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//!     ┌──────────────────────────────────────────────┐
//!     │             Local Repository                  │
//!     │               (in-memory)                     │
//!     └──────────────────────────────────────────────┘
//! ```
//!
//! # Recommended Usage
//!
//! ```ignore
//! use oee_tracker::db::{self, services};
//!
//! async fn example() -> anyhow::Result<()> {
//!     let repo = db::get_repository()?;
//!     let healthy = services::health_check(repo.as_ref()).await?;
//!     Ok(())
//! }
//! ```

#[cfg(not(feature = "local-repo"))]
compile_error!("Enable at least one repository backend feature.");

pub mod models;
pub mod password;
pub mod repositories;
pub mod repository;
pub mod services;


// ==================== Service Layer ====================

pub use services::{
    authenticate, create_user, dashboard, delete_entry, delete_user, edit_entry, entry_with_oee,
    ensure_bootstrap_admin, get_entry, get_entry_oee, health_check, list_entries, list_users,
    login, logout, review_entry, submit_entry, update_user, ReviewDecision,
};

// ==================== Repository Pattern Exports ====================

pub use models::{EntryFilter, Session, StatusChange};
pub use password::{hash_password, verify_password};
pub use repositories::LocalRepository;
pub use repository::{
    EntryRepository, ErrorContext, FullRepository, RepositoryError, RepositoryResult,
    SessionRepository, UserRepository,
};

use anyhow::{Context, Result};
use std::sync::{Arc, OnceLock};

/// Global repository instance initialized once per process.
static REPOSITORY: OnceLock<Arc<dyn FullRepository>> = OnceLock::new();

fn create_selected_repository() -> Arc<dyn FullRepository> {
    Arc::new(LocalRepository::new())
}

/// Initialize the global repository singleton for the selected backend.
pub fn init_repository() -> Result<()> {
    if REPOSITORY.get().is_some() {
        return Ok(());
    }

    let _ = REPOSITORY.set(create_selected_repository());
    Ok(())
}

/// Get a reference to the global repository instance.
pub fn get_repository() -> Result<&'static Arc<dyn FullRepository>> {
    if REPOSITORY.get().is_none() {
        init_repository()?;
    }

    REPOSITORY
        .get()
        .context("Repository not initialized. Call init_repository() first.")
}
