//! Repository trait definitions for storage operations.
//!
//! Responsibilities are split across focused traits so implementations stay
//! small and testable.
//!
//! # Module Organization
//!
//! - [`error`]: Error types for repository operations
//! - [`entry`]: Production entry storage and status transitions
//! - [`user`]: User accounts and login sessions
//!
//! # Convenience Trait Bound
//!
//! For functions that need all repository capabilities, use the [`FullRepository`] trait bound:
//!
//! ```ignore
//! async fn my_service<R: FullRepository + ?Sized>(repo: &R) -> RepositoryResult<()> {
//!     let users = repo.list_users().await?;
//!     let entries = repo.list_entries(&EntryFilter::default()).await?;
//!     Ok(())
//! }
//! ```

pub mod entry;
pub mod error;
pub mod user;

// Re-export error types
pub use error::{ErrorContext, RepositoryError, RepositoryResult};

// Re-export all traits
pub use entry::EntryRepository;
pub use user::{SessionRepository, UserRepository};

/// Composite trait bound for a complete repository implementation.
///
/// Automatically implemented for any type that implements all three
/// repository traits.
pub trait FullRepository: EntryRepository + UserRepository + SessionRepository {}

// Blanket implementation: any type implementing all three traits automatically implements FullRepository
impl<T> FullRepository for T where T: EntryRepository + UserRepository + SessionRepository {}
