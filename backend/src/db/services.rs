//! High-level service layer over the repository traits.
//!
//! These functions hold the workflow rules that must be identical for every
//! storage backend: who may submit, edit and review entries, the one-way
//! approval lifecycle, user administration and session handling.
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
//! │  - Role and ownership checks                            │
//! │  - Entry approval lifecycle                             │
//! │  - Sessions and password verification                   │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Repository Traits (repository/) - Abstract Interface   │
//! │  - EntryRepository                                      │
//! │  - UserRepository / SessionRepository                   │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//!         ┌───────────▼─────────────┐
//!         │ Local Repository        │
//!         │ (in-memory)             │
//!         └─────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```no_run
//! use oee_tracker::db::{services, repositories::LocalRepository};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let repo = LocalRepository::new();
//!     let healthy = services::health_check(&repo).await?;
//!     println!("healthy: {}", healthy);
//!     Ok(())
//! }
//! ```

use chrono::{DateTime, Duration, Utc};
use log::{info, warn};
use uuid::Uuid;

use super::models::{EntryFilter, Session, StatusChange};
use super::password::{hash_password, verify_password};
use super::repository::{ErrorContext, FullRepository, RepositoryError, RepositoryResult};
use crate::api::{
    AnalyticsSummary, DailyTrendPoint, DashboardData, EntryId, EntryOee, EntryStatus,
    EntryWithOee, LinePerformance, ModelPerformance, NewEntry, NewUser, ProductionEntry, Role,
    ShiftAnalytics, User, UserId, UserUpdate,
};
use crate::services::analytics::{
    approved_within, compute_daily_trend, compute_dashboard, compute_line_performance,
    compute_model_performance, compute_shift_analytics, compute_summary, AnalyticsWindows,
};
use crate::services::oee::{get_oee_category, OeeMetrics};

/// A supervisor's decision on a pending entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewDecision {
    Approve,
    Reject { reason: Option<String> },
}

impl ReviewDecision {
    fn target_status(&self) -> EntryStatus {
        match self {
            ReviewDecision::Approve => EntryStatus::Approved,
            ReviewDecision::Reject { .. } => EntryStatus::Rejected,
        }
    }
}

fn denied(operation: &str, actor: &User) -> RepositoryError {
    RepositoryError::PermissionDenied {
        message: format!("Role {} may not {}", actor.role, operation.replace('_', " ")),
        context: ErrorContext::new(operation)
            .with_entity("user")
            .with_entity_id(actor.id),
    }
}

fn is_owner(actor: &User, entry: &ProductionEntry) -> bool {
    entry.submitted_by == actor.id
}

// ==================== Health & Connection ====================

/// Check if the storage backend is healthy.
pub async fn health_check<R: FullRepository + ?Sized>(repo: &R) -> RepositoryResult<bool> {
    repo.health_check().await
}

// ==================== Entry Workflow ====================

/// Record a new hour slot. The entry starts `PENDING`.
///
/// # Errors
/// * `PermissionDenied` - actor is not a team leader or admin
/// * `ValidationError` - required context fields are blank
pub async fn submit_entry<R: FullRepository + ?Sized>(
    repo: &R,
    actor: &User,
    new: NewEntry,
    now: DateTime<Utc>,
) -> RepositoryResult<ProductionEntry> {
    if !actor.role.can_submit() {
        return Err(denied("submit_entry", actor));
    }
    new.validate().map_err(RepositoryError::validation)?;

    let entry = ProductionEntry::from_new(EntryId(0), new, actor.id, now);
    let stored = repo.insert_entry(entry).await?;
    info!(
        "Service layer: entry {} submitted by user {} (line '{}', shift '{}', hour '{}')",
        stored.id, actor.id, stored.line, stored.shift, stored.hour
    );
    Ok(stored)
}

/// Replace the data of a pending entry.
///
/// Only the submitter may edit, and only while the entry is `PENDING`.
pub async fn edit_entry<R: FullRepository + ?Sized>(
    repo: &R,
    actor: &User,
    entry_id: EntryId,
    new: NewEntry,
    now: DateTime<Utc>,
) -> RepositoryResult<ProductionEntry> {
    let mut entry = repo.get_entry(entry_id).await?;
    if !is_owner(actor, &entry) {
        return Err(denied("edit_entry", actor));
    }
    if entry.status != EntryStatus::Pending {
        return Err(RepositoryError::conflict_with_context(
            format!("Entry {} is {} and can no longer be edited", entry_id, entry.status),
            ErrorContext::new("edit_entry")
                .with_entity("entry")
                .with_entity_id(entry_id),
        ));
    }
    new.validate().map_err(RepositoryError::validation)?;

    entry.apply_edit(new, now);
    repo.replace_pending_entry(&entry).await?;
    info!("Service layer: entry {} edited by user {}", entry_id, actor.id);
    Ok(entry)
}

/// Approve or reject a pending entry. Each entry is reviewed exactly once.
///
/// # Errors
/// * `PermissionDenied` - actor is not a supervisor or admin
/// * `Conflict` - the entry was already reviewed
pub async fn review_entry<R: FullRepository + ?Sized>(
    repo: &R,
    actor: &User,
    entry_id: EntryId,
    decision: ReviewDecision,
    now: DateTime<Utc>,
) -> RepositoryResult<ProductionEntry> {
    if !actor.role.can_review() {
        return Err(denied("review_entry", actor));
    }

    let status = decision.target_status();
    let rejection_reason = match decision {
        ReviewDecision::Reject { reason } => reason.filter(|r| !r.trim().is_empty()),
        ReviewDecision::Approve => None,
    };
    let change = StatusChange {
        status,
        reviewed_by: actor.id,
        reviewed_at: now,
        rejection_reason,
    };

    let entry = repo
        .transition_status(entry_id, EntryStatus::Pending, change)
        .await
        .map_err(|e| e.with_operation("review_entry"))?;
    info!(
        "Service layer: entry {} {} by user {}",
        entry_id, status, actor.id
    );
    Ok(entry)
}

/// Delete an entry: the submitter while it is pending, or an admin at any time.
pub async fn delete_entry<R: FullRepository + ?Sized>(
    repo: &R,
    actor: &User,
    entry_id: EntryId,
) -> RepositoryResult<()> {
    let entry = repo.get_entry(entry_id).await?;
    let allowed = actor.role == Role::Admin
        || (is_owner(actor, &entry) && entry.status == EntryStatus::Pending);
    if !allowed {
        return Err(denied("delete_entry", actor));
    }
    repo.delete_entry(entry_id).await?;
    warn!("Service layer: entry {} deleted by user {}", entry_id, actor.id);
    Ok(())
}

/// Fetch one entry. Team leaders can only see their own.
pub async fn get_entry<R: FullRepository + ?Sized>(
    repo: &R,
    actor: &User,
    entry_id: EntryId,
) -> RepositoryResult<ProductionEntry> {
    let entry = repo.get_entry(entry_id).await?;
    if actor.role == Role::TeamLeader && !is_owner(actor, &entry) {
        return Err(denied("view_entry", actor));
    }
    Ok(entry)
}

/// List entries visible to the actor.
///
/// Team leaders are always restricted to their own submissions.
pub async fn list_entries<R: FullRepository + ?Sized>(
    repo: &R,
    actor: &User,
    filter: EntryFilter,
) -> RepositoryResult<Vec<ProductionEntry>> {
    let filter = if actor.role == Role::TeamLeader {
        filter.submitted_by(actor.id)
    } else {
        filter
    };
    repo.list_entries(&filter).await
}

/// Attach computed OEE metrics to an entry.
pub fn entry_with_oee(entry: ProductionEntry) -> EntryWithOee {
    let oee = OeeMetrics::for_entry(&entry);
    EntryWithOee {
        category: get_oee_category(oee.oee),
        oee,
        entry,
    }
}

/// OEE breakdown for one entry the actor can see.
pub async fn get_entry_oee<R: FullRepository + ?Sized>(
    repo: &R,
    actor: &User,
    entry_id: EntryId,
) -> RepositoryResult<EntryOee> {
    let entry = get_entry(repo, actor, entry_id).await?;
    let metrics = OeeMetrics::for_entry(&entry);
    Ok(EntryOee {
        entry_id,
        category: get_oee_category(metrics.oee),
        metrics,
    })
}

// ==================== Analytics ====================

/// Compute the dashboard over every stored entry.
pub async fn dashboard<R: FullRepository + ?Sized>(
    repo: &R,
    now: DateTime<Utc>,
    windows: &AnalyticsWindows,
) -> RepositoryResult<DashboardData> {
    let entries = repo.list_entries(&EntryFilter::default()).await?;
    info!(
        "Service layer: computing dashboard over {} entries (windows {}d/{}d)",
        entries.len(),
        windows.category_days,
        windows.trend_days
    );
    Ok(compute_dashboard(&entries, now, windows))
}

async fn approved_entries_within<R: FullRepository + ?Sized>(
    repo: &R,
    now: DateTime<Utc>,
    days: i64,
) -> RepositoryResult<Vec<ProductionEntry>> {
    let filter = EntryFilter::default().with_status(EntryStatus::Approved);
    let entries = repo.list_entries(&filter).await?;
    Ok(approved_within(&entries, now, days)
        .into_iter()
        .cloned()
        .collect())
}

/// Entry counts by status over every stored entry.
pub async fn summary<R: FullRepository + ?Sized>(
    repo: &R,
) -> RepositoryResult<AnalyticsSummary> {
    let entries = repo.list_entries(&EntryFilter::default()).await?;
    Ok(compute_summary(&entries))
}

/// Per-line rollup over the category window.
pub async fn line_performance<R: FullRepository + ?Sized>(
    repo: &R,
    now: DateTime<Utc>,
    windows: &AnalyticsWindows,
) -> RepositoryResult<Vec<LinePerformance>> {
    let entries = approved_entries_within(repo, now, windows.category_days).await?;
    Ok(compute_line_performance(&entries))
}

/// Per-shift rollup over the category window.
pub async fn shift_analytics<R: FullRepository + ?Sized>(
    repo: &R,
    now: DateTime<Utc>,
    windows: &AnalyticsWindows,
) -> RepositoryResult<Vec<ShiftAnalytics>> {
    let entries = approved_entries_within(repo, now, windows.category_days).await?;
    Ok(compute_shift_analytics(&entries))
}

/// Per-model rollup over the category window.
pub async fn model_performance<R: FullRepository + ?Sized>(
    repo: &R,
    now: DateTime<Utc>,
    windows: &AnalyticsWindows,
) -> RepositoryResult<Vec<ModelPerformance>> {
    let entries = approved_entries_within(repo, now, windows.category_days).await?;
    Ok(compute_model_performance(&entries))
}

/// Daily totals over the trend window.
pub async fn daily_trend<R: FullRepository + ?Sized>(
    repo: &R,
    now: DateTime<Utc>,
    windows: &AnalyticsWindows,
) -> RepositoryResult<Vec<DailyTrendPoint>> {
    let entries = approved_entries_within(repo, now, windows.trend_days).await?;
    Ok(compute_daily_trend(&entries))
}

// ==================== Users ====================

fn require_admin(actor: &User, operation: &str) -> RepositoryResult<()> {
    if actor.role.can_manage_users() {
        Ok(())
    } else {
        Err(denied(operation, actor))
    }
}

fn validate_credentials(username: &str, password: &str) -> RepositoryResult<()> {
    if username.trim().is_empty() {
        return Err(RepositoryError::validation("Username is required"));
    }
    if password.is_empty() {
        return Err(RepositoryError::validation("Password is required"));
    }
    Ok(())
}

async fn insert_new_user<R: FullRepository + ?Sized>(
    repo: &R,
    new: NewUser,
    now: DateTime<Utc>,
) -> RepositoryResult<User> {
    validate_credentials(&new.username, &new.password)?;
    let user = User {
        id: UserId(0),
        display_name: new.display_name.unwrap_or_else(|| new.username.clone()),
        username: new.username,
        role: new.role,
        active: true,
        password_hash: hash_password(&new.password)?,
        created_at: now,
    };
    repo.insert_user(user).await
}

/// Create a user account. Admin only.
pub async fn create_user<R: FullRepository + ?Sized>(
    repo: &R,
    actor: &User,
    new: NewUser,
    now: DateTime<Utc>,
) -> RepositoryResult<User> {
    require_admin(actor, "create_user")?;
    let user = insert_new_user(repo, new, now).await?;
    info!(
        "Service layer: user '{}' ({}) created by user {}",
        user.username, user.role, actor.id
    );
    Ok(user)
}

/// List all users. Admin only.
pub async fn list_users<R: FullRepository + ?Sized>(
    repo: &R,
    actor: &User,
) -> RepositoryResult<Vec<User>> {
    require_admin(actor, "list_users")?;
    repo.list_users().await
}

/// Apply a partial update to a user. Admin only.
///
/// Deactivating a user or changing their password ends their sessions.
/// Admins cannot deactivate themselves.
pub async fn update_user<R: FullRepository + ?Sized>(
    repo: &R,
    actor: &User,
    user_id: UserId,
    update: UserUpdate,
) -> RepositoryResult<User> {
    require_admin(actor, "update_user")?;
    if user_id == actor.id && update.active == Some(false) {
        return Err(RepositoryError::conflict("Admins cannot deactivate themselves"));
    }

    let mut user = repo.get_user(user_id).await?;
    let mut end_sessions = false;

    if let Some(display_name) = update.display_name {
        user.display_name = display_name;
    }
    if let Some(role) = update.role {
        user.role = role;
    }
    if let Some(active) = update.active {
        end_sessions |= !active;
        user.active = active;
    }
    if let Some(password) = update.password {
        validate_credentials(&user.username, &password)?;
        user.password_hash = hash_password(&password)?;
        end_sessions = true;
    }

    repo.update_user(&user).await?;
    if end_sessions {
        let revoked = repo.revoke_user_sessions(user_id).await?;
        info!(
            "Service layer: revoked {} session(s) of user {}",
            revoked, user_id
        );
    }
    Ok(user)
}

/// Delete a user. Admin only; admins cannot delete themselves.
pub async fn delete_user<R: FullRepository + ?Sized>(
    repo: &R,
    actor: &User,
    user_id: UserId,
) -> RepositoryResult<()> {
    require_admin(actor, "delete_user")?;
    if user_id == actor.id {
        return Err(RepositoryError::conflict("Admins cannot delete themselves"));
    }
    repo.delete_user(user_id).await?;
    repo.revoke_user_sessions(user_id).await?;
    warn!("Service layer: user {} deleted by user {}", user_id, actor.id);
    Ok(())
}

/// Create the configured admin account unless that username already exists.
///
/// # Errors
/// * `ConfigurationError` - the configured username or password is blank
///
/// # Returns
/// * `Ok(Some(User))` - the admin was created
/// * `Ok(None)` - a user with that name already existed
pub async fn ensure_bootstrap_admin<R: FullRepository + ?Sized>(
    repo: &R,
    username: &str,
    password: &str,
    now: DateTime<Utc>,
) -> RepositoryResult<Option<User>> {
    validate_credentials(username, password).map_err(|e| {
        RepositoryError::configuration(format!("Bootstrap admin: {}", e.message()))
            .with_operation("ensure_bootstrap_admin")
    })?;
    if repo.find_user_by_username(username).await?.is_some() {
        return Ok(None);
    }
    let new = NewUser {
        username: username.to_string(),
        display_name: Some("Administrator".to_string()),
        password: password.to_string(),
        role: Role::Admin,
    };
    let user = insert_new_user(repo, new, now).await?;
    info!("Service layer: bootstrap admin '{}' created", user.username);
    Ok(Some(user))
}

// ==================== Sessions ====================

/// Verify credentials and open a session.
///
/// Unknown users, wrong passwords and inactive accounts all fail the same way.
pub async fn login<R: FullRepository + ?Sized>(
    repo: &R,
    username: &str,
    password: &str,
    now: DateTime<Utc>,
    ttl: Duration,
) -> RepositoryResult<(Session, User)> {
    let user = match repo.find_user_by_username(username).await? {
        Some(u) if u.active && verify_password(password, &u.password_hash)? => Some(u),
        _ => None,
    };

    let Some(user) = user else {
        warn!("Service layer: failed login for '{}'", username);
        return Err(RepositoryError::authentication("Invalid username or password"));
    };

    let expires_at = now.checked_add_signed(ttl).ok_or_else(|| {
        RepositoryError::configuration(format!(
            "Session lifetime of {} hours is out of range",
            ttl.num_hours()
        ))
        .with_operation("login")
    })?;

    let session = Session {
        token: Uuid::new_v4().to_string(),
        user_id: user.id,
        created_at: now,
        expires_at,
    };
    repo.store_session(session.clone()).await?;
    info!("Service layer: user '{}' logged in", user.username);
    Ok((session, user))
}

/// Close a session. Unknown tokens are ignored.
pub async fn logout<R: FullRepository + ?Sized>(repo: &R, token: &str) -> RepositoryResult<()> {
    repo.revoke_session(token).await?;
    Ok(())
}

/// Resolve a session token to an active user.
pub async fn authenticate<R: FullRepository + ?Sized>(
    repo: &R,
    token: &str,
    now: DateTime<Utc>,
) -> RepositoryResult<User> {
    let session = repo
        .find_session(token)
        .await?
        .ok_or_else(|| RepositoryError::authentication("Unknown session"))?;

    if session.is_expired(now) {
        repo.revoke_session(token).await?;
        return Err(RepositoryError::authentication("Session expired"));
    }

    let user = match repo.get_user(session.user_id).await {
        Ok(user) => user,
        Err(RepositoryError::NotFound { .. }) => {
            return Err(RepositoryError::authentication("Unknown session"))
        }
        Err(e) => return Err(e),
    };
    if !user.active {
        return Err(RepositoryError::authentication("Account is inactive"));
    }
    Ok(user)
}
