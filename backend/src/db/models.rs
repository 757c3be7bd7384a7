//! Storage-level types shared by the repository traits and their implementations.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::api::{EntryStatus, ProductionEntry, UserId};

/// Criteria for listing entries. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryFilter {
    #[serde(default)]
    pub status: Option<EntryStatus>,
    /// Exact line name.
    #[serde(default)]
    pub line: Option<String>,
    /// Earliest production date, inclusive.
    #[serde(default)]
    pub from: Option<NaiveDate>,
    /// Latest production date, inclusive.
    #[serde(default)]
    pub to: Option<NaiveDate>,
    #[serde(default)]
    pub submitted_by: Option<UserId>,
}

impl EntryFilter {
    pub fn with_status(mut self, status: EntryStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn submitted_by(mut self, user_id: UserId) -> Self {
        self.submitted_by = Some(user_id);
        self
    }

    pub fn matches(&self, entry: &ProductionEntry) -> bool {
        self.status.map_or(true, |s| entry.status == s)
            && self.line.as_ref().map_or(true, |l| &entry.line == l)
            && self.from.map_or(true, |d| entry.date >= d)
            && self.to.map_or(true, |d| entry.date <= d)
            && self.submitted_by.map_or(true, |u| entry.submitted_by == u)
    }
}

/// A supervisor decision applied through
/// [`EntryRepository::transition_status`](crate::db::repository::EntryRepository::transition_status).
#[derive(Debug, Clone, PartialEq)]
pub struct StatusChange {
    pub status: EntryStatus,
    pub reviewed_by: UserId,
    pub reviewed_at: DateTime<Utc>,
    pub rejection_reason: Option<String>,
}

impl StatusChange {
    /// Apply the decision to an entry.
    pub fn apply(&self, entry: &mut ProductionEntry) {
        entry.status = self.status;
        entry.approved_by = Some(self.reviewed_by);
        entry.approved_at = Some(self.reviewed_at);
        entry.rejection_reason = self.rejection_reason.clone();
        entry.updated_at = self.reviewed_at;
    }
}

/// Opaque login session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}
