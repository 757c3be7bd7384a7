//! Data Transfer Objects for the HTTP API.
//!
//! Dashboard and entry shapes are re-exported from the routes module since they
//! already derive Serialize; this module adds the request bodies and list
//! envelopes that only the REST layer needs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use crate::api::{
    AnalyticsSummary, DailyTrendPoint, DashboardData, EntryOee, EntryWithOee, LinePerformance,
    ModelPerformance, NewEntry, NewUser, OeeCategory, OeeMetrics, ShiftAnalytics, User,
    UserUpdate,
};
pub use crate::db::models::EntryFilter;
use crate::models::parse_count;

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub database: String,
}

/// Credentials posted to the login endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Response for a successful login. The token is also set as a cookie.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub user: User,
}

/// Optional body of the reject endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RejectRequest {
    #[serde(default)]
    pub reason: Option<String>,
}

/// Entry list with per-entry OEE.
#[derive(Debug, Clone, Serialize)]
pub struct EntryListResponse {
    pub entries: Vec<EntryWithOee>,
    pub total: usize,
}

/// User list response.
#[derive(Debug, Clone, Serialize)]
pub struct UserListResponse {
    pub users: Vec<User>,
    pub total: usize,
}

/// Query string of the standalone calculator.
///
/// Values arrive as text and go through the same counter parsing as entry
/// submissions; missing values count as zero.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculateQuery {
    #[serde(default)]
    pub available_time: Option<String>,
    #[serde(default)]
    pub loss_time: Option<String>,
    #[serde(default)]
    pub line_capacity: Option<String>,
    #[serde(default)]
    pub good_parts: Option<String>,
    #[serde(default)]
    pub rejects: Option<String>,
}

impl CalculateQuery {
    /// `(available, loss, capacity, good, rejects)` as counters.
    pub fn counts(&self) -> (u32, u32, u32, u32, u32) {
        let count = |v: &Option<String>| v.as_deref().map(parse_count).unwrap_or(0);
        (
            count(&self.available_time),
            count(&self.loss_time),
            count(&self.line_capacity),
            count(&self.good_parts),
            count(&self.rejects),
        )
    }
}

/// Calculator result: the four metrics plus their category.
#[derive(Debug, Clone, Serialize)]
pub struct OeeCalculation {
    #[serde(flatten)]
    pub metrics: OeeMetrics,
    #[serde(flatten)]
    pub category: OeeCategory,
}
