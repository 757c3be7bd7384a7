use serde::{Deserialize, Serialize};

// =========================================================
// Analytics dashboard types
// =========================================================

/// Entry counts by approval status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    pub total_entries: usize,
    pub pending_entries: usize,
    pub approved_entries: usize,
    pub rejected_entries: usize,
    /// Approved share of all entries, whole percent.
    pub approval_rate: i64,
}

/// Rollup for one production line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinePerformance {
    pub line: String,
    pub total_entries: usize,
    pub total_good_parts: u64,
    pub total_rejects: u64,
    pub reject_rate: i64,
}

/// Rollup for one shift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftAnalytics {
    pub shift: String,
    pub total_production: u64,
    pub efficiency: i64,
    pub entries: usize,
}

/// Rollup for one product model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelPerformance {
    pub model: String,
    pub total_production: u64,
    pub average_rejects: i64,
    pub entries: usize,
}

/// Production totals for one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyTrendPoint {
    /// `YYYY-MM-DD`
    pub date: String,
    pub good_parts: u64,
    pub rejects: u64,
    pub total: u64,
}

/// Everything the dashboard renders in one payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardData {
    pub summary: AnalyticsSummary,
    pub line_performance: Vec<LinePerformance>,
    pub shift_analytics: Vec<ShiftAnalytics>,
    pub model_performance: Vec<ModelPerformance>,
    pub daily_trend: Vec<DailyTrendPoint>,
}
