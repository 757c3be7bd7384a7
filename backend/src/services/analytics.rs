//! Production rollups over collections of entries.
//!
//! The `compute_*` functions reduce whatever entries they are given; picking
//! the approved entries of a time window is done by [`approved_within`], and
//! [`compute_dashboard`] wires both together the way the dashboard endpoint
//! expects. Percentages here are whole numbers, unlike the two-decimal OEE
//! metrics.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};

use crate::api::{
    AnalyticsSummary, DailyTrendPoint, DashboardData, LinePerformance, ModelPerformance,
    ShiftAnalytics,
};
use crate::models::{EntryStatus, ProductionEntry};

/// Default trailing window for line/shift/model rollups.
pub const DEFAULT_CATEGORY_WINDOW_DAYS: i64 = 30;
/// Default trailing window for the daily trend.
pub const DEFAULT_TREND_WINDOW_DAYS: i64 = 7;

/// Trailing windows used by [`compute_dashboard`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalyticsWindows {
    pub category_days: i64,
    pub trend_days: i64,
}

impl Default for AnalyticsWindows {
    fn default() -> Self {
        Self {
            category_days: DEFAULT_CATEGORY_WINDOW_DAYS,
            trend_days: DEFAULT_TREND_WINDOW_DAYS,
        }
    }
}

/// Round half-up to the nearest integer.
pub fn round_percent(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// `part / whole * 100` rounded, or 0 when `whole` is zero.
fn percent(part: u64, whole: u64) -> i64 {
    if whole > 0 {
        round_percent(part as f64 / whole as f64 * 100.0)
    } else {
        0
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct GroupTotals {
    entries: usize,
    good_parts: u64,
    rejects: u64,
}

impl GroupTotals {
    fn add(&mut self, entry: &ProductionEntry) {
        self.entries += 1;
        self.good_parts += entry.good_parts as u64;
        self.rejects += entry.rejects as u64;
    }

    fn production(&self) -> u64 {
        self.good_parts + self.rejects
    }
}

/// Group entries by a raw string key, keeping first-seen order.
///
/// Keys are compared verbatim: `"Line 1"` and `"Line 1 "` are different groups.
fn group_totals<'a, I, F>(entries: I, key: F) -> Vec<(String, GroupTotals)>
where
    I: IntoIterator<Item = &'a ProductionEntry>,
    F: Fn(&ProductionEntry) -> String,
{
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<(String, GroupTotals)> = Vec::new();

    for entry in entries {
        let k = key(entry);
        let slot = match index.get(&k) {
            Some(&i) => i,
            None => {
                index.insert(k.clone(), groups.len());
                groups.push((k, GroupTotals::default()));
                groups.len() - 1
            }
        };
        groups[slot].1.add(entry);
    }

    groups
}

/// Approved entries created at or after `now - days`.
///
/// A window reaching past the representable date range has no lower bound.
pub fn approved_within<'a>(
    entries: &'a [ProductionEntry],
    now: DateTime<Utc>,
    days: i64,
) -> Vec<&'a ProductionEntry> {
    let cutoff = Duration::try_days(days).and_then(|span| now.checked_sub_signed(span));
    entries
        .iter()
        .filter(|e| e.status == EntryStatus::Approved)
        .filter(|e| cutoff.map_or(true, |c| e.created_at >= c))
        .collect()
}

/// Entry counts by status over the whole collection.
pub fn compute_summary<'a, I>(entries: I) -> AnalyticsSummary
where
    I: IntoIterator<Item = &'a ProductionEntry>,
{
    let mut summary = AnalyticsSummary::default();
    for entry in entries {
        summary.total_entries += 1;
        match entry.status {
            EntryStatus::Pending => summary.pending_entries += 1,
            EntryStatus::Approved => summary.approved_entries += 1,
            EntryStatus::Rejected => summary.rejected_entries += 1,
        }
    }
    summary.approval_rate = percent(
        summary.approved_entries as u64,
        summary.total_entries as u64,
    );
    summary
}

/// Totals and reject rate per line.
pub fn compute_line_performance<'a, I>(entries: I) -> Vec<LinePerformance>
where
    I: IntoIterator<Item = &'a ProductionEntry>,
{
    group_totals(entries, |e| e.line.clone())
        .into_iter()
        .map(|(line, t)| LinePerformance {
            line,
            total_entries: t.entries,
            total_good_parts: t.good_parts,
            total_rejects: t.rejects,
            reject_rate: percent(t.rejects, t.production()),
        })
        .collect()
}

/// Production and efficiency (good share of output) per shift.
pub fn compute_shift_analytics<'a, I>(entries: I) -> Vec<ShiftAnalytics>
where
    I: IntoIterator<Item = &'a ProductionEntry>,
{
    group_totals(entries, |e| e.shift.clone())
        .into_iter()
        .map(|(shift, t)| ShiftAnalytics {
            shift,
            total_production: t.production(),
            efficiency: percent(t.good_parts, t.production()),
            entries: t.entries,
        })
        .collect()
}

/// Production and mean rejects per entry, per product model.
pub fn compute_model_performance<'a, I>(entries: I) -> Vec<ModelPerformance>
where
    I: IntoIterator<Item = &'a ProductionEntry>,
{
    group_totals(entries, |e| e.model.clone())
        .into_iter()
        .map(|(model, t)| ModelPerformance {
            model,
            total_production: t.production(),
            // every group has at least one entry
            average_rejects: round_percent(t.rejects as f64 / t.entries as f64),
            entries: t.entries,
        })
        .collect()
}

/// Daily good/reject totals keyed by the entry's ISO date, oldest first.
pub fn compute_daily_trend<'a, I>(entries: I) -> Vec<DailyTrendPoint>
where
    I: IntoIterator<Item = &'a ProductionEntry>,
{
    let mut points: Vec<DailyTrendPoint> =
        group_totals(entries, |e| e.date.format("%Y-%m-%d").to_string())
            .into_iter()
            .map(|(date, t)| DailyTrendPoint {
                date,
                good_parts: t.good_parts,
                rejects: t.rejects,
                total: t.production(),
            })
            .collect();

    // ISO dates sort chronologically as strings
    points.sort_by(|a, b| a.date.cmp(&b.date));
    points
}

/// Summary over all entries plus the windowed rollups.
pub fn compute_dashboard(
    entries: &[ProductionEntry],
    now: DateTime<Utc>,
    windows: &AnalyticsWindows,
) -> DashboardData {
    let recent = approved_within(entries, now, windows.category_days);
    let trend = approved_within(entries, now, windows.trend_days);

    DashboardData {
        summary: compute_summary(entries),
        line_performance: compute_line_performance(recent.iter().copied()),
        shift_analytics: compute_shift_analytics(recent.iter().copied()),
        model_performance: compute_model_performance(recent.iter().copied()),
        daily_trend: compute_daily_trend(trend),
    }
}

#[cfg(test)]
#[path = "analytics_tests.rs"]
mod tests;
