use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};

use super::{
    approved_within, compute_daily_trend, compute_dashboard, compute_line_performance,
    compute_model_performance, compute_shift_analytics, compute_summary, round_percent,
    AnalyticsWindows,
};
use crate::api::{EntryId, UserId};
use crate::models::{EntryStatus, ProductionEntry, ProductionType};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 15, 12, 0, 0).unwrap()
}

fn create_test_entry(
    id: i64,
    line: &str,
    shift: &str,
    model: &str,
    good_parts: u32,
    rejects: u32,
    status: EntryStatus,
) -> ProductionEntry {
    ProductionEntry {
        id: EntryId(id),
        date: NaiveDate::from_ymd_opt(2026, 10, 14).unwrap(),
        line: line.to_string(),
        shift: shift.to_string(),
        hour: "07:00-08:00".to_string(),
        model: model.to_string(),
        production_type: ProductionType::Lh,
        available_time: 60,
        loss_time: 0,
        line_capacity: 120,
        good_parts,
        rejects,
        good_parts_lh: None,
        good_parts_rh: None,
        rejects_lh: None,
        rejects_rh: None,
        downtime_reason: None,
        remarks: None,
        status,
        submitted_by: UserId(1),
        approved_by: None,
        approved_at: None,
        rejection_reason: None,
        created_at: now() - Duration::days(1),
        updated_at: now() - Duration::days(1),
    }
}

fn approved(id: i64, line: &str, good_parts: u32, rejects: u32) -> ProductionEntry {
    create_test_entry(id, line, "Morning", "M-1", good_parts, rejects, EntryStatus::Approved)
}

fn on_day(mut entry: ProductionEntry, day: u32) -> ProductionEntry {
    entry.date = NaiveDate::from_ymd_opt(2026, 10, day).unwrap();
    entry
}

#[test]
fn test_round_percent_half_up() {
    assert_eq!(round_percent(74.5), 75);
    assert_eq!(round_percent(74.49), 74);
    assert_eq!(round_percent(0.0), 0);
    assert_eq!(round_percent(100.0), 100);
}

#[test]
fn test_summary_empty() {
    let entries: Vec<ProductionEntry> = vec![];
    let summary = compute_summary(&entries);
    assert_eq!(summary.total_entries, 0);
    assert_eq!(summary.approval_rate, 0);
}

#[test]
fn test_summary_counts_by_status() {
    let entries = vec![
        approved(1, "L1", 10, 0),
        approved(2, "L1", 10, 0),
        approved(3, "L2", 10, 0),
        create_test_entry(4, "L1", "Night", "M-1", 5, 1, EntryStatus::Pending),
    ];
    let summary = compute_summary(&entries);
    assert_eq!(summary.total_entries, 4);
    assert_eq!(summary.approved_entries, 3);
    assert_eq!(summary.pending_entries, 1);
    assert_eq!(summary.rejected_entries, 0);
    assert_eq!(summary.approval_rate, 75);
}

#[test]
fn test_summary_rounds_approval_rate() {
    let entries = vec![
        approved(1, "L1", 1, 0),
        create_test_entry(2, "L1", "Night", "M-1", 1, 0, EntryStatus::Rejected),
        create_test_entry(3, "L1", "Night", "M-1", 1, 0, EntryStatus::Pending),
    ];
    // 33.33.. rounds down
    assert_eq!(compute_summary(&entries).approval_rate, 33);
}

#[test]
fn test_line_performance_sums_and_rate() {
    let entries = vec![
        approved(1, "L1", 90, 5),
        approved(2, "L2", 50, 0),
        approved(3, "L1", 100, 5),
    ];
    let lines = compute_line_performance(&entries);

    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].line, "L1");
    assert_eq!(lines[0].total_entries, 2);
    assert_eq!(lines[0].total_good_parts, 190);
    assert_eq!(lines[0].total_rejects, 10);
    assert_eq!(lines[0].reject_rate, 5);
    assert_eq!(lines[1].line, "L2");
    assert_eq!(lines[1].reject_rate, 0);
}

#[test]
fn test_line_keys_are_not_normalized() {
    let entries = vec![approved(1, "Line 1", 10, 0), approved(2, "Line 1 ", 10, 0)];
    let lines = compute_line_performance(&entries);
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[1].line, "Line 1 ");
}

#[test]
fn test_line_zero_production_has_zero_rate() {
    let entries = vec![approved(1, "L1", 0, 0)];
    let lines = compute_line_performance(&entries);
    assert_eq!(lines[0].reject_rate, 0);
}

#[test]
fn test_groups_keep_first_seen_order() {
    let entries = vec![
        approved(1, "C", 1, 0),
        approved(2, "A", 1, 0),
        approved(3, "B", 1, 0),
        approved(4, "A", 1, 0),
    ];
    let names: Vec<String> = compute_line_performance(&entries)
        .into_iter()
        .map(|l| l.line)
        .collect();
    assert_eq!(names, vec!["C", "A", "B"]);
}

#[test]
fn test_shift_efficiency() {
    let entries = vec![
        create_test_entry(1, "L1", "Morning", "M-1", 95, 5, EntryStatus::Approved),
        create_test_entry(2, "L1", "Night", "M-1", 2, 1, EntryStatus::Approved),
        create_test_entry(3, "L2", "Morning", "M-1", 45, 5, EntryStatus::Approved),
    ];
    let shifts = compute_shift_analytics(&entries);

    assert_eq!(shifts.len(), 2);
    assert_eq!(shifts[0].shift, "Morning");
    assert_eq!(shifts[0].total_production, 150);
    assert_eq!(shifts[0].efficiency, 93);
    assert_eq!(shifts[0].entries, 2);
    // 2 / 3 = 66.67
    assert_eq!(shifts[1].efficiency, 67);
}

#[test]
fn test_model_average_rejects() {
    let entries = vec![
        create_test_entry(1, "L1", "Morning", "M-1", 10, 3, EntryStatus::Approved),
        create_test_entry(2, "L1", "Morning", "M-1", 10, 2, EntryStatus::Approved),
        create_test_entry(3, "L1", "Morning", "M-2", 10, 0, EntryStatus::Approved),
    ];
    let models = compute_model_performance(&entries);

    assert_eq!(models.len(), 2);
    assert_eq!(models[0].model, "M-1");
    assert_eq!(models[0].total_production, 25);
    // 5 / 2 = 2.5 rounds up
    assert_eq!(models[0].average_rejects, 3);
    assert_eq!(models[0].entries, 2);
    assert_eq!(models[1].average_rejects, 0);
}

#[test]
fn test_daily_trend_sorted_by_date() {
    let entries = vec![
        on_day(approved(1, "L1", 10, 1), 14),
        on_day(approved(2, "L1", 20, 2), 9),
        on_day(approved(3, "L2", 5, 0), 14),
        on_day(approved(4, "L2", 7, 1), 11),
    ];
    let trend = compute_daily_trend(&entries);

    let dates: Vec<&str> = trend.iter().map(|p| p.date.as_str()).collect();
    assert_eq!(dates, vec!["2026-10-09", "2026-10-11", "2026-10-14"]);
    assert_eq!(trend[2].good_parts, 15);
    assert_eq!(trend[2].rejects, 1);
    assert_eq!(trend[2].total, 16);
}

#[test]
fn test_approved_within_filters_status_and_window() {
    let mut old = approved(1, "L1", 10, 0);
    old.created_at = now() - Duration::days(31);
    let mut edge = approved(2, "L1", 10, 0);
    edge.created_at = now() - Duration::days(30);
    let pending = create_test_entry(3, "L1", "Morning", "M-1", 10, 0, EntryStatus::Pending);
    let fresh = approved(4, "L1", 10, 0);

    let entries = vec![old, edge, pending, fresh];
    let ids: Vec<i64> = approved_within(&entries, now(), 30)
        .into_iter()
        .map(|e| e.id.value())
        .collect();
    assert_eq!(ids, vec![2, 4]);
}

#[test]
fn test_out_of_range_window_has_no_lower_bound() {
    let mut ancient = approved(1, "L1", 10, 0);
    ancient.created_at = now() - Duration::days(365 * 200);
    let entries = vec![ancient, approved(2, "L2", 5, 1)];

    let windows = AnalyticsWindows {
        category_days: 100_000_000,
        trend_days: i64::MAX,
    };
    let data = compute_dashboard(&entries, now(), &windows);

    assert_eq!(data.line_performance.len(), 2);
    assert_eq!(data.daily_trend.len(), 1);
    assert_eq!(data.daily_trend[0].total, 16);
}

#[test]
fn test_dashboard_empty_window() {
    let entries = vec![create_test_entry(1, "L1", "Morning", "M-1", 10, 0, EntryStatus::Pending)];
    let data = compute_dashboard(&entries, now(), &AnalyticsWindows::default());

    assert_eq!(data.summary.total_entries, 1);
    assert!(data.line_performance.is_empty());
    assert!(data.shift_analytics.is_empty());
    assert!(data.model_performance.is_empty());
    assert!(data.daily_trend.is_empty());
}

#[test]
fn test_dashboard_summary_not_windowed() {
    let mut old = approved(1, "L1", 10, 0);
    old.created_at = now() - Duration::days(90);
    let mut mid = approved(2, "L2", 10, 0);
    mid.created_at = now() - Duration::days(10);
    let recent = approved(3, "L3", 10, 0);

    let entries = vec![old, mid, recent];
    let data = compute_dashboard(&entries, now(), &AnalyticsWindows::default());

    assert_eq!(data.summary.total_entries, 3);
    assert_eq!(data.summary.approval_rate, 100);
    assert_eq!(data.line_performance.len(), 2);
    // only the entry from yesterday is in the 7-day trend
    assert_eq!(data.daily_trend.len(), 1);
    assert_eq!(data.daily_trend[0].total, 10);
}

#[test]
fn test_dashboard_is_idempotent() {
    let entries = vec![
        approved(1, "L1", 90, 5),
        approved(2, "L2", 50, 3),
        create_test_entry(3, "L1", "Night", "M-2", 20, 1, EntryStatus::Rejected),
    ];
    let windows = AnalyticsWindows::default();
    let first = compute_dashboard(&entries, now(), &windows);
    let second = compute_dashboard(&entries, now(), &windows);
    assert_eq!(first, second);
}
