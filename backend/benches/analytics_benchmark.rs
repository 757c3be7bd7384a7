use chrono::{Duration, TimeZone, Utc};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;

use oee_tracker::api::{EntryId, EntryStatus, ProductionEntry, ProductionType, UserId};
use oee_tracker::services::analytics::{compute_dashboard, AnalyticsWindows};
use oee_tracker::services::oee::calculate_oee;

fn synthetic_entries(count: usize) -> Vec<ProductionEntry> {
    let now = Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap();
    let statuses = [
        EntryStatus::Approved,
        EntryStatus::Approved,
        EntryStatus::Pending,
        EntryStatus::Rejected,
    ];

    (0..count)
        .map(|i| {
            let created = now - Duration::hours(i as i64 % (45 * 24));
            ProductionEntry {
                id: EntryId(i as i64 + 1),
                date: created.date_naive(),
                line: format!("Line {}", i % 6),
                shift: ["A", "B", "C"][i % 3].to_string(),
                hour: format!("{:02}:00", i % 24),
                model: format!("M-{}", i % 9),
                production_type: ProductionType::Lh,
                available_time: 60,
                loss_time: (i % 15) as u32,
                line_capacity: 120,
                good_parts: 80 + (i % 30) as u32,
                rejects: (i % 7) as u32,
                good_parts_lh: None,
                good_parts_rh: None,
                rejects_lh: None,
                rejects_rh: None,
                downtime_reason: None,
                remarks: None,
                status: statuses[i % statuses.len()],
                submitted_by: UserId(1),
                approved_by: None,
                approved_at: None,
                rejection_reason: None,
                created_at: created,
                updated_at: created,
            }
        })
        .collect()
}

fn benchmark_dashboard(c: &mut Criterion) {
    let now = Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap();
    let windows = AnalyticsWindows::default();
    let mut group = c.benchmark_group("compute_dashboard");

    for size in [100usize, 1_000, 10_000] {
        let entries = synthetic_entries(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &entries, |b, entries| {
            b.iter(|| compute_dashboard(black_box(entries), now, &windows))
        });
    }
    group.finish();
}

fn benchmark_calculate_oee(c: &mut Criterion) {
    c.bench_function("calculate_oee", |b| {
        b.iter(|| {
            calculate_oee(
                black_box(480),
                black_box(30),
                black_box(100),
                black_box(360),
                black_box(40),
            )
        })
    });
}

criterion_group!(benches, benchmark_dashboard, benchmark_calculate_oee);
criterion_main!(benches);
