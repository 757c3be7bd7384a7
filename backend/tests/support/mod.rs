#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Mutex;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use oee_tracker::api::{NewEntry, NewUser, ProductionType, Role, User};
use oee_tracker::db::repositories::LocalRepository;
use oee_tracker::db::services;

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Runs `f` with environment variables temporarily modified.
///
/// This is panic-safe (restores variables on unwind) and also serializes access to
/// process-global env vars to avoid flaky tests when Rust runs tests in parallel.
///
/// `changes` is a list of `(key, value)` pairs:
/// - `Some(v)` sets the variable to `v`
/// - `None` removes the variable
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let _guard = ScopedEnv::new(changes);
    f()
}

struct ScopedEnv {
    snapshot: Vec<(String, Option<String>)>,
}

impl ScopedEnv {
    fn new(changes: &[(&str, Option<&str>)]) -> Self {
        let keys: HashSet<&str> = changes.iter().map(|(k, _)| *k).collect();
        let snapshot = keys
            .into_iter()
            .map(|k| (k.to_string(), std::env::var(k).ok()))
            .collect::<Vec<_>>();

        for (k, v) in changes {
            match v {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }

        Self { snapshot }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (k, v) in self.snapshot.drain(..) {
            match v {
                Some(val) => std::env::set_var(&k, val),
                None => std::env::remove_var(&k),
            }
        }
    }
}

/// A submission for `line` dated `date`, 60 min available, capacity 100.
pub fn entry_on(date: NaiveDate, line: &str, shift: &str, good: u32, rejects: u32) -> NewEntry {
    NewEntry {
        date,
        line: line.to_string(),
        shift: shift.to_string(),
        hour: "08:00-09:00".to_string(),
        model: "HL-200".to_string(),
        production_type: ProductionType::Lh,
        available_time: 60,
        loss_time: 0,
        line_capacity: 100,
        good_parts: good,
        rejects,
        good_parts_lh: None,
        good_parts_rh: None,
        rejects_lh: None,
        rejects_rh: None,
        downtime_reason: None,
        remarks: None,
    }
}

/// Repository with a bootstrap admin plus one team leader and one supervisor.
///
/// Passwords are `<username>-pw`.
pub async fn seeded_repo(now: DateTime<Utc>) -> (LocalRepository, User, User, User) {
    let repo = LocalRepository::new();
    let admin = services::ensure_bootstrap_admin(&repo, "admin", "admin-pw", now)
        .await
        .unwrap()
        .unwrap();
    let leader = services::create_user(
        &repo,
        &admin,
        NewUser {
            username: "leader".to_string(),
            display_name: Some("Team Leader".to_string()),
            password: "leader-pw".to_string(),
            role: Role::TeamLeader,
        },
        now,
    )
    .await
    .unwrap();
    let supervisor = services::create_user(
        &repo,
        &admin,
        NewUser {
            username: "supervisor".to_string(),
            display_name: None,
            password: "supervisor-pw".to_string(),
            role: Role::Supervisor,
        },
        now,
    )
    .await
    .unwrap();
    (repo, admin, leader, supervisor)
}

pub fn days_ago(now: DateTime<Utc>, days: i64) -> DateTime<Utc> {
    now - Duration::days(days)
}
