//! Environment handling of `AppConfig::load`.

mod support;

use std::io::Write;

use oee_tracker::config::AppConfig;
use support::with_scoped_env;

const ALL_KEYS: [&str; 8] = [
    "OEE_CONFIG",
    "HOST",
    "PORT",
    "OEE_ANALYTICS_WINDOW_DAYS",
    "OEE_TREND_WINDOW_DAYS",
    "OEE_SESSION_TTL_HOURS",
    "OEE_ADMIN_USERNAME",
    "OEE_ADMIN_PASSWORD",
];

fn cleared_with<'a>(set: &[(&'a str, Option<&'a str>)]) -> Vec<(&'a str, Option<&'a str>)> {
    let mut changes: Vec<(&str, Option<&str>)> = ALL_KEYS.iter().map(|k| (*k, None)).collect();
    changes.extend_from_slice(set);
    changes
}

#[test]
fn test_load_from_explicit_file_then_env() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
[server]
host = "127.0.0.1"
port = 7000

[analytics]
category_window_days = 14

[bootstrap]
admin_username = "boss"
"#
    )
    .unwrap();
    let path = file.path().to_str().unwrap().to_string();

    let config = with_scoped_env(
        &cleared_with(&[
            ("OEE_CONFIG", Some(path.as_str())),
            ("PORT", Some("7100")),
            ("OEE_ADMIN_PASSWORD", Some("pw")),
        ]),
        AppConfig::load,
    )
    .unwrap();

    assert_eq!(config.bind_address(), "127.0.0.1:7100");
    assert_eq!(config.analytics.category_window_days, 14);
    assert_eq!(config.analytics.trend_window_days, 7);
    assert_eq!(config.bootstrap.admin_username, "boss");
    assert_eq!(config.bootstrap.admin_password.as_deref(), Some("pw"));
}

#[test]
fn test_missing_explicit_file_fails() {
    let result = with_scoped_env(
        &cleared_with(&[("OEE_CONFIG", Some("/no/such/oee-tracker.toml"))]),
        AppConfig::load,
    );
    assert!(result.is_err());
}

#[test]
fn test_bad_window_env_fails() {
    let result = with_scoped_env(
        &cleared_with(&[("OEE_TREND_WINDOW_DAYS", Some("a week"))]),
        AppConfig::load,
    );
    assert!(result.is_err());
}

#[test]
fn test_negative_window_rejected() {
    let result = with_scoped_env(
        &cleared_with(&[("OEE_ANALYTICS_WINDOW_DAYS", Some("-1"))]),
        AppConfig::load,
    );
    assert!(result.is_err());
}

#[test]
fn test_out_of_range_limits_rejected() {
    for (key, value) in [
        ("OEE_ANALYTICS_WINDOW_DAYS", "100000000"),
        ("OEE_TREND_WINDOW_DAYS", "36501"),
        ("OEE_SESSION_TTL_HOURS", "4294967295"),
    ] {
        let result = with_scoped_env(&cleared_with(&[(key, Some(value))]), AppConfig::load);
        assert!(result.is_err(), "{}={} should be rejected", key, value);
    }
}
