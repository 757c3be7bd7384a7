//! Application configuration.
//!
//! Settings are read from an optional `oee-tracker.toml` and then overridden
//! by environment variables:
//!
//! - `OEE_CONFIG`: path of the config file (skips the default search)
//! - `HOST`, `PORT`: bind address
//! - `OEE_ANALYTICS_WINDOW_DAYS`: line/shift/model rollup window
//! - `OEE_TREND_WINDOW_DAYS`: daily trend window
//! - `OEE_SESSION_TTL_HOURS`: login session lifetime
//! - `OEE_ADMIN_USERNAME`, `OEE_ADMIN_PASSWORD`: bootstrap admin account

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::services::analytics::{
    AnalyticsWindows, DEFAULT_CATEGORY_WINDOW_DAYS, DEFAULT_TREND_WINDOW_DAYS,
};

/// Longest accepted dashboard window, in days.
pub const MAX_WINDOW_DAYS: i64 = 36_500;
/// Longest accepted session lifetime, in hours.
pub const MAX_SESSION_TTL_HOURS: u32 = 24 * 366;

/// Complete application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub analytics: AnalyticsSettings,
    #[serde(default)]
    pub auth: AuthSettings,
    #[serde(default)]
    pub bootstrap: BootstrapSettings,
}

/// HTTP bind settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Rolling windows for the dashboard rollups, in days.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsSettings {
    #[serde(default = "default_category_window")]
    pub category_window_days: i64,
    #[serde(default = "default_trend_window")]
    pub trend_window_days: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthSettings {
    #[serde(default = "default_session_ttl")]
    pub session_ttl_hours: u32,
}

/// Admin account created at startup when a password is configured.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BootstrapSettings {
    #[serde(default = "default_admin_username")]
    pub admin_username: String,
    #[serde(default)]
    pub admin_password: Option<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_category_window() -> i64 {
    DEFAULT_CATEGORY_WINDOW_DAYS
}

fn default_trend_window() -> i64 {
    DEFAULT_TREND_WINDOW_DAYS
}

fn default_session_ttl() -> u32 {
    12
}

fn default_admin_username() -> String {
    "admin".to_string()
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for AnalyticsSettings {
    fn default() -> Self {
        Self {
            category_window_days: default_category_window(),
            trend_window_days: default_trend_window(),
        }
    }
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            session_ttl_hours: default_session_ttl(),
        }
    }
}

impl Default for BootstrapSettings {
    fn default() -> Self {
        Self {
            admin_username: default_admin_username(),
            admin_password: None,
        }
    }
}

impl AnalyticsSettings {
    pub fn windows(&self) -> AnalyticsWindows {
        AnalyticsWindows {
            category_days: self.category_window_days,
            trend_days: self.trend_window_days,
        }
    }
}

impl AuthSettings {
    pub fn session_ttl(&self) -> chrono::Duration {
        chrono::Duration::hours(i64::from(self.session_ttl_hours))
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Search the standard locations for `oee-tracker.toml`.
    ///
    /// Returns `Ok(None)` when no file exists.
    pub fn from_default_location() -> Result<Option<Self>> {
        let search_paths = [
            PathBuf::from("oee-tracker.toml"),
            PathBuf::from("backend/oee-tracker.toml"),
            PathBuf::from("../oee-tracker.toml"),
        ];

        for path in search_paths {
            if path.exists() {
                return Self::from_file(&path).map(Some);
            }
        }
        Ok(None)
    }

    /// Resolve the full configuration: file (if any), then environment.
    pub fn load() -> Result<Self> {
        let mut config = match std::env::var("OEE_CONFIG") {
            Ok(path) => Self::from_file(path)?,
            Err(_) => Self::from_default_location()?.unwrap_or_default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from a key lookup (normally the process environment).
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("PORT") {
            self.server.port = port
                .parse()
                .with_context(|| format!("PORT must be a valid port number, got '{}'", port))?;
        }
        if let Some(days) = lookup("OEE_ANALYTICS_WINDOW_DAYS") {
            self.analytics.category_window_days = parse_days("OEE_ANALYTICS_WINDOW_DAYS", &days)?;
        }
        if let Some(days) = lookup("OEE_TREND_WINDOW_DAYS") {
            self.analytics.trend_window_days = parse_days("OEE_TREND_WINDOW_DAYS", &days)?;
        }
        if let Some(hours) = lookup("OEE_SESSION_TTL_HOURS") {
            self.auth.session_ttl_hours = hours.parse().with_context(|| {
                format!("OEE_SESSION_TTL_HOURS must be a number, got '{}'", hours)
            })?;
        }
        if let Some(username) = lookup("OEE_ADMIN_USERNAME") {
            self.bootstrap.admin_username = username;
        }
        if let Some(password) = lookup("OEE_ADMIN_PASSWORD") {
            self.bootstrap.admin_password = Some(password);
        }
        Ok(())
    }

    /// Reject settings the server cannot run with.
    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_SESSION_TTL_HOURS).contains(&self.auth.session_ttl_hours) {
            bail!(
                "auth.session_ttl_hours must be between 1 and {}, got {}",
                MAX_SESSION_TTL_HOURS,
                self.auth.session_ttl_hours
            );
        }
        for (key, days) in [
            ("analytics.category_window_days", self.analytics.category_window_days),
            ("analytics.trend_window_days", self.analytics.trend_window_days),
        ] {
            if !(0..=MAX_WINDOW_DAYS).contains(&days) {
                bail!("{} must be between 0 and {}, got {}", key, MAX_WINDOW_DAYS, days);
            }
        }
        if self.bootstrap.admin_username.trim().is_empty() {
            bail!("bootstrap.admin_username must not be empty");
        }
        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn parse_days(key: &str, raw: &str) -> Result<i64> {
    raw.trim()
        .parse()
        .with_context(|| format!("{} must be a whole number of days, got '{}'", key, raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.bind_address(), "0.0.0.0:8080");
        assert_eq!(config.analytics.windows(), AnalyticsWindows::default());
        assert_eq!(config.auth.session_ttl(), chrono::Duration::hours(12));
        assert_eq!(config.bootstrap.admin_username, "admin");
        assert!(config.bootstrap.admin_password.is_none());
    }

    #[test]
    fn test_parse_partial_file() {
        let toml = r#"
[server]
port = 9000

[analytics]
trend_window_days = 14
"#;
        let config: AppConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.analytics.category_window_days, 30);
        assert_eq!(config.analytics.trend_window_days, 14);
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[bootstrap]\nadmin_username = \"plant-admin\"\nadmin_password = \"s3cret\""
        )
        .unwrap();

        let config = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(config.bootstrap.admin_username, "plant-admin");
        assert_eq!(config.bootstrap.admin_password.as_deref(), Some("s3cret"));
    }

    #[test]
    fn test_from_file_missing() {
        assert!(AppConfig::from_file("/definitely/not/here.toml").is_err());
    }

    #[test]
    fn test_overrides_win_over_file() {
        let mut config = AppConfig::default();
        config
            .apply_overrides(lookup_from(&[
                ("HOST", "127.0.0.1"),
                ("PORT", "3001"),
                ("OEE_ANALYTICS_WINDOW_DAYS", "60"),
                ("OEE_TREND_WINDOW_DAYS", "3"),
                ("OEE_ADMIN_PASSWORD", "pw"),
            ]))
            .unwrap();
        assert_eq!(config.bind_address(), "127.0.0.1:3001");
        assert_eq!(
            config.analytics.windows(),
            AnalyticsWindows {
                category_days: 60,
                trend_days: 3
            }
        );
        assert_eq!(config.bootstrap.admin_password.as_deref(), Some("pw"));
    }

    #[test]
    fn test_invalid_port_rejected() {
        let mut config = AppConfig::default();
        let result = config.apply_overrides(lookup_from(&[("PORT", "eighty")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_zero_ttl_rejected() {
        let mut config = AppConfig::default();
        config.auth.session_ttl_hours = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_oversized_ttl_rejected() {
        let mut config = AppConfig::default();
        config
            .apply_overrides(lookup_from(&[("OEE_SESSION_TTL_HOURS", "4294967295")]))
            .unwrap();
        assert!(config.validate().is_err());

        config.auth.session_ttl_hours = MAX_SESSION_TTL_HOURS;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_window_bounds() {
        let mut config = AppConfig::default();
        config
            .apply_overrides(lookup_from(&[("OEE_ANALYTICS_WINDOW_DAYS", "100000000")]))
            .unwrap();
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("analytics.category_window_days"));

        config.analytics.category_window_days = MAX_WINDOW_DAYS;
        config.analytics.trend_window_days = -1;
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("analytics.trend_window_days"));

        config.analytics.trend_window_days = 0;
        assert!(config.validate().is_ok());
    }
}
