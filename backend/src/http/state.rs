//! Application state for the HTTP server.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::db::repository::FullRepository;
use crate::services::analytics::AnalyticsWindows;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Repository instance for storage operations
    pub repository: Arc<dyn FullRepository>,
    /// Dashboard rollup windows
    pub windows: AnalyticsWindows,
    /// Lifetime of a login session
    pub session_ttl: chrono::Duration,
}

impl AppState {
    /// Create a new application state with default settings.
    pub fn new(repository: Arc<dyn FullRepository>) -> Self {
        Self::with_config(repository, &AppConfig::default())
    }

    /// Create application state using the analytics and auth settings of `config`.
    pub fn with_config(repository: Arc<dyn FullRepository>, config: &AppConfig) -> Self {
        Self {
            repository,
            windows: config.analytics.windows(),
            session_ttl: config.auth.session_ttl(),
        }
    }
}
