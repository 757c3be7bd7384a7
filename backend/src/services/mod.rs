//! Service layer for business logic.
//!
//! Pure computations live here: per-entry OEE and the production rollups.
//! Workflow that needs storage (submission, review, user management) lives in
//! [`crate::db::services`] and calls into these modules.

pub mod analytics;
pub mod oee;

pub use analytics::{
    approved_within, compute_daily_trend, compute_dashboard, compute_line_performance,
    compute_model_performance, compute_shift_analytics, compute_summary, AnalyticsWindows,
};
pub use oee::{calculate_oee, get_oee_category, OeeBand, OeeCategory, OeeMetrics};
