//! Public API surface for the backend.
//!
//! This file consolidates the DTO types for the HTTP API and the identifier
//! newtypes shared across layers.
//! All types derive Serialize (and, where they are accepted as input, Deserialize).

pub use crate::routes::analytics::AnalyticsSummary;
pub use crate::routes::analytics::DailyTrendPoint;
pub use crate::routes::analytics::DashboardData;
pub use crate::routes::analytics::LinePerformance;
pub use crate::routes::analytics::ModelPerformance;
pub use crate::routes::analytics::ShiftAnalytics;
pub use crate::routes::entries::EntryOee;
pub use crate::routes::entries::EntryWithOee;

pub use crate::models::{
    EntryStatus, NewEntry, NewUser, ProductionEntry, ProductionType, Role, User, UserUpdate,
};
pub use crate::services::oee::{OeeBand, OeeCategory, OeeMetrics};

// Production entry identifier (database primary key).
crate::define_id_type!(i64, EntryId);

// User identifier.
crate::define_id_type!(i64, UserId);

#[cfg(test)]
#[path = "api_tests.rs"]
mod api_tests;
