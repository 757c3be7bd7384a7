use serde::Serialize;

use crate::models::ProductionEntry;
use crate::services::oee::{OeeCategory, OeeMetrics};

// =========================================================
// Entry types + route names
// =========================================================

/// A production entry with its OEE computed on demand.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryWithOee {
    #[serde(flatten)]
    pub entry: ProductionEntry,
    pub oee: OeeMetrics,
    pub category: OeeCategory,
}

/// Per-entry OEE response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryOee {
    pub entry_id: crate::api::EntryId,
    #[serde(flatten)]
    pub metrics: OeeMetrics,
    #[serde(flatten)]
    pub category: OeeCategory,
}

