//! Overall Equipment Effectiveness for a single hour slot.
//!
//! All four outputs are percentages rounded to two decimals. Each metric is
//! rounded once, from unrounded inputs, so `oee` is computed from the raw
//! availability, performance and quality rather than their rounded values.

use serde::{Deserialize, Serialize};

use crate::models::ProductionEntry;

/// OEE breakdown for one entry, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct OeeMetrics {
    pub availability: f64,
    pub performance: f64,
    pub quality: f64,
    pub oee: f64,
}

impl OeeMetrics {
    /// Compute metrics from an entry's raw counters.
    pub fn for_entry(entry: &ProductionEntry) -> Self {
        calculate_oee(
            entry.available_time,
            entry.loss_time,
            entry.line_capacity,
            entry.good_parts,
            entry.rejects,
        )
    }

    /// True for the zero result returned when planned time or capacity is missing.
    pub fn is_degenerate(&self) -> bool {
        *self == Self::default()
    }
}

/// Compute availability, performance, quality and OEE.
///
/// Returns all zeros when `available_time_minutes` or
/// `line_capacity_per_hour` is zero. Loss time above the planned time is not
/// clamped and produces negative availability and performance.
pub fn calculate_oee(
    available_time_minutes: u32,
    loss_time_minutes: u32,
    line_capacity_per_hour: u32,
    good_parts: u32,
    rejects: u32,
) -> OeeMetrics {
    if available_time_minutes == 0 || line_capacity_per_hour == 0 {
        return OeeMetrics::default();
    }

    let available = available_time_minutes as f64;
    let operating_time = available - loss_time_minutes as f64;
    let availability = operating_time / available * 100.0;

    let total_produced = good_parts as f64 + rejects as f64;
    let ideal_production = (operating_time / 60.0) * line_capacity_per_hour as f64;

    let performance = if ideal_production > 0.0 {
        total_produced / ideal_production * 100.0
    } else {
        0.0
    };
    let quality = if total_produced > 0.0 {
        good_parts as f64 / total_produced * 100.0
    } else {
        0.0
    };

    let oee = availability * performance * quality / 10_000.0;

    OeeMetrics {
        availability: round2(availability),
        performance: round2(performance),
        quality: round2(quality),
        oee: round2(oee),
    }
}

/// Round half-up to two decimals.
pub fn round2(value: f64) -> f64 {
    (value * 100.0 + 0.5).floor() / 100.0
}

/// Band an OEE score falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OeeBand {
    #[serde(rename = "World Class")]
    WorldClass,
    #[serde(rename = "Good")]
    Good,
    #[serde(rename = "Needs Improvement")]
    NeedsImprovement,
}

impl OeeBand {
    pub fn label(&self) -> &'static str {
        match self {
            OeeBand::WorldClass => "World Class",
            OeeBand::Good => "Good",
            OeeBand::NeedsImprovement => "Needs Improvement",
        }
    }

    pub fn color_hint(&self) -> &'static str {
        match self {
            OeeBand::WorldClass => "green",
            OeeBand::Good => "yellow",
            OeeBand::NeedsImprovement => "red",
        }
    }
}

impl std::fmt::Display for OeeBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Category label plus a display color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OeeCategory {
    pub category: OeeBand,
    pub color_hint: &'static str,
}

/// Classify an OEE score. Boundary values belong to the higher band.
pub fn get_oee_category(oee: f64) -> OeeCategory {
    let band = if oee >= 85.0 {
        OeeBand::WorldClass
    } else if oee >= 60.0 {
        OeeBand::Good
    } else {
        OeeBand::NeedsImprovement
    };

    OeeCategory {
        category: band,
        color_hint: band.color_hint(),
    }
}

#[cfg(test)]
#[path = "oee_tests.rs"]
mod tests;
