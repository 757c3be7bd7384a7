//! Response shapes for the entry and dashboard endpoints.

pub mod analytics;
pub mod entries;
