//! # OEE Tracker Backend
//!
//! Production tracking for manufacturing lines: team leaders record hourly
//! output, supervisors approve or reject it, and approved data feeds the
//! Overall Equipment Effectiveness (OEE) figures and the dashboard rollups.
//!
//! ## Features
//!
//! - **OEE Calculator**: availability, performance, quality and OEE per entry
//! - **Aggregation**: summary counts plus per-line, per-shift, per-model and
//!   daily rollups over approved entries
//! - **Workflow**: PENDING → APPROVED/REJECTED review, role-based access
//! - **HTTP API**: RESTful endpoints for the frontend
//!
//! ## Architecture
//!
//! The crate is organized into several logical modules:
//!
//! - [`api`]: Data Transfer Objects (DTOs) and identifier types
//! - [`models`]: Production entries, users and roles
//! - [`services`]: OEE calculation and aggregation
//! - [`db`]: Repository pattern, in-memory storage and workflow services
//! - [`config`]: TOML and environment configuration
//! - [`routes`]: Response shapes for each dashboard endpoint
//! - [`http`]: Axum-based HTTP server and request handlers

// Allow large error types - RepositoryError contains rich context for debugging
#![allow(clippy::result_large_err)]

pub mod api;
pub mod config;
pub mod db;
pub mod models;
pub mod routes;
pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
