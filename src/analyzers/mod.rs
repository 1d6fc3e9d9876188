//! Audit scoring and comparison.
//!
//! This module turns canonical audit records into per-snapshot aggregates,
//! compares the current snapshot against the previous one, assigns
//! performance tiers, and builds the per-section and per-category
//! breakdowns the dashboard renders.

pub mod aggregate;
pub mod compare;
pub mod grade;
pub mod observations;
pub mod types;
pub mod utility;
