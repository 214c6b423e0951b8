//! Administration metrics.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

/// Usage totals over one time window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdministrationMetricsModel {
    /// Analyses created in the window.
    pub reports: u64,
    /// Distinct owners of those analyses.
    pub owners: u64,
    /// Workload inventory rows of those analyses.
    pub vms: u64,
    pub payloads_size_bytes: u64,
}

/// A labelled metrics window, one CSV row of the administration export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdministrationMetricsPeriod {
    pub label: &'static str,
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
    pub metrics: AdministrationMetricsModel,
}
