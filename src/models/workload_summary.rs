//! Workload summary report and its paged sub-resources.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Aggregated view of an analysis' environment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WorkloadSummaryReportModel {
    pub id: i64,
    pub summary: Vec<SummaryModel>,
    pub complexity: Option<ComplexityModel>,
    #[serde(rename = "recommendedTargetsIMS")]
    pub recommended_targets_ims: Option<RecommendedTargetsImsModel>,
    #[serde(rename = "workloadsDetectedOSTypes")]
    pub workloads_detected_os_types: Vec<WorkloadsDetectedOsTypeModel>,
}

/// Per-provider totals.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SummaryModel {
    pub provider: String,
    pub product: Option<String>,
    pub version: Option<String>,
    pub clusters: i32,
    pub sockets: i64,
    pub vms: i32,
    pub hosts: i32,
}

/// VM count per migration effort bucket.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ComplexityModel {
    pub easy: i32,
    pub medium: i32,
    pub hard: i32,
    pub unknown: i32,
    pub unsupported: i32,
}

/// VM count per recommended migration target.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecommendedTargetsImsModel {
    pub total: i32,
    pub rhv: i32,
    pub osp: i32,
    pub rhel: i32,
    pub ocp: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WorkloadsDetectedOsTypeModel {
    pub os_name: String,
    pub total: i32,
}

/// A workload detected in the analysis (`/workload-summary/workloads`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WorkloadModel {
    pub id: i64,
    pub workload: String,
    pub os_name: Option<String>,
    pub clusters: i32,
    pub vms: i32,
}

/// A migration flag raised in the analysis (`/workload-summary/flags`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FlagModel {
    pub id: i64,
    pub flag: String,
    pub os_name: Option<String>,
    pub clusters: i32,
    pub vms: i32,
}
