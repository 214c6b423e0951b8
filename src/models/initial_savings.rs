//! Initial savings estimation report.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Three-year cost projection of moving an analysed environment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InitialSavingsEstimationReportModel {
    pub id: i64,
    pub customer_id: Option<String>,
    pub file_name: Option<String>,
    pub creation_date: Option<DateTime<Utc>>,
    pub environment: EnvironmentModel,
    pub source_costs: SourceCostsModel,
    pub rhv_savings: RhvSavingsModel,
}

/// Size of the source environment and its expected growth.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentModel {
    pub hypervisors: i32,
    pub year1_hypervisor: i32,
    pub year2_hypervisor: i32,
    pub year3_hypervisor: i32,
    pub growth_rate_percentage: f64,
}

/// Yearly cost of staying on the source platform.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SourceCostsModel {
    pub year1_server: f64,
    pub year2_server: f64,
    pub year3_server: f64,
    pub total_server: f64,
}

/// Projected savings after migrating to RHV.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RhvSavingsModel {
    pub rhv_save_from: f64,
    pub rhv_save_to: f64,
    pub rhv_save_from_percentage: f64,
    pub rhv_save_to_percentage: f64,
}
