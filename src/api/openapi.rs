//! OpenAPI documentation configuration.

use utoipa::OpenApi;

use crate::config::IDENTITY_HEADER;
use crate::{api, error, models};

/// OpenAPI documentation.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Migration Report Server",
        version = "0.1.0",
        description = "Workload inventory, workload summary and savings estimation reports of migration analyses"
    ),
    servers(
        (url = "/", description = "Local server")
    ),
    paths(
        // Health endpoints
        api::health::health,
        api::health::info,
        // Report endpoints
        api::reports::list_reports,
        api::reports::get_report,
        api::reports::delete_report,
        api::reports::get_initial_saving_estimation,
        api::reports::get_payload,
        api::reports::get_payload_link,
        // Workload inventory endpoints
        api::workload_inventory::get_workload_inventory,
        api::workload_inventory::get_workload_inventory_csv,
        api::workload_inventory::get_workload_inventory_filtered_csv,
        api::workload_inventory::get_available_filters,
        // Workload summary endpoints
        api::workload_summary::get_workload_summary,
        api::workload_summary::get_workloads,
        api::workload_summary::get_flags,
        // Administration endpoints
        api::administration::get_administration_report_csv,
    ),
    components(
        schemas(
            // Common
            error::ErrorResponse,
            // Health
            api::health::HealthResponse,
            api::health::ServerInfoResponse,
            // Reports
            models::AnalysisStatus,
            models::AnalysisModel,
            models::PayloadLink,
            models::InitialSavingsEstimationReportModel,
            models::EnvironmentModel,
            models::SourceCostsModel,
            models::RhvSavingsModel,
            // Workload inventory
            models::WorkloadInventoryReportModel,
            models::WorkloadInventoryFilterModel,
            // Workload summary
            models::WorkloadSummaryReportModel,
            models::SummaryModel,
            models::ComplexityModel,
            models::RecommendedTargetsImsModel,
            models::WorkloadsDetectedOsTypeModel,
            models::WorkloadModel,
            models::FlagModel,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Reports", description = "Analyses, savings estimation and payloads"),
        (name = "Workload Inventory", description = "Per-VM inventory rows and CSV exports"),
        (name = "Workload Summary", description = "Aggregated workloads and flags"),
        (name = "Administration", description = "Usage metrics for administrators")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// Add the identity header security scheme.
struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "rh_identity",
                utoipa::openapi::security::SecurityScheme::ApiKey(
                    utoipa::openapi::security::ApiKey::Header(
                        utoipa::openapi::security::ApiKeyValue::new(IDENTITY_HEADER),
                    ),
                ),
            );
        }
    }
}
