//! Workload inventory handlers: paged JSON, CSV exports and the filter values
//! available for an analysis.

use actix_web::{HttpResponse, web};
use tracing::debug;

use super::csv_attachment;
use super::params::QueryParams;
use super::reports::find_analysis;
use crate::auth::Identity;
use crate::error::AppResult;
use crate::models::{PageBean, SortBean, WorkloadInventoryFilterModel, WorkloadInventoryReportModel};
use crate::services::csv_export::workload_inventory_to_csv;
use crate::services::{AnalysisService, WorkloadInventoryReportService};

fn csv_filename(analysis_id: i64) -> String {
    format!("workloadInventory_{}.csv", analysis_id)
}

/// One page of inventory rows, filtered and sorted by the query string.
#[utoipa::path(
    get,
    path = "/api/xavier/report/{id}/workload-inventory",
    tag = "Workload Inventory",
    params(
        ("id" = i64, Path, description = "Analysis id"),
        ("page" = Option<u32>, Query, description = "Zero-based page (default 0)"),
        ("size" = Option<u32>, Query, description = "Page size (default 10)"),
        ("orderBy" = Option<String>, Query, description = "Column to order by"),
        ("orderAsc" = Option<bool>, Query, description = "Ascending order (default true)"),
        ("provider" = Option<Vec<String>>, Query, description = "Repeatable provider filter"),
        ("datacenter" = Option<Vec<String>>, Query, description = "Repeatable datacenter filter"),
        ("cluster" = Option<Vec<String>>, Query, description = "Repeatable cluster filter"),
        ("vmName" = Option<Vec<String>>, Query, description = "Repeatable VM name filter"),
        ("osName" = Option<Vec<String>>, Query, description = "Repeatable OS type filter"),
        ("workload" = Option<Vec<String>>, Query, description = "Repeatable workload filter"),
        ("recommendedTargetIMS" = Option<Vec<String>>, Query, description = "Repeatable recommended target filter"),
        ("flagIMS" = Option<Vec<String>>, Query, description = "Repeatable flag filter"),
        ("complexity" = Option<Vec<String>>, Query, description = "Repeatable effort filter")
    ),
    responses(
        (status = 200, description = "Page of inventory rows", body = crate::models::Page<WorkloadInventoryReportModel>),
        (status = 400, description = "Malformed paging or sorting parameters", body = crate::error::ErrorResponse),
        (status = 403, description = "Missing or invalid identity")
    ),
    security(("rh_identity" = []))
)]
pub async fn get_workload_inventory(
    identity: Identity,
    path: web::Path<i64>,
    params: QueryParams,
    inventory: web::Data<dyn WorkloadInventoryReportService>,
) -> AppResult<HttpResponse> {
    let analysis_id = path.into_inner();
    let page = params.page(PageBean::default())?;
    let sort = params.sort(SortBean::natural())?;
    let filter = params.workload_inventory_filter();

    let result = inventory
        .find_page_by_analysis_owner_and_analysis_id(
            &identity.username,
            analysis_id,
            page,
            &sort,
            &filter,
        )
        .await?;

    Ok(HttpResponse::Ok().json(result))
}

/// Every inventory row of the analysis as CSV, in natural order.
#[utoipa::path(
    get,
    path = "/api/xavier/report/{id}/workload-inventory/csv",
    tag = "Workload Inventory",
    params(("id" = i64, Path, description = "Analysis id")),
    responses(
        (status = 200, description = "CSV attachment", content_type = "text/csv", body = String),
        (status = 403, description = "Missing or invalid identity")
    ),
    security(("rh_identity" = []))
)]
pub async fn get_workload_inventory_csv(
    identity: Identity,
    path: web::Path<i64>,
    inventory: web::Data<dyn WorkloadInventoryReportService>,
) -> AppResult<HttpResponse> {
    let analysis_id = path.into_inner();
    let rows = inventory
        .find_by_analysis_owner_and_analysis_id(&identity.username, analysis_id)
        .await?;

    debug!("Exporting {} inventory rows of analysis {}", rows.len(), analysis_id);

    let body = workload_inventory_to_csv(&rows)?;
    Ok(csv_attachment(body, &csv_filename(analysis_id)))
}

/// Inventory rows matching the query-string filters as CSV.
#[utoipa::path(
    get,
    path = "/api/xavier/report/{id}/workload-inventory/filtered-csv",
    tag = "Workload Inventory",
    params(
        ("id" = i64, Path, description = "Analysis id"),
        ("orderBy" = Option<String>, Query, description = "Column to order by"),
        ("orderAsc" = Option<bool>, Query, description = "Ascending order (default true)"),
        ("provider" = Option<Vec<String>>, Query, description = "Repeatable provider filter"),
        ("datacenter" = Option<Vec<String>>, Query, description = "Repeatable datacenter filter"),
        ("cluster" = Option<Vec<String>>, Query, description = "Repeatable cluster filter"),
        ("vmName" = Option<Vec<String>>, Query, description = "Repeatable VM name filter"),
        ("osName" = Option<Vec<String>>, Query, description = "Repeatable OS type filter"),
        ("workload" = Option<Vec<String>>, Query, description = "Repeatable workload filter"),
        ("recommendedTargetIMS" = Option<Vec<String>>, Query, description = "Repeatable recommended target filter"),
        ("flagIMS" = Option<Vec<String>>, Query, description = "Repeatable flag filter"),
        ("complexity" = Option<Vec<String>>, Query, description = "Repeatable effort filter")
    ),
    responses(
        (status = 200, description = "CSV attachment", content_type = "text/csv", body = String),
        (status = 400, description = "Malformed sorting parameters", body = crate::error::ErrorResponse),
        (status = 403, description = "Missing or invalid identity")
    ),
    security(("rh_identity" = []))
)]
pub async fn get_workload_inventory_filtered_csv(
    identity: Identity,
    path: web::Path<i64>,
    params: QueryParams,
    inventory: web::Data<dyn WorkloadInventoryReportService>,
) -> AppResult<HttpResponse> {
    let analysis_id = path.into_inner();
    let sort = params.sort(SortBean::natural())?;
    let filter = params.workload_inventory_filter();

    let rows = inventory
        .find_filtered_by_analysis_owner_and_analysis_id(
            &identity.username,
            analysis_id,
            &sort,
            &filter,
        )
        .await?;

    let body = workload_inventory_to_csv(&rows)?;
    Ok(csv_attachment(body, &csv_filename(analysis_id)))
}

/// Distinct values present in the analysis for each filterable column.
#[utoipa::path(
    get,
    path = "/api/xavier/report/{id}/workload-inventory/available-filters",
    tag = "Workload Inventory",
    params(("id" = i64, Path, description = "Analysis id")),
    responses(
        (status = 200, description = "Available filter values", body = WorkloadInventoryFilterModel),
        (status = 404, description = "Analysis not found", body = crate::error::ErrorResponse),
        (status = 403, description = "Missing or invalid identity")
    ),
    security(("rh_identity" = []))
)]
pub async fn get_available_filters(
    identity: Identity,
    path: web::Path<i64>,
    analyses: web::Data<dyn AnalysisService>,
    inventory: web::Data<dyn WorkloadInventoryReportService>,
) -> AppResult<HttpResponse> {
    let analysis = find_analysis(analyses.get_ref(), &identity, path.into_inner()).await?;
    let filters = inventory
        .find_available_filters_by_analysis_id(analysis.id)
        .await?;

    Ok(HttpResponse::Ok().json(filters))
}
