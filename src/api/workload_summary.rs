//! Workload summary handlers.

use actix_web::{HttpResponse, web};

use super::params::QueryParams;
use crate::auth::Identity;
use crate::error::{AppError, AppResult};
use crate::models::{FlagModel, PageBean, SortBean, WorkloadModel, WorkloadSummaryReportModel};
use crate::services::{FlagService, WorkloadService, WorkloadSummaryReportService};

#[utoipa::path(
    get,
    path = "/api/xavier/report/{id}/workload-summary",
    tag = "Workload Summary",
    params(("id" = i64, Path, description = "Analysis id")),
    responses(
        (status = 200, description = "Workload summary", body = WorkloadSummaryReportModel),
        (status = 404, description = "Report not found", body = crate::error::ErrorResponse),
        (status = 403, description = "Missing or invalid identity")
    ),
    security(("rh_identity" = []))
)]
pub async fn get_workload_summary(
    identity: Identity,
    path: web::Path<i64>,
    summaries: web::Data<dyn WorkloadSummaryReportService>,
) -> AppResult<HttpResponse> {
    let report = summaries
        .find_by_analysis_owner_and_analysis_id(&identity.username, path.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound("Workload summary report".to_string()))?;

    Ok(HttpResponse::Ok().json(report))
}

/// Detected workloads, by default newest first.
#[utoipa::path(
    get,
    path = "/api/xavier/report/{id}/workload-summary/workloads",
    tag = "Workload Summary",
    params(
        ("id" = i64, Path, description = "Analysis id"),
        ("page" = Option<u32>, Query, description = "Zero-based page (default 0)"),
        ("size" = Option<u32>, Query, description = "Page size (default 10)"),
        ("orderBy" = Option<String>, Query, description = "id, workload, osName, clusters or vms (default id)"),
        ("orderAsc" = Option<bool>, Query, description = "Ascending order (default false)")
    ),
    responses(
        (status = 200, description = "Page of workloads", body = crate::models::Page<WorkloadModel>),
        (status = 400, description = "Malformed paging or sorting parameters", body = crate::error::ErrorResponse),
        (status = 403, description = "Missing or invalid identity")
    ),
    security(("rh_identity" = []))
)]
pub async fn get_workloads(
    identity: Identity,
    path: web::Path<i64>,
    params: QueryParams,
    workloads: web::Data<dyn WorkloadService>,
) -> AppResult<HttpResponse> {
    let page = params.page(PageBean::default())?;
    let sort = params.sort(SortBean::workloads_default())?;

    let result = workloads
        .find_by_report_analysis_owner_and_report_analysis_id(
            &identity.username,
            path.into_inner(),
            page,
            &sort,
        )
        .await?;

    Ok(HttpResponse::Ok().json(result))
}

#[utoipa::path(
    get,
    path = "/api/xavier/report/{id}/workload-summary/flags",
    tag = "Workload Summary",
    params(
        ("id" = i64, Path, description = "Analysis id"),
        ("page" = Option<u32>, Query, description = "Zero-based page (default 0)"),
        ("size" = Option<u32>, Query, description = "Page size (default 10)"),
        ("orderBy" = Option<String>, Query, description = "id, flag, osName, clusters or vms (default id)"),
        ("orderAsc" = Option<bool>, Query, description = "Ascending order (default true)")
    ),
    responses(
        (status = 200, description = "Page of flags", body = crate::models::Page<FlagModel>),
        (status = 400, description = "Malformed paging or sorting parameters", body = crate::error::ErrorResponse),
        (status = 403, description = "Missing or invalid identity")
    ),
    security(("rh_identity" = []))
)]
pub async fn get_flags(
    identity: Identity,
    path: web::Path<i64>,
    params: QueryParams,
    flags: web::Data<dyn FlagService>,
) -> AppResult<HttpResponse> {
    let page = params.page(PageBean::default())?;
    let sort = params.sort(SortBean::flags_default())?;

    let result = flags
        .find_by_report_analysis_owner_and_report_analysis_id(
            &identity.username,
            path.into_inner(),
            page,
            &sort,
        )
        .await?;

    Ok(HttpResponse::Ok().json(result))
}
