//! Analysis ("report") handlers: listing, lookup, deletion, savings
//! estimation and payload download.

use actix_web::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use actix_web::{HttpResponse, web};
use tracing::info;

use super::params::QueryParams;
use crate::auth::Identity;
use crate::error::{AppError, AppResult};
use crate::models::{AnalysisModel, PageBean, PayloadLink};
use crate::services::storage::attachment_disposition;
use crate::services::{AnalysisService, InitialSavingsEstimationReportService, PayloadStorage};

/// Owner-scoped analysis lookup, 404 when it does not exist for this caller.
pub(crate) async fn find_analysis(
    analyses: &dyn AnalysisService,
    identity: &Identity,
    id: i64,
) -> AppResult<AnalysisModel> {
    analyses
        .find_by_owner_and_id(&identity.username, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Analysis".to_string()))
}

/// List the caller's analyses, optionally searching by report name.
#[utoipa::path(
    get,
    path = "/api/xavier/report",
    tag = "Reports",
    params(
        ("page" = Option<u32>, Query, description = "Zero-based page (default 0)"),
        ("size" = Option<u32>, Query, description = "Page size (default 10)"),
        ("filterText" = Option<String>, Query, description = "Search text matched against report names")
    ),
    responses(
        (status = 200, description = "Page of analyses", body = crate::models::Page<AnalysisModel>),
        (status = 400, description = "Malformed paging parameters", body = crate::error::ErrorResponse),
        (status = 403, description = "Missing or invalid identity")
    ),
    security(("rh_identity" = []))
)]
pub async fn list_reports(
    identity: Identity,
    params: QueryParams,
    analyses: web::Data<dyn AnalysisService>,
) -> AppResult<HttpResponse> {
    let page = params.page(PageBean::default())?;

    let result = match params.last("filterText").filter(|t| !t.trim().is_empty()) {
        Some(text) => {
            analyses
                .find_by_owner_and_report_name(&identity.username, text, page)
                .await?
        }
        None => analyses.find_all_by_owner(&identity.username, page).await?,
    };

    Ok(HttpResponse::Ok().json(result))
}

#[utoipa::path(
    get,
    path = "/api/xavier/report/{id}",
    tag = "Reports",
    params(("id" = i64, Path, description = "Analysis id")),
    responses(
        (status = 200, description = "Analysis", body = AnalysisModel),
        (status = 404, description = "Analysis not found", body = crate::error::ErrorResponse),
        (status = 403, description = "Missing or invalid identity")
    ),
    security(("rh_identity" = []))
)]
pub async fn get_report(
    identity: Identity,
    path: web::Path<i64>,
    analyses: web::Data<dyn AnalysisService>,
) -> AppResult<HttpResponse> {
    let analysis = find_analysis(analyses.get_ref(), &identity, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(analysis))
}

/// Delete an analysis and every report derived from it.
#[utoipa::path(
    delete,
    path = "/api/xavier/report/{id}",
    tag = "Reports",
    params(("id" = i64, Path, description = "Analysis id")),
    responses(
        (status = 204, description = "Analysis deleted"),
        (status = 404, description = "Analysis not found", body = crate::error::ErrorResponse),
        (status = 403, description = "Missing or invalid identity")
    ),
    security(("rh_identity" = []))
)]
pub async fn delete_report(
    identity: Identity,
    path: web::Path<i64>,
    analyses: web::Data<dyn AnalysisService>,
) -> AppResult<HttpResponse> {
    let analysis = find_analysis(analyses.get_ref(), &identity, path.into_inner()).await?;
    analyses.delete_by_id(analysis.id).await?;

    info!("Analysis {} deleted by {}", analysis.id, identity.username);

    Ok(HttpResponse::NoContent().finish())
}

#[utoipa::path(
    get,
    path = "/api/xavier/report/{id}/initial-saving-estimation",
    tag = "Reports",
    params(("id" = i64, Path, description = "Analysis id")),
    responses(
        (status = 200, description = "Initial savings estimation", body = crate::models::InitialSavingsEstimationReportModel),
        (status = 404, description = "Report not found", body = crate::error::ErrorResponse),
        (status = 403, description = "Missing or invalid identity")
    ),
    security(("rh_identity" = []))
)]
pub async fn get_initial_saving_estimation(
    identity: Identity,
    path: web::Path<i64>,
    savings: web::Data<dyn InitialSavingsEstimationReportService>,
) -> AppResult<HttpResponse> {
    let report = savings
        .find_by_analysis_owner_and_analysis_id(&identity.username, path.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound("Initial savings estimation report".to_string()))?;

    Ok(HttpResponse::Ok().json(report))
}

/// Stream the uploaded payload back with the headers it was stored with.
#[utoipa::path(
    get,
    path = "/api/xavier/report/{id}/payload",
    tag = "Reports",
    params(("id" = i64, Path, description = "Analysis id")),
    responses(
        (status = 200, description = "Payload bytes", content_type = "application/octet-stream", body = Vec<u8>),
        (status = 404, description = "Analysis or payload not found", body = crate::error::ErrorResponse),
        (status = 403, description = "Missing or invalid identity")
    ),
    security(("rh_identity" = []))
)]
pub async fn get_payload(
    identity: Identity,
    path: web::Path<i64>,
    analyses: web::Data<dyn AnalysisService>,
    storage: web::Data<dyn PayloadStorage>,
) -> AppResult<HttpResponse> {
    let analysis = find_analysis(analyses.get_ref(), &identity, path.into_inner()).await?;
    let storage_id = analysis
        .payload_storage_id
        .as_deref()
        .ok_or_else(|| AppError::NotFound("Payload".to_string()))?;

    let payload = storage
        .fetch(storage_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Payload".to_string()))?;

    let disposition = payload.content_disposition.unwrap_or_else(|| {
        attachment_disposition(analysis.payload_name.as_deref().unwrap_or(storage_id))
    });
    let content_type = payload
        .content_type
        .unwrap_or_else(|| "application/octet-stream".to_string());

    Ok(HttpResponse::Ok()
        .insert_header((CONTENT_TYPE, content_type))
        .insert_header((CONTENT_DISPOSITION, disposition))
        .body(payload.data))
}

/// Presigned download link for the uploaded payload.
#[utoipa::path(
    get,
    path = "/api/xavier/report/{id}/payload-link",
    tag = "Reports",
    params(("id" = i64, Path, description = "Analysis id")),
    responses(
        (status = 200, description = "Payload link, `downloadLink` is null when no payload is stored", body = PayloadLink),
        (status = 404, description = "Analysis not found", body = crate::error::ErrorResponse),
        (status = 403, description = "Missing or invalid identity")
    ),
    security(("rh_identity" = []))
)]
pub async fn get_payload_link(
    identity: Identity,
    path: web::Path<i64>,
    analyses: web::Data<dyn AnalysisService>,
    storage: web::Data<dyn PayloadStorage>,
) -> AppResult<HttpResponse> {
    let analysis = find_analysis(analyses.get_ref(), &identity, path.into_inner()).await?;

    let download_link = match analysis.payload_storage_id.as_deref() {
        Some(storage_id) => {
            let filename = analysis.payload_name.as_deref().unwrap_or(storage_id);
            Some(storage.download_link(storage_id, filename).await?)
        }
        None => None,
    };

    Ok(HttpResponse::Ok().json(PayloadLink {
        filename: analysis.payload_name,
        download_link,
    }))
}
