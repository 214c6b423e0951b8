//! Administration export, restricted to the configured admin users.

use actix_web::{HttpResponse, web};
use chrono::{DateTime, Duration, Utc};
use tracing::info;

use super::csv_attachment;
use crate::auth::AdminIdentity;
use crate::error::AppResult;
use crate::models::AdministrationMetricsPeriod;
use crate::services::AnalysisService;
use crate::services::csv_export::administration_metrics_to_csv;

/// Usage metrics for the last week and for all time, as CSV.
#[utoipa::path(
    get,
    path = "/api/xavier/administration/report/csv",
    tag = "Administration",
    responses(
        (status = 200, description = "CSV attachment", content_type = "text/csv", body = String),
        (status = 403, description = "Caller is not an administrator")
    ),
    security(("rh_identity" = []))
)]
pub async fn get_administration_report_csv(
    admin: AdminIdentity,
    analyses: web::Data<dyn AnalysisService>,
) -> AppResult<HttpResponse> {
    let now = Utc::now();
    let windows = [
        ("Last 7 days", now - Duration::days(7)),
        ("All time", DateTime::<Utc>::UNIX_EPOCH),
    ];

    let mut periods = Vec::with_capacity(windows.len());
    for (label, from) in windows {
        let metrics = analyses.get_administration_metrics(from, now).await?;
        periods.push(AdministrationMetricsPeriod {
            label,
            from,
            to: now,
            metrics,
        });
    }

    info!("Administration report exported by {}", admin.0.username);

    let body = administration_metrics_to_csv(&periods)?;
    let filename = format!("administration_report_{}.csv", now.format("%Y-%m-%d"));
    Ok(csv_attachment(body, &filename))
}
