//! API endpoint modules.

use actix_web::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use actix_web::{HttpResponse, web};

use crate::error::AppError;

pub mod administration;
pub mod health;
pub mod openapi;
pub mod params;
pub mod reports;
pub mod workload_inventory;
pub mod workload_summary;

pub use health::configure_health_routes;
pub use openapi::ApiDoc;
pub use params::QueryParams;

/// CSV body sent as a file download named `filename`.
pub(crate) fn csv_attachment(body: String, filename: &str) -> HttpResponse {
    HttpResponse::Ok()
        .insert_header((CONTENT_TYPE, "text/csv"))
        .insert_header((CONTENT_DISPOSITION, format!("attachment;filename={}", filename)))
        .body(body)
}

/// Register every report route. Mount inside the API scope.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    // Non-numeric ids are client errors, not unknown routes.
    cfg.app_data(web::PathConfig::default().error_handler(|err, _req| {
        AppError::InvalidInput(format!("Invalid path parameter: {}", err)).into()
    }))
    .service(web::resource("/report").route(web::get().to(reports::list_reports)))
    .service(
        web::resource("/report/{id}")
            .route(web::get().to(reports::get_report))
            .route(web::delete().to(reports::delete_report)),
    )
    .service(
        web::resource("/report/{id}/initial-saving-estimation")
            .route(web::get().to(reports::get_initial_saving_estimation)),
    )
    .service(web::resource("/report/{id}/payload").route(web::get().to(reports::get_payload)))
    .service(
        web::resource("/report/{id}/payload-link").route(web::get().to(reports::get_payload_link)),
    )
    .service(
        web::resource("/report/{id}/workload-inventory")
            .route(web::get().to(workload_inventory::get_workload_inventory)),
    )
    .service(
        web::resource("/report/{id}/workload-inventory/csv")
            .route(web::get().to(workload_inventory::get_workload_inventory_csv)),
    )
    .service(
        web::resource("/report/{id}/workload-inventory/filtered-csv")
            .route(web::get().to(workload_inventory::get_workload_inventory_filtered_csv)),
    )
    .service(
        web::resource("/report/{id}/workload-inventory/available-filters")
            .route(web::get().to(workload_inventory::get_available_filters)),
    )
    .service(
        web::resource("/report/{id}/workload-summary")
            .route(web::get().to(workload_summary::get_workload_summary)),
    )
    .service(
        web::resource("/report/{id}/workload-summary/workloads")
            .route(web::get().to(workload_summary::get_workloads)),
    )
    .service(
        web::resource("/report/{id}/workload-summary/flags")
            .route(web::get().to(workload_summary::get_flags)),
    )
    .service(
        web::resource("/administration/report/csv")
            .route(web::get().to(administration::get_administration_report_csv)),
    );
}
