//! Migration report server - main entry point.
//!
//! Starts the Actix-web server with configured routes and middleware.

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::http::header::{self, HeaderName};
use actix_web::{App, HttpServer, web};
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use migration_report_lib::api::{self, ApiDoc};
use migration_report_lib::config::{API_SCOPE, Config, IDENTITY_HEADER};
use migration_report_lib::middleware::RequestLogger;
use migration_report_lib::services::{
    AnalysisService, FlagService, InMemoryStore, InitialSavingsEstimationReportService,
    PayloadStorage, S3Storage, WorkloadInventoryReportService, WorkloadService,
    WorkloadSummaryReportService,
};

/// Perform health check (for Docker healthcheck).
fn health_check() -> bool {
    Config::from_env().is_ok()
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Check for --health-check flag (used by Docker HEALTHCHECK)
    if std::env::args().any(|arg| arg == "--health-check") {
        dotenvy::dotenv().ok();
        std::process::exit(if health_check() { 0 } else { 1 });
    }

    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");

    // Load configuration
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            error!("");
            error!("Please check your environment variables:");
            error!("  - RUST_ENV must be set to 'development' or 'production'");
            error!("  - In production, S3_ACCESS_KEY, S3_SECRET_KEY and XAV_ADMIN_USERS must be set");
            error!("  - In production, values must not match development defaults");
            std::process::exit(1);
        }
    };

    info!("========================================");
    info!("  Migration Report Server");
    info!("  Environment: {}", config.environment);
    info!("========================================");

    if config.is_development() {
        warn!("Running in DEVELOPMENT mode - do not use in production!");
        info!("Using development defaults for S3 and admin users");
    }

    // Report collaborators share one store
    let store = Arc::new(InMemoryStore::new());
    let analyses: Arc<dyn AnalysisService> = store.clone();
    let inventory: Arc<dyn WorkloadInventoryReportService> = store.clone();
    let summaries: Arc<dyn WorkloadSummaryReportService> = store.clone();
    let workloads: Arc<dyn WorkloadService> = store.clone();
    let flags: Arc<dyn FlagService> = store.clone();
    let savings: Arc<dyn InitialSavingsEstimationReportService> = store;

    let storage: Arc<dyn PayloadStorage> =
        Arc::new(S3Storage::new(&config.s3, config.payload_link_expiry_secs));

    let bind_address = config.bind_address();
    let is_development = config.is_development();
    let admin_users = config.admin_users.clone();
    let openapi = ApiDoc::openapi();

    let worker_count = if is_development {
        info!(
            "Starting server at http://{} (4 workers - development mode)",
            bind_address
        );
        4
    } else {
        let cpus = num_cpus::get();
        info!(
            "Starting server at http://{} ({} workers)",
            bind_address, cpus
        );
        cpus
    };

    let server = HttpServer::new(move || {
        let identity_header = HeaderName::from_static(IDENTITY_HEADER);
        let cors = if is_development {
            // Permissive CORS for development
            Cors::default()
                .allowed_origin("http://localhost:3000")
                .allowed_origin("http://127.0.0.1:3000")
                .allowed_methods(vec!["GET", "DELETE", "OPTIONS"])
                .allowed_headers(vec![header::ACCEPT, header::CONTENT_TYPE, identity_header])
                .max_age(3600)
        } else {
            // Restrictive CORS for production (same-origin only)
            Cors::default()
                .allowed_methods(vec!["GET", "DELETE", "OPTIONS"])
                .allowed_headers(vec![header::ACCEPT, header::CONTENT_TYPE, identity_header])
                .max_age(3600)
        };

        App::new()
            // Add CORS middleware (must be before other middleware)
            .wrap(cors)
            .wrap(RequestLogger)
            // Add shared state
            .app_data(web::Data::new(config.clone()))
            .app_data(web::Data::new(admin_users.clone()))
            .app_data(web::Data::from(analyses.clone()))
            .app_data(web::Data::from(inventory.clone()))
            .app_data(web::Data::from(summaries.clone()))
            .app_data(web::Data::from(workloads.clone()))
            .app_data(web::Data::from(flags.clone()))
            .app_data(web::Data::from(savings.clone()))
            .app_data(web::Data::from(storage.clone()))
            .service(
                web::scope(API_SCOPE)
                    .configure(api::configure_health_routes)
                    .configure(api::configure_routes),
            )
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", openapi.clone()),
            )
    });

    server
        .workers(worker_count)
        .bind(&bind_address)?
        .run()
        .await
}
