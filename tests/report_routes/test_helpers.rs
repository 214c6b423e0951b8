//! Shared test helpers for the report route tests.

use std::sync::{Arc, Mutex};

use actix_web::{App, dev::ServiceResponse, test, web};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use migration_report_lib::auth::encode_identity;
use migration_report_lib::config::{
    API_SCOPE, AdminUsers, Config, Environment, IDENTITY_HEADER, S3Config, defaults,
};
use migration_report_lib::error::AppResult;
use migration_report_lib::middleware::RequestLogger;
use migration_report_lib::models::{
    AdministrationMetricsModel, AnalysisModel, FlagModel, InitialSavingsEstimationReportModel,
    Page, PageBean, SortBean, WorkloadInventoryFilterBean, WorkloadInventoryFilterModel,
    WorkloadInventoryReportModel, WorkloadModel, WorkloadSummaryReportModel,
};
use migration_report_lib::services::{
    AnalysisService, FlagService, InMemoryStorage, InMemoryStore,
    InitialSavingsEstimationReportService, PayloadStorage, WorkloadInventoryReportService,
    WorkloadService, WorkloadSummaryReportService,
};

/// Owner of the seeded analyses.
pub const OWNER: &str = "mrizzi@redhat.com";

/// A configured administrator.
pub const ADMIN: &str = "admin2@redhat.com";

/// A collaborator call with the arguments it received.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    FindAllByOwner {
        owner: String,
        page: PageBean,
    },
    FindByOwnerAndReportName {
        owner: String,
        report_name: String,
        page: PageBean,
    },
    FindByOwnerAndId {
        owner: String,
        id: i64,
    },
    DeleteById(i64),
    GetAdministrationMetrics,
    FindInventory {
        owner: String,
        analysis_id: i64,
    },
    FindFilteredInventory {
        owner: String,
        analysis_id: i64,
        sort: SortBean,
        filter: WorkloadInventoryFilterBean,
    },
    FindInventoryPage {
        owner: String,
        analysis_id: i64,
        page: PageBean,
        sort: SortBean,
        filter: WorkloadInventoryFilterBean,
    },
    FindAvailableFilters(i64),
    FindWorkloadSummary {
        owner: String,
        analysis_id: i64,
    },
    FindWorkloads {
        owner: String,
        analysis_id: i64,
        page: PageBean,
        sort: SortBean,
    },
    FindFlags {
        owner: String,
        analysis_id: i64,
        page: PageBean,
        sort: SortBean,
    },
    FindInitialSavings {
        owner: String,
        analysis_id: i64,
    },
}

/// Every collaborator trait, recording each call before delegating to an
/// in-memory store.
#[derive(Default)]
pub struct RecordingStore {
    pub store: InMemoryStore,
    calls: Mutex<Vec<Call>>,
}

impl RecordingStore {
    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    pub fn count(&self, matches: impl Fn(&Call) -> bool) -> usize {
        self.calls().iter().filter(|c| matches(c)).count()
    }
}

#[async_trait]
impl AnalysisService for RecordingStore {
    async fn find_all_by_owner(&self, owner: &str, page: PageBean) -> AppResult<Page<AnalysisModel>> {
        self.record(Call::FindAllByOwner {
            owner: owner.to_string(),
            page,
        });
        self.store.find_all_by_owner(owner, page).await
    }

    async fn find_by_owner_and_report_name(
        &self,
        owner: &str,
        report_name: &str,
        page: PageBean,
    ) -> AppResult<Page<AnalysisModel>> {
        self.record(Call::FindByOwnerAndReportName {
            owner: owner.to_string(),
            report_name: report_name.to_string(),
            page,
        });
        self.store
            .find_by_owner_and_report_name(owner, report_name, page)
            .await
    }

    async fn find_by_owner_and_id(&self, owner: &str, id: i64) -> AppResult<Option<AnalysisModel>> {
        self.record(Call::FindByOwnerAndId {
            owner: owner.to_string(),
            id,
        });
        self.store.find_by_owner_and_id(owner, id).await
    }

    async fn delete_by_id(&self, id: i64) -> AppResult<()> {
        self.record(Call::DeleteById(id));
        self.store.delete_by_id(id).await
    }

    async fn get_administration_metrics(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> AppResult<AdministrationMetricsModel> {
        self.record(Call::GetAdministrationMetrics);
        self.store.get_administration_metrics(from, to).await
    }
}

#[async_trait]
impl WorkloadInventoryReportService for RecordingStore {
    async fn find_by_analysis_owner_and_analysis_id(
        &self,
        owner: &str,
        analysis_id: i64,
    ) -> AppResult<Vec<WorkloadInventoryReportModel>> {
        self.record(Call::FindInventory {
            owner: owner.to_string(),
            analysis_id,
        });
        WorkloadInventoryReportService::find_by_analysis_owner_and_analysis_id(
            &self.store,
            owner,
            analysis_id,
        )
        .await
    }

    async fn find_filtered_by_analysis_owner_and_analysis_id(
        &self,
        owner: &str,
        analysis_id: i64,
        sort: &SortBean,
        filter: &WorkloadInventoryFilterBean,
    ) -> AppResult<Vec<WorkloadInventoryReportModel>> {
        self.record(Call::FindFilteredInventory {
            owner: owner.to_string(),
            analysis_id,
            sort: sort.clone(),
            filter: filter.clone(),
        });
        self.store
            .find_filtered_by_analysis_owner_and_analysis_id(owner, analysis_id, sort, filter)
            .await
    }

    async fn find_page_by_analysis_owner_and_analysis_id(
        &self,
        owner: &str,
        analysis_id: i64,
        page: PageBean,
        sort: &SortBean,
        filter: &WorkloadInventoryFilterBean,
    ) -> AppResult<Page<WorkloadInventoryReportModel>> {
        self.record(Call::FindInventoryPage {
            owner: owner.to_string(),
            analysis_id,
            page,
            sort: sort.clone(),
            filter: filter.clone(),
        });
        self.store
            .find_page_by_analysis_owner_and_analysis_id(owner, analysis_id, page, sort, filter)
            .await
    }

    async fn find_available_filters_by_analysis_id(
        &self,
        analysis_id: i64,
    ) -> AppResult<WorkloadInventoryFilterModel> {
        self.record(Call::FindAvailableFilters(analysis_id));
        self.store
            .find_available_filters_by_analysis_id(analysis_id)
            .await
    }
}

#[async_trait]
impl WorkloadSummaryReportService for RecordingStore {
    async fn find_by_analysis_owner_and_analysis_id(
        &self,
        owner: &str,
        analysis_id: i64,
    ) -> AppResult<Option<WorkloadSummaryReportModel>> {
        self.record(Call::FindWorkloadSummary {
            owner: owner.to_string(),
            analysis_id,
        });
        WorkloadSummaryReportService::find_by_analysis_owner_and_analysis_id(
            &self.store,
            owner,
            analysis_id,
        )
        .await
    }
}

#[async_trait]
impl InitialSavingsEstimationReportService for RecordingStore {
    async fn find_by_analysis_owner_and_analysis_id(
        &self,
        owner: &str,
        analysis_id: i64,
    ) -> AppResult<Option<InitialSavingsEstimationReportModel>> {
        self.record(Call::FindInitialSavings {
            owner: owner.to_string(),
            analysis_id,
        });
        InitialSavingsEstimationReportService::find_by_analysis_owner_and_analysis_id(
            &self.store,
            owner,
            analysis_id,
        )
        .await
    }
}

#[async_trait]
impl WorkloadService for RecordingStore {
    async fn find_by_report_analysis_owner_and_report_analysis_id(
        &self,
        owner: &str,
        analysis_id: i64,
        page: PageBean,
        sort: &SortBean,
    ) -> AppResult<Page<WorkloadModel>> {
        self.record(Call::FindWorkloads {
            owner: owner.to_string(),
            analysis_id,
            page,
            sort: sort.clone(),
        });
        WorkloadService::find_by_report_analysis_owner_and_report_analysis_id(
            &self.store,
            owner,
            analysis_id,
            page,
            sort,
        )
        .await
    }
}

#[async_trait]
impl FlagService for RecordingStore {
    async fn find_by_report_analysis_owner_and_report_analysis_id(
        &self,
        owner: &str,
        analysis_id: i64,
        page: PageBean,
        sort: &SortBean,
    ) -> AppResult<Page<FlagModel>> {
        self.record(Call::FindFlags {
            owner: owner.to_string(),
            analysis_id,
            page,
            sort: sort.clone(),
        });
        FlagService::find_by_report_analysis_owner_and_report_analysis_id(
            &self.store,
            owner,
            analysis_id,
            page,
            sort,
        )
        .await
    }
}

/// Collaborators shared between a test and its app.
pub struct TestContext {
    pub store: Arc<RecordingStore>,
    pub storage: Arc<InMemoryStorage>,
}

impl TestContext {
    pub fn new() -> Self {
        Self {
            store: Arc::new(RecordingStore::default()),
            storage: Arc::new(InMemoryStorage::new("http://minio.test/payloads")),
        }
    }

    /// Seed an analysis owned by [`OWNER`].
    pub async fn seed_analysis(&self) -> AnalysisModel {
        self.store
            .store
            .build_and_save("report name", "report desc", "file name", OWNER)
            .await
    }
}

fn test_config() -> Config {
    Config {
        environment: Environment::Development,
        host: defaults::DEV_HOST.to_string(),
        port: defaults::DEV_PORT,
        admin_users: AdminUsers::parse(defaults::DEV_ADMIN_USERS),
        payload_link_expiry_secs: defaults::DEV_PAYLOAD_LINK_EXPIRY_SECS,
        s3: S3Config {
            endpoint: Some(defaults::DEV_S3_ENDPOINT.to_string()),
            bucket: defaults::DEV_S3_BUCKET.to_string(),
            region: defaults::DEV_S3_REGION.to_string(),
            access_key: defaults::DEV_S3_ACCESS_KEY.to_string(),
            secret_key: defaults::DEV_S3_SECRET_KEY.to_string(),
        },
    }
}

/// Create a test app wired to the context's collaborators.
pub async fn create_test_app(
    ctx: &TestContext,
) -> impl actix_web::dev::Service<
    actix_http::Request,
    Response = ServiceResponse,
    Error = actix_web::Error,
> {
    let config = test_config();
    let analyses: Arc<dyn AnalysisService> = ctx.store.clone();
    let inventory: Arc<dyn WorkloadInventoryReportService> = ctx.store.clone();
    let summaries: Arc<dyn WorkloadSummaryReportService> = ctx.store.clone();
    let workloads: Arc<dyn WorkloadService> = ctx.store.clone();
    let flags: Arc<dyn FlagService> = ctx.store.clone();
    let savings: Arc<dyn InitialSavingsEstimationReportService> = ctx.store.clone();
    let storage: Arc<dyn PayloadStorage> = ctx.storage.clone();

    test::init_service(
        App::new()
            .wrap(RequestLogger)
            .app_data(web::Data::new(config.admin_users.clone()))
            .app_data(web::Data::new(config))
            .app_data(web::Data::from(analyses))
            .app_data(web::Data::from(inventory))
            .app_data(web::Data::from(summaries))
            .app_data(web::Data::from(workloads))
            .app_data(web::Data::from(flags))
            .app_data(web::Data::from(savings))
            .app_data(web::Data::from(storage))
            .service(
                web::scope(API_SCOPE)
                    .configure(migration_report_lib::api::configure_health_routes)
                    .configure(migration_report_lib::api::configure_routes),
            ),
    )
    .await
}

/// `GET {API_SCOPE}{path}`, with an identity header when `username` is given.
pub async fn get<S>(app: &S, path: &str, username: Option<&str>) -> ServiceResponse
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let mut req = test::TestRequest::get().uri(&format!("{}{}", API_SCOPE, path));
    if let Some(username) = username {
        req = req.insert_header((IDENTITY_HEADER, encode_identity(username)));
    }
    test::call_service(app, req.to_request()).await
}

/// `DELETE {API_SCOPE}{path}` as `username`.
pub async fn delete<S>(app: &S, path: &str, username: &str) -> ServiceResponse
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let req = test::TestRequest::delete()
        .uri(&format!("{}{}", API_SCOPE, path))
        .insert_header((IDENTITY_HEADER, encode_identity(username)))
        .to_request();
    test::call_service(app, req).await
}

/// Response body as UTF-8 text.
pub async fn body_text(resp: ServiceResponse) -> String {
    let bytes = test::read_body(resp).await;
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Response header value, if present.
pub fn header<'a>(resp: &'a ServiceResponse, name: &str) -> Option<&'a str> {
    resp.headers().get(name).and_then(|v| v.to_str().ok())
}

/// Inventory row with the four location columns set.
pub fn inventory_row(
    provider: &str,
    datacenter: &str,
    cluster: &str,
    vm_name: &str,
) -> WorkloadInventoryReportModel {
    WorkloadInventoryReportModel {
        provider: Some(provider.to_string()),
        datacenter: Some(datacenter.to_string()),
        cluster: Some(cluster.to_string()),
        vm_name: Some(vm_name.to_string()),
        ..Default::default()
    }
}
