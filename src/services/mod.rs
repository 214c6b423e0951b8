//! Collaborator services the report routes delegate to.
//!
//! Handlers only see these traits; persistence lives behind them. Every
//! owner-scoped lookup returns nothing for analyses owned by someone else.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::AppResult;
use crate::models::{
    AdministrationMetricsModel, AnalysisModel, FlagModel, InitialSavingsEstimationReportModel,
    Page, PageBean, SortBean, WorkloadInventoryFilterBean, WorkloadInventoryFilterModel,
    WorkloadInventoryReportModel, WorkloadModel, WorkloadSummaryReportModel,
};

pub mod csv_export;
pub mod memory;
pub mod storage;

pub use memory::InMemoryStore;
pub use storage::{InMemoryStorage, PayloadStorage, S3Storage, StoredPayload};

/// Analyses (the "reports" listed under `/report`).
#[async_trait]
pub trait AnalysisService: Send + Sync {
    async fn find_all_by_owner(&self, owner: &str, page: PageBean) -> AppResult<Page<AnalysisModel>>;

    /// Analyses of `owner` whose report name contains `report_name`.
    async fn find_by_owner_and_report_name(
        &self,
        owner: &str,
        report_name: &str,
        page: PageBean,
    ) -> AppResult<Page<AnalysisModel>>;

    async fn find_by_owner_and_id(&self, owner: &str, id: i64) -> AppResult<Option<AnalysisModel>>;

    async fn delete_by_id(&self, id: i64) -> AppResult<()>;

    /// Usage totals for analyses inserted within `[from, to]`.
    async fn get_administration_metrics(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> AppResult<AdministrationMetricsModel>;
}

/// Per-VM rows of an analysis.
#[async_trait]
pub trait WorkloadInventoryReportService: Send + Sync {
    /// Every row, in natural order.
    async fn find_by_analysis_owner_and_analysis_id(
        &self,
        owner: &str,
        analysis_id: i64,
    ) -> AppResult<Vec<WorkloadInventoryReportModel>>;

    /// Every row matching `filter`, ordered by `sort`.
    async fn find_filtered_by_analysis_owner_and_analysis_id(
        &self,
        owner: &str,
        analysis_id: i64,
        sort: &SortBean,
        filter: &WorkloadInventoryFilterBean,
    ) -> AppResult<Vec<WorkloadInventoryReportModel>>;

    /// One page of the rows matching `filter`, ordered by `sort`.
    async fn find_page_by_analysis_owner_and_analysis_id(
        &self,
        owner: &str,
        analysis_id: i64,
        page: PageBean,
        sort: &SortBean,
        filter: &WorkloadInventoryFilterBean,
    ) -> AppResult<Page<WorkloadInventoryReportModel>>;

    async fn find_available_filters_by_analysis_id(
        &self,
        analysis_id: i64,
    ) -> AppResult<WorkloadInventoryFilterModel>;
}

#[async_trait]
pub trait WorkloadSummaryReportService: Send + Sync {
    async fn find_by_analysis_owner_and_analysis_id(
        &self,
        owner: &str,
        analysis_id: i64,
    ) -> AppResult<Option<WorkloadSummaryReportModel>>;
}

#[async_trait]
pub trait WorkloadService: Send + Sync {
    async fn find_by_report_analysis_owner_and_report_analysis_id(
        &self,
        owner: &str,
        analysis_id: i64,
        page: PageBean,
        sort: &SortBean,
    ) -> AppResult<Page<WorkloadModel>>;
}

#[async_trait]
pub trait FlagService: Send + Sync {
    async fn find_by_report_analysis_owner_and_report_analysis_id(
        &self,
        owner: &str,
        analysis_id: i64,
        page: PageBean,
        sort: &SortBean,
    ) -> AppResult<Page<FlagModel>>;
}

#[async_trait]
pub trait InitialSavingsEstimationReportService: Send + Sync {
    async fn find_by_analysis_owner_and_analysis_id(
        &self,
        owner: &str,
        analysis_id: i64,
    ) -> AppResult<Option<InitialSavingsEstimationReportModel>>;
}
