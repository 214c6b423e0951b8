//! Domain models for the migration report server.

use serde::Serialize;
use utoipa::ToSchema;

pub mod administration;
pub mod analysis;
pub mod initial_savings;
pub mod query;
pub mod workload_inventory;
pub mod workload_summary;

// Re-export commonly used types
pub use administration::{AdministrationMetricsModel, AdministrationMetricsPeriod};
pub use analysis::{AnalysisModel, AnalysisStatus, PayloadLink};
pub use initial_savings::{
    EnvironmentModel, InitialSavingsEstimationReportModel, RhvSavingsModel, SourceCostsModel,
};
pub use query::{PageBean, SortBean, WorkloadInventoryFilterBean};
pub use workload_inventory::{WorkloadInventoryFilterModel, WorkloadInventoryReportModel};
pub use workload_summary::{
    ComplexityModel, FlagModel, RecommendedTargetsImsModel, SummaryModel, WorkloadModel,
    WorkloadSummaryReportModel, WorkloadsDetectedOsTypeModel,
};

/// One page of results, serialized in the Spring Data page layout.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub size: u32,
    pub number: u32,
    pub total_elements: u64,
    pub total_pages: u32,
    pub number_of_elements: usize,
    pub first: bool,
    pub last: bool,
    pub empty: bool,
}

impl<T> Page<T> {
    /// Wrap an already-sliced page of `content` out of `total` rows.
    pub fn new(content: Vec<T>, page: &PageBean, total: u64) -> Self {
        let total_pages = if total == 0 || page.size == 0 {
            0
        } else {
            total.div_ceil(page.size as u64) as u32
        };
        let number_of_elements = content.len();

        Page {
            empty: content.is_empty(),
            content,
            size: page.size,
            number: page.page,
            total_elements: total,
            total_pages,
            number_of_elements,
            first: page.page == 0,
            last: page.page.saturating_add(1) >= total_pages,
        }
    }

    /// Cut the requested page out of the full, already ordered `rows`.
    pub fn slice(rows: Vec<T>, page: &PageBean) -> Self {
        let total = rows.len() as u64;
        let content: Vec<T> = rows
            .into_iter()
            .skip(page.offset())
            .take(page.size as usize)
            .collect();
        Self::new(content, page, total)
    }

    /// An empty page, e.g. for an analysis the caller does not own.
    pub fn empty(page: &PageBean) -> Self {
        Self::new(Vec::new(), page, 0)
    }
}
