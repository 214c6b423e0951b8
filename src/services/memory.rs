//! In-memory implementation of every report collaborator.
//!
//! Backs the development server and the route tests. Filtering, ordering and
//! paging happen here, in the same places a database query would do them.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashMap};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::debug;

use super::{
    AnalysisService, FlagService, InitialSavingsEstimationReportService,
    WorkloadInventoryReportService, WorkloadService, WorkloadSummaryReportService,
};
use crate::error::{AppError, AppResult};
use crate::models::{
    AdministrationMetricsModel, AnalysisModel, AnalysisStatus, FlagModel,
    InitialSavingsEstimationReportModel, Page, PageBean, SortBean, WorkloadInventoryFilterBean,
    WorkloadInventoryFilterModel, WorkloadInventoryReportModel, WorkloadModel,
    WorkloadSummaryReportModel,
};

#[derive(Default)]
struct State {
    last_analysis_id: i64,
    last_row_id: i64,
    analyses: BTreeMap<i64, AnalysisModel>,
    inventory: HashMap<i64, Vec<WorkloadInventoryReportModel>>,
    summaries: HashMap<i64, WorkloadSummaryReportModel>,
    savings: HashMap<i64, InitialSavingsEstimationReportModel>,
    workloads: HashMap<i64, Vec<WorkloadModel>>,
    flags: HashMap<i64, Vec<FlagModel>>,
}

impl State {
    fn is_owned_by(&self, owner: &str, analysis_id: i64) -> bool {
        self.analyses
            .get(&analysis_id)
            .is_some_and(|a| a.owner == owner)
    }

    fn next_row_id(&mut self) -> i64 {
        self.last_row_id += 1;
        self.last_row_id
    }

    fn owned_inventory(&self, owner: &str, analysis_id: i64) -> Vec<WorkloadInventoryReportModel> {
        if !self.is_owned_by(owner, analysis_id) {
            return Vec::new();
        }
        self.inventory
            .get(&analysis_id)
            .cloned()
            .unwrap_or_default()
    }
}

/// Thread-safe store holding analyses and all their reports.
#[derive(Default)]
pub struct InMemoryStore {
    state: RwLock<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create and store a new analysis with the next id.
    pub async fn build_and_save(
        &self,
        report_name: &str,
        report_description: &str,
        payload_name: &str,
        owner: &str,
    ) -> AnalysisModel {
        let mut state = self.state.write().await;
        state.last_analysis_id += 1;
        let now = Utc::now();
        let analysis = AnalysisModel {
            id: state.last_analysis_id,
            report_name: report_name.to_string(),
            report_description: Some(report_description.to_string()),
            payload_name: Some(payload_name.to_string()),
            payload_storage_id: None,
            payload_size: None,
            status: AnalysisStatus::Created,
            owner: owner.to_string(),
            inserted: now,
            last_update: now,
        };
        state.analyses.insert(analysis.id, analysis.clone());
        debug!("Analysis {} stored for {}", analysis.id, owner);
        analysis
    }

    /// Store `analysis` as given, replacing any analysis with the same id.
    pub async fn save(&self, analysis: AnalysisModel) -> AnalysisModel {
        let mut state = self.state.write().await;
        state.last_analysis_id = state.last_analysis_id.max(analysis.id);
        state.analyses.insert(analysis.id, analysis.clone());
        analysis
    }

    /// Record where the uploaded payload of `analysis_id` was stored.
    pub async fn set_payload(
        &self,
        analysis_id: i64,
        storage_id: &str,
        size: u64,
    ) -> AppResult<()> {
        let mut state = self.state.write().await;
        let analysis = state
            .analyses
            .get_mut(&analysis_id)
            .ok_or_else(|| AppError::NotFound("Analysis".to_string()))?;
        analysis.payload_storage_id = Some(storage_id.to_string());
        analysis.payload_size = Some(size);
        analysis.last_update = Utc::now();
        Ok(())
    }

    /// Append inventory rows to an analysis, assigning row ids.
    pub async fn add_workload_inventory_report_models(
        &self,
        rows: Vec<WorkloadInventoryReportModel>,
        analysis_id: i64,
    ) -> AppResult<()> {
        let mut state = self.state.write().await;
        if !state.analyses.contains_key(&analysis_id) {
            return Err(AppError::NotFound("Analysis".to_string()));
        }
        let mut stored = Vec::with_capacity(rows.len());
        for mut row in rows {
            row.id = state.next_row_id();
            stored.push(row);
        }
        state.inventory.entry(analysis_id).or_default().extend(stored);
        Ok(())
    }

    pub async fn set_workload_summary_report(
        &self,
        analysis_id: i64,
        mut report: WorkloadSummaryReportModel,
    ) {
        report.id = analysis_id;
        self.state.write().await.summaries.insert(analysis_id, report);
    }

    pub async fn set_initial_savings_estimation_report(
        &self,
        analysis_id: i64,
        mut report: InitialSavingsEstimationReportModel,
    ) {
        report.id = analysis_id;
        self.state.write().await.savings.insert(analysis_id, report);
    }

    pub async fn add_workloads(&self, analysis_id: i64, workloads: Vec<WorkloadModel>) {
        let mut state = self.state.write().await;
        let mut stored = Vec::with_capacity(workloads.len());
        for mut workload in workloads {
            workload.id = state.next_row_id();
            stored.push(workload);
        }
        state.workloads.entry(analysis_id).or_default().extend(stored);
    }

    pub async fn add_flags(&self, analysis_id: i64, flags: Vec<FlagModel>) {
        let mut state = self.state.write().await;
        let mut stored = Vec::with_capacity(flags.len());
        for mut flag in flags {
            flag.id = state.next_row_id();
            stored.push(flag);
        }
        state.flags.entry(analysis_id).or_default().extend(stored);
    }
}

/// Present values first, absent values last.
fn cmp_present_first<T: Ord + ?Sized>(a: Option<&T>, b: Option<&T>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn non_empty(set: &BTreeSet<String>) -> Option<&BTreeSet<String>> {
    if set.is_empty() { None } else { Some(set) }
}

/// Columns the workload inventory can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InventoryColumn {
    Id,
    Provider,
    Datacenter,
    Cluster,
    VmName,
    OsName,
    OsDescription,
    DiskSpace,
    Memory,
    CpuCores,
    Workloads,
    Complexity,
    RecommendedTargets,
    Flags,
    Product,
    Version,
    HostName,
}

impl InventoryColumn {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "id" => Some(Self::Id),
            "provider" => Some(Self::Provider),
            "datacenter" => Some(Self::Datacenter),
            "cluster" => Some(Self::Cluster),
            "vmName" => Some(Self::VmName),
            "osName" => Some(Self::OsName),
            "osDescription" => Some(Self::OsDescription),
            "diskSpace" => Some(Self::DiskSpace),
            "memory" => Some(Self::Memory),
            "cpuCores" => Some(Self::CpuCores),
            "workload" | "workloads" => Some(Self::Workloads),
            "complexity" => Some(Self::Complexity),
            "recommendedTargetIMS" | "recommendedTargetsIMS" => Some(Self::RecommendedTargets),
            "flagIMS" | "flagsIMS" => Some(Self::Flags),
            "product" => Some(Self::Product),
            "version" => Some(Self::Version),
            "hostName" => Some(Self::HostName),
            _ => None,
        }
    }

    fn compare(self, a: &WorkloadInventoryReportModel, b: &WorkloadInventoryReportModel) -> Ordering {
        match self {
            Self::Id => a.id.cmp(&b.id),
            Self::Provider => cmp_present_first(a.provider.as_deref(), b.provider.as_deref()),
            Self::Datacenter => cmp_present_first(a.datacenter.as_deref(), b.datacenter.as_deref()),
            Self::Cluster => cmp_present_first(a.cluster.as_deref(), b.cluster.as_deref()),
            Self::VmName => cmp_present_first(a.vm_name.as_deref(), b.vm_name.as_deref()),
            Self::OsName => cmp_present_first(a.os_name.as_deref(), b.os_name.as_deref()),
            Self::OsDescription => {
                cmp_present_first(a.os_description.as_deref(), b.os_description.as_deref())
            }
            Self::DiskSpace => cmp_present_first(a.disk_space.as_ref(), b.disk_space.as_ref()),
            Self::Memory => cmp_present_first(a.memory.as_ref(), b.memory.as_ref()),
            Self::CpuCores => cmp_present_first(a.cpu_cores.as_ref(), b.cpu_cores.as_ref()),
            Self::Workloads => cmp_present_first(non_empty(&a.workloads), non_empty(&b.workloads)),
            Self::Complexity => cmp_present_first(a.complexity.as_deref(), b.complexity.as_deref()),
            Self::RecommendedTargets => cmp_present_first(
                non_empty(&a.recommended_targets_ims),
                non_empty(&b.recommended_targets_ims),
            ),
            Self::Flags => cmp_present_first(non_empty(&a.flags_ims), non_empty(&b.flags_ims)),
            Self::Product => cmp_present_first(a.product.as_deref(), b.product.as_deref()),
            Self::Version => cmp_present_first(a.version.as_deref(), b.version.as_deref()),
            Self::HostName => cmp_present_first(a.host_name.as_deref(), b.host_name.as_deref()),
        }
    }
}

/// Natural inventory order: provider, datacenter, cluster, VM name, then id.
fn natural_inventory_order(a: &WorkloadInventoryReportModel, b: &WorkloadInventoryReportModel) -> Ordering {
    InventoryColumn::Provider
        .compare(a, b)
        .then_with(|| InventoryColumn::Datacenter.compare(a, b))
        .then_with(|| InventoryColumn::Cluster.compare(a, b))
        .then_with(|| InventoryColumn::VmName.compare(a, b))
        .then_with(|| a.id.cmp(&b.id))
}

/// Order rows by `sort`, breaking ties with the natural order. Descending
/// reverses the whole comparison.
fn sort_inventory(rows: &mut [WorkloadInventoryReportModel], sort: &SortBean) -> AppResult<()> {
    let column = match sort.order_by.as_deref() {
        Some(name) => Some(InventoryColumn::parse(name).ok_or_else(|| {
            AppError::InvalidInput(format!("Unsupported orderBy '{}'", name))
        })?),
        None => None,
    };

    rows.sort_by(|a, b| {
        let ordering = column
            .map(|c| c.compare(a, b))
            .unwrap_or(Ordering::Equal)
            .then_with(|| natural_inventory_order(a, b));
        if sort.order_asc { ordering } else { ordering.reverse() }
    });
    Ok(())
}

fn accepts(values: &BTreeSet<String>, value: Option<&str>) -> bool {
    values.is_empty() || value.is_some_and(|v| values.contains(v))
}

fn accepts_any(values: &BTreeSet<String>, row_values: &BTreeSet<String>) -> bool {
    values.is_empty() || row_values.iter().any(|v| values.contains(v))
}

/// A row passes when every non-empty filter set accepts it.
fn matches_filter(row: &WorkloadInventoryReportModel, filter: &WorkloadInventoryFilterBean) -> bool {
    accepts(&filter.providers, row.provider.as_deref())
        && accepts(&filter.datacenters, row.datacenter.as_deref())
        && accepts(&filter.clusters, row.cluster.as_deref())
        && accepts(&filter.vm_names, row.vm_name.as_deref())
        && accepts(&filter.os_names, row.os_name.as_deref())
        && accepts(&filter.complexities, row.complexity.as_deref())
        && accepts_any(&filter.workloads, &row.workloads)
        && accepts_any(&filter.recommended_targets_ims, &row.recommended_targets_ims)
        && accepts_any(&filter.flags_ims, &row.flags_ims)
}

fn filtered_sorted(
    rows: Vec<WorkloadInventoryReportModel>,
    sort: &SortBean,
    filter: &WorkloadInventoryFilterBean,
) -> AppResult<Vec<WorkloadInventoryReportModel>> {
    let mut rows: Vec<_> = rows
        .into_iter()
        .filter(|row| matches_filter(row, filter))
        .collect();
    sort_inventory(&mut rows, sort)?;
    Ok(rows)
}

/// Row of a workload summary listing (workloads or flags).
trait SummaryRow {
    /// Query-string name of the row's label column.
    const NAME_COLUMN: &'static str;

    fn id(&self) -> i64;
    fn name(&self) -> &str;
    fn os_name(&self) -> Option<&str>;
    fn clusters(&self) -> i32;
    fn vms(&self) -> i32;
}

impl SummaryRow for WorkloadModel {
    const NAME_COLUMN: &'static str = "workload";

    fn id(&self) -> i64 {
        self.id
    }
    fn name(&self) -> &str {
        &self.workload
    }
    fn os_name(&self) -> Option<&str> {
        self.os_name.as_deref()
    }
    fn clusters(&self) -> i32 {
        self.clusters
    }
    fn vms(&self) -> i32 {
        self.vms
    }
}

impl SummaryRow for FlagModel {
    const NAME_COLUMN: &'static str = "flag";

    fn id(&self) -> i64 {
        self.id
    }
    fn name(&self) -> &str {
        &self.flag
    }
    fn os_name(&self) -> Option<&str> {
        self.os_name.as_deref()
    }
    fn clusters(&self) -> i32 {
        self.clusters
    }
    fn vms(&self) -> i32 {
        self.vms
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SummaryColumn {
    Id,
    Name,
    OsName,
    Clusters,
    Vms,
}

impl SummaryColumn {
    fn parse<T: SummaryRow>(s: &str) -> Option<Self> {
        match s {
            "id" => Some(Self::Id),
            "osName" => Some(Self::OsName),
            "clusters" => Some(Self::Clusters),
            "vms" => Some(Self::Vms),
            name if name == T::NAME_COLUMN => Some(Self::Name),
            _ => None,
        }
    }

    fn compare<T: SummaryRow>(self, a: &T, b: &T) -> Ordering {
        match self {
            Self::Id => a.id().cmp(&b.id()),
            Self::Name => a.name().cmp(b.name()),
            Self::OsName => cmp_present_first(a.os_name(), b.os_name()),
            Self::Clusters => a.clusters().cmp(&b.clusters()),
            Self::Vms => a.vms().cmp(&b.vms()),
        }
    }
}

/// Order summary rows by `sort` (id when unset); ties fall back to id.
fn sort_summary_rows<T: SummaryRow>(rows: &mut [T], sort: &SortBean) -> AppResult<()> {
    let name = sort.order_by.as_deref().unwrap_or("id");
    let column = SummaryColumn::parse::<T>(name)
        .ok_or_else(|| AppError::InvalidInput(format!("Unsupported orderBy '{}'", name)))?;

    rows.sort_by(|a, b| {
        let ordering = column.compare(a, b).then_with(|| a.id().cmp(&b.id()));
        if sort.order_asc { ordering } else { ordering.reverse() }
    });
    Ok(())
}

#[async_trait]
impl AnalysisService for InMemoryStore {
    async fn find_all_by_owner(&self, owner: &str, page: PageBean) -> AppResult<Page<AnalysisModel>> {
        let state = self.state.read().await;
        let rows: Vec<AnalysisModel> = state
            .analyses
            .values()
            .rev()
            .filter(|a| a.owner == owner)
            .cloned()
            .collect();
        Ok(Page::slice(rows, &page))
    }

    async fn find_by_owner_and_report_name(
        &self,
        owner: &str,
        report_name: &str,
        page: PageBean,
    ) -> AppResult<Page<AnalysisModel>> {
        let needle = report_name.to_lowercase();
        let state = self.state.read().await;
        let rows: Vec<AnalysisModel> = state
            .analyses
            .values()
            .rev()
            .filter(|a| a.owner == owner && a.report_name.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        Ok(Page::slice(rows, &page))
    }

    async fn find_by_owner_and_id(&self, owner: &str, id: i64) -> AppResult<Option<AnalysisModel>> {
        let state = self.state.read().await;
        Ok(state.analyses.get(&id).filter(|a| a.owner == owner).cloned())
    }

    async fn delete_by_id(&self, id: i64) -> AppResult<()> {
        let mut state = self.state.write().await;
        state.analyses.remove(&id);
        state.inventory.remove(&id);
        state.summaries.remove(&id);
        state.savings.remove(&id);
        state.workloads.remove(&id);
        state.flags.remove(&id);
        debug!("Analysis {} deleted", id);
        Ok(())
    }

    async fn get_administration_metrics(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> AppResult<AdministrationMetricsModel> {
        let state = self.state.read().await;
        let in_window: Vec<&AnalysisModel> = state
            .analyses
            .values()
            .filter(|a| a.inserted >= from && a.inserted <= to)
            .collect();

        let owners: BTreeSet<&str> = in_window.iter().map(|a| a.owner.as_str()).collect();
        let vms: usize = in_window
            .iter()
            .map(|a| state.inventory.get(&a.id).map_or(0, Vec::len))
            .sum();

        Ok(AdministrationMetricsModel {
            reports: in_window.len() as u64,
            owners: owners.len() as u64,
            vms: vms as u64,
            payloads_size_bytes: in_window.iter().filter_map(|a| a.payload_size).sum(),
        })
    }
}

#[async_trait]
impl WorkloadInventoryReportService for InMemoryStore {
    async fn find_by_analysis_owner_and_analysis_id(
        &self,
        owner: &str,
        analysis_id: i64,
    ) -> AppResult<Vec<WorkloadInventoryReportModel>> {
        let rows = self.state.read().await.owned_inventory(owner, analysis_id);
        filtered_sorted(rows, &SortBean::natural(), &WorkloadInventoryFilterBean::default())
    }

    async fn find_filtered_by_analysis_owner_and_analysis_id(
        &self,
        owner: &str,
        analysis_id: i64,
        sort: &SortBean,
        filter: &WorkloadInventoryFilterBean,
    ) -> AppResult<Vec<WorkloadInventoryReportModel>> {
        let rows = self.state.read().await.owned_inventory(owner, analysis_id);
        filtered_sorted(rows, sort, filter)
    }

    async fn find_page_by_analysis_owner_and_analysis_id(
        &self,
        owner: &str,
        analysis_id: i64,
        page: PageBean,
        sort: &SortBean,
        filter: &WorkloadInventoryFilterBean,
    ) -> AppResult<Page<WorkloadInventoryReportModel>> {
        let rows = self.state.read().await.owned_inventory(owner, analysis_id);
        Ok(Page::slice(filtered_sorted(rows, sort, filter)?, &page))
    }

    async fn find_available_filters_by_analysis_id(
        &self,
        analysis_id: i64,
    ) -> AppResult<WorkloadInventoryFilterModel> {
        let state = self.state.read().await;
        Ok(state
            .inventory
            .get(&analysis_id)
            .map(|rows| WorkloadInventoryFilterModel::from_rows(rows))
            .unwrap_or_default())
    }
}

#[async_trait]
impl WorkloadSummaryReportService for InMemoryStore {
    async fn find_by_analysis_owner_and_analysis_id(
        &self,
        owner: &str,
        analysis_id: i64,
    ) -> AppResult<Option<WorkloadSummaryReportModel>> {
        let state = self.state.read().await;
        if !state.is_owned_by(owner, analysis_id) {
            return Ok(None);
        }
        Ok(state.summaries.get(&analysis_id).cloned())
    }
}

#[async_trait]
impl InitialSavingsEstimationReportService for InMemoryStore {
    async fn find_by_analysis_owner_and_analysis_id(
        &self,
        owner: &str,
        analysis_id: i64,
    ) -> AppResult<Option<InitialSavingsEstimationReportModel>> {
        let state = self.state.read().await;
        if !state.is_owned_by(owner, analysis_id) {
            return Ok(None);
        }
        Ok(state.savings.get(&analysis_id).cloned())
    }
}

#[async_trait]
impl WorkloadService for InMemoryStore {
    async fn find_by_report_analysis_owner_and_report_analysis_id(
        &self,
        owner: &str,
        analysis_id: i64,
        page: PageBean,
        sort: &SortBean,
    ) -> AppResult<Page<WorkloadModel>> {
        let state = self.state.read().await;
        if !state.is_owned_by(owner, analysis_id) {
            return Ok(Page::empty(&page));
        }
        let mut rows = state.workloads.get(&analysis_id).cloned().unwrap_or_default();
        sort_summary_rows(&mut rows, sort)?;
        Ok(Page::slice(rows, &page))
    }
}

#[async_trait]
impl FlagService for InMemoryStore {
    async fn find_by_report_analysis_owner_and_report_analysis_id(
        &self,
        owner: &str,
        analysis_id: i64,
        page: PageBean,
        sort: &SortBean,
    ) -> AppResult<Page<FlagModel>> {
        let state = self.state.read().await;
        if !state.is_owned_by(owner, analysis_id) {
            return Ok(Page::empty(&page));
        }
        let mut rows = state.flags.get(&analysis_id).cloned().unwrap_or_default();
        sort_summary_rows(&mut rows, sort)?;
        Ok(Page::slice(rows, &page))
    }
}
