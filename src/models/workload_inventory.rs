//! Workload inventory report rows and the filter values available for them.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One virtual machine of an analysis, as reported in the workload inventory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WorkloadInventoryReportModel {
    pub id: i64,
    pub provider: Option<String>,
    pub datacenter: Option<String>,
    pub cluster: Option<String>,
    pub vm_name: Option<String>,
    /// OS family, shown as "OS type" in exports.
    pub os_name: Option<String>,
    pub os_description: Option<String>,
    /// Bytes.
    pub disk_space: Option<i64>,
    /// Bytes.
    pub memory: Option<i64>,
    pub cpu_cores: Option<i32>,
    pub workloads: BTreeSet<String>,
    /// Migration effort, shown as "Effort" in exports.
    pub complexity: Option<String>,
    #[serde(rename = "recommendedTargetsIMS")]
    pub recommended_targets_ims: BTreeSet<String>,
    #[serde(rename = "flagsIMS")]
    pub flags_ims: BTreeSet<String>,
    pub product: Option<String>,
    pub version: Option<String>,
    pub host_name: Option<String>,
    pub creation_date: Option<DateTime<Utc>>,
}

/// Distinct values present in one analysis for each filterable field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WorkloadInventoryFilterModel {
    pub providers: BTreeSet<String>,
    pub datacenters: BTreeSet<String>,
    pub clusters: BTreeSet<String>,
    pub vm_names: BTreeSet<String>,
    pub os_names: BTreeSet<String>,
    pub workloads: BTreeSet<String>,
    pub complexities: BTreeSet<String>,
    #[serde(rename = "recommendedTargetsIMS")]
    pub recommended_targets_ims: BTreeSet<String>,
    #[serde(rename = "flagsIMS")]
    pub flags_ims: BTreeSet<String>,
}

impl WorkloadInventoryFilterModel {
    /// Collect the distinct non-empty values of `rows`.
    pub fn from_rows<'a>(rows: impl IntoIterator<Item = &'a WorkloadInventoryReportModel>) -> Self {
        fn add(set: &mut BTreeSet<String>, value: &Option<String>) {
            if let Some(v) = value.as_deref().filter(|v| !v.is_empty()) {
                set.insert(v.to_string());
            }
        }

        let mut model = Self::default();
        for row in rows {
            add(&mut model.providers, &row.provider);
            add(&mut model.datacenters, &row.datacenter);
            add(&mut model.clusters, &row.cluster);
            add(&mut model.vm_names, &row.vm_name);
            add(&mut model.os_names, &row.os_name);
            add(&mut model.complexities, &row.complexity);
            model.workloads.extend(row.workloads.iter().cloned());
            model
                .recommended_targets_ims
                .extend(row.recommended_targets_ims.iter().cloned());
            model.flags_ims.extend(row.flags_ims.iter().cloned());
        }
        model
    }
}
