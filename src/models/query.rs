//! Typed paging, sorting and filtering descriptors passed to report services.

use std::collections::BTreeSet;

/// Zero-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageBean {
    pub page: u32,
    pub size: u32,
}

impl PageBean {
    pub const DEFAULT_PAGE: u32 = 0;
    pub const DEFAULT_SIZE: u32 = 10;

    pub const fn new(page: u32, size: u32) -> Self {
        Self { page, size }
    }

    /// Index of the first row on this page.
    pub fn offset(&self) -> usize {
        (self.page as usize).saturating_mul(self.size as usize)
    }
}

impl Default for PageBean {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PAGE, Self::DEFAULT_SIZE)
    }
}

/// Requested ordering. `order_by: None` means the service's natural order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortBean {
    pub order_by: Option<String>,
    pub order_asc: bool,
}

impl SortBean {
    pub fn new(order_by: Option<&str>, order_asc: bool) -> Self {
        Self {
            order_by: order_by.map(str::to_string),
            order_asc,
        }
    }

    /// Natural order, ascending.
    pub fn natural() -> Self {
        Self::new(None, true)
    }

    /// Default ordering of the workload summary workloads listing.
    pub fn workloads_default() -> Self {
        Self::new(Some("id"), false)
    }

    /// Default ordering of the workload summary flags listing.
    pub fn flags_default() -> Self {
        Self::new(Some("id"), true)
    }
}

/// Accepted values per workload inventory field. An empty set does not filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkloadInventoryFilterBean {
    pub providers: BTreeSet<String>,
    pub clusters: BTreeSet<String>,
    pub datacenters: BTreeSet<String>,
    pub vm_names: BTreeSet<String>,
    pub os_names: BTreeSet<String>,
    pub workloads: BTreeSet<String>,
    pub recommended_targets_ims: BTreeSet<String>,
    pub flags_ims: BTreeSet<String>,
    pub complexities: BTreeSet<String>,
}

impl WorkloadInventoryFilterBean {
    /// Query-string key → field. Returns `None` for keys that are not filters.
    pub fn field_mut(&mut self, key: &str) -> Option<&mut BTreeSet<String>> {
        match key {
            "provider" => Some(&mut self.providers),
            "cluster" => Some(&mut self.clusters),
            "datacenter" => Some(&mut self.datacenters),
            "vmName" => Some(&mut self.vm_names),
            "osName" => Some(&mut self.os_names),
            "workload" => Some(&mut self.workloads),
            "recommendedTargetIMS" => Some(&mut self.recommended_targets_ims),
            "flagIMS" => Some(&mut self.flags_ims),
            "complexity" => Some(&mut self.complexities),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
            && self.clusters.is_empty()
            && self.datacenters.is_empty()
            && self.vm_names.is_empty()
            && self.os_names.is_empty()
            && self.workloads.is_empty()
            && self.recommended_targets_ims.is_empty()
            && self.flags_ims.is_empty()
            && self.complexities.is_empty()
    }
}
