//! CSV rendering of report data.

use std::collections::BTreeSet;

use csv::{QuoteStyle, Terminator, Writer, WriterBuilder};

use crate::error::{AppError, AppResult};
use crate::models::{AdministrationMetricsPeriod, WorkloadInventoryReportModel};

pub const WORKLOAD_INVENTORY_CSV_HEADER: [&str; 16] = [
    "Provider",
    "Datacenter",
    "Cluster",
    "VM name",
    "OS type",
    "Operating system description",
    "Disk space",
    "Memory",
    "CPU cores",
    "Workload",
    "Effort",
    "Recommended targets",
    "Flags IMS",
    "Product",
    "Version",
    "HostName",
];

pub const ADMINISTRATION_CSV_HEADER: [&str; 7] = [
    "Period",
    "From",
    "To",
    "Reports",
    "Users",
    "VMs",
    "Payloads size (bytes)",
];

fn writer() -> Writer<Vec<u8>> {
    WriterBuilder::new()
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new())
}

fn finish(writer: Writer<Vec<u8>>) -> AppResult<String> {
    let bytes = writer
        .into_inner()
        .map_err(|e| AppError::Internal(format!("CSV flush error: {e}")))?;
    String::from_utf8(bytes).map_err(|e| AppError::Internal(format!("CSV encoding error: {e}")))
}

fn text(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

fn number<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn joined(values: &BTreeSet<String>) -> String {
    values.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
}

/// Render inventory rows, in the given order, below the fixed header.
pub fn workload_inventory_to_csv(rows: &[WorkloadInventoryReportModel]) -> AppResult<String> {
    let mut csv_writer = writer();
    csv_writer.write_record(WORKLOAD_INVENTORY_CSV_HEADER)?;

    for row in rows {
        csv_writer.write_record([
            text(&row.provider),
            text(&row.datacenter),
            text(&row.cluster),
            text(&row.vm_name),
            text(&row.os_name),
            text(&row.os_description),
            number(row.disk_space),
            number(row.memory),
            number(row.cpu_cores),
            joined(&row.workloads),
            text(&row.complexity),
            joined(&row.recommended_targets_ims),
            joined(&row.flags_ims),
            text(&row.product),
            text(&row.version),
            text(&row.host_name),
        ])?;
    }

    finish(csv_writer)
}

/// One row per metrics period.
pub fn administration_metrics_to_csv(periods: &[AdministrationMetricsPeriod]) -> AppResult<String> {
    let mut csv_writer = writer();
    csv_writer.write_record(ADMINISTRATION_CSV_HEADER)?;

    for period in periods {
        let metrics = &period.metrics;
        csv_writer.write_record([
            period.label.to_string(),
            period.from.format("%Y-%m-%d").to_string(),
            period.to.format("%Y-%m-%d").to_string(),
            metrics.reports.to_string(),
            metrics.owners.to_string(),
            metrics.vms.to_string(),
            metrics.payloads_size_bytes.to_string(),
        ])?;
    }

    finish(csv_writer)
}
