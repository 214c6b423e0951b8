//! Migration report server library.
//!
//! Serves the reports of migration analyses (workload inventory, workload
//! summary, initial savings estimation) over HTTP, with paging, multi-value
//! filtering, sorting, CSV export and payload download links.

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod services;
