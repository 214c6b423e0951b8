//! Analysis domain models and DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Processing state of an analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnalysisStatus {
    Created,
    InProgress,
    Completed,
    Failed,
}

impl AnalysisStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "CREATED",
            Self::InProgress => "IN_PROGRESS",
            Self::Completed => "COMPLETED",
            Self::Failed => "FAILED",
        }
    }
}

impl std::fmt::Display for AnalysisStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A migration assessment owned by one user; every report hangs off it.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisModel {
    pub id: i64,
    pub report_name: String,
    pub report_description: Option<String>,
    /// Original file name of the uploaded payload.
    pub payload_name: Option<String>,
    /// Object key of the payload in storage, unset until the upload is stored.
    pub payload_storage_id: Option<String>,
    /// Payload size in bytes.
    pub payload_size: Option<u64>,
    pub status: AnalysisStatus,
    pub owner: String,
    pub inserted: DateTime<Utc>,
    pub last_update: DateTime<Utc>,
}

/// Response of `GET /report/{id}/payload-link`.
///
/// `downloadLink` is always serialized, as `null` when no payload is stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PayloadLink {
    pub filename: Option<String>,
    pub download_link: Option<String>,
}
