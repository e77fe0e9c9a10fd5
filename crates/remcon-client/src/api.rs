//! Collaborator seams and wire shapes.
//!
//! The remote services own these payload shapes; nothing here is persisted
//! locally. The traits let callers substitute in-memory fakes for the
//! reconciliation logic in [`crate::fetch`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use remcon_core::{FilterConfig, InventoryRecord, RemediationId, System, SystemId, SystemsFilter};

use crate::error::ClientResult;

/// Default sort order for system listings; the services sort server-side.
pub const DEFAULT_SORT: &str = "display_name";

/// Query for one page of remediation-scoped systems.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemsQuery {
    /// Plan whose systems are listed.
    pub id: RemediationId,
    /// Page size.
    pub limit: u32,
    /// Zero-based item offset.
    pub offset: u32,
    /// Sort key.
    pub sort: String,
    /// Optional display-name filter.
    pub filter: SystemsFilter,
}

impl SystemsQuery {
    /// Build a query with the default sort.
    #[must_use]
    pub fn new(id: RemediationId, limit: u32, offset: u32, filter: SystemsFilter) -> Self {
        Self {
            id,
            limit,
            offset,
            sort: DEFAULT_SORT.to_string(),
            filter,
        }
    }
}

/// Pagination envelope of the systems endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meta {
    /// Total systems matching the query, across all pages.
    #[serde(default)]
    pub total: u64,
}

/// Response of the systems endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemsResponse {
    /// One page of systems.
    #[serde(default)]
    pub data: Vec<System>,
    /// Pagination metadata; authoritative for `total`.
    #[serde(default)]
    pub meta: Meta,
}

/// Options passed through to the inventory lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityConfig {
    /// Filter state forwarded from the console.
    pub filter: FilterConfig,
    /// Ask inventory to only consider the given ids.
    pub has_items: bool,
    /// Page size mirrored from the systems query.
    pub per_page: u32,
    /// Page number mirrored from the systems query.
    pub page: u32,
}

/// Response of the inventory detail lookup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityResponse {
    /// Detail records, one per found system.
    #[serde(default)]
    pub results: Vec<InventoryRecord>,
    /// Inventory's own total; never used for pagination.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
}

/// Launch request for a playbook run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecuteRequest {
    /// Plan to execute.
    pub id: RemediationId,
    /// Concurrency token detecting stale plan state.
    pub etag: String,
    /// Executor ids excluded from the run.
    pub exclude: Vec<String>,
}

/// Remediation-scoped system listings.
#[async_trait]
pub trait SystemsApi: Send + Sync {
    /// Fetch one page of systems for a plan.
    async fn fetch_systems(&self, query: &SystemsQuery) -> ClientResult<SystemsResponse>;
}

/// Inventory detail lookups. May fail for stale ids; callers recover.
#[async_trait]
pub trait InventoryApi: Send + Sync {
    /// Fetch detail records for exactly the given system ids.
    async fn get_entities(
        &self,
        ids: &[SystemId],
        config: &EntityConfig,
        show_tags: bool,
    ) -> ClientResult<EntityResponse>;
}

/// Playbook execution and download.
#[async_trait]
pub trait PlaybookApi: Send + Sync {
    /// Trigger a playbook run.
    async fn execute_run(&self, request: &ExecuteRequest) -> ClientResult<()>;

    /// Download the generated playbook.
    async fn download(&self, id: &RemediationId) -> ClientResult<Vec<u8>>;
}
