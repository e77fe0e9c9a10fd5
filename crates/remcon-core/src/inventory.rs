//! Merging remediation systems with inventory records and connection data.
//!
//! A page of systems comes from two independent sources: the remediations
//! service (authoritative for identity and pagination) and the inventory
//! service (richer per-host detail). Connection fields come from a third
//! payload. Everything is joined client-side by [`SystemId`].

use serde::{Deserialize, Serialize};

use crate::connection::{ConnectionMap, ConnectionStatus};
use crate::system::{Identified, System, SystemId};

/// Detail record as returned by the inventory service.
///
/// Unmodeled inventory fields (tags, facts, ...) are carried through
/// verbatim in `extra` so callers lose nothing in the merge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryRecord {
    /// Inventory id; must match the remediations-side system id.
    pub id: SystemId,
    /// Hostname as inventory knows it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    /// Display name as inventory knows it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Issue count, if the caller asked inventory to compute one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue_count: Option<u64>,
    /// Passthrough for everything else inventory reports.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// A system row after joining remediations, inventory, and connection data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedSystem {
    /// Identity key.
    pub id: SystemId,
    /// Hostname, preferring the inventory value when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    /// Display name, preferring the inventory value when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Issue count, preferring the inventory value when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue_count: Option<u64>,
    /// Reachability, when the connection payload covered this id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_status: Option<ConnectionStatus>,
    /// Executor transport kind, when reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub executor_type: Option<String>,
    /// Passthrough inventory fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl MergedSystem {
    /// Lift a basic system into the merged shape, with no detail fields.
    #[must_use]
    pub fn from_system(system: &System) -> Self {
        Self {
            id: system.id.clone(),
            hostname: system.hostname.clone(),
            display_name: system.display_name.clone(),
            issue_count: system.issue_count,
            connection_status: None,
            executor_type: None,
            extra: serde_json::Map::new(),
        }
    }

    fn apply_connection(&mut self, map: &ConnectionMap) {
        if let Some(info) = map.get(&self.id) {
            self.connection_status = Some(info.connection_status);
            self.executor_type = info.executor_type.clone();
        }
    }
}

impl Identified for MergedSystem {
    fn system_id(&self) -> &SystemId {
        &self.id
    }
}

/// Degraded merge: basic systems plus connection fields only.
///
/// Used when the inventory lookup fails, e.g. because a subset of the
/// referenced systems no longer exists. Pagination must continue anyway.
#[must_use]
pub fn overlay_connections(systems: &[System], map: &ConnectionMap) -> Vec<MergedSystem> {
    systems
        .iter()
        .map(|system| {
            let mut merged = MergedSystem::from_system(system);
            merged.apply_connection(map);
            merged
        })
        .collect()
}

/// Full merge of one page: inventory detail, connection fields, and basic
/// system fields.
///
/// Detail values win over the basic fields where both are present; the
/// basic fields only fill gaps the inventory record left open. Connection
/// fields always come from the connection map. Output order follows the
/// inventory results.
#[must_use]
pub fn merge_page(
    basic: &[System],
    detail: Vec<InventoryRecord>,
    map: &ConnectionMap,
) -> Vec<MergedSystem> {
    detail
        .into_iter()
        .map(|record| {
            let fallback = basic.iter().find(|system| system.id == record.id);
            let mut merged = MergedSystem {
                id: record.id,
                hostname: record
                    .hostname
                    .or_else(|| fallback.and_then(|s| s.hostname.clone())),
                display_name: record
                    .display_name
                    .or_else(|| fallback.and_then(|s| s.display_name.clone())),
                issue_count: record.issue_count.or(fallback.and_then(|s| s.issue_count)),
                connection_status: None,
                executor_type: None,
                extra: record.extra,
            };
            merged.apply_connection(map);
            merged
        })
        .collect()
}
