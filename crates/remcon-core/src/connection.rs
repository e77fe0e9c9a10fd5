//! Connection-status payload normalization.
//!
//! The connectivity service reports reachability per executor, fanning out to
//! systems via `system_ids`. Its payload shape is unreliable at the boundary:
//! it may be absent entirely, an HTTP status sentinel (403 when the caller
//! lacks the RBAC role), or the expected record array. [`ConnectionPayload`]
//! tags those cases explicitly so downstream code never duck-types.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::system::SystemId;

/// Reachability of a system over the execution transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionStatus {
    /// Reachable; playbooks can be pushed to it.
    Connected,
    /// Known but not reachable.
    Disconnected,
    /// Anything the service reports that we do not model.
    #[serde(other)]
    Unknown,
}

/// One executor's connectivity report.
///
/// A single record fans out to many systems through `system_ids`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionRecord {
    /// Systems reached through this executor.
    #[serde(default)]
    pub system_ids: Vec<SystemId>,
    /// Reachability of those systems.
    pub connection_status: ConnectionStatus,
    /// Transport kind (direct, Satellite, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub executor_type: Option<String>,
    /// Executor identifier, used to exclude unreachable executors at launch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub executor_id: Option<String>,
    /// Human-readable executor name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub executor_name: Option<String>,
    /// Number of systems behind this executor.
    #[serde(default)]
    pub system_count: u64,
}

/// Connection fields carried onto a merged system row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionInfo {
    /// Reachability of the system.
    pub connection_status: ConnectionStatus,
    /// Transport kind, when reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub executor_type: Option<String>,
}

/// Lookup from system id to its connection fields.
///
/// Derived, never persisted; rebuilt on every fetch cycle. Keys are exactly
/// the union of `system_ids` across the input records; an absent id means
/// unknown connection status.
pub type ConnectionMap = HashMap<SystemId, ConnectionInfo>;

/// Tagged connection-status payload as received from the service.
#[derive(Debug, Clone, PartialEq)]
pub enum ConnectionPayload {
    /// Well-formed record array.
    Ok(Vec<ConnectionRecord>),
    /// Payload absent or malformed; treated as "no connection data".
    Empty,
    /// The service answered with a 403 sentinel.
    Forbidden,
}

impl ConnectionPayload {
    /// Status sentinel the service substitutes for the record array when the
    /// caller lacks the required role.
    const FORBIDDEN_SENTINEL: u64 = 403;

    /// Classify a raw JSON payload.
    ///
    /// Never fails: the 403 sentinel maps to [`Self::Forbidden`], anything
    /// that is not an array maps to [`Self::Empty`], and array entries that
    /// do not deserialize as records are dropped.
    #[must_use]
    pub fn from_value(value: Option<&serde_json::Value>) -> Self {
        match value {
            Some(serde_json::Value::Number(n)) if n.as_u64() == Some(Self::FORBIDDEN_SENTINEL) => {
                Self::Forbidden
            }
            Some(serde_json::Value::Array(items)) => {
                let records = items
                    .iter()
                    .filter_map(|item| serde_json::from_value(item.clone()).ok())
                    .collect();
                Self::Ok(records)
            }
            _ => Self::Empty,
        }
    }

    /// Flatten the payload into a per-system lookup.
    ///
    /// Later records overwrite earlier ones for the same id (last write
    /// wins, in input order). [`Self::Empty`] and [`Self::Forbidden`] yield
    /// an empty map.
    #[must_use]
    pub fn normalize(&self) -> ConnectionMap {
        let Self::Ok(records) = self else {
            return ConnectionMap::new();
        };

        let mut map = ConnectionMap::new();
        for record in records {
            for system_id in &record.system_ids {
                map.insert(
                    system_id.clone(),
                    ConnectionInfo {
                        connection_status: record.connection_status,
                        executor_type: record.executor_type.clone(),
                    },
                );
            }
        }
        map
    }

    /// Borrow the records, when present.
    #[must_use]
    pub fn records(&self) -> &[ConnectionRecord] {
        match self {
            Self::Ok(records) => records,
            Self::Empty | Self::Forbidden => &[],
        }
    }
}

/// Human-readable label for an executor's connection row.
#[must_use]
pub fn connection_label(record: &ConnectionRecord) -> String {
    if record.connection_status != ConnectionStatus::Connected {
        return "Not available".to_string();
    }
    match record.executor_name.as_deref() {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => "Direct connection".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(ids: &[&str], status: ConnectionStatus) -> ConnectionRecord {
        ConnectionRecord {
            system_ids: ids.iter().copied().map(SystemId::from).collect(),
            connection_status: status,
            executor_type: None,
            executor_id: None,
            executor_name: None,
            system_count: ids.len() as u64,
        }
    }

    #[test]
    fn forbidden_sentinel_yields_empty_map() {
        let payload = ConnectionPayload::from_value(Some(&json!(403)));
        assert_eq!(payload, ConnectionPayload::Forbidden);
        assert!(payload.normalize().is_empty());
    }

    #[test]
    fn absent_payload_yields_empty_map() {
        let payload = ConnectionPayload::from_value(None);
        assert_eq!(payload, ConnectionPayload::Empty);
        assert!(payload.normalize().is_empty());
    }

    #[test]
    fn non_array_payload_yields_empty_map() {
        for value in [json!("nope"), json!({"a": 1}), json!(500), json!(true)] {
            let payload = ConnectionPayload::from_value(Some(&value));
            assert_eq!(payload, ConnectionPayload::Empty, "value: {value}");
        }
    }

    #[test]
    fn records_fan_out_to_every_system_id() {
        let payload = ConnectionPayload::Ok(vec![record(
            &["a", "b", "c"],
            ConnectionStatus::Connected,
        )]);
        let map = payload.normalize();
        assert_eq!(map.len(), 3);
        assert_eq!(
            map[&SystemId::from("b")].connection_status,
            ConnectionStatus::Connected
        );
    }

    #[test]
    fn last_record_wins_for_shared_system_ids() {
        let payload = ConnectionPayload::Ok(vec![
            record(&["a", "b"], ConnectionStatus::Connected),
            record(&["b"], ConnectionStatus::Disconnected),
        ]);
        let map = payload.normalize();
        assert_eq!(
            map[&SystemId::from("a")].connection_status,
            ConnectionStatus::Connected
        );
        assert_eq!(
            map[&SystemId::from("b")].connection_status,
            ConnectionStatus::Disconnected
        );
    }

    #[test]
    fn malformed_array_entries_are_dropped() {
        let payload = ConnectionPayload::from_value(Some(&json!([
            { "system_ids": ["a"], "connection_status": "connected" },
            42,
        ])));
        let map = payload.normalize();
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn unmodeled_statuses_deserialize_as_unknown() {
        let rec: ConnectionRecord = serde_json::from_value(json!({
            "system_ids": ["a"],
            "connection_status": "no_executor"
        }))
        .unwrap();
        assert_eq!(rec.connection_status, ConnectionStatus::Unknown);
    }

    #[test]
    fn connection_labels_follow_executor_shape() {
        let mut rec = record(&["a"], ConnectionStatus::Disconnected);
        assert_eq!(connection_label(&rec), "Not available");

        rec.connection_status = ConnectionStatus::Connected;
        assert_eq!(connection_label(&rec), "Direct connection");

        rec.executor_name = Some("satellite-01.example.com".to_string());
        assert_eq!(connection_label(&rec), "satellite-01.example.com");
    }
}
