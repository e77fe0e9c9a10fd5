//! Execution readiness summary for a remediation plan.
//!
//! Partitions the connectivity report into reachable and unreachable
//! executors and answers the questions the execute dialog asks: how many
//! systems can be reached, which executors must be excluded from the run,
//! and whether execution is possible at all.

use crate::connection::{ConnectionRecord, ConnectionStatus};

/// `"n noun"` or `"n nouns"`.
#[must_use]
pub fn pluralize(count: u64, noun: &str) -> String {
    if count > 1 {
        format!("{count} {noun}s")
    } else {
        format!("{count} {noun}")
    }
}

/// Footer of the execute dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecuteFooter {
    /// Nothing to execute; only a close action remains.
    CloseOnly,
    /// Execute and download are offered.
    Actions {
        /// Label of the confirm action.
        confirm_label: String,
        /// The confirm action is enabled only when systems are reachable.
        confirm_enabled: bool,
    },
}

/// Connectivity partition of a plan's executors.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecuteSummary {
    connected: Vec<ConnectionRecord>,
    disconnected: Vec<ConnectionRecord>,
}

impl ExecuteSummary {
    /// Partition connectivity records into connected and disconnected,
    /// preserving input order within each group.
    #[must_use]
    pub fn new(records: impl IntoIterator<Item = ConnectionRecord>) -> Self {
        let (connected, disconnected) = records
            .into_iter()
            .partition(|record| record.connection_status == ConnectionStatus::Connected);
        Self {
            connected,
            disconnected,
        }
    }

    /// Reachable executors.
    #[must_use]
    pub fn connected(&self) -> &[ConnectionRecord] {
        &self.connected
    }

    /// Unreachable executors.
    #[must_use]
    pub fn disconnected(&self) -> &[ConnectionRecord] {
        &self.disconnected
    }

    /// Display rows: connected first, then disconnected.
    pub fn rows(&self) -> impl Iterator<Item = &ConnectionRecord> {
        self.connected.iter().chain(self.disconnected.iter())
    }

    /// Systems reachable for execution.
    #[must_use]
    pub fn connected_system_count(&self) -> u64 {
        self.connected.iter().map(|r| r.system_count).sum()
    }

    /// Systems in the plan, reachable or not.
    #[must_use]
    pub fn total_system_count(&self) -> u64 {
        self.rows().map(|r| r.system_count).sum()
    }

    /// Executor ids to exclude from the run: the disconnected ones that
    /// actually carry an id.
    #[must_use]
    pub fn excluded_executor_ids(&self) -> Vec<String> {
        self.disconnected
            .iter()
            .filter_map(|r| r.executor_id.clone())
            .collect()
    }

    /// Execution is possible only with at least one reachable executor.
    #[must_use]
    pub fn can_execute(&self) -> bool {
        !self.connected.is_empty()
    }

    /// Confirm-button label. While counts are still loading the label
    /// stays generic.
    #[must_use]
    pub fn confirm_label(&self, is_loading: bool) -> String {
        if is_loading {
            "Execute playbook".to_string()
        } else {
            format!(
                "Execute playbook on {}",
                pluralize(self.connected_system_count(), "system")
            )
        }
    }

    /// Footer shape: a plan with no systems at all degrades to close-only.
    #[must_use]
    pub fn footer(&self, is_loading: bool) -> ExecuteFooter {
        if self.total_system_count() == 0 {
            ExecuteFooter::CloseOnly
        } else {
            ExecuteFooter::Actions {
                confirm_label: self.confirm_label(is_loading),
                confirm_enabled: self.can_execute(),
            }
        }
    }
}
