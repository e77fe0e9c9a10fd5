//! Core types and reconciliation logic for the remediation console.
//!
//! This crate is pure: no I/O, no async. It owns the domain model (systems,
//! connection records, selection state) and the derivations built on top of
//! it (connection normalization, page merging, bulk-select state, execute
//! summaries). Network glue lives in `remcon-client`.

pub mod bulk_select;
pub mod connection;
pub mod execute;
pub mod filter;
pub mod inventory;
pub mod selection;
pub mod system;

pub use bulk_select::{
    BulkAction, BulkSelectInput, BulkSelectState, BulkTitle, Checked, calculate_checked,
};
pub use connection::{
    ConnectionInfo, ConnectionMap, ConnectionPayload, ConnectionRecord, ConnectionStatus,
    connection_label,
};
pub use execute::{ExecuteFooter, ExecuteSummary, pluralize};
pub use filter::{FilterConfig, SystemsFilter};
pub use inventory::{InventoryRecord, MergedSystem, merge_page, overlay_connections};
pub use selection::{SelectionScope, SelectionSet, SelectionUpdate};
pub use system::{Identified, PageWindow, RemediationId, System, SystemId};
