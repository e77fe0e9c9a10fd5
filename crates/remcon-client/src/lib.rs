//! REST clients and fetch drivers for the remediation console.
//!
//! The collaborator seams ([`SystemsApi`], [`InventoryApi`], [`PlaybookApi`],
//! [`Notifier`]) are traits so the reconciliation logic can be exercised
//! without a network; `reqwest`-backed production implementations live in
//! [`http`].

pub mod api;
pub mod bulk;
pub mod error;
pub mod execute;
pub mod fetch;
pub mod http;
pub mod notify;

pub use api::{
    EntityConfig, EntityResponse, ExecuteRequest, InventoryApi, PlaybookApi, SystemsApi,
    SystemsQuery, SystemsResponse,
};
pub use bulk::BulkSelectController;
pub use error::{ClientError, ClientResult};
pub use execute::{download_playbook, execute_playbook};
pub use fetch::{
    ALL_SYSTEMS_PAGE_SIZE, MAX_ALL_SYSTEMS_PAGES, SystemsPage, fetch_all_systems,
    fetch_system_page,
};
pub use http::{InventoryHttpClient, RemediationsHttpClient};
pub use notify::{Notification, NotificationVariant, Notifier};
