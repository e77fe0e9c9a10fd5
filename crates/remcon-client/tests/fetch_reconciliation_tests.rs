//! Page-fetch reconciliation tests over in-memory collaborators.

use async_trait::async_trait;
use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use serde_json::json;

use remcon_client::{
    ClientError, ClientResult, EntityConfig, InventoryApi, SystemsApi, SystemsQuery,
    SystemsResponse, fetch_all_systems, fetch_system_page,
};
use remcon_core::{
    ConnectionPayload, ConnectionStatus, FilterConfig, PageWindow, RemediationId, System, SystemId,
};

const PLAN: &str = "11223344-5566-7788-99aa-bbccddeeff00";

fn plan_id() -> RemediationId {
    PLAN.parse().expect("plan id")
}

fn system(id: &str, display_name: &str) -> System {
    System {
        id: SystemId::from(id),
        hostname: Some(format!("{id}.example.com")),
        display_name: Some(display_name.to_string()),
        issue_count: Some(1),
    }
}

/// Systems service fake that records every query it answers.
struct FakeSystems {
    total: u64,
    all: Vec<System>,
    queries: Mutex<Vec<SystemsQuery>>,
}

impl FakeSystems {
    fn new(total: u64, all: Vec<System>) -> Self {
        Self {
            total,
            all,
            queries: Mutex::new(Vec::new()),
        }
    }

    fn offsets(&self) -> Vec<u32> {
        self.queries.lock().iter().map(|q| q.offset).collect()
    }
}

#[async_trait]
impl SystemsApi for FakeSystems {
    async fn fetch_systems(&self, query: &SystemsQuery) -> ClientResult<SystemsResponse> {
        self.queries.lock().push(query.clone());
        let start = usize::try_from(query.offset).unwrap().min(self.all.len());
        let end = (start + usize::try_from(query.limit).unwrap()).min(self.all.len());
        Ok(SystemsResponse {
            data: self.all[start..end].to_vec(),
            meta: remcon_client::api::Meta { total: self.total },
        })
    }
}

/// Inventory fake answering from a canned JSON body, or failing outright.
struct FakeInventory {
    body: Option<serde_json::Value>,
}

#[async_trait]
impl InventoryApi for FakeInventory {
    async fn get_entities(
        &self,
        _ids: &[SystemId],
        _config: &EntityConfig,
        _show_tags: bool,
    ) -> ClientResult<remcon_client::EntityResponse> {
        match &self.body {
            Some(body) => Ok(serde_json::from_value(body.clone())?),
            None => Err(ClientError::Api {
                status: 404,
                endpoint: "/hosts".to_string(),
            }),
        }
    }
}

#[tokio::test]
async fn merged_page_prefers_inventory_detail_and_connection_fields() {
    let systems = FakeSystems::new(2, vec![system("a", "alpha"), system("b", "beta")]);
    let inventory = FakeInventory {
        body: Some(json!({
            "results": [
                { "id": "a", "display_name": "alpha-fresh", "tags": ["env=prod"] },
                { "id": "b" }
            ]
        })),
    };
    let connections = ConnectionPayload::from_value(Some(&json!([
        { "system_ids": ["a"], "connection_status": "connected", "executor_type": "satellite" }
    ])));

    let page = fetch_system_page(
        PageWindow::default(),
        None,
        &systems,
        plan_id(),
        &inventory,
        &connections,
    )
    .await
    .expect("page");

    assert_eq!(page.total, 2);
    assert_eq!(page.count, 2);
    let first = &page.results[0];
    assert_eq!(first.display_name.as_deref(), Some("alpha-fresh"));
    assert_eq!(first.hostname.as_deref(), Some("a.example.com"));
    assert_eq!(first.connection_status, Some(ConnectionStatus::Connected));
    assert_eq!(first.executor_type.as_deref(), Some("satellite"));
    assert_eq!(first.extra["tags"], json!(["env=prod"]));
    // Inventory said nothing about "b" beyond its id; basic fields fill in.
    assert_eq!(page.results[1].display_name.as_deref(), Some("beta"));
    assert_eq!(page.results[1].connection_status, None);
}

#[tokio::test]
async fn inventory_failure_degrades_to_basic_rows_without_erroring() {
    let systems = FakeSystems::new(1, vec![system("a", "alpha")]);
    let inventory = FakeInventory { body: None };
    let connections = ConnectionPayload::from_value(Some(&json!([
        { "system_ids": ["a"], "connection_status": "disconnected" }
    ])));

    let page = fetch_system_page(
        PageWindow::default(),
        None,
        &systems,
        plan_id(),
        &inventory,
        &connections,
    )
    .await
    .expect("fallback page");

    assert_eq!(page.total, 1);
    assert_eq!(page.count, 1);
    assert_eq!(page.results[0].display_name.as_deref(), Some("alpha"));
    assert_eq!(
        page.results[0].connection_status,
        Some(ConnectionStatus::Disconnected)
    );
    assert!(page.results[0].extra.is_empty());
}

#[tokio::test]
async fn forbidden_connection_payload_leaves_rows_bare() {
    let systems = FakeSystems::new(1, vec![system("a", "alpha")]);
    let inventory = FakeInventory {
        body: Some(json!({ "results": [ { "id": "a" } ] })),
    };
    let connections = ConnectionPayload::from_value(Some(&json!(403)));

    let page = fetch_system_page(
        PageWindow::default(),
        None,
        &systems,
        plan_id(),
        &inventory,
        &connections,
    )
    .await
    .expect("page");

    assert_eq!(page.results[0].connection_status, None);
}

#[tokio::test]
async fn page_window_translates_to_offset_and_filter() {
    let systems = FakeSystems::new(0, Vec::new());
    let inventory = FakeInventory {
        body: Some(json!({ "results": [] })),
    };
    let config = FilterConfig {
        hostname_or_id: Some("web".to_string()),
    };

    let page = fetch_system_page(
        PageWindow::new(3, 20),
        Some(&config),
        &systems,
        plan_id(),
        &inventory,
        &ConnectionPayload::Empty,
    )
    .await
    .expect("page");

    assert_eq!(page.page, 3);
    assert_eq!(page.per_page, 20);
    let queries = systems.queries.lock();
    assert_eq!(queries.len(), 1);
    assert_eq!(queries[0].offset, 40);
    assert_eq!(queries[0].limit, 20);
    assert_eq!(queries[0].sort, "display_name");
    assert_eq!(queries[0].filter.display_name.as_deref(), Some("web"));
}

#[tokio::test]
async fn all_systems_walk_pages_sequentially() {
    let all: Vec<System> = (0..250)
        .map(|i| system(&format!("s{i:03}"), &format!("host {i:03}")))
        .collect();
    let systems = FakeSystems::new(250, all);

    let fetched = fetch_all_systems(&systems, plan_id(), None)
        .await
        .expect("all systems");

    assert_eq!(fetched.len(), 250);
    assert_eq!(systems.offsets(), vec![0, 100, 200]);
}

#[tokio::test]
async fn all_systems_stops_immediately_on_zero_total() {
    let systems = FakeSystems::new(0, Vec::new());
    let fetched = fetch_all_systems(&systems, plan_id(), None)
        .await
        .expect("empty");
    assert!(fetched.is_empty());
    assert_eq!(systems.offsets(), vec![0]);
}

/// Pathological service that always serves one row and promises many more.
struct BottomlessSystems {
    calls: Mutex<u32>,
}

#[async_trait]
impl SystemsApi for BottomlessSystems {
    async fn fetch_systems(&self, query: &SystemsQuery) -> ClientResult<SystemsResponse> {
        let mut calls = self.calls.lock();
        *calls += 1;
        Ok(SystemsResponse {
            data: vec![system(&format!("s{}", query.offset), "host")],
            meta: remcon_client::api::Meta { total: 1_000_000 },
        })
    }
}

#[tokio::test]
async fn all_systems_walk_is_bounded_by_the_page_ceiling() {
    let systems = BottomlessSystems {
        calls: Mutex::new(0),
    };
    let err = fetch_all_systems(&systems, plan_id(), None)
        .await
        .expect_err("overflow");
    assert!(matches!(err, ClientError::PageOverflow { pages: 100, .. }));
    assert_eq!(*systems.calls.lock(), 100);
}

#[tokio::test]
async fn all_systems_flags_a_total_the_service_never_serves() {
    // Service promises 50 systems but has nothing past the first page.
    let systems = FakeSystems::new(50, vec![system("a", "alpha")]);
    let err = fetch_all_systems(&systems, plan_id(), None)
        .await
        .expect_err("mismatch");
    assert!(matches!(
        err,
        ClientError::TotalMismatch {
            fetched: 1,
            total: 50
        }
    ));
}
