//! Paginated fetch and merge drivers.
//!
//! [`fetch_system_page`] reconciles one page across the remediations,
//! inventory, and connection sources; [`fetch_all_systems`] walks every page
//! to support "select all". Page requests are issued strictly in sequence.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use remcon_core::{
    ConnectionPayload, FilterConfig, MergedSystem, PageWindow, RemediationId, SystemsFilter,
    merge_page, overlay_connections,
};

use crate::api::{EntityConfig, InventoryApi, SystemsApi, SystemsQuery};
use crate::error::{ClientError, ClientResult};

/// Fixed page size of the all-systems walk.
pub const ALL_SYSTEMS_PAGE_SIZE: u32 = 100;

/// Hard ceiling on the all-systems walk. A loop trusting `total` alone can
/// spin forever on inconsistent reports; exceeding this ceiling is an error
/// instead.
pub const MAX_ALL_SYSTEMS_PAGES: u32 = 100;

/// One reconciled page of systems.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemsPage {
    /// 1-based page number.
    pub page: u32,
    /// Page size.
    pub per_page: u32,
    /// Total from the systems service; authoritative for pagination even
    /// when inventory disagrees.
    pub total: u64,
    /// Rows actually present on this page.
    pub count: usize,
    /// Merged rows.
    pub results: Vec<MergedSystem>,
}

/// Fetch and merge one page of systems.
///
/// The inventory lookup enriches the basic rows; when it fails (for
/// example because some referenced systems were deleted after the plan was
/// created) the page degrades to basic rows plus connection fields rather
/// than aborting, so pagination keeps working.
#[instrument(skip(config, systems, inventory, connections), fields(remediation = %remediation_id))]
pub async fn fetch_system_page(
    window: PageWindow,
    config: Option<&FilterConfig>,
    systems: &dyn SystemsApi,
    remediation_id: RemediationId,
    inventory: &dyn InventoryApi,
    connections: &ConnectionPayload,
) -> ClientResult<SystemsPage> {
    let filter = SystemsFilter::from_config(config);
    let query = SystemsQuery::new(remediation_id, window.per_page, window.offset(), filter);
    let response = systems.fetch_systems(&query).await?;

    let basic = response.data;
    let total = response.meta.total;
    debug!(page = window.page, rows = basic.len(), total, "fetched systems page");

    let ids: Vec<_> = basic.iter().map(|system| system.id.clone()).collect();
    let entity_config = EntityConfig {
        filter: config.cloned().unwrap_or_default(),
        has_items: true,
        per_page: window.per_page,
        page: window.page,
    };

    let connection_map = connections.normalize();
    let results = match inventory.get_entities(&ids, &entity_config, true).await {
        Ok(detail) => merge_page(&basic, detail.results, &connection_map),
        Err(err) => {
            // Stale or deleted systems must not abort the page.
            warn!(error = %err, "inventory lookup failed; returning basic system data");
            overlay_connections(&basic, &connection_map)
        }
    };

    Ok(SystemsPage {
        page: window.page,
        per_page: window.per_page,
        total,
        count: results.len(),
        results,
    })
}

/// Fetch every system of a plan, page by page.
///
/// Trusts the most recently reported `total` each iteration, matching an
/// eventually-consistent backend. A service that keeps promising more
/// systems than it serves trips [`ClientError::TotalMismatch`]; a walk
/// longer than [`MAX_ALL_SYSTEMS_PAGES`] trips
/// [`ClientError::PageOverflow`].
#[instrument(skip(systems, config), fields(remediation = %remediation_id))]
pub async fn fetch_all_systems(
    systems: &dyn SystemsApi,
    remediation_id: RemediationId,
    config: Option<&FilterConfig>,
) -> ClientResult<Vec<remcon_core::System>> {
    let filter = SystemsFilter::from_config(config);
    let mut all = Vec::new();
    let mut offset = 0u32;
    let mut pages = 0u32;

    loop {
        let query = SystemsQuery::new(
            remediation_id,
            ALL_SYSTEMS_PAGE_SIZE,
            offset,
            filter.clone(),
        );
        let response = systems.fetch_systems(&query).await?;
        let total = response.meta.total;
        let served = response.data.len();
        all.extend(response.data);
        offset = offset.saturating_add(ALL_SYSTEMS_PAGE_SIZE);
        pages = pages.saturating_add(1);

        if total == 0 || all.len() as u64 >= total {
            return Ok(all);
        }
        if served == 0 {
            return Err(ClientError::TotalMismatch {
                fetched: all.len(),
                total,
            });
        }
        if pages >= MAX_ALL_SYSTEMS_PAGES {
            return Err(ClientError::PageOverflow {
                pages,
                fetched: all.len(),
                total,
            });
        }
    }
}
