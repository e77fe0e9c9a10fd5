//! UI filter configuration and its query translation.

use serde::{Deserialize, Serialize};

/// Filter state as collected from the console.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Free-text hostname-or-id search box value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname_or_id: Option<String>,
}

/// Query filter for the remediations systems endpoint.
///
/// Deterministic 1:1 mapping from [`FilterConfig`]; extend by recognizing
/// more keys without changing existing behavior.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemsFilter {
    /// Matches against the systems' display names.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl SystemsFilter {
    /// Build the query filter from an optional filter configuration.
    #[must_use]
    pub fn from_config(config: Option<&FilterConfig>) -> Self {
        Self {
            display_name: config
                .and_then(|c| c.hostname_or_id.as_deref())
                .filter(|v| !v.is_empty())
                .map(str::to_string),
        }
    }

    /// True when no filter key is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.display_name.is_none()
    }
}
