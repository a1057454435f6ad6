//! Facade configuration.

use serde::{Deserialize, Serialize};

/// Default number of records fetched when a listing is filtered.
pub const DEFAULT_FILTERED_BATCH_CAP: u32 = 50;

/// Default page size for unfiltered listings.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Tunables for [`QueryFacade`](crate::QueryFacade).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FacadeConfig {
    /// Upper bound on records fetched for a filtered listing, which is
    /// sorted in memory and never paginated.
    pub filtered_batch_cap: u32,
    /// Page size used when a request does not name one.
    pub default_page_size: u32,
}

impl Default for FacadeConfig {
    fn default() -> Self {
        Self {
            filtered_batch_cap: DEFAULT_FILTERED_BATCH_CAP,
            default_page_size: DEFAULT_PAGE_SIZE,
        }
    }
}
