//! Wire shape of one upstream page.

use serde::Deserialize;

/// One page of upstream results.
#[derive(Debug, Clone, Deserialize)]
pub struct Page {
    /// Pagination metadata.
    pub info: PageInfo,
    /// Result objects, kept opaque.
    #[serde(default)]
    pub results: Vec<serde_json::Value>,
}

/// Pagination metadata attached to every page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageInfo {
    /// Total number of matching records, if reported.
    #[serde(default)]
    pub count: Option<u64>,
    /// Total number of pages, if reported.
    #[serde(default)]
    pub pages: Option<u64>,
    /// Absolute URL of the next page.
    #[serde(default)]
    pub next: Option<String>,
    /// Absolute URL of the previous page.
    #[serde(default)]
    pub prev: Option<String>,
}

impl Page {
    /// A page is worth consuming if it has results or points further.
    #[must_use]
    pub fn has_content(&self) -> bool {
        self.info.next.is_some() || !self.results.is_empty()
    }
}
