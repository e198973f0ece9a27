//! HTTP client that follows `info.next` links until the upstream runs dry.

use std::time::Duration;

use super::page::Page;
use crate::config::UpstreamConfig;
use crate::error::ServiceError;

/// Filters applied to the first page request.
pub const DEFAULT_FILTERS: &[(&str, &str)] = &[
    ("species", "Human"),
    ("status", "alive"),
    ("origin", "Earth"),
];

/// Paginating client for the upstream character API.
///
/// Every failure (bad status, transport error, undecodable body) ends
/// pagination; whatever was collected up to that point is returned.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    scheme: String,
    allow_explicit_scheme: bool,
    max_pages: usize,
}

impl UpstreamClient {
    /// Builds a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Internal`] if the HTTP client cannot be
    /// constructed (e.g. TLS backend initialization failure).
    pub fn new(config: &UpstreamConfig) -> Result<Self, ServiceError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ServiceError::Internal(format!("http client: {e}")))?;

        Ok(Self {
            http,
            scheme: config.scheme.clone(),
            allow_explicit_scheme: config.allow_explicit_scheme,
            max_pages: config.max_pages.max(1),
        })
    }

    /// Collection URL for `resource` on `source_url`.
    ///
    /// The configured scheme is always used unless the client was built
    /// with `allow_explicit_scheme`, in which case a caller-supplied
    /// `http://` or `https://` prefix is kept.
    #[must_use]
    pub fn base_url(&self, source_url: &str, resource: &str) -> String {
        let source = source_url.trim_end_matches('/');
        let resource = resource.trim_matches('/');
        let host = source
            .strip_prefix("https://")
            .or_else(|| source.strip_prefix("http://"));

        match host {
            Some(_) if self.allow_explicit_scheme => format!("{source}/api/{resource}"),
            Some(host) => format!("{}://{host}/api/{resource}", self.scheme),
            None => format!("{}://{source}/api/{resource}", self.scheme),
        }
    }

    /// Fetches every page of `resource` and returns the concatenated
    /// results.
    pub async fn collect(&self, source_url: &str, resource: &str) -> Vec<serde_json::Value> {
        let url = self.base_url(source_url, resource);
        tracing::info!(%url, "starting upstream pagination");

        let mut collected = Vec::new();
        let mut pages = 0usize;
        let mut next_page = self.fetch_page(&url, DEFAULT_FILTERS).await;

        while let Some(page) = next_page.take() {
            if !page.has_content() {
                break;
            }
            pages += 1;
            collected.extend(page.results);

            let Some(next) = page.info.next else {
                break;
            };
            if pages >= self.max_pages {
                tracing::warn!(pages, %next, "page limit reached, stopping pagination");
                break;
            }
            next_page = self.fetch_page(&next, &[]).await;
        }

        tracing::info!(pages, records = collected.len(), "upstream pagination finished");
        collected
    }

    /// Requests and decodes a single page. Any failure is logged and
    /// reported as `None`.
    async fn fetch_page(&self, url: &str, query: &[(&str, &str)]) -> Option<Page> {
        let response = match self.http.get(url).query(query).send().await {
            Ok(response) => response,
            Err(err) => {
                tracing::error!(%url, error = %err, "upstream request failed");
                return None;
            }
        };

        let status = response.status();
        if !status.is_success() {
            tracing::error!(%url, %status, "upstream returned non-success status");
            return None;
        }

        match response.json::<Page>().await {
            Ok(page) => {
                tracing::info!(%url, results = page.results.len(), "fetched upstream page");
                Some(page)
            }
            Err(err) => {
                tracing::error!(%url, error = %err, "upstream page could not be decoded");
                None
            }
        }
    }
}
