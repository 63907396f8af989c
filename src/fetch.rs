//! Page fetching.
//!
//! One HTTP GET per jurisdiction, with a fixed timeout. A page that can't be
//! fetched is logged and treated as having no mentions for this run; it is
//! never fatal and never retried.
//!
//! The [`FetchPage`] trait is the seam the pipeline is written against, so
//! tests can substitute canned pages for the network.

use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};
use url::Url;

/// Why a page could not be fetched.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("HTTP status {status} from {url}")]
    Status { status: u16, url: String },
}

/// Anything that can turn a URL into page text.
pub trait FetchPage {
    /// Fetch the full body of `url` as text.
    async fn fetch(&self, url: &Url) -> Result<String, FetchError>;
}

/// [`FetchPage`] backed by a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Build a client whose every request is bounded by `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

impl FetchPage for HttpFetcher {
    #[instrument(level = "info", skip_all, fields(%url))]
    async fn fetch(&self, url: &Url) -> Result<String, FetchError> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        let body = response.text().await?;
        info!(bytes = body.len(), "Fetched page");
        Ok(body)
    }
}

/// Fetch `url`, logging and swallowing any failure as an empty page.
pub async fn fetch_page_text<F: FetchPage>(fetcher: &F, url: &Url) -> String {
    match fetcher.fetch(url).await {
        Ok(text) => {
            debug!(%url, bytes = text.len(), "Page text ready");
            text
        }
        Err(e) => {
            warn!(%url, error = %e, "Error fetching page; skipping source");
            String::new()
        }
    }
}
