//! Favicon lookup by domain.
//!
//! Icons are cosmetic: any failure yields `None` and the page is stored
//! with empty icon data.

#[cfg(feature = "network")]
use std::time::Duration;

#[cfg(feature = "network")]
use tracing::debug;

/// Favicon service endpoint; the domain is appended.
pub const FAVICON_ENDPOINT: &str = "https://www.google.com/s2/favicons?sz=64&domain=";

/// Builds the favicon request URL for `domain`.
pub fn favicon_url(domain: &str) -> String {
    format!("{}{}", FAVICON_ENDPOINT, urlencoding::encode(domain))
}

/// Source of favicon bytes for a domain.
#[allow(async_fn_in_trait)]
pub trait IconSource {
    async fn fetch_icon(&self, domain: &str) -> Option<Vec<u8>>;
}

/// Icon source that never returns anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoIcons;

impl IconSource for NoIcons {
    async fn fetch_icon(&self, _domain: &str) -> Option<Vec<u8>> {
        None
    }
}

/// Fetches icons over HTTPS from [`FAVICON_ENDPOINT`].
#[cfg(feature = "network")]
#[derive(Debug, Clone)]
pub struct HttpIconSource {
    client: reqwest::Client,
}

#[cfg(feature = "network")]
impl HttpIconSource {
    pub fn new() -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self { client })
    }
}

#[cfg(feature = "network")]
impl IconSource for HttpIconSource {
    async fn fetch_icon(&self, domain: &str) -> Option<Vec<u8>> {
        if domain.is_empty() {
            return None;
        }
        let response = match self.client.get(favicon_url(domain)).send().await {
            Ok(r) if r.status().is_success() => r,
            Ok(r) => {
                debug!(domain, status = %r.status(), "favicon request rejected");
                return None;
            }
            Err(e) => {
                debug!(domain, error = %e, "favicon request failed");
                return None;
            }
        };
        match response.bytes().await {
            Ok(bytes) if !bytes.is_empty() => Some(bytes.to_vec()),
            _ => None,
        }
    }
}
