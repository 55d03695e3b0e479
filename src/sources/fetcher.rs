use async_trait::async_trait;
use reqwest::{Client, header::USER_AGENT};
use std::time::Duration;
use tracing::debug;

use crate::errors::{AppResult, SourceError, SourceResult};
use crate::utils::url::UrlUtils;

/// Retrieves the raw text of a source playlist
#[async_trait]
pub trait PlaylistFetcher: Send + Sync {
    async fn fetch(&self, url: &str, user_agent: Option<&str>) -> SourceResult<String>;
}

/// reqwest-backed fetcher with a total request timeout
pub struct HttpPlaylistFetcher {
    client: Client,
}

impl HttpPlaylistFetcher {
    pub fn new(timeout: Duration) -> AppResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PlaylistFetcher for HttpPlaylistFetcher {
    async fn fetch(&self, url: &str, user_agent: Option<&str>) -> SourceResult<String> {
        let obfuscated = UrlUtils::obfuscate_credentials(url);
        debug!("Fetching playlist from: {}", obfuscated);

        let mut request = self.client.get(url);
        if let Some(ua) = user_agent {
            request = request.header(USER_AGENT, ua);
        }

        let response = request
            .send()
            .await
            .map_err(|e| SourceError::from_reqwest(&obfuscated, &e))?;

        if !response.status().is_success() {
            return Err(SourceError::Http {
                status: response.status().as_u16(),
                url: obfuscated,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| SourceError::from_reqwest(&obfuscated, &e))?;

        let content = String::from_utf8_lossy(&bytes).into_owned();
        debug!(
            "Fetched {} bytes ({} lines) from {}",
            bytes.len(),
            content.lines().count(),
            obfuscated
        );
        Ok(content)
    }
}
