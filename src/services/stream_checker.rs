//! Stream reachability probing
//!
//! A stream is probed with a lightweight HEAD request first. Some origins
//! refuse HEAD outright (403/405) or drop the connection, so those cases are
//! retried once with a GET whose body is never read. A probe result is
//! advisory: callers record failures, they never drop the stream because of it.

use async_trait::async_trait;
use reqwest::{Client, Method, StatusCode, header::USER_AGENT};
use std::time::Duration;
use tracing::debug;

use crate::errors::AppResult;
use crate::utils::url::UrlUtils;

/// Reachability check for a single stream URL
#[async_trait]
pub trait StreamChecker: Send + Sync {
    /// Returns `true` when the stream answered with a non-error status
    async fn check(&self, url: &str, user_agent: Option<&str>) -> bool;
}

/// What to do after the HEAD attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeOutcome {
    Reachable,
    Unreachable,
    RetryWithGet,
}

pub fn is_reachable_status(status: u16) -> bool {
    status < 400
}

/// Decide the next step from the HEAD status, `None` meaning the request failed
pub fn evaluate_head(status: Option<u16>) -> ProbeOutcome {
    match status {
        Some(code) if is_reachable_status(code) => ProbeOutcome::Reachable,
        Some(403) | Some(405) | None => ProbeOutcome::RetryWithGet,
        Some(_) => ProbeOutcome::Unreachable,
    }
}

/// HTTP implementation of [`StreamChecker`] backed by reqwest
pub struct HttpStreamChecker {
    client: Client,
}

impl HttpStreamChecker {
    /// Create a checker whose every attempt is bounded by `timeout`
    pub fn new(timeout: Duration) -> AppResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    async fn probe(&self, method: Method, url: &str, user_agent: Option<&str>) -> Option<StatusCode> {
        let mut request = self.client.request(method.clone(), url);
        if let Some(ua) = user_agent {
            request = request.header(USER_AGENT, ua);
        }

        match request.send().await {
            // The response is dropped without reading the body
            Ok(response) => Some(response.status()),
            Err(e) => {
                debug!(
                    "{} probe failed for {}: {}",
                    method,
                    UrlUtils::obfuscate_credentials(url),
                    UrlUtils::obfuscate_credentials(&e.to_string())
                );
                None
            }
        }
    }
}

#[async_trait]
impl StreamChecker for HttpStreamChecker {
    async fn check(&self, url: &str, user_agent: Option<&str>) -> bool {
        if !UrlUtils::is_http(url) {
            debug!(
                "Skipping reachability probe for non-HTTP stream {}",
                UrlUtils::obfuscate_credentials(url)
            );
            return true;
        }

        let head_status = self.probe(Method::HEAD, url, user_agent).await;
        match evaluate_head(head_status.map(|s| s.as_u16())) {
            ProbeOutcome::Reachable => true,
            ProbeOutcome::Unreachable => false,
            ProbeOutcome::RetryWithGet => {
                debug!(
                    "HEAD rejected ({:?}) for {}, retrying with GET",
                    head_status,
                    UrlUtils::obfuscate_credentials(url)
                );
                self.probe(Method::GET, url, user_agent)
                    .await
                    .is_some_and(|status| is_reachable_status(status.as_u16()))
            }
        }
    }
}
