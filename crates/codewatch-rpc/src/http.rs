//! HTTP JSON-RPC transport backed by `reqwest`.
//!
//! Transient failures (connection errors, non-2xx statuses, timeouts) are
//! retried with exponential backoff. JSON-RPC error objects are returned
//! as-is; the node has already answered.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::TransportError;
use crate::request::{JsonRpcRequest, JsonRpcResponse};
use crate::retry::{RetryConfig, RetryPolicy};
use crate::transport::RpcTransport;

/// Configuration for `HttpTransport`.
#[derive(Debug, Clone)]
pub struct HttpTransportConfig {
    pub retry: RetryConfig,
    pub request_timeout: Duration,
}

impl Default for HttpTransportConfig {
    fn default() -> Self {
        Self {
            retry: RetryConfig::default(),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Smallest per-attempt timeout `within_budget` hands out.
const MIN_ATTEMPT_TIMEOUT: Duration = Duration::from_millis(1);

impl HttpTransportConfig {
    /// Split `budget` across the first attempt, every retry and the backoff
    /// sleeps between them, so a full retry sequence finishes inside `budget`.
    ///
    /// Pair with an outer `tokio::time::timeout` of the same `budget`.
    pub fn within_budget(budget: Duration, retry: RetryConfig) -> Self {
        let policy = RetryPolicy::new(retry.clone());
        let mut backoff = Duration::ZERO;
        for attempt in 1..=policy.max_retries() {
            match policy.next_delay(attempt) {
                Some(delay) => backoff = backoff.saturating_add(delay),
                None => break,
            }
            if backoff >= budget {
                break;
            }
        }
        let attempts = policy.max_retries().saturating_add(1);
        let per_attempt = budget.saturating_sub(backoff) / attempts;
        Self {
            retry,
            request_timeout: per_attempt.max(MIN_ATTEMPT_TIMEOUT),
        }
    }
}

/// HTTP JSON-RPC transport with retry.
pub struct HttpTransport {
    url: String,
    http: reqwest::Client,
    retry: RetryPolicy,
    request_timeout: Duration,
}

impl HttpTransport {
    /// Create a transport for the given JSON-RPC endpoint URL.
    pub fn new(url: impl Into<String>, config: HttpTransportConfig) -> Result<Self, TransportError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| TransportError::Other(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            url: url.into(),
            http,
            retry: RetryPolicy::new(config.retry),
            request_timeout: config.request_timeout,
        })
    }

    async fn send_once(&self, req: &JsonRpcRequest) -> Result<JsonRpcResponse, TransportError> {
        let resp = self
            .http
            .post(&self.url)
            .json(req)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(TransportError::Http(format!("HTTP {status}: {body}")));
        }

        resp.json::<JsonRpcResponse>()
            .await
            .map_err(|e| self.classify(e))
    }

    fn classify(&self, e: reqwest::Error) -> TransportError {
        if e.is_timeout() {
            TransportError::Timeout {
                ms: self.request_timeout.as_millis() as u64,
            }
        } else if e.is_decode() {
            TransportError::Malformed(e.to_string())
        } else {
            TransportError::Http(e.to_string())
        }
    }
}

#[async_trait]
impl RpcTransport for HttpTransport {
    async fn send(&self, req: JsonRpcRequest) -> Result<JsonRpcResponse, TransportError> {
        let mut attempt = 0u32;
        loop {
            attempt += 1;
            match self.send_once(&req).await {
                Ok(resp) => return Ok(resp),
                Err(e) if e.is_retryable() => match self.retry.next_delay(attempt) {
                    Some(delay) => {
                        tracing::debug!(
                            attempt,
                            delay_ms = delay.as_millis() as u64,
                            method = %req.method,
                            error = %e,
                            url = %self.url,
                            "retrying request"
                        );
                        tokio::time::sleep(delay).await;
                    }
                    None => {
                        tracing::debug!(
                            attempt,
                            method = %req.method,
                            error = %e,
                            url = %self.url,
                            "giving up on request"
                        );
                        return Err(e);
                    }
                },
                Err(e) => return Err(e),
            }
        }
    }

    fn url(&self) -> &str {
        &self.url
    }
}
