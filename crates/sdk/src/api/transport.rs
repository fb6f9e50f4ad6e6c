use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Method;
use reqwest::header::HeaderMap;
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

/// Statuses treated as transient server faults.
const RETRYABLE_STATUSES: [u16; 4] = [500, 502, 503, 504];

#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub(crate) struct TransportError(pub(crate) String);

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        TransportError(err.to_string())
    }
}

/// One fully prepared outgoing request. Built fresh per call and never
/// reused.
#[derive(Debug, Clone)]
pub(crate) struct SendRequest {
    pub method: Method,
    pub url: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    pub headers: HeaderMap,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub(crate) struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// A single network attempt. The retry loop lives above this seam, in
/// [`Connection`], so tests can count attempts with a fake transport.
#[async_trait]
pub(crate) trait Transport: Send + Sync {
    async fn dispatch(&self, request: &SendRequest) -> Result<RawResponse, TransportError>;
}

pub(crate) struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// The inner client pools connections, so one instance serves every
    /// call for the lifetime of the owning SDK client.
    pub fn new() -> Self {
        Self { client: reqwest::Client::new() }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn dispatch(&self, request: &SendRequest) -> Result<RawResponse, TransportError> {
        let mut builder = self
            .client
            .request(request.method.clone(), &request.url)
            .headers(request.headers.clone())
            .timeout(request.timeout);

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(RawResponse { status, body })
    }
}

/// Exponential backoff, configured once at client construction.
/// `max_retries` counts retries beyond the first attempt.
#[derive(Debug, Clone)]
pub(crate) struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(10),
        }
    }

    /// Backoff before retry `attempt` (zero-based): doubles each attempt,
    /// capped at `max_delay`.
    pub fn delay(&self, attempt: u32) -> Duration {
        self.base_delay
            .saturating_mul(2u32.saturating_pow(attempt))
            .min(self.max_delay)
    }

    fn retryable(result: &Result<RawResponse, TransportError>) -> bool {
        match result {
            Ok(response) => RETRYABLE_STATUSES.contains(&response.status),
            Err(_) => true,
        }
    }
}

/// Pooled transport plus retry policy. Callers see only the final outcome:
/// an exhausted retry sequence is indistinguishable from a single failed
/// call.
pub(crate) struct Connection {
    transport: Arc<dyn Transport>,
    retry: RetryPolicy,
}

impl Connection {
    pub fn new(transport: Arc<dyn Transport>, retry: RetryPolicy) -> Self {
        Self { transport, retry }
    }

    pub async fn send(&self, request: &SendRequest) -> Result<RawResponse, TransportError> {
        let mut attempt = 0;
        loop {
            let result = self.transport.dispatch(request).await;
            if !RetryPolicy::retryable(&result) || attempt >= self.retry.max_retries {
                return result;
            }
            let delay = self.retry.delay(attempt);
            attempt += 1;
            warn!(
                "{} {} failed, retrying in {:?} (attempt {}/{})",
                request.method, request.url, delay, attempt, self.retry.max_retries
            );
            tokio::time::sleep(delay).await;
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    use super::*;

    /// Scripted transport: hands out queued responses in order and records
    /// every request it sees. Once the script runs dry it answers 200 `{}`.
    pub(crate) struct MockTransport {
        responses: Mutex<VecDeque<Result<RawResponse, TransportError>>>,
        requests: Mutex<Vec<SendRequest>>,
    }

    impl MockTransport {
        pub fn new(responses: Vec<Result<RawResponse, TransportError>>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses.into()),
                requests: Mutex::new(Vec::new()),
            })
        }

        pub fn respond_with(status: u16, body: &str) -> Arc<Self> {
            Self::new(vec![Ok(RawResponse { status, body: body.to_string() })])
        }

        pub fn requests(&self) -> Vec<SendRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Transport for MockTransport {
        async fn dispatch(&self, request: &SendRequest) -> Result<RawResponse, TransportError> {
            self.requests.lock().unwrap().push(request.clone());
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(RawResponse { status: 200, body: "{}".to_string() }))
        }
    }
}
