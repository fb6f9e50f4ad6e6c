use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use reqwest::Method;
use reqwest::header::HeaderMap;
use serde::Serialize;
use serde_json::Value;

use crate::api::http::HttpClient;
use crate::api::transport::RetryPolicy;
use crate::api::{
    ApiResult, BalanceApi, CustomerApi, Environment, PaymentApi, PaymentLinkApi, RefundApi,
    TransactionApi,
};
use crate::error::ApiError;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_MAX_RETRIES: u32 = 3;

#[derive(Clone)]
pub struct ClientConfig {
    pub api_key: String,
    pub environment: Environment,
    /// Explicit endpoint override; when unset the environment decides.
    pub base_url: Option<String>,
    pub timeout: Duration,
    pub max_retries: u32,
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            environment: Environment::Production,
            base_url: None,
            timeout: DEFAULT_TIMEOUT,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"[redacted]")
            .field("environment", &self.environment)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

/// Entry point to the Pexipay API. One instance owns one pooled HTTP
/// connection; share it across tasks via the resource fields.
pub struct Client {
    http: Arc<HttpClient>,
    timeout: Duration,
    max_retries: u32,
    pub payments: PaymentApi,
    pub payment_links: PaymentLinkApi,
    pub customers: CustomerApi,
    pub refunds: RefundApi,
    pub transactions: TransactionApi,
    pub balance: BalanceApi,
}

impl Client {
    pub fn new(config: ClientConfig) -> ApiResult<Self> {
        if config.api_key.is_empty() {
            return Err(ApiError::validation(
                "API key is required. Get your API key from \
                 https://app.pexipay.com/dashboard/api-keys",
            ));
        }

        let http = Arc::new(HttpClient::new(
            config.api_key,
            config.environment,
            config.base_url,
            config.timeout,
            RetryPolicy::new(config.max_retries),
        ));

        Ok(Self::wire(http, config.timeout, config.max_retries))
    }

    /// Reads `PEXIPAY_API_KEY` and optionally `PEXIPAY_ENVIRONMENT` from
    /// the process environment.
    pub fn from_env() -> ApiResult<Self> {
        let api_key = std::env::var("PEXIPAY_API_KEY")
            .map_err(|_| ApiError::validation("PEXIPAY_API_KEY not set"))?;

        let mut config = ClientConfig::new(api_key);
        if let Ok(environment) = std::env::var("PEXIPAY_ENVIRONMENT") {
            config.environment = environment.parse()?;
        }

        Self::new(config)
    }

    #[cfg(test)]
    pub(crate) fn with_transport(
        config: ClientConfig,
        transport: Arc<dyn crate::api::transport::Transport>,
        retry: RetryPolicy,
    ) -> Self {
        let http = Arc::new(HttpClient::with_transport(
            transport,
            config.api_key,
            config.environment,
            config.base_url,
            config.timeout,
            retry,
        ));
        Self::wire(http, config.timeout, config.max_retries)
    }

    fn wire(http: Arc<HttpClient>, timeout: Duration, max_retries: u32) -> Self {
        Self {
            payments: PaymentApi::new(Arc::clone(&http)),
            payment_links: PaymentLinkApi::new(Arc::clone(&http)),
            customers: CustomerApi::new(Arc::clone(&http)),
            refunds: RefundApi::new(Arc::clone(&http)),
            transactions: TransactionApi::new(Arc::clone(&http)),
            balance: BalanceApi::new(Arc::clone(&http)),
            http,
            timeout,
            max_retries,
        }
    }

    /// Snapshot of the current configuration. The API key stays redacted
    /// in `Debug` output.
    pub fn config(&self) -> ClientConfig {
        ClientConfig {
            api_key: self.http.api_key(),
            environment: self.http.environment(),
            base_url: Some(self.http.base_url()),
            timeout: self.timeout,
            max_retries: self.max_retries,
        }
    }

    /// Swaps the API key. Takes effect for every subsequent call on this
    /// client; calls already in flight keep the credentials they captured.
    pub fn set_api_key(&self, api_key: impl Into<String>) {
        self.http.set_api_key(api_key.into());
    }

    /// Switches environment and resets the base URL to that environment's
    /// default endpoint.
    pub fn set_environment(&self, environment: Environment) {
        self.http.set_environment(environment);
    }

    /// Raw access for endpoints not covered by the typed resources.
    /// Per-call headers override the client defaults on collision.
    pub async fn request<Q, B>(
        &self,
        method: Method,
        path: &str,
        query: Option<&Q>,
        body: Option<&B>,
        headers: Option<HeaderMap>,
    ) -> ApiResult<Value>
    where
        Q: Serialize + ?Sized,
        B: Serialize + ?Sized,
    {
        self.http.execute(method, path, query, body, headers).await
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client").field("http", &self.http).finish_non_exhaustive()
    }
}
