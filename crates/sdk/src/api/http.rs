use std::fmt;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use reqwest::Method;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue, USER_AGENT};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::api::transport::{
    Connection, RawResponse, ReqwestTransport, RetryPolicy, SendRequest, Transport,
};
use crate::api::types::{ApiResult, Environment};
use crate::error::{ApiError, classify_response};

/// Pinned API version sent with every request.
pub(crate) const API_VERSION: &str = "2025-11-23";
const API_VERSION_HEADER: &str = "x-pexipay-version";
const SDK_USER_AGENT: &str = concat!("Pexipay-Rust-SDK/", env!("CARGO_PKG_VERSION"));

/// Auth and endpoint state shared by every resource API. Calls clone a
/// snapshot before dispatch, so a concurrent `set_api_key` or
/// `set_environment` never touches a request already in flight.
#[derive(Clone)]
struct AuthState {
    api_key: String,
    environment: Environment,
    base_url: String,
}

/// The request pipeline: owns credentials and endpoint configuration,
/// shapes parameters and headers, and turns non-2xx responses into
/// [`ApiError`]s. Envelope unwrapping is left to the resource wrappers.
pub(crate) struct HttpClient {
    connection: Connection,
    state: RwLock<AuthState>,
    timeout: Duration,
}

impl HttpClient {
    pub fn new(
        api_key: String,
        environment: Environment,
        base_url: Option<String>,
        timeout: Duration,
        retry: RetryPolicy,
    ) -> Self {
        Self::with_transport(Arc::new(ReqwestTransport::new()), api_key, environment, base_url, timeout, retry)
    }

    pub fn with_transport(
        transport: Arc<dyn Transport>,
        api_key: String,
        environment: Environment,
        base_url: Option<String>,
        timeout: Duration,
        retry: RetryPolicy,
    ) -> Self {
        let base_url = base_url.unwrap_or_else(|| environment.base_url().to_string());
        Self {
            connection: Connection::new(transport, retry),
            state: RwLock::new(AuthState { api_key, environment, base_url }),
            timeout,
        }
    }

    pub fn set_api_key(&self, api_key: String) {
        let mut state = self.state.write().unwrap();
        state.api_key = api_key;
    }

    /// Switches environment and rederives the base URL in the same write,
    /// so no call can observe a stale pairing.
    pub fn set_environment(&self, environment: Environment) {
        let mut state = self.state.write().unwrap();
        state.environment = environment;
        state.base_url = environment.base_url().to_string();
    }

    pub fn api_key(&self) -> String {
        self.state.read().unwrap().api_key.clone()
    }

    pub fn environment(&self) -> Environment {
        self.state.read().unwrap().environment
    }

    pub fn base_url(&self) -> String {
        self.state.read().unwrap().base_url.clone()
    }

    fn snapshot(&self) -> AuthState {
        self.state.read().unwrap().clone()
    }

    fn build_url(state: &AuthState, path: &str) -> String {
        format!("{}{}", state.base_url, path)
    }

    /// Process-wide defaults merged with per-call overrides, overrides
    /// winning on collision. Works on a fresh map each call; the shared
    /// state is never handed out.
    fn build_headers(state: &AuthState, overrides: Option<HeaderMap>) -> ApiResult<HeaderMap> {
        let mut headers = HeaderMap::new();
        let bearer = HeaderValue::from_str(&format!("Bearer {}", state.api_key))
            .map_err(|_| ApiError::validation("API key contains characters not allowed in headers"))?;
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(API_VERSION_HEADER, HeaderValue::from_static(API_VERSION));
        headers.insert(USER_AGENT, HeaderValue::from_static(SDK_USER_AGENT));

        if let Some(overrides) = overrides {
            for (key, value) in overrides {
                if let Some(key) = key {
                    headers.insert(key, value);
                }
            }
        }

        Ok(headers)
    }

    /// Serializes `query` and renders it as string pairs, dropping `null`
    /// entries so absent parameters never reach the wire.
    fn build_query<Q>(query: Option<&Q>) -> ApiResult<Vec<(String, String)>>
    where
        Q: Serialize + ?Sized,
    {
        let Some(query) = query else {
            return Ok(Vec::new());
        };
        let value = serde_json::to_value(query).map_err(ApiError::serialization)?;
        let mut pairs = Vec::new();
        if let Value::Object(map) = value {
            for (key, value) in map {
                match value {
                    Value::Null => {}
                    Value::String(s) => pairs.push((key, s)),
                    other => pairs.push((key, other.to_string())),
                }
            }
        }
        Ok(pairs)
    }

    fn build_body<B>(body: Option<&B>) -> ApiResult<Option<Value>>
    where
        B: Serialize + ?Sized,
    {
        let Some(body) = body else {
            return Ok(None);
        };
        let mut value = serde_json::to_value(body).map_err(ApiError::serialization)?;
        if let Value::Object(map) = &mut value {
            map.retain(|_, v| !v.is_null());
        }
        Ok(Some(value))
    }

    pub async fn execute<Q, B>(
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
        let state = self.snapshot();
        let request = SendRequest {
            url: Self::build_url(&state, path),
            headers: Self::build_headers(&state, headers)?,
            query: Self::build_query(query)?,
            body: Self::build_body(body)?,
            method,
            timeout: self.timeout,
        };

        debug!("{} {}", request.method, request.url);

        let response = self
            .connection
            .send(&request)
            .await
            .map_err(|e| ApiError::Network { message: format!("Network error: {}", e) })?;

        Self::interpret(response)
    }

    fn interpret(response: RawResponse) -> ApiResult<Value> {
        if response.ok() {
            if response.body.trim().is_empty() {
                return Ok(Value::Null);
            }
            return serde_json::from_str(&response.body).map_err(|e| ApiError::Generic {
                message: format!("Invalid JSON in response body: {}", e),
                status_code: Some(response.status),
                code: None,
                request_id: None,
                details: None,
            });
        }

        let body: Value =
            serde_json::from_str(&response.body).unwrap_or_else(|_| Value::Object(Map::new()));
        Err(classify_response(response.status, &body, &response.body))
    }

    pub async fn get(&self, path: &str) -> ApiResult<Value> {
        self.execute::<(), ()>(Method::GET, path, None, None, None).await
    }

    pub async fn get_with_query<Q>(&self, path: &str, query: &Q) -> ApiResult<Value>
    where
        Q: Serialize + ?Sized,
    {
        self.execute::<Q, ()>(Method::GET, path, Some(query), None, None).await
    }

    pub async fn post<B>(&self, path: &str, body: &B) -> ApiResult<Value>
    where
        B: Serialize + ?Sized,
    {
        self.execute::<(), B>(Method::POST, path, None, Some(body), None).await
    }

    pub async fn post_empty(&self, path: &str) -> ApiResult<Value> {
        self.execute::<(), ()>(Method::POST, path, None, None, None).await
    }

    pub async fn patch<B>(&self, path: &str, body: &B) -> ApiResult<Value>
    where
        B: Serialize + ?Sized,
    {
        self.execute::<(), B>(Method::PATCH, path, None, Some(body), None).await
    }

    pub async fn delete(&self, path: &str) -> ApiResult<Value> {
        self.execute::<(), ()>(Method::DELETE, path, None, None, None).await
    }
}

impl fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.snapshot();
        // api_key intentionally left out
        f.debug_struct("HttpClient")
            .field("environment", &state.environment)
            .field("base_url", &state.base_url)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
