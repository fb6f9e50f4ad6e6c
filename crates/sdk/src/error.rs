use serde_json::Value;
use thiserror::Error;

/// Every failure surfaced by the SDK. API-level failures keep whatever
/// diagnostic fields the server supplied; callers should branch on the
/// variant or on [`ApiError::code`], never on message text.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    #[error("{message}")]
    Authentication { message: String, request_id: Option<String> },

    #[error("{message}")]
    Validation { message: String, details: Option<Value>, request_id: Option<String> },

    #[error("{message}")]
    RateLimit { message: String, retry_after: Option<u64>, request_id: Option<String> },

    #[error("{message}")]
    Network { message: String },

    #[error("{resource} not found: {resource_id}")]
    ResourceNotFound { resource: String, resource_id: String, request_id: Option<String> },

    #[error("{message}")]
    PaymentFailed { message: String, details: Option<Value>, request_id: Option<String> },

    #[error("{message}")]
    Generic {
        message: String,
        status_code: Option<u16>,
        code: Option<String>,
        request_id: Option<String>,
        details: Option<Value>,
    },
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation { message: message.into(), details: None, request_id: None }
    }

    /// Builds the 404 error shape. The generic pipeline cannot know which
    /// resource a bare 404 refers to, so this stays a caller-side
    /// constructor; bare 404s classify as [`ApiError::Generic`].
    pub fn resource_not_found(
        resource: impl Into<String>,
        resource_id: impl Into<String>,
        request_id: Option<String>,
    ) -> Self {
        ApiError::ResourceNotFound {
            resource: resource.into(),
            resource_id: resource_id.into(),
            request_id,
        }
    }

    pub(crate) fn serialization(err: serde_json::Error) -> Self {
        ApiError::Generic {
            message: format!("Failed to serialize request: {}", err),
            status_code: None,
            code: None,
            request_id: None,
            details: None,
        }
    }

    pub fn message(&self) -> String {
        self.to_string()
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            ApiError::Authentication { .. } => Some(401),
            ApiError::Validation { .. } => Some(400),
            ApiError::RateLimit { .. } => Some(429),
            ApiError::Network { .. } => None,
            ApiError::ResourceNotFound { .. } => Some(404),
            ApiError::PaymentFailed { .. } => Some(402),
            ApiError::Generic { status_code, .. } => *status_code,
        }
    }

    pub fn code(&self) -> Option<&str> {
        match self {
            ApiError::Authentication { .. } => Some("authentication_error"),
            ApiError::Validation { .. } => Some("validation_error"),
            ApiError::RateLimit { .. } => Some("rate_limit_error"),
            ApiError::Network { .. } => Some("network_error"),
            ApiError::ResourceNotFound { .. } => Some("resource_not_found"),
            ApiError::PaymentFailed { .. } => Some("payment_failed"),
            ApiError::Generic { code, .. } => code.as_deref(),
        }
    }

    pub fn request_id(&self) -> Option<&str> {
        match self {
            ApiError::Authentication { request_id, .. }
            | ApiError::Validation { request_id, .. }
            | ApiError::RateLimit { request_id, .. }
            | ApiError::ResourceNotFound { request_id, .. }
            | ApiError::PaymentFailed { request_id, .. }
            | ApiError::Generic { request_id, .. } => request_id.as_deref(),
            ApiError::Network { .. } => None,
        }
    }

    pub fn details(&self) -> Option<&Value> {
        match self {
            ApiError::Validation { details, .. }
            | ApiError::PaymentFailed { details, .. }
            | ApiError::Generic { details, .. } => details.as_ref(),
            _ => None,
        }
    }

    /// Server-suggested wait in seconds, only ever present on rate limits.
    pub fn retry_after(&self) -> Option<u64> {
        match self {
            ApiError::RateLimit { retry_after, .. } => *retry_after,
            _ => None,
        }
    }
}

fn body_message(body: &Value) -> Option<String> {
    body.get("error")
        .and_then(Value::as_str)
        .or_else(|| body.get("message").and_then(Value::as_str))
        .map(str::to_string)
}

fn body_str(body: &Value, key: &str) -> Option<String> {
    body.get(key).and_then(Value::as_str).map(str::to_string)
}

/// Maps a non-2xx response onto the error taxonomy. `body` is the parsed
/// response body (an empty object when the body was absent or unparseable),
/// `raw_text` the unparsed body used as a message fallback.
pub(crate) fn classify_response(status: u16, body: &Value, raw_text: &str) -> ApiError {
    let request_id = body_str(body, "requestId");
    let details = body.get("details").cloned();
    let fallback = if raw_text.is_empty() {
        format!("HTTP {}", status)
    } else {
        raw_text.to_string()
    };
    let message = body_message(body).unwrap_or_else(|| fallback.clone());

    match status {
        401 => ApiError::Authentication {
            message: body_message(body).unwrap_or_else(|| "Authentication failed".to_string()),
            request_id,
        },
        400 => ApiError::Validation { message, details, request_id },
        429 => ApiError::RateLimit {
            message: body_message(body).unwrap_or_else(|| "Rate limit exceeded".to_string()),
            retry_after: body.get("retryAfter").and_then(Value::as_u64),
            request_id,
        },
        402 => ApiError::PaymentFailed { message, details, request_id },
        _ => ApiError::Generic {
            message,
            status_code: Some(status),
            code: body_str(body, "code"),
            request_id,
            details,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_classifies_401_as_authentication() {
        let err = classify_response(401, &json!({"error": "bad key"}), r#"{"error":"bad key"}"#);
        assert!(matches!(err, ApiError::Authentication { .. }));
        assert_eq!(err.message(), "bad key");
        assert_eq!(err.status_code(), Some(401));
        assert_eq!(err.code(), Some("authentication_error"));
    }

    #[test]
    fn test_401_without_body_uses_default_message() {
        let err = classify_response(401, &json!({}), "");
        assert_eq!(err.message(), "Authentication failed");
    }

    #[test]
    fn test_classifies_400_as_validation_with_details() {
        let body = json!({
            "error": "amount must be positive",
            "details": {"field": "amount"},
            "requestId": "req_42"
        });
        let err = classify_response(400, &body, "");
        assert!(matches!(err, ApiError::Validation { .. }));
        assert_eq!(err.code(), Some("validation_error"));
        assert_eq!(err.details(), Some(&json!({"field": "amount"})));
        assert_eq!(err.request_id(), Some("req_42"));
    }

    #[test]
    fn test_classifies_429_with_retry_after() {
        let err = classify_response(429, &json!({"retryAfter": 17}), "");
        assert!(matches!(err, ApiError::RateLimit { .. }));
        assert_eq!(err.message(), "Rate limit exceeded");
        assert_eq!(err.retry_after(), Some(17));
        assert_eq!(err.code(), Some("rate_limit_error"));
    }

    #[test]
    fn test_classifies_402_as_payment_failed() {
        let err = classify_response(402, &json!({"error": "card declined"}), "");
        assert!(matches!(err, ApiError::PaymentFailed { .. }));
        assert_eq!(err.message(), "card declined");
        assert_eq!(err.code(), Some("payment_failed"));
    }

    #[test]
    fn test_bare_404_falls_back_to_generic() {
        let err = classify_response(404, &json!({"error": "no such route"}), "");
        assert!(matches!(err, ApiError::Generic { .. }));
        assert_eq!(err.status_code(), Some(404));
    }

    #[test]
    fn test_resource_not_found_constructor() {
        let err = ApiError::resource_not_found("Payment", "pay_9", Some("req_1".to_string()));
        assert_eq!(err.message(), "Payment not found: pay_9");
        assert_eq!(err.status_code(), Some(404));
        assert_eq!(err.code(), Some("resource_not_found"));
        assert_eq!(err.request_id(), Some("req_1"));
    }

    #[test]
    fn test_unlisted_status_keeps_server_fields() {
        let body = json!({
            "message": "teapot",
            "code": "odd_failure",
            "requestId": "req_7"
        });
        let err = classify_response(418, &body, "");
        assert_eq!(err.message(), "teapot");
        assert_eq!(err.status_code(), Some(418));
        assert_eq!(err.code(), Some("odd_failure"));
        assert_eq!(err.request_id(), Some("req_7"));
    }

    #[test]
    fn test_unparseable_body_degrades_to_raw_text() {
        let err = classify_response(503, &json!({}), "<html>gateway</html>");
        assert_eq!(err.message(), "<html>gateway</html>");
    }

    #[test]
    fn test_empty_body_formats_status() {
        let err = classify_response(503, &json!({}), "");
        assert_eq!(err.message(), "HTTP 503");
    }
}
