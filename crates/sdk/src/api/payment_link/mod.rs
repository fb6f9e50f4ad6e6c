use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::api::http::HttpClient;
use crate::api::types::{ApiResult, unwrap_envelope};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentLinkStatus {
    Active,
    Expired,
    Completed,
    Canceled,
}

/// Prefill details shown on the hosted payment page.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentLinkRequest {
    pub amount: f64,
    pub currency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_info: Option<CustomerInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancel_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
}

impl CreatePaymentLinkRequest {
    pub fn new(amount: f64, currency: impl Into<String>) -> Self {
        Self {
            amount,
            currency: currency.into(),
            description: None,
            customer_info: None,
            return_url: None,
            cancel_url: None,
            webhook_url: None,
            expires_at: None,
            metadata: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPaymentLinksQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub starting_after: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ending_before: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<PaymentLinkStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_after: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_before: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct PaymentLinkApi {
    client: Arc<HttpClient>,
}

impl PaymentLinkApi {
    pub(crate) fn new(client: Arc<HttpClient>) -> Self {
        Self { client }
    }

    pub async fn create(&self, request: &CreatePaymentLinkRequest) -> ApiResult<Value> {
        let response = self.client.post("/payment-links", request).await?;
        Ok(unwrap_envelope(response))
    }

    pub async fn retrieve(&self, payment_link_id: &str) -> ApiResult<Value> {
        let response = self.client.get(&format!("/payment-links/{}", payment_link_id)).await?;
        Ok(unwrap_envelope(response))
    }

    pub async fn list(&self, query: &ListPaymentLinksQuery) -> ApiResult<Value> {
        self.client.get_with_query("/payment-links", query).await
    }

    pub async fn cancel(&self, payment_link_id: &str) -> ApiResult<Value> {
        let response = self
            .client
            .post_empty(&format!("/payment-links/{}/cancel", payment_link_id))
            .await?;
        Ok(unwrap_envelope(response))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::transport::RetryPolicy;
    use crate::api::transport::testing::MockTransport;
    use crate::api::types::Environment;
    use chrono::TimeZone;
    use std::time::Duration;

    fn api(transport: Arc<MockTransport>) -> PaymentLinkApi {
        let http = HttpClient::with_transport(
            transport,
            "sk_test_123".to_string(),
            Environment::Sandbox,
            None,
            Duration::from_secs(30),
            RetryPolicy::new(0),
        );
        PaymentLinkApi::new(Arc::new(http))
    }

    #[tokio::test]
    async fn test_create_serializes_expiry_as_rfc3339() {
        let transport = MockTransport::respond_with(200, r#"{"data":{"id":"plink_1"}}"#);
        let links = api(transport.clone());

        let mut request = CreatePaymentLinkRequest::new(10.0, "USD");
        request.expires_at = Some(Utc.with_ymd_and_hms(2026, 1, 15, 12, 0, 0).unwrap());
        request.customer_info =
            Some(CustomerInfo { email: Some("jo@example.com".to_string()), ..Default::default() });
        let link = links.create(&request).await.unwrap();

        assert_eq!(link["id"], "plink_1");
        let sent = transport.requests()[0].body.clone().unwrap();
        assert_eq!(sent["expiresAt"], "2026-01-15T12:00:00Z");
        assert_eq!(sent["customerInfo"], serde_json::json!({"email": "jo@example.com"}));
    }

    #[tokio::test]
    async fn test_cancel_posts_to_cancel_path() {
        let transport = MockTransport::respond_with(200, r#"{"data":{"id":"plink_1"}}"#);
        let links = api(transport.clone());

        links.cancel("plink_1").await.unwrap();

        let request = &transport.requests()[0];
        assert_eq!(request.url, "https://sandbox-api.pexipay.com/v1/payment-links/plink_1/cancel");
        assert!(request.body.is_none());
    }

    #[tokio::test]
    async fn test_list_passes_status_filter() {
        let transport = MockTransport::respond_with(200, r#"{"items":[],"hasMore":false}"#);
        let links = api(transport.clone());

        links
            .list(&ListPaymentLinksQuery {
                status: Some(PaymentLinkStatus::Active),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(
            transport.requests()[0].query,
            vec![("status".to_string(), "active".to_string())]
        );
    }
}
