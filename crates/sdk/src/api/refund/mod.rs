use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::api::http::HttpClient;
use crate::api::types::{ApiResult, unwrap_envelope};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RefundStatus {
    Pending,
    Succeeded,
    Failed,
    Canceled,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRefundRequest {
    pub payment_id: String,
    /// Omit for a full refund.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
}

impl CreateRefundRequest {
    pub fn new(payment_id: impl Into<String>) -> Self {
        Self { payment_id: payment_id.into(), amount: None, reason: None, metadata: None }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListRefundsQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub starting_after: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ending_before: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<RefundStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_after: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_before: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct RefundApi {
    client: Arc<HttpClient>,
}

impl RefundApi {
    pub(crate) fn new(client: Arc<HttpClient>) -> Self {
        Self { client }
    }

    pub async fn create(&self, request: &CreateRefundRequest) -> ApiResult<Value> {
        let response = self.client.post("/refunds", request).await?;
        Ok(unwrap_envelope(response))
    }

    pub async fn retrieve(&self, refund_id: &str) -> ApiResult<Value> {
        let response = self.client.get(&format!("/refunds/{}", refund_id)).await?;
        Ok(unwrap_envelope(response))
    }

    pub async fn list(&self, query: &ListRefundsQuery) -> ApiResult<Value> {
        self.client.get_with_query("/refunds", query).await
    }

    pub async fn cancel(&self, refund_id: &str) -> ApiResult<Value> {
        let response = self.client.post_empty(&format!("/refunds/{}/cancel", refund_id)).await?;
        Ok(unwrap_envelope(response))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::transport::RetryPolicy;
    use crate::api::transport::testing::MockTransport;
    use crate::api::types::Environment;
    use std::time::Duration;

    fn api(transport: Arc<MockTransport>) -> RefundApi {
        let http = HttpClient::with_transport(
            transport,
            "sk_test_123".to_string(),
            Environment::Sandbox,
            None,
            Duration::from_secs(30),
            RetryPolicy::new(0),
        );
        RefundApi::new(Arc::new(http))
    }

    #[tokio::test]
    async fn test_create_full_refund_omits_amount() {
        let transport = MockTransport::respond_with(200, r#"{"data":{"id":"re_1"}}"#);
        let refunds = api(transport.clone());

        refunds.create(&CreateRefundRequest::new("pay_1")).await.unwrap();

        let sent = transport.requests()[0].body.clone().unwrap();
        assert_eq!(sent, serde_json::json!({"paymentId": "pay_1"}));
    }

    #[tokio::test]
    async fn test_list_filters_by_payment() {
        let transport = MockTransport::respond_with(200, r#"{"items":[],"hasMore":false}"#);
        let refunds = api(transport.clone());

        refunds
            .list(&ListRefundsQuery { payment_id: Some("pay_1".to_string()), ..Default::default() })
            .await
            .unwrap();

        assert_eq!(
            transport.requests()[0].query,
            vec![("paymentId".to_string(), "pay_1".to_string())]
        );
    }
}
