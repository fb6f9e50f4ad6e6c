use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::api::http::HttpClient;
use crate::api::types::{ApiResult, unwrap_envelope};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    Payment,
    Refund,
    Payout,
    Adjustment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    Pending,
    Completed,
    Failed,
    Canceled,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTransactionsQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub starting_after: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ending_before: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub transaction_type: Option<TransactionType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TransactionStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_after: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_before: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct TransactionApi {
    client: Arc<HttpClient>,
}

impl TransactionApi {
    pub(crate) fn new(client: Arc<HttpClient>) -> Self {
        Self { client }
    }

    pub async fn retrieve(&self, transaction_id: &str) -> ApiResult<Value> {
        let response = self.client.get(&format!("/transactions/{}", transaction_id)).await?;
        Ok(unwrap_envelope(response))
    }

    pub async fn list(&self, query: &ListTransactionsQuery) -> ApiResult<Value> {
        self.client.get_with_query("/transactions", query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::transport::RetryPolicy;
    use crate::api::transport::testing::MockTransport;
    use crate::api::types::Environment;
    use std::time::Duration;

    fn api(transport: Arc<MockTransport>) -> TransactionApi {
        let http = HttpClient::with_transport(
            transport,
            "sk_test_123".to_string(),
            Environment::Sandbox,
            None,
            Duration::from_secs(30),
            RetryPolicy::new(0),
        );
        TransactionApi::new(Arc::new(http))
    }

    #[tokio::test]
    async fn test_type_filter_serializes_as_type() {
        let transport = MockTransport::respond_with(200, r#"{"items":[],"hasMore":false}"#);
        let transactions = api(transport.clone());

        transactions
            .list(&ListTransactionsQuery {
                transaction_type: Some(TransactionType::Payout),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(
            transport.requests()[0].query,
            vec![("type".to_string(), "payout".to_string())]
        );
    }

    #[tokio::test]
    async fn test_retrieve_unwraps_envelope() {
        let transport = MockTransport::respond_with(200, r#"{"data":{"id":"txn_1"}}"#);
        let transactions = api(transport);

        let transaction = transactions.retrieve("txn_1").await.unwrap();

        assert_eq!(transaction["id"], "txn_1");
    }
}
