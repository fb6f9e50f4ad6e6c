use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::api::http::HttpClient;
use crate::api::types::{ApiResult, unwrap_envelope};

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceTransactionsQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub starting_after: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ending_before: Option<String>,
}

#[derive(Debug, Clone)]
pub struct BalanceApi {
    client: Arc<HttpClient>,
}

impl BalanceApi {
    pub(crate) fn new(client: Arc<HttpClient>) -> Self {
        Self { client }
    }

    /// Current account balance: available, pending and reserved amounts
    /// per currency.
    pub async fn retrieve(&self) -> ApiResult<Value> {
        let response = self.client.get("/balance").await?;
        Ok(unwrap_envelope(response))
    }

    pub async fn list_transactions(&self, query: &BalanceTransactionsQuery) -> ApiResult<Value> {
        self.client.get_with_query("/balance/transactions", query).await
    }
}
