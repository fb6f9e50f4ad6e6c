use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value, json};

use crate::api::http::HttpClient;
use crate::api::types::{ApiResult, unwrap_envelope};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Processing,
    RequiresAction,
    Succeeded,
    Failed,
    Canceled,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardDetails {
    pub number: String,
    pub exp_month: u32,
    pub exp_year: u32,
    pub cvc: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PaymentMethod {
    Card { card: CardDetails },
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentRequest {
    pub amount: f64,
    pub currency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<PaymentMethod>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancel_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
}

impl CreatePaymentRequest {
    pub fn new(amount: f64, currency: impl Into<String>) -> Self {
        Self {
            amount,
            currency: currency.into(),
            description: None,
            payment_method: None,
            customer_email: None,
            customer_name: None,
            return_url: None,
            cancel_url: None,
            webhook_url: None,
            metadata: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPaymentsQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub starting_after: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ending_before: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<PaymentStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_after: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_before: Option<DateTime<Utc>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CapturePaymentRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    amount: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct PaymentApi {
    client: Arc<HttpClient>,
}

impl PaymentApi {
    pub(crate) fn new(client: Arc<HttpClient>) -> Self {
        Self { client }
    }

    pub async fn create(&self, request: &CreatePaymentRequest) -> ApiResult<Value> {
        let response = self.client.post("/payments", request).await?;
        Ok(unwrap_envelope(response))
    }

    pub async fn retrieve(&self, payment_id: &str) -> ApiResult<Value> {
        let response = self.client.get(&format!("/payments/{}", payment_id)).await?;
        Ok(unwrap_envelope(response))
    }

    pub async fn list(&self, query: &ListPaymentsQuery) -> ApiResult<Value> {
        self.client.get_with_query("/payments", query).await
    }

    /// Confirm the 3D Secure challenge outcome for a payment awaiting it.
    pub async fn confirm_3ds(&self, payment_id: &str, three_ds_result: &str) -> ApiResult<Value> {
        let body = json!({ "threeDSResult": three_ds_result });
        let response = self
            .client
            .post(&format!("/payments/{}/3ds/confirm", payment_id), &body)
            .await?;
        Ok(unwrap_envelope(response))
    }

    pub async fn cancel(&self, payment_id: &str) -> ApiResult<Value> {
        let response = self.client.post_empty(&format!("/payments/{}/cancel", payment_id)).await?;
        Ok(unwrap_envelope(response))
    }

    /// Capture an authorized payment, in full when `amount` is `None`.
    pub async fn capture(&self, payment_id: &str, amount: Option<f64>) -> ApiResult<Value> {
        let body = CapturePaymentRequest { amount };
        let response = self
            .client
            .post(&format!("/payments/{}/capture", payment_id), &body)
            .await?;
        Ok(unwrap_envelope(response))
    }
}
