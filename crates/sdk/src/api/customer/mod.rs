use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::api::http::HttpClient;
use crate::api::types::{ApiResult, unwrap_envelope};

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerAddress {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line2: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCustomerRequest {
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<CustomerAddress>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
}

impl CreateCustomerRequest {
    pub fn new(email: impl Into<String>) -> Self {
        Self { email: email.into(), name: None, phone: None, address: None, metadata: None }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCustomerRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<CustomerAddress>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListCustomersQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub starting_after: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ending_before: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_after: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_before: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct CustomerApi {
    client: Arc<HttpClient>,
}

impl CustomerApi {
    pub(crate) fn new(client: Arc<HttpClient>) -> Self {
        Self { client }
    }

    pub async fn create(&self, request: &CreateCustomerRequest) -> ApiResult<Value> {
        let response = self.client.post("/customers", request).await?;
        Ok(unwrap_envelope(response))
    }

    pub async fn retrieve(&self, customer_id: &str) -> ApiResult<Value> {
        let response = self.client.get(&format!("/customers/{}", customer_id)).await?;
        Ok(unwrap_envelope(response))
    }

    pub async fn update(&self, customer_id: &str, request: &UpdateCustomerRequest) -> ApiResult<Value> {
        let response = self.client.patch(&format!("/customers/{}", customer_id), request).await?;
        Ok(unwrap_envelope(response))
    }

    /// Deletes a customer. The response (`{"deleted": true, "id": ...}`)
    /// is not enveloped and comes back as-is.
    pub async fn delete(&self, customer_id: &str) -> ApiResult<Value> {
        self.client.delete(&format!("/customers/{}", customer_id)).await
    }

    pub async fn list(&self, query: &ListCustomersQuery) -> ApiResult<Value> {
        self.client.get_with_query("/customers", query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::transport::RetryPolicy;
    use crate::api::transport::testing::MockTransport;
    use crate::api::types::Environment;
    use reqwest::Method;
    use std::time::Duration;

    fn api(transport: Arc<MockTransport>) -> CustomerApi {
        let http = HttpClient::with_transport(
            transport,
            "sk_test_123".to_string(),
            Environment::Sandbox,
            None,
            Duration::from_secs(30),
            RetryPolicy::new(0),
        );
        CustomerApi::new(Arc::new(http))
    }

    #[tokio::test]
    async fn test_update_uses_patch_with_set_fields_only() {
        let transport = MockTransport::respond_with(200, r#"{"data":{"id":"cus_1"}}"#);
        let customers = api(transport.clone());

        let request =
            UpdateCustomerRequest { name: Some("Jo Doe".to_string()), ..Default::default() };
        customers.update("cus_1", &request).await.unwrap();

        let sent = &transport.requests()[0];
        assert_eq!(sent.method, Method::PATCH);
        assert_eq!(sent.url, "https://sandbox-api.pexipay.com/v1/customers/cus_1");
        assert_eq!(sent.body.clone().unwrap(), serde_json::json!({"name": "Jo Doe"}));
    }

    #[tokio::test]
    async fn test_delete_returns_raw_body() {
        let transport = MockTransport::respond_with(200, r#"{"deleted":true,"id":"cus_1"}"#);
        let customers = api(transport.clone());

        let response = customers.delete("cus_1").await.unwrap();

        assert_eq!(response, serde_json::json!({"deleted": true, "id": "cus_1"}));
        assert_eq!(transport.requests()[0].method, Method::DELETE);
    }

    #[tokio::test]
    async fn test_create_nests_address() {
        let transport = MockTransport::respond_with(200, r#"{"data":{"id":"cus_1"}}"#);
        let customers = api(transport.clone());

        let mut request = CreateCustomerRequest::new("jo@example.com");
        request.address = Some(CustomerAddress {
            city: Some("Berlin".to_string()),
            postal_code: Some("10115".to_string()),
            country: Some("DE".to_string()),
            ..Default::default()
        });
        customers.create(&request).await.unwrap();

        let sent = transport.requests()[0].body.clone().unwrap();
        assert_eq!(
            sent["address"],
            serde_json::json!({"city": "Berlin", "postalCode": "10115", "country": "DE"})
        );
    }
}
