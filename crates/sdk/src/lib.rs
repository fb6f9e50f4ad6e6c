//! Rust client for the [Pexipay](https://pexipay.com) card-to-crypto
//! payment platform.
//!
//! ```rust,no_run
//! use pexipay::{Client, ClientConfig, CreatePaymentRequest, Environment};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), pexipay::ApiError> {
//! let mut config = ClientConfig::new("sk_test_...");
//! config.environment = Environment::Sandbox;
//! let client = Client::new(config)?;
//!
//! let mut request = CreatePaymentRequest::new(49.99, "EUR");
//! request.customer_email = Some("jo@example.com".into());
//! let payment = client.payments.create(&request).await?;
//!
//! println!("created payment {}", payment["id"]);
//! # Ok(())
//! # }
//! ```

mod api;
mod clients;
mod error;
pub mod webhooks;

pub use api::{
    ApiResult, BalanceApi, BalanceTransactionsQuery, CardDetails, CreateCustomerRequest,
    CreatePaymentLinkRequest, CreatePaymentRequest, CreateRefundRequest, CustomerAddress,
    CustomerApi, CustomerInfo, Environment, ListCustomersQuery, ListPaymentLinksQuery,
    ListPaymentsQuery, ListRefundsQuery, ListTransactionsQuery, PaymentApi, PaymentLinkApi,
    PaymentLinkStatus, PaymentMethod, PaymentStatus, RefundApi, RefundStatus, TransactionApi,
    TransactionStatus, TransactionType, UpdateCustomerRequest,
};
pub use clients::{Client, ClientConfig, DEFAULT_MAX_RETRIES, DEFAULT_TIMEOUT};
pub use error::ApiError;
pub use webhooks::{WEBHOOK_SIGNATURE_HEADER, construct_webhook_event, verify_webhook_signature};

// Re-exported so callers of `Client::request` don't need a direct reqwest
// dependency.
pub use reqwest::Method;
pub use reqwest::header::HeaderMap;
