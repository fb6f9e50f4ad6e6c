mod balance;
mod customer;
pub(crate) mod http;
mod payment;
mod payment_link;
mod refund;
mod transaction;
pub(crate) mod transport;
mod types;

pub use balance::{BalanceApi, BalanceTransactionsQuery};
pub use customer::{
    CreateCustomerRequest, CustomerAddress, CustomerApi, ListCustomersQuery, UpdateCustomerRequest,
};
pub use payment::{
    CardDetails, CreatePaymentRequest, ListPaymentsQuery, PaymentApi, PaymentMethod, PaymentStatus,
};
pub use payment_link::{
    CreatePaymentLinkRequest, CustomerInfo, ListPaymentLinksQuery, PaymentLinkApi,
    PaymentLinkStatus,
};
pub use refund::{CreateRefundRequest, ListRefundsQuery, RefundApi, RefundStatus};
pub use transaction::{ListTransactionsQuery, TransactionApi, TransactionStatus, TransactionType};
pub use types::{ApiResult, Environment};
