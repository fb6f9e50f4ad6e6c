use pexipay::{Client, ClientConfig, CreatePaymentRequest, Environment, ListPaymentsQuery};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    // Use a sandbox key from https://app.pexipay.com/dashboard/api-keys
    let mut config = ClientConfig::new(std::env::var("PEXIPAY_API_KEY")?);
    config.environment = Environment::Sandbox;
    let client = Client::new(config)?;

    // Create a payment
    let mut request = CreatePaymentRequest::new(49.99, "EUR");
    request.description = Some("Order #1234".to_string());
    request.customer_email = Some("jo@example.com".to_string());

    match client.payments.create(&request).await {
        Ok(payment) => println!("✅ Created payment: {}", payment["id"]),
        Err(e) => println!("❌ Payment creation failed: {}", e),
    }

    // List recent payments
    match client
        .payments
        .list(&ListPaymentsQuery { limit: Some(5), ..Default::default() })
        .await
    {
        Ok(page) => println!("✅ Recent payments: {}", page),
        Err(e) => println!("❌ Failed to list payments: {}", e),
    }

    // Check the account balance
    match client.balance.retrieve().await {
        Ok(balance) => println!("✅ Balance: {}", balance),
        Err(e) => println!("❌ Failed to fetch balance: {}", e),
    }

    Ok(())
}
