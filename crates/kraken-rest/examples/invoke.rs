//! Example: invoking public and private methods
//!
//! Run with: cargo run -p kraken-rest --example invoke
//!
//! Private calls run only when KRAKEN_API_KEY and KRAKEN_API_SECRET are set.
//! Set KRAKEN_OTP as well if the key requires a one-time password.

use kraken_rest::{KrakenRestClient, Params, RestError};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    println!("=== Kraken REST Gateway Example ===\n");

    // ========================================================================
    // PUBLIC METHODS - No authentication required
    // ========================================================================

    let client = KrakenRestClient::public()?;

    let time = client.invoke("Time", Params::new())?.await?;
    println!("Server time: {}", time["rfc1123"]);

    let ticker = client
        .invoke("Ticker", Params::new().with("pair", "XBTUSD"))?
        .await?;
    if let Some(last) = ticker["XXBTZUSD"]["c"][0].as_str() {
        println!("XBT/USD last trade: {}", last);
    }

    // Unknown methods fail before anything is sent
    match client.invoke("Nonexistent", Params::new()) {
        Err(RestError::InvalidMethod(name)) => println!("Rejected unknown method {:?}", name),
        other => println!("Unexpected: {:?}", other.map(|call| call.method())),
    }

    // ========================================================================
    // PRIVATE METHODS - Requires credentials
    // ========================================================================

    let client = match KrakenRestClient::from_env() {
        Ok(client) => client,
        Err(e) => {
            println!("\nSkipping private methods: {}", e);
            return Ok(());
        }
    };

    println!("\n--- Account ---\n");
    match client.invoke("Balance", Params::new())?.await {
        Ok(balance) => println!("Balance: {}", balance),
        Err(e) if e.is_retryable() => println!("Temporary failure, try again: {}", e),
        Err(e) => println!("Error: {}", e),
    }

    // Callback style
    let handle = client.invoke_with(
        "TradeBalance",
        Params::new().with("asset", "ZUSD"),
        |result| match result {
            Ok(balance) => println!("Trade balance: {}", balance),
            Err(e) => println!("Trade balance error: {}", e),
        },
    )?;
    handle.await?;

    Ok(())
}
