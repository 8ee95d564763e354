//! Test Request Producer
//!
//! Generates and publishes fraud check requests to NATS for pipeline testing.

use chrono::{Duration as ChronoDuration, Utc};
use fraud_signal_pipeline::Transaction;
use rand::Rng;
use std::time::Duration;
use tracing::{info, warn};

/// Request generator for testing
struct RequestGenerator {
    rng: rand::rngs::ThreadRng,
    request_counter: u64,
}

impl RequestGenerator {
    fn new() -> Self {
        Self {
            rng: rand::thread_rng(),
            request_counter: 0,
        }
    }

    /// Generate a routine-looking request
    fn generate_routine(&mut self) -> Transaction {
        self.request_counter += 1;

        Transaction {
            transaction_id: format!("tx_{:012}", self.request_counter),
            customer_id: format!("C{}", self.rng.gen_range(1..50)),
            amount: self.rng.gen_range(10.0..500.0),
            merchant: self
                .random_choice(&["GroceryMart", "CoffeeHouse", "FuelStop", "BookNook"])
                .to_string(),
            location: Some(
                self.random_choice(&["Mumbai", "Delhi", "Pune"]).to_string(),
            ),
            latitude: None,
            longitude: None,
            device_id: format!("D{}", self.rng.gen_range(1..5)),
            timestamp: Some(Utc::now()),
        }
    }

    /// Generate a suspicious-looking request
    fn generate_suspicious(&mut self) -> Transaction {
        self.request_counter += 1;

        // Large amount, unfamiliar location and device, small-hours timestamp.
        let night = Utc::now()
            .date_naive()
            .and_hms_opt(3, 0, 0)
            .map(|dt| dt.and_utc())
            .unwrap_or_else(Utc::now)
            - ChronoDuration::days(self.rng.gen_range(0..3));

        Transaction {
            transaction_id: format!("tx_{:012}", self.request_counter),
            customer_id: format!("C{}", self.rng.gen_range(1..50)),
            amount: self.rng.gen_range(2_000.0..20_000.0),
            merchant: self
                .random_choice(&["LuxWatch", "CryptoKiosk", "WireDirect"])
                .to_string(),
            location: Some(
                self.random_choice(&["Moscow", "Lagos", "Caracas"]).to_string(),
            ),
            latitude: None,
            longitude: None,
            device_id: format!("D{:08x}", self.rng.gen::<u32>()),
            timestamp: Some(night),
        }
    }

    fn random_choice<'a>(&mut self, choices: &[&'a str]) -> &'a str {
        choices[self.rng.gen_range(0..choices.len())]
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("test_producer=info".parse()?),
        )
        .init();

    info!("Starting Test Request Producer");

    // Parse arguments
    let args: Vec<String> = std::env::args().collect();
    let nats_url = args.get(1).map(|s| s.as_str()).unwrap_or("nats://localhost:4222");
    let subject = args.get(2).map(|s| s.as_str()).unwrap_or("fraud.check");
    let count: u64 = args.get(3).and_then(|s| s.parse().ok()).unwrap_or(100);
    let fraud_rate: f64 = args.get(4).and_then(|s| s.parse().ok()).unwrap_or(0.1);
    let delay_ms: u64 = args.get(5).and_then(|s| s.parse().ok()).unwrap_or(100);

    info!(
        nats_url = %nats_url,
        subject = %subject,
        count = count,
        fraud_rate = fraud_rate,
        delay_ms = delay_ms,
        "Configuration loaded"
    );

    // Connect to NATS
    let client = match async_nats::connect(nats_url).await {
        Ok(c) => {
            info!("Connected to NATS");
            c
        }
        Err(e) => {
            warn!(error = %e, "Failed to connect to NATS. Running in dry-run mode.");
            return run_dry_mode(count, fraud_rate, delay_ms).await;
        }
    };

    // Generate and publish requests
    let mut generator = RequestGenerator::new();
    let mut rng = rand::thread_rng();

    info!("Starting to publish {} requests...", count);

    let mut routine_count = 0;
    let mut suspicious_count = 0;

    for i in 0..count {
        let request = if rng.gen_bool(fraud_rate) {
            suspicious_count += 1;
            generator.generate_suspicious()
        } else {
            routine_count += 1;
            generator.generate_routine()
        };

        let payload = serde_json::to_vec(&request)?;

        client.publish(subject.to_string(), payload.into()).await?;

        if (i + 1) % 10 == 0 {
            info!(
                "Published {}/{} requests ({} routine, {} suspicious)",
                i + 1,
                count,
                routine_count,
                suspicious_count
            );
        }

        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    }

    info!(
        "Completed! Published {} requests ({} routine, {} suspicious)",
        count, routine_count, suspicious_count
    );

    Ok(())
}

async fn run_dry_mode(count: u64, fraud_rate: f64, delay_ms: u64) -> anyhow::Result<()> {
    info!("Running in dry-run mode (no NATS connection)");

    let mut generator = RequestGenerator::new();
    let mut rng = rand::thread_rng();

    for i in 0..count {
        let request = if rng.gen_bool(fraud_rate) {
            generator.generate_suspicious()
        } else {
            generator.generate_routine()
        };

        let json = serde_json::to_string_pretty(&request)?;

        if (i + 1) % 10 == 0 || i == 0 {
            info!("Sample request {}:\n{}", i + 1, json);
        }

        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    }

    Ok(())
}
