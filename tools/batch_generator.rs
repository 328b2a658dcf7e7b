//! Test Batch Generator
//!
//! Generates a mix of legitimate and suspicious transactions, prints them as
//! a `/predict` request body and scores them locally with the same engine the
//! service uses.
//!
//! Usage: batch_generator [count] [fraud_rate] [seed]

use anyhow::Context;
use chrono::{Duration, Local, Timelike};
use fraudguard::{
    validation::validate_batch, AppConfig, PredictRequest, ScoringEngine, TransactionInput,
};
use rand::{rngs::StdRng, Rng, SeedableRng};
use tracing::info;

/// Transaction generator for testing
struct TransactionGenerator {
    rng: StdRng,
    transaction_counter: u64,
}

impl TransactionGenerator {
    fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            rng,
            transaction_counter: 0,
        }
    }

    /// Generate a random legitimate transaction
    fn generate_legitimate(&mut self) -> TransactionInput {
        self.transaction_counter += 1;
        // Daytime on a weekday-ish schedule
        let timestamp = Local::now()
            .with_hour(self.rng.gen_range(9..18))
            .unwrap_or_else(Local::now);

        TransactionInput {
            amount: (self.rng.gen_range(10.0..500.0_f64) * 100.0).round() / 100.0,
            currency: self.random_choice(&["USD", "CAD", "AUD", "JPY"]).to_string(),
            merchant_id: format!(
                "{}_{:03}",
                self.random_choice(&["AMAZON", "WALMART", "TARGET", "STARBUCKS", "BESTBUY"]),
                self.rng.gen_range(1..100)
            ),
            payment_method: self.random_choice(&["credit_card", "debit_card"]).to_string(),
            customer_email: format!(
                "customer{}@{}",
                { self.transaction_counter },
                self.random_choice(&["company.com", "university.edu", "example.org"])
            ),
            ip_address: Some(self.random_ip()),
            device_id: Some(format!("device_{:08x}", self.rng.gen::<u32>())),
            description: Some("Online purchase".to_string()),
            timestamp: Some(timestamp.to_rfc3339()),
        }
    }

    /// Generate a suspicious/fraudulent transaction
    fn generate_suspicious(&mut self) -> TransactionInput {
        self.transaction_counter += 1;
        // Early morning, sometime in the last week
        let timestamp = (Local::now() - Duration::days(self.rng.gen_range(0..7)))
            .with_hour(self.rng.gen_range(0..6))
            .unwrap_or_else(Local::now);

        TransactionInput {
            amount: (self.rng.gen_range(1000.0..10000.0_f64) * 100.0).round() / 100.0, // High amount
            currency: self.random_choice(&["NGN", "EUR", "GBP"]).to_string(),
            merchant_id: format!(
                "{}_{:03}",
                self.random_choice(&["CRYPTO", "GAMBLING", "FOREX", "UNKNOWN", "NEW"]),
                self.rng.gen_range(1..100)
            ),
            payment_method: self
                .random_choice(&["digital_wallet", "bank_transfer", "credit_card"])
                .to_string(),
            customer_email: format!(
                "user{}@{}",
                { self.transaction_counter },
                self.random_choice(&["tempmail.org", "10minutemail.com", "guerrillamail.com", "gmail.com"])
            ),
            ip_address: Some(self.random_ip()),
            device_id: None,
            description: None,
            timestamp: Some(timestamp.to_rfc3339()),
        }
    }

    fn random_ip(&mut self) -> String {
        format!(
            "{}.{}.{}.{}",
            self.rng.gen_range(1..255),
            self.rng.gen_range(0..255),
            self.rng.gen_range(0..255),
            self.rng.gen_range(1..255)
        )
    }

    fn random_choice<'a>(&mut self, choices: &[&'a str]) -> &'a str {
        choices[self.rng.gen_range(0..choices.len())]
    }
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout stays a clean request body
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("batch_generator=info".parse()?),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();
    let count: usize = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(20);
    let fraud_rate: f64 = args
        .get(2)
        .and_then(|s| s.parse().ok())
        .unwrap_or(0.2_f64)
        .clamp(0.0, 1.0);
    let seed: Option<u64> = args.get(3).and_then(|s| s.parse().ok());

    info!(count = count, fraud_rate = fraud_rate, seed = ?seed, "Configuration loaded");

    let config = AppConfig::load()?;
    let engine = ScoringEngine::new(&config);
    let mut generator = TransactionGenerator::new(seed);

    let mut suspicious_count = 0;
    let transactions: Vec<TransactionInput> = (0..count)
        .map(|_| {
            if generator.rng.gen_bool(fraud_rate) {
                suspicious_count += 1;
                generator.generate_suspicious()
            } else {
                generator.generate_legitimate()
            }
        })
        .collect();

    let request = PredictRequest { transactions };
    println!("{}", serde_json::to_string_pretty(&request)?);

    let validated = validate_batch(request, config.detection.max_batch_size)
        .context("Generated batch failed validation")?;
    let result = engine.score_batch(&validated);

    info!(
        generated = count,
        legitimate = count - suspicious_count,
        suspicious = suspicious_count,
        "Batch generated"
    );
    info!(
        total_processed = result.total_processed,
        average_risk_score = result.average_risk_score,
        high_risk_count = result.high_risk_count,
        "Local scoring complete"
    );

    Ok(())
}
