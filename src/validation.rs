//! Validation boundary between wire input and the scoring engine.
//!
//! Every transaction is checked and normalized here. The engine only ever
//! sees `Transaction` values produced by this module, and a batch with a
//! single bad transaction is rejected as a whole.

use crate::error::ValidationError;
use crate::types::transaction::{Currency, PaymentMethod, PredictRequest, Transaction, TransactionInput};
use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("valid email regex")
});

fn supported_currencies() -> String {
    Currency::ALL.map(|c| c.code()).join(", ")
}

fn supported_payment_methods() -> String {
    PaymentMethod::ALL.map(|m| m.as_str()).join(", ")
}

/// Validate a whole request, returning transactions in input order
pub fn validate_batch(
    request: PredictRequest,
    max_batch_size: usize,
) -> Result<Vec<Transaction>, ValidationError> {
    let size = request.transactions.len();
    if size == 0 {
        return Err(ValidationError::EmptyBatch);
    }
    if size > max_batch_size {
        return Err(ValidationError::BatchTooLarge {
            size,
            max: max_batch_size,
        });
    }

    request
        .transactions
        .into_iter()
        .enumerate()
        .map(|(index, input)| validate_transaction(index, input))
        .collect()
}

/// Validate and normalize one transaction
pub fn validate_transaction(
    index: usize,
    input: TransactionInput,
) -> Result<Transaction, ValidationError> {
    if !input.amount.is_finite() || input.amount <= 0.0 {
        return Err(ValidationError::InvalidAmount { index });
    }

    let currency = Currency::from_code(&input.currency.to_uppercase()).ok_or_else(|| {
        ValidationError::UnsupportedCurrency {
            index,
            supported: supported_currencies(),
        }
    })?;

    if input.merchant_id.is_empty() {
        return Err(ValidationError::EmptyMerchantId { index });
    }

    let payment_method = PaymentMethod::from_name(&input.payment_method.to_lowercase())
        .ok_or_else(|| ValidationError::UnsupportedPaymentMethod {
            index,
            supported: supported_payment_methods(),
        })?;

    if !EMAIL_PATTERN.is_match(&input.customer_email) {
        return Err(ValidationError::InvalidEmail { index });
    }

    Ok(Transaction {
        amount: input.amount,
        currency,
        merchant_id: input.merchant_id,
        payment_method,
        customer_email: input.customer_email.to_lowercase(),
        ip_address: input.ip_address,
        device_id: input.device_id,
        description: input.description,
        timestamp: input.timestamp,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> TransactionInput {
        TransactionInput {
            amount: 1250.0,
            currency: "usd".to_string(),
            merchant_id: "AMAZON_001".to_string(),
            payment_method: "Credit_Card".to_string(),
            customer_email: "Alice.Johnson@Gmail.com".to_string(),
            ip_address: Some("192.168.1.1".to_string()),
            device_id: None,
            description: None,
            timestamp: Some("2024-01-15T14:30:00Z".to_string()),
        }
    }

    fn batch(count: usize) -> PredictRequest {
        PredictRequest {
            transactions: (0..count).map(|_| input()).collect(),
        }
    }

    #[test]
    fn test_normalizes_fields() {
        let tx = validate_transaction(0, input()).unwrap();

        assert_eq!(tx.currency, Currency::Usd);
        assert_eq!(tx.payment_method, PaymentMethod::CreditCard);
        assert_eq!(tx.customer_email, "alice.johnson@gmail.com");
        assert_eq!(tx.ip_address.as_deref(), Some("192.168.1.1"));
    }

    #[test]
    fn test_batch_size_limits() {
        assert_eq!(validate_batch(batch(0), 100), Err(ValidationError::EmptyBatch));
        assert_eq!(
            validate_batch(batch(101), 100),
            Err(ValidationError::BatchTooLarge { size: 101, max: 100 })
        );
        assert_eq!(validate_batch(batch(1), 100).unwrap().len(), 1);
        assert_eq!(validate_batch(batch(100), 100).unwrap().len(), 100);
    }

    #[test]
    fn test_rejects_bad_amounts() {
        for amount in [0.0, -5.0, f64::NAN, f64::INFINITY] {
            let mut tx = input();
            tx.amount = amount;
            assert_eq!(
                validate_transaction(2, tx),
                Err(ValidationError::InvalidAmount { index: 2 })
            );
        }
    }

    #[test]
    fn test_rejects_unsupported_codes() {
        let mut tx = input();
        tx.currency = "BTC".to_string();
        let err = validate_transaction(0, tx).unwrap_err();
        assert!(err.to_string().contains("USD, EUR, GBP, NGN, CAD, AUD, JPY"));

        let mut tx = input();
        tx.payment_method = "crypto".to_string();
        assert!(matches!(
            validate_transaction(0, tx),
            Err(ValidationError::UnsupportedPaymentMethod { index: 0, .. })
        ));
    }

    #[test]
    fn test_rejects_empty_merchant() {
        let mut tx = input();
        tx.merchant_id = String::new();
        assert_eq!(
            validate_transaction(1, tx),
            Err(ValidationError::EmptyMerchantId { index: 1 })
        );
    }

    #[test]
    fn test_rejects_malformed_emails() {
        for email in ["", "@gmail.com", "no-at-sign.com", "a@b", "a@b.c", "a b@gmail.com"] {
            let mut tx = input();
            tx.customer_email = email.to_string();
            assert_eq!(
                validate_transaction(0, tx),
                Err(ValidationError::InvalidEmail { index: 0 }),
                "{}",
                email
            );
        }
    }

    #[test]
    fn test_first_bad_transaction_fails_batch() {
        let mut request = batch(3);
        request.transactions[1].customer_email = "broken".to_string();
        request.transactions[2].currency = "XXX".to_string();

        assert_eq!(
            validate_batch(request, 100),
            Err(ValidationError::InvalidEmail { index: 1 })
        );
    }
}
