//! Transaction data structures for fraud risk scoring

use serde::{de, Deserialize, Deserializer, Serialize};
use std::fmt;

/// Currencies accepted by the validation boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Usd,
    Eur,
    Gbp,
    Ngn,
    Cad,
    Aud,
    Jpy,
}

impl Currency {
    pub const ALL: [Currency; 7] = [
        Currency::Usd,
        Currency::Eur,
        Currency::Gbp,
        Currency::Ngn,
        Currency::Cad,
        Currency::Aud,
        Currency::Jpy,
    ];

    /// ISO 4217 code
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Gbp => "GBP",
            Currency::Ngn => "NGN",
            Currency::Cad => "CAD",
            Currency::Aud => "AUD",
            Currency::Jpy => "JPY",
        }
    }

    /// Look up an already normalized (upper-case) code
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.code() == code)
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Payment methods accepted by the validation boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    CreditCard,
    DebitCard,
    BankTransfer,
    DigitalWallet,
    Cash,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 5] = [
        PaymentMethod::CreditCard,
        PaymentMethod::DebitCard,
        PaymentMethod::BankTransfer,
        PaymentMethod::DigitalWallet,
        PaymentMethod::Cash,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::CreditCard => "credit_card",
            PaymentMethod::DebitCard => "debit_card",
            PaymentMethod::BankTransfer => "bank_transfer",
            PaymentMethod::DigitalWallet => "digital_wallet",
            PaymentMethod::Cash => "cash",
        }
    }

    /// Look up an already normalized (lower-case) method name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.as_str() == name)
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Transaction as it arrives on the wire, before validation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionInput {
    /// Transaction amount (must be positive); numeric strings are accepted
    #[serde(deserialize_with = "number_or_numeric_string")]
    pub amount: f64,
    /// Currency code (e.g. USD, EUR)
    pub currency: String,
    /// Merchant identifier
    pub merchant_id: String,
    /// Payment method used
    pub payment_method: String,
    /// Customer email address
    pub customer_email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// ISO-8601 timestamp, parsed lazily by the time assessor
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

fn number_or_numeric_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Amount {
        Number(f64),
        Text(String),
    }

    match Amount::deserialize(deserializer)? {
        Amount::Number(value) => Ok(value),
        Amount::Text(text) => text
            .trim()
            .parse()
            .map_err(|_| de::Error::custom(format!("amount is not a number: {:?}", text))),
    }
}

/// Body of a prediction request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictRequest {
    pub transactions: Vec<TransactionInput>,
}

/// A validated, normalized transaction ready for scoring.
///
/// Only the validation boundary builds these from wire input, so the engine
/// can rely on every required field being well formed.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub amount: f64,
    pub currency: Currency,
    pub merchant_id: String,
    pub payment_method: PaymentMethod,
    /// Lower-cased customer email
    pub customer_email: String,
    pub ip_address: Option<String>,
    pub device_id: Option<String>,
    pub description: Option<String>,
    pub timestamp: Option<String>,
}

impl Transaction {
    /// Create a transaction with required fields only
    pub fn new(
        amount: f64,
        currency: Currency,
        merchant_id: impl Into<String>,
        payment_method: PaymentMethod,
        customer_email: impl Into<String>,
    ) -> Self {
        Self {
            amount,
            currency,
            merchant_id: merchant_id.into(),
            payment_method,
            customer_email: customer_email.into(),
            ip_address: None,
            device_id: None,
            description: None,
            timestamp: None,
        }
    }

    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_uses_camel_case() {
        let json = r#"{
            "amount": 1250.0,
            "currency": "usd",
            "merchantId": "AMAZON_001",
            "paymentMethod": "Credit_Card",
            "customerEmail": "Alice@Gmail.com",
            "timestamp": "2024-01-15T14:30:00Z"
        }"#;

        let input: TransactionInput = serde_json::from_str(json).unwrap();
        assert_eq!(input.merchant_id, "AMAZON_001");
        assert_eq!(input.payment_method, "Credit_Card");
        assert!(input.ip_address.is_none());
        assert_eq!(input.timestamp.as_deref(), Some("2024-01-15T14:30:00Z"));
    }

    #[test]
    fn test_amount_accepts_numeric_strings() {
        let json = r#"{
            "amount": "1250.00",
            "currency": "USD",
            "merchantId": "AMAZON_001",
            "paymentMethod": "credit_card",
            "customerEmail": "alice@gmail.com"
        }"#;
        let input: TransactionInput = serde_json::from_str(json).unwrap();
        assert_eq!(input.amount, 1250.0);
        assert!(input.timestamp.is_none());

        let bad = json.replace("\"1250.00\"", "\"lots\"");
        assert!(serde_json::from_str::<TransactionInput>(&bad).is_err());

        let bool_amount = json.replace("\"1250.00\"", "true");
        assert!(serde_json::from_str::<TransactionInput>(&bool_amount).is_err());
    }

    #[test]
    fn test_lookup_tables() {
        assert_eq!(Currency::from_code("NGN"), Some(Currency::Ngn));
        assert_eq!(Currency::from_code("ngn"), None);
        assert_eq!(
            PaymentMethod::from_name("digital_wallet"),
            Some(PaymentMethod::DigitalWallet)
        );
        assert_eq!(PaymentMethod::from_name("crypto"), None);
        assert_eq!(PaymentMethod::BankTransfer.to_string(), "bank_transfer");
    }
}
