//! Lookup tables consulted by the risk assessors.
//!
//! Everything here is plain configuration data. The engine receives a
//! `RuleTables` at construction, so the tables can be tuned from
//! `config/config.toml` without touching the scoring code.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One amount tier: amounts strictly above `above` add `contribution`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmountTier {
    pub above: f64,
    pub contribution: f64,
    pub factor: String,
}

impl AmountTier {
    fn new(above: f64, contribution: f64, factor: &str) -> Self {
        Self {
            above,
            contribution,
            factor: factor.to_string(),
        }
    }
}

/// All tables used by the six assessors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleTables {
    /// Mutually exclusive tiers, matched highest threshold first
    pub amount_tiers: Vec<AmountTier>,
    /// Amounts strictly below this are treated as card testing
    pub small_amount_below: f64,
    /// Contribution per payment method name
    pub payment_methods: HashMap<String, f64>,
    /// Contribution for a method missing from `payment_methods`
    pub unknown_payment_method: f64,
    /// Matched as substrings of the email domain
    pub disposable_domains: Vec<String>,
    /// Matched exactly against the email domain
    pub free_email_providers: Vec<String>,
    pub high_risk_merchants: Vec<String>,
    pub medium_risk_merchants: Vec<String>,
    /// Substrings marking a merchant as new or unknown
    pub new_merchant_markers: Vec<String>,
    /// Hours before this (local to the timestamp) count as late night
    pub night_ends_at_hour: u32,
    pub high_risk_currencies: Vec<String>,
    pub medium_risk_currencies: Vec<String>,
}

impl RuleTables {
    /// Sort amount tiers descending and upper/lower-case the string tables
    /// so matching stays consistent with the normalized transaction fields.
    pub fn normalized(mut self) -> Self {
        self.amount_tiers
            .sort_by(|a, b| b.above.total_cmp(&a.above));

        for list in [
            &mut self.high_risk_merchants,
            &mut self.medium_risk_merchants,
            &mut self.new_merchant_markers,
            &mut self.high_risk_currencies,
            &mut self.medium_risk_currencies,
        ] {
            for entry in list.iter_mut() {
                *entry = entry.to_uppercase();
            }
        }

        for list in [&mut self.disposable_domains, &mut self.free_email_providers] {
            for entry in list.iter_mut() {
                *entry = entry.to_lowercase();
            }
        }

        self.payment_methods = self
            .payment_methods
            .into_iter()
            .map(|(name, risk)| (name.to_lowercase(), risk))
            .collect();

        self
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for RuleTables {
    fn default() -> Self {
        let mut payment_methods = HashMap::new();
        payment_methods.insert("digital_wallet".to_string(), 0.25);
        payment_methods.insert("credit_card".to_string(), 0.15);
        payment_methods.insert("debit_card".to_string(), 0.10);
        payment_methods.insert("bank_transfer".to_string(), 0.05);
        payment_methods.insert("cash".to_string(), 0.0);

        Self {
            amount_tiers: vec![
                AmountTier::new(50_000.0, 0.4, "Very high transaction amount"),
                AmountTier::new(10_000.0, 0.3, "High transaction amount"),
                AmountTier::new(5_000.0, 0.2, "Above average transaction amount"),
                AmountTier::new(1_000.0, 0.1, "Moderate transaction amount"),
            ],
            small_amount_below: 1.0,
            payment_methods,
            unknown_payment_method: 0.20,
            disposable_domains: strings(&[
                "tempmail.org",
                "10minutemail.com",
                "guerrillamail.com",
                "mailinator.com",
                "throwaway.email",
                "temp-mail.org",
            ]),
            free_email_providers: strings(&["gmail.com", "yahoo.com", "hotmail.com", "outlook.com"]),
            high_risk_merchants: strings(&["CRYPTO", "GAMBLING", "ADULT", "PHARMACY"]),
            medium_risk_merchants: strings(&["ELECTRONICS", "JEWELRY", "TRAVEL"]),
            new_merchant_markers: strings(&["NEW", "UNKNOWN"]),
            night_ends_at_hour: 6,
            high_risk_currencies: strings(&["NGN"]),
            medium_risk_currencies: strings(&["EUR", "GBP"]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tables() {
        let rules = RuleTables::default();
        assert_eq!(rules.amount_tiers.len(), 4);
        assert_eq!(rules.payment_methods.get("digital_wallet"), Some(&0.25));
        assert_eq!(rules.payment_methods.get("cash"), Some(&0.0));
        assert_eq!(rules.disposable_domains.len(), 6);
        assert_eq!(rules.high_risk_currencies, vec!["NGN".to_string()]);
    }

    #[test]
    fn test_normalized_sorts_tiers_and_cases() {
        let rules = RuleTables {
            amount_tiers: vec![
                AmountTier::new(100.0, 0.1, "low"),
                AmountTier::new(900.0, 0.3, "high"),
            ],
            high_risk_merchants: strings(&["casino"]),
            free_email_providers: strings(&["GMAIL.com"]),
            ..RuleTables::default()
        }
        .normalized();

        assert_eq!(rules.amount_tiers[0].above, 900.0);
        assert_eq!(rules.high_risk_merchants, vec!["CASINO".to_string()]);
        assert_eq!(rules.free_email_providers, vec!["gmail.com".to_string()]);
    }
}
