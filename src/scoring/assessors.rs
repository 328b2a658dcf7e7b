//! The six independent risk assessors.
//!
//! Each assessor looks at one transaction attribute and returns a
//! non-negative contribution plus the factor labels explaining it.
//! Contributions are not bounded here; clamping happens after summation.

use crate::scoring::rules::RuleTables;
use crate::types::transaction::{Currency, PaymentMethod, Transaction};
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Timelike, Weekday};
use std::borrow::Cow;

const DISPOSABLE_DOMAIN_RISK: f64 = 0.4;
const FREE_PROVIDER_RISK: f64 = 0.1;
const SHORT_USERNAME_RISK: f64 = 0.15;
const MIN_USERNAME_LEN: usize = 3;
const NUMERIC_USERNAME_RISK: f64 = 0.1;
const MAX_USERNAME_DIGITS: usize = 5;

const HIGH_RISK_MERCHANT: f64 = 0.3;
const MEDIUM_RISK_MERCHANT: f64 = 0.15;
const NEW_MERCHANT_RISK: f64 = 0.2;

const SMALL_AMOUNT_RISK: f64 = 0.2;

const LATE_NIGHT_RISK: f64 = 0.15;
const WEEKEND_RISK: f64 = 0.05;
const INVALID_TIMESTAMP_RISK: f64 = 0.05;

const HIGH_RISK_CURRENCY: f64 = 0.2;
const MEDIUM_RISK_CURRENCY: f64 = 0.1;

/// Contribution of a single assessor
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RiskAssessment {
    pub contribution: f64,
    pub factors: Vec<String>,
}

impl RiskAssessment {
    pub fn none() -> Self {
        Self::default()
    }

    fn add(&mut self, contribution: f64, factor: impl Into<String>) {
        self.contribution += contribution;
        self.factors.push(factor.into());
    }
}

/// Runs the assessors against the configured rule tables.
pub struct RiskAssessor {
    rules: RuleTables,
}

impl RiskAssessor {
    pub fn new(rules: RuleTables) -> Self {
        Self {
            rules: rules.normalized(),
        }
    }

    pub fn rules(&self) -> &RuleTables {
        &self.rules
    }

    /// Run every applicable assessor in factor order: amount, payment,
    /// email, merchant, time (only with a timestamp), currency.
    pub fn assess(&self, tx: &Transaction) -> Vec<RiskAssessment> {
        let mut assessments = Vec::with_capacity(6);

        assessments.push(self.amount(tx.amount));
        assessments.push(self.payment_method(tx.payment_method));
        assessments.push(self.email(&tx.customer_email));
        assessments.push(self.merchant(&tx.merchant_id));
        if let Some(timestamp) = tx.timestamp.as_deref().filter(|t| !t.is_empty()) {
            assessments.push(self.time(timestamp));
        }
        assessments.push(self.currency(tx.currency));

        assessments
    }

    pub fn amount(&self, amount: f64) -> RiskAssessment {
        let mut assessment = RiskAssessment::none();

        if let Some(tier) = self.rules.amount_tiers.iter().find(|t| amount > t.above) {
            assessment.add(tier.contribution, tier.factor.as_str());
        }

        // Tiny amounts are a common card-testing pattern
        if amount < self.rules.small_amount_below {
            assessment.add(SMALL_AMOUNT_RISK, "Unusually small transaction amount");
        }

        assessment
    }

    pub fn payment_method(&self, method: PaymentMethod) -> RiskAssessment {
        let name = method.as_str();
        let risk = self
            .rules
            .payment_methods
            .get(name)
            .copied()
            .unwrap_or(self.rules.unknown_payment_method);

        let mut assessment = RiskAssessment {
            contribution: risk,
            factors: Vec::new(),
        };

        if risk > 0.2 {
            assessment
                .factors
                .push(format!("High-risk payment method: {}", name));
        } else if risk > 0.1 {
            assessment
                .factors
                .push(format!("Medium-risk payment method: {}", name));
        }

        assessment
    }

    pub fn email(&self, email: &str) -> RiskAssessment {
        let mut assessment = RiskAssessment::none();

        let (local, domain) = match email.split_once('@') {
            Some((local, rest)) => (local, rest.split('@').next().unwrap_or("")),
            None => (email, ""),
        };
        let domain = domain.to_lowercase();

        if self
            .rules
            .disposable_domains
            .iter()
            .any(|d| domain.contains(d.as_str()))
        {
            assessment.add(DISPOSABLE_DOMAIN_RISK, "Suspicious email domain");
        }

        if self.rules.free_email_providers.iter().any(|p| *p == domain) {
            assessment.add(FREE_PROVIDER_RISK, "Free email provider");
        }

        if local.chars().count() < MIN_USERNAME_LEN {
            assessment.add(SHORT_USERNAME_RISK, "Very short email username");
        }

        if local.chars().filter(|c| c.is_ascii_digit()).count() > MAX_USERNAME_DIGITS {
            assessment.add(NUMERIC_USERNAME_RISK, "Email contains many numbers");
        }

        assessment
    }

    pub fn merchant(&self, merchant_id: &str) -> RiskAssessment {
        let mut assessment = RiskAssessment::none();
        let merchant = merchant_id.to_uppercase();
        let matches = |list: &[String]| list.iter().any(|c| merchant.contains(c.as_str()));

        if matches(&self.rules.high_risk_merchants) {
            assessment.add(HIGH_RISK_MERCHANT, "High-risk merchant category");
        } else if matches(&self.rules.medium_risk_merchants) {
            assessment.add(MEDIUM_RISK_MERCHANT, "Medium-risk merchant category");
        }

        if matches(&self.rules.new_merchant_markers) {
            assessment.add(NEW_MERCHANT_RISK, "New or unknown merchant");
        }

        assessment
    }

    /// Never fails: an unparseable timestamp becomes a small fixed penalty.
    pub fn time(&self, timestamp: &str) -> RiskAssessment {
        let mut assessment = RiskAssessment::none();

        let Some(dt) = parse_timestamp(timestamp) else {
            assessment.add(INVALID_TIMESTAMP_RISK, "Invalid timestamp format");
            return assessment;
        };

        if dt.hour() < self.rules.night_ends_at_hour {
            assessment.add(LATE_NIGHT_RISK, "Late night transaction");
        }

        if matches!(dt.weekday(), Weekday::Sat | Weekday::Sun) {
            assessment.add(WEEKEND_RISK, "Weekend transaction");
        }

        assessment
    }

    pub fn currency(&self, currency: Currency) -> RiskAssessment {
        let mut assessment = RiskAssessment::none();
        let code = currency.code();

        if self.rules.high_risk_currencies.iter().any(|c| c == code) {
            assessment.add(HIGH_RISK_CURRENCY, format!("High-risk currency: {}", code));
        } else if self.rules.medium_risk_currencies.iter().any(|c| c == code) {
            assessment.add(MEDIUM_RISK_CURRENCY, format!("Medium-risk currency: {}", code));
        }

        assessment
    }
}

/// Parse an ISO-8601 timestamp, keeping the wall-clock time as written.
///
/// Accepts a `T` or space separator, optional seconds and fraction, an
/// optional `Z` or numeric offset, hour-only times and bare dates (midnight).
fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }

    // A trailing `Z` is UTC
    let raw: Cow<str> = match raw.strip_suffix('Z') {
        Some(rest) => Cow::Owned(format!("{}+00:00", rest)),
        None => Cow::Borrowed(raw),
    };

    const OFFSET_FORMATS: [&str; 8] = [
        "%Y-%m-%dT%H:%M:%S%.f%:z",
        "%Y-%m-%d %H:%M:%S%.f%:z",
        "%Y-%m-%dT%H:%M%:z",
        "%Y-%m-%d %H:%M%:z",
        "%Y-%m-%dT%H:%M:%S%.f%z",
        "%Y-%m-%d %H:%M:%S%.f%z",
        "%Y-%m-%dT%H:%M%z",
        "%Y-%m-%d %H:%M%z",
    ];
    for format in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(&raw, format) {
            return Some(dt.naive_local());
        }
    }

    const NAIVE_FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ];
    for format in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(&raw, format) {
            return Some(dt);
        }
    }

    if let Some(dt) = parse_hour_only(&raw) {
        return Some(dt);
    }

    NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// `YYYY-MM-DDTHH` or `YYYY-MM-DD HH`; chrono needs minutes to build a time
fn parse_hour_only(raw: &str) -> Option<NaiveDateTime> {
    let (date, hour) = raw.split_once(|c: char| c == 'T' || c == ' ')?;
    if hour.len() != 2 || !hour.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let hour: u32 = hour.parse().ok()?;
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .ok()?
        .and_hms_opt(hour, 0, 0)
}
