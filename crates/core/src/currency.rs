//! Configured currency codes.
//!
//! Every money-bearing field (company default currency, price break currency)
//! must hold one of the codes in the active [`CurrencyTable`].

use serde::Serialize;

use crate::validate::ValidationError;

/// Codes used when no configuration is supplied.
pub const DEFAULT_CURRENCY_CODES: &[&str] = &["AUD", "CAD", "CNY", "EUR", "GBP", "JPY", "NZD", "USD"];

/// Default currency when no configuration is supplied.
pub const DEFAULT_CURRENCY: &str = "USD";

const CURRENCY_NAMES: &[(&str, &str)] = &[
    ("AUD", "Australian Dollar"),
    ("BRL", "Brazilian Real"),
    ("CAD", "Canadian Dollar"),
    ("CHF", "Swiss Franc"),
    ("CNY", "Chinese Yuan"),
    ("CZK", "Czech Koruna"),
    ("DKK", "Danish Krone"),
    ("EUR", "Euro"),
    ("GBP", "British Pound"),
    ("HKD", "Hong Kong Dollar"),
    ("INR", "Indian Rupee"),
    ("JPY", "Japanese Yen"),
    ("KRW", "South Korean Won"),
    ("MXN", "Mexican Peso"),
    ("NOK", "Norwegian Krone"),
    ("NZD", "New Zealand Dollar"),
    ("PLN", "Polish Zloty"),
    ("SEK", "Swedish Krona"),
    ("SGD", "Singapore Dollar"),
    ("TWD", "New Taiwan Dollar"),
    ("USD", "US Dollar"),
    ("ZAR", "South African Rand"),
];

/// A `(code, label)` pair as exposed to clients.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CurrencyChoice {
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum CurrencyConfigError {
    #[error("currency list is empty")]
    Empty,
    #[error("invalid currency code: {0}")]
    InvalidCode(String),
    #[error("default currency {0} is not in the configured list")]
    DefaultNotListed(String),
}

/// The set of valid currency codes plus the default code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyTable {
    codes: Vec<String>,
    default: String,
}

impl Default for CurrencyTable {
    fn default() -> Self {
        Self {
            codes: DEFAULT_CURRENCY_CODES.iter().map(|c| c.to_string()).collect(),
            default: DEFAULT_CURRENCY.to_string(),
        }
    }
}

impl CurrencyTable {
    /// Build a table from configured codes. Codes are trimmed, upper-cased and
    /// de-duplicated; each must be three ASCII letters.
    pub fn new<I, S>(codes: I, default: &str) -> Result<Self, CurrencyConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut list: Vec<String> = Vec::new();
        for code in codes {
            let code = code.as_ref().trim().to_ascii_uppercase();
            if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
                return Err(CurrencyConfigError::InvalidCode(code));
            }
            if !list.contains(&code) {
                list.push(code);
            }
        }
        if list.is_empty() {
            return Err(CurrencyConfigError::Empty);
        }
        let default = default.trim().to_ascii_uppercase();
        if !list.contains(&default) {
            return Err(CurrencyConfigError::DefaultNotListed(default));
        }
        Ok(Self {
            codes: list,
            default,
        })
    }

    pub fn codes(&self) -> &[String] {
        &self.codes
    }

    pub fn default_code(&self) -> &str {
        &self.default
    }

    pub fn contains(&self, code: &str) -> bool {
        self.codes.iter().any(|c| c == code)
    }

    /// Check `code` against the table. Matching is exact, as for any choice field.
    pub fn validate(&self, field: &str, code: &str) -> Result<String, ValidationError> {
        if self.contains(code) {
            Ok(code.to_string())
        } else {
            Err(ValidationError::InvalidChoice {
                field: field.to_string(),
                value: code.to_string(),
            })
        }
    }

    /// `(code, name)` pairs in configured order.
    pub fn mappings(&self) -> Vec<CurrencyChoice> {
        self.codes
            .iter()
            .map(|code| CurrencyChoice {
                code: code.clone(),
                name: currency_name(code).unwrap_or(code).to_string(),
            })
            .collect()
    }
}

/// English display name for a known ISO 4217 code.
pub fn currency_name(code: &str) -> Option<&'static str> {
    CURRENCY_NAMES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
}
