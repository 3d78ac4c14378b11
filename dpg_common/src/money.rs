use std::fmt::Display;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const IDR_CURRENCY_CODE: &str = "IDR";

//--------------------------------------        Money        ---------------------------------------------------------
/// An amount of money as DANA expects it on the wire: a decimal string and an ISO currency code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    pub value: String,
    pub currency: String,
}

impl Money {
    pub fn new<V: Into<String>, C: Into<String>>(value: V, currency: C) -> Self {
        Self { value: value.into(), currency: currency.into() }
    }

    pub fn idr<V: Into<String>>(value: V) -> Self {
        Self::new(value, IDR_CURRENCY_CODE)
    }

    /// Returns a copy of this amount in the fixed-point format DANA requires for its currency.
    ///
    /// Only IDR is normalised to two decimal places. Amounts in any other currency are returned unchanged.
    pub fn formatted(&self) -> Self {
        if self.currency == IDR_CURRENCY_CODE {
            Self { value: format_amount_value(&self.value), currency: self.currency.clone() }
        } else {
            self.clone()
        }
    }
}

impl Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.value, self.currency)
    }
}

/// Normalises a decimal string to exactly two decimal places.
///
/// Fractions with more than two digits are truncated, never rounded. `"100000"` becomes `"100000.00"`, `"100000.5"`
/// becomes `"100000.50"` and `"100000.567"` becomes `"100000.56"`. Applying the function twice gives the same result
/// as applying it once.
pub fn format_amount_value(value: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        return String::new();
    }
    let mut parts = value.split('.');
    let whole = parts.next().unwrap_or_default();
    match parts.next() {
        Some(fraction) => {
            let mut fraction = fraction.chars().take(2).collect::<String>();
            while fraction.chars().count() < 2 {
                fraction.push('0');
            }
            format!("{whole}.{fraction}")
        },
        None => format!("{whole}.00"),
    }
}

#[derive(Debug, Clone, Error)]
#[error("Value cannot be interpreted as a currency amount: {0}")]
pub struct MoneyParseError(String);

/// Parses a decimal amount string into hundredths of the currency unit. Digits beyond the second decimal place are
/// ignored, consistent with [`format_amount_value`].
pub fn parse_minor_units(value: &str) -> Result<i64, MoneyParseError> {
    let formatted = format_amount_value(value);
    let (whole, fraction) =
        formatted.split_once('.').ok_or_else(|| MoneyParseError(format!("'{value}' is empty")))?;
    let whole = if whole.is_empty() { 0 } else { parse_digits(whole, value)? };
    let fraction = parse_digits(fraction, value)?;
    whole
        .checked_mul(100)
        .and_then(|w| w.checked_add(fraction))
        .ok_or_else(|| MoneyParseError(format!("'{value}' is too large")))
}

fn parse_digits(digits: &str, original: &str) -> Result<i64, MoneyParseError> {
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(MoneyParseError(format!("'{original}' contains non-numeric characters")));
    }
    digits.parse::<i64>().map_err(|e| MoneyParseError(format!("'{original}'. {e}")))
}
