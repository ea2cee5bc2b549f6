//! Minor-unit conversion
//!
//! Stripe amounts are integers in the currency's smallest unit. Most currencies
//! have two decimal places; the tables below list the exceptions Stripe documents.
//! Three-decimal amounts must be a multiple of 10, so they are priced to the
//! cent and then scaled.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{IntentError, Result};

const ZERO_DECIMAL: &[&str] = &[
    "BIF", "CLP", "DJF", "GNF", "JPY", "KMF", "KRW", "MGA", "PYG", "RWF", "UGX", "VND", "VUV",
    "XAF", "XOF", "XPF",
];

const THREE_DECIMAL: &[&str] = &["BHD", "JOD", "KWD", "OMR", "TND"];

/// Number of decimal places in the currency's minor unit
pub fn minor_unit_exponent(currency: &str) -> u32 {
    let code = currency.trim().to_ascii_uppercase();

    if ZERO_DECIMAL.contains(&code.as_str()) {
        0
    } else if THREE_DECIMAL.contains(&code.as_str()) {
        3
    } else {
        2
    }
}

/// Convert a major-unit total into a Stripe amount, rounding half away from zero
pub fn to_minor_units(total: Decimal, currency: &str) -> Result<i64> {
    if total.is_sign_negative() && !total.is_zero() {
        return Err(IntentError::InvalidAmount(format!("negative total {total}")));
    }

    let exponent = minor_unit_exponent(currency);
    let overflow = || IntentError::InvalidAmount(format!("total {total} overflows"));

    // Price to the cent, then shift the last digit for three-decimal currencies
    let priced_exponent = exponent.min(2);
    let scaled = total
        .checked_mul(Decimal::from(10_i64.pow(priced_exponent)))
        .ok_or_else(overflow)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or_else(overflow)?;

    scaled
        .checked_mul(10_i64.pow(exponent - priced_exponent))
        .ok_or_else(overflow)
}
