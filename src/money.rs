//! Money Conversion Module
//!
//! Unified conversion between the internal `i64` minor-unit representation
//! and client-facing string/Decimal representation. All conversions MUST go
//! through this module.
//!
//! ## Internal Representation
//! - Balances and amounts are stored as `i64` minor units (cents)
//! - The scale factor is `10^decimals`, taken from [`Currency::decimals`]
//! - Transfer amounts are strictly positive; balances may carry a sign
//!
//! ## Rules
//! 1. Explicit Error Handling: no silent truncation
//! 2. Strict format: `".5"`, `"5."`, signs, and exponents are rejected

use crate::currency::Currency;
use rust_decimal::prelude::*;
use thiserror::Error;

/// Money conversion errors
#[derive(Debug, Error)]
pub enum MoneyError {
    #[error("Precision overflow: provided {provided} decimals, max allowed {max}")]
    PrecisionOverflow { provided: u32, max: u32 },

    #[error("Amount must be positive")]
    InvalidAmount,

    #[error("Amount too large, would overflow")]
    Overflow,

    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

/// Convert a client amount string to minor units
///
/// # Errors
/// * `PrecisionOverflow` - more decimal places than the currency carries
/// * `InvalidAmount` - zero or signed input
/// * `Overflow` - result would overflow i64
/// * `InvalidFormat` - malformed string
pub fn parse_amount(amount_str: &str, currency: Currency) -> Result<i64, MoneyError> {
    let amount_str = amount_str.trim();
    if amount_str.is_empty() {
        return Err(MoneyError::InvalidFormat("empty string".into()));
    }

    // Transfer amounts are magnitudes; signs are rejected outright
    if amount_str.starts_with('-') || amount_str.starts_with('+') {
        return Err(MoneyError::InvalidAmount);
    }

    let decimals = currency.decimals();
    let parts: Vec<&str> = amount_str.split('.').collect();
    let (whole, frac) = match parts.len() {
        1 => (parts[0], ""),
        2 => {
            // Strict check: require both sides of the dot to be non-empty
            // This prevents ambiguous formats like ".5" or "5."
            if parts[0].is_empty() {
                return Err(MoneyError::InvalidFormat(
                    "missing leading zero (e.g., use 0.5 instead of .5)".into(),
                ));
            }
            if parts[1].is_empty() {
                return Err(MoneyError::InvalidFormat(
                    "missing fractional part (e.g., use 5.0 instead of 5.)".into(),
                ));
            }
            (parts[0], parts[1])
        }
        _ => return Err(MoneyError::InvalidFormat("multiple decimal points".into())),
    };

    // Precision validation: REJECT if too many decimals (no silent truncation!)
    if frac.len() > decimals as usize {
        return Err(MoneyError::PrecisionOverflow {
            provided: frac.len() as u32,
            max: decimals,
        });
    }

    let whole_num: i64 = whole.parse::<i64>().map_err(|e| {
        let err_str = e.to_string();
        if err_str.contains("too large") || err_str.contains("overflow") {
            MoneyError::Overflow
        } else {
            MoneyError::InvalidFormat(format!("invalid character in whole part: {}", whole))
        }
    })?;

    let frac_num: i64 = if frac.is_empty() {
        0
    } else {
        // Pad fractional part to the currency's decimals
        let frac_padded = format!("{:0<width$}", frac, width = decimals as usize);
        frac_padded[..decimals as usize]
            .parse::<i64>()
            .map_err(|_| MoneyError::InvalidFormat("invalid fractional part".into()))?
    };

    let multiplier = 10i64.pow(decimals);
    let amount = whole_num
        .checked_mul(multiplier)
        .and_then(|v: i64| v.checked_add(frac_num))
        .ok_or(MoneyError::Overflow)?;

    if amount == 0 {
        return Err(MoneyError::InvalidAmount);
    }

    Ok(amount)
}

/// Convert a Decimal to minor units
///
/// Used where the transport layer deserializes JSON amounts into
/// `rust_decimal::Decimal` before handing them to the ledger.
pub fn parse_decimal(decimal: Decimal, currency: Currency) -> Result<i64, MoneyError> {
    if decimal.is_sign_negative() || decimal.is_zero() {
        return Err(MoneyError::InvalidAmount);
    }

    let decimals = currency.decimals();
    if decimal.scale() > decimals {
        return Err(MoneyError::PrecisionOverflow {
            provided: decimal.scale(),
            max: decimals,
        });
    }

    let multiplier = Decimal::from(10i64.pow(decimals));
    let result = decimal * multiplier;

    // Should not have fractional part after scaling
    if !result.fract().is_zero() {
        return Err(MoneyError::PrecisionOverflow {
            provided: decimal.scale(),
            max: decimals,
        });
    }

    result.to_i64().ok_or(MoneyError::Overflow)
}

/// Convert minor units to a display string with full currency precision
///
/// Balances are signed, so negative values render with a leading minus.
pub fn format_amount(minor: i64, currency: Currency) -> String {
    let decimals = currency.decimals();
    let decimal_value = Decimal::from(minor) / Decimal::from(10i64.pow(decimals));
    format!("{:.prec$}", decimal_value, prec = decimals as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn qa_parse_amount_variations() {
        // Normal cases
        assert_eq!(parse_amount("1.23", Currency::Usd).unwrap(), 123);
        assert_eq!(parse_amount("30", Currency::Usd).unwrap(), 3000);

        // Leading/Trailing zeros
        assert_eq!(parse_amount("001.23", Currency::Eur).unwrap(), 123);
        assert_eq!(parse_amount("0.01", Currency::Cad).unwrap(), 1);

        // Zero representations (rejected, transfer amounts are positive non-zero)
        assert!(parse_amount("0", Currency::Usd).is_err());
        assert!(parse_amount("0.00", Currency::Usd).is_err());
    }

    #[test]
    fn qa_parse_amount_invalid_formats() {
        let cases = vec![
            "1,000.00", // Commas not allowed
            "1.2.3",    // Multiple dots
            "1. 23",    // Spaces inside
            "+1.23",    // Explicit plus rejected
            "-1.23",    // Negative rejected
            "1e2",      // Scientific notation rejected
            "0x12",     // Hex rejected
            ".",        // Just a dot rejected
            ".5",       // Missing leading zero rejected (STRICT)
            "5.",       // Missing fractional part rejected (STRICT)
        ];

        for case in cases {
            assert!(
                parse_amount(case, Currency::Usd).is_err(),
                "Should reject invalid format: {}",
                case
            );
        }
    }

    #[test]
    fn qa_parse_amount_precision_limits() {
        // Exact limit
        assert_eq!(parse_amount("1.23", Currency::Usd).unwrap(), 123);

        // Overflow 1 unit
        let res = parse_amount("1.234", Currency::Usd);
        assert!(matches!(
            res,
            Err(MoneyError::PrecisionOverflow {
                provided: 3,
                max: 2
            })
        ));
    }

    #[test]
    fn qa_parse_amount_i64_boundary() {
        // Max i64 is 9,223,372,036,854,775,807; at 2 decimals: 92,233,720,368,547,758.07
        let max_cents = "92233720368547758.07";
        assert_eq!(parse_amount(max_cents, Currency::Usd).unwrap(), i64::MAX);

        // Overflow
        let too_big = "92233720368547758.08";
        assert!(matches!(
            parse_amount(too_big, Currency::Usd),
            Err(MoneyError::Overflow)
        ));

        let way_too_big = "999999999999999999999";
        assert!(matches!(
            parse_amount(way_too_big, Currency::Usd),
            Err(MoneyError::Overflow)
        ));
    }

    #[test]
    fn qa_parse_decimal_edge_cases() {
        // Decimal with high scale, even with trailing zeros
        let d = Decimal::from_str("1.23000").unwrap(); // scale is 5
        assert!(parse_decimal(d, Currency::Usd).is_err());

        // Normal conversion
        let d = Decimal::from_str("1.23").unwrap();
        assert_eq!(parse_decimal(d, Currency::Usd).unwrap(), 123);

        // Negative and zero rejected
        assert!(parse_decimal(Decimal::from(-5), Currency::Usd).is_err());
        assert!(parse_decimal(Decimal::ZERO, Currency::Usd).is_err());
    }

    #[test]
    fn qa_format_amount_signed() {
        assert_eq!(format_amount(123, Currency::Usd), "1.23");
        assert_eq!(format_amount(-30, Currency::Usd), "-0.30");
        assert_eq!(format_amount(0, Currency::Eur), "0.00");
        assert_eq!(format_amount(i64::MAX, Currency::Usd), "92233720368547758.07");
    }

    #[test]
    fn qa_roundtrip_consistency() {
        let values = vec!["1", "1.5", "0.01", "1234.56", "999999.99"];
        for val_str in values {
            let minor = parse_amount(val_str, Currency::Usd).unwrap();
            let formatted = format_amount(minor, Currency::Usd);
            let minor_back = parse_amount(&formatted, Currency::Usd).unwrap();
            assert_eq!(minor, minor_back, "Roundtrip failed for {}", val_str);
        }
    }
}
