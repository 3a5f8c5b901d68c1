//! Resource Quantities
//!
//! Converts Kubernetes resource quantities ("10Gi", "500M", "1.5Ti", "2e9")
//! into integer byte counts. Fractional results round up, matching how the
//! API server reports `Quantity::Value()`.

use crate::error::{Error, Result};
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;

/// Multiplier denoted by a quantity suffix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scale {
    /// Power of two (Ki, Mi, ...)
    Binary(u32),
    /// Power of ten (m, k, M, ..., or an explicit exponent)
    Decimal(i32),
}

/// Parse a quantity reference into bytes
pub fn quantity_bytes(quantity: &Quantity) -> Result<u64> {
    parse_quantity(&quantity.0)
}

/// Parse a quantity string (e.g., "100Gi", "1T", "250m") to bytes
pub fn parse_quantity(s: &str) -> Result<u64> {
    let s = s.trim();
    if s.is_empty() {
        return Err(Error::QuantityParse("empty quantity string".into()));
    }

    let unsigned = match s.as_bytes()[0] {
        b'-' => {
            return Err(Error::QuantityParse(format!("negative quantity: {}", s)));
        }
        b'+' => &s[1..],
        _ => s,
    };

    // Find where the number ends and the suffix begins
    let num_end = unsigned
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit() && *c != '.')
        .map(|(i, _)| i)
        .unwrap_or(unsigned.len());

    let num_str = &unsigned[..num_end];
    let scale = parse_suffix(&unsigned[num_end..])?;

    let (int_part, frac_part) = match num_str.split_once('.') {
        Some((int_part, frac_part)) => (int_part, frac_part),
        None => (num_str, ""),
    };
    if int_part.is_empty() && frac_part.is_empty() {
        return Err(Error::QuantityParse(format!("invalid number: {}", s)));
    }
    if frac_part.contains('.') {
        return Err(Error::QuantityParse(format!("invalid number: {}", num_str)));
    }

    // Trailing fractional zeros do not change the value
    let frac_part = frac_part.trim_end_matches('0');
    let digits = format!("{}{}", int_part, frac_part);
    let digits = digits.trim_start_matches('0');
    if digits.is_empty() {
        return Ok(0);
    }
    if digits.len() > 36 {
        return Err(Error::QuantityParse(format!("quantity too large: {}", s)));
    }
    let mantissa: u128 = digits
        .parse()
        .map_err(|_| Error::QuantityParse(format!("invalid number: {}", num_str)))?;
    let too_large = || Error::QuantityParse(format!("quantity too large: {}", s));
    let out_of_range = || Error::QuantityParse(format!("exponent out of range: {}", s));

    let frac_len = i32::try_from(frac_part.len()).map_err(|_| out_of_range())?;

    let value = match scale {
        Scale::Binary(shift) => {
            let scaled = mantissa
                .checked_mul(1u128 << shift)
                .ok_or_else(too_large)?;
            div_ceil_pow10(scaled, frac_len)
        }
        Scale::Decimal(exp) => {
            let exp = exp.checked_sub(frac_len).ok_or_else(out_of_range)?;
            if exp >= 0 {
                let factor = pow10(exp).ok_or_else(too_large)?;
                mantissa.checked_mul(factor).ok_or_else(too_large)?
            } else {
                div_ceil_pow10(mantissa, exp.checked_neg().ok_or_else(out_of_range)?)
            }
        }
    };

    u64::try_from(value).map_err(|_| too_large())
}

/// Map a suffix to its scale
fn parse_suffix(suffix: &str) -> Result<Scale> {
    let scale = match suffix {
        "" => Scale::Decimal(0),
        "Ki" => Scale::Binary(10),
        "Mi" => Scale::Binary(20),
        "Gi" => Scale::Binary(30),
        "Ti" => Scale::Binary(40),
        "Pi" => Scale::Binary(50),
        "Ei" => Scale::Binary(60),
        "n" => Scale::Decimal(-9),
        "u" => Scale::Decimal(-6),
        "m" => Scale::Decimal(-3),
        "k" => Scale::Decimal(3),
        "M" => Scale::Decimal(6),
        "G" => Scale::Decimal(9),
        "T" => Scale::Decimal(12),
        "P" => Scale::Decimal(15),
        "E" => Scale::Decimal(18),
        _ if suffix.starts_with(['e', 'E']) => {
            let exp: i32 = suffix[1..]
                .parse()
                .map_err(|_| Error::QuantityParse(format!("invalid exponent: {}", suffix)))?;
            Scale::Decimal(exp)
        }
        _ => {
            return Err(Error::QuantityParse(format!("unknown suffix: {}", suffix)));
        }
    };
    Ok(scale)
}

fn pow10(exp: i32) -> Option<u128> {
    10u128.checked_pow(u32::try_from(exp).ok()?)
}

/// Divide by 10^exp, rounding any remainder up
fn div_ceil_pow10(value: u128, exp: i32) -> u128 {
    match pow10(exp) {
        Some(divisor) => value / divisor + u128::from(value % divisor != 0),
        // Divisor exceeds any representable value
        None => u128::from(value != 0),
    }
}
