//! Conversion between human token amounts and on-chain smallest units.
//!
//! The token uses the fixed 18-decimal convention. Both directions truncate
//! toward zero when precision has to be dropped:
//!
//! * [`parse_units`] discards digits past the 18th decimal place.
//! * [`format_units`] discards trailing fractional digits that do not fit the
//!   96-bit mantissa of a [`Decimal`].

use alloy_primitives::U256;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{ChinchillaError, Result};

/// Decimals of the token contract.
pub const TOKEN_DECIMALS: u32 = 18;

/// Largest mantissa a `Decimal` can hold (2^96 - 1).
const MAX_DECIMAL_MANTISSA: u128 = (1u128 << 96) - 1;

/// Convert a human amount to smallest units (`amount * 10^18`).
///
/// # Errors
///
/// Returns `ChinchillaError::Validation` for negative amounts.
pub fn parse_units(amount: Decimal) -> Result<U256> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(ChinchillaError::Validation(format!(
            "negative amount: {amount}"
        )));
    }

    let truncated = amount.round_dp_with_strategy(TOKEN_DECIMALS, RoundingStrategy::ToZero);
    // Non-negative, so the mantissa fits in u128.
    let mantissa = truncated.mantissa().unsigned_abs();
    let exponent = TOKEN_DECIMALS - truncated.scale();

    Ok(U256::from(mantissa) * U256::from(10u8).pow(U256::from(exponent)))
}

/// Convert smallest units to a human amount (`raw / 10^18`).
///
/// # Errors
///
/// Returns `ChinchillaError::Overflow` if the whole-token part alone exceeds
/// what a `Decimal` can represent.
pub fn format_units(raw: U256) -> Result<Decimal> {
    let ten = U256::from(10u8);
    let max = U256::from(MAX_DECIMAL_MANTISSA);

    let mut mantissa = raw;
    let mut scale = TOKEN_DECIMALS;
    while mantissa > max && scale > 0 {
        mantissa /= ten;
        scale -= 1;
    }

    let mantissa = u128::try_from(mantissa)
        .ok()
        .filter(|m| *m <= MAX_DECIMAL_MANTISSA)
        .ok_or_else(|| ChinchillaError::Overflow(format!("format_units: {raw}")))?;

    Ok(Decimal::from_i128_with_scale(mantissa as i128, scale).normalize())
}
