//! Input checks applied before any chain call.
//!
//! Pure functions over the current session snapshot so they can be tested
//! without a gateway.

use chinchilla::Address;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use thiserror::Error;

/// Largest amount a single transfer may move.
pub const TRANSFER_CEILING: Decimal = dec!(10);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("token info is not loaded yet")]
    InfoNotReady,

    #[error("destination address is required")]
    MissingDestination,

    #[error("invalid destination address: {0}")]
    InvalidDestination(String),

    #[error("amount must be greater than zero")]
    NonPositiveAmount,

    #[error("amount {amount} exceeds the per-transfer limit of {ceiling}")]
    AboveTransferCeiling { amount: Decimal, ceiling: Decimal },

    #[error("amount {amount} exceeds the total supply of {supply}")]
    ExceedsSupply { amount: Decimal, supply: Decimal },

    #[error("only the token owner can do this")]
    NotOwner,
}

fn positive(amount: Decimal) -> Result<Decimal, ValidationError> {
    if amount <= Decimal::ZERO {
        return Err(ValidationError::NonPositiveAmount);
    }
    Ok(amount)
}

/// Check a transfer request and parse its destination.
pub fn validate_transfer(destination: &str, amount: Decimal) -> Result<Address, ValidationError> {
    let destination = destination.trim();
    if destination.is_empty() {
        return Err(ValidationError::MissingDestination);
    }
    let amount = positive(amount)?;
    if amount > TRANSFER_CEILING {
        return Err(ValidationError::AboveTransferCeiling {
            amount,
            ceiling: TRANSFER_CEILING,
        });
    }
    destination
        .parse::<Address>()
        .map_err(|_| ValidationError::InvalidDestination(destination.to_string()))
}

/// Check a burn request against the cached total supply.
pub fn validate_burn(amount: Decimal, total_supply: Decimal) -> Result<Decimal, ValidationError> {
    let amount = positive(amount)?;
    if amount > total_supply {
        return Err(ValidationError::ExceedsSupply {
            amount,
            supply: total_supply,
        });
    }
    Ok(amount)
}

/// Check a mint request.
pub fn validate_mint(amount: Decimal) -> Result<Decimal, ValidationError> {
    positive(amount)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEST: &str = "0x00000000000000000000000000000000000000aa";

    // ---- transfer ----

    #[test]
    fn test_transfer_accepts_amounts_up_to_ceiling() {
        for amount in [dec!(0.000001), dec!(0.5), dec!(1), dec!(9.99), dec!(10)] {
            assert!(
                validate_transfer(DEST, amount).is_ok(),
                "{amount} should pass"
            );
        }
    }

    #[test]
    fn test_transfer_rejects_zero_and_negative() {
        assert_eq!(
            validate_transfer(DEST, dec!(0)),
            Err(ValidationError::NonPositiveAmount)
        );
        assert_eq!(
            validate_transfer(DEST, dec!(-1)),
            Err(ValidationError::NonPositiveAmount)
        );
    }

    #[test]
    fn test_transfer_rejects_above_ceiling() {
        for amount in [dec!(10.000001), dec!(11), dec!(1000)] {
            assert!(matches!(
                validate_transfer(DEST, amount),
                Err(ValidationError::AboveTransferCeiling { .. })
            ));
        }
    }

    #[test]
    fn test_transfer_rejects_empty_destination() {
        assert_eq!(
            validate_transfer("", dec!(1)),
            Err(ValidationError::MissingDestination)
        );
        assert_eq!(
            validate_transfer("   ", dec!(1)),
            Err(ValidationError::MissingDestination)
        );
    }

    #[test]
    fn test_transfer_rejects_malformed_destination() {
        assert!(matches!(
            validate_transfer("0x1234", dec!(1)),
            Err(ValidationError::InvalidDestination(_))
        ));
    }

    #[test]
    fn test_transfer_returns_parsed_destination() {
        let to = validate_transfer(DEST, dec!(1)).unwrap();
        assert_eq!(to, DEST.parse::<Address>().unwrap());
    }

    // ---- burn ----

    #[test]
    fn test_burn_accepts_up_to_supply() {
        let supply = dec!(10);
        for amount in [dec!(0.1), dec!(5), dec!(10)] {
            assert_eq!(validate_burn(amount, supply), Ok(amount));
        }
    }

    #[test]
    fn test_burn_rejects_zero() {
        assert_eq!(
            validate_burn(dec!(0), dec!(10)),
            Err(ValidationError::NonPositiveAmount)
        );
    }

    #[test]
    fn test_burn_rejects_more_than_supply() {
        assert_eq!(
            validate_burn(dec!(11), dec!(10)),
            Err(ValidationError::ExceedsSupply {
                amount: dec!(11),
                supply: dec!(10),
            })
        );
    }

    // ---- mint ----

    #[test]
    fn test_mint_accepts_any_positive_amount() {
        for amount in [dec!(0.0001), dec!(1), dec!(1000000)] {
            assert_eq!(validate_mint(amount), Ok(amount));
        }
    }

    #[test]
    fn test_mint_rejects_zero() {
        assert_eq!(validate_mint(dec!(0)), Err(ValidationError::NonPositiveAmount));
    }
}
