//! Exact conversion between raw on-chain integers and human-scaled amounts.
//!
//! ERC20 amounts live on chain as fixed-point `uint256` values scaled by
//! `10^decimals`. A [`TokenAmount`] keeps the raw integer and the scale
//! together instead of converting to a float or a fixed-width decimal type,
//! so no value representable in 256 bits ever loses precision.

use alloy_primitives::{
    utils::{format_units, parse_units, UnitsError},
    U256,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A token amount: raw on-chain integer plus the token's decimal scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenAmount {
    raw: U256,
    decimals: u8,
}

impl TokenAmount {
    /// Zero amount at the given scale.
    pub const fn zero(decimals: u8) -> Self {
        Self {
            raw: U256::ZERO,
            decimals,
        }
    }

    /// Wrap a raw on-chain integer.
    pub const fn from_raw(raw: U256, decimals: u8) -> Self {
        Self { raw, decimals }
    }

    /// Parse a human-scaled decimal string, e.g. `"1.5"` with 18 decimals
    /// becomes `1_500_000_000_000_000_000` raw.
    pub fn parse(value: &str, decimals: u8) -> Result<Self, UnitsError> {
        let raw = parse_units(value, decimals)?.get_absolute();
        Ok(Self { raw, decimals })
    }

    /// The raw on-chain integer.
    pub const fn raw(&self) -> U256 {
        self.raw
    }

    /// The decimal scale this amount was read with.
    pub const fn decimals(&self) -> u8 {
        self.decimals
    }

    pub fn is_zero(&self) -> bool {
        self.raw.is_zero()
    }
}

impl fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match format_units(self.raw, self.decimals) {
            Ok(formatted) => f.write_str(&formatted),
            // Unrepresentable scale, fall back to the raw integer.
            Err(_) => write!(f, "{}e-{}", self.raw, self.decimals),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_scales_by_decimals() {
        let amount = TokenAmount::parse("1.5", 18).unwrap();
        assert_eq!(
            amount.raw(),
            U256::from(1_500_000_000_000_000_000u128)
        );
        assert_eq!(amount.decimals(), 18);
    }

    #[test]
    fn parse_integer_with_small_scale() {
        let amount = TokenAmount::parse("42", 6).unwrap();
        assert_eq!(amount.raw(), U256::from(42_000_000u64));
    }

    #[test]
    fn display_round_trips() {
        let amount = TokenAmount::from_raw(U256::from(2_500_000u64), 6);
        assert_eq!(amount.to_string(), "2.500000");
        let reparsed = TokenAmount::parse(&amount.to_string(), 6).unwrap();
        assert_eq!(reparsed, amount);
    }

    #[test]
    fn zero_is_zero() {
        assert!(TokenAmount::zero(18).is_zero());
        assert!(!TokenAmount::from_raw(U256::from(1u64), 18).is_zero());
    }

    #[test]
    fn max_raw_value_displays_without_loss() {
        let amount = TokenAmount::from_raw(U256::MAX, 18);
        let text = amount.to_string();
        // 2^256 - 1 has 78 digits; 18 of them end up behind the point.
        assert!(text.starts_with("115792089237316195423570985008687907853"));
        let reparsed = TokenAmount::parse(&text, 18).unwrap();
        assert_eq!(reparsed.raw(), U256::MAX);
    }

    #[test]
    fn invalid_input_is_rejected() {
        assert!(TokenAmount::parse("not a number", 18).is_err());
    }
}
