use num_bigint::BigInt;
use num_traits::{One, Signed, ToPrimitive, Zero};
use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Largest mantissa a `Decimal` can carry (2^96 - 1)
static DECIMAL_MAX_MANTISSA: Lazy<BigInt> = Lazy::new(|| (BigInt::one() << 96u32) - 1);

/// Highest scale a `Decimal` supports
pub const MAX_DECIMAL_SCALE: u32 = 28;

/// How a quotient is cut to the requested number of decimals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Rounding {
    Truncate,
    #[default]
    HalfUp,
    Up,
}

pub fn pow10(exp: u32) -> BigInt {
    num_traits::pow(BigInt::from(10u8), exp as usize)
}

/// Exact integer value of `value * 10^scale`; `scale` must be at least `value.scale()`
pub fn decimal_to_scaled(value: Decimal, scale: u32) -> BigInt {
    let mantissa = BigInt::from(value.mantissa());
    mantissa * pow10(scale.saturating_sub(value.scale()))
}

/// `Decimal` holding `mantissa / 10^scale`, dropping trailing digits with
/// `rounding` until it fits
pub fn bigint_to_decimal(mantissa: &BigInt, scale: u32, rounding: Rounding) -> Option<Decimal> {
    ratio_to_decimal(mantissa, &pow10(scale), scale, rounding)
}

/// `numerator / denominator` as a `Decimal` with `decimals` places, or fewer
/// when the integer part leaves no room. Rounding applies once, at the
/// precision actually kept, and to the magnitude for negative ratios.
pub fn ratio_to_decimal(
    numerator: &BigInt,
    denominator: &BigInt,
    decimals: u32,
    rounding: Rounding,
) -> Option<Decimal> {
    if denominator.is_zero() {
        return None;
    }
    let mut decimals = decimals.min(MAX_DECIMAL_SCALE);
    loop {
        let quotient = round_div(&(numerator * pow10(decimals)), denominator, rounding);
        if quotient.abs() <= *DECIMAL_MAX_MANTISSA {
            return Decimal::try_from_i128_with_scale(quotient.to_i128()?, decimals).ok();
        }
        if decimals == 0 {
            return None;
        }
        decimals -= 1;
    }
}

fn round_div(numerator: &BigInt, denominator: &BigInt, rounding: Rounding) -> BigInt {
    let negative = numerator.is_negative() != denominator.is_negative();
    let numerator = numerator.abs();
    let denominator = denominator.abs();
    let mut quotient = &numerator / &denominator;
    let remainder = &numerator % &denominator;

    let round_up = match rounding {
        Rounding::Truncate => false,
        Rounding::HalfUp => &remainder * 2u8 >= denominator,
        Rounding::Up => !remainder.is_zero(),
    };
    if round_up {
        quotient += 1u8;
    }
    if negative { -quotient } else { quotient }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::str::FromStr;

    #[test]
    fn test_decimal_to_scaled() {
        assert_eq!(decimal_to_scaled(dec!(1.25), 4), BigInt::from(12500));
        assert_eq!(decimal_to_scaled(dec!(7), 0), BigInt::from(7));
    }

    #[test]
    fn test_ratio_rounding_modes() {
        let two = BigInt::from(2);
        let three = BigInt::from(3);
        assert_eq!(ratio_to_decimal(&two, &three, 2, Rounding::Truncate), Some(dec!(0.66)));
        assert_eq!(ratio_to_decimal(&two, &three, 2, Rounding::HalfUp), Some(dec!(0.67)));
        assert_eq!(ratio_to_decimal(&BigInt::from(1), &three, 2, Rounding::Up), Some(dec!(0.34)));
        assert_eq!(ratio_to_decimal(&BigInt::from(5), &BigInt::from(10), 0, Rounding::HalfUp), Some(dec!(1)));
    }

    #[test]
    fn test_ratio_zero_denominator() {
        assert_eq!(ratio_to_decimal(&BigInt::from(1), &BigInt::zero(), 7, Rounding::HalfUp), None);
    }

    #[test]
    fn test_bigint_to_decimal_drops_scale_to_fit() {
        // 2^96 at scale 1 does not fit, one digit less does
        let big = BigInt::one() << 96u32;
        let value = bigint_to_decimal(&big, 1, Rounding::Truncate).unwrap();
        assert_eq!(value.scale(), 0);
        assert!(bigint_to_decimal(&(big * 10), 0, Rounding::Truncate).is_none());
    }

    #[test]
    fn test_dropped_digits_follow_rounding() {
        // 30 significant digits at scale 1, one too many for a Decimal
        let mantissa = BigInt::from_str("123456789012345678901234567895").unwrap();
        assert_eq!(
            bigint_to_decimal(&mantissa, 1, Rounding::Truncate),
            Some(dec!(12345678901234567890123456789))
        );
        assert_eq!(
            bigint_to_decimal(&mantissa, 1, Rounding::HalfUp),
            Some(dec!(12345678901234567890123456790))
        );
        let mantissa = BigInt::from_str("123456789012345678901234567891").unwrap();
        assert_eq!(
            bigint_to_decimal(&mantissa, 1, Rounding::Up),
            Some(dec!(12345678901234567890123456790))
        );
        assert_eq!(
            bigint_to_decimal(&mantissa, 1, Rounding::HalfUp),
            Some(dec!(12345678901234567890123456789))
        );
    }

    #[test]
    fn test_no_double_rounding() {
        // 0.0449999... to 1 place is 0.0, not 0.05 -> 0.1
        let numerator = BigInt::from(449_999);
        let denominator = BigInt::from(10_000_000);
        assert_eq!(ratio_to_decimal(&numerator, &denominator, 1, Rounding::HalfUp), Some(dec!(0.0)));
    }

    #[test]
    fn test_negative_ratio_rounds_magnitude() {
        let minus_two = BigInt::from(-2);
        let three = BigInt::from(3);
        assert_eq!(ratio_to_decimal(&minus_two, &three, 2, Rounding::HalfUp), Some(dec!(-0.67)));
        assert_eq!(ratio_to_decimal(&minus_two, &three, 2, Rounding::Truncate), Some(dec!(-0.66)));
    }
}
