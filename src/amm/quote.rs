use num_bigint::BigInt;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::types::{DEFAULT_DECIMALS, PairReserves, Result, SwapError};
use crate::utils::config::QuoteConfig;
use crate::utils::math::{Rounding, decimal_to_scaled, pow10, ratio_to_decimal};

/// Proportional fee kept by the pool, expressed as the share of the input that
/// is actually traded (`numerator / denominator`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FeeRate {
    pub numerator: u32,
    pub denominator: u32,
}

impl FeeRate {
    /// 0.3% pool fee
    pub const STANDARD: FeeRate = FeeRate { numerator: 997, denominator: 1000 };

    pub fn new(numerator: u32, denominator: u32) -> Self {
        Self { numerator, denominator }
    }

    pub fn is_valid(&self) -> bool {
        self.numerator > 0 && self.denominator > 0 && self.numerator <= self.denominator
    }

    /// Fee as a percentage (0.3 for the standard pool)
    pub fn percent(&self) -> Decimal {
        if self.denominator == 0 {
            return Decimal::ZERO;
        }
        let kept = Decimal::from(self.denominator - self.numerator.min(self.denominator));
        kept * Decimal::ONE_HUNDRED / Decimal::from(self.denominator)
    }
}

impl Default for FeeRate {
    fn default() -> Self {
        Self::STANDARD
    }
}

pub trait QuoteCalculator: Send + Sync {
    /// Expected output for an exact input
    fn quote(&self, amount_in: Decimal, reserve_in: Decimal, reserve_out: Decimal) -> Decimal;

    /// Input required for an exact output
    fn amount_in_for_output(
        &self,
        amount_out: Decimal,
        reserve_in: Decimal,
        reserve_out: Decimal,
    ) -> Result<Decimal>;

    /// Quote against a pair, selling `token_in`
    fn quote_pair(&self, amount_in: Decimal, token_in: &str, reserves: &PairReserves) -> Result<Decimal> {
        let (reserve_in, reserve_out) = reserves.oriented(token_in)?;
        Ok(self.quote(amount_in, reserve_in, reserve_out))
    }
}

/// Constant-product (`x * y = k`) pricing
pub struct ConstantProductCalculator {
    config: QuoteConfig,
}

impl ConstantProductCalculator {
    pub fn new(config: QuoteConfig) -> Self {
        Self { config }
    }
}

impl Default for ConstantProductCalculator {
    fn default() -> Self {
        Self::new(QuoteConfig::default())
    }
}

impl QuoteCalculator for ConstantProductCalculator {
    fn quote(&self, amount_in: Decimal, reserve_in: Decimal, reserve_out: Decimal) -> Decimal {
        quote_with(
            amount_in,
            reserve_in,
            reserve_out,
            self.config.fee,
            self.config.decimals,
            self.config.rounding,
        )
    }

    fn amount_in_for_output(
        &self,
        amount_out: Decimal,
        reserve_in: Decimal,
        reserve_out: Decimal,
    ) -> Result<Decimal> {
        amount_in_for_output_with(
            amount_out,
            reserve_in,
            reserve_out,
            self.config.fee,
            self.config.decimals,
        )
    }
}

/// Expected output at the default precision (7 decimals, half-up)
pub fn quote(amount_in: Decimal, reserve_in: Decimal, reserve_out: Decimal, fee: FeeRate) -> Decimal {
    quote_with(amount_in, reserve_in, reserve_out, fee, DEFAULT_DECIMALS, Rounding::HalfUp)
}

/// `amount_out = amount_in·γ·reserve_out / (reserve_in + amount_in·γ)`, computed
/// exactly and then cut to `decimals` places.
///
/// Zero input or an empty reserve quote zero. Negative inputs are a caller
/// bug and also quote zero.
pub fn quote_with(
    amount_in: Decimal,
    reserve_in: Decimal,
    reserve_out: Decimal,
    fee: FeeRate,
    decimals: u32,
    rounding: Rounding,
) -> Decimal {
    if amount_in.is_sign_negative() || reserve_in.is_sign_negative() || reserve_out.is_sign_negative() {
        warn!(%amount_in, %reserve_in, %reserve_out, "negative quote input");
        return Decimal::ZERO;
    }
    if amount_in.is_zero() || reserve_in.is_zero() || reserve_out.is_zero() || fee.denominator == 0 {
        return Decimal::ZERO;
    }

    let scale = amount_in.scale().max(reserve_in.scale()).max(reserve_out.scale());
    let amount_in_scaled = decimal_to_scaled(amount_in, scale);
    let reserve_in_scaled = decimal_to_scaled(reserve_in, scale);
    let reserve_out_scaled = decimal_to_scaled(reserve_out, scale);

    let amount_in_with_fee = amount_in_scaled * fee.numerator;
    let numerator = &amount_in_with_fee * reserve_out_scaled;
    let denominator = (reserve_in_scaled * fee.denominator + amount_in_with_fee)
        * pow10(scale);

    let amount_out = ratio_to_decimal(&numerator, &denominator, decimals, rounding)
        .unwrap_or(Decimal::ZERO);
    debug!(%amount_in, %reserve_in, %reserve_out, %amount_out, "quoted exact input");
    amount_out
}

/// Input needed to receive exactly `amount_out`, rounded up to `decimals`.
pub fn amount_in_for_output_with(
    amount_out: Decimal,
    reserve_in: Decimal,
    reserve_out: Decimal,
    fee: FeeRate,
    decimals: u32,
) -> Result<Decimal> {
    if amount_out.is_sign_negative() {
        return Err(SwapError::OutOfRange(format!("negative output amount {}", amount_out)));
    }
    if amount_out.is_zero() {
        return Ok(Decimal::ZERO);
    }
    if reserve_in <= Decimal::ZERO || reserve_out <= Decimal::ZERO {
        return Err(SwapError::InsufficientLiquidity("empty pool".into()));
    }
    if amount_out >= reserve_out {
        return Err(SwapError::InsufficientLiquidity(format!(
            "output {} exceeds reserve {}",
            amount_out, reserve_out
        )));
    }
    if fee.numerator == 0 {
        return Err(SwapError::Config("fee numerator must be positive".into()));
    }

    let scale = amount_out.scale().max(reserve_in.scale()).max(reserve_out.scale());
    let amount_out_scaled = decimal_to_scaled(amount_out, scale);
    let reserve_in_scaled = decimal_to_scaled(reserve_in, scale);
    let reserve_out_scaled = decimal_to_scaled(reserve_out, scale);

    let numerator: BigInt = reserve_in_scaled * &amount_out_scaled * fee.denominator;
    let denominator: BigInt = (reserve_out_scaled - amount_out_scaled)
        * fee.numerator
        * pow10(scale);

    let amount_in = ratio_to_decimal(&numerator, &denominator, decimals, Rounding::Up)
        .ok_or_else(|| SwapError::OutOfRange("required input does not fit a decimal".into()))?;
    debug!(%amount_out, %reserve_in, %reserve_out, %amount_in, "quoted exact output");
    Ok(amount_in)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn truncating(fee: FeeRate) -> ConstantProductCalculator {
        ConstantProductCalculator::new(QuoteConfig {
            fee,
            decimals: 7,
            rounding: Rounding::Truncate,
        })
    }

    #[test]
    fn test_quote_reference_value() {
        // 997_000_000_000 / 1_000_997_000 = 996.00698103990...
        let out = quote(dec!(1000), dec!(1000000), dec!(1000000), FeeRate::STANDARD);
        assert_eq!(out, dec!(996.0069810));
    }

    #[test]
    fn test_quote_zero_input() {
        assert_eq!(quote(Decimal::ZERO, dec!(5), dec!(7), FeeRate::STANDARD), Decimal::ZERO);
    }

    #[test]
    fn test_quote_empty_reserves() {
        assert_eq!(quote(dec!(10), Decimal::ZERO, dec!(7), FeeRate::STANDARD), Decimal::ZERO);
        assert_eq!(quote(dec!(10), dec!(7), Decimal::ZERO, FeeRate::STANDARD), Decimal::ZERO);
    }

    #[test]
    fn test_quote_negative_input_is_zero() {
        assert_eq!(quote(dec!(-1), dec!(5), dec!(7), FeeRate::STANDARD), Decimal::ZERO);
    }

    #[test]
    fn test_quote_fractional_inputs() {
        // 1.5 in against 10/20: 29910 / 11495.5 = 2.60188769...
        let out = quote(dec!(1.5), dec!(10), dec!(20), FeeRate::STANDARD);
        assert_eq!(out, dec!(2.6018877));
    }

    #[test]
    fn test_quote_huge_reserves_do_not_overflow() {
        let reserve = dec!(50000000000000000000000000000);
        let out = quote(dec!(1000000), reserve, reserve, FeeRate::STANDARD);
        assert!(out > dec!(996999) && out < dec!(997000));
    }

    #[test]
    fn test_quote_rounding_modes_differ() {
        let half_up = ConstantProductCalculator::default();
        let trunc = truncating(FeeRate::STANDARD);
        // 1 * 997 * 2 / (3000 + 997) = 0.498873...
        assert_eq!(half_up.quote(dec!(1), dec!(3), dec!(2)), dec!(0.4988742));
        assert_eq!(trunc.quote(dec!(1), dec!(3), dec!(2)), dec!(0.4988741));
    }

    #[test]
    fn test_quote_without_fee_matches_constant_product() {
        let calc = truncating(FeeRate::new(1000, 1000));
        // 100 * 100 / (100 + 100) = 50
        assert_eq!(calc.quote(dec!(100), dec!(100), dec!(100)), dec!(50));
    }

    #[test]
    fn test_quote_pair_orients_reserves() {
        let calc = ConstantProductCalculator::default();
        let reserves = PairReserves::new("A", "B", dec!(1000000), dec!(2000000));
        let a_to_b = calc.quote_pair(dec!(1000), "A", &reserves).unwrap();
        let b_to_a = calc.quote_pair(dec!(1000), "B", &reserves).unwrap();
        assert!(a_to_b > b_to_a);
        assert!(calc.quote_pair(dec!(1000), "C", &reserves).is_err());
    }

    #[test]
    fn test_amount_in_rounds_up_at_large_magnitude() {
        let amount_out = dec!(3333333333333333333333333);
        let reserve = dec!(10000000000000000000000000);
        let amount_in =
            amount_in_for_output_with(amount_out, reserve, reserve, FeeRate::STANDARD, 7).unwrap();

        // the input must buy at least `amount_out`:
        // x * 997 * R_out >= out * (R_in * 1000 + x * 997)
        let scale = amount_in.scale();
        let x = decimal_to_scaled(amount_in, scale);
        let out = decimal_to_scaled(amount_out, scale);
        let r = decimal_to_scaled(reserve, scale);
        assert!(&x * 997u32 * &r >= &out * (&r * 1000u32 + &x * 997u32));
    }

    #[test]
    fn test_amount_in_for_output_inverts_quote() {
        let calc = ConstantProductCalculator::default();
        let amount_in = calc
            .amount_in_for_output(dec!(996.0069810), dec!(1000000), dec!(1000000))
            .unwrap();
        assert!(amount_in >= dec!(999.9999999) && amount_in <= dec!(1000.0000001));
        let back = truncating(FeeRate::STANDARD).quote(amount_in, dec!(1000000), dec!(1000000));
        assert!(back >= dec!(996.0069810));
    }

    #[test]
    fn test_amount_in_for_output_exceeding_reserve() {
        let calc = ConstantProductCalculator::default();
        let result = calc.amount_in_for_output(dec!(100), dec!(100), dec!(100));
        assert!(matches!(result, Err(SwapError::InsufficientLiquidity(_))));
        let result = calc.amount_in_for_output(dec!(1), Decimal::ZERO, dec!(100));
        assert!(matches!(result, Err(SwapError::InsufficientLiquidity(_))));
        assert_eq!(
            calc.amount_in_for_output(Decimal::ZERO, dec!(1), dec!(1)).unwrap(),
            Decimal::ZERO
        );
    }

    #[test]
    fn test_fee_percent() {
        assert_eq!(FeeRate::STANDARD.percent(), dec!(0.3));
        assert!(FeeRate::STANDARD.is_valid());
        assert!(!FeeRate::new(1001, 1000).is_valid());
        assert!(!FeeRate::new(1, 0).is_valid());
    }

    proptest! {
        #[test]
        fn prop_quote_never_drains_reserve(
            amount_in in 1u64..1_000_000_000_000,
            reserve_in in 1u64..1_000_000_000_000,
            reserve_out in 1u64..1_000_000_000_000,
        ) {
            let calc = truncating(FeeRate::STANDARD);
            let out = calc.quote(amount_in.into(), reserve_in.into(), reserve_out.into());
            prop_assert!(out < Decimal::from(reserve_out));
            prop_assert!(out >= Decimal::ZERO);
        }

        #[test]
        fn prop_quote_strictly_increasing_in_amount(
            amount_in in 1u64..1_000_000,
            reserve_in in 1_000u64..1_000_000,
            reserve_out in 1_000u64..1_000_000,
        ) {
            let calc = truncating(FeeRate::STANDARD);
            let lower = calc.quote(amount_in.into(), reserve_in.into(), reserve_out.into());
            let higher = calc.quote((amount_in + 1).into(), reserve_in.into(), reserve_out.into());
            prop_assert!(higher > lower);
        }

        #[test]
        fn prop_quote_monotonic_in_reserve_out(
            amount_in in 1u64..1_000_000,
            reserve_in in 1u64..1_000_000,
            reserve_out in 1u64..1_000_000,
        ) {
            let calc = truncating(FeeRate::STANDARD);
            let lower = calc.quote(amount_in.into(), reserve_in.into(), reserve_out.into());
            let higher = calc.quote(amount_in.into(), reserve_in.into(), (reserve_out + 1).into());
            prop_assert!(higher >= lower);
        }

        #[test]
        fn prop_zero_cases(a in 0u64..u64::MAX, r in 0u64..u64::MAX) {
            prop_assert_eq!(quote(Decimal::ZERO, a.into(), r.into(), FeeRate::STANDARD), Decimal::ZERO);
            prop_assert_eq!(quote(a.into(), Decimal::ZERO, r.into(), FeeRate::STANDARD), Decimal::ZERO);
            prop_assert_eq!(quote(a.into(), r.into(), Decimal::ZERO, FeeRate::STANDARD), Decimal::ZERO);
        }
    }
}
