use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::types::{Result, RouterMethod, SwapError, TradeType};

/// Arguments for the router's swap entry points.
///
/// Exact input: `amount0 = amount_in`, `amount1 = amount_out_min`.
/// Exact output: `amount0 = amount_out`, `amount1 = amount_in_max`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwapAmounts {
    pub amount0: Decimal,
    pub amount1: Decimal,
    pub router_method: RouterMethod,
}

/// Apply `slippage_percent` to the side of the trade that was quoted.
///
/// The bound (`amount1`) is rounded to whole smallest units, half-up.
pub fn swap_amounts(
    trade_type: TradeType,
    input_amount: Decimal,
    output_amount: Decimal,
    slippage_percent: Decimal,
) -> Result<SwapAmounts> {
    if slippage_percent.is_sign_negative() || slippage_percent >= Decimal::ONE_HUNDRED {
        return Err(SwapError::OutOfRange(format!(
            "slippage {}% must be in [0, 100)",
            slippage_percent
        )));
    }

    let router_method = RouterMethod::for_trade(trade_type);
    let (amount0, bound, factor) = match trade_type {
        TradeType::ExactInput => (
            input_amount,
            output_amount,
            (Decimal::ONE_HUNDRED - slippage_percent) / Decimal::ONE_HUNDRED,
        ),
        TradeType::ExactOutput => (
            output_amount,
            input_amount,
            (Decimal::ONE_HUNDRED + slippage_percent) / Decimal::ONE_HUNDRED,
        ),
    };

    let amount1 = bound
        .checked_mul(factor)
        .ok_or_else(|| SwapError::OutOfRange(format!("{} * {} overflows", bound, factor)))?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);

    Ok(SwapAmounts {
        amount0,
        amount1,
        router_method,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_exact_input_lowers_minimum_out() {
        let amounts = swap_amounts(
            TradeType::ExactInput,
            dec!(10000000),
            dec!(9960069),
            dec!(0.5),
        )
        .unwrap();
        assert_eq!(amounts.router_method, RouterMethod::SwapExactIn);
        assert_eq!(amounts.amount0, dec!(10000000));
        // 9960069 * 0.995 = 9910268.655
        assert_eq!(amounts.amount1, dec!(9910269));
    }

    #[test]
    fn test_exact_output_raises_maximum_in() {
        let amounts = swap_amounts(
            TradeType::ExactOutput,
            dec!(10000000),
            dec!(9960069),
            dec!(0.5),
        )
        .unwrap();
        assert_eq!(amounts.router_method, RouterMethod::SwapExactOut);
        assert_eq!(amounts.amount0, dec!(9960069));
        assert_eq!(amounts.amount1, dec!(10050000));
    }

    #[test]
    fn test_zero_slippage_keeps_amounts() {
        let amounts = swap_amounts(TradeType::ExactInput, dec!(5), dec!(7), Decimal::ZERO).unwrap();
        assert_eq!(amounts.amount1, dec!(7));
    }

    #[test]
    fn test_invalid_slippage() {
        assert!(swap_amounts(TradeType::ExactInput, dec!(1), dec!(1), dec!(-1)).is_err());
        assert!(swap_amounts(TradeType::ExactInput, dec!(1), dec!(1), dec!(100)).is_err());
    }
}
