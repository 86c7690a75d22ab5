use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::types::{Result, SwapError};

/// Decimal places of the ledger's native token unit (1 token = 10^7 stroops)
pub const DEFAULT_DECIMALS: u32 = 7;

/// Unix timestamp in seconds `seconds` from now, used as a router deadline
pub fn deadline_after(seconds: u64) -> u64 {
    let now_secs = chrono::Utc::now().timestamp().max(0) as u64;
    now_secs.saturating_add(seconds)
}

// ============================================================================
// Trade direction
// ============================================================================

/// Which side of a trade the user fixed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TradeType {
    ExactInput,
    ExactOutput,
}

impl fmt::Display for TradeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeType::ExactInput => write!(f, "exact-in"),
            TradeType::ExactOutput => write!(f, "exact-out"),
        }
    }
}

impl FromStr for TradeType {
    type Err = SwapError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "exact-in" | "exact_input" | "exactin" => Ok(TradeType::ExactInput),
            "exact-out" | "exact_output" | "exactout" => Ok(TradeType::ExactOutput),
            _ => Err(SwapError::Parse(format!("Unknown trade type: {}", s))),
        }
    }
}

/// Router contract entry points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RouterMethod {
    AddLiquidity,
    RemoveLiquidity,
    SwapExactIn,
    SwapExactOut,
    Quote,
    GetAmountOut,
    GetAmountIn,
    GetAmountsOut,
    GetAmountsIn,
}

impl RouterMethod {
    pub fn method_name(&self) -> &'static str {
        match self {
            RouterMethod::AddLiquidity => "add_liquidity",
            RouterMethod::RemoveLiquidity => "remove_liquidity",
            RouterMethod::SwapExactIn => "swap_exact_tokens_for_tokens",
            RouterMethod::SwapExactOut => "swap_tokens_for_exact_tokens",
            RouterMethod::Quote => "router_quote",
            RouterMethod::GetAmountOut => "router_get_amount_out",
            RouterMethod::GetAmountIn => "router_get_amount_in",
            RouterMethod::GetAmountsOut => "router_get_amounts_out",
            RouterMethod::GetAmountsIn => "router_get_amounts_in",
        }
    }

    pub fn for_trade(trade_type: TradeType) -> Self {
        match trade_type {
            TradeType::ExactInput => RouterMethod::SwapExactIn,
            TradeType::ExactOutput => RouterMethod::SwapExactOut,
        }
    }
}

impl fmt::Display for RouterMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.method_name())
    }
}

// ============================================================================
// Token Information
// ============================================================================

/// A token as addressed on the ledger
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TokenInfo {
    pub address: String,
    #[serde(default = "default_decimals")]
    pub decimals: u32,
}

fn default_decimals() -> u32 {
    DEFAULT_DECIMALS
}

impl TokenInfo {
    pub fn new(address: impl Into<String>, decimals: u32) -> Self {
        Self {
            address: address.into(),
            decimals,
        }
    }

    /// Convert a smallest-unit amount to a human amount
    pub fn to_decimal(&self, raw_amount: Decimal) -> Result<Decimal> {
        let mut value = raw_amount;
        value.set_scale(raw_amount.scale() + self.decimals)?;
        Ok(value.normalize())
    }

    /// Convert a human amount to smallest units, dropping sub-unit dust
    pub fn to_raw(&self, decimal_amount: Decimal) -> Result<Decimal> {
        let mut value = decimal_amount;
        for _ in 0..self.decimals {
            value = value.checked_mul(Decimal::TEN).ok_or_else(|| {
                SwapError::OutOfRange(format!(
                    "{} of {} does not fit in smallest units",
                    decimal_amount, self.address
                ))
            })?;
        }
        Ok(value.trunc())
    }
}
