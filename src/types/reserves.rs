use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::codec::{ScVal, scval_to_decimal, vec_items};
use crate::types::{Result, SwapError};

/// Reserves of one pair contract as last read from the ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairReserves {
    pub token0: String,
    pub token1: String,
    pub reserve0: Decimal,
    pub reserve1: Decimal,
}

impl PairReserves {
    pub fn new(
        token0: impl Into<String>,
        token1: impl Into<String>,
        reserve0: Decimal,
        reserve1: Decimal,
    ) -> Self {
        Self {
            token0: token0.into(),
            token1: token1.into(),
            reserve0,
            reserve1,
        }
    }

    /// Build from a pair's `get_reserves` result, a vec of two integers
    pub fn from_scval(
        token0: impl Into<String>,
        token1: impl Into<String>,
        value: &ScVal,
    ) -> Result<Self> {
        let ScVal::Vec(body) = value else {
            return Err(SwapError::unsupported(value.name()));
        };
        let [reserve0, reserve1] = vec_items(body) else {
            return Err(SwapError::OutOfRange(format!(
                "expected 2 reserves, got {}",
                vec_items(body).len()
            )));
        };
        let reserve0 = scval_to_decimal(reserve0)?;
        let reserve1 = scval_to_decimal(reserve1)?;
        if reserve0.is_sign_negative() || reserve1.is_sign_negative() {
            return Err(SwapError::OutOfRange(format!(
                "negative reserves {} / {}",
                reserve0, reserve1
            )));
        }
        Ok(Self::new(token0, token1, reserve0, reserve1))
    }

    /// `(reserve_in, reserve_out)` for a trade selling `token_in`
    pub fn oriented(&self, token_in: &str) -> Result<(Decimal, Decimal)> {
        if token_in == self.token0 {
            Ok((self.reserve0, self.reserve1))
        } else if token_in == self.token1 {
            Ok((self.reserve1, self.reserve0))
        } else {
            Err(SwapError::UnknownToken(token_in.to_string()))
        }
    }

    /// Units of the other token per unit of `token_in`, zero for an empty side
    pub fn spot_price(&self, token_in: &str) -> Result<Decimal> {
        let (reserve_in, reserve_out) = self.oriented(token_in)?;
        if reserve_in.is_zero() {
            return Ok(Decimal::ZERO);
        }
        reserve_out.checked_div(reserve_in).ok_or_else(|| {
            SwapError::OutOfRange(format!("{} / {} overflows", reserve_out, reserve_in))
        })
    }
}
