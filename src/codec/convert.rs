//! Building outbound call arguments.

use num_bigint::BigInt;
use rust_decimal::Decimal;

use crate::codec::native::scval_to_bigint;
use crate::codec::scval::{self, Int128Parts, Int256Parts, ScVal, UInt128Parts, UInt256Parts};
use crate::codec::{strkey, wide};
use crate::types::{Result, SwapError};
use crate::utils::math::{Rounding, bigint_to_decimal};

/// Signed 128-bit argument: `lo = v & (2^64 - 1)`, `hi = (v >> 64) & (2^64 - 1)`
pub fn i128_to_scval(value: &BigInt) -> Result<ScVal> {
    let limbs = wide::to_limbs(value, 2, true)?;
    Ok(ScVal::I128(Int128Parts {
        hi: limbs[0] as i64,
        lo: limbs[1],
    }))
}

pub fn u128_to_scval(value: &BigInt) -> Result<ScVal> {
    let limbs = wide::to_limbs(value, 2, false)?;
    Ok(ScVal::U128(UInt128Parts {
        hi: limbs[0],
        lo: limbs[1],
    }))
}

pub fn i256_to_scval(value: &BigInt) -> Result<ScVal> {
    let limbs = wide::to_limbs(value, 4, true)?;
    Ok(ScVal::I256(Int256Parts {
        hi_hi: limbs[0] as i64,
        hi_lo: limbs[1],
        lo_hi: limbs[2],
        lo_lo: limbs[3],
    }))
}

pub fn u256_to_scval(value: &BigInt) -> Result<ScVal> {
    let limbs = wide::to_limbs(value, 4, false)?;
    Ok(ScVal::U256(UInt256Parts {
        hi_hi: limbs[0],
        hi_lo: limbs[1],
        lo_hi: limbs[2],
        lo_lo: limbs[3],
    }))
}

/// `G...` or `C...` strkey as an address argument
pub fn address_to_scval(address: &str) -> Result<ScVal> {
    Ok(ScVal::Address(strkey::decode_address(address)?))
}

/// Whole-unit amount (already scaled to smallest units) as an `i128` argument
pub fn decimal_to_i128_scval(amount: Decimal) -> Result<ScVal> {
    let normalized = amount.normalize();
    if normalized.scale() != 0 {
        return Err(SwapError::Encode(format!(
            "{} has a fractional part; scale to smallest units first",
            amount
        )));
    }
    i128_to_scval(&BigInt::from(normalized.mantissa()))
}

/// Integer value as a `Decimal`, for reading balances and reserves
pub fn scval_to_decimal(value: &ScVal) -> Result<Decimal> {
    let big = scval_to_bigint(value)?;
    bigint_to_decimal(&big, 0, Rounding::Truncate)
        .ok_or_else(|| SwapError::OutOfRange(format!("{} does not fit a decimal", big)))
}

/// Arguments of the router's `swap_exact_tokens_for_tokens` and
/// `swap_tokens_for_exact_tokens`: two amounts already in smallest units, the
/// token path, the recipient and a unix deadline.
pub fn router_swap_args(
    amount0: Decimal,
    amount1: Decimal,
    path: &[&str],
    to: &str,
    deadline: u64,
) -> Result<Vec<ScVal>> {
    let path = path
        .iter()
        .map(|token| address_to_scval(token))
        .collect::<Result<Vec<_>>>()?;
    Ok(vec![
        decimal_to_i128_scval(amount0)?,
        decimal_to_i128_scval(amount1)?,
        scval::vec(path)?,
        address_to_scval(to)?,
        ScVal::U64(deadline),
    ])
}

/// `i128` payload as an integer, zero for anything else
pub fn decode_i128_or_zero(value: &ScVal) -> BigInt {
    match value {
        ScVal::I128(parts) => wide::from_limbs(&[parts.hi as u64, parts.lo], true),
        _ => BigInt::from(0),
    }
}
