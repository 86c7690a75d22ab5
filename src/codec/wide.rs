//! Wide integers as sequences of 64-bit limbs, most significant first.

use num_bigint::{BigInt, Sign};
use num_traits::{One, Zero};

use crate::types::{Result, SwapError};

const LIMB_BITS: usize = 64;

/// Reassemble `Σ limb_i · 2^(64·i)`; when `signed`, the top bit of the
/// first limb is the two's-complement sign.
pub fn from_limbs(limbs: &[u64], signed: bool) -> BigInt {
    let magnitude = limbs
        .iter()
        .fold(BigInt::zero(), |acc, limb| (acc << LIMB_BITS) + BigInt::from(*limb));

    match limbs.first() {
        Some(top) if signed && top >> 63 == 1 => magnitude - modulus(limbs.len()),
        _ => magnitude,
    }
}

/// Split `value` into `count` limbs, two's complement when `signed`.
/// Fails when the value does not fit.
pub fn to_limbs(value: &BigInt, count: usize, signed: bool) -> Result<Vec<u64>> {
    let (min, max) = bounds(count, signed);
    if *value < min || *value > max {
        return Err(SwapError::OutOfRange(format!(
            "{} does not fit in {} {}-bit limbs ({})",
            value,
            count,
            LIMB_BITS,
            if signed { "signed" } else { "unsigned" }
        )));
    }

    let unsigned = if value.sign() == Sign::Minus {
        value + modulus(count)
    } else {
        value.clone()
    };
    let mut digits = unsigned
        .to_biguint()
        .map(|v| v.to_u64_digits())
        .unwrap_or_default();
    digits.resize(count, 0);
    digits.reverse();
    Ok(digits)
}

/// Inclusive range representable in `count` limbs
pub fn bounds(count: usize, signed: bool) -> (BigInt, BigInt) {
    if signed {
        let half = BigInt::one() << (count * LIMB_BITS - 1);
        (-half.clone(), half - 1)
    } else {
        (BigInt::zero(), modulus(count) - 1)
    }
}

fn modulus(count: usize) -> BigInt {
    BigInt::one() << (count * LIMB_BITS)
}
