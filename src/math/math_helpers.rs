//! Full-precision multiply-then-divide over `U256`.
//!
//! The product of two 256-bit operands is carried in a `U512`, so a
//! result is only an overflow when the final quotient does not fit.

use crate::error::MathError;
use alloy_primitives::ruint::UintTryFrom;
use alloy_primitives::{U256, U512};

/// Quotient of `a * b / denominator` and whether a remainder was left.
#[inline]
fn wide_div(a: U256, b: U256, denominator: U256) -> Result<(U256, bool), MathError> {
    if denominator.is_zero() {
        return Err(MathError::DivisionByZero);
    }
    let product: U512 = a.widening_mul(b);
    let (quotient, remainder) = product.div_rem(U512::from(denominator));
    let quotient = U256::uint_try_from(quotient).map_err(|_| MathError::Overflow)?;
    Ok((quotient, !remainder.is_zero()))
}

/// `floor(a * b / denominator)` without intermediate overflow.
#[inline]
pub fn mul_div(a: U256, b: U256, denominator: U256) -> Result<U256, MathError> {
    wide_div(a, b, denominator).map(|(quotient, _)| quotient)
}

/// `ceil(a * b / denominator)`. Rounding past `U256::MAX` is an overflow.
#[inline]
pub fn mul_div_rounding_up(a: U256, b: U256, denominator: U256) -> Result<U256, MathError> {
    match wide_div(a, b, denominator)? {
        (quotient, false) => Ok(quotient),
        (quotient, true) => quotient.checked_add(U256::ONE).ok_or(MathError::Overflow),
    }
}

/// `ceil(a / b)`.
#[inline]
pub fn div_rounding_up(a: U256, b: U256) -> Result<U256, MathError> {
    if b.is_zero() {
        return Err(MathError::DivisionByZero);
    }
    let (quotient, remainder) = a.div_rem(b);
    // a / b < U256::MAX whenever b > 1, and b == 1 leaves no remainder.
    Ok(if remainder.is_zero() { quotient } else { quotient + U256::ONE })
}
