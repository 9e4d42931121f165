use crate::error::MathError;
use crate::math::u256_num::u256_to_biguint;
use crate::Q96;
use alloy_primitives::U256;
use num_bigint::BigUint;
use num_traits::Zero;

/// Applies a signed liquidity delta, failing instead of wrapping.
pub fn add_delta(x: u128, y: i128) -> Result<u128, MathError> {
    if y < 0 {
        x.checked_sub(y.unsigned_abs()).ok_or(MathError::Underflow)
    } else {
        x.checked_add(y as u128).ok_or(MathError::Overflow)
    }
}

/// Sorted bounds as arbitrary precision integers together with their width.
fn range(sqrt_ratio_a_x96: U256, sqrt_ratio_b_x96: U256) -> Result<(BigUint, BigUint, BigUint), MathError> {
    let (lower, upper) = if sqrt_ratio_a_x96 > sqrt_ratio_b_x96 {
        (sqrt_ratio_b_x96, sqrt_ratio_a_x96)
    } else {
        (sqrt_ratio_a_x96, sqrt_ratio_b_x96)
    };
    let width = u256_to_biguint(upper - lower);
    if width.is_zero() {
        return Err(MathError::DivisionByZero);
    }
    Ok((u256_to_biguint(lower), u256_to_biguint(upper), width))
}

/// Liquidity bought by `amount0` over a range lying entirely above the price.
///
/// The imprecise form truncates `lower * upper / Q96` before scaling, which
/// is what the on-chain periphery contracts compute.
fn liquidity_for_amount0(
    sqrt_ratio_a_x96: U256,
    sqrt_ratio_b_x96: U256,
    amount0: U256,
    use_full_precision: bool,
) -> Result<BigUint, MathError> {
    let (lower, upper, width) = range(sqrt_ratio_a_x96, sqrt_ratio_b_x96)?;
    let amount0 = u256_to_biguint(amount0);
    let q96 = u256_to_biguint(Q96);
    Ok(if use_full_precision {
        amount0 * lower * upper / (width * q96)
    } else {
        amount0 * (lower * upper / q96) / width
    })
}

/// Liquidity bought by `amount1` over a range lying entirely below the price.
fn liquidity_for_amount1(
    sqrt_ratio_a_x96: U256,
    sqrt_ratio_b_x96: U256,
    amount1: U256,
) -> Result<BigUint, MathError> {
    let (_, _, width) = range(sqrt_ratio_a_x96, sqrt_ratio_b_x96)?;
    Ok(u256_to_biguint(amount1) * u256_to_biguint(Q96) / width)
}

/// Largest liquidity that `amount0` and `amount1` can mint between two sqrt
/// prices with the pool at `sqrt_ratio_current_x96`.
///
/// The result is unbounded: one-sided ranges given `U256::MAX` of the unused
/// token produce values past 256 bits, and callers narrow it themselves.
pub fn max_liquidity_for_amounts(
    sqrt_ratio_current_x96: U256,
    sqrt_ratio_a_x96: U256,
    sqrt_ratio_b_x96: U256,
    amount0: U256,
    amount1: U256,
    use_full_precision: bool,
) -> Result<BigUint, MathError> {
    let (lower, upper) = if sqrt_ratio_a_x96 > sqrt_ratio_b_x96 {
        (sqrt_ratio_b_x96, sqrt_ratio_a_x96)
    } else {
        (sqrt_ratio_a_x96, sqrt_ratio_b_x96)
    };

    if sqrt_ratio_current_x96 <= lower {
        liquidity_for_amount0(lower, upper, amount0, use_full_precision)
    } else if sqrt_ratio_current_x96 < upper {
        let from0 = liquidity_for_amount0(sqrt_ratio_current_x96, upper, amount0, use_full_precision)?;
        let from1 = liquidity_for_amount1(lower, sqrt_ratio_current_x96, amount1)?;
        Ok(from0.min(from1))
    } else {
        liquidity_for_amount1(lower, upper, amount1)
    }
}
