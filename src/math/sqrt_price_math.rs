//! Price movement and token amounts for a fixed amount of in-range liquidity.
//!
//! Prices are Q64.96 square roots. Each function rounds in the pool's favour:
//! a trader never receives more, and never pays less, than the exact value.

use alloy_primitives::{I256, U256};

use crate::error::{Error, MathError, StateError};
use crate::math::math_helpers::{div_rounding_up, mul_div, mul_div_rounding_up};
use crate::{Q96, RESOLUTION, U160_MAX};

type MulDiv = fn(U256, U256, U256) -> Result<U256, MathError>;

fn ordered(a: U256, b: U256) -> (U256, U256) {
    if a > b {
        (b, a)
    } else {
        (a, b)
    }
}

fn check_state(sqrt_price_x96: U256, liquidity: u128) -> Result<(), StateError> {
    if sqrt_price_x96.is_zero() {
        return Err(StateError::SqrtPriceIsZero);
    }
    if liquidity == 0 {
        return Err(StateError::LiquidityIsZero);
    }
    Ok(())
}

/// Price after `amount` of token0 is added to (`add`) or taken from the
/// pool. Rounded up. `sqrt_price_x96` must be nonzero.
fn next_from_amount_0(
    sqrt_price_x96: U256,
    liquidity: u128,
    amount: U256,
    add: bool,
) -> Result<U256, Error> {
    if amount.is_zero() {
        return Ok(sqrt_price_x96);
    }
    let numerator = U256::from(liquidity) << RESOLUTION;
    let product = amount.checked_mul(sqrt_price_x96);

    if add {
        // L * P / (L + x * P), or L / (L / P + x) once x * P no longer fits
        if let Some(denominator) = product.and_then(|p| numerator.checked_add(p)) {
            return Ok(mul_div_rounding_up(numerator, sqrt_price_x96, denominator)?);
        }
        let denominator = (numerator / sqrt_price_x96)
            .checked_add(amount)
            .ok_or(MathError::Overflow)?;
        return Ok(div_rounding_up(numerator, denominator)?);
    }

    let denominator = product
        .filter(|p| *p < numerator)
        .map(|p| numerator - p)
        .ok_or(StateError::InsufficientReserves)?;
    Ok(mul_div_rounding_up(numerator, sqrt_price_x96, denominator)?)
}

/// Price after `amount` of token1 is added to or taken from the pool.
/// Rounded down. `liquidity` must be nonzero.
fn next_from_amount_1(
    sqrt_price_x96: U256,
    liquidity: u128,
    amount: U256,
    add: bool,
) -> Result<U256, Error> {
    let liquidity = U256::from(liquidity);
    let shifted = amount <= U160_MAX;
    let quotient = match (add, shifted) {
        (true, true) => (amount << RESOLUTION) / liquidity,
        (true, false) => mul_div(amount, Q96, liquidity)?,
        (false, true) => div_rounding_up(amount << RESOLUTION, liquidity)?,
        (false, false) => mul_div_rounding_up(amount, Q96, liquidity)?,
    };

    if add {
        sqrt_price_x96
            .checked_add(quotient)
            .filter(|next| *next <= U160_MAX)
            .ok_or(Error::from(MathError::Overflow))
    } else {
        sqrt_price_x96
            .checked_sub(quotient)
            .filter(|next| !next.is_zero())
            .ok_or(Error::from(StateError::InsufficientReserves))
    }
}

/// Price after swapping `amount_in` into the pool. `zero_for_one` means the
/// input is token0 and the price falls.
pub fn get_next_sqrt_price_from_input(
    sqrt_price_x96: U256,
    liquidity: u128,
    amount_in: U256,
    zero_for_one: bool,
) -> Result<U256, Error> {
    check_state(sqrt_price_x96, liquidity)?;
    if zero_for_one {
        next_from_amount_0(sqrt_price_x96, liquidity, amount_in, true)
    } else {
        next_from_amount_1(sqrt_price_x96, liquidity, amount_in, true)
    }
}

/// Price after `amount_out` leaves the pool. `zero_for_one` means the
/// output is token1 and the price falls.
pub fn get_next_sqrt_price_from_output(
    sqrt_price_x96: U256,
    liquidity: u128,
    amount_out: U256,
    zero_for_one: bool,
) -> Result<U256, Error> {
    check_state(sqrt_price_x96, liquidity)?;
    if zero_for_one {
        next_from_amount_1(sqrt_price_x96, liquidity, amount_out, false)
    } else {
        next_from_amount_0(sqrt_price_x96, liquidity, amount_out, false)
    }
}

/// Token0 held by `liquidity` between two prices, in either order:
/// `L * (upper - lower) / (upper * lower)`.
pub fn amount_0_delta(
    sqrt_ratio_a_x96: U256,
    sqrt_ratio_b_x96: U256,
    liquidity: u128,
    round_up: bool,
) -> Result<U256, Error> {
    let (lower, upper) = ordered(sqrt_ratio_a_x96, sqrt_ratio_b_x96);
    if lower.is_zero() {
        return Err(StateError::SqrtRatioIsZero.into());
    }

    let numerator = U256::from(liquidity) << RESOLUTION;
    let width = upper - lower;
    let amount = if round_up {
        div_rounding_up(mul_div_rounding_up(numerator, width, upper)?, lower)?
    } else {
        mul_div(numerator, width, upper)? / lower
    };
    Ok(amount)
}

/// Token1 held by `liquidity` between two prices: `L * (upper - lower)`.
pub fn amount_1_delta(
    sqrt_ratio_a_x96: U256,
    sqrt_ratio_b_x96: U256,
    liquidity: u128,
    round_up: bool,
) -> Result<U256, MathError> {
    let (lower, upper) = ordered(sqrt_ratio_a_x96, sqrt_ratio_b_x96);
    let scale: MulDiv = if round_up { mul_div_rounding_up } else { mul_div };
    scale(U256::from(liquidity), upper - lower, Q96)
}

fn with_sign(amount: U256, negative: bool) -> I256 {
    let value = I256::from_raw(amount);
    if negative {
        -value
    } else {
        value
    }
}

/// Token0 owed for a change of `liquidity_delta`. Adding liquidity is
/// positive and rounded up; removing it is negative and rounded down.
pub fn signed_amount_0_delta(
    sqrt_ratio_a_x96: U256,
    sqrt_ratio_b_x96: U256,
    liquidity_delta: i128,
) -> Result<I256, Error> {
    let amount = amount_0_delta(
        sqrt_ratio_a_x96,
        sqrt_ratio_b_x96,
        liquidity_delta.unsigned_abs(),
        liquidity_delta >= 0,
    )?;
    Ok(with_sign(amount, liquidity_delta < 0))
}

/// Token1 counterpart of [`signed_amount_0_delta`].
pub fn signed_amount_1_delta(
    sqrt_ratio_a_x96: U256,
    sqrt_ratio_b_x96: U256,
    liquidity_delta: i128,
) -> Result<I256, Error> {
    let amount = amount_1_delta(
        sqrt_ratio_a_x96,
        sqrt_ratio_b_x96,
        liquidity_delta.unsigned_abs(),
        liquidity_delta >= 0,
    )?;
    Ok(with_sign(amount, liquidity_delta < 0))
}
