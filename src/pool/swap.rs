use crate::error::{Error, MathError, PoolError};
use crate::math::liquidity_math::add_delta;
use crate::math::math_helpers::mul_div;
use crate::math::sqrt_price_math::{amount_0_delta, amount_1_delta};
use crate::math::swap_math::compute_swap_step;
use crate::math::tick_list::{find_tick, next_initialized_tick_within_one_word};
use crate::math::tick_math::{
    get_sqrt_ratio_at_tick, get_tick_at_sqrt_ratio, MAX_SQRT_RATIO, MAX_TICK, MIN_SQRT_RATIO,
    MIN_TICK,
};
use crate::pool::Pool;
use crate::{U256_1, U256_E6};
use alloy_primitives::{I256, U256};
use std::ops::{Add, Sub};
use tracing::trace;

/// Outcome of a simulated swap: the calculated amount plus the state the
/// pool ends in.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SwapResult {
    /// Output paid (negative) for exact input, input owed (positive) for
    /// exact output. Includes the fee.
    pub amount_calculated: I256,
    pub sqrt_price_x96: U256,
    pub liquidity: u128,
    pub tick_current: i32,
}

// the running state of the swap, copied into the next pool snapshot at the end
#[derive(Default)]
struct SwapState {
    // the amount remaining to be swapped in/out of the input/output asset
    amount_specified_remaining: I256,
    // the amount already swapped out/in of the output/input asset
    amount_calculated: I256,
    // current sqrt(price)
    sqrt_price_x96: U256,
    // the tick associated with the current price
    tick: i32,
    // the current liquidity in range
    liquidity: u128,
}

#[derive(Default)]
struct StepComputations {
    // the price at the beginning of the step
    sqrt_price_start_x96: U256,
    // the next tick to swap to from the current tick in the swap direction
    tick_next: i32,
    // whether tickNext is initialized or not
    initialized: bool,
    // sqrt(price) for the next tick (1/0)
    sqrt_price_next_x96: U256,
    // how much is being swapped in this step
    amount_in: U256,
    // how much is being swapped out
    amount_out: U256,
    // how much fee is being paid in
    fee_amount: U256,
}

impl Pool {
    /// Runs the swap loop against this snapshot without touching it.
    ///
    /// `amount_specified` is positive for exact input and negative for exact
    /// output. Without a limit the price may move to one step inside the
    /// global sqrt ratio bounds.
    pub fn simulate_swap(
        &self,
        zero_for_one: bool,
        amount_specified: I256,
        sqrt_price_limit_x96: Option<U256>,
    ) -> Result<SwapResult, Error> {
        let sqrt_price_limit_x96 = sqrt_price_limit_x96.unwrap_or(if zero_for_one {
            MIN_SQRT_RATIO + U256_1
        } else {
            MAX_SQRT_RATIO - U256_1
        });

        if zero_for_one {
            if sqrt_price_limit_x96 <= MIN_SQRT_RATIO {
                return Err(PoolError::RatioMin(sqrt_price_limit_x96).into());
            }
            if sqrt_price_limit_x96 >= self.sqrt_price_x96 {
                return Err(PoolError::RatioCurrent(sqrt_price_limit_x96).into());
            }
        } else {
            if sqrt_price_limit_x96 >= MAX_SQRT_RATIO {
                return Err(PoolError::RatioMax(sqrt_price_limit_x96).into());
            }
            if sqrt_price_limit_x96 <= self.sqrt_price_x96 {
                return Err(PoolError::RatioCurrent(sqrt_price_limit_x96).into());
            }
        }

        let exact_input = !amount_specified.is_negative();

        let mut state = SwapState {
            amount_specified_remaining: amount_specified,
            amount_calculated: I256::ZERO,
            sqrt_price_x96: self.sqrt_price_x96,
            tick: self.tick_current,
            liquidity: self.liquidity,
        };

        while (state.amount_specified_remaining != I256::ZERO)
            && (state.sqrt_price_x96 != sqrt_price_limit_x96)
        {
            let mut step = StepComputations {
                sqrt_price_start_x96: state.sqrt_price_x96,
                ..StepComputations::default()
            };

            (step.tick_next, step.initialized) = next_initialized_tick_within_one_word(
                &self.ticks,
                state.tick,
                zero_for_one,
                self.tick_spacing(),
            )?;

            step.tick_next = step.tick_next.clamp(MIN_TICK, MAX_TICK);

            step.sqrt_price_next_x96 = get_sqrt_ratio_at_tick(step.tick_next)?;

            (
                state.sqrt_price_x96,
                step.amount_in,
                step.amount_out,
                step.fee_amount,
            ) = compute_swap_step(
                state.sqrt_price_x96,
                if zero_for_one {
                    if step.sqrt_price_next_x96 < sqrt_price_limit_x96 {
                        sqrt_price_limit_x96
                    } else {
                        step.sqrt_price_next_x96
                    }
                } else if step.sqrt_price_next_x96 > sqrt_price_limit_x96 {
                    sqrt_price_limit_x96
                } else {
                    step.sqrt_price_next_x96
                },
                state.liquidity,
                state.amount_specified_remaining,
                self.fee.pips(),
            )?;

            trace!(
                tick_next = step.tick_next,
                initialized = step.initialized,
                amount_in = %step.amount_in,
                amount_out = %step.amount_out,
                fee_amount = %step.fee_amount,
                "swap step"
            );

            if exact_input {
                state.amount_specified_remaining -=
                    I256::from_raw(step.amount_in + step.fee_amount);
                state.amount_calculated =
                    state.amount_calculated.sub(I256::from_raw(step.amount_out));
            } else {
                state.amount_specified_remaining += I256::from_raw(step.amount_out);
                state.amount_calculated = state
                    .amount_calculated
                    .add(I256::from_raw(step.amount_in + step.fee_amount));
            }

            if state.sqrt_price_x96 == step.sqrt_price_next_x96 {
                if step.initialized {
                    let mut liquidity_net = find_tick(&self.ticks, step.tick_next)?.liquidity_net;
                    if zero_for_one {
                        liquidity_net = liquidity_net.checked_neg().ok_or(MathError::Overflow)?;
                    }
                    state.liquidity = add_delta(state.liquidity, liquidity_net)?;
                    trace!(tick = step.tick_next, liquidity = state.liquidity, "crossed tick");
                }
                state.tick = if zero_for_one {
                    step.tick_next - 1
                } else {
                    step.tick_next
                };
            } else if state.sqrt_price_x96 != step.sqrt_price_start_x96 {
                state.tick = get_tick_at_sqrt_ratio(state.sqrt_price_x96)?;
            }
        }

        Ok(SwapResult {
            amount_calculated: state.amount_calculated,
            sqrt_price_x96: state.sqrt_price_x96,
            liquidity: state.liquidity,
            tick_current: state.tick,
        })
    }

    /// Returns the maximum input amount that can be swapped in the given
    /// direction before the pool runs out of in-range liquidity or reaches
    /// the global tick bounds.
    ///
    /// The value is denominated in the input token for the chosen direction
    /// and includes the pool's fee.
    pub fn max_input_amount(&self, zero_for_one: bool) -> Result<U256, Error> {
        let mut state = SwapState {
            sqrt_price_x96: self.sqrt_price_x96,
            tick: self.tick_current,
            liquidity: self.liquidity,
            ..Default::default()
        };

        let mut max_token_amount: U256 = U256::ZERO;

        while state.tick > MIN_TICK && state.tick < MAX_TICK && state.liquidity != 0 {
            let mut step = StepComputations {
                sqrt_price_start_x96: state.sqrt_price_x96,
                ..Default::default()
            };

            (step.tick_next, step.initialized) = next_initialized_tick_within_one_word(
                &self.ticks,
                state.tick,
                zero_for_one,
                self.tick_spacing(),
            )?;

            step.tick_next = step.tick_next.clamp(MIN_TICK, MAX_TICK);

            step.sqrt_price_next_x96 = get_sqrt_ratio_at_tick(step.tick_next)?;

            let step_amount = if zero_for_one {
                amount_0_delta(
                    step.sqrt_price_next_x96,
                    step.sqrt_price_start_x96,
                    state.liquidity,
                    true,
                )?
            } else {
                amount_1_delta(
                    step.sqrt_price_start_x96,
                    step.sqrt_price_next_x96,
                    state.liquidity,
                    true,
                )?
            };
            max_token_amount = max_token_amount
                .checked_add(step_amount)
                .ok_or(MathError::Overflow)?;

            state.sqrt_price_x96 = step.sqrt_price_next_x96;

            if step.initialized {
                let mut liquidity_net = find_tick(&self.ticks, step.tick_next)?.liquidity_net;
                if zero_for_one {
                    liquidity_net = liquidity_net.checked_neg().ok_or(MathError::Overflow)?;
                }
                state.liquidity = add_delta(state.liquidity, liquidity_net)?;
            }
            state.tick = if zero_for_one {
                step.tick_next - 1
            } else {
                step.tick_next
            };
        }
        Ok(mul_div(
            max_token_amount,
            U256_E6,
            U256::from(crate::fee::MAX_FEE - self.fee.pips()),
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fee::FeeAmount;
    use crate::math::tick_list::Tick;
    use crate::math::tick_math::encode_sqrt_ratio_x96;
    use crate::pool::tests::{dai, full_range_ticks, usdc};
    use proptest::prelude::*;

    const ONE_ETHER: u128 = 1_000_000_000_000_000_000;

    fn pool_with(fee: FeeAmount, liquidity: u128, ticks: Vec<Tick>) -> Pool {
        let sqrt = encode_sqrt_ratio_x96(U256::from(1), U256::from(1)).unwrap();
        Pool::new(usdc(), dai(), fee, sqrt, liquidity, 0, ticks).unwrap()
    }

    fn full_range_pool() -> Pool {
        pool_with(FeeAmount::Low, ONE_ETHER, full_range_ticks(FeeAmount::Low, ONE_ETHER))
    }

    fn exact_in(amount: u128) -> I256 {
        I256::from_raw(U256::from(amount))
    }

    fn exact_out(amount: u128) -> I256 {
        -I256::from_raw(U256::from(amount))
    }

    #[test]
    fn default_limit_stays_inside_bounds() {
        let pool = full_range_pool();
        let down = pool.simulate_swap(true, exact_in(u64::MAX as u128 * 1_000_000), None).unwrap();
        assert!(down.sqrt_price_x96 > MIN_SQRT_RATIO);
        let up = pool.simulate_swap(false, exact_in(u64::MAX as u128 * 1_000_000), None).unwrap();
        assert!(up.sqrt_price_x96 < MAX_SQRT_RATIO);
    }

    #[test]
    fn rejects_limits_outside_bounds() {
        let pool = full_range_pool();
        assert!(matches!(
            pool.simulate_swap(true, exact_in(100), Some(MIN_SQRT_RATIO)),
            Err(Error::PoolError(PoolError::RatioMin(_)))
        ));
        assert!(matches!(
            pool.simulate_swap(false, exact_in(100), Some(MAX_SQRT_RATIO)),
            Err(Error::PoolError(PoolError::RatioMax(_)))
        ));
    }

    #[test]
    fn rejects_limits_on_the_wrong_side_of_the_price() {
        let pool = full_range_pool();
        let current = pool.sqrt_price_x96();
        for (zero_for_one, limit) in [
            (true, current),
            (true, current + U256_1),
            (false, current),
            (false, current - U256_1),
        ] {
            assert!(matches!(
                pool.simulate_swap(zero_for_one, exact_in(100), Some(limit)),
                Err(Error::PoolError(PoolError::RatioCurrent(_)))
            ));
        }
    }

    #[test]
    fn stops_at_the_price_limit() {
        let pool = full_range_pool();
        let limit = encode_sqrt_ratio_x96(U256::from(99), U256::from(100)).unwrap();
        let result = pool.simulate_swap(true, exact_in(ONE_ETHER), Some(limit)).unwrap();
        assert_eq!(result.sqrt_price_x96, limit);
        assert_eq!(result.liquidity, ONE_ETHER);
        assert_eq!(result.tick_current, get_tick_at_sqrt_ratio(limit).unwrap());
        assert!(result.amount_calculated.is_negative());
    }

    #[test]
    fn zero_amount_is_a_no_op() {
        let pool = full_range_pool();
        let result = pool.simulate_swap(true, I256::ZERO, None).unwrap();
        assert_eq!(result.amount_calculated, I256::ZERO);
        assert_eq!(result.sqrt_price_x96, pool.sqrt_price_x96());
        assert_eq!(result.tick_current, pool.tick_current());
    }

    #[test]
    fn crosses_initialized_ticks() {
        let liquidity = ONE_ETHER;
        let ticks = vec![
            Tick::new(-887270, liquidity as i128, liquidity),
            Tick::new(-10, liquidity as i128, liquidity),
            Tick::new(10, -(liquidity as i128), liquidity),
            Tick::new(887270, -(liquidity as i128), liquidity),
        ];
        let pool = pool_with(FeeAmount::Low, 2 * liquidity, ticks);

        // selling a lot of token0 walks past the inner position at tick -10
        let limit = get_sqrt_ratio_at_tick(-20).unwrap();
        let result = pool.simulate_swap(true, exact_in(ONE_ETHER), Some(limit)).unwrap();
        assert_eq!(result.sqrt_price_x96, limit);
        assert_eq!(result.liquidity, liquidity);
        assert_eq!(result.tick_current, -20);

        let limit = get_sqrt_ratio_at_tick(20).unwrap();
        let result = pool.simulate_swap(false, exact_in(ONE_ETHER), Some(limit)).unwrap();
        assert_eq!(result.liquidity, liquidity);
        assert_eq!(result.tick_current, 20);
    }

    #[test]
    fn zero_liquidity_moves_price_without_amounts() {
        let pool = pool_with(FeeAmount::Low, 0, vec![Tick::new(-100, 0, 0), Tick::new(100, 0, 0)]);
        let limit = get_sqrt_ratio_at_tick(-50).unwrap();
        let result = pool.simulate_swap(true, exact_in(1_000), Some(limit)).unwrap();
        assert_eq!(result.amount_calculated, I256::ZERO);
        assert_eq!(result.sqrt_price_x96, limit);
        assert_eq!(result.liquidity, 0);
    }

    #[test]
    fn max_input_amount_covers_the_range() {
        let pool = full_range_pool();
        let max_in = pool.max_input_amount(true).unwrap();
        let result = pool
            .simulate_swap(true, I256::from_raw(max_in), None)
            .unwrap();
        assert!(result.amount_calculated.is_negative());
        assert!(max_in > U256::from(ONE_ETHER));
        assert_eq!(
            pool_with(FeeAmount::Low, 0, vec![]).max_input_amount(false).unwrap(),
            U256::ZERO
        );
    }

    #[test]
    fn max_input_amount_of_the_deepest_pool_is_not_clamped() {
        let liquidity = i128::MAX as u128;
        let pool = pool_with(FeeAmount::Low, liquidity, full_range_ticks(FeeAmount::Low, liquidity));
        for zero_for_one in [true, false] {
            let max_in = pool.max_input_amount(zero_for_one).unwrap();
            assert!(max_in > U256::from(liquidity));
            assert!(max_in < U256::MAX >> 64usize);
            let result = pool.simulate_swap(zero_for_one, I256::from_raw(max_in), None).unwrap();
            assert!(result.amount_calculated.is_negative());
        }
    }

    proptest! {
        #[test]
        fn exact_output_reverses_exact_input(amount in 1u64..1_000_000_000_000u64, zero_for_one: bool) {
            let pool = full_range_pool();
            let forward = pool.simulate_swap(zero_for_one, exact_in(amount as u128), None).unwrap();
            let received = forward.amount_calculated.unsigned_abs();
            prop_assume!(!received.is_zero());

            let back = pool
                .simulate_swap(zero_for_one, -I256::from_raw(received), None)
                .unwrap();
            prop_assert_eq!(back.amount_calculated.unsigned_abs(), U256::from(amount));
        }
    }

    #[test]
    fn exact_output_of_the_received_amount_costs_the_input() {
        let pool = full_range_pool();
        for zero_for_one in [true, false] {
            for amount in [100u128, 1_000, 12_345, 1_000_000, 1_000_000_000] {
                let forward = pool.simulate_swap(zero_for_one, exact_in(amount), None).unwrap();
                let received = forward.amount_calculated.unsigned_abs();
                assert!(!received.is_zero());
                let back = pool.simulate_swap(zero_for_one, exact_out(received.to::<u128>()), None).unwrap();
                assert_eq!(back.amount_calculated, exact_in(amount));
            }
        }
    }
}
