//! Liquidity positions over a tick range of a pool.
//!
//! A [`Position`] holds liquidity between two initialised-tick boundaries.
//! Token amounts follow protocol rounding: minting rounds what the owner
//! pays up, burning rounds what the owner receives down.

use alloy_primitives::{I256, U256};
use num_traits::ToPrimitive;

use crate::{
    error::{Error, MathError, PositionError},
    fraction::Fraction,
    math::{
        liquidity_math::max_liquidity_for_amounts,
        sqrt_price_math::{signed_amount_0_delta, signed_amount_1_delta},
        tick_math::{
            get_sqrt_ratio_at_tick, get_tick_at_sqrt_ratio, MAX_SQRT_RATIO, MAX_TICK,
            MIN_SQRT_RATIO, MIN_TICK,
        },
        u256_num::biguint_to_u256,
    },
    pool::Pool,
    price::{tick_to_price, Price},
    token::TokenAmount,
    trade::check_tolerance,
};

/// Token amounts paid to mint, or received from burning, some liquidity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MintAmounts {
    pub amount0: U256,
    pub amount1: U256,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    pool: Pool,
    tick_lower: i32,
    tick_upper: i32,
    liquidity: u128,
}

/// A pool price that only exists to evaluate amounts at a slipped price.
#[derive(Debug, Clone, Copy)]
struct PricePoint {
    sqrt_price_x96: U256,
    tick: i32,
}

impl PricePoint {
    fn at(sqrt_price_x96: U256) -> Result<Self, Error> {
        Ok(Self {
            sqrt_price_x96,
            tick: get_tick_at_sqrt_ratio(sqrt_price_x96)?,
        })
    }
}

fn validate_range(pool: &Pool, tick_lower: i32, tick_upper: i32) -> Result<(), PositionError> {
    let spacing = pool.tick_spacing();
    if tick_lower >= tick_upper {
        return Err(PositionError::TickOrder {
            lower: tick_lower,
            upper: tick_upper,
        });
    }
    if tick_lower < MIN_TICK || tick_lower % spacing != 0 {
        return Err(PositionError::TickLower(tick_lower));
    }
    if tick_upper > MAX_TICK || tick_upper % spacing != 0 {
        return Err(PositionError::TickUpper(tick_upper));
    }
    Ok(())
}

fn to_delta(liquidity: u128) -> Result<i128, MathError> {
    i128::try_from(liquidity).map_err(|_| MathError::Overflow)
}

impl Position {
    /// Fails with `TICK_ORDER`, `TICK_LOWER` or `TICK_UPPER` for an invalid
    /// range, and with `OVERFLOW` for liquidity that no signed delta can
    /// carry.
    pub fn new(pool: Pool, tick_lower: i32, tick_upper: i32, liquidity: u128) -> Result<Self, Error> {
        validate_range(&pool, tick_lower, tick_upper)?;
        to_delta(liquidity)?;
        Ok(Self {
            pool,
            tick_lower,
            tick_upper,
            liquidity,
        })
    }

    /// The largest position `amount0` and `amount1` can mint at the pool's
    /// current price.
    ///
    /// With `use_full_precision` unset the liquidity matches what the
    /// periphery router computes, which may be slightly below what the pool
    /// itself accepts.
    pub fn from_amounts(
        pool: Pool,
        tick_lower: i32,
        tick_upper: i32,
        amount0: U256,
        amount1: U256,
        use_full_precision: bool,
    ) -> Result<Self, Error> {
        validate_range(&pool, tick_lower, tick_upper)?;
        let liquidity = max_liquidity_for_amounts(
            pool.sqrt_price_x96(),
            get_sqrt_ratio_at_tick(tick_lower)?,
            get_sqrt_ratio_at_tick(tick_upper)?,
            amount0,
            amount1,
            use_full_precision,
        )?;
        let liquidity = liquidity.to_u128().ok_or(MathError::Overflow)?;
        Self::new(pool, tick_lower, tick_upper, liquidity)
    }

    /// [`Position::from_amounts`] with an unlimited amount of token1.
    pub fn from_amount0(
        pool: Pool,
        tick_lower: i32,
        tick_upper: i32,
        amount0: U256,
        use_full_precision: bool,
    ) -> Result<Self, Error> {
        Self::from_amounts(pool, tick_lower, tick_upper, amount0, U256::MAX, use_full_precision)
    }

    /// [`Position::from_amounts`] with an unlimited amount of token0. Token1
    /// liquidity has no imprecise form, so full precision is always used.
    pub fn from_amount1(pool: Pool, tick_lower: i32, tick_upper: i32, amount1: U256) -> Result<Self, Error> {
        Self::from_amounts(pool, tick_lower, tick_upper, U256::MAX, amount1, true)
    }

    #[inline]
    pub fn pool(&self) -> &Pool {
        &self.pool
    }

    #[inline]
    pub fn tick_lower(&self) -> i32 {
        self.tick_lower
    }

    #[inline]
    pub fn tick_upper(&self) -> i32 {
        self.tick_upper
    }

    #[inline]
    pub fn liquidity(&self) -> u128 {
        self.liquidity
    }

    /// Price of token0 at the lower tick.
    pub fn token0_price_lower(&self) -> Result<Price, Error> {
        tick_to_price(self.pool.token0(), self.pool.token1(), self.tick_lower)
    }

    /// Price of token0 at the upper tick.
    pub fn token0_price_upper(&self) -> Result<Price, Error> {
        tick_to_price(self.pool.token0(), self.pool.token1(), self.tick_upper)
    }

    fn current(&self) -> PricePoint {
        PricePoint {
            sqrt_price_x96: self.pool.sqrt_price_x96(),
            tick: self.pool.tick_current(),
        }
    }

    /// Signed token amounts for changing this range's liquidity by
    /// `liquidity_delta` with the pool at `point`.
    fn amounts_at(&self, point: PricePoint, liquidity_delta: i128) -> Result<(I256, I256), Error> {
        let sqrt_lower = get_sqrt_ratio_at_tick(self.tick_lower)?;
        let sqrt_upper = get_sqrt_ratio_at_tick(self.tick_upper)?;

        if point.tick < self.tick_lower {
            let amount0 = signed_amount_0_delta(sqrt_lower, sqrt_upper, liquidity_delta)?;
            Ok((amount0, I256::ZERO))
        } else if point.tick < self.tick_upper {
            let amount0 = signed_amount_0_delta(point.sqrt_price_x96, sqrt_upper, liquidity_delta)?;
            let amount1 = signed_amount_1_delta(sqrt_lower, point.sqrt_price_x96, liquidity_delta)?;
            Ok((amount0, amount1))
        } else {
            let amount1 = signed_amount_1_delta(sqrt_lower, sqrt_upper, liquidity_delta)?;
            Ok((I256::ZERO, amount1))
        }
    }

    fn mint_at(&self, point: PricePoint) -> Result<MintAmounts, Error> {
        let (amount0, amount1) = self.amounts_at(point, to_delta(self.liquidity)?)?;
        Ok(MintAmounts {
            amount0: amount0.into_raw(),
            amount1: amount1.into_raw(),
        })
    }

    fn burn_at(&self, point: PricePoint) -> Result<MintAmounts, Error> {
        let (amount0, amount1) = self.amounts_at(point, -to_delta(self.liquidity)?)?;
        Ok(MintAmounts {
            amount0: amount0.unsigned_abs(),
            amount1: amount1.unsigned_abs(),
        })
    }

    /// Token0 this position's liquidity burns for at the current price.
    pub fn amount0(&self) -> Result<TokenAmount, Error> {
        let burned = self.burn_at(self.current())?;
        Ok(TokenAmount::new(self.pool.token0().clone(), burned.amount0))
    }

    /// Token1 this position's liquidity burns for at the current price.
    pub fn amount1(&self) -> Result<TokenAmount, Error> {
        let burned = self.burn_at(self.current())?;
        Ok(TokenAmount::new(self.pool.token1().clone(), burned.amount1))
    }

    /// Minimum amounts to send to mint this position's liquidity at the
    /// current price.
    pub fn mint_amounts(&self) -> Result<MintAmounts, Error> {
        self.mint_at(self.current())
    }

    /// Prices the pool may reach when its token0 price slips up or down by
    /// `slippage_tolerance`, kept strictly inside the sqrt ratio bounds.
    fn ratios_after_slippage(&self, slippage_tolerance: &Fraction) -> Result<(PricePoint, PricePoint), Error> {
        check_tolerance(slippage_tolerance)?;
        let one = Fraction::one();
        let price = self.pool.token0_price().raw();
        let lower = price * &(&one - slippage_tolerance);
        let upper = price * &(slippage_tolerance + &one);

        let sqrt_lower = match sqrt_ratio_of(&lower) {
            Some(sqrt) if sqrt > MIN_SQRT_RATIO => sqrt,
            _ => MIN_SQRT_RATIO + U256::ONE,
        };
        let sqrt_upper = match sqrt_ratio_of(&upper) {
            Some(sqrt) if sqrt < MAX_SQRT_RATIO => sqrt,
            _ => MAX_SQRT_RATIO - U256::ONE,
        };
        Ok((PricePoint::at(sqrt_lower)?, PricePoint::at(sqrt_upper)?))
    }

    /// Minimum amounts to send so the mint succeeds while the price stays
    /// within `slippage_tolerance` of the current one.
    ///
    /// The liquidity is the one the router will compute from
    /// [`Position::mint_amounts`]. Token0 is cheapest at the upper price and
    /// token1 at the lower price.
    pub fn mint_amounts_with_slippage(&self, slippage_tolerance: &Fraction) -> Result<MintAmounts, Error> {
        let (lower, upper) = self.ratios_after_slippage(slippage_tolerance)?;
        let mint = self.mint_amounts()?;
        let planned = Position::from_amounts(
            self.pool.clone(),
            self.tick_lower,
            self.tick_upper,
            mint.amount0,
            mint.amount1,
            false,
        )?;
        Ok(MintAmounts {
            amount0: planned.mint_at(upper)?.amount0,
            amount1: planned.mint_at(lower)?.amount1,
        })
    }

    /// Minimum amounts to request when burning the whole position while
    /// the price stays within `slippage_tolerance` of the current one.
    pub fn burn_amounts_with_slippage(&self, slippage_tolerance: &Fraction) -> Result<MintAmounts, Error> {
        let (lower, upper) = self.ratios_after_slippage(slippage_tolerance)?;
        Ok(MintAmounts {
            amount0: self.burn_at(upper)?.amount0,
            amount1: self.burn_at(lower)?.amount1,
        })
    }
}

/// `isqrt(price << 192)`, or `None` for a negative price or one past 256 bits.
fn sqrt_ratio_of(price: &Fraction) -> Option<U256> {
    let numerator = price.numerator().to_biguint()?;
    let denominator = price.denominator().to_biguint()?;
    biguint_to_u256(&((numerator << 192u32) / denominator).sqrt()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::TradeError,
        fee::FeeAmount,
        math::tick_math::{encode_sqrt_ratio_x96, nearest_usable_tick},
        pool::tests::{dai, usdc},
    };

    const SPACING: i32 = 10;
    const ONE_ETHER: u128 = 1_000_000_000_000_000_000;

    fn pool_at(sqrt_price_x96: U256, tick: i32) -> Pool {
        Pool::new(dai(), usdc(), FeeAmount::Low, sqrt_price_x96, 0, tick, vec![]).unwrap()
    }

    /// DAI/USDC at one dollar. DAI is token0.
    fn dai_usdc() -> Pool {
        let sqrt = encode_sqrt_ratio_x96(U256::from(100_000_000u64), U256::from(100 * ONE_ETHER)).unwrap();
        pool_at(sqrt, get_tick_at_sqrt_ratio(sqrt).unwrap())
    }

    fn usable() -> i32 {
        nearest_usable_tick(dai_usdc().tick_current(), SPACING).unwrap()
    }

    fn position(lower: i32, upper: i32, liquidity: u128) -> Position {
        Position::new(dai_usdc(), usable() + lower, usable() + upper, liquidity).unwrap()
    }

    fn above() -> Position {
        position(SPACING, 2 * SPACING, 100 * ONE_ETHER)
    }

    fn below() -> Position {
        position(-2 * SPACING, -SPACING, 100 * ONE_ETHER)
    }

    fn in_range() -> Position {
        position(-2 * SPACING, 2 * SPACING, 100 * ONE_ETHER)
    }

    fn amounts(amount0: u128, amount1: u128) -> MintAmounts {
        MintAmounts {
            amount0: U256::from(amount0),
            amount1: U256::from(amount1),
        }
    }

    fn tolerance(numerator: u64, denominator: u64) -> Fraction {
        Fraction::new(numerator, denominator).unwrap()
    }

    #[test]
    fn accepts_aligned_ranges() {
        assert!(Position::new(dai_usdc(), -10, 10, ONE_ETHER).is_ok());
        let min = nearest_usable_tick(MIN_TICK, SPACING).unwrap();
        let max = nearest_usable_tick(MAX_TICK, SPACING).unwrap();
        let full = Position::new(dai_usdc(), min, max, ONE_ETHER).unwrap();
        assert_eq!((full.tick_lower(), full.tick_upper()), (min, max));
    }

    #[test]
    fn rejects_inverted_or_empty_ranges() {
        for (lower, upper) in [(10, -10), (-10, -10)] {
            let err = Position::new(dai_usdc(), lower, upper, ONE_ETHER).unwrap_err();
            assert_eq!(err, Error::from(PositionError::TickOrder { lower, upper }));
        }
    }

    #[test]
    fn rejects_bad_lower_ticks() {
        let below_min = nearest_usable_tick(MIN_TICK, SPACING).unwrap() - SPACING;
        for lower in [-5, below_min] {
            let err = Position::new(dai_usdc(), lower, 10, ONE_ETHER).unwrap_err();
            assert_eq!(err.code(), "TICK_LOWER");
        }
    }

    #[test]
    fn rejects_bad_upper_ticks() {
        let above_max = nearest_usable_tick(MAX_TICK, SPACING).unwrap() + SPACING;
        for upper in [15, above_max] {
            let err = Position::new(dai_usdc(), -10, upper, ONE_ETHER).unwrap_err();
            assert_eq!(err.code(), "TICK_UPPER");
        }
    }

    #[test]
    fn rejects_liquidity_past_a_signed_delta() {
        let err = Position::new(dai_usdc(), -10, 10, u128::MAX).unwrap_err();
        assert_eq!(err, Error::from(MathError::Overflow));
    }

    #[test]
    fn token0_burn_amounts() {
        let small = position(SPACING, 2 * SPACING, 100_000_000_000_000);
        assert_eq!(small.amount0().unwrap().amount, U256::from(49949961958869841u128));
        assert_eq!(below().amount0().unwrap().amount, U256::ZERO);
        assert_eq!(in_range().amount0().unwrap().amount, U256::from(120054069145287995769396u128));
        assert_eq!(in_range().amount0().unwrap().token, dai());
    }

    #[test]
    fn token1_burn_amounts() {
        assert_eq!(above().amount1().unwrap().amount, U256::ZERO);
        assert_eq!(below().amount1().unwrap().amount, U256::from(49970077052u64));
        assert_eq!(in_range().amount1().unwrap().amount, U256::from(79831926242u64));
        assert_eq!(in_range().amount1().unwrap().token, usdc());
    }

    #[test]
    fn mint_amounts_round_up() {
        assert_eq!(above().mint_amounts().unwrap(), amounts(49949961958869841754182, 0));
        assert_eq!(below().mint_amounts().unwrap(), amounts(0, 49970077053));
        assert_eq!(
            in_range().mint_amounts().unwrap(),
            amounts(120054069145287995769397, 79831926243)
        );
    }

    #[test]
    fn mint_amounts_without_slippage() {
        let zero = Fraction::zero();
        assert_eq!(
            above().mint_amounts_with_slippage(&zero).unwrap(),
            amounts(49949961958869841738198, 0)
        );
        assert_eq!(below().mint_amounts_with_slippage(&zero).unwrap(), amounts(0, 49970077053));
        assert_eq!(
            in_range().mint_amounts_with_slippage(&zero).unwrap(),
            amounts(120054069145287995740584, 79831926243)
        );
    }

    #[test]
    fn mint_amounts_with_five_basis_points_of_slippage() {
        assert_eq!(
            in_range().mint_amounts_with_slippage(&tolerance(5, 10_000)).unwrap(),
            amounts(95063440240746211432007, 54828800461)
        );
    }

    #[test]
    fn burn_amounts_without_slippage() {
        let zero = Fraction::zero();
        assert_eq!(
            above().burn_amounts_with_slippage(&zero).unwrap(),
            amounts(49949961958869841754181, 0)
        );
        assert_eq!(below().burn_amounts_with_slippage(&zero).unwrap(), amounts(0, 49970077052));
        assert_eq!(
            in_range().burn_amounts_with_slippage(&zero).unwrap(),
            amounts(120054069145287995769396, 79831926242)
        );
    }

    #[test]
    fn burn_amounts_with_five_basis_points_of_slippage() {
        assert_eq!(
            in_range().burn_amounts_with_slippage(&tolerance(5, 10_000)).unwrap(),
            amounts(95063440240746211454822, 54828800460)
        );
    }

    #[test]
    fn slipped_prices_stay_inside_the_ratio_bounds() {
        let (lower, upper) = (usable() + SPACING, usable() + 2 * SPACING);
        let at_min = Position::new(pool_at(MIN_SQRT_RATIO, MIN_TICK), lower, upper, 100 * ONE_ETHER).unwrap();
        let at_max = Position::new(
            pool_at(MAX_SQRT_RATIO - U256::ONE, MAX_TICK - 1),
            lower,
            upper,
            100 * ONE_ETHER,
        )
        .unwrap();
        let five_percent = tolerance(5, 100);

        assert_eq!(
            at_min.mint_amounts_with_slippage(&five_percent).unwrap(),
            amounts(49949961958869841738198, 0)
        );
        assert_eq!(
            at_max.mint_amounts_with_slippage(&five_percent).unwrap(),
            amounts(0, 50045084660)
        );
        assert_eq!(
            at_min.burn_amounts_with_slippage(&five_percent).unwrap(),
            amounts(49949961958869841754181, 0)
        );
        assert_eq!(
            at_max.burn_amounts_with_slippage(&five_percent).unwrap(),
            amounts(0, 50045084659)
        );
    }

    #[test]
    fn negative_slippage_is_rejected() {
        let negative = Fraction::new(-1, 100).unwrap();
        let err = in_range().mint_amounts_with_slippage(&negative).unwrap_err();
        assert_eq!(err, Error::from(TradeError::SlippageTolerance));
    }

    #[test]
    fn from_amounts_rebuilds_the_minted_liquidity() {
        let minted = in_range().mint_amounts().unwrap();
        let rebuilt = Position::from_amounts(
            dai_usdc(),
            in_range().tick_lower(),
            in_range().tick_upper(),
            minted.amount0,
            minted.amount1,
            true,
        )
        .unwrap();
        assert!(rebuilt.liquidity().abs_diff(in_range().liquidity()) < 1_000_000);
    }

    #[test]
    fn one_sided_constructors() {
        let (lower, upper) = (above().tick_lower(), above().tick_upper());
        let amount0 = above().mint_amounts().unwrap().amount0;
        let from0 = Position::from_amount0(dai_usdc(), lower, upper, amount0, true).unwrap();
        assert!(from0.liquidity().abs_diff(100 * ONE_ETHER) < 1_000_000);
        assert_eq!(from0.amount1().unwrap().amount, U256::ZERO);

        let (lower, upper) = (below().tick_lower(), below().tick_upper());
        let amount1 = below().mint_amounts().unwrap().amount1;
        let from1 = Position::from_amount1(dai_usdc(), lower, upper, amount1).unwrap();
        assert!(from1.liquidity().abs_diff(100 * ONE_ETHER) < 1_000_000);
        assert_eq!(from1.amount0().unwrap().amount, U256::ZERO);
    }

    #[test]
    fn range_prices() {
        let position = in_range();
        let (lower, upper) = (position.token0_price_lower().unwrap(), position.token0_price_upper().unwrap());
        assert!(lower.raw() < upper.raw());
        assert_eq!(lower.base_token, dai());
    }
}
