//! Immutable concentrated-liquidity pool snapshots.
//!
//! A [`Pool`] never changes after construction. Quoting a swap returns the
//! amount together with a new pool that shares the tick list of the old one.

mod address;
mod state;
mod swap;

pub use address::{compute_pool_address, FACTORY_ADDRESS, POOL_INIT_CODE_HASH};
pub use state::{InMemoryStateProvider, PoolState, PoolStateProvider};
pub use swap::SwapResult;

use std::sync::Arc;

use alloy_primitives::{Address, ChainId, I256, U256};

use crate::{
    error::{Error, MathError, PoolError},
    fee::FeeAmount,
    math::{
        tick_list::{self, Tick},
        tick_math::{get_sqrt_ratio_at_tick, MAX_SQRT_RATIO, MAX_TICK},
        u256_num::u256_to_bigint,
    },
    price::Price,
    token::{Token, TokenAmount},
    Q192,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pool {
    token0: Token,
    token1: Token,
    fee: FeeAmount,
    sqrt_price_x96: U256,
    liquidity: u128,
    tick_current: i32,
    ticks: Arc<[Tick]>,
    token0_price: Price,
    token1_price: Price,
}

impl Pool {
    /// Builds and validates a pool. The tokens may be given in any order.
    ///
    /// `sqrt_price_x96` must lie inside the price range of `tick_current`,
    /// and `ticks` must be a valid tick list for the fee's tick spacing.
    pub fn new(
        token_a: Token,
        token_b: Token,
        fee: FeeAmount,
        sqrt_price_x96: U256,
        liquidity: u128,
        tick_current: i32,
        ticks: Vec<Tick>,
    ) -> Result<Self, Error> {
        let (token0, token1) = if token_a.sorts_before(&token_b)? {
            (token_a, token_b)
        } else {
            (token_b, token_a)
        };

        let lower = get_sqrt_ratio_at_tick(tick_current)?;
        let upper = if tick_current >= MAX_TICK {
            MAX_SQRT_RATIO
        } else {
            get_sqrt_ratio_at_tick(tick_current + 1)?
        };
        if sqrt_price_x96 < lower || sqrt_price_x96 > upper {
            return Err(PoolError::PriceBounds.into());
        }

        tick_list::validate(&ticks, fee.tick_spacing())?;

        Self::from_validated(
            token0,
            token1,
            fee,
            sqrt_price_x96,
            liquidity,
            tick_current,
            ticks.into(),
        )
    }

    fn from_validated(
        token0: Token,
        token1: Token,
        fee: FeeAmount,
        sqrt_price_x96: U256,
        liquidity: u128,
        tick_current: i32,
        ticks: Arc<[Tick]>,
    ) -> Result<Self, Error> {
        let sqrt = u256_to_bigint(sqrt_price_x96);
        let ratio_x192 = &sqrt * &sqrt;
        let q192 = u256_to_bigint(Q192);
        let token0_price = Price::new(token0.clone(), token1.clone(), q192.clone(), ratio_x192.clone())?;
        let token1_price = Price::new(token1.clone(), token0.clone(), ratio_x192, q192)?;

        Ok(Self {
            token0,
            token1,
            fee,
            sqrt_price_x96,
            liquidity,
            tick_current,
            ticks,
            token0_price,
            token1_price,
        })
    }

    /// The snapshot this pool moves to after `result`. Ticks are shared.
    fn with_state(&self, result: &SwapResult) -> Result<Self, Error> {
        Self::from_validated(
            self.token0.clone(),
            self.token1.clone(),
            self.fee,
            result.sqrt_price_x96,
            result.liquidity,
            result.tick_current,
            Arc::clone(&self.ticks),
        )
    }

    #[inline]
    pub fn token0(&self) -> &Token {
        &self.token0
    }

    #[inline]
    pub fn token1(&self) -> &Token {
        &self.token1
    }

    #[inline]
    pub fn fee(&self) -> FeeAmount {
        self.fee
    }

    #[inline]
    pub fn sqrt_price_x96(&self) -> U256 {
        self.sqrt_price_x96
    }

    #[inline]
    pub fn liquidity(&self) -> u128 {
        self.liquidity
    }

    #[inline]
    pub fn tick_current(&self) -> i32 {
        self.tick_current
    }

    #[inline]
    pub fn ticks(&self) -> &[Tick] {
        &self.ticks
    }

    #[inline]
    pub fn tick_spacing(&self) -> i32 {
        self.fee.tick_spacing()
    }

    #[inline]
    pub fn chain_id(&self) -> ChainId {
        self.token0.chain_id
    }

    /// Price of token0 in token1.
    pub fn token0_price(&self) -> &Price {
        &self.token0_price
    }

    /// Price of token1 in token0.
    pub fn token1_price(&self) -> &Price {
        &self.token1_price
    }

    /// Deployment address of this pool under `factory`.
    pub fn address(&self, factory: Address) -> Result<Address, PoolError> {
        compute_pool_address(factory, &self.token0, &self.token1, self.fee, None)
    }

    pub fn involves_token(&self, token: &Token) -> bool {
        *token == self.token0 || *token == self.token1
    }

    /// Price of `token` in the pool's other token.
    pub fn price_of(&self, token: &Token) -> Result<&Price, PoolError> {
        if *token == self.token0 {
            Ok(&self.token0_price)
        } else if *token == self.token1 {
            Ok(&self.token1_price)
        } else {
            Err(PoolError::Token)
        }
    }

    /// The token received for `token`.
    pub fn other_token(&self, token: &Token) -> Result<&Token, PoolError> {
        if *token == self.token0 {
            Ok(&self.token1)
        } else if *token == self.token1 {
            Ok(&self.token0)
        } else {
            Err(PoolError::Token)
        }
    }

    /// The serializable state of this snapshot.
    pub fn state(&self) -> PoolState {
        PoolState {
            sqrt_price_x96: self.sqrt_price_x96,
            liquidity: self.liquidity,
            tick_current: self.tick_current,
            ticks: self.ticks.to_vec(),
        }
    }

    /// Amount of the other token received for `input`, and the pool after
    /// the swap.
    pub fn get_output_amount(
        &self,
        input: &TokenAmount,
        sqrt_price_limit_x96: Option<U256>,
    ) -> Result<(TokenAmount, Pool), Error> {
        if !self.involves_token(&input.token) {
            return Err(PoolError::Token.into());
        }
        let zero_for_one = input.token == self.token0;

        let result =
            self.simulate_swap(zero_for_one, to_signed(input.amount)?, sqrt_price_limit_x96)?;

        let output_token = if zero_for_one { &self.token1 } else { &self.token0 };
        let output = TokenAmount::new(
            output_token.clone(),
            result.amount_calculated.unsigned_abs(),
        );
        Ok((output, self.with_state(&result)?))
    }

    /// Amount of the other token needed to receive `output`, and the pool
    /// after the swap.
    pub fn get_input_amount(
        &self,
        output: &TokenAmount,
        sqrt_price_limit_x96: Option<U256>,
    ) -> Result<(TokenAmount, Pool), Error> {
        if !self.involves_token(&output.token) {
            return Err(PoolError::Token.into());
        }
        let zero_for_one = output.token == self.token1;

        let result =
            self.simulate_swap(zero_for_one, -to_signed(output.amount)?, sqrt_price_limit_x96)?;

        let input_token = if zero_for_one { &self.token0 } else { &self.token1 };
        let input = TokenAmount::new(input_token.clone(), result.amount_calculated.unsigned_abs());
        Ok((input, self.with_state(&result)?))
    }
}

fn to_signed(amount: U256) -> Result<I256, MathError> {
    if amount.bit(255) {
        return Err(MathError::Overflow);
    }
    Ok(I256::from_raw(amount))
}
