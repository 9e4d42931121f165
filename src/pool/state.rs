use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, PoolError},
    fee::FeeAmount,
    hash::FastMap,
    math::tick_list::Tick,
    pool::Pool,
    token::Token,
};

/// Mutable chain state of a pool, as read from the pool contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolState {
    pub sqrt_price_x96: U256,
    pub liquidity: u128,
    pub tick_current: i32,
    #[serde(default)]
    pub ticks: Vec<Tick>,
}

/// Source of pool state for a pool identity. `token0` always sorts before
/// `token1`.
///
/// Implementations that talk to a node do their I/O before returning; the
/// pool math never waits on a provider.
pub trait PoolStateProvider {
    fn pool_state(
        &self,
        token0: &Token,
        token1: &Token,
        fee: FeeAmount,
    ) -> Result<PoolState, PoolError>;
}

type PoolKey = (Address, Address, FeeAmount);

/// A provider backed by a map of previously captured states.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStateProvider {
    states: FastMap<PoolKey, PoolState>,
}

impl InMemoryStateProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `state` for the pool of `token_a` and `token_b`, in any order.
    pub fn insert(
        &mut self,
        token_a: &Token,
        token_b: &Token,
        fee: FeeAmount,
        state: PoolState,
    ) -> Result<Option<PoolState>, PoolError> {
        let key = if token_a.sorts_before(token_b)? {
            (token_a.address, token_b.address, fee)
        } else {
            (token_b.address, token_a.address, fee)
        };
        Ok(self.states.insert(key, state))
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

impl PoolStateProvider for InMemoryStateProvider {
    fn pool_state(
        &self,
        token0: &Token,
        token1: &Token,
        fee: FeeAmount,
    ) -> Result<PoolState, PoolError> {
        self.states
            .get(&(token0.address, token1.address, fee))
            .cloned()
            .ok_or_else(|| {
                PoolError::Provider(format!(
                    "no state for pool {}/{} with fee {}",
                    token0.address,
                    token1.address,
                    fee.pips()
                ))
            })
    }
}

impl Pool {
    /// Builds a pool from the state `provider` reports for it. The state goes
    /// through the same validation as [`Pool::new`].
    pub fn from_provider<P: PoolStateProvider + ?Sized>(
        provider: &P,
        token_a: Token,
        token_b: Token,
        fee: FeeAmount,
    ) -> Result<Pool, Error> {
        let (token0, token1) = if token_a.sorts_before(&token_b)? {
            (token_a, token_b)
        } else {
            (token_b, token_a)
        };
        let state = provider.pool_state(&token0, &token1, fee)?;
        Pool::new(
            token0,
            token1,
            fee,
            state.sqrt_price_x96,
            state.liquidity,
            state.tick_current,
            state.ticks,
        )
    }
}
