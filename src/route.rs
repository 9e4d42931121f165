use alloy_primitives::ChainId;

use crate::{
    error::{Error, TradeError},
    pool::Pool,
    price::Price,
    token::Token,
};

/// An ordered chain of pools from `input` to `output`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pools: Vec<Pool>,
    path: Vec<Token>,
    input: Token,
    output: Token,
    mid_price: Price,
}

impl Route {
    pub fn new(pools: Vec<Pool>, input: Token, output: Token) -> Result<Self, Error> {
        let (first, last) = match (pools.first(), pools.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return Err(TradeError::Pools.into()),
        };

        let chain_id = first.chain_id();
        if pools.iter().any(|pool| pool.chain_id() != chain_id) {
            return Err(TradeError::ChainIds.into());
        }
        if !first.involves_token(&input) {
            return Err(TradeError::Input.into());
        }
        if !last.involves_token(&output) {
            return Err(TradeError::Output.into());
        }

        let mut path = Vec::with_capacity(pools.len() + 1);
        path.push(input.clone());
        for pool in &pools {
            let current = &path[path.len() - 1];
            let next = pool.other_token(current).map_err(|_| TradeError::Path)?.clone();
            path.push(next);
        }
        if path[path.len() - 1] != output {
            return Err(TradeError::Path.into());
        }

        let mid_price = compute_mid_price(&pools, &input, &output)?;

        Ok(Self {
            pools,
            path,
            input,
            output,
            mid_price,
        })
    }

    pub fn pools(&self) -> &[Pool] {
        &self.pools
    }

    /// Every token visited, starting with `input`.
    pub fn path(&self) -> &[Token] {
        &self.path
    }

    pub fn input(&self) -> &Token {
        &self.input
    }

    pub fn output(&self) -> &Token {
        &self.output
    }

    /// Product of the pools' spot prices along the path.
    pub fn mid_price(&self) -> &Price {
        &self.mid_price
    }

    pub fn chain_id(&self) -> ChainId {
        self.pools
            .first()
            .map_or(self.input.chain_id, Pool::chain_id)
    }
}

fn compute_mid_price(pools: &[Pool], input: &Token, output: &Token) -> Result<Price, Error> {
    let mut next_input = input;
    let mut price: Option<Price> = None;

    for pool in pools {
        let (step, next) = if *next_input == *pool.token0() {
            (pool.token0_price(), pool.token1())
        } else {
            (pool.token1_price(), pool.token0())
        };
        price = Some(match price {
            None => step.clone(),
            Some(acc) => acc.mul(step)?,
        });
        next_input = next;
    }

    let price = price.ok_or(TradeError::Pools)?;
    Ok(Price::from_fraction(
        input.clone(),
        output.clone(),
        price.raw().clone(),
    ))
}
