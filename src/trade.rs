use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::{
    error::{Error, MathError, TradeError},
    fee::FeeAmount,
    fraction::Fraction,
    hash::FastSet,
    math::u256_num::{bigint_to_u256, u256_to_bigint},
    price::Price,
    route::Route,
    token::TokenAmount,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TradeType {
    ExactInput,
    ExactOutput,
}

/// One route of a trade with the amounts that flow through it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradeSwap {
    route: Route,
    input_amount: TokenAmount,
    output_amount: TokenAmount,
}

impl TradeSwap {
    pub fn new(route: Route, input_amount: TokenAmount, output_amount: TokenAmount) -> Self {
        Self {
            route,
            input_amount,
            output_amount,
        }
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn input_amount(&self) -> &TokenAmount {
        &self.input_amount
    }

    pub fn output_amount(&self) -> &TokenAmount {
        &self.output_amount
    }

    /// Simulates `amount` through every pool of `route`. `amount` is the
    /// input for exact input trades and the output for exact output trades.
    pub fn simulate(route: Route, amount: TokenAmount, trade_type: TradeType) -> Result<Self, Error> {
        match trade_type {
            TradeType::ExactInput => {
                if amount.token != *route.input() {
                    return Err(TradeError::Input.into());
                }
                let mut current = TokenAmount::new(route.input().clone(), amount.amount);
                for pool in route.pools() {
                    current = pool.get_output_amount(&current, None)?.0;
                }
                let output_amount = TokenAmount::new(route.output().clone(), current.amount);
                let input_amount = TokenAmount::new(route.input().clone(), amount.amount);
                Ok(Self::new(route, input_amount, output_amount))
            }
            TradeType::ExactOutput => {
                if amount.token != *route.output() {
                    return Err(TradeError::Output.into());
                }
                let mut current = TokenAmount::new(route.output().clone(), amount.amount);
                for pool in route.pools().iter().rev() {
                    current = pool.get_input_amount(&current, None)?.0;
                }
                let input_amount = TokenAmount::new(route.input().clone(), current.amount);
                let output_amount = TokenAmount::new(route.output().clone(), amount.amount);
                Ok(Self::new(route, input_amount, output_amount))
            }
        }
    }
}

/// A set of routes sharing one input and one output token, with its
/// aggregate amounts and prices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trade {
    swaps: Vec<TradeSwap>,
    trade_type: TradeType,
    input_amount: TokenAmount,
    output_amount: TokenAmount,
    execution_price: Price,
    price_impact: Fraction,
}

impl Trade {
    /// Simulates `amount` through `route`.
    pub fn from_route(route: Route, amount: TokenAmount, trade_type: TradeType) -> Result<Self, Error> {
        Self::new(vec![TradeSwap::simulate(route, amount, trade_type)?], trade_type)
    }

    /// Simulates each amount through its route.
    pub fn from_routes(
        routes: Vec<(Route, TokenAmount)>,
        trade_type: TradeType,
    ) -> Result<Self, Error> {
        let swaps = routes
            .into_iter()
            .map(|(route, amount)| TradeSwap::simulate(route, amount, trade_type))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(swaps, trade_type)
    }

    pub fn exact_in(route: Route, amount_in: TokenAmount) -> Result<Self, Error> {
        Self::from_route(route, amount_in, TradeType::ExactInput)
    }

    pub fn exact_out(route: Route, amount_out: TokenAmount) -> Result<Self, Error> {
        Self::from_route(route, amount_out, TradeType::ExactOutput)
    }

    /// Builds a trade from amounts simulated elsewhere, e.g. by a quoter
    /// contract, without touching the pools' ticks.
    pub fn create_unchecked(swap: TradeSwap, trade_type: TradeType) -> Result<Self, Error> {
        Self::new(vec![swap], trade_type)
    }

    pub fn create_unchecked_with_multiple_routes(
        swaps: Vec<TradeSwap>,
        trade_type: TradeType,
    ) -> Result<Self, Error> {
        Self::new(swaps, trade_type)
    }

    fn new(swaps: Vec<TradeSwap>, trade_type: TradeType) -> Result<Self, Error> {
        let first = swaps.first().ok_or(TradeError::Pools)?;
        let token_in = first.input_amount.token.clone();
        let token_out = first.output_amount.token.clone();

        if swaps.iter().any(|swap| *swap.route.input() != token_in) {
            return Err(TradeError::InputCurrencyMatch.into());
        }
        if swaps.iter().any(|swap| *swap.route.output() != token_out) {
            return Err(TradeError::OutputCurrencyMatch.into());
        }

        let num_pools: usize = swaps.iter().map(|swap| swap.route.pools().len()).sum();
        let unique: FastSet<(Address, Address, FeeAmount)> = swaps
            .iter()
            .flat_map(|swap| swap.route.pools().iter())
            .map(|pool| (pool.token0().address, pool.token1().address, pool.fee()))
            .collect();
        if unique.len() != num_pools {
            return Err(TradeError::PoolsDuplicated.into());
        }

        let input_amount = TokenAmount::new(
            token_in,
            checked_sum(swaps.iter().map(|swap| swap.input_amount.amount))?,
        );
        let output_amount = TokenAmount::new(
            token_out,
            checked_sum(swaps.iter().map(|swap| swap.output_amount.amount))?,
        );
        let execution_price = execution_price(&input_amount, &output_amount)?;
        let price_impact = price_impact(&swaps, &output_amount)?;

        trace!(
            ?trade_type,
            routes = swaps.len(),
            input = %input_amount.amount,
            output = %output_amount.amount,
            "trade created"
        );

        Ok(Self {
            swaps,
            trade_type,
            input_amount,
            output_amount,
            execution_price,
            price_impact,
        })
    }

    #[inline]
    pub fn swaps(&self) -> &[TradeSwap] {
        &self.swaps
    }

    #[inline]
    pub fn trade_type(&self) -> TradeType {
        self.trade_type
    }

    #[inline]
    pub fn input_amount(&self) -> &TokenAmount {
        &self.input_amount
    }

    #[inline]
    pub fn output_amount(&self) -> &TokenAmount {
        &self.output_amount
    }

    /// Output per unit of input, before slippage.
    #[inline]
    pub fn execution_price(&self) -> &Price {
        &self.execution_price
    }

    /// Fraction of the mid price output lost to moving the pools' prices.
    #[inline]
    pub fn price_impact(&self) -> &Fraction {
        &self.price_impact
    }

    /// The fewest output tokens the trade may return with
    /// `slippage_tolerance`. Unchanged for exact output trades.
    pub fn minimum_amount_out(&self, slippage_tolerance: &Fraction) -> Result<TokenAmount, Error> {
        check_tolerance(slippage_tolerance)?;
        match self.trade_type {
            TradeType::ExactOutput => Ok(self.output_amount.clone()),
            TradeType::ExactInput => {
                let adjusted = (Fraction::one() + slippage_tolerance).invert()?
                    * self.output_amount.as_fraction();
                Ok(TokenAmount::new(
                    self.output_amount.token.clone(),
                    bigint_to_u256(&adjusted.quotient())?,
                ))
            }
        }
    }

    /// The most input tokens the trade may spend with `slippage_tolerance`.
    /// Unchanged for exact input trades.
    pub fn maximum_amount_in(&self, slippage_tolerance: &Fraction) -> Result<TokenAmount, Error> {
        check_tolerance(slippage_tolerance)?;
        match self.trade_type {
            TradeType::ExactInput => Ok(self.input_amount.clone()),
            TradeType::ExactOutput => {
                let adjusted =
                    (Fraction::one() + slippage_tolerance) * self.input_amount.as_fraction();
                Ok(TokenAmount::new(
                    self.input_amount.token.clone(),
                    bigint_to_u256(&adjusted.quotient())?,
                ))
            }
        }
    }

    /// Execution price with both slippage bounds applied.
    pub fn worst_execution_price(&self, slippage_tolerance: &Fraction) -> Result<Price, Error> {
        let max_in = self.maximum_amount_in(slippage_tolerance)?;
        let min_out = self.minimum_amount_out(slippage_tolerance)?;
        Ok(Price::new(
            self.swaps[0].input_amount.token.clone(),
            self.swaps[0].output_amount.token.clone(),
            u256_to_bigint(max_in.amount),
            u256_to_bigint(min_out.amount),
        )?)
    }
}

pub(crate) fn check_tolerance(slippage_tolerance: &Fraction) -> Result<(), TradeError> {
    if slippage_tolerance.is_negative() {
        return Err(TradeError::SlippageTolerance);
    }
    Ok(())
}

fn checked_sum(mut amounts: impl Iterator<Item = U256>) -> Result<U256, MathError> {
    amounts.try_fold(U256::ZERO, |total, amount| {
        total.checked_add(amount).ok_or(MathError::Overflow)
    })
}

fn execution_price(input: &TokenAmount, output: &TokenAmount) -> Result<Price, Error> {
    Ok(Price::new(
        input.token.clone(),
        output.token.clone(),
        u256_to_bigint(input.amount),
        u256_to_bigint(output.amount),
    )?)
}

fn price_impact(swaps: &[TradeSwap], output: &TokenAmount) -> Result<Fraction, Error> {
    let mut spot_output = Fraction::zero();
    for swap in swaps {
        spot_output = spot_output + swap.route.mid_price().quote(&swap.input_amount)?;
    }
    Ok((&spot_output - &output.as_fraction()).checked_div(&spot_output)?)
}
