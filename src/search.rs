//! Best-trade search over a set of pools.
//!
//! Routes are linear: a search never splits the amount over several routes.
//! A route uses each pool at most once, but distinct routes may share pools.

use std::{cmp::Ordering, sync::Arc};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    error::{Error, TradeError},
    pool::Pool,
    route::Route,
    token::{Token, TokenAmount},
    trade::Trade,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BestTradeOptions {
    /// How many trades to return.
    pub max_num_results: usize,
    /// The most pools a route may go through.
    pub max_hops: usize,
}

impl Default for BestTradeOptions {
    fn default() -> Self {
        Self {
            max_num_results: 3,
            max_hops: 3,
        }
    }
}

/// Pending search state of one branch.
struct Frame {
    /// Pools not yet used along this branch.
    candidates: Arc<[Pool]>,
    /// Pools of the branch in swap order.
    path: Vec<Pool>,
    /// Amount at the open end of the path.
    amount: TokenAmount,
    hops_left: usize,
}

/// The best `max_num_results` trades that spend exactly `amount_in` for
/// `token_out`, best first.
pub fn best_trade_exact_in(
    pools: &[Pool],
    amount_in: &TokenAmount,
    token_out: &Token,
    options: BestTradeOptions,
) -> Result<Vec<Trade>, Error> {
    check_inputs(pools, &options)?;
    debug!(pools = pools.len(), ?options, "searching exact input trades");

    let mut best = Vec::with_capacity(options.max_num_results);
    let mut stack = vec![Frame {
        candidates: Arc::from(pools),
        path: Vec::new(),
        amount: amount_in.clone(),
        hops_left: options.max_hops,
    }];

    while let Some(frame) = stack.pop() {
        let mut children = Vec::new();

        for (i, pool) in frame.candidates.iter().enumerate() {
            if !pool.involves_token(&frame.amount.token) {
                continue;
            }
            let (amount_out, _) = pool.get_output_amount(&frame.amount, None)?;

            let mut path = frame.path.clone();
            path.push(pool.clone());

            if amount_out.token == *token_out {
                let route = Route::new(path, amount_in.token.clone(), token_out.clone())?;
                let trade = Trade::exact_in(route, amount_in.clone())?;
                debug!(
                    hops = trade.swaps()[0].route().pools().len(),
                    output = %trade.output_amount().amount,
                    "candidate trade"
                );
                insert_ranked(&mut best, trade, options.max_num_results)?;
            } else if frame.hops_left > 1 && frame.candidates.len() > 1 {
                children.push(Frame {
                    candidates: without(&frame.candidates, i),
                    path,
                    amount: amount_out,
                    hops_left: frame.hops_left - 1,
                });
            }
        }

        // first child on top, so branches are explored in pool order
        stack.extend(children.into_iter().rev());
    }

    debug!(results = best.len(), "exact input search done");
    Ok(best)
}

/// The best `max_num_results` trades that receive exactly `amount_out` for
/// `token_in`, best first.
pub fn best_trade_exact_out(
    pools: &[Pool],
    token_in: &Token,
    amount_out: &TokenAmount,
    options: BestTradeOptions,
) -> Result<Vec<Trade>, Error> {
    check_inputs(pools, &options)?;
    debug!(pools = pools.len(), ?options, "searching exact output trades");

    let mut best = Vec::with_capacity(options.max_num_results);
    let mut stack = vec![Frame {
        candidates: Arc::from(pools),
        path: Vec::new(),
        amount: amount_out.clone(),
        hops_left: options.max_hops,
    }];

    while let Some(frame) = stack.pop() {
        let mut children = Vec::new();

        for (i, pool) in frame.candidates.iter().enumerate() {
            if !pool.involves_token(&frame.amount.token) {
                continue;
            }
            let (amount_in, next_pool) = pool.get_input_amount(&frame.amount, None)?;
            // the swap drained the pool's active range
            if next_pool.liquidity() == 0 {
                continue;
            }

            let mut path = Vec::with_capacity(frame.path.len() + 1);
            path.push(pool.clone());
            path.extend(frame.path.iter().cloned());

            if amount_in.token == *token_in {
                let route = Route::new(path, token_in.clone(), amount_out.token.clone())?;
                let trade = Trade::exact_out(route, amount_out.clone())?;
                debug!(
                    hops = trade.swaps()[0].route().pools().len(),
                    input = %trade.input_amount().amount,
                    "candidate trade"
                );
                insert_ranked(&mut best, trade, options.max_num_results)?;
            } else if frame.hops_left > 1 && frame.candidates.len() > 1 {
                children.push(Frame {
                    candidates: without(&frame.candidates, i),
                    path,
                    amount: amount_in,
                    hops_left: frame.hops_left - 1,
                });
            }
        }

        stack.extend(children.into_iter().rev());
    }

    debug!(results = best.len(), "exact output search done");
    Ok(best)
}

/// Orders trades best first: more output, then less input, then fewer
/// tokens along the routes.
pub fn trade_comparator(a: &Trade, b: &Trade) -> Result<Ordering, Error> {
    if a.input_amount().token != b.input_amount().token {
        return Err(TradeError::InputCurrency.into());
    }
    if a.output_amount().token != b.output_amount().token {
        return Err(TradeError::OutputCurrency.into());
    }

    let ordering = b
        .output_amount()
        .amount
        .cmp(&a.output_amount().amount)
        .then_with(|| a.input_amount().amount.cmp(&b.input_amount().amount))
        .then_with(|| path_tokens(a).cmp(&path_tokens(b)));
    Ok(ordering)
}

fn path_tokens(trade: &Trade) -> usize {
    trade.swaps().iter().map(|swap| swap.route().path().len()).sum()
}

fn check_inputs(pools: &[Pool], options: &BestTradeOptions) -> Result<(), TradeError> {
    if pools.is_empty() {
        return Err(TradeError::Pools);
    }
    if options.max_hops == 0 {
        return Err(TradeError::MaxHops);
    }
    Ok(())
}

fn without(pools: &[Pool], index: usize) -> Arc<[Pool]> {
    pools[..index]
        .iter()
        .chain(&pools[index + 1..])
        .cloned()
        .collect()
}

/// Inserts `trade` after every trade that ranks at least as well, keeping
/// at most `max` trades.
fn insert_ranked(best: &mut Vec<Trade>, trade: Trade, max: usize) -> Result<(), Error> {
    let mut index = best.len();
    for (i, existing) in best.iter().enumerate() {
        if trade_comparator(&trade, existing)? == Ordering::Less {
            index = i;
            break;
        }
    }
    if index < max {
        best.insert(index, trade);
        best.truncate(max);
    }
    Ok(())
}
