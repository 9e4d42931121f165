//! Queries over a pool's sorted list of initialized ticks.
//!
//! The list stands in for the on-chain tick bitmap: lookups never report a
//! tick outside the 256-tick word that contains the start tick, so a swap
//! walks word boundaries exactly like the contract does.

use alloy_primitives::{I256, U256};
use serde::{Deserialize, Serialize};

use crate::error::TickError;

/// An initialized tick and the liquidity that changes when it is crossed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tick {
    pub index: i32,
    /// Liquidity added when the tick is crossed left to right.
    pub liquidity_net: i128,
    pub liquidity_gross: u128,
}

impl Tick {
    pub const fn new(index: i32, liquidity_net: i128, liquidity_gross: u128) -> Self {
        Self {
            index,
            liquidity_net,
            liquidity_gross,
        }
    }
}

fn to_i256(value: i128) -> I256 {
    let magnitude = I256::from_raw(U256::from(value.unsigned_abs()));
    if value < 0 {
        -magnitude
    } else {
        magnitude
    }
}

/// Checks that `ticks` is a valid tick list for `tick_spacing`.
pub fn validate(ticks: &[Tick], tick_spacing: i32) -> Result<(), TickError> {
    if tick_spacing <= 0 {
        return Err(TickError::TickSpacingNonzero);
    }

    if ticks.iter().any(|tick| tick.index % tick_spacing != 0) {
        return Err(TickError::TickSpacing);
    }

    let net = ticks
        .iter()
        .fold(I256::ZERO, |acc, tick| acc + to_i256(tick.liquidity_net));
    if !net.is_zero() {
        return Err(TickError::ZeroNet);
    }

    if ticks.windows(2).any(|pair| pair[0].index >= pair[1].index) {
        return Err(TickError::Sorted);
    }

    Ok(())
}

pub fn is_below_smallest(ticks: &[Tick], tick: i32) -> Result<bool, TickError> {
    let first = ticks.first().ok_or(TickError::Length)?;
    Ok(tick < first.index)
}

pub fn is_at_or_above_largest(ticks: &[Tick], tick: i32) -> Result<bool, TickError> {
    let last = ticks.last().ok_or(TickError::Length)?;
    Ok(tick >= last.index)
}

/// Position of the largest tick whose index is `<= tick`.
pub fn binary_search(ticks: &[Tick], tick: i32) -> Result<usize, TickError> {
    if is_below_smallest(ticks, tick)? {
        return Err(TickError::BelowSmallest(tick));
    }
    // at least ticks[0] satisfies the predicate here
    Ok(ticks.partition_point(|t| t.index <= tick) - 1)
}

pub fn find_tick(ticks: &[Tick], index: i32) -> Result<&Tick, TickError> {
    ticks
        .binary_search_by_key(&index, |t| t.index)
        .map(|position| &ticks[position])
        .map_err(|_| TickError::NotContained(index))
}

/// The closest initialized tick at or below `tick` when `lte`, otherwise
/// strictly above it.
pub fn next_initialized_tick(ticks: &[Tick], tick: i32, lte: bool) -> Result<&Tick, TickError> {
    if lte {
        if is_below_smallest(ticks, tick)? {
            return Err(TickError::BelowSmallest(tick));
        }
        if is_at_or_above_largest(ticks, tick)? {
            return Ok(&ticks[ticks.len() - 1]);
        }
        let position = binary_search(ticks, tick)?;
        Ok(&ticks[position])
    } else {
        if is_at_or_above_largest(ticks, tick)? {
            return Err(TickError::AtOrAboveLargest(tick));
        }
        if is_below_smallest(ticks, tick)? {
            return Ok(&ticks[0]);
        }
        let position = binary_search(ticks, tick)?;
        Ok(&ticks[position + 1])
    }
}

#[inline]
fn saturate(value: i64) -> i32 {
    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

/// Returns the next initialized tick in the swap direction without leaving
/// the bitmap word of `tick`, and whether that tick is initialized.
///
/// When no initialized tick lies inside the word, the word boundary is
/// returned with `false` and the caller keeps scanning from there.
pub fn next_initialized_tick_within_one_word(
    ticks: &[Tick],
    tick: i32,
    lte: bool,
    tick_spacing: i32,
) -> Result<(i32, bool), TickError> {
    if tick_spacing <= 0 {
        return Err(TickError::TickSpacingNonzero);
    }
    let spacing = i64::from(tick_spacing);
    let compressed = i64::from(tick).div_euclid(spacing);

    if lte {
        let word_pos = compressed >> 8;
        let minimum = saturate((word_pos << 8) * spacing);

        if is_below_smallest(ticks, tick)? {
            return Ok((minimum, false));
        }

        let index = next_initialized_tick(ticks, tick, lte)?.index;
        let next_initialized = index.max(minimum);
        Ok((next_initialized, next_initialized == index))
    } else {
        let word_pos = (compressed + 1) >> 8;
        let maximum = saturate(((word_pos + 1) << 8) * spacing - 1);

        if is_at_or_above_largest(ticks, tick)? {
            return Ok((maximum, false));
        }

        let index = next_initialized_tick(ticks, tick, lte)?.index;
        let next_initialized = index.min(maximum);
        Ok((next_initialized, next_initialized == index))
    }
}
