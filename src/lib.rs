//! Concentrated-liquidity AMM math, swap simulation and best-trade routing in pure Rust.
//!
//! This crate exposes:
//! - Low‑level math primitives (`math::*`) for ticks, prices, tick lists and swap steps,
//!   bit-exact with the on-chain integer implementation.
//! - Exact rational arithmetic ([`Fraction`], [`Price`]) used for every derived price.
//! - Immutable [`Pool`] snapshots whose swaps return a new pool value.
//! - [`Route`] and [`Trade`] construction with price impact and slippage helpers.
//! - Liquidity [`Position`]s with mint and burn amounts under slippage.
//! - A bounded depth-first best-trade search over a pool set.
//!
//! # Examples
//!
//! ## Pure math
//! ```no_run
//! use clmm_router::{math::tick_math, RESOLUTION, U256};
//!
//! let sqrt_price = tick_math::get_sqrt_ratio_at_tick(0).unwrap();
//! assert!(sqrt_price > U256::ZERO);
//! assert_eq!(RESOLUTION, 96);
//! ```
//!
//! ## Quoting through the best route
//! ```no_run
//! use clmm_router::{
//!     math::{tick_list::Tick, tick_math::{encode_sqrt_ratio_x96, get_tick_at_sqrt_ratio}},
//!     search::{best_trade_exact_in, BestTradeOptions},
//!     Address, Currency, FeeAmount, Pool, Token, TokenAmount, U256,
//! };
//!
//! let token = |byte: u8| {
//!     Token::new(1, Address::with_last_byte(byte), Currency::new(18, "T", "Test token"))
//! };
//! let (t0, t1) = (token(1), token(2));
//!
//! let sqrt_price = encode_sqrt_ratio_x96(U256::from(1), U256::from(1)).unwrap();
//! let tick = get_tick_at_sqrt_ratio(sqrt_price).unwrap();
//! let liquidity = 1_000_000_000_000_000_000u128;
//! let ticks = vec![
//!     Tick::new(-887220, liquidity as i128, liquidity),
//!     Tick::new(887220, -(liquidity as i128), liquidity),
//! ];
//! let pool = Pool::new(t0.clone(), t1.clone(), FeeAmount::Medium, sqrt_price, liquidity, tick, ticks).unwrap();
//!
//! let amount_in = TokenAmount::new(t0, U256::from(1_000_000u64));
//! let trades = best_trade_exact_in(&[pool], &amount_in, &t1, BestTradeOptions::default()).unwrap();
//! println!("best output: {}", trades[0].output_amount().amount);
//! ```

pub use alloy_primitives::{Address, ChainId, I256, U256};

pub mod error;
pub mod fee;
pub mod fraction;
mod hash;
pub mod math;
pub mod pool;
pub mod position;
pub mod price;
pub mod route;
pub mod search;
pub mod token;
pub mod trade;

pub use error::Error;
pub use fee::FeeAmount;
pub use fraction::{Fraction, Rounding};
pub use hash::{FastMap, FastSet};
pub use pool::{compute_pool_address, Pool};
pub use position::{MintAmounts, Position};
pub use price::Price;
pub use route::Route;
pub use token::{Currency, Token, TokenAmount};
pub use trade::{Trade, TradeSwap, TradeType};

const U256_1: U256 = U256::from_limbs([1, 0, 0, 0]);

const U160_MAX: U256 = U256::from_limbs([u64::MAX, u64::MAX, 4294967295, 0]);
const U256_E6: U256 = U256::from_limbs([1000000, 0, 0, 0]);

pub const RESOLUTION: u8 = 96;
pub const Q96: U256 = U256::from_limbs([0, 4294967296, 0, 0]);
pub const Q192: U256 = U256::from_limbs([0, 0, 0, 1]);
