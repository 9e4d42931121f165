#![allow(dead_code)]

use clmm_router::{
    math::{
        tick_list::Tick,
        tick_math::{encode_sqrt_ratio_x96, get_tick_at_sqrt_ratio, nearest_usable_tick, MAX_TICK, MIN_TICK},
    },
    Address, Currency, FeeAmount, Pool, Token, TokenAmount, U256,
};
use num_integer::Roots;

pub fn token(i: u8) -> Token {
    Token::new(
        1,
        Address::with_last_byte(i + 1),
        Currency::new(18, format!("t{i}"), format!("token{i}")),
    )
}

pub fn amount(token: &Token, amount: u64) -> TokenAmount {
    TokenAmount::new(token.clone(), U256::from(amount))
}

pub fn full_range_ticks(fee: FeeAmount, liquidity: u128) -> Vec<Tick> {
    let spacing = fee.tick_spacing();
    vec![
        Tick::new(nearest_usable_tick(MIN_TICK, spacing).unwrap(), liquidity as i128, liquidity),
        Tick::new(nearest_usable_tick(MAX_TICK, spacing).unwrap(), -(liquidity as i128), liquidity),
    ]
}

pub fn v2_style_pool(token0: &Token, reserve0: u64, token1: &Token, reserve1: u64) -> Pool {
    let fee = FeeAmount::Medium;
    let sqrt_price = encode_sqrt_ratio_x96(U256::from(reserve1), U256::from(reserve0)).unwrap();
    let liquidity = Roots::sqrt(&(u128::from(reserve0) * u128::from(reserve1)));
    Pool::new(
        token0.clone(),
        token1.clone(),
        fee,
        sqrt_price,
        liquidity,
        get_tick_at_sqrt_ratio(sqrt_price).unwrap(),
        full_range_ticks(fee, liquidity),
    )
    .unwrap()
}

/// Pools 0-1, 0-2 and 1-2 of the routing fixture.
pub fn triangle() -> (Vec<Token>, Vec<Pool>) {
    let tokens: Vec<Token> = (0..3).map(token).collect();
    let pools = vec![
        v2_style_pool(&tokens[0], 100_000, &tokens[1], 100_000),
        v2_style_pool(&tokens[0], 100_000, &tokens[2], 110_000),
        v2_style_pool(&tokens[1], 120_000, &tokens[2], 100_000),
    ];
    (tokens, pools)
}
