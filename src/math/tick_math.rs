use crate::error::{MathError, TickError};
use crate::math::bit_math::most_significant_bit;
use crate::math::u256_num::{biguint_to_u256, u256_to_biguint};
use alloy_primitives::U256;
use num_bigint::BigUint;
use num_traits::Zero;

pub const MIN_TICK: i32 = -887272;
pub const MAX_TICK: i32 = -MIN_TICK;

pub const MIN_SQRT_RATIO: U256 = U256::from_limbs([4295128739, 0, 0, 0]);
pub const MAX_SQRT_RATIO: U256 =
    U256::from_limbs([6743328256752651558, 17280870778742802505, 4294805859, 0]);

/// `2^64 / log2(sqrt(1.0001))`.
const LOG_SQRT_10001: U256 = U256::from_limbs([11745905768312294533, 13863, 0, 0]);
const TICK_LOW_OFFSET: U256 =
    U256::from_limbs([6552757943157144234, 184476617836266586, 0, 0]);
const TICK_HIGH_OFFSET: U256 =
    U256::from_limbs([4998474450511881007, 15793544031827761793, 0, 0]);

const U160_BITS: usize = 160;

/// Returns `sqrt(1.0001^tick)` as a Q64.96 number.
///
/// Fails with `TICK_BOUND` outside `[MIN_TICK, MAX_TICK]`.
pub fn get_sqrt_ratio_at_tick(tick: i32) -> Result<U256, TickError> {
    let abs_tick = tick.unsigned_abs();

    if abs_tick > MAX_TICK as u32 {
        return Err(TickError::TickBound(tick));
    }

    let mut ratio = if abs_tick & 1 != 0 {
        U256::from_limbs([12262481743371124737, 18445821805675392311, 0, 0])
    } else {
        U256::from_limbs([0, 0, 1, 0])
    };

    macro_rules! apply_multiplier {
        ($bit:expr, $l0:expr, $l1:expr) => {
            if abs_tick & $bit != 0 {
                ratio = ratio.wrapping_mul(U256::from_limbs([$l0, $l1, 0, 0])) >> 128;
            }
        };
    }

    apply_multiplier!(2, 6459403834229662010, 18444899583751176498);
    apply_multiplier!(4, 17226890335427755468, 18443055278223354162);
    apply_multiplier!(8, 2032852871939366096, 18439367220385604838);
    apply_multiplier!(16, 14545316742740207172, 18431993317065449817);
    apply_multiplier!(32, 5129152022828963008, 18417254355718160513);
    apply_multiplier!(64, 4894419605888772193, 18387811781193591352);
    apply_multiplier!(128, 1280255884321894483, 18329067761203520168);
    apply_multiplier!(256, 15924666964335305636, 18212142134806087854);
    apply_multiplier!(512, 8010504389359918676, 17980523815641551639);
    apply_multiplier!(1024, 10668036004952895731, 17526086738831147013);
    apply_multiplier!(2048, 4878133418470705625, 16651378430235024244);
    apply_multiplier!(4096, 9537173718739605541, 15030750278693429944);
    apply_multiplier!(8192, 9972618978014552549, 12247334978882834399);
    apply_multiplier!(16384, 10428997489610666743, 8131365268884726200);
    apply_multiplier!(32768, 9305304367709015974, 3584323654723342297);
    apply_multiplier!(65536, 14301143598189091785, 696457651847595233);
    apply_multiplier!(131072, 7393154844743099908, 26294789957452057);
    apply_multiplier!(262144, 2209338891292245656, 37481735321082);
    apply_multiplier!(524288, 10518117631919034274, 76158723);

    if tick > 0 {
        ratio = U256::MAX / ratio;
    }

    // Q128.128 to Q64.96, rounding up so the result is never below the true price
    let lower_32_bits = ratio.as_limbs()[0] & 0xFFFF_FFFF;
    Ok((ratio >> 32) + U256::from((lower_32_bits != 0) as u64))
}

/// Returns the greatest tick whose sqrt ratio is at most `sqrt_price_x96`.
///
/// Accepts the closed range `[MIN_SQRT_RATIO, MAX_SQRT_RATIO]` so that
/// `MAX_TICK` round-trips; anything else fails with `SQRT_RATIO_BOUND`.
pub fn get_tick_at_sqrt_ratio(sqrt_price_x96: U256) -> Result<i32, TickError> {
    if !(MIN_SQRT_RATIO..=MAX_SQRT_RATIO).contains(&sqrt_price_x96) {
        return Err(TickError::SqrtRatioBound(sqrt_price_x96));
    }

    let ratio = sqrt_price_x96 << 32;
    let msb = most_significant_bit(ratio).map_err(|_| TickError::SqrtRatioBound(sqrt_price_x96))?;

    let mut r = if msb >= 128 {
        ratio >> (msb - 127)
    } else {
        ratio << (127 - msb)
    };

    // log2 in two's complement Q64.64; wrapping U256 ops match signed ops bit for bit
    let mut log_2 = if msb >= 128 {
        U256::from(msb - 128) << 64usize
    } else {
        (U256::from(128 - msb) << 64usize).wrapping_neg()
    };

    for shift in (50..=63usize).rev() {
        r = r.wrapping_mul(r) >> 127;
        let f: U256 = r >> 128usize;
        log_2 |= f << shift;
        r >>= f.as_limbs()[0] as usize;
    }

    let log_sqrt10001 = log_2.wrapping_mul(LOG_SQRT_10001);
    let tick_low = low_i32_of_shr_128(log_sqrt10001.wrapping_sub(TICK_LOW_OFFSET));
    let tick_high = low_i32_of_shr_128(log_sqrt10001.wrapping_add(TICK_HIGH_OFFSET));

    Ok(if tick_low == tick_high {
        tick_low
    } else if get_sqrt_ratio_at_tick(tick_high)? <= sqrt_price_x96 {
        tick_high
    } else {
        tick_low
    })
}

/// Arithmetic `x >> 128` truncated to 32 bits; the low word of the shift is
/// the same for arithmetic and logical shifts.
#[inline(always)]
fn low_i32_of_shr_128(x: U256) -> i32 {
    (x.as_limbs()[2] as u32) as i32
}

/// Rounds `tick` to the nearest multiple of `tick_spacing` that stays inside
/// the tick bounds. Halves round towards positive infinity.
pub fn nearest_usable_tick(tick: i32, tick_spacing: i32) -> Result<i32, TickError> {
    if tick_spacing <= 0 {
        return Err(TickError::TickSpacingNonzero);
    }
    if !(MIN_TICK..=MAX_TICK).contains(&tick) {
        return Err(TickError::TickBound(tick));
    }

    let spacing = i64::from(tick_spacing);
    let rounded = (2 * i64::from(tick) + spacing).div_euclid(2 * spacing) * spacing;

    let usable = if rounded < i64::from(MIN_TICK) {
        rounded + spacing
    } else if rounded > i64::from(MAX_TICK) {
        rounded - spacing
    } else {
        rounded
    };
    // bounded by MIN_TICK - spacing..=MAX_TICK + spacing before the correction
    Ok(usable as i32)
}

/// Encodes `amount1 / amount0` as a Q64.96 sqrt price: `isqrt((amount1 << 192) / amount0)`.
pub fn encode_sqrt_ratio_x96(amount1: U256, amount0: U256) -> Result<U256, MathError> {
    encode_sqrt_ratio_x96_big(&u256_to_biguint(amount1), &u256_to_biguint(amount0))
}

/// [`encode_sqrt_ratio_x96`] for operands wider than 256 bits, such as the
/// squared sqrt prices held by a price.
pub fn encode_sqrt_ratio_x96_big(amount1: &BigUint, amount0: &BigUint) -> Result<U256, MathError> {
    if amount0.is_zero() {
        return Err(MathError::DivisionByZero);
    }
    let ratio_x192 = (amount1 << 192u32) / amount0;
    let sqrt_price = biguint_to_u256(&ratio_x192.sqrt())?;
    if sqrt_price.bit_len() > U160_BITS {
        return Err(MathError::Overflow);
    }
    Ok(sqrt_price)
}
