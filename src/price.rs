use num_bigint::{BigInt, BigUint};

use crate::{
    error::{Error, FractionError, MathError},
    fraction::{Fraction, Rounding},
    math::{
        tick_math::{encode_sqrt_ratio_x96_big, get_sqrt_ratio_at_tick, get_tick_at_sqrt_ratio},
        u256_num::u256_to_bigint,
    },
    token::{Token, TokenAmount},
    Q192,
};

/// Amount of `quote_token` paid for one unit of `base_token`.
///
/// The fraction is raw, in the smallest units of both tokens; the display
/// helpers scale it by the difference in decimals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Price {
    pub base_token: Token,
    pub quote_token: Token,
    fraction: Fraction,
}

impl Price {
    pub fn new(
        base_token: Token,
        quote_token: Token,
        denominator: impl Into<BigInt>,
        numerator: impl Into<BigInt>,
    ) -> Result<Self, FractionError> {
        Ok(Self::from_fraction(
            base_token,
            quote_token,
            Fraction::new(numerator, denominator)?,
        ))
    }

    pub fn from_fraction(base_token: Token, quote_token: Token, fraction: Fraction) -> Self {
        Self {
            base_token,
            quote_token,
            fraction,
        }
    }

    #[inline]
    pub fn raw(&self) -> &Fraction {
        &self.fraction
    }

    #[inline]
    pub fn numerator(&self) -> &BigInt {
        self.fraction.numerator()
    }

    #[inline]
    pub fn denominator(&self) -> &BigInt {
        self.fraction.denominator()
    }

    /// `10^base.decimals / 10^quote.decimals`.
    pub fn scalar(&self) -> Fraction {
        let ten = BigInt::from(10u8);
        Fraction::from_parts_unchecked(
            ten.pow(u32::from(self.base_token.decimals())),
            ten.pow(u32::from(self.quote_token.decimals())),
        )
    }

    /// The price in whole tokens.
    pub fn adjusted(&self) -> Fraction {
        &self.fraction * &self.scalar()
    }

    pub fn invert(&self) -> Result<Price, FractionError> {
        Ok(Self::from_fraction(
            self.quote_token.clone(),
            self.base_token.clone(),
            self.fraction.invert()?,
        ))
    }

    /// Chains `self` with a price whose base token is `self`'s quote token.
    pub fn mul(&self, other: &Price) -> Result<Price, FractionError> {
        if self.quote_token != other.base_token {
            return Err(FractionError::PriceMismatch);
        }
        Ok(Self::from_fraction(
            self.base_token.clone(),
            other.quote_token.clone(),
            &self.fraction * &other.fraction,
        ))
    }

    /// The exact amount of quote token `amount` of the base token is worth.
    pub fn quote(&self, amount: &TokenAmount) -> Result<Fraction, FractionError> {
        if amount.token != self.base_token {
            return Err(FractionError::QuoteToken);
        }
        Ok(&self.fraction * &amount.as_fraction())
    }

    pub fn to_significant(
        &self,
        significant_digits: u32,
        rounding: Rounding,
    ) -> Result<String, FractionError> {
        self.adjusted().to_significant(significant_digits, rounding)
    }

    pub fn to_fixed(&self, decimal_places: u32, rounding: Rounding) -> String {
        self.adjusted().to_fixed(decimal_places, rounding)
    }
}

/// Price of `base_token` in `quote_token` at `tick`.
pub fn tick_to_price(base_token: &Token, quote_token: &Token, tick: i32) -> Result<Price, Error> {
    let sqrt_ratio_x96 = u256_to_bigint(get_sqrt_ratio_at_tick(tick)?);
    let ratio_x192 = &sqrt_ratio_x96 * &sqrt_ratio_x96;
    let q192 = u256_to_bigint(Q192);

    let price = if base_token.sorts_before(quote_token)? {
        Price::new(base_token.clone(), quote_token.clone(), q192, ratio_x192)?
    } else {
        Price::new(base_token.clone(), quote_token.clone(), ratio_x192, q192)?
    };
    Ok(price)
}

/// Greatest tick whose price does not exceed `price`, measured in the
/// direction of the pool's token0.
pub fn price_to_closest_tick(price: &Price) -> Result<i32, Error> {
    let sorted = price.base_token.sorts_before(&price.quote_token)?;
    let numerator = to_unsigned(price.numerator())?;
    let denominator = to_unsigned(price.denominator())?;

    let sqrt_ratio_x96 = if sorted {
        encode_sqrt_ratio_x96_big(&numerator, &denominator)?
    } else {
        encode_sqrt_ratio_x96_big(&denominator, &numerator)?
    };

    let mut tick = get_tick_at_sqrt_ratio(sqrt_ratio_x96)?;
    let next_tick_price = tick_to_price(&price.base_token, &price.quote_token, tick + 1)?;
    let reached_next = if sorted {
        price.raw() >= next_tick_price.raw()
    } else {
        price.raw() <= next_tick_price.raw()
    };
    if reached_next {
        tick += 1;
    }
    Ok(tick)
}

fn to_unsigned(value: &BigInt) -> Result<BigUint, MathError> {
    value.to_biguint().ok_or(MathError::Underflow)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::Currency;
    use alloy_primitives::{Address, U256};

    fn token(sort_order: u8, decimals: u8) -> Token {
        Token::new(
            1,
            Address::repeat_byte(sort_order * 0x11),
            Currency::new(decimals, format!("T{sort_order}"), format!("token{sort_order}")),
        )
    }

    fn significant(price: &Price, digits: u32) -> String {
        price.to_significant(digits, Rounding::RoundHalfUp).unwrap()
    }

    #[test]
    fn tick_to_price_across_directions() {
        let (t0, t1) = (token(0, 18), token(1, 18));
        assert_eq!(significant(&tick_to_price(&t1, &t0, -74959).unwrap(), 5), "1800");
        assert_eq!(significant(&tick_to_price(&t0, &t1, -74959).unwrap(), 5), "0.00055556");
        assert_eq!(significant(&tick_to_price(&t0, &t1, 74959).unwrap(), 5), "1800");
        assert_eq!(significant(&tick_to_price(&t1, &t0, 74959).unwrap(), 5), "0.00055556");
    }

    #[test]
    fn tick_to_price_with_decimal_difference() {
        let (t0, t2) = (token(0, 18), token(2, 6));
        assert_eq!(significant(&tick_to_price(&t0, &t2, -276225).unwrap(), 3), "1.01");
        assert_eq!(significant(&tick_to_price(&t2, &t0, -276225).unwrap(), 5), "0.99015");
        assert_eq!(significant(&tick_to_price(&t0, &t2, -276423).unwrap(), 5), "0.99015");
        assert_eq!(significant(&tick_to_price(&t2, &t0, -276423).unwrap(), 5), "1.0099");
    }

    #[test]
    fn price_to_closest_tick_vectors() {
        let (t0, t1, t2) = (token(0, 18), token(1, 18), token(2, 6));
        let price = Price::new(t1.clone(), t0.clone(), 1u8, 1800u32).unwrap();
        assert_eq!(price_to_closest_tick(&price).unwrap(), -74960);

        let price = Price::new(t0.clone(), t1, 1800u32, 1u8).unwrap();
        assert_eq!(price_to_closest_tick(&price).unwrap(), -74960);

        let price =
            Price::new(t0.clone(), t2.clone(), 100_000_000_000_000_000_000u128, 101_000_000u64)
                .unwrap();
        assert_eq!(price_to_closest_tick(&price).unwrap(), -276225);

        let price =
            Price::new(t2, t0, 101_000_000u64, 100_000_000_000_000_000_000u128).unwrap();
        assert_eq!(price_to_closest_tick(&price).unwrap(), -276225);
    }

    #[test]
    fn price_to_closest_tick_inverts_tick_to_price() {
        let (t0, t1, t2) = (token(0, 18), token(1, 18), token(2, 6));
        for (base, quote) in [(&t1, &t0), (&t0, &t1), (&t0, &t2), (&t2, &t0)] {
            for tick in [-74960, 74960, -276225, -276423, 0, 1] {
                let price = tick_to_price(base, quote, tick).unwrap();
                assert_eq!(price_to_closest_tick(&price).unwrap(), tick);
            }
        }
    }

    #[test]
    fn invert_swaps_tokens() {
        let (t0, t1) = (token(0, 18), token(1, 18));
        let price = Price::new(t0.clone(), t1.clone(), 2u8, 5u8).unwrap();
        let inverted = price.invert().unwrap();
        assert_eq!(inverted.base_token, t1);
        assert_eq!(inverted.quote_token, t0);
        assert_eq!(inverted.raw(), &Fraction::new(2, 5).unwrap());
    }

    #[test]
    fn mul_chains_prices() {
        let (t0, t1, t2) = (token(0, 18), token(1, 18), token(2, 6));
        let a = Price::new(t0.clone(), t1.clone(), 1u8, 3u8).unwrap();
        let b = Price::new(t1.clone(), t2.clone(), 2u8, 5u8).unwrap();
        let chained = a.mul(&b).unwrap();
        assert_eq!(chained.base_token, t0);
        assert_eq!(chained.quote_token, t2);
        assert_eq!(chained.raw(), &Fraction::new(15, 2).unwrap());
        assert_eq!(b.mul(&a).unwrap_err(), FractionError::PriceMismatch);
    }

    #[test]
    fn quote_requires_base_token() {
        let (t0, t1) = (token(0, 18), token(1, 18));
        let price = Price::new(t0.clone(), t1.clone(), 2u8, 5u8).unwrap();
        let quoted = price.quote(&TokenAmount::new(t0, U256::from(10))).unwrap();
        assert_eq!(quoted, Fraction::from(25u64));
        assert_eq!(
            price.quote(&TokenAmount::new(t1, U256::from(10))).unwrap_err(),
            FractionError::QuoteToken
        );
    }

    #[test]
    fn display_uses_decimals() {
        let (t0, t2) = (token(0, 18), token(2, 6));
        // 101 units of a 6 decimal token per 100 units of an 18 decimal token
        let price = Price::new(t0, t2, 100_000_000_000_000_000_000u128, 101_000_000u64).unwrap();
        assert_eq!(significant(&price, 5), "1.01");
        assert_eq!(price.invert().unwrap().to_fixed(4, Rounding::RoundHalfUp), "0.9901");
        assert_eq!(Price::new(token(1, 18), token(3, 18), 0u8, 1u8).unwrap_err(), FractionError::DivisionByZero);
    }
}
