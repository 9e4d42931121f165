//! Exact rational arithmetic over arbitrary precision integers.
//!
//! A [`Fraction`] is never reduced: numerator and denominator are kept as
//! produced by the operations so that prices can be rebuilt from their raw
//! parts. Rounding only happens when a value is formatted.

use std::{
    cmp::Ordering,
    ops::{Add, Mul, Neg, Sub},
    str::FromStr,
};

use alloy_primitives::U256;
use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Signed, Zero};
use serde::{Deserialize, Serialize};

use crate::{error::FractionError, math::u256_num::u256_to_bigint};

/// How the last printed digit is chosen. Applied to the magnitude, so
/// `RoundUp` and `RoundHalfUp` round away from zero for negative values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Rounding {
    RoundDown,
    #[default]
    RoundHalfUp,
    RoundUp,
}

#[derive(Debug, Clone)]
pub struct Fraction {
    numerator: BigInt,
    denominator: BigInt,
}

impl Fraction {
    /// Fails with `DIVISION_BY_ZERO` when `denominator` is zero. A negative
    /// denominator moves its sign to the numerator.
    pub fn new(
        numerator: impl Into<BigInt>,
        denominator: impl Into<BigInt>,
    ) -> Result<Self, FractionError> {
        let (numerator, denominator) = (numerator.into(), denominator.into());
        if denominator.is_zero() {
            return Err(FractionError::DivisionByZero);
        }
        Ok(Self::from_parts_unchecked(numerator, denominator))
    }

    /// The caller guarantees a nonzero denominator.
    pub(crate) fn from_parts_unchecked(numerator: BigInt, denominator: BigInt) -> Self {
        if denominator.is_negative() {
            Self {
                numerator: -numerator,
                denominator: -denominator,
            }
        } else {
            Self {
                numerator,
                denominator,
            }
        }
    }

    pub fn from_integer(value: impl Into<BigInt>) -> Self {
        Self {
            numerator: value.into(),
            denominator: BigInt::one(),
        }
    }

    pub fn zero() -> Self {
        Self::from_integer(0u8)
    }

    pub fn one() -> Self {
        Self::from_integer(1u8)
    }

    #[inline]
    pub fn numerator(&self) -> &BigInt {
        &self.numerator
    }

    /// Always positive.
    #[inline]
    pub fn denominator(&self) -> &BigInt {
        &self.denominator
    }

    pub fn is_zero(&self) -> bool {
        self.numerator.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.numerator.is_negative()
    }

    /// Truncating integer division, rounding towards zero.
    pub fn quotient(&self) -> BigInt {
        &self.numerator / &self.denominator
    }

    /// What is left after [`Fraction::quotient`], over the same denominator.
    pub fn remainder(&self) -> Fraction {
        Self {
            numerator: &self.numerator % &self.denominator,
            denominator: self.denominator.clone(),
        }
    }

    pub fn invert(&self) -> Result<Fraction, FractionError> {
        Fraction::new(self.denominator.clone(), self.numerator.clone())
    }

    pub fn checked_div(&self, other: &Fraction) -> Result<Fraction, FractionError> {
        Fraction::new(
            &self.numerator * &other.denominator,
            &self.denominator * &other.numerator,
        )
    }

    /// Prints exactly `decimal_places` decimals.
    pub fn to_fixed(&self, decimal_places: u32, rounding: Rounding) -> String {
        let scaled = self.numerator.abs() * BigInt::from(10u8).pow(decimal_places);
        let digits = round_div(&scaled, &self.denominator, rounding).to_string();
        let negative = self.is_negative() && digits.bytes().any(|b| b != b'0');
        format_decimal(negative, &digits, decimal_places as usize, false)
    }

    /// Prints the value rounded to `significant_digits` digits, without
    /// trailing zeros after the decimal point.
    pub fn to_significant(
        &self,
        significant_digits: u32,
        rounding: Rounding,
    ) -> Result<String, FractionError> {
        if significant_digits == 0 {
            return Err(FractionError::SignificantDigits);
        }
        if self.is_zero() {
            return Ok("0".to_string());
        }

        let magnitude = self.numerator.abs();
        let exponent = decimal_exponent(&magnitude, &self.denominator);
        let scale = i64::from(significant_digits) - 1 - exponent;

        let ten = BigInt::from(10u8);
        let digits = if scale >= 0 {
            let scaled = magnitude * ten.pow(scale as u32);
            round_div(&scaled, &self.denominator, rounding).to_string()
        } else {
            let shift = ten.pow((-scale) as u32);
            let rounded = round_div(&magnitude, &(&self.denominator * &shift), rounding);
            (rounded * shift).to_string()
        };

        let places = scale.max(0) as usize;
        Ok(format_decimal(self.is_negative(), &digits, places, true))
    }
}

/// `floor(log10(n / d))` for positive `n` and `d`.
fn decimal_exponent(n: &BigInt, d: &BigInt) -> i64 {
    let estimate = n.to_string().len() as i64 - d.to_string().len() as i64;
    let ten = BigInt::from(10u8);
    let reaches_estimate = if estimate >= 0 {
        *n >= d * ten.pow(estimate as u32)
    } else {
        n * ten.pow((-estimate) as u32) >= *d
    };
    if reaches_estimate {
        estimate
    } else {
        estimate - 1
    }
}

/// `n / d` rounded to an integer, for non-negative `n` and positive `d`.
fn round_div(n: &BigInt, d: &BigInt, rounding: Rounding) -> BigInt {
    let (quotient, remainder) = n.div_rem(d);
    let round_up = match rounding {
        Rounding::RoundDown => false,
        Rounding::RoundHalfUp => remainder.clone() * 2u8 >= *d,
        Rounding::RoundUp => !remainder.is_zero(),
    };
    if round_up {
        quotient + 1u8
    } else {
        quotient
    }
}

/// Places a decimal point `places` digits from the right of `digits`.
fn format_decimal(negative: bool, digits: &str, places: usize, strip_zeros: bool) -> String {
    let mut padded = String::with_capacity(places + 2);
    if digits.len() <= places {
        padded.extend(std::iter::repeat('0').take(places + 1 - digits.len()));
    }
    padded.push_str(digits);

    let (int_part, frac_part) = padded.split_at(padded.len() - places);
    let frac_part = if strip_zeros {
        frac_part.trim_end_matches('0')
    } else {
        frac_part
    };

    let mut out = String::with_capacity(padded.len() + 2);
    if negative {
        out.push('-');
    }
    out.push_str(int_part);
    if !frac_part.is_empty() {
        out.push('.');
        out.push_str(frac_part);
    }
    out
}

impl From<U256> for Fraction {
    fn from(value: U256) -> Self {
        Fraction::from_integer(u256_to_bigint(value))
    }
}

impl From<u64> for Fraction {
    fn from(value: u64) -> Self {
        Fraction::from_integer(value)
    }
}

impl From<i64> for Fraction {
    fn from(value: i64) -> Self {
        Fraction::from_integer(value)
    }
}

impl From<BigInt> for Fraction {
    fn from(value: BigInt) -> Self {
        Fraction::from_integer(value)
    }
}

/// Parses plain decimal notation: `"2"`, `"0.05"`, `"-1.5"`.
impl FromStr for Fraction {
    type Err = FractionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse_error = || FractionError::Parse(s.to_string());
        let trimmed = s.trim();
        let (negative, unsigned) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
        };
        let (int_part, frac_part) = unsigned.split_once('.').unwrap_or((unsigned, ""));

        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if int_part.len() + frac_part.len() == 0 || !all_digits(int_part) || !all_digits(frac_part)
        {
            return Err(parse_error());
        }

        let digits = format!("{int_part}{frac_part}");
        let magnitude = BigInt::from_str(&digits).map_err(|_| parse_error())?;
        let numerator = if negative { -magnitude } else { magnitude };
        Ok(Self {
            numerator,
            denominator: BigInt::from(10u8).pow(frac_part.len() as u32),
        })
    }
}

impl PartialEq for Fraction {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Fraction {}

impl PartialOrd for Fraction {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Fraction {
    fn cmp(&self, other: &Self) -> Ordering {
        // denominators are positive, so cross multiplication keeps the order
        (&self.numerator * &other.denominator).cmp(&(&other.numerator * &self.denominator))
    }
}

impl Add for &Fraction {
    type Output = Fraction;

    fn add(self, other: &Fraction) -> Fraction {
        if self.denominator == other.denominator {
            return Fraction {
                numerator: &self.numerator + &other.numerator,
                denominator: self.denominator.clone(),
            };
        }
        Fraction {
            numerator: &self.numerator * &other.denominator + &other.numerator * &self.denominator,
            denominator: &self.denominator * &other.denominator,
        }
    }
}

impl Sub for &Fraction {
    type Output = Fraction;

    fn sub(self, other: &Fraction) -> Fraction {
        if self.denominator == other.denominator {
            return Fraction {
                numerator: &self.numerator - &other.numerator,
                denominator: self.denominator.clone(),
            };
        }
        Fraction {
            numerator: &self.numerator * &other.denominator - &other.numerator * &self.denominator,
            denominator: &self.denominator * &other.denominator,
        }
    }
}

impl Mul for &Fraction {
    type Output = Fraction;

    fn mul(self, other: &Fraction) -> Fraction {
        Fraction {
            numerator: &self.numerator * &other.numerator,
            denominator: &self.denominator * &other.denominator,
        }
    }
}

impl Neg for &Fraction {
    type Output = Fraction;

    fn neg(self) -> Fraction {
        Fraction {
            numerator: -&self.numerator,
            denominator: self.denominator.clone(),
        }
    }
}

macro_rules! forward_owned_binop {
    ($($imp:ident $method:ident),*) => {
        $(
            impl $imp for Fraction {
                type Output = Fraction;

                #[inline]
                fn $method(self, other: Fraction) -> Fraction {
                    (&self).$method(&other)
                }
            }

            impl $imp<&Fraction> for Fraction {
                type Output = Fraction;

                #[inline]
                fn $method(self, other: &Fraction) -> Fraction {
                    (&self).$method(other)
                }
            }
        )*
    };
}

forward_owned_binop!(Add add, Sub sub, Mul mul);
