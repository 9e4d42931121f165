use alloy_primitives::U256;
use num_bigint::{BigInt, BigUint, Sign};

use crate::error::MathError;

pub fn u256_to_biguint(value: U256) -> BigUint {
    BigUint::from_bytes_be(&value.to_be_bytes::<32>())
}

pub fn u256_to_bigint(value: U256) -> BigInt {
    BigInt::from_biguint(Sign::Plus, u256_to_biguint(value))
}

/// Narrows an arbitrary precision integer back into 256 bits.
pub fn biguint_to_u256(value: &BigUint) -> Result<U256, MathError> {
    U256::try_from_be_slice(&value.to_bytes_be()).ok_or(MathError::Overflow)
}

/// Narrows a non-negative arbitrary precision integer into 256 bits.
pub fn bigint_to_u256(value: &BigInt) -> Result<U256, MathError> {
    match value.to_biguint() {
        Some(unsigned) => biguint_to_u256(&unsigned),
        None => Err(MathError::Underflow),
    }
}
