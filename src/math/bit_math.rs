use crate::error::MathError;
use alloy_primitives::U256;

/// Returns the index (0–255) of the most significant set bit in a `U256`,
/// or `MathError::ZeroValue` if the input is zero.
pub fn most_significant_bit(x: U256) -> Result<usize, MathError> {
    if x.is_zero() {
        return Err(MathError::ZeroValue);
    }
    Ok(255 - x.leading_zeros())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn msb_errors_on_zero() {
        let res = most_significant_bit(U256::ZERO);
        assert!(matches!(res, Err(MathError::ZeroValue)));
    }

    #[test]
    fn msb_of_one() {
        assert_eq!(most_significant_bit(U256::ONE).unwrap(), 0);
    }

    #[test]
    fn msb_of_powers_of_two() {
        for bit in [1usize, 7, 96, 127, 128, 191, 255] {
            assert_eq!(most_significant_bit(U256::ONE << bit).unwrap(), bit);
        }
    }

    #[test]
    fn msb_of_multiple_bits() {
        // binary: 1001_0100 (MSB = bit 7)
        let x = U256::from(0b1001_0100u64);
        assert_eq!(most_significant_bit(x).unwrap(), 7);
    }

    #[test]
    fn msb_of_max_u256() {
        assert_eq!(most_significant_bit(U256::MAX).unwrap(), 255);
    }
}
