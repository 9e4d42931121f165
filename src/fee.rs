use serde::{Deserialize, Serialize};

use crate::error::PoolError;

/// Denominator of a fee expressed in pips.
pub const MAX_FEE: u32 = 1_000_000;

/// Fee tiers enabled by the factory, in hundredths of a basis point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum FeeAmount {
    Lowest = 100,
    Low = 500,
    Medium = 3000,
    High = 10000,
}

const FEE_TABLE: [(FeeAmount, i32); 4] = [
    (FeeAmount::Lowest, 1),
    (FeeAmount::Low, 10),
    (FeeAmount::Medium, 60),
    (FeeAmount::High, 200),
];

impl FeeAmount {
    #[inline]
    pub const fn pips(self) -> u32 {
        self as u32
    }

    /// Minimum spacing between usable ticks for this tier.
    pub const fn tick_spacing(self) -> i32 {
        match self {
            FeeAmount::Lowest => FEE_TABLE[0].1,
            FeeAmount::Low => FEE_TABLE[1].1,
            FeeAmount::Medium => FEE_TABLE[2].1,
            FeeAmount::High => FEE_TABLE[3].1,
        }
    }

    pub fn all() -> impl Iterator<Item = FeeAmount> {
        FEE_TABLE.iter().map(|(fee, _)| *fee)
    }
}

impl TryFrom<u32> for FeeAmount {
    type Error = PoolError;

    fn try_from(pips: u32) -> Result<Self, Self::Error> {
        FeeAmount::all()
            .find(|fee| fee.pips() == pips)
            .ok_or(PoolError::FeeAmount(pips))
    }
}

impl From<FeeAmount> for u32 {
    fn from(fee: FeeAmount) -> Self {
        fee.pips()
    }
}
