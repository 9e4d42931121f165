use std::{
    fmt,
    hash::{Hash, Hasher},
};

use alloy_primitives::{Address, ChainId, U256};
use num_bigint::BigInt;
use serde::{Deserialize, Serialize};

use crate::{
    error::PoolError,
    fraction::{Fraction, Rounding},
    math::u256_num::u256_to_bigint,
};

/// Display metadata of a token. Only `decimals` takes part in arithmetic.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Currency {
    pub decimals: u8,
    pub symbol: String,
    pub name: String,
}

impl Currency {
    pub fn new(decimals: u8, symbol: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            decimals,
            symbol: symbol.into(),
            name: name.into(),
        }
    }
}

/// An ERC-20 style token. Two tokens are the same token when they live on the
/// same chain at the same address, whatever their metadata says.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    pub chain_id: ChainId,
    pub address: Address,
    pub currency: Currency,
}

impl Token {
    pub fn new(chain_id: ChainId, address: Address, currency: Currency) -> Self {
        Self {
            chain_id,
            address,
            currency,
        }
    }

    #[inline]
    pub fn decimals(&self) -> u8 {
        self.currency.decimals
    }

    #[inline]
    pub fn symbol(&self) -> &str {
        &self.currency.symbol
    }

    /// Whether `self` is `token0` of a pool made with `other`.
    ///
    /// Numeric address order, which is the case-insensitive order of the hex
    /// strings.
    pub fn sorts_before(&self, other: &Token) -> Result<bool, PoolError> {
        if self.chain_id != other.chain_id {
            return Err(PoolError::ChainIds);
        }
        if self.address == other.address {
            return Err(PoolError::Addresses);
        }
        Ok(self.address < other.address)
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.chain_id == other.chain_id && self.address == other.address
    }
}

impl Eq for Token {}

impl Hash for Token {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.chain_id.hash(state);
        self.address.hash(state);
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.currency.symbol, self.address)
    }
}

/// A raw amount of a token in its smallest unit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TokenAmount {
    pub token: Token,
    pub amount: U256,
}

impl TokenAmount {
    pub fn new(token: Token, amount: U256) -> Self {
        Self { token, amount }
    }

    /// The raw amount as an integer fraction.
    pub fn as_fraction(&self) -> Fraction {
        Fraction::from(self.amount)
    }

    /// The amount in whole tokens, `amount / 10^decimals`.
    pub fn to_exact(&self) -> Fraction {
        Fraction::from_parts_unchecked(
            u256_to_bigint(self.amount),
            BigInt::from(10u8).pow(u32::from(self.token.decimals())),
        )
    }

    /// Whole-token amount with every decimal of the token printed.
    pub fn to_fixed(&self) -> String {
        self.to_exact()
            .to_fixed(u32::from(self.token.decimals()), Rounding::RoundDown)
    }
}

impl fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.to_fixed(), self.token.currency.symbol)
    }
}
