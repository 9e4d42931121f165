use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MathError {
    #[error("OVERFLOW: math error - overflow")]
    Overflow,
    #[error("UNDERFLOW: math error - underflow")]
    Underflow,
    #[error("DIVISION_BY_ZERO: math error - division by zero")]
    DivisionByZero,
    #[error("ZERO: bit math error - input is zero")]
    ZeroValue,
}

impl MathError {
    pub fn code(&self) -> &'static str {
        match self {
            MathError::Overflow => "OVERFLOW",
            MathError::Underflow => "UNDERFLOW",
            MathError::DivisionByZero => "DIVISION_BY_ZERO",
            MathError::ZeroValue => "ZERO",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("SQRT_PRICE_ZERO: sqrt price is 0")]
    SqrtPriceIsZero,
    #[error("SQRT_RATIO_ZERO: sqrt ratio is 0")]
    SqrtRatioIsZero,
    #[error("LIQUIDITY_ZERO: liquidity is 0")]
    LiquidityIsZero,
    #[error("INSUFFICIENT_RESERVES: requested amount exceeds pool reserves")]
    InsufficientReserves,
}

impl StateError {
    pub fn code(&self) -> &'static str {
        match self {
            StateError::SqrtPriceIsZero => "SQRT_PRICE_ZERO",
            StateError::SqrtRatioIsZero => "SQRT_RATIO_ZERO",
            StateError::LiquidityIsZero => "LIQUIDITY_ZERO",
            StateError::InsufficientReserves => "INSUFFICIENT_RESERVES",
        }
    }
}

/// Failures of tick math and tick list queries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TickError {
    #[error("TICK_BOUND: tick index {0} is out of range -887272 to 887272")]
    TickBound(i32),
    #[error("SQRT_RATIO_BOUND: sqrt ratio {0} is out of range")]
    SqrtRatioBound(alloy_primitives::U256),
    #[error("TICK_SPACING_NONZERO: tick spacing must be greater than zero")]
    TickSpacingNonzero,
    #[error("TICK_SPACING: tick indices must be multiples of tick spacing")]
    TickSpacing,
    #[error("ZERO_NET: tick net liquidity values must sum to 0")]
    ZeroNet,
    #[error("SORTED: tick list must be strictly sorted by index")]
    Sorted,
    #[error("LENGTH: tick list is empty")]
    Length,
    #[error("BELOW_SMALLEST: tick {0} is below smallest tick index in the list")]
    BelowSmallest(i32),
    #[error("AT_OR_ABOVE_LARGEST: tick {0} is at or above largest tick index in the list")]
    AtOrAboveLargest(i32),
    #[error("NOT_CONTAINED: tick {0} not found in tick list")]
    NotContained(i32),
}

impl TickError {
    pub fn code(&self) -> &'static str {
        match self {
            TickError::TickBound(_) => "TICK_BOUND",
            TickError::SqrtRatioBound(_) => "SQRT_RATIO_BOUND",
            TickError::TickSpacingNonzero => "TICK_SPACING_NONZERO",
            TickError::TickSpacing => "TICK_SPACING",
            TickError::ZeroNet => "ZERO_NET",
            TickError::Sorted => "SORTED",
            TickError::Length => "LENGTH",
            TickError::BelowSmallest(_) => "BELOW_SMALLEST",
            TickError::AtOrAboveLargest(_) => "AT_OR_ABOVE_LARGEST",
            TickError::NotContained(_) => "NOT_CONTAINED",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FractionError {
    #[error("DIVISION_BY_ZERO: fraction denominator is zero")]
    DivisionByZero,
    #[error("FRACTION_PARSE: cannot parse {0:?} as a decimal fraction")]
    Parse(String),
    #[error("SIGNIFICANT_DIGITS: significant digits must be greater than zero")]
    SignificantDigits,
    #[error("PRICE_MUL: quote token of the left price must be the base token of the right price")]
    PriceMismatch,
    #[error("PRICE_QUOTE: token amount must be denominated in the base token")]
    QuoteToken,
}

impl FractionError {
    pub fn code(&self) -> &'static str {
        match self {
            FractionError::DivisionByZero => "DIVISION_BY_ZERO",
            FractionError::Parse(_) => "FRACTION_PARSE",
            FractionError::SignificantDigits => "SIGNIFICANT_DIGITS",
            FractionError::PriceMismatch => "PRICE_MUL",
            FractionError::QuoteToken => "PRICE_QUOTE",
        }
    }
}

/// Construction and quoting failures of a single pool.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PoolError {
    #[error("CHAIN_IDS: tokens must have the same chain id")]
    ChainIds,
    #[error("ADDRESSES: tokens cannot have the same address")]
    Addresses,
    #[error("PRICE_BOUNDS: sqrt price is invalid for current tick")]
    PriceBounds,
    #[error("TOKEN: token is not in the pool")]
    Token,
    #[error("FEE_AMOUNT: unsupported fee amount {0}")]
    FeeAmount(u32),
    #[error("RATIO_MIN: sqrt price limit {0} is less than or equal to the minimum sqrt ratio")]
    RatioMin(alloy_primitives::U256),
    #[error("RATIO_MAX: sqrt price limit {0} is greater than or equal to the maximum sqrt ratio")]
    RatioMax(alloy_primitives::U256),
    #[error("RATIO_CURRENT: sqrt price limit {0} is on the wrong side of the current price")]
    RatioCurrent(alloy_primitives::U256),
    #[error("STATE_PROVIDER: {0}")]
    Provider(String),
}

impl PoolError {
    pub fn code(&self) -> &'static str {
        match self {
            PoolError::ChainIds => "CHAIN_IDS",
            PoolError::Addresses => "ADDRESSES",
            PoolError::PriceBounds => "PRICE_BOUNDS",
            PoolError::Token => "TOKEN",
            PoolError::FeeAmount(_) => "FEE_AMOUNT",
            PoolError::RatioMin(_) => "RATIO_MIN",
            PoolError::RatioMax(_) => "RATIO_MAX",
            PoolError::RatioCurrent(_) => "RATIO_CURRENT",
            PoolError::Provider(_) => "STATE_PROVIDER",
        }
    }
}

/// Route, trade and search failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TradeError {
    #[error("POOLS: pools cannot be empty")]
    Pools,
    #[error("CHAIN_IDS: all pools must be on the same chain")]
    ChainIds,
    #[error("INPUT: the input token does not match the route")]
    Input,
    #[error("OUTPUT: the output token does not match the route")]
    Output,
    #[error("PATH: each pool must share a token with its predecessor in the path")]
    Path,
    #[error("INPUT_CURRENCY_MATCH: the input token of the trade and all its routes must match")]
    InputCurrencyMatch,
    #[error("OUTPUT_CURRENCY_MATCH: the output token of the trade and all its routes must match")]
    OutputCurrencyMatch,
    #[error("POOLS_DUPLICATED: pools must be unique within and across routes")]
    PoolsDuplicated,
    #[error("SLIPPAGE_TOLERANCE: slippage tolerance cannot be less than zero")]
    SlippageTolerance,
    #[error("MAX_HOPS: max hops must be greater than zero")]
    MaxHops,
    #[error("INPUT_CURRENCY: compared trades must have the same input token")]
    InputCurrency,
    #[error("OUTPUT_CURRENCY: compared trades must have the same output token")]
    OutputCurrency,
}

impl TradeError {
    pub fn code(&self) -> &'static str {
        match self {
            TradeError::Pools => "POOLS",
            TradeError::ChainIds => "CHAIN_IDS",
            TradeError::Input => "INPUT",
            TradeError::Output => "OUTPUT",
            TradeError::Path => "PATH",
            TradeError::InputCurrencyMatch => "INPUT_CURRENCY_MATCH",
            TradeError::OutputCurrencyMatch => "OUTPUT_CURRENCY_MATCH",
            TradeError::PoolsDuplicated => "POOLS_DUPLICATED",
            TradeError::SlippageTolerance => "SLIPPAGE_TOLERANCE",
            TradeError::MaxHops => "MAX_HOPS",
            TradeError::InputCurrency => "INPUT_CURRENCY",
            TradeError::OutputCurrency => "OUTPUT_CURRENCY",
        }
    }
}

/// Invalid liquidity position bounds.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PositionError {
    #[error("TICK_ORDER: upper tick {upper} must be greater than lower tick {lower}")]
    TickOrder { lower: i32, upper: i32 },
    #[error("TICK_LOWER: lower tick {0} is below the minimum or not aligned with tick spacing")]
    TickLower(i32),
    #[error("TICK_UPPER: upper tick {0} is above the maximum or not aligned with tick spacing")]
    TickUpper(i32),
}

impl PositionError {
    pub fn code(&self) -> &'static str {
        match self {
            PositionError::TickOrder { .. } => "TICK_ORDER",
            PositionError::TickLower(_) => "TICK_LOWER",
            PositionError::TickUpper(_) => "TICK_UPPER",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error(transparent)]
    MathError(#[from] MathError),

    #[error(transparent)]
    StateError(#[from] StateError),

    #[error(transparent)]
    TickError(#[from] TickError),

    #[error(transparent)]
    FractionError(#[from] FractionError),

    #[error(transparent)]
    PoolError(#[from] PoolError),

    #[error(transparent)]
    TradeError(#[from] TradeError),

    #[error(transparent)]
    PositionError(#[from] PositionError),
}

impl Error {
    /// Stable machine readable code of the failure.
    pub fn code(&self) -> &'static str {
        match self {
            Error::MathError(e) => e.code(),
            Error::StateError(e) => e.code(),
            Error::TickError(e) => e.code(),
            Error::FractionError(e) => e.code(),
            Error::PoolError(e) => e.code(),
            Error::TradeError(e) => e.code(),
            Error::PositionError(e) => e.code(),
        }
    }
}
