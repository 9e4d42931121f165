use alloy_primitives::{address, b256, keccak256, Address, B256};

use crate::{error::PoolError, fee::FeeAmount, token::Token};

/// Mainnet pool factory.
pub const FACTORY_ADDRESS: Address = address!("1F98431c8aD98523631AE4a59f267346ea31F984");

/// Hash of the pool creation code deployed by [`FACTORY_ADDRESS`].
pub const POOL_INIT_CODE_HASH: B256 =
    b256!("e34f199b19b2b4f47f68442619d555527d244f78a3297ea89325f843f87b8b54");

/// CREATE2 address of the pool for a token pair and fee.
///
/// The tokens may be given in either order. `init_code_hash` defaults to
/// [`POOL_INIT_CODE_HASH`] for factories deployed from the same bytecode.
pub fn compute_pool_address(
    factory: Address,
    token_a: &Token,
    token_b: &Token,
    fee: FeeAmount,
    init_code_hash: Option<B256>,
) -> Result<Address, PoolError> {
    let (token0, token1) = if token_a.sorts_before(token_b)? {
        (token_a, token_b)
    } else {
        (token_b, token_a)
    };

    // abi.encode(address, address, uint24): three left-padded words
    let mut encoded = [0u8; 96];
    encoded[12..32].copy_from_slice(token0.address.as_slice());
    encoded[44..64].copy_from_slice(token1.address.as_slice());
    encoded[93..96].copy_from_slice(&fee.pips().to_be_bytes()[1..]);

    let salt = keccak256(encoded);
    Ok(factory.create2(salt, init_code_hash.unwrap_or(POOL_INIT_CODE_HASH)))
}
