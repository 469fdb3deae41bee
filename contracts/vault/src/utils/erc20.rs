//! Minimal ERC-20 `transfer` call.

use alloc::vec::Vec;

use stylus_sdk::{
    alloy_primitives::{Address, U256},
    call::RawCall,
};

use vault_primitives::abi::{address_word, selector, u256_word};

/// Call `transfer(to, amount)` on `token`.
///
/// Treats a revert, a short return, or an explicit `false` word as failure.
/// Tokens that return no data on success (pre-standard ERC-20s) are accepted.
pub fn transfer_token(token: Address, to: Address, amount: U256) -> Result<(), ()> {
    let mut data = Vec::with_capacity(4 + 64);
    data.extend_from_slice(&selector("transfer(address,uint256)"));
    data.extend_from_slice(&address_word(to));
    data.extend_from_slice(&u256_word(amount));

    let out = unsafe { RawCall::new().call(token, &data) }.map_err(|_| ())?;
    if out.is_empty() {
        return Ok(());
    }
    if out.len() >= 32 && U256::from_be_slice(&out[0..32]) != U256::ZERO {
        return Ok(());
    }
    Err(())
}
