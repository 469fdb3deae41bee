//! Signer recovery through the EVM `ecrecover` precompile.
//!
//! Both the vault and the factory authenticate owner signatures this way, so
//! the precompile call lives here in one place. The wire signature is
//! validated (length, v normalization, low-s) before it reaches this crate,
//! so recovery takes exactly one precompile call with no candidate retries.

#![no_std]

use stylus_sdk::{
    alloy_primitives::{Address, B256},
    call::RawCall,
};

use vault_primitives::{ecrecover_input, RecoverableSignature};

/// Recover the EOA that signed `digest` with an already-validated signature.
///
/// Returns `Err` on precompile failure, short return data, or a zero recovery
/// (the precompile's way of reporting an unrecoverable signature).
pub fn recover_signer(digest: B256, sig: &RecoverableSignature) -> Result<Address, ()> {
    // Precompile address 0x01.
    let mut precompile = [0u8; 20];
    precompile[19] = 1;
    let to = Address::from_slice(&precompile);

    let input = ecrecover_input(digest, sig);
    let out = unsafe { RawCall::new_static().gas(50_000).call(to, &input) }.map_err(|_| ())?;
    if out.len() < 32 {
        return Err(());
    }
    // 32-byte word with the address in the low 20 bytes.
    let recovered = Address::from_slice(&out[12..32]);
    if recovered == Address::ZERO {
        return Err(());
    }
    Ok(recovered)
}
