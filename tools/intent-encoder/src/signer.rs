//! ECDSA signing compatible with the on-chain `ecrecover` verification.

use alloy_primitives::{Address, B256};
use k256::ecdsa::{RecoveryId, SigningKey};
use sha3::{Digest, Keccak256};

use vault_primitives::{eth_signed_digest, rotation_digest};

use crate::intent::TransferIntent;

/// Sign a transfer intent, producing the 65-byte `r || s || v` wire signature
/// with `v` in {27, 28} and `s` in the lower half of the curve order.
pub fn sign_transfer(key: &SigningKey, intent: &TransferIntent) -> [u8; 65] {
    sign_digest(key, intent.signing_digest())
}

/// Sign a generation-rotation message for `owner` at its current generation.
pub fn sign_rotation(key: &SigningKey, owner: Address, generation: u64) -> [u8; 65] {
    sign_digest(key, eth_signed_digest(rotation_digest(owner, generation)))
}

/// 0x-prefixed hex of a wire signature, for CLI plumbing and logs.
pub fn signature_hex(sig: &[u8; 65]) -> String {
    format!("0x{}", hex::encode(sig))
}

/// Ethereum address of the key's public half.
pub fn signer_address(key: &SigningKey) -> Address {
    let pubkey = key.verifying_key().to_encoded_point(false);
    let hash = Keccak256::digest(&pubkey.as_bytes()[1..]);
    Address::from_slice(&hash[12..32])
}

fn sign_digest(key: &SigningKey, digest: B256) -> [u8; 65] {
    let (mut sig, mut recid) = key
        .sign_prehash_recoverable(digest.as_slice())
        .expect("prehash is a valid 32-byte scalar");

    // Enforce the low-s form the contracts require; flipping s flips the
    // recovery parity.
    if let Some(normalized) = sig.normalize_s() {
        sig = normalized;
        recid = RecoveryId::from_byte(recid.to_byte() ^ 1).expect("parity flip stays in range");
    }

    let mut wire = [0u8; 65];
    wire[0..64].copy_from_slice(&sig.to_bytes());
    wire[64] = 27 + recid.to_byte();
    wire
}
