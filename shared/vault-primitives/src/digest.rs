//! Signed-message digests for transfers and generation rotation.
//!
//! Raw digests are tight, delimiter-free, fixed-width concatenations of the
//! operation's fields, so there is exactly one byte encoding per intent. The
//! final signed value wraps the raw digest in the standard Ethereum personal
//! message prefix, domain-separating this scheme from raw-digest signing.

use alloy_primitives::{keccak256, Address, B256, U256};

/// Literal tag bound into every generation-rotation message.
const ROTATION_TAG: &[u8] = b"VaultNonce";

/// Raw digest of a transfer intent, using the account's transfer nonce *before*
/// the mutation it authorizes.
///
/// Field order and widths: token(20) || to(20) || amount(32) || fee_recipient(20)
/// || fee(32) || deadline(8) || nonce(8).
#[allow(clippy::too_many_arguments)]
pub fn transfer_digest(
    token: Address,
    to: Address,
    amount: U256,
    fee_recipient: Address,
    fee: U256,
    deadline: u64,
    nonce: u64,
) -> B256 {
    let mut buf = [0u8; 20 + 20 + 32 + 20 + 32 + 8 + 8];
    buf[0..20].copy_from_slice(token.as_slice());
    buf[20..40].copy_from_slice(to.as_slice());
    buf[40..72].copy_from_slice(&amount.to_be_bytes::<32>());
    buf[72..92].copy_from_slice(fee_recipient.as_slice());
    buf[92..124].copy_from_slice(&fee.to_be_bytes::<32>());
    buf[124..132].copy_from_slice(&deadline.to_be_bytes());
    buf[132..140].copy_from_slice(&nonce.to_be_bytes());
    keccak256(buf)
}

/// Raw digest authorizing one generation-nonce rotation for `owner`.
pub fn rotation_digest(owner: Address, generation: u64) -> B256 {
    let mut buf = [0u8; 10 + 20 + 8];
    buf[0..10].copy_from_slice(ROTATION_TAG);
    buf[10..30].copy_from_slice(owner.as_slice());
    buf[30..38].copy_from_slice(&generation.to_be_bytes());
    keccak256(buf)
}

/// Wrap a raw digest in the `personal_sign` prefix ("\x19Ethereum Signed
/// Message:\n32"), matching what wallets sign over a 32-byte payload.
pub fn eth_signed_digest(raw: B256) -> B256 {
    let mut buf = [0u8; 28 + 32];
    buf[0..28].copy_from_slice(b"\x19Ethereum Signed Message:\n32");
    buf[28..60].copy_from_slice(raw.as_slice());
    keccak256(buf)
}
