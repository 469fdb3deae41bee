//! Deterministic account addresses and the minimal forwarding template.
//!
//! An owner's vault lives at an address that is a pure function of
//! `(factory, template code hash, owner, generation)`, so anyone can compute it
//! before the account exists and fund it counterfactually. The template is the
//! EIP-1167 minimal proxy: constant-size init code with one embedded 20-byte
//! logic address, which keeps the code hash constant across owners.

use alloy_primitives::{keccak256, Address, FixedBytes, B256};

/// Length of the forwarding-template init code (creation prefix + runtime).
pub const TEMPLATE_LEN: usize = 55;

/// CREATE2 domain byte, per the EVM derivation rule.
const CREATE2_PREFIX: u8 = 0xff;

// EIP-1167 byte pattern, split around the embedded logic address.
const TEMPLATE_HEAD: [u8; 20] = [
    // creation code: copies the runtime into memory and returns it
    0x3d, 0x60, 0x2d, 0x80, 0x60, 0x0a, 0x3d, 0x39, 0x81, 0xf3,
    // runtime prelude: calldata copy + delegatecall setup
    0x36, 0x3d, 0x3d, 0x37, 0x3d, 0x3d, 0x3d, 0x36, 0x3d, 0x73,
];
const TEMPLATE_TAIL: [u8; 15] = [
    0x5a, 0xf4, 0x3d, 0x82, 0x80, 0x3e, 0x90, 0x3d, 0x91, 0x60, 0x2b, 0x57, 0xfd, 0x5b, 0xf3,
];

/// Build the forwarding-template init code for a given logic contract.
///
/// Every call to an account deployed from this template is delegated to
/// `logic` while executing against the account's own storage.
pub fn forwarding_template(logic: Address) -> [u8; TEMPLATE_LEN] {
    let mut code = [0u8; TEMPLATE_LEN];
    code[0..20].copy_from_slice(&TEMPLATE_HEAD);
    code[20..40].copy_from_slice(logic.as_slice());
    code[40..55].copy_from_slice(&TEMPLATE_TAIL);
    code
}

/// keccak256 of the init code deployed for `logic`.
pub fn template_code_hash(logic: Address) -> B256 {
    keccak256(forwarding_template(logic))
}

/// CREATE2 salt for an `(owner, generation)` pair: keccak256(owner || generation_be8).
pub fn deployment_salt(owner: Address, generation: u64) -> B256 {
    let mut buf = [0u8; 28];
    buf[0..20].copy_from_slice(owner.as_slice());
    buf[20..28].copy_from_slice(&generation.to_be_bytes());
    keccak256(buf)
}

/// Deterministic vault address for `(factory, code hash, owner, generation)`.
///
/// `keccak256(0xff || factory || salt || code_hash)`, low-order 20 bytes. Valid
/// to query before deployment; deployment lands code at exactly this address.
pub fn compute_vault_address(
    factory: Address,
    code_hash: B256,
    owner: Address,
    generation: u64,
) -> Address {
    let salt = deployment_salt(owner, generation);
    let mut buf = [0u8; 1 + 20 + 32 + 32];
    buf[0] = CREATE2_PREFIX;
    buf[1..21].copy_from_slice(factory.as_slice());
    buf[21..53].copy_from_slice(salt.as_slice());
    buf[53..85].copy_from_slice(code_hash.as_slice());
    let digest: FixedBytes<32> = keccak256(buf);
    Address::from_slice(&digest[12..32])
}
