//! Minimal ABI word encoding for hand-built external calls.
//!
//! The contracts talk to each other (and to ERC-20 tokens) through raw calls
//! with hand-packed calldata, so the word layout lives here next to the other
//! wire formats and is shared with the tests that mock those calls.

use alloc::vec::Vec;

use alloy_primitives::{keccak256, Address, U256};

/// First four bytes of keccak256 over a Solidity function signature.
pub fn selector(sig: &str) -> [u8; 4] {
    let h = keccak256(sig.as_bytes());
    [h[0], h[1], h[2], h[3]]
}

/// Left-padded address word.
pub fn address_word(value: Address) -> [u8; 32] {
    let mut word = [0u8; 32];
    word[12..32].copy_from_slice(value.as_slice());
    word
}

/// Big-endian uint256 word.
pub fn u256_word(value: U256) -> [u8; 32] {
    value.to_be_bytes::<32>()
}

/// Left-padded uint64 word.
pub fn u64_word(value: u64) -> [u8; 32] {
    let mut word = [0u8; 32];
    word[24..32].copy_from_slice(&value.to_be_bytes());
    word
}

/// Dynamic `bytes` tail: length word followed by the payload padded to a
/// 32-byte boundary. The caller appends this after the head words and points
/// the head's offset word at it.
pub fn bytes_tail(payload: &[u8]) -> Vec<u8> {
    let padded = payload.len().div_ceil(32) * 32;
    let mut tail = Vec::with_capacity(32 + padded);
    tail.extend_from_slice(&u256_word(U256::from(payload.len())));
    tail.extend_from_slice(payload);
    tail.resize(32 + padded, 0);
    tail
}
