//! Relay orchestration for the counterfactual vault wallet: ensures the
//! owner's account exists, forwards the signed transfer, and surfaces a
//! completion record for off-chain indexers.

#![cfg_attr(not(any(test, feature = "export-abi")), no_std)]

extern crate alloc;

pub mod relayer;

pub use relayer::VaultRelayer;
