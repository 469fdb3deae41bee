//! Vault factory: idempotent deterministic deployment of per-owner forwarding
//! accounts, plus the per-owner generation registry and its owner-signed
//! rotation.

#![cfg_attr(not(any(test, feature = "export-abi")), no_std)]

extern crate alloc;

pub mod factory;

pub use factory::VaultFactory;
