//! Per-owner vault account for the counterfactual wallet system.
//!
//! Deployed behind a minimal forwarding proxy by the factory; holds funds for
//! exactly one owner and executes transfers the owner authorized off-chain by
//! signature, with strict replay protection.

#![cfg_attr(not(any(test, feature = "export-abi")), no_std)]

extern crate alloc;

pub mod utils;
pub mod vault;

pub use vault::Vault;
