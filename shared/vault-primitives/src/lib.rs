//! Shared pure routines for the counterfactual vault wallet.
//!
//! Everything here is deterministic and host-independent, so the same code runs
//! inside the Stylus contracts and in off-chain tooling/tests. In particular the
//! address-derivation formula exists only here: the factory, the relayer and any
//! off-chain precomputation all call the same function, so there is no second
//! copy of the formula to drift.

#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod abi;
pub mod address;
pub mod digest;
pub mod signature;

pub use address::{
    compute_vault_address, deployment_salt, forwarding_template, template_code_hash,
    TEMPLATE_LEN,
};
pub use digest::{eth_signed_digest, rotation_digest, transfer_digest};
pub use signature::{
    ecrecover_input, parse_signature, RecoverableSignature, SignatureError, SIGNATURE_LEN,
};
