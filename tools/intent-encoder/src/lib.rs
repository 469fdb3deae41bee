//! Off-chain construction and signing of vault intents.
//!
//! Digests come from `vault-primitives`, the same code the contracts run, so
//! anything signed here verifies on-chain byte-for-byte.

pub mod intent;
pub mod signer;


pub use intent::{relay_calldata, send_calldata, TransferIntent};
pub use signer::{sign_rotation, sign_transfer, signature_hex, signer_address};
