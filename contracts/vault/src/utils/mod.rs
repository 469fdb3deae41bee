//! Raw-call helpers for the vault contract.

pub mod erc20;
