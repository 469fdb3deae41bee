//! Transfer intents and the calldata a submitter sends on-chain.

use alloy_primitives::{Address, B256, U256};

use vault_primitives::abi::{address_word, bytes_tail, selector, u256_word, u64_word};
use vault_primitives::{eth_signed_digest, transfer_digest};

/// One signed-transfer authorization, mirroring the field set and order bound
/// into the on-chain digest.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransferIntent {
    pub token: Address,
    pub to: Address,
    pub amount: U256,
    pub fee_recipient: Address,
    pub fee: U256,
    /// Wall-clock cutoff (unix seconds) after which the intent is dead.
    pub deadline: u64,
    /// The vault's transfer nonce at signing time.
    pub nonce: u64,
}

impl TransferIntent {
    /// The digest the owner signs (personal-message prefixed).
    pub fn signing_digest(&self) -> B256 {
        eth_signed_digest(transfer_digest(
            self.token,
            self.to,
            self.amount,
            self.fee_recipient,
            self.fee,
            self.deadline,
            self.nonce,
        ))
    }
}

/// Calldata for `Vault.send` with a 65-byte wire signature.
pub fn send_calldata(intent: &TransferIntent, signature: &[u8; 65]) -> Vec<u8> {
    let mut data = selector("send(address,address,uint256,address,uint256,uint64,bytes)").to_vec();
    data.extend_from_slice(&address_word(intent.token));
    data.extend_from_slice(&address_word(intent.to));
    data.extend_from_slice(&u256_word(intent.amount));
    data.extend_from_slice(&address_word(intent.fee_recipient));
    data.extend_from_slice(&u256_word(intent.fee));
    data.extend_from_slice(&u64_word(intent.deadline));
    data.extend_from_slice(&u256_word(U256::from(7 * 32)));
    data.extend_from_slice(&bytes_tail(signature));
    data
}

/// Calldata for `VaultRelayer.relay`, submitted by the paying third party.
pub fn relay_calldata(owner: Address, intent: &TransferIntent, signature: &[u8; 65]) -> Vec<u8> {
    let mut data = selector(
        "relay(address,address,address,uint256,address,uint256,uint64,bytes)",
    )
    .to_vec();
    data.extend_from_slice(&address_word(owner));
    data.extend_from_slice(&address_word(intent.token));
    data.extend_from_slice(&address_word(intent.to));
    data.extend_from_slice(&u256_word(intent.amount));
    data.extend_from_slice(&address_word(intent.fee_recipient));
    data.extend_from_slice(&u256_word(intent.fee));
    data.extend_from_slice(&u64_word(intent.deadline));
    data.extend_from_slice(&u256_word(U256::from(8 * 32)));
    data.extend_from_slice(&bytes_tail(signature));
    data
}
