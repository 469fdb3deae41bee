//! Vault account: holds funds for one owner and executes signature-authorized,
//! replay-protected, fee-splitting transfers.
//!
//! Design notes:
//! - The owner binding is one-shot: it transitions unset -> bound exactly once,
//!   established by the deploying factory in the same invocation as the CREATE2.
//! - Replay protection is the transfer nonce: every signed intent binds the
//!   nonce value before mutation, and the nonce is advanced *before* any
//!   external token call. That ordering is the authoritative reentrancy
//!   defense; the transient `busy` flag additionally blocks nested entry
//!   outright.

use alloc::vec;
use alloc::vec::Vec;

use stylus_sdk::{
    alloy_primitives::{Address, U256, U64},
    prelude::*,
    stylus_core,
};

use alloy_sol_types::sol;
use stylus_sdk::stylus_proc::SolidityError;

use vault_ecrecover::recover_signer;
use vault_primitives::{eth_signed_digest, parse_signature, transfer_digest, SignatureError};

use crate::utils::erc20::transfer_token;

sol! {
    #[derive(Debug)]
    error DeadlineExceeded(uint64 deadline, uint64 current);
    #[derive(Debug)]
    error FeeExceedsAmount(uint256 fee, uint256 amount);
    #[derive(Debug)]
    error InvalidFeeRecipient();
    #[derive(Debug)]
    error Reentrant();
    #[derive(Debug)]
    error InvalidSignatureLength();
    #[derive(Debug)]
    error InvalidV();
    #[derive(Debug)]
    error InvalidS();
    #[derive(Debug)]
    error InvalidSignature();
    #[derive(Debug)]
    error AlreadyInitialized(address owner);
    #[derive(Debug)]
    error Unauthorized(address caller);
    #[derive(Debug)]
    error ZeroOwner();
    #[derive(Debug)]
    error TransferFailed(address token, address to, uint256 amount);

    event TransferExecuted(
        address indexed token,
        address indexed to,
        uint256 amount,
        address feeRecipient,
        uint256 fee,
        uint64 deadline,
        uint64 nonceUsed
    );
}

#[derive(SolidityError, Debug)]
pub enum VaultError {
    DeadlineExceeded(DeadlineExceeded),
    FeeExceedsAmount(FeeExceedsAmount),
    InvalidFeeRecipient(InvalidFeeRecipient),
    Reentrant(Reentrant),
    InvalidSignatureLength(InvalidSignatureLength),
    InvalidV(InvalidV),
    InvalidS(InvalidS),
    InvalidSignature(InvalidSignature),
    AlreadyInitialized(AlreadyInitialized),
    Unauthorized(Unauthorized),
    ZeroOwner(ZeroOwner),
    TransferFailed(TransferFailed),
}

sol_storage! {
    /// Per-account state, living in the proxy's storage.
    #[entrypoint]
    pub struct Vault {
        /// Factory that deployed this account; bound together with the owner.
        address factory;
        /// Owner whose signatures authorize transfers. Set exactly once.
        address owner;
        /// Strictly monotonic transfer nonce; +1 per successful `send`.
        uint64 transfer_nonce;
        /// Transient reentrancy flag, true only while a transfer is in flight.
        bool busy;
    }
}

#[public]
impl Vault {
    /// One-shot owner binding, invoked by the factory immediately after the
    /// CREATE2 lands this account's code.
    ///
    /// No other caller can observe the unbound state: the address has no code
    /// until the factory's deploy invocation, which also initializes it.
    pub fn initialize(&mut self, owner: Address) -> Result<(), VaultError> {
        if self.owner.get() != Address::ZERO {
            let caller = self.vm().msg_sender();
            if caller != self.factory.get() {
                return Err(VaultError::Unauthorized(Unauthorized { caller }));
            }
            return Err(VaultError::AlreadyInitialized(AlreadyInitialized {
                owner: self.owner.get(),
            }));
        }
        if owner == Address::ZERO {
            return Err(VaultError::ZeroOwner(ZeroOwner {}));
        }

        self.factory.set(self.vm().msg_sender());
        self.owner.set(owner);
        Ok(())
    }

    /// Execute an owner-signed transfer intent.
    ///
    /// The signed digest binds `(token, to, amount, fee_recipient, fee,
    /// deadline)` together with the account's current transfer nonce, so a
    /// consumed signature never verifies again.
    #[allow(clippy::too_many_arguments)]
    pub fn send(
        &mut self,
        token: Address,
        to: Address,
        amount: U256,
        fee_recipient: Address,
        fee: U256,
        deadline: u64,
        signature: Vec<u8>,
    ) -> Result<(), VaultError> {
        let now = self.vm().block_timestamp();
        if now >= deadline {
            return Err(VaultError::DeadlineExceeded(DeadlineExceeded {
                deadline,
                current: now,
            }));
        }
        if fee > amount {
            return Err(VaultError::FeeExceedsAmount(FeeExceedsAmount { fee, amount }));
        }
        if fee > U256::ZERO && fee_recipient == Address::ZERO {
            return Err(VaultError::InvalidFeeRecipient(InvalidFeeRecipient {}));
        }
        if self.busy.get() {
            return Err(VaultError::Reentrant(Reentrant {}));
        }

        let nonce = self.transfer_nonce.get().to::<u64>();
        let digest = eth_signed_digest(transfer_digest(
            token,
            to,
            amount,
            fee_recipient,
            fee,
            deadline,
            nonce,
        ));

        let sig = parse_signature(&signature).map_err(|e| match e {
            SignatureError::InvalidLength => {
                VaultError::InvalidSignatureLength(InvalidSignatureLength {})
            }
            SignatureError::InvalidV => VaultError::InvalidV(InvalidV {}),
            SignatureError::InvalidS => VaultError::InvalidS(InvalidS {}),
        })?;
        let signer = recover_signer(digest, &sig)
            .map_err(|_| VaultError::InvalidSignature(InvalidSignature {}))?;
        if signer != self.owner.get() {
            return Err(VaultError::InvalidSignature(InvalidSignature {}));
        }

        // Consume the nonce and raise the flag before any external call, so a
        // token re-entering `send` sees a stale-nonce digest and a busy account.
        self.busy.set(true);
        self.transfer_nonce.set(U64::from(nonce + 1));

        let payout = amount - fee;
        transfer_token(token, to, payout).map_err(|_| {
            VaultError::TransferFailed(TransferFailed {
                token,
                to,
                amount: payout,
            })
        })?;
        if fee > U256::ZERO {
            transfer_token(token, fee_recipient, fee).map_err(|_| {
                VaultError::TransferFailed(TransferFailed {
                    token,
                    to: fee_recipient,
                    amount: fee,
                })
            })?;
        }

        self.busy.set(false);

        stylus_core::log(
            self.vm(),
            TransferExecuted {
                token,
                to,
                amount,
                feeRecipient: fee_recipient,
                fee,
                deadline,
                nonceUsed: nonce,
            },
        );
        Ok(())
    }

    pub fn owner(&self) -> Address {
        self.owner.get()
    }

    pub fn factory_address(&self) -> Address {
        self.factory.get()
    }

    pub fn transfer_nonce(&self) -> u64 {
        self.transfer_nonce.get().to::<u64>()
    }
}
