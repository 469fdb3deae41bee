//! Relayer contract.
//!
//! `relay` is the single entry point a submitter calls with an owner-signed
//! transfer intent. It is stateless apart from the factory reference: account
//! existence, signature checking and nonce bookkeeping all live in the factory
//! and the vault. Sub-call failures propagate unmodified, so deploy-if-absent
//! and the transfer succeed or fail as one atomic unit.

use alloc::vec;
use alloc::vec::Vec;

use stylus_sdk::{
    alloy_primitives::{Address, U256},
    call::RawCall,
    prelude::*,
    stylus_core,
};

use alloy_sol_types::sol;
use stylus_sdk::stylus_proc::SolidityError;

use vault_primitives::abi::{address_word, bytes_tail, selector, u256_word, u64_word};

sol! {
    #[derive(Debug)]
    error ZeroFactory();
    #[derive(Debug)]
    error AlreadyInitialized(address factory);
    #[derive(Debug)]
    error NotInitialized();
    #[derive(Debug)]
    error MalformedResponse(address target);

    event RelayExecuted(
        address indexed submitter,
        address indexed owner,
        address vault,
        address token,
        address to,
        uint256 amount,
        address feeRecipient,
        uint256 fee,
        uint64 deadline
    );
}

#[derive(SolidityError, Debug)]
pub enum RelayerError {
    ZeroFactory(ZeroFactory),
    AlreadyInitialized(AlreadyInitialized),
    NotInitialized(NotInitialized),
    MalformedResponse(MalformedResponse),
}

sol_storage! {
    #[entrypoint]
    pub struct VaultRelayer {
        /// Factory this relayer deploys through. Set once.
        address factory;
    }
}

#[public]
impl VaultRelayer {
    /// One-shot configuration of the factory reference.
    pub fn initialize(&mut self, factory: Address) -> Result<(), RelayerError> {
        if self.factory.get() != Address::ZERO {
            return Err(RelayerError::AlreadyInitialized(AlreadyInitialized {
                factory: self.factory.get(),
            }));
        }
        if factory == Address::ZERO {
            return Err(RelayerError::ZeroFactory(ZeroFactory {}));
        }
        self.factory.set(factory);
        Ok(())
    }

    pub fn factory_address(&self) -> Address {
        self.factory.get()
    }

    /// Ensure the owner's vault exists, then forward the signed transfer.
    ///
    /// Errors from the factory or the vault are re-raised with their original
    /// revert data so submitters see the underlying reason.
    #[allow(clippy::too_many_arguments)]
    pub fn relay(
        &mut self,
        owner: Address,
        token: Address,
        to: Address,
        amount: U256,
        fee_recipient: Address,
        fee: U256,
        deadline: u64,
        signature: Vec<u8>,
    ) -> Result<(), Vec<u8>> {
        let factory = self.factory.get();
        if factory == Address::ZERO {
            return Err(RelayerError::NotInitialized(NotInitialized {}).into());
        }

        let vault = self.ensure_vault(factory, owner)?;

        let mut data = selector("send(address,address,uint256,address,uint256,uint64,bytes)").to_vec();
        data.extend_from_slice(&address_word(token));
        data.extend_from_slice(&address_word(to));
        data.extend_from_slice(&u256_word(amount));
        data.extend_from_slice(&address_word(fee_recipient));
        data.extend_from_slice(&u256_word(fee));
        data.extend_from_slice(&u64_word(deadline));
        // offset of the bytes tail: 7 head words
        data.extend_from_slice(&u256_word(U256::from(7 * 32)));
        data.extend_from_slice(&bytes_tail(&signature));
        unsafe { RawCall::new().call(vault, &data) }?;

        stylus_core::log(
            self.vm(),
            RelayExecuted {
                submitter: self.vm().msg_sender(),
                owner,
                vault,
                token,
                to,
                amount,
                feeRecipient: fee_recipient,
                fee,
                deadline,
            },
        );
        Ok(())
    }
}

impl VaultRelayer {
    /// Deploy the owner's current-generation vault if it is absent; either way
    /// return its address.
    fn ensure_vault(&mut self, factory: Address, owner: Address) -> Result<Address, Vec<u8>> {
        let mut query = selector("isDeployed(address)").to_vec();
        query.extend_from_slice(&address_word(owner));
        let out = unsafe { RawCall::new_static().call(factory, &query) }?;
        let deployed = decode_bool(factory, &out)?;

        // the lookup is a read; deploying mutates the factory's host state
        let call = if deployed {
            "computeAddress(address)"
        } else {
            "deploy(address)"
        };
        let mut data = selector(call).to_vec();
        data.extend_from_slice(&address_word(owner));
        let out = if deployed {
            unsafe { RawCall::new_static().call(factory, &data) }?
        } else {
            unsafe { RawCall::new().call(factory, &data) }?
        };
        decode_address(factory, &out)
    }
}

fn decode_bool(target: Address, out: &[u8]) -> Result<bool, Vec<u8>> {
    if out.len() < 32 {
        return Err(RelayerError::MalformedResponse(MalformedResponse { target }).into());
    }
    Ok(U256::from_be_slice(&out[0..32]) != U256::ZERO)
}

fn decode_address(target: Address, out: &[u8]) -> Result<Address, Vec<u8>> {
    if out.len() < 32 {
        return Err(RelayerError::MalformedResponse(MalformedResponse { target }).into());
    }
    Ok(Address::from_slice(&out[12..32]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use stylus_sdk::testing::*;

    const FACTORY: Address = Address::new([0xFA; 20]);
    const OWNER: Address = Address::new([0x0E; 20]);
    const VAULT: Address = Address::new([0x7A; 20]);
    const TOKEN: Address = Address::new([0x70; 20]);
    const RECIPIENT: Address = Address::new([0x2A; 20]);
    const FEE_RECIPIENT: Address = Address::new([0xFE; 20]);

    fn wire_signature() -> Vec<u8> {
        vec![0x11; 65]
    }

    fn configured_relayer(vm: &TestVM) -> VaultRelayer {
        let mut relayer = VaultRelayer::from(vm);
        relayer.initialize(FACTORY).unwrap();
        relayer
    }

    fn factory_query(name: &str) -> Vec<u8> {
        let mut data = selector(name).to_vec();
        data.extend_from_slice(&address_word(OWNER));
        data
    }

    fn send_calldata() -> Vec<u8> {
        let mut data =
            selector("send(address,address,uint256,address,uint256,uint64,bytes)").to_vec();
        data.extend_from_slice(&address_word(TOKEN));
        data.extend_from_slice(&address_word(RECIPIENT));
        data.extend_from_slice(&u256_word(U256::from(100u64)));
        data.extend_from_slice(&address_word(FEE_RECIPIENT));
        data.extend_from_slice(&u256_word(U256::from(1u64)));
        data.extend_from_slice(&u64_word(1_000));
        data.extend_from_slice(&u256_word(U256::from(224u64)));
        data.extend_from_slice(&bytes_tail(&wire_signature()));
        data
    }

    fn relay(relayer: &mut VaultRelayer) -> Result<(), Vec<u8>> {
        relayer.relay(
            OWNER,
            TOKEN,
            RECIPIENT,
            U256::from(100u64),
            FEE_RECIPIENT,
            U256::from(1u64),
            1_000,
            wire_signature(),
        )
    }

    #[test]
    fn initialize_sets_factory_once() {
        let vm = TestVM::default();
        let mut relayer = configured_relayer(&vm);
        assert_eq!(relayer.factory_address(), FACTORY);
        assert!(matches!(
            relayer.initialize(FACTORY),
            Err(RelayerError::AlreadyInitialized(_))
        ));
    }

    #[test]
    fn relay_requires_configuration() {
        let vm = TestVM::default();
        let mut relayer = VaultRelayer::from(&vm);
        assert!(relay(&mut relayer).is_err());
    }

    #[test]
    fn relay_deploys_absent_vault_then_forwards() {
        let vm = TestVM::default();
        let mut relayer = configured_relayer(&vm);
        vm.mock_static_call(
            FACTORY,
            factory_query("isDeployed(address)"),
            Ok(u256_word(U256::ZERO).to_vec()),
        );
        vm.mock_call(
            FACTORY,
            factory_query("deploy(address)"),
            Ok(address_word(VAULT).to_vec()),
        );
        vm.mock_call(VAULT, send_calldata(), Ok(Vec::new()));

        relay(&mut relayer).unwrap();
    }

    #[test]
    fn relay_reuses_existing_vault() {
        let vm = TestVM::default();
        let mut relayer = configured_relayer(&vm);
        vm.mock_static_call(
            FACTORY,
            factory_query("isDeployed(address)"),
            Ok(u256_word(U256::from(1u64)).to_vec()),
        );
        vm.mock_static_call(
            FACTORY,
            factory_query("computeAddress(address)"),
            Ok(address_word(VAULT).to_vec()),
        );
        vm.mock_call(VAULT, send_calldata(), Ok(Vec::new()));

        relay(&mut relayer).unwrap();
    }

    #[test]
    fn relay_propagates_vault_revert_unmodified() {
        let vm = TestVM::default();
        let mut relayer = configured_relayer(&vm);
        vm.mock_static_call(
            FACTORY,
            factory_query("isDeployed(address)"),
            Ok(u256_word(U256::from(1u64)).to_vec()),
        );
        vm.mock_static_call(
            FACTORY,
            factory_query("computeAddress(address)"),
            Ok(address_word(VAULT).to_vec()),
        );
        let revert_data = vec![0xde, 0xad, 0xbe, 0xef];
        vm.mock_call(VAULT, send_calldata(), Err(revert_data.clone()));

        assert_eq!(relay(&mut relayer), Err(revert_data));
    }

    #[test]
    fn relay_propagates_deploy_failure() {
        let vm = TestVM::default();
        let mut relayer = configured_relayer(&vm);
        vm.mock_static_call(
            FACTORY,
            factory_query("isDeployed(address)"),
            Ok(u256_word(U256::ZERO).to_vec()),
        );
        let revert_data = vec![0x01, 0x02];
        vm.mock_call(FACTORY, factory_query("deploy(address)"), Err(revert_data.clone()));

        assert_eq!(relay(&mut relayer), Err(revert_data));
    }
}
