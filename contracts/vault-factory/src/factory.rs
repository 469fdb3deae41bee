//! Factory contract.
//!
//! Deployment is keyed by `(owner, generation)`: the CREATE2 salt and therefore
//! the account address are pure functions of those inputs plus the factory's
//! own address and the template code hash. The registry only stores the
//! generation counter; addresses are recomputed on demand and never persisted.
//!
//! Rotation is an intentionally permissionless relay of a self-authorizing
//! action: anyone holding a valid owner signature over the *current* generation
//! may submit it. Rotating never touches an already-deployed account; it only
//! retargets future deployments for that owner.

use alloc::vec;
use alloc::vec::Vec;

use stylus_sdk::{
    alloy_primitives::{Address, B256, U256, U64},
    call::RawCall,
    deploy::RawDeploy,
    prelude::*,
    stylus_core,
};

use alloy_sol_types::sol;
use stylus_sdk::stylus_proc::SolidityError;

use vault_ecrecover::recover_signer;
use vault_primitives::{
    abi::{address_word, selector},
    compute_vault_address, deployment_salt, eth_signed_digest, forwarding_template,
    parse_signature, rotation_digest, template_code_hash,
};

sol! {
    #[derive(Debug)]
    error ZeroOwner();
    #[derive(Debug)]
    error ZeroLogic();
    #[derive(Debug)]
    error AlreadyInitialized(address logic);
    #[derive(Debug)]
    error EmptyTemplate();
    #[derive(Debug)]
    error AlreadyDeployed(address vault);
    #[derive(Debug)]
    error DeployFailed();
    #[derive(Debug)]
    error InitializeFailed(address vault);
    #[derive(Debug)]
    error InvalidSignature();

    event VaultDeployed(address indexed owner, uint64 generation, address vault);
    event GenerationRotated(address indexed owner, uint64 oldNonce, uint64 newNonce);
}

#[derive(SolidityError, Debug)]
pub enum FactoryError {
    ZeroOwner(ZeroOwner),
    ZeroLogic(ZeroLogic),
    AlreadyInitialized(AlreadyInitialized),
    EmptyTemplate(EmptyTemplate),
    AlreadyDeployed(AlreadyDeployed),
    DeployFailed(DeployFailed),
    InitializeFailed(InitializeFailed),
    InvalidSignature(InvalidSignature),
}

sol_storage! {
    #[entrypoint]
    pub struct VaultFactory {
        /// Logic contract every deployed template forwards to. Set once.
        address logic;
        /// Per-owner generation nonce; selects the active account generation.
        mapping(address => uint64) generations;
    }
}

#[public]
impl VaultFactory {
    /// One-shot configuration of the forwarding target.
    pub fn initialize(&mut self, logic: Address) -> Result<(), FactoryError> {
        if self.logic.get() != Address::ZERO {
            return Err(FactoryError::AlreadyInitialized(AlreadyInitialized {
                logic: self.logic.get(),
            }));
        }
        if logic == Address::ZERO {
            return Err(FactoryError::ZeroLogic(ZeroLogic {}));
        }
        self.logic.set(logic);
        Ok(())
    }

    /// Deploy the forwarding account for `owner`'s current generation and bind
    /// its owner, all in one invocation.
    ///
    /// Does not mutate the generation registry; redeploying the same
    /// generation fails because the address is already occupied.
    pub fn deploy(&mut self, owner: Address) -> Result<Address, FactoryError> {
        if owner == Address::ZERO {
            return Err(FactoryError::ZeroOwner(ZeroOwner {}));
        }
        let logic = self.logic.get();
        if logic == Address::ZERO {
            return Err(FactoryError::EmptyTemplate(EmptyTemplate {}));
        }

        let generation = self.generations.get(owner).to::<u64>();
        let predicted = self.derive(owner, generation, logic);
        if self.vm().code_size(predicted) > 0 {
            return Err(FactoryError::AlreadyDeployed(AlreadyDeployed {
                vault: predicted,
            }));
        }

        let code = forwarding_template(logic);
        let salt: B256 = deployment_salt(owner, generation);
        let vault = unsafe { RawDeploy::new().salt(salt).deploy(&code, U256::ZERO) }
            .map_err(|_| FactoryError::DeployFailed(DeployFailed {}))?;

        let mut data = selector("initialize(address)").to_vec();
        data.extend_from_slice(&address_word(owner));
        unsafe { RawCall::new().call(vault, &data) }
            .map_err(|_| FactoryError::InitializeFailed(InitializeFailed { vault }))?;

        stylus_core::log(
            self.vm(),
            VaultDeployed {
                owner,
                generation,
                vault,
            },
        );
        Ok(vault)
    }

    /// Deterministic account address for `owner`'s current generation. Valid
    /// to call before deployment; deployment lands code exactly here.
    pub fn compute_address(&self, owner: Address) -> Address {
        let generation = self.generations.get(owner).to::<u64>();
        self.derive(owner, generation, self.logic.get())
    }

    /// Deterministic account address for an explicit generation.
    pub fn compute_address_for(&self, owner: Address, generation: u64) -> Address {
        self.derive(owner, generation, self.logic.get())
    }

    /// True iff executable code is present at the current generation's address.
    pub fn is_deployed(&self, owner: Address) -> bool {
        self.vm().code_size(self.compute_address(owner)) > 0
    }

    /// True iff executable code is present at an explicit generation's address.
    pub fn is_deployed_for(&self, owner: Address, generation: u64) -> bool {
        self.vm().code_size(self.compute_address_for(owner, generation)) > 0
    }

    /// Current generation nonce for `owner` (0 until first rotation).
    pub fn generation_of(&self, owner: Address) -> u64 {
        self.generations.get(owner).to::<u64>()
    }

    /// Advance `owner`'s generation nonce by exactly one, authorized by an
    /// owner signature over the current value. Permissionless to submit; the
    /// signature is the authorization. Consumed signatures never verify again
    /// because the signed message binds the pre-rotation nonce.
    pub fn increment_nonce(&mut self, owner: Address, signature: Vec<u8>) -> Result<(), FactoryError> {
        let current = self.generations.get(owner).to::<u64>();
        let digest = eth_signed_digest(rotation_digest(owner, current));

        let sig = parse_signature(&signature)
            .map_err(|_| FactoryError::InvalidSignature(InvalidSignature {}))?;
        let signer = recover_signer(digest, &sig)
            .map_err(|_| FactoryError::InvalidSignature(InvalidSignature {}))?;
        if signer != owner {
            return Err(FactoryError::InvalidSignature(InvalidSignature {}));
        }

        let next = current + 1;
        self.generations.insert(owner, U64::from(next));
        stylus_core::log(
            self.vm(),
            GenerationRotated {
                owner,
                oldNonce: current,
                newNonce: next,
            },
        );
        Ok(())
    }
}

impl VaultFactory {
    fn derive(&self, owner: Address, generation: u64, logic: Address) -> Address {
        compute_vault_address(
            self.vm().contract_address(),
            template_code_hash(logic),
            owner,
            generation,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stylus_sdk::testing::*;
    use vault_primitives::ecrecover_input;

    const LOGIC: Address = Address::new([0x10; 20]);
    const OWNER: Address = Address::new([0x0E; 20]);

    fn wire_signature() -> Vec<u8> {
        let mut sig = vec![0x11; 65];
        sig[32..64].copy_from_slice(&[0x22; 32]);
        sig[64] = 27;
        sig
    }

    fn precompile() -> Address {
        let mut bytes = [0u8; 20];
        bytes[19] = 1;
        Address::new(bytes)
    }

    fn configured_factory(vm: &TestVM) -> VaultFactory {
        let mut factory = VaultFactory::from(vm);
        factory.initialize(LOGIC).unwrap();
        factory
    }

    /// Register an `ecrecover` mock for the rotation message at `generation`.
    fn mock_rotation_recover(vm: &TestVM, generation: u64, recovered: Address) {
        let digest = eth_signed_digest(rotation_digest(OWNER, generation));
        let sig = parse_signature(&wire_signature()).unwrap();
        vm.mock_static_call(
            precompile(),
            ecrecover_input(digest, &sig).to_vec(),
            Ok(address_word(recovered).to_vec()),
        );
    }

    #[test]
    fn initialize_sets_logic_once() {
        let vm = TestVM::default();
        let mut factory = configured_factory(&vm);
        assert!(matches!(
            factory.initialize(Address::new([0x11; 20])),
            Err(FactoryError::AlreadyInitialized(_))
        ));
    }

    #[test]
    fn initialize_rejects_zero_logic() {
        let vm = TestVM::default();
        let mut factory = VaultFactory::from(&vm);
        assert!(matches!(
            factory.initialize(Address::ZERO),
            Err(FactoryError::ZeroLogic(_))
        ));
    }

    #[test]
    fn compute_address_is_pure_and_owner_scoped() {
        let vm = TestVM::default();
        let factory = configured_factory(&vm);
        let a = factory.compute_address(OWNER);
        assert_eq!(a, factory.compute_address(OWNER));
        assert_eq!(a, factory.compute_address_for(OWNER, 0));
        assert_ne!(a, factory.compute_address(Address::new([0x0F; 20])));
        assert_ne!(a, factory.compute_address_for(OWNER, 1));
    }

    #[test]
    fn deploy_rejects_zero_owner() {
        let vm = TestVM::default();
        let mut factory = configured_factory(&vm);
        assert!(matches!(
            factory.deploy(Address::ZERO),
            Err(FactoryError::ZeroOwner(_))
        ));
    }

    #[test]
    fn deploy_requires_a_template() {
        let vm = TestVM::default();
        let mut factory = VaultFactory::from(&vm);
        assert!(matches!(
            factory.deploy(OWNER),
            Err(FactoryError::EmptyTemplate(_))
        ));
    }

    #[test]
    fn deploy_lands_at_the_computed_address() {
        let vm = TestVM::default();
        let mut factory = configured_factory(&vm);
        let predicted = factory.compute_address(OWNER);

        vm.mock_deploy(
            forwarding_template(LOGIC).to_vec(),
            Some(deployment_salt(OWNER, 0)),
            Ok(predicted),
        );
        let mut init = selector("initialize(address)").to_vec();
        init.extend_from_slice(&address_word(OWNER));
        vm.mock_call(predicted, init, Ok(Vec::new()));

        assert_eq!(factory.deploy(OWNER).unwrap(), predicted);
        // deploying never advances the generation
        assert_eq!(factory.generation_of(OWNER), 0);

        let logs = vm.get_emitted_logs();
        assert_eq!(logs.len(), 1);
        // owner is the indexed topic of VaultDeployed
        assert_eq!(logs[0].0[1], B256::from(address_word(OWNER)));
    }

    #[test]
    fn deploy_rejects_an_occupied_address() {
        let vm = TestVM::default();
        let mut factory = configured_factory(&vm);
        let predicted = factory.compute_address(OWNER);
        vm.set_code(predicted, forwarding_template(LOGIC).to_vec());

        assert!(matches!(
            factory.deploy(OWNER),
            Err(FactoryError::AlreadyDeployed(AlreadyDeployed { vault })) if vault == predicted
        ));
        assert!(factory.is_deployed(OWNER));

        // a rotated generation points at a fresh address and deploys again
        mock_rotation_recover(&vm, 0, OWNER);
        factory.increment_nonce(OWNER, wire_signature()).unwrap();
        assert!(!factory.is_deployed(OWNER));
    }

    #[test]
    fn nothing_is_deployed_initially() {
        let vm = TestVM::default();
        let factory = configured_factory(&vm);
        assert!(!factory.is_deployed(OWNER));
        assert!(!factory.is_deployed_for(OWNER, 3));
    }

    #[test]
    fn increment_nonce_advances_by_one() {
        let vm = TestVM::default();
        let mut factory = configured_factory(&vm);
        let before = factory.compute_address(OWNER);

        mock_rotation_recover(&vm, 0, OWNER);
        factory.increment_nonce(OWNER, wire_signature()).unwrap();
        assert_eq!(factory.generation_of(OWNER), 1);

        // rotation retargets future deployments
        assert_ne!(factory.compute_address(OWNER), before);
        assert_eq!(factory.compute_address(OWNER), factory.compute_address_for(OWNER, 1));
    }

    #[test]
    fn increment_nonce_rejects_replay() {
        let vm = TestVM::default();
        let mut factory = configured_factory(&vm);
        mock_rotation_recover(&vm, 0, OWNER);
        factory.increment_nonce(OWNER, wire_signature()).unwrap();

        // Same wire bytes against the generation-1 message recover some other
        // signer, so the replay is rejected.
        mock_rotation_recover(&vm, 1, Address::new([0xDD; 20]));
        assert!(matches!(
            factory.increment_nonce(OWNER, wire_signature()),
            Err(FactoryError::InvalidSignature(_))
        ));
        assert_eq!(factory.generation_of(OWNER), 1);
    }

    #[test]
    fn increment_nonce_rejects_malformed_signature() {
        let vm = TestVM::default();
        let mut factory = configured_factory(&vm);
        assert!(matches!(
            factory.increment_nonce(OWNER, vec![0u8; 64]),
            Err(FactoryError::InvalidSignature(_))
        ));
        assert_eq!(factory.generation_of(OWNER), 0);
    }
}
