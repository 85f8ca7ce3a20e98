//! In-memory implementations of the engine's external capabilities.
//!
//! These implementations are NOT a production registry or chain. They are
//! designed for unit and integration testing of the engine, and for
//! embedding experiments where no real registry is reachable.

// Allow certain clippy lints for test-support code
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::significant_drop_tightening)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

use alloy_primitives::{Address, B256};

use crate::clock::Clock;
use crate::registry::{child_node, AddressRecord, NameRegistry, RegistryError};
use crate::signature::{ecdsa_matches, AccountOracle};

// =============================================================================
// Memory Registry
// =============================================================================

/// In-memory name registry backed by hash maps.
pub struct MemoryRegistry {
    root: B256,
    owners: HashMap<B256, Address>,
    records: HashMap<(B256, u64), Vec<u8>>,
}

impl MemoryRegistry {
    /// Creates an empty registry rooted at `root`.
    #[must_use]
    pub fn new(root: B256) -> Self {
        Self {
            root,
            owners: HashMap::new(),
            records: HashMap::new(),
        }
    }

    /// Address record stored for `coin_type` on `node`, if any.
    #[must_use]
    pub fn address_record(&self, node: B256, coin_type: u64) -> Option<&[u8]> {
        self.records
            .get(&(node, coin_type))
            .map(Vec::as_slice)
    }

    /// Number of claimed nodes.
    #[must_use]
    pub fn claimed_count(&self) -> usize {
        self.owners.len()
    }
}

impl NameRegistry for MemoryRegistry {
    fn root_node(&self) -> B256 {
        self.root
    }

    fn claim(
        &mut self,
        parent: B256,
        label: &str,
        owner: Address,
        extra_records: &[AddressRecord],
    ) -> Result<B256, RegistryError> {
        if label.is_empty() {
            return Err(RegistryError::EmptyLabel);
        }
        let node = child_node(parent, label);
        if self.owners.contains_key(&node) {
            return Err(RegistryError::NodeTaken(node));
        }
        self.owners.insert(node, owner);
        for record in extra_records {
            self.records
                .insert((node, record.coin_type), record.address.to_vec());
        }
        Ok(node)
    }

    fn set_address_record(
        &mut self,
        node: B256,
        coin_type: u64,
        address: &[u8],
    ) -> Result<(), RegistryError> {
        if !self.owners.contains_key(&node) {
            return Err(RegistryError::NodeUnclaimed(node));
        }
        self.records.insert((node, coin_type), address.to_vec());
        Ok(())
    }

    fn owner_of(&self, node: B256) -> Result<Address, RegistryError> {
        self.owners
            .get(&node)
            .copied()
            .ok_or(RegistryError::NodeUnclaimed(node))
    }
}

// =============================================================================
// Memory Account Oracle
// =============================================================================

/// In-memory chain-state oracle for smart-account signers.
///
/// A deployed account validates a signature by recovering its plain-key
/// signer and comparing against the account's registered controlling key.
/// Pending deployments are keyed by the exact `(factory, calldata)` pair a
/// counterfactual envelope carries.
pub struct MemoryAccountOracle {
    deployed: RwLock<HashMap<Address, Address>>,
    pending: RwLock<HashMap<(Address, Vec<u8>), (Address, Address)>>,
}

impl MemoryAccountOracle {
    /// Creates an oracle with no deployed accounts.
    #[must_use]
    pub fn new() -> Self {
        Self {
            deployed: RwLock::new(HashMap::new()),
            pending: RwLock::new(HashMap::new()),
        }
    }

    /// Registers a deployed smart account controlled by `controlling_key`.
    pub fn install_account(&self, account: Address, controlling_key: Address) {
        self.deployed
            .write()
            .unwrap()
            .insert(account, controlling_key);
    }

    /// Registers a factory deployment: invoking `factory` with `calldata`
    /// deploys `account` controlled by `controlling_key`.
    pub fn install_factory(
        &self,
        factory: Address,
        calldata: Vec<u8>,
        account: Address,
        controlling_key: Address,
    ) {
        self.pending
            .write()
            .unwrap()
            .insert((factory, calldata), (account, controlling_key));
    }

    /// Whether `account` currently has code.
    #[must_use]
    pub fn is_deployed(&self, account: Address) -> bool {
        self.deployed.read().unwrap().contains_key(&account)
    }
}

impl Default for MemoryAccountOracle {
    fn default() -> Self {
        Self::new()
    }
}

impl AccountOracle for MemoryAccountOracle {
    fn has_code(&self, account: Address) -> bool {
        self.is_deployed(account)
    }

    fn validate_with_account(&self, account: Address, digest: B256, signature: &[u8]) -> bool {
        let Some(controlling_key) = self.deployed.read().unwrap().get(&account).copied() else {
            return false;
        };
        ecdsa_matches(controlling_key, digest, signature)
    }

    fn deploy(&self, factory: Address, calldata: &[u8]) -> bool {
        let Some((account, controlling_key)) = self
            .pending
            .write()
            .unwrap()
            .remove(&(factory, calldata.to_vec()))
        else {
            return false;
        };
        self.install_account(account, controlling_key);
        true
    }
}

// =============================================================================
// Manual Clock
// =============================================================================

/// Clock that only moves when told to; for deterministic expiration tests.
#[derive(Debug)]
pub struct ManualClock {
    now: AtomicU64,
}

impl ManualClock {
    /// Creates a clock pinned at `now` (Unix seconds).
    #[must_use]
    pub const fn new(now: u64) -> Self {
        Self {
            now: AtomicU64::new(now),
        }
    }

    /// Re-pins the clock at `now`.
    pub fn set(&self, now: u64) {
        self.now.store(now, Ordering::Relaxed);
    }

    /// Moves the clock forward by `secs`.
    pub fn advance(&self, secs: u64) {
        self.now.fetch_add(secs, Ordering::Relaxed);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> u64 {
        self.now.load(Ordering::Relaxed)
    }
}

// =============================================================================
// Tests
// =============================================================================
