//! Shared helpers for the engine integration suites.

// Each suite pulls in a subset of these helpers.
#![allow(dead_code)]

use std::sync::Arc;

use alloy::signers::local::PrivateKeySigner;
use alloy::signers::SignerSync;
use alloy_primitives::{address, Address, B256};

use namekit_core::{
    memory::{ManualClock, MemoryAccountOracle, MemoryRegistry},
    AccountOracle, Clock, Invite, InviteRegistrar, RegistrarConfig, UniversalValidator,
};

/// Identity of the engine under test, bound into every digest.
pub const ENGINE: Address = address!("0x00000000000000000000000000000000000000e1");

/// Engine owner used across the suites.
pub const OWNER: Address = address!("0x0000000000000000000000000000000000000001");

/// Chain the harness registry pretends to live on.
pub const CHAIN_ID: u64 = 480;

/// Harness clock origin; invites are issued relative to this instant.
pub const NOW: u64 = 1_700_000_000;

/// A fully wired engine with in-memory collaborators.
pub struct Harness {
    /// Engine under test.
    pub engine: InviteRegistrar,
    /// In-memory registry the engine drives.
    pub registry: MemoryRegistry,
    /// Chain-state oracle behind the signature validator.
    pub oracle: Arc<MemoryAccountOracle>,
    /// Deterministic clock pinned at [`NOW`].
    pub clock: Arc<ManualClock>,
}

/// Builds an engine, registry, oracle, and clock wired together.
pub fn harness() -> Harness {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init()
        .ok();

    let oracle = Arc::new(MemoryAccountOracle::new());
    let clock = Arc::new(ManualClock::new(NOW));
    let validator = UniversalValidator::new(Arc::clone(&oracle) as Arc<dyn AccountOracle>);
    let engine = InviteRegistrar::with_clock(
        RegistrarConfig::new(ENGINE, CHAIN_ID),
        OWNER,
        Arc::new(validator),
        Arc::clone(&clock) as Arc<dyn Clock>,
    );
    Harness {
        engine,
        registry: MemoryRegistry::new(B256::ZERO),
        oracle,
        clock,
    }
}

/// Signs an invite for `label`/`recipient` with `signer` acting as issuer.
pub fn signed_invite(
    signer: &PrivateKeySigner,
    label: &str,
    recipient: Address,
    expiration: u64,
) -> Invite {
    let digest = Invite::signing_digest(ENGINE, label, recipient, expiration);
    let signature = signer.sign_hash_sync(&digest).unwrap();
    Invite {
        label: label.to_string(),
        recipient,
        expiration,
        issuer: signer.address(),
        signature: signature.as_bytes().to_vec().into(),
    }
}

/// An invite carrying `signature` verbatim, for malformed-signature cases.
pub fn raw_invite(
    issuer: Address,
    label: &str,
    recipient: Address,
    expiration: u64,
    signature: Vec<u8>,
) -> Invite {
    Invite {
        label: label.to_string(),
        recipient,
        expiration,
        issuer,
        signature: signature.into(),
    }
}
