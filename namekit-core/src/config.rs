use alloy_primitives::{address, Address};

use crate::Environment;

/// Minimum number of characters a label must have to be claimable through
/// the public availability policy.
pub const MIN_LABEL_LENGTH: usize = 3;

/// Canonical cross-chain "default" identity coin type (ETH).
pub const DEFAULT_COIN_TYPE: u64 = 60;

/// High bit marking an EVM chain-specific coin type (ENSIP-11).
pub const EVM_COIN_TYPE_FLAG: u64 = 0x8000_0000;

/// Coin type identifying address records for the EVM chain `chain_id`.
#[must_use]
pub const fn evm_coin_type(chain_id: u64) -> u64 {
    EVM_COIN_TYPE_FLAG | chain_id
}

/// Engine identity for the staging deployment.
pub static STAGING_REGISTRAR: Address =
    address!("0x5ba36e2c07dd46bf1a1ed0b7f6dcbe0bd9d0e8c1");

/// Engine identity for the production deployment.
pub static PRODUCTION_REGISTRAR: Address =
    address!("0x3d9f72c4b1a07c4e75ad4d6ea26b6f9a5c0cb8e4");

/// Deployment parameters for an engine instance.
///
/// The engine identity is bound into every invite digest so a token signed
/// for one deployment can never be replayed against another.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistrarConfig {
    /// Identity of the engine itself.
    pub engine: Address,
    /// Chain the registry lives on; selects the chain-specific coin type
    /// written alongside the default address record.
    pub chain_id: u64,
}

impl RegistrarConfig {
    /// Configuration for an arbitrary deployment.
    #[must_use]
    pub const fn new(engine: Address, chain_id: u64) -> Self {
        Self { engine, chain_id }
    }

    /// Builds the canonical configuration for `environment`.
    #[must_use]
    pub const fn from_environment(environment: &Environment) -> Self {
        match environment {
            Environment::Staging => Self {
                engine: STAGING_REGISTRAR,
                chain_id: 4801,
            },
            Environment::Production => Self {
                engine: PRODUCTION_REGISTRAR,
                chain_id: 480,
            },
        }
    }
}
