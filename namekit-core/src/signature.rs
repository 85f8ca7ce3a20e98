//! Signature validation capability.
//!
//! The engine depends only on the abstract [`SignatureValidator`]; the
//! production [`UniversalValidator`] selects internally between plain-key
//! ECDSA, deployed smart-account validation, and counterfactual-account
//! validation, consulting chain state through an [`AccountOracle`].

use std::sync::Arc;

use alloy_primitives::{Address, Signature, B256};
use subtle::ConstantTimeEq;

/// Abstract capability deciding whether `signature` authentically binds
/// `signer` to `digest`.
pub trait SignatureValidator: Send + Sync {
    /// Returns `true` iff the signature authorizes `digest` for `signer`.
    fn is_valid(&self, signer: Address, digest: B256, signature: &[u8]) -> bool;
}

/// Chain-state oracle consulted for smart-account signers.
pub trait AccountOracle: Send + Sync {
    /// Whether contract code is deployed at `account`.
    fn has_code(&self, account: Address) -> bool;

    /// Asks the deployed account contract at `account` whether `signature`
    /// authorizes `digest`. Callers must ensure code exists at `account`.
    fn validate_with_account(&self, account: Address, digest: B256, signature: &[u8]) -> bool;

    /// Executes the account deployment described by a counterfactual
    /// envelope. Returns `false` if the deployment cannot be performed.
    fn deploy(&self, factory: Address, calldata: &[u8]) -> bool;
}

/// Magic 32-byte suffix tagging a counterfactual signature envelope.
pub const ENVELOPE_SUFFIX: [u8; 32] = [
    0x64, 0x92, 0x64, 0x92, 0x64, 0x92, 0x64, 0x92, 0x64, 0x92, 0x64, 0x92, 0x64, 0x92, 0x64,
    0x92, 0x64, 0x92, 0x64, 0x92, 0x64, 0x92, 0x64, 0x92, 0x64, 0x92, 0x64, 0x92, 0x64, 0x92,
    0x64, 0x92,
];

/// Signature envelope for an account that is not yet deployed.
///
/// Wire layout: `factory(20) || calldata_len(u32 BE) || calldata ||
/// inner_signature`, with [`ENVELOPE_SUFFIX`] appended. The suffix lets a
/// validator distinguish envelopes from plain signatures without ambiguity:
/// a 65-byte ECDSA signature can never carry it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterfactualSignature {
    /// Factory that deploys the account.
    pub factory: Address,
    /// Call data handed to the factory to perform the deployment.
    pub factory_calldata: Vec<u8>,
    /// Signature validated by the account once deployed.
    pub signature: Vec<u8>,
}

impl CounterfactualSignature {
    /// Encodes the envelope, magic suffix included.
    ///
    /// # Panics
    ///
    /// Panics if the factory calldata is longer than `u32::MAX` bytes.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(
            20 + 4 + self.factory_calldata.len() + self.signature.len() + ENVELOPE_SUFFIX.len(),
        );
        out.extend_from_slice(self.factory.as_slice());
        out.extend_from_slice(
            &u32::try_from(self.factory_calldata.len())
                .expect("factory calldata exceeds u32::MAX")
                .to_be_bytes(),
        );
        out.extend_from_slice(&self.factory_calldata);
        out.extend_from_slice(&self.signature);
        out.extend_from_slice(&ENVELOPE_SUFFIX);
        out
    }

    /// Decodes a suffix-tagged envelope. Returns `None` when the suffix or
    /// the layout does not match, in which case the bytes are treated as a
    /// plain signature.
    #[must_use]
    pub fn decode(signature: &[u8]) -> Option<Self> {
        let body_len = signature.len().checked_sub(ENVELOPE_SUFFIX.len())?;
        if signature[body_len..] != ENVELOPE_SUFFIX {
            return None;
        }
        let body = &signature[..body_len];
        if body.len() < 24 {
            return None;
        }
        let factory = Address::from_slice(&body[..20]);
        let calldata_len = usize::try_from(u32::from_be_bytes(body[20..24].try_into().ok()?)).ok()?;
        let inner_start = 24usize.checked_add(calldata_len)?;
        if body.len() < inner_start {
            return None;
        }
        Some(Self {
            factory,
            factory_calldata: body[24..inner_start].to_vec(),
            signature: body[inner_start..].to_vec(),
        })
    }
}

/// Recovers the plain-key signer of a 65-byte ECDSA signature over `digest`
/// and compares it against `expected` in constant time.
pub(crate) fn ecdsa_matches(expected: Address, digest: B256, signature: &[u8]) -> bool {
    let Ok(parsed) = Signature::from_raw(signature) else {
        return false;
    };
    let Ok(recovered) = parsed.recover_address_from_prehash(&digest) else {
        return false;
    };
    recovered.as_slice().ct_eq(expected.as_slice()).into()
}

/// Production signature validator.
///
/// Selection order: a suffix-tagged envelope routes through counterfactual
/// deployment; a signer with deployed code routes through the account
/// contract; everything else is treated as a plain-key ECDSA signature.
pub struct UniversalValidator {
    oracle: Arc<dyn AccountOracle>,
}

impl UniversalValidator {
    /// Creates a validator consulting `oracle` for smart-account signers.
    #[must_use]
    pub fn new(oracle: Arc<dyn AccountOracle>) -> Self {
        Self { oracle }
    }
}

impl SignatureValidator for UniversalValidator {
    fn is_valid(&self, signer: Address, digest: B256, signature: &[u8]) -> bool {
        if let Some(envelope) = CounterfactualSignature::decode(signature) {
            if !self.oracle.has_code(signer)
                && !self.oracle.deploy(envelope.factory, &envelope.factory_calldata)
            {
                return false;
            }
            return self
                .oracle
                .validate_with_account(signer, digest, &envelope.signature);
        }
        if self.oracle.has_code(signer) {
            return self.oracle.validate_with_account(signer, digest, signature);
        }
        ecdsa_matches(signer, digest, signature)
    }
}
