use alloy_primitives::Address;
use thiserror::Error;

use crate::registry::RegistryError;

/// Error outputs from the registration engine.
///
/// Every failure is terminal for its invocation; the engine never retries.
/// Registry-surfaced failures pass through unchanged so callers see exactly
/// what the registry reported.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// The invite's expiration timestamp is in the past.
    #[error("signature_expired")]
    SignatureExpired,
    /// This exact invite (digest + signature bytes) was consumed before.
    #[error("invite_already_used")]
    InviteAlreadyUsed,
    /// The claimed issuer is not whitelisted at consumption time.
    #[error("invalid_inviter: {0}")]
    InvalidInviter(Address),
    /// The signature does not bind the issuer to the invite digest, or the
    /// caller is not the invite's bound recipient.
    #[error("unauthorized")]
    Unauthorized,
    /// An owner-only operation was invoked by a non-owner.
    #[error("caller_is_not_owner: {0}")]
    CallerNotOwner(Address),
    /// A failure surfaced by the registry during claim or record writes.
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Result alias for engine operations.
pub type EngineResult<T, E = EngineError> = std::result::Result<T, E>;
