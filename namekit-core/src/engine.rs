//! The invite authorization engine: whitelist, replay ledger, and the
//! ordered orchestration that turns a valid invite into a claimed name.

use std::collections::HashSet;
use std::sync::Arc;

use alloy_primitives::{Address, B256};
use tracing::{debug, info};

use crate::{
    clock::{Clock, SystemClock},
    config::{evm_coin_type, RegistrarConfig, DEFAULT_COIN_TYPE, MIN_LABEL_LENGTH},
    error::{EngineError, EngineResult},
    events::EngineEvent,
    invite::{invite_id, Invite},
    registry::{NameRegistry, RegistryError},
    signature::SignatureValidator,
};

/// The invite-based authorization and name-claim engine.
///
/// The engine is the sole owner of the issuer whitelist and the used-invite
/// ledger; both are reachable from outside only through its read-only
/// queries. Mutating operations take `&mut self` plus an exclusive registry
/// reference, so two in-flight mutations can never interleave — the one
/// ordering obligation left is intra-call: the replay-ledger commit in
/// [`Self::register_with_invite`] strictly precedes the first registry
/// call.
pub struct InviteRegistrar {
    config: RegistrarConfig,
    owner: Address,
    issuers: HashSet<Address>,
    used_invites: HashSet<B256>,
    validator: Arc<dyn SignatureValidator>,
    clock: Arc<dyn Clock>,
    events: Vec<EngineEvent>,
}

impl InviteRegistrar {
    /// Creates an engine owned by `owner`, validating signatures through
    /// `validator` and reading time from the system clock.
    #[must_use]
    pub fn new(
        config: RegistrarConfig,
        owner: Address,
        validator: Arc<dyn SignatureValidator>,
    ) -> Self {
        Self::with_clock(config, owner, validator, Arc::new(SystemClock))
    }

    /// Creates an engine reading time from an explicit clock.
    #[must_use]
    pub fn with_clock(
        config: RegistrarConfig,
        owner: Address,
        validator: Arc<dyn SignatureValidator>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            config,
            owner,
            issuers: HashSet::new(),
            used_invites: HashSet::new(),
            validator,
            clock,
            events: Vec::new(),
        }
    }

    /// Current engine owner; zero after a renounce.
    #[must_use]
    pub const fn owner(&self) -> Address {
        self.owner
    }

    /// Whether `identity` is currently whitelisted to sign invites.
    #[must_use]
    pub fn is_issuer(&self, identity: Address) -> bool {
        self.issuers.contains(&identity)
    }

    /// Whether the invite identifier `id` has been consumed.
    #[must_use]
    pub fn is_invite_used(&self, id: B256) -> bool {
        self.used_invites.contains(&id)
    }

    /// Replay-protection identifier `invite` would consume on this engine.
    /// Lets clients pre-validate before submitting.
    #[must_use]
    pub fn invite_id(&self, invite: &Invite) -> B256 {
        invite.id(self.config.engine)
    }

    /// Hands the accumulated notifications to the embedding layer.
    pub fn drain_events(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.events)
    }

    /// Adds `issuer` to the whitelist. Owner-only, idempotent.
    ///
    /// # Errors
    ///
    /// [`EngineError::CallerNotOwner`] if `caller` is not the engine owner.
    pub fn add_issuer(&mut self, caller: Address, issuer: Address) -> EngineResult<()> {
        self.ensure_owner(caller)?;
        self.issuers.insert(issuer);
        info!(issuer = %issuer, "issuer added");
        self.events.push(EngineEvent::IssuerAdded { issuer });
        Ok(())
    }

    /// Removes `issuer` from the whitelist. Owner-only, idempotent.
    ///
    /// Tokens already signed by `issuer` become permanently unusable:
    /// membership is evaluated at consumption time.
    ///
    /// # Errors
    ///
    /// [`EngineError::CallerNotOwner`] if `caller` is not the engine owner.
    pub fn remove_issuer(&mut self, caller: Address, issuer: Address) -> EngineResult<()> {
        self.ensure_owner(caller)?;
        self.issuers.remove(&issuer);
        info!(issuer = %issuer, "issuer removed");
        self.events.push(EngineEvent::IssuerRemoved { issuer });
        Ok(())
    }

    /// Transfers engine ownership to `new_owner`. Owner-only.
    ///
    /// # Errors
    ///
    /// [`EngineError::CallerNotOwner`] if `caller` is not the engine owner.
    pub fn transfer_ownership(&mut self, caller: Address, new_owner: Address) -> EngineResult<()> {
        self.ensure_owner(caller)?;
        let previous_owner = self.owner;
        self.owner = new_owner;
        info!(previous_owner = %previous_owner, new_owner = %new_owner, "ownership transferred");
        self.events.push(EngineEvent::OwnershipTransferred {
            previous_owner,
            new_owner,
        });
        Ok(())
    }

    /// Renounces engine ownership, leaving the owner slot zero. Owner-only
    /// and irreversible: every owner-gated operation becomes unreachable.
    ///
    /// # Errors
    ///
    /// [`EngineError::CallerNotOwner`] if `caller` is not the engine owner.
    pub fn renounce_ownership(&mut self, caller: Address) -> EngineResult<()> {
        self.transfer_ownership(caller, Address::ZERO)
    }

    /// Validates and consumes `invite`, claiming its label for the invite
    /// recipient and writing address records. Returns the claimed node id.
    ///
    /// The validation pipeline runs in a fixed order (expiration, replay,
    /// whitelist, signature, recipient binding) so callers observe stable
    /// errors. The ledger commit happens before the first registry call:
    /// once the registry has control it could call back into the engine,
    /// and the invite must already read as consumed by then. For the same
    /// reason the invite stays burned when the registry rejects the claim.
    ///
    /// # Errors
    ///
    /// [`EngineError::SignatureExpired`], [`EngineError::InviteAlreadyUsed`],
    /// [`EngineError::InvalidInviter`], or [`EngineError::Unauthorized`] per
    /// the pipeline above; [`EngineError::Registry`] when the claim or a
    /// record write fails downstream.
    pub fn register_with_invite(
        &mut self,
        registry: &mut dyn NameRegistry,
        caller: Address,
        invite: &Invite,
    ) -> EngineResult<B256> {
        if self.clock.now() > invite.expiration {
            debug!(label = %invite.label, "invite rejected: expired");
            return Err(EngineError::SignatureExpired);
        }

        let digest = invite.digest(self.config.engine);
        let id = invite_id(digest, &invite.signature);

        if self.used_invites.contains(&id) {
            debug!(label = %invite.label, id = %id, "invite rejected: already used");
            return Err(EngineError::InviteAlreadyUsed);
        }
        if !self.issuers.contains(&invite.issuer) {
            debug!(label = %invite.label, issuer = %invite.issuer, "invite rejected: issuer not whitelisted");
            return Err(EngineError::InvalidInviter(invite.issuer));
        }
        if !self
            .validator
            .is_valid(invite.issuer, digest, &invite.signature)
        {
            debug!(label = %invite.label, issuer = %invite.issuer, "invite rejected: bad signature");
            return Err(EngineError::Unauthorized);
        }
        if !invite.is_open() && caller != invite.recipient {
            debug!(label = %invite.label, caller = %caller, "invite rejected: caller is not the recipient");
            return Err(EngineError::Unauthorized);
        }

        // Commit the replay state before any registry call.
        self.used_invites.insert(id);

        self.finish_registration(registry, &invite.label, invite.recipient)
    }

    /// Owner-only bypass of the invite pipeline, for administrative or
    /// recovery use. Same claim and record steps, no invite bookkeeping.
    ///
    /// # Errors
    ///
    /// [`EngineError::CallerNotOwner`] for non-owner callers;
    /// [`EngineError::Registry`] when the claim or a record write fails.
    pub fn register(
        &mut self,
        registry: &mut dyn NameRegistry,
        caller: Address,
        label: &str,
        recipient: Address,
    ) -> EngineResult<B256> {
        self.ensure_owner(caller)?;
        self.finish_registration(registry, label, recipient)
    }

    /// Whether `label` can currently be claimed. Labels shorter than
    /// [`MIN_LABEL_LENGTH`] characters are never available, claimed or not.
    #[allow(clippy::unused_self)]
    #[must_use]
    pub fn available(&self, registry: &dyn NameRegistry, label: &str) -> bool {
        if label.chars().count() < MIN_LABEL_LENGTH {
            return false;
        }
        matches!(
            registry.owner_of(registry.node_for_label(label)),
            Err(RegistryError::NodeUnclaimed(_))
        )
    }

    /// Claims `label` for `recipient` under the registry root and writes the
    /// chain-specific and default address records against the new node.
    fn finish_registration(
        &mut self,
        registry: &mut dyn NameRegistry,
        label: &str,
        recipient: Address,
    ) -> EngineResult<B256> {
        let parent = registry.root_node();
        let node = registry.claim(parent, label, recipient, &[])?;

        // Records reference the node, so the claim must land first.
        registry.set_address_record(node, evm_coin_type(self.config.chain_id), recipient.as_slice())?;
        registry.set_address_record(node, DEFAULT_COIN_TYPE, recipient.as_slice())?;

        info!(label = %label, owner = %recipient, node = %node, "name registered");
        self.events.push(EngineEvent::NameRegistered {
            label: label.to_string(),
            owner: recipient,
        });
        Ok(node)
    }

    fn ensure_owner(&self, caller: Address) -> EngineResult<()> {
        if caller == self.owner {
            Ok(())
        } else {
            Err(EngineError::CallerNotOwner(caller))
        }
    }
}
