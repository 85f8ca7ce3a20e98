use alloy_primitives::{keccak256, utils::eip191_hash_message, Address, Bytes, B256, U256};
use serde::{Deserialize, Serialize};

/// Sentinel recipient meaning "anyone may consume this invite".
///
/// The sentinel doubles as the claim target: a name claimed through an open
/// invite is registered to this value, not to the caller.
pub const OPEN_RECIPIENT: Address = Address::ZERO;

/// An off-line issued, single-use capability granting the right to claim one
/// specific label before an expiration timestamp.
///
/// Invites have no on-chain existence until consumed. They are created and
/// signed by a whitelisted issuer, carried to the consumer over any
/// transport (the serde representation is the interchange format), and
/// submitted to the engine exactly once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invite {
    /// The name being claimed.
    pub label: String,
    /// Identity allowed to consume the invite, or [`OPEN_RECIPIENT`].
    pub recipient: Address,
    /// Inclusive Unix-seconds upper bound on validity.
    pub expiration: u64,
    /// Identity whose signature is claimed.
    pub issuer: Address,
    /// Signature over [`Invite::signing_digest`].
    pub signature: Bytes,
}

impl Invite {
    /// Digest an issuer signs to authorize a claim against the engine
    /// deployed at `engine`.
    ///
    /// The packed message `engine || label || recipient || expiration` is
    /// hashed with keccak-256, then wrapped with the EIP-191 signed-message
    /// prefix so the result can never collide with a digest meant for raw
    /// transaction signing.
    #[must_use]
    pub fn signing_digest(
        engine: Address,
        label: &str,
        recipient: Address,
        expiration: u64,
    ) -> B256 {
        let mut message = Vec::with_capacity(20 + label.len() + 20 + 32);
        message.extend_from_slice(engine.as_slice());
        message.extend_from_slice(label.as_bytes());
        message.extend_from_slice(recipient.as_slice());
        message.extend_from_slice(&U256::from(expiration).to_be_bytes::<32>());
        eip191_hash_message(keccak256(message))
    }

    /// The wrapped digest this invite binds to for an engine at `engine`.
    #[must_use]
    pub fn digest(&self, engine: Address) -> B256 {
        Self::signing_digest(engine, &self.label, self.recipient, self.expiration)
    }

    /// Replay-protection identifier of this invite for an engine at
    /// `engine`. Covers the exact signature bytes, so two distinct valid
    /// signatures over the same digest are tracked independently.
    #[must_use]
    pub fn id(&self, engine: Address) -> B256 {
        invite_id(self.digest(engine), &self.signature)
    }

    /// Whether any caller may consume this invite.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.recipient == OPEN_RECIPIENT
    }
}

/// Derives the replay-protection identifier from a wrapped digest and the
/// exact signature bytes presented with it.
#[must_use]
pub fn invite_id(digest: B256, signature: &[u8]) -> B256 {
    let mut buf = Vec::with_capacity(32 + signature.len());
    buf.extend_from_slice(digest.as_slice());
    buf.extend_from_slice(signature);
    keccak256(buf)
}

#[cfg(test)]
mod tests {
    use alloy_primitives::address;

    use super::*;

    const ENGINE: Address = address!("0x00000000000000000000000000000000000000e1");
    const RECIPIENT: Address = address!("0x00000000000000000000000000000000000000a1");

    fn sample() -> Invite {
        Invite {
            label: "alice".to_string(),
            recipient: RECIPIENT,
            expiration: 1_700_000_000,
            issuer: address!("0x00000000000000000000000000000000000000b1"),
            signature: Bytes::from(vec![0x11; 65]),
        }
    }

    #[test]
    fn test_digest_is_deterministic() {
        assert_eq!(sample().digest(ENGINE), sample().digest(ENGINE));
    }

    #[test]
    fn test_digest_binds_every_field() {
        let base = sample().digest(ENGINE);

        let mut other = sample();
        other.label = "bob".to_string();
        assert_ne!(other.digest(ENGINE), base);

        let mut other = sample();
        other.recipient = OPEN_RECIPIENT;
        assert_ne!(other.digest(ENGINE), base);

        let mut other = sample();
        other.expiration += 1;
        assert_ne!(other.digest(ENGINE), base);

        // A token signed for one engine deployment is void for another.
        let other_engine = address!("0x00000000000000000000000000000000000000e2");
        assert_ne!(sample().digest(other_engine), base);
    }

    #[test]
    fn test_invite_id_covers_signature_bytes() {
        let invite = sample();
        let mut resigned = sample();
        resigned.signature = Bytes::from(vec![0x22; 65]);

        // Same digest, different signatures: distinct identifiers.
        assert_eq!(invite.digest(ENGINE), resigned.digest(ENGINE));
        assert_ne!(invite.id(ENGINE), resigned.id(ENGINE));
    }

    #[test]
    fn test_open_invite_sentinel() {
        let mut invite = sample();
        assert!(!invite.is_open());
        invite.recipient = OPEN_RECIPIENT;
        assert!(invite.is_open());
    }

    #[test]
    fn test_json_round_trip() {
        let invite = sample();
        let json = serde_json::to_string(&invite).unwrap();
        let decoded: Invite = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, invite);
    }
}
