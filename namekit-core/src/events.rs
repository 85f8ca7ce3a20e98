use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

/// Notifications emitted by the engine for off-chain observers.
///
/// Events accumulate inside the engine and are handed to the embedding
/// layer through [`crate::InviteRegistrar::drain_events`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EngineEvent {
    /// An identity was added to the issuer whitelist.
    IssuerAdded {
        /// The whitelisted identity.
        issuer: Address,
    },
    /// An identity was removed from the issuer whitelist.
    IssuerRemoved {
        /// The removed identity.
        issuer: Address,
    },
    /// A label was claimed and its address records written.
    NameRegistered {
        /// The claimed label.
        label: String,
        /// The registered owner of the name.
        owner: Address,
    },
    /// Engine ownership moved to a new identity.
    OwnershipTransferred {
        /// The previous owner.
        previous_owner: Address,
        /// The new owner; zero after a renounce.
        new_owner: Address,
    },
}

#[cfg(test)]
mod tests {
    use alloy_primitives::address;

    use super::*;

    #[test]
    fn test_event_json_shape() {
        let event = EngineEvent::NameRegistered {
            label: "alice".to_string(),
            owner: address!("0x00000000000000000000000000000000000000a1"),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"kind\":\"name_registered\""));
        assert!(json.contains("\"label\":\"alice\""));
    }
}
