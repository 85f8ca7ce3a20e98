//! The registry seam: the durable store of claimed names.
//!
//! The engine never mutates claim or ownership state directly; it reaches
//! the registry only through [`NameRegistry`]. Node derivation is the one
//! piece of registry semantics that is deterministic and shared, so it
//! lives here as a free function.

use alloy_primitives::{keccak256, Address, Bytes, B256};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failures surfaced by a name registry. Passed through the engine to the
/// caller unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// The node is already claimed.
    #[error("node_already_claimed: {0}")]
    NodeTaken(B256),
    /// The node has no owner.
    #[error("node_unclaimed: {0}")]
    NodeUnclaimed(B256),
    /// The label is empty and cannot name a node.
    #[error("empty_label")]
    EmptyLabel,
}

/// An address record attached to a node at claim time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressRecord {
    /// Protocol-defined coin type the address applies to.
    pub coin_type: u64,
    /// Raw address payload for that coin type.
    pub address: Bytes,
}

/// Derives a child node id from a parent node and a label:
/// `keccak256(parent || keccak256(label))`.
#[must_use]
pub fn child_node(parent: B256, label: &str) -> B256 {
    let label_hash = keccak256(label.as_bytes());
    let mut buf = [0u8; 64];
    buf[..32].copy_from_slice(parent.as_slice());
    buf[32..].copy_from_slice(label_hash.as_slice());
    keccak256(buf)
}

/// Durable store of claimed names and their records.
pub trait NameRegistry {
    /// Root node under which the engine claims labels.
    fn root_node(&self) -> B256;

    /// Claims `label` under `parent` for `owner`, attaching `extra_records`,
    /// and returns the claimed node id.
    ///
    /// # Errors
    ///
    /// [`RegistryError::NodeTaken`] if the node is already claimed, or
    /// [`RegistryError::EmptyLabel`] if `label` is empty.
    fn claim(
        &mut self,
        parent: B256,
        label: &str,
        owner: Address,
        extra_records: &[AddressRecord],
    ) -> Result<B256, RegistryError>;

    /// Writes an address record for `coin_type` on a claimed node.
    ///
    /// # Errors
    ///
    /// [`RegistryError::NodeUnclaimed`] if `node` has not been claimed.
    fn set_address_record(
        &mut self,
        node: B256,
        coin_type: u64,
        address: &[u8],
    ) -> Result<(), RegistryError>;

    /// Current owner of `node`.
    ///
    /// # Errors
    ///
    /// [`RegistryError::NodeUnclaimed`] if `node` has not been claimed.
    fn owner_of(&self, node: B256) -> Result<Address, RegistryError>;

    /// Node id for `label` under this registry's root.
    fn node_for_label(&self, label: &str) -> B256 {
        child_node(self.root_node(), label)
    }
}
