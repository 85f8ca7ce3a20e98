#![deny(clippy::all, clippy::pedantic, clippy::nursery)]
//! Core engine for `NameKit`: invite-based authorization and name claiming.
//!
//! The engine owns the issuer whitelist and the used-invite ledger, validates
//! invite tokens cryptographically, and orchestrates the registry calls that
//! turn a consumed invite into a claimed name with address records. The
//! registry itself and the chain state consulted for smart-account signatures
//! are external capabilities, reached only through the traits defined here.

use strum::EnumString;

/// Deployment environment an engine instance targets. Selects default chain
/// parameters; see [`RegistrarConfig::from_environment`].
#[derive(Debug, Clone, PartialEq, Eq, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Environment {
    /// Test network deployment.
    Staging,
    /// Main network deployment.
    Production,
}

mod clock;
pub use clock::*;

mod config;
pub use config::*;

mod engine;
pub use engine::*;

mod error;
pub use error::*;

mod events;
pub use events::*;

mod invite;
pub use invite::*;

mod registry;
pub use registry::*;

mod signature;
pub use signature::*;

pub mod memory;
