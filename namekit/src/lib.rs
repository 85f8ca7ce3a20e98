//! `NameKit` — invite-gated name registration.
//!
//! This crate is the public face of the workspace; all functionality lives
//! in [`namekit_core`] and is re-exported here unchanged.

pub use namekit_core::*;
