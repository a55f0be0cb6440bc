//! Quantum Key Distribution (QKD) Protocols.
//!
//! This module contains the BB84 protocol and its classical post-processing:
//! - **bb84**: the per-qubit exchange between Alice and Bob.
//! - **eavesdropper**: an intercept-resend attacker on the link.
//! - **sifting**, **estimation**, **extraction**: basis reconciliation, QBER
//!   estimation with the security decision, and final key derivation.

pub mod bb84;
pub mod eavesdropper;
pub mod estimation;
pub mod extraction;
pub mod sifting;
