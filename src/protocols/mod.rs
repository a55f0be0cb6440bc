//! Quantum Cryptography Protocols.
//!
//! This module contains the QKD protocol implementations.

pub mod qkd;
pub use qkd::bb84;
