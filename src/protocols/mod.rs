//! Quantum Cryptography Protocols.
//!
//! This module contains the protocol-level post-processing applied to
//! recorded QKD runs.

pub mod qkd;
pub use qkd::sifting;
