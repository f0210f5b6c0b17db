//! Quantum Key Distribution (QKD) post-processing.
//!
//! - **sifting**: basis reconciliation of recorded detection events and the
//!   resulting QBER per trial.

pub mod sifting;
