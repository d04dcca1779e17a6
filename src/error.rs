//! Error types for the CKKS engine.
//!
//! Every failure is reported as an explicit [`CkksError`] value carrying the
//! kind and the offending metadata (levels, scales, degrees). Errors are
//! never used for expected control flow: a successful addition or decryption
//! returns normally, and noise-budget exhaustion is surfaced eagerly instead
//! of letting precision degrade undetected.

use crate::ring::Representation;

/// Error kinds for all engine operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CkksError {
    /// Parameter validation failed at construction time. No usable context
    /// was produced; the configuration must be fixed.
    #[error("invalid parameters: {reason}")]
    InvalidParameters { reason: String },

    /// The input vector does not fit in the available slots. Recoverable:
    /// shorten the input to at most `slots` values.
    #[error("input has {got} values but the ring provides only {slots} slots")]
    TooManySlots { got: usize, slots: usize },

    /// Ring operands are tagged with different levels.
    #[error("operands are at different levels ({lhs} vs {rhs})")]
    LevelMismatch { lhs: usize, rhs: usize },

    /// Ring operands are in different representations. Convert explicitly
    /// with `to_ntt`/`from_ntt` before retrying.
    #[error("operands are in different representations ({lhs:?} vs {rhs:?})")]
    DomainMismatch {
        lhs: Representation,
        rhs: Representation,
    },

    /// Ciphertext operands disagree on level or scale. Recoverable by
    /// aligning level/scale before retrying.
    #[error(
        "incompatible operands: levels {lhs_level}/{rhs_level}, scales {lhs_scale}/{rhs_scale}"
    )]
    IncompatibleOperands {
        lhs_level: usize,
        rhs_level: usize,
        lhs_scale: f64,
        rhs_scale: f64,
    },

    /// No modulus remains in the chain for the requested level. Fatal for
    /// this ciphertext's lineage; start from a fresh encryption.
    #[error("modulus chain exhausted: level {level} of a chain of length {chain_len}")]
    LevelExhausted { level: usize, chain_len: usize },

    /// A key was generated for a different ring degree than the context
    /// expects. Indicates a configuration bug.
    #[error("key was generated for ring degree {key_degree}, context uses {expected}")]
    KeyMismatch { key_degree: usize, expected: usize },

    /// The estimated noise in a ciphertext has consumed the configured
    /// budget; further operations would return garbage without signaling.
    #[error(
        "noise budget exceeded: {budget_bits:.1} bits remaining, floor is {floor_bits:.1} bits"
    )]
    NoiseBudgetExceeded { budget_bits: f64, floor_bits: f64 },

    /// Wire encoding or decoding failed.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl From<bincode::Error> for CkksError {
    fn from(err: bincode::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Result type used throughout the engine.
pub type Result<T> = std::result::Result<T, CkksError>;
