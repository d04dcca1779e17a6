//! RLWE key material, encryption, and decryption.
//!
//! The scheme's security rests on Ring Learning With Errors over
//! R_Q = Z_Q[X]/(X^N + 1): the public key (b = -a·s + e, a) is
//! computationally indistinguishable from uniform, and every encryption
//! re-randomizes with a fresh ephemeral mask and fresh errors.
//!
//! All parties in an aggregation share one public key; only the holder of
//! the matching secret key can decrypt the aggregate.

mod enc;
mod keys;

pub use enc::{fresh_noise_bound, Ciphertext, Decryptor, Encryptor};
pub use keys::{EvaluationKey, KeyGenerator, PublicKey, SecretKey};
