//! Wire formats for the shareable artifacts.
//!
//! Two artifact kinds cross trust boundaries: public keys (key holder →
//! parties) and ciphertexts (parties → aggregator → key holder). Both are
//! bincode-encoded; the embedded ring elements carry their level, degree,
//! and representation, and ciphertexts additionally carry scale and the
//! noise estimate, so the aggregator can feed them straight into the
//! evaluator without any out-of-band context.
//!
//! Secret keys have no wire form by design.

use crate::error::Result;
use crate::rlwe::{Ciphertext, PublicKey};

/// Serialize a public key for distribution to encrypting parties.
pub fn public_key_to_bytes(pk: &PublicKey) -> Result<Vec<u8>> {
    Ok(bincode::serialize(pk)?)
}

/// Deserialize a public key received from the key holder.
pub fn public_key_from_bytes(bytes: &[u8]) -> Result<PublicKey> {
    Ok(bincode::deserialize(bytes)?)
}

/// Serialize a ciphertext for transmission to the aggregator or key holder.
pub fn ciphertext_to_bytes(ct: &Ciphertext) -> Result<Vec<u8>> {
    Ok(bincode::serialize(ct)?)
}

/// Deserialize a ciphertext received from a party or aggregator.
pub fn ciphertext_from_bytes(bytes: &[u8]) -> Result<Ciphertext> {
    Ok(bincode::deserialize(bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::CkksEncoder;
    use crate::error::CkksError;
    use crate::params::{CkksParams, DEFAULT_SIGMA};
    use crate::ring::RingContext;
    use crate::rlwe::{Encryptor, KeyGenerator};
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;
    use std::sync::Arc;

    const SCALE: f64 = (1u64 << 30) as f64;

    #[test]
    fn test_public_key_roundtrip() {
        let params = CkksParams::with_prime_bits(16, &[50, 40], SCALE, DEFAULT_SIGMA).unwrap();
        let ring = Arc::new(RingContext::new(params).unwrap());
        let mut rng = ChaCha20Rng::seed_from_u64(21);
        let (_sk, pk) = KeyGenerator::new(ring).generate_key_pair(&mut rng).unwrap();

        let bytes = public_key_to_bytes(&pk).unwrap();
        let restored = public_key_from_bytes(&bytes).unwrap();

        assert_eq!(restored.a, pk.a);
        assert_eq!(restored.b, pk.b);
        assert_eq!(restored.degree(), 16);
        assert_eq!(restored.level(), 0);
    }

    #[test]
    fn test_ciphertext_roundtrip() {
        let params = CkksParams::with_prime_bits(16, &[50, 40], SCALE, DEFAULT_SIGMA).unwrap();
        let ring = Arc::new(RingContext::new(params).unwrap());
        let encoder = CkksEncoder::new(ring.clone());
        let mut rng = ChaCha20Rng::seed_from_u64(22);
        let (_sk, pk) = KeyGenerator::new(ring.clone())
            .generate_key_pair(&mut rng)
            .unwrap();
        let encryptor = Encryptor::new(ring, pk).unwrap();

        let pt = encoder.encode_real(&[1.0, -2.0], SCALE, 0).unwrap();
        let ct = encryptor.encrypt(&pt, &mut rng).unwrap();

        let bytes = ciphertext_to_bytes(&ct).unwrap();
        let restored = ciphertext_from_bytes(&bytes).unwrap();

        assert_eq!(restored.c0, ct.c0);
        assert_eq!(restored.c1, ct.c1);
        assert_eq!(restored.scale, ct.scale);
        assert_eq!(restored.noise, ct.noise);
        assert_eq!(restored.level(), ct.level());
    }

    #[test]
    fn test_garbage_bytes_rejected() {
        let err = ciphertext_from_bytes(&[0xde, 0xad, 0xbe]).unwrap_err();
        assert!(matches!(err, CkksError::Serialization(_)));
    }
}
