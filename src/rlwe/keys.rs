//! Key material and key generation.
//!
//! The secret key is a ternary polynomial s ∈ {-1, 0, 1}^N, stored signed
//! and level-agnostic: the same key decrypts ciphertexts at any level by
//! reducing its coefficients into the ciphertext's active moduli on demand.
//! The public key is a fresh RLWE sample (b = -a·s + e, a) at level 0 and
//! is the only key artifact that may leave the process.

use std::sync::Arc;

use rand::{CryptoRng, Rng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CkksError, Result};
use crate::math::sample_ternary;
use crate::ring::{RingContext, RingElement};

/// Ternary secret key.
///
/// Deliberately not serializable: secret keys stay with the party that
/// generated them.
#[derive(Debug, Clone)]
pub struct SecretKey {
    /// Signed ternary coefficients.
    coeffs: Vec<i8>,
}

impl SecretKey {
    /// Ring degree the key was generated for.
    pub fn degree(&self) -> usize {
        self.coeffs.len()
    }

    /// Materialize the key as a ring element at `level`, reducing each
    /// signed coefficient into the active moduli.
    pub(crate) fn to_element(&self, ring: &RingContext, level: usize) -> Result<RingElement> {
        let signed: Vec<i64> = self.coeffs.iter().map(|&c| i64::from(c)).collect();
        ring.element_from_signed(&signed, level)
    }
}

/// Public encryption key: the RLWE pair (b = -a·s + e, a) at level 0.
///
/// Safe to share with untrusted parties; its wire form is the serialized
/// pair of ring elements, which carry the level and degree they were
/// generated at.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicKey {
    /// b = -a·s + e.
    pub b: RingElement,
    /// Uniformly random polynomial a.
    pub a: RingElement,
}

impl PublicKey {
    /// Ring degree the key was generated for.
    pub fn degree(&self) -> usize {
        self.a.degree()
    }

    /// Level the key was generated at.
    pub fn level(&self) -> usize {
        self.a.level()
    }
}

/// Evaluation key pair, the same RLWE-sample shape as [`PublicKey`].
///
/// Reserved for operations that need key switching (relinearization,
/// rotations). The addition-only engine defines the type for forward
/// compatibility but never produces one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationKey {
    pub b: RingElement,
    pub a: RingElement,
}

/// Generates secret and public keys for a ring context.
#[derive(Debug, Clone)]
pub struct KeyGenerator {
    ring: Arc<RingContext>,
}

impl KeyGenerator {
    pub fn new(ring: Arc<RingContext>) -> Self {
        Self { ring }
    }

    /// Draw a fresh ternary secret key.
    ///
    /// Failure of the entropy source surfaces as a panic from the injected
    /// RNG; there is no other failure mode.
    pub fn generate_secret_key<R: Rng + CryptoRng>(&self, rng: &mut R) -> SecretKey {
        let coeffs = sample_ternary(rng, self.ring.degree());
        debug!(degree = self.ring.degree(), "generated secret key");
        SecretKey { coeffs }
    }

    /// Derive a public key from a secret key with fresh randomness.
    ///
    /// Every call draws an independent `a` and error, so repeated calls
    /// with the same secret key yield distinct, equally valid public keys.
    /// Fails with `KeyMismatch` if the secret key was generated for a
    /// different ring degree.
    pub fn generate_public_key<R: Rng + CryptoRng>(
        &self,
        sk: &SecretKey,
        rng: &mut R,
    ) -> Result<PublicKey> {
        if sk.degree() != self.ring.degree() {
            return Err(CkksError::KeyMismatch {
                key_degree: sk.degree(),
                expected: self.ring.degree(),
            });
        }

        let a = self.ring.sample_uniform_element(0, rng)?;
        let e = self.ring.sample_gaussian_element(0, rng)?;
        let s = sk.to_element(&self.ring, 0)?;

        // b = -a·s + e
        let a_s = self.ring.mul(&a, &s)?;
        let b = self.ring.add(&self.ring.negate(&a_s), &e)?;

        debug!(degree = self.ring.degree(), "generated public key");
        Ok(PublicKey { b, a })
    }

    /// Convenience: fresh secret key plus matching public key.
    pub fn generate_key_pair<R: Rng + CryptoRng>(
        &self,
        rng: &mut R,
    ) -> Result<(SecretKey, PublicKey)> {
        let sk = self.generate_secret_key(rng);
        let pk = self.generate_public_key(&sk, rng)?;
        Ok((sk, pk))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::GAUSS_TAILCUT;
    use crate::params::{CkksParams, DEFAULT_SIGMA};
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn test_ring() -> Arc<RingContext> {
        let params = CkksParams::with_prime_bits(16, &[50, 40], 1024.0, DEFAULT_SIGMA).unwrap();
        Arc::new(RingContext::new(params).unwrap())
    }

    #[test]
    fn test_secret_key_is_ternary() {
        let ring = test_ring();
        let keygen = KeyGenerator::new(ring.clone());
        let mut rng = ChaCha20Rng::seed_from_u64(11);

        let sk = keygen.generate_secret_key(&mut rng);
        assert_eq!(sk.degree(), 16);
        assert!(sk.coeffs.iter().all(|&c| (-1..=1).contains(&c)));
    }

    #[test]
    fn test_public_key_relation() {
        // b + a·s must equal the small error e.
        let ring = test_ring();
        let keygen = KeyGenerator::new(ring.clone());
        let mut rng = ChaCha20Rng::seed_from_u64(12);

        let (sk, pk) = keygen.generate_key_pair(&mut rng).unwrap();
        let s = sk.to_element(&ring, 0).unwrap();
        let a_s = ring.mul(&pk.a, &s).unwrap();
        let residual = ring.add(&pk.b, &a_s).unwrap();

        let q0 = ring.params().moduli[0];
        let bound = (DEFAULT_SIGMA * GAUSS_TAILCUT).ceil() as i64;
        for &c in residual.to_signed_limb0(q0).iter() {
            assert!(c.abs() <= bound, "residual coefficient {c} exceeds {bound}");
        }
    }

    #[test]
    fn test_public_keys_are_independent() {
        let ring = test_ring();
        let keygen = KeyGenerator::new(ring);
        let mut rng = ChaCha20Rng::seed_from_u64(13);

        let sk = keygen.generate_secret_key(&mut rng);
        let pk1 = keygen.generate_public_key(&sk, &mut rng).unwrap();
        let pk2 = keygen.generate_public_key(&sk, &mut rng).unwrap();

        assert_ne!(pk1.a, pk2.a);
        assert_ne!(pk1.b, pk2.b);
    }

    #[test]
    fn test_key_mismatch_rejected() {
        let ring16 = test_ring();
        let params8 = CkksParams::with_prime_bits(8, &[50], 1024.0, DEFAULT_SIGMA).unwrap();
        let ring8 = Arc::new(RingContext::new(params8).unwrap());
        let mut rng = ChaCha20Rng::seed_from_u64(14);

        let sk8 = KeyGenerator::new(ring8).generate_secret_key(&mut rng);
        let err = KeyGenerator::new(ring16)
            .generate_public_key(&sk8, &mut rng)
            .unwrap_err();
        assert_eq!(
            err,
            CkksError::KeyMismatch {
                key_degree: 8,
                expected: 16
            }
        );
    }
}
