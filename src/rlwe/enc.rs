//! Public-key encryption and decryption.
//!
//! Encryption of a plaintext m under pk = (b, a):
//!
//! ```text
//! u  ← ternary,  e0, e1 ← gaussian(σ)
//! c0 = b·u + e0 + m
//! c1 = a·u + e1
//! ```
//!
//! Decryption under the matching secret key s:
//!
//! ```text
//! c0 + c1·s = m + e_pk·u + e0 + e1·s ≈ m
//! ```
//!
//! Fresh randomness per call makes two encryptions of the same plaintext
//! computationally indistinguishable and never bit-identical.

use std::sync::Arc;

use rand::{CryptoRng, Rng};
use serde::{Deserialize, Serialize};

use crate::encoding::Plaintext;
use crate::error::{CkksError, Result};
use crate::math::GAUSS_TAILCUT;
use crate::params::CkksParams;
use crate::ring::{RingContext, RingElement};

use super::keys::{PublicKey, SecretKey};

/// A CKKS ciphertext: the RLWE pair (c0, c1) plus scale and noise metadata.
///
/// Decrypts via c0 + c1·s ≈ plaintext. The `noise` field is the tracked
/// ∞-norm estimate of the embedded error; it rides along on the wire so an
/// aggregator can enforce the noise budget without secret material.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ciphertext {
    /// First component, carries the masked message.
    pub c0: RingElement,
    /// Second component, carries the mask handle.
    pub c1: RingElement,
    /// Fixed-point scale inherited from the plaintext.
    pub scale: f64,
    /// Estimated ∞-norm bound of the embedded error.
    pub noise: f64,
}

impl Ciphertext {
    /// Level tag (both components agree by construction).
    pub fn level(&self) -> usize {
        self.c0.level()
    }

    /// Ring degree.
    pub fn degree(&self) -> usize {
        self.c0.degree()
    }
}

/// Worst-case ∞-norm bound on the error embedded by a fresh encryption.
///
/// Every Gaussian coefficient is bounded by B = ⌈6σ⌉ (the sampler's tail
/// cut); with ternary u and s, ‖e_pk·u‖ and ‖e1·s‖ are each at most N·B,
/// plus B for e0.
pub fn fresh_noise_bound(params: &CkksParams) -> f64 {
    let b = (GAUSS_TAILCUT * params.sigma).ceil();
    b * (2.0 * params.poly_degree as f64 + 1.0)
}

/// Encrypts plaintexts under a public key.
#[derive(Debug, Clone)]
pub struct Encryptor {
    ring: Arc<RingContext>,
    pk: PublicKey,
}

impl Encryptor {
    /// Fails with `KeyMismatch` if the public key was generated for a
    /// different ring degree.
    pub fn new(ring: Arc<RingContext>, pk: PublicKey) -> Result<Self> {
        if pk.degree() != ring.degree() {
            return Err(CkksError::KeyMismatch {
                key_degree: pk.degree(),
                expected: ring.degree(),
            });
        }
        Ok(Self { ring, pk })
    }

    /// Encrypt a plaintext at its own level.
    ///
    /// The public key's limbs are dropped to the plaintext's level before
    /// use. Fails with `LevelExhausted` if that level has no modulus
    /// remaining in the chain.
    pub fn encrypt<R: Rng + CryptoRng>(&self, pt: &Plaintext, rng: &mut R) -> Result<Ciphertext> {
        let level = pt.level();
        self.ring.check_level(level)?;

        let b = self.ring.reduce_to_level(&self.pk.b, level)?;
        let a = self.ring.reduce_to_level(&self.pk.a, level)?;

        let u = self.ring.sample_ternary_element(level, rng)?;
        let e0 = self.ring.sample_gaussian_element(level, rng)?;
        let e1 = self.ring.sample_gaussian_element(level, rng)?;

        // c0 = b·u + e0 + m
        let b_u = self.ring.mul(&b, &u)?;
        let c0 = self.ring.add(&self.ring.add(&b_u, &e0)?, &pt.elem)?;

        // c1 = a·u + e1
        let a_u = self.ring.mul(&a, &u)?;
        let c1 = self.ring.add(&a_u, &e1)?;

        Ok(Ciphertext {
            c0,
            c1,
            scale: pt.scale,
            noise: fresh_noise_bound(self.ring.params()),
        })
    }
}

/// Decrypts ciphertexts with the secret key.
#[derive(Debug, Clone)]
pub struct Decryptor {
    ring: Arc<RingContext>,
    sk: SecretKey,
}

impl Decryptor {
    /// Fails with `KeyMismatch` if the secret key was generated for a
    /// different ring degree.
    pub fn new(ring: Arc<RingContext>, sk: SecretKey) -> Result<Self> {
        if sk.degree() != ring.degree() {
            return Err(CkksError::KeyMismatch {
                key_degree: sk.degree(),
                expected: ring.degree(),
            });
        }
        Ok(Self { ring, sk })
    }

    /// Recover the (approximate) plaintext m = c0 + c1·s.
    ///
    /// The secret key is level-agnostic: its coefficients are reduced into
    /// the ciphertext's active moduli before the inner product. Never fails
    /// on data content; the result carries the ciphertext's scale and
    /// level. Evaluation-domain components are converted back to
    /// coefficients on copies.
    pub fn decrypt(&self, ct: &Ciphertext) -> Result<Plaintext> {
        self.ring.check_level(ct.level())?;

        let mut c0 = ct.c0.clone();
        let mut c1 = ct.c1.clone();
        self.ring.from_ntt(&mut c0);
        self.ring.from_ntt(&mut c1);

        let s = self.sk.to_element(&self.ring, ct.level())?;
        let c1_s = self.ring.mul(&c1, &s)?;
        let elem = self.ring.add(&c0, &c1_s)?;

        Ok(Plaintext {
            elem,
            scale: ct.scale,
        })
    }
}
