//! Homomorphic evaluation over ciphertexts.
//!
//! Addition-only: the component-wise ring sum of two ciphertexts decrypts
//! to the sum of their plaintexts. Operands must agree exactly on level and
//! scale; the evaluator refuses metadata-incompatible inputs instead of
//! aligning them silently.
//!
//! Noise grows additively under addition. The evaluator tracks the
//! per-ciphertext estimate and fails with `NoiseBudgetExceeded` once the
//! remaining budget (bits between the noise and the modulus midpoint)
//! falls to the configured floor, rather than letting precision degrade
//! undetected.
//!
//! Aggregation is a pure fold: `sum` consumes a slice the caller owns and
//! returns a new ciphertext, so concurrent callers never share mutable
//! state.

use std::sync::Arc;

use tracing::trace;

use crate::error::{CkksError, Result};
use crate::ring::RingContext;
use crate::rlwe::Ciphertext;

/// Homomorphic operations over ciphertexts. Needs no key material.
#[derive(Debug, Clone)]
pub struct Evaluator {
    ring: Arc<RingContext>,
}

impl Evaluator {
    pub fn new(ring: Arc<RingContext>) -> Self {
        Self { ring }
    }

    fn check_compatible(&self, a: &Ciphertext, b: &Ciphertext) -> Result<()> {
        if a.level() != b.level() || a.scale != b.scale {
            return Err(CkksError::IncompatibleOperands {
                lhs_level: a.level(),
                rhs_level: b.level(),
                lhs_scale: a.scale,
                rhs_scale: b.scale,
            });
        }
        // Ciphertexts can arrive from the wire; reject levels past the chain.
        self.ring.check_level(a.level())
    }

    fn check_budget(&self, ct: &Ciphertext) -> Result<()> {
        let budget_bits = self.noise_budget_bits(ct);
        let floor_bits = self.ring.params().min_noise_budget_bits;
        if budget_bits <= floor_bits {
            return Err(CkksError::NoiseBudgetExceeded {
                budget_bits,
                floor_bits,
            });
        }
        Ok(())
    }

    /// Remaining noise budget in bits: log2 of the gap between the
    /// estimated noise and the modulus midpoint at the ciphertext's level.
    /// At zero the noise may wrap and decryption returns garbage.
    pub fn noise_budget_bits(&self, ct: &Ciphertext) -> f64 {
        self.ring.log2_modulus(ct.level()) - 1.0 - ct.noise.log2()
    }

    /// Homomorphic addition: decrypts to the sum of the operands'
    /// plaintexts, at the operands' level and scale.
    pub fn add(&self, a: &Ciphertext, b: &Ciphertext) -> Result<Ciphertext> {
        self.check_compatible(a, b)?;
        let out = Ciphertext {
            c0: self.ring.add(&a.c0, &b.c0)?,
            c1: self.ring.add(&a.c1, &b.c1)?,
            scale: a.scale,
            noise: a.noise + b.noise,
        };
        self.check_budget(&out)?;
        Ok(out)
    }

    /// In-place variant of [`add`](Self::add).
    pub fn add_assign(&self, a: &mut Ciphertext, b: &Ciphertext) -> Result<()> {
        *a = self.add(a, b)?;
        Ok(())
    }

    /// Homomorphic subtraction: decrypts to the difference of the
    /// operands' plaintexts.
    pub fn sub(&self, a: &Ciphertext, b: &Ciphertext) -> Result<Ciphertext> {
        self.check_compatible(a, b)?;
        let out = Ciphertext {
            c0: self.ring.sub(&a.c0, &b.c0)?,
            c1: self.ring.sub(&a.c1, &b.c1)?,
            scale: a.scale,
            noise: a.noise + b.noise,
        };
        self.check_budget(&out)?;
        Ok(out)
    }

    /// Homomorphic negation: decrypts to the negated plaintext.
    pub fn negate(&self, a: &Ciphertext) -> Ciphertext {
        Ciphertext {
            c0: self.ring.negate(&a.c0),
            c1: self.ring.negate(&a.c1),
            scale: a.scale,
            noise: a.noise,
        }
    }

    /// Sum a non-empty sequence of ciphertexts by left-to-right pairwise
    /// addition. Ring addition is associative and commutative, so the
    /// result — including the noise estimate — is independent of order.
    pub fn sum(&self, cts: &[Ciphertext]) -> Result<Ciphertext> {
        let (first, rest) = cts.split_first().ok_or_else(|| CkksError::InvalidParameters {
            reason: "cannot sum an empty ciphertext sequence".into(),
        })?;
        trace!(count = cts.len(), "aggregating ciphertexts");

        let mut acc = first.clone();
        for ct in rest {
            self.add_assign(&mut acc, ct)?;
        }
        Ok(acc)
    }
}
