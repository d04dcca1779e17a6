//! Ring elements of R_Q = Z_Q[X]/(X^N + 1).
//!
//! A [`RingElement`] stores one RNS limb per active chain modulus: limb `i`
//! holds the coefficients reduced mod q_i, always in canonical form
//! [0, q_i). The element is tagged with its level (how many chain primes
//! have been consumed) and its representation. Arithmetic lives on the
//! ring context, which checks both tags before touching the limbs.

use serde::{Deserialize, Serialize};

use crate::math::ModQ;

/// Representation of a ring element's limb data.
///
/// Conversions between the two are explicit (`to_ntt`/`from_ntt` on the
/// ring context); operations on mixed representations fail rather than
/// converting silently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Representation {
    /// Polynomial coefficients.
    Coefficient,
    /// NTT evaluations (Montgomery form, as produced by the forward NTT).
    Evaluation,
}

/// An element of the cyclotomic ring at some level of the modulus chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RingElement {
    /// One coefficient vector per active modulus: `limbs[i][j]` is
    /// coefficient j reduced mod q_i.
    limbs: Vec<Vec<u64>>,
    /// Number of chain primes consumed. A fresh element is at level 0.
    level: usize,
    /// Coefficient or evaluation domain.
    repr: Representation,
}

impl RingElement {
    /// Zero element with the given degree and limb count, in coefficient
    /// representation.
    pub fn zero(degree: usize, num_limbs: usize, level: usize) -> Self {
        Self {
            limbs: vec![vec![0u64; degree]; num_limbs],
            level,
            repr: Representation::Coefficient,
        }
    }

    /// Build an element from signed coefficients, reducing the same signed
    /// value into every limb.
    pub fn from_signed(coeffs: &[i64], moduli: &[u64], level: usize) -> Self {
        let limbs = moduli
            .iter()
            .map(|&q| coeffs.iter().map(|&c| ModQ::from_signed(c, q)).collect())
            .collect();
        Self {
            limbs,
            level,
            repr: Representation::Coefficient,
        }
    }

    /// Build an element from per-limb canonical coefficient vectors.
    pub fn from_limbs(limbs: Vec<Vec<u64>>, level: usize, repr: Representation) -> Self {
        debug_assert!(!limbs.is_empty(), "element must have at least one limb");
        debug_assert!(
            limbs.iter().all(|l| l.len() == limbs[0].len()),
            "limbs must share one degree"
        );
        Self { limbs, level, repr }
    }

    /// Ring degree N.
    pub fn degree(&self) -> usize {
        self.limbs[0].len()
    }

    /// Level tag (chain primes consumed).
    pub fn level(&self) -> usize {
        self.level
    }

    /// Number of active RNS limbs.
    pub fn num_limbs(&self) -> usize {
        self.limbs.len()
    }

    /// Current representation.
    pub fn representation(&self) -> Representation {
        self.repr
    }

    /// Limb data, one canonical coefficient vector per active modulus.
    pub fn limbs(&self) -> &[Vec<u64>] {
        &self.limbs
    }

    pub(crate) fn limbs_mut(&mut self) -> &mut [Vec<u64>] {
        &mut self.limbs
    }

    pub(crate) fn set_representation(&mut self, repr: Representation) {
        self.repr = repr;
    }

    /// Drop the last `count` limbs, raising the level tag accordingly.
    pub(crate) fn drop_limbs(&mut self, count: usize) {
        debug_assert!(count < self.limbs.len(), "cannot drop every limb");
        self.limbs.truncate(self.limbs.len() - count);
        self.level += count;
    }

    /// True if every coefficient of every limb is zero.
    pub fn is_zero(&self) -> bool {
        self.limbs.iter().all(|l| l.iter().all(|&c| c == 0))
    }

    /// Centered signed coefficients lifted from the first limb.
    ///
    /// Exact whenever the underlying integer coefficients lie in
    /// (-q_0/2, q_0/2]; the encoder documents this precondition.
    pub fn to_signed_limb0(&self, q0: u64) -> Vec<i64> {
        debug_assert_eq!(
            self.repr,
            Representation::Coefficient,
            "centered lift requires coefficient representation"
        );
        self.limbs[0]
            .iter()
            .map(|&c| ModQ::to_signed(c, q0))
            .collect()
    }
}
