//! Leveled arithmetic over the cyclotomic ring.
//!
//! [`RingContext`] owns the parameter set and one precomputed NTT context
//! per chain prime. All element arithmetic goes through it: operations
//! check the level and representation tags of their operands and fail with
//! typed errors on mismatch instead of converting or aligning silently.
//!
//! Addition, subtraction, and negation are exact coefficient-wise modular
//! operations; they introduce no approximation error. Only encoding and
//! encryption add error terms.

use tracing::debug;

use crate::error::{CkksError, Result};
use crate::math::{sample_gaussian_signed, sample_ternary, sample_uniform, ModQ, NttContext};
use crate::params::CkksParams;
use rand::{CryptoRng, Rng};

use super::element::{Representation, RingElement};

/// Precomputed context for ring arithmetic at every level of the chain.
///
/// Immutable after construction; share it across threads behind an `Arc`.
#[derive(Debug, Clone)]
pub struct RingContext {
    params: CkksParams,
    /// One NTT context per chain prime, index-aligned with `params.moduli`.
    ntt: Vec<NttContext>,
}

impl RingContext {
    /// Validate the parameters and precompute NTT tables for every chain
    /// prime.
    pub fn new(params: CkksParams) -> Result<Self> {
        params.validate()?;
        let ntt = params
            .moduli
            .iter()
            .map(|&q| NttContext::new(params.poly_degree, q))
            .collect();
        debug!(
            degree = params.poly_degree,
            chain_len = params.chain_len(),
            slots = params.slots(),
            "ring context initialized"
        );
        Ok(Self { params, ntt })
    }

    /// The validated parameter set.
    pub fn params(&self) -> &CkksParams {
        &self.params
    }

    /// Ring degree N.
    pub fn degree(&self) -> usize {
        self.params.poly_degree
    }

    /// Slot count N/2.
    pub fn slots(&self) -> usize {
        self.params.slots()
    }

    /// Modulus chain length L.
    pub fn chain_len(&self) -> usize {
        self.params.chain_len()
    }

    /// The chain primes active for an element at `level`.
    pub fn active_moduli(&self, level: usize) -> &[u64] {
        &self.params.moduli[..self.params.limbs_at(level)]
    }

    /// log2 of the effective modulus (product of active primes) at `level`.
    pub fn log2_modulus(&self, level: usize) -> f64 {
        self.active_moduli(level)
            .iter()
            .map(|&q| (q as f64).log2())
            .sum()
    }

    /// Fail with `LevelExhausted` unless `level` has a modulus remaining.
    pub fn check_level(&self, level: usize) -> Result<()> {
        if level >= self.chain_len() {
            return Err(CkksError::LevelExhausted {
                level,
                chain_len: self.chain_len(),
            });
        }
        Ok(())
    }

    /// Zero element at `level`, coefficient representation.
    pub fn zero(&self, level: usize) -> Result<RingElement> {
        self.check_level(level)?;
        Ok(RingElement::zero(
            self.degree(),
            self.params.limbs_at(level),
            level,
        ))
    }

    /// Element from signed coefficients, reduced into every active limb of
    /// `level`.
    pub fn element_from_signed(&self, coeffs: &[i64], level: usize) -> Result<RingElement> {
        self.check_level(level)?;
        debug_assert_eq!(coeffs.len(), self.degree());
        Ok(RingElement::from_signed(
            coeffs,
            self.active_moduli(level),
            level,
        ))
    }

    fn check_operands(&self, a: &RingElement, b: &RingElement) -> Result<()> {
        if a.level() != b.level() {
            return Err(CkksError::LevelMismatch {
                lhs: a.level(),
                rhs: b.level(),
            });
        }
        if a.representation() != b.representation() {
            return Err(CkksError::DomainMismatch {
                lhs: a.representation(),
                rhs: b.representation(),
            });
        }
        debug_assert_eq!(a.degree(), self.degree());
        debug_assert_eq!(b.degree(), self.degree());
        debug_assert_eq!(a.num_limbs(), self.params.limbs_at(a.level()));
        Ok(())
    }

    /// Coefficient-wise modular sum. Valid in either representation (the
    /// NTT is linear); operands must agree on level and representation.
    pub fn add(&self, a: &RingElement, b: &RingElement) -> Result<RingElement> {
        self.check_operands(a, b)?;
        let mut out = a.clone();
        for (limb_idx, &q) in self.active_moduli(a.level()).iter().enumerate() {
            let dst = &mut out.limbs_mut()[limb_idx];
            for (d, &s) in dst.iter_mut().zip(b.limbs()[limb_idx].iter()) {
                *d = ModQ::add(*d, s, q);
            }
        }
        Ok(out)
    }

    /// Coefficient-wise modular difference.
    pub fn sub(&self, a: &RingElement, b: &RingElement) -> Result<RingElement> {
        self.check_operands(a, b)?;
        let mut out = a.clone();
        for (limb_idx, &q) in self.active_moduli(a.level()).iter().enumerate() {
            let dst = &mut out.limbs_mut()[limb_idx];
            for (d, &s) in dst.iter_mut().zip(b.limbs()[limb_idx].iter()) {
                *d = ModQ::sub(*d, s, q);
            }
        }
        Ok(out)
    }

    /// Coefficient-wise negation.
    pub fn negate(&self, a: &RingElement) -> RingElement {
        let mut out = a.clone();
        for (limb_idx, &q) in self.active_moduli(a.level()).iter().enumerate() {
            for c in out.limbs_mut()[limb_idx].iter_mut() {
                *c = ModQ::negate(*c, q);
            }
        }
        out
    }

    /// Drop to the next level of the chain by removing the last active
    /// limb. Kept for aligning operands after depth-consuming operations;
    /// the addition-only flow never calls it. Fails with `LevelExhausted`
    /// at the last level.
    pub fn reduce_level(&self, a: &RingElement) -> Result<RingElement> {
        self.reduce_to_level(a, a.level() + 1)
    }

    /// Drop an element to an arbitrary deeper `level`.
    pub fn reduce_to_level(&self, a: &RingElement, level: usize) -> Result<RingElement> {
        self.check_level(level)?;
        if level < a.level() {
            return Err(CkksError::LevelMismatch {
                lhs: a.level(),
                rhs: level,
            });
        }
        let mut out = a.clone();
        out.drop_limbs(level - a.level());
        Ok(out)
    }

    /// Convert to evaluation (NTT) representation in place. Idempotent.
    pub fn to_ntt(&self, a: &mut RingElement) {
        if a.representation() == Representation::Evaluation {
            return;
        }
        for (limb_idx, limb) in a.limbs_mut().iter_mut().enumerate() {
            self.ntt[limb_idx].forward(limb);
        }
        a.set_representation(Representation::Evaluation);
    }

    /// Convert to coefficient representation in place. Idempotent.
    pub fn from_ntt(&self, a: &mut RingElement) {
        if a.representation() == Representation::Coefficient {
            return;
        }
        for (limb_idx, limb) in a.limbs_mut().iter_mut().enumerate() {
            self.ntt[limb_idx].inverse(limb);
        }
        a.set_representation(Representation::Coefficient);
    }

    /// Negacyclic product of two ring elements.
    ///
    /// Operands must agree on level and representation. Coefficient-domain
    /// operands are transformed on copies; the result comes back in the
    /// operands' representation.
    pub fn mul(&self, a: &RingElement, b: &RingElement) -> Result<RingElement> {
        self.check_operands(a, b)?;
        let in_coeff = a.representation() == Representation::Coefficient;

        let mut a_eval = a.clone();
        let mut b_eval = b.clone();
        self.to_ntt(&mut a_eval);
        self.to_ntt(&mut b_eval);

        let mut out = RingElement::zero(self.degree(), a.num_limbs(), a.level());
        for limb_idx in 0..a.num_limbs() {
            self.ntt[limb_idx].pointwise_mul(
                &a_eval.limbs()[limb_idx],
                &b_eval.limbs()[limb_idx],
                &mut out.limbs_mut()[limb_idx],
            );
        }
        out.set_representation(Representation::Evaluation);
        if in_coeff {
            self.from_ntt(&mut out);
        }
        Ok(out)
    }

    /// Uniform random element at `level`. Sampling each limb independently
    /// is uniform over the full RNS modulus by CRT.
    pub fn sample_uniform_element<R: Rng + CryptoRng>(
        &self,
        level: usize,
        rng: &mut R,
    ) -> Result<RingElement> {
        self.check_level(level)?;
        let limbs = self
            .active_moduli(level)
            .iter()
            .map(|&q| sample_uniform(rng, self.degree(), q))
            .collect();
        Ok(RingElement::from_limbs(
            limbs,
            level,
            Representation::Coefficient,
        ))
    }

    /// Discrete-Gaussian error element at `level`. The signed value is
    /// sampled once per coefficient and reduced into every limb.
    pub fn sample_gaussian_element<R: Rng + CryptoRng>(
        &self,
        level: usize,
        rng: &mut R,
    ) -> Result<RingElement> {
        self.check_level(level)?;
        let signed = sample_gaussian_signed(rng, self.degree(), self.params.sigma);
        self.element_from_signed(&signed, level)
    }

    /// Uniform ternary element at `level` (ephemeral encryption masks).
    pub fn sample_ternary_element<R: Rng + CryptoRng>(
        &self,
        level: usize,
        rng: &mut R,
    ) -> Result<RingElement> {
        self.check_level(level)?;
        let signed: Vec<i64> = sample_ternary(rng, self.degree())
            .into_iter()
            .map(i64::from)
            .collect();
        self.element_from_signed(&signed, level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::DEFAULT_SIGMA;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn test_ring() -> RingContext {
        let params = CkksParams::with_prime_bits(8, &[40, 30], 1024.0, DEFAULT_SIGMA).unwrap();
        RingContext::new(params).unwrap()
    }

    #[test]
    fn test_add_sub_negate() {
        let ring = test_ring();
        let a = ring
            .element_from_signed(&[1, 2, 3, 4, 5, 6, 7, 8], 0)
            .unwrap();
        let b = ring
            .element_from_signed(&[10, 20, 30, 40, 50, 60, 70, 80], 0)
            .unwrap();

        let sum = ring.add(&a, &b).unwrap();
        let expected = ring
            .element_from_signed(&[11, 22, 33, 44, 55, 66, 77, 88], 0)
            .unwrap();
        assert_eq!(sum, expected);

        let diff = ring.sub(&sum, &b).unwrap();
        assert_eq!(diff, a);

        let neg = ring.negate(&a);
        assert!(ring.add(&a, &neg).unwrap().is_zero());
    }

    #[test]
    fn test_level_mismatch_rejected() {
        let ring = test_ring();
        let a = ring.zero(0).unwrap();
        let b = ring.zero(1).unwrap();
        let err = ring.add(&a, &b).unwrap_err();
        assert_eq!(err, CkksError::LevelMismatch { lhs: 0, rhs: 1 });
    }

    #[test]
    fn test_domain_mismatch_rejected() {
        let ring = test_ring();
        let a = ring.zero(0).unwrap();
        let mut b = ring.zero(0).unwrap();
        ring.to_ntt(&mut b);
        let err = ring.add(&a, &b).unwrap_err();
        assert!(matches!(err, CkksError::DomainMismatch { .. }));
    }

    #[test]
    fn test_ntt_roundtrip() {
        let ring = test_ring();
        let original = ring
            .element_from_signed(&[9, -8, 7, -6, 5, -4, 3, -2], 0)
            .unwrap();
        let mut e = original.clone();

        ring.to_ntt(&mut e);
        assert_eq!(e.representation(), Representation::Evaluation);
        ring.from_ntt(&mut e);
        assert_eq!(e.representation(), Representation::Coefficient);

        assert_eq!(e, original);
    }

    #[test]
    fn test_mul_identity() {
        let ring = test_ring();
        let a = ring
            .element_from_signed(&[3, 1, 4, 1, 5, 9, 2, 6], 0)
            .unwrap();
        let mut one = vec![0i64; 8];
        one[0] = 1;
        let one = ring.element_from_signed(&one, 0).unwrap();

        let product = ring.mul(&a, &one).unwrap();
        assert_eq!(product, a);
    }

    #[test]
    fn test_mul_negacyclic_wraparound() {
        // x * x^(n-1) = -1 in Z_q[X]/(X^n + 1)
        let ring = test_ring();
        let n = ring.degree();
        let mut x = vec![0i64; n];
        x[1] = 1;
        let mut xn1 = vec![0i64; n];
        xn1[n - 1] = 1;

        let a = ring.element_from_signed(&x, 0).unwrap();
        let b = ring.element_from_signed(&xn1, 0).unwrap();
        let product = ring.mul(&a, &b).unwrap();

        let mut minus_one = vec![0i64; n];
        minus_one[0] = -1;
        assert_eq!(product, ring.element_from_signed(&minus_one, 0).unwrap());
    }

    #[test]
    fn test_reduce_level_drops_limb() {
        let ring = test_ring();
        let a = ring.element_from_signed(&[1, -2, 3, -4, 5, -6, 7, -8], 0).unwrap();
        let reduced = ring.reduce_level(&a).unwrap();
        assert_eq!(reduced.level(), 1);
        assert_eq!(reduced.num_limbs(), 1);
        assert_eq!(reduced.limbs()[0], a.limbs()[0]);
    }

    #[test]
    fn test_reduce_level_exhausts() {
        let ring = test_ring();
        let a = ring.zero(1).unwrap();
        let err = ring.reduce_level(&a).unwrap_err();
        assert_eq!(
            err,
            CkksError::LevelExhausted {
                level: 2,
                chain_len: 2
            }
        );
    }

    #[test]
    fn test_sampling_shapes() {
        let ring = test_ring();
        let mut rng = ChaCha20Rng::seed_from_u64(1);

        let u = ring.sample_uniform_element(0, &mut rng).unwrap();
        assert_eq!(u.num_limbs(), 2);
        for (limb, &q) in u.limbs().iter().zip(ring.active_moduli(0)) {
            assert!(limb.iter().all(|&c| c < q));
        }

        let t = ring.sample_ternary_element(1, &mut rng).unwrap();
        assert_eq!(t.num_limbs(), 1);
        let q = ring.active_moduli(1)[0];
        assert!(t.limbs()[0].iter().all(|&c| c == 0 || c == 1 || c == q - 1));

        let g = ring.sample_gaussian_element(0, &mut rng).unwrap();
        assert_eq!(g.level(), 0);
    }

    #[test]
    fn test_add_distributes_over_mul() {
        // a*(b + c) == a*b + a*c
        let ring = test_ring();
        let a = ring.element_from_signed(&[2, 0, -1, 3, 0, 1, -2, 4], 0).unwrap();
        let b = ring.element_from_signed(&[1, 1, 0, -1, 2, 0, 3, -3], 0).unwrap();
        let c = ring.element_from_signed(&[0, -2, 5, 1, -1, 2, 0, 1], 0).unwrap();

        let left = ring.mul(&a, &ring.add(&b, &c).unwrap()).unwrap();
        let right = ring
            .add(&ring.mul(&a, &b).unwrap(), &ring.mul(&a, &c).unwrap())
            .unwrap();
        assert_eq!(left, right);
    }
}
