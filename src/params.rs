//! CKKS parameter sets.
//!
//! A parameter set fixes the cyclotomic ring degree N, the RNS modulus chain
//! [q_0, ..., q_{L-1}], the default encoding scale Δ, and the standard
//! deviation σ of the error distribution. Parameters are immutable once
//! validated; everything else in the engine is derived from them.
//!
//! Each modulus must be NTT-friendly (q ≡ 1 mod 2N) so the negacyclic NTT
//! over Z_q[X]/(X^N + 1) exists. The preset chain mirrors the common
//! 8192 / [60, 40, 40, 60] / Δ = 2^40 configuration used by mainstream CKKS
//! deployments.

use serde::{Deserialize, Serialize};

use crate::error::{CkksError, Result};

/// Default standard deviation for the error distribution.
pub const DEFAULT_SIGMA: f64 = 3.2;

/// Default scale bits for fixed-point encoding: Δ = 2^40.
pub const DEFAULT_SCALE_BITS: u32 = 40;

/// Complete CKKS parameter set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CkksParams {
    /// Ring degree N (power of two). Slot count is N/2.
    pub poly_degree: usize,
    /// RNS modulus chain [q_0, ..., q_{L-1}]. A fresh object at level 0
    /// carries all L limbs; level ℓ carries the first L - ℓ.
    pub moduli: Vec<u64>,
    /// Default encoding scale Δ.
    pub scale: f64,
    /// Standard deviation σ of the discrete Gaussian error distribution.
    pub sigma: f64,
    /// Noise-budget floor in bits. The evaluator refuses to produce a
    /// ciphertext whose estimated budget is at or below this floor.
    pub min_noise_budget_bits: f64,
}

impl CkksParams {
    /// Build and validate a parameter set from explicit values.
    pub fn new(poly_degree: usize, moduli: Vec<u64>, scale: f64, sigma: f64) -> Result<Self> {
        let params = Self {
            poly_degree,
            moduli,
            scale,
            sigma,
            min_noise_budget_bits: 0.0,
        };
        params.validate()?;
        Ok(params)
    }

    /// Parameter set for N = 8192 with a [60, 40, 40, 60]-bit chain and
    /// Δ = 2^40 (~128-bit security). All primes are ≡ 1 (mod 16384).
    pub fn n8192() -> Self {
        Self {
            poly_degree: 8192,
            moduli: vec![
                1152921504606830593, // 60-bit
                1099511480321,       // 40-bit
                1099510890497,       // 40-bit
                1152921504606601217, // 60-bit
            ],
            scale: (1u64 << DEFAULT_SCALE_BITS) as f64,
            sigma: DEFAULT_SIGMA,
            min_noise_budget_bits: 0.0,
        }
    }

    /// Build a parameter set by searching NTT-friendly primes of the given
    /// bit widths at runtime. Allows arbitrary (power-of-two) degrees for
    /// tests and depth/security trade-offs without a hardcoded table.
    pub fn with_prime_bits(
        poly_degree: usize,
        modulus_bits: &[u32],
        scale: f64,
        sigma: f64,
    ) -> Result<Self> {
        if !poly_degree.is_power_of_two() || poly_degree < 2 {
            return Err(CkksError::InvalidParameters {
                reason: format!("poly_degree {poly_degree} is not a power of two >= 2"),
            });
        }
        let two_n = (2 * poly_degree) as u64;
        let mut moduli: Vec<u64> = Vec::with_capacity(modulus_bits.len());
        for &bits in modulus_bits {
            let prime = find_ntt_friendly_prime(bits, two_n, &moduli).ok_or_else(|| {
                CkksError::InvalidParameters {
                    reason: format!("no unused {bits}-bit prime ≡ 1 (mod {two_n}) exists"),
                }
            })?;
            moduli.push(prime);
        }
        Self::new(poly_degree, moduli, scale, sigma)
    }

    /// Number of SIMD slots = N/2.
    pub fn slots(&self) -> usize {
        self.poly_degree / 2
    }

    /// Length of the modulus chain.
    pub fn chain_len(&self) -> usize {
        self.moduli.len()
    }

    /// Number of leveled operations remaining for an object at `level`.
    pub fn levels_remaining(&self, level: usize) -> usize {
        self.chain_len().saturating_sub(level + 1)
    }

    /// Number of active RNS limbs for an object at `level`.
    pub fn limbs_at(&self, level: usize) -> usize {
        self.chain_len().saturating_sub(level)
    }

    /// Check the full invariant set; fails with `InvalidParameters`.
    pub fn validate(&self) -> Result<()> {
        let fail = |reason: String| Err(CkksError::InvalidParameters { reason });

        if !self.poly_degree.is_power_of_two() || self.poly_degree < 2 {
            return fail(format!(
                "poly_degree {} is not a power of two >= 2",
                self.poly_degree
            ));
        }
        if self.moduli.is_empty() {
            return fail("modulus chain is empty".into());
        }
        if !(self.scale > 0.0 && self.scale.is_finite()) {
            return fail(format!("scale {} is not a positive finite value", self.scale));
        }
        if !(self.sigma > 0.0 && self.sigma.is_finite()) {
            return fail(format!("sigma {} is not a positive finite value", self.sigma));
        }

        let two_n = (2 * self.poly_degree) as u64;
        for (i, &q) in self.moduli.iter().enumerate() {
            if q < 2 || q % 2 == 0 {
                return fail(format!("modulus {i} ({q}) is not an odd prime"));
            }
            if q >= (1u64 << 62) {
                return fail(format!("modulus {i} ({q}) exceeds the 62-bit limit"));
            }
            if q % two_n != 1 {
                return fail(format!(
                    "modulus {i} ({q}) is not NTT-friendly: q mod 2N = {}",
                    q % two_n
                ));
            }
            if !is_prime_u64(q) {
                return fail(format!("modulus {i} ({q}) is not prime"));
            }
        }
        Ok(())
    }
}

impl Default for CkksParams {
    fn default() -> Self {
        Self::n8192()
    }
}

/// Find the largest prime of the given bit width with q ≡ 1 (mod two_n)
/// that is not already in `exclude`.
///
/// Searches downward from the top of the bit range in steps of two_n so
/// every candidate already satisfies the congruence. Excluding previous
/// picks keeps chains with repeated bit widths on distinct primes.
fn find_ntt_friendly_prime(bits: u32, two_n: u64, exclude: &[u64]) -> Option<u64> {
    if bits < 2 || bits > 62 {
        return None;
    }
    let upper = (1u64 << bits) - 1;
    let lower = 1u64 << (bits - 1);

    let mut candidate = upper - (upper % two_n) + 1;
    if candidate > upper {
        candidate = candidate.checked_sub(two_n)?;
    }
    while candidate >= lower {
        if is_prime_u64(candidate) && !exclude.contains(&candidate) {
            return Some(candidate);
        }
        candidate = match candidate.checked_sub(two_n) {
            Some(c) => c,
            None => break,
        };
    }
    None
}

/// Deterministic trial-division primality test, sufficient for 62-bit moduli
/// checked once at construction time.
fn is_prime_u64(n: u64) -> bool {
    if n < 2 {
        return false;
    }
    if n == 2 || n == 3 {
        return true;
    }
    if n % 2 == 0 || n % 3 == 0 {
        return false;
    }
    let mut i = 5u64;
    while i.saturating_mul(i) <= n {
        if n % i == 0 || n % (i + 2) == 0 {
            return false;
        }
        i += 6;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_valid() {
        let params = CkksParams::n8192();
        assert!(params.validate().is_ok());
        assert_eq!(params.slots(), 4096);
        assert_eq!(params.chain_len(), 4);
        assert_eq!(params.levels_remaining(0), 3);
        assert_eq!(params.limbs_at(1), 3);
    }

    #[test]
    fn test_preset_ntt_friendly() {
        let params = CkksParams::n8192();
        let two_n = (2 * params.poly_degree) as u64;
        for (i, &q) in params.moduli.iter().enumerate() {
            assert_eq!(q % two_n, 1, "modulus {i} ({q}) is not ≡ 1 mod {two_n}");
            assert!(is_prime_u64(q), "modulus {i} ({q}) is not prime");
        }
    }

    #[test]
    fn test_prime_search_small_degree() {
        let params = CkksParams::with_prime_bits(4, &[40], 1024.0, DEFAULT_SIGMA).unwrap();
        assert_eq!(params.moduli.len(), 1);
        assert_eq!(params.moduli[0] % 8, 1);
        assert!(is_prime_u64(params.moduli[0]));
    }

    #[test]
    fn test_prime_search_repeated_widths_are_distinct() {
        let params =
            CkksParams::with_prime_bits(8, &[40, 40, 40], 1024.0, DEFAULT_SIGMA).unwrap();
        assert_eq!(params.moduli.len(), 3);
        for i in 0..3 {
            for j in (i + 1)..3 {
                assert_ne!(params.moduli[i], params.moduli[j]);
            }
        }
    }

    #[test]
    fn test_rejects_non_power_of_two_degree() {
        let err = CkksParams::new(100, vec![97], 16.0, DEFAULT_SIGMA).unwrap_err();
        assert!(matches!(err, CkksError::InvalidParameters { .. }));
    }

    #[test]
    fn test_rejects_empty_chain() {
        let err = CkksParams::new(8, vec![], 16.0, DEFAULT_SIGMA).unwrap_err();
        assert!(matches!(err, CkksError::InvalidParameters { .. }));
    }

    #[test]
    fn test_rejects_ntt_unfriendly_modulus() {
        // 11 is prime but 11 mod 16 != 1
        let err = CkksParams::new(8, vec![11], 16.0, DEFAULT_SIGMA).unwrap_err();
        assert!(matches!(err, CkksError::InvalidParameters { .. }));
    }

    #[test]
    fn test_rejects_bad_scale_and_sigma() {
        let q = find_ntt_friendly_prime(20, 16, &[]).unwrap();
        assert!(CkksParams::new(8, vec![q], 0.0, DEFAULT_SIGMA).is_err());
        assert!(CkksParams::new(8, vec![q], f64::INFINITY, DEFAULT_SIGMA).is_err());
        assert!(CkksParams::new(8, vec![q], 16.0, -1.0).is_err());
    }
}
