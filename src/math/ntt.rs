//! Negacyclic Number-Theoretic Transform.
//!
//! Cooley-Tukey forward / Gentleman-Sande inverse NTT over
//! R_q = Z_q[X]/(X^N + 1), with Montgomery reduction for the inner
//! butterflies. The NTT enables O(N log N) negacyclic polynomial
//! multiplication instead of O(N²) schoolbook convolution.
//!
//! # Requirements
//!
//! The modulus must satisfy q ≡ 1 (mod 2N) so a primitive 2N-th root of
//! unity ψ (with ψ^N = -1) exists. Parameter validation enforces this for
//! every modulus in the chain; the ring context owns one `NttContext` per
//! chain prime.
//!
//! # Montgomery form
//!
//! `forward` converts coefficients into Montgomery form and leaves the
//! evaluation-domain values in Montgomery form; `inverse` converts back.
//! Addition and subtraction are linear and may be applied directly to
//! evaluation-domain values; products must go through `pointwise_mul`.

use super::modular::ModQ;

/// Precomputed NTT context for one modulus.
///
/// Stores twiddle factors (powers of ψ in the order the butterflies consume
/// them) and Montgomery constants. Create once per (dimension, modulus) pair
/// and reuse for all transforms.
#[derive(Debug, Clone)]
pub struct NttContext {
    /// Ring dimension (power of two).
    n: usize,
    /// Modulus q ≡ 1 (mod 2n).
    q: u64,
    /// -q^(-1) mod 2^64 for Montgomery reduction.
    q_inv_neg: u64,
    /// (2^64)^2 mod q, for conversion into Montgomery form.
    r_squared: u64,
    /// Forward twiddle factors (powers of ψ, Montgomery form).
    psi_powers: Vec<u64>,
    /// Inverse twiddle factors (powers of ψ^(-1), Montgomery form).
    psi_inv_powers: Vec<u64>,
    /// n^(-1) mod q in Montgomery form for inverse scaling.
    n_inv: u64,
}

impl NttContext {
    /// Create an NTT context for the given dimension and modulus.
    ///
    /// # Panics
    ///
    /// Panics if `n` is not a power of two or `q` is not ≡ 1 (mod 2n).
    /// Parameter validation rejects such configurations before any context
    /// is built.
    pub fn new(n: usize, q: u64) -> Self {
        assert!(n.is_power_of_two(), "n must be a power of two");
        assert!(q % (2 * n as u64) == 1, "q must be ≡ 1 (mod 2n)");

        let q_inv_neg = compute_q_inv_neg(q);
        let r_squared = compute_r_squared(q);

        // Primitive 2n-th root of unity ψ with ψ^n = -1.
        let psi = find_primitive_root(2 * n as u64, q);
        let psi_mont = to_montgomery(psi, q, r_squared, q_inv_neg);
        let psi_powers = compute_twiddle_factors(n, psi_mont, q, q_inv_neg, r_squared);

        let psi_inv = ModQ::inv(psi, q);
        let psi_inv_mont = to_montgomery(psi_inv, q, r_squared, q_inv_neg);
        let psi_inv_powers = compute_twiddle_factors(n, psi_inv_mont, q, q_inv_neg, r_squared);

        let n_inv_val = ModQ::inv(n as u64, q);
        let n_inv = to_montgomery(n_inv_val, q, r_squared, q_inv_neg);

        Self {
            n,
            q,
            q_inv_neg,
            r_squared,
            psi_powers,
            psi_inv_powers,
            n_inv,
        }
    }

    /// Ring dimension.
    pub fn dimension(&self) -> usize {
        self.n
    }

    /// Modulus q.
    pub fn modulus(&self) -> u64 {
        self.q
    }

    /// Forward NTT in-place (Cooley-Tukey decimation-in-time).
    ///
    /// Input: coefficients in standard form. Output: evaluation-domain
    /// values in Montgomery form.
    ///
    /// # Panics
    ///
    /// Panics if `coeffs.len() != n`.
    pub fn forward(&self, coeffs: &mut [u64]) {
        assert_eq!(coeffs.len(), self.n, "input length must match dimension");

        for c in coeffs.iter_mut() {
            *c = to_montgomery(*c, self.q, self.r_squared, self.q_inv_neg);
        }

        let n = self.n;
        let q = self.q;
        let mut t = n;
        let mut m = 1;

        while m < n {
            t >>= 1;
            for i in 0..m {
                let j1 = 2 * i * t;
                let j2 = j1 + t;
                let w = self.psi_powers[m + i];

                for j in j1..j2 {
                    let u = coeffs[j];
                    let v = self.montgomery_mul(coeffs[j + t], w);

                    coeffs[j] = if u + v >= q { u + v - q } else { u + v };
                    coeffs[j + t] = if u >= v { u - v } else { q - v + u };
                }
            }
            m <<= 1;
        }
    }

    /// Inverse NTT in-place (Gentleman-Sande decimation-in-frequency).
    ///
    /// Input: evaluation-domain values in Montgomery form (as produced by
    /// `forward`). Output: coefficients in standard form.
    ///
    /// # Panics
    ///
    /// Panics if `coeffs.len() != n`.
    pub fn inverse(&self, coeffs: &mut [u64]) {
        assert_eq!(coeffs.len(), self.n, "input length must match dimension");

        let n = self.n;
        let q = self.q;
        let mut t = 1;
        let mut m = n;

        while m > 1 {
            m >>= 1;
            for i in 0..m {
                let j2 = i * 2 * t;
                let w = self.psi_inv_powers[m + i];

                for j in j2..(j2 + t) {
                    let u = coeffs[j];
                    let v = coeffs[j + t];

                    coeffs[j] = if u + v >= q { u + v - q } else { u + v };
                    let diff = if u >= v { u - v } else { q - v + u };
                    coeffs[j + t] = self.montgomery_mul(diff, w);
                }
            }
            t <<= 1;
        }

        // Scale by n^(-1) and leave Montgomery form in one pass:
        // montgomery_mul(c, n_inv_mont) scales, montgomery_mul(_, 1) strips.
        for c in coeffs.iter_mut() {
            let scaled = self.montgomery_mul(*c, self.n_inv);
            *c = self.montgomery_mul(scaled, 1);
        }
    }

    /// Pointwise product of two evaluation-domain vectors (Montgomery form).
    ///
    /// # Panics
    ///
    /// Panics if any slice length differs from `n`.
    pub fn pointwise_mul(&self, a: &[u64], b: &[u64], result: &mut [u64]) {
        assert_eq!(a.len(), self.n, "input length must match dimension");
        assert_eq!(b.len(), self.n, "input length must match dimension");
        assert_eq!(result.len(), self.n, "output length must match dimension");

        for i in 0..self.n {
            result[i] = self.montgomery_mul(a[i], b[i]);
        }
    }

    #[inline]
    fn montgomery_mul(&self, a: u64, b: u64) -> u64 {
        let q = self.q;
        let ab = (a as u128) * (b as u128);
        let m = ((ab as u64).wrapping_mul(self.q_inv_neg)) as u128;
        let t = ((ab + m * (q as u128)) >> 64) as u64;
        if t >= q {
            t - q
        } else {
            t
        }
    }
}

/// -q^(-1) mod 2^64 via bitwise Newton lifting (q odd).
fn compute_q_inv_neg(q: u64) -> u64 {
    let mut y: u64 = 1;
    for i in 1..64 {
        let yi = y.wrapping_mul(q) & (1u64 << i);
        y |= yi;
    }
    y.wrapping_neg()
}

/// (2^64)^2 mod q.
fn compute_r_squared(q: u64) -> u64 {
    let r_mod_q = (1u128 << 64) % (q as u128);
    ((r_mod_q * r_mod_q) % (q as u128)) as u64
}

/// Convert a standard-form value into Montgomery form.
fn to_montgomery(a: u64, q: u64, r_squared: u64, q_inv_neg: u64) -> u64 {
    let ab = (a as u128) * (r_squared as u128);
    let m = ((ab as u64).wrapping_mul(q_inv_neg)) as u128;
    let t = ((ab + m * (q as u128)) >> 64) as u64;
    if t >= q {
        t - q
    } else {
        t
    }
}

/// Find a primitive n-th root of unity modulo q (here called with n = 2N).
///
/// For power-of-two n, an element of order exactly n satisfies x^n = 1 and
/// x^(n/2) != 1.
fn find_primitive_root(n: u64, q: u64) -> u64 {
    let exp = (q - 1) / n;
    for g in 2..q {
        let candidate = ModQ::pow(g, exp, q);
        if ModQ::pow(candidate, n, q) == 1 && ModQ::pow(candidate, n / 2, q) != 1 {
            return candidate;
        }
    }
    panic!("no primitive root found (should not happen for valid parameters)");
}

/// Twiddle factors in the order the butterflies consume them.
///
/// `factors[m]` for m a power of two holds ψ^(n/(2m)); composite indices are
/// built by multiplying the factors of their set bits.
fn compute_twiddle_factors(n: usize, psi_mont: u64, q: u64, q_inv_neg: u64, r_squared: u64) -> Vec<u64> {
    let mont_mul = |a: u64, b: u64| -> u64 {
        let ab = (a as u128) * (b as u128);
        let m = ((ab as u64).wrapping_mul(q_inv_neg)) as u128;
        let t = ((ab + m * (q as u128)) >> 64) as u64;
        if t >= q {
            t - q
        } else {
            t
        }
    };

    let mut factors = vec![0u64; n.max(2)];
    factors[1] = to_montgomery(1, q, r_squared, q_inv_neg);

    for m in 1..n {
        if m.is_power_of_two() {
            // New level: ψ^(n/(2m)).
            let exp = n / (2 * m);
            let mut pow = to_montgomery(1, q, r_squared, q_inv_neg);
            for _ in 0..exp {
                pow = mont_mul(pow, psi_mont);
            }
            factors[m] = pow;
        } else {
            let prev_idx = m & (m - 1); // clear lowest set bit
            let step_idx = m & m.wrapping_neg(); // lowest set bit
            factors[m] = mont_mul(factors[prev_idx], factors[step_idx]);
        }
    }

    factors
}
