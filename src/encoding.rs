//! CKKS encode/decode via the canonical embedding.
//!
//! Encode: z ∈ C^{N/2} → m(X) = round(Δ · σ^{-1}(z)) at the target level.
//! Decode: m(X) → z = σ(m) / Δ ∈ C^{N/2}.
//!
//! The canonical embedding σ evaluates m(X) at the odd powers of the
//! primitive 2N-th root of unity ζ = e^{iπ/N}: slot k holds m(ζ^{2k+1}),
//! and the conjugate evaluation m(ζ^{-(2k+1)}) lands at slot N-1-k. Filling
//! the upper half with conjugates therefore guarantees real polynomial
//! coefficients for arbitrary complex slot values.
//!
//! # Precision
//!
//! Rounding at encode time is the sole source of error distinct from
//! encryption noise: each coefficient is perturbed by at most 1/2, so each
//! decoded slot is off by at most N/(2Δ). Slots carry roughly
//! log2(Δ) − log2(N) reliable fractional bits, provided Δ·‖z‖∞ stays below
//! q_0/2 (the decoder lifts centered coefficients from the first limb, so
//! the integer message must fit in (-q_0/2, q_0/2]).

use std::f64::consts::PI;
use std::sync::Arc;

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::error::{CkksError, Result};
use crate::ring::{RingContext, RingElement};

/// A scaled ring element produced by [`CkksEncoder::encode`] and consumed
/// by the encryptor, or recovered by the decryptor and consumed by
/// [`CkksEncoder::decode`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plaintext {
    /// The scaled, rounded message polynomial (coefficient representation).
    pub elem: RingElement,
    /// The fixed-point factor applied during encoding.
    pub scale: f64,
}

impl Plaintext {
    /// Level tag of the underlying ring element.
    pub fn level(&self) -> usize {
        self.elem.level()
    }
}

/// Precomputed tables for the O(N log N) embedding transforms.
///
/// Trig calls happen once here; the hot path is multiply-adds only.
#[derive(Debug, Clone)]
struct FftTables {
    n: usize,
    /// Twist factors ζ^j = e^{iπj/N}.
    twist: Vec<Complex64>,
    /// Bit-reversal permutation for size N.
    bit_rev: Vec<usize>,
    /// Per-stage twiddle factors e^{-2πik/2^{s+1}}.
    twiddle: Vec<Vec<Complex64>>,
}

impl FftTables {
    fn new(n: usize) -> Self {
        let log_n = n.trailing_zeros() as usize;

        let twist = (0..n)
            .map(|j| {
                let angle = PI * j as f64 / n as f64;
                Complex64::new(angle.cos(), angle.sin())
            })
            .collect();

        let mut bit_rev = vec![0usize; n];
        for (i, slot) in bit_rev.iter_mut().enumerate() {
            let mut rev = 0usize;
            let mut val = i;
            for _ in 0..log_n {
                rev = (rev << 1) | (val & 1);
                val >>= 1;
            }
            *slot = rev;
        }

        let mut twiddle = Vec::with_capacity(log_n);
        for s in 0..log_n {
            let half_len = 1 << s;
            let stage: Vec<Complex64> = (0..half_len)
                .map(|k| {
                    let angle = -2.0 * PI * k as f64 / (2 * half_len) as f64;
                    Complex64::new(angle.cos(), angle.sin())
                })
                .collect();
            twiddle.push(stage);
        }

        Self {
            n,
            twist,
            bit_rev,
            twiddle,
        }
    }

    /// In-place radix-2 DIT FFT with negative-exponent convention:
    /// out[j] = Σ_k in[k]·e^{-2πijk/N}.
    fn fft(&self, buf: &mut [Complex64]) {
        debug_assert_eq!(buf.len(), self.n);

        for i in 0..self.n {
            let j = self.bit_rev[i];
            if i < j {
                buf.swap(i, j);
            }
        }

        for stage in &self.twiddle {
            let half_len = stage.len();
            let full_len = half_len << 1;
            for group_start in (0..self.n).step_by(full_len) {
                for (k, &w) in stage.iter().enumerate() {
                    let i0 = group_start + k;
                    let i1 = i0 + half_len;
                    let v = w * buf[i1];
                    let u = buf[i0];
                    buf[i0] = u + v;
                    buf[i1] = u - v;
                }
            }
        }
    }
}

/// Bidirectional mapping between complex slot vectors and ring elements.
///
/// Immutable after construction; share behind the same `Arc` as the ring.
#[derive(Debug, Clone)]
pub struct CkksEncoder {
    ring: Arc<RingContext>,
    fft: FftTables,
}

impl CkksEncoder {
    pub fn new(ring: Arc<RingContext>) -> Self {
        let fft = FftTables::new(ring.degree());
        Self { ring, fft }
    }

    /// Number of complex slots = N/2.
    pub fn slots(&self) -> usize {
        self.ring.slots()
    }

    /// Encode complex values into a plaintext at `level`.
    ///
    /// Inputs shorter than the slot count are padded with zero slots;
    /// longer inputs fail with `TooManySlots`. The scale must be a positive
    /// finite value.
    pub fn encode(&self, values: &[Complex64], scale: f64, level: usize) -> Result<Plaintext> {
        let slots = self.slots();
        if values.len() > slots {
            return Err(CkksError::TooManySlots {
                got: values.len(),
                slots,
            });
        }
        if !(scale > 0.0 && scale.is_finite()) {
            return Err(CkksError::InvalidParameters {
                reason: format!("encoding scale {scale} is not a positive finite value"),
            });
        }
        self.ring.check_level(level)?;

        let n = self.ring.degree();

        // Conjugate-symmetric extension: slot k at index k, its conjugate at
        // index N-1-k.
        let mut buf = vec![Complex64::new(0.0, 0.0); n];
        for (k, &z) in values.iter().enumerate() {
            buf[k] = z;
            buf[n - 1 - k] = z.conj();
        }
        // Untouched upper-half positions pair zero slots with zero
        // conjugates, so symmetry holds for short inputs too.

        // Inverse embedding: a[j] = (1/N)·Σ_k buf[k]·e^{-2πijk/N}, then
        // untwist; symmetry makes m[j] = Re(a[j]·ζ^{-j}) exact.
        self.fft.fft(&mut buf);
        let inv_n = 1.0 / n as f64;
        let coeffs: Vec<i64> = buf
            .iter()
            .zip(self.fft.twist.iter())
            .map(|(&a, &tw)| {
                let m = (a * tw.conj()).re * inv_n;
                (m * scale).round() as i64
            })
            .collect();

        let elem = self.ring.element_from_signed(&coeffs, level)?;
        Ok(Plaintext { elem, scale })
    }

    /// Encode real values (imaginary parts zero).
    pub fn encode_real(&self, values: &[f64], scale: f64, level: usize) -> Result<Plaintext> {
        let complex: Vec<Complex64> = values.iter().map(|&v| Complex64::new(v, 0.0)).collect();
        self.encode(&complex, scale, level)
    }

    /// Decode a plaintext back to its complex slot vector.
    ///
    /// Always returns `slots()` values; callers truncate to the logical
    /// length they expect.
    pub fn decode(&self, pt: &Plaintext) -> Vec<Complex64> {
        let n = self.ring.degree();
        let q0 = self.ring.params().moduli[0];

        // Centered lift from the first limb, then unscale.
        let signed = pt.elem.to_signed_limb0(q0);
        let inv_scale = 1.0 / pt.scale;

        // Forward embedding: z[k] = Σ_j m[j]·ζ^{(2k+1)j}
        //                        = conj(FFT(m[j]·conj(ζ^j)))[k].
        let mut buf: Vec<Complex64> = signed
            .iter()
            .zip(self.fft.twist.iter())
            .map(|(&m, &tw)| tw.conj() * (m as f64 * inv_scale))
            .collect();
        self.fft.fft(&mut buf);

        buf.truncate(self.slots());
        buf.iter().map(|z| z.conj()).collect()
    }

    /// Decode to real parts only.
    pub fn decode_real(&self, pt: &Plaintext) -> Vec<f64> {
        self.decode(pt).into_iter().map(|z| z.re).collect()
    }
}
