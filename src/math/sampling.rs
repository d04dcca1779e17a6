//! Randomness sampling for key generation and encryption.
//!
//! Three distributions are used by the scheme:
//!
//! - uniform over Z_q (the public random polynomial `a`)
//! - uniform ternary {-1, 0, 1} (secret keys and ephemeral masks)
//! - discrete Gaussian over Z with deviation σ (error terms)
//!
//! Every sampler takes the RNG as an explicit argument bounded by
//! `Rng + CryptoRng`, so production callers inject OS-seeded generators and
//! tests inject seeded `ChaCha20Rng` instances without touching any global
//! state. Ternary and Gaussian values are sampled signed exactly once and
//! reduced into each RNS limb by the caller, keeping limbs consistent.

use rand::{CryptoRng, Rng};

/// Tail cut for the discrete Gaussian: samples beyond `GAUSS_TAILCUT`·σ are
/// rejected, so 6σ bounds the magnitude of every error coefficient.
pub const GAUSS_TAILCUT: f64 = 6.0;

/// Sample `n` coefficients uniformly from [0, q).
pub fn sample_uniform<R: Rng + CryptoRng>(rng: &mut R, n: usize, q: u64) -> Vec<u64> {
    (0..n).map(|_| rng.gen_range(0..q)).collect()
}

/// Sample `n` ternary coefficients, each uniform over {-1, 0, 1}.
pub fn sample_ternary<R: Rng + CryptoRng>(rng: &mut R, n: usize) -> Vec<i8> {
    (0..n).map(|_| rng.gen_range(-1i8..=1)).collect()
}

/// Sample `n` coefficients from the discrete Gaussian D_σ over Z, as signed
/// integers in centered representation.
///
/// Uses rejection sampling: draw uniformly from [-6σ, 6σ] and accept with
/// probability exp(-x²/(2σ²)).
pub fn sample_gaussian_signed<R: Rng + CryptoRng>(rng: &mut R, n: usize, sigma: f64) -> Vec<i64> {
    (0..n).map(|_| sample_gaussian_one(rng, sigma)).collect()
}

fn sample_gaussian_one<R: Rng + CryptoRng>(rng: &mut R, sigma: f64) -> i64 {
    let sigma_sq_2 = 2.0 * sigma * sigma;
    let bound = (sigma * GAUSS_TAILCUT).ceil() as i64;

    loop {
        let x = rng.gen_range(-bound..=bound);
        let x_sq = (x * x) as f64;
        let prob = (-x_sq / sigma_sq_2).exp();

        let u: f64 = rng.gen();
        if u < prob {
            return x;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn test_uniform_range() {
        let mut rng = ChaCha20Rng::seed_from_u64(42);
        let q = 1099511480321u64;
        for &s in sample_uniform(&mut rng, 1000, q).iter() {
            assert!(s < q, "uniform sample {s} >= q");
        }
    }

    #[test]
    fn test_ternary_distribution() {
        let mut rng = ChaCha20Rng::seed_from_u64(42);
        let n = 10000;
        let samples = sample_ternary(&mut rng, n);

        let neg = samples.iter().filter(|&&x| x == -1).count();
        let zero = samples.iter().filter(|&&x| x == 0).count();
        let pos = samples.iter().filter(|&&x| x == 1).count();
        assert_eq!(neg + zero + pos, n, "out-of-range ternary value");

        // Each bucket should be roughly n/3 (5% tolerance).
        let expected = n / 3;
        let tolerance = n / 20;
        for (name, count) in [("-1", neg), ("0", zero), ("1", pos)] {
            assert!(
                (count as isize - expected as isize).unsigned_abs() < tolerance,
                "{name}: count={count}, expected≈{expected}"
            );
        }
    }

    #[test]
    fn test_gaussian_moments() {
        let mut rng = ChaCha20Rng::seed_from_u64(42);
        let sigma = 3.2;
        let n = 20000;
        let samples = sample_gaussian_signed(&mut rng, n, sigma);

        let bound = (sigma * GAUSS_TAILCUT).ceil() as i64;
        assert!(samples.iter().all(|&x| x.abs() <= bound));

        let mean: f64 = samples.iter().map(|&x| x as f64).sum::<f64>() / n as f64;
        let variance: f64 = samples
            .iter()
            .map(|&x| (x as f64 - mean).powi(2))
            .sum::<f64>()
            / n as f64;
        let measured = variance.sqrt();

        assert!(mean.abs() < 0.1, "mean too far from 0: {mean}");
        assert!(
            (measured - sigma).abs() < 0.3,
            "sigma off: measured={measured:.3}, expected={sigma}"
        );
    }

    #[test]
    fn test_deterministic_with_seed() {
        let mut rng1 = ChaCha20Rng::seed_from_u64(7);
        let mut rng2 = ChaCha20Rng::seed_from_u64(7);
        assert_eq!(
            sample_gaussian_signed(&mut rng1, 64, 3.2),
            sample_gaussian_signed(&mut rng2, 64, 3.2)
        );
    }
}
