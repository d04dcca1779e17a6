//! Mathematical primitives for the CKKS engine.
//!
//! This module provides the arithmetic the scheme is built on:
//!
//! - **Modular arithmetic** over Z_q
//! - **Negacyclic NTT** for fast polynomial multiplication over
//!   R_q = Z_q[X]/(X^N + 1)
//! - **Sampling** of uniform, ternary, and discrete-Gaussian values from a
//!   caller-supplied CSPRNG
//!
//! Everything above this layer (ring elements, keys, ciphertexts) is
//! expressed in terms of these primitives.

pub mod modular;
pub mod ntt;
pub mod sampling;

pub use modular::ModQ;
pub use ntt::NttContext;
pub use sampling::{sample_gaussian_signed, sample_ternary, sample_uniform, GAUSS_TAILCUT};
