//! The cyclotomic ring layer.
//!
//! Everything the scheme encrypts lives in R_Q = Z_Q[X]/(X^N + 1) where Q
//! is the product of the active chain primes. [`RingElement`] carries the
//! RNS limbs plus level and representation tags; [`RingContext`] performs
//! the leveled, checked arithmetic over them.

mod context;
mod element;

pub use context::RingContext;
pub use element::{Representation, RingElement};
