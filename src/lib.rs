//! Leveled CKKS homomorphic encryption for privacy-preserving aggregation.
//!
//! This crate implements the slice of the CKKS scheme needed to sum
//! encrypted real/complex vectors contributed by independent parties:
//!
//! - Encode/Decode (canonical embedding over N/2 complex slots)
//! - Keygen (ternary secret, RLWE public key)
//! - Encrypt/Decrypt (public-key RLWE with fresh randomness per call)
//! - Homomorphic ct + ct with level/scale checking and noise tracking
//! - Leveled RNS modulus chain with explicit level reduction
//!
//! NOT implemented (by design — the aggregation workload needs none of it):
//! - ct × ct multiply, relinearization, rescaling
//! - Bootstrapping
//! - Rotations (Galois automorphisms)
//!
//! # Protocol shape
//!
//! One party generates a key pair and distributes the public key. Every
//! contributor encodes and encrypts under that shared public key. An
//! untrusted aggregator folds the ciphertexts with [`Evaluator::sum`] —
//! no secret material, any order. The key holder decrypts and decodes the
//! aggregate.
//!
//! ```no_run
//! use std::sync::Arc;
//! use ckks_engine::{
//!     CkksEncoder, CkksParams, Decryptor, Encryptor, Evaluator, KeyGenerator, RingContext,
//! };
//!
//! let ring = Arc::new(RingContext::new(CkksParams::n8192())?);
//! let encoder = CkksEncoder::new(ring.clone());
//! let mut rng = rand::thread_rng();
//!
//! let (sk, pk) = KeyGenerator::new(ring.clone()).generate_key_pair(&mut rng)?;
//! let encryptor = Encryptor::new(ring.clone(), pk)?;
//!
//! let scale = ring.params().scale;
//! let ct1 = encryptor.encrypt(&encoder.encode_real(&[1.0], scale, 0)?, &mut rng)?;
//! let ct2 = encryptor.encrypt(&encoder.encode_real(&[2.0], scale, 0)?, &mut rng)?;
//!
//! let sum = Evaluator::new(ring.clone()).add(&ct1, &ct2)?;
//! let decoded = encoder.decode_real(&Decryptor::new(ring, sk)?.decrypt(&sum)?);
//! assert!((decoded[0] - 3.0).abs() < 1e-6);
//! # Ok::<(), ckks_engine::CkksError>(())
//! ```
//!
//! # Concurrency
//!
//! Every long-lived object (`RingContext`, `CkksEncoder`, keys, the
//! operator structs) is immutable after construction, so the engine is
//! thread-safe by construction: N parties encrypt on separate threads over
//! one shared `Arc<RingContext>` without coordination. Randomness is
//! injected per call, never drawn from crate-global state.

pub mod encoding;
pub mod error;
pub mod eval;
pub mod math;
pub mod params;
pub mod ring;
pub mod rlwe;
pub mod serialize;

pub use encoding::{CkksEncoder, Plaintext};
pub use error::{CkksError, Result};
pub use eval::Evaluator;
pub use params::CkksParams;
pub use ring::{Representation, RingContext, RingElement};
pub use rlwe::{Ciphertext, Decryptor, Encryptor, EvaluationKey, KeyGenerator, PublicKey, SecretKey};
