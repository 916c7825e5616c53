#![deny(missing_docs)]

//! Shared types for the FDSM engine: the canonical error surface and the
//! deterministic RNG handle used by the Markov chain.

pub mod errors;
pub mod rng;

pub use errors::{ErrorInfo, FdsmError};
pub use rng::{derive_substream_seed, RngHandle};
