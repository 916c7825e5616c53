#![deny(missing_docs)]

//! Compact bipartite graph model for the FDSM sampler.
//!
//! Actors are dense indices on the projected side of the network, events are
//! dense indices on the other side. Adjacency is stored as ascending-sorted
//! arrays per actor so that co-occurrence is a merge scan and the
//! degree-preserving double edge swap is a binary search plus a minimal
//! contiguous shift.

mod adjacency;
mod bipartite;
mod cooc;
mod swap;

pub use adjacency::AdjacencyTable;
pub use bipartite::{BipartiteGraph, DuplexGraph, EdgeSign, GraphShape, SimplexGraph};
pub use cooc::cooccurrence;
