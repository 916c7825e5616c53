#![deny(missing_docs)]

//! Barrier-synchronized sampling orchestration for the FDSM engine.
//!
//! A fixed pool of worker threads drives the two-phase protocol: one
//! baseline pass over the original graph, then `samples` repetitions of
//! [chain step, statistics pass]. The chain step runs inside an exclusive
//! window while every other worker is parked at the barrier; statistics
//! passes read the graph concurrently and write disjoint per-actor slots
//! handed out by the work distributor.

/// Run configuration schema and step-count resolution.
pub mod config;
/// Actor-ID hand-out and the arm/fire chain-step gate.
pub mod distributor;
/// Sampling orchestrator entry point.
pub mod orchestrator;
/// Progress sink contract for phase-boundary reporting.
pub mod progress;
/// Abortable reusable barrier.
pub mod sync;

pub use config::{auto_steps, RunConfig};
pub use distributor::WorkDistributor;
pub use orchestrator::{run, RunSummary};
pub use progress::{NullProgress, ProgressSink};
pub use sync::PhaseBarrier;
