#![deny(missing_docs)]

//! Projection strategies: pluggable statistics accumulators that turn a
//! sequence of degree-preserving graph samples into co-occurrence
//! significance estimates.
//!
//! A strategy runs in three phases. `init_once` allocates per-actor slots.
//! `init_baseline` measures co-occurrence on the unsampled graph and keeps
//! only partners with a nonzero baseline (zero baseline means zero possible
//! deviation under the test, so the pair is uninformative). `update_sample`
//! folds the current sampled graph into the running accumulators of the
//! tracked pairs. Which accumulators are maintained depends on the weight
//! variant, monomorphized so the inner loop carries no dynamic dispatch.

mod hypergeom;
mod store;
mod strategy;
mod variants;

pub use hypergeom::hypergeometric_similarity;
pub use store::{ActorSlot, ChannelKind, PairAccumulator, ProjectionResults};
pub use strategy::ProjectionStrategy;
pub use variants::{
    AllStats, AllStatsProjection, CoocProjection, Leverage, LeverageProjection, PValue,
    PValueProjection, Pnas, PnasProjection, WeightVariant,
};
