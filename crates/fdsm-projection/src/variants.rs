use std::marker::PhantomData;
use std::sync::Mutex;

use fdsm_core::errors::{ErrorInfo, FdsmError};
use fdsm_graph::{cooccurrence, BipartiteGraph, EdgeSign, GraphShape};

use crate::store::{ActorSlot, ChannelKind, PairAccumulator, ProjectionResults};
use crate::strategy::ProjectionStrategy;

/// Compile-time description of which accumulators a weight variant needs.
pub trait WeightVariant: Send + Sync + 'static {
    /// Maintain the meets-or-exceeds-baseline counter.
    const TRACK_GE: bool;
    /// Maintain the co-occurrence sum and sum of squares.
    const TRACK_MOMENTS: bool;
    /// Name used in configuration and output headers.
    const NAME: &'static str;
}

/// Raw-all-statistics variant: every accumulator is maintained.
#[derive(Debug)]
pub enum AllStats {}

impl WeightVariant for AllStats {
    const TRACK_GE: bool = true;
    const TRACK_MOMENTS: bool = true;
    const NAME: &'static str = "all";
}

/// Empirical p-value variant: only the meets-or-exceeds counter.
#[derive(Debug)]
pub enum PValue {}

impl WeightVariant for PValue {
    const TRACK_GE: bool = true;
    const TRACK_MOMENTS: bool = false;
    const NAME: &'static str = "pvalue";
}

/// Leverage variant: sampled mean and variance, no counter.
#[derive(Debug)]
pub enum Leverage {}

impl WeightVariant for Leverage {
    const TRACK_GE: bool = false;
    const TRACK_MOMENTS: bool = true;
    const NAME: &'static str = "lev";
}

/// PNAS variant: meets-or-exceeds counter during sampling; the
/// hypergeometric similarity is derived at write-out from the baseline and
/// the degree sequence. Simplex graphs only.
#[derive(Debug)]
pub enum Pnas {}

impl WeightVariant for Pnas {
    const TRACK_GE: bool = true;
    const TRACK_MOMENTS: bool = false;
    const NAME: &'static str = "PNAS";
}

/// Co-occurrence projection monomorphized over a weight variant.
///
/// Per-actor slots sit behind individual mutexes. The locks are uncontended
/// by construction (the work distributor hands each actor ID to exactly one
/// worker per pass); they exist to make the disjoint-write pattern of the
/// sampling protocol safe.
pub struct CoocProjection<V: WeightVariant> {
    slots: Vec<Mutex<ActorSlot>>,
    channel_kinds: Vec<ChannelKind>,
    _variant: PhantomData<V>,
}

/// All-statistics projection.
pub type AllStatsProjection = CoocProjection<AllStats>;
/// P-value-only projection.
pub type PValueProjection = CoocProjection<PValue>;
/// Leverage projection.
pub type LeverageProjection = CoocProjection<Leverage>;
/// PNAS-method projection.
pub type PnasProjection = CoocProjection<Pnas>;

impl<V: WeightVariant> Default for CoocProjection<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: WeightVariant> CoocProjection<V> {
    /// Creates an empty projection; storage is allocated by `init_once`.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            channel_kinds: Vec::new(),
            _variant: PhantomData,
        }
    }

    /// Name of the weight variant.
    pub fn weight_name(&self) -> &'static str {
        V::NAME
    }

    /// Consumes the projection and returns the finalized, read-only results.
    pub fn into_results(self) -> Result<ProjectionResults, FdsmError> {
        let mut actors = Vec::with_capacity(self.slots.len());
        for (actor, slot) in self.slots.into_iter().enumerate() {
            let slot = slot.into_inner().map_err(|_| poisoned_slot(actor))?;
            actors.push(slot);
        }
        Ok(ProjectionResults {
            weight: V::NAME.to_string(),
            channel_kinds: self.channel_kinds,
            actors,
        })
    }

    fn slot(&self, actor: usize) -> Result<std::sync::MutexGuard<'_, ActorSlot>, FdsmError> {
        self.slots
            .get(actor)
            .ok_or_else(|| {
                FdsmError::Projection(
                    ErrorInfo::new("unknown-actor", "actor ID outside allocated result storage")
                        .with_context("actor", actor.to_string()),
                )
            })?
            .lock()
            .map_err(|_| poisoned_slot(actor))
    }

    fn fold(&self, entry: &mut PairAccumulator, observed: u32) {
        if V::TRACK_GE && observed >= entry.baseline {
            entry.ge_count += 1;
        }
        if V::TRACK_MOMENTS {
            entry.cooc_sum += u64::from(observed);
            entry.cooc_sum_squares += u64::from(observed) * u64::from(observed);
        }
    }
}

fn poisoned_slot(actor: usize) -> FdsmError {
    FdsmError::Projection(
        ErrorInfo::new("poisoned-slot", "another worker panicked while holding this result slot")
            .with_context("actor", actor.to_string()),
    )
}

impl<V: WeightVariant> ProjectionStrategy for CoocProjection<V> {
    fn init_once(&mut self, graph: &BipartiteGraph) -> Result<(), FdsmError> {
        self.channel_kinds = match graph.shape() {
            GraphShape::Simplex(_) => vec![ChannelKind::Plain],
            GraphShape::Duplex(_) => vec![
                ChannelKind::PositivePositive,
                ChannelKind::NegativeNegative,
                ChannelKind::NegativePositive,
            ],
        };
        self.slots = (0..graph.actor_count())
            .map(|_| Mutex::new(ActorSlot::default()))
            .collect();
        Ok(())
    }

    fn init_baseline(&self, graph: &BipartiteGraph, actor: usize) -> Result<(), FdsmError> {
        let actor_count = graph.actor_count();
        let mut channels = Vec::with_capacity(self.channel_kinds.len());
        match graph.shape() {
            GraphShape::Simplex(simplex) => {
                let own = simplex.adjacency(actor);
                let mut tracked = Vec::new();
                for partner in actor + 1..actor_count {
                    let observed = cooccurrence(own, simplex.adjacency(partner));
                    if observed > 0 {
                        tracked.push(PairAccumulator::new(partner as u32, observed));
                    }
                }
                channels.push(tracked);
            }
            GraphShape::Duplex(duplex) => {
                for kind in &self.channel_kinds {
                    let mut tracked = Vec::new();
                    match kind {
                        ChannelKind::PositivePositive => {
                            let own = duplex.adjacency(EdgeSign::Positive, actor);
                            for partner in actor + 1..actor_count {
                                let observed = cooccurrence(
                                    own,
                                    duplex.adjacency(EdgeSign::Positive, partner),
                                );
                                if observed > 0 {
                                    tracked.push(PairAccumulator::new(partner as u32, observed));
                                }
                            }
                        }
                        ChannelKind::NegativeNegative => {
                            let own = duplex.adjacency(EdgeSign::Negative, actor);
                            for partner in actor + 1..actor_count {
                                let observed = cooccurrence(
                                    own,
                                    duplex.adjacency(EdgeSign::Negative, partner),
                                );
                                if observed > 0 {
                                    tracked.push(PairAccumulator::new(partner as u32, observed));
                                }
                            }
                        }
                        ChannelKind::NegativePositive => {
                            let own = duplex.adjacency(EdgeSign::Negative, actor);
                            for partner in (0..actor_count).filter(|partner| *partner != actor) {
                                let observed = cooccurrence(
                                    own,
                                    duplex.adjacency(EdgeSign::Positive, partner),
                                );
                                if observed > 0 {
                                    tracked.push(PairAccumulator::new(partner as u32, observed));
                                }
                            }
                        }
                        ChannelKind::Plain => unreachable!("plain channel on a duplex graph"),
                    }
                    channels.push(tracked);
                }
            }
        }
        self.slot(actor)?.channels = channels;
        Ok(())
    }

    fn update_sample(&self, graph: &BipartiteGraph, actor: usize) -> Result<(), FdsmError> {
        let mut slot = self.slot(actor)?;
        match graph.shape() {
            GraphShape::Simplex(simplex) => {
                let own = simplex.adjacency(actor);
                for entry in &mut slot.channels[0] {
                    let observed = cooccurrence(own, simplex.adjacency(entry.partner as usize));
                    self.fold(entry, observed);
                }
            }
            GraphShape::Duplex(duplex) => {
                for (kind, tracked) in self.channel_kinds.iter().zip(slot.channels.iter_mut()) {
                    let (own_sign, partner_sign) = match kind {
                        ChannelKind::PositivePositive => (EdgeSign::Positive, EdgeSign::Positive),
                        ChannelKind::NegativeNegative => (EdgeSign::Negative, EdgeSign::Negative),
                        ChannelKind::NegativePositive => (EdgeSign::Negative, EdgeSign::Positive),
                        ChannelKind::Plain => unreachable!("plain channel on a duplex graph"),
                    };
                    let own = duplex.adjacency(own_sign, actor);
                    for entry in tracked.iter_mut() {
                        let observed =
                            cooccurrence(own, duplex.adjacency(partner_sign, entry.partner as usize));
                        self.fold(entry, observed);
                    }
                }
            }
        }
        Ok(())
    }
}
