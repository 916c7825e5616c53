use std::collections::BTreeSet;

use fdsm_core::errors::{ErrorInfo, FdsmError};
use fdsm_core::rng::RngHandle;
use serde::{Deserialize, Serialize};

use crate::adjacency::AdjacencyTable;
use crate::swap;

/// Sign of a duplex edge. Simplex graphs only carry [`EdgeSign::Positive`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EdgeSign {
    /// Positive (or only) edge set.
    Positive,
    /// Negative edge set of a signed graph.
    Negative,
}

/// Unsigned bipartite graph: one adjacency table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimplexGraph {
    pub(crate) table: AdjacencyTable,
}

impl SimplexGraph {
    /// Sorted event list of the given actor.
    pub fn adjacency(&self, actor: usize) -> &[u32] {
        self.table.adjacency(actor)
    }

    /// Degree of the given actor.
    pub fn degree(&self, actor: usize) -> u32 {
        self.table.degree(actor)
    }
}

/// Signed bipartite graph: positive and negative adjacency tables over the
/// same actor set. No actor may connect to one event with both signs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplexGraph {
    pub(crate) pos: AdjacencyTable,
    pub(crate) neg: AdjacencyTable,
}

impl DuplexGraph {
    /// Sorted event list of the given actor for the given sign.
    pub fn adjacency(&self, sign: EdgeSign, actor: usize) -> &[u32] {
        match sign {
            EdgeSign::Positive => self.pos.adjacency(actor),
            EdgeSign::Negative => self.neg.adjacency(actor),
        }
    }

    /// Degree of the given actor for the given sign.
    pub fn degree(&self, sign: EdgeSign, actor: usize) -> u32 {
        match sign {
            EdgeSign::Positive => self.pos.degree(actor),
            EdgeSign::Negative => self.neg.degree(actor),
        }
    }

    /// Number of positive edges.
    pub fn positive_edge_count(&self) -> usize {
        self.pos.edge_count()
    }

    /// Number of negative edges.
    pub fn negative_edge_count(&self) -> usize {
        self.neg.edge_count()
    }
}

/// Shape of the network: unsigned or signed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphShape {
    /// Single edge set.
    Simplex(SimplexGraph),
    /// Positive and negative edge sets.
    Duplex(DuplexGraph),
}

/// Bipartite actor-event graph with degree-preserving resampling.
///
/// Built once from input adjacency, then mutated in place only by [`step`]
/// for the lifetime of a sampling run. [`init_random`] must be called exactly
/// once before the first step.
///
/// [`step`]: BipartiteGraph::step
/// [`init_random`]: BipartiteGraph::init_random
#[derive(Debug, Clone)]
pub struct BipartiteGraph {
    shape: GraphShape,
    event_count: usize,
    rng: Option<RngHandle>,
}

impl BipartiteGraph {
    /// Builds an unsigned graph from per-actor event lists (unsorted input
    /// accepted). Fails on duplicate edges or an edgeless graph.
    pub fn simplex(adjacency: Vec<Vec<u32>>) -> Result<Self, FdsmError> {
        let table = AdjacencyTable::from_lists(adjacency)?;
        if table.edge_count() == 0 {
            return Err(FdsmError::Graph(ErrorInfo::new(
                "no-edges",
                "graph contains no edges to resample",
            )));
        }
        let event_count = table.event_ids().len();
        Ok(Self {
            shape: GraphShape::Simplex(SimplexGraph { table }),
            event_count,
            rng: None,
        })
    }

    /// Builds a signed graph from positive and negative per-actor event
    /// lists. Both lists must cover the same actors; an event held by one
    /// actor with both signs is rejected.
    pub fn duplex(positive: Vec<Vec<u32>>, negative: Vec<Vec<u32>>) -> Result<Self, FdsmError> {
        if positive.len() != negative.len() {
            return Err(FdsmError::Graph(
                ErrorInfo::new(
                    "actor-count-mismatch",
                    "positive and negative adjacency cover different actor sets",
                )
                .with_context("positive", positive.len().to_string())
                .with_context("negative", negative.len().to_string()),
            ));
        }
        let pos = AdjacencyTable::from_lists(positive)?;
        let neg = AdjacencyTable::from_lists(negative)?;
        for actor in 0..pos.actor_count() {
            let pos_list = pos.adjacency(actor);
            for event in neg.adjacency(actor) {
                if pos_list.binary_search(event).is_ok() {
                    return Err(FdsmError::Graph(
                        ErrorInfo::new(
                            "sign-overlap",
                            "actor holds both a positive and a negative edge to one event",
                        )
                        .with_context("actor", actor.to_string())
                        .with_context("event", event.to_string()),
                    ));
                }
            }
        }
        if pos.edge_count() + neg.edge_count() == 0 {
            return Err(FdsmError::Graph(ErrorInfo::new(
                "no-edges",
                "graph contains no edges to resample",
            )));
        }
        let mut events: BTreeSet<u32> = pos.event_ids();
        events.extend(neg.event_ids());
        Ok(Self {
            shape: GraphShape::Duplex(DuplexGraph { pos, neg }),
            event_count: events.len(),
            rng: None,
        })
    }

    /// Shape of the graph (simplex or duplex).
    pub fn shape(&self) -> &GraphShape {
        &self.shape
    }

    /// Number of actors (the projected side).
    pub fn actor_count(&self) -> usize {
        match &self.shape {
            GraphShape::Simplex(graph) => graph.table.actor_count(),
            GraphShape::Duplex(graph) => graph.pos.actor_count(),
        }
    }

    /// Number of distinct events.
    pub fn event_count(&self) -> usize {
        self.event_count
    }

    /// Total number of edges (positive plus negative for duplex graphs).
    pub fn edge_count(&self) -> usize {
        match &self.shape {
            GraphShape::Simplex(graph) => graph.table.edge_count(),
            GraphShape::Duplex(graph) => graph.pos.edge_count() + graph.neg.edge_count(),
        }
    }

    /// Seeds the chain RNG. Must be called exactly once before [`step`].
    ///
    /// [`step`]: BipartiteGraph::step
    pub fn init_random(&mut self, seed: u64) -> Result<(), FdsmError> {
        if self.rng.is_some() {
            return Err(FdsmError::Graph(ErrorInfo::new(
                "rng-reseeded",
                "chain RNG was already seeded for this run",
            )));
        }
        self.rng = Some(RngHandle::from_seed(seed));
        Ok(())
    }

    /// Performs `steps` independent double-edge-swap attempts, mutating the
    /// adjacency in place. Returns the number of accepted swaps; rejected
    /// attempts are silent and still consume their random draws.
    pub fn step(&mut self, steps: usize) -> Result<usize, FdsmError> {
        let rng = self.rng.as_mut().ok_or_else(|| {
            FdsmError::Graph(
                ErrorInfo::new("rng-uninitialized", "step called before init_random")
                    .with_hint("call init_random(seed) once before sampling"),
            )
        })?;
        let accepted = match &mut self.shape {
            GraphShape::Simplex(graph) => swap::step_simplex(&mut graph.table, rng, steps),
            GraphShape::Duplex(graph) => swap::step_duplex(graph, rng, steps),
        };
        Ok(accepted)
    }

    /// Checks the structural invariants (sortedness, degree bookkeeping,
    /// duplex sign exclusivity). Intended for tests and debugging.
    pub fn validate(&self) -> Result<(), FdsmError> {
        match &self.shape {
            GraphShape::Simplex(graph) => graph.table.validate(),
            GraphShape::Duplex(graph) => {
                graph.pos.validate()?;
                graph.neg.validate()?;
                for actor in 0..graph.pos.actor_count() {
                    let pos_list = graph.pos.adjacency(actor);
                    for event in graph.neg.adjacency(actor) {
                        if pos_list.binary_search(event).is_ok() {
                            return Err(FdsmError::Graph(
                                ErrorInfo::new(
                                    "sign-overlap",
                                    "actor holds both a positive and a negative edge to one event",
                                )
                                .with_context("actor", actor.to_string()),
                            ));
                        }
                    }
                }
                Ok(())
            }
        }
    }
}
