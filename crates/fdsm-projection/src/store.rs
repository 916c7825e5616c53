use serde::{Deserialize, Serialize};

/// Identifies which adjacency pair a channel of tracked pairs was computed
/// from. Simplex projections carry a single [`ChannelKind::Plain`] channel;
/// duplex projections carry all three signed channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChannelKind {
    /// Unsigned co-occurrence of a simplex graph.
    Plain,
    /// Two positive edges.
    PositivePositive,
    /// Two negative edges.
    NegativeNegative,
    /// This actor's negative adjacency against the partner's positive
    /// adjacency (directed, so partners cover all other actors).
    NegativePositive,
}

/// Running statistics for one tracked actor pair.
///
/// Which accumulators are meaningful depends on the weight variant; unused
/// ones stay zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairAccumulator {
    /// Partner actor ID.
    pub partner: u32,
    /// Co-occurrence measured on the original graph.
    pub baseline: u32,
    /// Number of samples whose observed co-occurrence was >= baseline.
    pub ge_count: u64,
    /// Sum of observed co-occurrences across samples.
    pub cooc_sum: u64,
    /// Sum of squared observed co-occurrences across samples.
    pub cooc_sum_squares: u64,
}

impl PairAccumulator {
    /// Creates a fresh accumulator for a pair with the given baseline.
    pub fn new(partner: u32, baseline: u32) -> Self {
        Self {
            partner,
            baseline,
            ge_count: 0,
            cooc_sum: 0,
            cooc_sum_squares: 0,
        }
    }
}

/// Tracked pairs of a single actor, one vector per channel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorSlot {
    /// Channel payloads, parallel to the owning projection's channel kinds.
    pub channels: Vec<Vec<PairAccumulator>>,
}

/// Finalized projection output, stable once the sampling run has completed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectionResults {
    /// Name of the weight variant that produced these results.
    pub weight: String,
    /// Channel kinds, in the order they appear within each actor slot.
    pub channel_kinds: Vec<ChannelKind>,
    /// One slot per actor, indexed by actor ID.
    pub actors: Vec<ActorSlot>,
}

impl ProjectionResults {
    /// Tracked pairs of `actor` within the channel at `channel_index`.
    pub fn tracked(&self, channel_index: usize, actor: usize) -> &[PairAccumulator] {
        &self.actors[actor].channels[channel_index]
    }
}
