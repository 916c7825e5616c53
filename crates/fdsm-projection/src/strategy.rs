use fdsm_core::errors::FdsmError;
use fdsm_graph::BipartiteGraph;

/// Three-phase statistics-accumulation contract plugged into the sampler.
///
/// `init_baseline` and `update_sample` are called concurrently from worker
/// threads through `&self`; implementations own per-actor interior-mutable
/// slots, and the work distributor guarantees that no two workers hold the
/// same actor ID at once.
pub trait ProjectionStrategy: Send + Sync {
    /// Allocates per-actor result storage. Called once, single-threaded,
    /// before any workers start.
    fn init_once(&mut self, graph: &BipartiteGraph) -> Result<(), FdsmError>;

    /// Computes and retains the baseline co-occurrences of one actor against
    /// the original, unsampled graph.
    fn init_baseline(&self, graph: &BipartiteGraph, actor: usize) -> Result<(), FdsmError>;

    /// Folds the current sampled graph state into the running accumulators
    /// of one actor's tracked pairs.
    fn update_sample(&self, graph: &BipartiteGraph, actor: usize) -> Result<(), FdsmError>;
}
