use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use fdsm_core::errors::FdsmError;
use fdsm_graph::BipartiteGraph;

/// Hands out actor IDs to worker threads and gates the chain step.
///
/// `next_actor` may be called from any number of threads concurrently; no
/// two callers ever receive the same ID and IDs are issued in increasing
/// order until exhaustion. `advance_or_arm` must only run inside the
/// exclusive barrier window: its first invocation merely arms the gate (the
/// baseline pass measures the unsampled graph), every later one performs one
/// chain step and resets the actor cursor for the next pass.
#[derive(Debug)]
pub struct WorkDistributor {
    cursor: AtomicUsize,
    actor_count: usize,
    steps: usize,
    armed: AtomicBool,
}

impl WorkDistributor {
    /// Creates a distributor over `actor_count` actors stepping the chain
    /// by `steps` swap attempts per round.
    pub fn new(actor_count: usize, steps: usize) -> Self {
        Self {
            cursor: AtomicUsize::new(0),
            actor_count,
            steps,
            armed: AtomicBool::new(false),
        }
    }

    /// Returns the next unclaimed actor ID, or `None` once the current pass
    /// is exhausted. Exhaustion is stable until [`reset`](Self::reset).
    pub fn next_actor(&self) -> Option<usize> {
        let id = self.cursor.fetch_add(1, Ordering::SeqCst);
        (id < self.actor_count).then_some(id)
    }

    /// Rewinds the actor cursor to the start of the ID space. Must not race
    /// with `next_actor`.
    pub fn reset(&self) {
        self.cursor.store(0, Ordering::SeqCst);
    }

    /// Disables the chain step for the next gate invocation.
    pub fn disarm(&self) {
        self.armed.store(false, Ordering::SeqCst);
    }

    /// One-shot arm/fire gate run by the barrier leader between passes.
    /// Returns whether a chain step was performed.
    pub fn advance_or_arm(&self, graph: &mut BipartiteGraph) -> Result<bool, FdsmError> {
        let stepped = if self.armed.swap(true, Ordering::SeqCst) {
            graph.step(self.steps)?;
            true
        } else {
            false
        };
        self.reset();
        Ok(stepped)
    }

    /// Swap attempts performed per chain step.
    pub fn steps(&self) -> usize {
        self.steps
    }
}

#[cfg(test)]
mod tests {
    use super::WorkDistributor;
    use fdsm_graph::BipartiteGraph;

    #[test]
    fn ids_are_increasing_and_exhaust_once() {
        let distributor = WorkDistributor::new(3, 1);
        assert_eq!(distributor.next_actor(), Some(0));
        assert_eq!(distributor.next_actor(), Some(1));
        assert_eq!(distributor.next_actor(), Some(2));
        assert_eq!(distributor.next_actor(), None);
        assert_eq!(distributor.next_actor(), None);
        distributor.reset();
        assert_eq!(distributor.next_actor(), Some(0));
    }

    #[test]
    fn first_gate_invocation_only_arms() {
        let mut graph = BipartiteGraph::simplex(vec![vec![0], vec![1]]).unwrap();
        graph.init_random(1).unwrap();
        let distributor = WorkDistributor::new(2, 5);
        assert!(!distributor.advance_or_arm(&mut graph).unwrap());
        assert!(distributor.advance_or_arm(&mut graph).unwrap());
        distributor.disarm();
        assert!(!distributor.advance_or_arm(&mut graph).unwrap());
    }

    #[test]
    fn gate_resets_the_cursor() {
        let mut graph = BipartiteGraph::simplex(vec![vec![0], vec![1]]).unwrap();
        graph.init_random(1).unwrap();
        let distributor = WorkDistributor::new(2, 0);
        while distributor.next_actor().is_some() {}
        distributor.advance_or_arm(&mut graph).unwrap();
        assert_eq!(distributor.next_actor(), Some(0));
    }
}
