use std::collections::BTreeSet;

use fdsm_core::errors::{ErrorInfo, FdsmError};

/// Per-sign adjacency storage for one side of a bipartite graph.
///
/// Holds, for every actor, the ascending-sorted list of event IDs it is
/// connected to, plus the derived structures the swap chain needs: per-actor
/// degrees, prefix-sum offsets into the flat edge index space, and the flat
/// edge map resolving a uniform-random edge index back to its owning actor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdjacencyTable {
    adj: Vec<Vec<u32>>,
    degrees: Vec<u32>,
    offsets: Vec<usize>,
    edge_map: Vec<u32>,
    edge_count: usize,
}

impl AdjacencyTable {
    /// Builds a table from per-actor event lists. Input lists do not need to
    /// be sorted; duplicate events within one actor are rejected.
    pub fn from_lists(mut adj: Vec<Vec<u32>>) -> Result<Self, FdsmError> {
        if adj.is_empty() {
            return Err(FdsmError::Graph(ErrorInfo::new(
                "empty-graph",
                "adjacency list contains no actors",
            )));
        }
        for (actor, list) in adj.iter_mut().enumerate() {
            list.sort_unstable();
            if list.windows(2).any(|pair| pair[0] == pair[1]) {
                return Err(FdsmError::Graph(
                    ErrorInfo::new("duplicate-edge", "actor connects to the same event twice")
                        .with_context("actor", actor.to_string()),
                ));
            }
        }
        let degrees: Vec<u32> = adj.iter().map(|list| list.len() as u32).collect();
        let mut offsets = Vec::with_capacity(adj.len());
        let mut running = 0usize;
        for degree in &degrees {
            offsets.push(running);
            running += *degree as usize;
        }
        let edge_count = running;
        let mut edge_map = Vec::with_capacity(edge_count);
        for (actor, degree) in degrees.iter().enumerate() {
            for _ in 0..*degree {
                edge_map.push(actor as u32);
            }
        }
        Ok(Self {
            adj,
            degrees,
            offsets,
            edge_map,
            edge_count,
        })
    }

    /// Number of actors covered by the table.
    pub fn actor_count(&self) -> usize {
        self.adj.len()
    }

    /// Number of edges covered by the table.
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Degree of the given actor.
    pub fn degree(&self, actor: usize) -> u32 {
        self.degrees[actor]
    }

    /// Sorted event list of the given actor.
    pub fn adjacency(&self, actor: usize) -> &[u32] {
        &self.adj[actor]
    }

    /// Resolves a flat edge index to `(actor, position within its list)`.
    pub fn resolve(&self, edge_index: usize) -> (usize, usize) {
        let actor = self.edge_map[edge_index] as usize;
        (actor, edge_index - self.offsets[actor])
    }

    /// Set of distinct event IDs appearing anywhere in the table.
    pub fn event_ids(&self) -> BTreeSet<u32> {
        self.adj.iter().flatten().copied().collect()
    }

    /// Returns mutable views of two distinct actors' event lists.
    pub(crate) fn pair_mut(&mut self, a: usize, b: usize) -> (&mut [u32], &mut [u32]) {
        debug_assert_ne!(a, b);
        if a < b {
            let (head, tail) = self.adj.split_at_mut(b);
            (&mut head[a], &mut tail[0])
        } else {
            let (head, tail) = self.adj.split_at_mut(a);
            (&mut tail[0], &mut head[b])
        }
    }

    /// Checks the sortedness and duplicate-freedom invariants.
    pub fn validate(&self) -> Result<(), FdsmError> {
        for (actor, list) in self.adj.iter().enumerate() {
            if list.windows(2).any(|pair| pair[0] >= pair[1]) {
                return Err(FdsmError::Graph(
                    ErrorInfo::new("unsorted-adjacency", "adjacency list is not strictly ascending")
                        .with_context("actor", actor.to_string()),
                ));
            }
            if list.len() != self.degrees[actor] as usize {
                return Err(FdsmError::Graph(
                    ErrorInfo::new("degree-drift", "stored degree disagrees with adjacency length")
                        .with_context("actor", actor.to_string()),
                ));
            }
        }
        Ok(())
    }
}
