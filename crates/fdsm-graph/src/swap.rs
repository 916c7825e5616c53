//! Degree-preserving double edge swap.
//!
//! One attempt draws two uniform edge indices, resolves them to actors and
//! in-list positions, and exchanges the two target events unless doing so
//! would create a multi-edge (or, for duplex graphs, an edge that already
//! exists with the opposite sign). Rejection leaves the graph untouched and
//! counts as one consumed attempt: a rejected proposal is itself a valid
//! Markov-chain transition, not a retry.

use fdsm_core::rng::RngHandle;
use rand::Rng;

use crate::adjacency::AdjacencyTable;
use crate::bipartite::DuplexGraph;

pub(crate) fn step_simplex(table: &mut AdjacencyTable, rng: &mut RngHandle, steps: usize) -> usize {
    let edge_count = table.edge_count();
    let mut accepted = 0;
    for _ in 0..steps {
        let r1 = rng.gen_range(0..edge_count);
        let r2 = rng.gen_range(0..edge_count);
        let (actor1, pos1) = table.resolve(r1);
        let (actor2, pos2) = table.resolve(r2);
        if actor1 == actor2 {
            // The drawn target necessarily already exists in the other list.
            continue;
        }
        let (list1, list2) = table.pair_mut(actor1, actor2);
        if attempt(list1, pos1, list2, pos2, None) {
            accepted += 1;
        }
    }
    accepted
}

pub(crate) fn step_duplex(graph: &mut DuplexGraph, rng: &mut RngHandle, steps: usize) -> usize {
    let pos_count = graph.pos.edge_count();
    let neg_count = graph.neg.edge_count();
    let total = pos_count + neg_count;
    let mut accepted = 0;
    for _ in 0..steps {
        // Edge selection is weighted by sign: a uniform draw over the
        // combined index space picks the pool, the partner edge comes from
        // the same pool.
        let r1 = rng.gen_range(0..total);
        let swapped = if r1 < pos_count {
            let r2 = rng.gen_range(0..pos_count);
            let (actor1, pos1) = graph.pos.resolve(r1);
            let (actor2, pos2) = graph.pos.resolve(r2);
            if actor1 == actor2 {
                continue;
            }
            let opposite = (graph.neg.adjacency(actor1), graph.neg.adjacency(actor2));
            let (list1, list2) = graph.pos.pair_mut(actor1, actor2);
            attempt(list1, pos1, list2, pos2, Some(opposite))
        } else {
            let r1 = r1 - pos_count;
            let r2 = rng.gen_range(0..neg_count);
            let (actor1, pos1) = graph.neg.resolve(r1);
            let (actor2, pos2) = graph.neg.resolve(r2);
            if actor1 == actor2 {
                continue;
            }
            let opposite = (graph.pos.adjacency(actor1), graph.pos.adjacency(actor2));
            let (list1, list2) = graph.neg.pair_mut(actor1, actor2);
            attempt(list1, pos1, list2, pos2, Some(opposite))
        };
        if swapped {
            accepted += 1;
        }
    }
    accepted
}

/// Tries to exchange `list1[pos1]` and `list2[pos2]`. Returns false without
/// mutating anything if either new target already exists in the receiving
/// list or, when `opposite` adjacency is given, with the opposite sign.
fn attempt(
    list1: &mut [u32],
    pos1: usize,
    list2: &mut [u32],
    pos2: usize,
    opposite: Option<(&[u32], &[u32])>,
) -> bool {
    let item2 = list2[pos2];
    let insert2_in1 = match list1.binary_search(&item2) {
        Ok(_) => return false,
        Err(point) => point,
    };
    let item1 = list1[pos1];
    let insert1_in2 = match list2.binary_search(&item1) {
        Ok(_) => return false,
        Err(point) => point,
    };
    if let Some((opposite1, opposite2)) = opposite {
        if opposite1.binary_search(&item2).is_ok() {
            return false;
        }
        if opposite2.binary_search(&item1).is_ok() {
            return false;
        }
    }
    sorted_replace(list2, pos2, insert1_in2, item1);
    sorted_replace(list1, pos1, insert2_in1, item2);
    true
}

/// Removes the element at `removed` and inserts `item` at insertion point
/// `insert_at` (computed before the removal), shifting only the contiguous
/// run of elements between the two positions.
fn sorted_replace(list: &mut [u32], removed: usize, insert_at: usize, item: u32) {
    if insert_at <= removed {
        list.copy_within(insert_at..removed, insert_at + 1);
        list[insert_at] = item;
    } else {
        list.copy_within(removed + 1..insert_at, removed);
        list[insert_at - 1] = item;
    }
}
