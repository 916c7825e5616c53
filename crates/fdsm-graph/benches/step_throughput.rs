use criterion::{black_box, criterion_group, criterion_main, Criterion};
use fdsm_core::rng::RngHandle;
use fdsm_graph::{cooccurrence, BipartiteGraph, GraphShape};
use rand::Rng;

fn random_adjacency(actors: usize, events: u32, degree: usize, seed: u64) -> Vec<Vec<u32>> {
    let mut rng = RngHandle::from_seed(seed);
    (0..actors)
        .map(|_| {
            let mut list: Vec<u32> = (0..degree).map(|_| rng.gen_range(0..events)).collect();
            list.sort_unstable();
            list.dedup();
            list
        })
        .collect()
}

fn step_bench(c: &mut Criterion) {
    let adjacency = random_adjacency(2_000, 4_000, 12, 7);
    let mut graph = BipartiteGraph::simplex(adjacency).unwrap();
    graph.init_random(7).unwrap();

    c.bench_function("swap_attempts_10k", |b| {
        b.iter(|| {
            black_box(graph.step(10_000).unwrap());
        });
    });

    let GraphShape::Simplex(simplex) = graph.shape() else {
        unreachable!()
    };
    c.bench_function("cooccurrence_scan", |b| {
        b.iter(|| {
            let mut total = 0u64;
            for actor in 1..graph.actor_count() {
                total += u64::from(cooccurrence(simplex.adjacency(0), simplex.adjacency(actor)));
            }
            black_box(total)
        });
    });
}

criterion_group!(benches, step_bench);
criterion_main!(benches);
