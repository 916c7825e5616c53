use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::thread;

use fdsm_core::errors::FdsmError;
use fdsm_graph::BipartiteGraph;
use fdsm_projection::{
    AllStatsProjection, PValueProjection, ProjectionStrategy,
};
use fdsm_sampler::{run, NullProgress, ProgressSink, RunConfig, WorkDistributor};

fn triangle() -> BipartiteGraph {
    // Three actors pairwise sharing one event each, plus an isolated actor.
    BipartiteGraph::simplex(vec![vec![0, 1], vec![1, 2], vec![0, 2], vec![]]).unwrap()
}

#[test]
fn concurrent_pullers_partition_the_actor_ids() {
    let distributor = WorkDistributor::new(1000, 0);
    let claimed = Mutex::new(Vec::new());
    thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                let mut local = Vec::new();
                while let Some(actor) = distributor.next_actor() {
                    local.push(actor);
                }
                claimed.lock().unwrap().extend(local);
            });
        }
    });
    let mut claimed = claimed.into_inner().unwrap();
    claimed.sort_unstable();
    assert_eq!(claimed, (0..1000).collect::<Vec<_>>());
}

#[test]
fn frozen_chain_counts_every_sample() {
    let mut graph = triangle();
    let mut projection = PValueProjection::new();
    let config = RunConfig {
        samples: 5,
        steps: 0, // literal zero: the graph never changes between samples
        threads: 2,
        seed: 7,
    };
    let summary = run(&mut graph, &mut projection, &config, &NullProgress).unwrap();
    assert_eq!(summary.samples, 5);
    assert_eq!(summary.threads, 2);

    let results = projection.into_results().unwrap();
    let mut tracked_pairs = 0;
    for actor in 0..4 {
        for entry in results.tracked(0, actor) {
            assert_eq!(entry.baseline, 1);
            assert_eq!(entry.ge_count, 5);
            tracked_pairs += 1;
        }
    }
    assert_eq!(tracked_pairs, 3);
    assert!(results.tracked(0, 3).is_empty());
}

#[test]
fn identical_configs_give_identical_results() {
    let adjacency = vec![
        vec![0, 1, 2],
        vec![1, 3],
        vec![0, 2, 3, 4],
        vec![2, 4],
        vec![0, 3],
    ];
    let config = RunConfig {
        samples: 20,
        steps: 6,
        threads: 3,
        seed: 99,
    };
    let run_once = || {
        let mut graph = BipartiteGraph::simplex(adjacency.clone()).unwrap();
        let mut projection = AllStatsProjection::new();
        run(&mut graph, &mut projection, &config, &NullProgress).unwrap();
        projection.into_results().unwrap()
    };
    assert_eq!(run_once(), run_once());
}

#[test]
fn zero_threads_is_a_config_error() {
    let mut graph = triangle();
    let mut projection = PValueProjection::new();
    let config = RunConfig {
        threads: 0,
        ..RunConfig::default()
    };
    let error = run(&mut graph, &mut projection, &config, &NullProgress).unwrap_err();
    assert_eq!(error.info().code, "zero-threads");
}

#[test]
fn reusing_a_graph_across_runs_is_rejected() {
    let mut graph = triangle();
    let config = RunConfig {
        samples: 1,
        steps: 0,
        threads: 1,
        seed: 1,
    };
    run(&mut graph, &mut PValueProjection::new(), &config, &NullProgress).unwrap();
    let error = run(&mut graph, &mut PValueProjection::new(), &config, &NullProgress).unwrap_err();
    assert_eq!(error.info().code, "rng-reseeded");
}

#[test]
fn progress_sink_sees_every_phase_boundary() {
    #[derive(Default)]
    struct Counting {
        baselines: AtomicUsize,
        samples: AtomicUsize,
        finishes: AtomicUsize,
    }
    impl ProgressSink for Counting {
        fn baseline_finished(&self) {
            self.baselines.fetch_add(1, Ordering::SeqCst);
        }
        fn sample_finished(&self, completed: usize, total: usize) {
            assert!(completed <= total);
            self.samples.fetch_add(1, Ordering::SeqCst);
        }
        fn sampling_finished(&self) {
            self.finishes.fetch_add(1, Ordering::SeqCst);
        }
    }

    let mut graph = triangle();
    let config = RunConfig {
        samples: 8,
        steps: 2,
        threads: 2,
        seed: 4,
    };
    let progress = Counting::default();
    run(&mut graph, &mut PValueProjection::new(), &config, &progress).unwrap();
    assert_eq!(progress.baselines.load(Ordering::SeqCst), 1);
    assert_eq!(progress.samples.load(Ordering::SeqCst), 8);
    assert_eq!(progress.finishes.load(Ordering::SeqCst), 1);
}

struct FailingAfterBaseline;

impl ProjectionStrategy for FailingAfterBaseline {
    fn init_once(&mut self, _graph: &BipartiteGraph) -> Result<(), FdsmError> {
        Ok(())
    }
    fn init_baseline(&self, _graph: &BipartiteGraph, _actor: usize) -> Result<(), FdsmError> {
        Ok(())
    }
    fn update_sample(&self, _graph: &BipartiteGraph, _actor: usize) -> Result<(), FdsmError> {
        Err(FdsmError::Projection(fdsm_core::errors::ErrorInfo::new(
            "injected-failure",
            "deliberate failure from a test strategy",
        )))
    }
}

#[test]
fn failing_strategy_unwinds_the_pool_without_hanging() {
    let mut graph = triangle();
    let config = RunConfig {
        samples: 50,
        steps: 1,
        threads: 4,
        seed: 3,
    };
    let error = run(&mut graph, &mut FailingAfterBaseline, &config, &NullProgress).unwrap_err();
    assert_eq!(error.info().code, "injected-failure");
}

struct PanickingStrategy;

impl ProjectionStrategy for PanickingStrategy {
    fn init_once(&mut self, _graph: &BipartiteGraph) -> Result<(), FdsmError> {
        Ok(())
    }
    fn init_baseline(&self, _graph: &BipartiteGraph, _actor: usize) -> Result<(), FdsmError> {
        Ok(())
    }
    fn update_sample(&self, _graph: &BipartiteGraph, _actor: usize) -> Result<(), FdsmError> {
        panic!("deliberate panic from a test strategy");
    }
}

#[test]
fn panicking_strategy_surfaces_as_an_error() {
    let mut graph = triangle();
    let config = RunConfig {
        samples: 50,
        steps: 1,
        threads: 4,
        seed: 3,
    };
    let error = run(&mut graph, &mut PanickingStrategy, &config, &NullProgress).unwrap_err();
    assert_eq!(error.info().code, "worker-panicked");
}
