use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::RwLock;
use std::thread;
use std::time::Instant;

use fdsm_core::errors::{ErrorInfo, FdsmError};
use fdsm_graph::BipartiteGraph;
use fdsm_projection::ProjectionStrategy;
use serde::{Deserialize, Serialize};

use crate::config::RunConfig;
use crate::distributor::WorkDistributor;
use crate::progress::ProgressSink;
use crate::sync::PhaseBarrier;

/// Summary of a completed sampling run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Number of graph samples drawn.
    pub samples: usize,
    /// Swap attempts performed between consecutive samples.
    pub steps_per_sample: usize,
    /// Worker threads used.
    pub threads: usize,
    /// Wall-clock duration of the run in seconds.
    pub elapsed_seconds: f64,
}

/// Runs the full sampling protocol: one baseline pass over the original
/// graph, then `config.samples` repetitions of [chain step, statistics pass].
///
/// The step count is used literally; resolve a zero count through
/// [`RunConfig::resolved`] first. The graph is mutated in place and is left
/// in its final sampled state. On any worker failure the barrier is aborted,
/// the remaining workers drain out, and the first underlying error is
/// returned; the run never deadlocks on a failed worker.
pub fn run<P: ProjectionStrategy>(
    graph: &mut BipartiteGraph,
    projection: &mut P,
    config: &RunConfig,
    progress: &dyn ProgressSink,
) -> Result<RunSummary, FdsmError> {
    if config.threads == 0 {
        return Err(FdsmError::Config(
            ErrorInfo::new("zero-threads", "thread count must be at least one")
                .with_hint("set threads to a positive value"),
        ));
    }
    let started = Instant::now();
    graph.init_random(config.seed)?;
    projection.init_once(graph)?;

    let distributor = WorkDistributor::new(graph.actor_count(), config.steps);
    let barrier = PhaseBarrier::new(config.threads);
    let graph_lock = RwLock::new(graph);
    let projection: &P = projection;

    let results: Vec<Result<(), FdsmError>> = thread::scope(|scope| {
        let mut handles = Vec::with_capacity(config.threads);
        for index in 0..config.threads {
            let barrier = &barrier;
            let distributor = &distributor;
            let graph_lock = &graph_lock;
            handles.push(scope.spawn(move || {
                let outcome = catch_unwind(AssertUnwindSafe(|| {
                    worker(
                        index,
                        config,
                        barrier,
                        distributor,
                        graph_lock,
                        projection,
                        progress,
                    )
                }));
                match outcome {
                    Ok(Ok(())) => Ok(()),
                    Ok(Err(error)) => {
                        barrier.abort();
                        Err(error)
                    }
                    Err(_) => {
                        barrier.abort();
                        Err(worker_panicked(index))
                    }
                }
            }));
        }
        handles
            .into_iter()
            .enumerate()
            .map(|(index, handle)| handle.join().unwrap_or_else(|_| Err(worker_panicked(index))))
            .collect()
    });

    first_failure(results)?;
    Ok(RunSummary {
        samples: config.samples,
        steps_per_sample: config.steps,
        threads: config.threads,
        elapsed_seconds: started.elapsed().as_secs_f64(),
    })
}

/// Every worker failure aborts the barrier, so all of its peers report a
/// secondary barrier-abort error. Surface the root cause instead.
fn first_failure(results: Vec<Result<(), FdsmError>>) -> Result<(), FdsmError> {
    let mut fallback = None;
    for result in results {
        if let Err(error) = result {
            if error.info().code != "barrier-abort" {
                return Err(error);
            }
            fallback.get_or_insert(error);
        }
    }
    match fallback {
        Some(error) => Err(error),
        None => Ok(()),
    }
}

fn worker<P: ProjectionStrategy>(
    index: usize,
    config: &RunConfig,
    barrier: &PhaseBarrier,
    distributor: &WorkDistributor,
    graph: &RwLock<&mut BipartiteGraph>,
    projection: &P,
    progress: &dyn ProgressSink,
) -> Result<(), FdsmError> {
    if index == 0 {
        progress.baseline_started();
    }
    sync_round(barrier, distributor, graph)?;
    drain(graph, distributor, |graph, actor| {
        projection.init_baseline(graph, actor)
    })?;
    if index == 0 {
        progress.baseline_finished();
    }
    for sample in 0..config.samples {
        sync_round(barrier, distributor, graph)?;
        drain(graph, distributor, |graph, actor| {
            projection.update_sample(graph, actor)
        })?;
        if index == 0 {
            progress.sample_finished(sample + 1, config.samples);
        }
    }
    barrier.wait()?;
    if index == 0 {
        progress.sampling_finished();
    }
    Ok(())
}

/// Double join around the leader's exclusive window: everyone arrives, the
/// leader fires the arm/step gate while its peers are parked, then everyone
/// re-joins and moves into the read phase together.
fn sync_round(
    barrier: &PhaseBarrier,
    distributor: &WorkDistributor,
    graph: &RwLock<&mut BipartiteGraph>,
) -> Result<(), FdsmError> {
    if barrier.wait()? {
        let mut guard = graph.write().map_err(|_| lock_poisoned())?;
        distributor.advance_or_arm(&mut guard)?;
    }
    barrier.wait()?;
    Ok(())
}

fn drain<F>(
    graph: &RwLock<&mut BipartiteGraph>,
    distributor: &WorkDistributor,
    mut visit: F,
) -> Result<(), FdsmError>
where
    F: FnMut(&BipartiteGraph, usize) -> Result<(), FdsmError>,
{
    let guard = graph.read().map_err(|_| lock_poisoned())?;
    while let Some(actor) = distributor.next_actor() {
        visit(&guard, actor)?;
    }
    Ok(())
}

fn lock_poisoned() -> FdsmError {
    FdsmError::Sampler(ErrorInfo::new(
        "graph-lock-poisoned",
        "a worker panicked while holding the graph lock",
    ))
}

fn worker_panicked(index: usize) -> FdsmError {
    FdsmError::Sampler(
        ErrorInfo::new("worker-panicked", "a sampling worker panicked")
            .with_context("worker", index.to_string()),
    )
}
