use std::sync::{Condvar, Mutex};

use fdsm_core::errors::{ErrorInfo, FdsmError};

/// Reusable barrier with leader election and abort support.
///
/// `wait` blocks until all parties have arrived and reports leadership to
/// exactly one caller per generation: the leader returns immediately while
/// holding no lock, performs its exclusive work, and re-joins; everyone else
/// is parked until the next generation trips. `abort` releases all current
/// and future waiters with an error, so a failed worker cannot strand the
/// rest of the pool at the barrier.
#[derive(Debug)]
pub struct PhaseBarrier {
    state: Mutex<BarrierState>,
    condvar: Condvar,
    parties: usize,
}

#[derive(Debug)]
struct BarrierState {
    arrived: usize,
    generation: u64,
    aborted: bool,
}

impl PhaseBarrier {
    /// Creates a barrier for `parties` workers. `parties` must be nonzero.
    pub fn new(parties: usize) -> Self {
        debug_assert!(parties > 0);
        Self {
            state: Mutex::new(BarrierState {
                arrived: 0,
                generation: 0,
                aborted: false,
            }),
            condvar: Condvar::new(),
            parties,
        }
    }

    /// Blocks until all parties arrive. Returns `Ok(true)` for the single
    /// leader of this generation, `Ok(false)` for everyone else, and an
    /// error if the barrier was aborted.
    pub fn wait(&self) -> Result<bool, FdsmError> {
        let mut state = self.state.lock().map_err(|_| poisoned())?;
        if state.aborted {
            return Err(aborted());
        }
        state.arrived += 1;
        if state.arrived == self.parties {
            state.arrived = 0;
            state.generation = state.generation.wrapping_add(1);
            self.condvar.notify_all();
            return Ok(true);
        }
        let generation = state.generation;
        while state.generation == generation && !state.aborted {
            state = self.condvar.wait(state).map_err(|_| poisoned())?;
        }
        if state.aborted {
            Err(aborted())
        } else {
            Ok(false)
        }
    }

    /// Permanently breaks the barrier, waking every parked worker with an
    /// error. Idempotent.
    pub fn abort(&self) {
        if let Ok(mut state) = self.state.lock() {
            state.aborted = true;
            self.condvar.notify_all();
        }
    }
}

fn aborted() -> FdsmError {
    FdsmError::Sampler(ErrorInfo::new(
        "barrier-abort",
        "sampling aborted because a worker failed",
    ))
}

fn poisoned() -> FdsmError {
    FdsmError::Sampler(ErrorInfo::new(
        "barrier-poisoned",
        "a worker panicked while holding the barrier lock",
    ))
}

#[cfg(test)]
mod tests {
    use super::PhaseBarrier;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    #[test]
    fn single_party_is_always_leader() {
        let barrier = PhaseBarrier::new(1);
        assert!(barrier.wait().unwrap());
        assert!(barrier.wait().unwrap());
    }

    #[test]
    fn exactly_one_leader_per_generation() {
        let barrier = PhaseBarrier::new(4);
        let leaders = AtomicUsize::new(0);
        thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    for _ in 0..10 {
                        if barrier.wait().unwrap() {
                            leaders.fetch_add(1, Ordering::SeqCst);
                        }
                    }
                });
            }
        });
        assert_eq!(leaders.load(Ordering::SeqCst), 10);
    }

    #[test]
    fn abort_releases_parked_waiters() {
        let barrier = PhaseBarrier::new(3);
        thread::scope(|scope| {
            let waiter = scope.spawn(|| barrier.wait());
            let aborter = scope.spawn(|| barrier.abort());
            aborter.join().unwrap();
            let result = waiter.join().unwrap();
            assert_eq!(result.unwrap_err().info().code, "barrier-abort");
        });
    }
}
