/// Observer notified at the phase boundaries of a sampling run.
///
/// Notifications come from a single worker thread, but the sink is shared
/// across the pool, so implementations must be thread-safe. All methods
/// default to no-ops; implement only the boundaries of interest.
pub trait ProgressSink: Send + Sync {
    /// The baseline pass over the original graph is about to start.
    fn baseline_started(&self) {}

    /// The baseline pass is complete.
    fn baseline_finished(&self) {}

    /// One sampling round finished; `completed` of `total` samples are done.
    fn sample_finished(&self, _completed: usize, _total: usize) {}

    /// All sampling rounds are complete.
    fn sampling_finished(&self) {}
}

/// Sink that discards every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullProgress;

impl ProgressSink for NullProgress {}
