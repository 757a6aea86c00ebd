use serde::{Serialize, Deserialize};

/// Per-iteration training statistics emitted by `train_loop`.
///
/// When a `progress_tx` channel is configured in `TrainConfig`, the training
/// loop sends one `EpochStats` value at the end of every completed pass over
/// the training data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpochStats {
    /// 1-based iteration number.
    pub iteration: usize,
    /// Total iterations requested for this run.
    pub total_iterations: usize,
    /// Hebbian steps (batches) applied during this iteration.
    pub batches: usize,
    /// Synapses removed by the cull at the end of this iteration, if one ran.
    pub culled: Option<usize>,
    /// Synapses alive after this iteration.
    pub synapses: usize,
    /// Wall-clock duration of this single iteration in milliseconds.
    pub elapsed_ms: u64,
}
