use std::sync::mpsc;
use std::sync::{Arc, atomic::AtomicBool};

use crate::train::epoch_stats::EpochStats;
use crate::train::settings::TrainSettings;

/// Configuration for a `train_loop` run.
///
/// # Fields
/// - `iterations` : full passes over the training data
/// - `batch_size` : associations per Hebbian step; must match the network's
/// - `cull_every` : cull weak synapses after every `cull_every` iterations
///                   (`0` disables culling)
/// - `progress_tx`: optional channel sender; one `EpochStats` is sent per
///                   completed iteration.  If the receiver is dropped the loop
///                   terminates early (clean shutdown).
/// - `stop_flag`  : optional atomic flag; when set to `true` from another
///                   thread the loop terminates after the current iteration.
pub struct TrainConfig {
    pub iterations: usize,
    pub batch_size: usize,
    pub cull_every: usize,
    pub progress_tx: Option<mpsc::Sender<EpochStats>>,
    pub stop_flag: Option<Arc<AtomicBool>>,
}

impl TrainConfig {
    /// Creates a minimal `TrainConfig` that culls once per iteration, with no
    /// progress channel and no stop flag.
    pub fn new(iterations: usize, batch_size: usize) -> Self {
        TrainConfig {
            iterations,
            batch_size,
            cull_every: 1,
            progress_tx: None,
            stop_flag: None,
        }
    }

    pub fn from_settings(settings: &TrainSettings) -> Self {
        TrainConfig::new(settings.num_iterations, settings.batch_size)
    }
}
