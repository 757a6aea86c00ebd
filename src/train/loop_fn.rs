use std::sync::atomic::Ordering;
use std::time::Instant;

use tracing::{debug, info};

use crate::data::dataset::Dataset;
use crate::error::ConfigError;
use crate::network::hebbian::{Association, HebbianNetwork};
use crate::train::epoch_stats::EpochStats;
use crate::train::neuron_map::NeuronMap;
use crate::train::train_config::TrainConfig;

// ---------------------------------------------------------------------------
// Public entry points
// ---------------------------------------------------------------------------

/// Trains `network` on `data` for `config.iterations` passes and returns the
/// number of passes completed.
///
/// Each batch of samples becomes one Hebbian step: input values are applied
/// presynaptically on `map.inputs`, the label's output neuron is driven to
/// `1.0` postsynaptically, then pairings are computed and synapses updated.
/// Samples are visited in dataset order; a short final batch leaves its
/// missing slots empty.
///
/// # Early termination
/// The loop breaks early if:
/// - the `progress_tx` receiver has been dropped, **or**
/// - `config.stop_flag` is set to `true`.
///
/// # Panics
/// Panics if `config.batch_size` differs from the network's batch size, or a
/// label has no output neuron in `map`; [`check_labels`] screens for that.
pub fn train_loop<D: Dataset + ?Sized>(
    network: &mut HebbianNetwork<f64>,
    data: &D,
    map: &NeuronMap,
    config: &TrainConfig,
) -> usize {
    assert_eq!(
        config.batch_size,
        network.batch_size(),
        "TrainConfig batch size must match the network's"
    );

    debug!(
        network = network.name(),
        learn_rate = network.learn_rate(),
        cull_threshold = network.cull_threshold(),
        samples = data.len(),
        "starting training"
    );

    let batch_size = config.batch_size;
    let mut pre: Vec<Vec<Association<f64>>> = vec![Vec::with_capacity(map.inputs.len()); batch_size];
    let mut post: Vec<Vec<Association<f64>>> = vec![Vec::with_capacity(1); batch_size];
    let mut completed = 0;

    for iteration in 1..=config.iterations {
        if stop_requested(config) {
            break;
        }

        let t_start = Instant::now();
        let mut batches = 0;

        for batch_start in (0..data.len()).step_by(batch_size) {
            let batch_end = (batch_start + batch_size).min(data.len());
            let slots = batch_end - batch_start;

            for (slot, idx) in (batch_start..batch_end).enumerate() {
                fill_association(data, idx, map, &mut pre[slot], &mut post[slot]);
            }

            network.train_step(&pre[..slots], &post[..slots]);
            batches += 1;
        }

        let culled = if config.cull_every > 0 && iteration % config.cull_every == 0 {
            Some(network.cull())
        } else {
            None
        };

        completed = iteration;
        let stats = EpochStats {
            iteration,
            total_iterations: config.iterations,
            batches,
            culled,
            synapses: network.num_synapses(),
            elapsed_ms: t_start.elapsed().as_millis() as u64,
        };
        info!(
            network = network.name(),
            iteration,
            total = config.iterations,
            synapses = stats.synapses,
            elapsed_ms = stats.elapsed_ms,
            "training iteration complete"
        );

        if let Some(ref tx) = config.progress_tx {
            // If the receiver has been dropped, stop training.
            if tx.send(stats).is_err() {
                debug!("progress receiver dropped, stopping");
                break;
            }
        }
    }

    completed
}

/// Fraction of samples whose strongest output neuron matches the label.
pub fn evaluate<D: Dataset + ?Sized>(network: &HebbianNetwork<f64>, data: &D, map: &NeuronMap) -> f64 {
    if data.is_empty() {
        return 0.0;
    }

    let correct = (0..data.len())
        .filter(|&idx| {
            let input = map.input_vector(data.input(idx), network.num_neurons());
            let response = network.apply_input(&input);
            map.classify(&response) == Some(data.label(idx))
        })
        .count();

    correct as f64 / data.len() as f64
}

/// Fails on the first sample whose label has no output neuron among
/// `n_classes` classes.
pub fn check_labels<D: Dataset + ?Sized>(data: &D, n_classes: usize) -> Result<(), ConfigError> {
    match (0..data.len()).find(|&idx| data.label(idx) >= n_classes) {
        Some(index) => Err(ConfigError::UnknownClass { index, label: data.label(index), n_classes }),
        None => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

/// Rewrites one batch slot with sample `idx`'s associations. Zero-valued
/// inputs are skipped since they leave the activation buffer unchanged.
fn fill_association<D: Dataset + ?Sized>(
    data: &D,
    idx: usize,
    map: &NeuronMap,
    pre: &mut Vec<Association<f64>>,
    post: &mut Vec<Association<f64>>,
) {
    pre.clear();
    pre.extend(
        map.inputs
            .iter()
            .zip(data.input(idx))
            .filter(|&(_, &value)| value != 0.0)
            .map(|(&neuron, &value)| (neuron, value)),
    );

    post.clear();
    post.push((map.outputs[data.label(idx)], 1.0));
}

fn stop_requested(config: &TrainConfig) -> bool {
    config
        .stop_flag
        .as_ref()
        .map(|flag| flag.load(Ordering::Relaxed))
        .unwrap_or(false)
}
