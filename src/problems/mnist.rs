//! MNIST digit classification with Hebbian networks.
//!
//! Data files are the standard IDX files, expected under one directory:
//! `train-images-idx3-ubyte`, `train-labels-idx1-ubyte`,
//! `t10k-images-idx3-ubyte`, `t10k-labels-idx1-ubyte`.

use std::path::Path;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

use crate::data::dataset::{Dataset, InMemoryDataset};
use crate::data::idx::load_idx_pair;
use crate::error::{ConfigError, DataError};
use crate::graph::random_graph::Connectivity;
use crate::math::triplet::Triplet;
use crate::network::hebbian::HebbianNetwork;
use crate::network::params::NetworkParams;
use crate::train::loop_fn::{check_labels, evaluate, train_loop};
use crate::train::neuron_map::NeuronMap;
use crate::train::settings::TrainSettings;
use crate::train::sweep::{run_configuration, SweepResult};
use crate::train::train_config::TrainConfig;

pub const INPUT_SIZE: usize = 784;
pub const OUTPUT_SIZE: usize = 10;

/// Settings for the fully connected problem when no settings file is given:
/// ten passes in batches of 100. Graph fields are unused by `run_fixed`.
pub const FIXED_SETTINGS: TrainSettings = TrainSettings {
    num_iterations: 10,
    batch_size: 100,
    pulse_length: 1,
    learn_rate: 0.01,
    cull_thresh: 1e-8,
    min_verts: 794,
    max_verts: 1294,
    min_edge_weight: 1e-6,
    max_edge_weight: 100.0,
    edge_probability: 0.7,
    connectivity: Connectivity::BestEffort,
};

/// Loads the `(train, test)` pair from `dir`, keeping at most `max_samples`
/// of each when given.
pub fn load(
    dir: impl AsRef<Path>,
    max_samples: Option<usize>,
) -> Result<(InMemoryDataset, InMemoryDataset), DataError> {
    let dir = dir.as_ref();
    let train = load_idx_pair(
        dir.join("train-images-idx3-ubyte"),
        dir.join("train-labels-idx1-ubyte"),
        OUTPUT_SIZE,
    )?;
    let test = load_idx_pair(
        dir.join("t10k-images-idx3-ubyte"),
        dir.join("t10k-labels-idx1-ubyte"),
        OUTPUT_SIZE,
    )?;
    match max_samples {
        Some(n) => Ok((train.truncated(n), test.truncated(n))),
        None => Ok((train, test)),
    }
}

/// Connects every input neuron to every output neuron with a weight drawn
/// uniformly from `[-0.5, 0.5)`. Outputs sit directly after the inputs.
pub fn fixed_synapses<R: Rng + ?Sized>(input_size: usize, output_size: usize, rng: &mut R) -> Vec<Triplet<f64>> {
    let mut synapses = Vec::with_capacity(input_size * output_size);
    for i in 0..input_size {
        for j in 0..output_size {
            synapses.push(Triplet::new(input_size + j, i, rng.gen_range(-0.5..0.5)));
        }
    }
    synapses
}

/// Trains the fully connected input-to-output network and returns its test
/// accuracy. Only the iteration, batch, learn-rate and cull settings apply.
pub fn run_fixed<D: Dataset + ?Sized>(
    train: &D,
    test: &D,
    settings: &TrainSettings,
    seed: u64,
) -> Result<f64, ConfigError> {
    settings.validate()?;
    check_labels(train, OUTPUT_SIZE)?;
    check_labels(test, OUTPUT_SIZE)?;
    let input_size = train.input_size();
    let mut rng = StdRng::seed_from_u64(seed);

    let mut network = HebbianNetwork::new(NetworkParams {
        name: "MNIST Digit Net".into(),
        num_neurons: input_size + OUTPUT_SIZE,
        batch_size: settings.batch_size,
        learn_rate: settings.learn_rate,
        cull_threshold: settings.cull_thresh,
        synapses: fixed_synapses(input_size, OUTPUT_SIZE, &mut rng),
    })?;
    let map = NeuronMap::contiguous(input_size, OUTPUT_SIZE);

    train_loop(&mut network, train, &map, &TrainConfig::from_settings(settings));
    let accuracy = evaluate(&network, test, &map);
    info!(accuracy = accuracy * 100.0, "fixed network test accuracy (%)");
    Ok(accuracy)
}

/// Trains one network on a random graph topology.
pub fn run_random<D: Dataset + ?Sized>(
    train: &D,
    test: &D,
    settings: &TrainSettings,
    seed: u64,
) -> Result<SweepResult, ConfigError> {
    run_configuration(0, settings, train, test, OUTPUT_SIZE, seed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_problem_runs_ten_passes_of_one_hundred() {
        assert_eq!(FIXED_SETTINGS.num_iterations, 10);
        assert_eq!(FIXED_SETTINGS.batch_size, 100);
        assert_eq!(FIXED_SETTINGS.validate(), Ok(()));
        assert_ne!(FIXED_SETTINGS, TrainSettings::default());
    }
}
