//! Two inputs wired to two outputs, trained to cross over:
//! neuron 0 should drive neuron 3 and neuron 1 should drive neuron 2.

use tracing::info;

use crate::error::ConfigError;
use crate::math::triplet::Triplet;
use crate::network::hebbian::HebbianNetwork;
use crate::network::params::NetworkParams;

pub const NUM_NEURONS: usize = 4;
pub const BATCH_SIZE: usize = 1;
pub const LEARN_RATE: f64 = 0.01;
pub const CULL_THRESHOLD: f64 = 1e-8;

/// Initial `(post, pre, weight)` synapses: every input is wired to both
/// outputs and every output back to both inputs.
pub const SYNAPSES: [(usize, usize, f64); 8] = [
    (0, 2, 52.0),
    (2, 0, 45.0),
    (0, 3, 57.0),
    (3, 0, 47.0),
    (1, 2, 45.0),
    (2, 1, 58.0),
    (1, 3, 49.0),
    (3, 1, 56.0),
];

/// Responses of the trained network to each one-hot input.
pub struct CrossResponse {
    pub network: HebbianNetwork<f64>,
    /// Response to `[1, 0, 0, 0]`.
    pub from_first: Vec<f64>,
    /// Response to `[0, 1, 0, 0]`.
    pub from_second: Vec<f64>,
}

impl CrossResponse {
    /// True when input 0 favours output 3 and input 1 favours output 2.
    pub fn crossed(&self) -> bool {
        self.from_first[3] > self.from_first[2] && self.from_second[2] > self.from_second[3]
    }
}

pub fn build() -> Result<HebbianNetwork<f64>, ConfigError> {
    HebbianNetwork::new(NetworkParams {
        name: "Simple 2x2 Net".into(),
        num_neurons: NUM_NEURONS,
        batch_size: BATCH_SIZE,
        learn_rate: LEARN_RATE,
        cull_threshold: CULL_THRESHOLD,
        synapses: SYNAPSES.iter().copied().map(Triplet::from).collect(),
    })
}

/// Reinforces `0 -> 3` and `1 -> 2` once each per iteration, then queries
/// both inputs.
pub fn run(iterations: usize) -> Result<CrossResponse, ConfigError> {
    let mut network = build()?;

    for _ in 0..iterations {
        network.train_step(&[vec![(0, 1.0)]], &[vec![(3, 1.0)]]);
        network.train_step(&[vec![(1, 1.0)]], &[vec![(2, 1.0)]]);
    }

    let from_first = network.apply_input(&[1.0, 0.0, 0.0, 0.0]);
    let from_second = network.apply_input(&[0.0, 1.0, 0.0, 0.0]);
    info!(iterations, synapses = network.num_synapses(), "simple cross trained");

    Ok(CrossResponse { network, from_first, from_second })
}
