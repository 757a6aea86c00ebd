use rand::seq::index::sample;
use rand::Rng;

use crate::error::ConfigError;

/// Which network neurons receive input values and which report each class.
///
/// `inputs[j]` receives input component `j`; `outputs[k]` is the neuron whose
/// response scores class `k`. The two lists never share a neuron.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NeuronMap {
    pub inputs: Vec<usize>,
    pub outputs: Vec<usize>,
}

impl NeuronMap {
    /// Inputs on `0..input_size`, outputs directly after them.
    pub fn contiguous(input_size: usize, output_size: usize) -> NeuronMap {
        NeuronMap {
            inputs: (0..input_size).collect(),
            outputs: (input_size..input_size + output_size).collect(),
        }
    }

    /// Picks `input_size + output_size` distinct neurons at random out of
    /// `num_neurons`, the first `input_size` of them becoming inputs.
    pub fn random<R: Rng + ?Sized>(
        num_neurons: usize,
        input_size: usize,
        output_size: usize,
        rng: &mut R,
    ) -> Result<NeuronMap, ConfigError> {
        let needed = input_size + output_size;
        if needed > num_neurons {
            return Err(ConfigError::TooFewNeurons { needed, available: num_neurons });
        }

        let mut picked = sample(rng, num_neurons, needed).into_vec();
        let outputs = picked.split_off(input_size);
        Ok(NeuronMap { inputs: picked, outputs })
    }

    /// Smallest network size that can hold every mapped neuron.
    pub fn min_neurons(&self) -> usize {
        self.inputs.iter().chain(&self.outputs).map(|&n| n + 1).max().unwrap_or(0)
    }

    /// Scatters `input` into a zero vector of length `num_neurons`.
    pub fn input_vector(&self, input: &[f64], num_neurons: usize) -> Vec<f64> {
        let mut v = vec![0.0; num_neurons];
        for (&neuron, &value) in self.inputs.iter().zip(input) {
            v[neuron] = value;
        }
        v
    }

    /// Class whose output neuron responds most strongly in `response`.
    pub fn classify(&self, response: &[f64]) -> Option<usize> {
        self.outputs
            .iter()
            .enumerate()
            .max_by(|&(_, &a), &(_, &b)| response[a].total_cmp(&response[b]))
            .map(|(class, _)| class)
    }
}
