use std::fmt;

use tracing::debug;

use crate::error::ConfigError;
use crate::math::compressed::CompressedMatrix;
use crate::math::scalar::Scalar;
use crate::math::triplet::TripletMatrix;
use crate::network::params::NetworkParams;

/// `(neuron, activation)` pair supplied for one batch slot.
pub type Association<T> = (usize, T);

/// Where a network is inside one training step.
///
/// A step always runs `apply_associations → compute_pairings →
/// update_synapses`; `cull` may only run between steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Associated,
    Paired,
}

/// Sparse associative memory trained by a local Hebbian rule.
///
/// Synapse `(r, c)` carries signal from presynaptic neuron `c` into
/// postsynaptic neuron `r`, so `apply_input` is a plain `synapses * input`.
/// `pairings` always shares the synapse sparsity pattern.
#[derive(Debug, Clone)]
pub struct HebbianNetwork<T> {
    name: String,
    num_neurons: usize,
    batch_size: usize,
    learn_rate: T,
    cull_threshold: T,
    synapses: CompressedMatrix<T>,
    pairings: CompressedMatrix<T>,
    activations_pre: Vec<Vec<T>>,
    activations_post: Vec<Vec<T>>,
    phase: Phase,
}

impl<T: Scalar> HebbianNetwork<T> {
    /// Builds the synapse matrix from `params.synapses` (duplicates summed)
    /// and a zero pairings matrix with the same pattern.
    ///
    /// # Panics
    /// Panics if a synapse names a neuron `>= num_neurons`.
    pub fn new(params: NetworkParams<T>) -> Result<HebbianNetwork<T>, ConfigError> {
        params.validate()?;

        let n = params.num_neurons;
        let synapses = TripletMatrix::from_entries(n, n, params.name.clone(), params.synapses).to_compressed();
        let pairings = synapses.zeroed_like(format!("{} pairings", params.name));

        debug!(name = %params.name, neurons = n, synapses = synapses.nnz(), "built hebbian network");

        Ok(HebbianNetwork {
            name: params.name,
            num_neurons: n,
            batch_size: params.batch_size,
            learn_rate: params.learn_rate,
            cull_threshold: params.cull_threshold,
            synapses,
            pairings,
            activations_pre: vec![vec![T::zero(); n]; params.batch_size],
            activations_post: vec![vec![T::zero(); n]; params.batch_size],
            phase: Phase::Idle,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn num_neurons(&self) -> usize {
        self.num_neurons
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn learn_rate(&self) -> T {
        self.learn_rate
    }

    pub fn cull_threshold(&self) -> T {
        self.cull_threshold
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn synapses(&self) -> &CompressedMatrix<T> {
        &self.synapses
    }

    pub fn pairings(&self) -> &CompressedMatrix<T> {
        &self.pairings
    }

    pub fn num_synapses(&self) -> usize {
        self.synapses.nnz()
    }

    /// Presynaptic activations recorded for batch slot `b`.
    pub fn activations_pre(&self, b: usize) -> &[T] {
        &self.activations_pre[b]
    }

    /// Postsynaptic activations recorded for batch slot `b`.
    pub fn activations_post(&self, b: usize) -> &[T] {
        &self.activations_post[b]
    }

    /// Records one batch of associations.
    ///
    /// Every slot is cleared, then slot `b` receives `pre[b]` as presynaptic
    /// and `post[b]` as postsynaptic activations. Slots past `pre.len()` stay
    /// zero, so a short final batch contributes nothing for the missing
    /// samples.
    ///
    /// # Panics
    /// Panics if `pre` and `post` differ in length, hold more than
    /// `batch_size` slots, or name a neuron `>= num_neurons`.
    pub fn apply_associations(&mut self, pre: &[Vec<Association<T>>], post: &[Vec<Association<T>>]) {
        assert_eq!(pre.len(), post.len(), "presynaptic and postsynaptic batches differ in length");
        assert!(
            pre.len() <= self.batch_size,
            "batch of {} associations exceeds batch size {}",
            pre.len(),
            self.batch_size
        );

        for b in 0..self.batch_size {
            self.activations_pre[b].fill(T::zero());
            self.activations_post[b].fill(T::zero());
        }

        for (b, (pre_slot, post_slot)) in pre.iter().zip(post).enumerate() {
            for &(neuron, value) in pre_slot {
                self.check_neuron(neuron);
                self.activations_pre[b][neuron] = value;
            }
            for &(neuron, value) in post_slot {
                self.check_neuron(neuron);
                self.activations_post[b][neuron] = value;
            }
        }

        self.phase = Phase::Associated;
    }

    /// Averages `post[r] * pre[c]` over the batch for every synapse `(r, c)`.
    ///
    /// # Panics
    /// Panics unless associations were applied since the last update.
    pub fn compute_pairings(&mut self) {
        self.expect_phase(Phase::Associated, "compute_pairings");

        if !self.pairings.same_pattern(&self.synapses) {
            self.pairings = self.synapses.zeroed_like(format!("{} pairings", self.name));
        }

        let batch = T::from_count(self.batch_size);
        let cols = self.synapses.col_indices();
        let pairings = self.pairings.values_mut();

        for r in 0..self.synapses.rows() {
            for i in self.synapses.row_range(r) {
                let c = cols[i];
                let total: T = self
                    .activations_post
                    .iter()
                    .zip(&self.activations_pre)
                    .map(|(post, pre)| post[r] * pre[c])
                    .sum();
                pairings[i] = total / batch;
            }
        }

        self.phase = Phase::Paired;
    }

    /// Adds `learn_rate * pairing` to every synapse, then rescales each
    /// neuron's incoming weights to unit L2 norm.
    ///
    /// All weights are updated before any row is normalized. A neuron whose
    /// incoming weights sum to zero norm is left untouched.
    ///
    /// # Panics
    /// Panics unless `compute_pairings` ran since the last association.
    pub fn update_synapses(&mut self) {
        self.expect_phase(Phase::Paired, "update_synapses");

        let rows = self.synapses.rows();
        let mut norms = vec![T::zero(); rows];

        for r in 0..rows {
            let range = self.synapses.row_range(r);
            let pairings = &self.pairings.values()[range.clone()];
            let weights = &mut self.synapses.values_mut()[range];
            for (w, &p) in weights.iter_mut().zip(pairings) {
                *w = *w + self.learn_rate * p;
                norms[r] += *w * *w;
            }
        }

        for (r, norm) in norms.into_iter().enumerate() {
            let norm = norm.sqrt();
            if norm == T::zero() {
                continue;
            }
            let range = self.synapses.row_range(r);
            for w in &mut self.synapses.values_mut()[range] {
                *w = *w / norm;
            }
        }

        self.phase = Phase::Idle;
    }

    /// Runs one full training step for a batch of associations.
    pub fn train_step(&mut self, pre: &[Vec<Association<T>>], post: &[Vec<Association<T>>]) {
        self.apply_associations(pre, post);
        self.compute_pairings();
        self.update_synapses();
    }

    /// Drops every synapse with `|w| < cull_threshold` and rebuilds pairings
    /// for the smaller pattern. Returns the number of synapses removed.
    ///
    /// # Panics
    /// Panics if called in the middle of a training step.
    pub fn cull(&mut self) -> usize {
        self.expect_phase(Phase::Idle, "cull");

        let before = self.synapses.nnz();
        let threshold = self.cull_threshold;
        let kept = self.synapses.entries().filter(|e| e.value.abs() >= threshold);
        self.synapses =
            TripletMatrix::from_entries(self.num_neurons, self.num_neurons, self.name.clone(), kept).to_compressed();
        self.pairings = self.synapses.zeroed_like(format!("{} pairings", self.name));

        let removed = before - self.synapses.nnz();
        debug!(name = %self.name, removed, remaining = self.synapses.nnz(), "culled synapses");
        removed
    }

    /// Response of the network to `input`: `synapses * input`.
    ///
    /// # Panics
    /// Panics if `input.len() != num_neurons`.
    pub fn apply_input(&self, input: &[T]) -> Vec<T> {
        self.synapses.multiply(input)
    }

    /// Renders the synapse matrix; with `all == false` output is truncated.
    pub fn dump(&self, all: bool) -> String {
        self.synapses.dump(all)
    }

    fn check_neuron(&self, neuron: usize) {
        assert!(
            neuron < self.num_neurons,
            "neuron {} is out of range for network '{}' with {} neurons",
            neuron,
            self.name,
            self.num_neurons
        );
    }

    fn expect_phase(&self, expected: Phase, op: &str) {
        assert!(
            self.phase == expected,
            "{} called on network '{}' in phase {:?}, expected {:?}",
            op,
            self.name,
            self.phase,
            expected
        );
    }
}

impl<T: Scalar> fmt::Display for HebbianNetwork<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.synapses, f)
    }
}
