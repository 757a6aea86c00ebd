use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::data::dataset::Dataset;
use crate::error::ConfigError;
use crate::graph::random_graph::RandomGraph;
use crate::network::hebbian::HebbianNetwork;
use crate::network::params::NetworkParams;
use crate::train::loop_fn::{check_labels, evaluate, train_loop};
use crate::train::neuron_map::NeuronMap;
use crate::train::settings::TrainSettings;
use crate::train::train_config::TrainConfig;

/// Cartesian grid of training settings.
///
/// Every combination of the four swept lists is applied on top of `base`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepGrid {
    pub base: TrainSettings,
    pub num_iterations: Vec<usize>,
    pub batch_sizes: Vec<usize>,
    pub edge_probabilities: Vec<f64>,
    pub learn_rates: Vec<f64>,
}

impl Default for SweepGrid {
    fn default() -> Self {
        SweepGrid {
            base: TrainSettings::default(),
            num_iterations: vec![1, 3, 5],
            batch_sizes: vec![10, 100, 500],
            edge_probabilities: vec![0.1, 0.3, 0.5, 0.7],
            learn_rates: vec![0.001, 0.01, 0.1, 1.0],
        }
    }
}

impl SweepGrid {
    pub fn expand(&self) -> Vec<TrainSettings> {
        let mut jobs = Vec::with_capacity(
            self.num_iterations.len() * self.batch_sizes.len() * self.edge_probabilities.len() * self.learn_rates.len(),
        );
        for &num_iterations in &self.num_iterations {
            for &batch_size in &self.batch_sizes {
                for &edge_probability in &self.edge_probabilities {
                    for &learn_rate in &self.learn_rates {
                        jobs.push(TrainSettings {
                            num_iterations,
                            batch_size,
                            edge_probability,
                            learn_rate,
                            ..self.base.clone()
                        });
                    }
                }
            }
        }
        jobs
    }
}

/// Outcome of training and testing one configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepResult {
    /// Position of the configuration in the submitted job list.
    pub job: usize,
    pub settings: TrainSettings,
    /// Vertices in the generated graph.
    pub neurons: usize,
    /// Synapses left after training.
    pub synapses: usize,
    pub train_secs: f64,
    /// Test-set accuracy as a fraction in [0, 1].
    pub accuracy: f64,
}

/// Generates a random graph, trains a network on it and scores it on `test`.
///
/// All randomness comes from a generator seeded with `seed + job`, so a job
/// reproduces exactly no matter which worker runs it. A label outside
/// `0..n_classes` in either dataset rejects the job before any training.
pub fn run_configuration<D: Dataset + ?Sized>(
    job: usize,
    settings: &TrainSettings,
    train: &D,
    test: &D,
    n_classes: usize,
    seed: u64,
) -> Result<SweepResult, ConfigError> {
    settings.validate()?;
    check_labels(train, n_classes)?;
    check_labels(test, n_classes)?;
    let mut rng = StdRng::seed_from_u64(seed.wrapping_add(job as u64));

    let graph = RandomGraph::generate(settings.graph_params(), &mut rng)?;
    let map = NeuronMap::random(graph.num_verts(), train.input_size(), n_classes, &mut rng)?;
    let mut network = HebbianNetwork::new(NetworkParams {
        name: format!("random net {}", job),
        num_neurons: graph.num_verts(),
        batch_size: settings.batch_size,
        learn_rate: settings.learn_rate,
        cull_threshold: settings.cull_thresh,
        synapses: graph.edges(),
    })?;

    let t_start = Instant::now();
    train_loop(&mut network, train, &map, &TrainConfig::from_settings(settings));
    let train_secs = t_start.elapsed().as_secs_f64();

    Ok(SweepResult {
        job,
        settings: settings.clone(),
        neurons: graph.num_verts(),
        synapses: network.num_synapses(),
        train_secs,
        accuracy: evaluate(&network, test, &map),
    })
}

/// Runs every configuration in `jobs` on a fixed pool of `workers` threads.
///
/// Jobs flow to the workers through a bounded channel and results come back
/// on a second one. Each worker owns its graph, network and batch buffers for
/// the length of a job. The returned list is in job order.
pub fn run_sweep<D: Dataset + ?Sized>(
    jobs: Vec<TrainSettings>,
    train: &D,
    test: &D,
    n_classes: usize,
    workers: usize,
    seed: u64,
) -> Vec<Result<SweepResult, ConfigError>> {
    let total = jobs.len();
    let workers = workers.clamp(1, total.max(1));
    info!(jobs = total, workers, "beginning parameter sweep");

    let (job_tx, job_rx) = mpsc::sync_channel::<(usize, TrainSettings)>(workers);
    // Shared by the workers only, so the producer sees a closed channel if they all exit.
    let job_rx = Arc::new(Mutex::new(job_rx));
    let (result_tx, result_rx) = mpsc::channel();

    thread::scope(|s| {
        for worker in 0..workers {
            let job_rx = Arc::clone(&job_rx);
            let result_tx = result_tx.clone();
            s.spawn(move || loop {
                let next = match job_rx.lock() {
                    Ok(rx) => rx.recv().ok(),
                    Err(_) => None,
                };
                let Some((job, settings)) = next else {
                    break;
                };

                debug!(worker, job, "training configuration");
                let outcome = run_configuration(job, &settings, train, test, n_classes, seed);
                match &outcome {
                    Ok(r) => info!(job, accuracy = r.accuracy, train_secs = r.train_secs, "job finished"),
                    Err(e) => warn!(job, error = %e, "job rejected"),
                }
                if result_tx.send((job, outcome)).is_err() {
                    break;
                }
            });
        }
        drop(job_rx);
        drop(result_tx);

        for job in jobs.into_iter().enumerate() {
            if job_tx.send(job).is_err() {
                break;
            }
        }
        drop(job_tx);
    });

    let mut results: Vec<(usize, Result<SweepResult, ConfigError>)> = result_rx.into_iter().collect();
    results.sort_by_key(|(job, _)| *job);
    results.into_iter().map(|(_, outcome)| outcome).collect()
}
