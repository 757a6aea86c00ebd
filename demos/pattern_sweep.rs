/// Parameter sweep over random-graph networks on a synthetic task.
///
/// Four classes, each a fixed 8-pixel pattern with random noise added.
/// Every configuration of the grid trains its own network on its own
/// worker thread; results are printed in job order.
///
/// Run with:
///   cargo run --example pattern_sweep --release
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use ferrite_ftwt::train::{run_sweep, SweepGrid};
use ferrite_ftwt::{InMemoryDataset, TrainSettings};

const INPUT_SIZE: usize = 8;
const N_CLASSES: usize = 4;

fn noisy_patterns(n: usize, rng: &mut StdRng) -> anyhow::Result<InMemoryDataset> {
    let mut inputs = Vec::with_capacity(n);
    let mut labels = Vec::with_capacity(n);
    for i in 0..n {
        let class = i % N_CLASSES;
        let input: Vec<f64> = (0..INPUT_SIZE)
            .map(|px| {
                let on = px / 2 == class;
                let base = if on { 1.0 } else { 0.0 };
                (base + rng.gen_range(-0.1..0.1_f64)).clamp(0.0, 1.0)
            })
            .collect();
        inputs.push(input);
        labels.push(class);
    }
    Ok(InMemoryDataset::new(inputs, labels, N_CLASSES)?)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().init();

    let mut rng = StdRng::seed_from_u64(7);
    let train = noisy_patterns(400, &mut rng)?;
    let test = noisy_patterns(100, &mut rng)?;

    let grid = SweepGrid {
        base: TrainSettings {
            min_verts: 16,
            max_verts: 24,
            min_edge_weight: 0.01,
            max_edge_weight: 1.0,
            ..TrainSettings::default()
        },
        num_iterations: vec![1, 3],
        batch_sizes: vec![10, 50],
        edge_probabilities: vec![0.3, 0.7],
        learn_rates: vec![0.01, 0.1],
    };

    let results = run_sweep(grid.expand(), &train, &test, N_CLASSES, 4, 42);
    for outcome in results {
        match outcome {
            Ok(r) => println!(
                "iters={} batch={} p={} lr={} -> neurons={} synapses={} accuracy={:.1}% ({:.3}s)",
                r.settings.num_iterations, r.settings.batch_size, r.settings.edge_probability,
                r.settings.learn_rate, r.neurons, r.synapses, r.accuracy * 100.0, r.train_secs,
            ),
            Err(e) => println!("rejected: {e}"),
        }
    }
    Ok(())
}
