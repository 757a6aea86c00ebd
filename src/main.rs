use anyhow::{bail, Context};
use tracing_subscriber::EnvFilter;

use ferrite_ftwt::problems::{mnist, simple_cross, PROBLEMS};
use ferrite_ftwt::train::{run_sweep, SweepGrid};
use ferrite_ftwt::{format_vector, TrainSettings};

// Usage:
//   ferrite-ftwt simple-cross
//   ferrite-ftwt mnist      <mnist-dir> [settings.json] [--max-samples N]
//   ferrite-ftwt mnist-rand <mnist-dir> [settings.json] [--max-samples N]
// mnist-rand without a settings file sweeps the default grid.
// --max-samples keeps only the first N training and test images.
fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let max_samples = take_max_samples(&mut args)?;
    let Some(problem) = args.first() else {
        println!("Please specify a problem name\n");
        list_problems();
        return Ok(());
    };

    match problem.as_str() {
        "simple-cross" => {
            let result = simple_cross::run(10)?;
            println!("{}", result.network);
            print!("{}", format_vector(&result.from_first, true));
            print!("{}", format_vector(&result.from_second, true));
            println!("crossed: {}", result.crossed());
        }
        "mnist" => {
            let (train, test) = mnist::load(data_dir(&args)?, max_samples)?;
            let settings = settings_arg(&args)?.unwrap_or(mnist::FIXED_SETTINGS);
            let accuracy = mnist::run_fixed(&train, &test, &settings, rand::random())?;
            println!("NN test accuracy = {:.2}%", accuracy * 100.0);
        }
        "mnist-rand" => {
            let (train, test) = mnist::load(data_dir(&args)?, max_samples)?;
            let jobs = match settings_arg(&args)? {
                Some(settings) => vec![settings],
                None => SweepGrid::default().expand(),
            };
            let workers = std::thread::available_parallelism().map(|n| n.get()).unwrap_or(4);
            let seed: u64 = rand::random();
            tracing::info!(seed, "sweep seed");

            for outcome in run_sweep(jobs, &train, &test, mnist::OUTPUT_SIZE, workers, seed) {
                match outcome {
                    Ok(result) => println!("{}", serde_json::to_string_pretty(&result)?),
                    Err(e) => println!("rejected configuration: {}", e),
                }
            }
        }
        other => {
            println!("Invalid problem specified: {}\n", other);
            list_problems();
        }
    }

    Ok(())
}

fn list_problems() {
    println!("Available problems:\n");
    for (name, desc) in PROBLEMS {
        println!("{}: {}", name, desc);
    }
}

fn data_dir(args: &[String]) -> anyhow::Result<&str> {
    match args.get(1) {
        Some(dir) => Ok(dir.as_str()),
        None => bail!("{} needs the MNIST data directory as its first argument", args[0]),
    }
}

/// Removes `--max-samples N` from `args`, returning `N` if present.
fn take_max_samples(args: &mut Vec<String>) -> anyhow::Result<Option<usize>> {
    let Some(pos) = args.iter().position(|a| a == "--max-samples") else {
        return Ok(None);
    };
    let Some(value) = args.get(pos + 1) else {
        bail!("--max-samples needs a value");
    };
    let n = value
        .parse::<usize>()
        .with_context(|| format!("--max-samples expects a count, got {}", value))?;
    args.drain(pos..pos + 2);
    Ok(Some(n))
}

fn settings_arg(args: &[String]) -> anyhow::Result<Option<TrainSettings>> {
    let Some(path) = args.get(2) else {
        return Ok(None);
    };
    let settings = TrainSettings::load_json(path).with_context(|| format!("reading settings from {}", path))?;
    settings.validate()?;
    Ok(Some(settings))
}
