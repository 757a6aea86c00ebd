pub mod epoch_stats;
pub mod loop_fn;
pub mod neuron_map;
pub mod settings;
pub mod sweep;
pub mod train_config;

pub use epoch_stats::EpochStats;
pub use loop_fn::{check_labels, evaluate, train_loop};
pub use neuron_map::NeuronMap;
pub use settings::TrainSettings;
pub use sweep::{run_configuration, run_sweep, SweepGrid, SweepResult};
pub use train_config::TrainConfig;
