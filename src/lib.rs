pub mod error;
pub mod math;
pub mod graph;
pub mod network;
pub mod data;
pub mod train;
pub mod problems;

// Convenience re-exports
pub use error::{ConfigError, DataError};
pub use math::scalar::Scalar;
pub use math::triplet::{Triplet, TripletMatrix};
pub use math::compressed::{format_vector, CompressedMatrix};
pub use graph::random_graph::{Connectivity, GraphParams, RandomGraph};
pub use network::hebbian::{Association, HebbianNetwork, Phase};
pub use network::params::NetworkParams;
pub use data::dataset::{Dataset, InMemoryDataset};
pub use train::settings::TrainSettings;
pub use train::train_config::TrainConfig;
pub use train::loop_fn::{evaluate, train_loop};
