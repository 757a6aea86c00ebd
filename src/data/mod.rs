pub mod dataset;
pub mod idx;

pub use dataset::{Dataset, InMemoryDataset};
pub use idx::{load_idx_pair, parse_idx_pair};
