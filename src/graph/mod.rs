pub mod random_graph;

pub use random_graph::{Connectivity, GraphParams, RandomGraph};
