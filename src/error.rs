use thiserror::Error;

/// A configuration the caller supplied cannot produce a valid graph,
/// network, or training run.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("maxVerts ({max}) is smaller than minVerts ({min})")]
    VertexRange { min: usize, max: usize },

    #[error("a graph needs at least one vertex")]
    EmptyGraph,

    #[error("edge probability {0} is outside [0, 1]")]
    EdgeProbability(f64),

    #[error("edge weight range [{min}, {max}] is empty or not finite")]
    EdgeWeightRange { min: f64, max: f64 },

    #[error("{field} must be at least 1")]
    Zero { field: &'static str },

    #[error("{field} must be a finite, non-negative number (got {value})")]
    InvalidRate { field: &'static str, value: f64 },

    #[error("{needed} neurons are required for inputs and outputs but the network has {available}")]
    TooFewNeurons { needed: usize, available: usize },

    #[error("sample {index} has label {label} but only {n_classes} output classes are mapped")]
    UnknownClass { index: usize, label: usize, n_classes: usize },
}

/// Dataset files or in-memory samples are malformed.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("IDX {kind} file: {reason}")]
    Idx { kind: &'static str, reason: String },

    #[error("dataset has {inputs} inputs but {labels} labels")]
    LengthMismatch { inputs: usize, labels: usize },

    #[error("sample {index} has {actual} values, expected {expected}")]
    RaggedInput { index: usize, expected: usize, actual: usize },

    #[error("label {label} at index {index} is out of range for {n_classes} classes")]
    LabelOutOfRange { index: usize, label: usize, n_classes: usize },
}
