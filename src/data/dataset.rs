use crate::error::DataError;

/// Indexed `(input, label)` samples.
///
/// Training and evaluation only need positional access; `Sync` lets a sweep
/// share one dataset across worker threads.
pub trait Dataset: Sync {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Length of every input vector.
    fn input_size(&self) -> usize;

    fn input(&self, index: usize) -> &[f64];

    /// Class index of sample `index`.
    fn label(&self, index: usize) -> usize;
}

/// Samples held in memory, e.g. a parsed MNIST file pair.
#[derive(Debug, Clone)]
pub struct InMemoryDataset {
    inputs: Vec<Vec<f64>>,
    labels: Vec<usize>,
    input_size: usize,
    n_classes: usize,
}

impl InMemoryDataset {
    /// Validates that every input has the same length and every label is
    /// below `n_classes`.
    pub fn new(inputs: Vec<Vec<f64>>, labels: Vec<usize>, n_classes: usize) -> Result<InMemoryDataset, DataError> {
        if inputs.len() != labels.len() {
            return Err(DataError::LengthMismatch { inputs: inputs.len(), labels: labels.len() });
        }

        let input_size = inputs.first().map(Vec::len).unwrap_or(0);
        if let Some((index, bad)) = inputs.iter().enumerate().find(|(_, v)| v.len() != input_size) {
            return Err(DataError::RaggedInput { index, expected: input_size, actual: bad.len() });
        }
        if let Some((index, &label)) = labels.iter().enumerate().find(|&(_, &l)| l >= n_classes) {
            return Err(DataError::LabelOutOfRange { index, label, n_classes });
        }

        Ok(InMemoryDataset { inputs, labels, input_size, n_classes })
    }

    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    /// First `n` samples (or all of them if there are fewer).
    pub fn truncated(&self, n: usize) -> InMemoryDataset {
        let n = n.min(self.inputs.len());
        InMemoryDataset {
            inputs: self.inputs[..n].to_vec(),
            labels: self.labels[..n].to_vec(),
            input_size: self.input_size,
            n_classes: self.n_classes,
        }
    }
}

impl Dataset for InMemoryDataset {
    fn len(&self) -> usize {
        self.inputs.len()
    }

    fn input_size(&self) -> usize {
        self.input_size
    }

    fn input(&self, index: usize) -> &[f64] {
        &self.inputs[index]
    }

    fn label(&self, index: usize) -> usize {
        self.labels[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_ragged_inputs() {
        let err = InMemoryDataset::new(vec![vec![0.0; 3], vec![0.0; 2]], vec![0, 1], 2).unwrap_err();
        assert!(matches!(err, DataError::RaggedInput { index: 1, expected: 3, actual: 2 }));
    }

    #[test]
    fn rejects_label_beyond_classes() {
        let err = InMemoryDataset::new(vec![vec![1.0]], vec![4], 4).unwrap_err();
        assert!(matches!(err, DataError::LabelOutOfRange { index: 0, label: 4, n_classes: 4 }));
    }

    #[test]
    fn truncated_keeps_prefix() {
        let ds = InMemoryDataset::new(vec![vec![1.0], vec![2.0], vec![3.0]], vec![0, 1, 0], 2).unwrap();
        let head = ds.truncated(2);
        assert_eq!(head.len(), 2);
        assert_eq!(head.input(1), &[2.0]);
        assert_eq!(ds.truncated(10).len(), 3);
    }
}
