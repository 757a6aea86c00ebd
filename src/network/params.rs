use crate::error::ConfigError;
use crate::math::scalar::Scalar;
use crate::math::triplet::Triplet;

/// Everything needed to build a [`HebbianNetwork`](crate::network::HebbianNetwork).
///
/// Fields:
/// - `name`          : label used when printing the synapse matrix
/// - `num_neurons`   : synapse matrix is `num_neurons x num_neurons`
/// - `batch_size`    : association slots per training batch
/// - `learn_rate`    : scale applied to each pairing before it is added to its synapse
/// - `cull_threshold`: synapses with `|w| < cull_threshold` are dropped by `cull`
/// - `synapses`      : initial `(post, pre, weight)` entries; duplicates are summed
#[derive(Debug, Clone)]
pub struct NetworkParams<T> {
    pub name: String,
    pub num_neurons: usize,
    pub batch_size: usize,
    pub learn_rate: T,
    pub cull_threshold: T,
    pub synapses: Vec<Triplet<T>>,
}

impl<T: Scalar> NetworkParams<T> {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_neurons == 0 {
            return Err(ConfigError::Zero { field: "numNeurons" });
        }
        if self.batch_size == 0 {
            return Err(ConfigError::Zero { field: "batchSize" });
        }
        check_rate("learnRate", self.learn_rate)?;
        check_rate("cullThresh", self.cull_threshold)?;
        Ok(())
    }
}

fn check_rate<T: Scalar>(field: &'static str, value: T) -> Result<(), ConfigError> {
    if value.is_finite() && value >= T::zero() {
        Ok(())
    } else {
        Err(ConfigError::InvalidRate { field, value: value.to_f64().unwrap_or(f64::NAN) })
    }
}
