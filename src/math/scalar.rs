use std::fmt::{Debug, Display};
use std::iter::Sum;
use std::ops::AddAssign;

use num_traits::{Float, NumCast};

/// Value type stored in sparse matrices and synapses.
///
/// Blanket-implemented for every float that supports in-place accumulation,
/// so `f32` and `f64` both qualify.
pub trait Scalar: Float + AddAssign + Sum + Debug + Display + Send + Sync + 'static {
    /// Converts a count (e.g. a batch size) into the value type.
    fn from_count(n: usize) -> Self {
        // usize -> float never fails for f32/f64; NaN poisons the result if a
        // custom float ever refuses.
        <Self as NumCast>::from(n).unwrap_or_else(Self::nan)
    }
}

impl<T> Scalar for T where T: Float + AddAssign + Sum + Debug + Display + Send + Sync + 'static {}
