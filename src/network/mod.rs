pub mod hebbian;
pub mod params;

pub use hebbian::{Association, HebbianNetwork, Phase};
pub use params::NetworkParams;
