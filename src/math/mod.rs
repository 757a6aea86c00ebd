pub mod scalar;
pub mod triplet;
pub mod compressed;
