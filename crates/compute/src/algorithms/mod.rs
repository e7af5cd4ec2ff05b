pub mod divergence;
pub mod levelwise;
