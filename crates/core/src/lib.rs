pub mod config;
pub mod error;
pub mod itemset;
pub mod mining;
pub mod record;

pub use config::MinerConfig;
pub use error::*;
pub use itemset::Itemset;
pub use mining::*;
pub use record::*;
