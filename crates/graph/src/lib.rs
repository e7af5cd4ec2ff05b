pub mod loader;
pub mod store;

pub use loader::{load_tsv, parse_tsv};
pub use store::{GraphStats, Signature, Snapshot, TemporalGraph};
