pub mod algorithms;
pub mod engine;
pub mod report;

pub use algorithms::divergence::{pair_count, DivergenceConstraint, DivergenceOracle};
pub use algorithms::levelwise::{
    freq_itemsets, maximal_freq_itemsets, CandidateGenerator, Constraint, FnConstraint,
    LevelwiseSearch, SearchLimits, SearchOutcome,
};
pub use engine::{MinerEngine, MiningRun};
pub use report::HyperedgeRow;
