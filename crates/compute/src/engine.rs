use std::time::{Duration, Instant};

use sdminer_core::{
    Itemset, MinerConfig, MinerError, Monotonicity, NodeId, Result, Strategy, Threshold,
};
use sdminer_graph::TemporalGraph;
use tracing::info;

use crate::algorithms::divergence::{DivergenceConstraint, DivergenceOracle};
use crate::algorithms::levelwise::{LevelStats, LevelwiseSearch, SearchLimits, Truncation};
use crate::report::{self, HyperedgeRow};

/// Result of mining one temporal graph at one threshold.
#[derive(Debug, Clone)]
pub struct MiningRun {
    pub threshold: Threshold,
    pub strategy: Strategy,
    /// Whether `itemsets` holds only the maximal ones.
    pub maximal: bool,
    /// Ordered by size, then nodes.
    pub itemsets: Vec<Itemset<NodeId>>,
    pub levels: Vec<LevelStats>,
    pub truncation: Option<Truncation>,
    pub elapsed: Duration,
}

/// Rows found at one sigma of a sweep.
#[derive(Debug, Clone)]
pub struct SweepStep {
    pub sigma: f64,
    /// Ordered by scaled divergence.
    pub rows: Vec<HyperedgeRow>,
    pub truncation: Option<Truncation>,
}

/// Runs divergence-constrained searches on a dedicated worker pool.
pub struct MinerEngine {
    config: MinerConfig,
    pool: rayon::ThreadPool,
}

impl MinerEngine {
    pub fn new(config: MinerConfig) -> Result<Self> {
        config.validate()?;
        let threads = config.resolved_worker_threads();
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("sdminer-worker-{}", i))
            .build()
            .map_err(|e| MinerError::Configuration(format!("failed to build worker pool: {}", e)))?;
        info!(threads, "Miner engine ready");
        Ok(Self { config, pool })
    }

    pub fn config(&self) -> &MinerConfig {
        &self.config
    }

    /// The search the configuration describes.
    pub fn search(&self) -> LevelwiseSearch {
        LevelwiseSearch::new(self.config.strategy)
            .with_limits(SearchLimits {
                max_level: self.config.max_level,
                deadline: self.config.deadline(),
            })
            .with_parent_bookkeeping(self.config.parent_bookkeeping)
    }

    /// Mine at the configured threshold.
    pub fn mine(&self, graph: &TemporalGraph) -> Result<MiningRun> {
        self.mine_at(graph, self.config.threshold)
    }

    pub fn mine_at(&self, graph: &TemporalGraph, threshold: Threshold) -> Result<MiningRun> {
        let start = Instant::now();
        let oracle = DivergenceOracle::new(graph)?;
        let strategy = self.config.strategy;
        // The caller picked the strategy, so they vouch for the matching
        // growth behaviour of divergence.
        let constraint = DivergenceConstraint::new(oracle, threshold, assumed_monotonicity(strategy));
        let universe = graph.nodes();

        info!(
            %threshold,
            %strategy,
            nodes = universe.len(),
            timestamps = graph.timestamp_count(),
            "Mining unique communities"
        );

        let search = self.search();
        let outcome = self.pool.install(|| search.run(&constraint, &universe))?;

        let mut itemsets: Vec<Itemset<NodeId>> = if self.config.maximal {
            outcome.maximal().into_iter().collect()
        } else {
            outcome.output.into_iter().collect()
        };
        itemsets.sort_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)));

        let elapsed = start.elapsed();
        info!(
            %threshold,
            itemsets = itemsets.len(),
            maximal = self.config.maximal,
            "Mining done in {:.2}s",
            elapsed.as_secs_f64()
        );

        Ok(MiningRun {
            threshold,
            strategy,
            maximal: self.config.maximal,
            itemsets,
            levels: outcome.levels,
            truncation: outcome.truncation,
            elapsed,
        })
    }

    /// Score a run's itemsets for reporting, dropping small ones.
    pub fn rows(&self, graph: &TemporalGraph, run: &MiningRun) -> Result<Vec<HyperedgeRow>> {
        let oracle = DivergenceOracle::new(graph)?;
        let min_size = self.config.min_report_size;
        self.pool
            .install(|| report::hyperedge_rows(&run.itemsets, &oracle, min_size))
    }

    /// Mine at every sigma in turn.
    pub fn sweep(&self, graph: &TemporalGraph, sigmas: &[f64]) -> Result<Vec<SweepStep>> {
        let mut steps = Vec::with_capacity(sigmas.len());
        for &sigma in sigmas {
            let threshold = Threshold::Scaled(sigma);
            if !sigma.is_finite() || sigma < 0.0 {
                return Err(MinerError::Configuration(format!(
                    "sweep threshold must be a non-negative number, got {}",
                    threshold
                )));
            }
            let run = self.mine_at(graph, threshold)?;
            let mut rows = self.rows(graph, &run)?;
            report::sort_by_divergence(&mut rows);
            info!(sigma, rows = rows.len(), "Found {}-sigma hyperedges", sigma);
            steps.push(SweepStep {
                sigma,
                rows,
                truncation: run.truncation,
            });
        }
        Ok(steps)
    }
}

fn assumed_monotonicity(strategy: Strategy) -> Monotonicity {
    match strategy {
        Strategy::AntiMonotone => Monotonicity::AntiMonotone,
        Strategy::LooselyAntiMonotone => Monotonicity::LooselyAntiMonotone,
    }
}
