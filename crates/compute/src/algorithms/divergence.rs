use sdminer_core::{Itemset, MinerError, Monotonicity, NodeId, Result, Threshold};
use sdminer_graph::TemporalGraph;

use super::levelwise::Constraint;

/// Number of unordered node pairs in a set of `n` nodes.
pub fn pair_count(n: usize) -> usize {
    n * n.saturating_sub(1) / 2
}

/// Scores how stable the subgraph induced by a node set is over time.
///
/// For a node set `U` with `pairs = C(|U|, 2)`, every timestamp is classified
/// by the edge signature `U` induces there. With `H` the Shannon entropy (in
/// bits) of the signature frequencies, the divergence is `pairs - H`: a single
/// repeated pattern scores `pairs`, many equally likely patterns pull the
/// score towards 0.
#[derive(Debug, Clone, Copy)]
pub struct DivergenceOracle<'g> {
    graph: &'g TemporalGraph,
}

impl<'g> DivergenceOracle<'g> {
    pub fn new(graph: &'g TemporalGraph) -> Result<Self> {
        if graph.timestamp_count() == 0 {
            return Err(MinerError::Configuration(
                "temporal graph has no timestamps; divergence is undefined".to_string(),
            ));
        }
        Ok(Self { graph })
    }

    pub fn graph(&self) -> &'g TemporalGraph {
        self.graph
    }

    /// Entropy in bits of the induced-signature distribution of `nodes`.
    pub fn signature_entropy(&self, nodes: &[NodeId]) -> f64 {
        let total = self.graph.timestamp_count() as f64;
        self.graph
            .signature_distribution(nodes)
            .values()
            .map(|timestamps| {
                let p = timestamps.len() as f64 / total;
                -p * p.log2()
            })
            .sum()
    }

    /// Raw subgraph divergence, in `[0, pairs]`.
    pub fn divergence(&self, itemset: &Itemset<NodeId>) -> Result<f64> {
        let pairs = checked_pairs(itemset)?;
        Ok(pairs as f64 - self.signature_entropy(itemset.items()))
    }

    /// Divergence divided by the pair count; at most 1.
    pub fn scaled_divergence(&self, itemset: &Itemset<NodeId>) -> Result<f64> {
        let pairs = checked_pairs(itemset)?;
        Ok((pairs as f64 - self.signature_entropy(itemset.items())) / pairs as f64)
    }

    /// The score a threshold of this kind is compared against.
    pub fn score(&self, itemset: &Itemset<NodeId>, threshold: Threshold) -> Result<f64> {
        match threshold {
            Threshold::Scaled(_) => self.scaled_divergence(itemset),
            Threshold::Raw(_) => self.divergence(itemset),
        }
    }
}

fn checked_pairs(itemset: &Itemset<NodeId>) -> Result<usize> {
    if itemset.len() < 2 {
        return Err(MinerError::InvalidArgument(format!(
            "divergence needs at least 2 nodes, got {}",
            itemset.len()
        )));
    }
    Ok(pair_count(itemset.len()))
}

/// `divergence(U) <= threshold` as a search constraint.
///
/// Divergence is not provably anti-monotone; the tag is the caller's claim
/// and decides which strategies may run it.
#[derive(Debug, Clone, Copy)]
pub struct DivergenceConstraint<'g> {
    oracle: DivergenceOracle<'g>,
    threshold: Threshold,
    monotonicity: Monotonicity,
}

impl<'g> DivergenceConstraint<'g> {
    pub fn new(oracle: DivergenceOracle<'g>, threshold: Threshold, monotonicity: Monotonicity) -> Self {
        Self {
            oracle,
            threshold,
            monotonicity,
        }
    }

    pub fn threshold(&self) -> Threshold {
        self.threshold
    }
}

impl Constraint<NodeId> for DivergenceConstraint<'_> {
    fn monotonicity(&self) -> Monotonicity {
        self.monotonicity
    }

    fn holds(&self, itemset: &Itemset<NodeId>) -> Result<bool> {
        Ok(self.oracle.score(itemset, self.threshold)? <= self.threshold.value())
    }
}
