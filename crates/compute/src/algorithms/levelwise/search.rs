use std::collections::{HashMap, HashSet};
use std::time::Instant;

use rayon::prelude::*;
use sdminer_core::{Itemset, MinerError, ParentBookkeeping, Result, Strategy, TruncationReason};
use tracing::{debug, info, warn};

use super::candidates::{AntiMonotoneGenerator, CandidateGenerator, LooselyAntiMonotoneGenerator};
use super::constraint::Constraint;
use super::types::{
    Candidates, Cutoff, Item, LevelStats, SearchLimits, SearchOutcome, SupportMap, Truncation,
};

/// Level-by-level search for all itemsets satisfying a constraint.
///
/// Level 2 is seeded with every pair of universe items that satisfies the
/// constraint. Each further level is produced by the configured generator
/// from the complete previous level, so levels never overlap.
#[derive(Debug, Clone, Copy, Default)]
pub struct LevelwiseSearch {
    strategy: Strategy,
    limits: SearchLimits,
    bookkeeping: ParentBookkeeping,
}

impl LevelwiseSearch {
    pub fn new(strategy: Strategy) -> Self {
        Self {
            strategy,
            ..Default::default()
        }
    }

    pub fn with_limits(mut self, limits: SearchLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_parent_bookkeeping(mut self, bookkeeping: ParentBookkeeping) -> Self {
        self.bookkeeping = bookkeeping;
        self
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    fn generator<I: Item>(&self) -> Box<dyn CandidateGenerator<I>> {
        match self.strategy {
            Strategy::AntiMonotone => Box::new(AntiMonotoneGenerator),
            Strategy::LooselyAntiMonotone => {
                Box::new(LooselyAntiMonotoneGenerator::new(self.bookkeeping))
            }
        }
    }

    /// Run the search. Parallel work runs on the current rayon pool.
    pub fn run<I: Item>(&self, constraint: &dyn Constraint<I>, universe: &[I]) -> Result<SearchOutcome<I>> {
        let monotonicity = constraint.monotonicity();
        if !self.strategy.accepts(monotonicity) {
            return Err(MinerError::StrategyMismatch {
                strategy: self.strategy,
                monotonicity,
            });
        }

        if let Some(max_level) = self.limits.max_level {
            if max_level < 2 {
                return Err(MinerError::Configuration(format!(
                    "max_level must be at least 2, got {}",
                    max_level
                )));
            }
        }

        let start = Instant::now();
        let cutoff = match self.limits.deadline {
            Some(budget) => Cutoff::after(start, budget),
            None => Cutoff::none(),
        };
        let generator = self.generator::<I>();
        let universe = canonical_universe(universe);

        info!(
            strategy = generator.name(),
            universe = universe.len(),
            "Starting levelwise search"
        );

        let mut output: HashSet<Itemset<I>> = HashSet::new();
        let mut deleted: HashSet<Itemset<I>> = HashSet::new();
        let mut levels = Vec::new();
        let mut truncation = None;

        let mut level = 2;
        let mut current = seed_pairs(&universe, constraint)?;
        // The seed level always completes and has no parents.
        let mut support: SupportMap<I> = HashMap::new();

        while !current.is_empty() {
            let level_start = Instant::now();
            let deleted_before = deleted.len();
            for itemset in &current {
                if let Some(parents) = support.get(itemset) {
                    deleted.extend(parents.iter().cloned());
                }
                output.insert(itemset.clone());
            }

            let stats = LevelStats {
                level,
                accepted: current.len(),
                parents_deleted: deleted.len() - deleted_before,
                elapsed: level_start.elapsed(),
            };
            info!(
                level,
                accepted = stats.accepted,
                deleted = stats.parents_deleted,
                total = output.len(),
                "Level complete"
            );
            levels.push(stats);

            let cap = self.limits.max_level.filter(|&max| level >= max);
            if !may_extend(self.strategy, level, current.len(), universe.len()) {
                break;
            }

            // At the cap the next level is still built, but only to learn
            // whether anything was left unexplored. A passed deadline
            // surfaces here as `Truncated`.
            let next: Candidates<I> = match generator.generate(&current, constraint, &universe, &cutoff) {
                Ok(next) => next,
                Err(MinerError::Truncated { level, reason }) => {
                    truncation = Some(Truncation { level, reason });
                    break;
                }
                Err(e) => return Err(e),
            };
            if let Some(max_level) = cap {
                if !next.itemsets.is_empty() {
                    truncation = Some(Truncation {
                        level,
                        reason: TruncationReason::MaxLevel(max_level),
                    });
                }
                break;
            }
            current = next.itemsets;
            support = next.support;
            level += 1;
        }

        if let Some(Truncation { level, reason }) = truncation {
            warn!(level, %reason, "Levelwise search truncated");
        }

        info!(
            itemsets = output.len(),
            deleted = deleted.len(),
            levels = levels.len(),
            truncated = truncation.is_some(),
            "Levelwise search done in {:.2}s",
            start.elapsed().as_secs_f64()
        );

        Ok(SearchOutcome {
            output,
            deleted,
            levels,
            truncation,
        })
    }
}

/// Whether a level of `accepted` itemsets of size `level` can have a
/// non-empty successor. An anti-monotone join needs `level + 1` accepted
/// subsets for every candidate.
fn may_extend(strategy: Strategy, level: usize, accepted: usize, universe: usize) -> bool {
    if accepted == 0 || level >= universe {
        return false;
    }
    match strategy {
        Strategy::AntiMonotone => accepted > level,
        Strategy::LooselyAntiMonotone => true,
    }
}

fn canonical_universe<I: Item>(universe: &[I]) -> Vec<I> {
    let mut universe = universe.to_vec();
    universe.sort_unstable();
    universe.dedup();
    universe
}

/// All pairs of universe items that satisfy the constraint, sorted.
fn seed_pairs<I: Item>(universe: &[I], constraint: &dyn Constraint<I>) -> Result<Vec<Itemset<I>>> {
    let n = universe.len();
    let checked: Vec<Option<Itemset<I>>> = (0..n)
        .into_par_iter()
        .flat_map_iter(|i| {
            (i + 1..n).map(move |j| Itemset::pair(universe[i].clone(), universe[j].clone()))
        })
        .map(|pair| -> Result<Option<Itemset<I>>> { Ok(constraint.holds(&pair)?.then_some(pair)) })
        .collect::<Result<_>>()?;

    let mut seed: Vec<Itemset<I>> = checked.into_iter().flatten().collect();
    seed.sort_unstable();
    debug!(pairs = n * n.saturating_sub(1) / 2, accepted = seed.len(), "seeded level 2");
    Ok(seed)
}

/// Every itemset satisfying `constraint`, with no limits.
pub fn freq_itemsets<I: Item>(
    constraint: &dyn Constraint<I>,
    universe: &[I],
    strategy: Strategy,
) -> Result<HashSet<Itemset<I>>> {
    Ok(LevelwiseSearch::new(strategy).run(constraint, universe)?.output)
}

/// Accepted itemsets that no larger accepted itemset was generated from.
pub fn maximal_freq_itemsets<I: Item>(
    constraint: &dyn Constraint<I>,
    universe: &[I],
    strategy: Strategy,
) -> Result<HashSet<Itemset<I>>> {
    Ok(LevelwiseSearch::new(strategy).run(constraint, universe)?.maximal())
}
