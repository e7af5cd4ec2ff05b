use std::collections::{HashMap, HashSet};
use std::hash::Hash;
use std::time::{Duration, Instant};

use serde::Serialize;
use sdminer_core::{Itemset, MinerError, Result, TruncationReason};

use super::maximal::maximal_itemsets;

/// Anything the levelwise search can treat as an item.
pub trait Item: Ord + Hash + Clone + Send + Sync {}

impl<T: Ord + Hash + Clone + Send + Sync> Item for T {}

/// Child itemset of size k+1 -> the size-k itemsets it was generated from.
pub type SupportMap<I> = HashMap<Itemset<I>, Vec<Itemset<I>>>;

/// Next level produced by a candidate generator.
///
/// Every itemset here already satisfies the constraint.
#[derive(Debug, Clone)]
pub struct Candidates<I> {
    /// Sorted, deduplicated.
    pub itemsets: Vec<Itemset<I>>,
    pub support: SupportMap<I>,
}

impl<I> Default for Candidates<I> {
    fn default() -> Self {
        Self {
            itemsets: Vec::new(),
            support: HashMap::new(),
        }
    }
}

/// Limits that turn an exponential search into a bounded one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchLimits {
    /// Largest itemset size to accept.
    pub max_level: Option<usize>,
    /// Wall-clock budget, checked by the workers of every level after the seed.
    pub deadline: Option<Duration>,
}

impl SearchLimits {
    pub fn unbounded() -> Self {
        Self::default()
    }
}

/// Wall-clock point after which level work is abandoned.
///
/// Checked by the workers inside a level, so a single huge level cannot
/// overrun the budget.
#[derive(Debug, Clone, Copy, Default)]
pub struct Cutoff {
    deadline: Option<(Instant, Duration)>,
}

impl Cutoff {
    pub fn none() -> Self {
        Self::default()
    }

    /// `budget` after `start`. A budget too large to represent never expires.
    pub fn after(start: Instant, budget: Duration) -> Self {
        Self {
            deadline: start.checked_add(budget).map(|at| (at, budget)),
        }
    }

    /// `MinerError::Truncated` once passed. `level` is the last complete level.
    pub fn check(&self, level: usize) -> Result<()> {
        match self.deadline {
            Some((at, budget)) if Instant::now() >= at => Err(MinerError::Truncated {
                level,
                reason: TruncationReason::Deadline(budget),
            }),
            _ => Ok(()),
        }
    }
}

/// Per-level bookkeeping, mostly for logs and reports.
#[derive(Debug, Clone, Serialize)]
pub struct LevelStats {
    pub level: usize,
    pub accepted: usize,
    pub parents_deleted: usize,
    pub elapsed: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Truncation {
    /// Last level that was fully processed.
    pub level: usize,
    pub reason: TruncationReason,
}

/// Everything a levelwise search produced.
#[derive(Debug, Clone)]
pub struct SearchOutcome<I> {
    /// All accepted itemsets across all levels.
    pub output: HashSet<Itemset<I>>,
    /// Accepted itemsets that are a recorded parent of a larger accepted one.
    pub deleted: HashSet<Itemset<I>>,
    pub levels: Vec<LevelStats>,
    /// Set when the search stopped with candidates still pending.
    pub truncation: Option<Truncation>,
}

impl<I: Item> SearchOutcome<I> {
    pub fn maximal(&self) -> HashSet<Itemset<I>> {
        maximal_itemsets(&self.output, &self.deleted)
    }

    pub fn is_truncated(&self) -> bool {
        self.truncation.is_some()
    }

    /// Turn a truncated outcome into `MinerError::Truncated`.
    pub fn complete(self) -> Result<Self> {
        match self.truncation {
            Some(Truncation { level, reason }) => Err(MinerError::Truncated { level, reason }),
            None => Ok(self),
        }
    }

    /// Size of the largest accepted itemset, 0 if none.
    pub fn deepest_level(&self) -> usize {
        self.levels.last().map_or(0, |l| l.level)
    }
}
