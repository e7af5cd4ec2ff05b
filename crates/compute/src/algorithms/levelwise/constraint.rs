use sdminer_core::{Itemset, Monotonicity, Result};

/// Interestingness predicate driving the levelwise search.
///
/// Implementations must be pure and deterministic. An `Err` from `holds` is
/// a fault: the search stops and returns it, it is never read as "false".
pub trait Constraint<I>: Sync {
    /// The growth behaviour the caller vouches for.
    fn monotonicity(&self) -> Monotonicity;

    fn holds(&self, itemset: &Itemset<I>) -> Result<bool>;
}

/// Constraint backed by a closure.
pub struct FnConstraint<F> {
    predicate: F,
    monotonicity: Monotonicity,
}

impl<F> FnConstraint<F> {
    pub fn new<I>(monotonicity: Monotonicity, predicate: F) -> Self
    where
        F: Fn(&Itemset<I>) -> Result<bool> + Sync,
    {
        Self {
            predicate,
            monotonicity,
        }
    }

    pub fn anti_monotone<I>(predicate: F) -> Self
    where
        F: Fn(&Itemset<I>) -> Result<bool> + Sync,
    {
        Self::new::<I>(Monotonicity::AntiMonotone, predicate)
    }

    pub fn loosely_anti_monotone<I>(predicate: F) -> Self
    where
        F: Fn(&Itemset<I>) -> Result<bool> + Sync,
    {
        Self::new::<I>(Monotonicity::LooselyAntiMonotone, predicate)
    }
}

impl<I, F> Constraint<I> for FnConstraint<F>
where
    F: Fn(&Itemset<I>) -> Result<bool> + Sync,
{
    fn monotonicity(&self) -> Monotonicity {
        self.monotonicity
    }

    fn holds(&self, itemset: &Itemset<I>) -> Result<bool> {
        (self.predicate)(itemset)
    }
}
