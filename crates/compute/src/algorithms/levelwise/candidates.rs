use std::collections::{HashMap, HashSet};

use rayon::prelude::*;
use sdminer_core::{Itemset, ParentBookkeeping, Result};
use tracing::debug;

use super::constraint::Constraint;
use super::types::{Candidates, Cutoff, Item, SupportMap};

/// Produces level k+1 from the accepted itemsets of level k.
///
/// `level` is sorted and all its itemsets have the same size. `universe` is
/// sorted and deduplicated. Every returned candidate satisfies `constraint`.
/// Once `cutoff` passes the level is abandoned with `MinerError::Truncated`.
pub trait CandidateGenerator<I: Item>: Send + Sync {
    fn name(&self) -> &'static str;

    fn generate(
        &self,
        level: &[Itemset<I>],
        constraint: &dyn Constraint<I>,
        universe: &[I],
        cutoff: &Cutoff,
    ) -> Result<Candidates<I>>;
}

/// Joins pairs of accepted itemsets and keeps a union only when all of its
/// immediate subsets were accepted (the classic Apriori closure rule).
#[derive(Debug, Clone, Copy, Default)]
pub struct AntiMonotoneGenerator;

impl<I: Item> CandidateGenerator<I> for AntiMonotoneGenerator {
    fn name(&self) -> &'static str {
        "anti-monotone"
    }

    fn generate(
        &self,
        level: &[Itemset<I>],
        constraint: &dyn Constraint<I>,
        _universe: &[I],
        cutoff: &Cutoff,
    ) -> Result<Candidates<I>> {
        let Some(k) = level.first().map(Itemset::len) else {
            return Ok(Candidates::default());
        };
        let accepted: HashSet<&Itemset<I>> = level.iter().collect();

        // Distinct unions of size k+1 over all unordered pairs.
        let rows: Vec<Vec<Itemset<I>>> = (0..level.len())
            .into_par_iter()
            .map(|i| -> Result<Vec<Itemset<I>>> {
                cutoff.check(k)?;
                let a = &level[i];
                Ok(level[i + 1..]
                    .iter()
                    .filter_map(|b| {
                        let union = a.union(b);
                        (union.len() == k + 1).then_some(union)
                    })
                    .collect())
            })
            .collect::<Result<_>>()?;
        let unions: HashSet<Itemset<I>> = rows.into_iter().flatten().collect();
        let joined = unions.len();

        // Closure first: it is cheap and spares the constraint most calls.
        let checked: Vec<Option<(Itemset<I>, Vec<Itemset<I>>)>> = unions
            .into_par_iter()
            .map(|union| -> Result<Option<(Itemset<I>, Vec<Itemset<I>>)>> {
                cutoff.check(k)?;
                let parents: Vec<Itemset<I>> = union.immediate_subsets().collect();
                if !parents.iter().all(|p| accepted.contains(p)) {
                    return Ok(None);
                }
                if !constraint.holds(&union)? {
                    return Ok(None);
                }
                Ok(Some((union, parents)))
            })
            .collect::<Result<_>>()?;

        let candidates = assemble(checked.into_iter().flatten());
        debug!(
            generator = "anti-monotone",
            k,
            joined,
            accepted = candidates.itemsets.len(),
            "generated candidates"
        );
        Ok(candidates)
    }
}

/// Extends each accepted itemset by one universe item. A candidate needs a
/// single accepted parent, not full subset closure.
#[derive(Debug, Clone, Copy, Default)]
pub struct LooselyAntiMonotoneGenerator {
    pub bookkeeping: ParentBookkeeping,
}

impl LooselyAntiMonotoneGenerator {
    pub fn new(bookkeeping: ParentBookkeeping) -> Self {
        Self { bookkeeping }
    }
}

impl<I: Item> CandidateGenerator<I> for LooselyAntiMonotoneGenerator {
    fn name(&self) -> &'static str {
        "loosely-anti-monotone"
    }

    fn generate(
        &self,
        level: &[Itemset<I>],
        constraint: &dyn Constraint<I>,
        universe: &[I],
        cutoff: &Cutoff,
    ) -> Result<Candidates<I>> {
        let Some(k) = level.first().map(Itemset::len) else {
            return Ok(Candidates::default());
        };

        // Ordered universe-major, then level order; `First` relies on it.
        let extensions: Vec<(Itemset<I>, &Itemset<I>)> = universe
            .par_iter()
            .flat_map_iter(|item| {
                level
                    .iter()
                    .filter_map(move |parent| parent.with_item(item.clone()).map(|u| (u, parent)))
            })
            .collect();
        let extended = extensions.len();

        let mut parents_by_union: HashMap<Itemset<I>, Vec<Itemset<I>>> = HashMap::new();
        for (union, parent) in extensions {
            let parents = parents_by_union.entry(union).or_default();
            match self.bookkeeping {
                ParentBookkeeping::All => parents.push(parent.clone()),
                ParentBookkeeping::First if parents.is_empty() => parents.push(parent.clone()),
                ParentBookkeeping::First => {}
            }
        }

        let checked: Vec<Option<(Itemset<I>, Vec<Itemset<I>>)>> = parents_by_union
            .into_par_iter()
            .map(|(union, parents)| -> Result<Option<(Itemset<I>, Vec<Itemset<I>>)>> {
                cutoff.check(k)?;
                Ok(constraint.holds(&union)?.then_some((union, parents)))
            })
            .collect::<Result<_>>()?;

        let candidates = assemble(checked.into_iter().flatten());
        debug!(
            generator = "loosely-anti-monotone",
            k,
            extended,
            accepted = candidates.itemsets.len(),
            "generated candidates"
        );
        Ok(candidates)
    }
}

fn assemble<I: Item>(accepted: impl Iterator<Item = (Itemset<I>, Vec<Itemset<I>>)>) -> Candidates<I> {
    let mut support: SupportMap<I> = HashMap::new();
    let mut itemsets = Vec::new();
    for (itemset, parents) in accepted {
        itemsets.push(itemset.clone());
        support.insert(itemset, parents);
    }
    itemsets.sort_unstable();
    Candidates { itemsets, support }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::levelwise::FnConstraint;

    fn level(sets: &[&[u32]]) -> Vec<Itemset<u32>> {
        let mut level: Vec<_> = sets.iter().map(|s| Itemset::new(s.iter().copied())).collect();
        level.sort();
        level
    }

    #[test]
    fn anti_monotone_requires_every_immediate_subset() {
        // {1,2,3} has all three pairs; {1,2,4} misses {2,4}.
        let current = level(&[&[1, 2], &[1, 3], &[2, 3], &[1, 4]]);
        let always = FnConstraint::anti_monotone(|_: &Itemset<u32>| Ok(true));

        let next = AntiMonotoneGenerator
            .generate(&current, &always, &[1, 2, 3, 4], &Cutoff::none())
            .unwrap();

        assert_eq!(next.itemsets, vec![Itemset::new([1, 2, 3])]);
        let parents = &next.support[&Itemset::new([1, 2, 3])];
        assert_eq!(parents.len(), 3);
        assert!(parents.contains(&Itemset::new([2, 3])));
    }

    #[test]
    fn anti_monotone_skips_constraint_failures() {
        let current = level(&[&[1, 2], &[1, 3], &[2, 3]]);
        let small_only = FnConstraint::anti_monotone(|s: &Itemset<u32>| Ok(s.len() <= 2));

        let next = AntiMonotoneGenerator
            .generate(&current, &small_only, &[1, 2, 3], &Cutoff::none())
            .unwrap();
        assert!(next.itemsets.is_empty());
        assert!(next.support.is_empty());
    }

    #[test]
    fn loosely_anti_monotone_records_every_parent() {
        let current = level(&[&[1, 2], &[1, 3]]);
        let always = FnConstraint::loosely_anti_monotone(|_: &Itemset<u32>| Ok(true));

        let next = LooselyAntiMonotoneGenerator::new(ParentBookkeeping::All)
            .generate(&current, &always, &[1, 2, 3, 4], &Cutoff::none())
            .unwrap();

        assert_eq!(
            next.itemsets,
            vec![
                Itemset::new([1, 2, 3]),
                Itemset::new([1, 2, 4]),
                Itemset::new([1, 3, 4]),
            ]
        );
        let mut parents = next.support[&Itemset::new([1, 2, 3])].clone();
        parents.sort();
        assert_eq!(parents, level(&[&[1, 2], &[1, 3]]));
        assert_eq!(next.support[&Itemset::new([1, 2, 4])], level(&[&[1, 2]]));
    }

    #[test]
    fn loosely_anti_monotone_first_parent_keeps_one() {
        let current = level(&[&[1, 2], &[1, 3]]);
        let always = FnConstraint::loosely_anti_monotone(|_: &Itemset<u32>| Ok(true));

        let next = LooselyAntiMonotoneGenerator::new(ParentBookkeeping::First)
            .generate(&current, &always, &[1, 2, 3], &Cutoff::none())
            .unwrap();

        // Item 2 extends {1,3} before item 3 extends {1,2}.
        assert_eq!(next.support[&Itemset::new([1, 2, 3])], level(&[&[1, 3]]));
    }

    #[test]
    fn generator_propagates_constraint_fault() {
        let current = level(&[&[1, 2]]);
        let faulty = FnConstraint::loosely_anti_monotone(|_: &Itemset<u32>| {
            Err(sdminer_core::MinerError::PredicateFault("boom".into()))
        });

        let result = LooselyAntiMonotoneGenerator::default().generate(&current, &faulty, &[1, 2, 3], &Cutoff::none());
        assert!(matches!(result, Err(sdminer_core::MinerError::PredicateFault(_))));
    }

    #[test]
    fn empty_level_yields_nothing() {
        let always = FnConstraint::anti_monotone(|_: &Itemset<u32>| Ok(true));
        let next = AntiMonotoneGenerator.generate(&[], &always, &[1, 2], &Cutoff::none()).unwrap();
        assert!(next.itemsets.is_empty());
    }

    #[test]
    fn expired_cutoff_abandons_level() {
        let current = level(&[&[1, 2], &[1, 3], &[2, 3]]);
        let always = FnConstraint::anti_monotone(|_: &Itemset<u32>| Ok(true));
        let expired = Cutoff::after(std::time::Instant::now(), std::time::Duration::ZERO);

        let am = AntiMonotoneGenerator.generate(&current, &always, &[1, 2, 3], &expired);
        assert!(matches!(
            am,
            Err(sdminer_core::MinerError::Truncated {
                level: 2,
                reason: sdminer_core::TruncationReason::Deadline(_),
            })
        ));

        let lam = LooselyAntiMonotoneGenerator::default().generate(&current, &always, &[1, 2, 3], &expired);
        assert!(matches!(lam, Err(sdminer_core::MinerError::Truncated { level: 2, .. })));
    }
}
