use std::collections::HashSet;

use sdminer_core::Itemset;

use super::types::Item;

/// Accepted itemsets that were never recorded as a parent of a larger
/// accepted itemset.
///
/// Only the parent links recorded during the search count. No superset scan
/// is done, so an itemset whose accepted superset was reached through a
/// different path stays in the result.
pub fn maximal_itemsets<I: Item>(
    output: &HashSet<Itemset<I>>,
    deleted: &HashSet<Itemset<I>>,
) -> HashSet<Itemset<I>> {
    output.difference(deleted).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removes_recorded_parents_only() {
        let output: HashSet<_> = [
            Itemset::new([1, 2]),
            Itemset::new([1, 3]),
            Itemset::new([2, 3]),
            Itemset::new([1, 2, 3]),
            Itemset::new([4, 5]),
        ]
        .into_iter()
        .collect();
        // {2,3} is a subset of {1,2,3} but was not recorded as its parent.
        let deleted: HashSet<_> = [Itemset::new([1, 2]), Itemset::new([1, 3])]
            .into_iter()
            .collect();

        let maximal = maximal_itemsets(&output, &deleted);
        let expected: HashSet<_> = [
            Itemset::new([2, 3]),
            Itemset::new([1, 2, 3]),
            Itemset::new([4, 5]),
        ]
        .into_iter()
        .collect();
        assert_eq!(maximal, expected);
    }

    #[test]
    fn empty_output_gives_empty_result() {
        let empty: HashSet<Itemset<u64>> = HashSet::new();
        assert!(maximal_itemsets(&empty, &empty).is_empty());
    }
}
