use std::fmt;

use serde::{Deserialize, Serialize};

/// A deduplicated set of items stored as a sorted vector.
///
/// The sorted form is the identity of the set: two itemsets built from the
/// same items in any order compare equal and hash identically, so they can
/// be used directly as map keys during candidate generation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "Vec<I>", into = "Vec<I>")]
#[serde(bound(
    serialize = "I: Serialize + Clone",
    deserialize = "I: Deserialize<'de> + Ord"
))]
pub struct Itemset<I>(Vec<I>);

impl<I: Ord> Itemset<I> {
    pub fn new(items: impl IntoIterator<Item = I>) -> Self {
        let mut items: Vec<I> = items.into_iter().collect();
        items.sort_unstable();
        items.dedup();
        Self(items)
    }

    pub fn pair(a: I, b: I) -> Self {
        Self::new([a, b])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn items(&self) -> &[I] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, I> {
        self.0.iter()
    }

    pub fn contains(&self, item: &I) -> bool {
        self.0.binary_search(item).is_ok()
    }

    pub fn is_subset_of(&self, other: &Self) -> bool {
        self.0.iter().all(|item| other.contains(item))
    }

    pub fn into_vec(self) -> Vec<I> {
        self.0
    }
}

impl<I: Ord + Clone> Itemset<I> {
    /// Sorted merge of two itemsets.
    pub fn union(&self, other: &Self) -> Self {
        let mut merged = Vec::with_capacity(self.len() + other.len());
        let (mut i, mut j) = (0, 0);
        while i < self.0.len() && j < other.0.len() {
            match self.0[i].cmp(&other.0[j]) {
                std::cmp::Ordering::Less => {
                    merged.push(self.0[i].clone());
                    i += 1;
                }
                std::cmp::Ordering::Greater => {
                    merged.push(other.0[j].clone());
                    j += 1;
                }
                std::cmp::Ordering::Equal => {
                    merged.push(self.0[i].clone());
                    i += 1;
                    j += 1;
                }
            }
        }
        merged.extend_from_slice(&self.0[i..]);
        merged.extend_from_slice(&other.0[j..]);
        Self(merged)
    }

    /// Extend by one item. Returns `None` if the item is already present.
    pub fn with_item(&self, item: I) -> Option<Self> {
        match self.0.binary_search(&item) {
            Ok(_) => None,
            Err(pos) => {
                let mut items = self.0.clone();
                items.insert(pos, item);
                Some(Self(items))
            }
        }
    }

    /// The `len()` subsets obtained by dropping exactly one item.
    pub fn immediate_subsets(&self) -> impl Iterator<Item = Self> + '_ {
        (0..self.0.len()).map(move |skip| {
            Self(
                self.0
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| *i != skip)
                    .map(|(_, item)| item.clone())
                    .collect(),
            )
        })
    }
}

impl<I: Ord> From<Vec<I>> for Itemset<I> {
    fn from(items: Vec<I>) -> Self {
        Self::new(items)
    }
}

impl<I> From<Itemset<I>> for Vec<I> {
    fn from(itemset: Itemset<I>) -> Self {
        itemset.0
    }
}

impl<I: Ord> FromIterator<I> for Itemset<I> {
    fn from_iter<T: IntoIterator<Item = I>>(iter: T) -> Self {
        Self::new(iter)
    }
}

impl<'a, I> IntoIterator for &'a Itemset<I> {
    type Item = &'a I;
    type IntoIter = std::slice::Iter<'a, I>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<I: fmt::Display> fmt::Display for Itemset<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, item) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", item)?;
        }
        write!(f, "}}")
    }
}
