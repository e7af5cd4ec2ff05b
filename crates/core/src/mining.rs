use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// How a constraint is expected to behave as itemsets grow.
///
/// The tag is declared by whoever builds the constraint; the engine uses it
/// to decide which candidate generators are allowed but never verifies it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Monotonicity {
    /// If a set satisfies the constraint, so does every subset of it.
    AntiMonotone,
    /// Only some one-item-smaller subset is guaranteed to satisfy it.
    LooselyAntiMonotone,
}

impl fmt::Display for Monotonicity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Monotonicity::AntiMonotone => write!(f, "anti-monotone"),
            Monotonicity::LooselyAntiMonotone => write!(f, "loosely-anti-monotone"),
        }
    }
}

/// Candidate generation discipline for the levelwise search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// Join pairs of accepted itemsets and require full subset closure.
    #[default]
    AntiMonotone,
    /// Extend accepted itemsets by single universe items.
    LooselyAntiMonotone,
}

impl Strategy {
    /// Whether this strategy is sound for constraints with the given tag.
    pub fn accepts(self, monotonicity: Monotonicity) -> bool {
        match self {
            Strategy::AntiMonotone => monotonicity == Monotonicity::AntiMonotone,
            Strategy::LooselyAntiMonotone => true,
        }
    }

    /// The strategy a constraint's tag calls for.
    pub fn for_monotonicity(monotonicity: Monotonicity) -> Self {
        match monotonicity {
            Monotonicity::AntiMonotone => Strategy::AntiMonotone,
            Monotonicity::LooselyAntiMonotone => Strategy::LooselyAntiMonotone,
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::AntiMonotone => write!(f, "anti-monotone"),
            Strategy::LooselyAntiMonotone => write!(f, "loosely-anti-monotone"),
        }
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "am" | "anti-monotone" | "antimonotone" => Ok(Strategy::AntiMonotone),
            "lam" | "loosely-anti-monotone" | "looselyantimonotone" => {
                Ok(Strategy::LooselyAntiMonotone)
            }
            other => Err(format!("unknown strategy '{}' (expected am or lam)", other)),
        }
    }
}

/// Which generating parents the loosely-anti-monotone generator records.
///
/// `All` keeps every accepted itemset that extends to a candidate. `First`
/// keeps only the first one reached (universe order, then level order).
/// Maximality results can differ between the two on the same input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ParentBookkeeping {
    #[default]
    All,
    First,
}

impl fmt::Display for ParentBookkeeping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParentBookkeeping::All => write!(f, "all"),
            ParentBookkeeping::First => write!(f, "first"),
        }
    }
}

impl FromStr for ParentBookkeeping {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(ParentBookkeeping::All),
            "first" => Ok(ParentBookkeeping::First),
            other => Err(format!("unknown parent bookkeeping '{}' (expected all or first)", other)),
        }
    }
}

/// Upper bound on the divergence of an interesting node set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Threshold {
    /// Bound on the scaled divergence (sigma).
    Scaled(f64),
    /// Bound on the raw divergence (phi).
    Raw(f64),
}

impl Threshold {
    pub fn value(&self) -> f64 {
        match *self {
            Threshold::Scaled(v) | Threshold::Raw(v) => v,
        }
    }

    pub fn is_scaled(&self) -> bool {
        matches!(self, Threshold::Scaled(_))
    }
}

impl Default for Threshold {
    fn default() -> Self {
        Threshold::Scaled(0.3)
    }
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Threshold::Scaled(v) => write!(f, "sigma={}", v),
            Threshold::Raw(v) => write!(f, "phi={}", v),
        }
    }
}

/// Why a search stopped with a non-empty frontier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TruncationReason {
    /// The configured maximum itemset size was reached.
    MaxLevel(usize),
    /// The wall-clock budget ran out.
    Deadline(Duration),
}

impl fmt::Display for TruncationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TruncationReason::MaxLevel(level) => write!(f, "maximum level {} reached", level),
            TruncationReason::Deadline(budget) => {
                write!(f, "deadline of {:.1}s exceeded", budget.as_secs_f64())
            }
        }
    }
}
