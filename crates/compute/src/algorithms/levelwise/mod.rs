//! Apriori-style levelwise miner over an arbitrary item universe.
//!
//! The search is parameterized by a [`Constraint`] and a [`Strategy`]:
//! anti-monotone joins with full subset closure, or loosely-anti-monotone
//! single-item extensions. Work inside one level runs on rayon; levels are
//! strictly sequential.
//!
//! [`Strategy`]: sdminer_core::Strategy

mod types;
mod candidates;
mod constraint;
pub mod maximal;
pub mod search;

pub use types::*;
pub use candidates::*;
pub use constraint::*;
pub use maximal::maximal_itemsets;
pub use search::{freq_itemsets, maximal_freq_itemsets, LevelwiseSearch};
