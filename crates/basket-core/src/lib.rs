//! basket-core - Seasonal category co-occurrence mining
//!
//! This crate discovers which item categories users buy together within a
//! season, and derives "users who buy A also buy B" rules:
//!
//! - **Miner**: level-wise frequent itemset search over per-user category sequences
//! - **Rules**: antecedent => consequent rules with support and confidence
//! - **Dataset**: JSON transaction log into immutable per-season itemset tables
//! - **Summary**: per-season category counts
//!
//! # Example
//!
//! ```
//! use basket_core::{generate_rules, mine, UserItemset};
//!
//! let population: Vec<UserItemset> = (0..4)
//!     .map(|id| UserItemset::new(id, vec!["Bakery".into(), "Dairy".into()]))
//!     .collect();
//! let universe = vec!["Bakery".to_string(), "Dairy".to_string()];
//!
//! let itemsets = mine(&population, &universe, 2);
//! let pairs = itemsets.level(2).unwrap();
//! let rules = generate_rules(pairs.members(), &population, 0.5);
//! assert_eq!(rules.len(), 2);
//! ```
//!
//! Mining and rule generation are pure and synchronous; they only read the
//! tables they are given. Long runs can be bounded with a [`Budget`].

pub mod analysis;
pub mod budget;
pub mod config;
pub mod dataset;
pub mod error;
pub mod itemset;
pub mod miner;
pub mod rules;
pub mod season;
pub mod summary;
pub mod support;

pub use analysis::*;
pub use budget::*;
pub use config::*;
pub use dataset::*;
pub use error::MiningError;
pub use itemset::*;
pub use miner::*;
pub use rules::*;
pub use season::*;
pub use summary::*;
pub use support::*;
