//! Level-wise frequent itemset mining
//!
//! Level 1 is seeded from the whole category universe. Every later level is
//! built only from the members of the level immediately before it.
//!
//! # Candidate generation
//!
//! - [`MiningMode::Legacy`] (default): size-k combinations of the previous
//!   level's members, each member treated as one opaque element. Level 2
//!   pairs up labels. From level 3 on the elements are themselves itemsets,
//!   which never occur in a user's label sequence, so level 3 is always
//!   empty and mining stops there.
//! - [`MiningMode::Apriori`]: canonical join of previous itemsets whose label
//!   union has exactly k labels, with subset pruning.
//!
//! A candidate is frequent only when its support is strictly greater than
//! the minimum support.
//!
//! A [`Budget`] is polled between candidates. Once it is exhausted the run
//! stops and returns the levels completed so far.

use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::budget::Budget;
use crate::itemset::{combination_count, combinations, Element, Itemset, UserItemset};
use crate::support::{label_support, support};

/// Candidate generation policy for levels k >= 2
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MiningMode {
    /// Combine previous-level members as opaque elements
    #[default]
    Legacy,
    /// Join previous-level itemsets on their labels
    Apriori,
}

impl fmt::Display for MiningMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MiningMode::Legacy => f.write_str("legacy"),
            MiningMode::Apriori => f.write_str("apriori"),
        }
    }
}

impl FromStr for MiningMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "legacy" => Ok(MiningMode::Legacy),
            "apriori" => Ok(MiningMode::Apriori),
            other => Err(format!("unknown mining mode: {}", other)),
        }
    }
}

/// A frequent member of a level with its support count
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrequentEntry {
    pub element: Element,
    pub support: usize,
}

/// All frequent candidates of one size
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Level {
    /// Number of positions in each candidate of this level
    pub size: usize,
    pub entries: Vec<FrequentEntry>,
}

impl Level {
    pub fn members(&self) -> impl Iterator<Item = &Element> {
        self.entries.iter().map(|e| &e.element)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Support recorded for a member, if it is in this level
    pub fn support_of(&self, element: &Element) -> Option<usize> {
        self.entries
            .iter()
            .find(|e| &e.element == element)
            .map(|e| e.support)
    }
}

/// Ordered sequence of levels produced by one mining run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrequentItemsets {
    levels: Vec<Level>,
}

impl FrequentItemsets {
    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    /// Level holding candidates of `size` positions (1-based)
    pub fn level(&self, size: usize) -> Option<&Level> {
        size.checked_sub(1).and_then(|i| self.levels.get(i))
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

/// Frequent itemset miner
#[derive(Debug, Clone)]
pub struct Miner {
    min_support: usize,
    mode: MiningMode,
    budget: Budget,
}

impl Miner {
    pub fn new(min_support: usize) -> Self {
        Self {
            min_support,
            mode: MiningMode::default(),
            budget: Budget::unlimited(),
        }
    }

    #[must_use]
    pub fn with_mode(mut self, mode: MiningMode) -> Self {
        self.mode = mode;
        self
    }

    /// Stop early once `budget` is exhausted
    #[must_use]
    pub fn with_budget(mut self, budget: Budget) -> Self {
        self.budget = budget;
        self
    }

    /// Mine one season's per-user itemsets.
    ///
    /// Returns every non-empty level in order. An empty first level is
    /// returned on its own; later empty levels end the run and are dropped.
    /// A level interrupted by the budget is dropped as well.
    pub fn mine(&self, population: &[UserItemset], universe: &[String]) -> FrequentItemsets {
        let mut levels = Vec::new();
        let mut current = self.first_level(population, universe);

        loop {
            tracing::debug!(
                size = current.size,
                count = current.len(),
                members = %format_members(&current),
                "Frequent {}-itemsets",
                current.size
            );

            let next = if current.is_empty() || self.budget.is_exhausted() {
                None
            } else {
                self.next_level(&current, population).filter(|next| !next.is_empty())
            };
            levels.push(current);

            match next {
                Some(level) => current = level,
                None => break,
            }
        }

        FrequentItemsets { levels }
    }

    fn first_level(&self, population: &[UserItemset], universe: &[String]) -> Level {
        let entries = universe
            .iter()
            .filter_map(|label| {
                let count = label_support(label, population);
                (count > self.min_support).then(|| FrequentEntry {
                    element: Element::Label(label.clone()),
                    support: count,
                })
            })
            .collect();

        Level { size: 1, entries }
    }

    /// Next level, or `None` when the budget ran out while building it
    fn next_level(&self, previous: &Level, population: &[UserItemset]) -> Option<Level> {
        let size = previous.size + 1;
        let candidates = match self.mode {
            MiningMode::Legacy => legacy_candidates(previous, size),
            MiningMode::Apriori => apriori_candidates(previous, size, &self.budget)?,
        };

        let mut entries = Vec::new();
        for candidate in candidates {
            if self.budget.is_exhausted() {
                tracing::debug!(size, "Budget exhausted while counting candidates");
                return None;
            }
            let count = support(candidate.elements(), population);
            if count > self.min_support {
                entries.push(FrequentEntry {
                    element: Element::Group(candidate),
                    support: count,
                });
            }
        }

        Some(Level { size, entries })
    }
}

fn legacy_candidates(previous: &Level, size: usize) -> Vec<Itemset> {
    let members: Vec<Element> = previous.members().cloned().collect();

    // Candidates made only of nested itemsets have zero support against
    // label sequences, so there is nothing to count.
    if members.iter().all(Element::is_group) {
        tracing::trace!(
            size,
            candidates = %combination_count(members.len(), size),
            "Candidates combine whole itemsets; no user sequence can contain them"
        );
        return Vec::new();
    }

    combinations(&members, size)
        .into_iter()
        .map(Itemset::new)
        .collect()
}

/// Canonical join: unions of two previous itemsets with exactly `size`
/// labels whose every (size - 1)-subset was frequent.
fn apriori_candidates(previous: &Level, size: usize, budget: &Budget) -> Option<Vec<Itemset>> {
    let label_sets: Vec<Vec<&str>> = previous.members().map(Element::flatten_labels).collect();
    let frequent: HashSet<BTreeSet<&str>> = label_sets
        .iter()
        .map(|labels| labels.iter().copied().collect())
        .collect();

    let mut seen: HashSet<BTreeSet<&str>> = HashSet::new();
    let mut candidates = Vec::new();

    for i in 0..label_sets.len() {
        for j in (i + 1)..label_sets.len() {
            if budget.is_exhausted() {
                tracing::debug!(size, "Budget exhausted while joining candidates");
                return None;
            }
            let mut union: Vec<&str> = label_sets[i].clone();
            for label in &label_sets[j] {
                if !union.contains(label) {
                    union.push(*label);
                }
            }
            if union.len() != size {
                continue;
            }

            let key: BTreeSet<&str> = union.iter().copied().collect();
            if seen.contains(&key) || has_infrequent_subset(&key, &frequent) {
                continue;
            }
            seen.insert(key);
            candidates.push(Itemset::from_labels(union));
        }
    }

    Some(candidates)
}

fn has_infrequent_subset(itemset: &BTreeSet<&str>, frequent: &HashSet<BTreeSet<&str>>) -> bool {
    itemset.iter().any(|skip| {
        let subset: BTreeSet<&str> = itemset.iter().copied().filter(|l| l != skip).collect();
        !frequent.contains(&subset)
    })
}

fn format_members(level: &Level) -> String {
    let members: Vec<String> = level
        .entries
        .iter()
        .map(|e| format!("{}={}", e.element, e.support))
        .collect();
    format!("[{}]", members.join(", "))
}

/// Mine with the default (legacy) candidate generation.
pub fn mine(
    population: &[UserItemset],
    universe: &[String],
    min_support: usize,
) -> FrequentItemsets {
    Miner::new(min_support).mine(population, universe)
}
