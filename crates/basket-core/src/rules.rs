//! Association rule generation
//!
//! Each itemset is split into every non-empty proper antecedent and the
//! remaining elements as consequent. Supports are counted against an
//! explicit population, which need not be the population the itemsets were
//! mined from.
//!
//! [`generate_rules_within`] polls a [`Budget`] between itemsets and returns
//! the rules found so far once it is exhausted.

use serde::{Deserialize, Serialize};

use crate::budget::Budget;
use crate::itemset::{combinations, Element, UserItemset};
use crate::support::support;

/// Association rule: antecedent => consequent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssociationRule {
    /// Items in the antecedent (left side)
    pub antecedent: Vec<Element>,
    /// Items in the consequent (right side)
    pub consequent: Vec<Element>,
    /// Number of users containing antecedent and consequent together
    pub support: usize,
    /// support(antecedent ++ consequent) / support(antecedent)
    pub confidence: f64,
}

impl AssociationRule {
    /// First antecedent element and first consequent element, as text.
    ///
    /// This drops any further elements on either side.
    pub fn projection(&self) -> Option<[String; 2]> {
        let antecedent = self.antecedent.first()?;
        let consequent = self.consequent.first()?;
        Some([antecedent.to_string(), consequent.to_string()])
    }
}

/// Derive rules from one level's itemsets.
///
/// A rule is kept when its confidence is at least `min_confidence`.
/// Antecedents with zero support in `population` are skipped.
pub fn generate_rules<'a, I>(
    itemsets: I,
    population: &[UserItemset],
    min_confidence: f64,
) -> Vec<AssociationRule>
where
    I: IntoIterator<Item = &'a Element>,
{
    generate_rules_within(itemsets, population, min_confidence, &Budget::unlimited())
}

/// [`generate_rules`] that stops once `budget` is exhausted
pub fn generate_rules_within<'a, I>(
    itemsets: I,
    population: &[UserItemset],
    min_confidence: f64,
    budget: &Budget,
) -> Vec<AssociationRule>
where
    I: IntoIterator<Item = &'a Element>,
{
    let mut rules = Vec::new();

    for itemset in itemsets {
        if budget.is_exhausted() {
            tracing::debug!(count = rules.len(), "Budget exhausted while generating rules");
            break;
        }
        let parts = itemset.parts();

        for size in 1..parts.len() {
            for antecedent in combinations(parts, size) {
                let consequent: Vec<Element> = parts
                    .iter()
                    .filter(|e| !antecedent.contains(*e))
                    .cloned()
                    .collect();
                if consequent.is_empty() {
                    continue;
                }

                let support_antecedent = support(&antecedent, population);
                if support_antecedent == 0 {
                    continue;
                }

                let combined: Vec<Element> = antecedent
                    .iter()
                    .chain(consequent.iter())
                    .cloned()
                    .collect();
                let support_both = support(&combined, population);
                let confidence = support_both as f64 / support_antecedent as f64;

                if confidence >= min_confidence {
                    rules.push(AssociationRule {
                        antecedent,
                        consequent,
                        support: support_both,
                        confidence,
                    });
                }
            }
        }
    }

    tracing::debug!(count = rules.len(), min_confidence, "Generated association rules");
    rules
}
