//! Support counting
//!
//! Support of a candidate is the number of per-user itemsets in which every
//! element of the candidate occurs. Elements are opaque: a nested itemset is
//! tested as a whole and is never unpacked into its labels.

use crate::itemset::{Element, UserItemset};

/// Count the users whose sequence contains every element of `candidate`.
///
/// Time complexity: O(|population| × |candidate| × |sequence|)
pub fn support(candidate: &[Element], population: &[UserItemset]) -> usize {
    population
        .iter()
        .filter(|user| candidate.iter().all(|element| user.contains(element)))
        .count()
}

/// Support of a single label
pub fn label_support(label: &str, population: &[UserItemset]) -> usize {
    population
        .iter()
        .filter(|user| user.contains_label(label))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::itemset::Itemset;

    fn population() -> Vec<UserItemset> {
        vec![
            UserItemset::new(0, vec!["Bakery".into(), "Dairy".into()]),
            UserItemset::new(1, vec!["Bakery".into(), "Bakery".into()]),
            UserItemset::new(2, vec!["Dairy".into(), "Meat".into()]),
        ]
    }

    #[test]
    fn test_support_counts_users_not_occurrences() {
        let pop = population();
        assert_eq!(support(&[Element::label("Bakery")], &pop), 2);
        assert_eq!(label_support("Bakery", &pop), 2);
        assert_eq!(label_support("Seafood", &pop), 0);
    }

    #[test]
    fn test_support_requires_all_elements() {
        let pop = population();
        let both = [Element::label("Bakery"), Element::label("Dairy")];
        assert_eq!(support(&both, &pop), 1);
    }

    #[test]
    fn test_empty_candidate_matches_everyone() {
        assert_eq!(support(&[], &population()), 3);
    }

    #[test]
    fn test_group_elements_never_match() {
        let pop = population();
        let pair = Element::Group(Itemset::from_labels(["Bakery", "Dairy"]));
        assert_eq!(support(&[pair], &pop), 0);
    }
}
