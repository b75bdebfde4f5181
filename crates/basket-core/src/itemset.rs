//! Itemset building blocks
//!
//! Candidates are ordered tuples of [`Element`]s. An element is either a
//! category label or a whole itemset carried over from the previous mining
//! level. Membership against a user's category sequence only ever matches
//! labels: the sequence holds labels, never tuples.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One position of a candidate itemset
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Element {
    /// A category label
    Label(String),
    /// An itemset used as a single opaque element
    Group(Itemset),
}

impl Element {
    pub fn label(label: impl Into<String>) -> Self {
        Element::Label(label.into())
    }

    pub fn is_group(&self) -> bool {
        matches!(self, Element::Group(_))
    }

    /// The positions this element contributes when split into rules.
    ///
    /// A label is a one-position itemset; a group exposes its own elements.
    pub fn parts(&self) -> &[Element] {
        match self {
            Element::Label(_) => std::slice::from_ref(self),
            Element::Group(itemset) => itemset.elements(),
        }
    }

    /// All labels reachable from this element, depth first
    pub fn flatten_labels(&self) -> Vec<&str> {
        match self {
            Element::Label(label) => vec![label.as_str()],
            Element::Group(itemset) => itemset
                .elements()
                .iter()
                .flat_map(Element::flatten_labels)
                .collect(),
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Element::Label(label) => f.write_str(label),
            Element::Group(itemset) => write!(f, "{}", itemset),
        }
    }
}

impl From<&str> for Element {
    fn from(label: &str) -> Self {
        Element::Label(label.to_string())
    }
}

impl From<String> for Element {
    fn from(label: String) -> Self {
        Element::Label(label)
    }
}

impl From<Itemset> for Element {
    fn from(itemset: Itemset) -> Self {
        Element::Group(itemset)
    }
}

/// Ordered, fixed-length tuple of elements
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Itemset(Vec<Element>);

impl Itemset {
    pub fn new(elements: Vec<Element>) -> Self {
        Self(elements)
    }

    /// Build an itemset of plain labels
    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(labels.into_iter().map(|l| Element::Label(l.into())).collect())
    }

    pub fn elements(&self) -> &[Element] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Itemset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, element) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", element)?;
        }
        f.write_str(")")
    }
}

/// The categories one user exhibited within one season.
///
/// The sequence keeps duplicates and event order; membership is containment only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserItemset {
    pub user_id: u32,
    pub categories: Vec<String>,
}

impl UserItemset {
    pub fn new(user_id: u32, categories: Vec<String>) -> Self {
        Self {
            user_id,
            categories,
        }
    }

    /// Whether the element occurs, unchanged, in this user's sequence
    pub fn contains(&self, element: &Element) -> bool {
        match element {
            Element::Label(label) => self.categories.iter().any(|c| c == label),
            Element::Group(_) => false,
        }
    }

    pub fn contains_label(&self, label: &str) -> bool {
        self.categories.iter().any(|c| c == label)
    }
}

/// All size-`k` combinations of `items`, in lexicographic position order.
///
/// `combinations(&[a, b, c], 2)` yields `[a, b], [a, c], [b, c]`.
pub fn combinations<T: Clone>(items: &[T], k: usize) -> Vec<Vec<T>> {
    let n = items.len();
    if k > n {
        return Vec::new();
    }

    let mut result = Vec::new();
    let mut indices: Vec<usize> = (0..k).collect();

    loop {
        result.push(indices.iter().map(|&i| items[i].clone()).collect());

        // Rightmost index that can still advance
        let Some(pos) = (0..k).rev().find(|&i| indices[i] != i + n - k) else {
            break;
        };
        indices[pos] += 1;
        for j in pos + 1..k {
            indices[j] = indices[j - 1] + 1;
        }
    }

    result
}

/// Number of size-`k` combinations of `n` items, saturating on overflow
pub fn combination_count(n: usize, k: usize) -> u128 {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    let mut count: u128 = 1;
    for i in 0..k {
        count = count.saturating_mul((n - i) as u128) / (i as u128 + 1);
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combinations_order() {
        let combos = combinations(&["a", "b", "c", "d"], 2);
        assert_eq!(
            combos,
            vec![
                vec!["a", "b"],
                vec!["a", "c"],
                vec!["a", "d"],
                vec!["b", "c"],
                vec!["b", "d"],
                vec!["c", "d"],
            ]
        );
    }

    #[test]
    fn test_combinations_edges() {
        assert!(combinations(&["a"], 2).is_empty());
        assert_eq!(combinations(&["a", "b"], 2), vec![vec!["a", "b"]]);
        assert_eq!(combinations::<&str>(&[], 0), vec![Vec::<&str>::new()]);
        assert_eq!(combinations(&[1, 2, 3], 3).len(), 1);
    }

    #[test]
    fn test_combination_count() {
        assert_eq!(combination_count(4, 2), 6);
        assert_eq!(combination_count(30, 3), 4060);
        assert_eq!(combination_count(2, 3), 0);
        assert_eq!(
            combination_count(10, 3) as usize,
            combinations(&(0..10).collect::<Vec<_>>(), 3).len()
        );
    }

    #[test]
    fn test_user_itemset_never_contains_groups() {
        let user = UserItemset::new(0, vec!["Bakery".into(), "Dairy".into(), "Bakery".into()]);
        assert!(user.contains(&Element::label("Bakery")));
        assert!(!user.contains(&Element::label("Meat")));

        let pair = Itemset::from_labels(["Bakery", "Dairy"]);
        assert!(!user.contains(&Element::Group(pair)));
    }

    #[test]
    fn test_parts_and_display() {
        let label = Element::label("Deli");
        assert_eq!(label.parts(), &[Element::label("Deli")]);

        let pair = Element::Group(Itemset::from_labels(["Deli", "Meat"]));
        assert_eq!(pair.parts().len(), 2);
        assert_eq!(pair.to_string(), "(Deli, Meat)");
        assert_eq!(pair.flatten_labels(), vec!["Deli", "Meat"]);
    }

    #[test]
    fn test_element_serializes_untagged() {
        let pair = Element::Group(Itemset::from_labels(["Deli", "Meat"]));
        let json = serde_json::to_string(&pair).unwrap();
        assert_eq!(json, r#"["Deli","Meat"]"#);

        let back: Element = serde_json::from_str(&json).unwrap();
        assert_eq!(back, pair);
    }
}
