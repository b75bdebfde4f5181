//! Per-season category summaries
//!
//! Counts observations (not users) per category. These are the values the
//! service reports as a season's most frequent category and as bar-chart
//! data.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::dataset::SeasonSnapshot;
use crate::season::Season;

/// Occurrence count of one category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: usize,
}

/// Count occurrences, most frequent first.
///
/// Ties keep the order in which categories first appeared.
pub fn category_counts<'a, I>(categories: I) -> Vec<CategoryCount>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: Vec<CategoryCount> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for category in categories {
        match index.get(category) {
            Some(&i) => counts[i].count += 1,
            None => {
                index.insert(category, counts.len());
                counts.push(CategoryCount {
                    category: category.to_string(),
                    count: 1,
                });
            }
        }
    }

    // Stable sort keeps first-appearance order among ties
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

impl SeasonSnapshot {
    pub fn category_counts(&self, season: Season) -> Vec<CategoryCount> {
        category_counts(self.observations(season).map(|o| o.category.as_str()))
    }

    /// The season's most frequent category, or `None` for an empty season
    pub fn most_frequent_category(&self, season: Season) -> Option<String> {
        self.category_counts(season)
            .into_iter()
            .next()
            .map(|c| c.category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(category: &str, count: usize) -> CategoryCount {
        CategoryCount {
            category: category.to_string(),
            count,
        }
    }

    #[test]
    fn test_counts_sorted_descending() {
        let counts = category_counts(["Dairy", "Bakery", "Bakery", "Meat", "Bakery", "Dairy"]);
        assert_eq!(counts, vec![entry("Bakery", 3), entry("Dairy", 2), entry("Meat", 1)]);
    }

    #[test]
    fn test_ties_keep_first_appearance() {
        let counts = category_counts(["Meat", "Deli", "Deli", "Meat"]);
        assert_eq!(counts[0].category, "Meat");
        assert_eq!(counts[1].category, "Deli");
    }

    #[test]
    fn test_empty_season_has_no_most_frequent() {
        let snapshot = SeasonSnapshot::from_json_str(r#"{"transactions": []}"#).unwrap();
        assert!(snapshot.category_counts(Season::Summer).is_empty());
        assert_eq!(snapshot.most_frequent_category(Season::Summer), None);
    }
}
