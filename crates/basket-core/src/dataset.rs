//! Transaction log loading
//!
//! Reads the JSON transaction log, flattens each transaction's items into
//! one category observation per item, and groups observations into the
//! per-season, per-user itemset tables the miner consumes. The resulting
//! [`SeasonSnapshot`] is built once and never mutated.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{MiningError, Result};
use crate::itemset::UserItemset;
use crate::season::Season;

/// Raw user identifier as it appears in the log
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserKey {
    Number(i64),
    Text(String),
}

/// One purchased item; fields other than the category are ignored
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub category: String,
}

/// One transaction record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub user_id: UserKey,
    pub date: String,
    #[serde(default)]
    pub items: Vec<Item>,
}

/// Top-level document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionLog {
    pub transactions: Vec<Transaction>,
}

/// A (user, category, season) triple derived from one item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    pub user_id: u32,
    pub category: String,
    pub season: Season,
}

/// Parse the date formats found in transaction logs
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt.date());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

/// Dense user code for the `index`-th distinct raw id
fn user_code(index: usize) -> Result<u32> {
    u32::try_from(index).map_err(|_| MiningError::TooManyUsers(index))
}

/// Immutable per-season itemset tables plus the global category universe
#[derive(Debug, Clone)]
pub struct SeasonSnapshot {
    universe: Vec<String>,
    observations: Vec<Observation>,
    itemsets: BTreeMap<Season, Vec<UserItemset>>,
    user_count: usize,
}

impl SeasonSnapshot {
    /// Load a transaction log from a JSON file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let snapshot = Self::from_json_str(&contents)?;
        tracing::info!(
            path = %path.display(),
            users = snapshot.user_count,
            categories = snapshot.universe.len(),
            observations = snapshot.observations.len(),
            "Loaded transaction log"
        );
        Ok(snapshot)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let log: TransactionLog = serde_json::from_str(json)?;
        Self::from_transactions(&log.transactions)
    }

    /// Build the snapshot from parsed transactions.
    ///
    /// User codes are dense and assigned in sorted order of the raw
    /// identifiers, so they are stable across seasons.
    pub fn from_transactions(transactions: &[Transaction]) -> Result<Self> {
        let keys: BTreeSet<&UserKey> = transactions.iter().map(|t| &t.user_id).collect();
        let codes: BTreeMap<&UserKey, u32> = keys
            .into_iter()
            .enumerate()
            .map(|(index, key)| user_code(index).map(|code| (key, code)))
            .collect::<Result<_>>()?;

        let mut universe = Vec::new();
        let mut seen: HashSet<&str> = HashSet::new();
        let mut observations = Vec::new();

        for (index, transaction) in transactions.iter().enumerate() {
            let date = parse_date(&transaction.date).ok_or_else(|| MiningError::InvalidDate {
                index,
                date: transaction.date.clone(),
            })?;
            let season = Season::from_date(date);
            let user_id = codes[&transaction.user_id];

            for item in &transaction.items {
                if seen.insert(item.category.as_str()) {
                    universe.push(item.category.clone());
                }
                observations.push(Observation {
                    user_id,
                    category: item.category.clone(),
                    season,
                });
            }
        }

        let mut grouped: BTreeMap<Season, BTreeMap<u32, Vec<String>>> =
            Season::ALL.iter().map(|s| (*s, BTreeMap::new())).collect();
        for observation in &observations {
            grouped
                .entry(observation.season)
                .or_default()
                .entry(observation.user_id)
                .or_default()
                .push(observation.category.clone());
        }

        let itemsets: BTreeMap<Season, Vec<UserItemset>> = grouped
            .into_iter()
            .map(|(season, users)| {
                let table: Vec<UserItemset> = users
                    .into_iter()
                    .map(|(user_id, categories)| UserItemset::new(user_id, categories))
                    .collect();
                (season, table)
            })
            .collect();

        Ok(Self {
            universe,
            observations,
            itemsets,
            user_count: codes.len(),
        })
    }

    /// Distinct categories across all seasons, in first-appearance order
    pub fn universe(&self) -> &[String] {
        &self.universe
    }

    /// Per-user itemsets for one season, ordered by user code
    pub fn itemsets(&self, season: Season) -> &[UserItemset] {
        self.itemsets
            .get(&season)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Observations that fall in one season, in log order
    pub fn observations(&self, season: Season) -> impl Iterator<Item = &Observation> {
        self.observations.iter().filter(move |o| o.season == season)
    }

    pub fn user_count(&self) -> usize {
        self.user_count
    }

    pub fn observation_count(&self) -> usize {
        self.observations.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOG: &str = r#"{
        "transactions": [
            {"user_id": "u2", "date": "2023-01-10", "items": [
                {"category": "Bakery", "price": 2.5}, {"category": "Dairy"}
            ]},
            {"user_id": "u1", "date": "2023-07-04 10:30:00", "items": [
                {"category": "Produce"}
            ]},
            {"user_id": "u2", "date": "2023-12-24T08:00:00Z", "items": [
                {"category": "Bakery"}
            ]},
            {"user_id": "u3", "date": "2023-04-01", "items": []}
        ]
    }"#;

    #[test]
    fn test_universe_in_first_appearance_order() {
        let snapshot = SeasonSnapshot::from_json_str(LOG).unwrap();
        assert_eq!(snapshot.universe(), &["Bakery", "Dairy", "Produce"]);
        assert_eq!(snapshot.user_count(), 3);
        assert_eq!(snapshot.observation_count(), 4);
    }

    #[test]
    fn test_user_codes_follow_sorted_ids() {
        let snapshot = SeasonSnapshot::from_json_str(LOG).unwrap();
        let summer = snapshot.itemsets(Season::Summer);
        assert_eq!(summer, &[UserItemset::new(0, vec!["Produce".into()])]);
    }

    #[test]
    fn test_itemsets_keep_duplicates_and_order() {
        let snapshot = SeasonSnapshot::from_json_str(LOG).unwrap();
        let winter = snapshot.itemsets(Season::Winter);
        assert_eq!(winter.len(), 1);
        assert_eq!(winter[0].user_id, 1);
        assert_eq!(winter[0].categories, vec!["Bakery", "Dairy", "Bakery"]);
    }

    #[test]
    fn test_empty_transactions_produce_no_rows() {
        let snapshot = SeasonSnapshot::from_json_str(LOG).unwrap();
        assert!(snapshot.itemsets(Season::Spring).is_empty());
        assert_eq!(snapshot.observations(Season::Spring).count(), 0);
    }

    #[test]
    fn test_numeric_user_ids() {
        let log = r#"{"transactions": [
            {"user_id": 10, "date": "2023-02-01", "items": [{"category": "Deli"}]},
            {"user_id": 9, "date": "2023-02-02", "items": [{"category": "Meat"}]}
        ]}"#;
        let snapshot = SeasonSnapshot::from_json_str(log).unwrap();
        let winter = snapshot.itemsets(Season::Winter);
        assert_eq!(winter[0], UserItemset::new(0, vec!["Meat".into()]));
        assert_eq!(winter[1], UserItemset::new(1, vec!["Deli".into()]));
    }

    #[test]
    fn test_invalid_date_is_reported() {
        let log = r#"{"transactions": [
            {"user_id": "a", "date": "yesterday", "items": [{"category": "Deli"}]}
        ]}"#;
        let err = SeasonSnapshot::from_json_str(log).unwrap_err();
        assert!(matches!(err, MiningError::InvalidDate { index: 0, .. }));
    }

    #[test]
    fn test_malformed_json_is_reported() {
        let err = SeasonSnapshot::from_json_str("{\"orders\": []}").unwrap_err();
        assert!(matches!(err, MiningError::InvalidFormat(_)));
    }

    #[test]
    fn test_user_code_overflow_is_reported() {
        assert_eq!(user_code(7).unwrap(), 7);
        assert_eq!(user_code(u32::MAX as usize).unwrap(), u32::MAX);
        let err = user_code(u32::MAX as usize + 1).unwrap_err();
        assert!(matches!(err, MiningError::TooManyUsers(_)));
    }

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2023, 3, 15).unwrap();
        assert_eq!(parse_date("2023-03-15"), Some(expected));
        assert_eq!(parse_date("2023-03-15 23:59:59"), Some(expected));
        assert_eq!(parse_date("2023-03-15T12:00:00.250"), Some(expected));
        assert_eq!(parse_date("2023-03-15T12:00:00+02:00"), Some(expected));
        assert_eq!(parse_date("15/03/2023"), None);
    }
}
