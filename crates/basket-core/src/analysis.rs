//! One season's full analysis: mine, derive rules from pairs, summarize.

use serde::Serialize;

use crate::budget::Budget;
use crate::config::MiningConfig;
use crate::dataset::SeasonSnapshot;
use crate::error::{MiningError, Result};
use crate::miner::{FrequentItemsets, Miner};
use crate::rules::{generate_rules_within, AssociationRule};
use crate::season::Season;

/// Result of analyzing one season
#[derive(Debug, Clone, Serialize)]
pub struct SeasonAnalysis {
    pub season: Season,
    pub itemsets: FrequentItemsets,
    pub rules: Vec<AssociationRule>,
    pub most_frequent_item: Option<String>,
}

impl SeasonAnalysis {
    /// Rules reduced to `[first antecedent, first consequent]` pairs
    pub fn associations(&self) -> Vec<[String; 2]> {
        self.rules
            .iter()
            .filter_map(AssociationRule::projection)
            .collect()
    }
}

/// Mine a season and derive rules from its 2-itemset level only.
///
/// When no level 2 was produced there are no rules.
pub fn analyze(
    snapshot: &SeasonSnapshot,
    season: Season,
    config: &MiningConfig,
) -> SeasonAnalysis {
    run(snapshot, season, config, &Budget::unlimited())
}

/// [`analyze`] under a compute budget.
///
/// Fails with [`MiningError::BudgetExhausted`] instead of returning a
/// partial analysis.
pub fn analyze_within(
    snapshot: &SeasonSnapshot,
    season: Season,
    config: &MiningConfig,
    budget: &Budget,
) -> Result<SeasonAnalysis> {
    let analysis = run(snapshot, season, config, budget);
    if budget.is_exhausted() {
        tracing::warn!(season = %season, "Analysis abandoned: budget exhausted");
        return Err(MiningError::BudgetExhausted);
    }
    Ok(analysis)
}

fn run(
    snapshot: &SeasonSnapshot,
    season: Season,
    config: &MiningConfig,
    budget: &Budget,
) -> SeasonAnalysis {
    let itemsets = Miner::new(config.min_support)
        .with_mode(config.mode)
        .with_budget(budget.clone())
        .mine(snapshot.itemsets(season), snapshot.universe());

    let population_season = config.rule_population.resolve(season);
    let rules = match itemsets.level(2) {
        Some(pairs) => generate_rules_within(
            pairs.members(),
            snapshot.itemsets(population_season),
            config.min_confidence,
            budget,
        ),
        None => Vec::new(),
    };

    tracing::info!(
        season = %season,
        population = %population_season,
        levels = itemsets.len(),
        rules = rules.len(),
        "Analyzed season"
    );

    SeasonAnalysis {
        season,
        most_frequent_item: snapshot.most_frequent_category(season),
        itemsets,
        rules,
    }
}
