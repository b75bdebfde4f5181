//! Mining configuration
//!
//! Thresholds, candidate generation mode, and which season's population
//! rule supports are measured against.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{MiningError, Result};
use crate::miner::MiningMode;
use crate::season::Season;

/// Population that rule supports are counted against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum RulePopulation {
    /// The season whose itemsets were mined
    Selected,
    /// Always one fixed season
    Fixed(Season),
}

impl RulePopulation {
    /// Season to draw the population from when mining `selected`
    pub fn resolve(&self, selected: Season) -> Season {
        match self {
            RulePopulation::Selected => selected,
            RulePopulation::Fixed(season) => *season,
        }
    }
}

impl Default for RulePopulation {
    fn default() -> Self {
        RulePopulation::Fixed(Season::Winter)
    }
}

impl fmt::Display for RulePopulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RulePopulation::Selected => f.write_str("selected"),
            RulePopulation::Fixed(season) => write!(f, "{}", season.name().to_lowercase()),
        }
    }
}

impl TryFrom<String> for RulePopulation {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        if value.trim().eq_ignore_ascii_case("selected") {
            return Ok(RulePopulation::Selected);
        }
        value.parse::<Season>().map(RulePopulation::Fixed)
    }
}

impl From<RulePopulation> for String {
    fn from(value: RulePopulation) -> Self {
        value.to_string()
    }
}

/// Mining parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MiningConfig {
    /// Candidates need support strictly greater than this
    pub min_support: usize,
    /// Rules need confidence at least this
    pub min_confidence: f64,
    /// Candidate generation for levels k >= 2
    pub mode: MiningMode,
    pub rule_population: RulePopulation,
}

impl Default for MiningConfig {
    fn default() -> Self {
        Self {
            min_support: 10,
            min_confidence: 0.5,
            mode: MiningMode::Legacy,
            rule_population: RulePopulation::default(),
        }
    }
}

impl MiningConfig {
    /// Load configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json_str: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(MiningError::InvalidConfig(format!(
                "min_confidence must be within [0, 1], got {}",
                self.min_confidence
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_service_constants() {
        let config = MiningConfig::default();
        assert_eq!(config.min_support, 10);
        assert_eq!(config.min_confidence, 0.5);
        assert_eq!(config.mode, MiningMode::Legacy);
        assert_eq!(config.rule_population, RulePopulation::Fixed(Season::Winter));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_toml_partial() {
        let config = MiningConfig::from_toml(
            r#"
            min_support = 8
            mode = "apriori"
            rule_population = "selected"
            "#,
        )
        .unwrap();
        assert_eq!(config.min_support, 8);
        assert_eq!(config.min_confidence, 0.5);
        assert_eq!(config.mode, MiningMode::Apriori);
        assert_eq!(config.rule_population, RulePopulation::Selected);
    }

    #[test]
    fn test_from_json_fixed_population() {
        let config = MiningConfig::from_json(r#"{"rule_population": "summer"}"#).unwrap();
        assert_eq!(config.rule_population.resolve(Season::Spring), Season::Summer);
    }

    #[test]
    fn test_rejects_out_of_range_confidence() {
        let err = MiningConfig::from_toml("min_confidence = 1.5").unwrap_err();
        assert!(matches!(err, MiningError::InvalidConfig(_)));
    }

    #[test]
    fn test_rejects_unknown_population() {
        assert!(MiningConfig::from_toml(r#"rule_population = "monsoon""#).is_err());
    }

    #[test]
    fn test_population_serializes_lowercase() {
        let json = serde_json::to_string(&RulePopulation::Fixed(Season::Autumn)).unwrap();
        assert_eq!(json, "\"autumn\"");
    }
}
