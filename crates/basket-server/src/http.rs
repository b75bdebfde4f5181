//! HTTP endpoint handlers

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use basket_core::{CategoryCount, Season};

use crate::error::ApiError;
use crate::AppState;

/// `?season=N` query, kept as text so bad input maps to our own error body
#[derive(Debug, Deserialize)]
pub struct SeasonQuery {
    pub season: Option<String>,
}

impl SeasonQuery {
    /// Selector 1..=4 as a season
    pub fn season(&self) -> Result<Season, ApiError> {
        self.season
            .as_deref()
            .and_then(|raw| raw.trim().parse::<i64>().ok())
            .and_then(Season::from_selector)
            .ok_or(ApiError::InvalidSeason)
    }
}

/// Response for association queries
#[derive(Debug, Serialize, Deserialize)]
pub struct AssociationsResponse {
    /// `[antecedent, consequent]` pairs
    pub associations: Vec<[String; 2]>,
    pub most_frequent_item: Option<String>,
    /// Every category in the dataset
    pub categories: Vec<String>,
}

/// Association rules for one season
pub async fn get_associations(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SeasonQuery>,
) -> Result<Json<AssociationsResponse>, ApiError> {
    let season = query.season()?;
    let analysis = state.analyze(season).await?;

    Ok(Json(AssociationsResponse {
        associations: analysis.associations(),
        most_frequent_item: analysis.most_frequent_item,
        categories: state.snapshot.universe().to_vec(),
    }))
}

/// Response for category count queries
#[derive(Debug, Serialize, Deserialize)]
pub struct CategoryCountsResponse {
    pub season: Season,
    pub counts: Vec<CategoryCount>,
}

/// Category occurrence counts for one season, most frequent first
pub async fn get_category_counts(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SeasonQuery>,
) -> Result<Json<CategoryCountsResponse>, ApiError> {
    let season = query.season()?;
    Ok(Json(CategoryCountsResponse {
        season,
        counts: state.snapshot.category_counts(season),
    }))
}

/// Liveness and dataset size
pub async fn get_health(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "users": state.snapshot.user_count(),
        "categories": state.snapshot.universe().len()
    }))
}
