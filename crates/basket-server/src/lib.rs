//! Basket Server - Seasonal association API
//!
//! HTTP server exposing per-season category association rules.

pub mod config;
pub mod error;
pub mod http;

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use basket_core::{analyze_within, Budget, MiningError, Season, SeasonAnalysis, SeasonSnapshot};

pub use config::ServerConfig;
pub use error::{ApiError, ServerError};

/// Shared application state
///
/// The snapshot is built once at startup and only ever read.
pub struct AppState {
    pub snapshot: Arc<SeasonSnapshot>,
    pub config: ServerConfig,
}

impl AppState {
    pub fn new(snapshot: SeasonSnapshot, config: ServerConfig) -> Self {
        Self {
            snapshot: Arc::new(snapshot),
            config,
        }
    }

    /// Load the transaction log named by the config
    pub fn load(config: ServerConfig) -> Result<Self, ServerError> {
        let snapshot = SeasonSnapshot::from_path(&config.data_path)?;
        Ok(Self::new(snapshot, config))
    }

    /// Analyze a season on the blocking pool within the compute budget.
    ///
    /// The worker polls the same budget, so it stops on its own when the
    /// deadline passes, and is cancelled if the wait times out first.
    pub async fn analyze(&self, season: Season) -> Result<SeasonAnalysis, ApiError> {
        let limit = self.config.compute_budget();
        let budget = Budget::within(limit);
        let snapshot = Arc::clone(&self.snapshot);
        let mining = self.config.mining.clone();
        let worker = budget.clone();
        let job = move || analyze_within(&snapshot, season, &mining, &worker);
        let task = tokio::task::spawn_blocking(job);

        let exceeded = ApiError::BudgetExceeded(self.config.compute_timeout_ms);
        match tokio::time::timeout(limit, task).await {
            Ok(Ok(Ok(analysis))) => Ok(analysis),
            Ok(Ok(Err(MiningError::BudgetExhausted))) => Err(exceeded),
            Ok(Ok(Err(e))) => Err(ApiError::Internal(e.to_string())),
            Ok(Err(e)) => Err(ApiError::Internal(e.to_string())),
            Err(_) => {
                budget.cancel();
                tracing::warn!(
                    season = %season,
                    budget_ms = self.config.compute_timeout_ms,
                    "Analysis exceeded compute budget"
                );
                Err(exceeded)
            }
        }
    }
}

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/associations", get(http::get_associations))
        .route("/category-counts", get(http::get_category_counts))
        .route("/health", get(http::get_health))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the server
pub async fn serve(addr: &str, state: Arc<AppState>) -> Result<(), Box<dyn std::error::Error>> {
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Basket server listening on {}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}
