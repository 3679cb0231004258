use axum::extract::State;
use axum::Json;
use serde::Serialize;
use tracing::{error, warn};

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::storage::DatabaseStats;

pub const API_NAME: &str = "SolDash API";
pub const API_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Serialize)]
pub struct Endpoints {
    pub health: &'static str,
    pub scrape: &'static str,
    pub import: &'static str,
    pub games: &'static str,
    pub patterns: &'static str,
    pub compare: &'static str,
    pub insights: &'static str,
    pub stats: &'static str,
    pub live_game: &'static str,
}

const ENDPOINTS: Endpoints = Endpoints {
    health: "/api/v1/health",
    scrape: "/api/v1/scrape",
    import: "/api/v1/import",
    games: "/api/v1/games",
    patterns: "/api/v1/patterns",
    compare: "/api/v1/patterns/compare",
    insights: "/api/v1/insights",
    stats: "/api/v1/stats",
    live_game: "/api/v1/live-game",
};

#[derive(Debug, Serialize)]
pub struct RootResponse {
    pub name: &'static str,
    pub version: &'static str,
    pub status: &'static str,
    pub description: &'static str,
    pub database_stats: Option<DatabaseStats>,
    pub endpoints: Endpoints,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: &'static str,
    pub total_games: usize,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub database: DatabaseStats,
    pub api_version: &'static str,
    pub status: &'static str,
}

pub async fn root(State(state): State<AppState>) -> Json<RootResponse> {
    let database_stats = match state.store.stats() {
        Ok(stats) => Some(stats),
        Err(e) => {
            warn!("Could not read database stats: {}", e);
            None
        }
    };

    Json(RootResponse {
        name: API_NAME,
        version: API_VERSION,
        status: "operational",
        description: "Jackpot decile pattern analysis",
        database_stats,
        endpoints: ENDPOINTS,
    })
}

pub async fn health(State(state): State<AppState>) -> Result<Json<HealthResponse>, ApiError> {
    let stats = state.store.stats().map_err(|e| {
        error!("Health check failed: {}", e);
        ApiError::ServiceUnavailable("Service unhealthy".to_string())
    })?;

    Ok(Json(HealthResponse {
        status: "healthy",
        database: "connected",
        total_games: stats.total_games,
    }))
}

pub async fn stats(State(state): State<AppState>) -> Result<Json<StatsResponse>, ApiError> {
    Ok(Json(StatsResponse {
        database: state.store.stats()?,
        api_version: API_VERSION,
        status: "operational",
    }))
}
