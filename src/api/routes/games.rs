use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::api::state::AppState;
use crate::api::{bounded_param, ApiError};
use crate::models::{GameImport, GameRecord};

#[derive(Debug, Deserialize)]
pub struct ListGamesParams {
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct ScrapeParams {
    pub pages: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct ImportRequest {
    pub games: Vec<GameImport>,
}

#[derive(Debug, Serialize)]
pub struct ImportResponse {
    pub success: bool,
    pub total_games: usize,
    pub newly_inserted: usize,
    pub duplicates_skipped: usize,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ScraperStatus {
    pub success: bool,
    pub games_scraped: usize,
    pub games_stored: usize,
    pub message: String,
}

pub async fn list_games(
    State(state): State<AppState>,
    params: Result<Query<ListGamesParams>, QueryRejection>,
) -> Result<Json<Vec<GameRecord>>, ApiError> {
    let Query(params) = params?;
    let limit = bounded_param("limit", params.limit, 50, 1..=1000)?;
    Ok(Json(state.store.recent(limit)?))
}

pub async fn import_games(
    State(state): State<AppState>,
    request: Result<Json<ImportRequest>, JsonRejection>,
) -> Result<Json<ImportResponse>, ApiError> {
    let Json(request) = request?;
    if request.games.is_empty() {
        return Err(ApiError::BadRequest("No games provided".to_string()));
    }

    info!("Importing {} games...", request.games.len());
    let summary = state.store.insert_games(request.games)?;

    Ok(Json(ImportResponse {
        success: true,
        total_games: summary.total,
        newly_inserted: summary.inserted,
        duplicates_skipped: summary.duplicates(),
        message: format!(
            "Successfully imported {} new games ({} duplicates skipped)",
            summary.inserted,
            summary.duplicates()
        ),
    }))
}

pub async fn scrape_games(
    State(state): State<AppState>,
    params: Result<Query<ScrapeParams>, QueryRejection>,
) -> Result<Json<ScraperStatus>, ApiError> {
    let Query(params) = params?;
    let pages = bounded_param("pages", params.pages, 5, 1..=10)?;

    let Some(collector) = state.collector.as_ref() else {
        return Err(ApiError::NotImplemented(
            "Scraping is disabled. Use the /api/v1/import endpoint.".to_string(),
        ));
    };

    info!("Starting scrape of {} pages...", pages);
    // bounded to 1..=10 above
    let games = collector.scrape_pages(pages as u32).await;

    if games.is_empty() {
        return Ok(Json(ScraperStatus {
            success: false,
            games_scraped: 0,
            games_stored: 0,
            message: "No games scraped. Check that the fairness page is reachable.".to_string(),
        }));
    }

    let summary = state.store.insert_games(games)?;

    Ok(Json(ScraperStatus {
        success: true,
        games_scraped: summary.total,
        games_stored: summary.inserted,
        message: format!(
            "Successfully scraped {} games, stored {} new games",
            summary.total, summary.inserted
        ),
    }))
}
