use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::analysis::PatternAnalyzer;
use crate::api::state::AppState;
use crate::api::{bounded_param, ApiError};
use crate::models::{PatternAnalysis, PatternComparison, StrategicInsight, TrendShift};

const DEFAULT_WINDOW: usize = 10;
const MAX_WINDOW: usize = 100;

#[derive(Debug, Deserialize)]
pub struct WindowParams {
    pub count: Option<usize>,
}

impl WindowParams {
    fn window(&self) -> Result<usize, ApiError> {
        bounded_param("count", self.count, DEFAULT_WINDOW, 1..=MAX_WINDOW)
    }
}

#[derive(Debug, Serialize)]
pub struct InsightsResponse {
    pub pattern_insights: StrategicInsight,
    pub shift_analysis: TrendShift,
}

pub async fn get_pattern(
    State(state): State<AppState>,
    params: Result<Query<WindowParams>, QueryRejection>,
) -> Result<Json<PatternAnalysis>, ApiError> {
    let Query(params) = params?;
    let window = params.window()?;
    let analyzer = PatternAnalyzer::new(state.store.as_ref());
    Ok(Json(analyzer.summarize(window)?))
}

pub async fn compare_patterns(
    State(state): State<AppState>,
) -> Result<Json<PatternComparison>, ApiError> {
    let analyzer = PatternAnalyzer::new(state.store.as_ref());
    Ok(Json(analyzer.compare()?))
}

pub async fn get_insights(
    State(state): State<AppState>,
    params: Result<Query<WindowParams>, QueryRejection>,
) -> Result<Json<InsightsResponse>, ApiError> {
    let Query(params) = params?;
    let window = params.window()?;
    let analyzer = PatternAnalyzer::new(state.store.as_ref());

    Ok(Json(InsightsResponse {
        pattern_insights: analyzer.strategic_insight(window)?,
        shift_analysis: analyzer.trend_shift()?,
    }))
}
