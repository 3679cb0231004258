use std::sync::Arc;
use std::time::Duration;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::info;

use crate::api::state::AppState;
use crate::api::ApiError;

/// Latest live round pushed by a client, held in memory only.
#[derive(Debug, Clone)]
pub struct LiveGameCache {
    data: Option<Value>,
    last_updated: Option<DateTime<Utc>>,
    stale_after: Duration,
}

pub type SharedLiveGame = Arc<RwLock<LiveGameCache>>;

#[derive(Debug, Serialize)]
pub struct LiveGameResponse {
    pub available: bool,
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LiveGameUpdated {
    pub success: bool,
    pub message: String,
}

impl LiveGameCache {
    pub fn new(stale_after: Duration) -> Self {
        Self {
            data: None,
            last_updated: None,
            stale_after,
        }
    }

    pub fn update(&mut self, data: Value, now: DateTime<Utc>) {
        self.data = Some(data);
        self.last_updated = Some(now);
    }

    /// What a reader sees at `now`.
    pub fn snapshot(&self, now: DateTime<Utc>) -> LiveGameResponse {
        let (Some(data), Some(updated)) = (&self.data, self.last_updated) else {
            return LiveGameResponse {
                available: false,
                data: None,
                last_updated: None,
                message: Some("No live game data available".to_string()),
            };
        };

        // Clock skew can make the age negative; treat that as fresh
        let age = now
            .signed_duration_since(updated)
            .to_std()
            .unwrap_or_default();

        if age > self.stale_after {
            return LiveGameResponse {
                available: false,
                data: None,
                last_updated: Some(updated),
                message: Some(format!("Live data is stale ({}s old)", age.as_secs())),
            };
        }

        LiveGameResponse {
            available: true,
            data: Some(data.clone()),
            last_updated: Some(updated),
            message: None,
        }
    }
}

pub async fn update_live_game(
    State(state): State<AppState>,
    data: Result<Json<Value>, JsonRejection>,
) -> Result<Json<LiveGameUpdated>, ApiError> {
    let Json(data) = data?;
    if !data.is_object() {
        return Err(ApiError::BadRequest(
            "Live game state must be a JSON object".to_string(),
        ));
    }

    match data.get("pot_value") {
        Some(pot) => info!("Live game updated: {} SOL", pot),
        None => info!("Live game updated"),
    }

    state.live_game.write().await.update(data, Utc::now());

    Ok(Json(LiveGameUpdated {
        success: true,
        message: "Live game state updated".to_string(),
    }))
}

pub async fn get_live_game(State(state): State<AppState>) -> Json<LiveGameResponse> {
    Json(state.live_game.read().await.snapshot(Utc::now()))
}
