use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;

use crate::api::routes::live_game::{LiveGameCache, SharedLiveGame};
use crate::collect::Collector;
use crate::config::LiveGameConfig;
use crate::storage::GameStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<GameStore>,
    /// `None` when collection is disabled in config
    pub collector: Option<Arc<Collector>>,
    pub live_game: SharedLiveGame,
}

impl AppState {
    pub fn new(
        store: Arc<GameStore>,
        collector: Option<Arc<Collector>>,
        live_game: &LiveGameConfig,
    ) -> Self {
        let cache = LiveGameCache::new(Duration::from_secs(live_game.stale_after_seconds));
        Self {
            store,
            collector,
            live_game: Arc::new(RwLock::new(cache)),
        }
    }
}
