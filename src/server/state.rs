// Shared server state.
// Football client, optional commentary service and the favorites store.

use std::sync::Arc;

use tracing::warn;

use crate::commentary::{CommentService, CommentStore};
use crate::config::Settings;
use crate::error::{AppError, Result};
use crate::favorites::FavoritesStore;
use crate::football::FootballClient;
use crate::gemini::GeminiClient;

pub struct AppState {
    pub football: Arc<FootballClient>,
    /// Absent when no Gemini API key is configured.
    pub comments: Option<CommentService>,
    pub favorites: FavoritesStore,
}

impl AppState {
    pub fn new(
        football: Arc<FootballClient>,
        comments: Option<CommentService>,
        favorites: FavoritesStore,
    ) -> Self {
        Self {
            football,
            comments,
            favorites,
        }
    }

    /// Build the state from settings. The football-data key is required; the
    /// Gemini key only enables commentary.
    pub fn from_settings(settings: &Settings) -> Result<Arc<Self>> {
        let cache_root = settings.cache_dir()?;
        let football = Arc::new(FootballClient::from_settings(settings)?);

        let comments = match GeminiClient::from_settings(settings) {
            Ok(gemini) => Some(CommentService::new(
                football.clone(),
                Arc::new(gemini),
                CommentStore::new(cache_root.clone()),
            )),
            Err(AppError::MissingApiKey(var)) => {
                warn!(var, "no Gemini API key configured, commentary disabled");
                None
            }
            Err(e) => return Err(e),
        };

        Ok(Arc::new(Self::new(
            football,
            comments,
            FavoritesStore::new(cache_root),
        )))
    }
}
