// Per-user favorite teams.
// JSON-backed favorites lists and the upcoming fixtures of favorite teams.

use std::path::PathBuf;

use chrono::{DateTime, Days, NaiveDate, Utc};
use futures_util::future::join_all;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::cache;
use crate::error::{AppError, Result};
use crate::football::{FootballClient, Match, MatchQuery};
use crate::leagues::League;
use crate::matches::{NextFixture, live_or_next_fixture};

/// How far ahead upcoming fixtures are looked up.
pub const UPCOMING_WINDOW_DAYS: u64 = 7;

/// A team a user follows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteTeam {
    pub team_id: u64,
    pub team_name: String,
    pub team_crest: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Request body for adding a favorite.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFavorite {
    pub team_id: u64,
    pub team_name: String,
    #[serde(default)]
    pub team_crest: Option<String>,
}

/// A favorite team with its live or next fixture.
#[derive(Debug, Clone, Serialize)]
pub struct FavoriteFixture {
    pub team: FavoriteTeam,
    pub fixture: NextFixture,
}

/// File-backed favorites, one JSON list per user.
pub struct FavoritesStore {
    root: PathBuf,
    // Serializes read-modify-write cycles
    lock: Mutex<()>,
}

impl FavoritesStore {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            lock: Mutex::new(()),
        }
    }

    fn load(&self, user_id: &str) -> Result<Vec<FavoriteTeam>> {
        Ok(cache::read_json(&cache::favorites_path(&self.root, user_id))?.unwrap_or_default())
    }

    fn save(&self, user_id: &str, favorites: &[FavoriteTeam]) -> Result<()> {
        cache::write_json(&cache::favorites_path(&self.root, user_id), favorites)
    }

    /// Favorites of a user, newest first.
    pub async fn list(&self, user_id: &str) -> Result<Vec<FavoriteTeam>> {
        let _guard = self.lock.lock().await;
        let mut favorites = self.load(user_id)?;
        // Stored oldest first; reversing keeps ties newest first under the stable sort
        favorites.reverse();
        favorites.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(favorites)
    }

    pub async fn is_favorite(&self, user_id: &str, team_id: u64) -> Result<bool> {
        let _guard = self.lock.lock().await;
        Ok(self.load(user_id)?.iter().any(|f| f.team_id == team_id))
    }

    pub async fn add(&self, user_id: &str, new: NewFavorite) -> Result<FavoriteTeam> {
        if new.team_name.trim().is_empty() {
            return Err(AppError::Validation("team name is empty".into()));
        }

        let _guard = self.lock.lock().await;
        let mut favorites = self.load(user_id)?;
        if favorites.iter().any(|f| f.team_id == new.team_id) {
            return Err(AppError::Conflict(format!(
                "Team {} is already a favorite",
                new.team_id
            )));
        }

        let favorite = FavoriteTeam {
            team_id: new.team_id,
            team_name: new.team_name,
            team_crest: new.team_crest.filter(|crest| !crest.is_empty()),
            created_at: Utc::now(),
        };
        favorites.push(favorite.clone());
        self.save(user_id, &favorites)?;

        info!(user_id, team_id = favorite.team_id, "favorite added");
        Ok(favorite)
    }

    pub async fn remove(&self, user_id: &str, team_id: u64) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut favorites = self.load(user_id)?;
        let before = favorites.len();
        favorites.retain(|f| f.team_id != team_id);
        if favorites.len() == before {
            return Err(AppError::NotFound(format!("favorite team {}", team_id)));
        }
        self.save(user_id, &favorites)?;

        info!(user_id, team_id, "favorite removed");
        Ok(())
    }
}

/// Pair each favorite with its live or next fixture; favorites without one are omitted.
pub fn pair_fixtures(favorites: &[FavoriteTeam], matches: &[Match]) -> Vec<FavoriteFixture> {
    favorites
        .iter()
        .filter_map(|team| {
            live_or_next_fixture(matches, team.team_id).map(|fixture| FavoriteFixture {
                team: team.clone(),
                fixture,
            })
        })
        .collect()
}

/// Live or next fixture of each favorite across every supported league, within
/// the next week from `today`. Leagues that fail to load are skipped.
pub async fn upcoming_for_favorites(
    football: &FootballClient,
    favorites: &[FavoriteTeam],
    today: NaiveDate,
) -> Vec<FavoriteFixture> {
    if favorites.is_empty() {
        return Vec::new();
    }

    let until = today
        .checked_add_days(Days::new(UPCOMING_WINDOW_DAYS))
        .unwrap_or(today);
    let query = MatchQuery::between(today, until);

    let responses = join_all(
        League::ALL
            .iter()
            .map(|league| football.get_matches(league.code(), &query)),
    )
    .await;

    let mut matches = Vec::new();
    for (league, response) in League::ALL.iter().zip(responses) {
        match response {
            Ok(response) => matches.extend(response.matches),
            Err(e) => warn!(league = league.code(), error = %e, "skipping league for favorites"),
        }
    }

    pair_fixtures(favorites, &matches)
}
