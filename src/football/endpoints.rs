// football-data.org endpoint functions.
// Provides typed, cached methods for matches, standings and team details.

use std::time::Duration;

use chrono::NaiveDate;

use crate::cache;
use crate::error::Result;

use super::client::FootballClient;
use super::types::{MatchStatus, MatchesResponse, StandingsResponse, TeamDetail};

/// Revalidation interval for match lists.
pub const MATCHES_TTL: Duration = Duration::from_secs(120);
/// Revalidation interval for league tables.
pub const STANDINGS_TTL: Duration = Duration::from_secs(600);
/// Revalidation interval for team details and squads.
pub const TEAM_TTL: Duration = Duration::from_secs(3600);

/// Optional filters for a competition's match list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchQuery {
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub status: Option<MatchStatus>,
}

impl MatchQuery {
    /// Matches kicking off between two dates, inclusive.
    pub fn between(date_from: NaiveDate, date_to: NaiveDate) -> Self {
        Self {
            date_from: Some(date_from),
            date_to: Some(date_to),
            status: None,
        }
    }

    /// Query parameters in key order; unset filters are omitted.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(date) = self.date_from {
            params.push(("dateFrom", date.format("%Y-%m-%d").to_string()));
        }
        if let Some(date) = self.date_to {
            params.push(("dateTo", date.format("%Y-%m-%d").to_string()));
        }
        if let Some(status) = self.status {
            params.push(("status", status.as_str().to_string()));
        }
        params.sort_by_key(|(key, _)| *key);
        params
    }

    /// Stable cache key for this query.
    pub fn cache_key(&self) -> String {
        self.params()
            .iter()
            .map(|(key, value)| format!("{}={}", key, value))
            .collect::<Vec<_>>()
            .join("&")
    }
}

impl FootballClient {
    /// Get matches for a competition.
    pub async fn get_matches(&self, code: &str, query: &MatchQuery) -> Result<MatchesResponse> {
        let path = cache::matches_path(self.cache_root(), code, &query.cache_key());
        self.fetch_cached(
            &format!("/competitions/{}/matches", code),
            &query.params(),
            &path,
            MATCHES_TTL,
        )
        .await
    }

    /// Get standings for a competition.
    pub async fn get_standings(&self, code: &str) -> Result<StandingsResponse> {
        let path = cache::standings_path(self.cache_root(), code);
        self.fetch_cached(
            &format!("/competitions/{}/standings", code),
            &[],
            &path,
            STANDINGS_TTL,
        )
        .await
    }

    /// Get a team with its squad.
    pub async fn get_team(&self, team_id: u64) -> Result<TeamDetail> {
        let path = cache::team_path(self.cache_root(), team_id);
        self.fetch_cached(&format!("/teams/{}", team_id), &[], &path, TEAM_TTL)
            .await
    }
}
