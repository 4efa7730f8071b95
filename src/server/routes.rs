// Route handlers for the JSON API.
// Query parsing, user identity extraction and response payloads.

use std::sync::Arc;

use axum::{
    Json,
    extract::{FromRequestParts, Path, Query, State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode, request::Parts},
    response::IntoResponse,
};
use chrono::{NaiveDate, Utc};
use futures_util::future::join_all;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::warn;

use crate::commentary::{CommentInput, CommentOutcome, user_facing_error};
use crate::config::GEMINI_KEY_VAR;
use crate::error::{AppError, Result};
use crate::favorites::{FavoriteFixture, FavoriteTeam, NewFavorite, upcoming_for_favorites};
use crate::football::{
    Competition, Match, MatchQuery, MatchStatus, Season, Standing, TeamDetail,
};
use crate::leagues::{League, LeagueInfo, Zone};
use crate::matches::{MatchIndex, matches_on, sort_for_today};
use crate::standings::LeagueContext;

use super::state::AppState;

pub const USER_ID_HEADER: &str = "x-user-id";

/// Caller identity taken from the `x-user-id` header.
pub struct UserId(pub String);

fn user_id_from(headers: &HeaderMap) -> Option<String> {
    headers
        .get(USER_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

impl<S: Send + Sync> FromRequestParts<S> for UserId {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        user_id_from(&parts.headers)
            .map(UserId)
            .ok_or(AppError::MissingUser)
    }
}

/// Missing league means the default one; an unknown code is rejected.
fn parse_league(code: Option<&str>) -> Result<League> {
    match code {
        None | Some("") => Ok(League::default()),
        Some(code) => League::from_code(code)
            .ok_or_else(|| AppError::Validation(format!("Invalid league code: {}", code))),
    }
}

fn parse_team_id(raw: &str) -> Result<u64> {
    raw.parse()
        .map_err(|_| AppError::Validation("Invalid team ID".into()))
}

fn parse_date(name: &str, raw: Option<&str>) -> Result<Option<NaiveDate>> {
    raw.filter(|value| !value.is_empty())
        .map(|value| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
                AppError::Validation(format!("Invalid {}: expected YYYY-MM-DD", name))
            })
        })
        .transpose()
}

pub async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

pub async fn leagues() -> Json<Vec<LeagueInfo>> {
    Json(League::ALL.iter().map(League::info).collect())
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchesParams {
    league: Option<String>,
    date_from: Option<String>,
    date_to: Option<String>,
    status: Option<String>,
    /// Only fixtures kicking off on this UTC day.
    date: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MatchesPayload {
    competition: Competition,
    matches: Vec<Match>,
    index: MatchIndex,
}

pub async fn matches(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(params): Query<MatchesParams>,
) -> Result<Json<MatchesPayload>> {
    let league = parse_league(params.league.as_deref())?;
    let query = MatchQuery {
        date_from: parse_date("dateFrom", params.date_from.as_deref())?,
        date_to: parse_date("dateTo", params.date_to.as_deref())?,
        status: params
            .status
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(str::parse::<MatchStatus>)
            .transpose()?,
    };
    let day = parse_date("date", params.date.as_deref())?;

    let response = state.football.get_matches(league.code(), &query).await?;

    let favorite_ids: Vec<u64> = match user_id_from(&headers) {
        Some(user) => match state.favorites.list(&user).await {
            Ok(favorites) => favorites.iter().map(|f| f.team_id).collect(),
            Err(e) => {
                warn!(%user, error = %e, "could not read favorites, indexing without them");
                Vec::new()
            }
        },
        None => Vec::new(),
    };
    // The index always covers the whole window so a calendar can mark match days
    let index = MatchIndex::build(&response.matches, &favorite_ids);

    let matches = match day {
        Some(day) => matches_on(&response.matches, day, &[])
            .into_iter()
            .cloned()
            .collect(),
        None => response.matches,
    };

    Ok(Json(MatchesPayload {
        competition: response.competition,
        matches,
        index,
    }))
}

/// Today's fixtures across every league: live first, then upcoming, then finished.
pub async fn matches_today(State(state): State<Arc<AppState>>) -> Json<Vec<Match>> {
    let today = Utc::now().date_naive();
    let query = MatchQuery::between(today, today);

    let responses = join_all(
        League::ALL
            .iter()
            .map(|league| state.football.get_matches(league.code(), &query)),
    )
    .await;

    let mut matches = Vec::new();
    for (league, response) in League::ALL.iter().zip(responses) {
        match response {
            Ok(response) => matches.extend(response.matches),
            Err(e) => warn!(league = league.code(), error = %e, "skipping league for today"),
        }
    }
    sort_for_today(&mut matches);

    Json(matches)
}

#[derive(Debug, Default, Deserialize)]
pub struct StandingsParams {
    league: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TableRow {
    #[serde(flatten)]
    standing: Standing,
    zone: Option<Zone>,
}

#[derive(Debug, Serialize)]
pub struct StandingsPayload {
    competition: Competition,
    season: Season,
    context: LeagueContext,
    table: Vec<TableRow>,
}

pub async fn standings(
    State(state): State<Arc<AppState>>,
    Query(params): Query<StandingsParams>,
) -> Result<Json<StandingsPayload>> {
    let league = parse_league(params.league.as_deref())?;
    let response = state.football.get_standings(league.code()).await?;

    let table = response.total_table();
    let context = LeagueContext::from_table(league, table);
    let table = table
        .iter()
        .map(|standing| TableRow {
            zone: league.zones().zone_for(standing.position),
            standing: standing.clone(),
        })
        .collect();

    Ok(Json(StandingsPayload {
        competition: response.competition,
        season: response.season,
        context,
        table,
    }))
}

pub async fn team(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<TeamDetail>> {
    let team_id = parse_team_id(&id)?;
    Ok(Json(state.football.get_team(team_id).await?))
}

#[derive(Debug, Deserialize)]
pub struct CommentRequest {
    #[serde(flatten)]
    input: CommentInput,
    #[serde(default)]
    refresh: bool,
}

pub async fn comment(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<CommentRequest>, JsonRejection>,
) -> Result<Json<CommentOutcome>> {
    let Json(request) = payload.map_err(|rejection| user_facing_error(rejection.into()))?;
    let service = state
        .comments
        .as_ref()
        .ok_or_else(|| user_facing_error(AppError::MissingApiKey(GEMINI_KEY_VAR)))?;

    let outcome = service
        .generate_team_comment(&request.input, request.refresh)
        .await?;
    Ok(Json(outcome))
}

pub async fn list_favorites(
    State(state): State<Arc<AppState>>,
    UserId(user): UserId,
) -> Result<Json<Vec<FavoriteTeam>>> {
    Ok(Json(state.favorites.list(&user).await?))
}

pub async fn add_favorite(
    State(state): State<Arc<AppState>>,
    UserId(user): UserId,
    payload: std::result::Result<Json<NewFavorite>, JsonRejection>,
) -> Result<(StatusCode, Json<FavoriteTeam>)> {
    let Json(new) = payload?;
    let favorite = state.favorites.add(&user, new).await?;
    Ok((StatusCode::CREATED, Json(favorite)))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteStatus {
    team_id: u64,
    is_favorite: bool,
}

pub async fn favorite_status(
    State(state): State<Arc<AppState>>,
    UserId(user): UserId,
    Path(team_id): Path<String>,
) -> Result<Json<FavoriteStatus>> {
    let team_id = parse_team_id(&team_id)?;
    let is_favorite = state.favorites.is_favorite(&user, team_id).await?;
    Ok(Json(FavoriteStatus {
        team_id,
        is_favorite,
    }))
}

pub async fn remove_favorite(
    State(state): State<Arc<AppState>>,
    UserId(user): UserId,
    Path(team_id): Path<String>,
) -> Result<StatusCode> {
    let team_id = parse_team_id(&team_id)?;
    state.favorites.remove(&user, team_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn upcoming_favorites(
    State(state): State<Arc<AppState>>,
    UserId(user): UserId,
) -> Result<Json<Vec<FavoriteFixture>>> {
    let favorites = state.favorites.list(&user).await?;
    let today = Utc::now().date_naive();
    Ok(Json(
        upcoming_for_favorites(&state.football, &favorites, today).await,
    ))
}
