// football-data.org API response types.
// Defines structs for deserializing competitions, matches, standings and team details.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Competition format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CompetitionType {
    League,
    Cup,
    SuperCup,
    Playoffs,
    #[serde(other)]
    Unknown,
}

/// A competition (league or cup).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Competition {
    pub id: u64,
    pub name: String,
    pub code: String,
    #[serde(rename = "type")]
    pub competition_type: CompetitionType,
    pub emblem: Option<String>,
}

/// A team as listed in standings and team detail responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: u64,
    pub name: String,
    pub short_name: String,
    pub tla: String,
    pub crest: Option<String>,
}

/// A team slot in a fixture. Every field is null while the team is undecided
/// (knockout rounds).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchTeam {
    pub id: Option<u64>,
    pub name: Option<String>,
    pub short_name: Option<String>,
    pub tla: Option<String>,
    pub crest: Option<String>,
}

impl MatchTeam {
    /// Preferred display name: short name, then full name, then "TBD".
    pub fn display_name(&self) -> &str {
        self.short_name
            .as_deref()
            .or(self.name.as_deref())
            .unwrap_or("TBD")
    }
}

/// Head coach.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coach {
    pub id: Option<u64>,
    pub name: Option<String>,
    pub nationality: Option<String>,
}

/// Squad member.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: u64,
    pub name: String,
    pub position: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub nationality: Option<String>,
}

/// Team detail including squad and running competitions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamDetail {
    pub id: u64,
    pub name: String,
    pub short_name: String,
    pub tla: String,
    pub crest: Option<String>,
    pub address: Option<String>,
    pub website: Option<String>,
    pub founded: Option<u32>,
    pub club_colors: Option<String>,
    pub venue: Option<String>,
    pub coach: Option<Coach>,
    #[serde(default)]
    pub squad: Vec<Player>,
    #[serde(default)]
    pub running_competitions: Vec<Competition>,
}

/// Match status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchStatus {
    Scheduled,
    Timed,
    InPlay,
    Paused,
    Finished,
    Suspended,
    Postponed,
    Cancelled,
    Awarded,
}

impl MatchStatus {
    pub const ALL: [MatchStatus; 9] = [
        MatchStatus::Scheduled,
        MatchStatus::Timed,
        MatchStatus::InPlay,
        MatchStatus::Paused,
        MatchStatus::Finished,
        MatchStatus::Suspended,
        MatchStatus::Postponed,
        MatchStatus::Cancelled,
        MatchStatus::Awarded,
    ];

    /// Being played right now (including half time).
    pub fn is_live(&self) -> bool {
        matches!(self, MatchStatus::InPlay | MatchStatus::Paused)
    }

    /// Not yet kicked off.
    pub fn is_upcoming(&self) -> bool {
        matches!(self, MatchStatus::Scheduled | MatchStatus::Timed)
    }

    pub fn is_finished(&self) -> bool {
        matches!(self, MatchStatus::Finished)
    }

    /// Wire representation, as used in query parameters.
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStatus::Scheduled => "SCHEDULED",
            MatchStatus::Timed => "TIMED",
            MatchStatus::InPlay => "IN_PLAY",
            MatchStatus::Paused => "PAUSED",
            MatchStatus::Finished => "FINISHED",
            MatchStatus::Suspended => "SUSPENDED",
            MatchStatus::Postponed => "POSTPONED",
            MatchStatus::Cancelled => "CANCELLED",
            MatchStatus::Awarded => "AWARDED",
        }
    }
}

impl FromStr for MatchStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MatchStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| AppError::Validation(format!("Invalid match status: {}", s)))
    }
}

/// Result of a finished match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Winner {
    HomeTeam,
    AwayTeam,
    Draw,
}

/// Goals per side; null before kickoff.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreLine {
    pub home: Option<u32>,
    pub away: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Score {
    pub winner: Option<Winner>,
    pub full_time: ScoreLine,
    pub half_time: ScoreLine,
}

/// A single fixture.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub id: u64,
    pub utc_date: DateTime<Utc>,
    pub status: MatchStatus,
    pub matchday: Option<u32>,
    pub stage: Option<String>,
    pub home_team: MatchTeam,
    pub away_team: MatchTeam,
    pub score: Score,
    pub competition: Competition,
}

impl Match {
    /// Whether the given team plays in this fixture.
    pub fn involves(&self, team_id: u64) -> bool {
        self.home_team.id == Some(team_id) || self.away_team.id == Some(team_id)
    }
}

/// Response wrapper for a competition's matches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchesResponse {
    pub competition: Competition,
    pub matches: Vec<Match>,
}

/// A row of a league table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Standing {
    pub position: u32,
    pub team: Team,
    pub played_games: u32,
    pub won: u32,
    pub draw: u32,
    pub lost: u32,
    pub points: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    pub goal_difference: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Season {
    pub id: u64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub current_matchday: Option<u32>,
}

/// One table of a standings response (TOTAL, HOME or AWAY).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandingsGroup {
    pub stage: String,
    #[serde(rename = "type")]
    pub table_type: String,
    pub table: Vec<Standing>,
}

/// Response wrapper for a competition's standings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandingsResponse {
    pub competition: Competition,
    pub season: Season,
    pub standings: Vec<StandingsGroup>,
}

impl StandingsResponse {
    /// The overall table, falling back to the first group.
    pub fn total_table(&self) -> &[Standing] {
        self.standings
            .iter()
            .find(|group| group.table_type == "TOTAL")
            .or_else(|| self.standings.first())
            .map(|group| group.table.as_slice())
            .unwrap_or(&[])
    }
}

/// Rate limit information from response headers.
#[derive(Debug, Clone, Default)]
pub struct RateLimit {
    /// Requests left in the current minute.
    pub available: Option<u64>,
    /// Seconds until the request counter resets.
    pub reset_secs: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_tbd_match() {
        let json = r#"{
            "id": 1,
            "utcDate": "2025-03-04T20:00:00Z",
            "status": "TIMED",
            "matchday": null,
            "stage": "LAST_16",
            "homeTeam": {"id": null, "name": null, "shortName": null, "tla": null, "crest": null},
            "awayTeam": {"id": 5, "name": "FC Bayern München", "shortName": "Bayern", "tla": "FCB", "crest": null},
            "score": {"winner": null, "fullTime": {"home": null, "away": null}, "halfTime": {"home": null, "away": null}},
            "competition": {"id": 2001, "name": "UEFA Champions League", "code": "CL", "type": "CUP", "emblem": null}
        }"#;

        let m: Match = serde_json::from_str(json).unwrap();
        assert_eq!(m.home_team.display_name(), "TBD");
        assert_eq!(m.away_team.display_name(), "Bayern");
        assert!(m.status.is_upcoming());
        assert!(m.involves(5));
        assert!(!m.involves(6));
        assert_eq!(m.competition.competition_type, CompetitionType::Cup);
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        let err = serde_json::from_str::<MatchStatus>(r#""HALF_TIME""#);
        assert!(err.is_err());
        assert_eq!(
            serde_json::from_str::<MatchStatus>(r#""IN_PLAY""#).unwrap(),
            MatchStatus::InPlay
        );
    }

    #[test]
    fn test_parse_status() {
        assert_eq!("FINISHED".parse::<MatchStatus>().unwrap(), MatchStatus::Finished);
        assert_eq!("in_play".parse::<MatchStatus>().unwrap(), MatchStatus::InPlay);
        assert!("LIVE".parse::<MatchStatus>().is_err());
    }

    #[test]
    fn test_total_table_prefers_total_group() {
        let json = r#"{
            "competition": {"id": 2021, "name": "Premier League", "code": "PL", "type": "LEAGUE", "emblem": null},
            "season": {"id": 2403, "startDate": "2025-08-15", "endDate": "2026-05-24", "currentMatchday": 9},
            "standings": [
                {"stage": "REGULAR_SEASON", "type": "HOME", "table": []},
                {"stage": "REGULAR_SEASON", "type": "TOTAL", "table": [
                    {"position": 1, "team": {"id": 57, "name": "Arsenal FC", "shortName": "Arsenal", "tla": "ARS", "crest": null},
                     "playedGames": 9, "won": 7, "draw": 1, "lost": 1, "points": 22,
                     "goalsFor": 16, "goalsAgainst": 3, "goalDifference": 13}
                ]}
            ]
        }"#;

        let standings: StandingsResponse = serde_json::from_str(json).unwrap();
        let table = standings.total_table();
        assert_eq!(table.len(), 1);
        assert_eq!(table[0].team.tla, "ARS");
        assert_eq!(standings.season.current_matchday, Some(9));
    }
}
