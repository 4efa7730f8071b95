// Fixture analysis.
// Matchday indexing, list/calendar filters, recent form and next-fixture lookup over match lists.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::football::{Match, MatchTeam, Winner};

/// Fixture counts for one matchday.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MatchdayCounts {
    pub total: u32,
    pub live: u32,
    pub finished: u32,
}

/// A team selectable in filters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeamOption {
    pub id: u64,
    pub name: String,
    pub crest: Option<String>,
}

/// Summary of a competition's match list used to drive filters.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchIndex {
    /// Distinct matchdays in ascending order.
    pub matchdays: Vec<u32>,
    pub matchday_counts: BTreeMap<u32, MatchdayCounts>,
    /// Distinct teams sorted by name.
    pub teams: Vec<TeamOption>,
    /// Favorite team ids that play in this competition, in favorites order.
    pub league_favorite_team_ids: Vec<u64>,
}

impl MatchIndex {
    pub fn build(matches: &[Match], favorite_team_ids: &[u64]) -> Self {
        let mut matchdays = BTreeSet::new();
        let mut matchday_counts: BTreeMap<u32, MatchdayCounts> = BTreeMap::new();
        let mut teams: HashMap<u64, TeamOption> = HashMap::new();

        for m in matches {
            if let Some(matchday) = m.matchday {
                matchdays.insert(matchday);
                let counts = matchday_counts.entry(matchday).or_default();
                counts.total += 1;
                if m.status.is_live() {
                    counts.live += 1;
                }
                if m.status.is_finished() {
                    counts.finished += 1;
                }
            }

            for side in [&m.home_team, &m.away_team] {
                if let Some(option) = team_option(side) {
                    teams.insert(option.id, option);
                }
            }
        }

        let mut teams: Vec<TeamOption> = teams.into_values().collect();
        teams.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));

        let league_favorite_team_ids = favorite_team_ids
            .iter()
            .copied()
            .filter(|id| teams.iter().any(|t| t.id == *id))
            .collect();

        Self {
            matchdays: matchdays.into_iter().collect(),
            matchday_counts,
            teams,
            league_favorite_team_ids,
        }
    }
}

fn team_option(team: &MatchTeam) -> Option<TeamOption> {
    let id = team.id?;
    Some(TeamOption {
        id,
        name: team.name.clone().unwrap_or_else(|| "Unknown".to_string()),
        crest: team.crest.clone(),
    })
}

fn involves_any(m: &Match, team_ids: &[u64]) -> bool {
    team_ids.is_empty() || team_ids.iter().any(|id| m.involves(*id))
}

fn by_kickoff(a: &&Match, b: &&Match) -> Ordering {
    a.utc_date.cmp(&b.utc_date)
}

/// List view filter: a matchday, then a set of teams within it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilter {
    pub matchday: Option<u32>,
    pub team_ids: Vec<u64>,
}

impl ListFilter {
    /// Matching fixtures ordered by kickoff.
    pub fn apply<'a>(&self, matches: &'a [Match]) -> Vec<&'a Match> {
        let mut result: Vec<&Match> = matches
            .iter()
            .filter(|m| self.matchday.is_none() || m.matchday == self.matchday)
            .filter(|m| involves_any(m, &self.team_ids))
            .collect();
        result.sort_by(by_kickoff);
        result
    }
}

/// Calendar view: fixtures kicking off on a UTC date, optionally limited to some teams.
pub fn matches_on<'a>(matches: &'a [Match], date: NaiveDate, team_ids: &[u64]) -> Vec<&'a Match> {
    let mut result: Vec<&Match> = matches
        .iter()
        .filter(|m| involves_any(m, team_ids))
        .filter(|m| m.utc_date.date_naive() == date)
        .collect();
    result.sort_by(by_kickoff);
    result
}

/// Order for a "today" listing: live, then upcoming, then finished; each by kickoff.
pub fn sort_for_today(matches: &mut [Match]) {
    fn rank(m: &Match) -> u8 {
        if m.status.is_live() {
            0
        } else if !m.status.is_finished() {
            1
        } else {
            2
        }
    }

    matches.sort_by(|a, b| rank(a).cmp(&rank(b)).then(a.utc_date.cmp(&b.utc_date)));
}

/// Result of a finished match from one team's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FormResult {
    Win,
    Draw,
    Loss,
}

impl FormResult {
    pub fn symbol(&self) -> char {
        match self {
            FormResult::Win => 'W',
            FormResult::Draw => 'D',
            FormResult::Loss => 'L',
        }
    }
}

/// Render a form sequence as a compact string such as "WWDLW".
pub fn form_string(form: &[FormResult]) -> String {
    form.iter().map(FormResult::symbol).collect()
}

fn winner_of(m: &Match) -> Option<Winner> {
    if let Some(winner) = m.score.winner {
        return Some(winner);
    }
    let (home, away) = (m.score.full_time.home?, m.score.full_time.away?);
    Some(match home.cmp(&away) {
        Ordering::Greater => Winner::HomeTeam,
        Ordering::Less => Winner::AwayTeam,
        Ordering::Equal => Winner::Draw,
    })
}

/// The last `n` finished results for a team, newest first.
pub fn team_form(matches: &[Match], team_id: u64, n: usize) -> Vec<FormResult> {
    let mut finished: Vec<&Match> = matches
        .iter()
        .filter(|m| m.involves(team_id) && m.status.is_finished())
        .collect();
    finished.sort_by(|a, b| b.utc_date.cmp(&a.utc_date));

    finished
        .into_iter()
        .filter_map(|m| {
            let is_home = m.home_team.id == Some(team_id);
            let result = match winner_of(m)? {
                Winner::Draw => FormResult::Draw,
                Winner::HomeTeam if is_home => FormResult::Win,
                Winner::AwayTeam if !is_home => FormResult::Win,
                _ => FormResult::Loss,
            };
            Some(result)
        })
        .take(n)
        .collect()
}

/// A team's next (or current) fixture.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NextFixture {
    pub match_id: u64,
    pub competition: String,
    pub opponent: String,
    pub opponent_crest: Option<String>,
    pub is_home: bool,
    pub utc_date: DateTime<Utc>,
    pub live: bool,
}

impl NextFixture {
    fn from_match(m: &Match, team_id: u64) -> Self {
        let is_home = m.home_team.id == Some(team_id);
        let opponent = if is_home { &m.away_team } else { &m.home_team };
        Self {
            match_id: m.id,
            competition: m.competition.code.clone(),
            opponent: opponent.display_name().to_string(),
            opponent_crest: opponent.crest.clone(),
            is_home,
            utc_date: m.utc_date,
            live: m.status.is_live(),
        }
    }

    /// "Opponent (H)" or "Opponent (A)".
    pub fn describe(&self) -> String {
        format!(
            "{} ({})",
            self.opponent,
            if self.is_home { "H" } else { "A" }
        )
    }
}

/// Earliest scheduled fixture for a team.
pub fn next_fixture(matches: &[Match], team_id: u64) -> Option<NextFixture> {
    matches
        .iter()
        .filter(|m| m.involves(team_id) && m.status.is_upcoming())
        .min_by_key(|m| m.utc_date)
        .map(|m| NextFixture::from_match(m, team_id))
}

/// A team's live fixture if one is in progress, otherwise its next scheduled one.
pub fn live_or_next_fixture(matches: &[Match], team_id: u64) -> Option<NextFixture> {
    matches
        .iter()
        .filter(|m| m.involves(team_id) && m.status.is_live())
        .min_by_key(|m| m.utc_date)
        .map(|m| NextFixture::from_match(m, team_id))
        .or_else(|| next_fixture(matches, team_id))
}

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::{TimeZone, Utc};

    use crate::football::{
        Competition, CompetitionType, Match, MatchStatus, MatchTeam, Score, ScoreLine, Winner,
    };

    pub fn team(id: u64, name: &str) -> MatchTeam {
        MatchTeam {
            id: Some(id),
            name: Some(format!("{} FC", name)),
            short_name: Some(name.to_string()),
            tla: Some(name[..3].to_uppercase()),
            crest: None,
        }
    }

    pub fn competition(code: &str) -> Competition {
        Competition {
            id: 2021,
            name: code.to_string(),
            code: code.to_string(),
            competition_type: CompetitionType::League,
            emblem: None,
        }
    }

    /// A fixture on October `day` at 15:00 UTC.
    pub fn fixture(
        id: u64,
        day: u32,
        matchday: u32,
        home: (u64, &str),
        away: (u64, &str),
        status: MatchStatus,
        goals: Option<(u32, u32)>,
    ) -> Match {
        let winner = goals.map(|(h, a)| {
            if h > a {
                Winner::HomeTeam
            } else if a > h {
                Winner::AwayTeam
            } else {
                Winner::Draw
            }
        });
        Match {
            id,
            utc_date: Utc.with_ymd_and_hms(2025, 10, day, 15, 0, 0).unwrap(),
            status,
            matchday: Some(matchday),
            stage: Some("REGULAR_SEASON".to_string()),
            home_team: team(home.0, home.1),
            away_team: team(away.0, away.1),
            score: Score {
                winner,
                full_time: ScoreLine {
                    home: goals.map(|g| g.0),
                    away: goals.map(|g| g.1),
                },
                half_time: ScoreLine::default(),
            },
            competition: competition("PL"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::fixture;
    use super::*;
    use crate::football::MatchStatus::{Finished, InPlay, Paused, Scheduled, Timed};

    const ARS: (u64, &str) = (57, "Arsenal");
    const CHE: (u64, &str) = (61, "Chelsea");
    const LIV: (u64, &str) = (64, "Liverpool");
    const TOT: (u64, &str) = (73, "Tottenham");

    fn season() -> Vec<Match> {
        vec![
            fixture(1, 4, 7, ARS, CHE, Finished, Some((2, 0))),
            fixture(2, 4, 7, LIV, TOT, Finished, Some((1, 1))),
            fixture(3, 11, 8, CHE, LIV, Finished, Some((3, 1))),
            fixture(4, 11, 8, TOT, ARS, Finished, Some((2, 1))),
            fixture(5, 18, 9, ARS, LIV, InPlay, Some((0, 0))),
            fixture(6, 18, 9, CHE, TOT, Paused, Some((1, 0))),
            fixture(7, 25, 10, LIV, ARS, Timed, None),
            fixture(8, 26, 10, TOT, CHE, Scheduled, None),
        ]
    }

    #[test]
    fn test_match_index() {
        let matches = season();
        let index = MatchIndex::build(&matches, &[64, 999, 57]);

        assert_eq!(index.matchdays, vec![7, 8, 9, 10]);
        assert_eq!(
            index.matchday_counts[&9],
            MatchdayCounts {
                total: 2,
                live: 2,
                finished: 0
            }
        );
        assert_eq!(index.matchday_counts[&7].finished, 2);

        let names: Vec<&str> = index.teams.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Arsenal FC", "Chelsea FC", "Liverpool FC", "Tottenham FC"]
        );
        assert_eq!(index.league_favorite_team_ids, vec![64, 57]);
    }

    #[test]
    fn test_list_filter() {
        let matches = season();

        let all = ListFilter::default().apply(&matches);
        assert_eq!(all.len(), 8);

        let filter = ListFilter {
            matchday: Some(10),
            team_ids: vec![],
        };
        let ids: Vec<u64> = filter.apply(&matches).iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![7, 8]);

        let filter = ListFilter {
            matchday: Some(8),
            team_ids: vec![57],
        };
        let ids: Vec<u64> = filter.apply(&matches).iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![4]);
    }

    #[test]
    fn test_matches_on_date() {
        let matches = season();
        let day = NaiveDate::from_ymd_opt(2025, 10, 11).unwrap();

        assert_eq!(matches_on(&matches, day, &[]).len(), 2);
        let ids: Vec<u64> = matches_on(&matches, day, &[73]).iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![4]);

        let empty_day = NaiveDate::from_ymd_opt(2025, 10, 12).unwrap();
        assert!(matches_on(&matches, empty_day, &[]).is_empty());
    }

    #[test]
    fn test_sort_for_today() {
        let mut matches = vec![
            fixture(1, 18, 9, ARS, CHE, Finished, Some((1, 0))),
            fixture(2, 19, 9, LIV, TOT, Timed, None),
            fixture(3, 18, 9, CHE, LIV, InPlay, Some((0, 0))),
            fixture(4, 17, 9, TOT, ARS, Scheduled, None),
        ];
        sort_for_today(&mut matches);
        let ids: Vec<u64> = matches.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![3, 4, 2, 1]);
    }

    #[test]
    fn test_team_form_newest_first() {
        let matches = season();

        // Arsenal: beat Chelsea (Oct 4), lost at Tottenham (Oct 11); Oct 18 is live
        let form = team_form(&matches, 57, 5);
        assert_eq!(form, vec![FormResult::Loss, FormResult::Win]);
        assert_eq!(form_string(&form), "LW");

        // Liverpool: drew with Spurs, lost at Chelsea
        assert_eq!(form_string(&team_form(&matches, 64, 5)), "LD");
        assert_eq!(team_form(&matches, 64, 1), vec![FormResult::Loss]);
        assert!(team_form(&matches, 1, 5).is_empty());
    }

    #[test]
    fn test_form_without_winner_uses_score() {
        let mut m = fixture(1, 4, 7, ARS, CHE, Finished, Some((0, 2)));
        m.score.winner = None;
        assert_eq!(team_form(&[m], 61, 5), vec![FormResult::Win]);
    }

    #[test]
    fn test_next_fixture() {
        let matches = season();

        let next = next_fixture(&matches, 57).unwrap();
        assert_eq!(next.match_id, 7);
        assert!(!next.is_home);
        assert_eq!(next.describe(), "Liverpool (A)");

        // Live match takes precedence for the favorites view
        let current = live_or_next_fixture(&matches, 57).unwrap();
        assert_eq!(current.match_id, 5);
        assert!(current.live);
        assert!(current.is_home);

        assert!(next_fixture(&matches, 1).is_none());
    }
}
