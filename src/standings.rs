// League table context.
// Leader and safety-line points used to frame a team's position for commentary.

use serde::Serialize;

use crate::commentary::CommentInput;
use crate::football::Standing;
use crate::leagues::League;

/// Place whose points mark the knockout play-off line in a league phase.
const LEAGUE_PHASE_LINE: usize = 24;

/// Reference points of a table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeagueContext {
    pub leader_points: u32,
    /// Points of the place that marks the line a team must stay above: the
    /// last play-off place in a league phase, otherwise third from bottom.
    pub line_points: u32,
    pub total_teams: u32,
}

impl LeagueContext {
    pub fn from_table(league: League, table: &[Standing]) -> Self {
        let leader_points = table.first().map(|s| s.points).unwrap_or(0);
        let line = if league.is_league_phase() {
            table.get(LEAGUE_PHASE_LINE - 1)
        } else {
            table.len().checked_sub(3).and_then(|index| table.get(index))
        };

        Self {
            leader_points,
            line_points: line.map(|s| s.points).unwrap_or(0),
            total_teams: table.len() as u32,
        }
    }
}

impl CommentInput {
    /// Build the commentary input for `team_id` from its league table.
    ///
    /// Returns `None` when the team is not in the table.
    pub fn from_table(
        league: League,
        table: &[Standing],
        team_id: u64,
        matchday: Option<u32>,
    ) -> Option<Self> {
        let row = table.iter().find(|s| s.team.id == team_id)?;
        let context = LeagueContext::from_table(league, table);

        Some(Self {
            team_id,
            team_name: row.team.name.clone(),
            position: row.position,
            played_games: row.played_games,
            won: row.won,
            draw: row.draw,
            lost: row.lost,
            points: row.points,
            goal_difference: row.goal_difference,
            league_code: league.code().to_string(),
            matchday,
            leader_points: context.leader_points,
            points_from_leader: context.leader_points as i32 - row.points as i32,
            relegation_points: context.line_points,
            points_from_relegation: row.points as i32 - context.line_points as i32,
            total_teams: context.total_teams,
        })
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::football::{Standing, Team};

    /// A table of `size` teams, ids 1..=size, three points apart from the top.
    pub fn table(size: u32) -> Vec<Standing> {
        (1..=size)
            .map(|position| {
                let points = 3 * (size - position);
                Standing {
                    position,
                    team: Team {
                        id: position as u64,
                        name: format!("Team {}", position),
                        short_name: format!("T{}", position),
                        tla: format!("T{:02}", position),
                        crest: None,
                    },
                    played_games: size - 1,
                    won: size - position,
                    draw: 0,
                    lost: position - 1,
                    points,
                    goals_for: 2 * (size - position),
                    goals_against: 2 * (position - 1),
                    goal_difference: 2 * (size as i32 + 1 - 2 * position as i32),
                }
            })
            .collect()
    }
}
