// Commentary prompts.
// Domestic league and Champions League phase prompts built from a team's record.

use crate::leagues::{League, validate_league_code};

use super::{CommentInput, MatchContext};

/// Pick the prompt matching the competition format.
pub fn build_prompt(input: &CommentInput, context: &MatchContext) -> String {
    let league = validate_league_code(Some(input.league_code.as_str()));
    if league.is_league_phase() {
        league_phase_prompt(input, context)
    } else {
        domestic_prompt(input, league, context)
    }
}

/// Percentages and points per game, zero when no games have been played.
struct Rates {
    win: String,
    draw: String,
    loss: String,
    points_per_game: String,
}

impl Rates {
    fn of(input: &CommentInput) -> Self {
        if input.played_games == 0 {
            return Self {
                win: "0".into(),
                draw: "0".into(),
                loss: "0".into(),
                points_per_game: "0".into(),
            };
        }
        let played = input.played_games as f64;
        let pct = |n: u32| format!("{:.0}", n as f64 / played * 100.0);
        Self {
            win: pct(input.won),
            draw: pct(input.draw),
            loss: pct(input.lost),
            points_per_game: format!("{:.2}", input.points as f64 / played),
        }
    }
}

fn zone_suffix(league: League, position: u32) -> String {
    league
        .zone_label(position)
        .map(|label| format!(" ({})", label))
        .unwrap_or_default()
}

fn context_lines(context: &MatchContext) -> String {
    let mut lines = String::new();
    if !context.recent_form.is_empty() {
        lines.push_str(&format!(
            "- Recent results: {} (newest first; W win, D draw, L loss)\n",
            context.recent_form
        ));
    }
    if let Some(opponent) = &context.next_opponent {
        lines.push_str(&format!("- Next match: vs {}\n", opponent));
    }
    lines
}

fn record_section(input: &CommentInput) -> String {
    let rates = Rates::of(input);
    format!(
        "[Record]
- Won {won}, drawn {draw}, lost {lost}
- Win rate: {win}% / Draw rate: {draw_rate}% / Loss rate: {loss}%
- Points: {points} ({ppg} per game)
- Goal difference: {gd:+}
",
        won = input.won,
        draw = input.draw,
        lost = input.lost,
        win = rates.win,
        draw_rate = rates.draw,
        loss = rates.loss,
        points = input.points,
        ppg = rates.points_per_game,
        gd = input.goal_difference,
    )
}

const OUTPUT_RULES: &str = "[Output]
Output the comment only.";

fn domestic_prompt(input: &CommentInput, league: League, context: &MatchContext) -> String {
    let matchday = input
        .matchday
        .map(|m| m.to_string())
        .unwrap_or_else(|| "?".to_string());

    format!(
        "Give a short commentary on the following football team's season so far, drawing inferences from its statistics.

[Team]
- Name: {name}
- League: {league}
- Position: {position} of {total}{zone}
- Games played: {played} (as of matchday {matchday})

{record}
[Place in the league]
- Points behind the leader: {from_leader} (leader: {leader_points} pts)
- Points above the relegation zone: {from_line:+} (relegation line: {line_points} pts)
{context}
[Requirements]
- 2 to 3 sentences, roughly 40 to 60 words, always ending on a complete sentence
- A friendly, natural tone addressed to football fans
- Briefly cover the team's situation, current form and the race it is part of
- No emoji

{output}",
        name = input.team_name,
        league = league.name(),
        position = input.position,
        total = input.total_teams,
        zone = zone_suffix(league, input.position),
        played = input.played_games,
        matchday = matchday,
        record = record_section(input),
        from_leader = input.points_from_leader,
        leader_points = input.leader_points,
        from_line = input.points_from_relegation,
        line_points = input.relegation_points,
        context = context_lines(context),
        output = OUTPUT_RULES,
    )
}

fn league_phase_prompt(input: &CommentInput, context: &MatchContext) -> String {
    let league = League::ChampionsLeague;

    format!(
        "Give a short commentary on the following UEFA Champions League team's campaign so far, drawing inferences from its statistics.

[Format]
The Champions League is played as a single 36-team league phase.
- Each team plays 8 matches (4 at home, 4 away)
- Places 1 to 8 go straight to the round of 16
- Places 9 to 24 enter the knockout play-offs (two legs, winners reach the round of 16)
- Places 25 and below are eliminated

[Team]
- Name: {name}
- Position: {position} of {total}{zone}
- Games played: {played} of 8

{record}
[Place in the league phase]
- Points behind the leader: {from_leader} (leader: {leader_points} pts)
- Points of the play-off line (24th place): {line_points} pts
{context}
[Requirements]
- 2 to 3 sentences, roughly 40 to 60 words, always ending on a complete sentence
- A friendly, natural tone addressed to football fans
- Frame the comment around direct qualification, the play-offs and elimination
- Do not talk about relegation; the competition has none
- No emoji

{output}",
        name = input.team_name,
        position = input.position,
        total = input.total_teams,
        zone = zone_suffix(league, input.position),
        played = input.played_games,
        record = record_section(input),
        from_leader = input.points_from_leader,
        leader_points = input.leader_points,
        line_points = input.relegation_points,
        context = context_lines(context),
        output = OUTPUT_RULES,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(league_code: &str) -> CommentInput {
        CommentInput {
            team_id: 57,
            team_name: "Arsenal FC".to_string(),
            position: 2,
            played_games: 9,
            won: 6,
            draw: 2,
            lost: 1,
            points: 20,
            goal_difference: -3,
            league_code: league_code.to_string(),
            matchday: Some(9),
            leader_points: 19,
            points_from_leader: 2,
            relegation_points: 4,
            points_from_relegation: 13,
            total_teams: 20,
        }
    }

    #[test]
    fn test_domestic_prompt() {
        let context = MatchContext {
            recent_form: "WWDLW".to_string(),
            next_opponent: Some("Liverpool (A)".to_string()),
        };
        let prompt = build_prompt(&input("PL"), &context);

        assert!(prompt.contains("- League: Premier League"));
        assert!(prompt.contains("- Position: 2 of 20 (Champions League place)"));
        assert!(prompt.contains("(as of matchday 9)"));
        assert!(prompt.contains("Win rate: 67% / Draw rate: 22% / Loss rate: 11%"));
        assert!(prompt.contains("Points: 20 (2.22 per game)"));
        assert!(prompt.contains("Goal difference: -3"));
        assert!(prompt.contains("Points above the relegation zone: +13"));
        assert!(prompt.contains("- Recent results: WWDLW"));
        assert!(prompt.contains("- Next match: vs Liverpool (A)"));
        assert!(prompt.ends_with("Output the comment only."));
    }

    #[test]
    fn test_domestic_prompt_without_context() {
        let mut input = input("SA");
        input.played_games = 0;
        input.matchday = None;
        input.position = 11;
        let prompt = build_prompt(&input, &MatchContext::default());

        assert!(prompt.contains("- Position: 11 of 20\n"));
        assert!(prompt.contains("(as of matchday ?)"));
        assert!(prompt.contains("Win rate: 0% / Draw rate: 0% / Loss rate: 0%"));
        assert!(prompt.contains("Points: 20 (0 per game)"));
        assert!(!prompt.contains("Recent results"));
        assert!(!prompt.contains("Next match"));
    }

    #[test]
    fn test_league_phase_prompt() {
        let mut input = input("CL");
        input.position = 12;
        input.played_games = 6;
        input.total_teams = 36;
        let prompt = build_prompt(&input, &MatchContext::default());

        assert!(prompt.contains("36-team league phase"));
        assert!(prompt.contains("- Position: 12 of 36 (knockout play-off place)"));
        assert!(prompt.contains("Points of the play-off line (24th place): 4 pts"));
        assert!(prompt.contains("Games played: 6 of 8"));
        assert!(!prompt.contains("relegation zone"));
    }
}
