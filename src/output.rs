// Terminal output for the CLI.
// Renders leagues, fixtures, tables, squads and favorites as rounded tables or JSON.

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use tabled::builder::Builder;
use tabled::settings::Style;

use pitchside::favorites::{FavoriteFixture, FavoriteTeam};
use pitchside::football::{Match, Standing, TeamDetail};
use pitchside::leagues::{League, LeagueInfo, Zone, status_label};

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn print_success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

pub fn print_error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

pub fn print_heading(title: &str) {
    println!("{}", title.bold().cyan());
}

fn render(builder: Builder) -> String {
    builder.build().with(Style::rounded()).to_string()
}

pub fn leagues_table(leagues: &[LeagueInfo]) -> String {
    let mut builder = Builder::default();
    builder.push_record(["Code", "Name", "Country"]);
    for league in leagues {
        builder.push_record([league.code, league.name, league.country]);
    }
    render(builder)
}

fn score(m: &Match) -> String {
    match (m.score.full_time.home, m.score.full_time.away) {
        (Some(home), Some(away)) => format!("{} - {}", home, away),
        _ => "-".to_string(),
    }
}

pub fn matches_table(matches: &[&Match]) -> String {
    if matches.is_empty() {
        return "No matches found.".to_string();
    }

    let mut builder = Builder::default();
    builder.push_record(["Kickoff (UTC)", "Comp", "MD", "Home", "Score", "Away", "Status"]);
    for m in matches {
        builder.push_record([
            m.utc_date.format("%Y-%m-%d %H:%M").to_string(),
            m.competition.code.clone(),
            m.matchday.map(|d| d.to_string()).unwrap_or_default(),
            m.home_team.display_name().to_string(),
            score(m),
            m.away_team.display_name().to_string(),
            status_label(m.status).to_string(),
        ]);
    }
    render(builder)
}

fn zone_name(zone: Option<Zone>, league: League) -> &'static str {
    match (zone, league.is_league_phase()) {
        (None, _) => "",
        (Some(Zone::Champions), true) => "Round of 16",
        (Some(Zone::Europa), true) => "Play-offs",
        (Some(_), true) => "Out",
        (Some(Zone::Champions), false) => "UCL",
        (Some(Zone::Europa), false) => "UEL",
        (Some(Zone::Conference), false) => "UECL",
        (Some(Zone::RelegationPlayoff), false) => "Play-off",
        (Some(Zone::Relegation), false) => "Relegation",
    }
}

pub fn standings_table(league: League, table: &[Standing]) -> String {
    if table.is_empty() {
        return "No standings available.".to_string();
    }

    let mut builder = Builder::default();
    builder.push_record(["Pos", "Team", "P", "W", "D", "L", "GD", "Pts", "Zone"]);
    for row in table {
        builder.push_record([
            row.position.to_string(),
            row.team.short_name.clone(),
            row.played_games.to_string(),
            row.won.to_string(),
            row.draw.to_string(),
            row.lost.to_string(),
            format!("{:+}", row.goal_difference),
            row.points.to_string(),
            zone_name(league.zones().zone_for(row.position), league).to_string(),
        ]);
    }
    render(builder)
}

pub fn print_team(team: &TeamDetail) {
    print_heading(&format!("{} ({})", team.name, team.tla));
    let field = |label: &str, value: Option<String>| {
        if let Some(value) = value {
            println!("{} {}", format!("{}:", label).dimmed(), value);
        }
    };
    field("Venue", team.venue.clone());
    field("Founded", team.founded.map(|f| f.to_string()));
    field("Colors", team.club_colors.clone());
    field("Coach", team.coach.as_ref().and_then(|c| c.name.clone()));
    field("Website", team.website.clone());
    if !team.running_competitions.is_empty() {
        let codes: Vec<&str> = team
            .running_competitions
            .iter()
            .map(|c| c.code.as_str())
            .collect();
        field("Competitions", Some(codes.join(", ")));
    }

    if team.squad.is_empty() {
        return;
    }
    let mut builder = Builder::default();
    builder.push_record(["Name", "Position", "Nationality", "Born"]);
    for player in &team.squad {
        builder.push_record([
            player.name.clone(),
            player.position.clone().unwrap_or_default(),
            player.nationality.clone().unwrap_or_default(),
            player
                .date_of_birth
                .map(|d| d.to_string())
                .unwrap_or_default(),
        ]);
    }
    println!("{}", render(builder));
}

pub fn favorites_table(favorites: &[FavoriteTeam]) -> String {
    if favorites.is_empty() {
        return "No favorite teams yet.".to_string();
    }

    let mut builder = Builder::default();
    builder.push_record(["Team ID", "Team", "Added"]);
    for favorite in favorites {
        builder.push_record([
            favorite.team_id.to_string(),
            favorite.team_name.clone(),
            favorite.created_at.format("%Y-%m-%d").to_string(),
        ]);
    }
    render(builder)
}

pub fn upcoming_table(upcoming: &[FavoriteFixture]) -> String {
    if upcoming.is_empty() {
        return "No upcoming matches for your favorites this week.".to_string();
    }

    let mut builder = Builder::default();
    builder.push_record(["Team", "Comp", "Opponent", "Kickoff (UTC)", ""]);
    for entry in upcoming {
        builder.push_record([
            entry.team.team_name.clone(),
            entry.fixture.competition.clone(),
            entry.fixture.describe(),
            entry.fixture.utc_date.format("%a %d %b %H:%M").to_string(),
            if entry.fixture.live { "LIVE" } else { "" }.to_string(),
        ]);
    }
    render(builder)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pitchside::football::Team;

    fn standing(position: u32, name: &str, points: u32) -> Standing {
        Standing {
            position,
            team: Team {
                id: position as u64,
                name: format!("{} FC", name),
                short_name: name.to_string(),
                tla: name[..3].to_uppercase(),
                crest: None,
            },
            played_games: 10,
            won: points / 3,
            draw: points % 3,
            lost: 10 - points / 3 - points % 3,
            points,
            goals_for: 10,
            goals_against: 12,
            goal_difference: -2,
        }
    }

    #[test]
    fn test_leagues_table() {
        let leagues: Vec<LeagueInfo> = League::ALL.iter().map(League::info).collect();
        let table = leagues_table(&leagues);
        assert!(table.contains("Bundesliga"));
        assert!(table.contains("FL1"));
    }

    #[test]
    fn test_standings_table_zones() {
        let table = standings_table(
            League::PremierLeague,
            &[standing(1, "Arsenal", 25), standing(18, "Burnley", 7)],
        );
        assert!(table.contains("Arsenal"));
        assert!(table.contains("UCL"));
        assert!(table.contains("Relegation"));
        assert!(table.contains("-2"));

        let cl = standings_table(League::ChampionsLeague, &[standing(9, "Benfica", 10)]);
        assert!(cl.contains("Play-offs"));

        assert_eq!(standings_table(League::SerieA, &[]), "No standings available.");
    }

    #[test]
    fn test_empty_lists() {
        assert_eq!(matches_table(&[]), "No matches found.");
        assert_eq!(favorites_table(&[]), "No favorite teams yet.");
    }
}
