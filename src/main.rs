// pitchside entry point.
// Loads settings and dispatches CLI subcommands.

mod cli;
mod output;

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use clap::Parser;
use colored::Colorize;

use cli::{CacheCommands, Cli, Commands, FavoritesCommands, MatchesArgs, OutputFormat};
use output::{print_error, print_heading, print_json, print_success};
use pitchside::cache;
use pitchside::commentary::{CommentInput, CommentService, CommentStore};
use pitchside::config::Settings;
use pitchside::favorites::{FavoritesStore, NewFavorite, upcoming_for_favorites};
use pitchside::football::{FootballClient, Match, MatchQuery, MatchStatus};
use pitchside::gemini::GeminiClient;
use pitchside::leagues::League;
use pitchside::matches::{ListFilter, matches_on, sort_for_today};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        print_error(&format!("{e:#}"));
        std::process::exit(1);
    }
}

fn parse_league(code: &str) -> Result<League> {
    League::from_code(&code.to_uppercase())
        .with_context(|| format!("Unknown league code: {code} (expected PL, BL1, SA, PD, FL1 or CL)"))
}

fn parse_date(raw: Option<&str>) -> Result<Option<NaiveDate>> {
    raw.map(|value| {
        NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .with_context(|| format!("Invalid date {value}, expected YYYY-MM-DD"))
    })
    .transpose()
}

async fn run() -> Result<()> {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let mut settings = Settings::load(cli.config.as_deref()).context("Failed to load configuration")?;
    pitchside::init_tracing(&settings.logging.level);
    let format = cli.format;

    match cli.command {
        Commands::Serve(args) => {
            if let Some(port) = args.port {
                settings.server.port = port;
            }
            pitchside::server::serve(&settings).await?;
        }
        Commands::Leagues => {
            let leagues: Vec<_> = League::ALL.iter().map(League::info).collect();
            match format {
                OutputFormat::Json => print_json(&leagues)?,
                OutputFormat::Table => println!("{}", output::leagues_table(&leagues)),
            }
        }
        Commands::Matches(args) => {
            let football = FootballClient::from_settings(&settings)?;
            matches(&football, args, format).await?;
        }
        Commands::Standings(args) => {
            let league = parse_league(&args.league)?;
            let football = FootballClient::from_settings(&settings)?;
            let standings = football.get_standings(league.code()).await?;
            match format {
                OutputFormat::Json => print_json(&standings)?,
                OutputFormat::Table => {
                    let matchday = standings
                        .season
                        .current_matchday
                        .map(|m| format!(", matchday {m}"))
                        .unwrap_or_default();
                    print_heading(&format!("{}{}", league.name(), matchday));
                    println!("{}", output::standings_table(league, standings.total_table()));
                }
            }
        }
        Commands::Team(args) => {
            let football = FootballClient::from_settings(&settings)?;
            let team = football.get_team(args.id).await?;
            match format {
                OutputFormat::Json => print_json(&team)?,
                OutputFormat::Table => output::print_team(&team),
            }
        }
        Commands::Comment(args) => {
            let league = parse_league(&args.league.league)?;
            let football = Arc::new(FootballClient::from_settings(&settings)?);
            let standings = football.get_standings(league.code()).await?;
            let input = CommentInput::from_table(
                league,
                standings.total_table(),
                args.team_id,
                standings.season.current_matchday,
            )
            .with_context(|| format!("Team {} is not in the {} table", args.team_id, league.code()))?;

            let service = CommentService::new(
                football,
                Arc::new(GeminiClient::from_settings(&settings)?),
                CommentStore::new(settings.cache_dir()?),
            );
            let outcome = service.generate_team_comment(&input, args.refresh).await?;
            match format {
                OutputFormat::Json => print_json(&outcome)?,
                OutputFormat::Table => {
                    let source = if outcome.cached { " (cached)" } else { "" };
                    print_heading(&format!("{}{}", input.team_name, source));
                    println!("{}", outcome.comment);
                }
            }
        }
        Commands::Favorites(args) => {
            let store = FavoritesStore::new(settings.cache_dir()?);
            let user = args.user.as_str();
            match args.command {
                FavoritesCommands::List => {
                    let favorites = store.list(user).await?;
                    match format {
                        OutputFormat::Json => print_json(&favorites)?,
                        OutputFormat::Table => println!("{}", output::favorites_table(&favorites)),
                    }
                }
                FavoritesCommands::Add { team_id } => {
                    let football = FootballClient::from_settings(&settings)?;
                    let team = football.get_team(team_id).await?;
                    let favorite = store
                        .add(
                            user,
                            NewFavorite {
                                team_id,
                                team_name: team.name,
                                team_crest: team.crest,
                            },
                        )
                        .await?;
                    print_success(&format!("Added {} to favorites", favorite.team_name));
                }
                FavoritesCommands::Remove { team_id } => {
                    store.remove(user, team_id).await?;
                    print_success(&format!("Removed team {team_id} from favorites"));
                }
                FavoritesCommands::Upcoming => {
                    let football = FootballClient::from_settings(&settings)?;
                    let favorites = store.list(user).await?;
                    let upcoming =
                        upcoming_for_favorites(&football, &favorites, Utc::now().date_naive()).await;
                    match format {
                        OutputFormat::Json => print_json(&upcoming)?,
                        OutputFormat::Table => println!("{}", output::upcoming_table(&upcoming)),
                    }
                }
            }
        }
        Commands::Cache(args) => {
            let root = settings.cache_dir()?;
            match args.command {
                CacheCommands::Clear { league, team } => match (league, team) {
                    (Some(code), _) => {
                        let league = parse_league(&code)?;
                        cache::invalidate_competition(&root, league.code())?;
                        print_success(&format!("Cleared cached {} data", league.name()));
                    }
                    (None, Some(team_id)) => {
                        cache::invalidate_team(&root, team_id)?;
                        print_success(&format!("Cleared cached team {team_id}"));
                    }
                    (None, None) => {
                        cache::clear(&root)?;
                        print_success(&format!("Cleared cache at {}", root.display()));
                    }
                },
                CacheCommands::Path => println!("{}", root.display()),
            }
        }
    }

    Ok(())
}

async fn matches(football: &FootballClient, args: MatchesArgs, format: OutputFormat) -> Result<()> {
    let matches: Vec<Match> = if args.today {
        let today = Utc::now().date_naive();
        let query = MatchQuery::between(today, today);
        let mut all = Vec::new();
        for league in League::ALL {
            match football.get_matches(league.code(), &query).await {
                Ok(response) => all.extend(response.matches),
                Err(e) => eprintln!("{} {}: {}", "!".yellow(), league.code(), e),
            }
        }
        sort_for_today(&mut all);
        all
    } else {
        let league = parse_league(&args.league.league)?;
        let query = MatchQuery {
            date_from: parse_date(args.from.as_deref())?,
            date_to: parse_date(args.to.as_deref())?,
            status: args.status.as_deref().map(str::parse::<MatchStatus>).transpose()?,
        };
        football.get_matches(league.code(), &query).await?.matches
    };

    let day = parse_date(args.date.as_deref())?;
    let filter = ListFilter {
        matchday: args.matchday,
        team_ids: args.teams,
    };
    let selected: Vec<&Match> = if let Some(day) = day {
        matches_on(&matches, day, &filter.team_ids)
    } else if args.today {
        // Keep the live/upcoming/finished order
        matches
            .iter()
            .filter(|m| filter.team_ids.is_empty() || filter.team_ids.iter().any(|id| m.involves(*id)))
            .collect()
    } else {
        filter.apply(&matches)
    };

    match format {
        OutputFormat::Json => print_json(&selected)?,
        OutputFormat::Table => println!("{}", output::matches_table(&selected)),
    }
    Ok(())
}
