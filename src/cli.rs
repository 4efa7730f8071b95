// Command-line interface definition.
// Subcommands for the API server, data lookups, commentary, favorites and cache upkeep.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "pitchside")]
#[command(about = "Football schedules, standings and squads with AI team commentary")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to a TOML config file (defaults to ./pitchside.toml when present)
    #[arg(short, long, global = true, env = "PITCHSIDE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, default_value = "table")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, ValueEnum, Default, PartialEq, Eq, Debug)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the JSON API server
    Serve(ServeArgs),
    /// List supported leagues
    Leagues,
    /// List a league's matches
    Matches(MatchesArgs),
    /// Show a league table
    Standings(LeagueArg),
    /// Show a team and its squad
    Team(TeamArgs),
    /// Generate AI commentary for a team from its league table
    Comment(CommentArgs),
    /// Manage favorite teams
    Favorites(FavoritesArgs),
    /// Manage the response cache
    Cache(CacheArgs),
}

#[derive(clap::Args)]
pub struct ServeArgs {
    /// Override the configured listen port
    #[arg(short, long)]
    pub port: Option<u16>,
}

#[derive(clap::Args)]
pub struct LeagueArg {
    /// League code (PL, BL1, SA, PD, FL1, CL)
    #[arg(short, long, default_value = "PL")]
    pub league: String,
}

#[derive(clap::Args)]
pub struct MatchesArgs {
    #[command(flatten)]
    pub league: LeagueArg,
    /// First kickoff date, YYYY-MM-DD
    #[arg(long)]
    pub from: Option<String>,
    /// Last kickoff date, YYYY-MM-DD
    #[arg(long)]
    pub to: Option<String>,
    /// Match status (SCHEDULED, TIMED, IN_PLAY, PAUSED, FINISHED, ...)
    #[arg(long)]
    pub status: Option<String>,
    /// Only this matchday
    #[arg(short, long)]
    pub matchday: Option<u32>,
    /// Only matches kicking off on this UTC day, YYYY-MM-DD
    #[arg(long, conflicts_with = "matchday")]
    pub date: Option<String>,
    /// Only matches of these team ids
    #[arg(short, long = "team")]
    pub teams: Vec<u64>,
    /// Only today's matches across all leagues
    #[arg(long, conflicts_with_all = ["from", "to", "status", "matchday", "date"])]
    pub today: bool,
}

#[derive(clap::Args)]
pub struct TeamArgs {
    /// football-data.org team id
    pub id: u64,
}

#[derive(clap::Args)]
pub struct CommentArgs {
    #[command(flatten)]
    pub league: LeagueArg,
    /// football-data.org team id
    pub team_id: u64,
    /// Ignore a cached comment and generate a new one
    #[arg(long)]
    pub refresh: bool,
}

#[derive(clap::Args)]
pub struct FavoritesArgs {
    /// User the favorites belong to
    #[arg(short, long, global = true, env = "PITCHSIDE_USER", default_value = "local")]
    pub user: String,

    #[command(subcommand)]
    pub command: FavoritesCommands,
}

#[derive(Subcommand)]
pub enum FavoritesCommands {
    /// List favorite teams
    List,
    /// Add a team by id (name and crest are looked up)
    Add { team_id: u64 },
    /// Remove a team by id
    Remove { team_id: u64 },
    /// Live or next match of each favorite within the next week
    Upcoming,
}

#[derive(clap::Args)]
pub struct CacheArgs {
    #[command(subcommand)]
    pub command: CacheCommands,
}

#[derive(Subcommand)]
pub enum CacheCommands {
    /// Remove cached responses and comments (favorites are kept)
    Clear {
        /// Only drop one league's matches and standings
        #[arg(short, long, conflicts_with = "team")]
        league: Option<String>,
        /// Only drop one team's details
        #[arg(short, long)]
        team: Option<u64>,
    },
    /// Print the cache directory
    Path,
}
