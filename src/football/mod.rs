// football-data.org API module.
// Provides the client, cached endpoints and types for the v4 REST API.

pub mod client;
pub mod endpoints;
pub mod types;

pub use client::FootballClient;
pub use endpoints::{MATCHES_TTL, MatchQuery, STANDINGS_TTL, TEAM_TTL};
pub use types::*;
