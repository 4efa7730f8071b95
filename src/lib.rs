// pitchside: football schedules, standings and squads from football-data.org
// with cached AI-generated team commentary.

pub mod cache;
pub mod commentary;
pub mod config;
pub mod error;
pub mod favorites;
pub mod football;
pub mod gemini;
pub mod leagues;
pub mod matches;
pub mod server;
pub mod standings;

pub use error::{AppError, Result};

use tracing_subscriber::{EnvFilter, fmt};

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over the configured level. Logs go to stderr so command
/// output on stdout stays machine-readable.
pub fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    // A subscriber may already be installed (tests, embedding)
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
