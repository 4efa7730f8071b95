// Cache module for local filesystem caching.
// Stores football-data.org responses, generated comments and favorites as JSON under one root.

pub mod paths;
pub mod store;

pub use paths::*;
pub use store::{
    CachedData, clear, invalidate_competition, invalidate_team, read_cached, read_json,
    write_cached, write_json,
};
