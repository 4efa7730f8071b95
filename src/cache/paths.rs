// Cache path utilities.
// Constructs filesystem paths for the cache hierarchy mirroring the football-data.org resources.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use sha2::{Digest, Sha256};

/// Get the default cache directory (~/.cache/pitchside on Linux).
pub fn default_cache_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "pitchside").map(|dirs| dirs.cache_dir().to_path_buf())
}

/// Path to a competition's directory.
pub fn competition_dir(root: &Path, code: &str) -> PathBuf {
    root.join("competitions").join(sanitize_name(code))
}

/// Path to a cached match list for one query window of a competition.
pub fn matches_path(root: &Path, code: &str, query_key: &str) -> PathBuf {
    competition_dir(root, code)
        .join("matches")
        .join(format!("{}.json", query_digest(query_key)))
}

/// Path to a competition's cached standings.
pub fn standings_path(root: &Path, code: &str) -> PathBuf {
    competition_dir(root, code).join("standings.json")
}

/// Path to the teams directory.
pub fn teams_dir(root: &Path) -> PathBuf {
    root.join("teams")
}

/// Path to a team's cached detail.
pub fn team_path(root: &Path, team_id: u64) -> PathBuf {
    teams_dir(root).join(format!("{}.json", team_id))
}

/// Path to a generated comment entry.
pub fn comment_path(root: &Path, cache_key: &str) -> PathBuf {
    root.join("comments")
        .join(format!("{}.json", sanitize_name(cache_key)))
}

/// Path to a user's favorites list.
pub fn favorites_path(root: &Path, user_id: &str) -> PathBuf {
    root.join("favorites")
        .join(format!("{}.json", sanitize_name(user_id)))
}

/// Short stable file name for a query string; the empty query maps to "all".
fn query_digest(query_key: &str) -> String {
    if query_key.is_empty() {
        return "all".to_string();
    }
    let digest = format!("{:x}", Sha256::digest(query_key.as_bytes()));
    digest[..16].to_string()
}

/// Sanitize a name for use in filesystem paths.
/// Replaces problematic characters with underscores.
fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\0' => '_',
            _ => c,
        })
        .collect()
}
