// Generated comment cache.
// One JSON file per cache key holding the comment and its absolute expiry.

use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::cache;
use crate::error::{AppError, Result};

/// How long a generated comment is served before it is regenerated.
pub const COMMENT_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// A stored comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentEntry {
    pub cache_key: String,
    pub comment: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl CommentEntry {
    pub fn is_live_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }
}

/// File-backed store of generated comments.
#[derive(Debug, Clone)]
pub struct CommentStore {
    root: PathBuf,
}

impl CommentStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// The entry for `key` if it has not expired at `now`.
    pub fn get(&self, key: &str, now: DateTime<Utc>) -> Result<Option<CommentEntry>> {
        let entry: Option<CommentEntry> = cache::read_json(&cache::comment_path(&self.root, key))?;
        Ok(entry.filter(|entry| entry.is_live_at(now)))
    }

    /// Create or overwrite the entry for `key`, expiring `ttl` from now.
    ///
    /// Overwriting keeps the original creation time.
    pub fn upsert(&self, key: &str, comment: &str, ttl: Duration) -> Result<CommentEntry> {
        let path = cache::comment_path(&self.root, key);
        let now = Utc::now();
        let ttl = TimeDelta::from_std(ttl).map_err(|e| AppError::Other(e.to_string()))?;

        let created_at = cache::read_json::<CommentEntry>(&path)
            .ok()
            .flatten()
            .map(|existing| existing.created_at)
            .unwrap_or(now);

        let entry = CommentEntry {
            cache_key: key.to_string(),
            comment: comment.to_string(),
            created_at,
            expires_at: now + ttl,
        };
        cache::write_json(&path, &entry)?;
        Ok(entry)
    }
}
