// AI team commentary.
// Validates the input, serves cached comments and generates fresh ones with match context.

pub mod prompt;
pub mod store;

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::error::{AppError, Result};
use crate::football::{FootballClient, MatchQuery};
use crate::gemini::TextGenerator;
use crate::leagues::is_valid_league_code;
use crate::matches::{form_string, next_fixture, team_form};

pub use prompt::build_prompt;
pub use store::{COMMENT_TTL, CommentEntry, CommentStore};

/// Number of finished matches summarized as recent form.
const FORM_LENGTH: usize = 5;

/// A team's table row plus its league context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentInput {
    pub team_id: u64,
    pub team_name: String,
    pub position: u32,
    pub played_games: u32,
    pub won: u32,
    pub draw: u32,
    pub lost: u32,
    pub points: u32,
    pub goal_difference: i32,
    pub league_code: String,
    pub matchday: Option<u32>,
    pub leader_points: u32,
    pub points_from_leader: i32,
    /// Points of the line place (relegation line, or the play-off line in a league phase).
    pub relegation_points: u32,
    pub points_from_relegation: i32,
    pub total_teams: u32,
}

impl CommentInput {
    pub fn validate(&self) -> Result<()> {
        if self.team_name.trim().is_empty() {
            return Err(AppError::Validation("team name is empty".into()));
        }
        if !is_valid_league_code(&self.league_code) {
            return Err(AppError::Validation(format!(
                "unsupported league code: {}",
                self.league_code
            )));
        }
        if self.position == 0 {
            return Err(AppError::Validation("position must be positive".into()));
        }
        if self.total_teams > 0 && self.position > self.total_teams {
            return Err(AppError::Validation(format!(
                "position {} is outside a table of {} teams",
                self.position, self.total_teams
            )));
        }
        let decided = self.won.checked_add(self.draw).and_then(|n| n.checked_add(self.lost));
        if decided != Some(self.played_games) {
            return Err(AppError::Validation(
                "won, drawn and lost do not add up to games played".into(),
            ));
        }
        Ok(())
    }

    /// `"{league}:{team_id}:{matchday or 0}"`.
    pub fn cache_key(&self) -> String {
        format!(
            "{}:{}:{}",
            self.league_code,
            self.team_id,
            self.matchday.unwrap_or(0)
        )
    }
}

/// Recent results and next opponent of a team.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchContext {
    /// Newest first, e.g. "WWDLW"; empty when unknown.
    pub recent_form: String,
    /// e.g. "Liverpool (A)".
    pub next_opponent: Option<String>,
}

impl MatchContext {
    /// Build the context from the competition's cached match list.
    ///
    /// Any failure degrades to an empty context.
    pub async fn fetch(football: &FootballClient, league_code: &str, team_id: u64) -> Self {
        match football.get_matches(league_code, &MatchQuery::default()).await {
            Ok(response) => Self {
                recent_form: form_string(&team_form(&response.matches, team_id, FORM_LENGTH)),
                next_opponent: next_fixture(&response.matches, team_id).map(|f| f.describe()),
            },
            Err(e) => {
                warn!(league_code, team_id, error = %e, "failed to fetch match context");
                Self::default()
            }
        }
    }
}

/// A comment and whether it came from the cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommentOutcome {
    pub comment: String,
    pub cached: bool,
}

/// Turn an internal failure into the message shown to users.
pub fn user_facing_error(err: AppError) -> AppError {
    match err {
        AppError::Validation(_) => AppError::Validation("Invalid input".into()),
        e if e.upstream_status() == Some(429) => AppError::Generation {
            status: 429,
            message: "Please wait a moment and try again",
        },
        AppError::Upstream { .. } | AppError::Http(_) | AppError::InvalidResponse(_) => {
            AppError::Generation {
                status: 502,
                message: "Failed to generate AI commentary",
            }
        }
        AppError::MissingApiKey(_) => AppError::Generation {
            status: 503,
            message: "AI commentary is not configured",
        },
        _ => AppError::Generation {
            status: 500,
            message: "Failed to generate the comment",
        },
    }
}

/// Generates and caches team commentary.
pub struct CommentService {
    football: Arc<FootballClient>,
    generator: Arc<dyn TextGenerator>,
    store: CommentStore,
}

impl CommentService {
    pub fn new(
        football: Arc<FootballClient>,
        generator: Arc<dyn TextGenerator>,
        store: CommentStore,
    ) -> Self {
        Self {
            football,
            generator,
            store,
        }
    }

    /// Return the cached comment for the input, or generate and store a new one.
    ///
    /// `refresh` skips the cache lookup; the result is stored either way.
    /// Errors are already mapped to user-facing messages.
    #[instrument(skip(self, input), fields(league = %input.league_code, team_id = input.team_id))]
    pub async fn generate_team_comment(
        &self,
        input: &CommentInput,
        refresh: bool,
    ) -> Result<CommentOutcome> {
        self.generate_inner(input, refresh).await.map_err(|e| {
            warn!(error = %e, "team comment generation failed");
            user_facing_error(e)
        })
    }

    async fn generate_inner(&self, input: &CommentInput, refresh: bool) -> Result<CommentOutcome> {
        input.validate()?;
        let key = input.cache_key();

        if !refresh {
            match self.store.get(&key, Utc::now()) {
                Ok(Some(entry)) => {
                    debug!(%key, "comment cache hit");
                    return Ok(CommentOutcome {
                        comment: entry.comment,
                        cached: true,
                    });
                }
                Ok(None) => {}
                Err(e) => warn!(%key, error = %e, "ignoring unreadable comment entry"),
            }
        }

        let context = MatchContext::fetch(&self.football, &input.league_code, input.team_id).await;
        let prompt = build_prompt(input, &context);
        let comment = self.generator.generate(&prompt).await?;

        if let Err(e) = self.store.upsert(&key, &comment, COMMENT_TTL) {
            warn!(%key, error = %e, "failed to store generated comment");
        }
        info!(%key, refresh, "generated team comment");

        Ok(CommentOutcome {
            comment,
            cached: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use tempfile::TempDir;

    use crate::cache;
    use crate::football::{MatchStatus, MatchesResponse};
    use crate::matches::fixtures::{competition, fixture};

    struct FakeGenerator {
        status: Option<u16>,
        calls: AtomicUsize,
        prompts: Mutex<Vec<String>>,
    }

    impl FakeGenerator {
        fn ok() -> Arc<Self> {
            Self::with_status(None)
        }

        fn with_status(status: Option<u16>) -> Arc<Self> {
            Arc::new(Self {
                status,
                calls: AtomicUsize::new(0),
                prompts: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl TextGenerator for FakeGenerator {
        async fn generate(&self, prompt: &str) -> Result<String> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            self.prompts.lock().unwrap().push(prompt.to_string());
            match self.status {
                Some(status) => Err(AppError::Upstream {
                    status,
                    message: "fake failure".into(),
                }),
                None => Ok(format!("Comment number {}.", n)),
            }
        }
    }

    fn input() -> CommentInput {
        CommentInput {
            team_id: 57,
            team_name: "Arsenal FC".to_string(),
            position: 1,
            played_games: 9,
            won: 7,
            draw: 1,
            lost: 1,
            points: 22,
            goal_difference: 13,
            league_code: "PL".to_string(),
            matchday: Some(9),
            leader_points: 22,
            points_from_leader: 0,
            relegation_points: 5,
            points_from_relegation: 17,
            total_teams: 20,
        }
    }

    /// Service whose football client only ever sees a pre-filled cache.
    fn service(root: &TempDir, generator: Arc<FakeGenerator>) -> CommentService {
        let football = FootballClient::new(
            "token",
            "http://127.0.0.1:9",
            Duration::from_secs(1),
            root.path().to_path_buf(),
        )
        .unwrap();
        CommentService::new(
            Arc::new(football),
            generator,
            CommentStore::new(root.path().to_path_buf()),
        )
    }

    fn seed_matches(root: &TempDir) {
        let matches = vec![
            fixture(1, 4, 7, (57, "Arsenal"), (61, "Chelsea"), MatchStatus::Finished, Some((2, 0))),
            fixture(2, 11, 8, (73, "Tottenham"), (57, "Arsenal"), MatchStatus::Finished, Some((1, 1))),
            fixture(3, 25, 10, (64, "Liverpool"), (57, "Arsenal"), MatchStatus::Timed, None),
        ];
        let response = MatchesResponse {
            competition: competition("PL"),
            matches,
        };
        cache::write_cached(&cache::matches_path(root.path(), "PL", ""), &response).unwrap();
    }

    #[test]
    fn test_validation() {
        assert!(input().validate().is_ok());

        let mut bad = input();
        bad.team_name = "  ".into();
        assert!(matches!(bad.validate(), Err(AppError::Validation(_))));

        let mut bad = input();
        bad.league_code = "MLS".into();
        assert!(bad.validate().is_err());

        let mut bad = input();
        bad.position = 0;
        assert!(bad.validate().is_err());

        let mut bad = input();
        bad.position = 21;
        assert!(bad.validate().is_err());

        let mut bad = input();
        bad.lost = 3;
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_cache_key() {
        assert_eq!(input().cache_key(), "PL:57:9");
        let mut input = input();
        input.matchday = None;
        assert_eq!(input.cache_key(), "PL:57:0");
    }

    #[test]
    fn test_user_facing_errors() {
        let rate_limited = user_facing_error(AppError::Upstream {
            status: 429,
            message: String::new(),
        });
        assert_eq!(rate_limited.to_string(), "Please wait a moment and try again");
        assert_eq!(rate_limited.status_code().as_u16(), 429);

        let overloaded = user_facing_error(AppError::Upstream {
            status: 503,
            message: String::new(),
        });
        assert_eq!(overloaded.to_string(), "Failed to generate AI commentary");

        let invalid = user_facing_error(AppError::Validation("position".into()));
        assert_eq!(invalid.status_code().as_u16(), 400);
    }

    #[tokio::test]
    async fn test_generates_with_context_then_serves_cache() {
        let root = TempDir::new().unwrap();
        seed_matches(&root);
        let generator = FakeGenerator::ok();
        let service = service(&root, generator.clone());

        let first = service.generate_team_comment(&input(), false).await.unwrap();
        assert_eq!(
            first,
            CommentOutcome {
                comment: "Comment number 1.".into(),
                cached: false
            }
        );

        let prompt = generator.prompts.lock().unwrap()[0].clone();
        assert!(prompt.contains("- Recent results: DW"));
        assert!(prompt.contains("- Next match: vs Liverpool (A)"));

        let second = service.generate_team_comment(&input(), false).await.unwrap();
        assert!(second.cached);
        assert_eq!(second.comment, "Comment number 1.");
        assert_eq!(generator.calls(), 1);
    }

    #[tokio::test]
    async fn test_refresh_bypasses_and_overwrites_cache() {
        let root = TempDir::new().unwrap();
        seed_matches(&root);
        let generator = FakeGenerator::ok();
        let service = service(&root, generator.clone());

        service.generate_team_comment(&input(), false).await.unwrap();
        let refreshed = service.generate_team_comment(&input(), true).await.unwrap();
        assert_eq!(refreshed.comment, "Comment number 2.");
        assert!(!refreshed.cached);

        let cached = service.generate_team_comment(&input(), false).await.unwrap();
        assert_eq!(cached.comment, "Comment number 2.");
        assert_eq!(generator.calls(), 2);
    }

    #[tokio::test]
    async fn test_expired_entry_is_regenerated() {
        let root = TempDir::new().unwrap();
        seed_matches(&root);
        let generator = FakeGenerator::ok();
        let service = service(&root, generator.clone());

        CommentStore::new(root.path().to_path_buf())
            .upsert("PL:57:9", "old", Duration::ZERO)
            .unwrap();

        let outcome = service.generate_team_comment(&input(), false).await.unwrap();
        assert_eq!(outcome.comment, "Comment number 1.");
    }

    #[tokio::test]
    async fn test_missing_match_data_gives_empty_context() {
        let root = TempDir::new().unwrap();
        let generator = FakeGenerator::ok();
        let service = service(&root, generator.clone());

        service.generate_team_comment(&input(), false).await.unwrap();
        let prompt = generator.prompts.lock().unwrap()[0].clone();
        assert!(!prompt.contains("Recent results"));
        assert!(!prompt.contains("Next match"));
    }

    #[tokio::test]
    async fn test_generation_failure_is_not_cached() {
        let root = TempDir::new().unwrap();
        seed_matches(&root);
        let generator = FakeGenerator::with_status(Some(429));
        let service = service(&root, generator.clone());

        let err = service.generate_team_comment(&input(), false).await.unwrap_err();
        assert_eq!(err.to_string(), "Please wait a moment and try again");
        assert!(CommentStore::new(root.path().to_path_buf())
            .get("PL:57:9", Utc::now())
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_invalid_input_skips_generation() {
        let root = TempDir::new().unwrap();
        let generator = FakeGenerator::ok();
        let service = service(&root, generator.clone());

        let mut bad = input();
        bad.team_name = String::new();
        let err = service.generate_team_comment(&bad, false).await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid input");
        assert_eq!(generator.calls(), 0);
    }
}
