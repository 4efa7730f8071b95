// football-data.org HTTP client.
// Handles authentication, rate limit tracking, response validation and the TTL-gated response cache.

use std::path::{Path, PathBuf};
use std::sync::RwLock;
use std::time::Duration;

use reqwest::{
    Client, Response, StatusCode,
    header::{HeaderMap, HeaderValue, USER_AGENT},
};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, warn};

use crate::cache::{self, CachedData};
use crate::config::Settings;
use crate::error::{AppError, Result};

use super::types::RateLimit;

const AUTH_HEADER: &str = "X-Auth-Token";
const AVAILABLE_HEADER: &str = "x-requests-available-minute";
const RESET_HEADER: &str = "x-requestcounter-reset";

/// Wait suggested to callers when a 429 carries no reset header.
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// football-data.org client with authentication, rate limit tracking and caching.
pub struct FootballClient {
    client: Client,
    base_url: String,
    cache_root: PathBuf,
    rate_limit: RwLock<RateLimit>,
}

impl FootballClient {
    /// Create a new client with the given token, API base URL and cache root.
    pub fn new(token: &str, base_url: &str, timeout: Duration, cache_root: PathBuf) -> Result<Self> {
        let mut headers = HeaderMap::new();

        headers.insert(
            AUTH_HEADER,
            HeaderValue::from_str(token).map_err(|e| AppError::Other(e.to_string()))?,
        );
        headers.insert(USER_AGENT, HeaderValue::from_static("pitchside"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            cache_root,
            rate_limit: RwLock::new(RateLimit::default()),
        })
    }

    /// Create a client from loaded settings.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Self::new(
            settings.football_api_key()?,
            &settings.football.base_url,
            Duration::from_secs(settings.football.timeout_secs),
            settings.cache_dir()?,
        )
    }

    /// Root directory of the response cache.
    pub fn cache_root(&self) -> &Path {
        &self.cache_root
    }

    /// Get the most recently observed rate limit information.
    pub fn rate_limit(&self) -> RateLimit {
        self.rate_limit
            .read()
            .map(|guard| guard.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    /// Make a GET request with query parameters.
    pub async fn get<T: Serialize + ?Sized>(&self, endpoint: &str, params: &T) -> Result<Response> {
        let url = format!("{}{}", self.base_url, endpoint);
        debug!(%url, "football-data request");

        let response = self.client.get(&url).query(params).send().await?;

        self.update_rate_limit(&response);
        self.check_response(response).await
    }

    /// GET an endpoint and deserialize the body into the typed schema.
    pub async fn fetch<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<T> {
        let response = self.get(endpoint, params).await?;
        let body = response.bytes().await?;

        serde_json::from_slice(&body).map_err(|e| {
            warn!(endpoint, error = %e, "football-data response failed validation");
            AppError::InvalidResponse("football-data.org")
        })
    }

    /// Serve from the cache while the entry is younger than `ttl`, otherwise refetch.
    ///
    /// A failed refetch of any kind falls back to the expired entry when one exists.
    pub async fn fetch_cached<T>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
        path: &Path,
        ttl: Duration,
    ) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
    {
        let stale = match cache::read_cached::<T>(path) {
            Ok(Some(cached)) if cached.is_valid(ttl) => {
                debug!(endpoint, age_secs = cached.age().as_secs(), "cache hit");
                return Ok(cached.data);
            }
            Ok(entry) => entry,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring unreadable cache entry");
                None
            }
        };

        match self.fetch::<T>(endpoint, params).await {
            Ok(data) => {
                if let Err(e) = cache::write_cached(path, &data) {
                    warn!(path = %path.display(), error = %e, "failed to write cache entry");
                }
                Ok(data)
            }
            Err(e) => match stale {
                Some(CachedData { data, cached_at }) => {
                    warn!(endpoint, error = %e, %cached_at, "upstream failed, serving stale cache entry");
                    Ok(data)
                }
                None => Err(e),
            },
        }
    }

    /// Update rate limit from response headers.
    fn update_rate_limit(&self, response: &Response) {
        let header = |name: &str| {
            response
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u64>().ok())
        };

        let available = header(AVAILABLE_HEADER);
        let reset_secs = header(RESET_HEADER);
        if available.is_none() && reset_secs.is_none() {
            return;
        }

        let mut guard = self
            .rate_limit
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if available.is_some() {
            guard.available = available;
        }
        if reset_secs.is_some() {
            guard.reset_secs = reset_secs;
        }
    }

    /// Check response status and convert errors.
    async fn check_response(&self, response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(AppError::Unauthorized),
            StatusCode::NOT_FOUND => Err(AppError::NotFound(response.url().path().to_string())),
            StatusCode::TOO_MANY_REQUESTS => {
                let retry_after_secs = self
                    .rate_limit()
                    .reset_secs
                    .unwrap_or(DEFAULT_RETRY_AFTER_SECS);
                Err(AppError::RateLimited { retry_after_secs })
            }
            StatusCode::BAD_REQUEST => Err(AppError::Validation(
                response.text().await.unwrap_or_default(),
            )),
            status => Err(AppError::Upstream {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            }),
        }
    }
}
