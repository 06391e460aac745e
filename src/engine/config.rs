//! Configuration for the Invidious engine.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use super::error::{EngineError, EngineResult};

/// Environment variable holding the backend origin(s), comma separated.
pub const BASE_URL_ENV: &str = "INVIDIOUS_BASE_URL";
/// Environment variable holding the host-side request timeout in seconds.
pub const TIMEOUT_ENV: &str = "INVIDIOUS_TIMEOUT_SECS";

/// Default host-side request timeout.
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Backend origins: either one fixed instance or a pool to pick from.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BaseUrls {
    /// A single fixed origin.
    Single(String),
    /// A pool of origins, one chosen at random per request.
    Pool(Vec<String>),
}

impl BaseUrls {
    /// Number of configured origins.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Single(url) => usize::from(!url.is_empty()),
            Self::Pool(urls) => urls.len(),
        }
    }

    /// Whether no origin is configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn entries(&self) -> Vec<&str> {
        match self {
            Self::Single(url) => vec![url.as_str()],
            Self::Pool(urls) => urls.iter().map(String::as_str).collect(),
        }
    }
}

/// Configuration for the engine and its host.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Backend origin(s).
    pub base_url: BaseUrls,
    /// Timeout the host applies when fetching from the backend.
    #[serde(with = "duration_serde", default = "default_timeout")]
    pub request_timeout: Duration,
}

impl EngineConfig {
    /// Create a config for a single fixed instance.
    #[must_use]
    pub fn single(url: impl Into<String>) -> Self {
        Self {
            base_url: BaseUrls::Single(url.into()),
            request_timeout: default_timeout(),
        }
    }

    /// Create a config for a pool of instances.
    #[must_use]
    pub fn pool<I, S>(urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            base_url: BaseUrls::Pool(urls.into_iter().map(Into::into).collect()),
            request_timeout: default_timeout(),
        }
    }

    /// Set the host-side request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Load configuration from the process environment.
    ///
    /// # Errors
    /// Returns an error if no base URL is configured or a value is invalid.
    pub fn from_env() -> EngineResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    /// Returns an error if no base URL is configured or a value is invalid.
    pub fn from_lookup<F>(lookup: F) -> EngineResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw = lookup(BASE_URL_ENV)
            .ok_or_else(|| EngineError::Config(format!("missing {BASE_URL_ENV}")))?;

        let urls: Vec<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .map(String::from)
            .collect();

        let mut config = if urls.len() == 1 {
            Self::single(urls[0].clone())
        } else {
            Self::pool(urls)
        };

        if let Some(secs) = lookup(TIMEOUT_ENV) {
            let secs: u64 = secs
                .trim()
                .parse()
                .map_err(|_| EngineError::Config(format!("{TIMEOUT_ENV} must be an integer")))?;
            config.request_timeout = Duration::from_secs(secs);
        }

        config.validated()
    }

    /// Validate the configuration and normalize its origins.
    ///
    /// Trailing slashes are trimmed so paths can be appended directly.
    ///
    /// # Errors
    /// Returns an error if the pool is empty or an origin is not an absolute
    /// http(s) URL.
    pub fn validated(self) -> EngineResult<Self> {
        if self.base_url.is_empty() {
            return Err(EngineError::Config("missing invidious base_url".to_string()));
        }

        for entry in self.base_url.entries() {
            let parsed = Url::parse(entry.trim())
                .map_err(|e| EngineError::Config(format!("invalid base_url {entry:?}: {e}")))?;
            if !matches!(parsed.scheme(), "http" | "https") || parsed.host().is_none() {
                return Err(EngineError::Config(format!(
                    "base_url {entry:?} must be an absolute http(s) URL"
                )));
            }
        }

        let base_url = match self.base_url {
            BaseUrls::Single(url) => BaseUrls::Single(normalize_origin(&url)),
            BaseUrls::Pool(urls) => BaseUrls::Pool(urls.iter().map(|u| normalize_origin(u)).collect()),
        };

        Ok(Self {
            base_url,
            request_timeout: self.request_timeout,
        })
    }
}

fn normalize_origin(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

const fn default_timeout() -> Duration {
    Duration::from_secs(DEFAULT_TIMEOUT_SECS)
}

/// Serde module for Duration serialization.
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_secs().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_empty_pool_rejected() {
        let err = EngineConfig::pool(Vec::<String>::new()).validated();
        assert!(matches!(err, Err(EngineError::Config(_))));
    }

    #[test]
    fn test_empty_single_rejected() {
        let err = EngineConfig::single("").validated();
        assert!(matches!(err, Err(EngineError::Config(_))));
    }

    #[test]
    fn test_relative_origin_rejected() {
        let err = EngineConfig::single("inv.example").validated();
        assert!(matches!(err, Err(EngineError::Config(_))));

        let err = EngineConfig::pool(["https://a.example", "ftp://b.example"]).validated();
        assert!(matches!(err, Err(EngineError::Config(_))));
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let config = EngineConfig::single("https://inv.example/").validated().ok();
        assert_eq!(
            config.map(|c| c.base_url),
            Some(BaseUrls::Single("https://inv.example".to_string()))
        );
    }

    #[test]
    fn test_deserialize_string_or_list() {
        let single: EngineConfig =
            serde_json::from_str(r#"{"base_url": "https://inv.example"}"#).unwrap();
        assert_eq!(single.base_url, BaseUrls::Single("https://inv.example".to_string()));
        assert_eq!(single.request_timeout, Duration::from_secs(10));

        let pool: EngineConfig = serde_json::from_str(
            r#"{"base_url": ["https://a.example", "https://b.example"], "request_timeout": 3}"#,
        )
        .unwrap();
        assert_eq!(pool.base_url.len(), 2);
        assert_eq!(pool.request_timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_from_lookup() {
        let config = EngineConfig::from_lookup(lookup(&[
            (BASE_URL_ENV, "https://a.example, https://b.example/"),
            (TIMEOUT_ENV, "5"),
        ]))
        .unwrap();
        assert_eq!(
            config.base_url,
            BaseUrls::Pool(vec![
                "https://a.example".to_string(),
                "https://b.example".to_string()
            ])
        );
        assert_eq!(config.request_timeout, Duration::from_secs(5));

        let single = EngineConfig::from_lookup(lookup(&[(BASE_URL_ENV, "https://a.example")])).unwrap();
        assert_eq!(single.base_url, BaseUrls::Single("https://a.example".to_string()));
    }

    #[test]
    fn test_from_lookup_missing_or_blank() {
        assert!(EngineConfig::from_lookup(lookup(&[])).is_err());
        assert!(EngineConfig::from_lookup(lookup(&[(BASE_URL_ENV, " , ")])).is_err());
        assert!(
            EngineConfig::from_lookup(lookup(&[
                (BASE_URL_ENV, "https://a.example"),
                (TIMEOUT_ENV, "soon"),
            ]))
            .is_err()
        );
    }
}
