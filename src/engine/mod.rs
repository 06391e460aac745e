//! Invidious search engine for a meta-search host.
//!
//! The host drives a two-step pipeline:
//! - [`InvidiousEngine::request`] picks a backend instance and builds the search URL
//! - [`InvidiousEngine::response`] turns the fetched JSON into [`VideoResult`]s
//!
//! The engine performs no I/O. Fetching, retries and timeouts belong to the host.

pub mod config;
pub mod error;
pub mod format;
pub mod normalize;
pub mod request;
pub mod selector;
pub mod types;

pub use config::{BaseUrls, EngineConfig};
pub use error::{EngineError, EngineResult};
pub use normalize::Normalized;
pub use selector::{FixedIndex, IndexSource, InstanceSelector, ThreadRngSource};
pub use types::{ResolvedRequest, SearchRequest, TimeRange, VideoResult};

use std::sync::Arc;

/// Static description of the engine for the host's engine registry.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct EngineInfo {
    /// Engine name.
    pub name: &'static str,
    /// Project website.
    pub website: &'static str,
    /// Wikidata identifier.
    pub wikidata_id: &'static str,
    /// Official API documentation.
    pub official_api_documentation: &'static str,
    /// Whether the engine uses the official API.
    pub use_official_api: bool,
    /// Whether an API key is required.
    pub require_api_key: bool,
    /// Response format.
    pub results: &'static str,
    /// Result categories.
    pub categories: &'static [&'static str],
    /// Whether `pageno` is honored.
    pub paging: bool,
    /// Whether `time_range` is honored.
    pub time_range_support: bool,
}

/// Invidious engine description.
pub const ABOUT: EngineInfo = EngineInfo {
    name: "invidious",
    website: "https://api.invidious.io/",
    wikidata_id: "Q79343316",
    official_api_documentation: "https://docs.invidious.io/api/",
    use_official_api: true,
    require_api_key: false,
    results: "JSON",
    categories: &["videos", "music"],
    paging: true,
    time_range_support: true,
};

/// Engine bound to a validated configuration.
#[derive(Clone, Debug)]
pub struct InvidiousEngine {
    config: EngineConfig,
    selector: InstanceSelector,
}

impl InvidiousEngine {
    /// Create an engine that picks instances with the thread-local RNG.
    ///
    /// # Errors
    /// Returns a configuration error if no valid base URL is configured.
    pub fn new(config: EngineConfig) -> EngineResult<Self> {
        Self::with_index_source(config, Arc::new(ThreadRngSource))
    }

    /// Create an engine with an injected instance picker.
    ///
    /// # Errors
    /// Returns a configuration error if no valid base URL is configured.
    pub fn with_index_source(
        config: EngineConfig,
        source: Arc<dyn IndexSource>,
    ) -> EngineResult<Self> {
        let config = config.validated()?;
        let selector = InstanceSelector::with_source(config.base_url.clone(), source)?;

        tracing::info!(
            "Invidious engine ready with {} instance(s)",
            config.base_url.len()
        );

        Ok(Self { config, selector })
    }

    /// Build the backend request for a search.
    #[must_use]
    pub fn request(&self, search: &SearchRequest) -> ResolvedRequest {
        request::build_request(search, &self.selector)
    }

    /// Normalize the body fetched for `resolved`.
    ///
    /// # Errors
    /// Returns an error if the body is not a JSON array.
    pub fn response(&self, body: &str, resolved: &ResolvedRequest) -> EngineResult<Normalized> {
        normalize::normalize_response(body, &resolved.chosen_base_url)
    }

    /// The validated configuration.
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Engine description.
    #[must_use]
    pub const fn about() -> &'static EngineInfo {
        &ABOUT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool_engine(index: usize) -> InvidiousEngine {
        let config = EngineConfig::pool(["https://a.example/", "https://b.example"]);
        InvidiousEngine::with_index_source(config, Arc::new(FixedIndex(index))).unwrap()
    }

    #[test]
    fn test_engine_rejects_empty_pool() {
        let result = InvidiousEngine::new(EngineConfig::pool(Vec::<String>::new()));
        assert!(matches!(result, Err(EngineError::Config(_))));
    }

    #[test]
    fn test_pipeline_uses_chosen_instance() {
        let engine = pool_engine(0);
        let resolved = engine.request(&SearchRequest::new("lofi"));
        assert_eq!(resolved.chosen_base_url, "https://a.example");
        assert_eq!(
            resolved.target_url,
            "https://a.example/api/v1/search?q=lofi&page=1"
        );

        let body = r#"[{
            "type": "video", "videoId": "xyz", "title": "Lofi",
            "viewCount": 42, "lengthSeconds": 61, "published": 86400,
            "videoThumbnails": [{"quality": "sddefault", "url": "/vi/xyz/sddefault.jpg"}]
        }]"#;
        let normalized = engine.response(body, &resolved).unwrap();
        assert!(normalized.failures.is_empty());

        let result = &normalized.results[0];
        assert_eq!(result.url, "https://a.example/watch?v=xyz");
        assert_eq!(result.iframe_src, "https://a.example/embed/xyz");
        assert_eq!(result.thumbnail, "https://a.example/vi/xyz/sddefault.jpg");
        assert_eq!(result.views, "42");
        assert_eq!(result.length, "01:01");
        assert_eq!(result.published_date.to_rfc3339(), "1970-01-02T00:00:00+00:00");
    }

    #[test]
    fn test_about() {
        let about = InvidiousEngine::about();
        assert_eq!(about.categories, &["videos", "music"]);
        assert!(about.paging);
        assert!(about.time_range_support);
        assert!(!about.require_api_key);
    }
}
