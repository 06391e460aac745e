//! Backend instance selection.

use std::sync::Arc;

use rand::Rng;

use super::config::BaseUrls;
use super::error::{EngineError, EngineResult};

/// Source of the index used to pick an instance from a pool.
pub trait IndexSource: Send + Sync {
    /// Return an index in `0..len`. `len` is never zero.
    fn pick(&self, len: usize) -> usize;
}

/// Uniform random choice backed by the thread-local RNG.
#[derive(Clone, Copy, Debug, Default)]
pub struct ThreadRngSource;

impl IndexSource for ThreadRngSource {
    fn pick(&self, len: usize) -> usize {
        rand::thread_rng().gen_range(0..len)
    }
}

/// Always picks the same index (wrapped into range). Used for deterministic runs.
#[derive(Clone, Copy, Debug)]
pub struct FixedIndex(pub usize);

impl IndexSource for FixedIndex {
    fn pick(&self, len: usize) -> usize {
        self.0 % len
    }
}

/// Picks one backend origin per request.
#[derive(Clone)]
pub struct InstanceSelector {
    urls: BaseUrls,
    source: Arc<dyn IndexSource>,
}

impl std::fmt::Debug for InstanceSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InstanceSelector")
            .field("urls", &self.urls)
            .finish_non_exhaustive()
    }
}

impl InstanceSelector {
    /// Create a selector using the thread-local RNG.
    ///
    /// # Errors
    /// Returns a configuration error if no origin is configured.
    pub fn new(urls: BaseUrls) -> EngineResult<Self> {
        Self::with_source(urls, Arc::new(ThreadRngSource))
    }

    /// Create a selector with an injected index source.
    ///
    /// # Errors
    /// Returns a configuration error if no origin is configured.
    pub fn with_source(urls: BaseUrls, source: Arc<dyn IndexSource>) -> EngineResult<Self> {
        if urls.is_empty() {
            return Err(EngineError::Config("missing invidious base_url".to_string()));
        }
        Ok(Self { urls, source })
    }

    /// Return the origin that serves the current request.
    #[must_use]
    pub fn select(&self) -> &str {
        match &self.urls {
            BaseUrls::Single(url) => url.as_str(),
            BaseUrls::Pool(urls) => {
                let idx = self.source.pick(urls.len()).min(urls.len() - 1);
                urls[idx].as_str()
            }
        }
    }

    /// The configured origins.
    #[must_use]
    pub const fn urls(&self) -> &BaseUrls {
        &self.urls
    }
}
