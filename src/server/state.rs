//! Application state shared across all request handlers.

use std::sync::Arc;

use crate::engine::{EngineConfig, EngineError, EngineResult, InvidiousEngine, ResolvedRequest};

/// Shared application state.
pub struct AppState {
    /// Invidious engine.
    pub engine: InvidiousEngine,
    /// HTTP client used to reach the backend instances.
    pub client: reqwest::Client,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    /// Returns an error if the configuration is invalid or the HTTP client cannot be created.
    pub fn new(config: EngineConfig) -> EngineResult<Arc<Self>> {
        let engine = InvidiousEngine::new(config)?;

        let client = reqwest::Client::builder()
            .user_agent(concat!("invidious-engine/", env!("CARGO_PKG_VERSION")))
            .timeout(engine.config().request_timeout)
            .gzip(true)
            .build()?;

        Ok(Self::from_parts(engine, client))
    }

    /// Assemble the state from an existing engine and client.
    #[must_use]
    pub fn from_parts(engine: InvidiousEngine, client: reqwest::Client) -> Arc<Self> {
        Arc::new(Self { engine, client })
    }

    /// Fetch the raw response body for a resolved request.
    ///
    /// # Errors
    /// Returns an error if the request fails or the backend answers with a non-success status.
    pub async fn fetch(&self, resolved: &ResolvedRequest) -> EngineResult<String> {
        let response = self.client.get(&resolved.target_url).send().await?;

        if !response.status().is_success() {
            return Err(EngineError::Upstream(response.status().as_u16()));
        }

        Ok(response.text().await?)
    }
}
