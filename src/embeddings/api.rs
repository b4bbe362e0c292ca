//! OpenAI-compatible remote embedding provider.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::EmbeddingConfig;
use crate::error::{MatchError, Result};

use super::EmbeddingProvider;

/// Name reported by [`ApiProvider`].
pub const API_PROVIDER_NAME: &str = "api";

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
    dimensions: usize,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    #[serde(default)]
    index: usize,
    embedding: Vec<f32>,
}

/// Blocking client for `POST {endpoint}` with `{model, input: [...]}`.
///
/// Every call runs under the configured timeout. A transport error,
/// timeout, non-success status, or a response with the wrong number of
/// vectors or the wrong dimension is returned as an error; the embedding
/// service turns that into a local fallback.
pub struct ApiProvider {
    client: Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    dim: usize,
}

impl ApiProvider {
    pub fn new(config: &EmbeddingConfig, dim: usize) -> Result<Self> {
        let endpoint = config
            .endpoint
            .as_deref()
            .map(str::trim)
            .filter(|endpoint| !endpoint.is_empty())
            .ok_or_else(|| MatchError::MissingConfig("embedding.endpoint".to_string()))?
            .to_string();
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty());
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()?;

        Ok(Self {
            client,
            endpoint,
            model: config.model.clone(),
            api_key,
            dim,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl EmbeddingProvider for ApiProvider {
    fn name(&self) -> &str {
        API_PROVIDER_NAME
    }

    fn dimension(&self) -> usize {
        self.dim
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let request = EmbeddingRequest {
            model: &self.model,
            input: texts,
            dimensions: self.dim,
        };
        let mut builder = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .json(&request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send()?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(MatchError::Provider(format!(
                "embedding endpoint returned {status}: {}",
                body.chars().take(200).collect::<String>()
            )));
        }

        let mut parsed: EmbeddingResponse = response.json()?;
        if parsed.data.len() != texts.len() {
            return Err(MatchError::Provider(format!(
                "embedding endpoint returned {} vectors for {} inputs",
                parsed.data.len(),
                texts.len()
            )));
        }
        parsed.data.sort_by_key(|entry| entry.index);
        if let Some(bad) = parsed.data.iter().find(|entry| entry.embedding.len() != self.dim) {
            return Err(MatchError::Provider(format!(
                "embedding endpoint returned dimension {}, expected {}",
                bad.embedding.len(),
                self.dim
            )));
        }

        debug!(count = texts.len(), endpoint = %self.endpoint, "remote embedding batch");
        Ok(parsed.data.into_iter().map(|entry| entry.embedding).collect())
    }
}
