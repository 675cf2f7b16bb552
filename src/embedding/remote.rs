//! Remote HTTP embedding provider.
//!
//! Posts text to an embedding service (bge-style JSON contract: request
//! `{"model": ..., "text": ...}`, response `{"data": [[f32, ...]]}`). Any
//! transport or contract failure maps to `DependencyUnavailable` so callers
//! can degrade instead of propagating.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::EmbeddingConfig;
use crate::error::{Error, Result};

use super::EmbeddingProvider;

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    text: &'a str,
}

#[derive(Deserialize)]
struct EmbedResponse {
    data: Vec<Vec<f32>>,
}

pub struct RemoteProvider {
    client: reqwest::blocking::Client,
    endpoint: String,
    model: String,
    dimensions: usize,
}

impl RemoteProvider {
    pub fn new(config: &EmbeddingConfig) -> anyhow::Result<Self> {
        anyhow::ensure!(
            !config.endpoint.is_empty(),
            "embedding.endpoint must be set for the remote provider"
        );

        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("failed to build embedding HTTP client")?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            model: config.model.clone(),
            dimensions: config.dimensions,
        })
    }
}

impl EmbeddingProvider for RemoteProvider {
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&EmbedRequest {
                model: &self.model,
                text,
            })
            .send()
            .map_err(|e| Error::DependencyUnavailable(format!("embedding request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(Error::DependencyUnavailable(format!(
                "embedding service returned HTTP {}",
                response.status()
            )));
        }

        let body: EmbedResponse = response
            .json()
            .map_err(|e| Error::DependencyUnavailable(format!("malformed embedding response: {e}")))?;

        let vector = body
            .data
            .into_iter()
            .next()
            .ok_or_else(|| Error::DependencyUnavailable("embedding response had no data".into()))?;

        if vector.len() != self.dimensions {
            return Err(Error::DependencyUnavailable(format!(
                "embedding has {} dimensions, expected {}",
                vector.len(),
                self.dimensions
            )));
        }

        Ok(vector)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn model(&self) -> &str {
        &self.model
    }
}
