//! Text-to-vector embedding.
//!
//! Provides the [`EmbeddingProvider`] trait, a remote HTTP implementation, and
//! a disabled provider for embedding-free deployments. Provider failure is
//! never fatal: callers absorb it and store memories without vectors.

pub mod remote;

use crate::error::{Error, Result};

/// Trait for embedding text into vectors.
///
/// All methods are synchronous — callers in async contexts should use
/// `tokio::task::spawn_blocking`.
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a single text string into a vector.
    fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Number of dimensions this provider produces.
    fn dimensions(&self) -> usize;

    /// Model identifier, recorded in schema metadata so a model change can be
    /// flagged at startup.
    fn model(&self) -> &str;
}

/// Provider that is always unavailable. Every memory is stored without a
/// vector and semantic recall degrades to recency ordering.
pub struct DisabledProvider;

impl EmbeddingProvider for DisabledProvider {
    fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        Err(Error::DependencyUnavailable(
            "embedding provider is disabled".into(),
        ))
    }

    fn dimensions(&self) -> usize {
        0
    }

    fn model(&self) -> &str {
        "none"
    }
}

/// Create an embedding provider from config.
pub fn create_provider(
    config: &crate::config::EmbeddingConfig,
) -> anyhow::Result<Box<dyn EmbeddingProvider>> {
    match config.provider.as_str() {
        "remote" => {
            let provider = remote::RemoteProvider::new(config)?;
            Ok(Box::new(provider))
        }
        "none" => Ok(Box::new(DisabledProvider)),
        other => anyhow::bail!("unknown embedding provider: {other}. Supported: remote, none"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_provider_is_unavailable() {
        let err = DisabledProvider.embed("anything").unwrap_err();
        assert!(matches!(err, Error::DependencyUnavailable(_)));
    }
}
