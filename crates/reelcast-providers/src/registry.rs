//! Provider registry for managing available transcoding backends

use futures::future::join_all;
use reelcast_core::models::{Descriptor, Health};
use reelcast_core::{Config, ProviderError, ProviderResult};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::provider::TranscodingProvider;

/// Builds a provider from configuration.
///
/// Factories fail with [`ProviderError::IncompleteConfig`] when the settings
/// they need are absent or invalid.
pub type ProviderFactory =
    Arc<dyn Fn(&Config) -> ProviderResult<Arc<dyn TranscodingProvider>> + Send + Sync>;

/// Registry mapping provider names to factories.
///
/// Thread-safe and async-compatible using tokio's RwLock. Lookups can run
/// concurrently while registration is serialized. The registry is an explicit
/// value: build one with [`ProviderRegistry::with_defaults`] at startup and
/// pass it where it is needed.
#[derive(Clone)]
pub struct ProviderRegistry {
    factories: Arc<RwLock<HashMap<String, ProviderFactory>>>,
}

impl ProviderRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            factories: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Registry pre-populated with every provider compiled into this crate.
    pub fn with_defaults() -> Self {
        #[allow(unused_mut)]
        let mut factories: HashMap<String, ProviderFactory> = HashMap::new();

        #[cfg(feature = "provider-mediaconvert")]
        factories.insert(
            crate::mediaconvert::NAME.to_string(),
            Arc::new(crate::mediaconvert::MediaConvertProvider::factory),
        );

        #[cfg(feature = "provider-bitmovin")]
        factories.insert(
            crate::bitmovin::NAME.to_string(),
            Arc::new(crate::bitmovin::BitmovinProvider::factory),
        );

        Self {
            factories: Arc::new(RwLock::new(factories)),
        }
    }

    /// Register a factory under `name`.
    ///
    /// Registering a name twice fails with [`ProviderError::AlreadyRegistered`]
    /// and leaves the first factory in place.
    pub async fn register<F>(&self, name: impl Into<String>, factory: F) -> ProviderResult<()>
    where
        F: Fn(&Config) -> ProviderResult<Arc<dyn TranscodingProvider>> + Send + Sync + 'static,
    {
        let name = name.into();
        let mut factories = self.factories.write().await;

        if factories.contains_key(&name) {
            return Err(ProviderError::AlreadyRegistered(name));
        }

        tracing::debug!(provider = %name, "Registering provider factory");
        factories.insert(name, Arc::new(factory));
        Ok(())
    }

    /// Get the factory registered under `name`
    pub async fn get(&self, name: &str) -> ProviderResult<ProviderFactory> {
        let factories = self.factories.read().await;

        factories
            .get(name)
            .cloned()
            .ok_or_else(|| ProviderError::NotFound(name.to_string()))
    }

    /// Look up a factory and build the provider from `config`.
    pub async fn build(
        &self,
        name: &str,
        config: &Config,
    ) -> ProviderResult<Arc<dyn TranscodingProvider>> {
        let factory = self.get(name).await?;
        factory(config)
    }

    /// Names of every registered provider, sorted
    pub async fn names(&self) -> Vec<String> {
        let factories = self.factories.read().await;
        let mut names: Vec<String> = factories.keys().cloned().collect();
        names.sort();
        names
    }

    /// Check if a provider is registered
    pub async fn contains(&self, name: &str) -> bool {
        self.factories.read().await.contains_key(name)
    }

    /// Names of providers that build from `config` and pass their
    /// healthcheck, sorted. Health checks run concurrently.
    pub async fn list(&self, config: &Config) -> Vec<String> {
        let factories = self.snapshot().await;

        let checks = factories.into_iter().map(|(name, factory)| async move {
            let provider = match factory(config) {
                Ok(provider) => provider,
                Err(err) => {
                    tracing::debug!(provider = %name, error = %err, "Provider not configured");
                    return None;
                }
            };

            match provider.healthcheck().await {
                Ok(()) => Some(name),
                Err(err) => {
                    tracing::warn!(provider = %name, error = %err, "Provider healthcheck failed");
                    None
                }
            }
        });

        let mut names: Vec<String> = join_all(checks).await.into_iter().flatten().collect();
        names.sort();
        names
    }

    /// Describe one provider.
    ///
    /// A provider whose factory rejects `config` is reported as disabled with
    /// no capabilities or health. Otherwise it is enabled and carries its
    /// capabilities plus the outcome of a healthcheck.
    pub async fn describe(&self, name: &str, config: &Config) -> ProviderResult<Descriptor> {
        let factory = self.get(name).await?;

        let provider = match factory(config) {
            Ok(provider) => provider,
            Err(err) => {
                tracing::debug!(provider = %name, error = %err, "Provider disabled");
                return Ok(Descriptor::disabled(name));
            }
        };

        let health = match provider.healthcheck().await {
            Ok(()) => Health::healthy(),
            Err(err) => Health::unhealthy(err.to_string()),
        };

        Ok(Descriptor {
            name: name.to_string(),
            enabled: true,
            capabilities: Some(provider.capabilities()),
            health: Some(health),
        })
    }

    async fn snapshot(&self) -> Vec<(String, ProviderFactory)> {
        let factories = self.factories.read().await;
        factories
            .iter()
            .map(|(name, factory)| (name.clone(), factory.clone()))
            .collect()
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}
