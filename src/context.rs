/// Application context and dependency injection
use crate::{
    blob_store::{DiskEventBackend, EventBackend, S3Config, S3EventBackend},
    config::{EventStoreConfig, ServerConfig},
    error::ServiceResult,
    events::{EventResolver, ResolverConfig},
};
use std::sync::Arc;
use tokio::time::Instant;

/// Application context holding all shared services
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<ServerConfig>,
    pub resolver: Arc<EventResolver>,
}

impl AppContext {
    /// Create a new application context from configuration
    pub async fn new(config: ServerConfig) -> ServiceResult<Self> {
        // Validate configuration
        config.validate()?;

        let backend = Self::build_backend(&config.storage.events).await?;

        Ok(Self::with_backend(config, backend))
    }

    /// Create a context over an already constructed backend
    pub fn with_backend(config: ServerConfig, backend: Arc<dyn EventBackend>) -> Self {
        let resolver = EventResolver::new(
            backend,
            ResolverConfig {
                max_hops: config.chain.max_hops,
            },
        );

        Self {
            config: Arc::new(config),
            resolver: Arc::new(resolver),
        }
    }

    async fn build_backend(config: &EventStoreConfig) -> ServiceResult<Arc<dyn EventBackend>> {
        let backend: Arc<dyn EventBackend> = match config {
            EventStoreConfig::Disk { location } => {
                tracing::info!("Using disk event storage at {}", location.display());
                tokio::fs::create_dir_all(location).await?;
                Arc::new(DiskEventBackend::new(location.clone()))
            }
            EventStoreConfig::S3 {
                bucket,
                region,
                access_key_id,
                secret_access_key,
                endpoint,
                key_prefix,
            } => Arc::new(
                S3EventBackend::new(S3Config {
                    bucket: bucket.clone(),
                    region: region.clone(),
                    endpoint: endpoint.clone(),
                    access_key_id: access_key_id.clone(),
                    secret_access_key: secret_access_key.clone(),
                    key_prefix: key_prefix.clone(),
                })
                .await?,
            ),
        };

        Ok(backend)
    }

    /// Deadline for a request starting now
    pub fn request_deadline(&self) -> Instant {
        Instant::now() + self.config.chain.request_timeout()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_new_with_disk_backend_creates_directory() {
        let dir = tempdir().unwrap();
        let location = dir.path().join("events");
        let mut config = ServerConfig::from_lookup(|_| None).unwrap();
        config.storage.events = EventStoreConfig::Disk {
            location: location.clone(),
        };

        let ctx = AppContext::new(config).await.unwrap();

        assert!(location.is_dir());
        assert_eq!(ctx.resolver.backend().name(), "disk");
        assert!(ctx.resolver.backend().check().await.is_ok());
    }

    #[tokio::test]
    async fn test_new_rejects_invalid_config() {
        let mut config = ServerConfig::from_lookup(|_| None).unwrap();
        config.chain.max_hops = 0;
        config.storage.events = EventStoreConfig::Disk {
            location: PathBuf::from("/nonexistent/never-created"),
        };

        assert!(AppContext::new(config).await.is_err());
    }

    #[tokio::test]
    async fn test_request_deadline_uses_timeout() {
        let dir = tempdir().unwrap();
        let mut config = ServerConfig::from_lookup(|_| None).unwrap();
        config.chain.request_timeout_secs = 5;
        let ctx = AppContext::with_backend(
            config,
            Arc::new(DiskEventBackend::new(dir.path().to_path_buf())),
        );

        let deadline = ctx.request_deadline();
        let remaining = deadline - Instant::now();
        assert!(remaining <= std::time::Duration::from_secs(5));
        assert!(remaining > std::time::Duration::from_secs(4));
    }
}
