/// Configuration management for the event chain service
use crate::error::{ServiceError, ServiceResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Main server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub service: ServiceConfig,
    pub storage: StorageConfig,
    pub chain: ChainConfig,
    pub logging: LoggingConfig,
}

/// Service-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub host: String,
    pub port: u16,
    pub version: String,
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub events: EventStoreConfig,
}

/// Event storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum EventStoreConfig {
    Disk {
        location: PathBuf,
    },
    S3 {
        bucket: String,
        region: String,
        access_key_id: Option<String>,
        #[serde(skip_serializing)]
        secret_access_key: Option<String>,
        endpoint: Option<String>,
        key_prefix: String,
    },
}

/// Chain walk limits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainConfig {
    /// Maximum events read by one history request
    pub max_hops: usize,
    /// Deadline for a whole request, in seconds
    pub request_timeout_secs: u64,
}

impl ChainConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Logging configuration
///
/// `level` is a `tracing_subscriber::EnvFilter` directive string.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    /// Emit JSON lines instead of human readable output
    pub json: bool,
}

impl ServerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> ServiceResult<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> ServiceResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let host = var("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = var("PORT")
            .unwrap_or_else(|| "3000".to_string())
            .parse()
            .map_err(|_| ServiceError::Config("Invalid port number".to_string()))?;
        let version = env!("CARGO_PKG_VERSION").to_string();

        let events = if let Some(bucket) = var("S3_BUCKET") {
            EventStoreConfig::S3 {
                bucket,
                region: var("AWS_REGION").unwrap_or_else(|| "us-east-1".to_string()),
                access_key_id: var("AWS_ACCESS_KEY_ID"),
                secret_access_key: var("AWS_SECRET_ACCESS_KEY"),
                endpoint: var("S3_ENDPOINT"),
                key_prefix: var("S3_KEY_PREFIX").unwrap_or_default(),
            }
        } else {
            EventStoreConfig::Disk {
                location: var("EVENTS_DISK_LOCATION")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from("./data/events")),
            }
        };

        let max_hops = var("EVENTS_MAX_HOPS")
            .unwrap_or_else(|| "10000".to_string())
            .parse()
            .map_err(|_| ServiceError::Config("Invalid EVENTS_MAX_HOPS".to_string()))?;
        let request_timeout_secs = var("EVENTS_REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|| "30".to_string())
            .parse()
            .map_err(|_| ServiceError::Config("Invalid EVENTS_REQUEST_TIMEOUT_SECS".to_string()))?;

        let log_level = var("RUST_LOG")
            .unwrap_or_else(|| "event_chain=debug,tower_http=debug".to_string());
        let log_json = var("LOG_FORMAT")
            .map(|format| format.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        Ok(ServerConfig {
            service: ServiceConfig {
                host,
                port,
                version,
            },
            storage: StorageConfig { events },
            chain: ChainConfig {
                max_hops,
                request_timeout_secs,
            },
            logging: LoggingConfig {
                level: log_level,
                json: log_json,
            },
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> ServiceResult<()> {
        if self.chain.max_hops == 0 {
            return Err(ServiceError::Config(
                "EVENTS_MAX_HOPS must be greater than zero".to_string(),
            ));
        }

        if self.chain.request_timeout_secs == 0 {
            return Err(ServiceError::Config(
                "EVENTS_REQUEST_TIMEOUT_SECS must be greater than zero".to_string(),
            ));
        }

        if let EventStoreConfig::S3 {
            access_key_id,
            secret_access_key,
            ..
        } = &self.storage.events
        {
            if access_key_id.is_some() != secret_access_key.is_some() {
                return Err(ServiceError::Config(
                    "AWS_ACCESS_KEY_ID and AWS_SECRET_ACCESS_KEY must be set together".to_string(),
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> ServiceResult<ServerConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();

        assert_eq!(config.service.host, "0.0.0.0");
        assert_eq!(config.service.port, 3000);
        assert_eq!(config.chain.max_hops, 10_000);
        assert_eq!(config.chain.request_timeout(), Duration::from_secs(30));
        assert!(!config.logging.json);
        assert!(matches!(
            config.storage.events,
            EventStoreConfig::Disk { ref location } if location == &PathBuf::from("./data/events")
        ));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_s3_selected_by_bucket() {
        let config = load(&[
            ("S3_BUCKET", "event-log"),
            ("AWS_REGION", "eu-west-1"),
            ("AWS_ACCESS_KEY_ID", "AKIA"),
            ("AWS_SECRET_ACCESS_KEY", "secret"),
            ("S3_KEY_PREFIX", "events/"),
        ])
        .unwrap();

        match &config.storage.events {
            EventStoreConfig::S3 {
                bucket,
                region,
                access_key_id,
                endpoint,
                key_prefix,
                ..
            } => {
                assert_eq!(bucket, "event-log");
                assert_eq!(region, "eu-west-1");
                assert_eq!(access_key_id.as_deref(), Some("AKIA"));
                assert!(endpoint.is_none());
                assert_eq!(key_prefix, "events/");
            }
            other => panic!("expected S3 config, got {:?}", other),
        }
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_blank_bucket_falls_back_to_disk() {
        let config = load(&[("S3_BUCKET", "  "), ("EVENTS_DISK_LOCATION", "/srv/events")]).unwrap();
        assert!(matches!(
            config.storage.events,
            EventStoreConfig::Disk { ref location } if location == &PathBuf::from("/srv/events")
        ));
    }

    #[test]
    fn test_invalid_numbers_rejected() {
        assert!(matches!(load(&[("PORT", "http")]), Err(ServiceError::Config(_))));
        assert!(matches!(load(&[("PORT", "70000")]), Err(ServiceError::Config(_))));
        assert!(matches!(
            load(&[("EVENTS_MAX_HOPS", "-1")]),
            Err(ServiceError::Config(_))
        ));
    }

    #[test]
    fn test_json_logging() {
        let config = load(&[("LOG_FORMAT", "JSON"), ("RUST_LOG", "warn")]).unwrap();
        assert!(config.logging.json);
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_validate_limits() {
        let config = load(&[("EVENTS_MAX_HOPS", "0")]).unwrap();
        assert!(config.validate().is_err());

        let config = load(&[("EVENTS_REQUEST_TIMEOUT_SECS", "0")]).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_partial_credentials() {
        let config = load(&[("S3_BUCKET", "event-log"), ("AWS_ACCESS_KEY_ID", "AKIA")]).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_secret_not_serialized() {
        let config = load(&[
            ("S3_BUCKET", "event-log"),
            ("AWS_ACCESS_KEY_ID", "AKIA"),
            ("AWS_SECRET_ACCESS_KEY", "do-not-print"),
        ])
        .unwrap();
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("do-not-print"));
    }
}
