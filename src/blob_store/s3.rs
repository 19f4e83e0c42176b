/// S3-compatible event storage backend
use crate::blob_store::EventBackend;
use crate::error::{ServiceResult, StorageError};
use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_credential_types::Credentials;
use aws_sdk_s3::config::http::HttpResponse;
use aws_sdk_s3::config::Builder as S3ConfigBuilder;
use aws_sdk_s3::error::{DisplayErrorContext, SdkError};
use aws_sdk_s3::operation::get_object::GetObjectError;
use aws_sdk_s3::Client;
use std::sync::Arc;
use tracing::{debug, error, info};

/// S3 event storage backend
///
/// Supports AWS S3 and S3-compatible storage providers (MinIO, DigitalOcean Spaces, etc.)
#[derive(Clone)]
pub struct S3EventBackend {
    client: Arc<Client>,
    bucket: String,
    key_prefix: String,
}

/// Configuration for S3 storage
#[derive(Debug, Clone)]
pub struct S3Config {
    /// S3 bucket name
    pub bucket: String,

    /// AWS region (e.g., "us-east-1")
    pub region: String,

    /// Custom endpoint for S3-compatible services
    /// Example: "http://localhost:9000"
    pub endpoint: Option<String>,

    /// Static credentials. When absent the SDK default provider chain is used.
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,

    /// Prefix prepended to every event key (default: none)
    pub key_prefix: String,
}

impl Default for S3Config {
    fn default() -> Self {
        Self {
            bucket: String::new(),
            region: "us-east-1".to_string(),
            endpoint: None,
            access_key_id: None,
            secret_access_key: None,
            key_prefix: String::new(),
        }
    }
}

impl S3EventBackend {
    /// Create a new S3 event backend
    pub async fn new(config: S3Config) -> ServiceResult<Self> {
        info!(
            "Initializing S3 event storage (bucket: {}, region: {})",
            config.bucket, config.region
        );

        let mut loader =
            aws_config::defaults(BehaviorVersion::latest()).region(Region::new(config.region.clone()));

        if let (Some(access_key_id), Some(secret_access_key)) =
            (&config.access_key_id, &config.secret_access_key)
        {
            debug!("Using static S3 credentials from configuration");
            loader = loader.credentials_provider(Credentials::new(
                access_key_id,
                secret_access_key,
                None, // session token
                None, // expiration
                "event-chain",
            ));
        }

        let aws_config = loader.load().await;

        // Build S3 config with optional custom endpoint
        let mut s3_config_builder = S3ConfigBuilder::from(&aws_config);

        if let Some(endpoint) = &config.endpoint {
            debug!("Using custom S3 endpoint: {}", endpoint);
            s3_config_builder = s3_config_builder
                .endpoint_url(endpoint)
                .force_path_style(true); // Required for MinIO and some S3-compatible services
        }

        let client = Client::from_conf(s3_config_builder.build());

        info!("✓ S3 event storage initialized");

        Ok(Self {
            client: Arc::new(client),
            bucket: config.bucket,
            key_prefix: config.key_prefix,
        })
    }
}

/// Get the S3 object key for an event key
fn object_key(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{}{}", prefix, key)
    }
}

/// Whether a GetObject failure means the object does not exist
///
/// Some S3-compatible stores answer a bare 404 instead of `NoSuchKey`.
fn is_not_found(err: &SdkError<GetObjectError, HttpResponse>) -> bool {
    match err {
        SdkError::ServiceError(ctx) => {
            ctx.err().is_no_such_key() || ctx.raw().status().as_u16() == 404
        }
        _ => false,
    }
}

#[async_trait]
impl EventBackend for S3EventBackend {
    fn name(&self) -> &'static str {
        "s3"
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let object_key = object_key(&self.key_prefix, key);

        debug!("Downloading event from S3: {}", object_key);

        match self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(&object_key)
            .send()
            .await
        {
            Ok(response) => {
                let data = response
                    .body
                    .collect()
                    .await
                    .map_err(|e| {
                        error!("Failed to read S3 object body: {}", e);
                        StorageError(format!("Failed to read S3 object {}: {}", object_key, e))
                    })?
                    .into_bytes()
                    .to_vec();

                debug!("✓ Event downloaded from S3: {} ({} bytes)", object_key, data.len());
                Ok(Some(data))
            }
            Err(e) if is_not_found(&e) => {
                debug!("Event not found in S3: {}", object_key);
                Ok(None)
            }
            Err(e) => {
                error!("Failed to download event from S3: {}", DisplayErrorContext(&e));
                Err(StorageError(format!(
                    "S3 download of {} failed: {}",
                    object_key,
                    DisplayErrorContext(&e)
                )))
            }
        }
    }

    async fn check(&self) -> Result<(), StorageError> {
        self.client
            .head_bucket()
            .bucket(&self.bucket)
            .send()
            .await
            .map(|_| ())
            .map_err(|e| {
                StorageError(format!(
                    "S3 bucket {} not accessible: {}",
                    self.bucket,
                    DisplayErrorContext(&e)
                ))
            })
    }
}
