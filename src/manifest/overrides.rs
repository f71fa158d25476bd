//! Helm values overrides for GEM object storage.
//!
//! The document points every GEM pod at the bucket secret through
//! `global.extraEnvFrom`, disables the bundled `MinIO`, and configures four
//! S3 storage blocks that share one set of credentials.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::RenderedManifest;
use crate::config::{EffectiveConfig, Field};
use crate::error::RenderError;

/// Output file for the overrides document.
pub const OVERRIDES_FILE: &str = "gem-overrides.yaml";

/// Secret referenced from `global.extraEnvFrom`.
pub const BUCKET_SECRET_NAME: &str = "metrics-bucket-secret";

/// Pod annotation bumped to force a rollout when the bucket secret changes.
pub const ROLLOUT_ANNOTATION: &str = "bucketSecretVersion";

/// Rollout annotation value when none is configured.
pub const DEFAULT_SECRET_VERSION: &str = "0";

/// The complete values document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverridesDocument {
    /// Settings applied to every GEM component.
    pub global: Global,
    /// The bundled `MinIO` chart.
    pub minio: Minio,
    /// GEM configuration.
    pub mimir: Mimir,
}

/// `global` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Global {
    /// Secrets exposed to every pod as environment variables.
    #[serde(rename = "extraEnvFrom")]
    pub extra_env_from: Vec<EnvFromSource>,
    /// Annotations added to every pod.
    #[serde(rename = "podAnnotations")]
    pub pod_annotations: BTreeMap<String, String>,
}

/// One `envFrom` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvFromSource {
    /// The referenced secret.
    #[serde(rename = "secretRef")]
    pub secret_ref: SecretRef,
}

/// Reference to a secret by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretRef {
    /// Secret name.
    pub name: String,
}

/// `minio` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Minio {
    /// Whether the bundled `MinIO` is deployed.
    pub enabled: bool,
}

/// `mimir` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mimir {
    /// Configuration merged into the generated GEM config file.
    #[serde(rename = "structuredConfig")]
    pub structured_config: StructuredConfig,
}

/// Storage blocks for each bucket role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredConfig {
    /// Admin API bucket.
    pub admin_client: AdminClient,
    /// Alertmanager state bucket.
    pub alertmanager_storage: Storage,
    /// TSDB blocks bucket.
    pub blocks_storage: Storage,
    /// Ruler rules bucket.
    pub ruler_storage: Storage,
}

/// The admin client nests its storage one level deeper than the others.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminClient {
    /// Admin storage.
    pub storage: Storage,
}

/// One storage block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Storage {
    /// Storage backend; only blocks storage sets it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backend: Option<String>,
    /// S3 settings.
    pub s3: S3Config,
}

/// S3 settings of one storage block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct S3Config {
    /// Bucket name.
    pub bucket_name: String,
    /// Access key ID, in plaintext.
    pub access_key_id: String,
    /// Endpoint host.
    pub endpoint: String,
    /// Secret access key, in plaintext.
    pub secret_access_key: String,
}

/// Credentials shared by every storage block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct S3Credentials<'a> {
    /// Access key ID.
    pub access_key: &'a str,
    /// Secret access key.
    pub secret_key: &'a str,
    /// Endpoint host.
    pub endpoint: &'a str,
}

/// The role a bucket plays in GEM.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageRole {
    /// `admin_client.storage`.
    Admin,
    /// `alertmanager_storage`.
    Alertmanager,
    /// `blocks_storage`.
    Blocks,
    /// `ruler_storage`.
    Ruler,
}

impl StorageRole {
    /// Build the storage block for this role.
    #[must_use]
    pub fn storage(self, bucket: &str, credentials: S3Credentials<'_>) -> Storage {
        let backend = match self {
            Self::Blocks => Some(String::from("s3")),
            Self::Admin | Self::Alertmanager | Self::Ruler => None,
        };
        Storage {
            backend,
            s3: S3Config {
                bucket_name: bucket.to_owned(),
                access_key_id: credentials.access_key.to_owned(),
                endpoint: credentials.endpoint.to_owned(),
                secret_access_key: credentials.secret_key.to_owned(),
            },
        }
    }
}

impl OverridesDocument {
    /// Build the document from resolved input.
    ///
    /// The alertmanager bucket falls back to the ruler bucket and the rollout
    /// annotation to [`DEFAULT_SECRET_VERSION`].
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::MissingField`] when a bucket, the credentials,
    /// or the endpoint are absent.
    pub fn from_config(config: &EffectiveConfig) -> Result<Self, RenderError> {
        let credentials = S3Credentials {
            access_key: config.require(Field::AccessKey, OVERRIDES_FILE)?,
            secret_key: config.require(Field::SecretKey, OVERRIDES_FILE)?,
            endpoint: config.require(Field::Endpoint, OVERRIDES_FILE)?,
        };
        let admin_bucket = config.require(Field::AdminBucket, OVERRIDES_FILE)?;
        let ruler_bucket = config.require(Field::RulerBucket, OVERRIDES_FILE)?;
        let blocks_bucket = config.require(Field::BlocksBucket, OVERRIDES_FILE)?;
        let alertmanager_bucket = config
            .get(Field::AlertmanagerBucket)
            .unwrap_or(ruler_bucket);
        let secret_version = config
            .get(Field::SecretVersion)
            .unwrap_or(DEFAULT_SECRET_VERSION);

        Ok(Self {
            global: Global {
                extra_env_from: vec![EnvFromSource {
                    secret_ref: SecretRef {
                        name: BUCKET_SECRET_NAME.to_owned(),
                    },
                }],
                pod_annotations: BTreeMap::from([(
                    ROLLOUT_ANNOTATION.to_owned(),
                    secret_version.to_owned(),
                )]),
            },
            minio: Minio { enabled: false },
            mimir: Mimir {
                structured_config: StructuredConfig {
                    admin_client: AdminClient {
                        storage: StorageRole::Admin.storage(admin_bucket, credentials),
                    },
                    alertmanager_storage: StorageRole::Alertmanager
                        .storage(alertmanager_bucket, credentials),
                    blocks_storage: StorageRole::Blocks.storage(blocks_bucket, credentials),
                    ruler_storage: StorageRole::Ruler.storage(ruler_bucket, credentials),
                },
            },
        })
    }

    /// Serialise the document as YAML.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Serialise`] if serialisation fails.
    pub fn render(&self) -> Result<String, RenderError> {
        serde_yaml_ng::to_string(self).map_err(|error| RenderError::Serialise {
            manifest: OVERRIDES_FILE.to_owned(),
            message: error.to_string(),
        })
    }

    /// Render the document paired with [`OVERRIDES_FILE`].
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Serialise`] if serialisation fails.
    pub fn to_rendered(&self) -> Result<RenderedManifest, RenderError> {
        Ok(RenderedManifest {
            file_name: OVERRIDES_FILE.to_owned(),
            contents: self.render()?,
        })
    }
}
