//! Manifest rendering.
//!
//! Two document shapes are produced:
//!
//! - [`SecretManifest`]: a flat Kubernetes `Secret` whose `data` values are
//!   always base64-encoded, rendered from a string template.
//! - [`OverridesDocument`]: nested Helm values for GEM object storage whose
//!   credentials are plaintext scalars, serialised with `serde_yaml_ng`.
//!
//! The two must never be mixed: overrides reference the bucket secret through
//! `extraEnvFrom` instead of embedding encoded values.

pub mod encode;
mod overrides;
mod secret;

pub use overrides::{
    AdminClient, BUCKET_SECRET_NAME, DEFAULT_SECRET_VERSION, EnvFromSource, Global, Mimir, Minio,
    OVERRIDES_FILE, OverridesDocument, ROLLOUT_ANNOTATION, S3Config, S3Credentials, SecretRef,
    Storage, StorageRole, StructuredConfig,
};
pub use secret::SecretManifest;

/// A rendered document and the file it belongs in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedManifest {
    /// File name relative to the output directory.
    pub file_name: String,
    /// YAML text.
    pub contents: String,
}
