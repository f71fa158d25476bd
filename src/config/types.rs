//! Configuration data types for gemsecrets.

use std::collections::BTreeMap;
use std::fmt;

use camino::{Utf8Path, Utf8PathBuf};
use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

use super::Field;
use crate::error::RenderError;

/// Layered generator input.
///
/// Every value is optional here: this structure holds whatever the defaults,
/// configuration file, environment, and command-line layers supplied, merged
/// with the precedence (lowest to highest) defaults, file, environment, CLI.
/// Interactive fallback happens later, in [`super::resolve`].
///
/// The command line is parsed separately by [`super::Cli`], so every field
/// skips the derive's own CLI generation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "GEMSECRETS")]
pub struct ManifestInputs {
    /// Kubernetes namespace.
    #[ortho_config(skip_cli)]
    pub namespace: Option<String>,

    /// Kubernetes secret name.
    #[ortho_config(skip_cli)]
    pub name: Option<String>,

    /// GEM admin username.
    #[ortho_config(skip_cli)]
    pub admin_user: Option<String>,

    /// GEM admin password.
    #[ortho_config(skip_cli)]
    pub admin_password: Option<String>,

    /// Contents of `license.jwt`.
    #[ortho_config(skip_cli)]
    pub license: Option<String>,

    /// Path to a `license.jwt` file, read when `license` is absent.
    #[ortho_config(skip_cli)]
    pub license_file: Option<Utf8PathBuf>,

    /// S3 access key ID.
    #[ortho_config(skip_cli)]
    pub access_key: Option<String>,

    /// S3 secret access key.
    #[ortho_config(skip_cli)]
    pub secret_key: Option<String>,

    /// Admin client bucket.
    #[ortho_config(skip_cli)]
    pub admin_bucket: Option<String>,

    /// Ruler storage bucket.
    #[ortho_config(skip_cli)]
    pub ruler_bucket: Option<String>,

    /// Alertmanager storage bucket.
    #[ortho_config(skip_cli)]
    pub alertmanager_bucket: Option<String>,

    /// Blocks storage bucket.
    #[ortho_config(skip_cli)]
    pub blocks_bucket: Option<String>,

    /// S3 endpoint host.
    #[ortho_config(skip_cli)]
    pub endpoint: Option<String>,

    /// Rollout annotation value.
    #[ortho_config(skip_cli)]
    pub secret_version: Option<String>,
}

impl ManifestInputs {
    /// Returns the layered value for `field`, treating empty strings as absent.
    #[must_use]
    pub fn get(&self, field: Field) -> Option<&str> {
        let value = match field {
            Field::Namespace => self.namespace.as_deref(),
            Field::Name => self.name.as_deref(),
            Field::AdminUser => self.admin_user.as_deref(),
            Field::AdminPassword => self.admin_password.as_deref(),
            Field::License => self.license.as_deref(),
            Field::LicenseFile => self.license_file.as_deref().map(Utf8Path::as_str),
            Field::AccessKey => self.access_key.as_deref(),
            Field::SecretKey => self.secret_key.as_deref(),
            Field::AdminBucket => self.admin_bucket.as_deref(),
            Field::RulerBucket => self.ruler_bucket.as_deref(),
            Field::AlertmanagerBucket => self.alertmanager_bucket.as_deref(),
            Field::BlocksBucket => self.blocks_bucket.as_deref(),
            Field::Endpoint => self.endpoint.as_deref(),
            Field::SecretVersion => self.secret_version.as_deref(),
        };
        value.filter(|v| !v.is_empty())
    }
}

/// The fully resolved input of one generator run.
///
/// Built once by [`super::resolve`] and read-only afterwards. Values are
/// plaintext; encoding happens in the renderer. `Debug` output lists field
/// names only so credentials never reach logs.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct EffectiveConfig {
    values: BTreeMap<Field, String>,
}

impl EffectiveConfig {
    /// Returns the value of `field`, if resolved.
    #[must_use]
    pub fn get(&self, field: Field) -> Option<&str> {
        self.values.get(&field).map(String::as_str)
    }

    /// Returns the value of `field` or a render error naming `manifest`.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::MissingField`] when the field was not resolved.
    pub fn require(&self, field: Field, manifest: &str) -> Result<&str, RenderError> {
        self.get(field).ok_or_else(|| RenderError::MissingField {
            manifest: manifest.to_owned(),
            field: field.key().to_owned(),
        })
    }

    /// Number of resolved fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether nothing was resolved.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The resolved fields, in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.values.keys().copied()
    }
}

impl FromIterator<(Field, String)> for EffectiveConfig {
    fn from_iter<I: IntoIterator<Item = (Field, String)>>(iter: I) -> Self {
        let values = iter
            .into_iter()
            .filter(|(_, value)| !value.is_empty())
            .collect();
        Self { values }
    }
}

impl fmt::Debug for EffectiveConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set()
            .entries(self.values.keys().map(|field| field.key()))
            .finish()
    }
}
