//! Command-line argument definitions for gemsecrets.
//!
//! Flags become the highest-precedence configuration layer. Each argument
//! struct turns the flags the user actually gave into a JSON layer keyed by
//! canonical field names (see [`Field::key`]).

use camino::{Utf8Path, Utf8PathBuf};
use clap::{ArgAction, Args, Parser, Subcommand};
use ortho_config::serde_json::{Map, Value};

use super::{Field, GeneratorKind, SAMPLE_OVERRIDES_JSON};

/// Command-line interface for gemsecrets.
#[derive(Debug, Parser)]
#[command(name = "gemsecrets")]
#[command(
    author,
    version,
    about = "Generate Kubernetes secrets and Helm overrides for Grafana Enterprise Metrics"
)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (-v for debug, -vv for trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Directory the manifests are written to.
    #[arg(long, global = true, default_value = ".")]
    pub output_dir: Utf8PathBuf,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create an admin credentials secret, prompting for missing values.
    Admin(AdminArgs),

    /// Create a secret holding a GEM license token.
    License(LicenseArgs),

    /// Create `mimir-bucket-secret` with S3 credentials.
    Bucket(BucketArgs),

    /// Create the admin, license, and bucket secrets for GEM in one run.
    Metrics(MetricsArgs),

    /// Create Helm values overrides for GEM object storage.
    #[command(after_help = SAMPLE_OVERRIDES_JSON)]
    Overrides(OverridesArgs),
}

impl Commands {
    /// The generator this subcommand runs.
    #[must_use]
    pub const fn kind(&self) -> GeneratorKind {
        match self {
            Self::Admin(_) => GeneratorKind::Admin,
            Self::License(_) => GeneratorKind::License,
            Self::Bucket(_) => GeneratorKind::Bucket,
            Self::Metrics(_) => GeneratorKind::Metrics,
            Self::Overrides(_) => GeneratorKind::Overrides,
        }
    }

    /// The `--config` path, if the subcommand accepts one and it was given.
    #[must_use]
    pub fn config(&self) -> Option<&Utf8Path> {
        match self {
            Self::Admin(args) => args.config.as_deref(),
            Self::Metrics(args) => args.config.as_deref(),
            Self::Overrides(args) => args.config.as_deref(),
            Self::License(_) | Self::Bucket(_) => None,
        }
    }

    /// The command-line configuration layer.
    #[must_use]
    pub fn cli_layer(&self) -> Value {
        match self {
            Self::Admin(args) => args.cli_layer(),
            Self::License(args) => args.cli_layer(),
            Self::Bucket(args) => args.cli_layer(),
            Self::Metrics(args) => args.cli_layer(),
            Self::Overrides(args) => args.cli_layer(),
        }
    }
}

/// Arguments for the `admin` subcommand.
#[derive(Debug, Default, Args)]
pub struct AdminArgs {
    /// JSON configuration file.
    #[arg(long)]
    pub config: Option<Utf8PathBuf>,

    /// Kubernetes namespace.
    #[arg(long)]
    pub namespace: Option<String>,

    /// Secret name; also names the output file.
    #[arg(long)]
    pub name: Option<String>,

    /// GEM admin username.
    #[arg(long)]
    pub admin_user: Option<String>,

    /// GEM admin password.
    #[arg(long)]
    pub admin_password: Option<String>,
}

impl AdminArgs {
    /// The flags that were given, keyed by canonical field name.
    #[must_use]
    pub fn cli_layer(&self) -> Value {
        layer([
            (Field::Namespace, self.namespace.as_deref()),
            (Field::Name, self.name.as_deref()),
            (Field::AdminUser, self.admin_user.as_deref()),
            (Field::AdminPassword, self.admin_password.as_deref()),
        ])
    }
}

/// Arguments for the `license` subcommand.
#[derive(Debug, Default, Args)]
pub struct LicenseArgs {
    /// Kubernetes namespace.
    #[arg(long)]
    pub namespace: Option<String>,

    /// Secret name; also names the output file.
    #[arg(long)]
    pub name: Option<String>,

    /// Path to `license.jwt`.
    #[arg(long)]
    pub file: Option<Utf8PathBuf>,
}

impl LicenseArgs {
    /// The flags that were given, keyed by canonical field name.
    #[must_use]
    pub fn cli_layer(&self) -> Value {
        layer([
            (Field::Namespace, self.namespace.as_deref()),
            (Field::Name, self.name.as_deref()),
            (Field::LicenseFile, self.file.as_deref().map(Utf8Path::as_str)),
        ])
    }
}

/// Arguments for the `bucket` subcommand.
#[derive(Debug, Default, Args)]
pub struct BucketArgs {
    /// Kubernetes namespace.
    #[arg(long)]
    pub namespace: Option<String>,

    /// S3 access key ID.
    #[arg(value_name = "AWS_ACCESS_KEY_ID")]
    pub access_key: Option<String>,

    /// S3 secret access key.
    #[arg(value_name = "AWS_SECRET_ACCESS_KEY")]
    pub secret_key: Option<String>,
}

impl BucketArgs {
    /// The arguments that were given, keyed by canonical field name.
    #[must_use]
    pub fn cli_layer(&self) -> Value {
        layer([
            (Field::Namespace, self.namespace.as_deref()),
            (Field::AccessKey, self.access_key.as_deref()),
            (Field::SecretKey, self.secret_key.as_deref()),
        ])
    }
}

/// Arguments for the `metrics` subcommand.
///
/// Long flag names keep the camel case used in `config.json`.
#[derive(Debug, Default, Args)]
pub struct MetricsArgs {
    /// JSON configuration file [default: config.json].
    #[arg(long)]
    pub config: Option<Utf8PathBuf>,

    /// Kubernetes namespace for all three secrets.
    #[arg(long)]
    pub namespace: Option<String>,

    /// GEM admin username.
    #[arg(long = "adminUser")]
    pub admin_user: Option<String>,

    /// GEM admin password.
    #[arg(long = "adminPassword")]
    pub admin_password: Option<String>,

    /// Path to `license.jwt`.
    #[arg(long = "licensefile")]
    pub license_file: Option<Utf8PathBuf>,

    /// S3 access key.
    #[arg(long = "awsKey")]
    pub aws_key: Option<String>,

    /// S3 secret key.
    #[arg(long = "awsSecret")]
    pub aws_secret: Option<String>,
}

impl MetricsArgs {
    /// The flags that were given, keyed by canonical field name.
    #[must_use]
    pub fn cli_layer(&self) -> Value {
        layer([
            (Field::Namespace, self.namespace.as_deref()),
            (Field::AdminUser, self.admin_user.as_deref()),
            (Field::AdminPassword, self.admin_password.as_deref()),
            (
                Field::LicenseFile,
                self.license_file.as_deref().map(Utf8Path::as_str),
            ),
            (Field::AccessKey, self.aws_key.as_deref()),
            (Field::SecretKey, self.aws_secret.as_deref()),
        ])
    }
}

/// Arguments for the `overrides` subcommand.
#[derive(Debug, Default, Args)]
pub struct OverridesArgs {
    /// JSON configuration file [default: gem-overrides.json].
    #[arg(long)]
    pub config: Option<Utf8PathBuf>,

    /// Admin client bucket.
    #[arg(long)]
    pub admin_bucket: Option<String>,

    /// Ruler storage bucket.
    #[arg(long)]
    pub ruler_bucket: Option<String>,

    /// Alertmanager storage bucket [default: the ruler bucket].
    #[arg(long)]
    pub alertmanager_bucket: Option<String>,

    /// Blocks storage bucket.
    #[arg(long)]
    pub blocks_bucket: Option<String>,

    /// S3 access key.
    #[arg(long)]
    pub access_key: Option<String>,

    /// S3 secret key.
    #[arg(long)]
    pub secret_key: Option<String>,

    /// S3 endpoint host.
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Rollout annotation value; change it to restart pods [default: 0].
    #[arg(long)]
    pub secret_version: Option<String>,
}

impl OverridesArgs {
    /// The flags that were given, keyed by canonical field name.
    #[must_use]
    pub fn cli_layer(&self) -> Value {
        layer([
            (Field::AdminBucket, self.admin_bucket.as_deref()),
            (Field::RulerBucket, self.ruler_bucket.as_deref()),
            (
                Field::AlertmanagerBucket,
                self.alertmanager_bucket.as_deref(),
            ),
            (Field::BlocksBucket, self.blocks_bucket.as_deref()),
            (Field::AccessKey, self.access_key.as_deref()),
            (Field::SecretKey, self.secret_key.as_deref()),
            (Field::Endpoint, self.endpoint.as_deref()),
            (Field::SecretVersion, self.secret_version.as_deref()),
        ])
    }
}

/// Build a layer from the non-empty values in `pairs`.
///
/// Returns `Value::Null` when no value was given.
fn layer<'a>(pairs: impl IntoIterator<Item = (Field, Option<&'a str>)>) -> Value {
    let map: Map<String, Value> = pairs
        .into_iter()
        .filter_map(|(field, value)| {
            value
                .filter(|v| !v.is_empty())
                .map(|v| (field.key().to_owned(), Value::String(v.to_owned())))
        })
        .collect();
    if map.is_empty() {
        Value::Null
    } else {
        Value::Object(map)
    }
}
