//! Orchestration API for gemsecrets generators.
//!
//! [`generate`] runs one generator end to end: load the layered input,
//! resolve it (prompting where the generator allows), render every manifest,
//! then write them. [`render_manifests`] is the pure rendering step on its
//! own.
//!
//! Functions here accept library-owned types (not clap types). They do not
//! print to stdout/stderr or call `std::process::exit`.

use camino::Utf8Path;
use ortho_config::serde_json::Value;
use tracing::{debug, info};

use crate::config::{
    ConfigLocation, EffectiveConfig, Field, GeneratorKind, Prompter, load_inputs, resolve,
};
use crate::error::{RenderError, Result as GemSecretsResult};
use crate::files::{ManifestSink, WriteReport, write_manifests};
use crate::manifest::{OverridesDocument, RenderedManifest, SecretManifest};

/// Secret written by the `bucket` generator.
pub const MIMIR_BUCKET_SECRET: &str = "mimir-bucket-secret";

/// Admin credentials secret written by the `metrics` generator.
pub const METRICS_ADMIN_SECRET: &str = "metrics-admin-secret";

/// License secret written by the `metrics` generator.
pub const METRICS_LICENSE_SECRET: &str = "metrics-license-secret";

/// Bucket credentials secret written by the `metrics` generator.
pub const METRICS_BUCKET_SECRET: &str = "metrics-bucket-secret";

/// Data key holding the license token.
pub const LICENSE_KEY: &str = "license.jwt";

/// One generator invocation.
#[derive(Debug, Clone)]
pub struct GenerateRequest<'a> {
    /// Which generator to run.
    pub kind: GeneratorKind,
    /// Explicit `--config` path, if given.
    pub config_path: Option<&'a Utf8Path>,
    /// Command-line layer keyed by canonical field names.
    pub cli_layer: Value,
}

/// Run one generator.
///
/// Every manifest is rendered before the first write, so a resolution or
/// rendering failure leaves the output directory untouched. Write failures
/// do not stop the remaining writes; they are reported in the returned
/// [`WriteReport`].
///
/// # Errors
///
/// Returns configuration, filesystem (input), or render errors raised
/// before writing starts.
pub fn generate<E: mockable::Env>(
    request: GenerateRequest<'_>,
    env: &E,
    prompter: Option<&mut dyn Prompter>,
    sink: &dyn ManifestSink,
) -> GemSecretsResult<WriteReport> {
    let spec = request.kind.spec();
    let location = ConfigLocation::select(spec, request.config_path);
    let loaded = load_inputs(spec, location.as_ref(), request.cli_layer, env)?;
    let config = resolve(spec, &loaded, prompter)?;
    debug!(fields = ?config, "resolved configuration");

    let manifests = render_manifests(request.kind, &config)?;
    info!(
        generator = ?request.kind,
        count = manifests.len(),
        "rendered manifests"
    );
    Ok(write_manifests(sink, &manifests))
}

/// Render every manifest a generator produces.
///
/// # Errors
///
/// Returns [`RenderError`] if a field the shape needs is absent or a name is
/// not valid for Kubernetes.
pub fn render_manifests(
    kind: GeneratorKind,
    config: &EffectiveConfig,
) -> Result<Vec<RenderedManifest>, RenderError> {
    let namespace = config.get(Field::Namespace);
    let rendered = match kind {
        GeneratorKind::Admin => {
            let name = config.require(Field::Name, "admin secret")?;
            vec![admin_secret(name, namespace, config)?]
        }
        GeneratorKind::License => {
            let name = config.require(Field::Name, "license secret")?;
            vec![license_secret(name, namespace, config)?]
        }
        GeneratorKind::Bucket => vec![bucket_secret(
            MIMIR_BUCKET_SECRET,
            namespace,
            config,
            ("AWS_ACCESS_KEY_ID", "AWS_SECRET_ACCESS_KEY"),
        )?],
        GeneratorKind::Metrics => vec![
            admin_secret(METRICS_ADMIN_SECRET, namespace, config)?,
            license_secret(METRICS_LICENSE_SECRET, namespace, config)?,
            bucket_secret(
                METRICS_BUCKET_SECRET,
                namespace,
                config,
                ("AWS_ACCESS_KEY", "AWS_SECRET_ACCESS_KEY"),
            )?,
        ],
        GeneratorKind::Overrides => vec![OverridesDocument::from_config(config)?.to_rendered()?],
    };
    Ok(rendered)
}

fn admin_secret(
    name: &str,
    namespace: Option<&str>,
    config: &EffectiveConfig,
) -> Result<RenderedManifest, RenderError> {
    let secret = SecretManifest::from_plaintext(
        name,
        namespace,
        [
            ("adminUser", config.require(Field::AdminUser, name)?),
            ("adminPassword", config.require(Field::AdminPassword, name)?),
        ],
    )?;
    Ok(secret.to_rendered())
}

fn license_secret(
    name: &str,
    namespace: Option<&str>,
    config: &EffectiveConfig,
) -> Result<RenderedManifest, RenderError> {
    let secret = SecretManifest::from_plaintext(
        name,
        namespace,
        [(LICENSE_KEY, config.require(Field::License, name)?)],
    )?;
    Ok(secret.to_rendered())
}

fn bucket_secret(
    name: &str,
    namespace: Option<&str>,
    config: &EffectiveConfig,
    (access_key, secret_key): (&str, &str),
) -> Result<RenderedManifest, RenderError> {
    let secret = SecretManifest::from_plaintext(
        name,
        namespace,
        [
            (access_key, config.require(Field::AccessKey, name)?),
            (secret_key, config.require(Field::SecretKey, name)?),
        ],
    )?;
    Ok(secret.to_rendered())
}
