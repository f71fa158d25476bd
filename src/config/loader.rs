//! Configuration loading with layered precedence.
//!
//! This module assembles the non-interactive sources of generator input with the
//! precedence order (lowest to highest): application defaults, JSON
//! configuration file, environment variables, command-line arguments. The
//! layers are composed with `ortho_config`'s `MergeComposer` and merged into
//! [`ManifestInputs`]. Interactive prompting is a separate, final step handled
//! by [`super::resolve`].
//!
//! # Configuration files
//!
//! Configuration files are flat JSON objects whose keys are the generator's
//! file keys (see [`super::FieldSpec::file_key`]), for example `adminUser` or
//! `admin_bucket`. Keys a generator does not know are ignored. A known key
//! with a non-string value is rejected. Empty strings are treated as absent.
//!
//! A default configuration file that does not exist is skipped silently. A
//! path passed explicitly with `--config` must exist. A file that exists but
//! cannot be parsed is always an error.
//!
//! # Environment variables
//!
//! Each field a generator uses may also be supplied as `GEMSECRETS_<FIELD>`,
//! for example `GEMSECRETS_ACCESS_KEY`. Environment values sit between the
//! file and the command line.

use camino::{Utf8Path, Utf8PathBuf};
use ortho_config::MergeComposer;
use ortho_config::serde_json::{self, Map, Value};
use tracing::debug;

use super::{Field, GeneratorSpec, ManifestInputs};
use crate::error::{ConfigError, FilesystemError, Result};
use crate::files::read_input_file;

/// Where to look for a JSON configuration file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigLocation {
    /// The file path.
    pub path: Utf8PathBuf,
    /// Whether the user named the path explicitly.
    pub explicit: bool,
}

impl ConfigLocation {
    /// Chooses the configuration file for `spec`.
    ///
    /// An explicit path wins; otherwise the generator's default file name is
    /// used. Generators without a default and without an explicit path read no
    /// file.
    #[must_use]
    pub fn select(spec: &GeneratorSpec, explicit: Option<&Utf8Path>) -> Option<Self> {
        explicit.map_or_else(
            || {
                spec.default_config.map(|name| Self {
                    path: Utf8PathBuf::from(name),
                    explicit: false,
                })
            },
            |path| {
                Some(Self {
                    path: path.to_owned(),
                    explicit: true,
                })
            },
        )
    }
}

/// The merged non-interactive input of a generator run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadedInputs {
    /// Values merged from every layer.
    pub inputs: ManifestInputs,
    /// Whether a configuration file was loaded or any value was supplied.
    pub supplied: bool,
}

/// Returns the environment variable names `spec` reads.
///
/// This is primarily useful for tests that need to clear every
/// `GEMSECRETS_*` variable to ensure isolation.
#[must_use]
pub fn env_var_names(spec: &GeneratorSpec) -> Vec<&'static str> {
    spec.fields.iter().map(|field| field.field.env_var()).collect()
}

/// Load generator input from every non-interactive layer.
///
/// `cli` is the command-line layer, keyed by canonical field keys (see
/// [`Field::key`]); `Value::Null` means no flags were given.
///
/// # Errors
///
/// Returns `ConfigError` if:
/// - an explicit configuration file does not exist
/// - the configuration file cannot be read or parsed
/// - a configuration file value has the wrong type
/// - the layers cannot be merged
///
/// Returns `FilesystemError` if a named license file cannot be read.
pub fn load_inputs<E: mockable::Env>(
    spec: &GeneratorSpec,
    config: Option<&ConfigLocation>,
    mut cli: Value,
    env: &E,
) -> Result<LoadedInputs> {
    let mut composer = MergeComposer::new();
    let mut supplied = false;

    // Layer 1: Defaults (serialised from ManifestInputs::default()).
    let defaults =
        serde_json::to_value(ManifestInputs::default()).map_err(|e| ConfigError::InvalidValue {
            field: String::from("defaults"),
            reason: format!("failed to serialise defaults: {e}"),
        })?;
    composer.push_defaults(defaults);

    // Layer 2: Configuration file.
    if let Some(location) = config
        && let Some(content) = read_config_file(location)?
    {
        let mut layer = file_layer(spec, &location.path, &content)?;
        attach_license(spec, &mut layer)?;
        debug!(path = %location.path, "loaded configuration file");
        composer.push_file(layer, Some(location.path.clone()));
        supplied = true;
    }

    // Layer 3: Environment variables.
    let mut env_values = collect_env_vars(spec, env);
    attach_license(spec, &mut env_values)?;
    if !env_values.is_null() {
        debug!("applying environment overrides");
        composer.push_environment(env_values);
        supplied = true;
    }

    // Layer 4: CLI overrides.
    attach_license(spec, &mut cli)?;
    if !is_empty_layer(&cli) {
        composer.push_cli(cli);
        supplied = true;
    }

    let inputs =
        ManifestInputs::merge_from_layers(composer.layers()).map_err(ConfigError::OrthoConfig)?;

    Ok(LoadedInputs { inputs, supplied })
}

/// Read the configuration file, tolerating a missing default file.
fn read_config_file(location: &ConfigLocation) -> Result<Option<String>> {
    match read_input_file(&location.path) {
        Ok(content) => Ok(Some(content)),
        Err(FilesystemError::NotFound { path, .. }) => {
            if location.explicit {
                Err(ConfigError::FileNotFound { path }.into())
            } else {
                debug!(path = %location.path, "no configuration file found");
                Ok(None)
            }
        }
        Err(other) => Err(other.into()),
    }
}

/// Translate a JSON configuration file into a layer keyed by canonical names.
fn file_layer(spec: &GeneratorSpec, path: &Utf8Path, content: &str) -> Result<Value> {
    let parse_error = |message: String| ConfigError::ParseError {
        path: path.as_std_path().to_path_buf(),
        message,
    };

    let parsed: Value = serde_json::from_str(content).map_err(|e| parse_error(e.to_string()))?;
    let Value::Object(object) = parsed else {
        return Err(parse_error(String::from("expected a JSON object")).into());
    };

    let mut layer = Map::new();
    for field_spec in spec.fields {
        let Some(file_key) = field_spec.file_key else {
            continue;
        };
        match object.get(file_key) {
            None | Some(Value::Null) => {}
            Some(Value::String(value)) => {
                if !value.is_empty() {
                    layer.insert(
                        field_spec.field.key().to_owned(),
                        Value::String(value.clone()),
                    );
                }
            }
            Some(other) => {
                return Err(ConfigError::InvalidValue {
                    field: file_key.to_owned(),
                    reason: format!("expected a string, got {}", json_type(other)),
                }
                .into());
            }
        }
    }

    Ok(Value::Object(layer))
}

/// Describe the JSON type of `value` for error messages.
const fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Collect `GEMSECRETS_*` environment variables for the fields `spec` uses.
fn collect_env_vars<E: mockable::Env>(spec: &GeneratorSpec, env: &E) -> Value {
    let mut root = Map::new();

    for field_spec in spec.fields {
        let field = field_spec.field;
        let Some(value) = env.string(field.env_var()) else {
            continue;
        };
        if value.is_empty() {
            continue;
        }
        root.insert(field.key().to_owned(), Value::String(value));
    }

    if root.is_empty() {
        Value::Null
    } else {
        Value::Object(root)
    }
}

/// Whether a layer carries no values.
fn is_empty_layer(layer: &Value) -> bool {
    match layer {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

/// Replace a license path in `layer` with the file's contents.
///
/// The path and the content are one logical input: a layer naming a license
/// file supplies `license` at that layer's precedence, overriding any content
/// given in the same layer. The path was named explicitly, so a read failure
/// is fatal.
fn attach_license(spec: &GeneratorSpec, layer: &mut Value) -> Result<()> {
    if !spec.uses(Field::License) {
        return Ok(());
    }
    let Value::Object(map) = layer else {
        return Ok(());
    };
    let Some(Value::String(path)) = map.get(Field::LicenseFile.key()) else {
        return Ok(());
    };
    if path.is_empty() {
        return Ok(());
    }

    let license_path = Utf8PathBuf::from(path.as_str());
    let content = read_input_file(&license_path)?;
    debug!(path = %license_path, "read license file");
    map.insert(Field::License.key().to_owned(), Value::String(content));
    Ok(())
}
