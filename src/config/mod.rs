//! Configuration resolution for gemsecrets.
//!
//! Every generator reads its input from up to four sources. Per field, the
//! highest-precedence source that supplies a non-empty value wins:
//!
//! 1. command-line flags and positional arguments;
//! 2. `GEMSECRETS_*` environment variables;
//! 3. a flat JSON configuration file;
//! 4. an interactive prompt (interactive generators only).
//!
//! Sources 1 to 3 are merged by [`load_inputs`] using `ortho_config`'s
//! `MergeComposer`. [`resolve`] then applies the prompt fallback and
//! validation, producing an [`EffectiveConfig`].
//!
//! # Example configuration
//!
//! `config.json` for the `metrics` generator:
//!
//! ```json
//! {
//!   "namespace": "gem",
//!   "adminUser": "admin",
//!   "adminPassword": "change-me",
//!   "licenseFile": "license.jwt",
//!   "AWS_ACCESS_KEY": "AKIA...",
//!   "AWS_SECRET_ACCESS_KEY": "..."
//! }
//! ```

mod cli;
mod fields;
mod loader;
mod prompt;
mod resolve;
mod types;

#[cfg(test)]
mod tests;

pub use cli::{
    AdminArgs, BucketArgs, Cli, Commands, LicenseArgs, MetricsArgs, OverridesArgs,
};
pub use fields::{
    ENV_PREFIX, Field, FieldSpec, GeneratorKind, GeneratorSpec, MissingPolicy,
    SAMPLE_OVERRIDES_JSON,
};
pub use loader::{ConfigLocation, LoadedInputs, env_var_names, load_inputs};
#[cfg(test)]
pub use prompt::MockPrompter;
pub use prompt::{LinePrompter, Prompter, TerminalPrompter};
pub use resolve::{resolve, resolve_field};
pub use types::{EffectiveConfig, ManifestInputs};
