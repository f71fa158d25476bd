//! Shared fixtures and helper functions for config tests.

use std::sync::Arc;

use camino::Utf8PathBuf;
use mockable::MockEnv;
use ortho_config::MergeComposer;
use rstest::fixture;
use tempfile::TempDir;

use crate::config::ManifestInputs;

/// Helper: Creates a `MergeComposer` with defaults layer already pushed.
pub fn create_composer_with_defaults() -> Result<MergeComposer, serde_json::Error> {
    let mut composer = MergeComposer::new();
    let defaults = ortho_config::serde_json::to_value(ManifestInputs::default())?;
    composer.push_defaults(defaults);
    Ok(composer)
}

/// Helper: Merges layers from a composer into `ManifestInputs`.
pub fn merge_inputs(
    composer: MergeComposer,
) -> Result<ManifestInputs, Arc<ortho_config::OrthoError>> {
    ManifestInputs::merge_from_layers(composer.layers())
}

/// Helper: Creates a `MergeComposer` with defaults, file, and env layers for testing layer precedence.
pub fn create_composer_with_file_and_env() -> Result<MergeComposer, serde_json::Error> {
    use ortho_config::serde_json::json;

    let mut composer = create_composer_with_defaults()?;

    composer.push_file(
        json!({
            "admin_user": "fallback",
            "endpoint": "file.example.com"
        }),
        None,
    );

    composer.push_environment(json!({
        "admin_user": "from-env"
    }));

    Ok(composer)
}

/// Creates a `MockEnv` that returns `None` for every variable.
#[fixture]
pub fn empty_env() -> MockEnv {
    let mut env = MockEnv::new();
    env.expect_string().returning(|_| None);
    env
}

/// Creates a `MockEnv` with custom mappings for environment variables.
pub fn env_with_vars(mappings: &'static [(&'static str, &'static str)]) -> MockEnv {
    let mut env = MockEnv::new();
    env.expect_string().returning(move |key| {
        mappings
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| String::from(*v))
    });
    env
}

/// A temporary directory holding input files.
pub struct InputDir {
    dir: TempDir,
}

impl InputDir {
    /// Writes `contents` to `name` and returns its path.
    pub fn write(&self, name: &str, contents: &str) -> Utf8PathBuf {
        let path = self.path(name);
        std::fs::write(&path, contents).expect("input file should be written");
        path
    }

    /// Path of `name` inside the directory, whether or not it exists.
    pub fn path(&self, name: &str) -> Utf8PathBuf {
        Utf8PathBuf::try_from(self.dir.path().join(name)).expect("temp path should be UTF-8")
    }
}

/// Fixture providing an empty input directory.
#[fixture]
pub fn input_dir() -> InputDir {
    InputDir {
        dir: TempDir::new().expect("temporary directory should be created"),
    }
}
