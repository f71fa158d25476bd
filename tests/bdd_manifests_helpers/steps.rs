//! Given and When steps for manifest generation scenarios.

use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use gemsecrets::api::{GenerateRequest, generate};
use gemsecrets::config::{Cli, LinePrompter};
use gemsecrets::files::OutputDir;
use mockable::MockEnv;
use rstest_bdd::Slot;
use rstest_bdd_macros::{given, when};
use serde_json::{Map, Value};

use super::StepResult;
use super::state::{GenerateOutcome, ManifestsState};

const OUTPUT: &str = "out";
const CONFIG_FILE: &str = "config.json";
const LICENSE_FILE: &str = "license.jwt";

/// The scratch root, created on first use.
pub(crate) fn scratch_root(manifests_state: &ManifestsState) -> StepResult<Utf8PathBuf> {
    if let Some(root) = manifests_state.root.get() {
        return Ok(root);
    }
    let tmp = tempfile::tempdir().map_err(|e| format!("should create temp dir: {e}"))?;
    let root = Utf8Path::from_path(tmp.path())
        .ok_or_else(|| String::from("temp dir path should be UTF-8"))?
        .to_owned();
    std::fs::create_dir(root.join(OUTPUT))
        .map_err(|e| format!("should create output dir: {e}"))?;
    manifests_state.temp_dir.set(Arc::new(tmp));
    manifests_state.root.set(root.clone());
    Ok(root)
}

/// Path of a file inside the output directory.
pub(crate) fn output_path(manifests_state: &ManifestsState, file: &str) -> StepResult<Utf8PathBuf> {
    Ok(scratch_root(manifests_state)?.join(OUTPUT).join(file))
}

fn push_pair(slot: &Slot<Vec<(String, String)>>, key: String, value: String) {
    let mut pairs = slot.get().unwrap_or_default();
    pairs.push((key, value));
    slot.set(pairs);
}

fn mock_env(manifests_state: &ManifestsState) -> MockEnv {
    let vars = manifests_state.env_vars.get().unwrap_or_default();
    let mut mock = MockEnv::new();
    mock.expect_string().returning(move |key| {
        vars.iter()
            .rev()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.clone())
    });
    mock
}

fn write_config(manifests_state: &ManifestsState) -> StepResult<Option<Utf8PathBuf>> {
    let entries = manifests_state.config_entries.get().unwrap_or_default();
    if entries.is_empty() {
        return Ok(None);
    }
    let object: Map<String, Value> = entries
        .into_iter()
        .map(|(key, value)| (key, Value::String(value)))
        .collect();
    let path = scratch_root(manifests_state)?.join(CONFIG_FILE);
    let json = serde_json::to_string_pretty(&Value::Object(object))
        .map_err(|e| format!("should serialise config: {e}"))?;
    std::fs::write(&path, json).map_err(|e| format!("should write config: {e}"))?;
    Ok(Some(path))
}

#[given("an empty output directory")]
fn empty_output_directory(manifests_state: &ManifestsState) -> StepResult<()> {
    scratch_root(manifests_state).map(|_| ())
}

#[given("the environment variable {name} is {value}")]
#[expect(
    clippy::unnecessary_wraps,
    reason = "rstest-bdd step functions must return StepResult for consistency"
)]
fn environment_variable(
    manifests_state: &ManifestsState,
    name: String,
    value: String,
) -> StepResult<()> {
    push_pair(&manifests_state.env_vars, name, value);
    Ok(())
}

#[given("the config file sets {key} to {value}")]
#[expect(
    clippy::unnecessary_wraps,
    reason = "rstest-bdd step functions must return StepResult for consistency"
)]
fn config_entry(manifests_state: &ManifestsState, key: String, value: String) -> StepResult<()> {
    push_pair(&manifests_state.config_entries, key, value);
    Ok(())
}

#[given("the documented overrides configuration")]
fn documented_overrides(manifests_state: &ManifestsState) -> StepResult<()> {
    for (key, value) in [
        ("admin_bucket", "b1"),
        ("ruler_bucket", "b2"),
        ("blocks_bucket", "b3"),
        ("access_key", "AK"),
        ("secret_key", "SK"),
        ("endpoint", "s3.example.com"),
    ] {
        config_entry(manifests_state, key.to_owned(), value.to_owned())?;
    }
    Ok(())
}

#[given("a license file containing {token}")]
fn license_file(manifests_state: &ManifestsState, token: String) -> StepResult<()> {
    let path = scratch_root(manifests_state)?.join(LICENSE_FILE);
    std::fs::write(&path, token).map_err(|e| format!("should write license: {e}"))?;
    push_pair(
        &manifests_state.env_vars,
        String::from("GEMSECRETS_LICENSE_FILE"),
        path.into_string(),
    );
    Ok(())
}

#[given("the user answers {answers}")]
#[expect(
    clippy::unnecessary_wraps,
    reason = "rstest-bdd step functions must return StepResult for consistency"
)]
fn user_answers(manifests_state: &ManifestsState, answers: String) -> StepResult<()> {
    let lines: String = answers
        .split(',')
        .map(|answer| format!("{}\n", answer.trim()))
        .collect();
    manifests_state.answers.set(lines);
    Ok(())
}

#[given("the output file {file} is blocked")]
fn output_file_blocked(manifests_state: &ManifestsState, file: String) -> StepResult<()> {
    let path = output_path(manifests_state, &file)?;
    std::fs::create_dir(&path).map_err(|e| format!("should create blocking dir: {e}"))
}

#[when("the {generator} generator runs without flags")]
fn run_without_flags(manifests_state: &ManifestsState, generator: String) -> StepResult<()> {
    run_generator(manifests_state, &generator, "")
}

#[when("the {generator} generator runs with {args}")]
fn run_with_args(
    manifests_state: &ManifestsState,
    generator: String,
    args: String,
) -> StepResult<()> {
    run_generator(manifests_state, &generator, &args)
}

fn run_generator(manifests_state: &ManifestsState, generator: &str, args: &str) -> StepResult<()> {
    let out = scratch_root(manifests_state)?.join(OUTPUT);
    let config = write_config(manifests_state)?;

    let mut argv = vec![
        String::from("gemsecrets"),
        String::from("--output-dir"),
        out.to_string(),
        generator.to_owned(),
    ];
    if let Some(path) = config {
        argv.push(String::from("--config"));
        argv.push(path.into_string());
    }
    argv.extend(args.split_whitespace().map(String::from));
    let cli = Cli::try_parse_from(argv).map_err(|e| format!("arguments should parse: {e}"))?;

    let output = OutputDir::open(&out).map_err(|e| format!("should open output dir: {e}"))?;
    let answers = manifests_state.answers.get().unwrap_or_default();
    let mut prompter = LinePrompter::new(answers.as_bytes(), std::io::sink());
    let request = GenerateRequest {
        kind: cli.command.kind(),
        config_path: cli.command.config(),
        cli_layer: cli.command.cli_layer(),
    };

    let outcome = match generate(
        request,
        &mock_env(manifests_state),
        Some(&mut prompter),
        &output,
    ) {
        Ok(report) => GenerateOutcome::Completed {
            written: report.written().map(String::from).collect(),
            failed: report
                .failures()
                .map(|(name, _)| String::from(name))
                .collect(),
        },
        Err(e) => GenerateOutcome::Failed(e.to_string()),
    };
    manifests_state.outcome.set(outcome);
    Ok(())
}
