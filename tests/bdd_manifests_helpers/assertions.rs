//! Assertion helpers for manifest generation behavioural tests.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use rstest_bdd_macros::then;
use serde_yaml_ng::Value;

use super::StepResult;
use super::state::{GenerateOutcome, ManifestsState};
use super::steps::{output_path, scratch_root};

fn outcome(manifests_state: &ManifestsState) -> StepResult<GenerateOutcome> {
    manifests_state
        .outcome
        .get()
        .ok_or_else(|| String::from("generator should have run"))
}

fn read_yaml(manifests_state: &ManifestsState, file: &str) -> StepResult<Value> {
    let path = output_path(manifests_state, file)?;
    let text = std::fs::read_to_string(&path).map_err(|e| format!("cannot read {path}: {e}"))?;
    serde_yaml_ng::from_str(&text).map_err(|e| format!("{path} is not valid YAML: {e}"))
}

fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

#[then("the run succeeds")]
fn run_succeeds(manifests_state: &ManifestsState) -> StepResult<()> {
    match outcome(manifests_state)? {
        GenerateOutcome::Completed { failed, .. } if failed.is_empty() => Ok(()),
        GenerateOutcome::Completed { failed, .. } => {
            Err(format!("expected every write to succeed, failed: {failed:?}"))
        }
        GenerateOutcome::Failed(message) => Err(format!("expected success, got error: {message}")),
    }
}

#[then("the run fails with {message}")]
fn run_fails_with(manifests_state: &ManifestsState, message: String) -> StepResult<()> {
    match outcome(manifests_state)? {
        GenerateOutcome::Failed(actual) if actual.contains(&message) => Ok(()),
        GenerateOutcome::Failed(actual) => {
            Err(format!("expected error containing '{message}', got: {actual}"))
        }
        GenerateOutcome::Completed { written, .. } => {
            Err(format!("expected an error, but wrote {written:?}"))
        }
    }
}

#[then("the write of {file} is reported as failed")]
fn write_reported_failed(manifests_state: &ManifestsState, file: String) -> StepResult<()> {
    match outcome(manifests_state)? {
        GenerateOutcome::Completed { failed, .. } if failed.contains(&file) => Ok(()),
        other => Err(format!("expected {file} to be reported as failed, got {other:?}")),
    }
}

#[then("the file {file} is written")]
fn file_written(manifests_state: &ManifestsState, file: String) -> StepResult<()> {
    let path = output_path(manifests_state, &file)?;
    if path.is_file() {
        Ok(())
    } else {
        Err(format!("expected {path} to exist"))
    }
}

#[then("the file {file} is not written")]
fn file_not_written(manifests_state: &ManifestsState, file: String) -> StepResult<()> {
    let path = output_path(manifests_state, &file)?;
    if path.is_file() {
        Err(format!("expected {path} not to exist"))
    } else {
        Ok(())
    }
}

#[then("the output directory is empty")]
fn output_directory_empty(manifests_state: &ManifestsState) -> StepResult<()> {
    let out = scratch_root(manifests_state)?.join("out");
    let mut entries = std::fs::read_dir(&out).map_err(|e| format!("cannot list {out}: {e}"))?;
    match entries.next() {
        None => Ok(()),
        Some(entry) => Err(format!("expected {out} to be empty, found {entry:?}")),
    }
}

#[then("the secret {file} holds {key} as {expected}")]
fn secret_holds(
    manifests_state: &ManifestsState,
    file: String,
    key: String,
    expected: String,
) -> StepResult<()> {
    let document = read_yaml(manifests_state, &file)?;
    let encoded = document
        .get("data")
        .and_then(|data| data.get(key.as_str()))
        .and_then(Value::as_str)
        .ok_or_else(|| format!("{file} has no data entry {key}"))?;
    let bytes = STANDARD
        .decode(encoded)
        .map_err(|e| format!("{key} is not base64: {e}"))?;
    let actual = String::from_utf8(bytes).map_err(|e| format!("{key} is not UTF-8: {e}"))?;
    if actual == expected {
        Ok(())
    } else {
        Err(format!("expected {key} to be '{expected}', got '{actual}'"))
    }
}

#[then("the secret {file} is in namespace {namespace}")]
fn secret_in_namespace(
    manifests_state: &ManifestsState,
    file: String,
    namespace: String,
) -> StepResult<()> {
    let document = read_yaml(manifests_state, &file)?;
    let actual = document
        .get("metadata")
        .and_then(|metadata| metadata.get("namespace"))
        .and_then(Value::as_str);
    if actual == Some(namespace.as_str()) {
        Ok(())
    } else {
        Err(format!("expected namespace {namespace}, got {actual:?}"))
    }
}

#[then("the overrides value at {path} is {expected}")]
fn overrides_value(
    manifests_state: &ManifestsState,
    path: String,
    expected: String,
) -> StepResult<()> {
    let document = read_yaml(manifests_state, "gem-overrides.yaml")?;
    let node = path
        .split('.')
        .try_fold(&document, |node, key| node.get(key))
        .ok_or_else(|| format!("gem-overrides.yaml has no value at {path}"))?;
    match scalar(node) {
        Some(actual) if actual == expected => Ok(()),
        actual => Err(format!("expected {path} to be '{expected}', got {actual:?}")),
    }
}

#[then("the overrides have no value at {path}")]
fn overrides_missing(manifests_state: &ManifestsState, path: String) -> StepResult<()> {
    let document = read_yaml(manifests_state, "gem-overrides.yaml")?;
    match path
        .split('.')
        .try_fold(&document, |node, key| node.get(key))
    {
        None => Ok(()),
        Some(node) => Err(format!("expected no value at {path}, found {node:?}")),
    }
}
