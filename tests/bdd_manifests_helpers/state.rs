//! Scenario state for manifest generation behavioural tests.

use std::sync::Arc;

use camino::Utf8PathBuf;
use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::ScenarioState;
use tempfile::TempDir;

/// Outcome of one generator run.
#[derive(Debug, Clone)]
pub(crate) enum GenerateOutcome {
    /// Rendering succeeded; the lists name written and failed files.
    Completed {
        written: Vec<String>,
        failed: Vec<String>,
    },
    /// The run stopped before writing.
    Failed(String),
}

#[derive(Default, ScenarioState)]
pub(crate) struct ManifestsState {
    /// Scratch directory holding inputs and the `out/` directory.
    pub(crate) temp_dir: Slot<Arc<TempDir>>,
    pub(crate) root: Slot<Utf8PathBuf>,
    pub(crate) env_vars: Slot<Vec<(String, String)>>,
    pub(crate) config_entries: Slot<Vec<(String, String)>>,
    pub(crate) answers: Slot<String>,
    pub(crate) outcome: Slot<GenerateOutcome>,
}

#[fixture]
pub(crate) fn manifests_state() -> ManifestsState {
    let state = ManifestsState::default();
    state.env_vars.set(Vec::new());
    state.config_entries.set(Vec::new());
    state.answers.set(String::new());
    state
}
