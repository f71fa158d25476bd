//! Filesystem access for generator input and output.
//!
//! All access goes through `cap_std::fs_utf8::Dir` capabilities: the parent
//! directory of a path is opened once with ambient authority and the file is
//! read or written relative to it.
//!
//! Writing is deliberately per file. [`write_manifests`] attempts every
//! manifest of a run even when an earlier one fails, and reports each outcome
//! in a [`WriteReport`].

use std::path::PathBuf;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use tracing::{debug, info, warn};

use crate::error::FilesystemError;
use crate::manifest::RenderedManifest;

/// Permission bits applied to every written manifest.
pub const MANIFEST_FILE_MODE: u32 = 0o644;

/// Read a UTF-8 text file.
///
/// # Errors
///
/// Returns [`FilesystemError::NotFound`] or
/// [`FilesystemError::PermissionDenied`] for those conditions on either the
/// parent directory or the file, and [`FilesystemError::IoError`] otherwise.
pub fn read_input_file(path: &Utf8Path) -> Result<String, FilesystemError> {
    let (dir, file_name) = open_parent_directory(path)?;
    dir.read_to_string(file_name)
        .map_err(|error| FilesystemError::from_io(std_path(path), &error))
}

/// Open the parent directory of `path` as a capability handle.
fn open_parent_directory(path: &Utf8Path) -> Result<(Dir, &str), FilesystemError> {
    let parent = path
        .parent()
        .filter(|p| !p.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    let file_name = path
        .file_name()
        .ok_or_else(|| FilesystemError::IoError {
            path: std_path(path),
            message: "path does not contain a filename".to_owned(),
        })?;

    let dir = Dir::open_ambient_dir(parent, ambient_authority())
        .map_err(|error| FilesystemError::from_io(std_path(path), &error))?;

    Ok((dir, file_name))
}

fn std_path(path: &Utf8Path) -> PathBuf {
    PathBuf::from(path.as_std_path())
}

/// Destination for rendered manifests.
///
/// Production code writes into an [`OutputDir`]; tests inject mock sinks to
/// simulate failures.
#[cfg_attr(test, mockall::automock)]
pub trait ManifestSink {
    /// Persist `contents` as `file_name`, replacing any existing file.
    ///
    /// # Errors
    ///
    /// Returns a [`FilesystemError`] naming the full path on failure.
    fn write_manifest(&self, file_name: &str, contents: &str) -> Result<(), FilesystemError>;
}

/// A directory that manifests are written into.
#[derive(Debug)]
pub struct OutputDir {
    dir: Dir,
    root: Utf8PathBuf,
}

impl OutputDir {
    /// Open `root` for writing.
    ///
    /// # Errors
    ///
    /// Returns a [`FilesystemError`] if the directory cannot be opened.
    pub fn open(root: &Utf8Path) -> Result<Self, FilesystemError> {
        let dir = Dir::open_ambient_dir(root, ambient_authority())
            .map_err(|error| FilesystemError::from_io(std_path(root), &error))?;
        Ok(Self {
            dir,
            root: root.to_owned(),
        })
    }

    /// The directory path, as given to [`OutputDir::open`].
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    #[cfg(unix)]
    fn apply_mode(&self, file_name: &str) -> std::io::Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let permissions = std::fs::Permissions::from_mode(MANIFEST_FILE_MODE);
        self.dir
            .set_permissions(file_name, cap_std::fs::Permissions::from_std(permissions))
    }

    #[cfg(not(unix))]
    fn apply_mode(&self, _file_name: &str) -> std::io::Result<()> {
        Ok(())
    }
}

impl ManifestSink for OutputDir {
    /// Writes to a hidden sibling first and renames it over `file_name`, so
    /// the target is either the old manifest or the complete new one.
    fn write_manifest(&self, file_name: &str, contents: &str) -> Result<(), FilesystemError> {
        let path = self.root.join(file_name);
        let staging = staging_name(file_name);
        let result = self
            .dir
            .write(&staging, contents)
            .and_then(|()| self.apply_mode(&staging))
            .and_then(|()| self.dir.rename(&staging, &self.dir, file_name));

        if result.is_err()
            && let Err(error) = self.dir.remove_file(&staging)
        {
            debug!(file = %staging, %error, "no staging file to clean up");
        }
        result.map_err(|error| FilesystemError::from_io(std_path(&path), &error))
    }
}

/// Name of the temporary sibling a manifest is staged in.
fn staging_name(file_name: &str) -> String {
    format!(".{file_name}.tmp")
}

/// The result of writing one manifest.
#[derive(Debug)]
pub struct WriteOutcome {
    /// The file that was attempted.
    pub file_name: String,
    /// Whether it was written.
    pub result: Result<(), FilesystemError>,
}

/// Per-file results of a write pass, in attempt order.
#[derive(Debug, Default)]
pub struct WriteReport {
    outcomes: Vec<WriteOutcome>,
}

impl WriteReport {
    /// Every outcome, in attempt order.
    #[must_use]
    pub fn outcomes(&self) -> &[WriteOutcome] {
        &self.outcomes
    }

    /// File names that were written.
    pub fn written(&self) -> impl Iterator<Item = &str> {
        self.outcomes
            .iter()
            .filter(|outcome| outcome.result.is_ok())
            .map(|outcome| outcome.file_name.as_str())
    }

    /// File names that failed, with their errors.
    pub fn failures(&self) -> impl Iterator<Item = (&str, &FilesystemError)> {
        self.outcomes.iter().filter_map(|outcome| {
            outcome
                .result
                .as_ref()
                .err()
                .map(|error| (outcome.file_name.as_str(), error))
        })
    }

    /// Whether every write succeeded.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(|outcome| outcome.result.is_ok())
    }

    /// Collapse the report into a single result.
    ///
    /// # Errors
    ///
    /// Returns [`FilesystemError::PartialWrite`] when any write failed.
    pub fn into_result(self) -> Result<(), FilesystemError> {
        let failed = self.failures().count();
        if failed == 0 {
            Ok(())
        } else {
            Err(FilesystemError::PartialWrite {
                failed,
                total: self.outcomes.len(),
            })
        }
    }
}

/// Write every manifest, continuing past failures.
#[must_use]
pub fn write_manifests(sink: &dyn ManifestSink, manifests: &[RenderedManifest]) -> WriteReport {
    let outcomes = manifests
        .iter()
        .map(|manifest| {
            let result = sink.write_manifest(&manifest.file_name, &manifest.contents);
            match &result {
                Ok(()) => info!(file = %manifest.file_name, "wrote manifest"),
                Err(error) => warn!(file = %manifest.file_name, %error, "failed to write manifest"),
            }
            WriteOutcome {
                file_name: manifest.file_name.clone(),
                result,
            }
        })
        .collect();
    WriteReport { outcomes }
}
