//! The sync-and-copy operation: clone-if-absent, pull, copy-if-newer.

use crate::config::Config;
use crate::constants::FAILURE_EXIT_CODE;
use crate::copy::{self, CopyStats, FileAction};
use crate::git::{self, GitError};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// One package to sync and where its files go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncRequest {
    pub package: String,
    pub destination: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStep {
    Started,
    RemovingStale,
    Cloning,
    Pulling,
    Copying,
    Completed,
}

impl fmt::Display for SyncStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SyncStep::Started => "start",
            SyncStep::RemovingStale => "remove stale clone",
            SyncStep::Cloning => "clone",
            SyncStep::Pulling => "pull",
            SyncStep::Copying => "copy",
            SyncStep::Completed => "complete",
        };
        f.write_str(name)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("invalid package name {name:?}: {reason}")]
    InvalidPackageName { name: String, reason: &'static str },

    #[error("destination {} is not an existing directory", .0.display())]
    DestinationMissing(PathBuf),

    #[error("could not prepare clone directory {}", .path.display())]
    CloneDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} exists but is not a git repository (rerun with --reclone to replace it)", .0.display())]
    NotARepository(PathBuf),

    #[error("{step} failed")]
    Git {
        step: SyncStep,
        #[source]
        source: GitError,
    },

    #[error("copying into {} failed", .destination.display())]
    Copy {
        destination: PathBuf,
        #[source]
        source: anyhow::Error,
    },
}

impl SyncError {
    /// Process exit code for this failure. Git failures forward git's own code.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        match self {
            SyncError::Git { source, .. } => source.exit_code(),
            _ => FAILURE_EXIT_CODE,
        }
    }

    /// Step the run was on when it failed, if it got past validation.
    #[must_use]
    pub fn step(&self) -> Option<SyncStep> {
        match self {
            SyncError::InvalidPackageName { .. } | SyncError::DestinationMissing(_) => None,
            SyncError::CloneDir { .. } => Some(SyncStep::Cloning),
            SyncError::NotARepository(_) => Some(SyncStep::Pulling),
            SyncError::Git { step, .. } => Some(*step),
            SyncError::Copy { .. } => Some(SyncStep::Copying),
        }
    }
}

#[derive(Debug)]
pub struct SyncSuccess {
    /// A fresh clone was made on this run.
    pub cloned: bool,
    /// The fresh clone replaced a path that was not a repository.
    pub recloned: bool,
    pub copy: CopyStats,
}

#[derive(Debug)]
pub enum SyncOutcome {
    Success(SyncSuccess),
    Failed(SyncError),
}

#[derive(Debug)]
pub struct SyncResult {
    pub package: String,
    pub clone_path: PathBuf,
    pub outcome: SyncOutcome,
    pub duration: Duration,
}

impl SyncResult {
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, SyncOutcome::Success(_))
    }

    /// Zero on success, otherwise the failure's exit code.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        match &self.outcome {
            SyncOutcome::Success(_) => 0,
            SyncOutcome::Failed(err) => err.exit_code(),
        }
    }
}

/// Hooks for observing a sync as it runs.
pub trait SyncCallbacks {
    fn on_sync_start(&self, _package: &str) {}
    fn on_step(&self, step: &SyncStep);
    /// Trimmed stdout of a successful git command.
    fn on_git_output(&self, _output: &str) {}
    fn on_file(&self, _relative: &Path, _action: FileAction) {}
    /// Asked when the clone path exists but is not a git repository and
    /// `--reclone` was not given. Returning true removes it and clones again.
    fn confirm_reclone(&self, _path: &Path) -> bool {
        false
    }
    fn on_complete(&self, result: &SyncResult);
}

/// Rejects names that would escape or confuse the clone base directory.
/// AUR's own naming rules are not checked.
pub fn validate_package_name(name: &str) -> Result<(), SyncError> {
    let reason = if name.is_empty() {
        Some("name is empty")
    } else if name == "." || name == ".." {
        Some("name is a relative directory")
    } else if name.starts_with('-') {
        Some("name starts with '-'")
    } else if name.contains(['/', '\\', '\0']) {
        Some("name contains a path separator or NUL")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(SyncError::InvalidPackageName {
            name: name.to_string(),
            reason,
        }),
        None => Ok(()),
    }
}

/// Local clone path for a package.
#[must_use]
pub fn clone_path(config: &Config, package: &str) -> PathBuf {
    config.clone_dir.join(package)
}

pub fn sync<C>(request: &SyncRequest, callbacks: &C, config: &Config) -> SyncResult
where
    C: SyncCallbacks + ?Sized,
{
    let start = Instant::now();
    let clone_path = clone_path(config, &request.package);
    callbacks.on_sync_start(&request.package);

    let outcome = match do_sync(request, &clone_path, callbacks, config) {
        Ok(success) => SyncOutcome::Success(success),
        Err(err) => SyncOutcome::Failed(err),
    };

    let result = SyncResult {
        package: request.package.clone(),
        clone_path,
        outcome,
        duration: start.elapsed(),
    };
    callbacks.on_complete(&result);
    result
}

fn at_step<T>(step: SyncStep, result: Result<T, GitError>) -> Result<T, SyncError> {
    result.map_err(|source| SyncError::Git { step, source })
}

fn do_sync<C>(
    request: &SyncRequest,
    clone_path: &Path,
    callbacks: &C,
    config: &Config,
) -> Result<SyncSuccess, SyncError>
where
    C: SyncCallbacks + ?Sized,
{
    validate_package_name(&request.package)?;
    if !request.destination.is_dir() {
        return Err(SyncError::DestinationMissing(request.destination.clone()));
    }
    callbacks.on_step(&SyncStep::Started);

    let logger = config.git_logger();
    let mut recloned = false;

    // symlink_metadata so a dangling link still counts as "something is there"
    let exists = clone_path.symlink_metadata().is_ok();
    if exists && !git::is_git_repo(clone_path) {
        if !(config.reclone || callbacks.confirm_reclone(clone_path)) {
            return Err(SyncError::NotARepository(clone_path.to_path_buf()));
        }
        callbacks.on_step(&SyncStep::RemovingStale);
        remove_stale(clone_path)?;
        recloned = true;
    }

    let cloned = !exists || recloned;
    if cloned {
        callbacks.on_step(&SyncStep::Cloning);
        std::fs::create_dir_all(&config.clone_dir).map_err(|source| SyncError::CloneDir {
            path: config.clone_dir.clone(),
            source,
        })?;
        let url = config.repo_url(&request.package);
        let output = at_step(
            SyncStep::Cloning,
            git::clone(&config.clone_dir, &url, &request.package, logger),
        )?;
        callbacks.on_git_output(&output);
    }

    callbacks.on_step(&SyncStep::Pulling);
    let output = at_step(SyncStep::Pulling, git::pull(clone_path, logger))?;
    callbacks.on_git_output(&output);

    callbacks.on_step(&SyncStep::Copying);
    let copy = copy::copy_if_newer(clone_path, &request.destination, |relative, action| {
        callbacks.on_file(relative, action)
    })
    .map_err(|source| SyncError::Copy {
        destination: request.destination.clone(),
        source,
    })?;

    callbacks.on_step(&SyncStep::Completed);

    Ok(SyncSuccess {
        cloned,
        recloned,
        copy,
    })
}

fn remove_stale(path: &Path) -> Result<(), SyncError> {
    let removed = if path.is_dir() && !path.is_symlink() {
        std::fs::remove_dir_all(path)
    } else {
        std::fs::remove_file(path)
    };
    removed.map_err(|source| SyncError::CloneDir {
        path: path.to_path_buf(),
        source,
    })
}
