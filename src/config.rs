//! Configuration types for CLI verbosity and sync options.

use crate::constants::{DEFAULT_AUR_URL, DEFAULT_CLONE_DIR};
use crate::git::{self, GitLogger};
use std::path::PathBuf;

/// Runtime configuration derived from CLI arguments and environment.
#[derive(Debug, Clone)]
pub struct Config {
    /// Controls the verbosity level of CLI output.
    pub verbosity: Verbosity,
    /// Base directory holding one clone per package.
    pub clone_dir: PathBuf,
    /// Base URL the clone source is derived from.
    pub aur_url: String,
    /// Replace a clone path that exists but is not a git repository.
    pub reclone: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            verbosity: Verbosity::default(),
            clone_dir: PathBuf::from(DEFAULT_CLONE_DIR),
            aur_url: DEFAULT_AUR_URL.to_string(),
            reclone: false,
        }
    }
}

impl Config {
    #[must_use]
    pub fn is_quiet(&self) -> bool {
        self.verbosity == Verbosity::Quiet
    }

    #[must_use]
    pub fn is_verbose(&self) -> bool {
        self.verbosity == Verbosity::Verbose
    }

    /// Clone source for a package: `<aur_url>/<package>.git`.
    #[must_use]
    pub fn repo_url(&self, package: &str) -> String {
        format!("{}/{}.git", self.aur_url.trim_end_matches('/'), package)
    }

    /// Returns the appropriate git logger based on verbosity settings.
    ///
    /// Config only picks the callback; the logging itself lives in the git module.
    #[must_use]
    pub fn git_logger(&self) -> GitLogger {
        if self.is_verbose() {
            git::verbose_logger
        } else {
            git::no_op_logger
        }
    }
}

/// Verbosity level for CLI output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    Quiet,
    #[default]
    Normal,
    Verbose,
}

impl Verbosity {
    /// Resolves the `--quiet`/`--verbose` flag pair. Quiet wins if both are set.
    #[must_use]
    pub fn from_flags(quiet: bool, verbose: bool) -> Self {
        match (quiet, verbose) {
            (true, _) => Verbosity::Quiet,
            (false, true) => Verbosity::Verbose,
            (false, false) => Verbosity::Normal,
        }
    }
}
