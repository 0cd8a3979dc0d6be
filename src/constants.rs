//! Application-wide constants.
//!
//! Centralized configuration values to avoid magic strings throughout the codebase.

/// Base URL of the AUR git host. Clone sources are `<base>/<pkg>.git`.
pub const DEFAULT_AUR_URL: &str = "https://aur.archlinux.org";

/// Base directory that holds one clone per package.
pub const DEFAULT_CLONE_DIR: &str = "/tmp";

/// Environment variable overriding the clone base directory.
pub const CLONE_DIR_ENV: &str = "AUR_SYNC_CLONE_DIR";

/// Environment variable overriding the AUR base URL.
pub const AUR_URL_ENV: &str = "AUR_SYNC_URL";

/// Remote and branch pulled on every run.
pub const REMOTE: &str = "origin";
pub const MASTER_BRANCH: &str = "master";

/// Git directory name used to detect repositories.
pub const GIT_DIR: &str = ".git";

/// Progress spinner tick interval in milliseconds.
pub const PROGRESS_TICK_MS: u64 = 80;

/// Exit code for usage errors and failures that have no child exit code.
pub const FAILURE_EXIT_CODE: u8 = 1;

/// Exit code used when `git` itself cannot be started (shell convention).
pub const SPAWN_FAILURE_EXIT_CODE: u8 = 127;
