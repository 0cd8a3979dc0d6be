//! Git command wrappers.
//!
//! This module provides a thin wrapper around git CLI commands,
//! handling command execution and error formatting.

use crate::constants::{
    FAILURE_EXIT_CODE, GIT_DIR, MASTER_BRANCH, REMOTE, SPAWN_FAILURE_EXIT_CODE,
};
use colored::Colorize;
use std::path::Path;
use std::process::Command;

/// Callback invoked with the working directory and arguments of every git command.
pub type GitLogger = fn(&Path, &[&str]);

pub fn verbose_logger(dir: &Path, args: &[&str]) {
    eprintln!(
        "  {}",
        format!("$ git {}  (in {})", args.join(" "), dir.display()).dimmed()
    );
}

pub fn no_op_logger(_dir: &Path, _args: &[&str]) {}

#[derive(Debug, thiserror::Error)]
pub enum GitError {
    #[error("Failed to spawn git command")]
    Spawn(#[source] std::io::Error),

    #[error(
        "git {args} exited with {}: {}",
        describe_exit(.code),
        combined_output(.stderr, .stdout)
    )]
    Failed {
        args: String,
        code: Option<i32>,
        stdout: String,
        stderr: String,
    },
}

fn describe_exit(code: &Option<i32>) -> String {
    code.map_or_else(|| "a signal".to_string(), |c| format!("code {c}"))
}

/// Stderr followed by stdout, trimmed. Merge conflicts are reported on stdout.
fn combined_output(stderr: &str, stdout: &str) -> String {
    [stderr.trim(), stdout.trim()]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

impl GitError {
    /// Exit code to forward to our own caller.
    ///
    /// A failed git keeps its own code. A git killed by a signal, or one whose
    /// code does not fit a process exit status, maps to the generic failure code.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        match self {
            GitError::Spawn(_) => SPAWN_FAILURE_EXIT_CODE,
            GitError::Failed { code, .. } => code
                .and_then(|c| u8::try_from(c).ok())
                .filter(|c| *c != 0)
                .unwrap_or(FAILURE_EXIT_CODE),
        }
    }
}

/// Runs git in `dir` and returns its trimmed stdout.
///
/// Terminal prompts are disabled so a missing or private repository fails
/// instead of waiting for credentials.
pub fn run_git(dir: &Path, args: &[&str], logger: GitLogger) -> Result<String, GitError> {
    logger(dir, args);

    let output = Command::new("git")
        .current_dir(dir)
        .args(args)
        .env("GIT_TERMINAL_PROMPT", "0")
        .output()
        .map_err(GitError::Spawn)?;

    if output.status.success() {
        let result = String::from_utf8_lossy(&output.stdout);
        Ok(result.as_ref().trim().to_string())
    } else {
        Err(GitError::Failed {
            args: args.join(" "),
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// True when `path` holds a `.git` directory, or a `.git` file pointing at
/// one elsewhere (worktrees, `--separate-git-dir` checkouts).
pub fn is_git_repo(path: &Path) -> bool {
    let git_path = path.join(GIT_DIR);
    git_path.is_dir() || git_path.is_file()
}

/// Clones `url` into `parent/<name>`.
///
/// The target is passed relative to `parent`, which is also git's working
/// directory, so a relative `parent` is not applied twice.
pub fn clone(parent: &Path, url: &str, name: &str, logger: GitLogger) -> Result<String, GitError> {
    run_git(parent, &["clone", "--", url, name], logger)
}

/// Pulls `origin master` into the working copy at `repo`.
pub fn pull(repo: &Path, logger: GitLogger) -> Result<String, GitError> {
    run_git(repo, &["pull", REMOTE, MASTER_BRANCH], logger)
}
