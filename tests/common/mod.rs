//! Test infrastructure for aur-sync integration tests.
#![allow(dead_code)]

use anyhow::Result;
use aur_sync::config::{Config, Verbosity};
use aur_sync::git::{no_op_logger, run_git};
use aur_sync::sync::{SyncCallbacks, SyncRequest, SyncResult, SyncStep};
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub fn git(dir: &Path, args: &[&str]) -> Result<String> {
    Ok(run_git(dir, args, no_op_logger)?)
}

/// Sets up a fresh repository on `master` with a local identity.
pub fn init_repo(path: &Path, bare: bool) -> Result<()> {
    std::fs::create_dir_all(path)?;
    if bare {
        git(path, &["init", "--bare"])?;
    } else {
        git(path, &["init"])?;
        git(path, &["config", "user.email", "test@example.com"])?;
        git(path, &["config", "user.name", "Test User"])?;
        git(path, &["config", "commit.gpgsign", "false"])?;
    }
    git(path, &["symbolic-ref", "HEAD", "refs/heads/master"])?;
    Ok(())
}

/// A local stand-in for the AUR: bare repositories under one directory,
/// plus a clone base directory and a destination directory.
/// Everything is cleaned up when dropped.
pub struct TestAur {
    aur: TempDir,
    work: TempDir,
    clones: TempDir,
    dest: TempDir,
}

impl TestAur {
    pub fn new() -> Result<Self> {
        Ok(Self {
            aur: TempDir::new()?,
            work: TempDir::new()?,
            clones: TempDir::new()?,
            dest: TempDir::new()?,
        })
    }

    /// Creates `<aur>/<package>.git` with one commit containing `files`.
    pub fn publish(&self, package: &str, files: &[(&str, &str)]) -> Result<()> {
        let bare = self.aur.path().join(format!("{package}.git"));
        init_repo(&bare, true)?;

        let work = self.work.path().join(package);
        init_repo(&work, false)?;
        git(&work, &["remote", "add", "origin", &*bare.to_string_lossy()])?;
        self.commit(package, files, "Initial commit")
    }

    /// Commits `files` upstream and pushes them to the bare repository.
    pub fn commit(&self, package: &str, files: &[(&str, &str)], message: &str) -> Result<()> {
        let work = self.work.path().join(package);
        for (name, content) in files {
            let path = work.join(name);
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, content)?;
        }
        git(&work, &["add", "--all"])?;
        git(&work, &["commit", "-m", message])?;
        git(&work, &["push", "origin", "master"])?;
        Ok(())
    }

    pub fn config(&self) -> Config {
        Config {
            verbosity: Verbosity::Quiet,
            clone_dir: self.clones.path().to_path_buf(),
            aur_url: self.aur.path().to_string_lossy().into_owned(),
            reclone: false,
        }
    }

    pub fn request(&self, package: &str) -> SyncRequest {
        SyncRequest {
            package: package.to_string(),
            destination: self.dest.path().to_path_buf(),
        }
    }

    pub fn aur_path(&self) -> &Path {
        self.aur.path()
    }

    pub fn clones_path(&self) -> &Path {
        self.clones.path()
    }

    pub fn clone_path(&self, package: &str) -> PathBuf {
        self.clones.path().join(package)
    }

    pub fn dest_path(&self) -> &Path {
        self.dest.path()
    }

    pub fn dest_file(&self, name: &str) -> PathBuf {
        self.dest.path().join(name)
    }
}

/// Records every step so tests can assert on ordering.
#[derive(Default)]
pub struct RecordingCallbacks {
    pub steps: RefCell<Vec<SyncStep>>,
    pub reclone_answer: bool,
    pub reclone_asked: RefCell<bool>,
}

impl RecordingCallbacks {
    pub fn answering_reclone(answer: bool) -> Self {
        Self {
            reclone_answer: answer,
            ..Self::default()
        }
    }

    pub fn steps(&self) -> Vec<SyncStep> {
        self.steps.borrow().clone()
    }

    pub fn saw(&self, step: SyncStep) -> bool {
        self.steps.borrow().contains(&step)
    }
}

impl SyncCallbacks for RecordingCallbacks {
    fn on_step(&self, step: &SyncStep) {
        self.steps.borrow_mut().push(*step);
    }

    fn confirm_reclone(&self, _path: &Path) -> bool {
        *self.reclone_asked.borrow_mut() = true;
        self.reclone_answer
    }

    fn on_complete(&self, _result: &SyncResult) {}
}
