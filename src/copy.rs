//! Recursive copy that only replaces destination files older than their source.
//!
//! Top-level entries whose name starts with `.` are left behind, so the
//! clone's `.git` directory never reaches the destination. Dotfiles below
//! the top level are copied like anything else.

use anyhow::Context;
use std::cmp::Ordering;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use walkdir::WalkDir;

/// What happened to a single non-directory entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileAction {
    Copied,
    /// The destination was at least as new as the source.
    Skipped,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CopyStats {
    pub copied: usize,
    pub skipped: usize,
    pub dirs_created: usize,
}

impl CopyStats {
    fn record(&mut self, action: FileAction) {
        match action {
            FileAction::Copied => self.copied += 1,
            FileAction::Skipped => self.skipped += 1,
        }
    }
}

fn is_hidden(name: &std::ffi::OsStr) -> bool {
    name.to_string_lossy().starts_with('.')
}

/// Copies the contents of `src` into the existing directory `dest`.
///
/// `on_file` receives the path relative to `src` for every file or symlink.
pub fn copy_if_newer<F>(src: &Path, dest: &Path, mut on_file: F) -> anyhow::Result<CopyStats>
where
    F: FnMut(&Path, FileAction),
{
    let mut top_level: Vec<_> = fs::read_dir(src)
        .with_context(|| format!("Failed to read {}", src.display()))?
        .collect::<Result<_, _>>()
        .with_context(|| format!("Failed to list {}", src.display()))?;
    top_level.sort_by_key(|e| e.file_name());

    let mut stats = CopyStats::default();
    for entry in top_level.iter().filter(|e| !is_hidden(&e.file_name())) {
        for item in WalkDir::new(entry.path())
            .follow_links(false)
            .follow_root_links(false)
            .sort_by_file_name()
        {
            let item = item.with_context(|| format!("Failed to walk {}", entry.path().display()))?;
            let relative = item
                .path()
                .strip_prefix(src)
                .context("Walked outside of the source directory")?;
            let target = dest.join(relative);
            let file_type = item.file_type();

            if file_type.is_dir() {
                if !target.is_dir() {
                    fs::create_dir_all(&target)
                        .with_context(|| format!("Failed to create {}", target.display()))?;
                    stats.dirs_created += 1;
                }
                continue;
            }

            let action = if dest_is_older(item.path(), &target)? {
                if file_type.is_symlink() {
                    copy_symlink(item.path(), &target)?;
                } else {
                    fs::copy(item.path(), &target).with_context(|| {
                        format!(
                            "Failed to copy {} to {}",
                            item.path().display(),
                            target.display()
                        )
                    })?;
                }
                FileAction::Copied
            } else {
                FileAction::Skipped
            };

            stats.record(action);
            on_file(relative, action);
        }
    }

    Ok(stats)
}

/// True when `target` is missing or was modified strictly before `source`.
/// Symlinks are compared by their own timestamps, not their targets'.
fn dest_is_older(source: &Path, target: &Path) -> anyhow::Result<bool> {
    let target_meta = match fs::symlink_metadata(target) {
        Ok(meta) => meta,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(true),
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to stat {}", target.display()));
        }
    };
    let source_time = fs::symlink_metadata(source)
        .and_then(|m| m.modified())
        .with_context(|| format!("Failed to read mtime of {}", source.display()))?;
    let target_time = target_meta
        .modified()
        .with_context(|| format!("Failed to read mtime of {}", target.display()))?;

    Ok(target_time.cmp(&source_time) == Ordering::Less)
}

#[cfg(unix)]
fn copy_symlink(source: &Path, target: &Path) -> anyhow::Result<()> {
    let link = fs::read_link(source)
        .with_context(|| format!("Failed to read link {}", source.display()))?;
    if fs::symlink_metadata(target).is_ok() {
        fs::remove_file(target)
            .with_context(|| format!("Failed to replace {}", target.display()))?;
    }
    std::os::unix::fs::symlink(&link, target)
        .with_context(|| format!("Failed to create link {}", target.display()))
}

#[cfg(not(unix))]
fn copy_symlink(source: &Path, target: &Path) -> anyhow::Result<()> {
    fs::copy(source, target)
        .map(|_| ())
        .with_context(|| format!("Failed to copy {} to {}", source.display(), target.display()))
}
