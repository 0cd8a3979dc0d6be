//! Spinner, colored output, and summary formatting.
//!
//! This module provides visual feedback while a package syncs: a spinner in
//! normal mode, a step-by-step trace in verbose mode, and nothing but errors
//! in quiet mode.

use crate::config::Config;
use crate::constants::PROGRESS_TICK_MS;
use crate::copy::FileAction;
use crate::sync::{SyncCallbacks, SyncOutcome, SyncResult, SyncStep, SyncSuccess};
use colored::Colorize;
use dialoguer::Confirm;
use indicatif::{ProgressBar, ProgressStyle};
use std::error::Error;
use std::io::IsTerminal;
use std::path::Path;
use std::time::Duration;

/// No-op callbacks for when progress tracking is not needed.
/// Never confirms a reclone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoOpCallbacks;

impl SyncCallbacks for NoOpCallbacks {
    fn on_step(&self, _step: &SyncStep) {}
    fn on_complete(&self, _result: &SyncResult) {}
}

/// Prints a package header in verbose mode.
pub fn print_sync_header(config: &Config, package: &str) {
    if !config.is_verbose() {
        return;
    }
    eprintln!("\n{}", format!("[{}]", package).white().bold());
}

/// Prints a step progress message in verbose mode.
pub fn print_step(config: &Config, step: &SyncStep) {
    if !config.is_verbose() {
        return;
    }
    eprintln!("  {}", format_step_message(step).dimmed());
}

fn print_git_output(config: &Config, output: &str) {
    if !config.is_verbose() || output.is_empty() {
        return;
    }
    for line in output.lines() {
        eprintln!("    {}", line.dimmed());
    }
}

fn print_file(config: &Config, relative: &Path, action: FileAction) {
    if !config.is_verbose() {
        return;
    }
    match action {
        FileAction::Copied => eprintln!("    {} {}", "copied ".green(), relative.display()),
        FileAction::Skipped => eprintln!(
            "    {} {} {}",
            "skipped".yellow(),
            relative.display(),
            "(destination is newer)".dimmed()
        ),
    }
}

/// Spinner shown while a package syncs.
/// Uses `Option` to avoid allocation when progress is hidden (quiet/verbose modes).
pub struct SyncProgress {
    spinner: Option<ProgressBar>,
}

impl SyncProgress {
    pub fn update(&self, step: &SyncStep) {
        if let Some(spinner) = &self.spinner {
            spinner.set_message(format_step_message(step));
        }
    }

    pub fn finish_success(&self, package: &str) {
        if let Some(spinner) = &self.spinner {
            spinner.finish_with_message(format!("{} {} synced", "✓".green(), package));
        }
    }

    pub fn finish_failed(&self, package: &str, step: Option<SyncStep>) {
        if let Some(spinner) = &self.spinner {
            let at = step.map(|s| format!(" at {}", s)).unwrap_or_default();
            spinner.finish_with_message(format!("{} {} failed{}", "✗".red(), package, at));
        }
    }

    /// Runs `f` with the spinner hidden so prompts are not overdrawn.
    fn suspend<R>(&self, f: impl FnOnce() -> R) -> R {
        match &self.spinner {
            Some(spinner) => spinner.suspend(f),
            None => f(),
        }
    }
}

/// Creates the spinner for a sync.
/// Returns an empty tracker in quiet or verbose mode.
#[must_use]
pub fn create_sync_progress(config: &Config) -> SyncProgress {
    let spinner = if config.is_quiet() || config.is_verbose() {
        None
    } else {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
                .template("{spinner:.cyan} {msg}")
                .unwrap(),
        );
        spinner.enable_steady_tick(Duration::from_millis(PROGRESS_TICK_MS));
        Some(spinner)
    };

    SyncProgress { spinner }
}

/// Terminal callbacks: spinner updates, verbose trace, and the reclone prompt.
pub struct TerminalCallbacks {
    progress: SyncProgress,
    config: Config,
}

impl TerminalCallbacks {
    pub fn new(progress: SyncProgress, config: Config) -> Self {
        Self { progress, config }
    }

    fn can_prompt(&self) -> bool {
        !self.config.is_quiet() && std::io::stdin().is_terminal()
    }
}

impl SyncCallbacks for TerminalCallbacks {
    fn on_sync_start(&self, package: &str) {
        print_sync_header(&self.config, package);
    }

    fn on_step(&self, step: &SyncStep) {
        self.progress.update(step);
        print_step(&self.config, step);
    }

    fn on_git_output(&self, output: &str) {
        print_git_output(&self.config, output);
    }

    fn on_file(&self, relative: &Path, action: FileAction) {
        print_file(&self.config, relative, action);
    }

    fn confirm_reclone(&self, path: &Path) -> bool {
        if !self.can_prompt() {
            return false;
        }
        let prompt = format!(
            "{} exists but is not a git repository. Remove it and clone again?",
            path.display()
        );
        self.progress.suspend(|| {
            Confirm::new()
                .with_prompt(prompt)
                .default(false)
                .interact()
                .unwrap_or(false)
        })
    }

    fn on_complete(&self, result: &SyncResult) {
        match &result.outcome {
            SyncOutcome::Success(_) => self.progress.finish_success(&result.package),
            SyncOutcome::Failed(err) => self.progress.finish_failed(&result.package, err.step()),
        }
    }
}

/// Prints the outcome of a sync: a one-line summary on success (unless quiet),
/// and the error with its causes on stderr on failure.
pub fn print_summary(result: &SyncResult, config: &Config) {
    match &result.outcome {
        SyncOutcome::Success(success) => {
            if !config.is_quiet() {
                println!("{}", format_success(result, success));
            }
        }
        SyncOutcome::Failed(err) => print_error(err),
    }
}

fn format_success(result: &SyncResult, success: &SyncSuccess) -> String {
    let origin = if success.recloned {
        " (fresh clone, replaced stale directory)".yellow()
    } else if success.cloned {
        " (fresh clone)".cyan()
    } else {
        "".normal()
    };
    format!(
        "{} {} -> {}{}: {} copied, {} skipped in {}",
        "OK".green().bold(),
        result.package.white().bold(),
        result.clone_path.display(),
        origin,
        success.copy.copied,
        success.copy.skipped,
        format_duration(result.duration).dimmed(),
    )
}

/// Prints an error and its source chain on one line.
pub fn print_error(err: &dyn Error) {
    eprintln!("{} {}", "error:".red().bold(), format_error_chain(err));
}

fn format_error_chain(err: &dyn Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

fn format_duration(duration: Duration) -> String {
    format!("{:.2}s", duration.as_secs_f32())
}

fn format_step_message(step: &SyncStep) -> &'static str {
    match step {
        SyncStep::Started => "Starting sync...",
        SyncStep::RemovingStale => "Removing stale clone directory...",
        SyncStep::Cloning => "Cloning from AUR...",
        SyncStep::Pulling => "Pulling origin master...",
        SyncStep::Copying => "Copying newer files...",
        SyncStep::Completed => "Completed",
    }
}
