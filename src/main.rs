use aur_sync::config::{Config, Verbosity};
use aur_sync::constants::{
    AUR_URL_ENV, CLONE_DIR_ENV, DEFAULT_AUR_URL, DEFAULT_CLONE_DIR, FAILURE_EXIT_CODE,
};
use aur_sync::output;
use aur_sync::sync::{self, SyncRequest};
use clap::Parser;
use clap::error::ErrorKind;
use std::path::PathBuf;
use std::process::ExitCode;

/// Clone or update an AUR package repository and copy its files to a directory.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// AUR package name
    pkg_name: String,

    /// Directory to copy the package files into (must exist)
    copy_to: PathBuf,

    /// Base directory holding one clone per package
    #[arg(long, env = CLONE_DIR_ENV, default_value = DEFAULT_CLONE_DIR)]
    clone_dir: PathBuf,

    /// Base URL clones come from; the source is <URL>/<PKG_NAME>.git
    #[arg(long, env = AUR_URL_ENV, default_value = DEFAULT_AUR_URL)]
    aur_url: String,

    /// Replace the clone path if it exists but is not a git repository
    #[arg(long)]
    reclone: bool,

    /// Only print errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Print git commands, git output, and every copied file
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn into_parts(self) -> (SyncRequest, Config) {
        let config = Config {
            verbosity: Verbosity::from_flags(self.quiet, self.verbose),
            clone_dir: self.clone_dir,
            aur_url: self.aur_url,
            reclone: self.reclone,
        };
        let request = SyncRequest {
            package: self.pkg_name,
            destination: self.copy_to,
        };
        (request, config)
    }
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // clap would exit 2 on usage errors; missing arguments exit 1 here.
            let _ = err.print();
            return match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::from(FAILURE_EXIT_CODE),
            };
        }
    };

    let (request, config) = cli.into_parts();
    let callbacks =
        output::TerminalCallbacks::new(output::create_sync_progress(&config), config.clone());

    let result = sync::sync(&request, &callbacks, &config);
    output::print_summary(&result, &config);

    ExitCode::from(result.exit_code())
}
