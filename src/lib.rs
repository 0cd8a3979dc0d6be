//! AUR package sync library.
//!
//! This crate keeps a local clone of an AUR package's git repository and
//! copies its files into a destination directory:
//! - Cloning the repository when no local copy exists
//! - Pulling `origin master`
//! - Copying files, keeping destination files that are newer than the source

pub mod config;
pub mod constants;
pub mod copy;
pub mod git;
pub mod output;
pub mod sync;
