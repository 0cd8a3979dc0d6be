mod common;

use common::TestAur;
use std::path::Path;
use std::process::{Command, Output};

fn aur_sync(clone_dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_aur-sync"))
        .args(args)
        .env("AUR_SYNC_CLONE_DIR", clone_dir)
        .env_remove("AUR_SYNC_URL")
        .output()
        .expect("failed to run aur-sync")
}

fn is_empty_dir(path: &Path) -> bool {
    std::fs::read_dir(path)
        .map(|mut entries| entries.next().is_none())
        .unwrap_or(false)
}

#[test]
fn test_no_arguments_exits_one() -> anyhow::Result<()> {
    let aur = TestAur::new()?;

    let output = aur_sync(aur.clones_path(), &[]);

    assert_eq!(output.status.code(), Some(1));
    assert!(is_empty_dir(aur.clones_path()));
    Ok(())
}

#[test]
fn test_single_argument_exits_one_without_touching_disk() -> anyhow::Result<()> {
    let aur = TestAur::new()?;

    let output = aur_sync(aur.clones_path(), &["foo"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(is_empty_dir(aur.clones_path()));
    Ok(())
}

#[test]
fn test_help_exits_zero() -> anyhow::Result<()> {
    let aur = TestAur::new()?;

    let output = aur_sync(aur.clones_path(), &["--help"]);

    assert_eq!(output.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&output.stdout).contains("--clone-dir"));
    Ok(())
}

#[test]
fn test_invalid_package_name_exits_one() -> anyhow::Result<()> {
    let aur = TestAur::new()?;
    let dest = aur.dest_path().to_string_lossy().into_owned();

    let output = aur_sync(aur.clones_path(), &["-q", "../etc", &dest]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("invalid package name"));
    assert!(is_empty_dir(aur.clones_path()));
    Ok(())
}

#[test]
fn test_clone_failure_exit_code_is_forwarded() -> anyhow::Result<()> {
    let aur = TestAur::new()?;
    let aur_url = aur.aur_path().to_string_lossy().into_owned();
    let dest = aur.dest_path().to_string_lossy().into_owned();

    let output = aur_sync(
        aur.clones_path(),
        &["-q", "--aur-url", &aur_url, "missing", &dest],
    );

    assert_eq!(output.status.code(), Some(128));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("clone failed"), "stderr: {stderr}");
    assert!(!aur.clone_path("missing").exists());
    Ok(())
}

#[test]
fn test_successful_sync_exits_zero_and_copies() -> anyhow::Result<()> {
    let aur = TestAur::new()?;
    aur.publish("foo", &[("PKGBUILD", "pkgname=foo\n")])?;
    let aur_url = aur.aur_path().to_string_lossy().into_owned();
    let dest = aur.dest_path().to_string_lossy().into_owned();

    let output = aur_sync(
        aur.clones_path(),
        &["--quiet", "--aur-url", &aur_url, "foo", &dest],
    );

    assert_eq!(output.status.code(), Some(0), "{output:?}");
    assert!(output.stdout.is_empty());
    assert_eq!(
        std::fs::read_to_string(aur.dest_file("PKGBUILD"))?,
        "pkgname=foo\n"
    );
    Ok(())
}

#[test]
fn test_stale_clone_directory_fails_when_not_interactive() -> anyhow::Result<()> {
    let aur = TestAur::new()?;
    aur.publish("foo", &[("PKGBUILD", "x\n")])?;
    std::fs::create_dir(aur.clone_path("foo"))?;
    let aur_url = aur.aur_path().to_string_lossy().into_owned();
    let dest = aur.dest_path().to_string_lossy().into_owned();

    let output = aur_sync(aur.clones_path(), &["--aur-url", &aur_url, "foo", &dest]);
    assert_eq!(output.status.code(), Some(1));

    let output = aur_sync(
        aur.clones_path(),
        &["-q", "--reclone", "--aur-url", &aur_url, "foo", &dest],
    );
    assert_eq!(output.status.code(), Some(0), "{output:?}");
    assert!(aur.dest_file("PKGBUILD").exists());
    Ok(())
}

#[test]
fn test_relative_clone_dir_resolves_against_working_directory() -> anyhow::Result<()> {
    let aur = TestAur::new()?;
    aur.publish("foo", &[("PKGBUILD", "pkgname=foo\n")])?;
    let cwd = tempfile::TempDir::new()?;
    let aur_url = aur.aur_path().to_string_lossy().into_owned();
    let dest = aur.dest_path().to_string_lossy().into_owned();
    let run = || {
        Command::new(env!("CARGO_BIN_EXE_aur-sync"))
            .current_dir(cwd.path())
            .args([
                "-q",
                "--clone-dir",
                "repos",
                "--aur-url",
                aur_url.as_str(),
                "foo",
                dest.as_str(),
            ])
            .env_remove("AUR_SYNC_CLONE_DIR")
            .env_remove("AUR_SYNC_URL")
            .output()
            .expect("failed to run aur-sync")
    };

    let first = run();
    assert_eq!(first.status.code(), Some(0), "{first:?}");
    assert!(cwd.path().join("repos/foo/.git").is_dir());
    assert!(!cwd.path().join("repos/repos").exists());

    let second = run();
    assert_eq!(second.status.code(), Some(0), "{second:?}");
    assert!(!cwd.path().join("repos/repos").exists());
    assert_eq!(
        std::fs::read_to_string(aur.dest_file("PKGBUILD"))?,
        "pkgname=foo\n"
    );
    Ok(())
}
