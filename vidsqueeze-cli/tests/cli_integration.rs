use assert_cmd::Command;
use predicates::str::contains;
use std::error::Error;
use tempfile::tempdir;

// Helper function to get the path to the compiled binary
fn vidsqueeze_cmd() -> Command {
    let mut cmd = Command::cargo_bin("vidsqueeze").expect("Failed to find vidsqueeze binary");
    for var in [
        "VIDSQUEEZE_SOURCE",
        "VIDSQUEEZE_QUALITY",
        "VIDSQUEEZE_LOG_DIR",
        "VIDSQUEEZE_SKIP_STRONGER",
        "RUST_LOG",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

#[test]
fn test_help_lists_commands() {
    vidsqueeze_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("encode"))
        .stdout(contains("stronger"));
}

#[test]
fn test_encode_requires_source() {
    vidsqueeze_cmd().arg("encode").assert().failure();
}

#[test]
fn test_encode_non_existent_source() {
    vidsqueeze_cmd()
        .arg("encode")
        .arg("surely/this/does/not/exist")
        .assert()
        .failure()
        .code(1)
        .stderr(contains("Invalid configuration"));
}

#[test]
fn test_encode_rejects_out_of_range_quality() -> Result<(), Box<dyn Error>> {
    let library = tempdir()?;

    vidsqueeze_cmd()
        .arg("encode")
        .arg(library.path())
        .arg("--quality")
        .arg("64")
        .assert()
        .failure()
        .stderr(contains("64"));

    Ok(())
}

#[test]
fn test_quality_from_environment_is_validated() -> Result<(), Box<dyn Error>> {
    let library = tempdir()?;

    vidsqueeze_cmd()
        .env("VIDSQUEEZE_QUALITY", "99")
        .arg("encode")
        .arg(library.path())
        .assert()
        .failure();

    Ok(())
}

#[test]
fn test_source_from_environment() -> Result<(), Box<dyn Error>> {
    let parent = tempdir()?;
    let library = parent.path().join("library");
    std::fs::create_dir(&library)?;

    vidsqueeze_cmd()
        .env("VIDSQUEEZE_SOURCE", &library)
        .arg("encode")
        .assert()
        .success()
        .stderr(contains("No processable video files"));

    Ok(())
}

#[test]
fn test_encode_empty_library_succeeds() -> Result<(), Box<dyn Error>> {
    let parent = tempdir()?;
    let library = parent.path().join("library");
    std::fs::create_dir(&library)?;
    std::fs::write(library.join("notes.txt"), "not a video")?;

    vidsqueeze_cmd()
        .arg("encode")
        .arg(&library)
        .assert()
        .success()
        .stderr(contains("No processable video files"));

    // Nothing is filed when there is nothing to do
    assert!(!parent.path().join("library_final").exists());
    assert!(!parent.path().join("library_failed").exists());

    Ok(())
}

#[test]
fn test_stronger_with_empty_backlog_succeeds() -> Result<(), Box<dyn Error>> {
    let parent = tempdir()?;
    let library = parent.path().join("library");
    std::fs::create_dir(&library)?;

    vidsqueeze_cmd()
        .arg("stronger")
        .arg(&library)
        .assert()
        .success()
        .stderr(contains("Nothing waiting"));

    Ok(())
}

#[test]
fn test_log_dir_receives_run_log() -> Result<(), Box<dyn Error>> {
    let parent = tempdir()?;
    let library = parent.path().join("library");
    let logs = parent.path().join("logs");
    std::fs::create_dir(&library)?;

    vidsqueeze_cmd()
        .arg("encode")
        .arg(&library)
        .arg("--log-dir")
        .arg(&logs)
        .assert()
        .success();

    let log_files: Vec<_> = std::fs::read_dir(&logs)?
        .filter_map(Result::ok)
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(log_files.len(), 1);
    assert!(log_files[0].starts_with("vidsqueeze_encode_"));

    Ok(())
}
