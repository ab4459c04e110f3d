//! Integration tests running the `bikelocator` binary
//!
//! Only commands that need no network access are exercised here.

use std::path::Path;
use std::process::{Command, Output};

fn run(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_bikelocator"))
        .args(args)
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .env_remove("BIKELOCATOR_CONFIG")
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn battery_estimates_midpoint() {
    let dir = tempfile::tempdir().unwrap();
    let output = run(dir.path(), &["battery", "38.15"]);

    assert!(output.status.success());
    assert!(stdout(&output).contains("50%"));
}

#[test]
fn battery_saturates_above_full_voltage() {
    let dir = tempfile::tempdir().unwrap();
    let output = run(dir.path(), &["battery", "44"]);

    assert!(output.status.success());
    assert!(stdout(&output).contains("100%"));
}

#[test]
fn config_prints_defaults_as_toml() {
    let dir = tempfile::tempdir().unwrap();
    let output = run(dir.path(), &["config"]);

    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("[locator]"));
    assert!(text.contains("max_stations = 10"));
    assert!(text.contains("[velospot.battery]"));
}

#[test]
fn config_reads_file_from_working_directory() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("bikelocator.toml"),
        "[locator]\nmax_stations = 4\n",
    )
    .unwrap();

    let output = run(dir.path(), &["config"]);

    assert!(output.status.success());
    assert!(stdout(&output).contains("max_stations = 4"));
}

#[test]
fn invalid_config_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("broken.toml"), "[locator]\nmax_stations = 0\n").unwrap();

    let output = run(dir.path(), &["--config", "broken.toml", "config"]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("configuration"));
}

#[test]
fn nearby_without_position_fails() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("bikelocator.toml"),
        "[publibike]\nbase_url = \"http://127.0.0.1:1\"\n\n[velospot]\nbase_url = \"http://127.0.0.1:1\"\n",
    )
    .unwrap();

    let output = run(dir.path(), &["nearby", "--json"]);

    assert!(!output.status.success());
}

#[test]
fn nearby_rejects_out_of_range_position() {
    let dir = tempfile::tempdir().unwrap();
    let output = run(dir.path(), &["nearby", "--lat", "91", "--lon", "8"]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("--lat/--lon"));
}
