//! Integration tests for the `ampcore` binary's argument surface.
//!
//! Anything that actually opens an audio device is out of scope here: CI
//! environments have none. These tests only exercise paths that exit before
//! `AudioStream::new` is ever called.

use std::process::Command;

fn ampcore_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_ampcore"))
}

#[test]
fn help_lists_the_documented_flags() {
    let output = ampcore_bin().arg("--help").output().expect("failed to run ampcore --help");
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    for flag in ["--model", "--cabinet", "--preset", "--sample-rate", "--buffer-size", "--input", "--output"] {
        assert!(stdout.contains(flag), "help text should mention {flag}");
    }
}

#[test]
fn missing_model_file_fails_before_touching_audio_devices() {
    let output = ampcore_bin()
        .args(["--model", "/nonexistent/path/to/model.json"])
        .output()
        .expect("failed to run ampcore");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.to_lowercase().contains("model"), "stderr: {stderr}");
}

#[test]
fn unrecognized_flag_is_rejected_by_clap() {
    let output = ampcore_bin().arg("--not-a-real-flag").output().expect("failed to run ampcore");
    assert!(!output.status.success());
}
