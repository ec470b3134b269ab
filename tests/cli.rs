use assert_cmd::prelude::*;
use predicates::str::contains;
use std::io::Write;
use std::process::Command;
use tempfile::NamedTempFile;

fn write_config(xml: &str) -> NamedTempFile {
    let mut tmp = NamedTempFile::new().expect("temp config");
    tmp.write_all(xml.as_bytes()).expect("write config");
    tmp
}

#[test]
fn summary_lists_the_three_shells() {
    let mut cmd = Command::cargo_bin("globe-viewer").expect("binary exists");
    cmd.arg("--summary-only");
    cmd.assert()
        .success()
        .stdout(contains("Globe scene with 3 shells:"))
        .stdout(contains(" - background (radius 90.000, 64 segments, textured backdrop)"))
        .stdout(contains(" - sphere (radius 0.500, 32 segments, flat color (0.41, 0.17, 0.91)"))
        .stdout(contains(" - land (radius 0.506, 32 segments, textured overlay)"))
        .stdout(contains("Camera: fov 45.0 deg at (-0.20, 0.80, 1.00)"))
        .stdout(contains("resize debounce 1000 ms"));
}

#[test]
fn config_overrides_show_up_in_the_summary() {
    let config = write_config(
        r#"<globe>
  <radius>0.75</radius>
  <camera>
    <fov>60</fov>
  </camera>
  <motion>
    <debounce>250</debounce>
  </motion>
</globe>
"#,
    );
    let mut cmd = Command::cargo_bin("globe-viewer").expect("binary exists");
    cmd.arg(config.path()).arg("--summary-only");
    cmd.assert()
        .success()
        .stdout(contains(" - sphere (radius 0.750, 32 segments"))
        .stdout(contains(" - land (radius 0.756, 32 segments"))
        .stdout(contains("Camera: fov 60.0 deg"))
        .stdout(contains("resize debounce 250 ms"));
}

#[test]
fn a_malformed_config_fails_with_one_error() {
    let config = write_config("<globe><radius>wide</radius></globe>");
    let mut cmd = Command::cargo_bin("globe-viewer").expect("binary exists");
    cmd.arg(config.path()).arg("--summary-only");
    cmd.assert()
        .failure()
        .stderr(contains("failed to parse config"));
}

#[test]
fn unknown_flags_are_rejected() {
    let mut cmd = Command::cargo_bin("globe-viewer").expect("binary exists");
    cmd.arg("--frobnicate");
    cmd.assert()
        .failure()
        .stderr(contains("Unknown argument: --frobnicate"));
}
