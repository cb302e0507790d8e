#![cfg(feature = "cli")]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

const RECORDING: &str = "\
00:00:01 0001 92 01 02 03 3E
00:00:02 0002 93 FB 01 02 03 C4
00:00:03 0003 93 F1 01 02 03 DF

00:00:04 0004 55 AA 01 02 03 06
00:00:05 0005 55 aa 01 02 03 06
00:00:06 0006 92 01 02 03 3F
00:00:07 0007 92 01
00:00:08 0008 12 34 56 78 9A
00:00:09 0009 92 01 02 03 3F
";

fn unique_temp_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "gwtscli-{tag}-{}-{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("time should be after epoch")
            .as_nanos()
    ));
    std::fs::create_dir_all(&dir).expect("temp dir should be creatable");
    dir
}

fn gwts() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_gwts"));
    cmd.env_remove("GWTS_TIMESTAMP_TOKENS")
        .env_remove("GWTS_MARKERS")
        .env_remove("GWTS_CONFIG")
        .arg("--log-level")
        .arg("error");
    cmd
}

fn run_filter(input: &Path, extra: &[&str]) -> Output {
    gwts()
        .arg("--format")
        .arg("json")
        .arg("filter")
        .arg(input)
        .args(extra)
        .output()
        .expect("filter should run")
}

fn json(output: &Output) -> serde_json::Value {
    let stdout = String::from_utf8_lossy(&output.stdout);
    serde_json::from_str(&stdout).expect("filter should emit json")
}

fn read(dir: &Path, name: &str) -> String {
    std::fs::read_to_string(dir.join(name)).expect("category file should exist")
}

#[test]
fn filter_writes_every_category() {
    let dir = unique_temp_dir("filter");
    let input = dir.join("session.txt");
    std::fs::write(&input, RECORDING).expect("recording should be writable");

    let output = run_filter(&input, &[]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let summary = json(&output);
    assert_eq!(summary["lines"], 10);
    assert_eq!(summary["valid"], 5);
    assert_eq!(summary["nine_x"], 3);
    assert_eq!(summary["five_five"], 2);
    assert_eq!(summary["errors"], 5);
    assert_eq!(summary["malformed"], 3);
    assert_eq!(summary["checksum_mismatches"], 2);
    assert_eq!(summary["nine_x_unique"], 1);
    assert_eq!(summary["five_five_unique"], 1);
    assert_eq!(summary["files"].as_array().map(Vec::len), Some(6));
    assert_eq!(summary["top_errors"][0]["payload"], "92 01 02 03 3F");
    assert_eq!(summary["top_errors"][0]["count"], 2);

    assert_eq!(read(&dir, "session_9X_No_Repeats.txt"), "92 01 02 03 3E\n");
    assert_eq!(read(&dir, "session_55_No_Repeats.txt"), "55 AA 01 02 03 06\n");
    assert_eq!(
        read(&dir, "session_55.txt"),
        "00:00:04 0004 55 AA 01 02 03 06\n00:00:05 0005 55 AA 01 02 03 06\n"
    );
    assert_eq!(
        read(&dir, "session_9X.txt"),
        "00:00:01 0001 92 01 02 03 3E\n\
         00:00:02 0002 93 FB 01 02 03 C4\n\
         00:00:03 0003 93 F1 01 02 03 DF\n"
    );
    assert_eq!(read(&dir, "session_9X_And_55.txt").lines().count(), 5);
    assert_eq!(
        read(&dir, "session_Errors.txt"),
        "\n\
         00:00:06 0006 92 01 02 03 3F\n\
         00:00:07 0007 92 01\n\
         00:00:08 0008 12 34 56 78 9A\n\
         00:00:09 0009 92 01 02 03 3F\n"
    );

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn filter_honours_out_dir_and_timestamp_width() {
    let dir = unique_temp_dir("outdir");
    let input = dir.join("short.log");
    std::fs::write(&input, "0001 92 01 02 03 3E\n0002 55 AA 01 02 03 06\n")
        .expect("recording should be writable");
    let out_dir = dir.join("lists");

    let output = run_filter(&input, &["-t", "1", "-o", out_dir.to_str().expect("utf-8 path")]);
    assert!(output.status.success());

    let summary = json(&output);
    assert_eq!(summary["timestamp_tokens"], 1);
    assert_eq!(summary["valid"], 2);
    assert_eq!(summary["errors"], 0);
    assert_eq!(read(&out_dir, "short_Errors.txt"), "");
    assert_eq!(read(&out_dir, "short_9X.txt"), "0001 92 01 02 03 3E\n");

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn filter_reads_timestamp_width_from_env_and_config() {
    let dir = unique_temp_dir("layers");
    let input = dir.join("bare.txt");
    std::fs::write(&input, "92 01 02 03 3E\n").expect("recording should be writable");
    let config = dir.join("gwts.toml");
    std::fs::write(&config, "timestamp_tokens = 0\n").expect("config should be writable");

    let output = gwts()
        .arg("--format")
        .arg("json")
        .arg("--config")
        .arg(&config)
        .arg("filter")
        .arg(&input)
        .output()
        .expect("filter should run");
    assert!(output.status.success());
    assert_eq!(json(&output)["valid"], 1);

    let output = gwts()
        .env("GWTS_TIMESTAMP_TOKENS", "2")
        .arg("--format")
        .arg("json")
        .arg("--config")
        .arg(&config)
        .arg("filter")
        .arg(&input)
        .output()
        .expect("filter should run");
    assert!(output.status.success());
    let summary = json(&output);
    assert_eq!(summary["timestamp_tokens"], 2);
    assert_eq!(summary["valid"], 0);
    assert_eq!(summary["malformed"], 1);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn filter_wide_markers_fold_ff_countdown() {
    let dir = unique_temp_dir("wide");
    let input = dir.join("wide.txt");
    std::fs::write(&input, "1 2 93 FF 01 02 03 CA\n1 3 92 01 02 03 3E\n")
        .expect("recording should be writable");

    let output = run_filter(&input, &[]);
    assert!(output.status.success());
    assert_eq!(json(&output)["nine_x_unique"], 2);

    let output = run_filter(&input, &["--markers", "wide"]);
    assert!(output.status.success());
    assert_eq!(json(&output)["nine_x_unique"], 1);
    assert_eq!(read(&dir, "wide_9X_No_Repeats.txt"), "92 01 02 03 3E\n");

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn filter_missing_input_returns_not_found() {
    let dir = unique_temp_dir("missing");
    let output = run_filter(&dir.join("absent.txt"), &[]);
    assert_eq!(output.status.code(), Some(44));
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn filter_rejects_invalid_config() {
    let dir = unique_temp_dir("badconfig");
    let input = dir.join("rec.txt");
    std::fs::write(&input, "").expect("recording should be writable");
    let config = dir.join("gwts.toml");
    std::fs::write(&config, "[markers]\nstandard = [\"XYZ\"]\n").expect("config should be writable");

    let output = gwts()
        .arg("--config")
        .arg(&config)
        .arg("filter")
        .arg(&input)
        .output()
        .expect("filter should run");
    assert_eq!(output.status.code(), Some(78));

    let _ = std::fs::remove_dir_all(&dir);
}
