use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

fn cargo_bin() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_badges-pdf"));
    // no local credentials or log filters
    cmd.env_remove("BADGES_API_TOKEN")
        .env_remove("BADGES_API_ACCOUNT")
        .env_remove("BADGES_API_EVENT")
        .env_remove("RUST_LOG");
    cmd
}

fn fixture(name: &str) -> String {
    format!("tests/fixtures/{}", name)
}

fn build(out: &Path, extra: &[&str]) -> Output {
    let mut args = vec![
        "build".to_string(),
        "--tickets".to_string(),
        fixture("tickets.json"),
        "-o".to_string(),
        out.to_string_lossy().into_owned(),
    ];
    args.extend(extra.iter().map(|s| s.to_string()));
    cargo_bin().args(&args).output().expect("Failed to execute command")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_folded_a4_badges() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("badges.pdf");

    let output = build(&out, &["--speakers", &fixture("speakers.json"), "--guidelines"]);
    assert!(output.status.success(), "Command failed: {:?}", output);

    let metadata = fs::metadata(&out).expect("PDF file was not created");
    assert!(metadata.len() > 1000, "PDF file is too small, likely empty or corrupt");

    let text = stdout(&output);
    assert!(text.contains("✓ Generated:"));
    assert!(text.contains("Badges: 5"));
    assert!(text.contains("Sheets: 3"));
    // blank first name is reported, not fatal
    assert!(text.contains("CDEF-1"));
}

#[test]
fn test_flat_a5_badges() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("a5.pdf");

    let output = build(&out, &["--paper-size", "a5", "--no-title"]);
    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(out.exists(), "PDF file was not created");

    let text = stdout(&output);
    assert!(text.contains("Paper: A5"));
    assert!(text.contains("Sheets: 5"));
}

#[test]
fn test_created_on_filter() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("day.pdf");

    let output = build(&out, &["--created-on", "2024-09-03"]);
    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(stdout(&output).contains("Badges: 2"));
}

#[test]
fn test_unknown_paper_size_fails() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("letter.pdf");

    let output = build(&out, &["--paper-size", "Letter"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Letter"));
    assert!(!out.exists());
}

#[test]
fn test_conflicting_filters_fail() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("conflict.pdf");

    let output = build(
        &out,
        &["--updated-since", "2024-09-01", "--created-on", "2024-09-03"],
    );
    assert!(!output.status.success());
    assert!(!out.exists());
}

#[test]
fn test_empty_selection_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("none.pdf");

    let output = build(&out, &["--created-since", "2030-01-01"]);
    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(!out.exists(), "No PDF expected for an empty selection");
}

#[test]
fn test_missing_tickets_file_fails() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("missing.pdf");

    let output = cargo_bin()
        .args(["build", "--tickets", "tests/fixtures/nope.json", "-o"])
        .arg(&out)
        .output()
        .expect("Failed to execute command");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Error:"));
}

#[test]
fn test_build_without_credentials_fails() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("api.pdf");

    let output = cargo_bin()
        .args(["build", "-o"])
        .arg(&out)
        .output()
        .expect("Failed to execute command");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("missing API"));
}

#[test]
fn test_remap_dry_run() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("remapped.json");

    let output = cargo_bin()
        .args(["remap".to_string(), fixture("tickets.json"), fixture("mapping.json")])
        .arg(&out)
        .arg("--dry-run")
        .output()
        .expect("Failed to execute command");
    assert!(output.status.success(), "Command failed: {:?}", output);

    let text = stdout(&output);
    assert!(text.contains("BBGQ-1 -> KARA-TE"));
    assert!(text.contains("1 of 5"));
    assert!(!out.exists());
}

#[test]
fn test_remap_writes_tickets() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("remapped.json");

    let output = cargo_bin()
        .args(["remap".to_string(), fixture("tickets.json"), fixture("mapping.json")])
        .arg(&out)
        .output()
        .expect("Failed to execute command");
    assert!(output.status.success(), "Command failed: {:?}", output);

    let written: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    let refs: Vec<&str> = written
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["reference"].as_str().unwrap())
        .collect();
    assert_eq!(refs, vec!["KARA-TE", "AXQT-1", "KZLM-2", "CDEF-1", "MNOP-3"]);
}

#[test]
fn test_lanes() {
    let output = cargo_bin()
        .args(["lanes".to_string(), fixture("tickets.json"), "--lanes".to_string(), "2".to_string()])
        .output()
        .expect("Failed to execute command");
    assert!(output.status.success(), "Command failed: {:?}", output);
    assert_eq!(stdout(&output), "A..C (3)\nK..M (2)\n");
}

#[test]
fn test_title_flag_overrides_settings_file() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("badges.toml");
    fs::write(&config, "[badge]\ninclude_title = false\n").unwrap();
    let out = dir.path().join("titled.pdf");

    let output = build(
        &out,
        &["--config", &config.to_string_lossy(), "--title", "EuroPython"],
    );
    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(stdout(&output).contains("Title: EuroPython"));
}

#[test]
fn test_speakers_from_workbook() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("speakers.json");

    let output = cargo_bin()
        .args(["speakers".to_string(), fixture("sessionize.xlsx"), "-o".to_string()])
        .arg(&out)
        .output()
        .expect("Failed to execute command");
    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(stdout(&output).contains("Saved 2 speakers"));

    let written: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(written[0]["first_name"], "Ada");
    assert_eq!(written[0]["speaker_id"], "1002");
    assert_eq!(written[1]["email"], "grace@example.com");
}

#[test]
fn test_speakers_workbook_missing() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("speakers.json");

    let output = cargo_bin()
        .args(["speakers", "tests/fixtures/nope.xlsx", "-o"])
        .arg(&out)
        .output()
        .expect("Failed to execute command");
    assert!(!output.status.success());
    assert!(!out.exists());
}

#[test]
fn test_attendees_across_years() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("attendees.json");

    let output = cargo_bin()
        .args([
            "attendees".to_string(),
            format!("2023={}", fixture("tickets-2023.json")),
            format!("2024={}", fixture("tickets.json")),
            "-o".to_string(),
        ])
        .arg(&out)
        .output()
        .expect("Failed to execute command");
    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(stdout(&output).contains("Saved 6 attendees"));

    let written: Vec<serde_json::Value> =
        serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    let ada = written
        .iter()
        .find(|a| a["email"] == "ada@example.com")
        .expect("ada missing");
    assert_eq!(ada["name"], "ada lovelace");
    assert_eq!(ada["years"], serde_json::json!([2023, 2024]));
}

#[test]
fn test_attendees_bad_edition_argument() {
    let output = cargo_bin()
        .args(["attendees", "tickets.json"])
        .output()
        .expect("Failed to execute command");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("YEAR=PATH"));
}
