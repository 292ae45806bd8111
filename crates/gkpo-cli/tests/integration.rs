//! Integration tests for CLI commands.

use serde_json::json;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use tempfile::TempDir;

const EMPTY_DOC_HASH: &str = "f92d0966d913f6262bb2f3dbab6219bfc7c29cae25c251453696689593937882";

fn write_doc(dir: &TempDir, name: &str, value: &serde_json::Value) -> String {
    let path: PathBuf = dir.path().join(name);
    std::fs::write(&path, serde_json::to_string_pretty(value).unwrap()).unwrap();
    path.to_string_lossy().into_owned()
}

fn run_cli(args: &[&str]) -> (bool, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_gkpo"))
        .args(args)
        .output()
        .expect("Failed to run CLI");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (output.status.success(), stdout, stderr)
}

fn run_cli_with_stdin(args: &[&str], stdin: &str) -> (bool, String, String) {
    let mut child = Command::new(env!("CARGO_BIN_EXE_gkpo"))
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to run CLI");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(stdin.as_bytes())
        .unwrap();
    let output = child.wait_with_output().unwrap();

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (output.status.success(), stdout, stderr)
}

fn shifted_doc() -> serde_json::Value {
    json!({
        "reference": {"form": "per_prompt"},
        "reducibility": {"witness": {"note": "prompt-local baseline"}}
    })
}

#[test]
fn test_canonicalize_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_doc(&temp_dir, "empty.json", &json!({}));

    let (success, stdout, _) = run_cli(&["canonicalize", &path]);
    assert!(success);
    assert!(stdout.contains(&format!("opal_hash: {}", EMPTY_DOC_HASH)));
    assert!(stdout.contains("inside_R: true reasons: []"));
    assert!(!stdout.contains("witness:"));
}

#[test]
fn test_canonicalize_stdin_prints_witness() {
    let (success, stdout, _) =
        run_cli_with_stdin(&["canonicalize"], &shifted_doc().to_string());
    assert!(success);
    assert!(stdout.contains("inside_R: false reasons: [reference_shift]"));
    assert!(stdout.contains("witness:"));
    assert!(stdout.contains("prompt-local baseline"));
}

#[test]
fn test_canonicalize_json_output() {
    let (success, stdout, _) = run_cli_with_stdin(&["canonicalize", "--json"], "{}");
    assert!(success);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed["opal_hash"], EMPTY_DOC_HASH);
    assert_eq!(parsed["reducibility"]["inside_R"], true);
    assert_eq!(parsed["document"]["provenance"]["opal_hash"], EMPTY_DOC_HASH);
    assert!(parsed["projection"]["reducibility"].get("witness").is_none());
}

#[test]
fn test_canonicalize_rejects_invalid_json() {
    let (success, _, stderr) = run_cli_with_stdin(&["canonicalize"], "{not json");
    assert!(!success);
    assert!(stderr.contains("Error"));
    assert!(stderr.contains("stdin"));
}

#[test]
fn test_check_lists_each_file() {
    let temp_dir = TempDir::new().unwrap();
    let a = write_doc(&temp_dir, "a.json", &json!({}));
    let b = write_doc(&temp_dir, "b.json", &shifted_doc());

    let (success, stdout, _) = run_cli(&["check", &a, &b]);
    assert!(success);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(
        lines[0],
        format!("{}: {} | inside_R=true reasons=[]", a, EMPTY_DOC_HASH)
    );
    assert!(lines[1].ends_with("inside_R=false reasons=[reference_shift]"));
}

#[test]
fn test_check_missing_file() {
    let (success, _, stderr) = run_cli(&["check", "/nonexistent/doc.json"]);
    assert!(!success);
    assert!(stderr.contains("failed to read file"));
}

#[test]
fn test_compare_equivalent_documents() {
    let temp_dir = TempDir::new().unwrap();
    let a = write_doc(&temp_dir, "a.json", &json!({"beta": 1.0, "notes": "first"}));
    let b = write_doc(&temp_dir, "b.json", &json!({"beta": 1.0000001, "notes": "second"}));

    let (success, stdout, _) = run_cli(&["compare", &a, &b]);
    assert!(success);
    assert!(stdout.contains("== GKPO Equivalence Report =="));
    assert!(stdout.contains("Equivalent (by hash)? YES"));
    assert!(!stdout.contains("-- Canonical diff"));
}

#[test]
fn test_compare_different_documents_exits_nonzero() {
    let temp_dir = TempDir::new().unwrap();
    let a = write_doc(&temp_dir, "a.json", &json!({}));
    let b = write_doc(&temp_dir, "b.json", &json!({"beta": 2.0}));

    let (success, stdout, _) = run_cli(&["compare", &a, &b]);
    assert!(!success);
    assert!(stdout.contains("Equivalent (by hash)? NO"));
    assert!(stdout.contains("-- Canonical diff (excluding ignored keys) --"));
    assert!(stdout.contains("beta:"));
    assert!(stdout.contains("  A=1.0"));
    assert!(stdout.contains("  B=2.0"));
}

#[test]
fn test_compare_show_diff_when_equivalent() {
    let temp_dir = TempDir::new().unwrap();
    let a = write_doc(&temp_dir, "a.json", &json!({}));
    let b = write_doc(&temp_dir, "b.json", &json!({"reducibility": {"witness": {"x": 1}}}));

    let (success, stdout, _) = run_cli(&["compare", &a, &b, "--show-diff"]);
    assert!(success);
    assert!(stdout.contains("(no differences)"));
}

#[test]
fn test_compare_json_output() {
    let temp_dir = TempDir::new().unwrap();
    let a = write_doc(&temp_dir, "a.json", &json!({}));
    let b = write_doc(&temp_dir, "b.json", &shifted_doc());

    let (success, stdout, _) = run_cli(&["compare", &a, &b, "--json"]);
    assert!(!success);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed["equivalent"], false);
    assert_eq!(parsed["right"]["reasons"], json!(["reference_shift"]));
    let paths: Vec<&str> = parsed["diffs"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["path"].as_str().unwrap())
        .collect();
    assert!(paths.contains(&"reference.form"));
    assert!(paths.iter().all(|p| !p.starts_with("provenance")));
}

#[test]
fn test_verify_match_and_missing() {
    let temp_dir = TempDir::new().unwrap();
    let stamped = write_doc(
        &temp_dir,
        "stamped.json",
        &json!({"provenance": {"opal_hash": EMPTY_DOC_HASH}}),
    );
    let bare = write_doc(&temp_dir, "bare.json", &json!({}));

    let (success, stdout, _) = run_cli(&["verify", &stamped, &bare]);
    assert!(success);
    assert!(stdout.contains("VERDICT"));
    assert!(stdout.contains("Match"));
    assert!(stdout.contains("Missing"));

    let (success, _, _) = run_cli(&["verify", &stamped, "--strict"]);
    assert!(success);

    let (success, _, _) = run_cli(&["verify", &stamped, &bare, "--strict"]);
    assert!(!success, "verify --strict should fail on a missing digest");
}

#[test]
fn test_verify_stale_digest_json() {
    let temp_dir = TempDir::new().unwrap();
    let stale = write_doc(
        &temp_dir,
        "stale.json",
        &json!({"beta": 3.0, "provenance": {"opal_hash": EMPTY_DOC_HASH}}),
    );

    let (success, stdout, _) = run_cli(&["verify", &stale, "--json", "--strict"]);
    assert!(!success);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed[0]["verdict"], "Mismatch");
    assert_eq!(parsed[0]["claimed"], EMPTY_DOC_HASH);
    assert_ne!(parsed[0]["computed"], EMPTY_DOC_HASH);
}

#[test]
fn test_encode_then_decode() {
    let temp_dir = TempDir::new().unwrap();
    let params = write_doc(
        &temp_dir,
        "params.json",
        &json!({"penalties": [{"name": "rank_margin", "lambda": 0.5}], "delta_ref": 0.1}),
    );

    let (success, stdout, _) = run_cli(&["encode", "rrhf", &params]);
    assert!(success);
    let doc: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(doc["provenance"]["method"], "RRHF");
    assert!(doc["provenance"]["opal_hash"].is_string());

    let encoded = write_doc(&temp_dir, "encoded.json", &doc);
    let (success, stdout, _) = run_cli(&["decode", "RRHF", &encoded]);
    assert!(success);
    let native: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(
        native,
        json!({
            "penalties": [{"name": "rank_margin", "lambda": 0.5}],
            "delta_ref": 0.1,
            "beta": 1.0
        })
    );
}

#[test]
fn test_decode_irreducible_document_fails() {
    let (success, stdout, stderr) =
        run_cli_with_stdin(&["decode", "dpo"], &shifted_doc().to_string());
    assert!(!success);
    assert!(stdout.is_empty());
    assert!(stderr.contains("not reducible to DPO: [reference_shift]"));
}

#[test]
fn test_unknown_method_rejected() {
    let (success, _, stderr) = run_cli_with_stdin(&["encode", "ppo"], "{}");
    assert!(!success);
    assert!(stderr.contains("ppo"));
}
