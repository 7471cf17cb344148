//! CLI Integration Tests for abbrev
//!
//! These tests execute the binary and verify:
//! - Configuration resolution (flags, config file, required preserve-chars)
//! - Single-file, stdout and directory modes
//! - JSON output and the run journal
//! - Error handling and soft failures

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const SERVICE: &str = r#"import logging

logger = logging.getLogger(__name__)


class Repository:
    """In-memory storage for records."""

    def __init__(self):
        self.records = {}

    def upsert(self, key, value):
        if key in self.records:
            previous = self.records[key]
            logger.info("replacing %s (was %r) with %r", key, previous, value)
            self.records[key] = value
        else:
            logger.info("inserting %s with %r", key, value)
            self.records[key] = value
        return value

    def purge(self, predicate):
        for key in list(self.records):
            if predicate(self.records[key]):
                logger.debug("purging %s because the predicate matched", key)
                del self.records[key]
"#;

/// Helper to create a project with one nested Python module
fn create_test_project() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("service.py"), SERVICE).unwrap();
    temp_dir
}

fn abbrev() -> Command {
    Command::cargo_bin("abbrev").unwrap()
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn test_preserve_chars_is_required() {
    let temp = create_test_project();

    abbrev()
        .arg(temp.path().join("service.py"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("preserve_chars"));

    assert!(!temp.path().join("service.abbreviated.py").exists());
}

#[test]
fn test_config_file_supplies_preserve_chars() {
    let temp = create_test_project();
    let config = temp.path().join("abbrev.json");
    fs::write(&config, r#"{"max_depth": 1, "preserve_chars": 40}"#).unwrap();

    abbrev()
        .arg(temp.path().join("service.py"))
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Characters saved:"));
}

#[test]
fn test_missing_config_file_fails() {
    let temp = create_test_project();

    abbrev()
        .arg(temp.path().join("service.py"))
        .args(["--preserve-chars", "40", "--config"])
        .arg(temp.path().join("missing.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing.json"));
}

// ============================================================================
// Single file
// ============================================================================

#[test]
fn test_single_file_writes_sibling_output() {
    let temp = create_test_project();
    let output = temp.path().join("service.abbreviated.py");

    abbrev()
        .arg(temp.path().join("service.py"))
        .args(["--depth", "1", "--preserve-chars", "40"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Abbreviated code written to"))
        .stdout(predicate::str::contains("Original file:"))
        .stdout(predicate::str::contains("Characters saved:"));

    let written = fs::read_to_string(&output).unwrap();
    assert!(written.len() < SERVICE.len());
    assert!(written.contains("    def upsert(self, key, value):\n        # if key in self.records:\n"));
    assert!(written.contains("class Repository:\n"));
    assert_eq!(fs::read_to_string(temp.path().join("service.py")).unwrap(), SERVICE);
}

#[test]
fn test_stdout_mode_prints_code() {
    let temp = create_test_project();

    abbrev()
        .arg(temp.path().join("service.py"))
        .args(["--depth", "1", "--preserve-chars", "40", "--stdout"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("import logging\n"))
        .stdout(predicate::str::contains("        # ...\n        pass"));

    assert!(!temp.path().join("service.abbreviated.py").exists());
}

#[test]
fn test_negative_depth_abbreviates_top_level() {
    let temp = create_test_project();

    abbrev()
        .arg(temp.path().join("service.py"))
        .args(["--depth", "-1", "--preserve-chars", "40", "--stdout"])
        .assert()
        .success()
        .stdout(predicate::str::contains("class Repository:\n    # \"\"\"In-memory storage for records.\"\"\""))
        .stdout(predicate::str::contains("def upsert").not());
}

#[test]
fn test_debug_summary() {
    let temp = create_test_project();

    abbrev()
        .arg(temp.path().join("service.py"))
        .args(["--depth", "1", "--preserve-chars", "40", "--debug"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Debug Summary"))
        .stdout(predicate::str::contains("Nodes considered: 4"))
        .stdout(predicate::str::contains("FunctionDef at depth 2"));
}

#[test]
fn test_debug_hint_when_nothing_eligible() {
    let temp = create_test_project();

    abbrev()
        .arg(temp.path().join("service.py"))
        .args(["--depth", "10", "--preserve-chars", "40", "--debug"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Characters saved: 0"))
        .stdout(predicate::str::contains("No nodes were abbreviated"));
}

#[test]
fn test_json_report() {
    let temp = create_test_project();

    let output = abbrev()
        .arg(temp.path().join("service.py"))
        .args(["--depth", "1", "--preserve-chars", "40", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(report["chars_saved"].as_i64().unwrap() > 0);
    assert!(report["percent_saved"].as_f64().unwrap() > 0.0);
    assert!(report["output_path"]
        .as_str()
        .unwrap()
        .ends_with("service.abbreviated.py"));
}

#[test]
fn test_unparseable_file_is_copied_with_warning() {
    let temp = TempDir::new().unwrap();
    let input = temp.path().join("broken.py");
    fs::write(&input, "def broken(:\n    return\n").unwrap();

    abbrev()
        .arg(&input)
        .args(["--preserve-chars", "40"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Characters saved: 0"))
        .stderr(predicate::str::contains("Warning"));

    let written = fs::read_to_string(temp.path().join("broken.abbreviated.py")).unwrap();
    assert_eq!(written, "def broken(:\n    return\n");
}

#[test]
fn test_nonexistent_path_fails() {
    abbrev()
        .args(["/nonexistent/path/module.py", "--preserve-chars", "40"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

// ============================================================================
// Directory mode
// ============================================================================

#[test]
fn test_directory_into_output_dir() {
    let temp = create_test_project();
    fs::create_dir_all(temp.path().join("pkg")).unwrap();
    fs::write(temp.path().join("pkg/more.py"), SERVICE).unwrap();
    let out = TempDir::new().unwrap();

    abbrev()
        .arg(temp.path())
        .args(["--depth", "1", "--preserve-chars", "40", "--output-dir"])
        .arg(out.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Files abbreviated: 2"));

    let names = |dir: &Path| -> Vec<String> {
        fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .filter(|n| n.ends_with(".py"))
            .collect()
    };
    let top = names(out.path());
    assert_eq!(top.len(), 1);
    assert!(top[0].starts_with("service_depth1_"));
    assert_eq!(names(&out.path().join("pkg")).len(), 1);
}

#[test]
fn test_directory_debug_summary_per_file() {
    let temp = create_test_project();
    fs::write(temp.path().join("other.py"), SERVICE).unwrap();

    abbrev()
        .arg(temp.path())
        .args(["--depth", "1", "--preserve-chars", "40", "--debug"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Debug Summary").count(2))
        .stdout(predicate::str::contains("FunctionDef at depth 2"))
        .stdout(predicate::str::contains("Files abbreviated: 2"));
}

#[test]
fn test_directory_rerun_ignores_nested_output_dir() {
    let temp = create_test_project();
    let out = temp.path().join("out");

    for _ in 0..2 {
        abbrev()
            .arg(temp.path())
            .args(["--depth", "1", "--preserve-chars", "40", "--output-dir"])
            .arg(&out)
            .assert()
            .success()
            .stdout(predicate::str::contains("Files abbreviated: 1"));
    }

    assert!(!out.join("out").exists());
}

// ============================================================================
// Journal
// ============================================================================

#[test]
fn test_journal_accumulates_records() {
    let temp = create_test_project();
    let journal = temp.path().join("logs").join("journal.json");

    for _ in 0..2 {
        abbrev()
            .arg(temp.path().join("service.py"))
            .args(["--depth", "1", "--preserve-chars", "40", "--journal"])
            .arg(&journal)
            .assert()
            .success();
    }

    let content: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&journal).unwrap()).unwrap();
    let records = content["records"].as_array().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["analysis_type"], "code_abbreviation");
    assert_eq!(records[0]["parameters"]["depth"], 1);
    assert_eq!(records[0]["parameters"]["preserve_chars"], 40);
    assert_eq!(records[0]["file_md5"], records[1]["file_md5"]);
    assert_eq!(records[0]["file_size"], SERVICE.len() as u64);
}
