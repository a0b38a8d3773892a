//! End-to-end tests for the skillpack binary.
//!
//! These run the real binary against temporary skill directories and
//! check exit codes, console output, and the archive on disk.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Get a Command for the skillpack binary.
fn skillpack() -> Command {
    let mut cmd = Command::cargo_bin("skillpack").expect("skillpack binary should exist");
    cmd.env_remove("SKILLPACK_SKILL_DIR")
        .env_remove("SKILLPACK_OUTPUT_DIR")
        .env_remove("SKILLPACK_LOG")
        .env_remove("SKILLPACK_LOG_FORMAT")
        .env_remove("RUST_LOG");
    cmd
}

fn write_skill(root: &Path, name: &str, manifest: &str) -> PathBuf {
    let dir = root.join(name);
    fs::create_dir_all(dir.join("references")).unwrap();
    fs::write(dir.join("SKILL.md"), manifest).unwrap();
    fs::write(dir.join("references/routes.md"), "# Routes\n").unwrap();
    dir
}

fn valid_manifest(name: &str) -> String {
    format!("---\nname: {name}\ndescription: Does things\n---\n\n# {name}\n")
}

// ============================================================================
// Success
// ============================================================================

mod success {
    use super::*;

    #[test]
    fn packages_valid_skill() {
        let temp = TempDir::new().unwrap();
        let skill = write_skill(temp.path(), "my-skill", &valid_manifest("my-skill"));
        let out = temp.path().join("dist");

        skillpack()
            .arg(&skill)
            .arg(&out)
            .assert()
            .success()
            .stdout(predicate::str::contains("Skill is valid!"))
            .stdout(predicate::str::contains("Added: my-skill/SKILL.md"))
            .stdout(predicate::str::contains("Added: my-skill/references/routes.md"))
            .stdout(predicate::str::contains("File size:"));

        assert!(out.join("my-skill.skill").is_file());
    }

    #[test]
    fn output_defaults_to_working_directory() {
        let temp = TempDir::new().unwrap();
        let skill = write_skill(temp.path(), "my-skill", &valid_manifest("my-skill"));
        let cwd = temp.path().join("cwd");
        fs::create_dir_all(&cwd).unwrap();

        skillpack()
            .current_dir(&cwd)
            .arg(&skill)
            .assert()
            .success();

        assert!(cwd.join("my-skill.skill").is_file());
    }

    #[test]
    fn paths_from_environment() {
        let temp = TempDir::new().unwrap();
        let skill = write_skill(temp.path(), "env-skill", &valid_manifest("env-skill"));
        let out = temp.path().join("env-out");

        skillpack()
            .env("SKILLPACK_SKILL_DIR", &skill)
            .env("SKILLPACK_OUTPUT_DIR", &out)
            .assert()
            .success();

        assert!(out.join("env-skill.skill").is_file());
    }

    #[test]
    fn json_format_prints_report() {
        let temp = TempDir::new().unwrap();
        let skill = write_skill(temp.path(), "my-skill", &valid_manifest("my-skill"));

        let output = skillpack()
            .arg(&skill)
            .arg(temp.path())
            .args(["--format", "json"])
            .output()
            .unwrap();
        assert!(output.status.success());

        let doc: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(doc["ok"], true);
        assert_eq!(doc["report"]["name"], "my-skill");
        assert_eq!(doc["report"]["entries"].as_array().unwrap().len(), 2);

        let stderr = String::from_utf8(output.stderr).unwrap();
        assert!(stderr.contains("\"event\":\"entry_added\""));
    }

    #[test]
    fn dry_run_writes_nothing() {
        let temp = TempDir::new().unwrap();
        let skill = write_skill(temp.path(), "my-skill", &valid_manifest("my-skill"));
        let out = temp.path().join("dist");

        skillpack()
            .arg(&skill)
            .arg(&out)
            .arg("--dry-run")
            .assert()
            .success()
            .stdout(predicate::str::contains("Dry run passed: 2 entries"));

        assert!(!out.exists());
    }

    #[test]
    fn log_timestamps_prefix_human_log_lines() {
        let temp = TempDir::new().unwrap();
        let skill = write_skill(temp.path(), "my-skill", &valid_manifest("my-skill"));

        let packaged_line = |extra: &[&str]| {
            let output = skillpack()
                .arg(&skill)
                .arg(temp.path())
                .arg("-v")
                .args(extra)
                .output()
                .unwrap();
            assert!(output.status.success());
            String::from_utf8(output.stderr)
                .unwrap()
                .lines()
                .find(|l| l.contains("Skill packaged"))
                .map(str::to_string)
                .expect("info line for the packaged archive")
        };

        let stamped = packaged_line(&["--log-timestamps"]);
        assert!(stamped.starts_with(|c: char| c.is_ascii_digit()), "{stamped}");

        let plain = packaged_line(&[]);
        assert!(!plain.starts_with(|c: char| c.is_ascii_digit()), "{plain}");
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn json_result_to_unwritable_stdout_does_not_panic() {
        let temp = TempDir::new().unwrap();
        let skill = write_skill(temp.path(), "my-skill", &valid_manifest("my-skill"));
        let full = fs::OpenOptions::new().write(true).open("/dev/full").unwrap();

        let output = std::process::Command::new(assert_cmd::cargo::cargo_bin("skillpack"))
            .env_remove("SKILLPACK_LOG")
            .env_remove("RUST_LOG")
            .arg(&skill)
            .arg(temp.path())
            .args(["--format", "json"])
            .stdout(full)
            .output()
            .unwrap();

        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(!stderr.contains("panicked"), "{stderr}");
        assert_eq!(output.status.code(), Some(0));
        assert!(temp.path().join("my-skill.skill").is_file());
    }
}

// ============================================================================
// Failures
// ============================================================================

mod failures {
    use super::*;

    #[test]
    fn missing_directory_fails() {
        let temp = TempDir::new().unwrap();

        skillpack()
            .arg(temp.path().join("ghost"))
            .arg(temp.path())
            .assert()
            .code(1)
            .stderr(predicate::str::contains("Skill folder not found"));

        assert!(!temp.path().join("ghost.skill").exists());
    }

    #[test]
    fn invalid_name_fails_without_archive() {
        let temp = TempDir::new().unwrap();
        let skill = write_skill(
            temp.path(),
            "bad",
            "---\nname: My_Skill\ndescription: x\n---\n",
        );

        skillpack()
            .arg(&skill)
            .arg(temp.path())
            .assert()
            .code(1)
            .stderr(predicate::str::contains("kebab-case"))
            .stderr(predicate::str::contains("'My_Skill'"))
            .stderr(predicate::str::contains("Packaging failed"));

        assert!(!temp.path().join("bad.skill").exists());
    }

    #[test]
    fn missing_manifest_fails() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("empty-skill");
        fs::create_dir_all(&dir).unwrap();

        skillpack()
            .arg(&dir)
            .arg(temp.path())
            .assert()
            .code(1)
            .stderr(predicate::str::contains("SKILL.md not found in"));
    }

    #[test]
    fn file_instead_of_directory_fails() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("notes.txt");
        fs::write(&file, "x").unwrap();

        skillpack()
            .arg(&file)
            .assert()
            .code(1)
            .stderr(predicate::str::contains("Path is not a directory"));
    }

    #[test]
    fn json_format_reports_error() {
        let temp = TempDir::new().unwrap();
        let skill = write_skill(temp.path(), "nohdr", "# No header here\n");

        let output = skillpack()
            .arg(&skill)
            .arg(temp.path())
            .args(["-f", "json"])
            .output()
            .unwrap();
        assert_eq!(output.status.code(), Some(1));

        let doc: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(doc["ok"], false);
        assert_eq!(doc["exit_code"], "ERR_VALIDATION");
        assert_eq!(doc["error"]["rule"], "no_header");
    }

    #[test]
    fn unknown_flag_is_usage_error() {
        skillpack()
            .arg("--not-a-flag")
            .assert()
            .failure()
            .stderr(predicate::str::contains("error"));
    }

    #[test]
    fn unknown_format_is_usage_error() {
        skillpack()
            .args(["--format", "yaml"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("yaml"));
    }
}
