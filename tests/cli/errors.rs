//! Tests for failure handling and CLI flags.

use crate::support::*;
use predicates::prelude::*;

#[test]
fn test_wrong_password_fails_per_file() {
    let t = Test::new();
    t.write_vault("secrets.yml", DB_VAULT);
    let before = t.read_bytes("secrets.yml");

    let output = t
        .cmd()
        .args(["run", "--password", "wrong"])
        .output()
        .unwrap();
    assert_failure(&output);
    assert_stderr_contains(&output, "[credential]");
    assert!(!t.path("secrets__map.yml").exists());
    assert_eq!(t.read_bytes("secrets.yml"), before);
}

#[test]
fn test_one_bad_file_does_not_stop_the_run() {
    let t = Test::new();
    t.write_plain("a_plain.yml", "not: encrypted\n");
    t.write_vault("b_list.yml", "- one\n- two\n");
    t.write_vault("c_broken.yml", "key: [unclosed\n");
    t.write_vault("d_good.yml", DB_VAULT);

    let output = t.run(&[]);
    assert_failure(&output);

    let err = stderr(&output);
    assert!(err.contains("a_plain.yml [cipher]"), "got: {}", err);
    assert!(err.contains("b_list.yml [invalid-shape]"), "got: {}", err);
    assert!(err.contains("c_broken.yml [malformed-markup]"), "got: {}", err);
    assert!(err.contains("3 file(s) failed"), "got: {}", err);

    assert!(!t.path("a_plain__map.yml").exists());
    assert!(!t.path("b_list__map.yml").exists());
    assert!(!t.path("c_broken__map.yml").exists());
    assert!(t.path("d_good__map.yml").exists());
    assert_eq!(t.read_vault("b_list.yml"), "- one\n- two\n");
}

#[test]
fn test_unwritable_mapping_is_io_failure() {
    let t = Test::new();
    t.write_vault("a.yml", DB_VAULT);
    std::fs::create_dir(t.path("a__map.yml")).unwrap();
    t.write_vault("b.yml", DB_VAULT);
    let before = t.read_bytes("a.yml");

    let output = t.run(&[]);
    assert_failure(&output);
    assert_stderr_contains(&output, "a.yml [io]");
    assert!(t.path("b__map.yml").is_file());
    assert_eq!(t.read_bytes("a.yml"), before);
}

#[test]
fn test_colliding_keys_are_invalid_shape() {
    let t = Test::new();
    t.write_vault("secrets.yml", "db: one\nvault_db: two\n");
    let before = t.read_bytes("secrets.yml");

    let output = t.run(&[]);
    assert_failure(&output);
    assert_stderr_contains(&output, "secrets.yml [invalid-shape]");
    assert!(!t.path("secrets__map.yml").exists());
    assert_eq!(t.read_bytes("secrets.yml"), before);
}

#[test]
fn test_unknown_tag_is_reported() {
    let t = Test::new();
    t.write_vault("secrets.yml", "token: !custom abc\n");

    let output = t.run(&[]);
    assert_failure(&output);
    assert_stderr_contains(&output, "!custom");
}

#[test]
fn test_missing_password_non_interactive() {
    let t = Test::new();
    t.write_vault("secrets.yml", DB_VAULT);

    let output = t.cmd().arg("run").output().unwrap();
    assert_failure(&output);
    assert_stderr_contains(&output, "VAULTMAP_PASSWORD");
}

#[test]
fn test_missing_directory() {
    let t = Test::new();

    let output = t.run(&["--directory", "nope"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "directory not found");
}

#[test]
fn test_invalid_config() {
    let t = Test::new();
    t.write_plain(".vaultmap.toml", "prefix = \"vault-\"\n");
    t.write_vault("secrets.yml", DB_VAULT);

    let output = t.run(&[]);
    assert_failure(&output);
    assert_stderr_contains(&output, "prefix");
}

#[test]
fn test_verbose_logs_to_stderr() {
    let t = Test::new();
    t.write_vault("secrets.yml", DB_VAULT);

    let output = t.run(&["--verbose"]);
    assert_success(&output);
    let err = stderr(&output);
    assert!(err.contains("DEBUG"), "got: {}", err);
    assert!(!err.contains("s3cr3t"));
    assert!(!err.contains(PASSWORD));
}

#[test]
fn test_help_and_version() {
    let t = Test::new();

    let output = t.cmd().arg("--help").output().unwrap();
    assert_success(&output);
    assert_stdout_contains(&output, "run");

    let output = t.cmd().arg("--version").output().unwrap();
    assert_success(&output);
    assert_stdout_contains(&output, "vaultmap");
}

#[test]
fn test_completions_bash() {
    let t = Test::new();

    t.cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("vaultmap"));
}
