//! Tests for `vaultmap run`.

use crate::support::*;

#[test]
fn test_run_writes_mapping_file() {
    let t = Test::new();
    t.write_vault("secrets.yml", DB_VAULT);

    let output = t.run(&[]);
    assert_success(&output);
    assert_stdout_contains(&output, "secrets.yml mapped, keys prefixed");

    let mapping = t.read_mapping("secrets__map.yml");
    assert!(mapping.starts_with("### data structure in secrets.yml:\n#\n"));
    assert!(mapping.contains("# db:\n#   user: secret\n#   pass: secret\n# region: secret\n"));
    assert!(mapping.ends_with(
        "### mapping to vaulted variables:\ndb: \"{{ vault_db }}\"\nregion: \"{{ vault_region }}\"\n"
    ));
    assert_no_values(&mapping, &["admin", "s3cr3t", "eu\n"]);
}

#[test]
fn test_run_prefixes_original() {
    let t = Test::new();
    t.write_vault("secrets.yml", DB_VAULT);

    assert_success(&t.run(&[]));
    assert_eq!(
        t.read_vault("secrets.yml"),
        "vault_db:\n  user: admin\n  pass: s3cr3t\nvault_region: eu\n"
    );
}

#[test]
fn test_keep_originals_leaves_file_untouched() {
    let t = Test::new();
    t.write_vault("secrets.yml", DB_VAULT);
    let before = t.read_bytes("secrets.yml");

    let output = t.run_keep();
    assert_success(&output);
    assert_stdout_contains(&output, "original kept");
    assert_eq!(t.read_bytes("secrets.yml"), before);
    assert!(t.path("secrets__map.yml").exists());
}

#[test]
fn test_rerun_is_byte_identical() {
    let t = Test::new();
    t.write_vault("secrets.yml", DB_VAULT);

    assert_success(&t.run(&[]));
    let mapping = t.read_bytes("secrets__map.yml");
    let vault = t.read_bytes("secrets.yml");

    assert_success(&t.run(&[]));
    assert_eq!(t.read_bytes("secrets__map.yml"), mapping);
    assert_eq!(t.read_bytes("secrets.yml"), vault);
}

#[test]
fn test_already_prefixed_vault() {
    let t = Test::new();
    t.write_vault("secrets.yml", PREFIXED_VAULT);
    let before = t.read_bytes("secrets.yml");

    let output = t.run(&[]);
    assert_success(&output);
    assert_eq!(t.read_bytes("secrets.yml"), before);

    let mapping = t.read_mapping("secrets__map.yml");
    assert!(mapping.contains("db_pass: \"{{ vault_db_pass }}\"\n"));
    assert!(mapping.contains("api_token: \"{{ vault_api_token }}\"\n"));
}

#[test]
fn test_recursive_discovery_skips_mapping_files() {
    let t = Test::new();
    t.write_vault("group_vars/prod/vault.yml", DB_VAULT);
    t.write_vault("group_vars/dev/vault.yml", PREFIXED_VAULT);

    assert_success(&t.run(&[]));
    let mapping = t.read_bytes("group_vars/prod/vault__map.yml");

    // The second run must not treat the generated files as vaults.
    let output = t.run(&[]);
    assert_success(&output);
    assert!(!stdout(&output).contains("vault__map.yml"));
    assert!(!t.path("group_vars/prod/vault__map__map.yml").exists());
    assert_eq!(t.read_bytes("group_vars/prod/vault__map.yml"), mapping);
}

#[test]
fn test_ansible_style_vault() {
    let t = Test::new();
    t.write_vault("vault.yml", ANSIBLE_VAULT);

    assert_success(&t.run(&[]));

    let mapping = t.read_mapping("vault__map.yml");
    assert!(mapping.contains("mysql_root_password: \"{{ vault_mysql_root_password }}\""));
    assert!(mapping.contains("users: \"{{ vault_users }}\""));
    assert!(mapping.contains("tls_cert: \"{{ vault_tls_cert }}\""));
    assert_no_values(&mapping, &["deploy", "AAAA", "MIIB", "not a template"]);

    let vault = t.read_vault("vault.yml");
    assert!(vault.starts_with("---\n# database credentials\nvault_mysql_root_password: !unsafe"));
    assert!(vault.contains("\n  - name: deploy\n"));
    assert!(vault.contains("\nvault_tls_cert: |\n  -----BEGIN CERTIFICATE-----\n"));
}

#[test]
fn test_directory_flag() {
    let t = Test::new();
    t.write_vault("inventory/secrets.yml", DB_VAULT);

    let output = t
        .cmd()
        .args(["run", "-d", "inventory", "-p", PASSWORD])
        .output()
        .unwrap();
    assert_success(&output);
    assert!(t.path("inventory/secrets__map.yml").exists());
}

#[test]
fn test_password_from_env() {
    let t = Test::new();
    t.write_vault("secrets.yml", DB_VAULT);

    let output = t
        .cmd()
        .env("VAULTMAP_PASSWORD", PASSWORD)
        .args(["run", "--keep-originals"])
        .output()
        .unwrap();
    assert_success(&output);
    assert!(t.path("secrets__map.yml").exists());
}

#[test]
fn test_json_report() {
    let t = Test::new();
    t.write_vault("a.yml", DB_VAULT);
    t.write_vault("b.yml", PREFIXED_VAULT);

    let output = t.run(&["--json"]);
    assert_success(&output);

    let report: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    let files = report["files"].as_array().unwrap();
    assert_eq!(files.len(), 2);
    assert_eq!(files[0]["status"], "rewritten");
    assert_eq!(files[1]["status"], "unchanged");
}

#[test]
fn test_config_file_prefix() {
    let t = Test::new();
    t.write_plain(".vaultmap.toml", "prefix = \"secret_\"\n");
    t.write_vault("secrets.yml", "token: x\n");

    assert_success(&t.run(&[]));
    assert_eq!(t.read_vault("secrets.yml"), "secret_token: x\n");
    assert!(t
        .read_mapping("secrets__map.yml")
        .contains("token: \"{{ secret_token }}\""));
}

#[test]
fn test_no_candidates_does_not_prompt() {
    let t = Test::new();
    t.write_plain("notes.txt", "nothing here");

    let output = t.cmd().arg("run").output().unwrap();
    assert_success(&output);
    assert_stdout_contains(&output, "no secret files found");
}
