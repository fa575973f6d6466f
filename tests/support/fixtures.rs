//! Test fixtures and constants.

/// Vault password used for every encrypted fixture.
pub const PASSWORD: &str = "correct horse battery staple";

/// Nested document with two top-level keys.
pub const DB_VAULT: &str = "db:\n  user: admin\n  pass: s3cr3t\nregion: eu\n";

/// Document whose keys are already prefixed.
pub const PREFIXED_VAULT: &str = "vault_db_pass: hunter2\nvault_api_token: abc123\n";

/// Document mixing tags, lists and comments, the way Ansible vaults look.
pub const ANSIBLE_VAULT: &str = r#"---
# database credentials
mysql_root_password: !unsafe '{{ not a template }}'
users:
  - name: deploy
    key: ssh-ed25519 AAAA
  - name: backup
    key: ssh-ed25519 BBBB
tls_cert: |
  -----BEGIN CERTIFICATE-----
  MIIB
  -----END CERTIFICATE-----
"#;
