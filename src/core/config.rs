//! CLI configuration file loading.

use crate::models::config_file::KadminFile;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Load `path`; a missing file yields defaults.
pub fn load(path: &Path) -> Result<KadminFile> {
    if !path.exists() {
        return Ok(KadminFile::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("read config {}", path.display()))?;
    let file: KadminFile = toml::from_str(&content)
        .with_context(|| format!("parse config {}", path.display()))?;
    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_default() {
        let dir = TempDir::new().unwrap();
        let file = load(&dir.path().join("absent.toml")).unwrap();
        assert!(file.kerberos.realm.is_none());
        assert!(file.admin.principal.is_none());
    }

    #[test]
    fn test_load_sections() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("kadmin-vault.toml");
        fs::write(
            &path,
            r#"
[kerberos]
realm = "EXAMPLE.COM"
admin_server_host = "kdc.example.com"
encryption_types = "aes256-cts-hmac-sha1-96 aes128-cts-hmac-sha1-96"
executable_search_paths = "/usr/bin, /usr/sbin"

[admin]
principal = "admin/admin@EXAMPLE.COM"
keytab_path = "/etc/security/keytabs/admin.keytab"
"#,
        )
        .unwrap();
        let file = load(&path).unwrap();
        assert_eq!(file.kerberos.realm.as_deref(), Some("EXAMPLE.COM"));
        assert_eq!(file.admin.principal.as_deref(), Some("admin/admin@EXAMPLE.COM"));
        let map = file.kerberos.to_map();
        assert_eq!(map.get("admin_server_host").map(String::as_str), Some("kdc.example.com"));
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn test_malformed_file_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "[kerberos\nrealm = 1").unwrap();
        let err = load(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("parse config"));
    }
}
