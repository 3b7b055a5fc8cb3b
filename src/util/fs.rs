use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

pub fn set_permissions(path: &Path, mode: u32) -> Result<()> {
    #[cfg(unix)]
    {
        let perm = fs::Permissions::from_mode(mode);
        fs::set_permissions(path, perm)
            .with_context(|| format!("set permissions {:o} on {}", mode, path.display()))?;
    }
    Ok(())
}

/// Read a file that holds secret material, refusing anything over `max_len`.
pub fn read_secret_file(path: &Path, max_len: usize) -> Result<Vec<u8>> {
    let meta = fs::metadata(path).with_context(|| format!("stat {}", path.display()))?;
    if meta.len() > max_len as u64 {
        anyhow::bail!(
            "{} exceeds maximum size ({} bytes, max {} bytes)",
            path.display(),
            meta.len(),
            max_len
        );
    }
    fs::read(path).with_context(|| format!("read {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_secret_file_size_limit() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("admin.keytab");
        fs::write(&path, [5u8, 2, 0, 0]).unwrap();
        assert_eq!(read_secret_file(&path, 4).unwrap(), vec![5, 2, 0, 0]);
        assert!(read_secret_file(&path, 3).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_set_permissions() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("f");
        fs::write(&path, "x").unwrap();
        set_permissions(&path, 0o600).unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o600);
    }
}
