//! Short-lived keytab files handed to `kadmin -k -t`.
//!
//! A [`StagedKeytab`] owns its file for exactly one invocation. Dropping or
//! releasing it deletes the file; if deletion fails the path is queued and
//! removed later by [`purge_deferred`].

use crate::constants;
use crate::error::KadminError;
use crate::util::fs as kadmin_fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::TempPath;
use tracing::{debug, warn};

static DEFERRED: Mutex<Vec<PathBuf>> = Mutex::new(Vec::new());

#[derive(Debug)]
pub struct StagedKeytab {
    path: Option<TempPath>,
}

impl StagedKeytab {
    pub fn path(&self) -> &Path {
        match &self.path {
            Some(p) => &**p,
            None => Path::new(""),
        }
    }

    /// Delete the file now. Never fails; see module docs for the fallback.
    pub fn release(mut self) {
        self.release_inner();
    }

    fn release_inner(&mut self) {
        let Some(tmp) = self.path.take() else {
            return;
        };
        let path = tmp.to_path_buf();
        match tmp.close() {
            Ok(()) => debug!(path = %path.display(), "removed staged keytab"),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => {
                warn!(
                    path = %path.display(),
                    error = %e,
                    "failed to remove staged keytab, deferring"
                );
                defer_removal(path);
            }
        }
    }
}

impl Drop for StagedKeytab {
    fn drop(&mut self) {
        self.release_inner();
    }
}

/// Stage keytab bytes in the system temporary directory.
pub fn stage(bytes: &[u8]) -> Result<StagedKeytab, KadminError> {
    stage_in(&std::env::temp_dir(), bytes)
}

/// Stage keytab bytes in `dir` under a unique random name, mode 0600.
pub fn stage_in(dir: &Path, bytes: &[u8]) -> Result<StagedKeytab, KadminError> {
    let mut tmp = tempfile::Builder::new()
        .prefix(constants::KEYTAB_FILE_PREFIX)
        .suffix(constants::KEYTAB_FILE_SUFFIX)
        .tempfile_in(dir)
        .map_err(|e| KadminError::Setup(format!("create temporary keytab file: {}", e)))?;
    kadmin_fs::set_permissions(tmp.path(), constants::KEYTAB_FILE_MODE)
        .map_err(|e| KadminError::Setup(format!("{:#}", e)))?;
    tmp.write_all(bytes)
        .and_then(|_| tmp.flush())
        .map_err(|e| KadminError::Setup(format!("write temporary keytab file: {}", e)))?;

    let path = tmp.into_temp_path();
    debug!(path = %path.display(), "staged keytab");
    Ok(StagedKeytab { path: Some(path) })
}

pub fn defer_removal(path: PathBuf) {
    let mut pending = DEFERRED.lock().unwrap_or_else(|e| e.into_inner());
    if !pending.contains(&path) {
        pending.push(path);
    }
}

/// Paths still waiting for deferred removal.
pub fn pending_deferred() -> Vec<PathBuf> {
    DEFERRED.lock().unwrap_or_else(|e| e.into_inner()).clone()
}

/// Retry removal of deferred files. Returns how many remain queued.
pub fn purge_deferred() -> usize {
    let mut pending = DEFERRED.lock().unwrap_or_else(|e| e.into_inner());
    pending.retain(|path| match std::fs::remove_file(path) {
        Ok(()) => false,
        Err(e) if e.kind() == ErrorKind::NotFound => false,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "deferred keytab removal failed");
            true
        }
    });
    pending.len()
}
