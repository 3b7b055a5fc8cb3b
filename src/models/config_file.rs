//! On-disk CLI configuration (`kadmin-vault.toml`).

use crate::constants;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KadminFile {
    #[serde(default)]
    pub kerberos: KerberosSection,
    #[serde(default)]
    pub admin: AdminSection,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KerberosSection {
    #[serde(default)]
    pub realm: Option<String>,
    #[serde(default)]
    pub admin_server_host: Option<String>,
    /// Whitespace-separated encryption types.
    #[serde(default)]
    pub encryption_types: Option<String>,
    #[serde(default)]
    pub executable_search_paths: Option<String>,
}

/// Administrator identity. Passwords are never read from this file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdminSection {
    #[serde(default)]
    pub principal: Option<String>,
    #[serde(default)]
    pub keytab_path: Option<PathBuf>,
}

impl KerberosSection {
    /// Flatten into the configuration map consumed by `PrincipalManager::open`.
    pub fn to_map(&self) -> HashMap<String, String> {
        let mut map = HashMap::new();
        if let Some(types) = &self.encryption_types {
            map.insert(constants::KEY_ENCRYPTION_TYPES.to_string(), types.clone());
        }
        if let Some(host) = &self.admin_server_host {
            map.insert(constants::KEY_ADMIN_SERVER_HOST.to_string(), host.clone());
        }
        if let Some(paths) = &self.executable_search_paths {
            map.insert(constants::KEY_EXECUTABLE_SEARCH_PATHS.to_string(), paths.clone());
        }
        map
    }
}
