//! Handler configuration derived at `open` time.

use crate::constants;
use std::collections::{BTreeSet, HashMap};
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HandlerConfig {
    pub default_realm: Option<String>,
    pub admin_server_host: Option<String>,
    pub key_encryption_types: BTreeSet<String>,
    pub executable_search_paths: Vec<PathBuf>,
    /// Resolved path to `kadmin`.
    pub admin_tool_path: Option<PathBuf>,
    /// Resolved path to `kadmin.local`.
    pub admin_tool_local_path: Option<PathBuf>,
}

impl HandlerConfig {
    /// Build a config from the realm and kerberos-env style map. Executable
    /// paths are left unset; the handler fills them after resolution.
    pub fn from_map(realm: Option<&str>, configuration: Option<&HashMap<String, String>>) -> Self {
        let default_realm = realm.filter(|r| !r.is_empty()).map(str::to_string);
        let mut config = Self {
            default_realm,
            executable_search_paths: default_search_paths(),
            ..Default::default()
        };

        let Some(map) = configuration else {
            return config;
        };

        if let Some(types) = map.get(constants::KEY_ENCRYPTION_TYPES) {
            config.key_encryption_types = parse_encryption_types(types);
        }
        config.admin_server_host = map
            .get(constants::KEY_ADMIN_SERVER_HOST)
            .filter(|h| !h.is_empty())
            .cloned();
        if let Some(paths) = map.get(constants::KEY_EXECUTABLE_SEARCH_PATHS) {
            let parsed = parse_search_paths(paths);
            if !parsed.is_empty() {
                config.executable_search_paths = parsed;
            }
        }
        config
    }
}

pub fn parse_encryption_types(value: &str) -> BTreeSet<String> {
    value.split_whitespace().map(str::to_string).collect()
}

/// Split on commas and on the platform path-list separator.
pub fn parse_search_paths(value: &str) -> Vec<PathBuf> {
    value
        .split(',')
        .flat_map(|chunk| env::split_paths(chunk.trim()).collect::<Vec<_>>())
        .filter(|p| !p.as_os_str().is_empty())
        .collect()
}

pub fn default_search_paths() -> Vec<PathBuf> {
    constants::DEFAULT_EXECUTABLE_SEARCH_PATHS
        .iter()
        .map(PathBuf::from)
        .collect()
}
