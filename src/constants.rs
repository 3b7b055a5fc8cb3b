//! Centralized constants for executables, configuration keys, and limits.

/// Name of the remote admin tool.
pub const KADMIN: &str = "kadmin";

/// Name of the local (root, no network auth) admin tool.
pub const KADMIN_LOCAL: &str = "kadmin.local";

/// Configuration key: whitespace-separated encryption types.
pub const KEY_ENCRYPTION_TYPES: &str = "encryption_types";

/// Configuration key: admin server host name or address.
pub const KEY_ADMIN_SERVER_HOST: &str = "admin_server_host";

/// Configuration key: list of directories searched for executables.
pub const KEY_EXECUTABLE_SEARCH_PATHS: &str = "executable_search_paths";

/// Directories searched when no search paths are configured.
pub const DEFAULT_EXECUTABLE_SEARCH_PATHS: &[&str] = &[
    "/usr/bin",
    "/usr/kerberos/bin",
    "/usr/sbin",
    "/usr/lib/mit/bin",
    "/usr/lib/mit/sbin",
];

/// Replacement for password values in diagnostics.
pub const PASSWORD_MASK: &str = "********";

/// Permission mode for staged keytab files.
pub const KEYTAB_FILE_MODE: u32 = 0o600;

/// Prefix for staged keytab file names.
pub const KEYTAB_FILE_PREFIX: &str = "kadmin-";

/// Suffix for staged keytab file names.
pub const KEYTAB_FILE_SUFFIX: &str = ".keytab";

/// Maximum keytab size accepted by the CLI (1 MiB).
pub const MAX_KEYTAB_SIZE: usize = 1_048_576;

/// Default length for auto-generated principal passwords.
pub const DEFAULT_PASSWORD_LENGTH: usize = 32;
