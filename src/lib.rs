//! Kerberos principal management through MIT `kadmin`.
//!
//! Drives `kadmin` / `kadmin.local` as a subprocess, stages administrator
//! keytabs in short-lived files, and classifies diagnostic output into a
//! typed error taxonomy.
//!
//! ## Modules
//! - `cli` — Command-line handlers
//! - `core` — Command building, invocation, classification, principal lifecycle
//! - `models` — Data structures
//! - `util` — Process execution, executable lookup, filesystem helpers

pub mod cli;
pub mod constants;
pub mod core;
pub mod error;
pub mod models;
pub mod util;

pub use crate::core::handler::PrincipalManager;
pub use crate::error::{Diagnostic, ErrorKind, KadminError};
pub use crate::models::credential::{AdminAuth, AdministratorCredentials};
pub use crate::models::shell_result::ShellResult;
pub use crate::util::exec::{Executor, ProcessExecutor};
