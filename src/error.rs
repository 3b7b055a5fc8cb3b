//! Typed error taxonomy for kadmin operations.

use std::fmt;
use thiserror::Error;

/// Broad category of a failure, as seen by orchestration code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    KdcConnection,
    AdminAuthentication,
    Realm,
    GenericOperation,
    NotOpen,
    InvalidArgument,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::KdcConnection => "kdc-connection",
            ErrorKind::AdminAuthentication => "admin-authentication",
            ErrorKind::Realm => "realm",
            ErrorKind::GenericOperation => "operation",
            ErrorKind::NotOpen => "not-open",
            ErrorKind::InvalidArgument => "invalid-argument",
        };
        f.write_str(name)
    }
}

/// Context captured from a kadmin round trip. The command is always redacted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostic {
    pub command: Option<String>,
    pub exit_code: Option<i32>,
    pub stdout: Option<String>,
    pub stderr: Option<String>,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(command) = &self.command {
            write!(f, "\n\tCommand: {}", command)?;
        }
        match self.exit_code {
            Some(code) => write!(f, "\n\tExitCode: {}", code)?,
            None => write!(f, "\n\tExitCode: -")?,
        }
        write!(f, "\n\tSTDOUT: {}", self.stdout.as_deref().unwrap_or("NULL"))?;
        write!(f, "\n\tSTDERR: {}", self.stderr.as_deref().unwrap_or("NULL"))
    }
}

#[derive(Debug, Error)]
pub enum KadminError {
    #[error("this operation handler has not been opened")]
    NotOpen,

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("cannot connect to the KDC: {message}{diagnostic}")]
    KdcConnection {
        message: String,
        diagnostic: Box<Diagnostic>,
    },

    #[error("administrator authentication failed: {message}{diagnostic}")]
    AdminAuthentication {
        message: String,
        diagnostic: Box<Diagnostic>,
    },

    #[error("realm is not usable: {message}{diagnostic}")]
    Realm {
        message: String,
        diagnostic: Box<Diagnostic>,
    },

    #[error("{message}{diagnostic}")]
    Operation {
        message: String,
        diagnostic: Box<Diagnostic>,
    },

    /// The execution collaborator could not start the process.
    #[error("failed to launch {program}: {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Executable resolution or credential staging failed.
    #[error("setup failed: {0}")]
    Setup(String),
}

impl KadminError {
    /// Build the error matching `kind` for an unsuccessful invocation.
    pub fn classified(kind: ErrorKind, message: impl Into<String>, diagnostic: Diagnostic) -> Self {
        let message = message.into();
        let diagnostic = Box::new(diagnostic);
        match kind {
            ErrorKind::KdcConnection => KadminError::KdcConnection { message, diagnostic },
            ErrorKind::AdminAuthentication => {
                KadminError::AdminAuthentication { message, diagnostic }
            }
            ErrorKind::Realm => KadminError::Realm { message, diagnostic },
            ErrorKind::NotOpen => KadminError::NotOpen,
            ErrorKind::InvalidArgument => KadminError::InvalidArgument(message),
            ErrorKind::GenericOperation => KadminError::Operation { message, diagnostic },
        }
    }

    pub fn operation(message: impl Into<String>, diagnostic: Diagnostic) -> Self {
        KadminError::Operation {
            message: message.into(),
            diagnostic: Box::new(diagnostic),
        }
    }

    /// Launch and setup failures are fatal and report as generic operation errors.
    pub fn kind(&self) -> ErrorKind {
        match self {
            KadminError::NotOpen => ErrorKind::NotOpen,
            KadminError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            KadminError::KdcConnection { .. } => ErrorKind::KdcConnection,
            KadminError::AdminAuthentication { .. } => ErrorKind::AdminAuthentication,
            KadminError::Realm { .. } => ErrorKind::Realm,
            KadminError::Operation { .. }
            | KadminError::Launch { .. }
            | KadminError::Setup(_) => ErrorKind::GenericOperation,
        }
    }

    pub fn diagnostic(&self) -> Option<&Diagnostic> {
        match self {
            KadminError::KdcConnection { diagnostic, .. }
            | KadminError::AdminAuthentication { diagnostic, .. }
            | KadminError::Realm { diagnostic, .. }
            | KadminError::Operation { diagnostic, .. } => Some(diagnostic),
            _ => None,
        }
    }
}
