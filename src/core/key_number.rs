//! Extract the current key version number from `get_principal` output.

use crate::error::{Diagnostic, KadminError};
use crate::models::shell_result::ShellResult;
use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyNumberError {
    #[error("no output")]
    Missing,
    #[error("unexpected output")]
    Unrecognized,
    #[error("invalid key number value ({0})")]
    Invalid(String),
}

fn pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?s)\A.*?Key: vno ([0-9]+).*\z").expect("key number pattern is valid")
    })
}

/// Parse the first `Key: vno <digits>` occurrence.
pub fn parse(stdout: Option<&str>) -> Result<u32, KeyNumberError> {
    let stdout = match stdout {
        Some(s) if !s.is_empty() => s,
        _ => return Err(KeyNumberError::Missing),
    };
    let digits = pattern()
        .captures(stdout)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .ok_or(KeyNumberError::Unrecognized)?;
    digits
        .parse::<u32>()
        .map_err(|_| KeyNumberError::Invalid(digits.to_string()))
}

/// Parse the key number for `principal`, wrapping failures with the round trip's context.
pub fn from_result(principal: &str, result: &ShellResult) -> Result<u32, KadminError> {
    parse(result.stdout.as_deref()).map_err(|err| {
        let diagnostic = Diagnostic {
            command: None,
            exit_code: Some(result.exit_code),
            stdout: result.stdout.clone(),
            stderr: result.stderr.clone(),
        };
        let message = format!("failed to get key number for {} - {}", principal, err);
        warn!(principal, exit_code = result.exit_code, "{}", message);
        KadminError::operation(message, diagnostic)
    })
}
