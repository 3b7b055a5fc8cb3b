//! Build kadmin argument vectors and their redacted diagnostic form.
//!
//! Remote: `kadmin [-s host] -p principal [-k -t keytab | -w password] [-r realm] -q query`
//! Local:  `kadmin.local [-r realm] -q query`

use crate::constants;
use crate::core::staging::{self, StagedKeytab};
use crate::error::KadminError;
use crate::models::credential::{AdminAuth, AdministratorCredentials};
use crate::models::handler_config::HandlerConfig;
use std::path::Path;

/// A ready-to-run argv. Owns any keytab staged for it.
#[derive(Debug)]
pub struct KadminCommand {
    argv: Vec<String>,
    keytab: Option<StagedKeytab>,
}

impl KadminCommand {
    pub fn argv(&self) -> &[String] {
        &self.argv
    }

    pub fn keytab_path(&self) -> Option<&Path> {
        self.keytab.as_ref().map(StagedKeytab::path)
    }

    pub fn redacted(&self) -> String {
        redact(&self.argv)
    }

    /// Remove any staged keytab. Dropping the command does the same.
    pub fn release(mut self) {
        if let Some(keytab) = self.keytab.take() {
            keytab.release();
        }
    }
}

pub fn build(
    config: &HandlerConfig,
    credentials: &AdministratorCredentials,
    query: &str,
) -> Result<KadminCommand, KadminError> {
    let mut argv = Vec::new();
    let mut keytab = None;

    match credentials.auth() {
        AdminAuth::Local => {
            argv.push(tool_path(
                config.admin_tool_local_path.as_deref(),
                constants::KADMIN_LOCAL,
            )?);
        }
        AdminAuth::Keytab { principal, keytab: bytes } => {
            push_remote(&mut argv, config, principal)?;
            let staged = staging::stage(bytes)?;
            argv.push("-k".to_string());
            argv.push("-t".to_string());
            argv.push(staged.path().display().to_string());
            keytab = Some(staged);
        }
        AdminAuth::Password { principal, password } => {
            push_remote(&mut argv, config, principal)?;
            argv.push("-w".to_string());
            argv.push(password.to_string());
        }
        AdminAuth::TicketCache { principal } => push_remote(&mut argv, config, principal)?,
    }

    if let Some(realm) = config.default_realm.as_deref().filter(|r| !r.is_empty()) {
        argv.push("-r".to_string());
        argv.push(realm.to_string());
    }

    argv.push("-q".to_string());
    argv.push(escape_query(query));

    Ok(KadminCommand { argv, keytab })
}

fn tool_path(path: Option<&Path>, name: &str) -> Result<String, KadminError> {
    match path {
        Some(p) if !p.as_os_str().is_empty() => Ok(p.display().to_string()),
        _ => Err(KadminError::InvalidArgument(format!(
            "no path for {} is available - the handler may not have been opened",
            name
        ))),
    }
}

fn push_remote(
    argv: &mut Vec<String>,
    config: &HandlerConfig,
    principal: &str,
) -> Result<(), KadminError> {
    argv.push(tool_path(config.admin_tool_path.as_deref(), constants::KADMIN)?);
    if let Some(host) = &config.admin_server_host {
        argv.push("-s".to_string());
        argv.push(host.clone());
    }
    argv.push("-p".to_string());
    argv.push(principal.to_string());
    Ok(())
}

pub fn escape_query(query: &str) -> String {
    query.replace('"', "\\\"")
}

/// Render argv for logs: mask the token after `-w`, mask `-pw` values inside
/// the query, and quote tokens containing whitespace.
pub fn redact(argv: &[String]) -> String {
    let mut parts = Vec::with_capacity(argv.len());
    let mut iter = argv.iter();
    while let Some(token) = iter.next() {
        parts.push(quote(token));
        match token.as_str() {
            "-w" => {
                if iter.next().is_some() {
                    parts.push(constants::PASSWORD_MASK.to_string());
                }
            }
            "-q" => {
                if let Some(query) = iter.next() {
                    parts.push(quote(&redact_query(query)));
                }
            }
            _ => {}
        }
    }
    parts.join(" ")
}

/// Mask everything between `-pw` and the trailing principal, so passwords
/// containing spaces are hidden too.
fn redact_query(query: &str) -> String {
    let words: Vec<&str> = query.split(' ').collect();
    let Some(flag) = words.iter().position(|w| *w == "-pw") else {
        return query.to_string();
    };
    let value_end = if words.len() > flag + 2 {
        words.len() - 1
    } else {
        words.len()
    };
    if value_end <= flag + 1 {
        return query.to_string();
    }
    let mut out: Vec<&str> = words[..=flag].to_vec();
    out.push(constants::PASSWORD_MASK);
    out.extend_from_slice(&words[value_end..]);
    out.join(" ")
}

fn quote(token: &str) -> String {
    if token.chars().any(char::is_whitespace) {
        format!("\"{}\"", token)
    } else {
        token.to_string()
    }
}
