//! CLI routing and command dispatch.

use crate::constants;
use crate::core::handler::PrincipalManager;
use crate::core::{config, staging};
use crate::models::config_file::KadminFile;
use crate::models::credential::AdministratorCredentials;
use crate::util::fs as kadmin_fs;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dialoguer::Password;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use zeroize::Zeroizing;

pub mod doctor;
pub mod principal;

/// Environment variable holding the administrator password for non-interactive use.
pub const ADMIN_PASSWORD_ENV: &str = "KADMIN_VAULT_ADMIN_PASSWORD";

/// Shared context passed to all command handlers.
pub struct CliContext {
    pub config_path: Option<PathBuf>,
    pub realm: Option<String>,
    pub configuration: HashMap<String, String>,
    pub credentials: AdministratorCredentials,
    pub non_interactive: bool,
    pub json: bool,
}

impl CliContext {
    /// Open a manager with the process executor.
    pub fn open_manager(&self) -> Result<PrincipalManager> {
        let mut manager = PrincipalManager::with_process_executor();
        manager
            .open(
                self.credentials.clone(),
                self.realm.as_deref(),
                Some(&self.configuration),
            )
            .context("open kadmin handler")?;
        Ok(manager)
    }
}

#[derive(Parser, Debug)]
#[command(name = "kadmin-vault", version, about = "Manage Kerberos principals through kadmin")]
pub struct Cli {
    /// Configuration file (TOML)
    #[arg(long, global = true, value_name = "PATH", env = "KADMIN_VAULT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Default realm
    #[arg(long, global = true)]
    pub realm: Option<String>,

    /// KDC admin server host
    #[arg(long, global = true, value_name = "HOST")]
    pub admin_server: Option<String>,

    /// Administrator principal (omit for local mode via kadmin.local)
    #[arg(long, global = true, value_name = "PRINCIPAL")]
    pub admin_principal: Option<String>,

    /// Keytab authenticating the administrator principal
    #[arg(long, global = true, value_name = "PATH")]
    pub admin_keytab: Option<PathBuf>,

    /// JSON credential document: {"principal", "password", "keytab" (base64)}
    #[arg(long, global = true, value_name = "PATH", conflicts_with = "admin_keytab")]
    pub admin_credential: Option<PathBuf>,

    /// Run in non-interactive mode (no prompts, suitable for automation)
    #[arg(long, global = true, env = "KADMIN_VAULT_NON_INTERACTIVE")]
    pub non_interactive: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        init_tracing(self.verbose);

        let file = match &self.config {
            Some(path) => config::load(path)?,
            None => KadminFile::default(),
        };

        let mut configuration = file.kerberos.to_map();
        if let Some(host) = &self.admin_server {
            configuration.insert(constants::KEY_ADMIN_SERVER_HOST.to_string(), host.clone());
        }
        let realm = self.realm.clone().or(file.kerberos.realm.clone());
        let credentials = self.credentials(&file)?;

        let ctx = CliContext {
            config_path: self.config,
            realm,
            configuration,
            credentials,
            non_interactive: self.non_interactive,
            json: self.json,
        };

        let result = match self.command {
            Commands::Doctor(args) => doctor::run(&ctx, args),
            command => principal::run(&ctx, command),
        };

        let remaining = staging::purge_deferred();
        if remaining > 0 {
            eprintln!("warning: {} staged keytab file(s) could not be removed", remaining);
        }
        result
    }

    fn credentials(&self, file: &KadminFile) -> Result<AdministratorCredentials> {
        let mut credentials = match &self.admin_credential {
            Some(path) => {
                let raw = Zeroizing::new(kadmin_fs::read_secret_file(
                    path,
                    constants::MAX_KEYTAB_SIZE * 2,
                )?);
                let text = std::str::from_utf8(&raw).with_context(|| {
                    format!("credential document {} is not UTF-8", path.display())
                })?;
                AdministratorCredentials::from_json(text)
                    .with_context(|| format!("load credential document {}", path.display()))?
            }
            None => AdministratorCredentials::default(),
        };

        if let Some(principal) = self.admin_principal.clone().or(file.admin.principal.clone()) {
            credentials.principal = Some(principal);
        }
        if credentials.principal.as_deref().unwrap_or("").is_empty() {
            return Ok(AdministratorCredentials::local());
        }

        if credentials.keytab.is_none() {
            if let Some(path) = self.admin_keytab.as_ref().or(file.admin.keytab_path.as_ref()) {
                credentials.keytab = Some(read_keytab(path)?);
            }
        }

        if credentials.keytab.is_none() && credentials.password.is_none() {
            credentials.password = admin_password(
                credentials.principal.as_deref().unwrap_or_default(),
                self.non_interactive,
            )?;
        }
        Ok(credentials)
    }
}

fn read_keytab(path: &Path) -> Result<Zeroizing<Vec<u8>>> {
    let bytes = kadmin_fs::read_secret_file(path, constants::MAX_KEYTAB_SIZE)
        .with_context(|| format!("read admin keytab {}", path.display()))?;
    Ok(Zeroizing::new(bytes))
}

/// Environment first, then an interactive prompt. Non-interactive runs without
/// a password fall back to the caller's ticket cache.
fn admin_password(principal: &str, non_interactive: bool) -> Result<Option<Zeroizing<String>>> {
    if let Ok(password) = std::env::var(ADMIN_PASSWORD_ENV) {
        if !password.is_empty() {
            return Ok(Some(Zeroizing::new(password)));
        }
    }
    if non_interactive {
        return Ok(None);
    }
    let password = Password::new()
        .with_prompt(format!("Password for {}", principal))
        .allow_empty_password(true)
        .interact()
        .context("read administrator password from prompt")?;
    if password.is_empty() {
        return Ok(None);
    }
    Ok(Some(Zeroizing::new(password)))
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_env("KADMIN_VAULT_LOG").unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check whether a principal exists
    Exists(principal::PrincipalArgs),
    /// Create a principal and print its key number
    Create(principal::CreateArgs),
    /// Set a principal's password and print its new key number
    SetPassword(principal::SetPasswordArgs),
    /// Delete a principal
    Delete(principal::PrincipalArgs),
    /// Print a principal's current key version number
    Keyno(principal::PrincipalArgs),
    /// Diagnose kadmin installation and configuration (safe, read-only)
    Doctor(doctor::DoctorArgs),
}

impl Commands {
    /// Command name for error messages.
    pub fn name(&self) -> &str {
        match self {
            Commands::Exists(_) => "exists",
            Commands::Create(_) => "create",
            Commands::SetPassword(_) => "set-password",
            Commands::Delete(_) => "delete",
            Commands::Keyno(_) => "keyno",
            Commands::Doctor(_) => "doctor",
        }
    }
}
