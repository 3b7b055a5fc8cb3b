use crate::cli::{CliContext, Commands};
use crate::constants;
use crate::util::privilege;
use anyhow::{bail, Context, Result};
use clap::Args;
use dialoguer::Password;
use rand::{distributions::Alphanumeric, rngs::OsRng, Rng};
use serde::Serialize;
use std::io::Read;
use zeroize::Zeroizing;

#[derive(Args, Debug)]
pub struct PrincipalArgs {
    /// Principal name, e.g. HTTP/web01.example.com@EXAMPLE.COM
    pub principal: String,
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Principal name
    pub principal: String,

    /// Read the new password from stdin instead of interactive prompt
    #[arg(long, conflicts_with = "auto")]
    pub from_stdin: bool,

    /// Auto-generate a random password
    #[arg(long)]
    pub auto: bool,

    /// Length for auto-generated password
    #[arg(long, default_value_t = constants::DEFAULT_PASSWORD_LENGTH)]
    pub length: usize,

    /// Mark the principal as a service principal
    #[arg(long)]
    pub service: bool,
}

#[derive(Args, Debug)]
pub struct SetPasswordArgs {
    /// Principal name
    pub principal: String,

    /// Read the new password from stdin instead of interactive prompt
    #[arg(long, conflicts_with = "auto")]
    pub from_stdin: bool,

    /// Auto-generate a random password
    #[arg(long)]
    pub auto: bool,

    /// Length for auto-generated password
    #[arg(long, default_value_t = constants::DEFAULT_PASSWORD_LENGTH)]
    pub length: usize,
}

#[derive(Serialize, Default)]
struct Report<'a> {
    action: &'a str,
    principal: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    key_number: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    exists: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    removed: Option<bool>,
}

pub fn run(ctx: &CliContext, command: Commands) -> Result<()> {
    if ctx.credentials.is_local() {
        privilege::require_root(command.name())?;
    }

    let mut manager = ctx.open_manager()?;
    let outcome = match &command {
        Commands::Exists(args) => {
            let exists = manager.principal_exists(&args.principal)?;
            let report = Report {
                action: "exists",
                principal: &args.principal,
                exists: Some(exists),
                ..Default::default()
            };
            print_report(ctx, report, || {
                if exists {
                    format!("{}: exists", args.principal)
                } else {
                    format!("{}: not found", args.principal)
                }
            })
        }
        Commands::Create(args) => {
            let password =
                new_password(ctx, &args.principal, args.from_stdin, args.auto, args.length)?;
            let key_number = manager.create_principal(&args.principal, &password, args.service)?;
            let report = Report {
                action: "create",
                principal: &args.principal,
                key_number: Some(key_number),
                ..Default::default()
            };
            print_report(ctx, report, || {
                format!("Created {} (kvno {})", args.principal, key_number)
            })
        }
        Commands::SetPassword(args) => {
            let password =
                new_password(ctx, &args.principal, args.from_stdin, args.auto, args.length)?;
            let key_number = manager.set_principal_password(&args.principal, &password)?;
            let report = Report {
                action: "set-password",
                principal: &args.principal,
                key_number: Some(key_number),
                ..Default::default()
            };
            print_report(ctx, report, || {
                format!("Updated password for {} (kvno {})", args.principal, key_number)
            })
        }
        Commands::Delete(args) => {
            let removed = manager.remove_principal(&args.principal)?;
            let report = Report {
                action: "delete",
                principal: &args.principal,
                removed: Some(removed),
                ..Default::default()
            };
            print_report(ctx, report, || {
                if removed {
                    format!("Deleted {}", args.principal)
                } else {
                    format!("{}: does not exist", args.principal)
                }
            })
        }
        Commands::Keyno(args) => {
            let key_number = manager.key_number(&args.principal)?;
            let report = Report {
                action: "keyno",
                principal: &args.principal,
                key_number: Some(key_number),
                ..Default::default()
            };
            print_report(ctx, report, || key_number.to_string())
        }
        Commands::Doctor(_) => bail!("doctor does not operate on principals"),
    };
    manager.close();
    outcome
}

fn print_report(ctx: &CliContext, report: Report<'_>, text: impl FnOnce() -> String) -> Result<()> {
    if ctx.json {
        let json = serde_json::to_string_pretty(&report).context("serialize report")?;
        println!("{}", json);
    } else {
        println!("{}", text());
    }
    Ok(())
}

fn new_password(
    ctx: &CliContext,
    principal: &str,
    from_stdin: bool,
    auto: bool,
    length: usize,
) -> Result<Zeroizing<String>> {
    if auto {
        if length == 0 {
            bail!("--length must be greater than zero");
        }
        return Ok(Zeroizing::new(generate_password(length)));
    }
    // Non-interactive mode requires --from-stdin or --auto
    if ctx.non_interactive && !from_stdin {
        bail!("--non-interactive requires --from-stdin or --auto");
    }
    read_password(from_stdin, principal)
}

fn read_password(from_stdin: bool, principal: &str) -> Result<Zeroizing<String>> {
    let password = if from_stdin {
        let mut buf = Zeroizing::new(String::new());
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("read password from stdin")?;
        Zeroizing::new(buf.trim_end_matches(['\r', '\n']).to_string())
    } else {
        Zeroizing::new(
            Password::new()
                .with_prompt(format!("New password for {}", principal))
                .with_confirmation("Confirm password", "Passwords do not match")
                .allow_empty_password(false)
                .interact()
                .context("read password from prompt")?,
        )
    };
    if password.is_empty() {
        bail!("password cannot be empty");
    }
    Ok(password)
}

fn generate_password(length: usize) -> String {
    OsRng
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}
