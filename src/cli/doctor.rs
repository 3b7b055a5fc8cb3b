//! Diagnostics for kadmin installation and automation readiness.

use crate::cli::CliContext;
use crate::constants;
use crate::models::credential::AdminAuth;
use crate::models::handler_config::HandlerConfig;
use crate::util::privilege;
use crate::util::resolver::ExecutableResolver;
use anyhow::Result;
use clap::Args;

#[derive(Args, Debug)]
pub struct DoctorArgs {
    /// Also list every search-path directory that was checked
    #[arg(long)]
    pub paths: bool,
}

pub fn run(ctx: &CliContext, args: DoctorArgs) -> Result<()> {
    let config = HandlerConfig::from_map(ctx.realm.as_deref(), Some(&ctx.configuration));
    let resolver = ExecutableResolver::new(config.executable_search_paths.clone());
    let mut ok = 0u32;
    let mut warn = 0u32;
    let mut fail = 0u32;

    println!("Doctor: kadmin-vault");

    match &ctx.config_path {
        Some(path) if path.is_file() => {
            println!("  [PASS] config file: {}", path.display());
            ok += 1;
        }
        Some(path) => {
            println!("  [WARN] config file missing: {} (using defaults)", path.display());
            warn += 1;
        }
        None => println!("  [INFO] no config file given"),
    }

    let auth = ctx.credentials.auth();
    let required = match auth {
        AdminAuth::Local => constants::KADMIN_LOCAL,
        _ => constants::KADMIN,
    };
    match auth {
        AdminAuth::Local => println!("  [INFO] mode: local (kadmin.local)"),
        AdminAuth::Password { principal, .. } => {
            println!("  [INFO] mode: remote, password auth as {}", principal)
        }
        AdminAuth::Keytab { principal, keytab } => println!(
            "  [INFO] mode: remote, keytab auth as {} ({} bytes)",
            principal,
            keytab.len()
        ),
        AdminAuth::TicketCache { principal } => {
            println!("  [INFO] mode: remote, ticket cache as {}", principal)
        }
    }

    for name in [constants::KADMIN, constants::KADMIN_LOCAL] {
        match resolver.resolve(name) {
            Ok(path) => {
                println!("  [PASS] {} found: {}", name, path.display());
                ok += 1;
            }
            Err(e) if name == required => {
                println!("  [FAIL] {}", e);
                fail += 1;
            }
            Err(e) => {
                println!("  [WARN] {}", e);
                warn += 1;
            }
        }
    }

    if matches!(auth, AdminAuth::Local) && !privilege::is_root() {
        println!("  [WARN] local mode needs root; run with sudo or pass --admin-principal");
        warn += 1;
    }

    match &config.default_realm {
        Some(realm) => {
            println!("  [PASS] default realm: {}", realm);
            ok += 1;
        }
        None => {
            println!("  [WARN] no default realm; kadmin will use krb5.conf default_realm");
            warn += 1;
        }
    }

    if let Some(host) = &config.admin_server_host {
        println!("  [INFO] admin server: {}", host);
    }
    if !config.key_encryption_types.is_empty() {
        let types: Vec<&str> = config.key_encryption_types.iter().map(String::as_str).collect();
        println!("  [INFO] encryption types: {}", types.join(" "));
    }

    if args.paths {
        println!("  [INFO] executable search paths:");
        for dir in resolver.search_paths() {
            println!("    - {}", dir.display());
        }
    }

    // Summary
    println!();
    println!("Doctor summary: {} pass, {} warn, {} fail", ok, warn, fail);
    if fail > 0 {
        std::process::exit(1);
    }
    Ok(())
}
