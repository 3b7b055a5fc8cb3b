use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = kadmin_vault::cli::Cli::parse();
    cli.run()
}
