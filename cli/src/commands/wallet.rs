use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

#[derive(Subcommand)]
pub enum WalletCommand {
    /// Create a new keystore-backed account
    NewAccount(NewAccountArgs),
}

#[derive(Args)]
pub struct NewAccountArgs {
    /// Directory to write the keystore file into
    #[arg(long, value_name = "DIR")]
    keystore_dir: PathBuf,
}

pub fn run(cmd: WalletCommand) -> Result<()> {
    match cmd {
        WalletCommand::NewAccount(args) => new_account(args),
    }
}

fn new_account(args: NewAccountArgs) -> Result<()> {
    let password = rpassword::prompt_password("Password to encrypt the new keystore file: ")
        .context("failed to read password")?;
    let confirm = rpassword::prompt_password("Confirm password: ")
        .context("failed to read password")?;
    if password != confirm {
        anyhow::bail!("passwords did not match");
    }

    let account = obscura_wallet::new_account(&args.keystore_dir, &password)?;
    println!("New account created: {}", account.to_checksum());
    Ok(())
}
