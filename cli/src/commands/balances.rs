use std::collections::HashMap;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use serde::Deserialize;

use obscura_core::{Account, Hash};

#[derive(Subcommand)]
pub enum BalancesCommand {
    /// Show all account balances known to a running node
    List(ListArgs),
}

#[derive(Args)]
pub struct ListArgs {
    /// Node to query, e.g. http://127.0.0.1:8080
    #[arg(long, default_value = "http://127.0.0.1:8080")]
    node: String,
}

#[derive(Deserialize)]
struct BalancesResponse {
    hash: Hash,
    balances: HashMap<Account, u64>,
}

pub async fn run(cmd: BalancesCommand) -> Result<()> {
    match cmd {
        BalancesCommand::List(args) => list(args).await,
    }
}

async fn list(args: ListArgs) -> Result<()> {
    let res: BalancesResponse = reqwest::get(format!("{}/balances/list", args.node))
        .await
        .context("request to node failed")?
        .json()
        .await
        .context("malformed response")?;

    println!("Account balances at {}:", res.hash);
    println!("__________________");
    println!();
    for (account, balance) in res.balances {
        println!("{account}: {balance}");
    }
    Ok(())
}
