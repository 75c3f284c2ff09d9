use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand};
use serde::Deserialize;

#[derive(Subcommand)]
pub enum TxCommand {
    /// Submit a transaction to a running node
    Add(AddArgs),
}

#[derive(Args)]
pub struct AddArgs {
    /// Node to submit the transaction to, e.g. http://127.0.0.1:8080
    #[arg(long, default_value = "http://127.0.0.1:8080")]
    node: String,

    #[arg(long)]
    from: obscura_core::Account,

    #[arg(long)]
    to: obscura_core::Account,

    #[arg(long)]
    value: u64,

    #[arg(long, default_value = "")]
    data: String,
}

#[derive(Deserialize)]
struct TxAddResponse {
    success: bool,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

pub async fn run(cmd: TxCommand) -> Result<()> {
    match cmd {
        TxCommand::Add(args) => add(args).await,
    }
}

async fn add(args: AddArgs) -> Result<()> {
    let from_pwd = rpassword::prompt_password(format!("Password for {}: ", args.from.to_checksum()))
        .context("failed to read password")?;

    let body = serde_json::json!({
        "from": args.from.to_checksum(),
        "from_pwd": from_pwd,
        "to": args.to.to_checksum(),
        "value": args.value,
        "data": args.data,
    });

    let client = reqwest::Client::new();
    let res = client
        .post(format!("{}/tx/add", args.node))
        .json(&body)
        .send()
        .await
        .context("request to node failed")?;

    if !res.status().is_success() {
        let err: ErrorBody = res.json().await.context("malformed error response")?;
        bail!("node rejected transaction: {}", err.error);
    }

    let parsed: TxAddResponse = res.json().await.context("malformed response")?;
    if parsed.success {
        println!("TX successfully submitted.");
    } else {
        bail!("node reported failure adding transaction");
    }
    Ok(())
}
