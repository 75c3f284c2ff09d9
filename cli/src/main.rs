mod commands;

use clap::{Parser, Subcommand};

use commands::{balances::BalancesCommand, node::RunArgs, tx::TxCommand, wallet::WalletCommand};

#[derive(Parser)]
#[command(name = "obscura")]
#[command(about = "Obscura blockchain CLI", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a full node: HTTP API, mining, and peer sync
    Node {
        #[command(subcommand)]
        command: NodeCommand,
    },
    /// Manage keystore accounts
    Wallet {
        #[command(subcommand)]
        command: WalletCommand,
    },
    /// Submit transactions to a running node
    Tx {
        #[command(subcommand)]
        command: TxCommand,
    },
    /// Query account balances from a running node
    Balances {
        #[command(subcommand)]
        command: BalancesCommand,
    },
    /// Print the CLI version
    Version,
}

#[derive(Subcommand)]
enum NodeCommand {
    Run(RunArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Node { command: NodeCommand::Run(args) } => commands::node::run(args).await?,
        Commands::Wallet { command } => commands::wallet::run(command)?,
        Commands::Tx { command } => commands::tx::run(command).await?,
        Commands::Balances { command } => commands::balances::run(command).await?,
        Commands::Version => commands::version::run(),
    }
    Ok(())
}
