use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tokio_util::sync::CancellationToken;
use tracing::info;

use obscura_network::{KnownPeer, Node, NodeConfigBuilder};

#[derive(Args)]
pub struct RunArgs {
    /// Directory holding the block log and genesis file
    #[arg(long, value_name = "DIR")]
    data_dir: PathBuf,

    /// Directory holding this node's keystore files (for /tx/add)
    #[arg(long, value_name = "DIR")]
    keystore_dir: PathBuf,

    /// Address this node's miner reward is credited to
    #[arg(long)]
    miner: obscura_core::Account,

    /// IP address to bind and advertise to peers
    #[arg(long, default_value = "127.0.0.1")]
    ip: String,

    /// Port to listen on
    #[arg(long, default_value_t = 8080)]
    port: u16,

    /// Bootstrap peer, as `ip:port`. May be repeated.
    #[arg(long = "bootstrap", value_name = "IP:PORT")]
    bootstrap_peers: Vec<String>,
}

pub async fn run(args: RunArgs) -> Result<()> {
    let mut builder = NodeConfigBuilder::new(args.data_dir, args.miner).bind(&args.ip, args.port);
    for raw in &args.bootstrap_peers {
        let (ip, port) = obscura_network::addr::split_peer_key(raw)
            .with_context(|| format!("bad bootstrap peer '{raw}', expected ip:port"))?;
        builder = builder.bootstrap_peer(KnownPeer::new(ip, port, true));
    }
    let config = builder.finish();

    let (node, synced_block_rx) = Node::open(config)?;
    let app = obscura_rpc::router(obscura_rpc::AppState::new(node.clone(), args.keystore_dir));

    let cancel = CancellationToken::new();

    let bind_addr: SocketAddr = format!("{}:{}", node.config.ip, node.config.port)
        .parse()
        .with_context(|| "invalid bind address")?;
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    info!(target: "obscura_cli::node", %bind_addr, "listening");

    let server_cancel = cancel.clone();
    let server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move { server_cancel.cancelled().await })
            .await
    });

    let mining = tokio::spawn(obscura_network::mining::run(node.clone(), cancel.clone()));
    let sync = tokio::spawn(obscura_network::sync::run(node.clone(), cancel.clone()));
    let listener_task = tokio::spawn(obscura_network::listener::run(
        node.clone(),
        synced_block_rx,
        cancel.clone(),
    ));

    tokio::signal::ctrl_c().await?;
    info!(target: "obscura_cli::node", "shutting down");
    cancel.cancel();

    let _ = tokio::join!(server, mining, sync, listener_task);
    Ok(())
}
