//! Command Line Interface for the swap monitor.
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use dotenv::dotenv;
use std::io;
use std::path::PathBuf;
use swap_monitor_execution::monitor::{MonitorConfig, RowSink, SwapMonitor, TimeDisplay};
use swap_monitor_execution::sync::SwapListener;
use swap_monitor_protocols::feed::{EthersSwapFeed, FeedConfig};
use tokio::sync::mpsc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod config;
mod render;
mod summary;

use config::{FileConfig, Overrides, Settings};
use render::{JsonRenderer, TableRenderer};

/// Feed events buffered between the chain task and the table.
const FEED_BUFFER: usize = 1024;

#[derive(Parser)]
#[command(name = "swap-monitor")]
#[command(about = "Live terminal monitor for constant-product pool swaps", long_about = None)]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args)]
struct CommonArgs {
    /// JSON config file (defaults to ./config.json when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Node endpoint (ws://, wss://, http:// or https://)
    #[arg(long, env = "NODE_PROVIDER_URL", global = true, hide_env_values = true)]
    rpc_url: Option<String>,

    /// Pair contract address
    #[arg(short, long, env = "POOL_ADDRESS", global = true)]
    pool: Option<String>,

    /// Symbol whose acquisition is shown as favorable
    #[arg(long, env = "PRIMARY_SYMBOL", global = true)]
    primary: Option<String>,

    /// Disable coloured output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Stream swaps as a live table (default)
    Watch(WatchArgs),
    /// Print pool metadata and the liquidity snapshot once
    Snapshot,
}

#[derive(Args, Default)]
struct WatchArgs {
    /// Read the liquidity snapshot and keep a running reserve estimate
    #[arg(long)]
    track_reserves: bool,

    /// Show times in UTC instead of local time
    #[arg(long)]
    utc: bool,

    /// Emit one JSON object per swap instead of the table
    #[arg(long)]
    json: bool,

    /// Consecutive failed connections before giving up (0 retries forever)
    #[arg(long)]
    max_attempts: Option<u32>,

    /// Skip block timestamp lookups and use arrival time
    #[arg(long)]
    no_block_times: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let color = !cli.common.no_color && std::env::var_os("NO_COLOR").is_none();
    if !color {
        colored::control::set_override(false);
    }

    let command = cli.command.unwrap_or(Commands::Watch(WatchArgs::default()));
    let max_attempts = match &command {
        Commands::Watch(args) => args.max_attempts,
        Commands::Snapshot => None,
    };

    let file = FileConfig::load(cli.common.config.as_deref())?;
    let settings = Settings::resolve(
        file,
        Overrides {
            rpc_url: cli.common.rpc_url,
            pool_address: cli.common.pool,
            primary_symbol: cli.common.primary,
            max_attempts,
        },
    )?;

    match command {
        Commands::Watch(args) => watch(settings, args, color).await,
        Commands::Snapshot => snapshot(settings).await,
    }
}

fn feed_config(settings: &Settings) -> FeedConfig {
    let mut config = FeedConfig::new(settings.endpoint.clone(), settings.pool_address.clone());
    config.burn_addresses = settings.burn_addresses.clone();
    config
}

async fn watch(settings: Settings, args: WatchArgs, color: bool) -> Result<()> {
    let mut feed = feed_config(&settings);
    feed.with_snapshot = args.track_reserves;
    feed.block_times = !args.no_block_times;

    let listener = SwapListener::new(EthersSwapFeed::new(feed), settings.reconnect);
    let (tx, rx) = mpsc::channel(FEED_BUFFER);

    let mut monitor = SwapMonitor::new(MonitorConfig {
        primary: settings.primary,
        track_reserves: args.track_reserves,
        time_display: if args.utc {
            TimeDisplay::Utc
        } else {
            TimeDisplay::Local
        },
    });

    let mut sink: Box<dyn RowSink> = if args.json {
        Box::new(JsonRenderer::new(io::stdout()))
    } else {
        Box::new(TableRenderer::new(io::stdout(), color).with_spot(args.track_reserves))
    };

    let listener_task = tokio::spawn(async move { listener.run(tx).await });
    let consumer = monitor.run(rx, sink.as_mut());

    tokio::select! {
        stats = consumer => {
            info!(processed = stats.processed, skipped = stats.skipped, "Monitor stopped");
            // The feed only closes once the listener has returned.
            match listener_task.await.context("Listener task failed")? {
                Ok(()) => Ok(()),
                Err(e) => {
                    error!(error = %e, "Giving up on the swap feed");
                    Err(e).context("Swap feed stopped")
                }
            }
        }
        signal = tokio::signal::ctrl_c() => {
            signal.context("Failed to listen for Ctrl-C")?;
            info!("Interrupted, shutting down");
            Ok(())
        }
    }
}

async fn snapshot(settings: Settings) -> Result<()> {
    let feed = EthersSwapFeed::new(feed_config(&settings));
    let (pool, snapshot) = feed
        .inspect()
        .await
        .context("Failed to read pool state")?;

    let table = summary::snapshot_table(&pool, &snapshot).context("Failed to value the pool")?;
    table.printstd();
    Ok(())
}
