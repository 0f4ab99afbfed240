use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use flood_keeper::config::{create_example_config, example_config};
use flood_keeper::events::trigger_channel;
use flood_keeper::{
    is_fatal, GrpcBroadcaster, GrpcChainClient, Keeper, KeeperConfig, LocalSigner, SwapSubscription,
};

#[derive(Parser, Debug)]
#[command(name = "flood-keeper", version)]
#[command(about = "Rebalances delegated concentrated-liquidity positions on every pool swap")]
struct Args {
    /// Path to keeper configuration file
    #[arg(short, long, default_value = "keeper.toml")]
    config: String,

    /// Dry run mode - compute but don't submit transactions
    #[arg(long)]
    dry_run: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Log level, overrides --verbose
    #[arg(long)]
    log_level: Option<String>,

    /// Print an example configuration and exit
    #[arg(long)]
    print_example_config: bool,

    /// Write an example configuration to the --config path and exit
    #[arg(long)]
    init_config: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if args.print_example_config {
        println!("{}", example_config().to_toml()?);
        return Ok(());
    }

    if args.init_config {
        create_example_config(&args.config).with_context(|| format!("writing {}", args.config))?;
        println!("Wrote example configuration to {}", args.config);
        return Ok(());
    }

    let default_level = if args.verbose { "debug" } else { "info" };
    init_logging(args.log_level.as_deref().unwrap_or(default_level));

    info!("Starting Flood keeper");

    if args.dry_run {
        warn!("Running in DRY RUN mode - no transactions will be submitted");
    }

    // Load configuration
    let config = KeeperConfig::load(&args.config).with_context(|| format!("loading {}", args.config))?;
    info!(
        chain_id = %config.chain_id,
        contract = %config.power.contract_address,
        pool_id = config.power.pool_id,
        "Loaded configuration"
    );

    let signer = LocalSigner::from_file(&config.key_file)?;
    info!(signer = %config.signer_address, "Loaded signing key");
    debug!(signer = ?signer);

    let client = GrpcChainClient::connect(&config.grpc_address).await?;
    info!(endpoint = client.endpoint(), "Connected to chain");

    let broadcaster = GrpcBroadcaster::new(client.clone(), signer, &config.chain_id, config.gas.clone());
    let keeper = Keeper::new(Arc::new(client), Arc::new(broadcaster), config.clone(), args.dry_run);

    let subscription = SwapSubscription::new(&config.websocket_url()?, &config.event_query(), config.retry.clone());
    let (sender, mut receiver) = trigger_channel();
    let mut subscription_task = tokio::spawn(subscription.run(sender));

    let mut iteration = 0u64;

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Received shutdown signal");
                subscription_task.abort();
                break;
            }
            result = &mut subscription_task => {
                match result {
                    Ok(Ok(())) => {
                        info!("Event subscription ended");
                        break;
                    }
                    Ok(Err(e)) => return Err(e.into()),
                    Err(e) => return Err(anyhow!("event subscription task failed: {}", e)),
                }
            }
            Some(event) = receiver.recv() => {
                iteration += 1;
                debug!(iteration, height = ?event.height, "Starting keeper run");

                match keeper.handle_swap_event(&event).await {
                    Ok(report) => {
                        debug!(iteration, outcome = %report.outcome, "Keeper run finished");
                    }
                    Err(e) if is_fatal(&e, keeper.config().exit_on_query_error) => {
                        error!(iteration, class = %e.class(), error = %e, "Fatal error in keeper run");
                        subscription_task.abort();
                        return Err(e.into());
                    }
                    Err(e) => {
                        // keep listening for the next swap
                        error!(iteration, class = %e.class(), error = %e, "Keeper run failed");
                    }
                }
            }
        }
    }

    info!("Shutting down Flood keeper");
    Ok(())
}

fn init_logging(level: &str) {
    let level = level.parse().unwrap_or(tracing::Level::INFO);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("flood_keeper={level},flood_math={level},flood_types={level}").into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
