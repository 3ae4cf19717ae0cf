//! AML Oracle - Main entry point
//!
//! # Usage
//! ```bash
//! aml-oracle serve                        # configuration from environment
//! aml-oracle serve --config oracle.json   # configuration from file (key still from ORACLE_PRIVKEY)
//! aml-oracle serve --no-scheduler         # admin API only
//! aml-oracle keygen                       # new oracle key
//! aml-oracle pubkey                       # public key of ORACLE_PRIVKEY
//! ```

use aml_oracle_api::create_router;
use aml_oracle_node::config::ENV_ORACLE_PRIVKEY;
use aml_oracle_node::{init_logging, OracleConfig, OracleContext};
use aml_oracle_signer::SigningService;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "aml-oracle")]
#[command(author, version, about = "AML Oracle - compliance verdicts for on-chain transfers", long_about = None)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the polling scheduler and the admin API
    Serve {
        /// JSON configuration file (defaults to environment variables)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Serve the admin API without polling for pending transfers
        #[arg(long)]
        no_scheduler: bool,
    },

    /// Generate a new oracle private key
    Keygen {
        /// Address prefix for the derived account
        #[arg(long, default_value = "wasm")]
        prefix: String,
    },

    /// Print the public key and address of ORACLE_PRIVKEY
    Pubkey {
        /// Address prefix for the derived account
        #[arg(long, default_value = "wasm")]
        prefix: String,
    },
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    match cli.command {
        Commands::Serve { config, no_scheduler } => serve(config, no_scheduler).await,
        Commands::Keygen { prefix } => {
            let secret = SigningService::generate_secret_hex();
            let signer = SigningService::from_hex(&secret)?;
            println!("🔑 Generated oracle key");
            println!("   {}={}", ENV_ORACLE_PRIVKEY, secret);
            println!("   pubkey:  {}", signer.public_key_base64());
            println!("   address: {}", signer.account_id(&prefix)?);
            println!();
            println!("⚠️  Store the private key securely and register the pubkey with the contract.");
            Ok(())
        }
        Commands::Pubkey { prefix } => {
            let secret = std::env::var(ENV_ORACLE_PRIVKEY)
                .with_context(|| format!("{} is not set", ENV_ORACLE_PRIVKEY))?;
            let signer = SigningService::from_hex(&secret)?;
            println!("pubkey:  {}", signer.public_key_base64());
            println!("address: {}", signer.account_id(&prefix)?);
            Ok(())
        }
    }
}

async fn serve(config_path: Option<PathBuf>, no_scheduler: bool) -> Result<()> {
    info!("AML Oracle v{}", env!("CARGO_PKG_VERSION"));

    let config = match &config_path {
        Some(path) => OracleConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {:?}", path))?,
        None => OracleConfig::from_env().context("Failed to load config from environment")?,
    };
    info!(config = ?config, "Loaded configuration");

    let ctx = OracleContext::init(config).await?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let scheduler = if no_scheduler {
        info!("Scheduler disabled, serving admin API only");
        None
    } else {
        let scheduler = Arc::new(ctx.scheduler());
        Some(tokio::spawn(scheduler.run(shutdown_rx)))
    };

    let app = create_router(ctx.app_state()?);
    let listener = tokio::net::TcpListener::bind(&ctx.config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", ctx.config.bind_addr))?;
    info!(addr = %listener.local_addr()?, "Admin API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown_tx))
        .await
        .context("Admin API server failed")?;

    if let Some(handle) = scheduler {
        handle.await.context("Scheduler task panicked")?;
    }

    info!("AML Oracle stopped");
    Ok(())
}

async fn shutdown_signal(shutdown: watch::Sender<bool>) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
    let _ = shutdown.send(true);
}
