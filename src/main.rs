//! Pokegate CLI entry point.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use pokegate::domain::models::Config;
use pokegate::infrastructure::config::ConfigLoader;
use pokegate::infrastructure::mcp;

#[derive(Parser)]
#[command(name = "pokegate", version, about = "Pokemon data gateway")]
struct Cli {
    /// Path to a YAML config file (defaults to ./pokegate.yaml if present)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the gateway server
    Serve,
    /// Ping the cache store and upstream, then exit
    Check,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("configuration error: {err:#}");
            std::process::exit(2);
        }
    };

    init_tracing(&config);

    let result = match cli.command {
        Commands::Serve => mcp::start_server(config).await,
        Commands::Check => check(config).await,
    };

    if let Err(err) = result {
        tracing::error!("{err:#}");
        std::process::exit(1);
    }
}

fn load_config(path: Option<&str>) -> Result<Config> {
    match path {
        Some(path) => ConfigLoader::load_from_file(path),
        None => ConfigLoader::load(),
    }
}

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.logging.level.clone()));

    if config.logging.format == "pretty" {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

/// Probe both external collaborators and report reachability.
async fn check(config: Config) -> Result<()> {
    let state = mcp::build_state(&config).await?;
    let repository = state.dispatcher.repository();

    let cache_ok = repository.cache_reachable().await;
    let upstream_ok = repository.upstream_reachable().await;

    println!(
        "cache:    {}",
        if cache_ok { "ok" } else { "unreachable" }
    );
    println!(
        "upstream: {}",
        if upstream_ok { "ok" } else { "unreachable" }
    );

    if cache_ok && upstream_ok {
        Ok(())
    } else {
        anyhow::bail!("one or more collaborators unreachable")
    }
}
