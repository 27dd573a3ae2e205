//! Car rental service CLI
//!
//! Headless launcher suitable for a systemd unit or a container.
//!
//! ```sh
//! # Run with default config (~/.config/car-rental/config.toml)
//! rental-service
//!
//! # Custom config path
//! rental-service --config /etc/car-rental/config.toml
//!
//! # Validate config without starting
//! rental-service --check
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};

use car_rental::config::AppConfig;
use car_rental::server::{init_tracing, ServerHandle, ServerOptions};

/// Car rental backend: fleet, reservations, rentals and payments.
#[derive(Parser, Debug)]
#[command(
    name = "rental-service",
    version,
    about = "Car rental REST API server",
    long_about = "Car rental REST API server with JWT authentication, \
                  Swagger UI and Prometheus metrics.\n\n\
                  Default config: ~/.config/car-rental/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "RENTAL_CONFIG")]
    config: Option<PathBuf>,

    /// Override the REST API listen port.
    #[arg(long)]
    api_port: Option<u16>,

    /// Override the database URL.
    #[arg(long)]
    database_url: Option<String>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Validate the configuration file and exit without starting the server.
    #[arg(long)]
    check: bool,

    /// Skip database migrations on startup.
    #[arg(long)]
    no_migrate: bool,

    /// Skip creating the default admin user.
    #[arg(long)]
    no_admin: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(car_rental::default_config_path);

    let (mut config, load_error) = match AppConfig::load(&config_path) {
        Ok(cfg) => (cfg, None),
        Err(e) if cli.check => {
            eprintln!("❌ Invalid configuration in {}: {}", config_path.display(), e);
            std::process::exit(1);
        }
        Err(e) => (AppConfig::default(), Some(e)),
    };

    if let Some(ref level) = cli.log_level {
        config.logging.level = level.clone();
    }
    if let Some(port) = cli.api_port {
        config.server.api_port = port;
    }
    if let Some(ref url) = cli.database_url {
        config.database.url = url.clone();
    }

    if cli.check {
        if let Err(e) = config.validate() {
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
        println!("✅ Configuration is valid");
        println!("   Config file : {}", config_path.display());
        println!("   API address : {}", config.server.address());
        println!("   Database    : {}", config.database.connection_url());
        println!("   Log level   : {} ({})", config.logging.level, config.logging.format);
        println!("   Op timeout  : {}ms", config.booking.operation_timeout_ms);
        println!(
            "   Pricing     : weekly -{} monthly -{} late fee {}/day",
            config.pricing.weekly_discount,
            config.pricing.monthly_discount,
            config.pricing.late_fee_per_day
        );
        return Ok(());
    }

    init_tracing(&config);
    match load_error {
        None => info!("Configuration loaded from {}", config_path.display()),
        Some(e) => {
            error!("Failed to load config from {}: {}", config_path.display(), e);
            error!("Using default configuration.");
        }
    }
    run(config, &cli).await
}

async fn run(config: AppConfig, cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let handle = ServerHandle::start(ServerOptions {
        config,
        auto_migrate: !cli.no_migrate,
        create_default_admin: !cli.no_admin,
    })
    .await?;

    handle.install_signal_handler();
    info!("🚀 Press Ctrl+C to shutdown gracefully.");

    handle.shutdown_signal().wait().await;
    handle.wait().await;

    Ok(())
}
