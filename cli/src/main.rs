//! Freight quote service: CLI server
//!
//! ```sh
//! # Run with default config (~/.config/freight-quote/config.toml)
//! freight-quote
//!
//! # Custom config path and port
//! freight-quote --config /etc/freight-quote/config.toml --api-port 8080
//!
//! # Pre-deployment check: config + pending migrations
//! freight-quote --check
//!
//! # Also fail on security warnings (default secrets)
//! freight-quote --check --strict
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use freight_quote::config::AppConfig;
use freight_quote::server::{init_tracing, run_checks, ServerHandle, ServerOptions};

#[derive(Parser, Debug)]
#[command(
    name = "freight-quote",
    version,
    about = "Air and sea freight quotation service",
    long_about = "REST API for freight quotations in USD with versioned origin tariffs.\n\n\
                  Default config: ~/.config/freight-quote/config.toml"
)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "FREIGHT_CONFIG")]
    config: Option<PathBuf>,

    /// Override the REST API listen port.
    #[arg(long)]
    api_port: Option<u16>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Validate the configuration and database state, then exit.
    #[arg(long)]
    check: bool,

    /// With --check, treat security warnings as failures.
    #[arg(long, requires = "check")]
    strict: bool,

    /// Skip database migrations on startup.
    #[arg(long)]
    no_migrate: bool,

    /// Skip creating the default admin user.
    #[arg(long)]
    no_admin: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(freight_quote::default_config_path);

    let mut config = match AppConfig::load(&config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Some(port) = cli.api_port {
        config.server.api_port = port;
    }
    if let Some(ref level) = cli.log_level {
        config.logging.level = level.clone();
    }

    if cli.check {
        return check(&config, &config_path, cli.strict).await;
    }

    init_tracing(&config);
    info!("Configuration: {}", config_path.display());

    let report = config.validate();
    for warning in &report.warnings {
        tracing::warn!("{}", warning);
    }
    if !report.is_ok() {
        for problem in &report.errors {
            error!("{}", problem);
        }
        return ExitCode::FAILURE;
    }

    let handle = match ServerHandle::start(ServerOptions {
        config,
        auto_migrate: !cli.no_migrate,
        create_default_admin: !cli.no_admin,
    })
    .await
    {
        Ok(handle) => handle,
        Err(e) => {
            error!("Failed to start: {}", e);
            return ExitCode::FAILURE;
        }
    };

    handle.install_signal_handler();
    info!("Press Ctrl+C to shut down gracefully.");
    handle.wait().await;

    ExitCode::SUCCESS
}

async fn check(config: &AppConfig, config_path: &std::path::Path, strict: bool) -> ExitCode {
    println!("Config file : {}", config_path.display());
    println!("API address : {}:{}", config.server.api_host, config.server.api_port);
    println!("Database    : {}", config.database.url);

    let outcome = match run_checks(config).await {
        Ok(outcome) => outcome,
        Err(e) => {
            println!("ERROR: cannot open database: {}", e);
            return ExitCode::FAILURE;
        }
    };

    for problem in &outcome.report.errors {
        println!("ERROR: {}", problem);
    }
    for warning in &outcome.report.warnings {
        println!("WARNING: {}", warning);
    }
    if !outcome.pending_migrations.is_empty() {
        println!(
            "ERROR: {} unapplied migration(s): {}",
            outcome.pending_migrations.len(),
            outcome.pending_migrations.join(", ")
        );
        println!("       start the service without --no-migrate to apply them");
    }

    if outcome.passed(strict) {
        println!("OK: configuration is valid and the database is up to date");
        ExitCode::SUCCESS
    } else {
        if strict && outcome.report.is_ok() && outcome.pending_migrations.is_empty() {
            println!("Strict mode: resolve the warnings above before deploying");
        }
        ExitCode::FAILURE
    }
}
