//! `flightdesk` - CLI for the flight record service
//!
//! This binary runs the HTTP API and offers a few maintenance commands
//! around configuration and the database.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::sync::Arc;

use clap::Parser;

use flightdesk::cli::{Cli, Command, ConfigCommand, ServeCommand};
use flightdesk::{api, init_logging, Config, FlightService, FlightStore, Storage};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let mut config = Config::load_from(cli.config.clone())?;

    // Execute the command
    match cli.command {
        Command::Serve(serve_cmd) => handle_serve(&mut config, &serve_cmd).await,
        Command::Status(status_cmd) => handle_status(&config, status_cmd.json).await,
        Command::Config(config_cmd) => handle_config(&config, config_cmd),
    }
}

async fn handle_serve(
    config: &mut Config,
    cmd: &ServeCommand,
) -> Result<(), Box<dyn std::error::Error>> {
    cmd.apply(config);
    config.validate()?;

    let storage = Storage::open(config.database_path())?;
    tracing::info!(path = %storage.path().display(), "database opened");

    let service = FlightService::new(Arc::new(storage));
    api::serve(config, service).await?;
    Ok(())
}

async fn handle_status(config: &Config, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let path = config.database_path();
    let flights = if path.exists() {
        Some(Storage::open(&path)?.count().await?)
    } else {
        None
    };

    if json {
        let status = serde_json::json!({
            "database_path": path,
            "database_exists": flights.is_some(),
            "flights": flights.unwrap_or(0),
            "listen": config.bind_address(),
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("flightdesk status");
        println!("-----------------");
        println!("Database:      {}", path.display());
        match flights {
            Some(count) => println!("Flights:       {count}"),
            None => println!("Flights:       (database not created yet)"),
        }
        println!("Listen:        {}", config.bind_address());
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Server]");
                println!("  Listen:             {}", config.bind_address());
                println!(
                    "  Base URL:           {}",
                    config.server.base_url.as_deref().unwrap_or("(relative links)")
                );
                if config.server.cors_origins.is_empty() {
                    println!("  CORS origins:       any");
                } else {
                    println!(
                        "  CORS origins:       {}",
                        config.server.cors_origins.join(", ")
                    );
                }
                println!();
                println!("[Storage]");
                println!("  Database path:      {}", config.database_path().display());
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
