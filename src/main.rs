mod geo;
mod remote;
mod tracker;
mod web;

use clap::{Parser, Subcommand};
use env_logger::{Builder, Env};
use std::process::ExitCode;
use std::time::Duration;

use crate::remote::RideRef;
use crate::web::Config;

const STATUS_REFRESH: Duration = Duration::from_secs(1);

#[derive(Parser)]
#[command(name = "ride-tracker")]
#[command(about = "Live driver tracking for rideshare pickups")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the tracking HTTP API
    Serve {
        #[arg(short, long)]
        config: String,
    },
    /// Track one ride in the foreground, printing status changes as JSON
    Track {
        #[arg(short, long)]
        config: String,
        #[arg(long)]
        ride: String,
        #[arg(long)]
        rider: String,
    },
    /// Decode an encoded polyline into coordinates
    Decode { points: String },
}

#[tokio::main]
async fn main() -> ExitCode {
    Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { config } => serve(&config).await,
        Commands::Track {
            config,
            ride,
            rider,
        } => track(&config, RideRef::new(ride, rider)).await,
        Commands::Decode { points } => decode(&points),
    }
}

fn load_config(path: &str) -> Option<Config> {
    match Config::from_file(path) {
        Ok(config) => Some(config),
        Err(e) => {
            eprintln!("Error loading config {}: {}", path, e);
            None
        }
    }
}

async fn serve(path: &str) -> ExitCode {
    let Some(config) = load_config(path) else {
        return ExitCode::FAILURE;
    };
    let tracker = match config.build_tracker() {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Error creating tracker: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match web::run_server(&config.web.bind, tracker).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Server error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn track(path: &str, ride: RideRef) -> ExitCode {
    let Some(config) = load_config(path) else {
        return ExitCode::FAILURE;
    };
    let mut tracker = match config.build_tracker() {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Error creating tracker: {}", e);
            return ExitCode::FAILURE;
        }
    };

    tracker.start(ride).await;

    let mut refresh = tokio::time::interval(STATUS_REFRESH);
    let mut last = None;
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            _ = refresh.tick() => {
                let status = tracker.status();
                if last.as_ref() != Some(&status) {
                    match serde_json::to_string(&status) {
                        Ok(json) => println!("{}", json),
                        Err(e) => log::error!("Failed to serialize status: {}", e),
                    }
                    last = Some(status);
                }
            }
        }
    }

    tracker.stop().await;
    ExitCode::SUCCESS
}

fn decode(points: &str) -> ExitCode {
    let coordinates = match geo::decode_polyline(points) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Invalid polyline: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match serde_json::to_string_pretty(&coordinates) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
