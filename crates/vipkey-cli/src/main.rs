mod config;

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use console::style;
use tracing_subscriber::{fmt, EnvFilter};

use vipkey_core::{AuthConfigSource, Event, Notifier};

use crate::config::AppConfig;

const EXIT_FAILURE: i32 = 1;

/// VIP Key utilities: chat notifications and the auth-config debug endpoint.
#[derive(Parser)]
#[command(name = "vipkey", version, about)]
struct Cli {
    /// Path to TOML config file. Environment variables override its values.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the debug HTTP server.
    Serve {
        /// Listen address (e.g. 0.0.0.0:8080). Overrides config and LISTEN_ADDR.
        #[arg(short, long)]
        listen: Option<SocketAddr>,
    },
    /// Send a test "order created" notification to the primary webhook.
    Ping,
    /// Send a notification described as JSON, e.g.
    /// '{"kind":"coupon_used","code":"TET","uid":"U1","discount":10,"period":"7d"}'.
    Notify {
        /// Event JSON with a `kind` tag.
        event: String,
    },
    /// Print the redacted authorization config summary.
    AuthConfig,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match AppConfig::load(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            init_tracing("pretty", "info");
            tracing::error!("{}", e);
            std::process::exit(EXIT_FAILURE);
        }
    };

    match cli.command {
        Commands::Serve { listen } => {
            init_tracing(&config.server.log_format, "info");
            if let Some(ref path) = cli.config {
                tracing::info!(path = %path.display(), "Loaded config file");
            }
            run_serve(config, listen).await;
        }
        Commands::Ping => {
            init_tracing(&config.server.log_format, "warn");
            let event = Event::OrderCreated {
                uid: "TEST123456".into(),
                timestamp: None,
            };
            run_notify(&config, event).await;
        }
        Commands::Notify { event } => {
            init_tracing(&config.server.log_format, "warn");
            let event = match parse_event(&event) {
                Ok(ev) => ev,
                Err(e) => {
                    eprintln!("{} {}", style("error:").red().bold(), e);
                    std::process::exit(EXIT_FAILURE);
                }
            };
            run_notify(&config, event).await;
        }
        Commands::AuthConfig => {
            init_tracing(&config.server.log_format, "warn");
            run_auth_config(&config);
        }
    }
}

async fn run_serve(config: AppConfig, listen_override: Option<SocketAddr>) {
    let listen = listen_override.unwrap_or(config.server.listen);
    let state = vipkey_api::state::AppState::new(config.auth.file.clone());

    tracing::info!(%listen, auth_file = %config.auth.file.display(), "Starting VIP Key debug server");
    if let Err(e) = vipkey_api::serve(listen, state).await {
        tracing::error!(error = %e, "Server failed");
        std::process::exit(EXIT_FAILURE);
    }

    tracing::info!("Shutdown complete");
}

fn parse_event(json: &str) -> Result<Event, String> {
    serde_json::from_str(json).map_err(|e| format!("invalid event JSON: {}", e))
}

async fn run_notify(config: &AppConfig, event: Event) {
    let notifier = match config.notifier_config().and_then(|c| {
        Notifier::new(c).map_err(|e| format!("Failed to build HTTP client: {}", e))
    }) {
        Ok(n) => n,
        Err(e) => {
            eprintln!("{} {}", style("error:").red().bold(), e);
            std::process::exit(EXIT_FAILURE);
        }
    };

    let destination = event.destination();
    if notifier.notify(&event).await {
        println!(
            "{} {} sent to {} webhook",
            style("✓").green().bold(),
            style(event.kind()).bold(),
            destination
        );
    } else {
        eprintln!(
            "{} {} was not delivered to {} webhook (see log output)",
            style("✗").red().bold(),
            style(event.kind()).bold(),
            destination
        );
        std::process::exit(EXIT_FAILURE);
    }
}

fn run_auth_config(config: &AppConfig) {
    let summary = AuthConfigSource::new(config.auth.file.clone()).describe();
    match serde_json::to_string_pretty(&summary) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("{} {}", style("error:").red().bold(), e);
            std::process::exit(EXIT_FAILURE);
        }
    }
}

fn init_tracing(log_format: &str, default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    match log_format {
        "json" => {
            fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .json()
                .init();
        }
        _ => {
            fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}
