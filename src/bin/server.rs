//! `erpsim` Server Binary
//!
//! Starts the simulation engine behind the HTTP API.
//!
//! ## Usage
//!
//! ```bash
//! # Start server with default settings (127.0.0.1:5000)
//! cargo run --bin erpsim-server
//!
//! # Custom address and config file
//! cargo run --bin erpsim-server -- --host 0.0.0.0 --port 8080 --config erpsim.toml
//! ```
//!
//! ## Logging
//!
//! - `ERPSIM_LOG` overrides `logging.level` (any `EnvFilter` directive)
//! - `ERPSIM_LOG_FILE` additionally writes logs to that file
//! - `logging.format = "json"` switches to JSON lines

use std::env;
use std::sync::{Arc, OnceLock};

use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

use erpsim::config::LoggingConfig;
use erpsim::protocol::rest;
use erpsim::protocol::Handler;
use erpsim::Config;

static TRACE_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();

#[derive(Debug, Parser)]
#[command(name = "erpsim-server", version, about = "ERP data and query simulation server")]
struct Args {
    /// Bind address (overrides http.host)
    #[arg(long)]
    host: Option<String>,

    /// Port (overrides http.port)
    #[arg(long)]
    port: Option<u16>,

    /// Config file; defaults to config.toml + config.local.toml
    #[arg(long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let args = Args::parse();

    // Load configuration
    let loaded = match &args.config {
        Some(path) => Config::from_file(path),
        None => Config::load(),
    };
    let (mut config, load_error) = match loaded {
        Ok(config) => (config, None),
        Err(e) if args.config.is_some() => return Err(e.to_string().into()),
        Err(e) => (Config::default(), Some(e)),
    };

    init_tracing(&config.logging);
    if let Some(e) = load_error {
        tracing::warn!(error = %e, "using default configuration");
    }

    // Override HTTP config from command line
    if let Some(host) = args.host {
        config.http.host = host;
    }
    if let Some(port) = args.port {
        config.http.port = port;
    }

    let http_config = config.http.clone();

    // Create handler; generation failure aborts startup
    let handler = Arc::new(Handler::from_config(config).map_err(|e| {
        tracing::error!(error = %e, "failed to initialize engine");
        Box::<dyn std::error::Error + Send + Sync>::from(e)
    })?);

    let settings = handler.engine().settings();
    tracing::info!(
        host = %http_config.host,
        port = http_config.port,
        anchor = %settings.anchor,
        seed = settings.master_seed,
        "erpsim_server_starting"
    );

    rest::start_http_server(handler, &http_config).await?;

    Ok(())
}

fn init_tracing(logging_config: &LoggingConfig) {
    // Environment variables take precedence over config file values
    let level = env::var("ERPSIM_LOG").unwrap_or_else(|_| logging_config.level.clone());
    let json = logging_config.format == "json";

    let filter = || {
        EnvFilter::try_new(&level).unwrap_or_else(|_| EnvFilter::new("info"))
    };

    let stderr_layer = if json {
        fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_filter(filter())
            .boxed()
    } else {
        fmt::layer()
            .compact()
            .with_writer(std::io::stderr)
            .with_filter(filter())
            .boxed()
    };

    let file_layer = env::var("ERPSIM_LOG_FILE").ok().and_then(|log_path| {
        let file = match std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)
        {
            Ok(f) => f,
            Err(e) => {
                eprintln!("ERROR: Unable to open ERPSIM_LOG_FILE '{log_path}': {e}");
                return None;
            }
        };
        let (non_blocking, guard) = tracing_appender::non_blocking(file);
        let _ = TRACE_GUARD.set(guard);

        let layer = fmt::layer()
            .with_ansi(false)
            .with_thread_names(true)
            .with_thread_ids(true)
            .with_writer(non_blocking);
        Some(if json {
            layer.json().with_filter(filter()).boxed()
        } else {
            layer.compact().with_filter(filter()).boxed()
        })
    });

    let _ = tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .try_init();
}
