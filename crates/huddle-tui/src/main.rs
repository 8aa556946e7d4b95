//! Huddle terminal client.
//!
//! # Usage
//!
//! ```bash
//! # Local development servers
//! huddle
//!
//! # Remote deployment, verbose trace in a custom file
//! huddle --server https://chat.example.com --api https://api.example.com \
//!     --log-file /tmp/huddle.log --log-level debug
//! ```

use std::{fs::File, sync::Mutex, time::Duration};

use clap::Parser;
use huddle_client::{ClientConfig, DEFAULT_API_URL, DEFAULT_SERVER_URL, SocketConfig};
use huddle_core::{BackoffConfig, SystemEnv};
use huddle_tui::{Runtime, TerminalDriver};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Huddle terminal chat client
#[derive(Parser, Debug)]
#[command(name = "huddle")]
#[command(about = "Terminal client for Huddle chat servers")]
#[command(version)]
struct Args {
    /// Chat server (socket) URL
    #[arg(long, env = "HUDDLE_SERVER_URL", default_value = DEFAULT_SERVER_URL)]
    server: String,

    /// REST directory URL
    #[arg(long, env = "HUDDLE_API_URL", default_value = DEFAULT_API_URL)]
    api: String,

    /// Delay before the first reconnect attempt, in milliseconds
    #[arg(long, env = "HUDDLE_RECONNECT_DELAY_MS", default_value = "1000")]
    reconnect_delay_ms: u64,

    /// Upper bound on the reconnect delay, in milliseconds
    #[arg(long, env = "HUDDLE_RECONNECT_DELAY_MAX_MS", default_value = "10000")]
    reconnect_delay_max_ms: u64,

    /// File receiving the tracing output (the terminal belongs to the UI)
    #[arg(long, env = "HUDDLE_LOG_FILE", default_value = "huddle.log")]
    log_file: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Args {
    fn client_config(&self) -> ClientConfig {
        let initial = Duration::from_millis(self.reconnect_delay_ms);
        let max = Duration::from_millis(self.reconnect_delay_max_ms).max(initial);

        ClientConfig {
            socket: SocketConfig {
                server_url: self.server.clone(),
                reconnect: BackoffConfig { initial, max, ..BackoffConfig::default() },
                ..SocketConfig::default()
            },
            api_url: self.api.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    let log_file = File::create(&args.log_file)?;

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(Mutex::new(log_file)).with_ansi(false))
        .with(filter)
        .init();

    let config = args.client_config();
    tracing::info!(server = %config.socket.server_url, api = %config.api_url, "huddle starting");

    let driver = TerminalDriver::new(&config)?;
    let driver = Runtime::new(driver, SystemEnv::new()).run().await?;
    driver.shutdown().await;

    tracing::info!("huddle stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_defaults() {
        let args = Args::try_parse_from([
            "huddle",
            "--server",
            "https://chat.example.com",
            "--api",
            "https://api.example.com",
            "--reconnect-delay-ms",
            "250",
            "--reconnect-delay-max-ms",
            "4000",
        ])
        .unwrap();

        let config = args.client_config();
        assert_eq!(config.socket.server_url, "https://chat.example.com");
        assert_eq!(config.api_url, "https://api.example.com");
        assert_eq!(config.socket.reconnect.initial, Duration::from_millis(250));
        assert_eq!(config.socket.reconnect.max, Duration::from_secs(4));
    }

    #[test]
    fn max_delay_never_below_initial() {
        let args =
            Args::try_parse_from(["huddle", "--reconnect-delay-ms", "5000", "--reconnect-delay-max-ms", "100"]).unwrap();

        let reconnect = args.client_config().socket.reconnect;
        assert_eq!(reconnect.max, reconnect.initial);
    }

    #[test]
    fn rejects_non_numeric_delay() {
        assert!(Args::try_parse_from(["huddle", "--reconnect-delay-ms", "soon"]).is_err());
    }
}
