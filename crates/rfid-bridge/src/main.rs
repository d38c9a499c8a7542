//! Reader bridge binary.
//!
//! Usage: `rfid-bridge [config.toml]`. Reads scan lines from the configured
//! device (or stdin) and forwards them to the relay server.

use rfid_bridge::{config, forward_lines, BridgeError, ScanClient};
use tokio::io::{AsyncRead, BufReader};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let config_path = std::env::args()
        .nth(1)
        .filter(|value| !value.trim().is_empty())
        .or_else(|| std::env::var("RFID_BRIDGE_CONFIG_PATH").ok());

    let config = match config::load_config(Some(config_path.as_deref().unwrap_or("bridge.toml"))) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("rfid-bridge: {e}");
            std::process::exit(1);
        }
    };

    let filter =
        EnvFilter::try_new(&config.logging.level).unwrap_or_else(|_| EnvFilter::new("info"));
    if config.logging.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    if let Err(e) = run(&config.bridge).await {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

async fn run(bridge: &config::BridgeConfig) -> Result<(), BridgeError> {
    let client = ScanClient::new(&bridge.server_url, bridge.timeout());
    let device = open_device(&bridge.device).await?;

    tracing::info!(
        device = %bridge.device,
        server = client.base_url(),
        "reader bridge started"
    );

    let stats = forward_lines(BufReader::new(device), &client).await?;

    tracing::info!(
        accepted = stats.accepted,
        rejected = stats.rejected,
        malformed = stats.malformed,
        failed = stats.failed,
        "reader input closed"
    );
    Ok(())
}

async fn open_device(path: &str) -> Result<Box<dyn AsyncRead + Unpin + Send>, BridgeError> {
    if path == "-" {
        return Ok(Box::new(tokio::io::stdin()));
    }
    let file = tokio::fs::File::open(path).await?;
    Ok(Box::new(file))
}
