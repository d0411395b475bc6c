//! Cipherlab command-line entry point.
//!
//! # Usage
//!
//! ```bash
//! # Recover a password, then sign in with it
//! cipherlab attack-user --target alice --method dictionary3
//!
//! # Read a conversation and decrypt one message
//! cipherlab --username bob --password 234 conversation --with 1 --decrypt 12
//! ```

use cipherlab_app::Runtime;
use cipherlab_cli::{Cli, ConsoleDriver, Flow};
use cipherlab_client::{Api, HttpApi};
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    tracing_subscriber::registry().with(fmt::layer().with_writer(std::io::stderr)).with(filter).init();

    let api = HttpApi::new(&cli.client_config())?;
    tracing::info!(base = %api.base_url(), "cipherlab starting");

    match cli.flow()? {
        Flow::Download { file, out } => {
            let bytes = api.stego_audio(file.clone()).await?;
            tokio::fs::write(&out, &bytes).await?;
            tracing::info!(%file, bytes = bytes.len(), out = %out.display(), "audio saved");
        },
        Flow::Replay { steps, keep } => {
            let driver = ConsoleDriver::new(steps, cli.html.clone()).keeping(keep);
            Runtime::new(driver, api, cli.app_config()).run().await?;
        },
    }

    Ok(())
}
