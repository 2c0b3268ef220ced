//! CoWord terminal client binary.
//!
//! # Usage
//!
//! ```bash
//! # Connect to a local server
//! coword
//!
//! # Connect elsewhere with a longer retry budget
//! coword --endpoint ws://game.example:5905/ws --max-reconnect-attempts 5
//! ```

use clap::Parser;
use coword_app::Runtime;
use coword_cli::{Args, WsDriver};
use coword_client::Client;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry().with(fmt::layer()).with(filter).init();

    let client = Client::new(args.client_config())?;
    tracing::info!(endpoint = %args.endpoint, "CoWord client starting");

    let mut runtime = Runtime::new(WsDriver::with_stdin(), client);
    runtime.run().await?;

    tracing::info!("CoWord client stopped");
    Ok(())
}
