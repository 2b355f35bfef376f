use anyhow::Result;

use uiforge::config::ServerConfig;
use uiforge::{logging, server};

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is normal; the real environment still applies
    let dotenv_loaded = dotenv::dotenv().is_ok();

    logging::init_stdout()?;
    if dotenv_loaded {
        tracing::debug!("loaded settings from .env");
    }

    let config = ServerConfig::from_env()?;
    server::serve(config).await
}
