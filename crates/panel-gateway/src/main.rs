//! Panel Gateway Server entry point
//!
//! Run with:
//! ```bash
//! cargo run -p panel-gateway
//! ```
//!
//! The listen address is read from `Panel_Setting/config.json`.

use panel_common::{try_init_tracing, AppConfig};
use panel_gateway::protocol::ServerIdentity;
use panel_gateway::startup::{load_config, log_startup};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    // Initialize tracing
    if let Err(e) = try_init_tracing() {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    let identity = ServerIdentity::current();
    log_startup(identity);

    let config = load_config(&AppConfig::config_path());

    // Run the server
    if let Err(e) = panel_gateway::run(config, identity).await {
        error!(error = %e, code = e.error_code(), "Gateway failed");
        std::process::exit(1);
    }

    info!("Gateway stopped");
}
