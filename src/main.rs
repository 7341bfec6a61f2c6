use anyhow::anyhow;
use tokio::net::TcpListener;
use tracing::info;

use callbridge::{ServerConfig, routes, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load configuration
    let config = ServerConfig::from_env().map_err(|e| anyhow!(e.to_string()))?;
    let address = config.address();
    println!("Starting server on {address}");

    info!(
        agent_id = %config.retell_agent_id,
        primary_sip_uri = %config.primary_sip_uri,
        "Call router configured"
    );

    // Create application state
    let app_state = AppState::new(config);

    // Carrier webhook routes (health check included)
    let app = routes::webhooks::create_webhook_router().with_state(app_state);

    // Create listener
    let listener = TcpListener::bind(&address).await?;

    println!("Server listening on {address}");

    // Start server
    axum::serve(listener, app).await?;

    Ok(())
}
