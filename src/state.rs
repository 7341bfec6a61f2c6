use std::sync::Arc;

use crate::config::ServerConfig;
use crate::errors::HandoffError;
use crate::retell::RetellClient;

/// Application state that can be shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: ServerConfig,
    /// Retell client, present only when an API key is configured.
    /// Without it, unanswered calls cannot be handed off to the agent.
    pub retell: Option<RetellClient>,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Arc<Self> {
        let retell = match RetellClient::from_config(&config) {
            Ok(client) => Some(client),
            Err(HandoffError::MissingCredential) => {
                tracing::warn!(
                    "RETELL_API_KEY is not set; unanswered calls will get an apology instead of the voice agent"
                );
                None
            }
            Err(e) => {
                tracing::warn!("Failed to initialize Retell client: {e}");
                None
            }
        };

        Arc::new(Self { config, retell })
    }
}
