//! Configuration module for the callbridge server
//!
//! Configuration is loaded once at startup from environment variables
//! (with a `.env` file honored if present) and passed into the
//! application state. Handlers never read the environment themselves.
//!
//! # Environment variables
//! - `HOST` / `PORT`: listen address (default `0.0.0.0:3000`)
//! - `PRIMARY_SIP_URI`: SIP trunk dialed first on every inbound call
//! - `DIAL_TIMEOUT_SECONDS`: ring time given to the primary leg (default 15)
//! - `RETELL_API_KEY`: bearer credential for Retell; without it, calls
//!   cannot be handed off to the voice agent
//! - `RETELL_AGENT_ID`: voice agent that answers unanswered calls
//! - `RETELL_API_URL`: Retell API base URL (overridable for tests)
//! - `RETELL_SIP_DOMAIN`: SIP domain of Retell's media bridge
//! - `REGISTER_TIMEOUT_SECONDS`: bound on the registration request (default 10)

use std::env;

const DEFAULT_AGENT_ID: &str = "agent_07c85b3b7b299302b93035ac53";
const DEFAULT_PRIMARY_SIP_URI: &str = "sip:west-2.sip.calltools.io:5060";
const DEFAULT_RETELL_API_URL: &str = "https://api.retellai.com";
const DEFAULT_RETELL_SIP_DOMAIN: &str = "sip.retellai.com";

/// Server configuration
///
/// Contains all configuration needed to run the call router, including:
/// - Server settings (host, port)
/// - The primary SIP destination and its ring timeout
/// - Retell integration settings (credential, agent, endpoints)
#[derive(Debug, Clone)]
pub struct ServerConfig {
    // Server settings
    pub host: String,
    pub port: u16,

    // Primary dial leg
    pub primary_sip_uri: String,
    pub dial_timeout_seconds: u64,

    // Retell settings
    pub retell_api_key: Option<String>,
    pub retell_agent_id: String,
    pub retell_api_url: String,
    pub retell_sip_domain: String,
    pub register_timeout_seconds: u64,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// Reads configuration from environment variables, with sensible defaults.
    /// Also loads from .env file if present using dotenvy.
    ///
    /// # Errors
    /// Returns an error if:
    /// - `PORT` is not a valid port number
    /// - The primary SIP URI is not a `sip:` address
    /// - A timeout is set to zero
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        // Load .env file if it exists
        let _ = dotenvy::dotenv();

        // Server configuration
        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|e| format!("Invalid port number: {e}"))?;

        // Primary dial leg
        let primary_sip_uri =
            env::var("PRIMARY_SIP_URI").unwrap_or_else(|_| DEFAULT_PRIMARY_SIP_URI.to_string());
        let dial_timeout_seconds = env::var("DIAL_TIMEOUT_SECONDS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(15);

        // Retell configuration
        let retell_api_key = env::var("RETELL_API_KEY").ok();
        let retell_agent_id =
            env::var("RETELL_AGENT_ID").unwrap_or_else(|_| DEFAULT_AGENT_ID.to_string());
        let retell_api_url =
            env::var("RETELL_API_URL").unwrap_or_else(|_| DEFAULT_RETELL_API_URL.to_string());
        let retell_sip_domain =
            env::var("RETELL_SIP_DOMAIN").unwrap_or_else(|_| DEFAULT_RETELL_SIP_DOMAIN.to_string());
        let register_timeout_seconds = env::var("REGISTER_TIMEOUT_SECONDS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(10);

        validate_sip_uri(&primary_sip_uri)?;
        validate_timeout("DIAL_TIMEOUT_SECONDS", dial_timeout_seconds)?;
        validate_timeout("REGISTER_TIMEOUT_SECONDS", register_timeout_seconds)?;

        Ok(ServerConfig {
            host,
            port,
            primary_sip_uri,
            dial_timeout_seconds,
            retell_api_key,
            retell_agent_id,
            retell_api_url,
            retell_sip_domain,
            register_timeout_seconds,
        })
    }

    /// Get the server address in host:port format
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn validate_sip_uri(uri: &str) -> Result<(), String> {
    if uri.starts_with("sip:") && uri.len() > "sip:".len() {
        Ok(())
    } else {
        Err(format!("PRIMARY_SIP_URI must be a sip: address, got '{uri}'"))
    }
}

fn validate_timeout(name: &str, seconds: u64) -> Result<(), String> {
    if seconds == 0 {
        Err(format!("{name} must be greater than zero"))
    } else {
        Ok(())
    }
}
