use std::time::Duration;

use reqwest::Client;
use reqwest::header::AUTHORIZATION;
use serde::{Deserialize, Serialize};

use crate::config::ServerConfig;
use crate::errors::HandoffError;

// Transport parameters required by Retell's Twilio-compatible SIP bridge.
// The registration is refused or the audio path stays silent if these do
// not match the carrier's media profile.
const AUDIO_WEBSOCKET_PROTOCOL: &str = "twilio";
const AUDIO_ENCODING: &str = "mulaw";
const SAMPLE_RATE: u32 = 8000;

/// HTTP client for the Retell call-registration API
#[derive(Clone)]
pub struct RetellClient {
    /// HTTP client for making requests
    client: Client,
    /// Bearer credential for the Retell API
    api_key: String,
    /// Voice agent that answers registered calls
    agent_id: String,
    /// Base URL of the Retell API
    api_url: String,
    /// SIP domain of Retell's media bridge
    sip_domain: String,
}

impl std::fmt::Debug for RetellClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetellClient")
            .field("agent_id", &self.agent_id)
            .field("api_url", &self.api_url)
            .field("sip_domain", &self.sip_domain)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// Request body for registering an inbound phone call with Retell.
#[derive(Debug, Serialize)]
struct RegisterCallRequest<'a> {
    agent_id: &'a str,
    audio_websocket_protocol: &'a str,
    audio_encoding: &'a str,
    sample_rate: u32,
    from_number: &'a str,
    to_number: &'a str,
    metadata: CallMetadata<'a>,
}

/// Correlation metadata carried through Retell back to the carrier call.
#[derive(Debug, Serialize)]
struct CallMetadata<'a> {
    twilio_call_sid: &'a str,
}

#[derive(Debug, Deserialize)]
struct RegisterCallResponse {
    #[serde(default)]
    call_id: Option<String>,
}

impl RetellClient {
    /// Create a new RetellClient from server configuration
    ///
    /// The request timeout is bounded below the carrier's own dial
    /// patience so a slow upstream still produces an apology instruction
    /// instead of a dead webhook.
    ///
    /// # Errors
    /// Returns `HandoffError::MissingCredential` if `RETELL_API_KEY` is
    /// not configured.
    pub fn from_config(config: &ServerConfig) -> Result<Self, HandoffError> {
        let api_key = config
            .retell_api_key
            .clone()
            .ok_or(HandoffError::MissingCredential)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.register_timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            api_key,
            agent_id: config.retell_agent_id.clone(),
            api_url: config.retell_api_url.trim_end_matches('/').to_string(),
            sip_domain: config.retell_sip_domain.clone(),
        })
    }

    /// Register an inbound call with Retell and return the call id the
    /// service assigned to it.
    ///
    /// # Arguments
    /// * `from_number` - The caller's number as reported by the carrier
    /// * `to_number` - The called number
    /// * `call_sid` - The carrier's call identifier, passed through as
    ///   metadata for correlation
    pub async fn register_phone_call(
        &self,
        from_number: &str,
        to_number: &str,
        call_sid: &str,
    ) -> Result<String, HandoffError> {
        let url = format!("{}/v2/register-phone-call", self.api_url);

        let request = RegisterCallRequest {
            agent_id: &self.agent_id,
            audio_websocket_protocol: AUDIO_WEBSOCKET_PROTOCOL,
            audio_encoding: AUDIO_ENCODING,
            sample_rate: SAMPLE_RATE,
            from_number,
            to_number,
            metadata: CallMetadata {
                twilio_call_sid: call_sid,
            },
        };

        let response = self
            .client
            .post(&url)
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(HandoffError::RegistrationFailed { status, body });
        }

        let parsed: RegisterCallResponse = serde_json::from_str(&body)
            .map_err(|e| HandoffError::MalformedResponse(format!("undecodable body: {e}")))?;

        match parsed.call_id {
            Some(call_id) if !call_id.is_empty() => Ok(call_id),
            _ => Err(HandoffError::MalformedResponse(
                "response is missing call_id".to_string(),
            )),
        }
    }

    /// SIP address for a registered call.
    ///
    /// The call id goes in verbatim: Twilio drops the dial leg when a `+`
    /// is prepended to it.
    pub fn sip_uri(&self, call_id: &str) -> String {
        format!("sip:{}@{}", call_id, self.sip_domain)
    }
}
