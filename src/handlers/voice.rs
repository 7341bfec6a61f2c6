//! Carrier call webhooks
//!
//! Twilio posts here twice per call: once when the call arrives
//! (`handle_initial_call`) and once when the primary dial leg finishes
//! (`handle_fallback`). Each request is answered with exactly one TwiML
//! instruction; no call state is kept between the two.

use std::sync::Arc;

use axum::extract::{Form, State};
use axum::http::{HeaderMap, header::HOST};
use serde::Deserialize;
use tracing::{error, info, warn};

use crate::errors::HandoffError;
use crate::state::AppState;
use crate::twiml::{self, Twiml};

/// Spoken to the caller when the hand-off to the voice agent fails.
const APOLOGY: &str = "Lo sentimos, tenemos dificultades técnicas.";

/// Form parameters Twilio posts on a new inbound call.
#[derive(Debug, Deserialize)]
pub struct InboundCallParams {
    #[serde(rename = "From", default)]
    pub from: String,
    #[serde(rename = "To", default)]
    pub to: String,
    #[serde(rename = "CallSid", default)]
    pub call_sid: String,
}

/// Form parameters Twilio posts when the primary dial leg finishes.
#[derive(Debug, Deserialize)]
pub struct DialOutcomeParams {
    #[serde(rename = "DialCallStatus", default)]
    pub dial_call_status: String,
    #[serde(rename = "From", default)]
    pub from: String,
    #[serde(rename = "To", default)]
    pub to: String,
    #[serde(rename = "CallSid", default)]
    pub call_sid: String,
}

/// Handles a new inbound call.
///
/// Always dials the configured primary SIP trunk with a bounded ring
/// timeout. The action URL points Twilio back at `/fallback` so the dial
/// outcome comes back to this service.
pub async fn handle_initial_call(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Form(params): Form<InboundCallParams>,
) -> Twiml {
    info!(from = %params.from, to = %params.to, "Inbound call received");
    info!(call_sid = %params.call_sid, "Dialing primary SIP trunk");

    let action_url = format!("{}/fallback", base_url(&headers));

    twiml::dial_sip_with_action(
        &state.config.primary_sip_uri,
        state.config.dial_timeout_seconds,
        &action_url,
    )
}

/// Handles the outcome of the primary dial leg.
///
/// `completed` means the primary destination answered and the call is
/// over. The unanswered statuses trigger the hand-off to the voice agent.
/// Any status this router does not recognize ends the call.
pub async fn handle_fallback(
    State(state): State<Arc<AppState>>,
    Form(params): Form<DialOutcomeParams>,
) -> Twiml {
    info!(
        dial_status = %params.dial_call_status,
        call_sid = %params.call_sid,
        "Primary dial leg finished"
    );

    match params.dial_call_status.as_str() {
        "completed" => twiml::hangup(),
        "no-answer" | "busy" | "failed" | "canceled" => {
            match hand_off_to_agent(&state, &params).await {
                Ok(sip_uri) => {
                    info!(sip_uri = %sip_uri, call_sid = %params.call_sid, "Transferring caller to voice agent");
                    twiml::dial_sip(&sip_uri)
                }
                Err(err) => {
                    log_handoff_failure(&err, &params.call_sid);
                    twiml::say_then_hangup(APOLOGY)
                }
            }
        }
        other => {
            warn!(dial_status = %other, call_sid = %params.call_sid, "Unrecognized dial status, hanging up");
            twiml::hangup()
        }
    }
}

/// Registers the call with Retell and returns the SIP address of the
/// agent leg.
async fn hand_off_to_agent(
    state: &AppState,
    params: &DialOutcomeParams,
) -> Result<String, HandoffError> {
    let retell = state.retell.as_ref().ok_or(HandoffError::MissingCredential)?;

    let call_id = retell
        .register_phone_call(&params.from, &params.to, &params.call_sid)
        .await?;

    Ok(retell.sip_uri(&call_id))
}

/// Logs a hand-off failure with the context an operator needs.
///
/// Upstream rejections keep the full response body; the caller only ever
/// hears the apology.
fn log_handoff_failure(err: &HandoffError, call_sid: &str) {
    match err {
        HandoffError::RegistrationFailed { status, body } => {
            error!(%status, body = %body, call_sid, "Retell rejected the call registration");
        }
        other => {
            error!(error = %other, call_sid, "Hand-off to voice agent failed");
        }
    }
}

/// Builds the externally visible base URL for action callbacks.
///
/// Twilio reaches this service through a reverse proxy, so the public
/// scheme and host arrive in `x-forwarded-proto`/`x-forwarded-host`;
/// absent those, fall back to `https` and the request's own Host header.
fn base_url(headers: &HeaderMap) -> String {
    let proto = headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("https");

    let host = headers
        .get("x-forwarded-host")
        .or_else(|| headers.get(HOST))
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    format!("{proto}://{host}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn base_url_prefers_forwarded_headers() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-proto", HeaderValue::from_static("https"));
        headers.insert("x-forwarded-host", HeaderValue::from_static("example.com"));
        headers.insert(HOST, HeaderValue::from_static("internal:3000"));
        assert_eq!(base_url(&headers), "https://example.com");
    }

    #[test]
    fn base_url_falls_back_to_host_header() {
        let mut headers = HeaderMap::new();
        headers.insert(HOST, HeaderValue::from_static("localhost:3000"));
        assert_eq!(base_url(&headers), "https://localhost:3000");
    }

    #[test]
    fn base_url_honors_forwarded_proto_alone() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-proto", HeaderValue::from_static("http"));
        headers.insert(HOST, HeaderValue::from_static("localhost:3000"));
        assert_eq!(base_url(&headers), "http://localhost:3000");
    }
}
