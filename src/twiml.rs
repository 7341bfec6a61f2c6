//! TwiML control instructions
//!
//! Twilio drives a call by fetching markup from this service; the router
//! only ever emits three shapes: dial a SIP target with a fallback action,
//! hang up, or speak a message and hang up. Responses always carry
//! `Content-Type: text/xml` and status 200 because the carrier treats
//! anything else as a dead webhook.

use axum::{
    http::header::CONTENT_TYPE,
    response::{IntoResponse, Response},
};

/// A rendered TwiML document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Twiml(String);

impl Twiml {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl IntoResponse for Twiml {
    fn into_response(self) -> Response {
        ([(CONTENT_TYPE, "text/xml")], self.0).into_response()
    }
}

/// Dial a SIP target, reporting the outcome to `action_url` when the leg
/// ends (answered, unanswered, or failed).
pub fn dial_sip_with_action(sip_uri: &str, timeout_secs: u64, action_url: &str) -> Twiml {
    let sip = escape_xml(sip_uri);
    let action = escape_xml(action_url);
    Twiml(format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<Response>
    <Dial timeout="{timeout_secs}" action="{action}" method="POST">
        <Sip>{sip}</Sip>
    </Dial>
</Response>"#
    ))
}

/// Dial a SIP target as the terminal leg of the call. No timeout and no
/// action callback: once this leg ends, so does the call.
pub fn dial_sip(sip_uri: &str) -> Twiml {
    let sip = escape_xml(sip_uri);
    Twiml(format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<Response>
    <Dial>
        <Sip>{sip}</Sip>
    </Dial>
</Response>"#
    ))
}

/// End the call.
pub fn hangup() -> Twiml {
    Twiml(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<Response>
    <Hangup/>
</Response>"#
            .to_string(),
    )
}

/// Speak a message to the caller, then end the call.
pub fn say_then_hangup(message: &str) -> Twiml {
    let say = escape_xml(message);
    Twiml(format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<Response>
    <Say>{say}</Say>
    <Hangup/>
</Response>"#
    ))
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
