use reqwest::StatusCode;

/// Failures of the AI hand-off procedure
///
/// Every variant is caught at the handler boundary and turned into the
/// same spoken-apology instruction; the carrier always receives valid
/// markup with status 200. The variants exist so the operator log can
/// tell a missing credential apart from an upstream rejection.
#[derive(Debug, thiserror::Error)]
pub enum HandoffError {
    /// RETELL_API_KEY is not configured, so the hand-off path is disabled
    #[error("RETELL_API_KEY is not configured")]
    MissingCredential,

    /// Retell rejected the registration request with a non-success status
    #[error("Retell registration failed ({status}): {body}")]
    RegistrationFailed { status: StatusCode, body: String },

    /// Transport failure reaching the Retell API (includes timeouts)
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Retell answered with success but the body carried no usable call id
    #[error("Malformed registration response: {0}")]
    MalformedResponse(String),
}
