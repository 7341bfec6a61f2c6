/// Health check handler
/// Returns a fixed confirmation string so uptime probes and the Twilio
/// console can verify the webhook host is reachable
pub async fn health_check() -> &'static str {
    "Server OK"
}
