//! Tracing Observer
//!
//! Forwards API instrumentation events to `tracing`. Bodies are logged at
//! debug level only and truncated.

use crate::ports::observer::ApiObserver;

const MAX_LOGGED_BODY: usize = 2_000;

#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl ApiObserver for TracingObserver {
    fn on_request(&self, endpoint: &str, params: &[(&'static str, String)]) {
        let rendered = params
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join(", ");
        tracing::info!(endpoint, "Sending request with parameters: {}", rendered);
    }

    fn on_response(&self, endpoint: &str, status: u16, body: &str) {
        tracing::info!(endpoint, status, "Response status code: {}", status);

        let shown: String = body.chars().take(MAX_LOGGED_BODY).collect();
        let truncated = body.len() > shown.len();
        tracing::debug!(endpoint, truncated, "Response body: {}", shown);
    }

    fn on_catalog(&self, network: &str, len: usize) {
        tracing::info!(network, tokens = len, "Token catalog loaded");
    }
}
