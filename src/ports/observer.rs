//! API Observer
//!
//! Sink for request/response instrumentation. Clients report to it but never
//! branch on it.

use std::fmt::Debug;

/// Receives notifications about calls made against the aggregator API
pub trait ApiObserver: Send + Sync + Debug {
    /// A request is about to be sent
    fn on_request(&self, endpoint: &str, params: &[(&'static str, String)]) {
        let _ = (endpoint, params);
    }

    /// A response arrived (any status)
    fn on_response(&self, endpoint: &str, status: u16, body: &str) {
        let _ = (endpoint, status, body);
    }

    /// A catalog fetch completed
    fn on_catalog(&self, network: &str, len: usize) {
        let _ = (network, len);
    }
}

/// Observer that discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl ApiObserver for NoopObserver {}
