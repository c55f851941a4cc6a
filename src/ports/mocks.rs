use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::token::TokenQuery;
use super::catalog::{CatalogError, TokenCatalog, TokenCatalogPort};
use super::observer::ApiObserver;

/// In-memory catalog that records every query it serves
#[derive(Debug, Default, Clone)]
pub struct StaticCatalog {
    calls: Arc<Mutex<Vec<TokenQuery>>>,
    networks: Arc<Mutex<HashMap<String, Vec<Value>>>>,
}

impl StaticCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the token list for a network
    pub fn with_network(self, network: &str, entries: Vec<Value>) -> Self {
        self.networks
            .lock()
            .unwrap()
            .insert(network.to_string(), entries);
        self
    }

    /// Get all recorded queries
    pub fn get_calls(&self) -> Vec<TokenQuery> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl TokenCatalogPort for StaticCatalog {
    async fn fetch_catalog(&self, query: &TokenQuery) -> Result<TokenCatalog, CatalogError> {
        self.calls.lock().unwrap().push(query.clone());

        let networks = self.networks.lock().unwrap();
        let mut entries = Vec::new();
        for network in &query.network_names {
            match networks.get(network.as_str()) {
                Some(tokens) => entries.extend(tokens.iter().cloned()),
                None => {
                    return Err(CatalogError::CatalogUnavailable {
                        network: query.network_label(),
                        status: 404,
                    })
                }
            }
        }

        Ok(TokenCatalog::new(query.network_label(), entries))
    }
}

/// Observed event, as recorded by [`RecordingObserver`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObservedEvent {
    Request { endpoint: String, params: Vec<(String, String)> },
    Response { endpoint: String, status: u16 },
    Catalog { network: String, len: usize },
}

/// Observer that keeps every event for later assertions
#[derive(Debug, Default, Clone)]
pub struct RecordingObserver {
    events: Arc<Mutex<Vec<ObservedEvent>>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ObservedEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl ApiObserver for RecordingObserver {
    fn on_request(&self, endpoint: &str, params: &[(&'static str, String)]) {
        self.events.lock().unwrap().push(ObservedEvent::Request {
            endpoint: endpoint.to_string(),
            params: params
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        });
    }

    fn on_response(&self, endpoint: &str, status: u16, _body: &str) {
        self.events.lock().unwrap().push(ObservedEvent::Response {
            endpoint: endpoint.to_string(),
            status,
        });
    }

    fn on_catalog(&self, network: &str, len: usize) {
        self.events.lock().unwrap().push(ObservedEvent::Catalog {
            network: network.to_string(),
            len,
        });
    }
}
