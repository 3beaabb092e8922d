//! Integration tests for the Tokenomy client
//!
//! Everything here runs offline: the network is replaced by mocked or
//! scripted transports and the clock is fixed.


#[cfg(test)]
mod client_tests;

use std::collections::VecDeque;
use std::sync::Mutex;
use tokenomy_api::traits::{HttpRequest, HttpResponse, Transport, TransportError};

/// Transport that replays canned responses in order and records requests
#[derive(Default)]
pub struct ReplayTransport {
    responses: Mutex<VecDeque<HttpResponse>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ReplayTransport {
    pub fn new(responses: impl IntoIterator<Item = HttpResponse>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Requests seen so far
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

impl Transport for ReplayTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }
        self.responses
            .lock()
            .map_err(|_| TransportError("replay state poisoned".to_string()))?
            .pop_front()
            .ok_or_else(|| TransportError("no response left to replay".to_string()))
    }
}

/// Wrap a payload in the success envelope
pub fn envelope(data: serde_json::Value) -> String {
    serde_json::json!({ "data": data }).to_string()
}
