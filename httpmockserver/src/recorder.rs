use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

/// A single request received by the mock server, captured before the
/// response was written. Entries are immutable once stored.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub path: String,
    pub method: String,
    pub headers: HashMap<String, Vec<String>>,
    pub body: Vec<u8>,
}

/// An append-only log of the requests a mock server received.
///
/// Cloning a `Recorder` produces another handle to the same log, so a test
/// can keep one handle while the server writes through its own. Appends and
/// queries are serialized internally; the server may handle connections
/// concurrently.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a call to the log. Repeated identical calls produce repeated
    /// entries.
    pub fn record(&self, call: RecordedCall) {
        self.calls.lock().unwrap().push(call);
    }

    /// The number of recorded calls matching both fields exactly. The
    /// method comparison is case-sensitive.
    pub fn hits(&self, path: &str, method: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|call| call.path == path && call.method == method)
            .count()
    }

    /// The bodies of matching calls, in arrival order.
    pub fn bodies(&self, path: &str, method: &str) -> Vec<Vec<u8>> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|call| call.path == path && call.method == method)
            .map(|call| call.body.clone())
            .collect()
    }

    /// The header maps of matching calls, in arrival order.
    pub fn headers(&self, path: &str, method: &str) -> Vec<HashMap<String, Vec<String>>> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|call| call.path == path && call.method == method)
            .map(|call| call.headers.clone())
            .collect()
    }
}
