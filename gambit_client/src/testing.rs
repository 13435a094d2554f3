//! An in-memory [`Transport`] for tests that need a game server.

use std::collections::VecDeque;

use serde_json::Value;

use crate::{ApiError, RawResponse, Transport};

type Handler = Box<dyn FnMut(&str, &Value) -> Result<RawResponse, ApiError>>;

/// Answers requests with a closure and remembers every request it saw.
pub struct ScriptedTransport {
    handler: Handler,
    calls: Vec<(String, Value)>,
}

impl ScriptedTransport {
    pub fn new(handler: impl FnMut(&str, &Value) -> Result<RawResponse, ApiError> + 'static) -> Self {
        Self {
            handler: Box::new(handler),
            calls: Vec::new(),
        }
    }

    /// Hands out the given responses in order, regardless of the endpoint.
    ///
    /// Panics when asked for more responses than were given.
    pub fn from_responses(responses: Vec<RawResponse>) -> Self {
        let mut responses = VecDeque::from(responses);
        Self::new(move |endpoint, _| {
            Ok(responses
                .pop_front()
                .unwrap_or_else(|| panic!("No scripted response left for {}", endpoint)))
        })
    }

    /// Every request so far, as `(endpoint, body)`.
    pub fn calls(&self) -> &[(String, Value)] {
        &self.calls
    }

    /// The requests that went to `endpoint`.
    pub fn calls_to<'a>(&'a self, endpoint: &'a str) -> impl Iterator<Item = &'a Value> + 'a {
        self.calls
            .iter()
            .filter(move |(e, _)| e == endpoint)
            .map(|(_, body)| body)
    }
}

impl Transport for ScriptedTransport {
    fn post(&mut self, endpoint: &str, body: &Value) -> Result<RawResponse, ApiError> {
        self.calls.push((String::from(endpoint), body.clone()));
        (self.handler)(endpoint, body)
    }
}
