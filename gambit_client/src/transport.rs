use std::time::Duration;

use serde_json::Value;
use tracing::trace;

use crate::ApiError;

/// Status and body of an HTTP response, before interpretation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: &str) -> Self {
        Self {
            status,
            body: String::from(body),
        }
    }
}

/// Sends one JSON POST request to an endpoint of the API.
///
/// Implementations only report transport failures as errors. Any status code
/// is a successful round trip at this level.
pub trait Transport {
    fn post(&mut self, endpoint: &str, body: &Value) -> Result<RawResponse, ApiError>;
}

/// Blocking HTTP transport against `<base_url><endpoint>`.
pub struct HttpTransport {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| ApiError::Transport(Box::new(err)))?;
        let mut base_url = String::from(base_url);
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Ok(Self { base_url, client })
    }
}

impl Transport for HttpTransport {
    fn post(&mut self, endpoint: &str, body: &Value) -> Result<RawResponse, ApiError> {
        let url = format!("{}{}", self.base_url, endpoint);
        trace!(url = %url, request = %body, "POST");
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .map_err(|err| ApiError::Transport(Box::new(err)))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .map_err(|err| ApiError::Transport(Box::new(err)))?;
        trace!(url = %url, status, response = %body, "Response");
        Ok(RawResponse { status, body })
    }
}
