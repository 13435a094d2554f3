use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::{ApiError, ClientConfig, HttpTransport, RawResponse, Recorder, Transport};

/// Maps a raw response to the outcome of a call.
///
/// 200 and 201 carry a JSON body, 204 carries none. Everything else is a
/// failure: 5xx statuses are server errors, the rest are rejections. The
/// failure payload is the JSON body, or `{"message": <body>}` if the body
/// isn't JSON.
pub fn interpret_response(endpoint: &str, response: RawResponse) -> Result<Option<Value>, ApiError> {
    let RawResponse { status, body } = response;
    match status {
        204 => Ok(None),
        200 | 201 => {
            if body.trim().is_empty() {
                return Ok(None);
            }
            serde_json::from_str(&body)
                .map(Some)
                .map_err(|err| ApiError::Decode {
                    endpoint: String::from(endpoint),
                    err,
                })
        }
        _ => {
            let payload =
                serde_json::from_str(&body).unwrap_or_else(|_| json!({ "message": body }));
            if status >= 500 {
                Err(ApiError::Server { status, payload })
            } else {
                Err(ApiError::Rejected { status, payload })
            }
        }
    }
}

/// Client for the game server's JSON API.
///
/// Every call is a POST. Transport and server errors are retried with a
/// fixed backoff, rejections are returned immediately.
pub struct ApiClient<T: Transport> {
    transport: T,
    max_attempts: u32,
    backoff: Duration,
    recorder: Option<Recorder>,
}

impl ApiClient<HttpTransport> {
    pub fn connect(config: &ClientConfig) -> Result<Self, ApiError> {
        let transport = HttpTransport::new(&config.base_url, config.timeout())?;
        Ok(Self::new(transport, config))
    }
}

impl<T: Transport> ApiClient<T> {
    pub fn new(transport: T, config: &ClientConfig) -> Self {
        Self {
            transport,
            max_attempts: config.max_attempts.max(1),
            backoff: config.backoff(),
            recorder: None,
        }
    }

    pub fn with_recorder(mut self, recorder: Option<Recorder>) -> Self {
        self.recorder = recorder;
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn recorder_mut(&mut self) -> Option<&mut Recorder> {
        self.recorder.as_mut()
    }

    /// Sends `body` to `endpoint`. `Ok(None)` means success without a body.
    pub fn post<B: Serialize>(&mut self, endpoint: &str, body: &B) -> Result<Option<Value>, ApiError> {
        let body = serde_json::to_value(body).map_err(|err| ApiError::Encode {
            endpoint: String::from(endpoint),
            err,
        })?;

        let mut attempt = 1;
        loop {
            let result = self.transport.post(endpoint, &body);
            if let Some(recorder) = &mut self.recorder {
                match &result {
                    Ok(raw) => recorder.store_exchange(endpoint, &body, Some(raw.status), Some(raw.body.as_str())),
                    Err(_) => recorder.store_exchange(endpoint, &body, None, None),
                }
            }

            match result.and_then(|raw| interpret_response(endpoint, raw)) {
                Ok(value) => {
                    debug!(endpoint, attempt, "Request succeeded");
                    return Ok(value);
                }
                Err(err) if err.is_retryable() && attempt < self.max_attempts => {
                    warn!(endpoint, attempt, max_attempts = self.max_attempts, "{}, retrying", err);
                    std::thread::sleep(self.backoff);
                    attempt += 1;
                }
                Err(err) => {
                    warn!(endpoint, attempt, "{}", err);
                    return Err(err);
                }
            }
        }
    }

    /// Like [`Self::post()`], but decodes the response body into `R`.
    pub fn post_for<B: Serialize, R: DeserializeOwned>(
        &mut self,
        endpoint: &str,
        body: &B,
    ) -> Result<R, ApiError> {
        let value = self.post(endpoint, body)?.ok_or_else(|| ApiError::MissingBody {
            endpoint: String::from(endpoint),
        })?;
        serde_json::from_value(value).map_err(|err| ApiError::Decode {
            endpoint: String::from(endpoint),
            err,
        })
    }
}
