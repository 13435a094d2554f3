use serde_json::Value;

/// Why a call to the game server failed.
#[derive(Debug)]
pub enum ApiError {
    /// No response at all, e.g. connection refused or timeout.
    Transport(Box<dyn std::error::Error + Send + Sync>),
    /// The server answered with a 5xx status. Worth retrying.
    Server { status: u16, payload: Value },
    /// The server refused the request (any other non-success status).
    /// Retrying the same request won't help.
    Rejected { status: u16, payload: Value },
    /// The request body could not be turned into JSON. Nothing was sent.
    Encode {
        endpoint: String,
        err: serde_json::Error,
    },
    /// A success response whose body didn't have the expected shape.
    Decode {
        endpoint: String,
        err: serde_json::Error,
    },
    /// A success response without a body where one was needed.
    MissingBody { endpoint: String },
}

impl ApiError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, ApiError::Transport(_) | ApiError::Server { .. })
    }

    pub fn is_rejection(&self) -> bool {
        matches!(self, ApiError::Rejected { .. })
    }

    /// The error payload the server sent, if any.
    pub fn payload(&self) -> Option<&Value> {
        match self {
            ApiError::Server { payload, .. } | ApiError::Rejected { payload, .. } => Some(payload),
            _ => None,
        }
    }

    /// The `message` field of the server's error payload.
    pub fn message(&self) -> Option<&str> {
        self.payload()?.get("message")?.as_str()
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::Transport(err) => Some(err.as_ref()),
            ApiError::Encode { err, .. } | ApiError::Decode { err, .. } => Some(err),
            _ => None,
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Transport(_) => write!(f, "Could not reach the game server"),
            ApiError::Server { status, .. } => write!(
                f,
                "Server error {}: {}",
                status,
                self.message().unwrap_or("no message")
            ),
            ApiError::Rejected { status, .. } => write!(
                f,
                "Request rejected with status {}: {}",
                status,
                self.message().unwrap_or("no message")
            ),
            ApiError::Encode { endpoint, .. } => {
                write!(f, "Could not encode the request to {}", endpoint)
            }
            ApiError::Decode { endpoint, .. } => {
                write!(f, "Unexpected response body from {}", endpoint)
            }
            ApiError::MissingBody { endpoint } => {
                write!(f, "Expected a response body from {}, got none", endpoint)
            }
        }
    }
}
