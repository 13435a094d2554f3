use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Where the API lives and how hard to try reaching it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Prefix of every endpoint, e.g. `http://localhost:3000/api/v1/`.
    pub base_url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// How often a request is sent before giving up. Only transport and
    /// server errors lead to another attempt.
    pub max_attempts: u32,
    /// Fixed pause between attempts, in milliseconds.
    pub backoff_ms: u64,
}

impl ClientConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn backoff(&self) -> Duration {
        Duration::from_millis(self.backoff_ms)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: String::from("http://localhost:3000/api/v1/"),
            timeout_secs: 5,
            max_attempts: 3,
            backoff_ms: 1000,
        }
    }
}
