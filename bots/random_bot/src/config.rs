use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use gambit_client::ClientConfig;
use serde::{Deserialize, Serialize};

/// An account the bot plays with. It is looked up by email and created if missing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestAccount {
    pub username: String,
    pub email: String,
}

impl TestAccount {
    pub fn new(username: &str, email: &str) -> Self {
        Self {
            username: String::from(username),
            email: String::from(email),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    pub client: ClientConfig,
    /// The two accounts that get matched against each other.
    pub players: [TestAccount; 2],
    /// Plies to play before resigning a game that is still running.
    pub plies: usize,
    pub poll_interval_ms: u64,
    /// Give up on matchmaking after this long. Waits forever if unset.
    pub match_timeout_secs: Option<u64>,
    /// Fail once this many consecutive attempts at a ply got no move through.
    pub max_stalled_plies: usize,
}

impl BotConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let file = std::fs::File::open(path)
            .with_context(|| format!("Could not open config file '{}'", path.display()))?;
        let config: BotConfig = serde_json::from_reader(std::io::BufReader::new(file))
            .with_context(|| format!("Could not parse config file '{}'", path.display()))?;
        Ok(config)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn match_timeout(&self) -> Option<Duration> {
        self.match_timeout_secs.map(Duration::from_secs)
    }
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            client: ClientConfig::default(),
            players: [
                TestAccount::new("testbot_one", "testbot_one@example.com"),
                TestAccount::new("testbot_two", "testbot_two@example.com"),
            ],
            plies: 6,
            poll_interval_ms: 1000,
            match_timeout_secs: None,
            max_stalled_plies: 5,
        }
    }
}
