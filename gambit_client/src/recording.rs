use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Collects the requests of a session and writes them out as a JSON transcript.
pub struct Recorder {
    num: usize,
    directory: PathBuf,
    exchanges: Vec<Exchange>,
}

/// One request to the server and what came back.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Exchange {
    pub endpoint: String,
    pub request: Value,
    /// `None` if the request never got an answer.
    pub status: Option<u16>,
    pub response: Option<Value>,
}

impl Recorder {
    pub fn new(directory: PathBuf) -> anyhow::Result<Self> {
        if !directory.is_dir() {
            anyhow::bail!("Directory '{}' does not exist", directory.display());
        }
        Ok(Self {
            num: 1,
            directory,
            exchanges: Vec::new(),
        })
    }

    /// Response bodies that aren't JSON are kept as strings.
    pub fn store_exchange(&mut self, endpoint: &str, request: &Value, status: Option<u16>, body: Option<&str>) {
        let response = body.filter(|b| !b.is_empty()).map(|b| {
            serde_json::from_str(b).unwrap_or_else(|_| Value::String(String::from(b)))
        });
        self.exchanges.push(Exchange {
            endpoint: String::from(endpoint),
            request: request.clone(),
            status,
            response,
        });
    }

    pub fn exchanges(&self) -> &[Exchange] {
        &self.exchanges
    }

    /// Writes everything stored so far to `session_NNNNNN.json` and starts a new transcript.
    pub fn write_session_recording(&mut self) -> anyhow::Result<PathBuf> {
        let filepath = self.directory.join(format!("session_{:0>6}.json", self.num));
        let mut writer = BufWriter::new(File::create(&filepath)?);
        serde_json::to_writer_pretty(&mut writer, &std::mem::take(&mut self.exchanges))?;
        writer.flush()?;
        self.num += 1;
        Ok(filepath)
    }
}
