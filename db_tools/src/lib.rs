//! Maintenance helpers for the game server's MongoDB database.

use std::io::Write;

use anyhow::Context;
use mongodb::bson::{doc, Bson, Document};
use mongodb::sync::{Client, Database};
use tracing::debug;

pub const LOBBY_COLLECTION: &str = "lobbies";
pub const QUEUE_FIELDS: [&str; 2] = ["rankedQueue", "quickplayQueue"];

/// Connection flags shared by the tools.
#[derive(clap::Args, Debug)]
pub struct DatabaseArgs {
    /// MongoDB connection string
    #[arg(long, default_value = "mongodb://localhost:27017/")]
    pub uri: String,

    /// Name of the database
    #[arg(short, long, default_value = "cloaks-gambit")]
    pub database: String,
}

impl DatabaseArgs {
    pub fn connect(&self) -> anyhow::Result<Database> {
        let client = Client::with_uri_str(&self.uri)
            .with_context(|| format!("Could not connect to {}", self.uri))?;
        debug!(uri = %self.uri, database = %self.database, "Connected");
        Ok(client.database(&self.database))
    }
}

/// Whether an answer to a yes/no prompt means yes. Anything but "yes" is a no.
pub fn is_confirmation(answer: &str) -> bool {
    answer.trim().eq_ignore_ascii_case("yes")
}

/// Pretty JSON of a document in relaxed extended JSON, so ids and dates stay readable.
pub fn format_document(document: Document) -> anyhow::Result<String> {
    let json = Bson::Document(document).into_relaxed_extjson();
    Ok(serde_json::to_string_pretty(&json)?)
}

pub fn write_report_header(
    out: &mut impl Write,
    database: &str,
    generated_at: &str,
) -> std::io::Result<()> {
    writeln!(out, "\nDatabase State Report")?;
    writeln!(out, "Generated at: {}", generated_at)?;
    writeln!(out, "Database: {}", database)
}

pub fn write_collection(
    out: &mut impl Write,
    name: &str,
    documents: Vec<Document>,
) -> anyhow::Result<()> {
    let banner = "=".repeat(50);
    writeln!(out, "\n{}", banner)?;
    writeln!(out, "Collection: {}", name)?;
    writeln!(out, "{}", banner)?;

    if documents.is_empty() {
        writeln!(out, "No documents found")?;
        return Ok(());
    }
    for (i, document) in documents.into_iter().enumerate() {
        writeln!(out, "\nDocument {}:", i + 1)?;
        writeln!(out, "{}", format_document(document)?)?;
    }
    Ok(())
}

/// Prints every collection of the database with all of its documents.
pub fn show_db_state(db: &Database, out: &mut impl Write) -> anyhow::Result<()> {
    let generated_at = mongodb::bson::DateTime::now()
        .try_to_rfc3339_string()
        .context("Could not format the current time")?;
    write_report_header(out, db.name(), &generated_at)?;

    let names = db
        .list_collection_names(None)
        .context("Could not list collections")?;
    if names.is_empty() {
        writeln!(out, "\nNo collections found in the database")?;
        return Ok(());
    }
    for name in names {
        let documents = db
            .collection::<Document>(&name)
            .find(None, None)
            .with_context(|| format!("Could not query collection {}", name))?
            .collect::<Result<Vec<_>, _>>()
            .with_context(|| format!("Could not read collection {}", name))?;
        write_collection(out, &name, documents)?;
    }
    Ok(())
}

/// Queue lengths of a lobby document. Missing queues count as empty.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QueueSizes {
    pub ranked: usize,
    pub quickplay: usize,
}

impl QueueSizes {
    pub fn of(lobby: &Document) -> Self {
        let len = |field: &str| lobby.get_array(field).map(Vec::len).unwrap_or(0);
        Self {
            ranked: len(QUEUE_FIELDS[0]),
            quickplay: len(QUEUE_FIELDS[1]),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EmptyQueuesOutcome {
    NoLobby,
    Unchanged,
    Emptied { previous: QueueSizes },
}

impl std::fmt::Display for EmptyQueuesOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EmptyQueuesOutcome::NoLobby => write!(f, "No lobby document found in the database"),
            EmptyQueuesOutcome::Unchanged => write!(f, "No changes were made to the queues"),
            EmptyQueuesOutcome::Emptied { previous } => {
                writeln!(f, "Successfully emptied both queues")?;
                writeln!(f, "Previous queue sizes:")?;
                writeln!(f, "Ranked Queue: {} players", previous.ranked)?;
                write!(f, "Quickplay Queue: {} players", previous.quickplay)
            }
        }
    }
}

/// Empties both matchmaking queues of the first lobby document.
pub fn empty_queues(db: &Database) -> anyhow::Result<EmptyQueuesOutcome> {
    let lobbies = db.collection::<Document>(LOBBY_COLLECTION);
    let Some(lobby) = lobbies
        .find_one(None, None)
        .context("Could not query the lobby")?
    else {
        return Ok(EmptyQueuesOutcome::NoLobby);
    };
    let id = lobby
        .get("_id")
        .cloned()
        .context("Lobby document has no _id")?;
    let previous = QueueSizes::of(&lobby);

    let result = lobbies
        .update_one(
            doc! { "_id": id },
            doc! { "$set": { "rankedQueue": [], "quickplayQueue": [] } },
            None,
        )
        .context("Could not update the lobby")?;
    debug!(modified = result.modified_count, ?previous, "Updated lobby");

    if result.modified_count > 0 {
        Ok(EmptyQueuesOutcome::Emptied { previous })
    } else {
        Ok(EmptyQueuesOutcome::Unchanged)
    }
}
