mod ask;
mod config;
mod generate;
mod ingest;
mod manage;
mod sources;

use std::io::Read;

use anyhow::Result;
use clap::Subcommand;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::warn;

use crate::state::AppState;

#[derive(Subcommand)]
pub enum Command {
    /// Load the question bank and report what was indexed
    Init,
    /// Answer a question from the bank
    Query {
        #[arg(value_name = "TEXT")]
        text: String,
    },
    /// Suggest words and bank questions for partial input
    Autocomplete {
        #[arg(value_name = "TEXT")]
        text: String,
    },
    /// List bank questions
    Questions {
        /// Only questions whose topic contains this text
        #[arg(long)]
        topic: Option<String>,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Draw a random practice set from the bank
    Practice {
        #[arg(long, default_value_t = 5)]
        count: usize,
    },
    /// Show the effective configuration
    Config,
    /// Book content and question generation (JSON payload on stdin)
    #[command(subcommand)]
    Content(ContentCommand),
}

#[derive(Subcommand)]
pub enum ContentCommand {
    /// Chunk the configured book file
    Init,
    /// Chunk `{content}`
    ProcessBook,
    /// `{topic, difficulty, count, chunks?}`
    GenerateMcq,
    /// `{topic, difficulty, count}`
    GenerateProblems,
    /// `{userId, performance: {accuracy}, chunks?}`
    Recommend,
}

/// Run one command and return its JSON result.
pub fn run(state: &AppState, command: Command) -> Result<Value> {
    match command {
        Command::Init => manage::init(state),
        Command::Query { text } => ask::query(state, &text),
        Command::Autocomplete { text } => ask::autocomplete(state, &text),
        Command::Questions { topic, limit } => sources::questions(state, topic.as_deref(), limit),
        Command::Practice { count } => sources::practice(state, count),
        Command::Config => config::config(state),
        Command::Content(content) => run_content(state, content, read_payload),
    }
}

/// `content init` never touches stdin; the other verbs read their payload first.
fn run_content(
    state: &AppState,
    command: ContentCommand,
    payload: impl FnOnce() -> Map<String, Value>,
) -> Result<Value> {
    match command {
        ContentCommand::Init => ingest::init(state),
        ContentCommand::ProcessBook => ingest::process_book(&payload()),
        ContentCommand::GenerateMcq => generate::generate_mcq(state, &payload()),
        ContentCommand::GenerateProblems => generate::generate_problems(&payload()),
        ContentCommand::Recommend => generate::recommend(state, &payload()),
    }
}

fn read_payload() -> Map<String, Value> {
    payload_from_reader(std::io::stdin().lock())
}

/// Read a payload from raw bytes. IO errors and invalid UTF-8 become `{}`.
pub fn payload_from_reader<R: Read>(mut reader: R) -> Map<String, Value> {
    let mut raw = Vec::new();
    if let Err(e) = reader.read_to_end(&mut raw) {
        warn!(error = %e, "failed to read payload, using defaults");
        return Map::new();
    }
    match String::from_utf8(raw) {
        Ok(text) => payload_from_str(&text),
        Err(e) => {
            warn!(error = %e, "payload is not valid UTF-8, using defaults");
            Map::new()
        }
    }
}

/// Parse a request payload. Anything but a JSON object becomes `{}`.
pub fn payload_from_str(raw: &str) -> Map<String, Value> {
    if raw.trim().is_empty() {
        return Map::new();
    }
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => map,
        Ok(_) => {
            warn!("payload is not a JSON object, using defaults");
            Map::new()
        }
        Err(e) => {
            warn!(error = %e, "malformed payload, using defaults");
            Map::new()
        }
    }
}

/// Typed payload field, or `None` when absent, null or of the wrong type.
fn field<T: DeserializeOwned>(payload: &Map<String, Value>, key: &str) -> Option<T> {
    match payload.get(key)? {
        Value::Null => None,
        value => match serde_json::from_value(value.clone()) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                warn!(key, error = %e, "ignoring malformed payload field");
                None
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{AppConfig, SearchConfig};

    #[test]
    fn test_payload_from_str() {
        assert!(payload_from_str("").is_empty());
        assert!(payload_from_str("  \n").is_empty());
        assert!(payload_from_str("{not json").is_empty());
        assert!(payload_from_str("[1, 2]").is_empty());

        let payload = payload_from_str(r#"{"topic": "arrays", "count": 2}"#);
        assert_eq!(payload["topic"], "arrays");
        assert_eq!(payload.len(), 2);
    }

    #[test]
    fn test_field_falls_back_on_wrong_type() {
        let payload = payload_from_str(r#"{"count": "three", "topic": null, "limit": 4}"#);
        assert_eq!(field::<usize>(&payload, "count"), None);
        assert_eq!(field::<String>(&payload, "topic"), None);
        assert_eq!(field::<String>(&payload, "missing"), None);
        assert_eq!(field::<usize>(&payload, "limit"), Some(4));
        assert_eq!(field::<usize>(&payload, "limit").unwrap_or(5), 4);
    }

    #[test]
    fn test_payload_from_reader_invalid_utf8() {
        assert!(payload_from_reader(&b"\xff\xfe{\"topic\":\"arrays\"}"[..]).is_empty());
        assert!(payload_from_reader(&b""[..]).is_empty());

        let payload = payload_from_reader(&b"{\"topic\":\"arrays\"}"[..]);
        assert_eq!(payload["topic"], "arrays");
    }

    #[test]
    fn test_generate_problems_after_bad_bytes() {
        let state = AppState::new(AppConfig {
            question_bank: "missing-bank.json".into(),
            book_content: "missing-book.txt".into(),
            search: SearchConfig::default(),
            seed: Some(3),
        });
        let result = run_content(&state, ContentCommand::GenerateProblems, || {
            payload_from_reader(&b"\xff\xfe{\"topic\":\"arrays\"}"[..])
        })
        .unwrap();
        assert_eq!(result["status"], "success");
        let problems = result["problems"].as_array().unwrap();
        assert_eq!(problems.len(), 3);
        assert_eq!(problems[0]["title"], "Two Sum");
    }

    #[test]
    fn test_content_init_does_not_read_payload() {
        let state = AppState::new(AppConfig {
            question_bank: "missing-bank.json".into(),
            book_content: "missing-book.txt".into(),
            search: SearchConfig::default(),
            seed: None,
        });
        let result = run_content(&state, ContentCommand::Init, || {
            panic!("content init read its payload")
        })
        .unwrap();
        assert_eq!(result["status"], "success");
        assert_eq!(result["chunks"], 0);
    }
}
