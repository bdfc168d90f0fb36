use anyhow::Result;
use serde_json::{json, Map, Value};

use super::field;
use crate::content::ContentProcessor;
use crate::state::AppState;

/// Chunk the configured book file.
pub fn init(state: &AppState) -> Result<Value> {
    let processor = state.content_processor()?;
    Ok(json!({
        "status": "success",
        "message": "Content processor initialized",
        "chunks": processor.chunks().len(),
    }))
}

/// Chunk the book text given as `content`.
pub fn process_book(payload: &Map<String, Value>) -> Result<Value> {
    let Some(content) = field::<String>(payload, "content") else {
        return Ok(json!({ "status": "error", "message": "No content provided" }));
    };

    let mut processor = ContentProcessor::default();
    let count = processor.process_book(&content);
    Ok(json!({
        "status": "success",
        "chunks": processor.chunks(),
        "message": format!("Processed {count} chunks"),
        "processedAt": chrono::Utc::now().to_rfc3339(),
    }))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::commands::payload_from_str;

    #[test]
    fn test_process_book_ignores_configured_book() {
        let payload = payload_from_str(
            &json!({ "content": "Chapter 1: Trees\nA tree is a connected acyclic graph with a root node, and every other node has exactly one parent node above it." })
                .to_string(),
        );
        let result = process_book(&payload).unwrap();
        assert_eq!(result["status"], "success");
        assert_eq!(result["message"], "Processed 1 chunks");
        assert_eq!(result["chunks"][0]["topic"], "Trees");
    }

    #[test]
    fn test_process_book_without_content() {
        let result = process_book(&payload_from_str("{}")).unwrap();
        assert_eq!(result["status"], "error");
        assert_eq!(result["message"], "No content provided");
    }

    #[test]
    fn test_init_reports_unreadable_book() {
        let mut book = tempfile::NamedTempFile::new().unwrap();
        book.write_all(b"\xff\xfe\x00").unwrap();
        let state = AppState::new(crate::state::AppConfig {
            question_bank: "missing-bank.json".into(),
            book_content: book.path().to_path_buf(),
            search: Default::default(),
            seed: None,
        });
        assert!(init(&state).is_err());
    }
}
