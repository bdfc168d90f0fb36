use anyhow::Result;
use serde_json::{json, Map, Value};
use tracing::warn;

use super::field;
use crate::content::generate;
use crate::content::recommend::{self, Performance};
use crate::content::{ContentChunk, ContentProcessor};
use crate::state::AppState;

/// Chunks passed in the payload win over the configured book. An unreadable
/// book leaves no chunks.
fn chunks_for(state: &AppState, payload: &Map<String, Value>) -> ContentProcessor {
    match field::<Vec<ContentChunk>>(payload, "chunks") {
        Some(chunks) => ContentProcessor::from_chunks(chunks),
        None => state.content_processor().unwrap_or_else(|e| {
            warn!(error = ?e, "book content unavailable, continuing without chunks");
            ContentProcessor::default()
        }),
    }
}

pub fn generate_mcq(state: &AppState, payload: &Map<String, Value>) -> Result<Value> {
    let topic = field::<String>(payload, "topic").unwrap_or_else(|| "general".to_string());
    let difficulty =
        field::<String>(payload, "difficulty").unwrap_or_else(|| "beginner".to_string());
    let count = field::<usize>(payload, "count").unwrap_or(5);

    let processor = chunks_for(state, payload);
    let mut rng = state.rng();
    let questions =
        generate::generate_mcq(processor.chunks(), &topic, &difficulty, count, &mut rng);
    Ok(json!({ "status": "success", "questions": questions }))
}

pub fn generate_problems(payload: &Map<String, Value>) -> Result<Value> {
    let topic = field::<String>(payload, "topic").unwrap_or_else(|| "arrays".to_string());
    let difficulty = field::<String>(payload, "difficulty").unwrap_or_else(|| "Easy".to_string());
    let count = field::<usize>(payload, "count").unwrap_or(3);

    let problems = generate::generate_problems(&topic, &difficulty, count);
    Ok(json!({ "status": "success", "problems": problems }))
}

pub fn recommend(state: &AppState, payload: &Map<String, Value>) -> Result<Value> {
    let user_id = field::<String>(payload, "userId").unwrap_or_default();
    let performance = field::<Performance>(payload, "performance").unwrap_or_default();

    let processor = chunks_for(state, payload);
    let recommendations = recommend::recommend(&user_id, &performance, processor.chunks());
    Ok(json!({ "status": "success", "recommendations": recommendations }))
}
