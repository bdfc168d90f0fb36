use anyhow::Result;
use serde_json::{json, Value};
use tracing::warn;

use crate::state::AppState;

/// List bank questions, optionally filtered by topic.
pub fn questions(state: &AppState, topic: Option<&str>, limit: Option<usize>) -> Result<Value> {
    let qa = state.qa_engine()?;
    let questions = qa.kb().list_questions(topic, limit);
    Ok(json!({ "count": questions.len(), "questions": questions }))
}

pub fn practice(state: &AppState, count: usize) -> Result<Value> {
    let qa = state.qa_engine()?;
    if qa.kb().is_empty() {
        warn!("question bank is empty, nothing to practice");
    }
    let mut rng = state.rng();
    let questions = qa.kb().practice_set(count, &mut rng);
    Ok(json!({ "count": questions.len(), "questions": questions }))
}
