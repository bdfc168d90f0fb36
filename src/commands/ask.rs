use anyhow::Result;
use serde_json::Value;
use tracing::info;

use crate::state::AppState;

/// Answer a free-text question from the bank.
pub fn query(state: &AppState, text: &str) -> Result<Value> {
    let qa = state.qa_engine()?;
    let answer = qa.answer(text);
    info!(
        status = answer.status(),
        confidence = ?answer.body().map(|b| b.confidence),
        queries = qa.query_count(),
        "query answered"
    );
    Ok(serde_json::to_value(answer)?)
}

pub fn autocomplete(state: &AppState, text: &str) -> Result<Value> {
    let qa = state.qa_engine()?;
    Ok(serde_json::to_value(qa.autocomplete(text))?)
}
