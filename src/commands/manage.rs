use anyhow::Result;
use serde_json::{json, Value};
use tracing::{error, info};

use crate::state::AppState;

/// Load the bank and build the indexes, reporting what was loaded.
pub fn init(state: &AppState) -> Result<Value> {
    let qa = state.qa_engine().inspect_err(|e| {
        error!(
            path = %state.config.question_bank.display(),
            error = ?e,
            "question bank failed to load"
        );
    })?;

    let kb = qa.kb();
    info!(questions = kb.len(), "system initialized");
    Ok(json!({
        "status": "success",
        "questions": kb.len(),
        "topics": kb.topics(),
        "vocabulary": kb.vocabulary_len(),
        "autocomplete_words": qa.autocomplete_vocabulary(),
    }))
}
