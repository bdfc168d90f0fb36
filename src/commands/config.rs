use anyhow::Result;
use serde_json::Value;

use crate::state::AppState;

/// Effective configuration after environment and flag overrides.
pub fn config(state: &AppState) -> Result<Value> {
    Ok(serde_json::to_value(&state.config)?)
}
