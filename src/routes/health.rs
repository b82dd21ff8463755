use std::sync::Arc;

use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::{dictionary::WordList, AppState};

/// Health check endpoint
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "bg-scrabble-backend",
        "version": env!("CARGO_PKG_VERSION"),
        "dictionaryReady": state.dictionary.is_ready(),
        "rooms": state.rooms.len()
    }))
}
