use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;

use crate::{rooms::RoomStatus, AppState};

/// Look up an open room by code
pub async fn room_status(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
) -> Result<Json<RoomStatus>, StatusCode> {
    state
        .rooms
        .status(&code)
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSettings {
    pub timer_seconds: u32,
    pub revalidate_moves: bool,
}

/// Defaults a client should start a new game with
pub async fn game_settings(State(state): State<Arc<AppState>>) -> Json<GameSettings> {
    Json(GameSettings {
        timer_seconds: state.config.game.timer_seconds,
        revalidate_moves: state.config.game.revalidate_moves,
    })
}
