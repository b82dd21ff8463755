use serde::{Deserialize, Serialize};

use crate::game::session::{MovePayload, PassPayload, StartGame, TimeUpPayload};

/// Messages sent from client to server
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClientMessage {
    #[serde(rename_all = "camelCase")]
    CreateRoom {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        game_code: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    Join {
        game_code: String,
        player_name: String,
    },
    StartGame(StartGame),
    SubmitMove(MovePayload),
    Pass(PassPayload),
    TimeUp(TimeUpPayload),
    Leave,
}

/// Messages sent from server to client
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServerMessage {
    #[serde(rename_all = "camelCase")]
    RoomCreated {
        game_code: String,
    },
    #[serde(rename_all = "camelCase")]
    Joined {
        game_code: String,
    },
    #[serde(rename_all = "camelCase")]
    PlayerJoined {
        player_name: String,
    },
    Error {
        error: String,
    },
    MoveRejected {
        reason: String,
    },
    // Relayed from the opponent unchanged
    StartGame(StartGame),
    SubmitMove(MovePayload),
    Pass(PassPayload),
    TimeUp(TimeUpPayload),
    Leave,
}
