use crate::{
    dictionary::Dictionary,
    rooms::{Participant, RelayError},
    websocket::messages::{ClientMessage, ServerMessage},
    AppState,
};
use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::IntoResponse,
};
use futures::{sink::SinkExt, stream::StreamExt};
use std::sync::Arc;
use tokio::sync::mpsc;
use uuid::Uuid;

/// WebSocket upgrade handler
pub async fn handle_websocket(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handle individual WebSocket connection
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let connection_id = Uuid::new_v4();
    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::channel::<ServerMessage>(state.config.server.channel_capacity);

    tracing::info!("WebSocket connection established: {}", connection_id);

    // Spawn a task to send messages to the client
    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            match serde_json::to_string(&msg) {
                Ok(json) => {
                    if sender.send(Message::Text(json.into())).await.is_err() {
                        break;
                    }
                }
                Err(e) => {
                    tracing::error!("Failed to serialize message: {}", e);
                }
            }
        }
    });

    // Handle incoming messages from the client
    let state_for_recv = state.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            match msg {
                Message::Text(text) => match serde_json::from_str::<ClientMessage>(&text) {
                    Ok(client_msg) => {
                        if let Err(e) =
                            handle_client_message(client_msg, &state_for_recv, connection_id, &tx)
                                .await
                        {
                            let reply = match e {
                                RelayError::Disconnected => break,
                                RelayError::MoveRejected(reason) => {
                                    tracing::warn!(
                                        "Rejected move from {}: {}",
                                        connection_id,
                                        reason
                                    );
                                    ServerMessage::MoveRejected { reason }
                                }
                                other => {
                                    tracing::debug!("Relay error for {}: {}", connection_id, other);
                                    ServerMessage::Error {
                                        error: other.to_string(),
                                    }
                                }
                            };
                            let _ = tx.send(reply).await;
                        }
                    }
                    Err(e) => {
                        tracing::error!("Failed to parse message: {}", e);
                        let error_msg = ServerMessage::Error {
                            error: format!("Невалидно съобщение: {}", e),
                        };
                        let _ = tx.send(error_msg).await;
                    }
                },
                Message::Close(_) => {
                    tracing::info!("Client disconnected: {}", connection_id);
                    break;
                }
                _ => {}
            }
        }
    });

    // Wait for either task to finish
    tokio::select! {
        _ = (&mut send_task) => {
            recv_task.abort();
        }
        _ = (&mut recv_task) => {
            send_task.abort();
        }
    }

    // Close the room and tell the opponent
    if let Some(code) = state.rooms.room_of(connection_id) {
        close_room(&state, &code, connection_id).await;
    }

    tracing::info!("WebSocket connection closed: {}", connection_id);
}

/// Handle individual client messages
async fn handle_client_message(
    msg: ClientMessage,
    state: &AppState,
    connection_id: Uuid,
    tx: &mpsc::Sender<ServerMessage>,
) -> Result<(), RelayError> {
    match msg {
        ClientMessage::CreateRoom { game_code } => {
            let host = Participant {
                connection_id,
                name: None,
                tx: tx.clone(),
            };
            let game_code = state.rooms.create(game_code, host);
            tracing::info!("Host {} opened room {}", connection_id, game_code);
            tx.send(ServerMessage::RoomCreated { game_code }).await?;
        }
        ClientMessage::Join {
            game_code,
            player_name,
        } => {
            let guest = Participant {
                connection_id,
                name: Some(player_name.clone()),
                tx: tx.clone(),
            };
            let host = state.rooms.join(&game_code, guest)?;
            tracing::info!("Guest {} joined room {}", player_name, game_code);

            if let Some(host) = host {
                deliver(&host, ServerMessage::PlayerJoined { player_name }).await;
            }
            tx.send(ServerMessage::Joined { game_code }).await?;
        }
        ClientMessage::StartGame(start) => {
            let code = state.rooms.room_of(connection_id).ok_or(RelayError::NotInRoom)?;
            state.rooms.reset_board(&code);
            tracing::info!(
                "Game started in room {}: {} vs {}",
                code,
                start.host_name,
                start.guest_name
            );
            relay(state, &code, connection_id, ServerMessage::StartGame(start)).await;
        }
        ClientMessage::SubmitMove(payload) => {
            let code = state.rooms.room_of(connection_id).ok_or(RelayError::NotInRoom)?;
            let verifier = state
                .config
                .game
                .revalidate_moves
                .then_some(&state.dictionary);
            state
                .rooms
                .accept_move::<Dictionary>(&code, &payload, verifier)?;
            tracing::debug!(
                "Relaying move in room {}: {:?} for {}",
                code,
                payload.words,
                payload.score
            );
            relay(state, &code, connection_id, ServerMessage::SubmitMove(payload)).await;
        }
        ClientMessage::Pass(pass) => {
            let code = state.rooms.room_of(connection_id).ok_or(RelayError::NotInRoom)?;
            relay(state, &code, connection_id, ServerMessage::Pass(pass)).await;
        }
        ClientMessage::TimeUp(time_up) => {
            let code = state.rooms.room_of(connection_id).ok_or(RelayError::NotInRoom)?;
            tracing::info!("Time up in room {}: {} lost", code, time_up.loser_name);
            relay(state, &code, connection_id, ServerMessage::TimeUp(time_up)).await;
        }
        ClientMessage::Leave => {
            let code = state.rooms.room_of(connection_id).ok_or(RelayError::NotInRoom)?;
            close_room(state, &code, connection_id).await;
        }
    }

    Ok(())
}

/// Forward a message to the other participant of `code`, if there is one
async fn relay(state: &AppState, code: &str, connection_id: Uuid, msg: ServerMessage) {
    match state.rooms.opponent_tx(code, connection_id) {
        Some(opponent) => deliver(&opponent, msg).await,
        None => tracing::debug!("No opponent in room {} to relay to", code),
    }
}

/// Remove the room, then send `LEAVE` to whoever is left in it
async fn close_room(state: &AppState, code: &str, connection_id: Uuid) {
    if let Some(opponent) = state.rooms.close(code, connection_id) {
        deliver(&opponent, ServerMessage::Leave).await;
    }
}

async fn deliver(tx: &mpsc::Sender<ServerMessage>, msg: ServerMessage) {
    if let Err(e) = tx.send(msg).await {
        tracing::warn!("Dropped message for closed connection: {}", e);
    }
}
