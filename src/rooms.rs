use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::{
    dictionary::WordList,
    game::{board::Board, evaluator::evaluate_pending, session::MovePayload},
    utils::letters::letter_value,
    websocket::messages::ServerMessage,
};

/// Allowed characters for room codes - excludes I, O, 0, 1 for readability
pub const ROOM_CODE_CHARSET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";
/// Length of generated room codes
pub const ROOM_CODE_LENGTH: usize = 6;

#[derive(Debug, Error, Eq, PartialEq)]
pub enum RelayError {
    #[error("Стаята не съществува")]
    RoomNotFound,
    #[error("Стаята е пълна")]
    RoomFull,
    #[error("Не сте в стая")]
    NotInRoom,
    #[error("{0}")]
    MoveRejected(String),
    #[error("connection closed")]
    Disconnected,
}

impl From<mpsc::error::SendError<ServerMessage>> for RelayError {
    fn from(_: mpsc::error::SendError<ServerMessage>) -> Self {
        RelayError::Disconnected
    }
}

/// One end of a room's connection pair
#[derive(Debug, Clone)]
pub struct Participant {
    pub connection_id: Uuid,
    pub name: Option<String>,
    pub tx: mpsc::Sender<ServerMessage>,
}

impl Participant {
    /// Name for log lines; the host sends none when opening a room
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("host")
    }
}

/// Two connections paired by a code
#[derive(Debug)]
pub struct Room {
    pub code: String,
    pub host: Option<Participant>,
    pub guest: Option<Participant>,
    /// Last board the relay accepted; moves are checked against it
    pub verified_board: Board,
    pub moves_relayed: u64,
    pub created_at: DateTime<Utc>,
}

impl Room {
    pub fn new(code: String) -> Self {
        Self {
            code,
            host: None,
            guest: None,
            verified_board: Board::new(),
            moves_relayed: 0,
            created_at: Utc::now(),
        }
    }

    pub fn contains(&self, connection_id: Uuid) -> bool {
        [&self.host, &self.guest]
            .into_iter()
            .flatten()
            .any(|p| p.connection_id == connection_id)
    }

    /// The other participant, if `connection_id` is in this room and someone is across
    pub fn opponent_of(&self, connection_id: Uuid) -> Option<&Participant> {
        let is = |seat: &Option<Participant>| {
            seat.as_ref().is_some_and(|p| p.connection_id == connection_id)
        };
        if is(&self.host) {
            self.guest.as_ref()
        } else if is(&self.guest) {
            self.host.as_ref()
        } else {
            None
        }
    }

    pub fn status(&self) -> RoomStatus {
        RoomStatus {
            game_code: self.code.clone(),
            has_host: self.host.is_some(),
            has_guest: self.guest.is_some(),
            board_version: self.verified_board.version(),
            moves_relayed: self.moves_relayed,
            created_at: self.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomStatus {
    pub game_code: String,
    pub has_host: bool,
    pub has_guest: bool,
    pub board_version: u64,
    pub moves_relayed: u64,
    pub created_at: DateTime<Utc>,
}

/// All open rooms, keyed by code
#[derive(Debug, Default)]
pub struct RoomRegistry {
    rooms: DashMap<String, Room>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    /// Open a room with `host` in it. A missing code is generated; an
    /// existing code gets a new host and keeps its guest.
    pub fn create(&self, code: Option<String>, host: Participant) -> String {
        let code = code.unwrap_or_else(|| self.unused_code());
        self.rooms
            .entry(code.clone())
            .or_insert_with(|| {
                tracing::info!("Created room {}", code);
                Room::new(code.clone())
            })
            .host = Some(host);
        code
    }

    /// Seat `guest` in an existing room. Returns the host's sender so the
    /// caller can announce the guest.
    pub fn join(
        &self,
        code: &str,
        guest: Participant,
    ) -> Result<Option<mpsc::Sender<ServerMessage>>, RelayError> {
        let mut room = self.rooms.get_mut(code).ok_or(RelayError::RoomNotFound)?;
        if room.guest.is_some() {
            return Err(RelayError::RoomFull);
        }
        room.guest = Some(guest);
        Ok(room.host.as_ref().map(|host| host.tx.clone()))
    }

    /// Code of the room `connection_id` sits in
    pub fn room_of(&self, connection_id: Uuid) -> Option<String> {
        self.rooms
            .iter()
            .find(|room| room.contains(connection_id))
            .map(|room| room.key().clone())
    }

    pub fn opponent_tx(&self, code: &str, connection_id: Uuid) -> Option<mpsc::Sender<ServerMessage>> {
        self.rooms
            .get(code)
            .and_then(|room| room.opponent_of(connection_id).map(|p| p.tx.clone()))
    }

    /// A new game begins in the room
    pub fn reset_board(&self, code: &str) {
        if let Some(mut room) = self.rooms.get_mut(code) {
            room.verified_board = Board::new();
        }
    }

    /// Record a submitted move. With a word list the move is re-evaluated
    /// against the room's last accepted board first; without one the
    /// claimed board is adopted as is.
    pub fn accept_move<D>(
        &self,
        code: &str,
        payload: &MovePayload,
        verifier: Option<&D>,
    ) -> Result<(), RelayError>
    where
        D: WordList + ?Sized,
    {
        let mut room = self.rooms.get_mut(code).ok_or(RelayError::RoomNotFound)?;
        let next = match verifier {
            Some(dictionary) => verify_move(&room.verified_board, payload, dictionary)?,
            None => payload.board.clone(),
        };
        room.verified_board = next;
        room.moves_relayed += 1;
        Ok(())
    }

    pub fn remove(&self, code: &str) -> Option<Room> {
        let removed = self.rooms.remove(code).map(|(_, room)| room);
        if removed.is_some() {
            tracing::info!("Removed room {}", code);
        }
        removed
    }

    /// `connection_id` leaves `code`. The room is removed and the sender of
    /// whoever is left in it returned.
    pub fn close(&self, code: &str, connection_id: Uuid) -> Option<mpsc::Sender<ServerMessage>> {
        let room = self.remove(code)?;
        if let Some(leaver) = [&room.host, &room.guest]
            .into_iter()
            .flatten()
            .find(|p| p.connection_id == connection_id)
        {
            tracing::info!("{} left room {}", leaver.display_name(), code);
        }
        room.opponent_of(connection_id).map(|p| p.tx.clone())
    }

    pub fn status(&self, code: &str) -> Option<RoomStatus> {
        self.rooms.get(code).map(|room| room.status())
    }

    fn unused_code(&self) -> String {
        loop {
            let code = generate_room_code();
            if !self.rooms.contains_key(&code) {
                return code;
            }
        }
    }
}

/// Re-run the evaluator on the tiles `payload` adds to `verified` and check
/// the claimed words and score. Returns the new committed board.
pub fn verify_move<D>(
    verified: &Board,
    payload: &MovePayload,
    dictionary: &D,
) -> Result<Board, RelayError>
where
    D: WordList + ?Sized,
{
    let mut candidate = verified
        .placements_toward(&payload.board)
        .map_err(|e| RelayError::MoveRejected(format!("Невалидна дъска: {}", e)))?;
    for pos in candidate.new_tile_positions() {
        if let Some(tile) = &candidate.cell(pos).tile {
            if letter_value(tile.letter) != Some(tile.points) {
                return Err(RelayError::MoveRejected(format!(
                    "Невалидна плочка {} ({} т.) на {}",
                    tile.letter, tile.points, pos
                )));
            }
        }
    }
    let evaluated = evaluate_pending(&candidate, dictionary)
        .map_err(|e| RelayError::MoveRejected(e.to_string()))?;

    if evaluated.score != payload.score {
        return Err(RelayError::MoveRejected(format!(
            "Грешен резултат: заявени {}, изчислени {}",
            payload.score, evaluated.score
        )));
    }
    if evaluated.words != payload.words {
        return Err(RelayError::MoveRejected(format!(
            "Думите не съвпадат: {}",
            evaluated.words.join(", ")
        )));
    }

    candidate.commit();
    Ok(candidate)
}

/// Generate a short, readable room code (6 alphanumeric characters)
fn generate_room_code() -> String {
    use rand::Rng;
    let mut rng = rand::rng();
    (0..ROOM_CODE_LENGTH)
        .map(|_| {
            let idx = rng.random_range(0..ROOM_CODE_CHARSET.len());
            ROOM_CODE_CHARSET[idx] as char
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::Dictionary;
    use crate::game::{
        bag::TileBag,
        board::{Position, Tile},
        rack::Rack,
    };

    fn create_test_participant() -> (Participant, mpsc::Receiver<ServerMessage>) {
        let (tx, rx) = mpsc::channel(8);
        let participant = Participant {
            connection_id: Uuid::new_v4(),
            name: None,
            tx,
        };
        (participant, rx)
    }

    /// ОАД across the centre, committed, as a client would relay it
    fn first_move_payload(score: u32, words: &[&str]) -> MovePayload {
        let mut board = Board::new();
        for (i, (letter, points)) in [('О', 1), ('А', 1), ('Д', 2)].into_iter().enumerate() {
            board
                .place_tile(Position::new(7, 6 + i), Tile::new(format!("tile-{}", i), letter, points))
                .unwrap();
        }
        board.commit();
        MovePayload {
            board,
            score,
            words: words.iter().map(|w| w.to_string()).collect(),
            new_rack: Rack::default(),
            tile_bag: TileBag::default(),
            tiles_remaining: 0,
            time_left: None,
        }
    }

    #[test]
    fn test_generate_room_code_length() {
        for _ in 0..100 {
            let code = generate_room_code();
            assert_eq!(
                code.len(),
                ROOM_CODE_LENGTH,
                "Generated room code '{}' should be exactly {} characters",
                code,
                ROOM_CODE_LENGTH
            );
        }
    }

    #[test]
    fn test_generate_room_code_charset() {
        for _ in 0..100 {
            let code = generate_room_code();
            for c in code.chars() {
                assert!(
                    ROOM_CODE_CHARSET.contains(&(c as u8)),
                    "Character '{}' in code '{}' is not in allowed charset",
                    c,
                    code
                );
            }
        }
    }

    #[test]
    fn test_create_and_join() {
        let rooms = RoomRegistry::new();
        let (host, mut host_rx) = create_test_participant();
        let (guest, _guest_rx) = create_test_participant();
        let host_id = host.connection_id;
        let guest_id = guest.connection_id;

        let code = rooms.create(None, host);
        assert_eq!(code.len(), ROOM_CODE_LENGTH);
        assert_eq!(rooms.room_of(host_id), Some(code.clone()));

        let host_tx = rooms.join(&code, guest).unwrap().expect("host should be reachable");
        host_tx
            .try_send(ServerMessage::Leave)
            .expect("host channel should accept messages");
        assert!(matches!(host_rx.try_recv(), Ok(ServerMessage::Leave)));

        assert_eq!(rooms.room_of(guest_id), Some(code.clone()));
        assert!(rooms.opponent_tx(&code, guest_id).is_some());
        assert!(rooms.opponent_tx(&code, Uuid::new_v4()).is_none());
    }

    #[test]
    fn test_join_errors() {
        let rooms = RoomRegistry::new();
        let (host, _h) = create_test_participant();
        let (guest, _g) = create_test_participant();
        let (late, _l) = create_test_participant();

        assert_eq!(
            rooms.join("NOPE23", guest.clone()).unwrap_err(),
            RelayError::RoomNotFound
        );
        assert_eq!(RelayError::RoomNotFound.to_string(), "Стаята не съществува");

        rooms.create(Some("ROOM22".to_string()), host);
        rooms.join("ROOM22", guest).unwrap();
        assert_eq!(rooms.join("ROOM22", late).unwrap_err(), RelayError::RoomFull);
        assert_eq!(RelayError::RoomFull.to_string(), "Стаята е пълна");
    }

    #[test]
    fn test_recreating_room_replaces_host() {
        let rooms = RoomRegistry::new();
        let (first, _a) = create_test_participant();
        let (second, _b) = create_test_participant();
        let (guest, _g) = create_test_participant();
        let second_id = second.connection_id;

        rooms.create(Some("ROOM22".to_string()), first);
        rooms.join("ROOM22", guest).unwrap();
        rooms.create(Some("ROOM22".to_string()), second);

        assert_eq!(rooms.len(), 1);
        let status = rooms.status("ROOM22").unwrap();
        assert!(status.has_host && status.has_guest, "guest should keep their seat");
        assert_eq!(rooms.room_of(second_id), Some("ROOM22".to_string()));
    }

    #[test]
    fn test_verify_accepts_honest_move() {
        let dictionary = Dictionary::from_words(["ОАД"]);
        let payload = first_move_payload(8, &["ОАД"]);

        let board = verify_move(&Board::new(), &payload, &dictionary).unwrap();
        assert_eq!(board.version(), 1);
        assert!(board.new_tile_positions().is_empty());
        assert!(board.is_occupied(Position::new(7, 8)));
    }

    #[test]
    fn test_verify_rejects_wrong_score() {
        let dictionary = Dictionary::from_words(["ОАД"]);
        let payload = first_move_payload(80, &["ОАД"]);

        let err = verify_move(&Board::new(), &payload, &dictionary).unwrap_err();
        assert_eq!(
            err,
            RelayError::MoveRejected("Грешен резултат: заявени 80, изчислени 8".to_string())
        );
    }

    #[test]
    fn test_verify_rejects_unknown_word() {
        let payload = first_move_payload(8, &["ОАД"]);
        let err = verify_move(&Board::new(), &payload, &Dictionary::from_words(["ДОМ"])).unwrap_err();
        assert_eq!(err, RelayError::MoveRejected("\"ОАД\" не е в речника".to_string()));
    }

    #[test]
    fn test_verify_rejects_forged_tile_points() {
        let dictionary = Dictionary::from_words(["ОАД"]);
        let mut payload = first_move_payload(8, &["ОАД"]);
        let mut board = Board::new();
        for (i, (letter, points)) in [('О', 1), ('А', 10), ('Д', 2)].into_iter().enumerate() {
            board
                .place_tile(Position::new(7, 6 + i), Tile::new(format!("tile-{}", i), letter, points))
                .unwrap();
        }
        board.commit();
        payload.board = board;

        assert!(matches!(
            verify_move(&Board::new(), &payload, &dictionary),
            Err(RelayError::MoveRejected(reason)) if reason.contains("(7, 7)")
        ));
    }

    #[test]
    fn test_verify_rejects_changed_committed_tile() {
        let dictionary = Dictionary::from_words(["ОАД"]);
        let verified = verify_move(&Board::new(), &first_move_payload(8, &["ОАД"]), &dictionary).unwrap();

        let mut tampered = first_move_payload(8, &["ОАД"]);
        tampered.board = Board::new();
        assert!(matches!(
            verify_move(&verified, &tampered, &dictionary),
            Err(RelayError::MoveRejected(_))
        ));
    }

    #[test]
    fn test_accept_move_tracks_board() {
        let rooms = RoomRegistry::new();
        let (host, _h) = create_test_participant();
        let code = rooms.create(None, host);
        let dictionary = Dictionary::from_words(["ОАД"]);

        let bad = first_move_payload(9, &["ОАД"]);
        assert!(rooms.accept_move(&code, &bad, Some(&dictionary)).is_err());
        assert_eq!(rooms.status(&code).unwrap().moves_relayed, 0);

        let good = first_move_payload(8, &["ОАД"]);
        rooms.accept_move(&code, &good, Some(&dictionary)).unwrap();
        let status = rooms.status(&code).unwrap();
        assert_eq!(status.moves_relayed, 1);
        assert_eq!(status.board_version, 1);

        rooms.reset_board(&code);
        assert_eq!(rooms.status(&code).unwrap().board_version, 0);
    }

    #[test]
    fn test_accept_move_without_verifier_trusts_client() {
        let rooms = RoomRegistry::new();
        let (host, _h) = create_test_participant();
        let code = rooms.create(None, host);

        let claimed = first_move_payload(500, &["ЧУДО"]);
        rooms
            .accept_move::<Dictionary>(&code, &claimed, None)
            .unwrap();
        assert_eq!(rooms.status(&code).unwrap().moves_relayed, 1);
    }

    #[test]
    fn test_remove_room() {
        let rooms = RoomRegistry::new();
        let (host, _h) = create_test_participant();
        let host_id = host.connection_id;
        let code = rooms.create(None, host);

        assert!(rooms.remove(&code).is_some());
        assert!(rooms.is_empty());
        assert_eq!(rooms.room_of(host_id), None);
        assert!(rooms.remove(&code).is_none());
    }

    #[test]
    fn test_close_hands_back_opponent() {
        let rooms = RoomRegistry::new();
        let (host, mut host_rx) = create_test_participant();
        let (mut guest, _g) = create_test_participant();
        guest.name = Some("Мария".to_string());
        let guest_id = guest.connection_id;
        assert_eq!(host.display_name(), "host");
        assert_eq!(guest.display_name(), "Мария");

        let code = rooms.create(None, host);
        rooms.join(&code, guest).unwrap();

        let opponent = rooms.close(&code, guest_id).expect("host should still be reachable");
        opponent.try_send(ServerMessage::Leave).unwrap();
        assert!(matches!(host_rx.try_recv(), Ok(ServerMessage::Leave)));
        assert!(rooms.is_empty(), "closing removes the room");
        assert!(rooms.close(&code, guest_id).is_none());
    }
}
