use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    dictionary::WordList,
    game::{
        bag::{BagError, TileBag},
        board::{Board, BoardError, Position},
        evaluator::{evaluate_pending, EvaluatedMove, MoveError},
        rack::{Rack, RackError, RACK_CAPACITY},
        turn::{Side, TurnError, TurnEvent, TurnState},
    },
};

#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum MatchError {
    #[error(transparent)]
    Turn(#[from] TurnError),
    #[error(transparent)]
    Board(#[from] BoardError),
    #[error(transparent)]
    Rack(#[from] RackError),
    #[error(transparent)]
    Bag(#[from] BagError),
    #[error(transparent)]
    IllegalMove(#[from] MoveError),
    #[error("Няма изпратен ход")]
    NothingSent,
}

/// Everything the guest needs to begin: sent by the host once both are in the room
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StartGame {
    pub host_name: String,
    pub guest_name: String,
    pub tile_bag: TileBag,
    pub host_rack: Rack,
    pub guest_rack: Rack,
    pub timer_seconds: u32,
}

/// A committed move as relayed to the opponent
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MovePayload {
    pub board: Board,
    pub score: u32,
    pub words: Vec<String>,
    pub new_rack: Rack,
    pub tile_bag: TileBag,
    pub tiles_remaining: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_left: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PassPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_left: Option<u32>,
    /// The passer's bag, which an exchange earlier in the turn may have changed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tile_bag: Option<TileBag>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TimeUpPayload {
    pub loser_name: String,
    pub my_score: u32,
    pub opponent_score: u32,
}

/// State from just before a submit, held until the opponent answers
#[derive(Debug, Clone)]
struct SentMove {
    board: Board,
    rack: Rack,
    bag: TileBag,
    my_score: u32,
    history_len: usize,
}

#[derive(Debug, Clone, Serialize, Eq, PartialEq)]
pub struct MoveRecord {
    pub side: Side,
    pub words: Vec<String>,
    pub score: u32,
}

/// One player's view of a two-player game.
///
/// The host deals and moves first. Local actions return the payload to relay;
/// the opponent's payloads are adopted as sent, without re-evaluation.
#[derive(Debug, Clone)]
pub struct Match {
    my_name: String,
    opponent_name: String,
    is_host: bool,
    board: Board,
    rack: Rack,
    /// Rack dealt for the guest, held by the host until the game starts
    guest_rack: Option<Rack>,
    bag: TileBag,
    my_score: u32,
    opponent_score: u32,
    history: Vec<MoveRecord>,
    state: TurnState,
    timer_seconds: u32,
    sent: Option<SentMove>,
}

impl Match {
    /// Open a game as host: shuffle a full bag and deal both racks
    pub fn host<R: Rng + ?Sized>(name: impl Into<String>, rng: &mut R) -> Self {
        let mut bag = TileBag::full(rng);
        let rack = Rack::new(bag.draw(RACK_CAPACITY));
        let guest_rack = Rack::new(bag.draw(RACK_CAPACITY));

        Self {
            my_name: name.into(),
            opponent_name: String::new(),
            is_host: true,
            board: Board::new(),
            rack,
            guest_rack: Some(guest_rack),
            bag,
            my_score: 0,
            opponent_score: 0,
            history: Vec::new(),
            state: TurnState::WaitingForOpponent,
            timer_seconds: 0,
            sent: None,
        }
    }

    /// Host side: the guest has arrived, begin and build the payload to send them
    pub fn start(
        &mut self,
        guest_name: impl Into<String>,
        timer_seconds: u32,
    ) -> Result<StartGame, MatchError> {
        let next = self.state.apply(TurnEvent::GameStarted { i_start: true })?;
        let guest_rack = self.guest_rack.take().unwrap_or_default();

        self.opponent_name = guest_name.into();
        self.timer_seconds = timer_seconds;
        self.state = next;

        Ok(StartGame {
            host_name: self.my_name.clone(),
            guest_name: self.opponent_name.clone(),
            tile_bag: self.bag.clone(),
            host_rack: self.rack.clone(),
            guest_rack,
            timer_seconds,
        })
    }

    /// Guest side: adopt the rack and bag the host dealt
    pub fn join(name: impl Into<String>, start: StartGame) -> Self {
        Self {
            my_name: name.into(),
            opponent_name: start.host_name,
            is_host: false,
            board: Board::new(),
            rack: start.guest_rack,
            guest_rack: None,
            bag: start.tile_bag,
            my_score: 0,
            opponent_score: 0,
            history: Vec::new(),
            state: TurnState::OpponentTurn,
            timer_seconds: start.timer_seconds,
            sent: None,
        }
    }

    pub fn my_name(&self) -> &str {
        &self.my_name
    }

    pub fn opponent_name(&self) -> &str {
        &self.opponent_name
    }

    pub fn is_host(&self) -> bool {
        self.is_host
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn rack(&self) -> &Rack {
        &self.rack
    }

    pub fn bag(&self) -> &TileBag {
        &self.bag
    }

    pub fn tiles_remaining(&self) -> usize {
        self.bag.len()
    }

    pub fn my_score(&self) -> u32 {
        self.my_score
    }

    pub fn opponent_score(&self) -> u32 {
        self.opponent_score
    }

    pub fn history(&self) -> &[MoveRecord] {
        &self.history
    }

    pub fn state(&self) -> TurnState {
        self.state
    }

    pub fn timer_seconds(&self) -> u32 {
        self.timer_seconds
    }

    /// Move a tile from the rack onto an empty cell
    pub fn place_tile(&mut self, tile_id: &str, pos: Position) -> Result<(), MatchError> {
        self.state.ensure_my_turn()?;
        self.board.check_vacant(pos)?;
        let tile = self.rack.take(tile_id)?;
        self.board.place_tile(pos, tile)?;
        Ok(())
    }

    /// Pick a tile placed this turn back up; it goes to the end of the rack
    pub fn lift_tile(&mut self, pos: Position) -> Result<(), MatchError> {
        self.state.ensure_my_turn()?;
        let tile = self.board.lift_tile(pos)?;
        self.rack.restore(std::iter::once(tile));
        Ok(())
    }

    /// Return every tile placed this turn to the rack
    pub fn recall(&mut self) -> usize {
        let tiles = self.board.recall();
        let count = tiles.len();
        self.rack.restore(tiles);
        count
    }

    pub fn reorder_rack(&mut self, active_id: &str, over_id: &str) -> Result<(), MatchError> {
        self.state.ensure_my_turn()?;
        self.rack.reorder(active_id, over_id)?;
        Ok(())
    }

    pub fn shuffle_rack<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), MatchError> {
        self.state.ensure_my_turn()?;
        self.rack.shuffle(rng);
        Ok(())
    }

    /// Evaluate the tiles on the board without committing anything
    pub fn preview<D>(&self, dictionary: &D) -> Result<EvaluatedMove, MoveError>
    where
        D: WordList + ?Sized,
    {
        evaluate_pending(&self.board, dictionary)
    }

    /// Play the tiles on the board. On success the move is committed, the
    /// rack refilled and the payload for the opponent returned. On failure
    /// nothing changes and the tiles stay where they are.
    ///
    /// Until the opponent answers, the move can still be taken back with
    /// [`Match::apply_move_rejected`].
    pub fn submit<D>(
        &mut self,
        dictionary: &D,
        time_left: Option<u32>,
    ) -> Result<MovePayload, MatchError>
    where
        D: WordList + ?Sized,
    {
        let next = self.state.apply(TurnEvent::LocalMove)?;
        let evaluated = evaluate_pending(&self.board, dictionary)?;

        self.sent = Some(SentMove {
            board: self.board.clone(),
            rack: self.rack.clone(),
            bag: self.bag.clone(),
            my_score: self.my_score,
            history_len: self.history.len(),
        });
        self.board.commit();
        self.my_score += evaluated.score;
        self.rack.refill(&mut self.bag);
        self.history.push(MoveRecord {
            side: Side::Local,
            words: evaluated.words.clone(),
            score: evaluated.score,
        });
        self.state = next;

        Ok(MovePayload {
            board: self.board.clone(),
            score: evaluated.score,
            words: evaluated.words,
            new_rack: self.rack.clone(),
            tile_bag: self.bag.clone(),
            tiles_remaining: self.bag.len(),
            time_left,
        })
    }

    /// Give up the turn; anything placed goes back to the rack
    pub fn pass(&mut self, time_left: Option<u32>) -> Result<PassPayload, MatchError> {
        let next = self.state.apply(TurnEvent::LocalPass)?;
        self.recall();
        self.state = next;
        Ok(PassPayload {
            time_left,
            tile_bag: Some(self.bag.clone()),
        })
    }

    /// The relay refused the move just submitted. Score, rack, bag and
    /// history go back to how they were, the tiles return to the board as
    /// this turn's placements, and it is our turn again.
    pub fn apply_move_rejected(&mut self, reason: &str) -> Result<(), MatchError> {
        let next = self.state.apply(TurnEvent::LocalMoveRejected)?;
        let sent = self.sent.take().ok_or(MatchError::NothingSent)?;
        tracing::warn!("Move taken back after rejection: {}", reason);

        self.board = sent.board;
        self.rack = sent.rack;
        self.bag = sent.bag;
        self.my_score = sent.my_score;
        self.history.truncate(sent.history_len);
        self.state = next;
        Ok(())
    }

    /// Swap the chosen rack tiles for fresh ones from the bag. The turn is kept.
    pub fn exchange<R: Rng + ?Sized>(
        &mut self,
        tile_ids: &[&str],
        rng: &mut R,
    ) -> Result<(), MatchError> {
        let next = self.state.apply(TurnEvent::LocalExchange)?;

        let mut rack = self.rack.clone();
        rack.restore(self.board.clone().recall());
        let returned = tile_ids
            .iter()
            .map(|id| rack.take(id))
            .collect::<Result<Vec<_>, _>>()?;
        let drawn = self.bag.exchange(returned, rng)?;
        rack.restore(drawn);

        self.board.recall();
        self.rack = rack;
        self.state = next;
        Ok(())
    }

    /// Adopt the opponent's committed move as relayed
    pub fn apply_remote_move(&mut self, payload: MovePayload) -> Result<(), MatchError> {
        let next = self.state.apply(TurnEvent::RemoteMove)?;

        self.sent = None;
        self.board = payload.board;
        self.bag = payload.tile_bag;
        self.opponent_score += payload.score;
        self.history.push(MoveRecord {
            side: Side::Remote,
            words: payload.words,
            score: payload.score,
        });
        self.state = next;
        Ok(())
    }

    /// The opponent passed; adopt their bag if they sent one
    pub fn apply_remote_pass(&mut self, payload: &PassPayload) -> Result<(), MatchError> {
        self.state = self.state.apply(TurnEvent::RemotePass)?;
        self.sent = None;
        if let Some(bag) = &payload.tile_bag {
            self.bag = bag.clone();
        }
        Ok(())
    }

    /// A clock ran out. Returns the notice for the opponent.
    pub fn time_expired(&mut self, loser: Side) -> Result<TimeUpPayload, MatchError> {
        self.state = self.state.apply(TurnEvent::TimeExpired(loser))?;
        let loser_name = match loser {
            Side::Local => self.my_name.clone(),
            Side::Remote => self.opponent_name.clone(),
        };
        Ok(TimeUpPayload {
            loser_name,
            my_score: self.my_score,
            opponent_score: self.opponent_score,
        })
    }

    /// The opponent reported that a clock ran out
    pub fn apply_time_up(&mut self, payload: &TimeUpPayload) -> Result<(), MatchError> {
        let loser = if payload.loser_name == self.my_name {
            Side::Local
        } else {
            Side::Remote
        };
        self.state = self.state.apply(TurnEvent::TimeExpired(loser))?;
        Ok(())
    }

    pub fn opponent_left(&mut self) -> Result<(), MatchError> {
        self.state = self.state.apply(TurnEvent::Left(Side::Remote))?;
        Ok(())
    }
}
