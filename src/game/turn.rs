use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which end of the table, seen from this client
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Local,
    Remote,
}

impl Side {
    pub fn other(self) -> Side {
        match self {
            Side::Local => Side::Remote,
            Side::Remote => Side::Local,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub enum EndReason {
    TimeExpired,
    Abandoned,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq)]
pub struct Outcome {
    pub winner: Side,
    pub reason: EndReason,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, Eq, PartialEq)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum TurnState {
    #[default]
    WaitingForOpponent,
    MyTurn,
    OpponentTurn,
    GameOver(Outcome),
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum TurnEvent {
    GameStarted { i_start: bool },
    LocalMove,
    LocalPass,
    LocalExchange,
    /// The relay refused the move this side just sent
    LocalMoveRejected,
    RemoteMove,
    RemotePass,
    TimeExpired(Side),
    Left(Side),
}

#[derive(Debug, Clone, Copy, Error, Eq, PartialEq)]
pub enum TurnError {
    #[error("Не е ваш ред")]
    OutOfTurn,
    #[error("Играта приключи")]
    GameFinished,
}

impl TurnState {
    /// Next state after `event`. Pairs that make no sense in the current
    /// state are rejected and leave the caller's state as it was.
    pub fn apply(&self, event: TurnEvent) -> Result<TurnState, TurnError> {
        use TurnEvent::*;
        use TurnState::*;

        match (*self, event) {
            (GameOver(_), _) => Err(TurnError::GameFinished),

            (WaitingForOpponent, GameStarted { i_start: true }) => Ok(MyTurn),
            (WaitingForOpponent, GameStarted { i_start: false }) => Ok(OpponentTurn),

            (MyTurn, LocalMove | LocalPass) => Ok(OpponentTurn),
            (MyTurn, LocalExchange) => Ok(MyTurn),
            (OpponentTurn, RemoteMove | RemotePass | LocalMoveRejected) => Ok(MyTurn),

            (MyTurn | OpponentTurn, TimeExpired(loser)) => Ok(GameOver(Outcome {
                winner: loser.other(),
                reason: EndReason::TimeExpired,
            })),
            (_, Left(leaver)) => Ok(GameOver(Outcome {
                winner: leaver.other(),
                reason: EndReason::Abandoned,
            })),

            _ => Err(TurnError::OutOfTurn),
        }
    }

    pub fn is_my_turn(&self) -> bool {
        matches!(self, TurnState::MyTurn)
    }

    /// Gate for actions only the player to move may take
    pub fn ensure_my_turn(&self) -> Result<(), TurnError> {
        match self {
            TurnState::MyTurn => Ok(()),
            TurnState::GameOver(_) => Err(TurnError::GameFinished),
            _ => Err(TurnError::OutOfTurn),
        }
    }
}
