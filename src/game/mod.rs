// Rules engine and local match model

pub mod bag;
pub mod board;
pub mod evaluator;
pub mod rack;
pub mod scorer;
pub mod session;
pub mod turn;
pub mod validator;
pub mod words;

pub use board::{Board, Position, Tile};
pub use evaluator::{evaluate_move, evaluate_pending, EvaluatedMove, MoveError};
pub use scorer::Scorer;
pub use session::{Match, MatchError, MovePayload, PassPayload, StartGame, TimeUpPayload};
pub use validator::PlacementValidator;
