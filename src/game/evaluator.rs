use serde::Serialize;
use thiserror::Error;

use crate::{
    dictionary::WordList,
    game::{
        board::{Board, Position},
        scorer::Scorer,
        validator::{PlacementError, PlacementValidator},
        words::WordExtractor,
    },
};

/// Why a move was rejected. The message is what the player sees.
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum MoveError {
    #[error(transparent)]
    Placement(#[from] PlacementError),
    #[error("Думата трябва да е поне 2 букви")]
    WordTooShort,
    #[error("\"{0}\" не е в речника")]
    NotInDictionary(String),
    #[error("Речникът все още не е зареден, опитайте отново")]
    DictionaryUnavailable,
}

/// A legal move: the words it forms and what it scores
#[derive(Debug, Clone, Serialize, Eq, PartialEq)]
pub struct EvaluatedMove {
    pub words: Vec<String>,
    pub score: u32,
    pub tiles_placed: usize,
}

/// Decide whether the tiles at `placed` form a legal move on `board` and score it.
///
/// The board is only read. Words are checked one at a time and the first
/// unknown word is reported; the move is rejected as a whole.
pub fn evaluate_move<D>(
    board: &Board,
    dictionary: &D,
    placed: &[Position],
) -> Result<EvaluatedMove, MoveError>
where
    D: WordList + ?Sized,
{
    let axis = PlacementValidator::check(board, placed)?;

    let words = WordExtractor::formed_words(board, placed, axis);
    if words.is_empty() {
        return Err(MoveError::WordTooShort);
    }

    if !dictionary.is_ready() {
        return Err(MoveError::DictionaryUnavailable);
    }
    if let Some(unknown) = words.iter().find(|word| !dictionary.contains(&word.text)) {
        return Err(MoveError::NotInDictionary(unknown.text.clone()));
    }

    let score = Scorer::calculate_score(board, &words, placed);

    Ok(EvaluatedMove {
        words: words.into_iter().map(|word| word.text).collect(),
        score,
        tiles_placed: placed.len(),
    })
}

/// Evaluate whatever tiles are currently marked as placed this turn
pub fn evaluate_pending<D>(board: &Board, dictionary: &D) -> Result<EvaluatedMove, MoveError>
where
    D: WordList + ?Sized,
{
    evaluate_move(board, dictionary, &board.new_tile_positions())
}
