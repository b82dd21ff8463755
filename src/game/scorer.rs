use std::collections::HashSet;

use crate::game::{
    board::{Board, Position},
    rack::RACK_CAPACITY,
    words::Word,
};

/// Bonus for emptying a full rack in one move
pub const BINGO_BONUS: u32 = 50;

/// Result of scoring a move
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ScoreResult {
    /// Total score for the move, bonus included
    pub score: u32,
    /// Value of each scored word, in the order given
    pub word_scores: Vec<u32>,
    /// 50 when all seven tiles were placed, else 0
    pub bingo_bonus: u32,
}

pub struct Scorer;

impl Scorer {
    /// Calculate the score of a move from the words it forms.
    ///
    /// Scoring rules:
    /// - Each letter scores its tile value
    /// - Premium squares only count under tiles placed this move
    /// - DL / TL multiply that letter's value by 2 / 3
    /// - DW / TW multiply the whole word by 2 / 3, and stack
    /// - A new tile's premium applies in every word that passes through it
    /// - +50 flat when exactly seven tiles were placed
    pub fn calculate_score_with_words(
        board: &Board,
        words: &[Word],
        placed: &[Position],
    ) -> ScoreResult {
        let fresh: HashSet<Position> = placed.iter().copied().collect();

        let word_scores: Vec<u32> = words
            .iter()
            .map(|word| Self::score_word(board, word, &fresh))
            .collect();
        let bingo_bonus = Self::bingo_bonus(placed.len());

        ScoreResult {
            score: word_scores.iter().sum::<u32>() + bingo_bonus,
            word_scores,
            bingo_bonus,
        }
    }

    /// Calculate just the total
    pub fn calculate_score(board: &Board, words: &[Word], placed: &[Position]) -> u32 {
        Self::calculate_score_with_words(board, words, placed).score
    }

    /// Value of a single word
    pub fn score_word(board: &Board, word: &Word, fresh: &HashSet<Position>) -> u32 {
        let mut word_score = 0;
        let mut word_multiplier = 1;

        for pos in &word.cells {
            let cell = board.cell(*pos);
            let Some(tile) = &cell.tile else {
                continue;
            };
            let mut letter_score = tile.points;

            if fresh.contains(pos) {
                if let Some(multiplier) = cell.multiplier {
                    letter_score *= multiplier.letter_factor();
                    word_multiplier *= multiplier.word_factor();
                }
            }

            word_score += letter_score;
        }

        word_score * word_multiplier
    }

    fn bingo_bonus(tiles_placed: usize) -> u32 {
        if tiles_placed == RACK_CAPACITY { BINGO_BONUS } else { 0 }
    }
}
