use crate::game::board::{Axis, Board, Position};

/// A run of occupied cells along one axis
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Word {
    pub cells: Vec<Position>,
    pub text: String,
}

impl Word {
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Single letters are not words; they are neither checked nor scored
    pub fn counts(&self) -> bool {
        self.len() >= 2
    }
}

pub struct WordExtractor;

impl WordExtractor {
    /// Full word through `seed` along `axis`: walk back to the first occupied
    /// cell, then collect forward until an empty cell or the edge.
    pub fn word_at(board: &Board, seed: Position, axis: Axis) -> Word {
        let mut start = seed;
        while let Some(prev) = start.step(axis, false) {
            if !board.is_occupied(prev) {
                break;
            }
            start = prev;
        }

        let mut cells = Vec::new();
        let mut text = String::new();
        let mut cursor = Some(start);
        while let Some(pos) = cursor {
            let Some(tile) = &board.cell(pos).tile else {
                break;
            };
            cells.push(pos);
            text.push(tile.letter);
            cursor = pos.step(axis, true);
        }

        Word { cells, text }
    }

    /// Every word a move forms: the main word along `axis`, then one cross
    /// word per placed tile. Single letters are dropped. Cross words that
    /// share a line are each reported; nothing is de-duplicated.
    pub fn formed_words(board: &Board, placed: &[Position], axis: Axis) -> Vec<Word> {
        let Some(&first) = placed.first() else {
            return Vec::new();
        };

        std::iter::once(Self::word_at(board, first, axis))
            .chain(
                placed
                    .iter()
                    .map(|&pos| Self::word_at(board, pos, axis.perpendicular())),
            )
            .filter(Word::counts)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::board::Tile;

    fn put(board: &mut Board, row: usize, col: usize, letter: char) {
        board
            .place_tile(
                Position::new(row, col),
                Tile::new(format!("{}-{}", row, col), letter, 1),
            )
            .unwrap();
    }

    #[test]
    fn test_word_from_middle_seed() {
        let mut board = Board::new();
        put(&mut board, 7, 6, 'К');
        put(&mut board, 7, 7, 'О');
        put(&mut board, 7, 8, 'Т');

        let word = WordExtractor::word_at(&board, Position::new(7, 7), Axis::Horizontal);
        assert_eq!(word.text, "КОТ");
        assert_eq!(
            word.cells,
            vec![Position::new(7, 6), Position::new(7, 7), Position::new(7, 8)]
        );
    }

    #[test]
    fn test_isolated_seed_is_single_letter() {
        let mut board = Board::new();
        put(&mut board, 7, 7, 'О');
        let word = WordExtractor::word_at(&board, Position::new(7, 7), Axis::Vertical);
        assert_eq!(word.len(), 1);
        assert!(!word.counts());
    }

    #[test]
    fn test_word_touching_edges() {
        let mut board = Board::new();
        for (i, letter) in "ДОМ".chars().enumerate() {
            put(&mut board, i, 0, letter);
        }
        put(&mut board, 14, 13, 'Н');
        put(&mut board, 14, 14, 'А');

        let down = WordExtractor::word_at(&board, Position::new(2, 0), Axis::Vertical);
        assert_eq!(down.text, "ДОМ");

        let across = WordExtractor::word_at(&board, Position::new(14, 14), Axis::Horizontal);
        assert_eq!(across.text, "НА");
    }

    #[test]
    fn test_formed_words_main_and_cross() {
        let mut board = Board::new();
        // committed vertical word ДА at column 8
        put(&mut board, 6, 8, 'Д');
        put(&mut board, 7, 8, 'А');
        board.commit();
        // new horizontal word on row 8 under it: ТИ at (8,7),(8,8)
        put(&mut board, 8, 7, 'Т');
        put(&mut board, 8, 8, 'И');

        let placed = board.new_tile_positions();
        let words = WordExtractor::formed_words(&board, &placed, Axis::Horizontal);
        let texts: Vec<&str> = words.iter().map(|w| w.text.as_str()).collect();
        assert_eq!(texts, vec!["ТИ", "ДАИ"]);
    }

    #[test]
    fn test_formed_words_without_placements() {
        assert!(WordExtractor::formed_words(&Board::new(), &[], Axis::Horizontal).is_empty());
    }
}
