use rand::{seq::SliceRandom, Rng};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{game::board::Tile, utils::letters::TILE_DISTRIBUTION};

#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum BagError {
    #[error("only {available} tiles left in the bag, {requested} needed")]
    NotEnoughTiles { available: usize, requested: usize },
}

/// Undrawn tiles. Draws always come from the front.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Eq, PartialEq)]
#[serde(transparent)]
pub struct TileBag {
    tiles: Vec<Tile>,
}

impl TileBag {
    /// A complete, shuffled bag built from the letter distribution
    pub fn full<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut tiles: Vec<Tile> = TILE_DISTRIBUTION
            .iter()
            .flat_map(|&(letter, count, points)| {
                (0..count).map(move |_| (letter, points))
            })
            .enumerate()
            .map(|(id, (letter, points))| Tile::new(format!("tile-{}", id), letter, points))
            .collect();
        tiles.shuffle(rng);

        Self { tiles }
    }

    /// Adopt a bag as received from the other player
    pub fn from_tiles(tiles: Vec<Tile>) -> Self {
        Self { tiles }
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Take up to `count` tiles from the front
    pub fn draw(&mut self, count: usize) -> Vec<Tile> {
        let count = count.min(self.tiles.len());
        self.tiles.drain(..count).collect()
    }

    /// Swap tiles with the bag: draw replacements first, then return the
    /// given tiles and reshuffle.
    pub fn exchange<R: Rng + ?Sized>(
        &mut self,
        returned: Vec<Tile>,
        rng: &mut R,
    ) -> Result<Vec<Tile>, BagError> {
        if returned.len() > self.tiles.len() {
            return Err(BagError::NotEnoughTiles {
                available: self.tiles.len(),
                requested: returned.len(),
            });
        }

        let drawn = self.draw(returned.len());
        self.tiles.extend(returned);
        self.tiles.shuffle(rng);
        Ok(drawn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::letters::total_tile_count;
    use rand::{rngs::StdRng, SeedableRng};
    use std::collections::{HashMap, HashSet};

    #[test]
    fn test_full_bag_matches_distribution() {
        let bag = TileBag::full(&mut StdRng::seed_from_u64(1));
        assert_eq!(bag.len(), total_tile_count());

        let mut counts: HashMap<char, u8> = HashMap::new();
        for tile in bag.tiles() {
            *counts.entry(tile.letter).or_default() += 1;
        }
        for &(letter, count, points) in TILE_DISTRIBUTION {
            assert_eq!(counts.get(&letter), Some(&count), "wrong count for {}", letter);
            assert!(bag
                .tiles()
                .iter()
                .filter(|t| t.letter == letter)
                .all(|t| t.points == points));
        }
    }

    #[test]
    fn test_tile_ids_are_unique() {
        let bag = TileBag::full(&mut StdRng::seed_from_u64(2));
        let ids: HashSet<&str> = bag.tiles().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids.len(), bag.len());
    }

    #[test]
    fn test_shuffle_depends_on_rng() {
        let a = TileBag::full(&mut StdRng::seed_from_u64(3));
        let b = TileBag::full(&mut StdRng::seed_from_u64(3));
        let c = TileBag::full(&mut StdRng::seed_from_u64(4));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_draw_from_front() {
        let mut bag = TileBag::full(&mut StdRng::seed_from_u64(5));
        let front: Vec<Tile> = bag.tiles()[..7].to_vec();
        assert_eq!(bag.draw(7), front);
        assert_eq!(bag.len(), 93);

        let rest = bag.draw(500);
        assert_eq!(rest.len(), 93);
        assert!(bag.is_empty());
    }

    #[test]
    fn test_exchange_keeps_tile_count() {
        let mut rng = StdRng::seed_from_u64(6);
        let mut bag = TileBag::full(&mut rng);
        let hand = bag.draw(3);
        let returned_ids: HashSet<String> = hand.iter().map(|t| t.id.clone()).collect();

        let drawn = bag.exchange(hand, &mut rng).unwrap();
        assert_eq!(drawn.len(), 3);
        assert_eq!(bag.len(), 97);
        assert!(drawn.iter().all(|t| !returned_ids.contains(&t.id)));
        assert!(returned_ids
            .iter()
            .all(|id| bag.tiles().iter().any(|t| &t.id == id)));
    }

    #[test]
    fn test_exchange_needs_enough_tiles() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut bag = TileBag::from_tiles(vec![Tile::new("x", 'А', 1)]);
        let hand = vec![Tile::new("a", 'Б', 2), Tile::new("b", 'В', 2)];
        assert_eq!(
            bag.exchange(hand, &mut rng),
            Err(BagError::NotEnoughTiles {
                available: 1,
                requested: 2
            })
        );
        assert_eq!(bag.len(), 1);
    }
}
