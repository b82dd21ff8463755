use rand::{seq::SliceRandom, Rng};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::game::{bag::TileBag, board::Tile};

/// Tiles a player holds after drawing
pub const RACK_CAPACITY: usize = 7;

#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum RackError {
    #[error("tile {0} is not on the rack")]
    UnknownTile(String),
}

/// A player's tiles in the order the player arranged them
#[derive(Debug, Clone, Default, Serialize, Deserialize, Eq, PartialEq)]
#[serde(transparent)]
pub struct Rack {
    tiles: Vec<Tile>,
}

impl Rack {
    pub fn new(tiles: Vec<Tile>) -> Self {
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

    pub fn contains(&self, tile_id: &str) -> bool {
        self.tiles.iter().any(|t| t.id == tile_id)
    }

    /// Tile ids, sorted, for comparing racks as multisets
    pub fn sorted_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.tiles.iter().map(|t| t.id.as_str()).collect();
        ids.sort_unstable();
        ids
    }

    /// Remove a tile by identity
    pub fn take(&mut self, tile_id: &str) -> Result<Tile, RackError> {
        let index = self
            .tiles
            .iter()
            .position(|t| t.id == tile_id)
            .ok_or_else(|| RackError::UnknownTile(tile_id.to_string()))?;
        Ok(self.tiles.remove(index))
    }

    /// Put back tiles that were taken from this rack earlier in the turn
    pub fn restore(&mut self, tiles: impl IntoIterator<Item = Tile>) {
        self.tiles.extend(tiles);
    }

    /// Move `active_id` to the slot currently held by `over_id`
    pub fn reorder(&mut self, active_id: &str, over_id: &str) -> Result<(), RackError> {
        let from = self
            .tiles
            .iter()
            .position(|t| t.id == active_id)
            .ok_or_else(|| RackError::UnknownTile(active_id.to_string()))?;
        let to = self
            .tiles
            .iter()
            .position(|t| t.id == over_id)
            .ok_or_else(|| RackError::UnknownTile(over_id.to_string()))?;

        let tile = self.tiles.remove(from);
        self.tiles.insert(to, tile);
        Ok(())
    }

    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.tiles.shuffle(rng);
    }

    /// Draw from the bag until the rack is full or the bag is empty.
    /// Returns how many tiles were drawn.
    pub fn refill(&mut self, bag: &mut TileBag) -> usize {
        let drawn = bag.draw(RACK_CAPACITY.saturating_sub(self.tiles.len()));
        let count = drawn.len();
        self.tiles.extend(drawn);
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn rack_of(ids: &[&str]) -> Rack {
        Rack::new(ids.iter().map(|id| Tile::new(*id, 'А', 1)).collect())
    }

    fn ids(rack: &Rack) -> Vec<&str> {
        rack.tiles().iter().map(|t| t.id.as_str()).collect()
    }

    #[test]
    fn test_take_by_identity_with_duplicate_letters() {
        let mut rack = rack_of(&["tile-1", "tile-2", "tile-3"]);
        let tile = rack.take("tile-2").unwrap();
        assert_eq!(tile.id, "tile-2");
        assert_eq!(ids(&rack), vec!["tile-1", "tile-3"]);
        assert_eq!(
            rack.take("tile-2"),
            Err(RackError::UnknownTile("tile-2".to_string()))
        );
    }

    #[test]
    fn test_reorder_moves_to_target_slot() {
        let mut rack = rack_of(&["a", "b", "c", "d"]);
        rack.reorder("a", "c").unwrap();
        assert_eq!(ids(&rack), vec!["b", "c", "a", "d"]);
        rack.reorder("d", "b").unwrap();
        assert_eq!(ids(&rack), vec!["d", "b", "c", "a"]);
        assert!(rack.reorder("z", "a").is_err());
    }

    #[test]
    fn test_shuffle_keeps_tiles() {
        let mut rack = rack_of(&["a", "b", "c", "d", "e", "f", "g"]);
        let before = rack.sorted_ids().into_iter().map(String::from).collect::<Vec<_>>();
        rack.shuffle(&mut StdRng::seed_from_u64(7));
        assert_eq!(rack.sorted_ids(), before);
    }

    #[test]
    fn test_refill_draws_up_to_capacity() {
        let mut bag = TileBag::from_tiles((0..10).map(|i| Tile::new(format!("b{}", i), 'О', 1)).collect());
        let mut rack = rack_of(&["a", "b"]);
        assert_eq!(rack.refill(&mut bag), 5);
        assert_eq!(rack.len(), RACK_CAPACITY);
        assert_eq!(bag.len(), 5);
        // Draws come from the front of the bag
        assert_eq!(rack.tiles()[2].id, "b0");
    }

    #[test]
    fn test_refill_from_short_bag() {
        let mut bag = TileBag::from_tiles(vec![Tile::new("b0", 'О', 1)]);
        let mut rack = rack_of(&["a"]);
        assert_eq!(rack.refill(&mut bag), 1);
        assert_eq!(rack.len(), 2);
        assert!(bag.is_empty());
    }
}
