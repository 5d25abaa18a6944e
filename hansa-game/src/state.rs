//! Mutable player ledger: purse, location, and held goods.
//!
//! The state itself carries no validation. Engines check their
//! preconditions before calling any mutator here; tests may assemble
//! arbitrary, even temporarily invalid, states directly.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::world::World;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
    /// Key of the town the player stands in. The travel engine only
    /// ever writes destinations it found on an outgoing road.
    pub town: String,
    pub gold: u32,
    /// Held quantity per good, seeded at zero for every known good.
    pub inventory: HashMap<String, u32>,
}

impl PlayerState {
    /// A fresh trader at the world's start town with the start purse
    /// and an empty (but fully keyed) inventory.
    #[must_use]
    pub fn new(world: &World) -> Self {
        let inventory = world
            .goods()
            .iter()
            .map(|good| (good.name.clone(), 0))
            .collect();
        Self {
            town: world.start_town().to_string(),
            gold: world.start_gold(),
            inventory,
        }
    }

    /// Held count of a good; zero when the good was never seeded.
    #[must_use]
    pub fn good_count(&self, good: &str) -> u32 {
        self.inventory.get(good).copied().unwrap_or(0)
    }

    pub fn add_goods(&mut self, good: &str, quantity: u32) {
        let held = self.inventory.entry(good.to_string()).or_insert(0);
        *held = held.saturating_add(quantity);
    }

    pub fn remove_goods(&mut self, good: &str, quantity: u32) {
        if let Some(held) = self.inventory.get_mut(good) {
            *held = held.saturating_sub(quantity);
        }
    }

    pub const fn credit(&mut self, amount: u32) {
        self.gold = self.gold.saturating_add(amount);
    }

    pub const fn debit(&mut self, amount: u32) {
        self.gold = self.gold.saturating_sub(amount);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::World;

    #[test]
    fn new_player_starts_with_zeroed_inventory() {
        let world = World::reference().unwrap();
        let player = PlayerState::new(&world);
        assert_eq!(player.town, "Eldham");
        assert_eq!(player.gold, 30);
        assert_eq!(player.inventory.len(), 3);
        for good in world.goods() {
            assert_eq!(player.good_count(&good.name), 0);
        }
    }

    #[test]
    fn unknown_good_counts_as_zero() {
        let world = World::reference().unwrap();
        let player = PlayerState::new(&world);
        assert_eq!(player.good_count("Silk"), 0);
    }

    #[test]
    fn ledger_mutators_saturate_instead_of_wrapping() {
        let world = World::reference().unwrap();
        let mut player = PlayerState::new(&world);
        player.debit(u32::MAX);
        assert_eq!(player.gold, 0);
        player.credit(u32::MAX);
        player.credit(10);
        assert_eq!(player.gold, u32::MAX);
        player.remove_goods("Grain", 5);
        assert_eq!(player.good_count("Grain"), 0);
    }
}
