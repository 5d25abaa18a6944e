//! Travel engine: road lookup, toll check, and the town transition.

use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::state::PlayerState;
use crate::world::World;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TravelError {
    #[error("No road leads from here to {0}. Try 'roads'.")]
    NoRoute(String),
    #[error("Need {toll} gold for the toll, have {held}.")]
    TollDue { toll: u32, held: u32 },
}

/// Outcome of a completed journey along one road.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Arrival {
    pub town: String,
    pub toll: u32,
    pub gold_left: u32,
}

/// Follow the outgoing road whose destination matches `destination`
/// case-insensitively (full name, not a prefix). One command covers
/// one edge; there is no path-finding.
///
/// The toll check precedes both mutations, so a rejected journey
/// leaves the player where they stood.
///
/// # Errors
///
/// Returns [`TravelError::NoRoute`] when no outgoing road matches and
/// [`TravelError::TollDue`] when the toll exceeds the player's gold.
pub fn travel(
    world: &World,
    player: &mut PlayerState,
    destination: &str,
) -> Result<Arrival, TravelError> {
    let road = world
        .roads_from(&player.town)
        .iter()
        .find(|road| road.to.eq_ignore_ascii_case(destination))
        .ok_or_else(|| TravelError::NoRoute(destination.to_string()))?;

    if player.gold < road.toll {
        return Err(TravelError::TollDue {
            toll: road.toll,
            held: player.gold,
        });
    }

    player.debit(road.toll);
    player.town = road.to.clone();
    debug!("traveled to {} for a {} gold toll", road.to, road.toll);

    Ok(Arrival {
        town: road.to.clone(),
        toll: road.toll,
        gold_left: player.gold,
    })
}
