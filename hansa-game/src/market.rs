//! Market engine: pricing and buy/sell transactions.

use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::state::PlayerState;
use crate::world::Town;

/// Sell offers pay this share of the listed price, floored per unit.
pub const SELL_MARGIN_PCT: u32 = 90;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarketError {
    #[error("Invalid quantity.")]
    InvalidQuantity,
    #[error("Nobody here trades {0}.")]
    UnknownGood(String),
    #[error("Not enough gold: need {needed}, have {held}.")]
    InsufficientFunds { needed: u64, held: u32 },
    #[error("Not enough {0} to sell.")]
    InsufficientGoods(String),
}

/// Receipt for a completed purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Purchase {
    pub good: String,
    pub quantity: u32,
    pub cost: u32,
}

/// Receipt for a completed sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sale {
    pub good: String,
    pub quantity: u32,
    pub revenue: u32,
}

/// Parse a raw quantity argument. Anything non-numeric or not strictly
/// positive is rejected.
///
/// # Errors
///
/// Returns [`MarketError::InvalidQuantity`] for input that does not
/// parse as a positive integer.
pub fn parse_quantity(raw: &str) -> Result<u32, MarketError> {
    raw.parse::<u32>()
        .ok()
        .filter(|quantity| *quantity > 0)
        .ok_or(MarketError::InvalidQuantity)
}

/// What one unit fetches when sold: the listed price cut to 90%,
/// floored. The floor is applied per unit, before any quantity is
/// involved.
#[must_use]
#[allow(clippy::cast_possible_truncation)] // bounded above by list_price
pub const fn sell_unit_price(list_price: u32) -> u32 {
    (list_price as u64 * SELL_MARGIN_PCT as u64 / 100) as u32
}

/// Buy `quantity` units of `good` at the town's listed price.
///
/// The gold check precedes both mutations, so a rejected purchase
/// leaves the player untouched.
///
/// # Errors
///
/// Returns [`MarketError::InvalidQuantity`] for a zero quantity,
/// [`MarketError::UnknownGood`] when the town does not price the good,
/// and [`MarketError::InsufficientFunds`] when the cost exceeds the
/// player's gold.
pub fn buy(
    town: &Town,
    player: &mut PlayerState,
    good: &str,
    quantity: u32,
) -> Result<Purchase, MarketError> {
    if quantity == 0 {
        return Err(MarketError::InvalidQuantity);
    }
    let Some(unit_price) = town.price(good) else {
        return Err(MarketError::UnknownGood(good.to_string()));
    };

    let cost = u64::from(unit_price) * u64::from(quantity);
    if cost > u64::from(player.gold) {
        return Err(MarketError::InsufficientFunds {
            needed: cost,
            held: player.gold,
        });
    }
    let cost = u32::try_from(cost).unwrap_or(u32::MAX);

    player.debit(cost);
    player.add_goods(good, quantity);
    debug!("bought {quantity} {good} in {} for {cost} gold", town.name);

    Ok(Purchase {
        good: good.to_string(),
        quantity,
        cost,
    })
}

/// Sell `quantity` units of `good` at 90% of the town's listed price.
///
/// The inventory check precedes both mutations. Goods the player never
/// heard of count as held-zero, so an unknown good and a short
/// inventory are reported identically.
///
/// # Errors
///
/// Returns [`MarketError::InvalidQuantity`] for a zero quantity,
/// [`MarketError::InsufficientGoods`] when fewer units are held than
/// offered, and [`MarketError::UnknownGood`] only for the contract
/// fault of holding a good the town does not price.
pub fn sell(
    town: &Town,
    player: &mut PlayerState,
    good: &str,
    quantity: u32,
) -> Result<Sale, MarketError> {
    if quantity == 0 {
        return Err(MarketError::InvalidQuantity);
    }
    if player.good_count(good) < quantity {
        return Err(MarketError::InsufficientGoods(good.to_string()));
    }
    let Some(unit_price) = town.price(good) else {
        return Err(MarketError::UnknownGood(good.to_string()));
    };

    let revenue = sell_unit_price(unit_price).saturating_mul(quantity);

    player.remove_goods(good, quantity);
    player.credit(revenue);
    debug!("sold {quantity} {good} in {} for {revenue} gold", town.name);

    Ok(Sale {
        good: good.to_string(),
        quantity,
        revenue,
    })
}
