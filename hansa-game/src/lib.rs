//! Hansa Game Engine
//!
//! Platform-agnostic core logic for the Hansa toll-road trading game.
//! A trader moves between towns connected by tolled roads, buying and
//! selling goods whose prices differ by town. This crate provides the
//! whole world/player state machine without any I/O or platform
//! dependencies; frontends feed it command lines and display the
//! replies.

pub mod command;
pub mod market;
pub mod state;
pub mod travel;
pub mod world;

// Re-export commonly used types
pub use command::{Command, Reply, dispatch, welcome};
pub use market::{
    MarketError, Purchase, SELL_MARGIN_PCT, Sale, buy, parse_quantity, sell, sell_unit_price,
};
pub use state::PlayerState;
pub use travel::{Arrival, TravelError, travel};
pub use world::{
    Good, Road, RoadList, StartState, Town, World, WorldData, WorldError, canonical_good_name,
};
