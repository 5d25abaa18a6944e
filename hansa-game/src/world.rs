//! World definition: goods, towns, and the toll-road graph.
//!
//! The world is built once from a JSON document, validated, and never
//! mutated afterwards. Engines only read from it.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use thiserror::Error;

/// A tradeable commodity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Good {
    pub name: String,
}

/// A town with a unit price for every good in the world.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Town {
    pub name: String,
    pub prices: HashMap<String, u32>,
}

impl Town {
    /// Listed unit price for a good, if the town trades it.
    #[must_use]
    pub fn price(&self, good: &str) -> Option<u32> {
        self.prices.get(good).copied()
    }
}

/// A directed, tolled edge between two towns.
///
/// Reference data ships symmetric pairs, but nothing here relies on
/// that: lookups only ever walk outgoing edges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Road {
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub toll: u32,
}

/// Starting position and purse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartState {
    pub town: String,
    pub gold: u32,
}

/// Raw world document as shipped in JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldData {
    pub goods: Vec<Good>,
    pub towns: Vec<Town>,
    #[serde(default)]
    pub roads: Vec<Road>,
    pub start: StartState,
}

impl WorldData {
    /// Parse a world document from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into a world document.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Outgoing edges of one town. Reference towns have two or three.
pub type RoadList = SmallVec<[Road; 4]>;

#[derive(Debug, Error)]
pub enum WorldError {
    #[error("world document is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("world defines no goods")]
    NoGoods,
    #[error("world defines no towns")]
    NoTowns,
    #[error("good {0} is defined twice")]
    DuplicateGood(String),
    #[error("town {0} is defined twice")]
    DuplicateTown(String),
    #[error("{town} has no price for {good}")]
    MissingPrice { town: String, good: String },
    #[error("{town} prices {good} at zero")]
    ZeroPrice { town: String, good: String },
    #[error("road {from} -> {to} references an unknown town")]
    DanglingRoad { from: String, to: String },
    #[error("start town {0} does not exist")]
    UnknownStartTown(String),
}

const REFERENCE_WORLD: &str = include_str!("../data/world.json");

/// Validated, immutable world model.
#[derive(Debug, Clone)]
pub struct World {
    goods: Vec<Good>,
    towns: HashMap<String, Town>,
    roads: HashMap<String, RoadList>,
    start: StartState,
}

impl World {
    /// Validate a raw document and build the lookup structure.
    ///
    /// # Errors
    ///
    /// Returns a [`WorldError`] if the document violates a construction
    /// invariant: empty good or town lists, duplicate names, a town
    /// missing a price for a defined good, a road endpoint that names
    /// no town, or a start town that does not exist.
    pub fn new(data: WorldData) -> Result<Self, WorldError> {
        if data.goods.is_empty() {
            return Err(WorldError::NoGoods);
        }
        if data.towns.is_empty() {
            return Err(WorldError::NoTowns);
        }

        let mut seen_goods = Vec::with_capacity(data.goods.len());
        for good in &data.goods {
            if seen_goods.contains(&good.name.as_str()) {
                return Err(WorldError::DuplicateGood(good.name.clone()));
            }
            seen_goods.push(good.name.as_str());
        }

        let mut towns = HashMap::with_capacity(data.towns.len());
        for town in data.towns {
            for good in &data.goods {
                match town.price(&good.name) {
                    None => {
                        return Err(WorldError::MissingPrice {
                            town: town.name.clone(),
                            good: good.name.clone(),
                        });
                    }
                    Some(0) => {
                        return Err(WorldError::ZeroPrice {
                            town: town.name.clone(),
                            good: good.name.clone(),
                        });
                    }
                    Some(_) => {}
                }
            }
            if towns.contains_key(&town.name) {
                return Err(WorldError::DuplicateTown(town.name));
            }
            towns.insert(town.name.clone(), town);
        }

        let mut roads: HashMap<String, RoadList> = HashMap::new();
        for road in data.roads {
            if !towns.contains_key(&road.from) || !towns.contains_key(&road.to) {
                return Err(WorldError::DanglingRoad {
                    from: road.from,
                    to: road.to,
                });
            }
            roads.entry(road.from.clone()).or_default().push(road);
        }

        if !towns.contains_key(&data.start.town) {
            return Err(WorldError::UnknownStartTown(data.start.town));
        }

        Ok(Self {
            goods: data.goods,
            towns,
            roads,
            start: data.start,
        })
    }

    /// Parse and validate a world from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns a [`WorldError`] on malformed JSON or a violated
    /// construction invariant.
    pub fn from_json(json: &str) -> Result<Self, WorldError> {
        Self::new(WorldData::from_json(json)?)
    }

    /// The world shipped with the game.
    ///
    /// # Errors
    ///
    /// Returns a [`WorldError`] if the embedded data is invalid; this is
    /// an initialization-time contract fault, fatal to startup.
    pub fn reference() -> Result<Self, WorldError> {
        Self::from_json(REFERENCE_WORLD)
    }

    /// All goods, in canonical display and iteration order.
    #[must_use]
    pub fn goods(&self) -> &[Good] {
        &self.goods
    }

    /// Exact-key town lookup.
    #[must_use]
    pub fn town(&self, name: &str) -> Option<&Town> {
        self.towns.get(name)
    }

    /// Listed unit price of a good in a town.
    #[must_use]
    pub fn price(&self, town: &str, good: &str) -> Option<u32> {
        self.town(town).and_then(|town| town.price(good))
    }

    /// Outgoing roads of a town. Empty when the town has no roads,
    /// which is valid, not an error.
    #[must_use]
    pub fn roads_from(&self, town: &str) -> &[Road] {
        self.roads.get(town).map_or(&[], SmallVec::as_slice)
    }

    #[must_use]
    pub fn start_town(&self) -> &str {
        &self.start.town
    }

    #[must_use]
    pub const fn start_gold(&self) -> u32 {
        self.start.gold
    }
}

/// Canonical form of a good name argument: tokens rejoined with single
/// spaces, first character upper-cased, the rest lower-cased.
///
/// Only the first character of a multi-word name is title-cased, so
/// "fine wool" becomes "Fine wool", never "Fine Wool".
#[must_use]
pub fn canonical_good_name(raw: &str) -> String {
    let joined = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    let mut chars = joined.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => joined,
    }
}
