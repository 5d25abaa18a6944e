//! Command parsing, dispatch, and reply rendering.
//!
//! The driver hands every trimmed, non-empty input line to
//! [`dispatch`], which routes it through the market and travel engines
//! and hands back a displayable [`Reply`]. Malformed input always
//! produces a message, never a crash.

use std::fmt::Write as _;

use log::warn;

use crate::market;
use crate::state::PlayerState;
use crate::travel;
use crate::world::{Town, World, canonical_good_name};

const BUY_USAGE: &str = "Usage: buy <qty> <good>";
const SELL_USAGE: &str = "Usage: sell <qty> <good>";
const TRAVEL_USAGE: &str = "Usage: travel <town>";

const HELP_TEXT: &str =
    "help | status | market | roads | buy <qty> <good> | sell <qty> <good> | travel <town> | quit";

/// One parsed input line. Verbs are case-insensitive; the argument
/// tail after the fixed positions is rejoined with single spaces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Status,
    Market,
    Roads,
    /// Quantity stays raw here so the market engine owns its
    /// validation.
    Buy {
        quantity: String,
        good: String,
    },
    Sell {
        quantity: String,
        good: String,
    },
    Travel {
        destination: String,
    },
    Quit,
    /// Recognized verb, missing arguments.
    Usage(&'static str),
    Unknown(String),
}

impl Command {
    /// Parse one input line. Never fails; unrecognized input becomes
    /// [`Command::Unknown`].
    #[must_use]
    pub fn parse(line: &str) -> Self {
        let mut parts = line.split_whitespace();
        let Some(verb) = parts.next() else {
            return Self::Unknown(String::new());
        };
        let args: Vec<&str> = parts.collect();

        match verb.to_lowercase().as_str() {
            "help" => Self::Help,
            "status" => Self::Status,
            "market" => Self::Market,
            "roads" => Self::Roads,
            "buy" => match args.split_first() {
                Some((quantity, goods)) if !goods.is_empty() => Self::Buy {
                    quantity: (*quantity).to_string(),
                    good: goods.join(" "),
                },
                _ => Self::Usage(BUY_USAGE),
            },
            "sell" => match args.split_first() {
                Some((quantity, goods)) if !goods.is_empty() => Self::Sell {
                    quantity: (*quantity).to_string(),
                    good: goods.join(" "),
                },
                _ => Self::Usage(SELL_USAGE),
            },
            "travel" => {
                if args.is_empty() {
                    Self::Usage(TRAVEL_USAGE)
                } else {
                    Self::Travel {
                        destination: args.join(" "),
                    }
                }
            }
            "quit" => Self::Quit,
            _ => Self::Unknown(verb.to_string()),
        }
    }
}

/// Displayable outcome of one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    /// Set only by `quit`, the single terminal transition.
    pub quit: bool,
}

impl Reply {
    fn say(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            quit: false,
        }
    }
}

/// Route one input line to the engines and render the outcome.
pub fn dispatch(world: &World, player: &mut PlayerState, line: &str) -> Reply {
    match Command::parse(line) {
        Command::Help => Reply::say(HELP_TEXT),
        Command::Status => Reply::say(render_status(world, player)),
        Command::Market => match current_town(world, player) {
            Ok(town) => Reply::say(render_market(world, town)),
            Err(fault) => Reply::say(fault),
        },
        Command::Roads => Reply::say(render_roads(world, &player.town)),
        Command::Buy { quantity, good } => Reply::say(handle_buy(world, player, &quantity, &good)),
        Command::Sell { quantity, good } => {
            Reply::say(handle_sell(world, player, &quantity, &good))
        }
        Command::Travel { destination } => Reply::say(handle_travel(world, player, &destination)),
        Command::Quit => Reply {
            text: "Safe roads, trader.".to_string(),
            quit: true,
        },
        Command::Usage(usage) => Reply::say(usage),
        Command::Unknown(verb) => {
            Reply::say(format!("Unknown command '{verb}'. Type 'help' for options."))
        }
    }
}

/// The banner block the driver prints at startup: starting position
/// followed by the local roads and market.
#[must_use]
pub fn welcome(world: &World, player: &PlayerState) -> String {
    let mut text = format!("You start in {} with {} gold.", player.town, player.gold);
    let _ = write!(text, "\n{}", render_roads(world, &player.town));
    if let Ok(town) = current_town(world, player) {
        let _ = write!(text, "\n{}", render_market(world, town));
    }
    let _ = write!(text, "\n{HELP_TEXT}");
    text
}

/// Last-resort safety net: the player's town should always resolve,
/// and a miss is a contract fault that must not end the session.
fn current_town<'a>(world: &'a World, player: &PlayerState) -> Result<&'a Town, String> {
    world.town(&player.town).ok_or_else(|| {
        warn!("player location {} is missing from the world", player.town);
        format!("{} is on no map anyone trusts. Nothing happens.", player.town)
    })
}

fn handle_buy(
    world: &World,
    player: &mut PlayerState,
    raw_quantity: &str,
    raw_good: &str,
) -> String {
    let town = match current_town(world, player) {
        Ok(town) => town,
        Err(fault) => return fault,
    };
    let good = canonical_good_name(raw_good);
    let result = market::parse_quantity(raw_quantity)
        .and_then(|quantity| market::buy(town, player, &good, quantity));
    match result {
        Ok(purchase) => format!(
            "Bought {} {} for {} gold.",
            purchase.quantity, purchase.good, purchase.cost
        ),
        Err(err) => err.to_string(),
    }
}

fn handle_sell(
    world: &World,
    player: &mut PlayerState,
    raw_quantity: &str,
    raw_good: &str,
) -> String {
    let town = match current_town(world, player) {
        Ok(town) => town,
        Err(fault) => return fault,
    };
    let good = canonical_good_name(raw_good);
    let result = market::parse_quantity(raw_quantity)
        .and_then(|quantity| market::sell(town, player, &good, quantity));
    match result {
        Ok(sale) => format!(
            "Sold {} {} for {} gold.",
            sale.quantity, sale.good, sale.revenue
        ),
        Err(err) => err.to_string(),
    }
}

fn handle_travel(world: &World, player: &mut PlayerState, destination: &str) -> String {
    match travel::travel(world, player, destination) {
        Ok(arrival) => {
            let mut text = format!("Arrived at {}. Gold left: {}.", arrival.town, arrival.gold_left);
            let _ = write!(text, "\n{}", render_roads(world, &player.town));
            if let Ok(town) = current_town(world, player) {
                let _ = write!(text, "\n{}", render_market(world, town));
            }
            text
        }
        Err(err) => err.to_string(),
    }
}

fn render_status(world: &World, player: &PlayerState) -> String {
    let mut out = format!("Gold: {}\nInventory:", player.gold);
    for good in world.goods() {
        let _ = write!(out, "\n  {}: {}", good.name, player.good_count(&good.name));
    }
    out
}

fn render_market(world: &World, town: &Town) -> String {
    let mut out = format!("Market in {}:", town.name);
    let _ = write!(out, "\n  {:<8}{:>6}{:>6}", "Good", "Buy", "Sell");
    for good in world.goods() {
        if let Some(price) = town.price(&good.name) {
            let _ = write!(
                out,
                "\n  {:<8}{:>6}{:>6}",
                good.name,
                price,
                market::sell_unit_price(price)
            );
        }
    }
    out
}

fn render_roads(world: &World, town: &str) -> String {
    let roads = world.roads_from(town);
    if roads.is_empty() {
        return format!("No roads lead out of {town}.");
    }
    let mut out = String::from("Roads:");
    for road in roads {
        let _ = write!(out, "\n  -> {} (toll {})", road.to, road.toll);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::World;

    fn fixture() -> (World, PlayerState) {
        let world = World::reference().unwrap();
        let player = PlayerState::new(&world);
        (world, player)
    }

    #[test]
    fn parse_recognizes_verbs_case_insensitively() {
        assert_eq!(Command::parse("HELP"), Command::Help);
        assert_eq!(Command::parse("Status"), Command::Status);
        assert_eq!(Command::parse("quit"), Command::Quit);
        assert_eq!(
            Command::parse("xyzzy"),
            Command::Unknown("xyzzy".to_string())
        );
    }

    #[test]
    fn parse_rejoins_multi_word_argument_tails() {
        assert_eq!(
            Command::parse("buy 2 fine  wool"),
            Command::Buy {
                quantity: "2".to_string(),
                good: "fine wool".to_string(),
            }
        );
        assert_eq!(
            Command::parse("travel New  Eldham"),
            Command::Travel {
                destination: "New Eldham".to_string(),
            }
        );
    }

    #[test]
    fn parse_flags_missing_arguments_as_usage() {
        assert_eq!(Command::parse("buy"), Command::Usage(BUY_USAGE));
        assert_eq!(Command::parse("buy 2"), Command::Usage(BUY_USAGE));
        assert_eq!(Command::parse("sell 1"), Command::Usage(SELL_USAGE));
        assert_eq!(Command::parse("travel"), Command::Usage(TRAVEL_USAGE));
    }

    #[test]
    fn dispatch_buy_normalizes_good_names() {
        let (world, mut player) = fixture();
        let reply = dispatch(&world, &mut player, "buy 2 grain");
        assert_eq!(reply.text, "Bought 2 Grain for 10 gold.");
        assert!(!reply.quit);
        assert_eq!(player.gold, 20);
        assert_eq!(player.good_count("Grain"), 2);
    }

    #[test]
    fn dispatch_surfaces_engine_errors_as_text() {
        let (world, mut player) = fixture();
        let reply = dispatch(&world, &mut player, "buy 100 Iron");
        assert_eq!(reply.text, "Not enough gold: need 1200, have 30.");
        assert_eq!(player.gold, 30);

        let reply = dispatch(&world, &mut player, "buy two Grain");
        assert_eq!(reply.text, "Invalid quantity.");

        let reply = dispatch(&world, &mut player, "sell 1 Grain");
        assert_eq!(reply.text, "Not enough Grain to sell.");
    }

    #[test]
    fn dispatch_travel_reports_the_new_town() {
        let (world, mut player) = fixture();
        let reply = dispatch(&world, &mut player, "travel brackenridge");
        assert!(reply.text.starts_with("Arrived at Brackenridge. Gold left: 28."));
        assert!(reply.text.contains("Roads:"));
        assert!(reply.text.contains("Market in Brackenridge:"));
        assert_eq!(player.town, "Brackenridge");
    }

    #[test]
    fn dispatch_quit_is_the_only_terminal_reply() {
        let (world, mut player) = fixture();
        for line in ["help", "status", "market", "roads", "travel Nowhere"] {
            assert!(!dispatch(&world, &mut player, line).quit);
        }
        assert!(dispatch(&world, &mut player, "QUIT").quit);
    }

    #[test]
    fn status_lists_every_good_in_canonical_order() {
        let (world, mut player) = fixture();
        player.add_goods("Wool", 4);
        let reply = dispatch(&world, &mut player, "status");
        let grain = reply.text.find("Grain: 0").unwrap();
        let wool = reply.text.find("Wool: 4").unwrap();
        let iron = reply.text.find("Iron: 0").unwrap();
        assert!(grain < wool && wool < iron);
    }

    #[test]
    fn market_shows_buy_and_sell_columns() {
        let (world, mut player) = fixture();
        let reply = dispatch(&world, &mut player, "market");
        assert!(reply.text.contains("Market in Eldham:"));
        assert!(reply.text.contains("Grain"));
        // Grain lists at 5 and sells back at 4.
        let grain_line = reply
            .text
            .lines()
            .find(|line| line.contains("Grain"))
            .unwrap();
        assert!(grain_line.contains('5') && grain_line.contains('4'));
    }

    #[test]
    fn a_lost_player_gets_a_message_not_a_crash() {
        let (world, mut player) = fixture();
        player.town = "Atlantis".to_string();
        let reply = dispatch(&world, &mut player, "market");
        assert!(reply.text.contains("Atlantis"));
        assert!(!reply.quit);
        let reply = dispatch(&world, &mut player, "buy 1 grain");
        assert!(reply.text.contains("Nothing happens."));
    }

    #[test]
    fn welcome_includes_position_roads_market_and_help() {
        let (world, player) = fixture();
        let text = welcome(&world, &player);
        assert!(text.contains("You start in Eldham with 30 gold."));
        assert!(text.contains("-> Brackenridge (toll 2)"));
        assert!(text.contains("Market in Eldham:"));
        assert!(text.contains("travel <town>"));
    }
}
