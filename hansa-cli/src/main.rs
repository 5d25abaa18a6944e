//! Terminal frontend: reads command lines from stdin, feeds them to
//! the game engine, and prints the replies.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use log::info;

use hansa_game::{PlayerState, World, dispatch, welcome};

#[derive(Debug, Parser)]
#[command(name = "hansa", version)]
#[command(about = "A turn-based trading game on medieval toll roads")]
struct Args {
    /// Path to an alternate world definition (JSON)
    #[arg(long)]
    world: Option<PathBuf>,

    /// Skip the opening banner
    #[arg(long)]
    quiet: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let world = load_world(args.world.as_deref())?;
    let mut player = PlayerState::new(&world);
    info!("session starts in {}", player.town);

    if !args.quiet {
        println!("{}", "==== Hansa ====".bold());
        println!("You are a trader moving between medieval towns.");
        println!("{}", welcome(&world, &player));
    }

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("\n{} ", ">".bold());
        io::stdout().flush().context("failed to flush stdout")?;

        line.clear();
        let bytes = stdin
            .lock()
            .read_line(&mut line)
            .context("failed to read input")?;
        if bytes == 0 {
            // End of input: leave quietly rather than spin on empty reads.
            break;
        }
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let reply = dispatch(&world, &mut player, trimmed);
        println!("{}", reply.text);
        if reply.quit {
            break;
        }
    }

    Ok(())
}

fn load_world(path: Option<&Path>) -> Result<World> {
    match path {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("failed to read world file {}", path.display()))?;
            World::from_json(&raw)
                .with_context(|| format!("invalid world file {}", path.display()))
        }
        None => World::reference().context("shipped world data is invalid"),
    }
}
