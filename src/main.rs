//! Creature Duel - Main Binary
//!
//! Runs AI-vs-AI duels from deck lists and inspects card folders

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use creature_duel::{
    game::{
        GameLoop, PlayerController, RandomController, SessionConfig, VerbosityLevel, Weather,
        ZeroController,
    },
    loader::{CardDatabase, DeckLoader, GameInitializer},
};
use std::path::PathBuf;

/// Controller type for AI agents
#[derive(Debug, Clone, Copy, ValueEnum)]
enum ControllerType {
    /// Always chooses the first offered action
    Zero,
    /// Makes random choices (seeded by --seed)
    Random,
}

/// Verbosity level for game output (custom parser supporting both names and numbers)
#[derive(Debug, Clone, Copy)]
struct VerbosityArg(VerbosityLevel);

impl std::str::FromStr for VerbosityArg {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "silent" | "0" => Ok(VerbosityArg(VerbosityLevel::Silent)),
            "minimal" | "1" => Ok(VerbosityArg(VerbosityLevel::Minimal)),
            "normal" | "2" => Ok(VerbosityArg(VerbosityLevel::Normal)),
            "verbose" | "3" => Ok(VerbosityArg(VerbosityLevel::Verbose)),
            _ => Err(format!(
                "invalid verbosity level '{s}' (expected: silent/0, minimal/1, normal/2, verbose/3)"
            )),
        }
    }
}

#[derive(Parser)]
#[command(name = "duel")]
#[command(about = "Creature Duel - turn-based creature battling engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play one game between two AI controllers
    Play {
        /// Deck file (.dck) for player 1
        #[arg(value_name = "PLAYER1_DECK")]
        deck1: PathBuf,

        /// Deck file (.dck) for player 2
        #[arg(value_name = "PLAYER2_DECK")]
        deck2: PathBuf,

        /// Directory of card definition files
        #[arg(long, default_value = "cardsfolder")]
        cards: PathBuf,

        /// Controller for player 1
        #[arg(long, value_enum, default_value = "random")]
        p1: ControllerType,

        /// Controller for player 2
        #[arg(long, value_enum, default_value = "random")]
        p2: ControllerType,

        /// Seed for shuffling, weather and random controllers
        #[arg(long, default_value_t = 0)]
        seed: u64,

        /// Starting weather (clear, rainy, sunny)
        #[arg(long, default_value = "clear")]
        weather: Weather,

        /// Pick a random weather every round
        #[arg(long)]
        rotate_weather: bool,

        /// Verbosity level for game output (0=silent, 1=minimal, 2=normal, 3=verbose)
        #[arg(long, short = 'v', default_value = "normal")]
        verbosity: VerbosityArg,

        /// Turn limit before the game is declared a draw
        #[arg(long, default_value_t = 50)]
        max_turns: u32,

        /// Print the final game state as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the cards found in a card folder
    Cards {
        #[arg(value_name = "DIR", default_value = "cardsfolder")]
        dir: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Play {
            deck1,
            deck2,
            cards,
            p1,
            p2,
            seed,
            weather,
            rotate_weather,
            verbosity,
            max_turns,
            json,
        } => {
            let config = SessionConfig {
                initial_weather: weather,
                rotate_weather,
                max_turns,
                ..SessionConfig::default()
            };
            run_play(PlayArgs {
                deck1,
                deck2,
                cards,
                p1,
                p2,
                seed,
                verbosity: verbosity.0,
                json,
                config,
            })
        }
        Commands::Cards { dir } => run_cards(dir),
    }
}

struct PlayArgs {
    deck1: PathBuf,
    deck2: PathBuf,
    cards: PathBuf,
    p1: ControllerType,
    p2: ControllerType,
    seed: u64,
    verbosity: VerbosityLevel,
    json: bool,
    config: SessionConfig,
}

fn run_play(args: PlayArgs) -> Result<()> {
    let card_db = CardDatabase::load_from_cardsfolder(&args.cards)
        .with_context(|| format!("loading cards from {}", args.cards.display()))?;
    for (path, err) in card_db.load_errors() {
        eprintln!("warning: skipped {}: {err}", path.display());
    }

    let deck1 = DeckLoader::load_from_file(&args.deck1)
        .with_context(|| format!("loading deck {}", args.deck1.display()))?;
    let deck2 = DeckLoader::load_from_file(&args.deck2)
        .with_context(|| format!("loading deck {}", args.deck2.display()))?;
    let p1_name = deck1.name.clone().unwrap_or_else(|| "Player 1".to_string());
    let mut p2_name = deck2.name.clone().unwrap_or_else(|| "Player 2".to_string());
    if p1_name == p2_name {
        p2_name.push_str(" (2)");
    }

    let mut game = GameInitializer::new(&card_db)
        .init_game(&p1_name, &deck1, &p2_name, &deck2, args.config, args.seed)
        .context("setting up the game")?;

    let p1_id = game.players[0].id;
    let p2_id = game.players[1].id;
    let mut controller1 = make_controller(args.p1, p1_id, args.seed);
    let mut controller2 = make_controller(args.p2, p2_id, args.seed.wrapping_add(1));

    if args.verbosity >= VerbosityLevel::Minimal {
        println!("=== {p1_name} vs {p2_name} (seed {}) ===\n", args.seed);
    }

    let result = GameLoop::new(&mut game)
        .with_verbosity(args.verbosity)
        .run_game(&mut *controller1, &mut *controller2)?;
    game.cleanup();

    if args.verbosity >= VerbosityLevel::Minimal {
        println!("\n=== Game Over ===");
        match result.winner {
            Some(winner_id) => println!("Winner: {}", game.get_player(winner_id)?.name),
            None => println!("No winner"),
        }
        println!("Turns played: {}", result.turns_played);
        println!("Reason: {:?}", result.end_reason);
        for player in &game.players {
            println!("  {}: {} health", player.name, player.health);
        }
    }

    if args.json {
        println!("{}", game.to_json()?);
    }
    Ok(())
}

fn make_controller(
    kind: ControllerType,
    player_id: creature_duel::core::PlayerId,
    seed: u64,
) -> Box<dyn PlayerController> {
    match kind {
        ControllerType::Zero => Box::new(ZeroController::new(player_id)),
        ControllerType::Random => Box::new(RandomController::with_seed(player_id, seed)),
    }
}

fn run_cards(dir: PathBuf) -> Result<()> {
    let card_db = CardDatabase::load_from_cardsfolder(&dir)
        .with_context(|| format!("loading cards from {}", dir.display()))?;

    for def in card_db.sorted() {
        let effects: Vec<String> = def
            .effects
            .iter()
            .map(|e| format!("{:?} {}", e.effect_type, e.trigger))
            .collect();
        println!(
            "{:<20} {:?} {}/{} {}",
            def.name.as_str(),
            def.card_type,
            def.attack,
            def.health,
            effects.join(", ")
        );
    }
    for (path, err) in card_db.load_errors() {
        eprintln!("warning: skipped {}: {err}", path.display());
    }
    println!("\n{} cards", card_db.len());
    Ok(())
}
