//! End-to-end determinism tests
//!
//! Games with the same seed must produce identical logs and final states.
//! One test is generated per `.dck` file in `test_decks/`, playing the deck
//! against the bundled Ember Rush list.

use creature_duel::game::{
    GameLoop, GameResult, LogCategory, OutputMode, RandomController, SessionConfig,
    VerbosityLevel,
};
use creature_duel::loader::{CardDatabase, DeckLoader, GameInitializer};
use dir_test::{dir_test, Fixture};
use similar_asserts::assert_eq;
use std::path::{Path, PathBuf};

fn manifest_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

/// Play one seeded random-vs-random game; return its log text, final JSON
/// state and result
fn run_game_with_seed(deck_path: &Path, seed: u64, config: SessionConfig) -> (String, String, GameResult) {
    let db = CardDatabase::load_from_cardsfolder(&manifest_dir().join("cardsfolder")).unwrap();
    let deck1 = DeckLoader::load_from_file(deck_path).unwrap();
    let deck2 = DeckLoader::load_from_file(&manifest_dir().join("test_decks/ember_rush.dck")).unwrap();

    let mut game = GameInitializer::new(&db)
        .init_game("P1", &deck1, "P2", &deck2, config, seed)
        .unwrap();
    game.logger.set_output_mode(OutputMode::Memory);

    let (p1, p2) = (game.players[0].id, game.players[1].id);
    let mut c1 = RandomController::with_seed(p1, seed);
    let mut c2 = RandomController::with_seed(p2, seed + 1);
    let result = GameLoop::new(&mut game)
        .with_verbosity(VerbosityLevel::Verbose)
        .run_game(&mut c1, &mut c2)
        .unwrap();

    let log: Vec<String> = game.logger.logs().iter().map(|e| e.message.clone()).collect();
    (log.join("\n"), game.to_json().unwrap(), result)
}

#[dir_test(
    dir: "$CARGO_MANIFEST_DIR/test_decks",
    glob: "**/*.dck",
)]
fn test_deck_determinism(fixture: Fixture<&str>) {
    let deck_path = Path::new(fixture.path());
    let seed = 42;

    let (log1, state1, result1) = run_game_with_seed(deck_path, seed, SessionConfig::default());
    let (log2, state2, result2) = run_game_with_seed(deck_path, seed, SessionConfig::default());

    assert!(!log1.is_empty(), "{} produced no output", fixture.path());
    assert_eq!(log1, log2);
    assert_eq!(state1, state2);
    assert_eq!(result1, result2);
}

#[test]
fn test_rotating_weather_is_seeded() {
    let deck = manifest_dir().join("test_decks/swamp_critters.dck");
    let config = SessionConfig {
        rotate_weather: true,
        max_turns: 20,
        ..SessionConfig::default()
    };

    let (log1, _, _) = run_game_with_seed(&deck, 7, config.clone());
    let (log2, _, _) = run_game_with_seed(&deck, 7, config);
    assert_eq!(log1, log2);
}

#[test]
fn test_games_finish_within_turn_limit() {
    let deck = manifest_dir().join("test_decks/swamp_critters.dck");
    for seed in 0..5 {
        let config = SessionConfig {
            max_turns: 30,
            ..SessionConfig::default()
        };
        let (log, _, result) = run_game_with_seed(&deck, seed, config);
        assert!(result.turns_played <= 30);
        assert!(log.contains("Turn 1"));
    }
}

#[test]
fn test_log_categories_present() {
    let deck = manifest_dir().join("test_decks/swamp_critters.dck");
    let db = CardDatabase::load_from_cardsfolder(&manifest_dir().join("cardsfolder")).unwrap();
    let deck1 = DeckLoader::load_from_file(&deck).unwrap();
    let mut game = GameInitializer::new(&db)
        .init_game("P1", &deck1, "P2", &deck1, SessionConfig::default(), 3)
        .unwrap();
    game.logger.set_output_mode(OutputMode::Memory);

    let (p1, p2) = (game.players[0].id, game.players[1].id);
    let mut c1 = RandomController::with_seed(p1, 3);
    let mut c2 = RandomController::with_seed(p2, 4);
    GameLoop::new(&mut game)
        .with_verbosity(VerbosityLevel::Verbose)
        .run_turns(&mut c1, &mut c2, 6)
        .unwrap();

    let logs = game.logger.logs();
    assert!(logs.count_matching(LogCategory::Turn, "Turn") >= 1);
    assert!(logs.count_matching(LogCategory::Queue, "Queued") >= 1);
}
