//! Card loading tests
//!
//! Every card file under cardsfolder/ must parse and instantiate. One test is
//! generated per file, so a new card only needs a new .txt.

use creature_duel::core::{CardId, CardType, EffectType, Trigger};
use creature_duel::loader::{CardDatabase, CardLoader, DeckLoader};
use creature_duel::Result;
use dir_test::{dir_test, Fixture};
use std::path::PathBuf;

#[dir_test(
    dir: "$CARGO_MANIFEST_DIR/cardsfolder",
    glob: "**/*.txt",
)]
fn test_card_file_parses(fixture: Fixture<&str>) {
    let def = CardLoader::parse(fixture.content())
        .unwrap_or_else(|e| panic!("{} failed to parse: {e}", fixture.path()));

    let card = def.instantiate(CardId::new(1));
    assert_eq!(card.name, def.name);
    match def.card_type {
        CardType::Creature => {
            assert!(card.health > 0, "{} has no health", fixture.path());
            assert!(card.attack >= 0);
        }
        CardType::Spell => {
            assert!(
                card.has_trigger(Trigger::OnPlay),
                "{} does nothing when played",
                fixture.path()
            );
        }
    }
}

#[test]
fn test_load_thornback_toad() -> Result<()> {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("cardsfolder/creatures/thornback_toad.txt");
    let def = CardLoader::load_from_file(&path)?;

    assert_eq!(def.name.as_str(), "Thornback Toad");
    assert_eq!(def.card_type, CardType::Creature);
    assert_eq!((def.attack, def.health), (2, 5));
    assert_eq!(def.effects.len(), 1);
    assert_eq!(def.effects[0].effect_type, EffectType::Triggered);
    assert_eq!(def.effects[0].trigger, Trigger::OnDamage);
    Ok(())
}

#[test]
fn test_decks_reference_known_cards() -> Result<()> {
    let root = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let db = CardDatabase::load_from_cardsfolder(&root.join("cardsfolder"))?;

    for deck_file in ["swamp_critters.dck", "ember_rush.dck"] {
        let deck = DeckLoader::load_from_file(&root.join("test_decks").join(deck_file))?;
        assert!(deck.total_cards() >= 15, "{deck_file} is too small");
        for name in deck.unique_card_names() {
            assert!(db.contains(name), "{deck_file}: unknown card {name}");
        }
    }
    Ok(())
}
